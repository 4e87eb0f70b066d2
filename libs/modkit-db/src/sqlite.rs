use std::path::{Path, PathBuf};

use crate::{DbError, Result};

pub(crate) fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// Statements applied to every new SQLite connection.
pub(crate) fn connection_pragmas(in_memory: bool, busy_timeout_ms: i64) -> Vec<String> {
    if in_memory {
        // WAL is not supported for in-memory databases.
        return vec![
            "PRAGMA journal_mode = DELETE".to_string(),
            "PRAGMA synchronous = NORMAL".to_string(),
            "PRAGMA foreign_keys = ON".to_string(),
        ];
    }
    vec![
        "PRAGMA journal_mode = WAL".to_string(),
        "PRAGMA synchronous = NORMAL".to_string(),
        "PRAGMA foreign_keys = ON".to_string(),
        format!("PRAGMA busy_timeout = {busy_timeout_ms}"),
    ]
}

fn split_file_dsn(dsn: &str) -> Option<(&str, Option<&str>)> {
    let rest = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))?;
    if rest.starts_with("file:") || is_memory_dsn(dsn) {
        return None;
    }
    Some(match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    })
}

/// Create the parent directory of a file-backed SQLite DSN.
pub(crate) fn ensure_parent_dir(dsn: &str) -> Result<()> {
    if let Some((path, _)) = split_file_dsn(dsn) {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}

/// Rewrite a relative `sqlite://` path against `base_dir`. In-memory DSNs
/// normalize to `sqlite::memory:`; other engines pass through untouched.
pub fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if !dsn.starts_with("sqlite:") {
        return Ok(dsn.to_string());
    }
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }

    let (path_str, query) =
        split_file_dsn(dsn).ok_or_else(|| DbError::InvalidSqliteDsn(dsn.to_string()))?;
    if path_str.is_empty() {
        return Err(DbError::InvalidSqliteDsn(dsn.to_string()));
    }

    let mut p = PathBuf::from(path_str);
    if p.is_relative() {
        p = base_dir.join(p);
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}
