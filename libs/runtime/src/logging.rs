use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{filter::FilterFn, fmt};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

fn level_filter(s: &str) -> LevelFilter {
    parse_tracing_level(s)
        .map(LevelFilter::from_level)
        .unwrap_or(LevelFilter::OFF)
}

/// True if `target` is `crate_name` or lives under `crate_name::`.
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target == crate_name
        || (target.starts_with(crate_name) && target[crate_name.len()..].starts_with("::"))
}

// -------- rotating file sinks --------

type Rotating = Arc<Mutex<FileRotate<AppendTimestamp>>>;

#[derive(Clone)]
struct RotWriterHandle(Option<Rotating>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &self.0 {
            Some(w) => w
                .lock()
                .map_err(|_| std::io::Error::other("log writer poisoned"))?
                .write(buf),
            // no sink for this target: drop the record
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &self.0 {
            Some(w) => w
                .lock()
                .map_err(|_| std::io::Error::other("log writer poisoned"))?
                .flush(),
            None => Ok(()),
        }
    }
}

/// Routes records to per-subsystem files by target prefix, falling back to
/// the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<Rotating>,
    by_prefix: HashMap<String, Rotating>,
}

impl FileRouter {
    fn resolve_for(&self, target: &str) -> Option<Rotating> {
        self.by_prefix
            .iter()
            .find(|(name, _)| matches_crate_prefix(target, name))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = RotWriterHandle;

    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        RotWriterHandle(self.resolve_for(meta.target()))
    }
}

/// Absolute paths are kept; relative paths are joined with `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn create_rotating_writer_at_path(log_path: &Path, max_bytes: usize) -> std::io::Result<Rotating> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::Age(chrono::Duration::days(1))),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Ok(Arc::new(Mutex::new(rot)))
}

fn open_section_file(name: &str, section: &Section, base_dir: &Path) -> Option<Rotating> {
    if section.file.trim().is_empty() {
        return None;
    }
    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let log_path = resolve_log_path(&section.file, base_dir);

    match create_rotating_writer_at_path(&log_path, max_bytes as usize) {
        Ok(w) => Some(w),
        Err(e) => {
            eprintln!(
                "Failed to init log file for '{}': {} ({})",
                name,
                log_path.to_string_lossy(),
                e
            );
            None
        }
    }
}

// -------- filters --------

/// Per-target filter: explicit subsystems get their own level; the default
/// section applies to every other target.
struct LevelPlan {
    default: LevelFilter,
    explicit: Vec<(String, LevelFilter)>,
}

impl LevelPlan {
    fn console(cfg: &LoggingConfig) -> Self {
        Self::build(cfg, |s| level_filter(&s.console_level))
    }

    fn file(cfg: &LoggingConfig) -> Self {
        Self::build(cfg, |s| {
            if s.file.trim().is_empty() {
                LevelFilter::OFF
            } else {
                level_filter(&s.file_level)
            }
        })
    }

    fn build(cfg: &LoggingConfig, pick: impl Fn(&Section) -> LevelFilter) -> Self {
        let default = cfg.get(DEFAULT_SECTION).map(&pick).unwrap_or(LevelFilter::OFF);
        let explicit = cfg
            .iter()
            .filter(|(k, _)| k.as_str() != DEFAULT_SECTION)
            .map(|(k, v)| (k.clone(), pick(v)))
            .collect();
        Self { default, explicit }
    }

    fn allows(&self, meta: &tracing::Metadata<'_>) -> bool {
        let level = self
            .explicit
            .iter()
            .find(|(name, _)| matches_crate_prefix(meta.target(), name))
            .map(|(_, lvl)| *lvl)
            .unwrap_or(self.default);
        level >= *meta.level()
    }

    fn into_filter(
        self,
    ) -> FilterFn<impl Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static> {
        FilterFn::new(move |meta| self.allows(meta))
    }
}

// -------- public init --------

/// Install the global subscriber.
/// `base_dir` resolves relative log file paths (usually `server.home_dir`).
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before installing the subscriber.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let mut router = FileRouter::default();
    for (name, section) in cfg {
        let writer = open_section_file(name, section, base_dir);
        match (name.as_str(), writer) {
            (DEFAULT_SECTION, w) => router.default = w,
            (_, Some(w)) => {
                router.by_prefix.insert(name.clone(), w);
            }
            (_, None) => {}
        }
    }

    install(LevelPlan::console(cfg), LevelPlan::file(cfg), router);
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_max_level(Level::INFO)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

fn install(console: LevelPlan, file: LevelPlan, router: FileRouter) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    let ansi = atty::is(atty::Stream::Stdout);

    let console_layer = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console.into_filter());

    if router.is_empty() {
        let _ = Registry::default().with(console_layer).try_init();
        return;
    }

    let file_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(router)
        .with_filter(file.into_filter());

    let _ = Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
