use crate::contract::{FieldError, NewArticle};

/// Titles longer than this many characters are rejected.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Every problem with `new` at once; empty means valid.
pub fn validate_new_article(new: &NewArticle) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if new.title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    } else if new.title.chars().count() > MAX_TITLE_LENGTH {
        errors.push(FieldError::new(
            "title",
            format!("Title must not exceed {MAX_TITLE_LENGTH} characters"),
        ));
    }
    if new.author.trim().is_empty() {
        errors.push(FieldError::new("author", "Author is required"));
    }
    if new.content.trim().is_empty() {
        errors.push(FieldError::new("content", "Content is required"));
    }
    if new.publication_date.is_none() {
        errors.push(FieldError::new(
            "publicationDate",
            "Publication date is required",
        ));
    }

    errors
}
