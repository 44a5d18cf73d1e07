use crate::errors::AppError;

pub const MAX_SECTOR_LEN: usize = 128;
pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Trims a sector key and rejects empty, oversized, or control-character input.
pub fn validate_sector(raw: &str) -> Result<String, AppError> {
    let sector = raw.trim();
    if sector.is_empty() {
        return Err(AppError::Validation("sector cannot be empty".to_string()));
    }
    if sector.chars().count() > MAX_SECTOR_LEN {
        return Err(AppError::Validation(format!(
            "sector must be at most {MAX_SECTOR_LEN} characters"
        )));
    }
    if sector.chars().any(char::is_control) {
        return Err(AppError::Validation(
            "sector cannot contain control characters".to_string(),
        ));
    }
    Ok(sector.to_string())
}

/// Trims each skill/interest and drops blanks, keeping first-seen order.
pub fn clean_terms(terms: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        let term = term.trim();
        if !term.is_empty() && !cleaned.iter().any(|t| t == term) {
            cleaned.push(term.to_string());
        }
    }
    cleaned
}

pub fn page_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT)
}
