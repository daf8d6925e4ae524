use crate::FinderError;

/// Ingredient text that passed validation: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery(String);

impl ValidatedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ValidatedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim the raw input and reject it if nothing is left.
///
/// The ingredient list is passed on as typed: no lowercasing and no
/// splitting on commas.
pub fn validate(raw: &str) -> Result<ValidatedQuery, FinderError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FinderError::EmptyInput);
    }
    Ok(ValidatedQuery(trimmed.to_string()))
}
