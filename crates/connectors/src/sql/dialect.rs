use crate::error::DbError;

/// Wraps an identifier in MySQL backticks.
pub fn quote_identifier(ident: &str) -> String {
    format!("`{ident}`")
}

/// Table and identifier-column names are the only strings substituted
/// directly into SQL text (placeholders cannot stand in for identifiers),
/// so they must come from a trusted set. This grammar is that boundary:
/// plain MySQL identifiers only, no quoting characters, no punctuation.
pub fn is_safe_identifier(ident: &str) -> bool {
    !ident.is_empty()
        && ident.len() <= 64
        && ident
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Validates and quotes an identifier in one step.
pub fn checked_identifier(ident: &str) -> Result<String, DbError> {
    if is_safe_identifier(ident) {
        Ok(quote_identifier(ident))
    } else {
        Err(DbError::UnsafeIdentifier(ident.to_string()))
    }
}
