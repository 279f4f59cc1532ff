//! Error types for placeholder construction

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderError {
    #[error("placeholder identifier must not be empty")]
    EmptyIdentifier,

    #[error("invalid placeholder identifier {identifier:?}: must not contain '%' or whitespace")]
    InvalidIdentifier { identifier: String },
}

/// Check an identifier against the token grammar.
///
/// Identifiers are matched against the content of `%…%` spans, so they can
/// contain neither the delimiter nor whitespace.
pub fn validate_identifier(identifier: &str) -> Result<(), PlaceholderError> {
    if identifier.is_empty() {
        return Err(PlaceholderError::EmptyIdentifier);
    }
    if identifier
        .chars()
        .any(|c| c == '%' || c.is_whitespace())
    {
        return Err(PlaceholderError::InvalidIdentifier {
            identifier: identifier.to_string(),
        });
    }
    Ok(())
}
