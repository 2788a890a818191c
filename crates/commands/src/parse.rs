//! Argument splitting for pipe-delimited commands.

use thiserror::Error;

/// Field separator inside a command's arguments.
pub const FIELD_DELIMITER: char = '|';

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Se esperaban {expected} campos separados por `|`")]
pub struct ArityError {
    pub expected: usize,
    pub found: usize,
}

/// Split `remainder` on [`FIELD_DELIMITER`] into trimmed fields.
///
/// Fails when fewer than `expected` fields result. Extra fields are dropped.
/// Blank fields are kept; rejecting them is up to the handler.
pub fn split_fields(remainder: &str, expected: usize) -> Result<Vec<String>, ArityError> {
    let fields: Vec<&str> = remainder.split(FIELD_DELIMITER).map(str::trim).collect();
    if fields.len() < expected {
        return Err(ArityError {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields
        .into_iter()
        .take(expected)
        .map(str::to_owned)
        .collect())
}
