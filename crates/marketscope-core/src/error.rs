//! Centralized error types for Marketscope.

use thiserror::Error;

/// Rejections of an analysis request, reported before any synthesis starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("At least {min} products are required, got {count}")]
    TooFewProducts { min: usize, count: usize },

    #[error("At most {max} products are allowed, got {count}")]
    TooManyProducts { max: usize, count: usize },

    #[error("Products must be unique: '{0}' appears more than once")]
    DuplicateProduct(String),

    #[error("Product name '{name}' exceeds {max} characters")]
    ProductNameTooLong { name: String, max: usize },

    #[error("Sector cannot be empty")]
    EmptySector,

    #[error("Sector exceeds {max} characters")]
    SectorTooLong { max: usize },
}

/// A value that breaks the data model's declared bounds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Product name is empty")]
    EmptyName,

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} has {len} items, expected between {min} and {max}")]
    ListSize {
        field: &'static str,
        len: usize,
        min: usize,
        max: usize,
    },

    #[error("{field} contains '{item}' more than once")]
    DuplicateItem { field: &'static str, item: String },

    #[error("{field} has {len} characters, expected between {min} and {max}")]
    TextLength {
        field: &'static str,
        len: usize,
        min: usize,
        max: usize,
    },
}

/// Invalid candidate pool handed to the simulation generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("{pool} pool needs at least {required} items, has {available}")]
    TooSmall {
        pool: &'static str,
        required: usize,
        available: usize,
    },

    #[error("{pool} pool contains '{item}' more than once")]
    DuplicateItem { pool: &'static str, item: String },

    #[error("{pool} pool contains an empty item")]
    EmptyItem { pool: &'static str },
}

/// Failure validating a complete analysis result.
///
/// Request validation and pool construction report `ValidationError` and
/// `PoolError` directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    #[error("Schema error in '{product}': {source}")]
    Schema {
        product: String,
        #[source]
        source: SchemaError,
    },

    #[error("Invalid analysis date '{0}'")]
    InvalidDate(String),

    #[error("Invalid result: {0}")]
    InvalidResult(String),
}

/// Result type for result validation.
pub type MarketResult<T> = Result<T, MarketError>;

impl MarketError {
    /// Attach a product name to a schema violation.
    pub fn schema(product: impl Into<String>, source: SchemaError) -> Self {
        Self::Schema {
            product: product.into(),
            source,
        }
    }

    /// Create an invalid result error.
    pub fn invalid_result(msg: impl Into<String>) -> Self {
        Self::InvalidResult(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_market_error_messages() {
        let err = MarketError::schema("Alpha", SchemaError::EmptyName);
        assert_eq!(err.to_string(), "Schema error in 'Alpha': Product name is empty");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("Product name is empty".to_string())
        );
        assert_eq!(
            MarketError::InvalidDate("05/11/2025".into()).to_string(),
            "Invalid analysis date '05/11/2025'"
        );
        assert_eq!(
            MarketError::invalid_result("sector is empty").to_string(),
            "Invalid result: sector is empty"
        );
    }
}
