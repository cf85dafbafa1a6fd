//! Market analysis requests and results.

pub mod model;
pub mod stats;

use std::collections::HashSet;

use serde::Serialize;

use crate::error::ValidationError;
use model::bounds;

/// A validated analysis request: 2 to 10 unique product names and a sector.
///
/// The only way to build one is [`AnalysisRequest::new`], so every value that
/// reaches the synthesis pipeline has passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    products: Vec<String>,
    sector: String,
}

impl AnalysisRequest {
    /// Validate raw input.
    ///
    /// Entries are trimmed and blank product entries dropped before the
    /// count, uniqueness and length checks.
    pub fn new<I, S>(products: I, sector: &str) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let products: Vec<String> = products
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if products.len() < *bounds::PRODUCTS.start() {
            return Err(ValidationError::TooFewProducts {
                min: *bounds::PRODUCTS.start(),
                count: products.len(),
            });
        }
        if products.len() > *bounds::PRODUCTS.end() {
            return Err(ValidationError::TooManyProducts {
                max: *bounds::PRODUCTS.end(),
                count: products.len(),
            });
        }

        let mut seen = HashSet::new();
        for product in &products {
            if product.chars().count() > bounds::NAME_MAX_CHARS {
                return Err(ValidationError::ProductNameTooLong {
                    name: product.clone(),
                    max: bounds::NAME_MAX_CHARS,
                });
            }
            if !seen.insert(product.as_str()) {
                return Err(ValidationError::DuplicateProduct(product.clone()));
            }
        }

        let sector = sector.trim();
        if sector.is_empty() {
            return Err(ValidationError::EmptySector);
        }
        if sector.chars().count() > bounds::NAME_MAX_CHARS {
            return Err(ValidationError::SectorTooLong {
                max: bounds::NAME_MAX_CHARS,
            });
        }

        Ok(Self {
            products,
            sector: sector.to_string(),
        })
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }
}
