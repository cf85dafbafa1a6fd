//! Market analysis domain models.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::stats::MarketStats;
use crate::error::{MarketError, MarketResult, SchemaError};

/// Textual format of `MarketAnalysisResult::analysis_date`.
pub const ANALYSIS_DATE_FORMAT: &str = "%Y-%m-%d";

/// Declared bounds of the data model.
pub mod bounds {
    use std::ops::RangeInclusive;

    pub const MARKET_SHARE: RangeInclusive<f64> = 0.0..=100.0;
    pub const PRICE: RangeInclusive<f64> = 0.0..=f64::MAX;
    pub const SATISFACTION: RangeInclusive<f64> = 0.0..=5.0;
    pub const GROWTH: RangeInclusive<f64> = -100.0..=1000.0;

    /// Strengths and opportunities.
    pub const MAJOR_LIST: RangeInclusive<usize> = 3..=8;
    /// Weaknesses and threats.
    pub const MINOR_LIST: RangeInclusive<usize> = 2..=7;

    /// Positioning and target audience, in characters.
    pub const TEXT_CHARS: RangeInclusive<usize> = 10..=500;

    pub const NAME_MAX_CHARS: usize = 200;
    pub const PRODUCTS: RangeInclusive<usize> = 2..=10;
    pub const RECOMMENDATIONS: usize = 6;
}

/// The four SWOT categories attached to every product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwotCategory {
    Strengths,
    Weaknesses,
    Opportunities,
    Threats,
}

impl SwotCategory {
    pub const ALL: [SwotCategory; 4] = [
        SwotCategory::Strengths,
        SwotCategory::Weaknesses,
        SwotCategory::Opportunities,
        SwotCategory::Threats,
    ];

    /// Field name used in the JSON schema.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Strengths => "strengths",
            Self::Weaknesses => "weaknesses",
            Self::Opportunities => "opportunities",
            Self::Threats => "threats",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Strengths => "Strengths",
            Self::Weaknesses => "Weaknesses",
            Self::Opportunities => "Opportunities",
            Self::Threats => "Threats",
        }
    }

    /// Allowed number of items for this category.
    pub fn len_bounds(&self) -> RangeInclusive<usize> {
        match self {
            Self::Strengths | Self::Opportunities => bounds::MAJOR_LIST,
            Self::Weaknesses | Self::Threats => bounds::MINOR_LIST,
        }
    }
}

/// One product's analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub name: String,
    pub market_share: f64,
    pub price: f64,
    pub satisfaction: f64,
    pub growth: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
    pub positioning: String,
    pub target_audience: String,
}

impl ProductAnalysis {
    /// Items of one SWOT category.
    pub fn items(&self, category: SwotCategory) -> &[String] {
        match category {
            SwotCategory::Strengths => &self.strengths,
            SwotCategory::Weaknesses => &self.weaknesses,
            SwotCategory::Opportunities => &self.opportunities,
            SwotCategory::Threats => &self.threats,
        }
    }

    /// Check every field against the declared bounds.
    ///
    /// Lists shorter than the schema minimum are reported too; callers that
    /// accept short lists on purpose use [`ProductAnalysis::validate_lenient`].
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.validate_with(true)
    }

    /// Same as [`ProductAnalysis::validate`], but only requires lists to be
    /// non-empty and no longer than the schema maximum.
    pub fn validate_lenient(&self) -> Result<(), SchemaError> {
        self.validate_with(false)
    }

    fn validate_with(&self, strict_lists: bool) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }

        check_range("market_share", self.market_share, bounds::MARKET_SHARE)?;
        check_range("price", self.price, bounds::PRICE)?;
        check_range("satisfaction", self.satisfaction, bounds::SATISFACTION)?;
        check_range("growth", self.growth, bounds::GROWTH)?;

        for category in SwotCategory::ALL {
            let items = self.items(category);
            let allowed = category.len_bounds();
            let min = if strict_lists { *allowed.start() } else { 1 };
            if items.len() < min || items.len() > *allowed.end() {
                return Err(SchemaError::ListSize {
                    field: category.field(),
                    len: items.len(),
                    min,
                    max: *allowed.end(),
                });
            }

            let mut seen = HashSet::new();
            for item in items {
                if !seen.insert(item.as_str()) {
                    return Err(SchemaError::DuplicateItem {
                        field: category.field(),
                        item: item.clone(),
                    });
                }
            }
        }

        check_text("positioning", &self.positioning)?;
        check_text("target_audience", &self.target_audience)?;

        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<(), SchemaError> {
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(SchemaError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

fn check_text(field: &'static str, text: &str) -> Result<(), SchemaError> {
    let len = text.chars().count();
    if bounds::TEXT_CHARS.contains(&len) {
        Ok(())
    } else {
        Err(SchemaError::TextLength {
            field,
            len,
            min: *bounds::TEXT_CHARS.start(),
            max: *bounds::TEXT_CHARS.end(),
        })
    }
}

/// The aggregate market analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysisResult {
    pub sector: String,
    pub analysis_date: String,
    pub products: Vec<ProductAnalysis>,
    pub summary: String,
    pub recommendations: Vec<String>,
}

impl MarketAnalysisResult {
    /// Parse `analysis_date`.
    pub fn date(&self) -> MarketResult<NaiveDate> {
        NaiveDate::parse_from_str(&self.analysis_date, ANALYSIS_DATE_FORMAT)
            .map_err(|_| MarketError::InvalidDate(self.analysis_date.clone()))
    }

    /// Derived statistics over the products.
    pub fn stats(&self) -> MarketStats {
        MarketStats::from_products(&self.products)
    }

    /// Check the aggregate invariants and every product against the strict
    /// schema.
    pub fn validate(&self) -> MarketResult<()> {
        self.validate_with(|p| p.validate())
    }

    /// Check the aggregate invariants, accepting short SWOT lists.
    pub fn validate_lenient(&self) -> MarketResult<()> {
        self.validate_with(|p| p.validate_lenient())
    }

    fn validate_with(
        &self,
        check: impl Fn(&ProductAnalysis) -> Result<(), SchemaError>,
    ) -> MarketResult<()> {
        if self.sector.trim().is_empty() {
            return Err(MarketError::invalid_result("sector is empty"));
        }
        self.date()?;

        if !bounds::PRODUCTS.contains(&self.products.len()) {
            return Err(MarketError::invalid_result(format!(
                "{} products, expected between {} and {}",
                self.products.len(),
                bounds::PRODUCTS.start(),
                bounds::PRODUCTS.end()
            )));
        }

        let mut names = HashSet::new();
        for product in &self.products {
            if !names.insert(product.name.as_str()) {
                return Err(MarketError::invalid_result(format!(
                    "product '{}' appears more than once",
                    product.name
                )));
            }
            check(product).map_err(|e| MarketError::schema(&product.name, e))?;
        }

        let distinct: HashSet<&str> = self.recommendations.iter().map(String::as_str).collect();
        if self.recommendations.len() != bounds::RECOMMENDATIONS
            || distinct.len() != bounds::RECOMMENDATIONS
        {
            return Err(MarketError::invalid_result(format!(
                "expected {} distinct recommendations, got {}",
                bounds::RECOMMENDATIONS,
                distinct.len()
            )));
        }

        Ok(())
    }
}

/// Today's date in the analysis date format.
pub fn today() -> String {
    chrono::Local::now()
        .date_naive()
        .format(ANALYSIS_DATE_FORMAT)
        .to_string()
}

/// Cut `text` to at most `max` characters, on a character boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Headline metrics of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetrics {
    pub name: String,
    pub market_share: f64,
    pub price: f64,
    pub satisfaction: f64,
    pub growth: f64,
}

/// Flat view of a result, returned to API callers next to the report link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOverview {
    pub sector: String,
    pub date: String,
    pub products_count: usize,
    pub products: Vec<ProductMetrics>,
    pub summary: String,
}

impl From<&MarketAnalysisResult> for AnalysisOverview {
    fn from(result: &MarketAnalysisResult) -> Self {
        Self {
            sector: result.sector.clone(),
            date: result.analysis_date.clone(),
            products_count: result.products.len(),
            products: result
                .products
                .iter()
                .map(|p| ProductMetrics {
                    name: p.name.clone(),
                    market_share: p.market_share,
                    price: p.price,
                    satisfaction: p.satisfaction,
                    growth: p.growth,
                })
                .collect(),
            summary: result.summary.clone(),
        }
    }
}
