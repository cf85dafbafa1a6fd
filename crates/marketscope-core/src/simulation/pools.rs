//! Candidate pools for simulated SWOT items and recommendations.
//!
//! Pools are read-only configuration handed to the generator at
//! construction; the built-in sets are used unless callers inject their own.

use std::collections::HashSet;

use super::draw_range;
use crate::analysis::model::{bounds, SwotCategory};
use crate::error::PoolError;

const STRENGTHS: &[&str] = &[
    "Constant technological innovation",
    "Strong brand recognition",
    "Reliable, high-quality product",
    "Outstanding customer service",
    "Wide distribution network",
    "Recognized technical expertise",
    "Robust supply chain",
    "Significant R&D investment",
];

const WEAKNESSES: &[&str] = &[
    "Premium pricing limits accessibility",
    "Dependence on a few geographic markets",
    "Complex product lineup",
    "High production costs",
    "Long development cycle",
    "Dependence on key suppliers",
    "Limited distribution channels",
];

const OPPORTUNITIES: &[&str] = &[
    "Expansion into emerging markets",
    "Digital transformation of the sector",
    "New customer segments",
    "Strategic partnerships",
    "Disruptive product innovation",
    "Shifting consumer behavior",
    "Market consolidation",
    "Newly available technologies",
];

const THREATS: &[&str] = &[
    "Intensifying competition",
    "Stricter regulation",
    "Changing consumer preferences",
    "Global economic instability",
    "Technological disruption",
    "Pressure on margins",
    "Raw material price volatility",
    "Geopolitical risks",
];

const RECOMMENDATIONS: &[&str] = &[
    "Invest heavily in innovation to sustain the competitive edge",
    "Strengthen presence on digital and e-commerce channels",
    "Actively pursue geographic expansion opportunities",
    "Optimize the cost structure to improve operating profitability",
    "Build strategic partnerships across the ecosystem",
    "Improve the customer experience at every touchpoint",
    "Diversify the product portfolio to spread risk",
    "Accelerate the digital transformation of operations",
];

/// One candidate pool per SWOT category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwotPools {
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    opportunities: Vec<String>,
    threats: Vec<String>,
}

impl SwotPools {
    /// Build pools, checking each holds enough distinct items for the
    /// largest simulated draw of its category.
    pub fn new(
        strengths: Vec<String>,
        weaknesses: Vec<String>,
        opportunities: Vec<String>,
        threats: Vec<String>,
    ) -> Result<Self, PoolError> {
        let pools = Self {
            strengths,
            weaknesses,
            opportunities,
            threats,
        };
        for category in SwotCategory::ALL {
            check_pool(
                category.field(),
                pools.pool(category),
                *draw_range(category).end(),
            )?;
        }
        Ok(pools)
    }

    /// The built-in English pools.
    pub fn builtin() -> Self {
        Self {
            strengths: owned(STRENGTHS),
            weaknesses: owned(WEAKNESSES),
            opportunities: owned(OPPORTUNITIES),
            threats: owned(THREATS),
        }
    }

    pub fn pool(&self, category: SwotCategory) -> &[String] {
        match category {
            SwotCategory::Strengths => &self.strengths,
            SwotCategory::Weaknesses => &self.weaknesses,
            SwotCategory::Opportunities => &self.opportunities,
            SwotCategory::Threats => &self.threats,
        }
    }
}

impl Default for SwotPools {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Candidate strategic recommendations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationPool {
    items: Vec<String>,
}

impl RecommendationPool {
    pub fn new(items: Vec<String>) -> Result<Self, PoolError> {
        check_pool("recommendations", &items, bounds::RECOMMENDATIONS)?;
        Ok(Self { items })
    }

    pub fn builtin() -> Self {
        Self {
            items: owned(RECOMMENDATIONS),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl Default for RecommendationPool {
    fn default() -> Self {
        Self::builtin()
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn check_pool(pool: &'static str, items: &[String], required: usize) -> Result<(), PoolError> {
    let mut seen = HashSet::new();
    for item in items {
        if item.trim().is_empty() {
            return Err(PoolError::EmptyItem { pool });
        }
        if !seen.insert(item.as_str()) {
            return Err(PoolError::DuplicateItem {
                pool,
                item: item.clone(),
            });
        }
    }
    if items.len() < required {
        return Err(PoolError::TooSmall {
            pool,
            required,
            available: items.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{} {}", prefix, i)).collect()
    }

    #[test]
    fn test_builtin_pools_are_valid() {
        let builtin = SwotPools::builtin();
        let rebuilt = SwotPools::new(
            builtin.strengths.clone(),
            builtin.weaknesses.clone(),
            builtin.opportunities.clone(),
            builtin.threats.clone(),
        );
        assert_eq!(rebuilt, Ok(builtin));
        assert!(RecommendationPool::new(RecommendationPool::builtin().items).is_ok());
    }

    #[test]
    fn test_minimal_pools_accepted() {
        let pools = SwotPools::new(items("S", 5), items("W", 4), items("O", 5), items("T", 4));
        assert!(pools.is_ok());
    }

    #[test]
    fn test_pool_too_small() {
        let err = SwotPools::new(items("S", 4), items("W", 4), items("O", 5), items("T", 4))
            .unwrap_err();
        assert_eq!(
            err,
            PoolError::TooSmall {
                pool: "strengths",
                required: 5,
                available: 4
            }
        );
    }

    #[test]
    fn test_duplicate_and_empty_items() {
        let mut recs = items("R", 6);
        recs.push("R 0".into());
        assert!(matches!(
            RecommendationPool::new(recs),
            Err(PoolError::DuplicateItem { .. })
        ));

        let mut recs = items("R", 6);
        recs.push("  ".into());
        assert_eq!(
            RecommendationPool::new(recs),
            Err(PoolError::EmptyItem { pool: "recommendations" })
        );
    }
}
