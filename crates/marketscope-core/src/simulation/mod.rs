//! Deterministic simulation of market analyses.
//!
//! Every value is drawn from a `ChaCha8Rng` seeded with the XXH64 hash of
//! the product name (or the sector, for recommendations), so the same input
//! always produces the same analysis, across calls, processes and builds.

pub mod pools;

use std::ops::RangeInclusive;
use std::sync::Arc;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

use crate::analysis::model::{
    bounds, truncate_chars, MarketAnalysisResult, ProductAnalysis, SwotCategory,
    ANALYSIS_DATE_FORMAT,
};
use crate::analysis::stats::MarketStats;
use crate::analysis::AnalysisRequest;
use pools::{RecommendationPool, SwotPools};

const MARKET_SHARE: RangeInclusive<f64> = 5.0..=35.0;
const PRICE: RangeInclusive<f64> = 100.0..=2000.0;
const SATISFACTION: RangeInclusive<f64> = 3.0..=4.8;
const GROWTH: RangeInclusive<f64> = -10.0..=40.0;

/// Number of items drawn for a category.
pub(crate) fn draw_range(category: SwotCategory) -> RangeInclusive<usize> {
    match category {
        SwotCategory::Strengths | SwotCategory::Opportunities => 3..=5,
        SwotCategory::Weaknesses | SwotCategory::Threats => 3..=4,
    }
}

/// Seed derived from a text key.
pub fn seed_for(text: &str) -> u64 {
    xxh64(text.as_bytes(), 0)
}

/// Round to 2 decimal places. Values too large to scale are returned as is.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// Produces schema-valid analyses without any external service.
#[derive(Debug, Clone, Default)]
pub struct SimulationGenerator {
    swot: Arc<SwotPools>,
    recommendations: Arc<RecommendationPool>,
}

impl SimulationGenerator {
    pub fn new(swot: Arc<SwotPools>, recommendations: Arc<RecommendationPool>) -> Self {
        Self {
            swot,
            recommendations,
        }
    }

    /// Analysis of one product.
    pub fn generate(&self, product: &str, sector: &str) -> ProductAnalysis {
        let mut rng = ChaCha8Rng::seed_from_u64(seed_for(product));

        let market_share = round2(rng.gen_range(MARKET_SHARE));
        let price = round2(rng.gen_range(PRICE));
        let satisfaction = round2(rng.gen_range(SATISFACTION));
        let growth = round2(rng.gen_range(GROWTH));

        let mut lists = SwotCategory::ALL.map(|category| {
            let count = rng.gen_range(draw_range(category));
            self.swot
                .pool(category)
                .choose_multiple(&mut rng, count)
                .cloned()
                .collect::<Vec<_>>()
        });

        debug!(product, market_share, price, "Simulated product analysis");

        ProductAnalysis {
            name: product.to_string(),
            market_share,
            price,
            satisfaction,
            growth,
            strengths: std::mem::take(&mut lists[0]),
            weaknesses: std::mem::take(&mut lists[1]),
            opportunities: std::mem::take(&mut lists[2]),
            threats: std::mem::take(&mut lists[3]),
            positioning: positioning(product, sector, market_share, price),
            target_audience: target_audience(sector, price, satisfaction),
        }
    }

    /// Full result for a validated request, dated today.
    pub fn generate_result(&self, request: &AnalysisRequest) -> MarketAnalysisResult {
        self.generate_result_on(request, chrono::Local::now().date_naive())
    }

    /// Full result for a validated request with a fixed analysis date.
    pub fn generate_result_on(
        &self,
        request: &AnalysisRequest,
        date: NaiveDate,
    ) -> MarketAnalysisResult {
        let sector = request.sector();
        let products: Vec<ProductAnalysis> = request
            .products()
            .iter()
            .map(|name| self.generate(name, sector))
            .collect();

        MarketAnalysisResult {
            sector: sector.to_string(),
            analysis_date: date.format(ANALYSIS_DATE_FORMAT).to_string(),
            summary: self.summary(&products, sector),
            recommendations: self.recommendations(sector),
            products,
        }
    }

    /// Templated executive summary over the given products.
    pub fn summary(&self, products: &[ProductAnalysis], sector: &str) -> String {
        let stats = MarketStats::from_products(products);

        let dynamic = if stats.mean_growth > 5.0 {
            "positive"
        } else if stats.mean_growth > 0.0 {
            "mixed"
        } else {
            "difficult"
        };
        let perception = if stats.mean_satisfaction > 4.3 {
            "an excellent overall perception"
        } else if stats.mean_satisfaction > 4.0 {
            "a good overall perception"
        } else {
            "a mixed perception"
        };
        let leadership = match &stats.share_leader {
            Some(leader) => format!(
                "{} dominates the market with a {:.1}% share. ",
                leader.name, leader.value
            ),
            None => String::new(),
        };

        format!(
            "The {sector} sector shows a {dynamic} dynamic with an average growth of \
             {growth:.1}%. {leadership}Average customer satisfaction stands at \
             {satisfaction:.1}/5, reflecting {perception}. The {count} products analysed \
             represent {share:.1}% of the total market, indicating a significant \
             concentration. The analysis reveals substantial opportunities in digital \
             transformation, product innovation and geographic expansion.",
            growth = stats.mean_growth,
            satisfaction = stats.mean_satisfaction,
            count = stats.product_count,
            share = stats.total_market_share,
        )
    }

    /// Six distinct recommendations, fixed for a given sector.
    pub fn recommendations(&self, sector: &str) -> Vec<String> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed_for(sector));
        self.recommendations
            .items()
            .choose_multiple(&mut rng, bounds::RECOMMENDATIONS)
            .cloned()
            .collect()
    }
}

fn positioning(product: &str, sector: &str, market_share: f64, price: f64) -> String {
    let position = if market_share > 25.0 {
        "Undisputed leader"
    } else if market_share > 15.0 {
        "Major player"
    } else {
        "Strategic challenger"
    };
    let segment = if price > 1000.0 {
        "ultra-premium"
    } else if price > 500.0 {
        "premium"
    } else {
        "accessible premium"
    };

    let text = format!(
        "{position} in the {segment} segment of the {sector} sector, {product} stands out \
         through a differentiation strategy focused on innovation and quality."
    );
    truncate_chars(&text, *bounds::TEXT_CHARS.end())
}

fn target_audience(sector: &str, price: f64, satisfaction: f64) -> String {
    let audience = if price > 1000.0 {
        "high-end customers and business decision makers"
    } else if price > 500.0 {
        "demanding professionals and individuals"
    } else {
        "informed mainstream buyers and early adopters"
    };
    let loyalty = if satisfaction > 4.2 { "highly loyal" } else { "loyal" };

    let text = format!(
        "Mainly targets {audience} in the {sector} sector, with a {loyalty} base and high \
         expectations for quality and innovation."
    );
    truncate_chars(&text, *bounds::TEXT_CHARS.end())
}
