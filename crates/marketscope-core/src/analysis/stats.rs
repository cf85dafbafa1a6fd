//! Aggregate statistics over a set of product analyses.

use serde::Serialize;

use super::model::ProductAnalysis;

/// The product holding the maximum of some metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leader {
    pub name: String,
    pub value: f64,
}

/// Statistics shared by the summary text, the report and API overviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketStats {
    pub product_count: usize,
    pub mean_growth: f64,
    pub mean_satisfaction: f64,
    pub mean_price: f64,
    pub total_market_share: f64,
    pub share_leader: Option<Leader>,
    pub satisfaction_leader: Option<Leader>,
    pub growth_leader: Option<Leader>,
}

impl MarketStats {
    pub fn from_products(products: &[ProductAnalysis]) -> Self {
        Self {
            product_count: products.len(),
            mean_growth: mean(products.iter().map(|p| p.growth)),
            mean_satisfaction: mean(products.iter().map(|p| p.satisfaction)),
            mean_price: mean(products.iter().map(|p| p.price)),
            total_market_share: products.iter().map(|p| p.market_share).sum(),
            share_leader: leader(products, |p| p.market_share),
            satisfaction_leader: leader(products, |p| p.satisfaction),
            growth_leader: leader(products, |p| p.growth),
        }
    }
}

/// Arithmetic mean, 0 for an empty input.
pub fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Product with the largest `key`. The first product wins ties.
fn leader(products: &[ProductAnalysis], key: impl Fn(&ProductAnalysis) -> f64) -> Option<Leader> {
    let mut best: Option<&ProductAnalysis> = None;
    for product in products {
        match best {
            Some(current) if key(product) <= key(current) => {}
            _ => best = Some(product),
        }
    }
    best.map(|p| Leader {
        name: p.name.clone(),
        value: key(p),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, share: f64, satisfaction: f64, growth: f64) -> ProductAnalysis {
        ProductAnalysis {
            name: name.to_string(),
            market_share: share,
            price: 100.0,
            satisfaction,
            growth,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            opportunities: Vec::new(),
            threats: Vec::new(),
            positioning: String::new(),
            target_audience: String::new(),
        }
    }

    #[test]
    fn test_means_and_leaders() {
        let products = vec![
            product("A", 10.0, 4.0, -5.0),
            product("B", 30.0, 3.0, 20.0),
            product("C", 20.0, 4.5, 5.0),
        ];
        let stats = MarketStats::from_products(&products);

        assert_eq!(stats.product_count, 3);
        assert!((stats.mean_growth - 20.0 / 3.0).abs() < 1e-9);
        assert!((stats.mean_satisfaction - 11.5 / 3.0).abs() < 1e-9);
        assert!((stats.total_market_share - 60.0).abs() < 1e-9);
        assert_eq!(stats.share_leader.unwrap().name, "B");
        assert_eq!(stats.satisfaction_leader.unwrap().name, "C");
        assert_eq!(stats.growth_leader.unwrap().name, "B");
    }

    #[test]
    fn test_first_wins_ties() {
        let products = vec![product("A", 15.0, 4.0, 1.0), product("B", 15.0, 4.0, 1.0)];
        let stats = MarketStats::from_products(&products);
        assert_eq!(stats.share_leader.unwrap().name, "A");
    }

    #[test]
    fn test_empty() {
        let stats = MarketStats::from_products(&[]);
        assert_eq!(stats.mean_growth, 0.0);
        assert!(stats.share_leader.is_none());
    }
}
