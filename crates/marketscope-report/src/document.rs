//! Report document assembly.
//!
//! The report is a self-contained HTML document paginated for print, with
//! the charts embedded as `data:` URIs. Every section is always present;
//! only the chart entries depend on what rendered.

use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use marketscope_core::{MarketAnalysisResult, MarketStats, ProductAnalysis};

use crate::charts::ChartSet;
use crate::error::ReportResult;

const TEMPLATE_NAME: &str = "report.html";
const TEMPLATE: &str = include_str!("../templates/report.html.tera");

/// Title printed on the cover.
pub const REPORT_TITLE: &str = "Comparative Market Study";

/// An assembled report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    html: String,
}

impl ReportDocument {
    pub const EXTENSION: &'static str = "html";
    pub const CONTENT_TYPE: &'static str = "text/html; charset=utf-8";

    pub(crate) fn new(html: String) -> Self {
        Self { html }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.html.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    title: &'static str,
    version: &'static str,
    sector: &'a str,
    analysis_date: &'a str,
    generated_on: String,
    summary: &'a str,
    stats: StatsView,
    products: Vec<ProductView<'a>>,
    highlights: Vec<Highlight>,
    charts: Vec<ChartView>,
    conclusion: String,
    recommendations: &'a [String],
}

#[derive(Serialize)]
struct StatsView {
    product_count: usize,
    mean_satisfaction: String,
    mean_growth: String,
    total_market_share: String,
}

#[derive(Serialize)]
struct ProductView<'a> {
    name: &'a str,
    market_share: String,
    price: String,
    satisfaction: String,
    growth: String,
    strengths: &'a [String],
    weaknesses: &'a [String],
    opportunities: &'a [String],
    threats: &'a [String],
    positioning: &'a str,
    target_audience: &'a str,
}

#[derive(Serialize)]
struct Highlight {
    label: &'static str,
    text: String,
}

#[derive(Serialize)]
struct ChartView {
    caption: &'static str,
    data_uri: String,
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn signed_percent(value: f64) -> String {
    format!("{:+.1}%", value)
}

fn rating(value: f64) -> String {
    format!("{:.1}/5", value)
}

fn price(value: f64) -> String {
    format!("{:.0}", value)
}

impl<'a> ProductView<'a> {
    fn new(p: &'a ProductAnalysis) -> Self {
        Self {
            name: &p.name,
            market_share: percent(p.market_share),
            price: price(p.price),
            satisfaction: rating(p.satisfaction),
            growth: signed_percent(p.growth),
            strengths: &p.strengths,
            weaknesses: &p.weaknesses,
            opportunities: &p.opportunities,
            threats: &p.threats,
            positioning: &p.positioning,
            target_audience: &p.target_audience,
        }
    }
}

fn highlights(stats: &MarketStats) -> Vec<Highlight> {
    let mut out = Vec::new();
    if let Some(leader) = &stats.share_leader {
        out.push(Highlight {
            label: "Market leader",
            text: format!("{} with a {} share", leader.name, percent(leader.value)),
        });
    }
    if let Some(leader) = &stats.satisfaction_leader {
        out.push(Highlight {
            label: "Best satisfaction",
            text: format!("{} ({})", leader.name, rating(leader.value)),
        });
    }
    if let Some(leader) = &stats.growth_leader {
        out.push(Highlight {
            label: "Strongest growth",
            text: format!("{} ({})", leader.name, signed_percent(leader.value)),
        });
    }
    out
}

fn conclusion(result: &MarketAnalysisResult) -> String {
    format!(
        "This comparative market study of the {} sector reveals complex competitive dynamics and \
         significant strategic opportunities. The detailed analysis of {} products identifies the \
         strengths, weaknesses and relative positioning of each player. These insights provide a \
         solid basis for building targeted marketing and commercial strategies.",
        result.sector,
        result.products.len()
    )
}

/// Renders reports from the built-in template.
pub struct DocumentAssembler {
    tera: Tera,
}

impl DocumentAssembler {
    pub fn new() -> ReportResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Assemble the full report for a result and its charts.
    pub fn assemble(
        &self,
        result: &MarketAnalysisResult,
        charts: &ChartSet,
    ) -> ReportResult<ReportDocument> {
        let stats = result.stats();

        let view = ReportView {
            title: REPORT_TITLE,
            version: env!("CARGO_PKG_VERSION"),
            sector: &result.sector,
            analysis_date: &result.analysis_date,
            generated_on: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
            summary: &result.summary,
            stats: StatsView {
                product_count: stats.product_count,
                mean_satisfaction: format!("{:.2}/5", stats.mean_satisfaction),
                mean_growth: signed_percent(stats.mean_growth),
                total_market_share: percent(stats.total_market_share),
            },
            products: result.products.iter().map(ProductView::new).collect(),
            highlights: highlights(&stats),
            charts: charts
                .entries()
                .filter_map(|(kind, outcome)| {
                    outcome.image().map(|image| ChartView {
                        caption: kind.caption(),
                        data_uri: image.data_uri(),
                    })
                })
                .collect(),
            conclusion: conclusion(result),
            recommendations: &result.recommendations,
        };

        let context = Context::from_serialize(&view)?;
        let html = self.tera.render(TEMPLATE_NAME, &context)?;
        debug!(bytes = html.len(), charts = view.charts.len(), "Report assembled");

        Ok(ReportDocument::new(html))
    }
}

#[cfg(test)]
mod tests {
    use marketscope_core::{AnalysisRequest, SimulationGenerator};

    use super::*;
    use crate::charts::{self, ChartOutcome};
    use crate::error::ChartError;

    fn sample() -> MarketAnalysisResult {
        let request = AnalysisRequest::new(["Alpha", "Beta"], "Test").unwrap();
        SimulationGenerator::default().generate_result(&request)
    }

    fn failed_charts() -> ChartSet {
        ChartSet {
            market_share: ChartOutcome::Failed(ChartError::NoData),
            scatter: ChartOutcome::Failed(ChartError::Drawing("boom".into())),
            growth: ChartOutcome::Failed(ChartError::NoData),
        }
    }

    #[test]
    fn test_sections_in_order() {
        let result = sample();
        let doc = DocumentAssembler::new()
            .unwrap()
            .assemble(&result, &charts::render(&result))
            .unwrap();
        let html = doc.html();

        let markers = [
            REPORT_TITLE,
            "Executive summary",
            "Comparative analysis",
            "Charts",
            "Detailed analysis: Alpha",
            "Detailed analysis: Beta",
            "Conclusion and recommendations",
        ];
        let mut last = 0;
        for marker in markers {
            let pos = html[last..].find(marker).map(|p| p + last);
            assert!(pos.is_some(), "missing section '{}'", marker);
            last = pos.unwrap();
        }

        assert_eq!(html.matches("<section class=\"page").count(), 5 + result.products.len());
        assert_eq!(html.matches("data:image/svg+xml;base64,").count(), 3);
        for recommendation in &result.recommendations {
            assert!(html.contains(recommendation.as_str()));
        }
    }

    #[test]
    fn test_chart_captions_follow_fixed_order() {
        let result = sample();
        let doc = DocumentAssembler::new()
            .unwrap()
            .assemble(&result, &charts::render(&result))
            .unwrap();
        let html = doc.html();
        let share = html.find("<h3>Market Share</h3>").unwrap();
        let scatter = html
            .find("<h3>Price &#x2F; Satisfaction Positioning</h3>")
            .unwrap();
        let growth = html.find("<h3>Annual Growth Rates</h3>").unwrap();
        assert!(share < scatter && scatter < growth);
    }

    #[test]
    fn test_failed_charts_leave_notice() {
        let result = sample();
        let doc = DocumentAssembler::new()
            .unwrap()
            .assemble(&result, &failed_charts())
            .unwrap();
        assert!(doc.html().contains("Charts could not be produced"));
        assert!(!doc.html().contains("data:image"));
        assert!(doc.html().contains("Conclusion and recommendations"));
    }

    #[test]
    fn test_content_is_escaped() {
        let mut result = sample();
        result.products[0].name = "<script>alert(1)</script>".into();
        let doc = DocumentAssembler::new()
            .unwrap()
            .assemble(&result, &failed_charts())
            .unwrap();
        assert!(!doc.html().contains("<script>"));
        assert!(doc.html().contains("&lt;script&gt;"));
    }

    #[test]
    fn test_highlights() {
        let result = sample();
        let items = highlights(&result.stats());
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].label, "Market leader");
    }
}
