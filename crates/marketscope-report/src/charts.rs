//! Chart rendering.
//!
//! Each chart is drawn independently into an in-memory SVG document. A chart
//! that cannot be drawn is reported as [`ChartOutcome::Failed`] and never
//! prevents the others.

use base64::Engine;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use marketscope_core::{MarketAnalysisResult, ProductAnalysis};

use crate::error::ChartError;

/// Slice and point colours, cycled per product.
pub const PALETTE: [RGBColor; 6] = [
    RGBColor(0x4f, 0x46, 0xe5),
    RGBColor(0x7c, 0x3a, 0xed),
    RGBColor(0xec, 0x48, 0x99),
    RGBColor(0xf5, 0x9e, 0x0b),
    RGBColor(0x10, 0xb9, 0x81),
    RGBColor(0x06, 0xb6, 0xd4),
];

const POSITIVE: RGBColor = RGBColor(0x10, 0xb9, 0x81);
const NEGATIVE: RGBColor = RGBColor(0xef, 0x44, 0x44);
const REFERENCE: RGBColor = RGBColor(0x3b, 0x82, 0xf6);
const WARNING: RGBColor = RGBColor(0xf5, 0x9e, 0x0b);

const SIZE: (u32, u32) = (900, 620);
const FONT: &str = "sans-serif";

/// Point radius per market-share percentage point.
const RADIUS_PER_SHARE: f64 = 1.5;
const MIN_RADIUS: f64 = 4.0;

/// The three charts of a report, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    MarketShare,
    PriceSatisfaction,
    Growth,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [Self::MarketShare, Self::PriceSatisfaction, Self::Growth];

    /// Caption printed above the chart.
    pub fn caption(&self) -> &'static str {
        match self {
            Self::MarketShare => "Market Share",
            Self::PriceSatisfaction => "Price / Satisfaction Positioning",
            Self::Growth => "Annual Growth Rates",
        }
    }
}

/// A rendered chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    svg: String,
}

impl ChartImage {
    pub const MIME: &'static str = "image/svg+xml";

    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Base64 `data:` URI for embedding.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            Self::MIME,
            base64::engine::general_purpose::STANDARD.encode(self.svg.as_bytes())
        )
    }
}

/// Result of rendering one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutcome {
    Rendered(ChartImage),
    Failed(ChartError),
}

impl ChartOutcome {
    pub fn image(&self) -> Option<&ChartImage> {
        match self {
            Self::Rendered(image) => Some(image),
            Self::Failed(_) => None,
        }
    }
}

/// Every chart of one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSet {
    pub market_share: ChartOutcome,
    pub scatter: ChartOutcome,
    pub growth: ChartOutcome,
}

impl ChartSet {
    pub fn get(&self, kind: ChartKind) -> &ChartOutcome {
        match kind {
            ChartKind::MarketShare => &self.market_share,
            ChartKind::PriceSatisfaction => &self.scatter,
            ChartKind::Growth => &self.growth,
        }
    }

    /// Charts in document order.
    pub fn entries(&self) -> impl Iterator<Item = (ChartKind, &ChartOutcome)> {
        ChartKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    pub fn rendered_count(&self) -> usize {
        self.entries().filter(|(_, c)| c.image().is_some()).count()
    }
}

/// Render the three charts for a result.
pub fn render(result: &MarketAnalysisResult) -> ChartSet {
    let products = &result.products;
    ChartSet {
        market_share: outcome(ChartKind::MarketShare, market_share(products)),
        scatter: outcome(ChartKind::PriceSatisfaction, price_satisfaction(products)),
        growth: outcome(ChartKind::Growth, growth(products)),
    }
}

fn outcome(kind: ChartKind, rendered: Result<String, ChartError>) -> ChartOutcome {
    match rendered {
        Ok(svg) => {
            debug!(chart = ?kind, bytes = svg.len(), "Chart rendered");
            ChartOutcome::Rendered(ChartImage { svg })
        }
        Err(e) => {
            warn!(chart = ?kind, error = %e, "Chart skipped");
            ChartOutcome::Failed(e)
        }
    }
}

fn drawing(err: anyhow::Error) -> ChartError {
    ChartError::Drawing(err.to_string())
}

fn color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Pie chart, one slice per product.
pub fn market_share(products: &[ProductAnalysis]) -> Result<String, ChartError> {
    let total: f64 = products.iter().map(|p| p.market_share).sum();
    if products.is_empty() || total <= 0.0 {
        return Err(ChartError::NoData);
    }
    draw_market_share(products).map_err(drawing)
}

fn draw_market_share(products: &[ProductAnalysis]) -> anyhow::Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled("Market share distribution", (FONT, 28))?;

        let (width, height) = area.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = f64::from(width.min(height)) * 0.36;

        let sizes: Vec<f64> = products.iter().map(|p| p.market_share).collect();
        let colors: Vec<RGBColor> = (0..products.len()).map(color).collect();
        let labels: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style((FONT, 16).into_font().color(&BLACK));
        pie.percentages((FONT, 14).into_font().color(&WHITE));
        area.draw(&pie)?;

        root.present()?;
    }
    Ok(svg)
}

/// Scatter of price against satisfaction, point size following market share.
pub fn price_satisfaction(products: &[ProductAnalysis]) -> Result<String, ChartError> {
    if products.is_empty() {
        return Err(ChartError::NoData);
    }
    draw_price_satisfaction(products).map_err(drawing)
}

fn draw_price_satisfaction(products: &[ProductAnalysis]) -> anyhow::Result<String> {
    let count = products.len() as f64;
    let mean_price = products.iter().map(|p| p.price).sum::<f64>() / count;
    let mean_satisfaction = products.iter().map(|p| p.satisfaction).sum::<f64>() / count;

    let max_price = products.iter().map(|p| p.price).fold(0.0, f64::max);
    let x_max = if max_price > 0.0 { max_price * 1.2 } else { 1.0 };
    let y_min = products.iter().map(|p| p.satisfaction).fold(5.0, f64::min);
    let y_max = products.iter().map(|p| p.satisfaction).fold(0.0, f64::max);
    let (y_min, y_max) = ((y_min - 0.5).max(0.0), (y_max + 0.5).min(5.5));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Price / satisfaction positioning", (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)?;
        chart
            .configure_mesh()
            .x_desc("Price")
            .y_desc("Customer satisfaction (/5)")
            .draw()?;

        chart.draw_series(products.iter().enumerate().map(|(i, p)| {
            let radius = (p.market_share * RADIUS_PER_SHARE).max(MIN_RADIUS).round() as u32;
            EmptyElement::at((p.price, p.satisfaction))
                + Circle::new((0, 0), radius, color(i).mix(0.6).filled())
                + Text::new(p.name.clone(), (radius as i32 + 4, -8), (FONT, 14).into_font())
        }))?;

        chart
            .draw_series(LineSeries::new(
                vec![(0.0, mean_satisfaction), (x_max, mean_satisfaction)],
                REFERENCE.stroke_width(2),
            ))?
            .label(format!("Mean satisfaction ({:.1})", mean_satisfaction))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &REFERENCE));

        chart
            .draw_series(LineSeries::new(
                vec![(mean_price, y_min), (mean_price, y_max)],
                WARNING.stroke_width(2),
            ))?
            .label(format!("Mean price ({:.0})", mean_price))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &WARNING));

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
    }
    Ok(svg)
}

/// Horizontal growth bars, green when positive and red otherwise.
pub fn growth(products: &[ProductAnalysis]) -> Result<String, ChartError> {
    if products.is_empty() {
        return Err(ChartError::NoData);
    }
    draw_growth(products).map_err(drawing)
}

fn draw_growth(products: &[ProductAnalysis]) -> anyhow::Result<String> {
    let low = products.iter().map(|p| p.growth).fold(0.0, f64::min);
    let high = products.iter().map(|p| p.growth).fold(0.0, f64::max);
    let pad = ((high - low) * 0.15).max(5.0);
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    let last = products.len() as i32 - 1;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Annual growth by product", (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(160)
            .build_cartesian_2d((low - pad)..(high + pad), (0..last).into_segmented())?;

        let label = |v: &SegmentValue<i32>| match v {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                names.get(*i as usize).map(|n| n.to_string()).unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        };
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(products.len())
            .y_label_formatter(&label)
            .x_label_formatter(&|x| format!("{:+.0}%", x))
            .x_desc("Annual growth (%)")
            .draw()?;

        chart.draw_series(products.iter().enumerate().map(|(i, p)| {
            let i = i as i32;
            let fill = if p.growth > 0.0 { POSITIVE } else { NEGATIVE };
            let mut bar = Rectangle::new(
                [(0.0, SegmentValue::Exact(i)), (p.growth, SegmentValue::Exact(i + 1))],
                fill.filled(),
            );
            bar.set_margin(8, 8, 0, 0);
            bar
        }))?;

        chart.draw_series(LineSeries::new(
            vec![(0.0, SegmentValue::Exact(0)), (0.0, SegmentValue::Last)],
            BLACK.stroke_width(2),
        ))?;

        chart.draw_series(products.iter().enumerate().map(|(i, p)| {
            let offset = if p.growth > 0.0 { pad * 0.1 } else { -pad * 0.6 };
            Text::new(
                format!("{:+.1}%", p.growth),
                (p.growth + offset, SegmentValue::CenterOf(i as i32)),
                (FONT, 14).into_font(),
            )
        }))?;

        root.present()?;
    }
    Ok(svg)
}
