//! Turning free-form backend output into schema values.
//!
//! Out-of-range numbers are clamped into their declared range and accepted.
//! Malformed payloads (no JSON object, non-numeric values, missing SWOT
//! lists) are rejected so the caller can fall back.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use serde_json::{Map, Value};
use tracing::debug;

use marketscope_core::analysis::model::{bounds, truncate_chars};
use marketscope_core::simulation::round2;
use marketscope_core::{ProductAnalysis, SwotCategory};

use crate::error::ResponseError;

const DEFAULT_MARKET_SHARE: f64 = 20.0;
const DEFAULT_PRICE: f64 = 500.0;
const DEFAULT_SATISFACTION: f64 = 4.0;
const DEFAULT_GROWTH: f64 = 10.0;

/// Words kept from a backend summary.
pub const SUMMARY_MAX_WORDS: usize = 250;

/// Substring from the first `{` to the last `}`.
pub fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the JSON object embedded in `text`.
pub fn parse_object(text: &str) -> Result<Map<String, Value>, ResponseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ResponseError::Empty);
    }
    let span = json_span(text).ok_or(ResponseError::NoJson)?;

    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ResponseError::NoJson),
        Err(e) => Err(ResponseError::Json(e.to_string())),
    }
}

/// Build a product analysis from backend output.
///
/// `product` always names the result; the backend cannot rename it.
pub fn coerce_product(
    text: &str,
    product: &str,
    sector: &str,
) -> Result<ProductAnalysis, ResponseError> {
    let obj = parse_object(text)?;

    let market_share = number(&obj, "market_share", DEFAULT_MARKET_SHARE, bounds::MARKET_SHARE)?;
    let price = number(&obj, "price", DEFAULT_PRICE, bounds::PRICE)?;
    let satisfaction = number(&obj, "satisfaction", DEFAULT_SATISFACTION, bounds::SATISFACTION)?;
    let growth = number(&obj, "growth", DEFAULT_GROWTH, bounds::GROWTH)?;

    Ok(ProductAnalysis {
        name: product.to_string(),
        market_share,
        price,
        satisfaction,
        growth,
        strengths: list(&obj, SwotCategory::Strengths)?,
        weaknesses: list(&obj, SwotCategory::Weaknesses)?,
        opportunities: list(&obj, SwotCategory::Opportunities)?,
        threats: list(&obj, SwotCategory::Threats)?,
        positioning: text_field(&obj, "positioning", || {
            format!("Player in the {} segment", sector)
        }),
        target_audience: text_field(&obj, "target_audience", || {
            format!("Target audience of the {} sector", sector)
        }),
    })
}

fn number(
    obj: &Map<String, Value>,
    field: &'static str,
    default: f64,
    range: RangeInclusive<f64>,
) -> Result<f64, ResponseError> {
    let value = match obj.get(field) {
        None | Some(Value::Null) => return Ok(default),
        Some(value) => value,
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim_end().parse::<f64>().ok(),
        _ => None,
    };
    let parsed = parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| ResponseError::NotNumeric {
            field,
            value: value.to_string(),
        })?;

    let clamped = parsed.clamp(*range.start(), *range.end());
    if clamped != parsed {
        debug!(field, value = parsed, clamped, "Clamped out-of-range value");
    }
    Ok(round2(clamped))
}

fn list(obj: &Map<String, Value>, category: SwotCategory) -> Result<Vec<String>, ResponseError> {
    let field = category.field();
    let items = obj
        .get(field)
        .and_then(Value::as_array)
        .ok_or(ResponseError::MissingField(field))?;

    let mut items = distinct_strings(items);
    items.truncate(*category.len_bounds().end());

    if items.is_empty() {
        return Err(ResponseError::MissingField(field));
    }
    Ok(items)
}

fn text_field(obj: &Map<String, Value>, field: &str, default: impl FnOnce() -> String) -> String {
    match obj.get(field).and_then(Value::as_str).map(str::trim) {
        Some(text) if text.chars().count() >= *bounds::TEXT_CHARS.start() => {
            truncate_chars(text, *bounds::TEXT_CHARS.end())
        }
        _ => truncate_chars(&default(), *bounds::TEXT_CHARS.end()),
    }
}

/// Trimmed, non-blank string entries in order of first appearance.
fn distinct_strings(items: &[Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty() && seen.insert(s.to_string()))
        .map(str::to_string)
        .collect()
}

/// Normalize a backend summary into one plain paragraph.
///
/// Returns an empty string when nothing usable remains.
pub fn clean_summary(raw: &str) -> String {
    let mut text = raw.replace("```json", "").replace("```", "").trim().to_string();

    if text.starts_with('{') && text.ends_with('}') {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&text) {
            let inner = ["summary", "text"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str));
            if let Some(inner) = inner {
                text = inner.to_string();
            }
        }
    }

    let text = text.replace("**", "").replace("__", "").replace('`', "");
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() > SUMMARY_MAX_WORDS {
        format!("{}...", words[..SUMMARY_MAX_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

/// The first six distinct recommendations in `text`.
pub fn parse_recommendations(text: &str) -> Result<Vec<String>, ResponseError> {
    let obj = parse_object(text)?;
    let items = obj
        .get("recommendations")
        .and_then(Value::as_array)
        .ok_or(ResponseError::MissingField("recommendations"))?;

    let mut items = distinct_strings(items);
    if items.len() < bounds::RECOMMENDATIONS {
        return Err(ResponseError::TooFewRecommendations {
            expected: bounds::RECOMMENDATIONS,
            got: items.len(),
        });
    }
    items.truncate(bounds::RECOMMENDATIONS);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWOT: &str = r#""strengths": ["Brand", "Quality", "Support"],
        "weaknesses": ["Price", "Reach"],
        "opportunities": ["Export", "Online", "Partners"],
        "threats": ["Rivals", "Rules"]"#;

    fn payload(numbers: &str) -> String {
        format!("{{{}, {}}}", numbers, SWOT)
    }

    #[test]
    fn test_json_span() {
        assert_eq!(
            json_span("Here you go: {\"a\": {\"b\": 1}} thanks"),
            Some("{\"a\": {\"b\": 1}}")
        );
        assert_eq!(json_span("no json"), None);
        assert_eq!(json_span("} backwards {"), None);
    }

    #[test]
    fn test_span_extracted_and_price_clamped() {
        let text = format!(
            "Here you go: {} thanks",
            payload(r#""market_share": 40, "price": -5, "satisfaction": 4.2, "growth": 12"#)
        );
        let p = coerce_product(&text, "Alpha", "Test").unwrap();
        assert_eq!(p.name, "Alpha");
        assert_eq!(p.market_share, 40.0);
        assert_eq!(p.price, 0.0);
        assert_eq!(p.satisfaction, 4.2);
        assert_eq!(p.growth, 12.0);
        assert_eq!(p.validate_lenient(), Ok(()));
    }

    #[test]
    fn test_clamps_every_range() {
        let text =
            payload(r#""market_share": 140, "price": 10, "satisfaction": 7, "growth": -300"#);
        let p = coerce_product(&text, "Alpha", "Test").unwrap();
        assert_eq!(p.market_share, 100.0);
        assert_eq!(p.satisfaction, 5.0);
        assert_eq!(p.growth, -100.0);
    }

    #[test]
    fn test_absent_numbers_use_defaults() {
        let p = coerce_product(&format!("{{{}}}", SWOT), "Alpha", "Test").unwrap();
        assert_eq!(p.market_share, 20.0);
        assert_eq!(p.price, 500.0);
        assert_eq!(p.satisfaction, 4.0);
        assert_eq!(p.growth, 10.0);
        assert_eq!(p.positioning, "Player in the Test segment");
        assert_eq!(p.target_audience, "Target audience of the Test sector");
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let text = payload(r#""market_share": "22.5%", "price": " 899.991 ""#);
        let p = coerce_product(&text, "Alpha", "Test").unwrap();
        assert_eq!(p.market_share, 22.5);
        assert_eq!(p.price, 899.99);
    }

    #[test]
    fn test_non_numeric_rejected() {
        let text = payload(r#""market_share": "about twenty""#);
        assert!(matches!(
            coerce_product(&text, "Alpha", "Test"),
            Err(ResponseError::NotNumeric { field: "market_share", .. })
        ));
        let text = payload(r#""price": [1, 2]"#);
        assert!(coerce_product(&text, "Alpha", "Test").is_err());
    }

    #[test]
    fn test_missing_swot_rejected() {
        let text = r#"{"market_share": 10, "strengths": ["A"], "weaknesses": ["B"],
            "opportunities": ["C"]}"#;
        assert_eq!(
            coerce_product(text, "Alpha", "Test"),
            Err(ResponseError::MissingField("threats"))
        );

        let text = r#"{"strengths": ["", 3, null], "weaknesses": ["B"],
            "opportunities": ["C"], "threats": ["D"]}"#;
        assert_eq!(
            coerce_product(text, "Alpha", "Test"),
            Err(ResponseError::MissingField("strengths"))
        );
    }

    #[test]
    fn test_lists_cleaned_and_truncated() {
        let strengths: Vec<String> = (0..12).map(|i| format!("\"S{}\"", i)).collect();
        let text = format!(
            r#"{{"strengths": [{}], "weaknesses": [" W ", "W", 7, "X"],
                "opportunities": ["O"], "threats": ["T", "T"]}}"#,
            strengths.join(", ")
        );
        let p = coerce_product(&text, "Alpha", "Test").unwrap();
        assert_eq!(p.strengths.len(), 8);
        assert_eq!(p.weaknesses, vec!["W", "X"]);
        assert_eq!(p.opportunities, vec!["O"]);
        assert_eq!(p.threats, vec!["T"]);
        assert_eq!(p.validate_lenient(), Ok(()));
    }

    #[test]
    fn test_text_fields() {
        let long = "p".repeat(600);
        let text = format!(
            r#"{{{}, "positioning": "{}", "target_audience": " short "}}"#,
            SWOT, long
        );
        let p = coerce_product(&text, "Alpha", "Test").unwrap();
        assert_eq!(p.positioning.chars().count(), 500);
        assert_eq!(p.target_audience, "Target audience of the Test sector");
    }

    #[test]
    fn test_unparsable_payloads() {
        assert_eq!(coerce_product("   ", "A", "T"), Err(ResponseError::Empty));
        assert_eq!(coerce_product("I cannot help", "A", "T"), Err(ResponseError::NoJson));
        assert!(matches!(
            coerce_product("{market_share: 10,}", "A", "T"),
            Err(ResponseError::Json(_))
        ));
    }

    #[test]
    fn test_clean_summary() {
        let raw = "```json\n{\"summary\": \"The **Test** sector\\n\\nis   growing.\"}\n```";
        assert_eq!(clean_summary(raw), "The Test sector is growing.");
        assert_eq!(clean_summary("__Plain__ `text`\n here"), "Plain text here");
        assert_eq!(clean_summary("``` ```"), "");

        let long = vec!["word"; 300].join(" ");
        let cleaned = clean_summary(&long);
        assert!(cleaned.ends_with("word..."));
        assert_eq!(cleaned.split_whitespace().count(), 250);
    }

    #[test]
    fn test_parse_recommendations() {
        let text = r#"Sure! {"recommendations": ["A", " B ", "A", "C", "D", "E", "F", "G"]}"#;
        assert_eq!(
            parse_recommendations(text).unwrap(),
            vec!["A", "B", "C", "D", "E", "F"]
        );

        let text = r#"{"recommendations": ["A", "B", "C", "D", "E", "E"]}"#;
        assert_eq!(
            parse_recommendations(text),
            Err(ResponseError::TooFewRecommendations { expected: 6, got: 5 })
        );
        assert_eq!(
            parse_recommendations(r#"{"items": []}"#),
            Err(ResponseError::MissingField("recommendations"))
        );
    }
}
