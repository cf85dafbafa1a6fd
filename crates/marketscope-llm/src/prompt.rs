//! Prompt templates sent to the generation backend.

use marketscope_core::ProductAnalysis;

/// System prompt framing every call.
pub const SYSTEM_PROMPT: &str = "You are a market analysis and business strategy expert with \
    15 years of experience. You provide precise, factual and professional analyses based on real \
    market data. You always answer in English and in the requested format (JSON or plain text, \
    as instructed).";

/// Instruction for one product's structured analysis.
pub fn product_prompt(product: &str, sector: &str) -> String {
    format!(
        r#"Analyse the following product:
- Product: {product}
- Sector: {sector}

Provide a structured analysis as a JSON object with exactly these keys:

{{
    "market_share": <number between 0 and 100, percent>,
    "price": <number >= 0, monetary units>,
    "satisfaction": <number between 0 and 5>,
    "growth": <number between -100 and 1000, percent>,
    "strengths": [<3 to 5 SHORT strengths, 50 characters max each>],
    "weaknesses": [<2 to 4 SHORT weaknesses, 50 characters max each>],
    "opportunities": [<3 to 5 SHORT opportunities, 50 characters max each>],
    "threats": [<2 to 4 SHORT threats, 50 characters max each>],
    "positioning": "<strategic positioning, 100 to 150 characters>",
    "target_audience": "<target audience, 100 to 150 characters>"
}}

Each SWOT item must be short and concise (50 characters max).
Correct example: "Premium pricing limits accessibility"
Be precise and realistic. Answer ONLY with the JSON object, with no text before or after."#
    )
}

/// Instruction for the executive summary.
pub fn summary_prompt(products: &[ProductAnalysis], sector: &str) -> String {
    let lines = products
        .iter()
        .map(|p| {
            format!(
                "- {}: market share {:.1}%, satisfaction {:.1}/5, growth {:+.1}%",
                p.name, p.market_share, p.satisfaction, p.growth
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Write a professional executive summary (150 to 200 words MAXIMUM)
for a market study of the {sector} sector.

Analysed products:
{lines}

The summary must name the market leader and its share, give the average customer
satisfaction, and mention the key trends and opportunities.

Do NOT use JSON or code. Do NOT use markdown (no ```, no **bold**). Do NOT add a title.
Write a single paragraph of plain prose, starting with: "The {sector} sector...""#
    )
}

/// Instruction for the six strategic recommendations.
pub fn recommendations_prompt(products: &[ProductAnalysis], sector: &str) -> String {
    let names = products
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Provide 6 strategic recommendations for the {sector} sector.

Context:
- Products analysed ({count}): {names}

Answer with this JSON format:
{{
    "recommendations": [
        "Recommendation 1 (30 to 60 words)",
        "Recommendation 2 (30 to 60 words)",
        "Recommendation 3 (30 to 60 words)",
        "Recommendation 4 (30 to 60 words)",
        "Recommendation 5 (30 to 60 words)",
        "Recommendation 6 (30 to 60 words)"
    ]
}}

Recommendations must be concrete, actionable and specific to the sector.
Answer ONLY with the JSON."#,
        count = products.len()
    )
}
