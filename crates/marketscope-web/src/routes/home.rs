//! Interactive home page.
//!
//! Rendered per request so the page reflects the server's default mode and
//! whether a generation backend is configured.

use axum::{extract::State, response::Html};
use tera::{Context, Tera};

use marketscope_core::analysis::model::bounds;
use marketscope_llm::SynthesisMode;

use crate::error::ApiError;
use crate::state::AppState;

const TEMPLATE: &str = include_str!("../../templates/index.html.tera");

/// GET / - Serve the analysis form and endpoint overview.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    render(&state).map(Html)
}

fn render(state: &AppState) -> Result<String, ApiError> {
    let mut context = Context::new();
    context.insert("service", "Marketscope");
    context.insert("default_mode", state.default_mode.as_str());
    context.insert("backend_enabled", &state.backend.is_some());
    context.insert(
        "modes",
        &[SynthesisMode::Simulation.as_str(), SynthesisMode::Backend.as_str()],
    );
    context.insert("min_products", bounds::PRODUCTS.start());
    context.insert("max_products", bounds::PRODUCTS.end());
    context.insert("name_max_chars", &bounds::NAME_MAX_CHARS);

    Tera::one_off(TEMPLATE, &context, true)
        .map_err(|e| ApiError::internal("Home page rendering failed", e.to_string()))
}
