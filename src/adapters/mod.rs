// Adapters layer: concrete implementations for external systems.

pub mod gemini;
pub mod google_ads;
pub mod storage;

use crate::config::AppConfig;
use crate::core::context::PlanContext;
use crate::core::planner::SemPlanner;
use crate::domain::ports::TextGenerator;
use crate::utils::error::Result;
use std::sync::Arc;

/// Wires the configured collaborators into a planner.
pub fn build_planner(config: &AppConfig) -> Result<SemPlanner> {
    let ideas = Arc::new(google_ads::GoogleAdsKeywordSource::new(&config.keyword_planner)?);

    let generator: Option<Arc<dyn TextGenerator>> = match &config.text_generation {
        Some(text) if text.has_api_key() => {
            tracing::info!("🧠 Text generation enabled ({})", text.model());
            Some(Arc::new(gemini::GeminiClient::new(text)?))
        }
        _ => {
            tracing::info!("Text generation not configured, themes will use fallback rules");
            None
        }
    };

    let context: PlanContext = config.plan_context();
    Ok(SemPlanner::new(ideas, generator, context))
}
