use crate::core::llm_json::{parse_llm_json, ParsedResponse};
use crate::domain::model::{word_count, PmaxCategory, PmaxTheme, PmaxThemes};
use crate::domain::ports::TextGenerator;
use serde_json::Value;
use std::collections::HashSet;

/// Checked top to bottom; the first category with a token contained in the theme name wins.
const THEME_RULES: &[(PmaxCategory, &[&str])] = &[
    (
        PmaxCategory::Product,
        &["product", "protein", "whey", "vegan", "organic"],
    ),
    (PmaxCategory::Usecase, &["use", "recovery", "weight"]),
    (
        PmaxCategory::Demographic,
        &["city", "india", "delhi", "mumbai", "location"],
    ),
    (
        PmaxCategory::Seasonal,
        &["season", "summer", "winter", "holiday", "fest", "diwali", "xmas"],
    ),
];

pub const MAX_THEMES: usize = 6;

pub fn classify_theme_name(name: &str) -> PmaxCategory {
    let name = name.to_lowercase();
    THEME_RULES
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|token| name.contains(token)))
        .map(|(category, _)| *category)
        .unwrap_or(PmaxCategory::Product)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// Built from the text generator's answer.
    Generated,
    /// Deterministic grouping, no generator or the call failed.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedThemes {
    pub themes: PmaxThemes,
    pub source: ThemeSource,
}

pub fn build_theme_prompt(keywords: &[String], locations: &[String]) -> String {
    let keyword_json = serde_json::to_string(keywords).unwrap_or_else(|_| "[]".to_string());
    let location_json = serde_json::to_string(locations).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a Google Ads strategist. Group the following keywords into up to {max} Performance Max campaign themes.
Identify themes such as product types, use cases, demographics (locations) and seasonal trends.
For each theme, provide a name, a list of relevant keywords, and an estimated total monthly search volume (sum of individual keyword volumes).
Name the themes so they fall under "product", "usecase", "demographic" or "seasonal". If a group would be empty, fill it with relevant keywords.
Produce JSON ONLY in this format:

{{
  "themes": [
    {{
      "name": "Theme Name",
      "keywords": ["kw1", "kw2"],
      "total_volume": 12345
    }}
  ]
}}

Keywords:
{keywords}

Target locations:
{locations}

Also include seasonal groups if any, and list location-based themes if relevant."#,
        max = MAX_THEMES,
        keywords = keyword_json,
        locations = location_json,
    )
}

pub fn fallback_themes(keywords: &[String], locations: &[String]) -> PmaxThemes {
    PmaxThemes {
        product: PmaxTheme::new(keywords.to_vec()),
        usecase: PmaxTheme::new(
            keywords
                .iter()
                .filter(|kw| word_count(kw) >= 3)
                .cloned()
                .collect(),
        ),
        demographic: PmaxTheme::new(locations.to_vec()),
        seasonal: PmaxTheme::new(
            locations
                .iter()
                .map(|loc| format!("{} seasonal trends", loc))
                .collect(),
        ),
    }
}

/// Folds the generator's named themes into the four canonical buckets.
pub fn reclassify_themes(parsed: &Value, keywords: &[String], locations: &[String]) -> PmaxThemes {
    let mut product = Vec::new();
    let mut usecase = Vec::new();
    let mut demographic = Vec::new();
    let mut seasonal = Vec::new();

    let themes = parsed
        .get("themes")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for theme in themes {
        let name = theme.get("name").and_then(Value::as_str).unwrap_or_default();
        let theme_keywords = theme
            .get("keywords")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let bucket = match classify_theme_name(name) {
            PmaxCategory::Product => &mut product,
            PmaxCategory::Usecase => &mut usecase,
            PmaxCategory::Demographic => &mut demographic,
            PmaxCategory::Seasonal => &mut seasonal,
        };
        bucket.extend(theme_keywords);
    }

    let product = dedup_preserving_order(product);
    let demographic = dedup_preserving_order(demographic);

    PmaxThemes {
        product: PmaxTheme::new(if product.is_empty() {
            dedup_preserving_order(keywords.to_vec())
        } else {
            product
        }),
        usecase: PmaxTheme::new(dedup_preserving_order(usecase)),
        demographic: PmaxTheme::new(if demographic.is_empty() {
            locations.to_vec()
        } else {
            demographic
        }),
        seasonal: PmaxTheme::new(dedup_preserving_order(seasonal)),
    }
}

pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

pub struct ThemeSynthesizer<'a> {
    generator: Option<&'a dyn TextGenerator>,
}

impl<'a> ThemeSynthesizer<'a> {
    pub fn new(generator: Option<&'a dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn synthesize(&self, keywords: &[String], locations: &[String]) -> SynthesizedThemes {
        let Some(generator) = self.generator else {
            tracing::info!("No text generator configured, using fallback themes");
            return SynthesizedThemes {
                themes: fallback_themes(keywords, locations),
                source: ThemeSource::Fallback,
            };
        };

        let prompt = build_theme_prompt(keywords, locations);
        let response = match generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("⚠️ Theme generation failed, using fallback themes: {}", e);
                return SynthesizedThemes {
                    themes: fallback_themes(keywords, locations),
                    source: ThemeSource::Fallback,
                };
            }
        };

        let parsed = parse_llm_json(&response);
        match &parsed {
            ParsedResponse::Direct(_) => tracing::debug!("Theme response parsed as JSON"),
            ParsedResponse::Recovered(_) => {
                tracing::debug!("Theme response JSON recovered from surrounding text")
            }
            ParsedResponse::Empty | ParsedResponse::Unparseable => tracing::warn!(
                "⚠️ Theme response had no usable JSON ({} chars), continuing with zero themes",
                response.len()
            ),
        }

        SynthesizedThemes {
            themes: reclassify_themes(&parsed.into_value(), keywords, locations),
            source: ThemeSource::Generated,
        }
    }
}
