use crate::core::context::round2;
use crate::domain::model::{Keyword, RawKeyword};

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredKeywords {
    pub keywords: Vec<Keyword>,
    pub avg_cpc: f64,
}

impl FilteredKeywords {
    pub fn total_volume(&self) -> u64 {
        self.keywords.iter().map(Keyword::volume).sum()
    }

    pub fn texts(&self) -> Vec<String> {
        self.keywords.iter().map(|k| k.keyword.clone()).collect()
    }
}

/// Parses `"$low - $high"` into its midpoint. Anything else yields `None`.
pub fn cpc_midpoint(cpc_range: &str) -> Option<f64> {
    let parts: Vec<&str> = cpc_range.split('-').collect();
    if parts.len() != 2 {
        return None;
    }

    let low = parse_dollar_amount(parts[0])?;
    let high = parse_dollar_amount(parts[1])?;
    Some((low + high) / 2.0)
}

/// Strips `$` and parses. `inf`, `NaN` and friends parse as `f64` but are rejected here,
/// so a range built from them yields no midpoint.
fn parse_dollar_amount(part: &str) -> Option<f64> {
    let value: f64 = part.trim().replace('$', "").parse().ok()?;
    value.is_finite().then_some(value)
}

impl Keyword {
    pub fn cpc_midpoint(&self) -> Option<f64> {
        self.cpc_range.as_deref().and_then(cpc_midpoint)
    }
}

/// Drops ideas below `min_search_volume` (or without volume) and averages the parsable bid ranges.
pub fn filter_keywords(raw: Vec<RawKeyword>, min_search_volume: u64) -> FilteredKeywords {
    let input_count = raw.len();

    let keywords: Vec<Keyword> = raw
        .into_iter()
        .filter(|idea| matches!(idea.search_volume, Some(v) if v > 0 && v >= min_search_volume))
        .map(|idea| Keyword {
            keyword: idea.keyword,
            search_volume: idea.search_volume,
            competition: idea.competition,
            cpc_range: idea.cpc_range,
        })
        .collect();

    let midpoints: Vec<f64> = keywords.iter().filter_map(Keyword::cpc_midpoint).collect();
    let avg_cpc = if midpoints.is_empty() {
        0.0
    } else {
        round2(midpoints.iter().sum::<f64>() / midpoints.len() as f64)
    };

    tracing::debug!(
        "Keyword filter kept {}/{} ideas ({} with bid ranges), avg CPC {:.2}",
        keywords.len(),
        input_count,
        midpoints.len(),
        avg_cpc
    );

    FilteredKeywords { keywords, avg_cpc }
}
