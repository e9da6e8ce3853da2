pub const DEFAULT_MIN_SEARCH_VOLUME: u64 = 500;
pub const DEFAULT_CONVERSION_RATE: f64 = 0.02;

/// Read-only settings shared by every plan request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanContext {
    pub min_search_volume: u64,
    pub conversion_rate: f64,
    pub language_id: String,
    pub geo_target_ids: Vec<String>,
}

impl Default for PlanContext {
    fn default() -> Self {
        Self {
            min_search_volume: DEFAULT_MIN_SEARCH_VOLUME,
            conversion_rate: DEFAULT_CONVERSION_RATE,
            language_id: crate::config::DEFAULT_LANGUAGE_ID.to_string(),
            geo_target_ids: Vec::new(),
        }
    }
}

/// Rounds to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
