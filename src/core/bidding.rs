use crate::core::context::round2;
use crate::domain::model::{BidSuggestion, Keyword};

/// Spend per projected conversion, spread over the filtered search volume.
pub fn target_cpc(total_budget: i64, total_volume: u64, conversion_rate: f64) -> f64 {
    if total_volume == 0 {
        return 0.0;
    }
    let budget = total_budget.max(0) as f64;
    round2((budget * conversion_rate) / total_volume.max(1) as f64)
}

pub fn suggest_bid(keyword: &Keyword, target_cpc: f64) -> BidSuggestion {
    let suggested_cpc = match keyword.cpc_midpoint() {
        Some(midpoint) => round2(midpoint.min(target_cpc)).max(0.0),
        None => target_cpc,
    };

    BidSuggestion {
        keyword: keyword.keyword.clone(),
        search_volume: keyword.search_volume,
        competition: keyword.competition.clone(),
        suggested_cpc,
    }
}

pub fn allocate_bids(keywords: &[Keyword], target_cpc: f64) -> Vec<BidSuggestion> {
    keywords.iter().map(|kw| suggest_bid(kw, target_cpc)).collect()
}
