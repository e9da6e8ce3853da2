use crate::core::normalizer::FilteredKeywords;
use crate::domain::model::{BidSuggestion, PmaxThemes, SearchAdGroups, SemInputs, SemPlan};

pub struct PlanParts {
    pub filtered: FilteredKeywords,
    pub locations: Vec<String>,
    pub search_ad_groups: SearchAdGroups,
    pub pmax_themes: PmaxThemes,
    pub shopping_cpc: Vec<BidSuggestion>,
}

pub fn assemble_plan(inputs: &SemInputs, parts: PlanParts) -> SemPlan {
    let total_keywords = parts.filtered.keywords.len();
    let total_volume = parts.filtered.total_volume();

    SemPlan {
        brand: inputs.brand_website.clone(),
        competitor: inputs.competitor_website.clone(),
        locations: parts.locations,
        budget_allocations: inputs.budget_allocations,
        total_budget: inputs.budget_allocations.total(),
        total_keywords,
        total_volume,
        avg_cpc: parts.filtered.avg_cpc,
        themes: inputs.seed_themes(),
        search_ad_groups: parts.search_ad_groups,
        pmax_themes: parts.pmax_themes,
        shopping_cpc: parts.shopping_cpc,
    }
}
