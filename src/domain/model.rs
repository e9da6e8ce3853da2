use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A keyword idea as returned by the ideation collaborator, bids already in currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawKeyword {
    pub keyword: String,
    pub search_volume: Option<u64>,
    pub competition: Option<String>,
    pub cpc_range: Option<String>,
    pub top_of_page_bid_low: Option<f64>,
    pub top_of_page_bid_high: Option<f64>,
}

/// A keyword that survived the volume filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub search_volume: Option<u64>,
    pub competition: Option<String>,
    pub cpc_range: Option<String>,
}

impl Keyword {
    pub fn volume(&self) -> u64 {
        self.search_volume.unwrap_or(0)
    }
}

/// Whitespace separated tokens in a keyword.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    /// Search campaigns.
    pub cap: i64,
    /// Performance Max.
    pub bud: i64,
    pub pmax: i64,
}

impl BudgetAllocation {
    pub fn total(&self) -> i64 {
        self.cap.saturating_add(self.bud).saturating_add(self.pmax)
    }
}

/// Request shape of `generate_sem_plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemInputs {
    pub brand_website: String,
    #[serde(default)]
    pub competitor_website: Option<String>,
    pub target_locations: String,
    #[serde(default)]
    pub themes: Option<Vec<String>>,
    pub budget_allocations: BudgetAllocation,
}

impl SemInputs {
    pub fn seed_themes(&self) -> Vec<String> {
        self.themes.clone().unwrap_or_default()
    }

    /// The site used to seed keyword ideas: brand first, competitor when no brand is given.
    pub fn seed_url(&self) -> Option<&str> {
        let brand = self.brand_website.trim();
        if !brand.is_empty() {
            return Some(brand);
        }
        self.competitor_website
            .as_deref()
            .map(str::trim)
            .filter(|site| !site.is_empty())
    }

    /// Comma separated locations, trimmed, blanks dropped.
    pub fn locations(&self) -> Vec<String> {
        self.target_locations
            .split(',')
            .map(str::trim)
            .filter(|loc| !loc.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AdGroup {
    #[serde(rename = "Brand & Product Terms")]
    BrandAndProduct,
    #[serde(rename = "Category Terms")]
    Category,
    #[serde(rename = "Competitor Terms")]
    Competitor,
    #[serde(rename = "Informational Queries")]
    Informational,
    #[serde(rename = "Location-based Queries")]
    LocationBased,
}

impl AdGroup {
    pub const ALL: [AdGroup; 5] = [
        AdGroup::BrandAndProduct,
        AdGroup::Category,
        AdGroup::Competitor,
        AdGroup::Informational,
        AdGroup::LocationBased,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AdGroup::BrandAndProduct => "Brand & Product Terms",
            AdGroup::Category => "Category Terms",
            AdGroup::Competitor => "Competitor Terms",
            AdGroup::Informational => "Informational Queries",
            AdGroup::LocationBased => "Location-based Queries",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MatchType::Exact => "Exact",
            MatchType::Phrase => "Phrase",
            MatchType::Broad => "Broad",
        };
        f.write_str(label)
    }
}

pub type SearchAdGroups = BTreeMap<AdGroup, Vec<Keyword>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PmaxCategory {
    Product,
    Usecase,
    Demographic,
    Seasonal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PmaxTheme {
    pub keywords: Vec<String>,
    pub total_volume: u64,
}

impl PmaxTheme {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            total_volume: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PmaxThemes {
    pub product: PmaxTheme,
    pub usecase: PmaxTheme,
    pub demographic: PmaxTheme,
    pub seasonal: PmaxTheme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidSuggestion {
    pub keyword: String,
    pub search_volume: Option<u64>,
    pub competition: Option<String>,
    pub suggested_cpc: f64,
}

/// The assembled campaign plan, serialized with the public field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemPlan {
    pub brand: String,
    pub competitor: Option<String>,
    pub locations: Vec<String>,
    pub budget_allocations: BudgetAllocation,
    pub total_budget: i64,
    pub total_keywords: usize,
    pub total_volume: u64,
    pub avg_cpc: f64,
    pub themes: Vec<String>,
    #[serde(rename = "searchAdGroups")]
    pub search_ad_groups: SearchAdGroups,
    #[serde(rename = "pmaxThemes")]
    pub pmax_themes: PmaxThemes,
    #[serde(rename = "shoppingCPC")]
    pub shopping_cpc: Vec<BidSuggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(locations: &str) -> SemInputs {
        SemInputs {
            brand_website: "".to_string(),
            competitor_website: Some("https://rival.com".to_string()),
            target_locations: locations.to_string(),
            themes: None,
            budget_allocations: BudgetAllocation {
                cap: 1000,
                bud: 500,
                pmax: 250,
            },
        }
    }

    #[test]
    fn test_locations_are_trimmed_and_blanks_dropped() {
        let inputs = inputs(" Delhi , Mumbai,, ");
        assert_eq!(inputs.locations(), vec!["Delhi", "Mumbai"]);
    }

    #[test]
    fn test_seed_url_falls_back_to_competitor() {
        let inputs = inputs("Delhi");
        assert_eq!(inputs.seed_url(), Some("https://rival.com"));
    }

    #[test]
    fn test_budget_total() {
        assert_eq!(inputs("").budget_allocations.total(), 1750);
    }

    #[test]
    fn test_ad_group_map_serializes_with_display_names() {
        let mut groups = SearchAdGroups::new();
        for group in AdGroup::ALL {
            groups.insert(group, Vec::new());
        }
        let json = serde_json::to_value(&groups).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec![
                "Brand & Product Terms",
                "Category Terms",
                "Competitor Terms",
                "Informational Queries",
                "Location-based Queries"
            ]
        );
    }

    #[test]
    fn test_inputs_accept_missing_optional_fields() {
        let inputs: SemInputs = serde_json::from_value(serde_json::json!({
            "brand_website": "https://acme.com",
            "target_locations": "Delhi",
            "budget_allocations": {"cap": 1, "bud": 2, "pmax": 3}
        }))
        .unwrap();
        assert!(inputs.competitor_website.is_none());
        assert!(inputs.seed_themes().is_empty());
    }
}
