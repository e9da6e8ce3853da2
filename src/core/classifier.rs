use crate::domain::model::{word_count, AdGroup, Keyword, MatchType, SearchAdGroups};

/// `https://www.Acme.com/page` -> `acme`. Empty input gives an empty token.
pub fn root_domain(site: &str) -> String {
    let mut rest = site.trim();

    for scheme in ["https://", "http://"] {
        if let Some(stripped) = strip_prefix_ignore_case(rest, scheme) {
            rest = stripped;
            break;
        }
    }

    if let Some(stripped) = strip_prefix_ignore_case(rest, "www.") {
        rest = stripped;
    }

    rest.split('.').next().unwrap_or_default().to_lowercase()
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

/// Match types are keyed on the group name, not on the keyword.
pub fn match_types_for(group_name: &str) -> Vec<MatchType> {
    let name = group_name.to_lowercase();

    if name.contains("brand") || name.contains("competitor") {
        vec![MatchType::Exact, MatchType::Phrase]
    } else if name.contains("category") {
        vec![MatchType::Phrase, MatchType::Exact]
    } else if name.contains("informational") {
        vec![MatchType::Phrase, MatchType::Broad]
    } else if name.contains("location") {
        vec![MatchType::Exact, MatchType::Phrase]
    } else {
        vec![MatchType::Exact]
    }
}

impl AdGroup {
    pub fn match_types(&self) -> Vec<MatchType> {
        match_types_for(self.name())
    }
}

/// Assigns keywords to search ad groups with a fixed rule order.
#[derive(Debug, Clone)]
pub struct AdGroupClassifier {
    brand_token: String,
    competitor_token: String,
    location_tokens: Vec<String>,
}

impl AdGroupClassifier {
    pub fn new(brand_site: &str, competitor_site: Option<&str>, locations: &[String]) -> Self {
        Self {
            brand_token: root_domain(brand_site),
            competitor_token: competitor_site.map(root_domain).unwrap_or_default(),
            location_tokens: locations
                .iter()
                .map(|loc| loc.trim().to_lowercase())
                .filter(|loc| !loc.is_empty())
                .collect(),
        }
    }

    pub fn classify(&self, keyword: &str) -> AdGroup {
        let text = keyword.to_lowercase();

        if !self.brand_token.is_empty() && text.contains(&self.brand_token) {
            AdGroup::BrandAndProduct
        } else if !self.competitor_token.is_empty() && text.contains(&self.competitor_token) {
            AdGroup::Competitor
        } else if self.location_tokens.iter().any(|loc| text.contains(loc.as_str())) {
            AdGroup::LocationBased
        } else if word_count(&text) >= 3 {
            AdGroup::Informational
        } else {
            AdGroup::Category
        }
    }

    /// Every group is present in the result, empty or not.
    pub fn group(&self, keywords: &[Keyword]) -> SearchAdGroups {
        let mut groups: SearchAdGroups = AdGroup::ALL.iter().map(|g| (*g, Vec::new())).collect();

        for keyword in keywords {
            let group = self.classify(&keyword.keyword);
            groups.entry(group).or_default().push(keyword.clone());
        }

        groups
    }
}
