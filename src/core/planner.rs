use crate::core::assembler::{assemble_plan, PlanParts};
use crate::core::bidding::{allocate_bids, target_cpc};
use crate::core::classifier::AdGroupClassifier;
use crate::core::context::PlanContext;
use crate::core::normalizer::filter_keywords;
use crate::core::themes::{ThemeSource, ThemeSynthesizer};
use crate::domain::model::{SemInputs, SemPlan};
use crate::domain::ports::{KeywordIdeaRequest, KeywordIdeaSource, TextGenerator};
use crate::utils::error::{PlanError, Result};
use crate::utils::validation::Validate;
use std::sync::Arc;

/// Runs one plan request end to end. Holds no per-request state, safe to share.
#[derive(Clone)]
pub struct SemPlanner {
    ideas: Arc<dyn KeywordIdeaSource>,
    generator: Option<Arc<dyn TextGenerator>>,
    context: PlanContext,
}

impl SemPlanner {
    pub fn new(
        ideas: Arc<dyn KeywordIdeaSource>,
        generator: Option<Arc<dyn TextGenerator>>,
        context: PlanContext,
    ) -> Self {
        Self {
            ideas,
            generator,
            context,
        }
    }

    pub fn context(&self) -> &PlanContext {
        &self.context
    }

    pub fn has_text_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub fn idea_request(&self, inputs: &SemInputs) -> KeywordIdeaRequest {
        KeywordIdeaRequest {
            seed_keywords: inputs.seed_themes(),
            page_url: inputs.seed_url().map(str::to_string),
            geo_target_ids: self.context.geo_target_ids.clone(),
            language_id: self.context.language_id.clone(),
        }
    }

    pub async fn generate_sem_plan(&self, inputs: &SemInputs) -> Result<SemPlan> {
        inputs.validate()?;

        // 1) 取得關鍵字建議，失敗即中止
        let request = self.idea_request(inputs);
        tracing::info!(
            "🔎 Fetching keyword ideas (seeds: {}, url: {})",
            request.seed_keywords.len(),
            request.page_url.as_deref().unwrap_or("-")
        );
        let raw = self.ideas.fetch_ideas(&request).await.map_err(|e| match e {
            PlanError::KeywordSourceError { .. } => e,
            other => PlanError::KeywordSourceError {
                message: other.to_string(),
            },
        })?;

        // 2) 過濾低搜尋量
        let filtered = filter_keywords(raw, self.context.min_search_volume);
        let total_volume = filtered.total_volume();
        tracing::info!(
            "📋 {} keywords kept (volume >= {}), total volume {}",
            filtered.keywords.len(),
            self.context.min_search_volume,
            total_volume
        );

        // 3) 廣告群組
        let locations = inputs.locations();
        let classifier = AdGroupClassifier::new(
            &inputs.brand_website,
            inputs.competitor_website.as_deref(),
            &locations,
        );
        let search_ad_groups = classifier.group(&filtered.keywords);

        // 4) PMax 主題
        let synthesized = ThemeSynthesizer::new(self.generator.as_deref())
            .synthesize(&filtered.texts(), &locations)
            .await;
        if synthesized.source == ThemeSource::Fallback {
            tracing::info!("🧩 PMax themes built from fallback rules");
        }

        // 5) 出價建議
        let total_budget = inputs.budget_allocations.total();
        let target = target_cpc(total_budget, total_volume, self.context.conversion_rate);
        tracing::debug!("Target CPC {:.2} for budget {}", target, total_budget);
        let shopping_cpc = allocate_bids(&filtered.keywords, target);

        Ok(assemble_plan(
            inputs,
            PlanParts {
                filtered,
                locations,
                search_ad_groups,
                pmax_themes: synthesized.themes,
                shopping_cpc,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AdGroup, BudgetAllocation, RawKeyword};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticIdeas {
        ideas: Vec<RawKeyword>,
        seen: Mutex<Vec<KeywordIdeaRequest>>,
    }

    #[async_trait]
    impl KeywordIdeaSource for StaticIdeas {
        async fn fetch_ideas(&self, request: &KeywordIdeaRequest) -> Result<Vec<RawKeyword>> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.ideas.clone())
        }
    }

    struct FailingIdeas;

    #[async_trait]
    impl KeywordIdeaSource for FailingIdeas {
        async fn fetch_ideas(&self, _request: &KeywordIdeaRequest) -> Result<Vec<RawKeyword>> {
            Err(PlanError::ProcessingError {
                message: "connection reset".to_string(),
            })
        }
    }

    fn idea(text: &str, volume: Option<u64>, cpc_range: Option<&str>) -> RawKeyword {
        RawKeyword {
            keyword: text.to_string(),
            search_volume: volume,
            competition: Some("LOW".to_string()),
            cpc_range: cpc_range.map(str::to_string),
            top_of_page_bid_low: None,
            top_of_page_bid_high: None,
        }
    }

    fn inputs() -> SemInputs {
        SemInputs {
            brand_website: "https://www.acme.com".to_string(),
            competitor_website: Some("https://rival.com".to_string()),
            target_locations: "Delhi, Mumbai".to_string(),
            themes: Some(vec!["whey protein".to_string()]),
            budget_allocations: BudgetAllocation {
                cap: 5000,
                bud: 3000,
                pmax: 2000,
            },
        }
    }

    #[tokio::test]
    async fn test_plan_for_whey_scenario() {
        let source = Arc::new(StaticIdeas {
            ideas: vec![
                idea("whey protein", Some(1000), Some("$1.00 - $2.00")),
                idea("gym", Some(100), None),
            ],
            seen: Mutex::new(Vec::new()),
        });
        let planner = SemPlanner::new(source.clone(), None, PlanContext::default());

        let plan = planner.generate_sem_plan(&inputs()).await.unwrap();

        assert_eq!(plan.total_keywords, 1);
        assert_eq!(plan.total_volume, 1000);
        assert_eq!(plan.avg_cpc, 1.5);
        assert_eq!(plan.total_budget, 10_000);
        assert_eq!(plan.search_ad_groups[&AdGroup::Category].len(), 1);
        assert_eq!(plan.pmax_themes.product.keywords, vec!["whey protein"]);
        assert_eq!(plan.pmax_themes.demographic.keywords, vec!["Delhi", "Mumbai"]);
        // target = 10000 * 0.02 / 1000 = 0.2, midpoint 1.5 is capped
        assert_eq!(plan.shopping_cpc[0].suggested_cpc, 0.2);

        let seen = source.seen.lock().unwrap();
        assert_eq!(seen[0].page_url.as_deref(), Some("https://www.acme.com"));
        assert_eq!(seen[0].seed_keywords, vec!["whey protein"]);
        assert_eq!(seen[0].language_id, "1000");
    }

    #[tokio::test]
    async fn test_ideation_failure_is_fatal() {
        let planner = SemPlanner::new(Arc::new(FailingIdeas), None, PlanContext::default());
        let err = planner.generate_sem_plan(&inputs()).await.unwrap_err();

        assert!(matches!(err, PlanError::KeywordSourceError { .. }));
        assert!(err.user_friendly_message().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_invalid_budget_rejected_before_fetch() {
        let source = Arc::new(StaticIdeas {
            ideas: Vec::new(),
            seen: Mutex::new(Vec::new()),
        });
        let planner = SemPlanner::new(source.clone(), None, PlanContext::default());
        let mut bad = inputs();
        bad.budget_allocations.pmax = -1;

        let err = planner.generate_sem_plan(&bad).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(source.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_ideas_give_empty_but_complete_plan() {
        let source = Arc::new(StaticIdeas {
            ideas: Vec::new(),
            seen: Mutex::new(Vec::new()),
        });
        let planner = SemPlanner::new(source, None, PlanContext::default());
        let plan = planner.generate_sem_plan(&inputs()).await.unwrap();

        assert_eq!(plan.total_keywords, 0);
        assert_eq!(plan.avg_cpc, 0.0);
        assert_eq!(plan.search_ad_groups.len(), 5);
        assert!(plan.shopping_cpc.is_empty());
    }

    #[tokio::test]
    async fn test_themes_seed_plan_without_any_site() {
        let source = Arc::new(StaticIdeas {
            ideas: vec![idea("whey protein", Some(1000), Some("$1.00 - $2.00"))],
            seen: Mutex::new(Vec::new()),
        });
        let planner = SemPlanner::new(source.clone(), None, PlanContext::default());
        let mut request = inputs();
        request.brand_website = String::new();
        request.competitor_website = None;

        let plan = planner.generate_sem_plan(&request).await.unwrap();

        assert_eq!(plan.total_keywords, 1);
        assert_eq!(plan.brand, "");
        let seen = source.seen.lock().unwrap();
        assert_eq!(seen[0].page_url, None);
        assert_eq!(seen[0].seed_keywords, vec!["whey protein"]);
    }

    #[tokio::test]
    async fn test_free_text_brand_name_still_plans() {
        let source = Arc::new(StaticIdeas {
            ideas: vec![
                idea("acme store protein", Some(900), None),
                idea("whey protein", Some(1000), None),
            ],
            seen: Mutex::new(Vec::new()),
        });
        let planner = SemPlanner::new(source, None, PlanContext::default());
        let mut request = inputs();
        request.brand_website = "Acme Store".to_string();

        let plan = planner.generate_sem_plan(&request).await.unwrap();

        assert_eq!(plan.total_keywords, 2);
        assert_eq!(plan.search_ad_groups[&AdGroup::BrandAndProduct].len(), 1);
    }
}
