use crate::domain::model::RawKeyword;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// What the planner asks the ideation collaborator for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordIdeaRequest {
    pub seed_keywords: Vec<String>,
    pub page_url: Option<String>,
    pub geo_target_ids: Vec<String>,
    pub language_id: String,
}

#[async_trait]
pub trait KeywordIdeaSource: Send + Sync {
    async fn fetch_ideas(&self, request: &KeywordIdeaRequest) -> Result<Vec<RawKeyword>>;
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
