use crate::config::KeywordPlannerConfig;
use crate::domain::model::RawKeyword;
use crate::domain::ports::{KeywordIdeaRequest, KeywordIdeaSource};
use crate::utils::error::{PlanError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

const MAX_PAGES: usize = 50;

/// KeywordPlanIdeaService over the Google Ads REST interface.
pub struct GoogleAdsKeywordSource {
    client: Client,
    endpoint: String,
    customer_id: String,
    developer_token: String,
    access_token: String,
    login_customer_id: Option<String>,
    page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateKeywordIdeasRequest {
    language: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    geo_target_constants: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword_seed: Option<KeywordSeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url_seed: Option<UrlSeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword_and_url_seed: Option<KeywordAndUrlSeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct KeywordSeed {
    keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
struct UrlSeed {
    url: String,
}

#[derive(Debug, Serialize)]
struct KeywordAndUrlSeed {
    url: String,
    keywords: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateKeywordIdeasResponse {
    #[serde(default)]
    results: Vec<KeywordIdea>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeywordIdea {
    text: String,
    #[serde(default)]
    keyword_idea_metrics: Option<KeywordIdeaMetrics>,
}

// int64 fields arrive as JSON strings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeywordIdeaMetrics {
    #[serde(default, deserialize_with = "deserialize_int64")]
    avg_monthly_searches: Option<i64>,
    #[serde(default)]
    competition: Option<String>,
    #[serde(default, deserialize_with = "deserialize_int64")]
    low_top_of_page_bid_micros: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_int64")]
    high_top_of_page_bid_micros: Option<i64>,
}

fn deserialize_int64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn micros_to_currency(micros: Option<i64>) -> Option<f64> {
    micros.filter(|m| *m != 0).map(|m| m as f64 / 1_000_000.0)
}

impl KeywordIdea {
    fn into_raw_keyword(self) -> RawKeyword {
        let metrics = self.keyword_idea_metrics.unwrap_or_default();
        let low = micros_to_currency(metrics.low_top_of_page_bid_micros);
        let high = micros_to_currency(metrics.high_top_of_page_bid_micros);

        let cpc_range = match (low, high) {
            (Some(low), Some(high)) => Some(format!("${:.2} - ${:.2}", low, high)),
            _ => None,
        };

        RawKeyword {
            keyword: self.text,
            search_volume: metrics.avg_monthly_searches.map(|v| v.max(0) as u64),
            competition: metrics
                .competition
                .filter(|c| !c.is_empty() && c != "UNSPECIFIED"),
            cpc_range,
            top_of_page_bid_low: low,
            top_of_page_bid_high: high,
        }
    }
}

impl GoogleAdsKeywordSource {
    pub fn new(config: &KeywordPlannerConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            customer_id: config.customer_id.replace('-', ""),
            developer_token: config.developer_token.clone(),
            access_token: config.access_token.clone(),
            login_customer_id: config
                .login_customer_id
                .as_ref()
                .map(|id| id.replace('-', ""))
                .filter(|id| !id.is_empty()),
            page_size: config.page_size,
        })
    }

    fn build_request(
        &self,
        request: &KeywordIdeaRequest,
        page_token: Option<String>,
    ) -> GenerateKeywordIdeasRequest {
        let keywords: Vec<String> = request
            .seed_keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        let url = request.page_url.clone().filter(|u| !u.trim().is_empty());

        // 種子只能擇一：關鍵字+網址、僅關鍵字、僅網址
        // 兩者皆有時送 keywordAndUrlSeed，刻意不只送網址 (舊版 oneof 後設值覆蓋前者)
        let (keyword_seed, url_seed, keyword_and_url_seed) = match (keywords.is_empty(), url) {
            (false, Some(url)) => (None, None, Some(KeywordAndUrlSeed { url, keywords })),
            (false, None) => (Some(KeywordSeed { keywords }), None, None),
            (true, Some(url)) => (None, Some(UrlSeed { url }), None),
            (true, None) => (None, None, None),
        };

        GenerateKeywordIdeasRequest {
            language: format!("languageConstants/{}", request.language_id),
            geo_target_constants: request
                .geo_target_ids
                .iter()
                .map(|id| format!("geoTargetConstants/{}", id))
                .collect(),
            keyword_seed,
            url_seed,
            keyword_and_url_seed,
            page_size: self.page_size,
            page_token,
        }
    }

    async fn fetch_page(&self, body: &GenerateKeywordIdeasRequest) -> Result<GenerateKeywordIdeasResponse> {
        let url = format!(
            "{}/customers/{}:generateKeywordIdeas",
            self.endpoint, self.customer_id
        );
        tracing::debug!("Making keyword ideas request to: {}", url);

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("developer-token", &self.developer_token)
            .json(body);

        if let Some(login_customer_id) = &self.login_customer_id {
            request = request.header("login-customer-id", login_customer_id);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Keyword ideas response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlanError::KeywordSourceError {
                message: format!("HTTP {}: {}", status, body.trim()),
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(GenerateKeywordIdeasResponse::default());
        }
        serde_json::from_str(&text).map_err(|e| PlanError::KeywordSourceError {
            message: format!("unexpected response body: {}", e),
        })
    }
}

#[async_trait]
impl KeywordIdeaSource for GoogleAdsKeywordSource {
    async fn fetch_ideas(&self, request: &KeywordIdeaRequest) -> Result<Vec<RawKeyword>> {
        let mut keywords = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let body = self.build_request(request, page_token.take());
            let response = self.fetch_page(&body).await?;

            tracing::debug!("Keyword ideas page {}: {} results", page, response.results.len());
            keywords.extend(response.results.into_iter().map(KeywordIdea::into_raw_keyword));

            match response.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        if page_token.is_some() {
            tracing::warn!("⚠️ Stopped keyword ideas pagination after {} pages", MAX_PAGES);
        }

        tracing::info!("📡 Received {} keyword ideas", keywords.len());
        Ok(keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config(endpoint: String) -> KeywordPlannerConfig {
        KeywordPlannerConfig {
            endpoint,
            customer_id: "123-456-7890".to_string(),
            developer_token: "dev-token".to_string(),
            access_token: "access-token".to_string(),
            login_customer_id: None,
            language_id: None,
            geo_target_ids: None,
            timeout_seconds: Some(5),
            page_size: None,
        }
    }

    fn request() -> KeywordIdeaRequest {
        KeywordIdeaRequest {
            seed_keywords: vec!["whey protein".to_string()],
            page_url: Some("https://www.acme.com".to_string()),
            geo_target_ids: vec!["2356".to_string()],
            language_id: "1000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_ideas_converts_metrics() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/customers/1234567890:generateKeywordIdeas")
                .header("developer-token", "dev-token")
                .header("authorization", "Bearer access-token")
                .json_body(json!({
                    "language": "languageConstants/1000",
                    "geoTargetConstants": ["geoTargetConstants/2356"],
                    "keywordAndUrlSeed": {
                        "url": "https://www.acme.com",
                        "keywords": ["whey protein"]
                    }
                }));
            then.status(200).json_body(json!({
                "results": [
                    {
                        "text": "whey protein",
                        "keywordIdeaMetrics": {
                            "avgMonthlySearches": "1000",
                            "competition": "LOW",
                            "lowTopOfPageBidMicros": "1000000",
                            "highTopOfPageBidMicros": 2000000
                        }
                    },
                    {
                        "text": "gym",
                        "keywordIdeaMetrics": {
                            "avgMonthlySearches": "100",
                            "lowTopOfPageBidMicros": "500000"
                        }
                    },
                    { "text": "no metrics" }
                ]
            }));
        });

        let source = GoogleAdsKeywordSource::new(&config(server.base_url())).unwrap();
        let ideas = source.fetch_ideas(&request()).await.unwrap();

        api_mock.assert();
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[0].search_volume, Some(1000));
        assert_eq!(ideas[0].competition.as_deref(), Some("LOW"));
        assert_eq!(ideas[0].cpc_range.as_deref(), Some("$1.00 - $2.00"));
        assert_eq!(ideas[1].top_of_page_bid_low, Some(0.5));
        assert!(ideas[1].cpc_range.is_none());
        assert!(ideas[1].competition.is_none());
        assert!(ideas[2].search_volume.is_none());
    }

    #[tokio::test]
    async fn test_fetch_ideas_follows_pagination() {
        let server = MockServer::start();
        let second = server.mock(|when, then| {
            when.method(POST)
                .path("/customers/1234567890:generateKeywordIdeas")
                .json_body_partial(r#"{"pageToken": "page-2"}"#);
            then.status(200).json_body(json!({
                "results": [{"text": "vegan protein", "keywordIdeaMetrics": {"avgMonthlySearches": "900"}}]
            }));
        });
        let first = server.mock(|when, then| {
            when.method(POST)
                .path("/customers/1234567890:generateKeywordIdeas")
                .matches(|req| {
                    let body = String::from_utf8_lossy(req.body.as_deref().unwrap_or_default());
                    !body.contains("pageToken")
                });
            then.status(200).json_body(json!({
                "results": [{"text": "whey protein", "keywordIdeaMetrics": {"avgMonthlySearches": "1000"}}],
                "nextPageToken": "page-2"
            }));
        });

        let source = GoogleAdsKeywordSource::new(&config(server.base_url())).unwrap();
        let ideas = source.fetch_ideas(&request()).await.unwrap();

        first.assert();
        second.assert();
        let texts: Vec<&str> = ideas.iter().map(|i| i.keyword.as_str()).collect();
        assert_eq!(texts, vec!["whey protein", "vegan protein"]);
    }

    #[tokio::test]
    async fn test_fetch_ideas_error_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(401).body("UNAUTHENTICATED");
        });

        let source = GoogleAdsKeywordSource::new(&config(server.base_url())).unwrap();
        let err = source.fetch_ideas(&request()).await.unwrap_err();

        api_mock.assert();
        match err {
            PlanError::KeywordSourceError { message } => {
                assert!(message.contains("401"));
                assert!(message.contains("UNAUTHENTICATED"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_seed_selection() {
        let source = GoogleAdsKeywordSource::new(&config("http://localhost".to_string())).unwrap();

        let url_only = KeywordIdeaRequest {
            seed_keywords: vec![],
            ..request()
        };
        let body = serde_json::to_value(source.build_request(&url_only, None)).unwrap();
        assert_eq!(body["urlSeed"]["url"], "https://www.acme.com");
        assert!(body.get("keywordSeed").is_none());

        let keywords_only = KeywordIdeaRequest {
            page_url: None,
            ..request()
        };
        let body = serde_json::to_value(source.build_request(&keywords_only, None)).unwrap();
        assert_eq!(body["keywordSeed"]["keywords"][0], "whey protein");
        assert!(body.get("keywordAndUrlSeed").is_none());
    }
}
