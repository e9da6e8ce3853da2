pub mod inputs;

use crate::core::context::{PlanContext, DEFAULT_CONVERSION_RATE, DEFAULT_MIN_SEARCH_VOLUME};
use crate::utils::error::{PlanError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LANGUAGE_ID: &str = "1000";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash";
pub const SUPPORTED_OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub keyword_planner: KeywordPlannerConfig,
    pub text_generation: Option<TextGenerationConfig>,
    pub planning: Option<PlanningConfig>,
    pub server: Option<ServerConfig>,
    pub batch: Option<BatchConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordPlannerConfig {
    pub endpoint: String,
    pub customer_id: String,
    pub developer_token: String,
    pub access_token: String,
    pub login_customer_id: Option<String>,
    pub language_id: Option<String>,
    pub geo_target_ids: Option<Vec<String>>,
    pub timeout_seconds: Option<u64>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextGenerationConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl TextGenerationConfig {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL)
    }

    /// 空白金鑰或未替換的 ${VAR} 視為未設定
    pub fn has_api_key(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && !(key.starts_with("${") && key.ends_with('}'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningConfig {
    pub min_search_volume: Option<u64>,
    pub conversion_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub json_logs: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    pub output_path: Option<String>,
    pub output_formats: Option<Vec<String>>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

impl BatchConfig {
    pub fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or("./output")
    }

    pub fn output_formats(&self) -> Vec<String> {
        self.output_formats
            .clone()
            .unwrap_or_else(|| vec!["json".to_string()])
    }

    /// 壓縮檔名，未啟用時為 None
    pub fn archive_name(&self) -> Option<&str> {
        self.compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_deref().unwrap_or("sem_plan.zip"))
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlanError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlanError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn plan_context(&self) -> PlanContext {
        let planning = self.planning.as_ref();
        PlanContext {
            min_search_volume: planning
                .and_then(|p| p.min_search_volume)
                .unwrap_or(DEFAULT_MIN_SEARCH_VOLUME),
            conversion_rate: planning
                .and_then(|p| p.conversion_rate)
                .unwrap_or(DEFAULT_CONVERSION_RATE),
            language_id: self
                .keyword_planner
                .language_id
                .clone()
                .unwrap_or_else(|| DEFAULT_LANGUAGE_ID.to_string()),
            geo_target_ids: self.keyword_planner.geo_target_ids.clone().unwrap_or_default(),
        }
    }

    /// Text generation is only wired up when the section exists and carries a real key.
    pub fn text_generation_enabled(&self) -> bool {
        self.text_generation
            .as_ref()
            .map(TextGenerationConfig::has_api_key)
            .unwrap_or(false)
    }

    pub fn server_host(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.host.as_deref())
            .unwrap_or("0.0.0.0")
    }

    pub fn server_port(&self) -> u16 {
        self.server.as_ref().and_then(|s| s.port).unwrap_or(8000)
    }

    pub fn json_logs(&self) -> bool {
        self.server
            .as_ref()
            .and_then(|s| s.json_logs)
            .unwrap_or(false)
    }

    pub fn batch(&self) -> BatchConfig {
        self.batch.clone().unwrap_or_default()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("keyword_planner.endpoint", &self.keyword_planner.endpoint)?;
        validation::validate_non_empty_string(
            "keyword_planner.customer_id",
            &self.keyword_planner.customer_id,
        )?;

        if let Some(text) = &self.text_generation {
            validation::validate_url("text_generation.endpoint", &text.endpoint)?;
        }

        let context = self.plan_context();
        validation::validate_range(
            "planning.conversion_rate",
            context.conversion_rate,
            f64::MIN_POSITIVE,
            1.0,
        )?;

        if let Some(server) = &self.server {
            if let Some(port) = server.port {
                validation::validate_range("server.port", port, 1, u16::MAX)?;
            }
        }

        let batch = self.batch();
        validation::validate_path("batch.output_path", batch.output_path())?;
        validation::validate_allowed_values(
            "batch.output_formats",
            &batch.output_formats(),
            &SUPPORTED_OUTPUT_FORMATS,
        )?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// 替換環境變數 (例如 ${GOOGLE_ADS_ACCESS_TOKEN})，未設定的變數保持原樣
pub fn substitute_env_vars(content: &str) -> Result<String> {
    use regex::Regex;

    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlanError::ConfigError {
        message: format!("invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC_CONFIG: &str = r#"
[keyword_planner]
endpoint = "https://googleads.googleapis.com/v17"
customer_id = "1234567890"
developer_token = "dev-token"
access_token = "access-token"
"#;

    #[test]
    fn test_parse_basic_config_with_defaults() {
        let config = AppConfig::from_toml_str(BASIC_CONFIG).unwrap();

        assert_eq!(config.keyword_planner.customer_id, "1234567890");
        assert!(!config.text_generation_enabled());
        assert_eq!(config.server_port(), 8000);
        assert_eq!(config.batch().output_formats(), vec!["json"]);
        assert!(config.batch().archive_name().is_none());

        let context = config.plan_context();
        assert_eq!(context.min_search_volume, 500);
        assert_eq!(context.conversion_rate, 0.02);
        assert_eq!(context.language_id, "1000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SEM_TEST_GEMINI_KEY", "secret-key");

        let content = format!(
            "{}\n[text_generation]\nendpoint = \"https://generativelanguage.googleapis.com/v1beta\"\napi_key = \"${{SEM_TEST_GEMINI_KEY}}\"\n",
            BASIC_CONFIG
        );
        let config = AppConfig::from_toml_str(&content).unwrap();
        let text = config.text_generation.as_ref().unwrap();

        assert_eq!(text.api_key, "secret-key");
        assert_eq!(text.model(), "gemini-1.5-flash");
        assert!(config.text_generation_enabled());

        std::env::remove_var("SEM_TEST_GEMINI_KEY");
    }

    #[test]
    fn test_unresolved_api_key_disables_text_generation() {
        let content = format!(
            "{}\n[text_generation]\nendpoint = \"https://generativelanguage.googleapis.com/v1beta\"\napi_key = \"${{SEM_TEST_UNSET_KEY_9F2A}}\"\n",
            BASIC_CONFIG
        );
        let config = AppConfig::from_toml_str(&content).unwrap();
        assert!(!config.text_generation_enabled());
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let bad_endpoint = BASIC_CONFIG.replace("https://googleads.googleapis.com/v17", "not-a-url");
        assert!(AppConfig::from_toml_str(&bad_endpoint).unwrap().validate().is_err());

        let bad_rate = format!("{}\n[planning]\nconversion_rate = 1.5\n", BASIC_CONFIG);
        assert!(AppConfig::from_toml_str(&bad_rate).unwrap().validate().is_err());

        let bad_format = format!("{}\n[batch]\noutput_formats = [\"xlsx\"]\n", BASIC_CONFIG);
        assert!(AppConfig::from_toml_str(&bad_format).unwrap().validate().is_err());
    }

    #[test]
    fn test_planning_overrides() {
        let content = format!(
            "{}\n[planning]\nmin_search_volume = 1000\nconversion_rate = 0.05\n\n[batch]\ncompression = {{ enabled = true }}\n",
            BASIC_CONFIG
        );
        let config = AppConfig::from_toml_str(&content).unwrap();
        let context = config.plan_context();

        assert_eq!(context.min_search_volume, 1000);
        assert_eq!(context.conversion_rate, 0.05);
        assert_eq!(config.batch().archive_name(), Some("sem_plan.zip"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC_CONFIG.as_bytes()).unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.keyword_planner.developer_token, "dev-token");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[keyword_planner").unwrap_err();
        assert!(matches!(err, PlanError::ConfigValidationError { .. }));
    }
}
