use crate::config::substitute_env_vars;
use crate::domain::model::SemInputs;
use crate::utils::error::{PlanError, Result};
use crate::utils::validation::{self, Validate};
use std::path::Path;

/// 依副檔名載入計畫輸入 (.json 或 .toml)
pub fn load_inputs<P: AsRef<Path>>(path: P) -> Result<SemInputs> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("toml") | None => parse_toml_inputs(&content),
        Some(other) => Err(PlanError::InvalidConfigValueError {
            field: "input".to_string(),
            value: path.display().to_string(),
            reason: format!("Unsupported input format '{}'. Use .toml or .json", other),
        }),
    }
}

pub fn parse_toml_inputs(content: &str) -> Result<SemInputs> {
    let processed = substitute_env_vars(content)?;
    toml::from_str(&processed).map_err(|e| PlanError::ConfigValidationError {
        field: "input".to_string(),
        message: format!("TOML parsing error: {}", e),
    })
}

impl Validate for SemInputs {
    fn validate(&self) -> Result<()> {
        let budget = &self.budget_allocations;
        validation::validate_non_negative("budget_allocations.cap", budget.cap)?;
        validation::validate_non_negative("budget_allocations.bud", budget.bud)?;
        validation::validate_non_negative("budget_allocations.pmax", budget.pmax)?;

        // 網址或種子關鍵字至少要有一個，否則無從取得建議
        let has_seed_keywords = self.seed_themes().iter().any(|t| !t.trim().is_empty());
        if self.seed_url().is_none() && !has_seed_keywords {
            return Err(PlanError::ValidationError {
                message: "brand_website, competitor_website or themes is required".to_string(),
            });
        }

        Ok(())
    }
}
