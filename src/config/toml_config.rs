use crate::domain::model::{Dataset, RiskLayer};
use crate::domain::page::{ids, Checklist, Dropdown, Page};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DashError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_unique, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Rwanda's thirty districts, alphabetical.
pub const RWANDA_DISTRICTS: [&str; 30] = [
    "Bugesera", "Burera", "Gakenke", "Gasabo", "Gatsibo", "Gicumbi", "Gisagara", "Huye",
    "Kamonyi", "Karongi", "Kayonza", "Kicukiro", "Kirehe", "Muhanga", "Musanze", "Ngoma",
    "Ngororero", "Nyabihu", "Nyagatare", "Nyamagabe", "Nyamasheke", "Nyanza", "Nyarugenge",
    "Nyaruguru", "Rubavu", "Ruhango", "Rulindo", "Rusizi", "Rutsiro", "Rwamagana",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub page: PageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub districts: Vec<String>,
    /// Falls back to the first district.
    pub default_district: Option<String>,
    pub datasets: Vec<String>,
    pub default_dataset: String,
    /// Checklist entries, in the order they appear on the page.
    pub layers: Vec<String>,
    pub checked_layers: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            districts: RWANDA_DISTRICTS.iter().map(|d| d.to_string()).collect(),
            default_district: None,
            datasets: Dataset::ALL.iter().map(|d| d.as_str().to_string()).collect(),
            default_dataset: Dataset::Chirps.as_str().to_string(),
            layers: RiskLayer::STACKING_ORDER
                .iter()
                .rev()
                .map(|l| l.as_str().to_string())
                .collect(),
            checked_layers: vec![RiskLayer::Districts.as_str().to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl DashboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DASH_API_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn default_district(&self) -> Option<&str> {
        self.page
            .default_district
            .as_deref()
            .or_else(|| self.page.districts.first().map(String::as_str))
    }

    /// Builds the page in its initial state: configured defaults selected, nothing loaded.
    pub fn build_page(&self) -> Result<Page> {
        let checklist = Checklist::new(self.page.layers.iter().map(|layer| {
            let checked = self.page.checked_layers.contains(layer);
            (layer.clone(), checked)
        }));

        let district = self.default_district().map(str::to_string);
        Ok(Page::new(
            checklist,
            Dropdown::new(ids::DISTRICT_DROPDOWN, self.page.districts.clone(), district.clone())?,
            Dropdown::new(
                ids::DATASET_DROPDOWN,
                self.page.datasets.clone(),
                Some(self.page.default_dataset.clone()),
            )?,
            Dropdown::new(ids::DISTRICT_DROPDOWN_INFO, self.page.districts.clone(), district)?,
        ))
    }
}

impl ConfigProvider for DashboardConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;

        if self.page.districts.is_empty() {
            return Err(DashError::ConfigValidationError {
                field: "page.districts".to_string(),
                message: "at least one district is required".to_string(),
            });
        }
        for district in &self.page.districts {
            validate_non_empty_string("page.districts", district)?;
        }
        validate_unique("page.districts", &self.page.districts)?;
        if let Some(district) = &self.page.default_district {
            validate_one_of("page.default_district", district, &self.page.districts)?;
        }

        for dataset in &self.page.datasets {
            dataset.parse::<Dataset>().map_err(|_| DashError::InvalidConfigValueError {
                field: "page.datasets".to_string(),
                value: dataset.clone(),
                reason: format!(
                    "Unknown dataset. Known datasets: {}",
                    Dataset::ALL.map(|d| d.as_str()).join(", ")
                ),
            })?;
        }
        validate_unique("page.datasets", &self.page.datasets)?;
        validate_one_of("page.default_dataset", &self.page.default_dataset, &self.page.datasets)?;

        for layer in &self.page.layers {
            validate_non_empty_string("page.layers", layer)?;
            if RiskLayer::from_name(layer).is_none() {
                tracing::warn!("Layer '{}' is not a known risk layer; the server may ignore it", layer);
            }
        }
        validate_unique("page.layers", &self.page.layers)?;
        for layer in &self.page.checked_layers {
            validate_one_of("page.checked_layers", layer, &self.page.layers)?;
        }

        Ok(())
    }
}
