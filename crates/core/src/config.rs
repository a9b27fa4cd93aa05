use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CampaignError, CampaignResult};

/// Root campaign configuration. Loaded from a YAML/TOML/JSON file with
/// environment overrides prefixed `SEM_CAMPAIGN__`.
///
/// `brand`, `competitor`, `seed_keywords`, `budgets` and
/// `campaign_constraints` must be present in the source; every other section
/// falls back to its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    pub brand: BrandConfig,
    pub competitor: BrandConfig,
    #[serde(default = "default_service_locations")]
    pub service_locations: Vec<String>,
    pub seed_keywords: Vec<String>,
    pub budgets: BudgetConfig,
    pub campaign_constraints: CampaignConstraints,
    #[serde(default)]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_project_name")]
    pub name: String,
    #[serde(default = "default_author")]
    pub author: String,
}

/// Brand or competitor identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
}

/// Monthly budgets per channel, in account currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub search_ads: f64,
    pub shopping_ads: f64,
    pub pmax_ads: f64,
    pub total_monthly: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConstraints {
    pub min_search_volume: u64,
    pub max_cpc: f64,
    #[serde(default = "default_min_keyword_length")]
    pub min_keyword_length: usize,
    #[serde(default = "default_max_keyword_length")]
    pub max_keyword_length: usize,
    /// Expected click-to-conversion rate, in (0, 1].
    pub target_conversion_rate: f64,
    pub target_cpa: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    #[serde(default = "default_file_formats")]
    pub file_formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Seed for the simulated keyword metrics.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

// Default functions
fn default_project_name() -> String {
    "SEM Campaign Planner".to_string()
}
fn default_author() -> String {
    "Marketing Team".to_string()
}
fn default_service_locations() -> Vec<String> {
    vec![
        "Mumbai".to_string(),
        "Delhi".to_string(),
        "Bengaluru".to_string(),
    ]
}
fn default_min_keyword_length() -> usize {
    3
}
fn default_max_keyword_length() -> usize {
    80
}
fn default_output_directory() -> String {
    "output".to_string()
}
fn default_file_formats() -> Vec<String> {
    vec!["csv".to_string(), "json".to_string()]
}
fn default_seed() -> u64 {
    42
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            author: default_author(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            file_formats: default_file_formats(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            search_ads: 5000.0,
            shopping_ads: 3000.0,
            pmax_ads: 2000.0,
            total_monthly: 10000.0,
        }
    }
}

impl Default for CampaignConstraints {
    fn default() -> Self {
        Self {
            min_search_volume: 500,
            max_cpc: 2.5,
            min_keyword_length: default_min_keyword_length(),
            max_keyword_length: default_max_keyword_length(),
            target_conversion_rate: 0.02,
            target_cpa: 50.0,
        }
    }
}

/// Demo configuration for a protein-supplement brand.
impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            brand: BrandConfig {
                name: "NutriMax".to_string(),
                website: Some("https://nutrimax.example".to_string()),
            },
            competitor: BrandConfig {
                name: "ProteinKing".to_string(),
                website: None,
            },
            service_locations: default_service_locations(),
            seed_keywords: vec![
                "whey protein".to_string(),
                "protein powder".to_string(),
                "vegan protein".to_string(),
                "muscle recovery supplement".to_string(),
                "protein shake for women".to_string(),
            ],
            budgets: BudgetConfig::default(),
            campaign_constraints: CampaignConstraints::default(),
            output_settings: OutputSettings::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl CampaignConfig {
    /// Load configuration from a file (format picked by extension) layered
    /// with `SEM_CAMPAIGN__*` environment variables, then validate it.
    pub fn load(path: impl AsRef<Path>) -> CampaignResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CampaignError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let builder = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("SEM_CAMPAIGN")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("service_locations")
                    .with_list_parse_key("seed_keywords"),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> CampaignResult<()> {
        if self.brand.name.trim().is_empty() {
            return Err(CampaignError::Config("brand.name must not be empty".into()));
        }
        if self.competitor.name.trim().is_empty() {
            return Err(CampaignError::Config(
                "competitor.name must not be empty".into(),
            ));
        }

        let budgets = [
            ("search_ads", self.budgets.search_ads),
            ("shopping_ads", self.budgets.shopping_ads),
            ("pmax_ads", self.budgets.pmax_ads),
            ("total_monthly", self.budgets.total_monthly),
        ];
        for (key, value) in budgets {
            if !value.is_finite() || value < 0.0 {
                return Err(CampaignError::Config(format!(
                    "Budget {key} must be a non-negative number"
                )));
            }
        }

        let c = &self.campaign_constraints;
        if c.min_search_volume == 0 {
            return Err(CampaignError::Config(
                "Constraint min_search_volume must be a positive number".into(),
            ));
        }
        for (key, value) in [("max_cpc", c.max_cpc), ("target_cpa", c.target_cpa)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CampaignError::Config(format!(
                    "Constraint {key} must be a positive number"
                )));
            }
        }
        if !(c.target_conversion_rate > 0.0 && c.target_conversion_rate <= 1.0) {
            return Err(CampaignError::Config(
                "target_conversion_rate must be between 0 and 1".into(),
            ));
        }
        if c.min_keyword_length == 0 || c.min_keyword_length > c.max_keyword_length {
            return Err(CampaignError::Config(format!(
                "Keyword length bounds are invalid: min {} / max {}",
                c.min_keyword_length, c.max_keyword_length
            )));
        }

        Ok(())
    }

    /// Returns `false` (and logs a warning) when the channel budgets exceed
    /// the total monthly budget by more than 5%.
    pub fn validate_budget_allocation(&self) -> bool {
        let b = &self.budgets;
        let allocated = b.search_ads + b.shopping_ads + b.pmax_ads;
        if allocated > b.total_monthly * 1.05 {
            tracing::warn!(
                allocated,
                total_monthly = b.total_monthly,
                "Allocated channel budgets exceed total monthly budget"
            );
            return false;
        }
        true
    }

    /// One-line-per-field digest of the configuration.
    pub fn summary(&self) -> String {
        [
            format!("Brand: {}", self.brand.name),
            format!("Competitor: {}", self.competitor.name),
            format!("Locations: {} cities", self.service_locations.len()),
            format!("Total Budget: {}", crate::money::format_currency(self.budgets.total_monthly)),
            format!("Seed Keywords: {}", self.seed_keywords.len()),
            format!(
                "Min Search Volume: {}",
                self.campaign_constraints.min_search_volume
            ),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Mutex, MutexGuard};

    // Environment overrides are process-wide; loads run one at a time.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("sem-core-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    const MINIMAL_YAML: &str = r#"
brand:
  name: NutriMax
competitor:
  name: ProteinKing
seed_keywords:
  - whey protein
budgets:
  search_ads: 5000
  shopping_ads: 3000
  pmax_ads: 2000
  total_monthly: 10000
campaign_constraints:
  min_search_volume: 500
  max_cpc: 2.5
  target_conversion_rate: 0.02
  target_cpa: 50
"#;

    #[test]
    fn test_load_applies_defaults() {
        let _guard = env_lock();
        let path = write_temp("minimal.yaml", MINIMAL_YAML);
        let config = CampaignConfig::load(&path).unwrap();

        assert_eq!(config.brand.name, "NutriMax");
        assert_eq!(config.service_locations, vec!["Mumbai", "Delhi", "Bengaluru"]);
        assert_eq!(config.output_settings.directory, "output");
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.campaign_constraints.min_keyword_length, 3);
        assert_eq!(config.campaign_constraints.max_keyword_length, 80);
    }

    #[test]
    fn test_load_missing_section_is_config_error() {
        let yaml = MINIMAL_YAML.replace("competitor:\n  name: ProteinKing\n", "");
        let _guard = env_lock();
        let path = write_temp("no_competitor.yaml", &yaml);
        let err = CampaignConfig::load(&path).unwrap_err();
        assert!(matches!(err, CampaignError::Config(_)));
    }

    #[test]
    fn test_load_env_overrides() {
        let _guard = env_lock();
        let path = write_temp("env.yaml", MINIMAL_YAML);
        std::env::set_var("SEM_CAMPAIGN__SEED_KEYWORDS", "whey protein,vegan protein");
        std::env::set_var("SEM_CAMPAIGN__SERVICE_LOCATIONS", "Pune,Goa");
        std::env::set_var("SEM_CAMPAIGN__BUDGETS__SEARCH_ADS", "777");
        std::env::set_var("SEM_CAMPAIGN__GENERATOR__SEED", "7");
        let loaded = CampaignConfig::load(&path);
        for key in [
            "SEM_CAMPAIGN__SEED_KEYWORDS",
            "SEM_CAMPAIGN__SERVICE_LOCATIONS",
            "SEM_CAMPAIGN__BUDGETS__SEARCH_ADS",
            "SEM_CAMPAIGN__GENERATOR__SEED",
        ] {
            std::env::remove_var(key);
        }

        let config = loaded.unwrap();
        assert_eq!(config.seed_keywords, vec!["whey protein", "vegan protein"]);
        assert_eq!(config.service_locations, vec!["Pune", "Goa"]);
        assert!((config.budgets.search_ads - 777.0).abs() < f64::EPSILON);
        assert_eq!(config.generator.seed, 7);
        // untouched keys still come from the file
        assert!((config.budgets.shopping_ads - 3000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CampaignConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_validate_default_config() {
        assert!(CampaignConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_conversion_rate() {
        let mut config = CampaignConfig::default();
        config.campaign_constraints.target_conversion_rate = 1.5;
        assert!(config.validate().is_err());

        config.campaign_constraints.target_conversion_rate = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_budget() {
        let mut config = CampaignConfig::default();
        config.budgets.pmax_ads = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pmax_ads"));
    }

    #[test]
    fn test_validate_rejects_inverted_length_bounds() {
        let mut config = CampaignConfig::default();
        config.campaign_constraints.min_keyword_length = 90;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_budget_allocation_tolerance() {
        let mut config = CampaignConfig::default();
        assert!(config.validate_budget_allocation());

        // 4% over total is tolerated, 10% is not.
        config.budgets.search_ads = 5400.0;
        assert!(config.validate_budget_allocation());
        config.budgets.search_ads = 6000.0;
        assert!(!config.validate_budget_allocation());
    }

    #[test]
    fn test_summary_lists_brand_and_budget() {
        let summary = CampaignConfig::default().summary();
        assert!(summary.contains("Brand: NutriMax"));
        assert!(summary.contains("Total Budget: $10,000.00"));
    }
}
