use serde::Deserialize;

/// Domain terms shared between ad set names and ad names in the storefront's
/// naming scheme. Used by the last-resort keyword strategy; matches found this
/// way are best-effort and false positives are expected.
pub const DEFAULT_MATCH_KEYWORDS: &[&str] =
    &["芳香磚", "香氛磚", "LM", "優化", "互動", "任選", "組合"];

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `ADLENS__`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    #[serde(default)]
    pub alerts: AlertThresholds,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReconcilerConfig {
    /// Leading characters of an id shared by an ad set and its ads.
    #[serde(default = "default_id_prefix_len")]
    pub id_prefix_len: usize,
    /// Name prefix length used when a name has no underscore segments.
    #[serde(default = "default_name_prefix_chars")]
    pub name_prefix_chars: usize,
    /// Carousel limit on the ad platform.
    #[serde(default = "default_max_media_refs")]
    pub max_media_refs: usize,
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertThresholds {
    #[serde(default = "default_frequency_warning")]
    pub frequency_warning: f64,
    #[serde(default = "default_frequency_caution")]
    pub frequency_caution: f64,
    #[serde(default = "default_cpm_warning")]
    pub cpm_warning: f64,
    #[serde(default = "default_cpm_caution")]
    pub cpm_caution: f64,
    #[serde(default = "default_roas_floor")]
    pub roas_floor: f64,
    #[serde(default = "default_conversion_floor")]
    pub conversion_floor: f64,
    #[serde(default = "default_checkout_drop_off")]
    pub checkout_drop_off: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// Language of the instructions handed to the analysis agent.
    #[serde(default)]
    pub analysis_locale: AnalysisLocale,
}

/// The dashboard that renders analysis results is zh-TW.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum AnalysisLocale {
    #[default]
    #[serde(rename = "zh-TW", alias = "zh-tw", alias = "zh_tw")]
    ZhTw,
    #[serde(rename = "en")]
    En,
}

// Default functions
fn default_id_prefix_len() -> usize {
    12
}
fn default_name_prefix_chars() -> usize {
    20
}
fn default_max_media_refs() -> usize {
    7
}
fn default_keywords() -> Vec<String> {
    DEFAULT_MATCH_KEYWORDS.iter().map(|k| k.to_string()).collect()
}
fn default_frequency_warning() -> f64 {
    2.5
}
fn default_frequency_caution() -> f64 {
    2.0
}
fn default_cpm_warning() -> f64 {
    400.0
}
fn default_cpm_caution() -> f64 {
    300.0
}
fn default_roas_floor() -> f64 {
    1.5
}
fn default_conversion_floor() -> f64 {
    0.5
}
fn default_checkout_drop_off() -> f64 {
    70.0
}
fn default_output_dir() -> String {
    ".".to_string()
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            id_prefix_len: default_id_prefix_len(),
            name_prefix_chars: default_name_prefix_chars(),
            max_media_refs: default_max_media_refs(),
            keywords: default_keywords(),
        }
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            frequency_warning: default_frequency_warning(),
            frequency_caution: default_frequency_caution(),
            cpm_warning: default_cpm_warning(),
            cpm_caution: default_cpm_caution(),
            roas_floor: default_roas_floor(),
            conversion_floor: default_conversion_floor(),
            checkout_drop_off: default_checkout_drop_off(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            analysis_locale: AnalysisLocale::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then environment
    /// variables (`ADLENS__RECONCILER__MAX_MEDIA_REFS=5`). A named file
    /// that does not exist is an error.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("ADLENS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("reconciler.keywords"),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn validate(&self) -> crate::ReportResult<()> {
        if self.reconciler.id_prefix_len == 0 {
            return Err(crate::ReportError::Config(
                "reconciler.id_prefix_len must be greater than zero".into(),
            ));
        }
        if self.reconciler.name_prefix_chars == 0 {
            return Err(crate::ReportError::Config(
                "reconciler.name_prefix_chars must be greater than zero".into(),
            ));
        }
        if self.reconciler.max_media_refs == 0 {
            return Err(crate::ReportError::Config(
                "reconciler.max_media_refs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.reconciler.id_prefix_len, 12);
        assert_eq!(cfg.reconciler.max_media_refs, 7);
        assert_eq!(cfg.reconciler.keywords.len(), DEFAULT_MATCH_KEYWORDS.len());
        assert_eq!(cfg.alerts.cpm_warning, 400.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let cfg: AppConfig =
            serde_json::from_value(serde_json::json!({"reconciler": {"max_media_refs": 3}}))
                .unwrap();
        assert_eq!(cfg.reconciler.max_media_refs, 3);
        assert_eq!(cfg.reconciler.name_prefix_chars, 20);
        assert_eq!(cfg.output.dir, ".");
        assert_eq!(cfg.output.analysis_locale, AnalysisLocale::ZhTw);
    }

    #[test]
    fn test_analysis_locale_names() {
        let cfg: OutputConfig =
            serde_json::from_value(serde_json::json!({"analysis_locale": "en"})).unwrap();
        assert_eq!(cfg.analysis_locale, AnalysisLocale::En);
        let cfg: OutputConfig =
            serde_json::from_value(serde_json::json!({"analysis_locale": "zh-tw"})).unwrap();
        assert_eq!(cfg.analysis_locale, AnalysisLocale::ZhTw);
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let mut cfg = AppConfig::default();
        cfg.reconciler.max_media_refs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_name_prefix() {
        let mut cfg = AppConfig::default();
        cfg.reconciler.name_prefix_chars = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("name_prefix_chars"));
    }

    #[test]
    fn test_load_missing_named_file_fails() {
        assert!(AppConfig::load(Some("/nonexistent/adlens-config.toml")).is_err());
    }
}
