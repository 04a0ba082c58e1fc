use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{RecommendationPolicy, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub contact: ContactSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,
    #[serde(default = "default_base_radius")]
    pub base_radius_km: f64,
    #[serde(default = "default_radius_step")]
    pub radius_step_km: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius_km: f64,
    #[serde(default = "default_min_candidates")]
    pub min_radius_candidates: usize,
    #[serde(default = "default_strength_tolerance")]
    pub strength_tolerance: f64,
    #[serde(default = "default_min_candidates")]
    pub min_strength_candidates: usize,
    #[serde(default = "default_similar_distance")]
    pub similar_max_distance_km: f64,
    #[serde(default = "default_similar_strength")]
    pub similar_strength_tolerance: f64,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_max_results: default_max_results(),
            base_radius_km: default_base_radius(),
            radius_step_km: default_radius_step(),
            max_radius_km: default_max_radius(),
            min_radius_candidates: default_min_candidates(),
            strength_tolerance: default_strength_tolerance(),
            min_strength_candidates: default_min_candidates(),
            similar_max_distance_km: default_similar_distance(),
            similar_strength_tolerance: default_similar_strength(),
        }
    }
}

impl RecommendationSettings {
    pub fn policy(&self) -> RecommendationPolicy {
        RecommendationPolicy {
            base_radius_km: self.base_radius_km,
            radius_step_km: self.radius_step_km,
            max_radius_km: self.max_radius_km,
            min_radius_candidates: self.min_radius_candidates,
            strength_tolerance: self.strength_tolerance,
            min_strength_candidates: self.min_strength_candidates,
            similar_max_distance_km: self.similar_max_distance_km,
            similar_strength_tolerance: self.similar_strength_tolerance,
        }
    }
}

impl RecommendationSettings {
    /// Reject values the narrowing pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius_step_km.is_finite() && self.radius_step_km > 0.0) {
            return Err(ConfigError::Message(format!(
                "recommendation.radius_step_km must be a positive number, got {}",
                self.radius_step_km
            )));
        }

        let bounded = [
            ("base_radius_km", self.base_radius_km),
            ("max_radius_km", self.max_radius_km),
            ("strength_tolerance", self.strength_tolerance),
            ("similar_max_distance_km", self.similar_max_distance_km),
            ("similar_strength_tolerance", self.similar_strength_tolerance),
        ];
        if let Some((name, value)) = bounded.iter().find(|(_, v)| !(v.is_finite() && *v >= 0.0)) {
            return Err(ConfigError::Message(format!(
                "recommendation.{} must be a non-negative number, got {}",
                name, value
            )));
        }

        Ok(())
    }
}

fn default_max_results() -> usize { 6 }
fn default_base_radius() -> f64 { 30.0 }
fn default_radius_step() -> f64 { 10.0 }
fn default_max_radius() -> f64 { 50.0 }
fn default_min_candidates() -> usize { 3 }
fn default_strength_tolerance() -> f64 { 2.0 }
fn default_similar_distance() -> f64 { 15.0 }
fn default_similar_strength() -> f64 { 1.0 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_strength_weight")]
    pub strength: f64,
    #[serde(default = "default_time_weight")]
    pub time: f64,
    #[serde(default = "default_category_bonus")]
    pub category_bonus: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            distance: default_distance_weight(),
            strength: default_strength_weight(),
            time: default_time_weight(),
            category_bonus: default_category_bonus(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            distance: config.distance,
            strength: config.strength,
            time: config.time,
            category_bonus: config.category_bonus,
        }
    }
}

fn default_distance_weight() -> f64 { 0.5 }
fn default_strength_weight() -> f64 { 0.3 }
fn default_time_weight() -> f64 { 0.2 }
fn default_category_bonus() -> f64 { 0.2 }

#[derive(Debug, Clone, Deserialize)]
pub struct ContactSettings {
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
    #[serde(default = "default_rate_window")]
    pub rate_window_secs: u64,
    #[serde(default = "default_rate_capacity")]
    pub rate_limit_capacity: usize,
    #[serde(default = "default_eviction_interval")]
    pub eviction_interval_secs: u64,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            default_country_code: default_country_code(),
            rate_limit: default_rate_limit(),
            rate_window_secs: default_rate_window(),
            rate_limit_capacity: default_rate_capacity(),
            eviction_interval_secs: default_eviction_interval(),
        }
    }
}

fn default_country_code() -> String { "+49".to_string() }
fn default_rate_limit() -> u32 { 6 }
fn default_rate_window() -> u64 { 60 }
fn default_rate_capacity() -> usize { 10_000 }
fn default_eviction_interval() -> u64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATCHBUDDY_)
    /// 5. `PORT`, as set by container platforms
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATCHBUDDY__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MATCHBUDDY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.recommendation.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MATCHBUDDY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.recommendation.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
    }

    #[test]
    fn test_default_policy() {
        let policy = RecommendationSettings::default().policy();
        assert_eq!(policy, RecommendationPolicy::default());
    }

    #[test]
    fn test_default_recommendation_is_valid() {
        assert!(RecommendationSettings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_radius_step() {
        for step in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let settings = RecommendationSettings {
                radius_step_km: step,
                ..RecommendationSettings::default()
            };
            assert!(settings.validate().is_err(), "step {}", step);
        }
    }

    #[test]
    fn test_rejects_negative_radius() {
        let settings = RecommendationSettings {
            max_radius_km: -1.0,
            ..RecommendationSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_rejects_zero_radius_step() {
        let path = std::env::temp_dir().join(format!("matchbuddy-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[server]\nhost = \"127.0.0.1\"\nport = 9000\n\n[recommendation]\nradius_step_km = 0.0\n",
        )
        .unwrap();

        let result = Settings::load_from(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    fn test_default_contact() {
        let contact = ContactSettings::default();
        assert_eq!(contact.default_country_code, "+49");
        assert_eq!(contact.rate_limit, 6);
        assert_eq!(contact.rate_window_secs, 60);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_sections_fall_back_to_defaults() {
        let settings: Settings = Config::builder()
            .set_override("server.host", "127.0.0.1")
            .unwrap()
            .set_override("server.port", 9000)
            .unwrap()
            .set_override("recommendation.base_radius_km", 20.0)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.recommendation.base_radius_km, 20.0);
        assert_eq!(settings.recommendation.max_radius_km, 50.0);
        assert_eq!(settings.contact.rate_limit, 6);
    }
}
