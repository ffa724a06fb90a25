use crate::analyze::accrual::AccrualParams;
use crate::analyze::necessity::NecessityOverrides;
use crate::analyze::EngineSettings;
use crate::error::JudgeError;
use crate::types::scoring::{Criterion, Intent};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CACHE_DIR: &str = ".judge/cache";
pub const DEFAULT_AGENT_VERSION: &str = "v1";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JudgeConfig {
    pub engine: Option<EngineConfig>,
    pub cache: Option<CacheConfig>,
    pub service: Option<ServiceConfig>,
    pub necessity: Option<HashMap<String, HashMap<String, f64>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub reward_scale: Option<f64>,
    pub penalty_scale: Option<f64>,
    pub harm_floor: Option<f64>,
    pub low_necessity_threshold: Option<f64>,
    pub default_intent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub dir: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub agent_version: Option<String>,
}

impl JudgeConfig {
    pub fn accrual_params(&self) -> AccrualParams {
        let defaults = AccrualParams::default();
        match &self.engine {
            Some(engine) => AccrualParams {
                reward_scale: engine.reward_scale.unwrap_or(defaults.reward_scale),
                penalty_scale: engine.penalty_scale.unwrap_or(defaults.penalty_scale),
                harm_floor: engine.harm_floor.unwrap_or(defaults.harm_floor),
                low_necessity_threshold: engine
                    .low_necessity_threshold
                    .unwrap_or(defaults.low_necessity_threshold),
            },
            None => defaults,
        }
    }

    pub fn default_intent(&self) -> Intent {
        self.engine
            .as_ref()
            .and_then(|engine| engine.default_intent.as_deref())
            .and_then(|value| value.parse().ok())
            .unwrap_or(Intent::Brief)
    }

    pub fn necessity_overrides(&self) -> NecessityOverrides {
        let mut overrides = NecessityOverrides::new();
        let Some(tables) = &self.necessity else {
            return overrides;
        };
        for (intent, cells) in tables {
            let Ok(intent) = intent.parse::<Intent>() else {
                continue;
            };
            let row = overrides.entry(intent).or_default();
            for (criterion, weight) in cells {
                if let Ok(criterion) = criterion.parse::<Criterion>() {
                    row.insert(criterion, *weight);
                }
            }
        }
        overrides
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            params: self.accrual_params(),
            default_intent: self.default_intent(),
            overrides: self.necessity_overrides(),
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.as_ref().map(|cache| cache.enabled).unwrap_or(true)
    }

    pub fn cache_dir(&self, root: &Path) -> PathBuf {
        let configured = self
            .cache
            .as_ref()
            .and_then(|cache| cache.dir.as_deref())
            .unwrap_or(DEFAULT_CACHE_DIR);
        let candidate = PathBuf::from(configured);
        if candidate.is_absolute() {
            candidate
        } else {
            root.join(candidate)
        }
    }

    pub fn agent_version(&self) -> String {
        self.service
            .as_ref()
            .and_then(|service| service.agent_version.clone())
            .unwrap_or_else(|| DEFAULT_AGENT_VERSION.to_string())
    }

    pub fn validate(&self) -> Result<(), JudgeError> {
        if let Some(engine) = &self.engine {
            for (key, value) in [
                ("engine.reward_scale", engine.reward_scale),
                ("engine.penalty_scale", engine.penalty_scale),
            ] {
                if let Some(value) = value {
                    if !value.is_finite() || value <= 0.0 {
                        return Err(JudgeError::ConfigParse(format!(
                            "{key} must be a positive number (found {value})"
                        )));
                    }
                }
            }
            for (key, value) in [
                ("engine.harm_floor", engine.harm_floor),
                ("engine.low_necessity_threshold", engine.low_necessity_threshold),
            ] {
                if let Some(value) = value {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(JudgeError::ConfigParse(format!(
                            "{key} must be between 0.0 and 1.0"
                        )));
                    }
                }
            }
            if let Some(default_intent) = &engine.default_intent {
                default_intent.parse::<Intent>().map_err(|_| {
                    JudgeError::ConfigParse(format!(
                        "unsupported engine.default_intent: {default_intent}"
                    ))
                })?;
            }
        }

        if let Some(service) = &self.service {
            if let Some(version) = &service.agent_version {
                if version.trim().is_empty() {
                    return Err(JudgeError::ConfigParse(
                        "service.agent_version cannot be empty".to_string(),
                    ));
                }
            }
        }

        if let Some(tables) = &self.necessity {
            for (intent, cells) in tables {
                if intent.parse::<Intent>().is_err() {
                    return Err(JudgeError::ConfigParse(format!(
                        "necessity contains unknown intent: {intent}"
                    )));
                }
                let mut unknown = cells
                    .keys()
                    .filter(|key| key.parse::<Criterion>().is_err())
                    .cloned()
                    .collect::<Vec<_>>();
                if !unknown.is_empty() {
                    unknown.sort();
                    return Err(JudgeError::ConfigParse(format!(
                        "necessity.{intent} contains unknown criterion key(s): {}",
                        unknown.join(", ")
                    )));
                }
                if let Some((criterion, weight)) = cells
                    .iter()
                    .find(|(_, weight)| !(0.0..=1.0).contains(*weight))
                {
                    return Err(JudgeError::ConfigParse(format!(
                        "necessity.{intent}.{criterion} must be between 0.0 and 1.0 (found {weight})"
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: JudgeConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(cfg.accrual_params(), AccrualParams::default());
        assert_eq!(cfg.default_intent(), Intent::Brief);
        assert!(cfg.cache_enabled());
        assert_eq!(cfg.agent_version(), "v1");
        assert_eq!(
            cfg.cache_dir(Path::new("/work")),
            PathBuf::from("/work/.judge/cache")
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[engine]
reward_scale = 4.0
penalty_scale = 5.0
harm_floor = 0.6
low_necessity_threshold = 0.25
default_intent = "hard_news"

[cache]
dir = "/var/cache/judge"
enabled = false

[service]
agent_version = "v2"

[necessity.opinion]
attribution_evidence = 0.75
"#;
        let cfg: JudgeConfig = toml::from_str(toml_str).expect("full config should parse");
        assert!(cfg.validate().is_ok());

        let params = cfg.accrual_params();
        assert_eq!(params.reward_scale, 4.0);
        assert_eq!(params.penalty_scale, 5.0);
        assert_eq!(params.harm_floor, 0.6);
        assert_eq!(params.low_necessity_threshold, 0.25);
        assert_eq!(cfg.default_intent(), Intent::HardNews);
        assert!(!cfg.cache_enabled());
        assert_eq!(
            cfg.cache_dir(Path::new("/work")),
            PathBuf::from("/var/cache/judge")
        );
        assert_eq!(cfg.agent_version(), "v2");

        let overrides = cfg.necessity_overrides();
        assert_eq!(
            overrides
                .get(&Intent::Opinion)
                .and_then(|row| row.get(&Criterion::AttributionEvidence))
                .copied(),
            Some(0.75)
        );
    }

    #[test]
    fn validate_rejects_non_positive_scale() {
        let cfg: JudgeConfig = toml::from_str(
            r#"
[engine]
penalty_scale = 0.0
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("engine.penalty_scale"));
    }

    #[test]
    fn validate_rejects_harm_floor_out_of_range() {
        let cfg: JudgeConfig = toml::from_str(
            r#"
[engine]
harm_floor = 1.5
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("engine.harm_floor"));
    }

    #[test]
    fn validate_rejects_unknown_default_intent() {
        let cfg: JudgeConfig = toml::from_str(
            r#"
[engine]
default_intent = "satire"
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("unsupported engine.default_intent"));
    }

    #[test]
    fn validate_rejects_unknown_necessity_keys() {
        let cfg: JudgeConfig = toml::from_str(
            r#"
[necessity.hard_news]
clarity_coherence = 0.9
vibes = 0.1
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("unknown criterion"));
        assert!(err.to_string().contains("vibes"));

        let cfg: JudgeConfig = toml::from_str(
            r#"
[necessity.satire]
clarity_coherence = 0.9
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("unknown intent"));
    }

    #[test]
    fn validate_rejects_out_of_range_necessity_weight() {
        let cfg: JudgeConfig = toml::from_str(
            r#"
[necessity.brief]
civic_utility = 1.4
"#,
        )
        .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("necessity.brief.civic_utility"));
    }

    #[test]
    fn validate_accepts_boundaries() {
        let cfg: JudgeConfig = toml::from_str(
            r#"
[engine]
harm_floor = 0.0
low_necessity_threshold = 1.0

[necessity.live_blog]
multidisciplinarity = 0.0
five_w_one_h = 1.0
"#,
        )
        .expect("config should parse");
        assert!(cfg.validate().is_ok());
    }
}
