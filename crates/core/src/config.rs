//! Engine configuration.
//!
//! Every struct deserializes with defaults so a loader can hand over the
//! `config` section of the project file as-is. [`EngineConfig::from_env`]
//! layers environment overrides on top of the defaults.

use serde::{Deserialize, Serialize};

use crate::diagnostic::Severity;
use crate::error::CoreError;
use crate::model::Layer;

/// Configurable severity of an optional rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Error,
    Warn,
    Info,
    Ignore,
}

impl RuleSeverity {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "ignore" => Ok(Self::Ignore),
            other => Err(CoreError::Config(format!(
                "Invalid rule severity '{other}'. Must be one of: error, warn, info, ignore"
            ))),
        }
    }

    /// The diagnostic severity to emit, or `None` when the rule is ignored.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::Error => Some(Severity::Error),
            Self::Warn => Some(Severity::Warning),
            Self::Info => Some(Severity::Info),
            Self::Ignore => None,
        }
    }
}

/// Allowed governance values. A field left as `None` is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    pub confidentiality: Option<Vec<String>>,
    pub maturity: Option<Vec<String>>,
    pub regulatory_tags: Option<Vec<String>>,
}

impl Taxonomy {
    fn allows(allowed: &Option<Vec<String>>, value: &str) -> bool {
        allowed
            .as_ref()
            .map_or(true, |values| values.iter().any(|v| v == value))
    }

    pub fn allows_confidentiality(&self, value: &str) -> bool {
        Self::allows(&self.confidentiality, value)
    }

    pub fn allows_maturity(&self, value: &str) -> bool {
        Self::allows(&self.maturity, value)
    }

    pub fn allows_regulatory_tag(&self, value: &str) -> bool {
        Self::allows(&self.regulatory_tags, value)
    }

    fn is_empty(&self) -> bool {
        self.confidentiality.is_none() && self.maturity.is_none() && self.regulatory_tags.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Severity for models tagged with a concept that does not exist.
    pub unknown_concept: RuleSeverity,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            unknown_concept: RuleSeverity::Warn,
        }
    }
}

/// Severity overrides for gold-layer checks. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerOverrides {
    pub orphan_models: Option<RuleSeverity>,
    pub unimplemented_concepts: Option<RuleSeverity>,
    pub missing_descriptions: Option<RuleSeverity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Warn on concepts with no owner after inheritance.
    pub require_owner: bool,
    /// Treat warnings as failing.
    pub strict: bool,
    /// Report every enrichment finding as an error.
    pub no_drafts: bool,
    pub orphan_models: RuleSeverity,
    pub unimplemented_concepts: RuleSeverity,
    pub missing_descriptions: RuleSeverity,
    pub empty_domains: RuleSeverity,
    /// Stub and draft concepts missing metadata, and stub relationships.
    pub enrichment: RuleSeverity,
    pub gold: LayerOverrides,
    /// Taxonomy enforcement is enabled when present.
    pub taxonomy: Option<Taxonomy>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_owner: false,
            strict: false,
            no_drafts: false,
            orphan_models: RuleSeverity::Warn,
            unimplemented_concepts: RuleSeverity::Warn,
            missing_descriptions: RuleSeverity::Ignore,
            empty_domains: RuleSeverity::Warn,
            enrichment: RuleSeverity::Info,
            gold: LayerOverrides::default(),
            taxonomy: None,
        }
    }
}

impl ValidationConfig {
    /// Severity for an orphan model found in `layer`.
    pub fn orphan_severity(&self, layer: Layer) -> Option<Severity> {
        Self::layered(self.orphan_models, self.gold.orphan_models, layer)
    }

    /// Concept checks are judged at the gold layer, where a concept is
    /// finished, so a gold override always applies.
    pub fn unimplemented_severity(&self) -> Option<Severity> {
        Self::layered(
            self.unimplemented_concepts,
            self.gold.unimplemented_concepts,
            Layer::Gold,
        )
    }

    pub fn missing_description_severity(&self) -> Option<Severity> {
        Self::layered(
            self.missing_descriptions,
            self.gold.missing_descriptions,
            Layer::Gold,
        )
    }

    /// `no_drafts` turns every enrichment finding into an error, even when
    /// the rule is otherwise ignored.
    pub fn enrichment_severity(&self) -> Option<Severity> {
        if self.no_drafts {
            Some(Severity::Error)
        } else {
            self.enrichment.severity()
        }
    }

    fn layered(
        default: RuleSeverity,
        gold: Option<RuleSeverity>,
        layer: Layer,
    ) -> Option<Severity> {
        match (layer, gold) {
            (Layer::Gold, Some(severity)) => severity,
            _ => default,
        }
        .severity()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sync: SyncConfig,
    pub validation: ValidationConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                              | Default  |
    /// |--------------------------------------|----------|
    /// | `CONCEPTUAL_REQUIRE_OWNER`           | `false`  |
    /// | `CONCEPTUAL_STRICT`                  | `false`  |
    /// | `CONCEPTUAL_NO_DRAFTS`               | `false`  |
    /// | `CONCEPTUAL_UNKNOWN_CONCEPT`         | `warn`   |
    /// | `CONCEPTUAL_ORPHAN_MODELS`           | `warn`   |
    /// | `CONCEPTUAL_UNIMPLEMENTED_CONCEPTS`  | `warn`   |
    /// | `CONCEPTUAL_MISSING_DESCRIPTIONS`    | `ignore` |
    /// | `CONCEPTUAL_EMPTY_DOMAINS`           | `warn`   |
    /// | `CONCEPTUAL_ENRICHMENT`              | `info`   |
    /// | `CONCEPTUAL_GOLD_ORPHAN_MODELS`      | unset    |
    /// | `CONCEPTUAL_GOLD_UNIMPLEMENTED_CONCEPTS` | unset |
    /// | `CONCEPTUAL_GOLD_MISSING_DESCRIPTIONS` | unset |
    /// | `CONCEPTUAL_ALLOWED_CONFIDENTIALITY` | unset    |
    /// | `CONCEPTUAL_ALLOWED_MATURITY`        | unset    |
    /// | `CONCEPTUAL_ALLOWED_REGULATORY_TAGS` | unset    |
    ///
    /// The `ALLOWED_*` variables are comma-separated; setting any of them
    /// enables taxonomy enforcement.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ValidationConfig::default();

        let flag = |key: &str| -> Result<bool, CoreError> {
            match lookup(key) {
                None => Ok(false),
                Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                    "1" | "true" | "yes" => Ok(true),
                    "0" | "false" | "no" | "" => Ok(false),
                    other => Err(CoreError::Config(format!(
                        "{key} must be a boolean, got '{other}'"
                    ))),
                },
            }
        };
        let severity = |key: &str, default: RuleSeverity| -> Result<RuleSeverity, CoreError> {
            lookup(key).map_or(Ok(default), |raw| RuleSeverity::from_str_value(&raw))
        };
        let overridden = |key: &str| -> Result<Option<RuleSeverity>, CoreError> {
            lookup(key)
                .map(|raw| RuleSeverity::from_str_value(&raw))
                .transpose()
        };
        let list = |key: &str| -> Option<Vec<String>> {
            lookup(key).map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
        };

        let taxonomy = Taxonomy {
            confidentiality: list("CONCEPTUAL_ALLOWED_CONFIDENTIALITY"),
            maturity: list("CONCEPTUAL_ALLOWED_MATURITY"),
            regulatory_tags: list("CONCEPTUAL_ALLOWED_REGULATORY_TAGS"),
        };

        Ok(Self {
            sync: SyncConfig {
                unknown_concept: severity(
                    "CONCEPTUAL_UNKNOWN_CONCEPT",
                    SyncConfig::default().unknown_concept,
                )?,
            },
            validation: ValidationConfig {
                require_owner: flag("CONCEPTUAL_REQUIRE_OWNER")?,
                strict: flag("CONCEPTUAL_STRICT")?,
                no_drafts: flag("CONCEPTUAL_NO_DRAFTS")?,
                orphan_models: severity("CONCEPTUAL_ORPHAN_MODELS", defaults.orphan_models)?,
                unimplemented_concepts: severity(
                    "CONCEPTUAL_UNIMPLEMENTED_CONCEPTS",
                    defaults.unimplemented_concepts,
                )?,
                missing_descriptions: severity(
                    "CONCEPTUAL_MISSING_DESCRIPTIONS",
                    defaults.missing_descriptions,
                )?,
                empty_domains: severity("CONCEPTUAL_EMPTY_DOMAINS", defaults.empty_domains)?,
                enrichment: severity("CONCEPTUAL_ENRICHMENT", defaults.enrichment)?,
                gold: LayerOverrides {
                    orphan_models: overridden("CONCEPTUAL_GOLD_ORPHAN_MODELS")?,
                    unimplemented_concepts: overridden("CONCEPTUAL_GOLD_UNIMPLEMENTED_CONCEPTS")?,
                    missing_descriptions: overridden("CONCEPTUAL_GOLD_MISSING_DESCRIPTIONS")?,
                },
                taxonomy: (!taxonomy.is_empty()).then_some(taxonomy),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.sync.unknown_concept, RuleSeverity::Warn);
        assert_eq!(config.validation.missing_descriptions, RuleSeverity::Ignore);
        assert!(config.validation.taxonomy.is_none());
    }

    #[test]
    fn reads_flags_and_severities() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("CONCEPTUAL_REQUIRE_OWNER", "true"),
            ("CONCEPTUAL_STRICT", "1"),
            ("CONCEPTUAL_UNKNOWN_CONCEPT", "info"),
            ("CONCEPTUAL_ORPHAN_MODELS", "ignore"),
        ]))
        .unwrap();
        assert!(config.validation.require_owner);
        assert!(config.validation.strict);
        assert_eq!(config.sync.unknown_concept, RuleSeverity::Info);
        assert_eq!(config.validation.orphan_models, RuleSeverity::Ignore);
    }

    #[test]
    fn reads_no_drafts_and_gold_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("CONCEPTUAL_NO_DRAFTS", "yes"),
            ("CONCEPTUAL_GOLD_ORPHAN_MODELS", "error"),
            ("CONCEPTUAL_GOLD_MISSING_DESCRIPTIONS", "warn"),
        ]))
        .unwrap();
        let validation = &config.validation;
        assert!(validation.no_drafts);
        assert_eq!(validation.gold.orphan_models, Some(RuleSeverity::Error));
        assert_eq!(validation.gold.unimplemented_concepts, None);
        assert_eq!(validation.enrichment_severity(), Some(Severity::Error));
        assert_eq!(validation.orphan_severity(Layer::Gold), Some(Severity::Error));
        assert_eq!(validation.orphan_severity(Layer::Bronze), Some(Severity::Warning));
        assert_eq!(validation.missing_description_severity(), Some(Severity::Warning));
        assert_eq!(validation.unimplemented_severity(), Some(Severity::Warning));

        assert_matches!(
            EngineConfig::from_lookup(lookup(&[("CONCEPTUAL_GOLD_ORPHAN_MODELS", "loud")])),
            Err(CoreError::Config(_))
        );
    }

    #[test]
    fn gold_override_can_silence_a_rule() {
        let config = ValidationConfig {
            unimplemented_concepts: RuleSeverity::Error,
            gold: LayerOverrides {
                unimplemented_concepts: Some(RuleSeverity::Ignore),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.unimplemented_severity(), None);
        assert_eq!(config.enrichment_severity(), Some(Severity::Info));

        let ignored = ValidationConfig {
            enrichment: RuleSeverity::Ignore,
            ..Default::default()
        };
        assert_eq!(ignored.enrichment_severity(), None);
        let strict = ValidationConfig {
            no_drafts: true,
            ..ignored
        };
        assert_eq!(strict.enrichment_severity(), Some(Severity::Error));
    }

    #[test]
    fn allowed_lists_enable_taxonomy() {
        let config = EngineConfig::from_lookup(lookup(&[(
            "CONCEPTUAL_ALLOWED_CONFIDENTIALITY",
            "public, internal ,confidential,",
        )]))
        .unwrap();
        let taxonomy = config.validation.taxonomy.unwrap();
        assert!(taxonomy.allows_confidentiality("internal"));
        assert!(!taxonomy.allows_confidentiality("secret"));
        assert!(taxonomy.allows_maturity("anything"));
    }

    #[test]
    fn rejects_bad_values() {
        assert_matches!(
            EngineConfig::from_lookup(lookup(&[("CONCEPTUAL_STRICT", "maybe")])),
            Err(CoreError::Config(msg)) if msg.contains("CONCEPTUAL_STRICT")
        );
        assert_matches!(
            EngineConfig::from_lookup(lookup(&[("CONCEPTUAL_EMPTY_DOMAINS", "loud")])),
            Err(CoreError::Config(_))
        );
    }

    #[test]
    fn deserializes_partial_section() {
        let config: EngineConfig = serde_json::from_value(serde_json::json!({
            "validation": {
                "require_owner": true,
                "gold": {"orphan_models": "error"},
                "taxonomy": {"maturity": ["draft", "stable"]}
            }
        }))
        .unwrap();
        assert!(config.validation.require_owner);
        assert_eq!(config.validation.gold.orphan_models, Some(RuleSeverity::Error));
        assert_eq!(config.validation.orphan_models, RuleSeverity::Warn);
        assert_eq!(config.validation.enrichment, RuleSeverity::Info);
        let taxonomy = config.validation.taxonomy.unwrap();
        assert!(!taxonomy.allows_maturity("experimental"));
    }
}
