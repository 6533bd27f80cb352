use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Value of the ManagedBy tag on every resource this module names.
pub const MANAGED_BY: &str = "Terraform";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("invalid {field} '{value}': {rule}")]
    InvalidField { field: &'static str, value: String, rule: String },
    #[error("unknown environment code '{code}'; registered codes are p, pp, np, s, u, t, d")]
    UnknownEnvironment { code: String },
    #[error("prefix '{prefix}' is {length} characters, {excess} over the {max} limit; shorten the application name or use a shorter product code")]
    PrefixTooLong { prefix: String, length: usize, max: usize, excess: usize },
    #[error("prefix '{prefix}' contains characters outside [a-z0-9-]; supply lowercase input only")]
    PrefixCharset { prefix: String },
    #[error("prefix '{prefix}' must not begin or end with a hyphen")]
    PrefixEdgeHyphen { prefix: String },
    #[error("prefix '{prefix}' must not contain consecutive hyphens")]
    PrefixDoubledHyphen { prefix: String },
}

/// Environment short codes. Display names live in the same enum, so the
/// registry cannot drift from the set of accepted codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    #[serde(rename="p")]  Production,
    #[serde(rename="pp")] Preprod,
    #[serde(rename="np")] Nonprod,
    #[serde(rename="s")]  Staging,
    #[serde(rename="u")]  Uat,
    #[serde(rename="t")]  Test,
    #[serde(rename="d")]  Development,
}

impl Environment {
    pub const ALL: [Environment; 7] = [
        Environment::Production,
        Environment::Preprod,
        Environment::Nonprod,
        Environment::Staging,
        Environment::Uat,
        Environment::Test,
        Environment::Development,
    ];

    /// Short code used inside resource names.
    pub fn code(&self) -> &'static str {
        match self {
            Environment::Production  => "p",
            Environment::Preprod     => "pp",
            Environment::Nonprod     => "np",
            Environment::Staging     => "s",
            Environment::Uat         => "u",
            Environment::Test        => "t",
            Environment::Development => "d",
        }
    }

    /// Human-readable form used in the Environment tag.
    pub fn display_name(&self) -> &'static str {
        match self {
            Environment::Production  => "production",
            Environment::Preprod     => "preprod",
            Environment::Nonprod     => "nonprod",
            Environment::Staging     => "staging",
            Environment::Uat         => "uat",
            Environment::Test        => "test",
            Environment::Development => "development",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, NamingError> {
        Environment::ALL
            .iter()
            .copied()
            .find(|e| e.code() == code)
            .ok_or_else(|| NamingError::UnknownEnvironment { code: code.to_string() })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all="lowercase")]
pub enum Criticality { Critical, High, Medium, Low }

impl Criticality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Critical => "critical",
            Criticality::High     => "high",
            Criticality::Medium   => "medium",
            Criticality::Low      => "low",
        }
    }

    pub fn parse(s: &str) -> Result<Self, NamingError> {
        match s {
            "critical" => Ok(Criticality::Critical),
            "high"     => Ok(Criticality::High),
            "medium"   => Ok(Criticality::Medium),
            "low"      => Ok(Criticality::Low),
            _ => Err(NamingError::InvalidField {
                field: "criticality",
                value: s.to_string(),
                rule: "must be one of critical, high, medium, low".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackupTier {
    #[serde(rename="none")]   None,
    #[serde(rename="tier-1")] Tier1,
    #[serde(rename="tier-2")] Tier2,
    #[serde(rename="tier-3")] Tier3,
}

impl BackupTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupTier::None  => "none",
            BackupTier::Tier1 => "tier-1",
            BackupTier::Tier2 => "tier-2",
            BackupTier::Tier3 => "tier-3",
        }
    }

    pub fn parse(s: &str) -> Result<Self, NamingError> {
        match s {
            "none"   => Ok(BackupTier::None),
            "tier-1" => Ok(BackupTier::Tier1),
            "tier-2" => Ok(BackupTier::Tier2),
            "tier-3" => Ok(BackupTier::Tier3),
            _ => Err(NamingError::InvalidField {
                field: "backup",
                value: s.to_string(),
                rule: "must be one of none, tier-1, tier-2, tier-3".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all="kebab-case")]
pub enum Layer { Governance, SharedInfrastructure, Application }

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Governance           => "governance",
            Layer::SharedInfrastructure => "shared-infrastructure",
            Layer::Application          => "application",
        }
    }

    pub fn parse(s: &str) -> Result<Self, NamingError> {
        match s {
            "governance"            => Ok(Layer::Governance),
            "shared-infrastructure" => Ok(Layer::SharedInfrastructure),
            "application"           => Ok(Layer::Application),
            _ => Err(NamingError::InvalidField {
                field: "layer",
                value: s.to_string(),
                rule: "must be one of governance, shared-infrastructure, application".to_string(),
            }),
        }
    }
}

/// Everything the caller supplies for one evaluation. Immutable; the
/// evaluator never normalizes these values, it only accepts or rejects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingInput {
    pub product: String,
    pub environment: Environment,
    pub application: String,
    pub criticality: Criticality,
    pub backup: BackupTier,
    pub layer: Layer,
    pub repository: String,
    #[serde(default)]
    pub additional_tags: BTreeMap<String, String>,
}

/// The seven mandatory governance tags merged with the caller's additional
/// tags. Additional tags win on key collision.
pub fn mandatory_tags(input: &NamingInput) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    tags.insert("Application".to_string(), input.application.clone());
    tags.insert("Environment".to_string(), input.environment.display_name().to_string());
    tags.insert("Criticality".to_string(), input.criticality.as_str().to_string());
    tags.insert("Backup".to_string(), input.backup.as_str().to_string());
    tags.insert("ManagedBy".to_string(), MANAGED_BY.to_string());
    tags.insert("Layer".to_string(), input.layer.as_str().to_string());
    tags.insert("Repository".to_string(), input.repository.clone());
    for (k, v) in &input.additional_tags {
        tags.insert(k.clone(), v.clone());
    }
    tags
}

/// Full result of one evaluation. All maps are ordered so identical inputs
/// serialize byte-identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingOutput {
    pub prefix: String,
    pub environment_display: String,
    pub name: BTreeMap<String, String>,
    pub name_tag: BTreeMap<String, String>,
    pub mandatory_tags: BTreeMap<String, String>,
    pub tags_with_name: BTreeMap<String, BTreeMap<String, String>>,
}
