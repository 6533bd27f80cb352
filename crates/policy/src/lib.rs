use regex::Regex;
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use namegov_core::{mandatory_tags, NamingError, NamingInput, NamingOutput};

/// ALB/NLB names are capped at 32 characters; the tightest constraint any
/// resource in the table inherits from AWS.
pub const ALB_NAME_LIMIT: usize = 32;
/// Longest type suffix the suffixed policy budgets for (`-alb`, `-rds`, ...).
const TYPE_SUFFIX_BUDGET: usize = 4;
/// Characters the suffixed policy leaves free for ad hoc engineer suffixes.
const DEVELOPER_BUFFER: usize = 6;

static PRODUCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z][a-z0-9]{2,7}$").unwrap());
static APPLICATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z][a-z0-9-]*[a-z0-9]$").unwrap());
static REPOSITORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9][a-z0-9-_]*[a-z0-9]$").unwrap());
static PREFIX_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9-]+$").unwrap());

const APPLICATION_MIN: usize = 3;
const APPLICATION_MAX: usize = 20;
const REPOSITORY_MIN: usize = 2;
const REPOSITORY_MAX: usize = 100;

/// The two naming policies in circulation. They differ only in how much of
/// the 32-character ALB limit the prefix may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all="kebab-case")]
pub enum PolicyVariant {
    /// Legacy: names carry type suffixes and a developer suffix buffer is
    /// held back, so the prefix gets 32 - 4 - 6 = 22 characters.
    Suffixed,
    /// Current: resource types are disambiguated by tags, the prefix may use
    /// the full 32 characters.
    #[default]
    TagBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamingPolicy {
    variant: PolicyVariant,
}

impl NamingPolicy {
    pub fn new(variant: PolicyVariant) -> Self {
        Self { variant }
    }

    pub fn suffixed() -> Self {
        Self::new(PolicyVariant::Suffixed)
    }

    pub fn tag_based() -> Self {
        Self::new(PolicyVariant::TagBased)
    }

    pub fn variant(&self) -> PolicyVariant {
        self.variant
    }

    pub fn max_prefix_len(&self) -> usize {
        match self.variant {
            PolicyVariant::Suffixed => ALB_NAME_LIMIT - TYPE_SUFFIX_BUDGET - DEVELOPER_BUFFER,
            PolicyVariant::TagBased => ALB_NAME_LIMIT,
        }
    }

    /// Validate the input, compose the prefix, check it against the policy,
    /// and derive every name and tag map. Fails without partial output.
    pub fn evaluate(&self, input: &NamingInput) -> Result<NamingOutput, NamingError> {
        validate_fields(input)?;

        let prefix = format!(
            "{}-{}-{}",
            input.product,
            input.environment.code(),
            input.application
        );
        self.check_prefix(&prefix)?;
        tracing::debug!(%prefix, variant = ?self.variant, "prefix accepted");

        let name = namegov_aws::name_map(&prefix);
        let name_tag = namegov_aws::name_tag_map(&prefix);
        let tags = mandatory_tags(input);

        let mut tags_with_name = BTreeMap::new();
        for (key, resource_name) in &name_tag {
            let mut entry = tags.clone();
            entry.insert("Name".to_string(), resource_name.clone());
            tags_with_name.insert(key.clone(), entry);
        }

        Ok(NamingOutput {
            prefix,
            environment_display: input.environment.display_name().to_string(),
            name,
            name_tag,
            mandatory_tags: tags,
            tags_with_name,
        })
    }

    /// The four prefix predicates. First violation aborts.
    pub fn check_prefix(&self, prefix: &str) -> Result<(), NamingError> {
        let max = self.max_prefix_len();
        if prefix.len() > max {
            return Err(NamingError::PrefixTooLong {
                prefix: prefix.to_string(),
                length: prefix.len(),
                max,
                excess: prefix.len() - max,
            });
        }
        if !PREFIX_CHARSET_RE.is_match(prefix) {
            return Err(NamingError::PrefixCharset { prefix: prefix.to_string() });
        }
        if prefix.starts_with('-') || prefix.ends_with('-') {
            return Err(NamingError::PrefixEdgeHyphen { prefix: prefix.to_string() });
        }
        if prefix.contains("--") {
            return Err(NamingError::PrefixDoubledHyphen { prefix: prefix.to_string() });
        }
        Ok(())
    }
}

fn validate_fields(input: &NamingInput) -> Result<(), NamingError> {
    validate_product(&input.product)?;
    validate_application(&input.application)?;
    validate_repository(&input.repository)?;
    Ok(())
}

fn validate_product(product: &str) -> Result<(), NamingError> {
    if !PRODUCT_RE.is_match(product) {
        return Err(NamingError::InvalidField {
            field: "product",
            value: product.to_string(),
            rule: "must be 3-8 lowercase alphanumeric characters starting with a letter".to_string(),
        });
    }
    Ok(())
}

fn validate_application(application: &str) -> Result<(), NamingError> {
    if application.len() < APPLICATION_MIN || application.len() > APPLICATION_MAX {
        return Err(NamingError::InvalidField {
            field: "application",
            value: application.to_string(),
            rule: format!("must be {APPLICATION_MIN}-{APPLICATION_MAX} characters"),
        });
    }
    if !APPLICATION_RE.is_match(application) || application.contains("--") {
        return Err(NamingError::InvalidField {
            field: "application",
            value: application.to_string(),
            rule: "must be lowercase alphanumeric with single interior hyphens, starting with a letter and ending alphanumeric".to_string(),
        });
    }
    Ok(())
}

fn validate_repository(repository: &str) -> Result<(), NamingError> {
    if repository.len() < REPOSITORY_MIN || repository.len() > REPOSITORY_MAX {
        return Err(NamingError::InvalidField {
            field: "repository",
            value: repository.to_string(),
            rule: format!("must be {REPOSITORY_MIN}-{REPOSITORY_MAX} characters"),
        });
    }
    if !REPOSITORY_RE.is_match(repository) {
        return Err(NamingError::InvalidField {
            field: "repository",
            value: repository.to_string(),
            rule: "must be lowercase alphanumeric with interior hyphens or underscores, ending alphanumeric".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use namegov_core::{BackupTier, Criticality, Environment, Layer};

    fn input(product: &str, environment: Environment, application: &str) -> NamingInput {
        NamingInput {
            product: product.to_string(),
            environment,
            application: application.to_string(),
            criticality: Criticality::High,
            backup: BackupTier::Tier1,
            layer: Layer::Application,
            repository: "whub-terraform".to_string(),
            additional_tags: BTreeMap::new(),
        }
    }

    #[test]
    fn short_prefix_scenario() {
        let out = NamingPolicy::tag_based()
            .evaluate(&input("whub", Environment::Staging, "api"))
            .unwrap();
        assert_eq!(out.prefix, "whub-s-api");
        assert_eq!(out.environment_display, "staging");
        assert_eq!(out.mandatory_tags["Environment"], "staging");
        assert_eq!(out.mandatory_tags["ManagedBy"], "Terraform");
    }

    #[test]
    fn prefix_is_the_hyphen_joined_triple() {
        let out = NamingPolicy::tag_based()
            .evaluate(&input("pay", Environment::Nonprod, "ledger"))
            .unwrap();
        assert_eq!(out.prefix, "pay-np-ledger");
    }

    #[test]
    fn evaluation_is_deterministic() {
        let inp = input("whub", Environment::Production, "checkout");
        let policy = NamingPolicy::suffixed();
        let a = serde_json::to_string(&policy.evaluate(&inp).unwrap()).unwrap();
        let b = serde_json::to_string(&policy.evaluate(&inp).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn uppercase_product_is_rejected() {
        let err = NamingPolicy::tag_based()
            .evaluate(&input("WHub", Environment::Staging, "api"))
            .unwrap_err();
        assert!(matches!(err, NamingError::InvalidField { field: "product", .. }));
    }

    #[test]
    fn doubled_hyphen_application_is_rejected() {
        let err = NamingPolicy::tag_based()
            .evaluate(&input("whub", Environment::Staging, "web--api"))
            .unwrap_err();
        assert!(matches!(err, NamingError::InvalidField { field: "application", .. }));
    }

    #[test]
    fn edge_hyphen_applications_are_rejected() {
        for app in ["-api", "api-"] {
            let err = NamingPolicy::tag_based()
                .evaluate(&input("whub", Environment::Staging, app))
                .unwrap_err();
            assert!(matches!(err, NamingError::InvalidField { field: "application", .. }));
        }
    }

    #[test]
    fn repository_rules() {
        let mut inp = input("whub", Environment::Staging, "api");
        inp.repository = "Whub-Terraform".to_string();
        assert!(matches!(
            NamingPolicy::tag_based().evaluate(&inp).unwrap_err(),
            NamingError::InvalidField { field: "repository", .. }
        ));
        inp.repository = "x".to_string();
        assert!(NamingPolicy::tag_based().evaluate(&inp).is_err());
        inp.repository = "whub_infra-live".to_string();
        assert!(NamingPolicy::tag_based().evaluate(&inp).is_ok());
    }

    #[test]
    fn suffixed_ceiling_is_inclusive_at_22() {
        let policy = NamingPolicy::suffixed();
        assert_eq!(policy.max_prefix_len(), 22);

        // whub-s-<15 chars> == 22 characters
        let ok = input("whub", Environment::Staging, "abcdefghijklmno");
        let out = policy.evaluate(&ok).unwrap();
        assert_eq!(out.prefix.len(), 22);

        // one more character tips it over
        let over = input("whub", Environment::Staging, "abcdefghijklmnop");
        match policy.evaluate(&over).unwrap_err() {
            NamingError::PrefixTooLong { length, max, excess, .. } => {
                assert_eq!(length, 23);
                assert_eq!(max, 22);
                assert_eq!(excess, 1);
            }
            other => panic!("expected PrefixTooLong, got {other:?}"),
        }
    }

    #[test]
    fn tag_based_ceiling_admits_the_widest_valid_input() {
        let policy = NamingPolicy::tag_based();
        assert_eq!(policy.max_prefix_len(), 32);

        // 8-char product + "pp" + 20-char application == exactly 32
        let widest = input("abcdefgh", Environment::Preprod, "abcdefghijklmnopqrst");
        let out = policy.evaluate(&widest).unwrap();
        assert_eq!(out.prefix.len(), 32);

        // the same input fails under the suffixed policy
        assert!(matches!(
            NamingPolicy::suffixed().evaluate(&widest).unwrap_err(),
            NamingError::PrefixTooLong { .. }
        ));
    }

    #[test]
    fn check_prefix_rejects_malformed_values_directly() {
        let policy = NamingPolicy::tag_based();
        assert!(matches!(
            policy.check_prefix("whub-s-API").unwrap_err(),
            NamingError::PrefixCharset { .. }
        ));
        assert!(matches!(
            policy.check_prefix("-whub-s-api").unwrap_err(),
            NamingError::PrefixEdgeHyphen { .. }
        ));
        assert!(matches!(
            policy.check_prefix("whub-s--api").unwrap_err(),
            NamingError::PrefixDoubledHyphen { .. }
        ));
        assert!(policy.check_prefix("whub-s-api").is_ok());
    }

    #[test]
    fn no_output_is_produced_on_failure() {
        let result = NamingPolicy::tag_based()
            .evaluate(&input("whub", Environment::Staging, "a--b"));
        assert!(result.is_err());
    }

    #[test]
    fn tags_with_name_pairs_every_name_tag_resource() {
        let out = NamingPolicy::tag_based()
            .evaluate(&input("whub", Environment::Staging, "api"))
            .unwrap();
        assert_eq!(out.tags_with_name.len(), out.name_tag.len());
        let vpc = &out.tags_with_name["vpc"];
        assert_eq!(vpc["Name"], "whub-s-api-vpc");
        assert_eq!(vpc["Environment"], "staging");
        assert_eq!(vpc["ManagedBy"], "Terraform");
    }

    #[test]
    fn additional_tags_override_inside_tags_with_name() {
        let mut inp = input("whub", Environment::Staging, "api");
        inp.additional_tags.insert("Application".to_string(), "override".to_string());
        let out = NamingPolicy::tag_based().evaluate(&inp).unwrap();
        assert_eq!(out.mandatory_tags["Application"], "override");
        assert_eq!(out.tags_with_name["vpc"]["Application"], "override");
    }
}
