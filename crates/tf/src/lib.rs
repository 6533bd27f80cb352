use anyhow::{Context, Result};
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use namegov_core::{NamingInput, NamingOutput};

/// File name Terraform auto-loads from the working directory.
pub const TFVARS_FILE: &str = "namegov.auto.tfvars.json";

/// Decode the query object Terraform's `external` data source sends on
/// stdin. The protocol only carries string values, so `additional_tags`
/// arrives as embedded JSON (`jsonencode(...)` on the Terraform side).
pub fn parse_query(bytes: &[u8]) -> Result<NamingInput> {
    let raw: BTreeMap<String, String> =
        serde_json::from_slice(bytes).context("parse external data source query")?;
    let mut obj = serde_json::Map::new();
    for (k, v) in raw {
        if k == "additional_tags" {
            let tags: Json = serde_json::from_str(&v)
                .context("parse additional_tags as embedded JSON")?;
            obj.insert(k, tags);
        } else {
            obj.insert(k, Json::String(v));
        }
    }
    serde_json::from_value(Json::Object(obj)).context("decode naming input from query")
}

/// Flatten the output into the single-level string map the `external`
/// protocol requires as its result. Nested maps become dotted keys
/// (`name.lambda`, `tags.Environment`, `tags_with_name.vpc.Name`).
pub fn flatten(out: &NamingOutput) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    flat.insert("prefix".to_string(), out.prefix.clone());
    flat.insert("environment_display".to_string(), out.environment_display.clone());
    for (k, v) in &out.name {
        flat.insert(format!("name.{k}"), v.clone());
    }
    for (k, v) in &out.name_tag {
        flat.insert(format!("name_tag.{k}"), v.clone());
    }
    for (k, v) in &out.mandatory_tags {
        flat.insert(format!("tags.{k}"), v.clone());
    }
    for (resource, tags) in &out.tags_with_name {
        for (k, v) in tags {
            flat.insert(format!("tags_with_name.{resource}.{k}"), v.clone());
        }
    }
    flat
}

/// Write the structured output as `namegov.auto.tfvars.json` under `out`,
/// so plain Terraform configurations can consume it without the external
/// provider. Returns the written path.
pub fn write_tfvars_json(output: &NamingOutput, out: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("create output directory {}", out.display()))?;
    let path = out.join(TFVARS_FILE);
    let body = serde_json::to_string_pretty(output)?;
    std::fs::write(&path, body)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use namegov_core::{BackupTier, Criticality, Environment, Layer};

    fn output() -> NamingOutput {
        let mut name = BTreeMap::new();
        name.insert("lambda".to_string(), "whub-s-api-lambda".to_string());
        let mut name_tag = BTreeMap::new();
        name_tag.insert("vpc".to_string(), "whub-s-api-vpc".to_string());
        let mut tags = BTreeMap::new();
        tags.insert("Environment".to_string(), "staging".to_string());
        let mut vpc_tags = tags.clone();
        vpc_tags.insert("Name".to_string(), "whub-s-api-vpc".to_string());
        let mut tags_with_name = BTreeMap::new();
        tags_with_name.insert("vpc".to_string(), vpc_tags);
        NamingOutput {
            prefix: "whub-s-api".to_string(),
            environment_display: "staging".to_string(),
            name,
            name_tag,
            mandatory_tags: tags,
            tags_with_name,
        }
    }

    #[test]
    fn flatten_uses_dotted_keys() {
        let flat = flatten(&output());
        assert_eq!(flat["prefix"], "whub-s-api");
        assert_eq!(flat["name.lambda"], "whub-s-api-lambda");
        assert_eq!(flat["name_tag.vpc"], "whub-s-api-vpc");
        assert_eq!(flat["tags.Environment"], "staging");
        assert_eq!(flat["tags_with_name.vpc.Name"], "whub-s-api-vpc");
    }

    #[test]
    fn query_decodes_with_embedded_tag_json() {
        let query = serde_json::json!({
            "product": "whub",
            "environment": "s",
            "application": "api",
            "criticality": "high",
            "backup": "tier-2",
            "layer": "application",
            "repository": "whub-terraform",
            "additional_tags": "{\"CostCenter\":\"cc-1234\"}"
        });
        let input = parse_query(serde_json::to_vec(&query).unwrap().as_slice()).unwrap();
        assert_eq!(input.environment, Environment::Staging);
        assert_eq!(input.criticality, Criticality::High);
        assert_eq!(input.backup, BackupTier::Tier2);
        assert_eq!(input.layer, Layer::Application);
        assert_eq!(input.additional_tags["CostCenter"], "cc-1234");
    }

    #[test]
    fn query_without_additional_tags_decodes() {
        let query = serde_json::json!({
            "product": "whub",
            "environment": "d",
            "application": "api",
            "criticality": "low",
            "backup": "none",
            "layer": "governance",
            "repository": "whub-terraform"
        });
        let input = parse_query(serde_json::to_vec(&query).unwrap().as_slice()).unwrap();
        assert_eq!(input.environment, Environment::Development);
        assert!(input.additional_tags.is_empty());
    }

    #[test]
    fn malformed_query_is_an_error() {
        assert!(parse_query(b"not json").is_err());
        let missing = serde_json::json!({ "product": "whub" });
        assert!(parse_query(serde_json::to_vec(&missing).unwrap().as_slice()).is_err());
    }
}
