//! YAML manifest loading with `{{token}}` substitution.
//!
//! Deployment manifests (IAM policy documents, Helm values, Kubernetes
//! resources) are written as YAML templates with `{{token}}` placeholders
//! for values only known at synthesis time. This crate loads them as
//! [`serde_json::Value`]s, substituting tokens textually before parsing.
//!
//! Tokens are given with their braces, matching how they appear in the
//! template:
//!
//! ```
//! use std::collections::HashMap;
//!
//! let vars = HashMap::from([("{{REGION}}".to_string(), "us-east-1".to_string())]);
//! let doc = manifest::parse_with_vars("region: '{{REGION}}'", &vars).unwrap();
//! assert_eq!(doc["region"], "us-east-1");
//! ```
//!
//! Any `{{...}}` left in the text after substitution is an error; a
//! manifest with a literal placeholder in it must never reach a deploy.

mod error;

pub use error::{Error, Result};

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Load a single-document YAML manifest.
pub fn load(path: impl AsRef<Path>) -> Result<serde_json::Value> {
    parse(&std::fs::read_to_string(path.as_ref())?)
}

/// Load a multi-document YAML manifest, in file order.
pub fn load_multi(path: impl AsRef<Path>) -> Result<Vec<serde_json::Value>> {
    parse_multi(&std::fs::read_to_string(path.as_ref())?)
}

/// Load a single-document manifest, substituting tokens first.
pub fn load_with_vars(
    path: impl AsRef<Path>,
    vars: &HashMap<String, String>,
) -> Result<serde_json::Value> {
    parse_with_vars(&std::fs::read_to_string(path.as_ref())?, vars)
}

/// Load a multi-document manifest, substituting tokens first.
pub fn load_multi_with_vars(
    path: impl AsRef<Path>,
    vars: &HashMap<String, String>,
) -> Result<Vec<serde_json::Value>> {
    parse_multi(&substitute(&std::fs::read_to_string(path.as_ref())?, vars)?)
}

/// Parse a single YAML document.
pub fn parse(yaml: &str) -> Result<serde_json::Value> {
    serde_yaml::from_str(yaml).map_err(|e| Error::Parse(e.to_string()))
}

/// Parse every document in a YAML stream, in order.
pub fn parse_multi(yaml: &str) -> Result<Vec<serde_json::Value>> {
    serde_yaml::Deserializer::from_str(yaml)
        .map(|doc| serde_json::Value::deserialize(doc).map_err(|e| Error::Parse(e.to_string())))
        .collect()
}

/// Substitute tokens, then parse a single document.
pub fn parse_with_vars(yaml: &str, vars: &HashMap<String, String>) -> Result<serde_json::Value> {
    parse(&substitute(yaml, vars)?)
}

/// Replace every `{{token}}` key of `vars` in `text`.
///
/// Fails on the first token remaining after all replacements, naming it.
pub fn substitute(text: &str, vars: &HashMap<String, String>) -> Result<String> {
    let mut out = text.to_string();
    for (token, value) in vars {
        out = out.replace(token.as_str(), value);
    }
    if let Some(start) = out.find("{{") {
        let rest = &out[start..];
        let token = match rest.find("}}") {
            Some(end) => &rest[..end + 2],
            None => rest,
        };
        return Err(Error::UnreplacedToken(token.to_string()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_document() {
        let doc = parse("Effect: Allow\nAction: ['s3:GetObject']").unwrap();
        assert_eq!(doc["Effect"], "Allow");
        assert_eq!(doc["Action"][0], "s3:GetObject");
    }

    #[test]
    fn test_parse_multi_preserves_order() {
        let docs = parse_multi("kind: Namespace\n---\nkind: ServiceAccount\n").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["kind"], "Namespace");
        assert_eq!(docs[1]["kind"], "ServiceAccount");
    }

    #[test]
    fn test_substitute_tokens() {
        let vars = HashMap::from([
            ("{{REGION}}".to_string(), "us-east-1".to_string()),
            ("{{codeBucket}}".to_string(), "my-bucket".to_string()),
        ]);
        let doc = parse_with_vars("region: '{{REGION}}'\nbucket: '{{codeBucket}}'", &vars).unwrap();
        assert_eq!(doc["region"], "us-east-1");
        assert_eq!(doc["bucket"], "my-bucket");
    }

    #[test]
    fn test_unreplaced_token_rejected() {
        let vars = HashMap::new();
        let err = substitute("arn: '{{secretsmanager}}'", &vars).unwrap_err();
        match err {
            Error::UnreplacedToken(token) => assert_eq!(token, "{{secretsmanager}}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        assert!(matches!(parse("key: [unclosed"), Err(Error::Parse(_))));
    }
}
