use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Connection settings for one remote ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL the endpoint paths are appended to.
    pub base_url: String,
    /// Name of the ledger every request addresses.
    pub ledger: String,
    /// Prefix map sent with `create` requests.
    pub default_context: BTreeMap<String, String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let mut default_context = BTreeMap::new();
        default_context.insert("schema".into(), "http://schema.org/".into());
        default_context.insert(
            "rdf".into(),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#".into(),
        );
        Self {
            base_url: "http://localhost:58090/fluree".into(),
            ledger: "todomvc".into(),
            default_context,
        }
    }
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, ledger: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ledger: ledger.into(),
            ..Self::default()
        }
    }

    /// Full URL for an endpoint path such as [`crate::endpoints::QUERY`].
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints;

    #[test]
    fn default_config() {
        let c = RemoteConfig::default();
        assert_eq!(c.base_url, "http://localhost:58090/fluree");
        assert_eq!(c.ledger, "todomvc");
        assert_eq!(c.default_context.get("schema").unwrap(), "http://schema.org/");
    }

    #[test]
    fn endpoint_url_joins_without_double_slash() {
        let c = RemoteConfig::new("http://h:1/fluree/", "l");
        assert_eq!(c.endpoint_url(endpoints::QUERY), "http://h:1/fluree/query");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let c: RemoteConfig = serde_json::from_str(r#"{"ledger": "groceries"}"#).unwrap();
        assert_eq!(c.ledger, "groceries");
        assert_eq!(c.base_url, RemoteConfig::default().base_url);
    }
}
