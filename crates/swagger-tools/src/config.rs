//! Bridge configuration.

use crate::filter::FilterPolicy;
use serde::{Deserialize, Serialize};

/// Configuration for one Swagger-backed tool source.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Spec location: a local file path or an `http(s)` URL.
    pub spec: String,

    /// Base URL for API calls; overrides what the spec declares.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Single upstream credential, forwarded as both `X-API-Key` and a bearer token.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Operation filter rules.
    #[serde(default)]
    pub filter: FilterPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: BridgeConfig = serde_yaml::from_str(
            r#"
spec: ./petstore.yaml
baseUrl: https://api.example.com
filter:
  excludeMethods: [DELETE]
"#,
        )
        .expect("parse config");

        assert_eq!(cfg.spec, "./petstore.yaml");
        assert_eq!(cfg.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.filter.exclude_methods, vec!["DELETE".to_string()]);
    }
}
