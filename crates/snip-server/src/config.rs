use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Base URL prefixed to rendered paste links (e.g. behind a reverse
    /// proxy). When unset, links are rendered as absolute paths.
    pub public_base: Option<String>,
    /// Reject creates and edits whose content trips the secret scanner.
    pub block_secrets: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().expect("valid default addr"),
            public_base: None,
            block_secrets: false,
        }
    }
}

impl ServerConfig {
    /// Render a link, absolute when a public base is configured.
    pub fn url(&self, path: &str) -> String {
        match &self.public_base {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
            None => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert!(config.public_base.is_none());
        assert!(!config.block_secrets);
    }

    #[test]
    fn url_without_base_is_the_path() {
        let config = ServerConfig::default();
        assert_eq!(config.url("/p/abc"), "/p/abc");
    }

    #[test]
    fn url_with_base_trims_trailing_slash() {
        let config = ServerConfig {
            public_base: Some("https://paste.example.com/".into()),
            ..ServerConfig::default()
        };
        assert_eq!(config.url("/p/abc"), "https://paste.example.com/p/abc");
    }
}
