use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use parlor_ai::{AiConfig, AiProvider};
use parlor_directory::stream::DEFAULT_BASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub stream_api_key: String,
    pub stream_api_secret: String,
    pub stream_base_url: String,
    pub ai: AiConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup, so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| anyhow!("{} is not set", key));

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .context("PORT must be a port number")?;

        let db_path = database_path(&require("DATABASE_URL")?);

        let provider: AiProvider = get("AI_PROVIDER")
            .map(|v| v.parse::<AiProvider>())
            .transpose()
            .map_err(|e: String| anyhow!(e))?
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            db_path,
            stream_api_key: require("STREAM_API_KEY")?,
            stream_api_secret: require("STREAM_API_SECRET")?,
            stream_base_url: get("STREAM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            ai: AiConfig {
                provider,
                api_key: require(provider.api_key_env())?,
                model: get("AI_MODEL"),
                api_base: get("AI_API_BASE"),
            },
        })
    }

    /// Listen address. `HOST` must be an IP literal, v4 or v6.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("HOST {:?} is not an IP address", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Accept a bare path or a `sqlite:` style URL.
fn database_path(url: &str) -> PathBuf {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "sqlite://parlor.db"),
        ("STREAM_API_KEY", "key"),
        ("STREAM_API_SECRET", "secret"),
        ("GEMINI_API_KEY", "gem"),
    ];

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(BASE)).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.db_path, PathBuf::from("parlor.db"));
        assert_eq!(config.stream_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ai.provider, AiProvider::Gemini);
        assert_eq!(config.ai.api_key, "gem");
        assert!(config.ai.model.is_none());
    }

    #[test]
    fn port_and_provider_overrides() {
        let mut pairs = BASE.to_vec();
        pairs.extend([("PORT", "8080"), ("AI_PROVIDER", "openai"), ("OPENAI_API_KEY", "sk")]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.ai.provider, AiProvider::OpenAi);
        assert_eq!(config.ai.api_key, "sk");
    }

    #[test]
    fn missing_database_url_fails() {
        let pairs: Vec<_> = BASE.iter().copied().filter(|(k, _)| *k != "DATABASE_URL").collect();
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn provider_key_must_match_provider() {
        let mut pairs = BASE.to_vec();
        pairs.push(("AI_PROVIDER", "openai"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn bad_port_and_provider_fail() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PORT", "not-a-port"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = BASE.to_vec();
        pairs.push(("AI_PROVIDER", "llama"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn bind_addr_accepts_v4_and_v6_hosts() {
        let config = Config::from_lookup(lookup(BASE)).unwrap();
        assert_eq!(config.bind_addr().unwrap(), "0.0.0.0:5000".parse::<SocketAddr>().unwrap());

        let mut pairs = BASE.to_vec();
        pairs.extend([("HOST", "::"), ("PORT", "8080")]);
        let addr = Config::from_lookup(lookup(&pairs)).unwrap().bind_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr, "[::]:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn bind_addr_rejects_hostnames() {
        let mut pairs = BASE.to_vec();
        pairs.push(("HOST", "localhost"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap().bind_addr().unwrap_err();
        assert!(err.to_string().contains("HOST"));
    }

    #[test]
    fn plain_path_is_kept() {
        assert_eq!(database_path("/var/lib/parlor.db"), PathBuf::from("/var/lib/parlor.db"));
        assert_eq!(database_path("sqlite:parlor.db"), PathBuf::from("parlor.db"));
    }
}
