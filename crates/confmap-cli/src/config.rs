use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use confmap_http::{HttpProviderConfig, HttpsProviderConfig};
use confmap_s3::S3ProviderConfig;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpSection,
    pub https: HttpsSection,
    pub s3: S3Section,
}

/// Settings shared by the `http` and `https` providers.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpSection {
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpsSection {
    pub ca_file: Option<PathBuf>,
    pub require_ca_file: bool,
}

impl Default for HttpsSection {
    fn default() -> Self {
        Self {
            ca_file: None,
            require_ca_file: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct S3Section {
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ca_file: Option<PathBuf>,
    pub allow_missing_ca: bool,
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(ca_file) = overrides.ca_file {
            self.https.ca_file = Some(ca_file);
        }
        if overrides.allow_missing_ca {
            self.https.require_ca_file = false;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.http.timeout_secs = Some(timeout);
        }
    }

    pub fn http_config(&self) -> HttpProviderConfig {
        HttpProviderConfig {
            timeout: self.http.timeout_secs.map(Duration::from_secs),
            connect_timeout: self.http.connect_timeout_secs.map(Duration::from_secs),
            ..HttpProviderConfig::default()
        }
    }

    pub fn https_config(&self) -> HttpsProviderConfig {
        HttpsProviderConfig {
            http: self.http_config(),
            ca_file: self.https.ca_file.clone(),
            require_ca_file: self.https.require_ca_file,
        }
    }

    /// Credentials always come from the environment; only endpoint settings
    /// are read from the file.
    pub fn s3_config(&self) -> S3ProviderConfig {
        let mut config = S3ProviderConfig::from_env();
        if let Some(endpoint) = &self.s3.endpoint_url {
            config.endpoint_url = Some(endpoint.clone());
        }
        config.force_path_style = self.s3.force_path_style;
        config
    }
}

/// Config file path: `~/.config/confmap/providers.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("confmap").join("providers.toml"))
}

/// Load config from an explicit path, which must exist and parse.
pub fn load_from(path: &Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Load config from the default location, falling back to defaults if it is
/// missing or unparsable.
pub fn load_default() -> AppConfig {
    if let Some(path) = config_path()
        && let Ok(contents) = std::fs::read_to_string(&path)
    {
        match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => return config,
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to parse config, using defaults"
            ),
        }
    }

    AppConfig::default()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_require_ca() {
        let config = AppConfig::default();
        assert!(config.https.require_ca_file);
        assert!(config.https_config().require_ca_file);
        assert!(config.http_config().timeout.is_none());
    }

    #[test]
    fn parses_full_file() {
        let toml = r#"
[http]
timeout_secs = 10
connect_timeout_secs = 2

[https]
ca_file = "/etc/confmap/RootCA.crt"
require_ca_file = false

[s3]
endpoint_url = "http://localhost:9000"
force_path_style = true
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.http.timeout_secs, Some(10));
        assert_eq!(
            config.https.ca_file.as_deref(),
            Some(Path::new("/etc/confmap/RootCA.crt"))
        );
        assert!(!config.https.require_ca_file);
        assert_eq!(config.s3.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert!(config.s3.force_path_style);

        let https = config.https_config();
        assert_eq!(https.http.timeout, Some(Duration::from_secs(10)));
        assert_eq!(https.http.connect_timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str("[http]\ntimeout_secs = 3\n").unwrap();
        assert_eq!(config.http.timeout_secs, Some(3));
        assert!(config.https.require_ca_file);
        assert!(config.s3.endpoint_url.is_none());
    }

    #[test]
    fn overrides_win() {
        let mut config = AppConfig::default();
        config.https.ca_file = Some("/from/file.pem".into());
        config.apply(Overrides {
            ca_file: Some("/from/flag.pem".into()),
            allow_missing_ca: true,
            timeout_secs: Some(7),
        });
        assert_eq!(config.https.ca_file.as_deref(), Some(Path::new("/from/flag.pem")));
        assert!(!config.https.require_ca_file);
        assert_eq!(config.http.timeout_secs, Some(7));
    }

    #[test]
    fn explicit_path_must_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[https]\nrequire_ca_file = \"nope\"\n").unwrap();
        assert!(load_from(file.path()).is_err());
        assert!(load_from(Path::new("/nonexistent/providers.toml")).is_err());
    }
}
