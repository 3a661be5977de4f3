//! Shared configuration, loaded from TOML with every field defaulted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];
/// Similarity at or above which a prior-art match raises an alert.
pub const DEFAULT_SIMILARITY_ALERT_THRESHOLD: f64 = 0.8;
/// Allowed deviation (percentage points) of a domain distribution from 100.
pub const DEFAULT_DISTRIBUTION_EPSILON: f64 = 0.5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Which implementation of the external interfaces to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-memory fixture data.
    #[default]
    Fixture,
    /// The networked HTTP/JSON API.
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Fixture,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: u64,
    /// Lowercase extensions without the leading dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl UploadConfig {
    /// Whether `file_name` carries one of the allowed extensions.
    pub fn allows(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub similarity_alert_threshold: f64,
    pub distribution_epsilon: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            similarity_alert_threshold: DEFAULT_SIMILARITY_ALERT_THRESHOLD,
            distribution_epsilon: DEFAULT_DISTRIBUTION_EPSILON,
        }
    }
}

/// Top-level Patentwise configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatentwiseConfig {
    pub backend: BackendConfig,
    pub upload: UploadConfig,
    pub risk: RiskConfig,
    pub log_level: String,
}

impl Default for PatentwiseConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            upload: UploadConfig::default(),
            risk: RiskConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl PatentwiseConfig {
    /// Parse and validate a TOML document. Missing fields take defaults.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), backend = ?config.backend.kind, "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.risk.similarity_alert_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid {
                field: "risk.similarity_alert_threshold",
                reason: format!("{threshold} is outside [0, 1]"),
            });
        }
        let epsilon = self.risk.distribution_epsilon;
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(ConfigError::Invalid {
                field: "risk.distribution_epsilon",
                reason: format!("{epsilon} must be a non-negative number"),
            });
        }
        if self.upload.allowed_extensions.is_empty() {
            return Err(ConfigError::Invalid {
                field: "upload.allowed_extensions",
                reason: "at least one extension is required".into(),
            });
        }
        if self.backend.kind == BackendKind::Http && self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "backend.base_url",
                reason: "required for the http backend".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = PatentwiseConfig::from_toml("").unwrap();
        assert_eq!(config.backend.kind, BackendKind::Fixture);
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(config.upload.max_bytes, 16 * 1024 * 1024);
        assert_eq!(config.upload.allowed_extensions, vec!["pdf", "doc", "docx", "txt"]);
        assert_eq!(config.risk.similarity_alert_threshold, 0.8);
        assert_eq!(config.risk.distribution_epsilon, 0.5);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
log_level = "debug"

[backend]
kind = "http"
base_url = "https://api.example.com"

[risk]
similarity_alert_threshold = 0.75
"#;
        let config = PatentwiseConfig::from_toml(toml).unwrap();
        assert_eq!(config.backend.kind, BackendKind::Http);
        assert_eq!(config.backend.base_url, "https://api.example.com");
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(config.risk.similarity_alert_threshold, 0.75);
        assert_eq!(config.risk.distribution_epsilon, 0.5);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let err = PatentwiseConfig::from_toml("[risk]\nsimilarity_alert_threshold = 1.5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "risk.similarity_alert_threshold",
                ..
            }
        ));
    }

    #[test]
    fn empty_extension_list_rejected() {
        let err = PatentwiseConfig::from_toml("[upload]\nallowed_extensions = []").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = PatentwiseConfig::from_toml("[backend\nkind = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn upload_extension_check() {
        let upload = UploadConfig::default();
        assert!(upload.allows("claims.PDF"));
        assert!(upload.allows("notes.v2.txt"));
        assert!(!upload.allows("image.png"));
        assert!(!upload.allows("README"));
        assert!(!upload.allows(".pdf"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upload]\nmax_bytes = 1024").unwrap();
        let config = PatentwiseConfig::load(file.path()).unwrap();
        assert_eq!(config.upload.max_bytes, 1024);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = PatentwiseConfig::load(Path::new("/nonexistent/patentwise.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
