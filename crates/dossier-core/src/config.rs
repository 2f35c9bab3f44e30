use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DossierError, Result};
use crate::keywords;

/// Top-level configuration for the Dossier service.
///
/// Loaded from `~/.dossier/config.toml` by default. Every section falls back
/// to its defaults when missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DossierConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub keywords: KeywordConfig,
}

impl DossierConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DossierConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DossierError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Maximum accepted request body in bytes (all uploads together).
    pub max_upload_bytes: usize,
    /// Maximum `/generate-insights` requests per second.
    pub requests_per_sec: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 50 * 1024 * 1024,
            requests_per_sec: 10,
        }
    }
}

/// Embedding backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Backend: "mock" (hashed bag-of-words) or "onnx".
    pub backend: String,
    /// Directory holding `model.onnx` and `tokenizer.json` for the onnx backend.
    pub model_dir: String,
    /// Embedding dimension.
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: "mock".to_string(),
            model_dir: "~/.dossier/models/all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
        }
    }
}

/// Limits and weights used by the ranking pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Distinct documents kept per expanded query before aggregation.
    pub per_query_limit: usize,
    /// Sections in the final digest.
    pub top_k: usize,
    /// Query `i` scores are multiplied by `1.0 + i * query_weight_step`.
    pub query_weight_step: f64,
    /// Minimum refined excerpt length (characters) for a section to be selected.
    pub min_excerpt_chars: usize,
    /// Maximum sentences kept in a refined excerpt.
    pub max_excerpt_sentences: usize,
    /// Blocks shorter than this (trimmed, characters) are ignored by the segmenter.
    pub min_block_chars: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            per_query_limit: 5,
            top_k: 5,
            query_weight_step: 0.1,
            min_excerpt_chars: 100,
            max_excerpt_sentences: 4,
            min_block_chars: 50,
        }
    }
}

/// Keyword lists, overridable per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub heading_cues: Vec<String>,
    pub boilerplate_markers: Vec<String>,
    pub invalid_title_terms: Vec<String>,
    pub travel_keywords: Vec<String>,
    pub group_markers: Vec<String>,
    pub day_markers: Vec<String>,
    pub planning_cues: Vec<String>,
    pub dining_cues: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            heading_cues: keywords::owned(keywords::HEADING_CUES),
            boilerplate_markers: keywords::owned(keywords::BOILERPLATE_MARKERS),
            invalid_title_terms: keywords::owned(keywords::INVALID_TITLE_TERMS),
            travel_keywords: keywords::owned(keywords::TRAVEL_KEYWORDS),
            group_markers: keywords::owned(keywords::GROUP_MARKERS),
            day_markers: keywords::owned(keywords::DAY_MARKERS),
            planning_cues: keywords::owned(keywords::PLANNING_CUES),
            dining_cues: keywords::owned(keywords::DINING_CUES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = DossierConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.embedding.backend, "mock");
        assert_eq!(config.embedding.dimensions, 384);
        assert_eq!(config.ranking.per_query_limit, 5);
        assert_eq!(config.ranking.top_k, 5);
        assert_eq!(config.ranking.min_excerpt_chars, 100);
        assert!((config.ranking.query_weight_step - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.keywords.travel_keywords.len(), 9);
        assert_eq!(config.keywords.heading_cues, vec!["guide", "overview", "introduction"]);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[general]
log_level = "debug"

[ranking]
top_k = 3
"#;
        let file = create_temp_config(content);
        let config = DossierConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.ranking.top_k, 3);
        // Remaining fields use defaults
        assert_eq!(config.ranking.per_query_limit, 5);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.keywords.group_markers, vec!["group", "friends", "together"]);
    }

    #[test]
    fn test_load_keyword_override() {
        let content = r#"
[keywords]
heading_cues = ["tips", "highlights"]
"#;
        let file = create_temp_config(content);
        let config = DossierConfig::load(file.path()).unwrap();
        assert_eq!(config.keywords.heading_cues, vec!["tips", "highlights"]);
        assert_eq!(config.keywords.boilerplate_markers.len(), 2);
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let result = DossierConfig::load(file.path());
        assert!(matches!(result, Err(DossierError::Config(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = DossierConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = DossierConfig::default();
        config.server.port = 9191;
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = DossierConfig::load(&path).unwrap();
        assert_eq!(reloaded.server.port, 9191);
        assert_eq!(reloaded.keywords.dining_cues, config.keywords.dining_cues);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = DossierConfig::load(file.path()).unwrap();
        assert_eq!(config.ranking.max_excerpt_sentences, 4);
        assert_eq!(config.ranking.min_block_chars, 50);
    }
}
