//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::gbuffer::GBufferFeatures;
use crate::render::TextureFiltering;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns [`ConfigError`] when serialization or the write fails.
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Renderer settings driving material synchronization and composition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Shader language token ("GLSL" or "Cg")
    pub shader_language: String,
    /// Texture filtering level: 0 = none, 1 = bilinear, N > 1 = anisotropic-N
    pub texture_filtering: u8,
    /// Feature toggle names to disable globally (e.g. "NoGlow")
    pub disabled_features: Vec<String>,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            shader_language: "GLSL".to_string(),
            texture_filtering: 8,
            disabled_features: Vec::new(),
        }
    }
}

impl Config for RendererSettings {}

impl RendererSettings {
    /// Resolve the disabled feature names into a toggle mask
    ///
    /// Unknown names are logged and skipped rather than failing the load.
    pub fn features(&self) -> GBufferFeatures {
        let mut features = GBufferFeatures::empty();
        for name in &self.disabled_features {
            match GBufferFeatures::from_toggle_name(name) {
                Some(feature) => features |= feature,
                None => log::warn!("unknown feature toggle '{name}' in renderer settings"),
            }
        }
        features
    }

    /// Resolve the filtering level into a policy
    pub fn filtering(&self) -> TextureFiltering {
        TextureFiltering::from_level(self.texture_filtering)
    }
}
