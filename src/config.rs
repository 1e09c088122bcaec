use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{FlameError, FlameResult};

/// How 2D variations treat the third axis, and which linear variation new
/// iterators start with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationStyle {
    /// Every variation carries `z` through; new iterators start with `linear`.
    Classic,
    /// Only 3D-aware variations touch `z`; new iterators start with `linear3D`.
    #[default]
    Modern,
}

impl VariationStyle {
    pub fn passes_z_through(self) -> bool {
        matches!(self, Self::Classic)
    }

    pub fn default_variation(self) -> &'static str {
        match self {
            Self::Classic => "linear",
            Self::Modern => "linear3D",
        }
    }
}

/// Explicit configuration threaded into flame and iterator construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlameConfig {
    pub variation_style: VariationStyle,
    /// Read the `post` attribute into the pre-affine slot, like historical
    /// readers did. Off by default.
    pub legacy_post_affine_slot: bool,
    /// Prefix of generated names for unnamed flames.
    pub name_prefix: String,
    /// Seed for random palettes and flames; `None` seeds from the clock.
    pub palette_seed: Option<u64>,
}

impl Default for FlameConfig {
    fn default() -> Self {
        Self {
            variation_style: VariationStyle::default(),
            legacy_post_affine_slot: false,
            name_prefix: "flame".to_string(),
            palette_seed: None,
        }
    }
}

impl FlameConfig {
    pub fn from_json_str(s: &str) -> FlameResult<Self> {
        serde_json::from_str(s).map_err(|e| FlameError::serde(e.to_string()))
    }

    pub fn from_path(path: &Path) -> FlameResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> FlameResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FlameError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
