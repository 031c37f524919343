use httpz_codec::{BuildOptions, ParseOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct CliConfig {
    pub parse: ParseOptions,
    pub build: BuildOptions,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
    pub normalize_eol: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            normalize_eol: false,
        }
    }
}

impl CliConfig {
    /// Loads the config at `path`, falling back to defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|err| format!("{}: {err}", path.display()))?;
                toml::from_str(&raw).map_err(|err| err.to_string())
            }
            None => Ok(Self::default()),
        }
    }
}
