//! Loading encoder configurations and chord datasets.
//!
//! A configuration comes from a JSON file (`--config`), a named preset
//! (`--preset`) or the command's default preset, in that order. Chord
//! datasets are always JSON. Both loaders hash the raw file with BLAKE3 so
//! reports can say exactly which file produced a result.

use std::path::{Path, PathBuf};

use what3chords_core::{ChordCatalog, EncoderConfig};

/// Where a resolved configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// A JSON config file.
    File(PathBuf),
    /// A named preset.
    Preset(String),
}

impl std::fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigOrigin::File(path) => write!(f, "file {}", path.display()),
            ConfigOrigin::Preset(name) => write!(f, "preset {}", name),
        }
    }
}

/// A configuration ready to use.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration.
    pub config: EncoderConfig,
    /// Where it came from.
    pub origin: ConfigOrigin,
    /// BLAKE3 hash of the config file (file origins only).
    pub source_hash: Option<String>,
}

/// A chord catalog built from a dataset file.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    /// The flattened catalog.
    pub catalog: ChordCatalog,
    /// Dataset path.
    pub path: PathBuf,
    /// BLAKE3 hash of the dataset file (hex string).
    pub source_hash: String,
}

/// Errors that can occur while loading inputs.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File content is not the expected JSON.
    JsonParse { path: PathBuf, message: String },

    /// No preset with this name.
    UnknownPreset { name: String },

    /// Both `--config` and `--preset` were given.
    ConflictingConfig,
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::JsonParse { path, message } => {
                write!(f, "JSON parse error in '{}': {}", path.display(), message)
            }
            InputError::UnknownPreset { name } => write!(
                f,
                "unknown preset '{}' (expected {})",
                name,
                EncoderConfig::PRESETS.join(", ")
            ),
            InputError::ConflictingConfig => {
                write!(f, "--config and --preset cannot be used together")
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Resolves the configuration for a command.
///
/// # Arguments
/// * `config_path` - Optional JSON config file
/// * `preset` - Optional preset name
/// * `default_preset` - Preset used when neither is given
pub fn load_config(
    config_path: Option<&str>,
    preset: Option<&str>,
    default_preset: &str,
) -> Result<LoadedConfig, InputError> {
    match (config_path, preset) {
        (Some(_), Some(_)) => Err(InputError::ConflictingConfig),
        (Some(path), None) => {
            let path = Path::new(path);
            let content = read(path)?;
            let config = EncoderConfig::from_json(&content).map_err(|e| InputError::JsonParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            Ok(LoadedConfig {
                config,
                origin: ConfigOrigin::File(path.to_path_buf()),
                source_hash: Some(hash(&content)),
            })
        }
        (None, name) => {
            let name = name.unwrap_or(default_preset);
            let config = EncoderConfig::by_name(name).ok_or_else(|| InputError::UnknownPreset {
                name: name.to_string(),
            })?;
            Ok(LoadedConfig {
                config,
                origin: ConfigOrigin::Preset(name.to_string()),
                source_hash: None,
            })
        }
    }
}

/// Loads and flattens a chord dataset.
pub fn load_catalog(path: &Path) -> Result<LoadedCatalog, InputError> {
    let content = read(path)?;
    let catalog = ChordCatalog::from_json(&content).map_err(|e| InputError::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(LoadedCatalog {
        catalog,
        path: path.to_path_buf(),
        source_hash: hash(&content),
    })
}

/// Loads the catalog when a path was given.
pub fn load_optional_catalog(path: Option<&str>) -> Result<Option<LoadedCatalog>, InputError> {
    path.map(|p| load_catalog(Path::new(p))).transpose()
}

fn read(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

fn hash(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}
