use std::path::{Path, PathBuf};

use pc_chart::ChartStyle;
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "povcount.toml";
const DEFAULT_LOOKUP: &str = "CharacterLookupTable.txt";
const DEFAULT_SCENES: &str = "POVCounts.txt";
const DEFAULT_COUNT: usize = 10;

/// Contents of `povcount.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    lookup: Option<PathBuf>,
    scenes: Option<PathBuf>,
    count: Option<usize>,
    style: ChartStyle,
}

/// Effective settings after merging flags, config file and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub lookup: PathBuf,
    pub scenes: PathBuf,
    pub count: usize,
    pub style: ChartStyle,
}

/// Flags that override the config file.
#[derive(Debug, Default)]
pub struct Overrides<'a> {
    pub config: Option<&'a Path>,
    pub lookup: Option<&'a Path>,
    pub scenes: Option<&'a Path>,
}

impl Settings {
    /// Resolve settings: flag > config file > built-in default.
    pub fn resolve(overrides: &Overrides<'_>) -> Result<Self, String> {
        let file = match overrides.config {
            Some(path) => read_config(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG);
                if path.exists() {
                    read_config(path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        Ok(Self {
            lookup: overrides
                .lookup
                .map(Path::to_path_buf)
                .or(file.lookup)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOOKUP)),
            scenes: overrides
                .scenes
                .map(Path::to_path_buf)
                .or(file.scenes)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENES)),
            count: file.count.unwrap_or(DEFAULT_COUNT),
            style: file.style,
        })
    }
}

fn read_config(path: &Path) -> Result<FileConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
    let config: FileConfig =
        toml::from_str(&text).map_err(|e| format!("invalid config {}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_chart::Palette;

    #[test]
    fn file_values_apply_below_flags() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("povcount.toml");
        std::fs::write(
            &path,
            "lookup = \"names.txt\"\nscenes = \"log.txt\"\ncount = 5\n\n[style]\npalette = \"tab20\"\n",
        )
        .unwrap();

        let settings = Settings::resolve(&Overrides {
            config: Some(&path),
            lookup: Some(Path::new("other.txt")),
            scenes: None,
        })
        .unwrap();
        assert_eq!(settings.lookup, PathBuf::from("other.txt"));
        assert_eq!(settings.scenes, PathBuf::from("log.txt"));
        assert_eq!(settings.count, 5);
        assert_eq!(settings.style.palette, Palette::Tab20);
    }

    #[test]
    fn missing_explicit_config_fails() {
        let err = Settings::resolve(&Overrides {
            config: Some(Path::new("/nonexistent/povcount.toml")),
            ..Overrides::default()
        })
        .unwrap_err();
        assert!(err.contains("cannot read config"));
    }

    #[test]
    fn unknown_keys_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("povcount.toml");
        std::fs::write(&path, "colour = \"red\"\n").unwrap();
        let err = Settings::resolve(&Overrides {
            config: Some(&path),
            ..Overrides::default()
        })
        .unwrap_err();
        assert!(err.contains("invalid config"));
    }
}
