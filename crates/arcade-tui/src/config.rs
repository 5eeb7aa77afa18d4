//! Configuration management for the arcade.
//!
//! Configuration is layered with figment: built-in defaults, then the TOML
//! config file, then `ARCADE_`-prefixed environment variables. Later sources
//! override earlier ones. Nested keys use a double underscore in the
//! environment, e.g. `ARCADE_PONG__BALL_SPEED=8`.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use arcade_core::games::jigsaw::{self, Picture};
use arcade_core::games::memory::Deck;
use arcade_core::games::pong;
use arcade_core::games::sudoku::Difficulty;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::theme::ThemeName;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the platform config and data dirs.
const APP_DIR_NAME: &str = "arcade";

const MAX_FRAME_MS: u64 = 1000;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load or parse a configuration source.
    #[error("failed to load configuration: {0}")]
    Load(Box<figment::Error>),

    /// A value is present but unusable.
    #[error("invalid configuration: {message}")]
    Validation { message: String },

    /// The jigsaw picture file could not be read.
    #[error("failed to read jigsaw picture {path}: {source}")]
    Picture {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Validation {
            message: message.into(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name stored with every score.
    pub player_name: String,
    pub theme: ThemeName,
    /// Where scores and the log file live.
    /// Defaults to `~/.local/share/arcade`
    pub data_dir: Option<PathBuf>,
    /// How long a key counts as held without a repeat, in milliseconds.
    pub hold_ms: u64,
    /// Tick and render period while a game is running, in milliseconds.
    pub frame_ms: u64,
    pub pong: PongConfig,
    pub sudoku: SudokuConfig,
    pub jigsaw: JigsawConfig,
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    /// Ball speed at serve, 1 to 15.
    pub ball_speed: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SudokuConfig {
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JigsawConfig {
    /// Tiles per side.
    pub size: usize,
    /// Text file used as the picture; a built-in gradient otherwise.
    pub picture: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub deck: Deck,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: "player".to_string(),
            theme: ThemeName::default(),
            data_dir: None,
            hold_ms: 150,
            frame_ms: 16,
            pong: PongConfig::default(),
            sudoku: SudokuConfig::default(),
            jigsaw: JigsawConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            ball_speed: pong::DEFAULT_SPEED,
        }
    }
}

impl Default for JigsawConfig {
    fn default() -> Self {
        Self {
            size: jigsaw::DEFAULT_SIZE,
            picture: None,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if a source fails to parse or a value is out of range.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ARCADE_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(APP_DIR_NAME)
    }

    /// Data directory, resolving the default if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(Self::default_data_dir)
    }

    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_name.trim().is_empty() {
            return Err(ConfigError::invalid("player_name must not be empty"));
        }
        if self.hold_ms == 0 {
            return Err(ConfigError::invalid("hold_ms must be greater than 0"));
        }
        if !(1..=MAX_FRAME_MS).contains(&self.frame_ms) {
            return Err(ConfigError::invalid(format!(
                "frame_ms must be between 1 and {MAX_FRAME_MS}, got {}",
                self.frame_ms
            )));
        }
        if !(pong::MIN_SPEED..=pong::MAX_SPEED).contains(&self.pong.ball_speed) {
            return Err(ConfigError::invalid(format!(
                "pong.ball_speed: {}",
                arcade_core::Error::InvalidSpeed(self.pong.ball_speed)
            )));
        }
        if !(jigsaw::MIN_SIZE..=jigsaw::MAX_SIZE).contains(&self.jigsaw.size) {
            return Err(ConfigError::invalid(format!(
                "jigsaw.size: {}",
                arcade_core::Error::InvalidPuzzleSize(self.jigsaw.size)
            )));
        }
        Ok(())
    }

    /// The configured jigsaw picture, read from disk if one is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or has no content.
    pub fn jigsaw_picture(&self) -> Result<Picture, ConfigError> {
        let Some(path) = &self.jigsaw.picture else {
            return Ok(Picture::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Picture {
            path: path.clone(),
            source,
        })?;
        Picture::from_text(&text)
            .map_err(|err| ConfigError::invalid(format!("jigsaw.picture {}: {err}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("arcade-config-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hold(), Duration::from_millis(150));
        assert_eq!(config.pong.ball_speed, 5);
        assert_eq!(config.sudoku.difficulty, Difficulty::Medium);
        assert_eq!(config.memory.deck, Deck::Letters);
    }

    #[test]
    fn test_load_nonexistent_config() {
        let path = std::env::temp_dir().join("arcade-config-does-not-exist.toml");
        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.jigsaw.size, 3);
    }

    #[test]
    fn test_load_toml_file() {
        let path = temp_file(
            "load.toml",
            "player_name = \"ada\"\ntheme = \"light\"\n\n[pong]\nball_speed = 9\n\n[sudoku]\ndifficulty = \"hard\"\n\n[memory]\ndeck = \"animals\"\n",
        );
        let config = Config::load_from(Some(path.clone())).unwrap();
        fs::remove_file(path).ok();
        assert_eq!(config.player_name, "ada");
        assert_eq!(config.theme, ThemeName::Light);
        assert_eq!(config.pong.ball_speed, 9);
        assert_eq!(config.sudoku.difficulty, Difficulty::Hard);
        assert_eq!(config.memory.deck, Deck::Animals);
        assert_eq!(config.frame_ms, 16);
    }

    #[test]
    fn test_out_of_range_speed_is_rejected_at_load() {
        let path = temp_file("speed.toml", "[pong]\nball_speed = 20\n");
        let err = Config::load_from(Some(path.clone())).unwrap_err();
        fs::remove_file(path).ok();
        assert!(matches!(err, ConfigError::Validation { .. }));
        assert!(err.to_string().contains("ball speed 20 is out of range"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.jigsaw.size = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.frame_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.player_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_load_error() {
        let path = temp_file("bad.toml", "theme = \"sepia\"\n");
        let err = Config::load_from(Some(path.clone())).unwrap_err();
        fs::remove_file(path).ok();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_jigsaw_picture_from_file() {
        let path = temp_file("picture.txt", "##..\n..##\n");
        let config = Config {
            jigsaw: JigsawConfig {
                size: 2,
                picture: Some(path.clone()),
            },
            ..Config::default()
        };
        let picture = config.jigsaw_picture().unwrap();
        fs::remove_file(path).ok();
        assert_eq!(picture.width(), 4);
        assert_eq!(picture.height(), 2);

        let missing = Config {
            jigsaw: JigsawConfig {
                size: 2,
                picture: Some(PathBuf::from("/nonexistent/arcade/picture.txt")),
            },
            ..Config::default()
        };
        assert!(matches!(missing.jigsaw_picture(), Err(ConfigError::Picture { .. })));
    }

    #[test]
    fn test_default_paths() {
        assert!(Config::default_config_path().ends_with("arcade/config.toml"));
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/arcade-data")),
            ..Config::default()
        };
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/arcade-data"));
    }
}
