use std::{fs, io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{
    field::Field,
    piece::ActivePiece,
    queue::PieceQueue,
    tetromino::{Coord, Tetromino},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("field must be at least {min}x{min} cells, got {width}x{height}")]
    FieldTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },
    #[error("preview queue needs room for at least one piece")]
    ZeroQueueCapacity,
    #[error("{shape} does not fit at spawn position {spawn:?} on a {width}x{height} field")]
    SpawnOutOfField {
        shape: Tetromino,
        spawn: Coord,
        width: usize,
        height: usize,
    },
    #[error("could not read config file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Startup configuration of a game.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub queue_capacity: usize,
    pub spawn: Coord,
    /// Seed for the shape generator; fresh entropy when absent.
    pub seed: Option<u64>,
    /// Interval of automatic one-row descents; no gravity when absent.
    #[serde(with = "millis")]
    pub gravity: Option<Duration>,
}

impl GameConfig {
    pub const MIN_SIDE: usize = 4;
    pub const DEFAULT_SPAWN: Coord = (4, 1);

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Checks the field is big enough and every shape can be spawned on it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self { width, height, .. } = *self;
        if width < Self::MIN_SIDE || height < Self::MIN_SIDE {
            return Err(ConfigError::FieldTooSmall {
                width,
                height,
                min: Self::MIN_SIDE,
            });
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        let empty = Field::new(width, height);
        for shape in Tetromino::ALL {
            if empty.overlaps_locked(&ActivePiece::spawn(shape, self.spawn)) {
                return Err(ConfigError::SpawnOutOfField {
                    shape,
                    spawn: self.spawn,
                    width,
                    height,
                });
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: Field::DEFAULT_WIDTH,
            height: Field::DEFAULT_HEIGHT,
            queue_capacity: PieceQueue::DEFAULT_CAPACITY,
            spawn: Self::DEFAULT_SPAWN,
            seed: None,
            gravity: None,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_matches_classic_layout() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height), (10, 20));
        assert_eq!(config.queue_capacity, 5);
        assert_eq!(config.spawn, (4, 1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn spawn_must_fit_every_shape() {
        // I reaches x-1, so column 0 is too far left.
        let config = GameConfig {
            spawn: (0, 1),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnOutOfField { shape: Tetromino::I, .. })
        ));
        // O reaches y-1.
        let config = GameConfig {
            spawn: (4, 0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnOutOfField { shape: Tetromino::O, .. })
        ));
    }

    #[test]
    fn rejects_degenerate_sizes() {
        let config = GameConfig {
            width: 3,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::FieldTooSmall { .. })));
        let config = GameConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroQueueCapacity)));
    }

    #[test]
    fn loads_partial_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "height": 24, "seed": 3, "gravity": 500 }}"#).unwrap();
        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.height, 24);
        assert_eq!(config.width, 10);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.gravity, Some(Duration::from_millis(500)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "level": 9 }}"#).unwrap();
        assert!(matches!(
            GameConfig::from_json_file(file.path()),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GameConfig::from_json_file(dir.path().join("absent.json")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn serializes_gravity_as_millis() {
        let config = GameConfig {
            gravity: Some(Duration::from_millis(250)),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["gravity"], 250);
        assert_eq!(json["spawn"], serde_json::json!([4, 1]));
    }
}
