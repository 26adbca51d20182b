//! Runtime configuration for a [`Visualizer`](crate::Visualizer).

use std::fmt;
use std::time::Duration;

/// Settings shared by the engine and whatever driver presents it.
///
/// With the `serde` feature the struct (de)serialises with every field
/// optional, durations written as whole milliseconds:
///
/// ```json
/// { "rows": 31, "columns": 41, "wall_probability": 0.25, "animation_delay": 2 }
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VisualizerConfig {
    pub rows: i32,
    pub columns: i32,
    /// Chance for each free cell to turn into a wall on "randomise walls".
    pub wall_probability: f64,
    /// Pause a driver should insert after each search step.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub animation_delay: Duration,
    /// Minimum time between two accepted manual moves.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub move_delay: Duration,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            rows: 25,
            columns: 25,
            wall_probability: 0.1,
            animation_delay: Duration::from_millis(5),
            move_delay: Duration::from_millis(100),
        }
    }
}

impl VisualizerConfig {
    /// Check that the values describe a usable grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < 1 || self.columns < 1 {
            return Err(ConfigError::InvalidDimensions {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if !(0.0..=1.0).contains(&self.wall_probability) {
            return Err(ConfigError::InvalidProbability(self.wall_probability));
        }
        Ok(())
    }
}

/// A [`VisualizerConfig`] that cannot be used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidDimensions { rows: i32, columns: i32 },
    InvalidProbability(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { rows, columns } => {
                write!(f, "grid must be at least 1x1, got {rows}x{columns}")
            }
            Self::InvalidProbability(p) => {
                write!(f, "wall probability must lie in [0, 1], got {p}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(feature = "serde")]
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let c: VisualizerConfig =
            serde_json::from_str(r#"{ "rows": 31, "animation_delay": 2 }"#).unwrap();
        assert_eq!(c.rows, 31);
        assert_eq!(c.columns, 25);
        assert_eq!(c.animation_delay, Duration::from_millis(2));
        assert_eq!(c.move_delay, Duration::from_millis(100));
    }

    #[test]
    fn round_trip() {
        let c = VisualizerConfig {
            rows: 9,
            columns: 11,
            wall_probability: 0.3,
            animation_delay: Duration::from_millis(7),
            move_delay: Duration::from_millis(50),
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: VisualizerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
