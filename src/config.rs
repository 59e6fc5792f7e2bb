use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::animation::Easing;
use crate::camera::CameraMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("player.{field} must be {rule}, got {value}")]
    InvalidParam {
        field: &'static str,
        rule: &'static str,
        value: f32,
    },
}

/// Movement tunables of the player. Speeds are units/second.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerParams {
    pub movement_speed: f32,
    pub jump_height: f32,
    pub initial_jump_speed: f32,
    pub gravity: f32,
    pub dash_distance: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
}

impl Default for PlayerParams {
    fn default() -> Self {
        Self {
            movement_speed: 50.0,
            jump_height: 50.0,
            initial_jump_speed: 20.0,
            gravity: 100.0,
            dash_distance: 200.0,
            dash_duration: 0.2,
            dash_cooldown: 1.0,
        }
    }
}

impl PlayerParams {
    /// Rejects tunings that would stall or poison the physics: every value
    /// must be finite, gravity and dash duration strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("movement_speed", self.movement_speed, false),
            ("jump_height", self.jump_height, false),
            ("initial_jump_speed", self.initial_jump_speed, false),
            ("gravity", self.gravity, true),
            ("dash_distance", self.dash_distance, false),
            ("dash_duration", self.dash_duration, true),
            ("dash_cooldown", self.dash_cooldown, false),
        ];
        for (field, value, strict) in checks {
            let ok = value.is_finite() && if strict { value > 0.0 } else { value >= 0.0 };
            if !ok {
                return Err(ConfigError::InvalidParam {
                    field,
                    rule: if strict { "finite and positive" } else { "finite and non-negative" },
                    value,
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    /// World units visible vertically.
    pub view_height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "floorcollision".to_owned(),
            width: 1280,
            height: 720,
            view_height: 1080.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub path: String,
    pub frame_width: f32,
    pub frame_height: f32,
    pub padding: f32,
    pub frame_duration: f32,
    pub easing: Easing,
    pub looping: bool,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            path: "assets/PlayerAtlasSprite.png".to_owned(),
            frame_width: 64.0,
            frame_height: 128.0,
            padding: 0.0,
            frame_duration: 0.4,
            easing: Easing::Linear,
            looping: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub player: PlayerParams,
    /// Bottom-left corner and size of the player's bounding box.
    pub player_bounds: [f32; 4],
    pub player_sprite: SpriteConfig,
    pub camera: CameraMode,
    /// JSON level file; the built-in demo level is used when absent.
    pub level: Option<String>,
    pub debug_hitboxes: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            player: PlayerParams::default(),
            player_bounds: [0.0, 100.0, 64.0, 128.0],
            player_sprite: SpriteConfig::default(),
            camera: CameraMode::FollowSmooth,
            level: None,
            debug_hitboxes: true,
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_yaml::from_str(raw)?;
        cfg.player.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = GameConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.player.gravity, 100.0);
    }

    #[test]
    fn partial_player_section_keeps_other_defaults() {
        let cfg = GameConfig::from_yaml_str(
            "player:\n  gravity: 230\n  movement_speed: 200\ncamera: dead_zone\n",
        )
        .unwrap();

        assert_eq!(cfg.player.gravity, 230.0);
        assert_eq!(cfg.player.movement_speed, 200.0);
        assert_eq!(cfg.player.dash_cooldown, 1.0);
        assert_eq!(cfg.camera, CameraMode::DeadZone);
    }

    #[test]
    fn sprite_easing_parses() {
        let cfg = GameConfig::from_yaml_str("player_sprite:\n  easing: ease_in_out\n").unwrap();
        assert_eq!(cfg.player_sprite.easing, Easing::EaseInOut);
        assert!(cfg.player_sprite.looping);
    }

    #[test]
    fn unknown_camera_mode_is_an_error() {
        assert!(matches!(
            GameConfig::from_yaml_str("camera: orbit\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn zero_dash_duration_is_rejected() {
        let err = GameConfig::from_yaml_str("player:\n  dash_duration: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParam { field: "dash_duration", .. }
        ));
    }

    #[test]
    fn negative_or_non_finite_tuning_is_rejected() {
        for (yaml, field) in [
            ("player:\n  gravity: -230\n", "gravity"),
            ("player:\n  gravity: 0\n", "gravity"),
            ("player:\n  dash_cooldown: -0.5\n", "dash_cooldown"),
            ("player:\n  movement_speed: .nan\n", "movement_speed"),
            ("player:\n  dash_distance: .inf\n", "dash_distance"),
        ] {
            match GameConfig::from_yaml_str(yaml) {
                Err(ConfigError::InvalidParam { field: got, .. }) => assert_eq!(got, field),
                other => panic!("{yaml:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn default_and_shipped_tunings_are_valid() {
        assert!(PlayerParams::default().validate().is_ok());
        let shipped = PlayerParams {
            movement_speed: 200.0,
            jump_height: 300.0,
            gravity: 230.0,
            dash_distance: 400.0,
            dash_duration: 0.4,
            dash_cooldown: 0.5,
            ..PlayerParams::default()
        };
        assert!(shipped.validate().is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            GameConfig::load("does/not/exist.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
