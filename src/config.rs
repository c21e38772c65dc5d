use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::game_object::{GameObject, MaskShape};
use crate::geometry::Rect;

/// Largest screen side accepted, keeps pixel arithmetic well inside i32
pub const MAX_SCREEN_SIDE: u32 = 16_384;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
}

impl ScreenConfig {
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn center(&self) -> (i32, i32) {
        (self.width as i32 / 2, self.height as i32 / 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct MovementConfig {
    pub move_speed: i32,          // Pixels the world scrolls per step
    pub collision_distance: i32,  // How far ahead the prediction looks
    pub tick_rate: u32,           // Ticks per second
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameConfig {
    /// Half-width of the square around the centre kept free of obstacles at spawn
    #[serde(default)]
    pub spawn_clearance: u32,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub screen: ScreenConfig,
    pub movement: MovementConfig,
    pub server: ServerConfig,
    pub game_objects: Vec<GameObject>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let game_objects = vec![
            GameObject::new("grass", "Grass", "obstacle", 16, 16)
                .with_color("#4caf50")
                .with_spawn_count(20),
            GameObject::new("stone", "Stone", "obstacle", 24, 20)
                .with_shape(MaskShape::Ellipse)
                .with_color("#9e9e9e")
                .with_spawn_count(20)
                .impassable(),
            GameObject::new("tree", "Tree", "obstacle", 32, 48)
                .with_shape(MaskShape::Ellipse)
                .with_color("#2e7d32")
                .with_spawn_count(10)
                .blocking(),
            GameObject::new("player", "Player", "player", 24, 24)
                .with_shape(MaskShape::Ellipse)
                .with_color("#ffeb3b"),
        ];

        Self {
            spawn_clearance: 40,
            seed: None,
            screen: ScreenConfig { width: 800, height: 600 },
            movement: MovementConfig {
                move_speed: 4,
                collision_distance: 4,
                tick_rate: 60,
            },
            server: ServerConfig { port: 3000 },
            game_objects,
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: GameConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject configs that would make an unplayable or degenerate game.
    pub fn validate(&self) -> Result<()> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(Error::InvalidConfig("screen size must be non-zero".into()));
        }
        if self.screen.width > MAX_SCREEN_SIDE || self.screen.height > MAX_SCREEN_SIDE {
            return Err(Error::InvalidConfig(format!(
                "screen size cannot exceed {}x{}",
                MAX_SCREEN_SIDE, MAX_SCREEN_SIDE
            )));
        }
        if self.spawn_clearance > self.screen.width.min(self.screen.height) / 2 {
            return Err(Error::InvalidConfig(
                "spawn_clearance cannot exceed half the smaller screen side".into(),
            ));
        }
        if self.movement.tick_rate == 0 {
            return Err(Error::InvalidConfig("tick_rate must be at least 1".into()));
        }
        if self.movement.move_speed < 0 || self.movement.collision_distance < 0 {
            return Err(Error::InvalidConfig(
                "move_speed and collision_distance cannot be negative".into(),
            ));
        }

        let mut seen = HashSet::new();
        for obj in &self.game_objects {
            if !seen.insert(obj.id.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate object id '{}'", obj.id)));
            }
            let (w, h) = obj.footprint();
            if w == 0 || h == 0 {
                return Err(Error::InvalidConfig(format!("object '{}' has an empty size", obj.id)));
            }
            if w > self.screen.width || h > self.screen.height {
                return Err(Error::InvalidConfig(format!(
                    "object '{}' ({}x{}) does not fit on screen",
                    obj.id, w, h
                )));
            }
            if let Some(rows) = &obj.mask {
                if let Some(bad) = rows.iter().flat_map(|r| r.chars()).find(|c| !"#X. ".contains(*c)) {
                    return Err(Error::InvalidConfig(format!(
                        "object '{}' mask has unexpected character '{}'",
                        obj.id, bad
                    )));
                }
            }
        }

        for obj in self.game_objects.iter().filter(|o| o.collidable || o.blocking || o.impassable) {
            if obj.build_mask().count() == 0 {
                return Err(Error::InvalidConfig(format!(
                    "collidable object '{}' has no solid pixels",
                    obj.id
                )));
            }
        }

        if !self.game_objects.iter().any(|o| o.object_type == "player") {
            return Err(Error::InvalidConfig("no object with object_type = \"player\"".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        config.validate().unwrap();
        assert_eq!(config.screen.center(), (400, 300));
    }

    #[test]
    fn save_then_load_keeps_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game_config.toml");
        let mut config = GameConfig::default();
        config.seed = Some(7);
        config.save(&path).unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded.seed, Some(7));
        assert_eq!(loaded.game_objects.len(), config.game_objects.len());
        let tree = loaded.game_objects.iter().find(|o| o.id == "tree").unwrap();
        assert!(tree.blocking);
        assert_eq!(tree.shape, MaskShape::Ellipse);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "screen = 12").unwrap();
        assert!(matches!(GameConfig::load(&path).unwrap_err(), Error::TomlDe(_)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut config = GameConfig::default();
        config.game_objects.push(GameObject::new("tree", "Tree", "obstacle", 8, 8));
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_missing_player() {
        let mut config = GameConfig::default();
        config.game_objects.retain(|o| o.object_type != "player");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_mask_characters() {
        let mut config = GameConfig::default();
        config.game_objects[0].mask = Some(vec!["#?#".into()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_collidable_object_without_solid_pixels() {
        let mut config = GameConfig::default();
        let stone = config.game_objects.iter_mut().find(|o| o.id == "stone").unwrap();
        stone.mask = Some(vec!["....".into(), "....".into()]);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_clearance_wider_than_the_screen() {
        let mut config = GameConfig::default();
        config.spawn_clearance = 3_000_000_000;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        config.spawn_clearance = 300;
        config.validate().unwrap();
        config.spawn_clearance = 301;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_oversized_screen() {
        let mut config = GameConfig::default();
        config.screen = ScreenConfig { width: 70_000, height: 70_000 };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_tick_rate() {
        let mut config = GameConfig::default();
        config.movement.tick_rate = 0;
        assert!(config.validate().is_err());
    }
}
