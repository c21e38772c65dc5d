// Sprite templates loaded from game_config.toml
pub mod object;
pub mod registry;

pub use object::{GameObject, MaskShape};
pub use registry::GameObjectRegistry;
