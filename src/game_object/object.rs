use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::mask::Mask;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskShape {
    #[default]
    Rect,
    Ellipse,
}

/// Template every sprite on screen is stamped from.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameObject {
    pub id: String,
    pub name: String,
    pub object_type: String,  // "player" or "obstacle"
    pub size: [u32; 2],
    #[serde(default)]
    pub shape: MaskShape,
    /// Ascii mask rows, overrides `shape` when present
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<Vec<String>>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub collidable: bool,
    #[serde(default)]
    pub blocking: bool,
    /// Collisions with this object cancel the whole move
    #[serde(default)]
    pub impassable: bool,
    #[serde(default)]
    pub spawn_count: u32,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

fn default_color() -> String {
    "#ffffff".to_string()
}

impl GameObject {
    pub fn new(id: &str, name: &str, object_type: &str, width: u32, height: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            object_type: object_type.to_string(),
            size: [width, height],
            shape: MaskShape::Rect,
            mask: None,
            color: default_color(),
            collidable: false,
            blocking: false,
            impassable: false,
            spawn_count: 0,
            properties: HashMap::new(),
        }
    }

    pub fn with_shape(mut self, shape: MaskShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn with_spawn_count(mut self, count: u32) -> Self {
        self.spawn_count = count;
        self
    }

    pub fn collidable(mut self) -> Self {
        self.collidable = true;
        self
    }

    /// Blocking objects are always collidable too.
    pub fn blocking(mut self) -> Self {
        self.collidable = true;
        self.blocking = true;
        self
    }

    pub fn impassable(mut self) -> Self {
        self.collidable = true;
        self.impassable = true;
        self
    }

    #[cfg(test)]
    pub fn with_mask_rows(mut self, rows: Vec<String>) -> Self {
        self.mask = Some(rows);
        self
    }

    /// Pixel mask for this template. Ascii rows win over the shape.
    pub fn build_mask(&self) -> Mask {
        match &self.mask {
            Some(rows) => Mask::from_rows(rows),
            None => match self.shape {
                MaskShape::Rect => Mask::filled(self.size[0], self.size[1]),
                MaskShape::Ellipse => Mask::ellipse(self.size[0], self.size[1]),
            },
        }
    }

    /// Width and height actually occupied on screen. A custom mask decides its own size.
    pub fn footprint(&self) -> (u32, u32) {
        match &self.mask {
            Some(_) => {
                let mask = self.build_mask();
                (mask.width(), mask.height())
            }
            None => (self.size[0], self.size[1]),
        }
    }
}
