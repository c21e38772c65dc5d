use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game_object::GameObject;
use crate::geometry::Rect;
use crate::mask::Mask;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityController {
    Player,
    Static,
}

/// Something drawn on screen. Flags are copied from the template at spawn.
#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub object_id: String,  // Reference to GameObject
    pub rect: Rect,
    pub mask: Mask,
    pub color: String,
    pub controller: EntityController,
    pub collidable: bool,
    pub blocking: bool,
    pub impassable: bool,
}

impl Entity {
    pub fn from_template(id: EntityId, template: &GameObject, controller: EntityController) -> Self {
        let mask = template.build_mask();
        Self {
            id,
            object_id: template.id.clone(),
            rect: Rect::new(0, 0, mask.width(), mask.height()),
            mask,
            color: template.color.clone(),
            controller,
            collidable: template.collidable || template.blocking || template.impassable,
            blocking: template.blocking,
            impassable: template.impassable,
        }
    }

    pub fn is_player(&self) -> bool {
        self.controller == EntityController::Player
    }

    /// Place the entity so its centre sits on `center`.
    pub fn spawn(mut self, center: (i32, i32)) -> Self {
        self.rect = self.rect.with_center(center);
        self
    }

    /// Place the entity fully inside `bounds`, outside the square of half-width
    /// `clearance` around the bounds centre. Gives up on the clearance after a
    /// bounded number of draws so a crowded screen still spawns.
    pub fn random_spawn<R: Rng>(mut self, bounds: &Rect, clearance: u32, rng: &mut R) -> Self {
        let max_x = (bounds.width.saturating_sub(self.rect.width)) as i32;
        let max_y = (bounds.height.saturating_sub(self.rect.height)) as i32;
        let (cx, cy) = bounds.center();
        let half = clearance.min(i32::MAX as u32 / 2) as i32;
        let keep_out = Rect::new(
            cx.saturating_sub(half),
            cy.saturating_sub(half),
            clearance.saturating_mul(2),
            clearance.saturating_mul(2),
        );

        for _ in 0..64 {
            self.rect.x = bounds.x + rng.gen_range(0..=max_x);
            self.rect.y = bounds.y + rng.gen_range(0..=max_y);
            if clearance == 0 || !self.rect.intersects(&keep_out) {
                break;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_object::MaskShape;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tree() -> GameObject {
        GameObject::new("tree", "Tree", "obstacle", 32, 48)
            .with_shape(MaskShape::Ellipse)
            .blocking()
    }

    #[test]
    fn copies_flags_from_template() {
        let entity = Entity::from_template(EntityId(3), &tree(), EntityController::Static);
        assert!(entity.collidable && entity.blocking && !entity.impassable);
        assert_eq!((entity.rect.width, entity.rect.height), (32, 48));
        assert_eq!(entity.object_id, "tree");
        assert!(!entity.is_player());
    }

    #[test]
    fn spawn_centres_the_rect() {
        let entity = Entity::from_template(EntityId(1), &tree(), EntityController::Static).spawn((400, 300));
        assert_eq!(entity.rect.center(), (400, 300));
    }

    #[test]
    fn random_spawn_stays_on_screen_and_off_centre() {
        let bounds = Rect::new(0, 0, 800, 600);
        let keep_out = Rect::new(360, 260, 80, 80);
        let mut rng = StdRng::seed_from_u64(42);
        for i in 0..200 {
            let entity = Entity::from_template(EntityId(i), &tree(), EntityController::Static)
                .random_spawn(&bounds, 40, &mut rng);
            assert!(bounds.contains_rect(&entity.rect), "{:?} off screen", entity.rect);
            assert!(!entity.rect.intersects(&keep_out), "{:?} spawned on the player", entity.rect);
        }
    }

    #[test]
    fn random_spawn_handles_screen_sized_sprite() {
        let bounds = Rect::new(0, 0, 32, 48);
        let mut rng = StdRng::seed_from_u64(1);
        let entity = Entity::from_template(EntityId(0), &tree(), EntityController::Static)
            .random_spawn(&bounds, 0, &mut rng);
        assert_eq!((entity.rect.x, entity.rect.y), (0, 0));
    }

    #[test]
    fn random_spawn_survives_clearance_past_i32() {
        let bounds = Rect::new(0, 0, 800, 600);
        let mut rng = StdRng::seed_from_u64(9);
        let entity = Entity::from_template(EntityId(0), &tree(), EntityController::Static)
            .random_spawn(&bounds, u32::MAX, &mut rng);
        assert!(bounds.contains_rect(&entity.rect));
    }
}
