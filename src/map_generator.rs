use rand::Rng;
use tracing::{debug, warn};

use crate::entity::{Entity, EntityController, EntityId};
use crate::game_object::GameObjectRegistry;
use crate::geometry::Rect;

pub struct MapGenerator;

impl MapGenerator {
    /// Scatter `spawn_count` copies of every obstacle template across the screen.
    /// Ids are handed out from `next_id`, which is advanced past the last one used.
    pub fn generate_background<R: Rng>(
        object_registry: &GameObjectRegistry,
        bounds: &Rect,
        clearance: u32,
        next_id: &mut u64,
        rng: &mut R,
    ) -> Vec<Entity> {
        let mut entities = Vec::new();

        for template in object_registry.get_objects_by_type("obstacle") {
            if template.spawn_count == 0 {
                continue;
            }
            let (width, height) = template.footprint();
            if !bounds.contains_rect(&Rect::new(bounds.x, bounds.y, width, height)) {
                warn!(object = %template.id, "template larger than the screen, skipping");
                continue;
            }

            for _ in 0..template.spawn_count {
                let id = EntityId(*next_id);
                *next_id += 1;
                let entity = Entity::from_template(id, template, EntityController::Static)
                    .random_spawn(bounds, clearance, rng);
                entities.push(entity);
            }
            debug!(object = %template.id, count = template.spawn_count, "spawned obstacles");
        }

        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game_object::GameObject;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawns_configured_counts() {
        let config = GameConfig::default();
        let registry = GameObjectRegistry::load_from_config(&config);
        let mut next_id = 1;
        let mut rng = StdRng::seed_from_u64(5);
        let entities = MapGenerator::generate_background(
            &registry,
            &config.screen.bounds(),
            config.spawn_clearance,
            &mut next_id,
            &mut rng,
        );

        let count = |id: &str| entities.iter().filter(|e| e.object_id == id).count();
        assert_eq!(count("grass"), 20);
        assert_eq!(count("stone"), 20);
        assert_eq!(count("tree"), 10);
        assert_eq!(count("player"), 0);
        assert_eq!(next_id, 51);
        assert!(entities.iter().all(|e| config.screen.bounds().contains_rect(&e.rect)));
    }

    #[test]
    fn skips_templates_larger_than_the_screen() {
        let mut registry = GameObjectRegistry::new();
        registry.insert(GameObject::new("boulder", "Boulder", "obstacle", 120, 40).with_spawn_count(3));
        registry.insert(GameObject::new("pebble", "Pebble", "obstacle", 4, 4).with_spawn_count(2));
        let mut next_id = 0;
        let mut rng = StdRng::seed_from_u64(3);
        let entities =
            MapGenerator::generate_background(&registry, &Rect::new(0, 0, 100, 100), 0, &mut next_id, &mut rng);
        assert_eq!(entities.len(), 2);
        assert!(entities.iter().all(|e| e.object_id == "pebble"));
        assert_eq!(next_id, 2);
    }

    #[test]
    fn same_seed_same_field() {
        let config = GameConfig::default();
        let registry = GameObjectRegistry::load_from_config(&config);
        let run = |seed| {
            let mut next_id = 0;
            let mut rng = StdRng::seed_from_u64(seed);
            MapGenerator::generate_background(&registry, &config.screen.bounds(), 40, &mut next_id, &mut rng)
                .into_iter()
                .map(|e| e.rect)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }
}
