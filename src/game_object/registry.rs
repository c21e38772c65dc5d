use std::collections::HashMap;
use crate::game_object::object::GameObject;

pub const PLAYER_OBJECT_ID: &str = "player";

pub struct GameObjectRegistry {
    objects: HashMap<String, GameObject>,
    order: Vec<String>,  // Config order, so spawning is reproducible for a given seed
}

impl GameObjectRegistry {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn load_from_config(config: &crate::config::GameConfig) -> Self {
        let mut registry = Self::new();
        for obj in &config.game_objects {
            registry.insert(obj.clone());
        }
        registry
    }

    pub fn insert(&mut self, obj: GameObject) {
        if !self.objects.contains_key(&obj.id) {
            self.order.push(obj.id.clone());
        }
        self.objects.insert(obj.id.clone(), obj);
    }

    pub fn get_object(&self, id: &str) -> Option<&GameObject> {
        self.objects.get(id)
    }

    pub fn get_all_objects(&self) -> Vec<&GameObject> {
        self.order.iter().filter_map(|id| self.objects.get(id)).collect()
    }

    pub fn get_objects_by_type(&self, object_type: &str) -> Vec<&GameObject> {
        self.get_all_objects()
            .into_iter()
            .filter(|obj| obj.object_type == object_type)
            .collect()
    }

    /// The player template: the object with id "player", else the first "player" typed object.
    pub fn player_template(&self) -> Option<&GameObject> {
        self.get_object(PLAYER_OBJECT_ID)
            .or_else(|| self.get_objects_by_type("player").into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn keeps_config_order() {
        let registry = GameObjectRegistry::load_from_config(&GameConfig::default());
        let ids: Vec<&str> = registry
            .get_objects_by_type("obstacle")
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(ids, vec!["grass", "stone", "tree"]);
    }

    #[test]
    fn player_template_falls_back_to_type() {
        let mut registry = GameObjectRegistry::new();
        assert!(registry.player_template().is_none());
        registry.insert(GameObject::new("hero", "Hero", "player", 16, 16));
        assert_eq!(registry.player_template().map(|o| o.id.as_str()), Some("hero"));
    }

    #[test]
    fn reinserting_replaces_without_duplicating() {
        let mut registry = GameObjectRegistry::new();
        registry.insert(GameObject::new("stone", "Stone", "obstacle", 8, 8));
        registry.insert(GameObject::new("stone", "Big Stone", "obstacle", 16, 16));
        assert_eq!(registry.get_all_objects().len(), 1);
        assert_eq!(registry.get_object("stone").map(|o| o.size), Some([16, 16]));
    }
}
