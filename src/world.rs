use crate::entity::{Entity, EntityId};
use crate::geometry::Direction;

/// Everything on screen, in draw order.
#[derive(Clone, Debug, Default)]
pub struct ScreenGroup {
    entities: Vec<Entity>,
}

impl ScreenGroup {
    pub fn new() -> Self {
        Self { entities: Vec::new() }
    }

    pub fn add(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn extend(&mut self, entities: impl IntoIterator<Item = Entity>) {
        self.entities.extend(entities);
    }

    pub fn sprites(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Shift every entity not listed in `exclude` by `distance` pixels along `direction`.
    pub fn move_all(&mut self, direction: Direction, distance: i32, exclude: &[EntityId]) {
        let (dx, dy) = direction.offset();
        for entity in self.entities.iter_mut().filter(|e| !exclude.contains(&e.id)) {
            entity.rect.translate(dx * distance, dy * distance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityController;
    use crate::game_object::GameObject;

    fn rock(id: u64, center: (i32, i32)) -> Entity {
        let template = GameObject::new("rock", "Rock", "obstacle", 10, 10);
        Entity::from_template(EntityId(id), &template, EntityController::Static).spawn(center)
    }

    #[test]
    fn move_all_skips_excluded() {
        let mut group = ScreenGroup::new();
        group.add(rock(1, (100, 100)));
        group.add(rock(2, (200, 200)));
        group.move_all(Direction::UpRight, 3, &[EntityId(2)]);

        assert_eq!(group.get(EntityId(1)).unwrap().rect.center(), (103, 97));
        assert_eq!(group.get(EntityId(2)).unwrap().rect.center(), (200, 200));
    }

    #[test]
    fn remove_keeps_order() {
        let mut group = ScreenGroup::new();
        group.extend((1..=3).map(|i| rock(i, (0, 0))));
        assert_eq!(group.remove(EntityId(2)).map(|e| e.id), Some(EntityId(2)));
        assert!(group.remove(EntityId(2)).is_none());
        let ids: Vec<u64> = group.sprites().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(group.len(), 2);
        group.clear();
        assert!(group.is_empty());
    }
}
