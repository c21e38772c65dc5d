use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::{GameConfig, MovementConfig, ScreenConfig};
use crate::entity::{Entity, EntityController, EntityId};
use crate::error::{Error, Result};
use crate::event::{EventKind, EventManager, GameEvent};
use crate::game_object::GameObjectRegistry;
use crate::geometry::Direction;
use crate::map_generator::MapGenerator;
use crate::mask::collide_mask;
use crate::message::{GameMessage, PlayerCommand};
use crate::world::ScreenGroup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The world scrolled; `held` are blocking sprites that stayed put.
    Moved { held: Vec<EntityId> },
    /// A collide handler refused the move. Nothing changed.
    Vetoed { by: EntityId },
    /// There is no player to move.
    NoPlayer,
}

/// Collide handler installed by default: impassable sprites stop the player.
pub fn stop_at_impassable(event: &GameEvent<'_>) -> bool {
    match event {
        GameEvent::Collide { sprite, .. } => !sprite.impassable,
        _ => true,
    }
}

pub struct GameState {
    pub world: ScreenGroup,
    pub player_id: EntityId,
    pub events: EventManager,
    pub object_registry: GameObjectRegistry,
    pub screen: ScreenConfig,
    pub movement: MovementConfig,
    pub spawn_clearance: u32,
    pub heading: Option<Direction>,  // Direction the player walks while a key is held
    pub frame: u64,
    running: bool,
    contacts: HashSet<EntityId>,  // Sprites the prediction touched on the last step
    messages: Vec<GameMessage>,
    next_id: u64,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut state = Self::with_rng(config, rng)?;
        state.events.subscribe(EventKind::Collide, stop_at_impassable);
        Ok(state)
    }

    /// Build a game without any event handlers subscribed.
    pub fn with_rng(config: &GameConfig, rng: StdRng) -> Result<Self> {
        info!("Initiating game");
        let object_registry = GameObjectRegistry::load_from_config(config);
        let player_template = object_registry
            .player_template()
            .ok_or_else(|| Error::InvalidConfig("no player object configured".into()))?;

        let player_id = EntityId(0);
        let player = Entity::from_template(player_id, player_template, EntityController::Player)
            .spawn(config.screen.center());

        let mut state = Self {
            world: ScreenGroup::new(),
            player_id,
            events: EventManager::new(),
            object_registry,
            screen: config.screen,
            movement: config.movement,
            spawn_clearance: config.spawn_clearance,
            heading: None,
            frame: 0,
            running: false,
            contacts: HashSet::new(),
            messages: Vec::new(),
            next_id: 1,
            rng,
        };
        state.generate_background();
        state.world.add(player);
        Ok(state)
    }

    /// Scatter the obstacle field. Obstacles are added beneath the player.
    pub fn generate_background(&mut self) {
        let background = MapGenerator::generate_background(
            &self.object_registry,
            &self.screen.bounds(),
            self.spawn_clearance,
            &mut self.next_id,
            &mut self.rng,
        );
        info!(count = background.len(), "Background generated");
        self.world.extend(background);
    }

    /// Throw away every obstacle and scatter a fresh field around the player.
    pub fn regenerate(&mut self) {
        let player = self.world.remove(self.player_id);
        self.world.clear();
        self.contacts.clear();
        self.generate_background();
        if self.world.is_empty() {
            warn!("regenerated meadow has no obstacles");
        }
        if let Some(player) = player {
            self.world.add(player.spawn(self.screen.center()));
        }
        self.messages.push(GameMessage::level_event("A new meadow grows".to_string()));
    }

    pub fn player(&self) -> Option<&Entity> {
        self.world.get(self.player_id)
    }

    /// Try to scroll the world one step in `direction`, which moves the player
    /// the opposite way relative to the field.
    ///
    /// The player's mask is tested `collision_distance` pixels ahead of the
    /// screen centre. Every collidable sprite it touches is reported through
    /// `Collide`; any handler answering `false` cancels the move outright.
    /// Blocking sprites that were touched are left in place while the rest of
    /// the world scrolls.
    pub fn scroll(&mut self, direction: Direction) -> MoveOutcome {
        let Some(player) = self.world.get(self.player_id) else {
            warn!("scroll requested without a player");
            return MoveOutcome::NoPlayer;
        };

        let ahead = direction
            .opposite()
            .move_point(self.screen.center(), self.movement.collision_distance);
        // Centred on the shifted point, not anchored there by its top-left corner.
        let predicted_rect = player.rect.with_center(ahead);
        let predicted_mask = &player.mask;

        let mut exclude = vec![self.player_id];
        let mut held = Vec::new();
        let mut touched = HashSet::new();

        for sprite in self.world.sprites() {
            if sprite.is_player()
                || !sprite.collidable
                || !collide_mask(&sprite.rect, &sprite.mask, &predicted_rect, predicted_mask)
            {
                continue;
            }

            let name = self
                .object_registry
                .get_object(&sprite.object_id)
                .map_or(sprite.object_id.as_str(), |o| o.name.as_str());
            let first_contact = !self.contacts.contains(&sprite.id);
            touched.insert(sprite.id);

            let results = self.events.emit(&GameEvent::Collide { world: &self.world, sprite });
            if !results.iter().all(|allowed| *allowed) {
                debug!(sprite = sprite.id.0, ?direction, "move vetoed");
                if first_contact {
                    self.messages.push(GameMessage::blocked(name, sprite.id));
                }
                self.contacts = touched;
                return MoveOutcome::Vetoed { by: sprite.id };
            }

            if first_contact {
                self.messages.push(GameMessage::collision(name, sprite.id));
            }
            if sprite.blocking {
                exclude.push(sprite.id);
                held.push(sprite.id);
            }
        }

        self.contacts = touched;
        self.world.move_all(direction, self.movement.move_speed, &exclude);
        MoveOutcome::Moved { held }
    }

    /// Apply a client command. Returns whether the world may have changed.
    pub fn handle_command(&mut self, cmd: &PlayerCommand) -> bool {
        let action = cmd.action.as_str();
        if let Some(heading) = Direction::from_action(action) {
            return matches!(self.scroll(heading.opposite()), MoveOutcome::Moved { .. });
        }
        if let Some(heading) = action.strip_prefix("hold_").and_then(Direction::from_suffix) {
            self.heading = Some(heading);
            return false;
        }
        match action {
            "stop" => {
                self.heading = None;
                false
            }
            "regenerate" => {
                self.regenerate();
                true
            }
            _ => {
                debug!(action, "ignoring unknown command");
                false
            }
        }
    }

    /// Advance one frame: notify tick observers, then walk if a key is held.
    /// Returns whether the world changed.
    pub fn tick(&mut self) -> bool {
        self.frame += 1;
        self.events.emit(&GameEvent::Tick { frame: self.frame });
        match self.heading {
            Some(heading) => matches!(self.scroll(heading.opposite()), MoveOutcome::Moved { .. }),
            None => false,
        }
    }

    pub fn start(&mut self) {
        info!("Starting main game loop");
        self.running = true;
    }

    pub fn quit(&mut self) {
        if self.running {
            info!("Terminating main game loop");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn push_message(&mut self, message: GameMessage) {
        self.messages.push(message);
    }

    pub fn has_pending_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn take_messages(&mut self) -> Vec<GameMessage> {
        std::mem::take(&mut self.messages)
    }
}
