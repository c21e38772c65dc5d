use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum MessageType {
    Collision,
    LevelEvent,
    System,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GameMessage {
    pub message_type: MessageType,
    pub text: String,  // Pre-formatted message text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
}

impl GameMessage {
    pub fn collision(name: &str, sprite: EntityId) -> Self {
        Self {
            message_type: MessageType::Collision,
            text: format!("Bumped into {}", name),
            sprite: Some(sprite),
            blocked: Some(false),
        }
    }

    pub fn blocked(name: &str, sprite: EntityId) -> Self {
        Self {
            message_type: MessageType::Collision,
            text: format!("{} is in the way", name),
            sprite: Some(sprite),
            blocked: Some(true),
        }
    }

    pub fn level_event(text: String) -> Self {
        Self {
            message_type: MessageType::LevelEvent,
            text,
            sprite: None,
            blocked: None,
        }
    }

    pub fn system(text: String) -> Self {
        Self {
            message_type: MessageType::System,
            text,
            sprite: None,
            blocked: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlayerCommand {
    pub action: String,  // "move_up", "hold_left", "stop", "regenerate", ...
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let json = serde_json::to_value(GameMessage::system("hi".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "message_type": "System", "text": "hi" }));
    }

    #[test]
    fn blocked_message_names_the_sprite() {
        let msg = GameMessage::blocked("Stone", EntityId(4));
        assert_eq!(msg.text, "Stone is in the way");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sprite"], 4);
        assert_eq!(json["blocked"], true);
    }

    #[test]
    fn parses_client_command() {
        let cmd: PlayerCommand = serde_json::from_str(r#"{"action":"move_left"}"#).unwrap();
        assert_eq!(cmd.action, "move_left");
    }
}
