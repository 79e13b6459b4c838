//! World records exactly as the server asserts them.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Position;

/// Player identifier. The server may send ids as strings or integers; both
/// are normalized to strings so they can key the JSON `players` objects.
pub type PlayerId = String;

/// Compass direction a player sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    #[serde(alias = "up")]
    North,
    #[default]
    #[serde(alias = "down")]
    South,
    #[serde(alias = "right")]
    East,
    #[serde(alias = "left")]
    West,
}

impl Facing {
    pub const fn as_str(self) -> &'static str {
        match self {
            Facing::North => "north",
            Facing::South => "south",
            Facing::East => "east",
            Facing::West => "west",
        }
    }
}

/// Movement requested by the local player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            MoveDirection::Up => "up",
            MoveDirection::Down => "down",
            MoveDirection::Left => "left",
            MoveDirection::Right => "right",
        }
    }

    /// Parse the wire name of a direction (`"up"`, `"down"`, ...).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "up" => Some(MoveDirection::Up),
            "down" => Some(MoveDirection::Down),
            "left" => Some(MoveDirection::Left),
            "right" => Some(MoveDirection::Right),
            _ => None,
        }
    }
}

/// A player as last reported by the server. Always replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    #[serde(deserialize_with = "player_id")]
    pub id: PlayerId,
    #[serde(default)]
    pub username: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub facing: Facing,
    #[serde(default)]
    pub animation_frame: usize,
    pub avatar: String,
}

impl PlayerRecord {
    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Appearance of a character: one frame sequence per facing direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarDescriptor {
    pub name: String,
    #[serde(default)]
    pub frames: HashMap<String, Vec<String>>,
}

impl AvatarDescriptor {
    /// Frame URIs for a direction, if the avatar defines any.
    pub fn frames_for(&self, facing: Facing) -> Option<&[String]> {
        self.frames.get(facing.as_str()).map(Vec::as_slice)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for PlayerId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

pub(crate) fn player_id<'de, D>(deserializer: D) -> Result<PlayerId, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(Into::into)
}

pub(crate) fn optional_player_id<'de, D>(deserializer: D) -> Result<Option<PlayerId>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_defaults() {
        let player: PlayerRecord =
            serde_json::from_str(r#"{"id":"p1","x":10,"y":20.5,"avatar":"a1"}"#).unwrap();
        assert_eq!(player.username, "");
        assert_eq!(player.facing, Facing::South);
        assert_eq!(player.animation_frame, 0);
        assert_eq!(player.position(), Position::new(10.0, 20.5));
    }

    #[test]
    fn test_numeric_player_id() {
        let player: PlayerRecord = serde_json::from_str(
            r#"{"id":7,"username":"bob","x":0,"y":0,"facing":"west","animationFrame":2,"avatar":"a"}"#,
        )
        .unwrap();
        assert_eq!(player.id, "7");
        assert_eq!(player.facing, Facing::West);
        assert_eq!(player.animation_frame, 2);
    }

    #[test]
    fn test_unknown_facing_is_rejected() {
        let result = serde_json::from_str::<PlayerRecord>(
            r#"{"id":"p","x":0,"y":0,"facing":"sideways","avatar":"a"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_frames_for_direction() {
        let avatar: AvatarDescriptor = serde_json::from_str(
            r#"{"name":"a1","frames":{"south":["s0.png","s1.png"],"east":["e0.png"]}}"#,
        )
        .unwrap();
        assert_eq!(avatar.frames_for(Facing::South).map(<[String]>::len), Some(2));
        assert_eq!(avatar.frames_for(Facing::East), Some(&["e0.png".to_string()][..]));
        assert!(avatar.frames_for(Facing::North).is_none());
    }

    #[test]
    fn test_move_direction_parse() {
        assert_eq!(MoveDirection::parse("left"), Some(MoveDirection::Left));
        assert_eq!(MoveDirection::parse("Left"), None);
        assert_eq!(MoveDirection::Right.as_str(), "right");
    }
}
