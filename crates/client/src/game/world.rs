// World state mirror - players and avatars exactly as the server reports them
use std::collections::HashMap;

use glam::Vec2;
use protocol::packets::{JoinResponse, PlayerJoined, PlayerLeft, PlayersMoved};
use protocol::{AvatarDescriptor, PlayerId, PlayerRecord, ServerMessage};

/// What applying a server message did to the mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// State changed; the scene must be redrawn.
    Redraw,
    /// The server refused our join request.
    Rejected(String),
    /// Message carried an action this client does not handle.
    Ignored(String),
}

/// Cache of server-asserted truth. The client never mutates it on its own.
#[derive(Debug, Default)]
pub struct World {
    players: HashMap<PlayerId, PlayerRecord>,
    avatars: HashMap<String, AvatarDescriptor>,
    self_id: Option<PlayerId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch a decoded message to the matching mutation.
    pub fn apply(&mut self, message: ServerMessage) -> Applied {
        match message {
            ServerMessage::JoinGame(JoinResponse { success: false, error, .. }) => {
                Applied::Rejected(error.unwrap_or_else(|| "join refused".to_string()))
            }
            ServerMessage::JoinGame(JoinResponse { player_id: None, .. }) => {
                Applied::Rejected("join accepted without a player id".to_string())
            }
            ServerMessage::JoinGame(JoinResponse {
                player_id: Some(self_id),
                players,
                avatars,
                ..
            }) => {
                self.on_join_accepted(self_id, players, avatars);
                Applied::Redraw
            }
            ServerMessage::PlayerJoined(PlayerJoined { player, avatar }) => {
                self.on_player_joined(player, avatar);
                Applied::Redraw
            }
            ServerMessage::PlayersMoved(PlayersMoved { players }) => {
                self.on_players_moved(players.into_values());
                Applied::Redraw
            }
            ServerMessage::PlayerLeft(PlayerLeft { player_id }) => {
                self.on_player_left(&player_id);
                Applied::Redraw
            }
            ServerMessage::Unknown(action) => Applied::Ignored(action),
        }
    }

    /// Take the join snapshot: players are replaced, avatars are added.
    pub fn on_join_accepted(
        &mut self,
        self_id: PlayerId,
        players: HashMap<PlayerId, PlayerRecord>,
        avatars: HashMap<String, AvatarDescriptor>,
    ) {
        self.self_id = Some(self_id);
        self.players = players;
        for (name, avatar) in avatars {
            self.insert_avatar(name, avatar);
        }
    }

    pub fn on_player_joined(&mut self, player: PlayerRecord, avatar: AvatarDescriptor) {
        self.insert_avatar(avatar.name.clone(), avatar);
        self.upsert(player);
    }

    /// Records replace whatever was stored under the same id, field for field.
    pub fn on_players_moved(&mut self, players: impl IntoIterator<Item = PlayerRecord>) {
        for player in players {
            self.upsert(player);
        }
    }

    /// Returns whether a record was removed. The avatar stays: others may use it.
    pub fn on_player_left(&mut self, id: &str) -> bool {
        self.players.remove(id).is_some()
    }

    pub fn player(&self, id: &str) -> Option<&PlayerRecord> {
        self.players.get(id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn avatar(&self, name: &str) -> Option<&AvatarDescriptor> {
        self.avatars.get(name)
    }

    pub fn self_id(&self) -> Option<&str> {
        self.self_id.as_deref()
    }

    pub fn local_player(&self) -> Option<&PlayerRecord> {
        self.self_id.as_deref().and_then(|id| self.players.get(id))
    }

    /// Camera focus; `None` until the local player has a record.
    pub fn local_position(&self) -> Option<Vec2> {
        self.local_player().map(PlayerRecord::position)
    }

    fn upsert(&mut self, player: PlayerRecord) {
        self.players.insert(player.id.clone(), player);
    }

    /// Descriptors are immutable once known.
    fn insert_avatar(&mut self, name: String, avatar: AvatarDescriptor) {
        self.avatars.entry(name).or_insert(avatar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use protocol::Facing;

    fn player(id: &str, x: f32, y: f32) -> PlayerRecord {
        PlayerRecord {
            id: id.to_string(),
            username: format!("user-{id}"),
            x,
            y,
            facing: Facing::South,
            animation_frame: 0,
            avatar: "a1".to_string(),
        }
    }

    fn avatar(name: &str, frame: &str) -> AvatarDescriptor {
        AvatarDescriptor {
            name: name.to_string(),
            frames: HashMap::from([("south".to_string(), vec![frame.to_string()])]),
        }
    }

    #[test]
    fn test_join_response_end_to_end() {
        let text = r#"{"action":"join_game","success":true,"playerId":"p1",
            "players":{"p1":{"id":"p1","x":1000,"y":1000,"facing":"south","avatar":"a1"}},
            "avatars":{"a1":{"name":"a1","frames":{"south":["img0.png"]}}}}"#;
        let mut world = World::new();
        let applied = world.apply(ServerMessage::decode(text).unwrap());

        assert_eq!(applied, Applied::Redraw);
        assert_eq!(world.player_count(), 1);
        assert_eq!(world.self_id(), Some("p1"));
        assert!(world.avatar("a1").is_some());

        let camera = Camera::follow(
            world.local_position(),
            Vec2::new(800.0, 600.0),
            Vec2::new(2048.0, 2048.0),
        );
        assert_eq!(camera.offset, Vec2::new(600.0, 700.0));
    }

    #[test]
    fn test_join_replaces_players_but_keeps_avatars() {
        let mut world = World::new();
        world.on_player_joined(player("old", 1.0, 1.0), avatar("a0", "zero.png"));

        world.on_join_accepted(
            "p1".into(),
            HashMap::from([("p1".to_string(), player("p1", 5.0, 5.0))]),
            HashMap::from([("a1".to_string(), avatar("a1", "one.png"))]),
        );

        assert!(world.player("old").is_none());
        assert_eq!(world.player_count(), 1);
        assert!(world.avatar("a0").is_some());
        assert!(world.avatar("a1").is_some());
    }

    #[test]
    fn test_rejected_join_leaves_state_untouched() {
        let mut world = World::new();
        world.on_player_joined(player("p2", 0.0, 0.0), avatar("a1", "x.png"));
        let applied = world.apply(ServerMessage::JoinGame(JoinResponse {
            success: false,
            error: Some("server full".into()),
            ..Default::default()
        }));
        assert_eq!(applied, Applied::Rejected("server full".into()));
        assert_eq!(world.player_count(), 1);
        assert!(world.self_id().is_none());
    }

    #[test]
    fn test_upsert_replaces_whole_record() {
        let mut world = World::new();
        let mut first = player("p1", 10.0, 10.0);
        first.animation_frame = 3;
        first.facing = Facing::East;
        world.on_players_moved([first]);

        let mut second = player("p1", 20.0, 30.0);
        second.username = String::new();
        world.on_players_moved([second.clone()]);

        assert_eq!(world.player("p1"), Some(&second));
        assert_eq!(world.player_count(), 1);
    }

    #[test]
    fn test_moved_unknown_player_is_inserted() {
        let mut world = World::new();
        let applied = world.apply(ServerMessage::PlayersMoved(PlayersMoved {
            players: HashMap::from([("ghost".to_string(), player("ghost", 4.0, 2.0))]),
        }));
        assert_eq!(applied, Applied::Redraw);
        assert_eq!(world.player("ghost").map(|p| p.x), Some(4.0));
    }

    #[test]
    fn test_leave_unknown_player_is_noop() {
        let mut world = World::new();
        world.on_players_moved([player("p1", 0.0, 0.0)]);
        assert!(!world.on_player_left("nobody"));
        assert_eq!(world.player_count(), 1);
    }

    #[test]
    fn test_leave_keeps_avatar() {
        let mut world = World::new();
        world.on_player_joined(player("p1", 0.0, 0.0), avatar("a1", "x.png"));
        assert!(world.on_player_left("p1"));
        assert!(world.player("p1").is_none());
        assert!(world.avatar("a1").is_some());
    }

    #[test]
    fn test_avatar_descriptor_never_overwritten() {
        let mut world = World::new();
        world.on_player_joined(player("p1", 0.0, 0.0), avatar("a1", "first.png"));
        world.on_player_joined(player("p2", 0.0, 0.0), avatar("a1", "second.png"));
        let frames = world.avatar("a1").unwrap().frames_for(Facing::South).unwrap();
        assert_eq!(frames, ["first.png".to_string()]);
    }

    #[test]
    fn test_local_position_tracks_self() {
        let mut world = World::new();
        assert!(world.local_position().is_none());
        world.on_join_accepted("p1".into(), HashMap::new(), HashMap::new());
        assert!(world.local_position().is_none());
        world.on_players_moved([player("p1", 12.0, 34.0)]);
        assert_eq!(world.local_position(), Some(Vec2::new(12.0, 34.0)));
    }

    #[test]
    fn test_unknown_action_ignored() {
        let mut world = World::new();
        assert_eq!(
            world.apply(ServerMessage::Unknown("chat".into())),
            Applied::Ignored("chat".into())
        );
    }
}
