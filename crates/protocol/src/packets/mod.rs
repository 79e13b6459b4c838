//! Message definitions for the game socket.
//!
//! Every message is a JSON object discriminated by its `action` field, in
//! both directions.

mod client;
mod server;

pub use client::*;
pub use server::*;

/// `action` values understood by this client.
pub mod action {
    pub const JOIN_GAME: &str = "join_game";
    pub const MOVE: &str = "move";
    pub const STOP: &str = "stop";
    pub const PLAYER_JOINED: &str = "player_joined";
    pub const PLAYERS_MOVED: &str = "players_moved";
    pub const PLAYER_LEFT: &str = "player_left";
}
