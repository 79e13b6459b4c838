//! Shared protocol crate for native-mmo.
//!
//! This crate contains:
//! - World entity records (players, avatars) as the server sends them
//! - Message definitions for both directions of the JSON socket
//! - Protocol errors

mod error;
mod types;
pub mod packets;

pub use error::ProtocolError;
pub use packets::{ClientIntent, JoinResponse, ServerMessage};
pub use types::{AvatarDescriptor, Facing, MoveDirection, PlayerId, PlayerRecord};

/// Represents a 2D world position using glam's Vec2.
pub type Position = glam::Vec2;
