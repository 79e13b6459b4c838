//! mmo-probe - Headless client that joins a game server and logs its traffic.
//!
//! Usage: mmo-probe <ws-url> [--name <username>] [--move <up|down|left|right>]

use std::collections::HashSet;

use anyhow::Context;
use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use protocol::packets::{JoinResponse, PlayerJoined, PlayerLeft, PlayersMoved};
use protocol::{ClientIntent, MoveDirection, PlayerId, ServerMessage};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mmo-probe")]
#[command(about = "Headless client that joins a game server and logs its traffic")]
struct Args {
    /// Game server WebSocket URL
    url: String,

    /// Display name to join with (random `ProbeNNNN` when omitted)
    #[arg(short, long)]
    name: Option<String>,

    /// Send one move intent after joining
    #[arg(short = 'm', long = "move", value_name = "DIRECTION", value_parser = parse_direction)]
    direction: Option<MoveDirection>,
}

impl Args {
    fn username(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Probe{:04}", rand::random_range(0..10_000u16)))
    }
}

fn parse_direction(value: &str) -> Result<MoveDirection, String> {
    MoveDirection::parse(value)
        .ok_or_else(|| format!("expected one of up, down, left, right, got `{value}`"))
}

/// Who the server says is in the game, tracked only by id.
#[derive(Default)]
struct Roster {
    me: Option<PlayerId>,
    players: HashSet<PlayerId>,
}

impl Roster {
    /// Returns true when this message accepted our join.
    fn observe(&mut self, message: &ServerMessage) -> bool {
        match message {
            ServerMessage::JoinGame(JoinResponse { success: true, player_id, players, .. }) => {
                self.me = player_id.clone();
                self.players = players.keys().cloned().collect();
                info!("Joined as {:?} with {} players", self.me, self.players.len());
                true
            }
            ServerMessage::JoinGame(JoinResponse { error, .. }) => {
                error!("Join rejected: {}", error.as_deref().unwrap_or("no reason given"));
                false
            }
            ServerMessage::PlayerJoined(PlayerJoined { player, avatar }) => {
                self.players.insert(player.id.clone());
                info!("{} ({}) joined as {}", player.username, player.id, avatar.name);
                false
            }
            ServerMessage::PlayersMoved(PlayersMoved { players }) => {
                self.players.extend(players.keys().cloned());
                if let Some(me) = self.me.as_ref().and_then(|id| players.get(id)) {
                    info!("Moved to ({:.0}, {:.0}) facing {}", me.x, me.y, me.facing.as_str());
                }
                false
            }
            ServerMessage::PlayerLeft(PlayerLeft { player_id }) => {
                self.players.remove(player_id);
                info!("{} left, {} remaining", player_id, self.players.len());
                false
            }
            ServerMessage::Unknown(action) => {
                warn!("Unknown action: {}", action);
                false
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let (ws_stream, _) = connect_async(args.url.as_str())
        .await
        .with_context(|| format!("connecting to {}", args.url))?;
    info!("Connected to {}", args.url);

    let (mut write, mut read) = ws_stream.split();

    let join = ClientIntent::JoinGame { username: args.username() };
    write.send(Message::Text(join.encode()?.into())).await?;

    let mut roster = Roster::default();
    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let message = match ServerMessage::decode(text.as_str()) {
                    Ok(message) => message,
                    Err(e) => {
                        warn!("Dropping server message: {}", e);
                        continue;
                    }
                };
                if roster.observe(&message) {
                    if let Some(direction) = args.direction {
                        let intent = ClientIntent::Move { direction };
                        write.send(Message::Text(intent.encode()?.into())).await?;
                        info!("Sent move {}", direction.as_str());
                    }
                }
            }
            Ok(Message::Close(frame)) => {
                info!("Server closed the connection: {:?}", frame);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
