// Game client - owns the world mirror and reacts to queued browser events
use std::rc::Rc;

use glam::Vec2;
use protocol::{ClientIntent, MoveDirection, PlayerRecord, ServerMessage};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{HtmlCanvasElement, HtmlImageElement, window};

use crate::camera::Camera;
use crate::config::ClientOptions;
use crate::network::Connection;
use crate::render::sprite::{self, SpritePlacement};
use crate::render::{Renderer, SpriteCache};
use crate::{console_error, console_log, console_warn, utils};

pub mod events;
pub mod world;

use events::{ClientEvent, EventQueue};
use world::{Applied, World};

const BACKGROUND_FILL: &str = "#111";

pub struct GameClient {
    options: ClientOptions,
    connection: Connection,
    renderer: Renderer,
    world: World,
    sprites: SpriteCache<HtmlImageElement>,
    background: Option<HtmlImageElement>,
    background_ready: bool,
    events: Rc<EventQueue>,
}

impl GameClient {
    pub fn new(canvas_id: &str, options: ClientOptions, events: Rc<EventQueue>) -> Result<GameClient, JsValue> {
        let window = window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("Canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let renderer = Renderer::new(canvas)?;
        let (width, height) = window_size(&window);
        renderer.resize(width, height);

        let username = options
            .username
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(utils::guest_name);
        let connection = Connection::new(
            &options.server_url,
            username,
            options.reconnect_delay_ms,
            events.clone(),
        );

        let background = load_image(
            &options.background_url,
            events.clone(),
            ClientEvent::BackgroundLoaded,
            ClientEvent::BackgroundFailed,
        );

        Ok(Self {
            options,
            connection,
            renderer,
            world: World::new(),
            sprites: SpriteCache::new(),
            background,
            background_ready: false,
            events,
        })
    }

    /// Open the connection. Drawing starts with the first event.
    pub fn start(&mut self) {
        self.connection.connect();
    }

    /// Drain queued events in order. Returns true if any of them changed
    /// what is on screen; drawing is left to the next animation frame.
    pub fn pump(&mut self) -> bool {
        let mut dirty = false;
        for event in self.events.drain() {
            dirty |= self.handle_event(event);
        }
        dirty
    }

    pub fn send_move(&self, direction: MoveDirection) -> bool {
        self.connection.send_intent(&ClientIntent::Move { direction })
    }

    pub fn stop(&self) -> bool {
        self.connection.send_intent(&ClientIntent::Stop)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_open()
    }

    pub fn username(&self) -> &str {
        self.connection.username()
    }

    pub fn canvas(&self) -> HtmlCanvasElement {
        self.renderer.canvas().clone()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> Camera {
        Camera::follow(
            self.world.local_position(),
            self.renderer.viewport(),
            self.world_size(),
        )
    }

    #[inline]
    fn world_size(&self) -> Vec2 {
        Vec2::new(self.options.world_width, self.options.world_height)
    }

    /// Returns true when the event requires a redraw.
    fn handle_event(&mut self, event: ClientEvent) -> bool {
        match event {
            ClientEvent::SocketOpened { socket } => {
                self.connection.handle_open(socket);
                false
            }
            ClientEvent::SocketClosed { socket, code } => {
                self.connection.handle_close(socket, code);
                false
            }
            ClientEvent::SocketError { socket } => {
                self.connection.handle_error(socket);
                false
            }
            ClientEvent::SocketMessage { socket, text } => {
                self.connection.is_current(socket) && self.handle_message(&text)
            }
            ClientEvent::ReconnectDue { token } => {
                self.connection.handle_reconnect_due(token);
                false
            }
            ClientEvent::SpriteLoaded { avatar, uri } => self.sprites.mark_ready(&avatar, &uri),
            ClientEvent::SpriteFailed { avatar, uri } => {
                self.sprites.mark_failed(&avatar, &uri);
                false
            }
            ClientEvent::BackgroundLoaded => {
                self.background_ready = true;
                true
            }
            ClientEvent::BackgroundFailed => false,
            ClientEvent::Resized { width, height } => {
                self.renderer.resize(width, height);
                true
            }
            ClientEvent::MoveKey(direction) => {
                self.send_move(direction);
                false
            }
            ClientEvent::Click(screen) => {
                let world_pos = self.camera().screen_to_world(screen);
                console_log!("Clicked world position ({:.0}, {:.0})", world_pos.x, world_pos.y);
                false
            }
        }
    }

    fn handle_message(&mut self, text: &str) -> bool {
        let message = match ServerMessage::decode(text) {
            Ok(message) => message,
            Err(e) => {
                console_error!("Dropping server message: {}", e);
                return false;
            }
        };
        match self.world.apply(message) {
            Applied::Redraw => true,
            Applied::Rejected(reason) => {
                console_error!("Join rejected: {}", reason);
                false
            }
            Applied::Ignored(action) => {
                console_warn!("Unknown action: {}", action);
                false
            }
        }
    }

    pub fn render(&mut self) {
        let camera = self.camera();
        let Self {
            options,
            renderer,
            world,
            sprites,
            background,
            background_ready,
            events,
            ..
        } = self;

        renderer.clear(BACKGROUND_FILL);
        if let Some(image) = background.as_ref().filter(|_| *background_ready) {
            renderer.draw_background(image, &camera);
        }

        let avatar_size = options.avatar_size;
        let mut visible: Vec<(&PlayerRecord, Vec2)> = world
            .players()
            .map(|player| (player, camera.world_to_screen(player.position())))
            .filter(|(_, screen)| camera.is_visible(*screen, avatar_size))
            .collect();
        // Lower on screen draws later, so it overlaps what stands behind it.
        visible.sort_by(|(a, sa), (b, sb)| sa.y.total_cmp(&sb.y).then_with(|| a.id.cmp(&b.id)));

        for (player, screen) in visible {
            let frame = world
                .avatar(&player.avatar)
                .and_then(|avatar| sprite::select_frame(avatar, player.facing, player.animation_frame));
            if let Some(uri) = frame {
                let image = sprites.get_or_load(&player.avatar, uri, || {
                    load_image(
                        uri,
                        events.clone(),
                        ClientEvent::SpriteLoaded {
                            avatar: player.avatar.clone(),
                            uri: uri.to_string(),
                        },
                        ClientEvent::SpriteFailed {
                            avatar: player.avatar.clone(),
                            uri: uri.to_string(),
                        },
                    )
                });
                if let Some(image) = image {
                    let (_, mirrored) = sprite::frame_source(player.facing);
                    let natural = Vec2::new(image.natural_width() as f32, image.natural_height() as f32);
                    if let Some(placement) = SpritePlacement::new(screen, avatar_size, natural, mirrored) {
                        renderer.draw_avatar(image, &placement);
                    }
                }
            }

            let anchor = sprite::label_anchor(screen, avatar_size, options.label_gap);
            renderer.draw_label(&player.username, anchor, &options.label_font);
        }
    }
}

/// Start fetching an image; `ready` or `failed` is queued once it settles.
fn load_image(
    url: &str,
    events: Rc<EventQueue>,
    ready: ClientEvent,
    failed: ClientEvent,
) -> Option<HtmlImageElement> {
    let image = match HtmlImageElement::new() {
        Ok(image) => image,
        Err(e) => {
            console_error!("Failed to create image for {}: {:?}", url, e);
            return None;
        }
    };
    image.set_src(url);

    let decoded = JsFuture::from(image.decode());
    let url = url.to_string();
    spawn_local(async move {
        match decoded.await {
            Ok(_) => events.push(ready),
            Err(e) => {
                console_warn!("Image {} failed to load: {:?}", url, e);
                events.push(failed);
            }
        }
    });
    Some(image)
}

pub(crate) fn window_size(window: &web_sys::Window) -> (u32, u32) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(800.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(600.0);
    (width as u32, height as u32)
}
