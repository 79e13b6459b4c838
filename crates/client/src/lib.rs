// WASM client entry point for native-mmo
// Browser client: draws the scrolling world and avatars, mirrors server state

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{KeyboardEvent, MouseEvent, window};

// Module structure - each module handles a specific concern
mod camera;   // Viewport offset, clamping, screen/world conversion
mod config;   // Options passed in from the page
mod game;     // Client state, event dispatch, world mirror
mod input;    // Keyboard mapping
mod network;  // WebSocket connection, reconnect timer
mod render;   // Canvas drawing, sprite placement, sprite cache
mod utils;    // Console logging, guest names

pub use config::ClientOptions;
pub use game::GameClient;

use game::events::{ClientEvent, EventQueue, RedrawRequest};
use protocol::MoveDirection;

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Handle given to JS. Owns the client and the event queue feeding it.
#[wasm_bindgen]
pub struct GameClientWrapper {
    client: Rc<RefCell<GameClient>>,
    events: Rc<EventQueue>,
}

#[wasm_bindgen]
impl GameClientWrapper {
    /// Create a client drawing into `canvas_id`. `options` is a plain object
    /// (see `ClientOptions`); pass `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, options: JsValue) -> Result<GameClientWrapper, JsValue> {
        init();

        let options = ClientOptions::from_js(options)?;
        let events = Rc::new(EventQueue::new());
        let client = GameClient::new(canvas_id, options, events.clone())?;
        let client_rc = Rc::new(RefCell::new(client));

        // Every callback below only queues events; the pump consumes them
        setup_event_pump(Rc::downgrade(&client_rc), events.clone());
        setup_input_handlers(&client_rc, events.clone())?;
        setup_resize_handler(events.clone())?;

        client_rc.borrow_mut().start();

        Ok(GameClientWrapper {
            client: client_rc,
            events,
        })
    }

    /// Request movement ("up", "down", "left", "right"). Returns false if the
    /// direction is unknown or the socket is not open.
    pub fn send_move(&self, direction: &str) -> bool {
        match MoveDirection::parse(direction) {
            Some(direction) => self.client.borrow().send_move(direction),
            None => {
                console_warn!("Unknown move direction: {}", direction);
                false
            }
        }
    }

    /// Request the local player to stop. Not bound to any key.
    pub fn stop(&self) -> bool {
        self.client.borrow().stop()
    }

    pub fn is_connected(&self) -> bool {
        self.client.borrow().is_connected()
    }

    pub fn player_count(&self) -> usize {
        self.client.borrow().world().player_count()
    }

    pub fn local_player_id(&self) -> Option<String> {
        self.client.borrow().world().self_id().map(str::to_string)
    }

    pub fn username(&self) -> String {
        self.client.borrow().username().to_string()
    }

    /// Force a redraw, e.g. after the page changed the canvas layout.
    pub fn redraw(&self) {
        let (width, height) = window()
            .map(|w| game::window_size(&w))
            .unwrap_or((800, 600));
        self.events.push(ClientEvent::Resized { width, height });
    }
}

/// Drain the queue on a zero-delay timeout whenever it wakes, and draw on
/// the next animation frame when something changed. Hidden tabs pause
/// animation frames but not timeouts, so socket traffic keeps flowing.
fn setup_event_pump(client: Weak<RefCell<GameClient>>, events: Rc<EventQueue>) {
    let redraw = Rc::new(RedrawRequest::new());

    // Frame: draw once per requested redraw
    let frame_client = client.clone();
    let frame_redraw = redraw.clone();
    let frame = Closure::wrap(Box::new(move || {
        if !frame_redraw.take() {
            return;
        }
        if let Some(client_rc) = frame_client.upgrade() {
            match client_rc.try_borrow_mut() {
                Ok(mut client) => client.render(),
                Err(_) => console_log!("Redraw skipped: client busy"),
            }
        }
    }) as Box<dyn FnMut()>);

    // Pump: handle every queued event, then ask for a frame if needed
    let retry = events.clone();
    let pump = Closure::wrap(Box::new(move || {
        let Some(client_rc) = client.upgrade() else {
            return;
        };
        // Use try_borrow_mut to avoid panic if client is borrowed elsewhere
        let dirty = match client_rc.try_borrow_mut() {
            Ok(mut client) => client.pump(),
            Err(_) => {
                console_log!("Event pump deferred: client busy");
                retry.rewake();
                return;
            }
        };
        if dirty && redraw.request() {
            if let Some(win) = web_sys::window() {
                if let Err(e) = win.request_animation_frame(frame.as_ref().unchecked_ref()) {
                    console_error!("requestAnimationFrame failed: {:?}", e);
                    redraw.take();
                }
            }
        }
    }) as Box<dyn FnMut()>);

    events.set_wake(move || {
        if let Some(win) = web_sys::window() {
            if let Err(e) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                pump.as_ref().unchecked_ref(),
                0,
            ) {
                console_error!("setTimeout failed: {:?}", e);
            }
        }
    });
}

/// Returns true when a text input element has focus.
/// Used to suppress game key bindings while the user is typing.
fn is_text_input_focused() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.active_element())
        .map(|el| el.tag_name().eq_ignore_ascii_case("INPUT"))
        .unwrap_or(false)
}

fn setup_input_handlers(client: &Rc<RefCell<GameClient>>, events: Rc<EventQueue>) -> Result<(), JsValue> {
    let window = window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    // Keydown handler: arrow keys move, and must not scroll the page
    {
        let events = events.clone();
        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if is_text_input_focused() {
                return;
            }
            if let Some(direction) = input::direction_for_key(&event.key()) {
                event.prevent_default();
                events.push(ClientEvent::MoveKey(direction));
            }
        }) as Box<dyn FnMut(_)>);

        document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Click handler: viewport-relative position, converted by the client
    {
        let canvas = client.borrow().canvas();
        let target = canvas.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let rect = target.get_bounding_client_rect();
            let x = event.client_x() as f32 - rect.left() as f32;
            let y = event.client_y() as f32 - rect.top() as f32;
            events.push(ClientEvent::Click(Vec2::new(x, y)));
        }) as Box<dyn FnMut(_)>);

        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Resize the canvas when the browser window is resized.
fn setup_resize_handler(events: Rc<EventQueue>) -> Result<(), JsValue> {
    let win = window().ok_or("No window")?;

    let closure = Closure::wrap(Box::new(move || {
        if let Some(win) = web_sys::window() {
            let (width, height) = game::window_size(&win);
            events.push(ClientEvent::Resized { width, height });
        }
    }) as Box<dyn FnMut()>);

    win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();

    Ok(())
}
