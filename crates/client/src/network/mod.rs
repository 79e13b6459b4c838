// WebSocket connection, intent sending and reconnect scheduling
use std::rc::Rc;

use protocol::ClientIntent;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use crate::game::events::{ClientEvent, EventQueue};
use crate::{console_error, console_log, console_warn};

mod link;
mod reconnect;

pub use link::{Link, LinkAction};
pub use reconnect::ReconnectTimer;

/// Handler closures for the current socket. Dropped together with it.
struct SocketHandlers {
    _onopen: Closure<dyn FnMut(JsValue)>,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onerror: Closure<dyn FnMut(JsValue)>,
    _onclose: Closure<dyn FnMut(CloseEvent)>,
}

pub struct Connection {
    url: String,
    username: String,
    ws: Option<WebSocket>,
    handlers: Option<SocketHandlers>,
    link: Link<i32>,
    reconnect_delay_ms: i32,
    reconnect_callback: Option<Closure<dyn FnMut()>>,
    events: Rc<EventQueue>,
}

impl Connection {
    pub fn new(url: &str, username: String, reconnect_delay_ms: i32, events: Rc<EventQueue>) -> Self {
        let is_https = web_sys::window()
            .and_then(|w| w.location().protocol().ok())
            .map(|p| p == "https:")
            .unwrap_or(false);

        Self {
            url: resolve_ws_url(url, is_https),
            username,
            ws: None,
            handlers: None,
            link: Link::new(),
            reconnect_delay_ms,
            reconnect_callback: None,
            events,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Open a fresh socket, replacing any previous one. A failure to even
    /// create the socket is treated like a drop.
    pub fn connect(&mut self) {
        if let Err(e) = self.open_socket() {
            console_error!("Failed to open WebSocket to {}: {:?}", self.url, e);
            self.schedule_reconnect();
        }
    }

    fn open_socket(&mut self) -> Result<(), JsValue> {
        self.detach();

        console_log!("Connecting to: {}", self.url);
        let ws = WebSocket::new(&self.url)?;
        let socket = self.link.begin_socket();

        let events = self.events.clone();
        let onopen = Closure::wrap(Box::new(move |_event: JsValue| {
            events.push(ClientEvent::SocketOpened { socket });
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));

        let events = self.events.clone();
        let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
            match event.data().as_string() {
                Some(text) => events.push(ClientEvent::SocketMessage { socket, text }),
                None => console_warn!("Ignoring non-text WebSocket frame"),
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

        let events = self.events.clone();
        let onerror = Closure::wrap(Box::new(move |_event: JsValue| {
            events.push(ClientEvent::SocketError { socket });
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        let events = self.events.clone();
        let onclose = Closure::wrap(Box::new(move |event: CloseEvent| {
            events.push(ClientEvent::SocketClosed { socket, code: event.code() });
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

        self.ws = Some(ws);
        self.handlers = Some(SocketHandlers {
            _onopen: onopen,
            _onmessage: onmessage,
            _onerror: onerror,
            _onclose: onclose,
        });
        Ok(())
    }

    /// Unhook and close the current socket without producing a close event.
    fn detach(&mut self) {
        if let Some(ws) = self.ws.take() {
            ws.set_onopen(None);
            ws.set_onmessage(None);
            ws.set_onerror(None);
            ws.set_onclose(None);
            let _ = ws.close();
        }
        self.handlers = None;
        self.link.end_socket();
    }

    #[inline]
    pub fn is_current(&self, socket: u64) -> bool {
        self.link.is_current(socket)
    }

    pub fn is_open(&self) -> bool {
        self.ws
            .as_ref()
            .is_some_and(|ws| ws.ready_state() == WebSocket::OPEN)
    }

    /// Send an intent if the socket is open. Returns whether it was sent;
    /// a closed socket is not an error.
    pub fn send_intent(&self, intent: &ClientIntent) -> bool {
        let Some(ws) = self.ws.as_ref().filter(|_| self.is_open()) else {
            return false;
        };
        let text = match intent.encode() {
            Ok(text) => text,
            Err(e) => {
                console_error!("{}", e);
                return false;
            }
        };
        match ws.send_with_str(&text) {
            Ok(()) => true,
            Err(e) => {
                console_error!("Failed to send intent: {:?}", e);
                false
            }
        }
    }

    pub fn handle_open(&mut self, socket: u64) {
        let LinkAction::Join(pending) = self.link.opened(socket) else {
            return;
        };
        console_log!("WebSocket connected");
        if let Some(handle) = pending {
            clear_timer(handle);
        }
        self.reconnect_callback = None;
        let join = ClientIntent::JoinGame {
            username: self.username.clone(),
        };
        if !self.send_intent(&join) {
            console_warn!("Join request could not be sent");
        }
    }

    pub fn handle_error(&self, socket: u64) {
        if self.is_current(socket) {
            console_error!("WebSocket error on {}", self.url);
        }
    }

    pub fn handle_close(&mut self, socket: u64, code: u16) {
        match self.link.closed(socket) {
            LinkAction::ScheduleReconnect => {
                console_log!("WebSocket closed: {}", code);
                self.schedule_reconnect();
            }
            LinkAction::AlreadyPending => console_log!("WebSocket closed: {} (reconnect pending)", code),
            _ => {}
        }
    }

    pub fn handle_reconnect_due(&mut self, token: u64) {
        if !matches!(self.link.reconnect_due(token), LinkAction::Reconnect) {
            return;
        }
        self.reconnect_callback = None;
        self.connect();
    }

    fn schedule_reconnect(&mut self) {
        let delay = self.reconnect_delay_ms;
        let events = self.events.clone();
        let mut callback = None;

        let scheduled = self.link.schedule(|token| {
            let window = web_sys::window()?;
            let closure = Closure::wrap(Box::new(move || {
                events.push(ClientEvent::ReconnectDue { token });
            }) as Box<dyn FnMut()>);
            let handle = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    delay,
                )
                .ok()?;
            callback = Some(closure);
            Some(handle)
        });

        match scheduled {
            Some(_) => {
                self.reconnect_callback = callback;
                console_log!("Reconnecting in {} ms", delay);
            }
            None if self.link.is_reconnect_pending() => {}
            None => console_error!("Could not schedule reconnect"),
        }
    }

    fn cancel_reconnect(&mut self) {
        if let Some(handle) = self.link.cancel() {
            clear_timer(handle);
        }
        self.reconnect_callback = None;
    }
}

fn clear_timer(handle: i32) {
    if let Some(window) = web_sys::window() {
        window.clear_timeout_with_handle(handle);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.cancel_reconnect();
        self.detach();
    }
}

/// Build a WebSocket URL, adding a scheme that matches the page when missing.
pub fn resolve_ws_url(url: &str, page_is_https: bool) -> String {
    if url.starts_with("ws://") || url.starts_with("wss://") {
        url.to_string()
    } else {
        format!("ws{}://{}", if page_is_https { "s" } else { "" }, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_explicit_scheme() {
        assert_eq!(resolve_ws_url("wss://a.b/ws", false), "wss://a.b/ws");
        assert_eq!(resolve_ws_url("ws://a.b:9000", true), "ws://a.b:9000");
    }

    #[test]
    fn test_resolve_follows_page_scheme() {
        assert_eq!(resolve_ws_url("localhost:8080", false), "ws://localhost:8080");
        assert_eq!(resolve_ws_url("game.example/ws", true), "wss://game.example/ws");
    }
}
