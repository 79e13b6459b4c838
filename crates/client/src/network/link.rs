// Socket/reconnect bookkeeping for one logical connection
//
// Each opened socket gets a fresh id; callbacks carry the id of the socket
// that produced them so events from a replaced socket are dropped. The
// reconnect timer lives here too, so every decision the browser glue makes
// is a plain method call.
use super::ReconnectTimer;

/// What the connection should do in response to a socket or timer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction<H> {
    /// Stale socket or stale timer.
    Ignore,
    /// Socket is up: clear the returned timer, if any, and send the join.
    Join(Option<H>),
    /// Socket dropped and nothing is pending: arm the reconnect timer.
    ScheduleReconnect,
    /// Socket dropped but a reconnect is already pending.
    AlreadyPending,
    /// The pending reconnect is due: open a new socket.
    Reconnect,
}

#[derive(Debug)]
pub struct Link<H> {
    socket_id: u64,
    live: bool,
    timer: ReconnectTimer<H>,
}

impl<H> Link<H> {
    pub fn new() -> Self {
        Self {
            socket_id: 0,
            live: false,
            timer: ReconnectTimer::new(),
        }
    }

    /// Register a new socket and return its id. Older ids become stale.
    pub fn begin_socket(&mut self) -> u64 {
        self.socket_id += 1;
        self.live = true;
        self.socket_id
    }

    /// The current socket was detached; none of its events count any more.
    pub fn end_socket(&mut self) {
        self.live = false;
    }

    #[inline]
    pub fn is_current(&self, socket: u64) -> bool {
        self.live && socket == self.socket_id
    }

    pub fn is_reconnect_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn opened(&mut self, socket: u64) -> LinkAction<H> {
        if !self.is_current(socket) {
            return LinkAction::Ignore;
        }
        LinkAction::Join(self.timer.cancel())
    }

    pub fn closed(&mut self, socket: u64) -> LinkAction<H> {
        if !self.is_current(socket) {
            LinkAction::Ignore
        } else if self.timer.is_pending() {
            LinkAction::AlreadyPending
        } else {
            LinkAction::ScheduleReconnect
        }
    }

    pub fn reconnect_due(&mut self, token: u64) -> LinkAction<H> {
        if self.timer.fire(token) {
            LinkAction::Reconnect
        } else {
            LinkAction::Ignore
        }
    }

    /// See [`ReconnectTimer::schedule`].
    pub fn schedule(&mut self, start: impl FnOnce(u64) -> Option<H>) -> Option<u64> {
        self.timer.schedule(start)
    }

    /// See [`ReconnectTimer::cancel`].
    pub fn cancel(&mut self) -> Option<H> {
        self.timer.cancel()
    }
}

impl<H> Default for Link<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A link whose socket just dropped and whose reconnect is armed.
    fn dropped_with_pending_timer() -> (Link<i32>, u64, u64) {
        let mut link = Link::new();
        let socket = link.begin_socket();
        assert_eq!(link.closed(socket), LinkAction::ScheduleReconnect);
        let token = link.schedule(|_| Some(42)).unwrap();
        (link, socket, token)
    }

    #[test]
    fn test_open_sends_join_without_timer() {
        let mut link: Link<i32> = Link::new();
        let socket = link.begin_socket();
        assert_eq!(link.opened(socket), LinkAction::Join(None));
    }

    #[test]
    fn test_second_close_does_not_stack_reconnects() {
        let (mut link, socket, _) = dropped_with_pending_timer();
        assert_eq!(link.closed(socket), LinkAction::AlreadyPending);
        assert_eq!(link.schedule(|_| Some(43)), None);
    }

    #[test]
    fn test_events_from_replaced_socket_are_ignored() {
        let mut link: Link<i32> = Link::new();
        let old = link.begin_socket();
        link.end_socket();
        let new = link.begin_socket();

        assert_eq!(link.closed(old), LinkAction::Ignore);
        assert_eq!(link.opened(old), LinkAction::Ignore);
        assert!(!link.is_reconnect_pending());
        assert_eq!(link.opened(new), LinkAction::Join(None));
    }

    #[test]
    fn test_detached_socket_is_not_current() {
        let mut link: Link<i32> = Link::new();
        let socket = link.begin_socket();
        link.end_socket();
        assert!(!link.is_current(socket));
        assert_eq!(link.closed(socket), LinkAction::Ignore);
    }

    #[test]
    fn test_open_after_close_cancels_pending_reconnect() {
        let (mut link, _, token) = dropped_with_pending_timer();

        link.end_socket();
        let socket = link.begin_socket();
        assert_eq!(link.opened(socket), LinkAction::Join(Some(42)));
        assert!(!link.is_reconnect_pending());

        // The cleared timer may still fire; its token is dead.
        assert_eq!(link.reconnect_due(token), LinkAction::Ignore);
    }

    #[test]
    fn test_reconnect_due_fires_once() {
        let (mut link, _, token) = dropped_with_pending_timer();
        assert_eq!(link.reconnect_due(token), LinkAction::Reconnect);
        assert_eq!(link.reconnect_due(token), LinkAction::Ignore);

        // New socket drops again: a fresh reconnect may be armed.
        link.end_socket();
        let socket = link.begin_socket();
        assert_eq!(link.closed(socket), LinkAction::ScheduleReconnect);
    }
}
