// Single-flight reconnect timer
//
// At most one reconnect may be pending. Every schedule or cancel bumps the
// generation, so a timer that fires after being cancelled (or superseded)
// carries a stale token and is rejected by `fire`.

/// `H` is the platform timer handle (`i32` from `setTimeout` in the browser).
#[derive(Debug)]
pub struct ReconnectTimer<H> {
    generation: u64,
    pending: Option<(u64, H)>,
}

impl<H> ReconnectTimer<H> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Arm the timer unless one is already pending. `start` receives the
    /// token the timer must present when it fires and returns its handle,
    /// or `None` if the platform refused to start it.
    pub fn schedule(&mut self, start: impl FnOnce(u64) -> Option<H>) -> Option<u64> {
        if self.pending.is_some() {
            return None;
        }
        self.generation += 1;
        let token = self.generation;
        let handle = start(token)?;
        self.pending = Some((token, handle));
        Some(token)
    }

    /// Disarm the pending timer and return its handle so it can be cleared.
    pub fn cancel(&mut self) -> Option<H> {
        self.generation += 1;
        self.pending.take().map(|(_, handle)| handle)
    }

    /// Accept a firing timer exactly once, and only if it is the current one.
    pub fn fire(&mut self, token: u64) -> bool {
        match self.pending {
            Some((current, _)) if current == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl<H> Default for ReconnectTimer<H> {
    fn default() -> Self {
        Self::new()
    }
}
