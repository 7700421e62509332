use crate::dispatch::Dispatcher;

/// Read-only for the server's lifetime, so handlers share it without locks.
pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}
