//! Port interface for connectivity checks

/// Transports the platform currently reports as active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkTransports {
    pub wifi: bool,
    pub cellular: bool,
}

impl NetworkTransports {
    /// Whether any transport that can carry a request is up.
    pub fn any(&self) -> bool {
        self.wifi || self.cellular
    }
}

/// Reports which network transports are available
pub trait ConnectivityProbe: Send + Sync {
    fn active_transports(&self) -> NetworkTransports;

    fn is_online(&self) -> bool {
        self.active_transports().any()
    }
}
