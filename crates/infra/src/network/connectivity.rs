//! Connectivity state pushed in by the platform layer

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;
use trainhub_core::{ConnectivityProbe, NetworkTransports};

/// Wi-Fi and cellular availability, updated by whoever observes the OS.
#[derive(Debug)]
pub struct SharedConnectivity {
    wifi: AtomicBool,
    cellular: AtomicBool,
}

impl SharedConnectivity {
    pub fn new(transports: NetworkTransports) -> Self {
        Self {
            wifi: AtomicBool::new(transports.wifi),
            cellular: AtomicBool::new(transports.cellular),
        }
    }

    /// Starts out assuming Wi-Fi is available.
    pub fn online() -> Self {
        Self::new(NetworkTransports { wifi: true, cellular: false })
    }

    pub fn offline() -> Self {
        Self::new(NetworkTransports::default())
    }

    pub fn set_wifi(&self, active: bool) {
        self.wifi.store(active, Ordering::Release);
        debug!(active, "Wi-Fi transport changed");
    }

    pub fn set_cellular(&self, active: bool) {
        self.cellular.store(active, Ordering::Release);
        debug!(active, "Cellular transport changed");
    }
}

impl Default for SharedConnectivity {
    fn default() -> Self {
        Self::online()
    }
}

impl ConnectivityProbe for SharedConnectivity {
    fn active_transports(&self) -> NetworkTransports {
        NetworkTransports {
            wifi: self.wifi.load(Ordering::Acquire),
            cellular: self.cellular.load(Ordering::Acquire),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_each_transport() {
        let connectivity = SharedConnectivity::offline();
        assert!(!connectivity.is_online());

        connectivity.set_cellular(true);
        assert_eq!(
            connectivity.active_transports(),
            NetworkTransports { wifi: false, cellular: true }
        );
        assert!(connectivity.is_online());

        connectivity.set_cellular(false);
        connectivity.set_wifi(true);
        assert!(connectivity.is_online());

        connectivity.set_wifi(false);
        assert!(!connectivity.is_online());
    }

    #[test]
    fn default_is_online() {
        assert!(SharedConnectivity::default().is_online());
    }
}
