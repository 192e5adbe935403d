use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{trace, warn};
use trainhub_domain::constants::FEEDBACK_CHANNEL_CAPACITY;
use trainhub_domain::{FeedbackEvent, SnackbarText, VibrationPattern};

/// Broadcast channels for loading, snackbar and vibration feedback.
///
/// Delivery is at-most-once to receivers subscribed at emission time.
/// Publishing with no subscriber is not an error.
#[derive(Debug, Clone)]
pub struct FeedbackChannels {
    loading: broadcast::Sender<bool>,
    snackbar: broadcast::Sender<SnackbarText>,
    vibration: broadcast::Sender<VibrationPattern>,
}

impl Default for FeedbackChannels {
    fn default() -> Self {
        Self::new(FEEDBACK_CHANNEL_CAPACITY)
    }
}

impl FeedbackChannels {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (loading, _) = broadcast::channel(capacity);
        let (snackbar, _) = broadcast::channel(capacity);
        let (vibration, _) = broadcast::channel(capacity);
        Self { loading, snackbar, vibration }
    }

    /// Publish a loading-indicator change.
    pub fn set_loading(&self, visible: bool) {
        if self.loading.send(visible).is_err() {
            trace!(visible, "No loading subscribers");
        }
    }

    /// Publish a message for the snackbar.
    pub fn snackbar(&self, text: SnackbarText) {
        if self.snackbar.send(text).is_err() {
            trace!("No snackbar subscribers");
        }
    }

    /// Publish a vibration pattern.
    pub fn vibrate(&self, pattern: VibrationPattern) {
        if self.vibration.send(pattern).is_err() {
            trace!("No vibration subscribers");
        }
    }

    /// Show loading now and hide it when the guard drops.
    pub fn loading_guard(&self) -> LoadingGuard<'_> {
        self.set_loading(true);
        LoadingGuard { channels: self }
    }

    /// Receiver for loading changes published from now on.
    pub fn subscribe_loading(&self) -> broadcast::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Receiver for snackbar text.
    pub fn subscribe_snackbar(&self) -> broadcast::Receiver<SnackbarText> {
        self.snackbar.subscribe()
    }

    /// Receiver for vibration patterns.
    pub fn subscribe_vibration(&self) -> broadcast::Receiver<VibrationPattern> {
        self.vibration.subscribe()
    }

    /// Subscribe to all three channels at once.
    pub fn subscribe(&self) -> FeedbackSubscription {
        FeedbackSubscription {
            loading: self.subscribe_loading(),
            snackbar: self.subscribe_snackbar(),
            vibration: self.subscribe_vibration(),
        }
    }
}

/// Emits `LoadingState(visible = false)` on drop, on every exit path.
#[must_use = "loading is hidden as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    channels: &'a FeedbackChannels,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.channels.set_loading(false);
    }
}

/// Receivers for all three feedback channels
#[derive(Debug)]
pub struct FeedbackSubscription {
    loading: broadcast::Receiver<bool>,
    snackbar: broadcast::Receiver<SnackbarText>,
    vibration: broadcast::Receiver<VibrationPattern>,
}

impl FeedbackSubscription {
    /// Wait for the next event on any channel. `None` once the channels are
    /// dropped.
    pub async fn recv(&mut self) -> Option<FeedbackEvent> {
        loop {
            let next = tokio::select! {
                r = self.loading.recv() => r.map(|visible| FeedbackEvent::LoadingState { visible }),
                r = self.snackbar.recv() => r.map(|text| FeedbackEvent::Snackbar { text }),
                r = self.vibration.recv() => r.map(|pattern| FeedbackEvent::Vibration { pattern }),
            };
            match next {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Feedback listener lagged, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Loading events received so far, in emission order.
    pub fn drain_loading(&mut self) -> Vec<bool> {
        drain(&mut self.loading)
    }

    pub fn drain_snackbars(&mut self) -> Vec<SnackbarText> {
        drain(&mut self.snackbar)
    }

    pub fn drain_vibrations(&mut self) -> Vec<VibrationPattern> {
        drain(&mut self.vibration)
    }
}

fn drain<T: Clone>(receiver: &mut broadcast::Receiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(item) => items.push(item),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "Feedback receiver lagged");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use trainhub_domain::MessageKey;

    use super::*;

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let channels = FeedbackChannels::default();
        channels.set_loading(true);
        channels.snackbar(SnackbarText::Raw("hi".into()));
        channels.vibrate(VibrationPattern::short());
    }

    #[test]
    fn guard_balances_loading() {
        let channels = FeedbackChannels::default();
        let mut sub = channels.subscribe();

        {
            let _guard = channels.loading_guard();
        }

        assert_eq!(sub.drain_loading(), vec![true, false]);
        assert!(sub.drain_snackbars().is_empty());
    }

    #[test]
    fn guard_hides_on_panic_unwind() {
        let channels = FeedbackChannels::default();
        let mut sub = channels.subscribe();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = channels.loading_guard();
            panic!("boom");
        }));

        assert!(result.is_err());
        assert_eq!(sub.drain_loading(), vec![true, false]);
    }

    #[test]
    fn late_subscribers_miss_earlier_events() {
        let channels = FeedbackChannels::default();
        channels.snackbar(SnackbarText::Localized(MessageKey::NoInternet));

        let mut sub = channels.subscribe();
        assert!(sub.drain_snackbars().is_empty());
    }

    #[test]
    fn every_subscriber_gets_a_copy() {
        let channels = FeedbackChannels::default();
        let mut first = channels.subscribe();
        let mut second = channels.subscribe();

        channels.vibrate(VibrationPattern::error());

        assert_eq!(first.drain_vibrations(), vec![VibrationPattern::error()]);
        assert_eq!(second.drain_vibrations(), vec![VibrationPattern::error()]);
    }

    #[tokio::test]
    async fn recv_merges_channels() {
        let channels = FeedbackChannels::default();
        let mut sub = channels.subscribe();

        channels.snackbar(SnackbarText::Raw("saved".into()));
        let event = sub.recv().await;
        assert_eq!(event, Some(FeedbackEvent::Snackbar { text: SnackbarText::Raw("saved".into()) }));

        drop(channels);
        assert_eq!(sub.recv().await, None);
    }
}
