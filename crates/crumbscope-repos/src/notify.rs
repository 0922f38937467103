use tokio::sync::mpsc;

/// Fire-and-forget notification surface
pub trait Notifier: Send + Sync + 'static {
    fn notify_success(&self, text: &str);
    fn notify_error(&self, text: &str);
}

/// Notifier that only logs
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_success(&self, text: &str) {
        tracing::info!(notification = text, "success");
    }

    fn notify_error(&self, text: &str) {
        tracing::warn!(notification = text, "error");
    }
}

/// A notification as delivered to a UI
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Notifier that forwards to a UI over a channel
#[derive(Clone, Debug)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify_success(&self, text: &str) {
        // The UI may already be gone during shutdown
        let _ = self.tx.send(Notification::Success(text.to_string()));
    }

    fn notify_error(&self, text: &str) {
        let _ = self.tx.send(Notification::Error(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier_forwards() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let notifier = ChannelNotifier::new(tx);

        notifier.notify_success("saved");
        notifier.notify_error("failed");

        assert_eq!(rx.try_recv().unwrap(), Notification::Success("saved".to_string()));
        assert!(rx.try_recv().unwrap().is_error());
    }
}
