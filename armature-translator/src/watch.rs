//! Tokio watch-channel bridge
//!
//! Async consumers that prefer `.changed().await` over callbacks can mirror an
//! [`Observable`] into a [`tokio::sync::watch`] channel. Watch receivers only
//! see the latest value; intermediate values emitted between two polls are
//! coalesced.

use crate::subject::{Observable, Subscription};
use std::sync::Arc;
use tokio::sync::watch;

/// Keeps an observable mirrored into a watch channel.
///
/// Mirroring stops when the bridge is dropped; receivers then observe a
/// closed channel.
#[derive(Debug)]
pub struct WatchBridge<T> {
    sender: Arc<watch::Sender<T>>,
    _subscription: Subscription,
}

impl<T> WatchBridge<T> {
    /// A new receiver positioned at the current value.
    pub fn receiver(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Mirror this observable into a tokio watch channel.
    ///
    /// # Examples
    ///
    /// ```
    /// use armature_translator::{TranslatorConfig, TranslatorService};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> armature_translator::Result<()> {
    /// let translator = TranslatorService::new(TranslatorConfig::new(["en", "pt"], "en"))?;
    /// let bridge = translator.preferred_language_stream().to_watch();
    /// let mut rx = bridge.receiver();
    ///
    /// translator.set_preferred_language("pt")?;
    /// rx.changed().await.unwrap();
    /// assert_eq!(*rx.borrow(), "pt");
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_watch(&self) -> WatchBridge<T> {
        let (sender, _) = watch::channel(self.value());
        let sender = Arc::new(sender);

        let tx = sender.clone();
        let subscription = self.subscribe(move |value: &T| {
            tx.send_replace(value.clone());
        });

        WatchBridge {
            sender,
            _subscription: subscription,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::BehaviorSubject;

    #[tokio::test]
    async fn test_watch_sees_latest_value() {
        let subject = BehaviorSubject::new(1);
        let bridge = subject.as_observable().to_watch();
        let mut rx = bridge.receiver();

        assert_eq!(*rx.borrow(), 1);

        subject.next(2);
        subject.next(3);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 3);
    }

    #[tokio::test]
    async fn test_dropping_bridge_closes_channel() {
        let subject = BehaviorSubject::new("en".to_string());
        let bridge = subject.as_observable().to_watch();
        let mut rx = bridge.receiver();

        drop(bridge);

        assert!(rx.changed().await.is_err());
        assert_eq!(subject.observer_count(), 0);
    }
}
