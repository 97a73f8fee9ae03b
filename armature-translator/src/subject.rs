//! Replay-latest observable values
//!
//! A [`BehaviorSubject`] caches its most recent value. Every new subscriber
//! receives that value immediately, then each later value in emission order.
//! [`Observable`] is the read-only view handed to consumers.
//!
//! ```
//! use armature_translator::BehaviorSubject;
//! use std::sync::{Arc, Mutex};
//!
//! let subject = BehaviorSubject::new("en".to_string());
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = seen.clone();
//! let subscription = subject
//!     .as_observable()
//!     .subscribe(move |lang: &String| sink.lock().unwrap().push(lang.clone()));
//!
//! subject.next("pt".to_string());
//! subscription.unsubscribe();
//! subject.next("de".to_string());
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["en", "pt"]);
//! ```

use parking_lot::{Mutex, ReentrantMutex};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct SubjectInner<T> {
    /// Held across update-plus-delivery and register-plus-replay so every
    /// observer sees values in emission order, one call at a time.
    emission: ReentrantMutex<()>,
    value: Mutex<T>,
    observers: Mutex<Vec<(u64, Observer<T>)>>,
    next_id: AtomicU64,
}

impl<T> SubjectInner<T> {
    fn remove(&self, id: u64) {
        let mut observers = self.observers.lock();
        observers.retain(|(observer_id, _)| *observer_id != id);
        trace!(
            observer_id = id,
            remaining = observers.len(),
            "Observer unsubscribed"
        );
    }
}

/// A value holder that pushes every update to its observers.
pub struct BehaviorSubject<T> {
    inner: Arc<SubjectInner<T>>,
}

impl<T> BehaviorSubject<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a subject holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(SubjectInner {
                emission: ReentrantMutex::new(()),
                value: Mutex::new(initial),
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Replace the current value and deliver it to every observer.
    ///
    /// Observers run on the calling thread after the value lock is released,
    /// so an observer may read or update the subject itself. Emissions from
    /// other threads wait until delivery of this value has finished.
    pub fn next(&self, value: T) {
        let _emission = self.inner.emission.lock();

        let observers: Vec<Observer<T>> = {
            let mut current = self.inner.value.lock();
            *current = value.clone();
            self.inner
                .observers
                .lock()
                .iter()
                .map(|(_, observer)| observer.clone())
                .collect()
        };

        trace!(observers = observers.len(), "Emitting value");

        for observer in observers {
            observer(&value);
        }
    }

    /// Snapshot of the current value.
    pub fn value(&self) -> T {
        self.inner.value.lock().clone()
    }

    /// Borrow the current value without cloning it.
    ///
    /// The value lock is held while `f` runs; `f` must not emit on this subject.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.value.lock())
    }

    /// Read-only view of this subject.
    pub fn as_observable(&self) -> Observable<T> {
        Observable {
            inner: self.inner.clone(),
        }
    }

    /// Subscribe directly on the subject.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.as_observable().subscribe(observer)
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.lock().len()
    }
}

impl<T: Clone + Send + Sync + 'static + Default> Default for BehaviorSubject<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for BehaviorSubject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorSubject")
            .field("value", &*self.inner.value.lock())
            .field("observers", &self.inner.observers.lock().len())
            .finish()
    }
}

/// Subscribe-only handle to a [`BehaviorSubject`].
pub struct Observable<T> {
    inner: Arc<SubjectInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Register `observer`, then immediately deliver the current value to it.
    ///
    /// A concurrent [`BehaviorSubject::next`] waits until the replay has been
    /// delivered. Delivery stops when the returned [`Subscription`] is dropped
    /// or unsubscribed.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let observer: Observer<T> = Arc::new(observer);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let _emission = self.inner.emission.lock();

        let current = {
            let current = self.inner.value.lock();
            let mut observers = self.inner.observers.lock();
            observers.push((id, observer.clone()));
            trace!(observer_id = id, observers = observers.len(), "Observer subscribed");
            current.clone()
        };

        observer(&current);

        let weak: Weak<SubjectInner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.remove(id);
                }
            })),
        }
    }

    /// Snapshot of the current value.
    pub fn value(&self) -> T {
        self.inner.value.lock().clone()
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.inner.value.lock())
            .finish_non_exhaustive()
    }
}

/// Handle for a registered observer.
///
/// Dropping it unsubscribes. Use [`Subscription::detach`] to keep the
/// observer for the subject's whole lifetime.
#[must_use = "dropping a Subscription immediately unsubscribes the observer"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Stop delivery to this observer.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the observer registered until the subject itself is dropped.
    pub fn detach(mut self) {
        self.cancel = None;
    }

    /// Whether this handle still controls a registration.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |value: &T| sink.lock().push(value.clone()))
    }

    #[test]
    fn test_replays_latest_on_subscribe() {
        let subject = BehaviorSubject::new(1);
        subject.next(2);

        let (seen, observer) = recorder::<i32>();
        let _sub = subject.subscribe(observer);

        assert_eq!(*seen.lock(), vec![2]);
    }

    #[test]
    fn test_delivers_in_emission_order() {
        let subject = BehaviorSubject::new(0);
        let (seen, observer) = recorder::<i32>();
        let _sub = subject.subscribe(observer);

        subject.next(1);
        subject.next(2);
        subject.next(3);

        assert_eq!(*seen.lock(), vec![0, 1, 2, 3]);
        assert_eq!(subject.value(), 3);
    }

    #[test]
    fn test_multiple_observers() {
        let subject = BehaviorSubject::new("a".to_string());
        let (first, first_observer) = recorder::<String>();
        let _first = subject.subscribe(first_observer);

        subject.next("b".to_string());

        let (second, second_observer) = recorder::<String>();
        let _second = subject.subscribe(second_observer);

        subject.next("c".to_string());

        assert_eq!(*first.lock(), vec!["a", "b", "c"]);
        assert_eq!(*second.lock(), vec!["b", "c"]);
        assert_eq!(subject.observer_count(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let subject = BehaviorSubject::new(0);
        let (seen, observer) = recorder::<i32>();
        let sub = subject.subscribe(observer);

        subject.next(1);
        sub.unsubscribe();
        subject.next(2);

        assert_eq!(*seen.lock(), vec![0, 1]);
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let subject = BehaviorSubject::new(0);
        let (seen, observer) = recorder::<i32>();

        {
            let _sub = subject.subscribe(observer);
            subject.next(1);
        }
        subject.next(2);

        assert_eq!(*seen.lock(), vec![0, 1]);
    }

    #[test]
    fn test_detach_keeps_observer() {
        let subject = BehaviorSubject::new(0);
        let (seen, observer) = recorder::<i32>();

        subject.subscribe(observer).detach();
        subject.next(5);

        assert_eq!(*seen.lock(), vec![0, 5]);
        assert_eq!(subject.observer_count(), 1);
    }

    #[test]
    fn test_observer_may_read_subject() {
        let subject = Arc::new(BehaviorSubject::new(0));
        let reader = subject.clone();
        let (seen, _) = recorder::<i32>();
        let sink = seen.clone();

        let _sub = subject.subscribe(move |_| sink.lock().push(reader.value()));
        subject.next(7);

        assert_eq!(*seen.lock(), vec![0, 7]);
    }

    #[test]
    fn test_concurrent_next_waits_for_replay() {
        let subject = Arc::new(BehaviorSubject::new("en".to_string()));
        let (replaying_tx, replaying_rx) = std::sync::mpsc::channel::<()>();
        let replaying_tx = Mutex::new(Some(replaying_tx));

        let emitter = {
            let subject = subject.clone();
            std::thread::spawn(move || {
                replaying_rx.recv().unwrap();
                subject.next("pt".to_string());
            })
        };

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = subject.subscribe(move |lang: &String| {
            if let Some(tx) = replaying_tx.lock().take() {
                tx.send(()).unwrap();
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
            sink.lock().push(lang.clone());
        });

        emitter.join().unwrap();

        assert_eq!(*seen.lock(), vec!["en", "pt"]);
        assert_eq!(seen.lock().last().cloned(), Some(subject.value()));
    }

    #[test]
    fn test_subscription_outlives_subject() {
        let subject = BehaviorSubject::new(0);
        let sub = subject.subscribe(|_| {});
        drop(subject);

        assert!(sub.is_active());
        sub.unsubscribe();
    }
}
