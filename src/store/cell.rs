use tokio::sync::watch;

/// A value that can be read, replaced, and watched.
///
/// Every write notifies subscribers, including writes of an equal value.
/// A subscriber that falls behind sees only the newest value.
pub struct StoreCell<T> {
    tx: watch::Sender<T>,
}

impl<T: Default> Default for StoreCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> StoreCell<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Replaces the current value.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Replaces the current value with one derived from it.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.tx.send_modify(|current| *current = f(current));
    }

    /// Subscribes to future writes. The current value counts as already seen.
    pub fn subscribe(&self) -> StoreSubscription<T> {
        StoreSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone> StoreCell<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

/// Receiving end of a [`StoreCell`].
pub struct StoreSubscription<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> StoreSubscription<T> {
    /// Waits for the next write and returns the value it stored.
    ///
    /// Returns `None` once the cell has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Current value, without marking it as seen.
    pub fn latest(&self) -> T {
        self.rx.borrow().clone()
    }

    /// True if a write happened since the last [`changed`](Self::changed).
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }
}
