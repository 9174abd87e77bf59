use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Pending URLs plus a count of how often each one is queued
#[derive(Debug, Default)]
struct Pending {
    order: VecDeque<String>,
    members: HashMap<String, usize>,
}

/// Unbounded FIFO of URLs awaiting a claim
///
/// The queue supports many producers (workers reporting discovered links) and
/// many consumers. `push` never blocks; `take_with_timeout` parks the caller
/// until a URL arrives or the timeout elapses.
#[derive(Debug, Default)]
pub struct FrontierQueue {
    pending: Mutex<Pending>,
    available: Notify,
}

impl FrontierQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue holding `urls` in order
    pub fn from_urls<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let queue = Self::new();
        for url in urls {
            queue.push(url);
        }
        queue
    }

    /// Appends a URL to the back of the queue
    ///
    /// Duplicates are allowed; the dequeue-time claim filters them out.
    pub fn push(&self, url: String) {
        {
            let mut pending = self.lock();
            *pending.members.entry(url.clone()).or_insert(0) += 1;
            pending.order.push_back(url);
        }
        self.available.notify_one();
    }

    /// Appends a URL unless it is already waiting in the queue
    ///
    /// # Returns
    ///
    /// * `true` - The URL was enqueued
    /// * `false` - An identical URL is already pending
    pub fn offer(&self, url: String) -> bool {
        {
            let mut pending = self.lock();
            if pending.members.contains_key(&url) {
                return false;
            }
            pending.members.insert(url.clone(), 1);
            pending.order.push_back(url);
        }
        self.available.notify_one();
        true
    }

    /// Removes and returns the URL at the front of the queue, if any
    pub fn try_take(&self) -> Option<String> {
        let mut pending = self.lock();
        let url = pending.order.pop_front()?;
        if let Some(count) = pending.members.get_mut(&url) {
            *count -= 1;
            if *count == 0 {
                pending.members.remove(&url);
            }
        }
        Some(url)
    }

    /// Waits up to `timeout` for a URL
    ///
    /// Returns `None` when the timeout elapses with the queue still empty.
    /// Dropping the returned future before it completes never loses a URL, so
    /// it is safe to race inside `tokio::select!`.
    pub async fn take_with_timeout(&self, timeout: Duration) -> Option<String> {
        let deadline = Instant::now() + timeout;

        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            // Register before checking so a push between the check and the
            // await still wakes us
            notified.as_mut().enable();

            if let Some(url) = self.try_take() {
                return Some(url);
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.try_take();
            }
        }
    }

    /// Returns the queued URLs in order without draining them
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().order.iter().cloned().collect()
    }

    /// Returns true if `url` is waiting in the queue
    pub fn contains(&self, url: &str) -> bool {
        self.lock().members.contains_key(url)
    }

    /// Returns the number of queued entries
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        // Every critical section leaves `Pending` consistent, so poisoning is recoverable
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
