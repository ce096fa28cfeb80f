//! Live, filtered view over the task collection.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;
use tracing::{debug, info};

use nextsteps_core::result::AppResult;
use nextsteps_core::traits::{Subscription, SubscriptionHandle};
use nextsteps_database::repositories::TaskRepository;
use nextsteps_entity::staff::Staff;
use nextsteps_entity::task::Task;

use super::visibility::{ViewToggle, VisibleTasks, open_tasks, visible_tasks};

/// Cloneable control for a feed's view toggle.
#[derive(Debug, Clone)]
pub struct FeedToggle {
    tx: Arc<watch::Sender<ViewToggle>>,
}

impl FeedToggle {
    /// Switch the view. The feed re-emits its last snapshot under the new view.
    pub fn set(&self, toggle: ViewToggle) {
        self.tx.send_replace(toggle);
    }

    /// The view currently applied.
    pub fn get(&self) -> ViewToggle {
        *self.tx.borrow()
    }
}

/// The open tasks a colleague sees, re-evaluated on every store snapshot
/// and every toggle change.
///
/// Each emitted [`VisibleTasks`] fully replaces the previous one.
pub struct TaskFeed {
    repo: TaskRepository,
    viewer: Staff,
    subscription: Subscription,
    toggle: FeedToggle,
    toggle_rx: watch::Receiver<ViewToggle>,
    /// Open tasks from the most recent store snapshot.
    latest: Option<Vec<Task>>,
}

impl std::fmt::Debug for TaskFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFeed")
            .field("viewer", &self.viewer.id)
            .field("toggle", &self.toggle.get())
            .field("subscription", &self.subscription)
            .finish()
    }
}

impl TaskFeed {
    /// Subscribe to the task collection on behalf of `viewer`.
    pub async fn open(repo: TaskRepository, viewer: Staff, toggle: ViewToggle) -> AppResult<Self> {
        let subscription = repo.subscribe_all().await?;
        let (tx, toggle_rx) = watch::channel(toggle);
        info!(staff_id = %viewer.id, %toggle, "Opened task feed");
        Ok(Self {
            repo,
            viewer,
            subscription,
            toggle: FeedToggle { tx: Arc::new(tx) },
            toggle_rx,
            latest: None,
        })
    }

    /// Wait for the next visible list.
    ///
    /// Returns `None` once the feed is unsubscribed or the store ends the
    /// live query.
    pub async fn next(&mut self) -> Option<AppResult<VisibleTasks>> {
        loop {
            tokio::select! {
                item = self.subscription.next() => {
                    return match item? {
                        Ok(docs) => {
                            let open = open_tasks(TaskRepository::decode(&docs));
                            debug!(open = open.len(), "Task snapshot received");
                            self.latest = Some(open);
                            Some(Ok(self.render()))
                        }
                        Err(e) => Some(Err(e)),
                    };
                }
                changed = self.toggle_rx.changed() => {
                    changed.ok()?;
                    // Nothing to re-filter before the first snapshot.
                    if self.latest.is_some() {
                        return Some(Ok(self.render()));
                    }
                }
            }
        }
    }

    /// The last visible list, without waiting.
    pub fn current(&self) -> Option<VisibleTasks> {
        self.latest.as_ref().map(|tasks| {
            visible_tasks(tasks, &self.viewer, *self.toggle_rx.borrow())
        })
    }

    /// Control handle for the view toggle.
    pub fn toggle(&self) -> FeedToggle {
        self.toggle.clone()
    }

    /// Cancellation handle for the underlying live query.
    pub fn handle(&self) -> SubscriptionHandle {
        self.subscription.handle()
    }

    /// Drop the current live query and open a fresh one, e.g. after the
    /// store ended the previous one with an error.
    pub async fn restart(&mut self) -> AppResult<()> {
        let fresh = self.repo.subscribe_all().await?;
        let old = std::mem::replace(&mut self.subscription, fresh);
        old.unsubscribe();
        self.latest = None;
        info!(staff_id = %self.viewer.id, "Restarted task feed");
        Ok(())
    }

    /// Stop the feed.
    pub fn unsubscribe(self) {
        debug!(staff_id = %self.viewer.id, "Closed task feed");
        self.subscription.unsubscribe();
    }

    fn render(&mut self) -> VisibleTasks {
        let toggle = *self.toggle_rx.borrow_and_update();
        match &self.latest {
            Some(tasks) => visible_tasks(tasks, &self.viewer, toggle),
            None => VisibleTasks {
                toggle,
                ..VisibleTasks::default()
            },
        }
    }
}
