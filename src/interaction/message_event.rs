//! Turns a webhook event batch into replies.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard},
};

use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, instrument, warn};

use crate::{
    base::types::{EventMessage, EventPolicy, Keywords, Reply, SharedKeywords, WebhookEvent},
    interaction::classify::classify,
    service::chat::ChatClient,
};

/// A reply that has been chosen and is waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedReply {
    pub reply_token: String,
    pub reply: Reply,
}

/// Applies the batch policy to a delivery.
pub fn select_events(events: &[WebhookEvent], policy: EventPolicy) -> &[WebhookEvent] {
    match policy {
        EventPolicy::All => events,
        EventPolicy::First => &events[..events.len().min(1)],
    }
}

/// Classifies every selected text message and collects the replies to send.
///
/// Non-message events, non-text messages and messages without a match
/// produce nothing.
pub fn plan_replies(events: &[WebhookEvent], policy: EventPolicy, keywords: &Keywords) -> Vec<PlannedReply> {
    let mut planned = Vec::new();

    for event in select_events(events, policy) {
        let WebhookEvent::Message { reply_token, message } = event else {
            debug!("Skipping non-message event.");
            continue;
        };

        let EventMessage::Text { text, .. } = message else {
            debug!("Skipping non-text message.");
            continue;
        };

        let Some(reply) = classify(text, keywords) else {
            debug!("No keyword matched.");
            continue;
        };

        let Some(reply_token) = reply_token else {
            warn!("Matched message has no reply token; skipping.");
            continue;
        };

        info!(kind = ?reply.kind, "Message classified.");

        planned.push(PlannedReply {
            reply_token: reply_token.clone(),
            reply,
        });
    }

    planned
}

/// Sends planned replies concurrently.
///
/// A failed send is logged and does not stop the remaining ones.  Returns the
/// number of replies that were delivered.
#[instrument(skip_all, fields(count = planned.len()))]
pub async fn dispatch_replies(planned: Vec<PlannedReply>, chat: &ChatClient) -> usize {
    let sends = planned.iter().map(|p| async move {
        match chat.reply_message(&p.reply_token, &p.reply.text).await {
            Ok(()) => true,
            Err(err) => {
                error!(reply_token = %p.reply_token, "Error while replying: {}", err);
                false
            }
        }
    });

    let results = futures::future::join_all(sends).await;

    results.into_iter().filter(|delivered| *delivered).count()
}

/// In-flight reply sends.
///
/// Cloning shares the same set.  Finished tasks are reaped on every spawn;
/// whatever is still running at shutdown is awaited by `drain`.
#[derive(Clone, Default)]
pub struct ReplyTasks {
    inner: Arc<Mutex<JoinSet<usize>>>,
}

impl ReplyTasks {
    fn lock(&self) -> MutexGuard<'_, JoinSet<usize>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Spawns a send task onto the current runtime and tracks it.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = usize> + Send + 'static,
    {
        let mut set = self.lock();

        while let Some(finished) = set.try_join_next() {
            if let Err(err) = finished {
                error!("Reply task failed: {}", err);
            }
        }

        set.spawn(task);
    }

    /// Number of tasks not yet reaped.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits for every tracked task and returns the replies they delivered.
    pub async fn drain(&self) -> usize {
        let mut set = std::mem::take(&mut *self.lock());
        let mut delivered = 0;

        while let Some(finished) = set.join_next().await {
            match finished {
                Ok(count) => delivered += count,
                Err(err) => error!("Reply task failed: {}", err),
            }
        }

        delivered
    }
}

/// Handles a parsed event batch.
///
/// Classification happens inline; sending is spawned onto `tasks` so the
/// caller can acknowledge the delivery without waiting on the chat platform.
/// Returns `true` if any reply was scheduled.
#[instrument(skip_all, fields(events = events.len()))]
pub fn handle_events(events: Vec<WebhookEvent>, policy: EventPolicy, keywords: SharedKeywords, chat: ChatClient, tasks: &ReplyTasks) -> bool {
    let planned = plan_replies(&events, policy, &keywords);

    if planned.is_empty() {
        return false;
    }

    tasks.spawn(async move { dispatch_replies(planned, &chat).await }.in_current_span());

    true
}

// Tests.
