//! Notification delivery
//!
//! The host dispatcher publishes into one latest-value slot per notification
//! kind; each facade holds a [`Subscription`] and drains it synchronously
//! before reading state. A slot only ever keeps the newest value, so no
//! amount of traffic between two reads can push out another kind's state.
//! Neither side needs an async runtime.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::{
    state::is_usable_provider_id,
    types::{ContentMetadataSnapshot, Notification, NotificationKind, PageContext},
};

#[derive(Debug)]
struct Slots {
    metadata: watch::Sender<Option<ContentMetadataSnapshot>>,
    provider_id: watch::Sender<Option<String>>,
    full_screen: watch::Sender<Option<bool>>,
}

/// Host-side notification dispatcher
#[derive(Debug, Clone)]
pub struct NotificationBus {
    slots: Arc<Slots>,
}

impl NotificationBus {
    pub fn new() -> Self {
        let (metadata, _) = watch::channel(None);
        let (provider_id, _) = watch::channel(None);
        let (full_screen, _) = watch::channel(None);
        Self {
            slots: Arc::new(Slots {
                metadata,
                provider_id,
                full_screen,
            }),
        }
    }

    /// Publish a notification; returns how many subscribers will see it.
    ///
    /// A page context without a usable provider id is dropped here, so it
    /// can never overwrite a provider id that is still waiting to be read.
    pub fn publish(&self, notification: Notification) -> usize {
        let kind = notification.kind();
        let receivers = match notification {
            Notification::MetadataUpdated(snapshot) => {
                self.slots.metadata.send_replace(Some(snapshot));
                self.slots.metadata.receiver_count()
            }
            Notification::PageContextUpdated(PageContext {
                provider_id: Some(id),
            }) if is_usable_provider_id(&id) => {
                self.slots.provider_id.send_replace(Some(id));
                self.slots.provider_id.receiver_count()
            }
            Notification::PageContextUpdated(context) => {
                debug!(candidate = ?context.provider_id, "Page context without usable provider id");
                return 0;
            }
            Notification::FullScreenChanged(full_screen) => {
                self.slots.full_screen.send_replace(Some(full_screen));
                self.slots.full_screen.receiver_count()
            }
        };

        if receivers == 0 {
            debug!(kind = %kind, "Notification published with no subscribers");
        }
        receivers
    }

    /// Subscribe to the given notification kinds.
    ///
    /// Only notifications published after this call are delivered.
    pub fn subscribe(&self, kinds: &[NotificationKind]) -> Subscription {
        Subscription {
            metadata: Some(self.slots.metadata.subscribe()),
            provider_id: Some(self.slots.provider_id.subscribe()),
            full_screen: Some(self.slots.full_screen.subscribe()),
            kinds: kinds.to_vec(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.slots.metadata.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end held by a facade for its whole lifetime
#[derive(Debug)]
pub struct Subscription {
    metadata: Option<watch::Receiver<Option<ContentMetadataSnapshot>>>,
    provider_id: Option<watch::Receiver<Option<String>>>,
    full_screen: Option<watch::Receiver<Option<bool>>>,
    kinds: Vec<NotificationKind>,
}

impl Subscription {
    pub fn kinds(&self) -> &[NotificationKind] {
        &self.kinds
    }

    /// Take the newest unseen value of every subscribed kind
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut pending = Vec::new();

        if let Some(snapshot) = take_latest(&mut self.metadata) {
            pending.push(Notification::MetadataUpdated(snapshot));
        }
        if let Some(id) = take_latest(&mut self.provider_id) {
            pending.push(Notification::PageContextUpdated(PageContext::with_provider(id)));
        }
        if let Some(full_screen) = take_latest(&mut self.full_screen) {
            pending.push(Notification::FullScreenChanged(full_screen));
        }

        pending.retain(|notification| self.kinds.contains(&notification.kind()));
        pending
    }
}

/// Newest unseen value in a slot, if any
fn take_latest<T: Clone>(slot: &mut Option<watch::Receiver<Option<T>>>) -> Option<T> {
    let rx = slot.as_mut()?;
    match rx.has_changed() {
        Ok(true) => rx.borrow_and_update().clone(),
        Ok(false) => None,
        Err(_) => {
            // Bus dropped: hand over the final value once, then detach
            let last = rx.borrow().clone();
            *slot = None;
            last
        }
    }
}
