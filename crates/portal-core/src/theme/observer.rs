//! Live theme observation.
//!
//! [`ThemeObserver`] decodes the marker once on activation, then follows
//! class mutations on the style surface. The decoded value is published on a
//! `tokio::sync::watch` channel: consumers read the last value synchronously
//! and await or poll for changes. No polling of the surface itself.

use std::sync::Arc;

use tokio::sync::watch;

use crate::surface::{CLASS_ATTRIBUTE, Mutation, StyleSurface, SurfaceSubscription};

use super::ThemeState;
use super::codec::{RawTheme, ThemeCodec, decode_or_light};

/// Publishes the decoded theme for as long as it is held.
///
/// The surface subscription is released when the observer is dropped or
/// [`deactivate`](Self::deactivate)d.
#[derive(Debug)]
pub struct ThemeObserver {
    sender: Arc<watch::Sender<ThemeState>>,
    subscription: SurfaceSubscription,
}

impl ThemeObserver {
    /// Read the current marker and start following class mutations.
    pub fn activate<S: StyleSurface + ?Sized>(surface: &S, codec: Arc<dyn ThemeCodec>) -> Self {
        let initial = decode_or_light(codec.as_ref(), &codec.init_theme());
        tracing::debug!("Theme observer activated ({})", initial);

        let (sender, _) = watch::channel(initial);
        let sender = Arc::new(sender);

        let callback_sender = Arc::clone(&sender);
        let subscription = surface.subscribe(Box::new(move |mutation: &Mutation| {
            if !mutation.kind.is_attribute(CLASS_ATTRIBUTE) {
                return;
            }
            let raw = RawTheme::new(mutation.target_classes.clone());
            let state = decode_or_light(codec.as_ref(), &raw);
            tracing::debug!("Theme marker changed ({})", state);
            callback_sender.send_replace(state);
        }));

        Self {
            sender,
            subscription,
        }
    }

    /// Last published theme.
    pub fn current(&self) -> ThemeState {
        *self.sender.borrow()
    }

    /// A receiver for live updates, starting at the current value.
    pub fn watch(&self) -> watch::Receiver<ThemeState> {
        self.sender.subscribe()
    }

    /// Whether the surface subscription is still held.
    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }

    /// Stop observing and return the last published theme.
    pub fn deactivate(self) -> ThemeState {
        let last = self.current();
        self.subscription.unsubscribe();
        tracing::debug!("Theme observer deactivated ({})", last);
        last
    }
}
