//! The background refresh task.
//!
//! Fetch, parse, pick and write: one pass per trigger (mount and every
//! resize). Passes are independent; a slower earlier pass may land after a
//! later one and its value then wins. Failures stay inside this module.

use std::sync::Arc;

use portal_core::StyleSurface;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::client::ImageFetcher;
use crate::config::{BackdropSettings, EndpointKind};
use crate::error::{BackdropError, Result};
use crate::payload::{css_url_value, parse_image_list, pick_url};

/// A background written to the style surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedBackground {
    /// Endpoint class selected for the viewport width.
    pub kind: EndpointKind,
    /// Endpoint that was called.
    pub endpoint: String,
    /// Chosen image URL.
    pub url: String,
    /// Value written to the style variable.
    pub css_value: String,
}

/// How a refresh pass ended. Never an error for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Refresh is disabled.
    Skipped,
    /// A new background was written.
    Applied(AppliedBackground),
    /// The pass failed; the style variable is unchanged.
    Failed(BackdropError),
    /// The job was aborted before it finished.
    Cancelled,
}

impl RefreshOutcome {
    /// Whether a background was written.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Fetches decorative images and writes them to a style surface.
pub struct BackgroundRefresher<F, S> {
    fetcher: Arc<F>,
    surface: S,
    settings: Arc<BackdropSettings>,
}

impl<F, S: Clone> Clone for BackgroundRefresher<F, S> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            surface: self.surface.clone(),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<F, S> BackgroundRefresher<F, S>
where
    F: ImageFetcher + 'static,
    S: StyleSurface + Clone + 'static,
{
    pub fn new(fetcher: F, surface: S, settings: BackdropSettings) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            surface,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &BackdropSettings {
        &self.settings
    }

    /// Run one pass for a viewport `width`.
    ///
    /// The style variable is written only after a URL was picked, so any
    /// error leaves it as it was.
    pub async fn refresh(&self, width: u32) -> Result<AppliedBackground> {
        if !self.settings.enabled {
            return Err(BackdropError::Disabled);
        }

        let (kind, endpoint) = self.settings.endpoint_for(width);
        tracing::debug!("Refreshing background for width {} ({} endpoint)", width, kind);

        let body = self.fetcher.fetch(endpoint).await?;
        let urls = parse_image_list(&body)?;
        let url = {
            let mut rng = rand::thread_rng();
            pick_url(&urls, &mut rng)?.to_string()
        };

        let css_value = css_url_value(&url);
        self.surface
            .set_property(&self.settings.css_variable, &css_value);
        tracing::info!("Applied background {}", url);

        Ok(AppliedBackground {
            kind,
            endpoint: endpoint.to_string(),
            url,
            css_value,
        })
    }

    /// Like [`refresh`](Self::refresh), with failures logged and folded
    /// into the outcome.
    pub async fn run(&self, width: u32) -> RefreshOutcome {
        match self.refresh(width).await {
            Ok(applied) => RefreshOutcome::Applied(applied),
            Err(BackdropError::Disabled) => RefreshOutcome::Skipped,
            Err(err) => {
                tracing::warn!("Background refresh failed: {}", err);
                RefreshOutcome::Failed(err)
            }
        }
    }

    /// Start a pass on the current tokio runtime.
    ///
    /// Dropping the returned job does not stop the pass.
    pub fn spawn(&self, width: u32) -> RefreshJob {
        let refresher = self.clone();
        let (sender, receiver) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let outcome = refresher.run(width).await;
            // Receiver may be gone; the write already happened.
            let _ = sender.send(outcome);
        });
        RefreshJob { receiver, handle }
    }
}

/// A spawned refresh pass.
#[derive(Debug)]
pub struct RefreshJob {
    receiver: oneshot::Receiver<RefreshOutcome>,
    handle: JoinHandle<()>,
}

impl RefreshJob {
    /// Wait for the pass to end.
    pub async fn outcome(self) -> RefreshOutcome {
        self.receiver.await.unwrap_or(RefreshOutcome::Cancelled)
    }

    /// Abort the pass. A pass that already wrote its value keeps it.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
