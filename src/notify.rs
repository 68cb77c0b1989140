//! Background checks with callback delivery
//!
//! `start_check` spawns a tokio task and returns immediately. The listener
//! receives exactly one callback per call, whichever branch the check takes:
//! success, fallback, cancellation or a panic inside the check itself.

use crate::checker::UpdateChecker;
use crate::domain::{CheckOutcome, CheckRequest, VersionDescriptor};
use crate::source::{http_sources, DescriptorSource};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Receives the terminal outcome of a background check
pub trait CheckListener: Send + Sync {
    /// A newer release exists
    fn on_update_available(&self, descriptor: VersionDescriptor);

    /// The running version is current
    fn on_up_to_date(&self);

    /// The check did not reach a conclusion
    fn on_check_failed(&self, message: String);
}

/// Route an outcome to the matching listener callback
pub fn dispatch(outcome: CheckOutcome, listener: &dyn CheckListener) {
    match outcome {
        CheckOutcome::UpdateAvailable { descriptor } => listener.on_update_available(descriptor),
        CheckOutcome::UpToDate => listener.on_up_to_date(),
        CheckOutcome::CheckFailed { message } => listener.on_check_failed(message),
    }
}

/// Handle to a running background check
pub struct CheckHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl CheckHandle {
    /// Ask the check to stop; the listener then gets `on_check_failed`
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared with the running check
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns true once the outcome has been delivered
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the outcome has been delivered
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            error!("update check listener failed: {}", e);
        }
    }
}

impl UpdateChecker {
    /// Start a check of the request's URLs in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_check(
        &self,
        request: CheckRequest,
        listener: Arc<dyn CheckListener>,
    ) -> CheckHandle {
        let sources = http_sources(self.client(), &request.sources);
        self.start_check_sources(request.current_version, sources, request.timeout, listener)
    }

    /// Start a check over arbitrary sources in the background
    pub fn start_check_sources(
        &self,
        current_version: String,
        sources: Vec<Box<dyn DescriptorSource>>,
        timeout: Duration,
        listener: Arc<dyn CheckListener>,
    ) -> CheckHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let checker = self.clone();

        let task = tokio::spawn(async move {
            let inner = tokio::spawn(async move {
                checker
                    .check_sources(&current_version, &sources, timeout, &token)
                    .await
            });

            let outcome = match inner.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("update check task failed: {}", e);
                    CheckOutcome::failed(format!("error while checking for updates: {}", e))
                }
            };

            info!("update check finished: {}", outcome.status());
            dispatch(outcome, listener.as_ref());
        });

        CheckHandle { cancel, task }
    }
}

/// Listener that forwards outcomes into a channel
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<CheckOutcome>,
}

impl ChannelListener {
    /// Create a listener and the receiving end of its channel
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<CheckOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }

    fn send(&self, outcome: CheckOutcome) {
        if self.tx.send(outcome).is_err() {
            debug!("update outcome dropped: receiver closed");
        }
    }
}

impl CheckListener for ChannelListener {
    fn on_update_available(&self, descriptor: VersionDescriptor) {
        self.send(CheckOutcome::update_available(descriptor));
    }

    fn on_up_to_date(&self) {
        self.send(CheckOutcome::UpToDate);
    }

    fn on_check_failed(&self, message: String) {
        self.send(CheckOutcome::failed(message));
    }
}
