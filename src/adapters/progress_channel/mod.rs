//! Channel and callback progress sinks for consumers on other threads

use std::sync::Mutex;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use crate::domain::model::ProgressEvent;
use crate::ports::ProgressPort;

/// Sends events over an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelProgressAdapter {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelProgressAdapter {
    pub fn new(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiving end
    pub fn channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl ProgressPort for ChannelProgressAdapter {
    fn emit(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            trace!("Progress receiver dropped; event discarded");
        }
    }
}

/// Wraps a plain closure
pub struct CallbackProgressAdapter<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackProgressAdapter<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressPort for CallbackProgressAdapter<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: ProgressEvent) {
        (self.callback)(event)
    }
}

/// Keeps every event in memory; useful for tests and summaries
#[derive(Debug, Default)]
pub struct RecordingProgressAdapter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgressAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Text of all `TextNote` events
    pub fn notes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::TextNote { message } => Some(message),
                ProgressEvent::Transfer(_) => None,
            })
            .collect()
    }
}

impl ProgressPort for RecordingProgressAdapter {
    fn emit(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
