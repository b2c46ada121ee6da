// Tracing log adapter - Progress events forwarded to the tracing subscriber

use tracing::{debug, info};

use crate::domain::model::*;
use crate::ports::*;

/// Progress sink that writes every event to the log
#[derive(Debug, Default, Clone)]
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressPort for TracingLogAdapter {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::TextNote { message } => info!("{}", message),
            ProgressEvent::Transfer(transfer) => debug!(
                downloaded_bytes = transfer.downloaded_bytes,
                total_bytes = ?transfer.total_bytes,
                percent = %transfer.percent_str(),
                "Downloading {}",
                transfer
            ),
        }
    }
}

/// Fans one event out to several sinks, in order
pub struct TeeProgressAdapter {
    sinks: Vec<Box<dyn ProgressPort>>,
}

impl TeeProgressAdapter {
    pub fn new(sinks: Vec<Box<dyn ProgressPort>>) -> Self {
        Self { sinks }
    }
}

impl ProgressPort for TeeProgressAdapter {
    fn emit(&self, event: ProgressEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }
}
