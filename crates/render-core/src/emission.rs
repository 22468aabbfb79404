//! Delivery of the finished document bytes.
//!
//! A writer pushes its output as chunks through an [`EmissionSink`] and then
//! signals completion. The receiving [`Emission`] waits for that signal with
//! a bounded grace period instead of assuming the bytes are ready as soon as
//! the writer was told to end.

use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmissionError {
    #[error("Document writer did not signal completion within {0:?}")]
    Timeout(Duration),
    #[error("Document writer was dropped before signalling completion")]
    Abandoned,
}

/// Writer-side half of an emission channel.
#[derive(Debug)]
pub struct EmissionSink {
    chunks: mpsc::UnboundedSender<Vec<u8>>,
    done: Option<oneshot::Sender<()>>,
}

impl EmissionSink {
    /// Queues one chunk of output. Chunks sent after the receiver is gone are
    /// discarded.
    pub fn data(&self, chunk: Vec<u8>) {
        if !chunk.is_empty() {
            let _ = self.chunks.send(chunk);
        }
    }

    /// Signals that every chunk has been sent. Only the first call has any
    /// effect.
    pub fn end(&mut self) {
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
    }

    pub fn is_ended(&self) -> bool {
        self.done.is_none()
    }
}

/// Receiver-side half of an emission channel.
#[derive(Debug)]
pub struct Emission {
    chunks: mpsc::UnboundedReceiver<Vec<u8>>,
    done: oneshot::Receiver<()>,
}

impl Emission {
    /// Waits for the completion signal and concatenates the emitted chunks.
    pub async fn collect(self, grace: Duration) -> Result<Vec<u8>, EmissionError> {
        let Emission { mut chunks, done } = self;
        match tokio::time::timeout(grace, done).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return Err(EmissionError::Abandoned),
            Err(_) => return Err(EmissionError::Timeout(grace)),
        }

        let mut bytes = Vec::new();
        while let Ok(chunk) = chunks.try_recv() {
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

pub fn emission_channel() -> (EmissionSink, Emission) {
    let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
    let (done_tx, done_rx) = oneshot::channel();
    (
        EmissionSink {
            chunks: chunk_tx,
            done: Some(done_tx),
        },
        Emission {
            chunks: chunk_rx,
            done: done_rx,
        },
    )
}
