//! Initialize-before-measure guard.

use tracing::info;

use crate::error::{HarnessError, Result};
use crate::worker::WorkerLibrary;

/// An initialized worker.
///
/// The scenario runners only accept a `Session`, and the only way to get one
/// is `open`, so no measurement can happen before the worker's process-wide
/// initialization.
#[derive(Debug)]
pub struct Session<W: WorkerLibrary> {
    worker: W,
}

impl<W: WorkerLibrary> Session<W> {
    pub fn open(worker: W) -> Result<Self> {
        worker.initialize()?;
        if !worker.is_initialized() {
            return Err(HarnessError::worker(
                "initialize",
                "worker reports not initialized",
            ));
        }
        info!(worker = worker.name(), "worker library ready");
        Ok(Self { worker })
    }

    pub fn worker(&self) -> &W {
        &self.worker
    }

    pub fn into_inner(self) -> W {
        self.worker
    }
}
