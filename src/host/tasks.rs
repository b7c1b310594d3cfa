//! Task set for concurrently running host commands.

use crate::error::Result;
use std::future::Future;
use tokio::task::{JoinError, JoinSet};

/// Spawned host commands that have not been reaped yet.
///
/// Finished tasks are reaped before every spawn, so the set only ever holds
/// commands that are still running plus the one just added.
pub struct InFlight {
    tasks: JoinSet<Result<()>>,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
        }
    }

    /// Reap finished commands, then spawn `task`.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.reap();
        self.tasks.spawn(task);
    }

    /// Collect every command that has already finished, without waiting.
    pub fn reap(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            log_outcome(joined);
        }
    }

    /// Wait for every remaining command to finish.
    pub async fn drain(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            log_outcome(joined);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}

fn log_outcome(joined: std::result::Result<Result<()>, JoinError>) {
    match joined {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "host command failed to complete"),
        Err(e) => tracing::error!(error = %e, "host command task failed"),
    }
}
