use crate::error::{AatError, Result};
use crate::fd_impl::ElementIndex;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Unit of work for the dispatcher.
pub trait Task: Send {
    type Output: Send;

    fn element(&self) -> ElementIndex;
    fn run(&self) -> Self::Output;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    Parallel { workers: usize },
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "sequential"),
            ExecutionMode::Parallel { workers } => write!(f, "parallel, {} workers", workers),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    mode: ExecutionMode,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl Dispatcher {
    pub fn sequential() -> Self {
        Dispatcher {
            mode: ExecutionMode::Sequential,
            stop_flag: None,
        }
    }

    pub fn parallel(workers: usize) -> Self {
        Dispatcher {
            mode: ExecutionMode::Parallel { workers },
            stop_flag: None,
        }
    }

    /// Tasks not yet started when the flag is raised are skipped and the
    /// run fails with `Cancelled`.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    fn stopped(&self) -> bool {
        self.stop_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn guarded<T: Task>(&self, task: &T) -> (ElementIndex, Option<T::Output>) {
        let element = task.element();
        if self.stopped() {
            return (element, None);
        }
        debug!("task ({}, {}) started", element.coordinate, element.field);
        (element, Some(task.run()))
    }

    /// Runs every task and returns `(element, output)` in submission order.
    pub fn run<T: Task>(&self, tasks: Vec<T>) -> Result<Vec<(ElementIndex, T::Output)>> {
        let results: Vec<(ElementIndex, Option<T::Output>)> = match self.mode {
            ExecutionMode::Sequential => tasks.iter().map(|t| self.guarded(t)).collect(),
            ExecutionMode::Parallel { workers } => {
                if workers == 0 {
                    return Err(AatError::InvalidConfiguration(
                        "worker pool needs at least one thread".to_string(),
                    ));
                }
                let pool = ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()
                    .map_err(|e| {
                        AatError::InvalidConfiguration(format!("failed to build worker pool: {}", e))
                    })?;
                pool.install(|| tasks.into_par_iter().map(|t| self.guarded(&t)).collect())
            }
        };

        let remaining = results.iter().filter(|(_, r)| r.is_none()).count();
        if remaining > 0 {
            warn!("{} task(s) skipped after the stop flag was raised", remaining);
            return Err(AatError::Cancelled { remaining });
        }

        Ok(results
            .into_iter()
            .filter_map(|(element, r)| r.map(|output| (element, output)))
            .collect())
    }
}
