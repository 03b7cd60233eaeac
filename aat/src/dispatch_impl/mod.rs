//! Fan-out of self-contained tensor-element tasks over a worker pool
//!
//! Tasks own every input they read, so workers share no mutable state and
//! the parallel and sequential modes run the identical computation per
//! task. Results are keyed by [`ElementIndex`](crate::fd_impl::ElementIndex)
//! and come back in submission order.

mod dispatcher;
mod task;
#[cfg(test)]
mod tests;

pub use dispatcher::{Dispatcher, ExecutionMode, Task};
pub use task::DoubleDoubleTask;
