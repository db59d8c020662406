//! The messages that travel between the coordinator and its row
//! workers.  The protocol is deliberately tiny: rows go out one at a
//! time, finished rows come back tagged with the sender, and a
//! terminate order closes each worker down once the bag of rows is
//! empty.

/// An order from the coordinator to a single worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToWorker {
    /// Compute every column of one grid row.
    Work {
        /// Index of the row to compute.
        row: usize,
    },
    /// No rows are left; exit the receive loop.
    Terminate,
}

/// One finished row, sent back to the coordinator.
///
/// The worker id rides along so the coordinator knows which worker
/// just went idle and can hand the next row straight back to it.  All
/// workers share a single result channel, so the coordinator simply
/// receives whatever finishes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowResult {
    /// Id of the worker that computed this row.
    pub worker: usize,
    /// Index of the row the counts belong to.
    pub row: usize,
    /// Iteration counts, one per grid column.
    pub counts: Vec<u32>,
}
