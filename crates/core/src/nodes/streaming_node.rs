//! Streaming node trait
//!
//! Nodes take one `RuntimeData` and produce one `RuntimeData` synchronously.

use crate::data::RuntimeData;
use crate::Error;

/// Synchronous streaming node trait
///
/// Implement this for nodes that transform data without blocking.
pub trait SyncStreamingNode: Send + Sync {
    /// Get the node type name
    fn node_type(&self) -> &str;

    /// Process single-input data
    fn process(&self, data: RuntimeData) -> Result<RuntimeData, Error>;

    /// Process a batch in order, stopping at the first failure
    fn process_batch(&self, batch: Vec<RuntimeData>) -> Result<Vec<RuntimeData>, Error> {
        batch.into_iter().map(|data| self.process(data)).collect()
    }
}
