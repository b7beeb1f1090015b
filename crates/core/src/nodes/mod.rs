//! Pipeline nodes

pub mod sepia_node;
pub mod streaming_node;

pub use sepia_node::SepiaNode;
pub use streaming_node::SyncStreamingNode;
