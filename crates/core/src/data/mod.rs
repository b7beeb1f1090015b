//! Frame data types
//!
//! - `planar`: borrowed I420 view the filter operates on
//! - `video`: owned buffers, frame metadata, pixel formats
//! - `RuntimeData`: payload passed between pipeline nodes

pub mod planar;
pub mod video;

pub use planar::{chroma_len, PlanarImageMut};
pub use video::{I420Buffer, Nv12Buffer, PixelFormat, Rotation, VideoBuffer, VideoFrame};

/// Data flowing through a streaming node
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeData {
    /// Raw, tightly packed video frame
    Video {
        /// Pixel bytes laid out per `format` (Y‖U‖V for I420)
        pixel_data: Vec<u8>,
        /// Frame width in pixels
        width: u32,
        /// Frame height in pixels
        height: u32,
        /// Pixel layout
        format: PixelFormat,
        /// Sequence number within the stream
        frame_number: u64,
        /// Capture timestamp in microseconds
        timestamp_us: u64,
    },
    /// Opaque bytes
    Binary(Vec<u8>),
}

impl RuntimeData {
    /// Get the type of this data
    pub fn data_type(&self) -> &str {
        match self {
            RuntimeData::Video { .. } => "video",
            RuntimeData::Binary(_) => "binary",
        }
    }
}
