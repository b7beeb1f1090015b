//! Sepia node for I420 video streams
//!
//! Applies the sepia filter to packed I420 frames flowing through a pipeline.

use crate::data::{I420Buffer, RuntimeData};
use crate::filter::{SepiaFilter, SepiaParams};
use crate::nodes::streaming_node::SyncStreamingNode;
use crate::Error;

/// Sepia filter node
///
/// Accepts `RuntimeData::Video` in I420/YUV420P format and returns the
/// filtered frame with every other field unchanged.
pub struct SepiaNode {
    filter: SepiaFilter,
}

impl SepiaNode {
    /// Create a new sepia node
    pub fn new(params: SepiaParams) -> Result<Self, Error> {
        Ok(Self {
            filter: SepiaFilter::new(params)?,
        })
    }

    /// Create a node from JSON params (missing fields take defaults)
    pub fn from_json(params: serde_json::Value) -> Result<Self, Error> {
        let params: SepiaParams = serde_json::from_value(params)?;
        Self::new(params)
    }
}

impl Default for SepiaNode {
    fn default() -> Self {
        Self {
            filter: SepiaFilter::default(),
        }
    }
}

impl SyncStreamingNode for SepiaNode {
    fn node_type(&self) -> &str {
        "SepiaFilter"
    }

    fn process(&self, data: RuntimeData) -> Result<RuntimeData, Error> {
        match data {
            RuntimeData::Video {
                pixel_data,
                width,
                height,
                format,
                frame_number,
                timestamp_us,
            } => {
                if !format.is_i420() {
                    return Err(Error::Execution(format!(
                        "SepiaFilter only supports I420/YUV420P, got format={:?}",
                        format
                    )));
                }

                let mut buffer = I420Buffer::from_packed(&pixel_data, width, height)?;
                self.filter.apply(&mut buffer.as_planar_mut())?;

                tracing::trace!("SepiaFilter processed frame {}", frame_number);

                Ok(RuntimeData::Video {
                    pixel_data: buffer.to_packed(),
                    width,
                    height,
                    format,
                    frame_number,
                    timestamp_us,
                })
            }
            other => Err(Error::Execution(format!(
                "SepiaFilter expects Video input, got {}",
                other.data_type()
            ))),
        }
    }
}
