//! Frame observer capabilities
//!
//! Two layers:
//! - [`FrameObserver`]: the single-method capability the filter exposes to a
//!   frame-delivery mechanism, `on_frame(PlanarImageMut) -> bool`.
//! - [`VideoFrameObserver`]: the hook set an RTC engine calls at each point of
//!   its video pipeline, plus the preferences it queries once at registration
//!   (pixel format, observed positions, processing mode).
//!
//! [`SepiaFrameObserver`] bridges the two: it takes captured frames, brings
//! them into I420, runs a [`FrameObserver`] over the planes and hands the
//! buffer back with the original rotation and timestamp.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bitflags::bitflags;
use parking_lot::RwLock;

use crate::config::ObserverConfig;
use crate::data::{PixelFormat, PlanarImageMut, VideoFrame};
use crate::filter::{SepiaFilter, SepiaParams};
use crate::Result;

/// Single-frame processing capability
pub trait FrameObserver: Send + Sync {
    /// Process one frame in place. Returns `false` if the frame should be dropped.
    fn on_frame(&self, image: &mut PlanarImageMut<'_>) -> bool;
}

impl FrameObserver for SepiaFilter {
    fn on_frame(&self, image: &mut PlanarImageMut<'_>) -> bool {
        match self.apply(image) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Dropping frame: {}", e);
                false
            }
        }
    }
}

bitflags! {
    /// Points in the engine's video pipeline an observer wants to see
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FramePosition: u32 {
        /// Right after capture, before any local processing
        const POST_CAPTURER = 0b0000_0001;
        /// Just before a remote frame is rendered
        const PRE_RENDERER = 0b0000_0010;
        /// Just before a local frame is encoded
        const PRE_ENCODER = 0b0000_0100;
    }
}

/// Whether an observer may modify the frames it is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessMode {
    /// Frames are inspected only; modifications are discarded
    #[default]
    ReadOnly,
    /// Frame modifications are fed back into the pipeline
    ReadWrite,
}

/// Where a captured frame came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSourceType {
    /// Primary camera
    CameraPrimary,
    /// Secondary camera
    CameraSecondary,
    /// Screen capture
    Screen,
    /// Custom pushed source
    Custom,
}

/// Engine-facing video frame hooks
///
/// Hooks return `true` to pass the frame on, `false` to drop it.
pub trait VideoFrameObserver: Send + Sync {
    /// A local frame has been captured
    fn on_capture_video_frame(&self, source: VideoSourceType, frame: &mut VideoFrame) -> bool;

    /// A local frame is about to be encoded
    fn on_pre_encode_video_frame(&self, _source: VideoSourceType, _frame: &mut VideoFrame) -> bool {
        false
    }

    /// A media player produced a frame
    fn on_media_player_video_frame(&self, _frame: &mut VideoFrame, _media_player_id: i32) -> bool {
        false
    }

    /// A remote frame is about to be rendered
    fn on_render_video_frame(&self, _channel_id: &str, _uid: u32, _frame: &mut VideoFrame) -> bool {
        false
    }

    /// Whether modifications are written back
    fn process_mode(&self) -> ProcessMode {
        ProcessMode::ReadOnly
    }

    /// Pixel format the engine should deliver
    fn video_format_preference(&self) -> PixelFormat {
        PixelFormat::I420
    }

    /// Whether the engine should apply rotation before delivery
    fn rotation_applied(&self) -> bool {
        false
    }

    /// Whether the engine should apply mirroring before delivery
    fn mirror_applied(&self) -> bool {
        false
    }

    /// Pipeline points this observer wants to see
    fn observed_frame_position(&self) -> FramePosition {
        FramePosition::POST_CAPTURER
    }
}

/// Frame counters for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObserverStats {
    /// Frames filtered and passed on
    pub processed: u64,
    /// Frames rejected by the filter
    pub dropped: u64,
    /// Frames passed on untouched because filtering is disabled
    pub bypassed: u64,
}

/// Capture-position observer applying a sepia filter
pub struct SepiaFrameObserver {
    filter: RwLock<Arc<dyn FrameObserver>>,
    config: ObserverConfig,
    processed: AtomicU64,
    dropped: AtomicU64,
    bypassed: AtomicU64,
}

impl SepiaFrameObserver {
    /// Observer running a sepia filter built from `params`
    pub fn new(params: SepiaParams, config: ObserverConfig) -> Result<Self> {
        let filter = SepiaFilter::new(params)?;
        Ok(Self::with_observer(Arc::new(filter), config))
    }

    /// Observer running an arbitrary [`FrameObserver`] over each captured frame
    pub fn with_observer(inner: Arc<dyn FrameObserver>, config: ObserverConfig) -> Self {
        Self {
            filter: RwLock::new(inner),
            config,
            processed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            bypassed: AtomicU64::new(0),
        }
    }

    /// Swap in new filter parameters; frames already in flight finish with the old ones
    pub fn set_params(&self, params: SepiaParams) -> Result<()> {
        let filter = SepiaFilter::new(params)?;
        *self.filter.write() = Arc::new(filter);
        tracing::info!(
            "Sepia params updated: bias={}, target=({}, {}), blend={}",
            params.brightness_bias,
            params.target_u,
            params.target_v,
            params.blend_factor
        );
        Ok(())
    }

    /// Snapshot of the frame counters
    pub fn stats(&self) -> ObserverStats {
        ObserverStats {
            processed: self.processed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            bypassed: self.bypassed.load(Ordering::Relaxed),
        }
    }

    fn record(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
        if self.config.stats_interval > 0 {
            let stats = self.stats();
            let total = stats.processed + stats.dropped + stats.bypassed;
            if total % self.config.stats_interval == 0 {
                tracing::debug!(
                    "Sepia observer: {} processed, {} dropped, {} bypassed",
                    stats.processed,
                    stats.dropped,
                    stats.bypassed
                );
            }
        }
    }
}

impl VideoFrameObserver for SepiaFrameObserver {
    fn on_capture_video_frame(&self, _source: VideoSourceType, frame: &mut VideoFrame) -> bool {
        if !self.config.enabled {
            self.record(&self.bypassed);
            return true;
        }

        let mut i420 = frame.take_buffer().into_i420();
        // Clone the Arc so a concurrent set_params never waits on a frame
        let inner = self.filter.read().clone();
        let keep = inner.on_frame(&mut i420.as_planar_mut());
        frame.replace_buffer(i420);

        if keep {
            self.record(&self.processed);
        } else {
            self.record(&self.dropped);
        }
        keep
    }

    fn process_mode(&self) -> ProcessMode {
        ProcessMode::ReadWrite
    }

    fn video_format_preference(&self) -> PixelFormat {
        PixelFormat::I420
    }

    fn observed_frame_position(&self) -> FramePosition {
        FramePosition::POST_CAPTURER
    }
}
