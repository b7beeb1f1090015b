//! Controller lifecycle against a simulated engine
//!
//! The mock engine keeps the registered observer in a shared slot and pushes
//! captured frames through it the way a real capture thread would.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;
use rtc_sepia_core::data::{I420Buffer, Nv12Buffer, PixelFormat, Rotation, VideoBuffer};
use rtc_sepia_core::observer::{FramePosition, ProcessMode, VideoSourceType};
use rtc_sepia_core::{
    Config, Error, RtcEngine, SepiaParams, VideoFrame, VideoFrameObserver, VideoRawDataController,
};

type Slot = Arc<Mutex<Option<Arc<dyn VideoFrameObserver>>>>;

/// Engine whose observer slot is shared with the test
struct MockEngine {
    handle: u64,
    slot: Slot,
    history: Arc<Mutex<Vec<bool>>>,
    refuse_unregister: bool,
}

/// Route controller logs to the test harness; `RUST_LOG` selects the level
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl MockEngine {
    fn new(handle: u64) -> (Self, Slot, Arc<Mutex<Vec<bool>>>) {
        let slot: Slot = Arc::new(Mutex::new(None));
        let history = Arc::new(Mutex::new(Vec::new()));
        let engine = Self {
            handle,
            slot: slot.clone(),
            history: history.clone(),
            refuse_unregister: false,
        };
        (engine, slot, history)
    }
}

impl RtcEngine for MockEngine {
    fn register_video_frame_observer(
        &mut self,
        observer: Option<Arc<dyn VideoFrameObserver>>,
    ) -> rtc_sepia_core::Result<()> {
        if let Some(observer) = &observer {
            if observer.video_format_preference() != PixelFormat::I420 {
                return Err(Error::Engine("unsupported pixel format".into()));
            }
        }
        if observer.is_none() && self.refuse_unregister {
            return Err(Error::Engine("engine already released".into()));
        }
        self.history.lock().push(observer.is_some());
        *self.slot.lock() = observer;
        Ok(())
    }

    fn native_handle(&self) -> u64 {
        self.handle
    }
}

/// Deliver a captured frame the way the engine's capture thread would
fn capture(slot: &Slot, frame: &mut VideoFrame) -> Option<bool> {
    let observer = slot.lock().clone()?;
    if !observer
        .observed_frame_position()
        .contains(FramePosition::POST_CAPTURER)
    {
        return None;
    }
    Some(observer.on_capture_video_frame(VideoSourceType::CameraPrimary, frame))
}

fn gray_frame(width: u32, height: u32) -> VideoFrame {
    let mut buffer = I420Buffer::with_strides(width, height, width as usize + 8, 16, 16).unwrap();
    let mut image = buffer.as_planar_mut();
    image.y_plane.fill(100);
    image.u_plane.fill(128);
    image.v_plane.fill(128);
    VideoFrame::new(buffer, Rotation::Deg90, 33_366_666)
}

fn chroma(frame: &VideoFrame) -> (u8, u8) {
    match frame.buffer() {
        VideoBuffer::I420(b) => (b.data_u()[0], b.data_v()[0]),
        other => panic!("Expected I420 buffer, got {:?}", other.format()),
    }
}

#[test]
fn test_registered_observer_tints_captured_frames() {
    init_tracing();
    let (engine, slot, history) = MockEngine::new(0x1000);
    let controller = VideoRawDataController::create(engine, &Config::default()).unwrap();
    assert_eq!(controller.native_handle(), 0x1000);
    assert_eq!(*history.lock(), vec![true]);

    let observer = slot.lock().clone().unwrap();
    assert_eq!(observer.process_mode(), ProcessMode::ReadWrite);

    let mut frame = gray_frame(8, 6);
    assert_eq!(capture(&slot, &mut frame), Some(true));

    let (u, v) = chroma(&frame);
    assert!(u < 128 && v > 128);
    assert_eq!(frame.rotation(), Rotation::Deg90);
    assert_eq!(frame.timestamp_ns(), 33_366_666);
    assert_eq!(controller.observer().stats().processed, 1);

    controller.dispose().unwrap();
}

#[test]
fn test_dispose_unregisters_and_returns_engine() {
    init_tracing();
    let (engine, slot, history) = MockEngine::new(7);
    let controller = VideoRawDataController::create(engine, &Config::default()).unwrap();

    let engine = controller.dispose().unwrap();
    assert_eq!(engine.native_handle(), 7);
    assert_eq!(*history.lock(), vec![true, false]);

    let mut frame = gray_frame(4, 4);
    assert_eq!(capture(&slot, &mut frame), None);
    assert_eq!(chroma(&frame), (128, 128));
}

#[test]
fn test_drop_unregisters() {
    init_tracing();
    let (engine, slot, history) = MockEngine::new(9);
    {
        let _controller = VideoRawDataController::create(engine, &Config::default()).unwrap();
        assert!(slot.lock().is_some());
    }
    assert!(slot.lock().is_none());
    assert_eq!(*history.lock(), vec![true, false]);
}

#[test]
fn test_drop_survives_refused_unregister() {
    init_tracing();
    let (mut engine, slot, history) = MockEngine::new(10);
    engine.refuse_unregister = true;
    {
        let _controller = VideoRawDataController::create(engine, &Config::default()).unwrap();
    }
    // The engine kept the observer; the controller logged and moved on
    assert!(slot.lock().is_some());
    assert_eq!(*history.lock(), vec![true]);

    let mut frame = gray_frame(2, 2);
    assert_eq!(capture(&slot, &mut frame), Some(true));
}

#[test]
fn test_dispose_reports_refused_unregister() {
    init_tracing();
    let (mut engine, _slot, _history) = MockEngine::new(11);
    engine.refuse_unregister = true;
    let controller = VideoRawDataController::create(engine, &Config::default()).unwrap();
    assert!(matches!(controller.dispose(), Err(Error::Engine(_))));
}

#[test]
fn test_update_params_takes_effect_without_reregistering() {
    init_tracing();
    let (engine, slot, history) = MockEngine::new(1);
    let controller = VideoRawDataController::create(engine, &Config::default()).unwrap();

    controller
        .update_params(SepiaParams {
            target_u: 110,
            target_v: 150,
            ..SepiaParams::flat_tint()
        })
        .unwrap();

    let mut frame = gray_frame(2, 2);
    assert_eq!(capture(&slot, &mut frame), Some(true));
    assert_eq!(chroma(&frame), (110, 150));
    assert_eq!(*history.lock(), vec![true]);

    let bad = SepiaParams {
        blend_factor: f32::NAN,
        ..Default::default()
    };
    assert!(matches!(
        controller.update_params(bad),
        Err(Error::InvalidConfig(_))
    ));

    // Previous params still in force
    let mut frame = gray_frame(2, 2);
    capture(&slot, &mut frame);
    assert_eq!(chroma(&frame), (110, 150));
}

#[test]
fn test_nv12_capture_is_delivered_as_i420() {
    init_tracing();
    let (engine, slot, _history) = MockEngine::new(2);
    let mut config = Config::default();
    config.filter = SepiaParams::flat_tint();
    let _controller = VideoRawDataController::create(engine, &config).unwrap();

    // 4x2 frame, UV row padded from 4 to 8 bytes
    let nv12 = Nv12Buffer::new(4, 2, vec![60; 8], 4, vec![128; 8], 8).unwrap();
    let mut frame = VideoFrame::new(nv12, Rotation::Deg0, 5);
    assert_eq!(capture(&slot, &mut frame), Some(true));

    let VideoBuffer::I420(buffer) = frame.buffer() else {
        panic!("Expected I420 buffer");
    };
    assert_eq!(buffer.data_y(), &[60; 8]);
    assert_eq!(buffer.data_u(), &[100, 100]);
    assert_eq!(buffer.data_v(), &[160, 160]);
    assert_eq!(frame.timestamp_ns(), 5);
}

#[test]
fn test_disabled_config_passes_frames_through() {
    init_tracing();
    let (engine, slot, _history) = MockEngine::new(3);
    let config = Config::from_toml_str("[observer]\nenabled = false\n").unwrap();
    let controller = VideoRawDataController::create(engine, &config).unwrap();

    let mut frame = gray_frame(4, 4);
    assert_eq!(capture(&slot, &mut frame), Some(true));
    assert_eq!(chroma(&frame), (128, 128));
    assert_eq!(controller.observer().stats().bypassed, 1);
}

#[test]
fn test_capture_from_many_threads() {
    init_tracing();
    let (engine, slot, _history) = MockEngine::new(4);
    let controller = VideoRawDataController::create(engine, &Config::default()).unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            let slot = &slot;
            s.spawn(move || {
                for _ in 0..25 {
                    let mut frame = gray_frame(16, 16);
                    assert_eq!(capture(slot, &mut frame), Some(true));
                }
            });
        }
    });

    assert_eq!(controller.observer().stats().processed, 100);
}
