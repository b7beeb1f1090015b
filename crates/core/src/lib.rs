//! rtc-sepia core - in-place sepia tone filter for I420 video frames
//!
//! This crate provides the per-frame filter an RTC application installs on
//! its capture pipeline, and the thin seams around it.
//!
//! # Architecture
//!
//! - `data`: `PlanarImageMut` (borrowed three-plane view with independent
//!   strides), owned `I420Buffer`/`Nv12Buffer`, `VideoFrame` metadata
//! - `filter`: `SepiaFilter` and the `apply_sepia_filter` entry point
//! - `observer`: `FrameObserver` capability and the engine-facing
//!   `VideoFrameObserver` hooks, bridged by `SepiaFrameObserver`
//! - `controller`: `VideoRawDataController`, an owned handle that registers
//!   the observer with an `RtcEngine` and unregisters it on dispose
//! - `nodes`: `SepiaNode` for pipelines carrying packed I420 frames
//! - `config`: TOML/JSON configuration with schema export
//!
//! The capture, encode and transport stages belong to the engine and are not
//! part of this crate.
//!
//! # Example
//!
//! ```
//! use rtc_sepia_core::data::PlanarImageMut;
//! use rtc_sepia_core::filter::apply_sepia_filter;
//!
//! // 2x2 mid-gray frame
//! let (mut y, mut u, mut v) = (vec![100u8; 4], vec![128u8], vec![128u8]);
//! let mut image = PlanarImageMut::new(&mut y, 2, &mut u, 1, &mut v, 1, 2, 2);
//! apply_sepia_filter(&mut image)?;
//!
//! assert!(y.iter().all(|&s| s >= 100));
//! assert!(u[0] < 128 && v[0] > 128);
//! # Ok::<(), rtc_sepia_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod controller;
pub mod data;
pub mod filter;
pub mod nodes;
pub mod observer;

mod error;
pub use error::{Error, GeometryError, Plane, Result};

pub use config::{Config, ObserverConfig};
pub use controller::{RtcEngine, VideoRawDataController};
pub use data::{I420Buffer, PlanarImageMut, VideoFrame};
pub use filter::{apply_sepia_filter, SepiaFilter, SepiaParams};
pub use observer::{FrameObserver, SepiaFrameObserver, VideoFrameObserver};
