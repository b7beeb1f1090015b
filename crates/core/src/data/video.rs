//! Video frame data types
//!
//! Owned frame buffers as an RTC engine delivers them to frame observers,
//! plus the metadata (rotation, capture timestamp) that must survive a
//! buffer being replaced in place.

use serde::{Deserialize, Serialize};

use super::planar::{chroma_len, PlanarImageMut};
use crate::error::{Error, Result};

/// Pixel format for video frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PixelFormat {
    /// Unknown/unspecified format
    Unspecified = 0,

    /// YUV 4:2:0 planar
    /// Layout: Y plane (width*height), U plane, V plane (ceil(width/2) * ceil(height/2) each)
    Yuv420p = 1,

    /// I420 (identical to YUV420P, the name RTC engines use)
    I420 = 2,

    /// NV12 (semi-planar, Y plane + interleaved UV)
    /// Layout: Y plane (width*height), UV plane (2*ceil(width/2) * ceil(height/2))
    NV12 = 3,

    /// RGB24 (packed 24-bit RGB)
    Rgb24 = 4,

    /// RGBA32 (packed 32-bit RGBA with alpha)
    Rgba32 = 5,

    /// Encoded bitstream (not raw pixels)
    Encoded = 255,
}

impl PixelFormat {
    /// Calculate expected tightly-packed buffer size in bytes
    pub fn buffer_size(&self, width: u32, height: u32) -> usize {
        let luma = width as usize * height as usize;
        match self {
            PixelFormat::Yuv420p | PixelFormat::I420 | PixelFormat::NV12 => {
                luma + 2 * chroma_len(width) * chroma_len(height)
            }
            PixelFormat::Rgb24 => luma * 3,
            PixelFormat::Rgba32 => luma * 4,
            PixelFormat::Encoded | PixelFormat::Unspecified => 0, // Variable or unknown
        }
    }

    /// True for the planar 4:2:0 layouts the sepia filter runs on directly
    pub fn is_i420(&self) -> bool {
        matches!(self, PixelFormat::Yuv420p | PixelFormat::I420)
    }
}

/// Bytes spanned by `rows` rows of `stride` bytes
fn plane_len(stride: usize, rows: usize) -> Result<usize> {
    stride.checked_mul(rows).ok_or_else(|| {
        Error::InvalidData(format!(
            "plane size overflows: stride {} x {} rows",
            stride, rows
        ))
    })
}

/// Owned I420 frame with independently strided planes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I420Buffer {
    width: u32,
    height: u32,
    data_y: Vec<u8>,
    data_u: Vec<u8>,
    data_v: Vec<u8>,
    stride_y: usize,
    stride_u: usize,
    stride_v: usize,
}

impl I420Buffer {
    /// Allocate a tightly packed, zeroed frame
    pub fn new(width: u32, height: u32) -> Self {
        let cw = chroma_len(width);
        let ch = chroma_len(height);
        Self {
            width,
            height,
            data_y: vec![0; width as usize * height as usize],
            data_u: vec![0; cw * ch],
            data_v: vec![0; cw * ch],
            stride_y: width as usize,
            stride_u: cw,
            stride_v: cw,
        }
    }

    /// Allocate a zeroed frame with explicit (possibly padded) strides.
    /// Fails with `InvalidData` if a plane size overflows `usize`.
    pub fn with_strides(
        width: u32,
        height: u32,
        stride_y: usize,
        stride_u: usize,
        stride_v: usize,
    ) -> Result<Self> {
        let ch = chroma_len(height);
        let y_len = plane_len(stride_y, height as usize)?;
        let u_len = plane_len(stride_u, ch)?;
        let v_len = plane_len(stride_v, ch)?;
        Ok(Self {
            width,
            height,
            data_y: vec![0; y_len],
            data_u: vec![0; u_len],
            data_v: vec![0; v_len],
            stride_y,
            stride_u,
            stride_v,
        })
    }

    /// Adopt planes produced elsewhere. Geometry is checked when the frame is filtered.
    #[allow(clippy::too_many_arguments)]
    pub fn from_planes(
        width: u32,
        height: u32,
        data_y: Vec<u8>,
        stride_y: usize,
        data_u: Vec<u8>,
        stride_u: usize,
        data_v: Vec<u8>,
        stride_v: usize,
    ) -> Self {
        Self {
            width,
            height,
            data_y,
            data_u,
            data_v,
            stride_y,
            stride_u,
            stride_v,
        }
    }

    /// Split a packed Y‖U‖V byte buffer into a tightly strided frame
    pub fn from_packed(data: &[u8], width: u32, height: u32) -> Result<Self> {
        let expected = PixelFormat::I420.buffer_size(width, height);
        if data.len() != expected {
            return Err(Error::InvalidData(format!(
                "I420 data size mismatch: expected {}, got {}",
                expected,
                data.len()
            )));
        }

        let y_size = width as usize * height as usize;
        let uv_size = chroma_len(width) * chroma_len(height);
        let (y_plane, uv_planes) = data.split_at(y_size);
        let (u_plane, v_plane) = uv_planes.split_at(uv_size);

        let cw = chroma_len(width);
        Ok(Self::from_planes(
            width,
            height,
            y_plane.to_vec(),
            width as usize,
            u_plane.to_vec(),
            cw,
            v_plane.to_vec(),
            cw,
        ))
    }

    /// Concatenate the logical rows of Y, U and V, dropping stride padding
    pub fn to_packed(&self) -> Vec<u8> {
        let cw = chroma_len(self.width);
        let ch = chroma_len(self.height);
        let mut packed = Vec::with_capacity(PixelFormat::I420.buffer_size(self.width, self.height));
        let planes = [
            (&self.data_y, self.stride_y, self.width as usize, self.height as usize),
            (&self.data_u, self.stride_u, cw, ch),
            (&self.data_v, self.stride_v, cw, ch),
        ];
        for (data, stride, row_width, rows) in planes {
            for row in data.chunks(stride.max(1)).take(rows) {
                packed.extend_from_slice(&row[..row_width.min(row.len())]);
            }
        }
        packed
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luma plane
    pub fn data_y(&self) -> &[u8] {
        &self.data_y
    }

    /// U plane
    pub fn data_u(&self) -> &[u8] {
        &self.data_u
    }

    /// V plane
    pub fn data_v(&self) -> &[u8] {
        &self.data_v
    }

    /// Luma stride
    pub fn stride_y(&self) -> usize {
        self.stride_y
    }

    /// U stride
    pub fn stride_u(&self) -> usize {
        self.stride_u
    }

    /// V stride
    pub fn stride_v(&self) -> usize {
        self.stride_v
    }

    /// Borrow all three planes as a filterable view
    pub fn as_planar_mut(&mut self) -> PlanarImageMut<'_> {
        PlanarImageMut::new(
            &mut self.data_y,
            self.stride_y,
            &mut self.data_u,
            self.stride_u,
            &mut self.data_v,
            self.stride_v,
            self.width,
            self.height,
        )
    }
}

/// Owned NV12 frame (Y plane + interleaved UV plane)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nv12Buffer {
    width: u32,
    height: u32,
    data_y: Vec<u8>,
    data_uv: Vec<u8>,
    stride_y: usize,
    stride_uv: usize,
}

impl Nv12Buffer {
    /// Adopt an NV12 frame. `stride_uv` counts bytes, i.e. two per chroma sample.
    pub fn new(
        width: u32,
        height: u32,
        data_y: Vec<u8>,
        stride_y: usize,
        data_uv: Vec<u8>,
        stride_uv: usize,
    ) -> Result<Self> {
        let ch = chroma_len(height);
        let uv_row = 2 * chroma_len(width);
        if width == 0 || height == 0 {
            return Err(Error::InvalidData(format!(
                "NV12 dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if stride_y < width as usize || stride_uv < uv_row {
            return Err(Error::InvalidData(format!(
                "NV12 strides too small: y={} (need {}), uv={} (need {})",
                stride_y, width, stride_uv, uv_row
            )));
        }
        let y_len = plane_len(stride_y, height as usize)?;
        let uv_len = plane_len(stride_uv, ch)?;
        if data_y.len() < y_len || data_uv.len() < uv_len {
            return Err(Error::InvalidData(format!(
                "NV12 planes too small: y={} (need {}), uv={} (need {})",
                data_y.len(),
                y_len,
                data_uv.len(),
                uv_len
            )));
        }
        Ok(Self {
            width,
            height,
            data_y,
            data_uv,
            stride_y,
            stride_uv,
        })
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Deinterleave into a tightly packed I420 frame
    pub fn to_i420(&self) -> I420Buffer {
        let cw = chroma_len(self.width);
        let ch = chroma_len(self.height);
        let w = self.width as usize;

        let mut out = I420Buffer::new(self.width, self.height);
        for (dst, src) in out
            .data_y
            .chunks_mut(w)
            .zip(self.data_y.chunks(self.stride_y))
        {
            dst.copy_from_slice(&src[..w]);
        }

        let rows = self.data_uv.chunks(self.stride_uv).take(ch);
        for (r, src) in rows.enumerate() {
            let u_row = &mut out.data_u[r * cw..(r + 1) * cw];
            let v_row = &mut out.data_v[r * cw..(r + 1) * cw];
            for (c, pair) in src[..2 * cw].chunks_exact(2).enumerate() {
                u_row[c] = pair[0];
                v_row[c] = pair[1];
            }
        }
        out
    }
}

/// Frame buffer in whichever layout the capture stage produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoBuffer {
    /// Planar 4:2:0
    I420(I420Buffer),
    /// Semi-planar 4:2:0
    Nv12(Nv12Buffer),
}

impl VideoBuffer {
    /// Pixel format of the held buffer
    pub fn format(&self) -> PixelFormat {
        match self {
            VideoBuffer::I420(_) => PixelFormat::I420,
            VideoBuffer::Nv12(_) => PixelFormat::NV12,
        }
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        match self {
            VideoBuffer::I420(b) => b.width(),
            VideoBuffer::Nv12(b) => b.width(),
        }
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        match self {
            VideoBuffer::I420(b) => b.height(),
            VideoBuffer::Nv12(b) => b.height(),
        }
    }

    /// Convert to I420. An I420 buffer is returned as-is without copying.
    pub fn into_i420(self) -> I420Buffer {
        match self {
            VideoBuffer::I420(b) => b,
            VideoBuffer::Nv12(b) => b.to_i420(),
        }
    }
}

impl From<I420Buffer> for VideoBuffer {
    fn from(buffer: I420Buffer) -> Self {
        VideoBuffer::I420(buffer)
    }
}

impl From<Nv12Buffer> for VideoBuffer {
    fn from(buffer: Nv12Buffer) -> Self {
        VideoBuffer::Nv12(buffer)
    }
}

/// Clockwise rotation to apply when rendering a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// Upright
    #[default]
    Deg0,
    /// Quarter turn
    Deg90,
    /// Half turn
    Deg180,
    /// Three-quarter turn
    Deg270,
}

impl Rotation {
    /// Map degrees to a rotation; anything not a multiple of 90 is rejected
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Rotation in degrees
    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// A captured frame as delivered to observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    buffer: VideoBuffer,
    rotation: Rotation,
    timestamp_ns: i64,
}

impl VideoFrame {
    /// Create a new video frame
    pub fn new(buffer: impl Into<VideoBuffer>, rotation: Rotation, timestamp_ns: i64) -> Self {
        Self {
            buffer: buffer.into(),
            rotation,
            timestamp_ns,
        }
    }

    /// Current buffer
    pub fn buffer(&self) -> &VideoBuffer {
        &self.buffer
    }

    /// Rendering rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Capture timestamp in nanoseconds
    pub fn timestamp_ns(&self) -> i64 {
        self.timestamp_ns
    }

    /// Swap in a new buffer, keeping rotation and timestamp. Returns the old buffer.
    pub fn replace_buffer(&mut self, buffer: impl Into<VideoBuffer>) -> VideoBuffer {
        std::mem::replace(&mut self.buffer, buffer.into())
    }

    /// Take the buffer out, leaving an empty 0x0 I420 placeholder until it is replaced
    pub(crate) fn take_buffer(&mut self) -> VideoBuffer {
        self.replace_buffer(I420Buffer::new(0, 0))
    }
}
