//! In-place sepia tone filter for I420 frames
//!
//! Luma gets a small constant lift; each chroma sample moves part of the way
//! toward a fixed warm target (low U, high V). The per-sample remaps depend
//! only on the sample value, so they are precomputed into 256-entry tables
//! when the filter is built and the per-frame work is a table lookup per byte.
//!
//! The transform is cumulative: filtering the same frame twice warms it
//! further. Chroma converges on the targets in a bounded number of passes and
//! never overshoots. [`SepiaParams::flat_tint`] is the idempotent special case
//! that simply overwrites chroma with the targets.

use std::sync::OnceLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::data::PlanarImageMut;
use crate::error::{Plane, Result};
use crate::Error;

/// Default luma lift
pub const DEFAULT_BRIGHTNESS_BIAS: i16 = 6;

/// Default U target (blue-difference pulled below neutral 128)
pub const DEFAULT_TARGET_U: u8 = 100;

/// Default V target (red-difference pushed above neutral 128)
pub const DEFAULT_TARGET_V: u8 = 160;

/// Default fraction of the distance to the target moved per pass
pub const DEFAULT_BLEND_FACTOR: f32 = 0.75;

/// Sepia tint parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SepiaParams {
    /// Added to every luma sample, result clamped to 0..=255 (range -255..=255)
    pub brightness_bias: i16,
    /// Chroma U target
    pub target_u: u8,
    /// Chroma V target
    pub target_v: u8,
    /// Fraction of the distance to the target covered per pass (0.0..=1.0)
    pub blend_factor: f32,
}

impl Default for SepiaParams {
    fn default() -> Self {
        Self {
            brightness_bias: DEFAULT_BRIGHTNESS_BIAS,
            target_u: DEFAULT_TARGET_U,
            target_v: DEFAULT_TARGET_V,
            blend_factor: DEFAULT_BLEND_FACTOR,
        }
    }
}

impl SepiaParams {
    /// Luma untouched, chroma overwritten with the targets
    pub fn flat_tint() -> Self {
        Self {
            brightness_bias: 0,
            blend_factor: 1.0,
            ..Self::default()
        }
    }

    /// Reject parameters outside their documented ranges
    pub fn validate(&self) -> Result<()> {
        if !(-255..=255).contains(&self.brightness_bias) {
            return Err(Error::InvalidConfig(format!(
                "brightness_bias must be within -255..=255, got {}",
                self.brightness_bias
            )));
        }
        if !self.blend_factor.is_finite() || !(0.0..=1.0).contains(&self.blend_factor) {
            return Err(Error::InvalidConfig(format!(
                "blend_factor must be within 0.0..=1.0, got {}",
                self.blend_factor
            )));
        }
        Ok(())
    }
}

/// Sepia filter with precomputed per-plane lookup tables
///
/// Immutable after construction; share one instance across threads.
#[derive(Debug, Clone)]
pub struct SepiaFilter {
    params: SepiaParams,
    luma: [u8; 256],
    chroma_u: [u8; 256],
    chroma_v: [u8; 256],
}

impl Default for SepiaFilter {
    fn default() -> Self {
        Self::build(SepiaParams::default())
    }
}

impl SepiaFilter {
    /// Create a filter, validating `params`
    pub fn new(params: SepiaParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::build(params))
    }

    fn build(params: SepiaParams) -> Self {
        let mut luma = [0u8; 256];
        let mut chroma_u = [0u8; 256];
        let mut chroma_v = [0u8; 256];
        for sample in 0..=255u8 {
            let i = sample as usize;
            luma[i] = (sample as i16 + params.brightness_bias).clamp(0, 255) as u8;
            chroma_u[i] = blend_toward(sample, params.target_u, params.blend_factor);
            chroma_v[i] = blend_toward(sample, params.target_v, params.blend_factor);
        }
        Self {
            params,
            luma,
            chroma_u,
            chroma_v,
        }
    }

    /// Parameters this filter was built from
    pub fn params(&self) -> &SepiaParams {
        &self.params
    }

    /// Filter `image` in place.
    ///
    /// Geometry is validated before the first write, so a rejected frame is
    /// left untouched. Stride padding is never read or written.
    pub fn apply(&self, image: &mut PlanarImageMut<'_>) -> Result<()> {
        image.check_geometry()?;

        for (plane, table) in [
            (Plane::Y, &self.luma),
            (Plane::U, &self.chroma_u),
            (Plane::V, &self.chroma_v),
        ] {
            for row in image.rows_mut(plane) {
                for sample in row.iter_mut() {
                    *sample = table[*sample as usize];
                }
            }
        }

        tracing::trace!(
            "Sepia applied to {}x{} frame (strides y={}, u={}, v={})",
            image.width,
            image.height,
            image.y_stride,
            image.u_stride,
            image.v_stride
        );
        Ok(())
    }
}

/// One blend step from `sample` toward `target`.
///
/// Never overshoots, and moves at least one code value whenever
/// `blend > 0` and the sample is not already on target.
fn blend_toward(sample: u8, target: u8, blend: f32) -> u8 {
    let diff = target as i16 - sample as i16;
    if diff == 0 {
        return sample;
    }
    let mut step = (diff as f32 * blend).round() as i16;
    if step == 0 && blend > 0.0 {
        step = diff.signum();
    }
    (sample as i16 + step).clamp(0, 255) as u8
}

/// Filter `image` in place with the default [`SepiaParams`].
pub fn apply_sepia_filter(image: &mut PlanarImageMut<'_>) -> Result<()> {
    static DEFAULT_FILTER: OnceLock<SepiaFilter> = OnceLock::new();
    DEFAULT_FILTER.get_or_init(SepiaFilter::default).apply(image)
}
