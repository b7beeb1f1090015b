//! Borrowed planar YUV 4:2:0 frame view
//!
//! `PlanarImageMut` is what upstream capture/conversion hands to the filter:
//! three separate planes, each with its own row stride. Strides may exceed the
//! logical row width; the padding between the two is never touched.

use crate::error::{GeometryError, Plane};

/// Number of chroma samples covering `luma` luma samples (ceiling division)
#[inline]
pub fn chroma_len(luma: u32) -> usize {
    (luma as usize).div_ceil(2)
}

/// Mutable view over the three planes of one I420 frame
///
/// The planes are distinct `&mut` borrows, so they can never overlap.
#[derive(Debug)]
pub struct PlanarImageMut<'a> {
    /// Luma plane, one sample per pixel
    pub y_plane: &'a mut [u8],
    /// Bytes between the starts of consecutive luma rows
    pub y_stride: usize,
    /// Blue-difference chroma plane, one sample per 2x2 block
    pub u_plane: &'a mut [u8],
    /// Bytes between the starts of consecutive U rows
    pub u_stride: usize,
    /// Red-difference chroma plane, one sample per 2x2 block
    pub v_plane: &'a mut [u8],
    /// Bytes between the starts of consecutive V rows
    pub v_stride: usize,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl<'a> PlanarImageMut<'a> {
    /// Wrap caller-owned planes. Geometry is not checked until the view is used.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        y_plane: &'a mut [u8],
        y_stride: usize,
        u_plane: &'a mut [u8],
        u_stride: usize,
        v_plane: &'a mut [u8],
        v_stride: usize,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            y_plane,
            y_stride,
            u_plane,
            u_stride,
            v_plane,
            v_stride,
            width,
            height,
        }
    }

    /// Logical chroma row width
    pub fn chroma_width(&self) -> usize {
        chroma_len(self.width)
    }

    /// Number of chroma rows
    pub fn chroma_height(&self) -> usize {
        chroma_len(self.height)
    }

    /// Logical row width of `plane`
    pub fn row_width(&self, plane: Plane) -> usize {
        match plane {
            Plane::Y => self.width as usize,
            Plane::U | Plane::V => self.chroma_width(),
        }
    }

    /// Number of rows in `plane`
    pub fn rows(&self, plane: Plane) -> usize {
        match plane {
            Plane::Y => self.height as usize,
            Plane::U | Plane::V => self.chroma_height(),
        }
    }

    /// Declared stride of `plane`
    pub fn stride(&self, plane: Plane) -> usize {
        match plane {
            Plane::Y => self.y_stride,
            Plane::U => self.u_stride,
            Plane::V => self.v_stride,
        }
    }

    fn plane_len(&self, plane: Plane) -> usize {
        match plane {
            Plane::Y => self.y_plane.len(),
            Plane::U => self.u_plane.len(),
            Plane::V => self.v_plane.len(),
        }
    }

    /// Check every layout precondition, reporting the first one violated.
    ///
    /// Order: dimensions, then strides (Y, U, V), then buffer sizes (Y, U, V).
    pub fn check_geometry(&self) -> Result<(), GeometryError> {
        if self.width == 0 || self.height == 0 {
            return Err(GeometryError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }

        for plane in [Plane::Y, Plane::U, Plane::V] {
            let stride = self.stride(plane);
            let required = self.row_width(plane);
            if stride < required {
                return Err(GeometryError::StrideTooSmall {
                    plane,
                    stride,
                    required,
                });
            }
        }

        for plane in [Plane::Y, Plane::U, Plane::V] {
            let len = self.plane_len(plane);
            let required = self
                .stride(plane)
                .checked_mul(self.rows(plane))
                .unwrap_or(usize::MAX);
            if len < required {
                return Err(GeometryError::PlaneTooSmall {
                    plane,
                    len,
                    required,
                });
            }
        }

        Ok(())
    }

    /// Logical rows of `plane`, padding excluded.
    ///
    /// Only meaningful once `check_geometry` has passed; on a malformed view
    /// the iterator yields short or missing rows instead of panicking.
    pub(crate) fn rows_mut(&mut self, plane: Plane) -> impl Iterator<Item = &mut [u8]> + '_ {
        let stride = self.stride(plane).max(1);
        let rows = self.rows(plane);
        let width = self.row_width(plane);
        let data: &mut [u8] = match plane {
            Plane::Y => &mut *self.y_plane,
            Plane::U => &mut *self.u_plane,
            Plane::V => &mut *self.v_plane,
        };
        data.chunks_mut(stride).take(rows).map(move |row| {
            let end = width.min(row.len());
            &mut row[..end]
        })
    }
}
