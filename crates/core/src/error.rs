//! Error types for rtc-sepia-core

use thiserror::Error;

/// Result type alias for rtc-sepia-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for rtc-sepia-core
#[derive(Debug, Error)]
pub enum Error {
    /// Frame dimensions, strides or plane sizes violate the I420 layout
    #[error("Invalid frame geometry: {0}")]
    InvalidFrameGeometry(#[from] GeometryError),

    /// Filter or observer configuration out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Data validation error
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// General execution error
    #[error("Execution error: {0}")]
    Execution(String),

    /// The RTC engine refused an observer registration
    #[error("Engine error: {0}")]
    Engine(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the geometry violation if this is an `InvalidFrameGeometry` error.
    pub fn geometry(&self) -> Option<&GeometryError> {
        match self {
            Error::InvalidFrameGeometry(e) => Some(e),
            _ => None,
        }
    }
}

/// Plane of a planar YUV frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    /// Luma
    Y,
    /// Blue-difference chroma
    U,
    /// Red-difference chroma
    V,
}

impl Plane {
    /// Short name for logging/display
    pub fn as_str(&self) -> &'static str {
        match self {
            Plane::Y => "Y",
            Plane::U => "U",
            Plane::V => "V",
        }
    }
}

impl std::fmt::Display for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The precondition a frame failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Width or height is zero
    #[error("frame dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
    },

    /// Row stride shorter than the logical row
    #[error("{plane} stride {stride} is smaller than the row width {required}")]
    StrideTooSmall {
        /// Offending plane
        plane: Plane,
        /// Declared stride
        stride: usize,
        /// Minimum stride for the declared width
        required: usize,
    },

    /// Plane buffer shorter than `stride * rows`
    #[error("{plane} plane holds {len} bytes but stride x rows needs {required}")]
    PlaneTooSmall {
        /// Offending plane
        plane: Plane,
        /// Buffer length
        len: usize,
        /// Required length (`usize::MAX` if `stride * rows` overflows)
        required: usize,
    },
}
