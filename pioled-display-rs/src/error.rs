//! Error types for the OLED display driver.

use core::fmt;

use display_interface::DisplayError;

/// Errors that can occur during OLED display operations.
///
/// Bus adapters report failures through [`DisplayError`], so this enum is
/// non-generic. Nothing in the crate retries; every error is returned to the
/// caller as soon as it happens.
#[derive(Debug)]
pub enum OledError {
    /// Bus transfer failure reported by the display interface.
    Transport(DisplayError),
    /// A control pin (reset, data/command or chip select) could not be driven.
    Pin,
    /// Image size does not match the display geometry.
    DimensionMismatch {
        /// Display size as `(width, height)`.
        expected: (u32, u32),
        /// Image size as `(width, height)`.
        actual: (u32, u32),
    },
    /// Argument outside the range the controller accepts.
    InvalidArgument,
    /// Pixel coordinate outside the framebuffer.
    OutOfRange {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
    },
    /// Framebuffer geometry the controller cannot address.
    InvalidGeometry,
    /// Replacement buffer does not have the framebuffer's length.
    BufferLength {
        /// Framebuffer length in bytes.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },
}

impl From<DisplayError> for OledError {
    fn from(e: DisplayError) -> Self {
        match e {
            DisplayError::DCError | DisplayError::CSError | DisplayError::RSError => OledError::Pin,
            other => OledError::Transport(other),
        }
    }
}

impl fmt::Display for OledError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OledError::Transport(e) => write!(f, "display bus error: {:?}", e),
            OledError::Pin => write!(f, "control pin error"),
            OledError::DimensionMismatch { expected, actual } => write!(
                f,
                "image is {}x{} but the display is {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            OledError::InvalidArgument => write!(f, "argument out of range"),
            OledError::OutOfRange { x, y } => write!(f, "pixel ({}, {}) is off screen", x, y),
            OledError::InvalidGeometry => write!(f, "unsupported display geometry"),
            OledError::BufferLength { expected, actual } => {
                write!(f, "buffer is {} bytes, expected {}", actual, expected)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OledError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OledError::Transport(_e) => defmt::write!(f, "Display bus error"),
            OledError::Pin => defmt::write!(f, "Control pin error"),
            OledError::DimensionMismatch { expected, actual } => defmt::write!(
                f,
                "Dimension mismatch: image {}x{}, display {}x{}",
                actual.0,
                actual.1,
                expected.0,
                expected.1
            ),
            OledError::InvalidArgument => defmt::write!(f, "Invalid argument"),
            OledError::OutOfRange { x, y } => defmt::write!(f, "Pixel ({}, {}) out of range", x, y),
            OledError::InvalidGeometry => defmt::write!(f, "Invalid geometry"),
            OledError::BufferLength { expected, actual } => {
                defmt::write!(f, "Buffer length {} (expected {})", actual, expected)
            }
        }
    }
}
