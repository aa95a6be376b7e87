//! Page-addressed, bit-packed framebuffer.
//!
//! The SSD1306 stores eight vertically adjacent pixels per byte. Pixel
//! `(x, y)` lives in byte `x + (y / page_size) * width` at bit
//! `y % page_size`, LSB at the top of the page.
//!
//! ```text
//!            x=0   x=1   x=2  ...  x=width-1
//! page 0   [ b0 ][ b1 ][ b2 ] ... [ bW-1 ]     rows 0..=7
//! page 1   [ bW ][ ...                   ]     rows 8..=15
//! ...
//! ```

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use heapless::Vec;

use crate::error::OledError;

/// Largest buffer the controller can address: 128 columns × 8 pages.
pub const MAX_BUFFER_LEN: usize = 1024;

/// Widest panel the controller can address.
pub const MAX_WIDTH: u32 = 128;

/// Tallest panel the controller can multiplex.
pub const MAX_HEIGHT: u32 = 64;

/// In-memory copy of the controller's display RAM.
///
/// Storage is a fixed-capacity [`heapless::Vec`], so no allocator is needed.
/// The buffer length always equals `width * ceil(height / page_size)`.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    page_size: u32,
    buffer: Vec<u8, MAX_BUFFER_LEN>,
}

impl Framebuffer {
    /// Allocate a zero-filled buffer for a `width`×`height` panel.
    ///
    /// # Errors
    ///
    /// [`OledError::InvalidGeometry`] if a dimension is zero, `width` exceeds
    /// [`MAX_WIDTH`], `height` exceeds [`MAX_HEIGHT`], `page_size` is not in
    /// `1..=8`, or `height` is not a whole number of pages.
    pub fn new(width: u32, height: u32, page_size: u32) -> Result<Self, OledError> {
        if width == 0
            || width > MAX_WIDTH
            || height == 0
            || height > MAX_HEIGHT
            || !(1..=8).contains(&page_size)
            || height % page_size != 0
        {
            return Err(OledError::InvalidGeometry);
        }

        let len = (width * (height / page_size)) as usize;
        let mut buffer = Vec::new();
        buffer
            .resize(len, 0)
            .map_err(|_| OledError::InvalidGeometry)?;

        Ok(Self {
            width,
            height,
            page_size,
            buffer,
        })
    }

    /// Buffer length in bytes.
    ///
    /// Not to be confused with [`OriginDimensions::size`], which gives the
    /// panel size in pixels.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pages (bands of `page_size` rows).
    pub fn page_count(&self) -> u32 {
        self.height / self.page_size
    }

    /// Zero every byte.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Turn the pixel at `(x, y)` on or off, leaving every other bit alone.
    ///
    /// # Errors
    ///
    /// [`OledError::OutOfRange`] if `(x, y)` is outside the panel.
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) -> Result<(), OledError> {
        let (idx, bit) = self
            .locate(x, y)
            .ok_or(OledError::OutOfRange { x, y })?;

        if on {
            self.buffer[idx] |= 1 << bit;
        } else {
            self.buffer[idx] &= !(1 << bit);
        }
        Ok(())
    }

    /// Read back the pixel at `(x, y)`. `None` outside the panel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<bool> {
        self.locate(x, y)
            .map(|(idx, bit)| self.buffer[idx] & (1 << bit) != 0)
    }

    /// Replace the whole buffer with pre-packed bytes.
    ///
    /// # Errors
    ///
    /// [`OledError::BufferLength`] if `buf` is not exactly [`size()`](Self::size)
    /// bytes long. The current contents are kept in that case.
    pub fn replace(&mut self, buf: &[u8]) -> Result<(), OledError> {
        if buf.len() != self.buffer.len() {
            return Err(OledError::BufferLength {
                expected: self.buffer.len(),
                actual: buf.len(),
            });
        }
        self.buffer.copy_from_slice(buf);
        Ok(())
    }

    /// Packed bytes in controller order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Byte index and bit position for `(x, y)`.
    fn locate(&self, x: u32, y: u32) -> Option<(usize, u32)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (x + (y / self.page_size) * self.width) as usize;
        Some((idx, y % self.page_size))
    }
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("page_size", &self.page_size)
            .field("len", &self.buffer.len())
            .finish()
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Pixels outside the panel are clipped, so text is allowed to run off the
/// right edge.
impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                // Off-panel pixels are dropped.
                let _ = self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        self.buffer.fill(fill);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sizes() {
        assert_eq!(Framebuffer::new(128, 64, 8).unwrap().size(), 1024);
        assert_eq!(Framebuffer::new(128, 32, 8).unwrap().size(), 512);
        assert_eq!(Framebuffer::new(128, 16, 8).unwrap().size(), 256);
    }

    #[test]
    fn new_buffer_is_zeroed() {
        let fb = Framebuffer::new(128, 64, 8).unwrap();
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn rejects_invalid_geometry() {
        assert!(matches!(Framebuffer::new(0, 64, 8), Err(OledError::InvalidGeometry)));
        assert!(matches!(Framebuffer::new(128, 0, 8), Err(OledError::InvalidGeometry)));
        assert!(matches!(Framebuffer::new(128, 64, 0), Err(OledError::InvalidGeometry)));
        assert!(matches!(Framebuffer::new(129, 64, 8), Err(OledError::InvalidGeometry)));
        assert!(matches!(Framebuffer::new(128, 72, 8), Err(OledError::InvalidGeometry)));
    }

    #[test]
    fn rejects_partial_pages() {
        assert!(matches!(Framebuffer::new(128, 20, 8), Err(OledError::InvalidGeometry)));
        assert!(matches!(Framebuffer::new(128, 63, 8), Err(OledError::InvalidGeometry)));
        assert_eq!(Framebuffer::new(128, 20, 4).unwrap().size(), 640);
    }

    #[test]
    fn rejects_panels_taller_than_the_multiplexer() {
        // Fits in the buffer but not in the controller's row count.
        assert!(matches!(Framebuffer::new(8, 1024, 8), Err(OledError::InvalidGeometry)));
        assert!(matches!(Framebuffer::new(16, 128, 8), Err(OledError::InvalidGeometry)));
    }

    #[test]
    fn byte_length_and_pixel_size_differ() {
        let fb = Framebuffer::new(128, 32, 8).unwrap();
        assert_eq!(fb.size(), 512);
        assert_eq!(OriginDimensions::size(&fb), Size::new(128, 32));
    }

    #[test]
    fn pixel_maps_to_page_byte_and_bit() {
        let mut fb = Framebuffer::new(128, 64, 8).unwrap();
        fb.set_pixel(5, 0, true).unwrap();
        assert_eq!(fb.as_bytes()[5], 0b0000_0001);

        fb.set_pixel(5, 7, true).unwrap();
        assert_eq!(fb.as_bytes()[5], 0b1000_0001);

        // Row 10 is page 1, bit 2.
        fb.set_pixel(3, 10, true).unwrap();
        assert_eq!(fb.as_bytes()[128 + 3], 0b0000_0100);

        // Bottom-right corner.
        fb.set_pixel(127, 63, true).unwrap();
        assert_eq!(fb.as_bytes()[1023], 0b1000_0000);
    }

    #[test]
    fn clearing_a_pixel_leaves_neighbours() {
        let mut fb = Framebuffer::new(128, 64, 8).unwrap();
        fb.replace(&[0xFF; 1024]).unwrap();
        fb.set_pixel(10, 12, false).unwrap();
        assert_eq!(fb.as_bytes()[128 + 10], 0b1110_1111);
        assert_eq!(fb.pixel(10, 12), Some(false));
        assert_eq!(fb.pixel(10, 11), Some(true));
        assert_eq!(fb.as_bytes().iter().filter(|&&b| b != 0xFF).count(), 1);
    }

    #[test]
    fn out_of_range_pixel_is_rejected() {
        let mut fb = Framebuffer::new(128, 32, 8).unwrap();
        assert!(matches!(
            fb.set_pixel(128, 0, true),
            Err(OledError::OutOfRange { x: 128, y: 0 })
        ));
        assert!(matches!(
            fb.set_pixel(0, 32, true),
            Err(OledError::OutOfRange { x: 0, y: 32 })
        ));
        assert_eq!(fb.pixel(0, 32), None);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn replace_checks_length() {
        let mut fb = Framebuffer::new(128, 32, 8).unwrap();
        assert!(matches!(
            fb.replace(&[0xAA; 1024]),
            Err(OledError::BufferLength {
                expected: 512,
                actual: 1024
            })
        ));
        assert!(fb.as_bytes().iter().all(|&b| b == 0));

        fb.replace(&[0xAA; 512]).unwrap();
        assert!(fb.as_bytes().iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut fb = Framebuffer::new(128, 64, 8).unwrap();
        fb.replace(&[0x5A; 1024]).unwrap();
        fb.clear();
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn draw_target_clips_off_panel_pixels() {
        let mut fb = Framebuffer::new(128, 64, 8).unwrap();
        fb.draw_iter([
            Pixel(Point::new(-1, 0), BinaryColor::On),
            Pixel(Point::new(0, 64), BinaryColor::On),
            Pixel(Point::new(2, 9), BinaryColor::On),
        ])
        .unwrap();
        assert_eq!(fb.pixel(2, 9), Some(true));
        assert_eq!(fb.as_bytes().iter().map(|b| b.count_ones()).sum::<u32>(), 1);
    }
}
