//! Blocking SSD1306 display driver.
//!
//! [`Ssd1306`] owns the bus interface, the reset pin, a delay source and the
//! [`Framebuffer`]. Construction resets and initialises the panel; after that
//! the driver is ready for drawing and flushing until [`Ssd1306::halt`]
//! consumes it.

use display_interface::{DataFormat, WriteOnlyDataCommand};
use embedded_graphics::{
    pixelcolor::{BinaryColor, Rgb888},
    prelude::*,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::command::{self, PAGE_SIZE};
use crate::config::DisplayConfig;
use crate::error::OledError;
use crate::framebuffer::Framebuffer;
use crate::layout::{self, Anchor, Raster};

/// Each half of the reset pulse, in milliseconds.
pub const RESET_PULSE_MS: u32 = 50;

/// Framebuffered SSD1306 driver.
///
/// # Lifecycle
///
/// 1. [`Ssd1306::new()`]: allocates the framebuffer, pulses reset and sends
///    the init sequence. The panel is on and blank afterwards.
/// 2. Draw with [`set_pixel()`](Self::set_pixel), [`draw_text()`](Self::draw_text),
///    [`framebuffer_mut()`](Self::framebuffer_mut) and friends.
/// 3. [`display()`](Self::display): transfers the framebuffer.
/// 4. [`halt()`](Self::halt): resets and turns the panel off, handing the
///    hardware back.
///
/// Drawing helpers only touch memory; nothing reaches the panel until
/// [`display()`](Self::display). No operation retries: the first bus error
/// is returned and the caller re-runs the operation from the top.
///
/// # Example
///
/// ```
/// # use core::convert::Infallible;
/// # use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};
/// # use embedded_hal::{delay::DelayNs, digital::{ErrorType, OutputPin}};
/// # struct Bus;
/// # impl WriteOnlyDataCommand for Bus {
/// #     fn send_commands(&mut self, _: DataFormat<'_>) -> Result<(), DisplayError> { Ok(()) }
/// #     fn send_data(&mut self, _: DataFormat<'_>) -> Result<(), DisplayError> { Ok(()) }
/// # }
/// # struct Pin;
/// # impl ErrorType for Pin { type Error = Infallible; }
/// # impl OutputPin for Pin {
/// #     fn set_low(&mut self) -> Result<(), Infallible> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Infallible> { Ok(()) }
/// # }
/// # struct Delay;
/// # impl DelayNs for Delay { fn delay_ns(&mut self, _: u32) {} }
/// use pioled_display_rs::{Anchor, DisplayConfig, Ssd1306};
///
/// let mut oled = Ssd1306::new(Bus, Pin, Delay, DisplayConfig::default()).unwrap();
/// oled.set_contrast(0x40).unwrap();
/// oled.draw_text(Anchor::BottomCenter, "Hello").unwrap();
/// let (_bus, _rst, _delay) = oled.halt().unwrap();
/// ```
pub struct Ssd1306<DI, RST, DELAY> {
    interface: DI,
    rst: RST,
    delay: DELAY,
    config: DisplayConfig,
    framebuffer: Framebuffer,
}

impl<DI, RST, DELAY> Ssd1306<DI, RST, DELAY>
where
    DI: WriteOnlyDataCommand,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Reset and initialise the panel described by `config`.
    ///
    /// # Arguments
    /// * `interface`: bus adapter ([`SpiInterface`](crate::SpiInterface) or
    ///   [`I2CInterface`](crate::I2CInterface)).
    /// * `rst`: reset pin, already configured as an output.
    /// * `delay`: blocking delay for the reset pulse.
    /// * `config`: panel geometry and init operands.
    ///
    /// # Errors
    ///
    /// [`OledError::InvalidGeometry`] before any I/O if the framebuffer can't
    /// be allocated, [`OledError::Pin`] if reset fails, or the bus error of
    /// the first init command that fails. No driver is returned in any of
    /// those cases.
    pub fn new(interface: DI, rst: RST, delay: DELAY, config: DisplayConfig) -> Result<Self, OledError> {
        let framebuffer = Framebuffer::new(config.width, config.height, PAGE_SIZE)?;

        let mut driver = Self {
            interface,
            rst,
            delay,
            config,
            framebuffer,
        };
        driver.reset()?;
        driver.send_commands(&command::init_sequence(&config))?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "SSD1306 {}x{} initialised (external_vcc={}, rotated={})",
            config.width,
            config.height,
            config.external_vcc,
            config.rotated
        );

        Ok(driver)
    }

    // ── Controller commands ──────────────────────────────────────────────

    /// Pulse the reset line: high, 50 ms, low, 50 ms, high.
    ///
    /// The controller loses its configuration; only [`halt()`](Self::halt)
    /// and construction call this in normal use.
    ///
    /// # Errors
    ///
    /// [`OledError::Pin`] if the reset pin can't be driven.
    pub fn reset(&mut self) -> Result<(), OledError> {
        #[cfg(feature = "defmt")]
        defmt::debug!("SSD1306 reset pulse");

        self.rst.set_high().map_err(|_| OledError::Pin)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_low().map_err(|_| OledError::Pin)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(|_| OledError::Pin)
    }

    /// Turn the panel on.
    pub fn on(&mut self) -> Result<(), OledError> {
        self.send_commands(&[command::SET_DISPLAY_ON])
    }

    /// Turn the panel off. Display RAM is kept.
    pub fn off(&mut self) -> Result<(), OledError> {
        self.send_commands(&[command::SET_DISPLAY_OFF])
    }

    /// Set the contrast level (`0` dimmest, `255` brightest).
    pub fn set_contrast(&mut self, level: u8) -> Result<(), OledError> {
        self.send_commands(&[command::SET_CONTRAST, level])
    }

    /// [`set_contrast()`](Self::set_contrast) for callers holding a wider
    /// integer.
    ///
    /// # Errors
    ///
    /// [`OledError::InvalidArgument`] without any bus traffic if `level`
    /// exceeds 255.
    pub fn set_contrast_checked(&mut self, level: u32) -> Result<(), OledError> {
        let level = u8::try_from(level).map_err(|_| OledError::InvalidArgument)?;
        self.set_contrast(level)
    }

    /// Swap lit and dark pixels in hardware. The framebuffer is unchanged.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), OledError> {
        let cmd = if inverted {
            command::SET_DISPLAY_INVERSE
        } else {
            command::SET_DISPLAY_NORMAL
        };
        self.send_commands(&[cmd])
    }

    // ── Framebuffer ──────────────────────────────────────────────────────

    /// Clear the framebuffer. No bus traffic.
    pub fn clear(&mut self) {
        self.framebuffer.clear();
    }

    /// Set one framebuffer pixel. No bus traffic.
    ///
    /// # Errors
    ///
    /// [`OledError::OutOfRange`] if `(x, y)` is off the panel.
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) -> Result<(), OledError> {
        self.framebuffer.set_pixel(x, y, on)
    }

    /// Send the addressing window, then the whole framebuffer.
    ///
    /// Two calls without drawing in between put identical bytes on the bus.
    pub fn display(&mut self) -> Result<(), OledError> {
        self.send_commands(&command::addressing_window(&self.config))?;
        self.interface
            .send_data(DataFormat::U8(self.framebuffer.as_bytes()))?;
        Ok(())
    }

    /// Replace the framebuffer with pre-packed bytes and display it.
    ///
    /// # Errors
    ///
    /// [`OledError::BufferLength`] before any bus traffic if `buf` is not
    /// exactly [`Framebuffer::size()`] bytes.
    pub fn set_buffer_and_display(&mut self, buf: &[u8]) -> Result<(), OledError> {
        self.framebuffer.replace(buf)?;
        self.display()
    }

    // ── Composition ──────────────────────────────────────────────────────

    /// Show an image the exact size of the panel.
    ///
    /// A pixel is lit if any of its red, green or blue channels is non-zero.
    ///
    /// # Errors
    ///
    /// [`OledError::DimensionMismatch`] before any bus traffic, with the
    /// framebuffer untouched, if the image is not `width × height`.
    pub fn show_image<R>(&mut self, img: &R) -> Result<(), OledError>
    where
        R: Raster,
        R::Color: Into<Rgb888>,
    {
        let actual = img.size();
        if actual != self.size() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Rejected {}x{} image for {}x{} display",
                actual.width,
                actual.height,
                self.config.width,
                self.config.height
            );
            return Err(OledError::DimensionMismatch {
                expected: (self.config.width, self.config.height),
                actual: (actual.width, actual.height),
            });
        }

        self.framebuffer.clear();
        layout::render_monochrome(&mut self.framebuffer, img).unwrap_or_else(|e| match e {});
        self.display()
    }

    /// Clear, draw `text` at `anchor`, and display.
    pub fn draw_text(&mut self, anchor: Anchor, text: &str) -> Result<(), OledError> {
        self.framebuffer.clear();
        layout::draw_text(&mut self.framebuffer, anchor, text).unwrap_or_else(|e| match e {});
        self.display()
    }

    /// Clear, then scale `img` to the panel, center it, and display.
    ///
    /// Unlike [`show_image()`](Self::show_image) any source size is accepted.
    pub fn draw_image<R>(&mut self, img: &R) -> Result<(), OledError>
    where
        R: Raster,
        R::Color: Into<Rgb888>,
    {
        let size = self.size();
        let scaled = layout::scale_nearest_neighbor(layout::monochrome(img), size);
        let view = layout::center_on_surface(scaled, size, BinaryColor::Off);

        self.framebuffer.clear();
        layout::render_monochrome(&mut self.framebuffer, &view).unwrap_or_else(|e| match e {});
        self.display()
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Borrow the framebuffer.
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Borrow the framebuffer as an `embedded-graphics` draw target.
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    /// Panel width in pixels.
    pub fn width(&self) -> u32 {
        self.config.width
    }

    /// Panel height in pixels.
    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Configuration the panel was initialised with.
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Reset the controller, turn the panel off and release the hardware.
    ///
    /// # Errors
    ///
    /// The first pin or bus error. The hardware is dropped in that case.
    pub fn halt(mut self) -> Result<(DI, RST, DELAY), OledError> {
        self.reset()?;
        self.off()?;

        #[cfg(feature = "defmt")]
        defmt::info!("SSD1306 halted");

        Ok((self.interface, self.rst, self.delay))
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn size(&self) -> Size {
        Size::new(self.config.width, self.config.height)
    }

    /// One command-mode write per byte.
    fn send_commands(&mut self, bytes: &[u8]) -> Result<(), OledError> {
        for &byte in bytes {
            self.interface.send_commands(DataFormat::U8(&[byte]))?;
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
