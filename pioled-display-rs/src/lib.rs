//! Blocking SSD1306 OLED driver with text anchoring and image scaling.
//!
//! This crate provides [`Ssd1306`], a framebuffered driver for 128×64 and
//! 128×32 SSD1306 panels such as the Adafruit PiOLED, plus a small
//! compositor in [`layout`] for anchored text and scaled, centered images.
//!
//! The driver talks to the controller through a [`WriteOnlyDataCommand`]
//! bus adapter, so the same code runs over SPI ([`SpiInterface`]) or I2C
//! ([`I2CInterface`]).
//!
//! # Quick Start
//!
//! ```ignore
//! use pioled_display_rs::{Anchor, DisplayConfig, Ssd1306, SpiInterface};
//!
//! let interface = SpiInterface::new(spi_device, dc_pin);
//! let mut oled = Ssd1306::new(interface, rst_pin, delay, DisplayConfig::default())?;
//!
//! // Clears, draws and flushes in one go.
//! oled.draw_text(Anchor::TopCenter, "Hello")?;
//!
//! let (interface, rst, delay) = oled.halt()?;
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging via [`defmt`]. Off by default so the
//!   crate links on hosts without a defmt global logger.
//!
//! [`WriteOnlyDataCommand`]: display_interface::WriteOnlyDataCommand

#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod framebuffer;
pub mod interface;
pub mod layout;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use config::DisplayConfig;
pub use display_interface_i2c::I2CInterface;
pub use driver::Ssd1306;
pub use error::OledError;
pub use framebuffer::Framebuffer;
pub use interface::SpiInterface;
pub use layout::{
    center_on_surface, draw_text, layout_text, render_monochrome, scale_nearest_neighbor, Anchor,
    Bitmap, Raster,
};
