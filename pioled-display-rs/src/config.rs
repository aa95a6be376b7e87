//! Panel configuration.
//!
//! [`DisplayConfig`] is the single source of panel geometry and of every
//! voltage- or geometry-dependent init operand. There are no module-level
//! panel tables; alternate sizes and Vcc sources are a different config, not
//! a different driver.

use crate::command::PAGE_SIZE;

/// Geometry and init operands for one SSD1306 panel.
///
/// Build with [`DisplayConfig::new`] to get the operands the controller
/// datasheet recommends for the geometry and Vcc source, then override
/// individual fields with struct-update syntax if a module needs it.
///
/// [`DisplayConfig::default()`] is a 128×64 panel on the internal charge pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Panel width in pixels. Default: 128.
    pub width: u32,
    /// Panel height in pixels. Default: 64.
    pub height: u32,
    /// `true` if the panel is driven from an external Vcc supply.
    pub external_vcc: bool,
    /// Mirror both axes (segment remap 127, COM scan decreasing).
    pub rotated: bool,

    // ── Init operands ────────────────────────────────────────────────
    /// Clock divide ratio / oscillator frequency.
    pub clock_divide: u8,
    /// Charge pump setting.
    pub charge_pump: u8,
    /// COM pins hardware configuration.
    pub com_pins: u8,
    /// Contrast applied during init.
    pub contrast: u8,
    /// Pre-charge period.
    pub precharge: u8,
    /// VCOMH deselect level.
    pub vcomh_deselect: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new(128, 64, false)
    }
}

impl DisplayConfig {
    /// Derive the init operands for a `width`×`height` panel.
    pub const fn new(width: u32, height: u32, external_vcc: bool) -> Self {
        let clock_divide = if height == 16 { 0x60 } else { 0x80 };
        let charge_pump = if external_vcc { 0x10 } else { 0x14 };
        let com_pins = if height == 64 { 0x12 } else { 0x02 };
        let contrast = match (height, external_vcc) {
            (64, false) => 0xCF,
            (64, true) => 0x9F,
            _ => 0x8F,
        };
        let precharge = if external_vcc { 0x22 } else { 0xF1 };

        Self {
            width,
            height,
            external_vcc,
            rotated: false,
            clock_divide,
            charge_pump,
            com_pins,
            contrast,
            precharge,
            vcomh_deselect: 0x40,
        }
    }

    /// Number of controller pages (8-row bands).
    pub const fn page_count(&self) -> u32 {
        self.height.div_ceil(PAGE_SIZE)
    }

    /// Framebuffer length in bytes for this geometry.
    pub const fn buffer_len(&self) -> usize {
        (self.width * self.page_count()) as usize
    }
}
