//! SSD1306 command opcodes and command-sequence builders.
//!
//! Every opcode and every operand is its own command-mode byte on the wire.
//! The builders here are pure: they only compute the bytes, the driver
//! decides how to send them.

use crate::config::DisplayConfig;

// ---------------------------------------------------------------------------
// Fundamental commands
// ---------------------------------------------------------------------------

/// Contrast control; followed by one operand byte.
pub const SET_CONTRAST: u8 = 0x81;

/// Output follows RAM content.
pub const DISPLAY_ON_RESUME_TO_RAM: u8 = 0xA4;

/// Normal polarity (set bit = lit pixel).
pub const SET_DISPLAY_NORMAL: u8 = 0xA6;

/// Inverted polarity (set bit = dark pixel).
pub const SET_DISPLAY_INVERSE: u8 = 0xA7;

/// Panel off (sleep).
pub const SET_DISPLAY_OFF: u8 = 0xAE;

/// Panel on.
pub const SET_DISPLAY_ON: u8 = 0xAF;

// ---------------------------------------------------------------------------
// Scrolling
// ---------------------------------------------------------------------------

/// Stop any hardware scroll.
pub const DEACTIVATE_SCROLL: u8 = 0x2E;

// ---------------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------------

/// Memory addressing mode; followed by one operand byte.
pub const SET_MEMORY_ADDRESSING_MODE: u8 = 0x20;

/// Column address window; followed by start and end column.
pub const COLUMN_ADDR: u8 = 0x21;

/// Page address window; followed by start and end page.
pub const PAGE_ADDR: u8 = 0x22;

/// Operand of [`SET_MEMORY_ADDRESSING_MODE`] selecting horizontal addressing.
pub const ADDRESSING_MODE_HORIZONTAL: u8 = 0x00;

// ---------------------------------------------------------------------------
// Hardware configuration
// ---------------------------------------------------------------------------

/// Display start line.
pub const SET_START_LINE: u8 = 0x40;

/// Column 0 mapped to SEG0.
pub const SET_SEGMENT_REMAP_0: u8 = 0xA0;

/// Column 127 mapped to SEG0.
pub const SET_SEGMENT_REMAP_127: u8 = 0xA1;

/// Multiplex ratio; followed by `height - 1`.
pub const SET_MULTIPLEX_RATIO: u8 = 0xA8;

/// Scan COM0 to COM[N-1].
pub const COM_SCAN_INC: u8 = 0xC0;

/// Scan COM[N-1] to COM0.
pub const COM_SCAN_DEC: u8 = 0xC8;

/// Vertical display offset; followed by one operand byte.
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;

/// COM pins hardware configuration; followed by one operand byte.
pub const SET_COM_PINS: u8 = 0xDA;

// ---------------------------------------------------------------------------
// Timing and driving scheme
// ---------------------------------------------------------------------------

/// Clock divide ratio / oscillator frequency; followed by one operand byte.
pub const SET_DISPLAY_CLOCK: u8 = 0xD5;

/// Pre-charge period; followed by one operand byte.
pub const SET_PRECHARGE_PERIOD: u8 = 0xD9;

/// VCOMH deselect level; followed by one operand byte.
pub const SET_VCOM_DESELECT_LEVEL: u8 = 0xDB;

/// Charge pump setting; followed by one operand byte.
pub const CHARGE_PUMP_SETTING: u8 = 0x8D;

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Tag byte that precedes the framebuffer payload in a data transfer.
pub const DATA_TAG: u8 = 0x40;

/// Rows per controller page.
pub const PAGE_SIZE: u32 = 8;

/// Number of bytes in the init sequence (17 steps, 11 of them with an operand).
pub const INIT_SEQUENCE_LEN: usize = 28;

// ---------------------------------------------------------------------------
// Sequence builders
// ---------------------------------------------------------------------------

/// Power-on initialisation bytes for `config`, in controller order.
///
/// The order must not change: panels come up garbled or dark otherwise.
/// Rotation swaps the segment remap and COM scan opcodes and nothing else.
pub fn init_sequence(config: &DisplayConfig) -> [u8; INIT_SEQUENCE_LEN] {
    let (segment_remap, com_scan) = if config.rotated {
        (SET_SEGMENT_REMAP_127, COM_SCAN_DEC)
    } else {
        (SET_SEGMENT_REMAP_0, COM_SCAN_INC)
    };

    [
        SET_DISPLAY_OFF,
        SET_DISPLAY_CLOCK,
        config.clock_divide,
        SET_MULTIPLEX_RATIO,
        (config.height - 1) as u8,
        SET_DISPLAY_OFFSET,
        0x00,
        SET_START_LINE,
        0x00,
        CHARGE_PUMP_SETTING,
        config.charge_pump,
        SET_MEMORY_ADDRESSING_MODE,
        ADDRESSING_MODE_HORIZONTAL,
        segment_remap,
        0x01,
        com_scan,
        SET_COM_PINS,
        config.com_pins,
        SET_CONTRAST,
        config.contrast,
        SET_PRECHARGE_PERIOD,
        config.precharge,
        SET_VCOM_DESELECT_LEVEL,
        config.vcomh_deselect,
        DISPLAY_ON_RESUME_TO_RAM,
        SET_DISPLAY_NORMAL,
        DEACTIVATE_SCROLL,
        SET_DISPLAY_ON,
    ]
}

/// Column and page window covering the whole panel.
///
/// Re-sent before every flush so a flush never depends on where a previous
/// (possibly interrupted) transfer left the controller's address pointer.
pub fn addressing_window(config: &DisplayConfig) -> [u8; 6] {
    [
        COLUMN_ADDR,
        0,
        (config.width - 1) as u8,
        PAGE_ADDR,
        0,
        (config.page_count() - 1) as u8,
    ]
}
