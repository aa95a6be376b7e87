//! SPI bus adapter.
//!
//! Implements [`WriteOnlyDataCommand`] over an `embedded-hal` [`SpiDevice`]
//! plus a data/command select pin, with the framing the SSD1306 init and
//! flush paths rely on:
//!
//! - **Commands**: select pin LOW, then one single-byte transfer *per byte*.
//!   A command and its operands are never batched.
//! - **Data**: select pin HIGH, then one transaction carrying
//!   [`DATA_TAG`] followed by the payload.
//!
//! The I2C counterpart is [`display_interface_i2c::I2CInterface`], which
//! prefixes commands with a `0x00` control byte and data with `0x40`.

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Operation, SpiDevice};

use crate::command::DATA_TAG;

/// SSD1306 command/data framing over SPI.
///
/// Owns the SPI device (chip select is the device's job) and the
/// data/command select pin.
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI, DC> SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Create a new adapter.
    ///
    /// # Arguments
    /// * `spi`: SPI device (takes ownership for exclusive access).
    /// * `dc`: data/command select pin, already configured as an output.
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    /// Give back the SPI device and select pin.
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }

    /// Select pin LOW, then a one-byte transfer.
    fn command_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(&[byte])
            .map_err(|_| DisplayError::BusWriteError)
    }
}

impl<SPI, DC> WriteOnlyDataCommand for SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    fn send_commands(&mut self, cmd: DataFormat<'_>) -> Result<(), DisplayError> {
        match cmd {
            DataFormat::U8(bytes) => {
                for &byte in bytes {
                    self.command_byte(byte)?;
                }
                Ok(())
            }
            DataFormat::U8Iter(iter) => {
                for byte in iter {
                    self.command_byte(byte)?;
                }
                Ok(())
            }
            _ => Err(DisplayError::DataFormatNotImplemented),
        }
    }

    fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), DisplayError> {
        let DataFormat::U8(payload) = buf else {
            return Err(DisplayError::DataFormatNotImplemented);
        };

        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        // One transaction: chip select stays asserted across tag and payload.
        self.spi
            .transaction(&mut [Operation::Write(&[DATA_TAG]), Operation::Write(payload)])
            .map_err(|_| DisplayError::BusWriteError)
    }
}
