//! Anchor text example
//!
//! Standalone hardware demonstration that exercises [`Ssd1306`] on a
//! Raspberry Pi. Writes `"Super Google."` at each of the six anchors in turn,
//! one second apart, forever. If a BMP path is given on the command line it
//! is scaled to the panel and shown for three seconds first.
//!
//! # Wiring
//!
//! | Signal   | Pi             | Notes                  |
//! |----------|----------------|------------------------|
//! | SPI0     | /dev/spidev0.0 | mode 0, 8 bit, 500 kHz |
//! | RST      | GPIO 19        |                        |
//! | DC       | GPIO 16        |                        |
//! | OLED VCC | 3V3            |                        |
//! | OLED GND | GND            |                        |
//!
//! Set `RUST_LOG=debug` for more output.

use std::{thread::sleep, time::Duration};

use anyhow::{Context, Result};
use embedded_graphics::pixelcolor::Rgb888;
use linux_embedded_hal::{
    gpio_cdev::{Chip, LineRequestFlags},
    spidev::{SpiModeFlags, SpidevOptions},
    CdevPin, Delay, SpidevDevice,
};
use tinybmp::Bmp;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pioled_display_rs::{Anchor, DisplayConfig, SpiInterface, Ssd1306};

const TEXT: &str = "Super Google.";
const STEP: Duration = Duration::from_secs(1);
const SPLASH: Duration = Duration::from_secs(3);

/// Where the panel is connected.
#[derive(Debug, Clone)]
struct Wiring {
    spi_path: &'static str,
    gpio_chip: &'static str,
    rst_line: u32,
    dc_line: u32,
    max_speed_hz: u32,
}

impl Default for Wiring {
    fn default() -> Self {
        Self {
            spi_path: "/dev/spidev0.0",
            gpio_chip: "/dev/gpiochip0",
            rst_line: 19,
            dc_line: 16,
            max_speed_hz: 500_000,
        }
    }
}

type Display = Ssd1306<SpiInterface<SpidevDevice, CdevPin>, CdevPin, Delay>;

fn output_pin(chip: &mut Chip, line: u32, consumer: &str) -> Result<CdevPin> {
    let handle = chip
        .get_line(line)
        .with_context(|| format!("getting GPIO line {}", line))?
        .request(LineRequestFlags::OUTPUT, 0, consumer)
        .with_context(|| format!("requesting GPIO line {}", line))?;
    CdevPin::new(handle).with_context(|| format!("creating {} pin", consumer))
}

fn open(wiring: &Wiring) -> Result<Display> {
    let mut spi = SpidevDevice::open(wiring.spi_path).context("opening SPI device")?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(wiring.max_speed_hz)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options).context("configuring SPI")?;

    let mut chip = Chip::new(wiring.gpio_chip).context("opening GPIO chip")?;
    let rst = output_pin(&mut chip, wiring.rst_line, "pioled-rst")?;
    let dc = output_pin(&mut chip, wiring.dc_line, "pioled-dc")?;

    Ssd1306::new(SpiInterface::new(spi, dc), rst, Delay, DisplayConfig::default())
        .map_err(|e| anyhow::anyhow!("display init failed: {}", e))
}

fn splash(display: &mut Display, path: &str) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path))?;
    let bmp = Bmp::<Rgb888>::from_slice(&data)
        .map_err(|e| anyhow::anyhow!("decoding {}: {:?}", path, e))?;
    display
        .draw_image(&bmp)
        .map_err(|e| anyhow::anyhow!("drawing {}: {}", path, e))?;
    info!(path, "splash shown");
    sleep(SPLASH);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let wiring = Wiring::default();
    info!(?wiring, "opening display");
    let mut display = open(&wiring)?;
    info!(width = display.width(), height = display.height(), "display ready");

    if let Some(path) = std::env::args().nth(1) {
        if let Err(e) = splash(&mut display, &path) {
            warn!("splash skipped: {:#}", e);
        }
    }

    for anchor in Anchor::ALL.iter().cycle() {
        display
            .draw_text(*anchor, TEXT)
            .map_err(|e| anyhow::anyhow!("drawing at {:?}: {}", anchor, e))?;
        tracing::debug!(?anchor, "text drawn");
        sleep(STEP);
    }

    Ok(())
}
