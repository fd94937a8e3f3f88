//! MCP3008 8-channel 10-bit SPI ADC.
//!
//! Frame helpers are always compiled so the bit layout is testable on any
//! host; the SPI-backed sensor array needs the `hardware` feature.

use crate::error::{HwError, Result};

/// Highest input index on the converter.
pub const MAX_INPUT: u8 = 7;

/// Three-byte request for a single-ended conversion on `input`.
///
/// Byte 0 carries the start bit, byte 1 the single-ended flag and the input
/// number in its high nibble, byte 2 only clocks out the result.
pub fn request(input: u8) -> Result<[u8; 3]> {
    if input > MAX_INPUT {
        return Err(HwError::InvalidChannel(input));
    }
    Ok([0x01, (0x08 | input) << 4, 0x00])
}

/// Extract the 10-bit result from a response frame.
#[inline]
pub fn decode(rx: [u8; 3]) -> u16 {
    (u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2])
}

#[cfg(feature = "hardware")]
pub use spi::Mcp3008;

#[cfg(feature = "hardware")]
mod spi {
    use gear_traits::{CHANNEL_COUNT, HallSensors};
    use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

    use super::{MAX_INPUT, decode, request};
    use crate::error::{HwError, Result};

    /// Six Hall sensors wired to MCP3008 inputs.
    pub struct Mcp3008 {
        spi: Spi,
        inputs: [u8; CHANNEL_COUNT],
    }

    fn bus(n: u8) -> Result<Bus> {
        match n {
            0 => Ok(Bus::Spi0),
            1 => Ok(Bus::Spi1),
            2 => Ok(Bus::Spi2),
            other => Err(HwError::Spi(format!("unsupported spi bus {other}"))),
        }
    }

    fn slave_select(n: u8) -> Result<SlaveSelect> {
        match n {
            0 => Ok(SlaveSelect::Ss0),
            1 => Ok(SlaveSelect::Ss1),
            2 => Ok(SlaveSelect::Ss2),
            other => Err(HwError::Spi(format!("unsupported slave select {other}"))),
        }
    }

    impl Mcp3008 {
        /// `inputs` maps gears 1..5 and reverse to converter inputs.
        pub fn new(
            bus_no: u8,
            ss_no: u8,
            clock_hz: u32,
            inputs: [u8; CHANNEL_COUNT],
        ) -> Result<Self> {
            if let Some(&bad) = inputs.iter().find(|&&i| i > MAX_INPUT) {
                return Err(HwError::InvalidChannel(bad));
            }
            let spi = Spi::new(bus(bus_no)?, slave_select(ss_no)?, clock_hz, Mode::Mode0)
                .map_err(|e| HwError::Spi(e.to_string()))?;
            tracing::info!(bus = bus_no, ss = ss_no, clock_hz, ?inputs, "mcp3008 ready");
            Ok(Self { spi, inputs })
        }

        pub fn read_input(&mut self, input: u8) -> Result<u16> {
            let tx = request(input)?;
            let mut rx = [0u8; 3];
            let n = self
                .spi
                .transfer(&mut rx, &tx)
                .map_err(|e| HwError::Spi(e.to_string()))?;
            if n != rx.len() {
                return Err(HwError::ShortTransfer(n));
            }
            let value = decode(rx);
            tracing::trace!(input, value, "mcp3008 read");
            Ok(value)
        }
    }

    impl HallSensors for Mcp3008 {
        fn sample(
            &mut self,
        ) -> std::result::Result<[u16; CHANNEL_COUNT], Box<dyn std::error::Error + Send + Sync>>
        {
            let mut out = [0u16; CHANNEL_COUNT];
            for (slot, input) in out.iter_mut().zip(self.inputs) {
                *slot = self.read_input(input).map_err(|e| {
                    tracing::warn!(input, error = %e, "hall sensor read failed");
                    Box::new(e) as Box<dyn std::error::Error + Send + Sync>
                })?;
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_encodes_single_ended_input() {
        assert_eq!(request(0).ok(), Some([0x01, 0x80, 0x00]));
        assert_eq!(request(5).ok(), Some([0x01, 0xD0, 0x00]));
        assert_eq!(request(7).ok(), Some([0x01, 0xF0, 0x00]));
    }

    #[test]
    fn request_rejects_missing_input() {
        match request(8) {
            Err(HwError::InvalidChannel(8)) => {}
            other => panic!("expected InvalidChannel, got {other:?}"),
        }
    }

    #[test]
    fn decode_masks_null_bits() {
        assert_eq!(decode([0xFF, 0xFF, 0xFF]), 1023);
        assert_eq!(decode([0x00, 0xFC, 0x00]), 0);
        assert_eq!(decode([0x00, 0x02, 0x00]), 512);
        assert_eq!(decode([0x00, 0x01, 0xFF]), 511);
    }
}
