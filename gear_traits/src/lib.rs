//! Hardware-facing seams shared by the gear display crates.
//!
//! Sensor sampling and button levels cross these traits so the core stays
//! hardware-agnostic and tests can script every input.

pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Number of Hall-effect channels: five forward gears plus reverse.
pub const CHANNEL_COUNT: usize = 6;

/// Six-channel analog front end. Each value is a raw 10-bit count (0..=1023).
///
/// Implementations read every channel exactly once per call and never retry.
/// Errors are reserved for transport failures (SPI, GPIO); an extreme
/// reading is returned as-is.
pub trait HallSensors {
    fn sample(
        &mut self,
    ) -> Result<[u16; CHANNEL_COUNT], Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: HallSensors + ?Sized> HallSensors for Box<T> {
    fn sample(
        &mut self,
    ) -> Result<[u16; CHANNEL_COUNT], Box<dyn std::error::Error + Send + Sync>> {
        (**self).sample()
    }
}

/// Front-panel push buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Mode,
    ToleranceUp,
    ToleranceDown,
}

impl Button {
    /// Scan order used at the head of every control-loop tick.
    pub const SCAN_ORDER: [Button; 3] = [Button::Mode, Button::ToleranceUp, Button::ToleranceDown];
}

/// Digital pin level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Raw button pin levels. Buttons are wired active-low with pull-ups, so a
/// pressed button reads `Level::Low`.
pub trait ButtonPins {
    fn level(&mut self, button: Button) -> Level;
}

impl<T: ButtonPins + ?Sized> ButtonPins for Box<T> {
    fn level(&mut self, button: Button) -> Level {
        (**self).level(button)
    }
}
