#[cfg(feature = "hardware")]
pub mod gpio_buttons;
pub mod error;
pub mod mcp3008;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gear_traits::{Button, ButtonPins, CHANNEL_COUNT, HallSensors, Level};

#[cfg(feature = "hardware")]
pub use gpio_buttons::GpioButtons;
#[cfg(feature = "hardware")]
pub use mcp3008::Mcp3008;

/// Raw count of an idle sensor.
pub const SIM_REST: u16 = 512;
/// Raw count of the sensor under the engaged gear's magnet.
pub const SIM_ENGAGED: u16 = 880;

/// Shift pattern the simulator walks through: neutral, 1..5, reverse.
const CYCLE: [Option<usize>; CHANNEL_COUNT + 1] =
    [None, Some(0), Some(1), Some(2), Some(3), Some(4), Some(5)];

/// Simulated Hall sensor array.
///
/// Holds each position of the shift pattern for `hold` samples, with
/// deterministic jitter on every channel.
pub struct SimulatedSensors {
    hold: u64,
    jitter: u16,
    fixed: Option<Option<usize>>,
    samples: u64,
    rng: u32,
}

impl Default for SimulatedSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSensors {
    pub fn new() -> Self {
        Self {
            hold: 50,
            jitter: 12,
            fixed: None,
            samples: 0,
            rng: 0x9E37_79B9,
        }
    }

    /// Samples spent at each position of the shift pattern (min 1).
    pub fn with_hold(mut self, hold: u64) -> Self {
        self.hold = hold.max(1);
        self
    }

    /// Peak jitter in raw counts (0 disables).
    pub fn with_jitter(mut self, jitter: u16) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = seed.max(1);
        self
    }

    /// Stay in one position: `None` for neutral, `Some(i)` for channel `i`.
    pub fn fixed(mut self, position: Option<usize>) -> Self {
        self.fixed = Some(position.filter(|&i| i < CHANNEL_COUNT));
        self
    }

    /// Position the next sample will show.
    pub fn position(&self) -> Option<usize> {
        self.fixed.unwrap_or_else(|| {
            let step = (self.samples / self.hold) % CYCLE.len() as u64;
            CYCLE[step as usize]
        })
    }

    fn next_noise(&mut self) -> i32 {
        if self.jitter == 0 {
            return 0;
        }
        // xorshift32
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        let span = u32::from(self.jitter) * 2 + 1;
        (x % span) as i32 - i32::from(self.jitter)
    }
}

impl HallSensors for SimulatedSensors {
    fn sample(
        &mut self,
    ) -> Result<[u16; CHANNEL_COUNT], Box<dyn std::error::Error + Send + Sync>> {
        let engaged = self.position();
        let mut out = [0u16; CHANNEL_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            let base = if engaged == Some(i) { SIM_ENGAGED } else { SIM_REST };
            let v = (i32::from(base) + self.next_noise()).clamp(0, 1023);
            *slot = u16::try_from(v).unwrap_or(1023);
        }
        self.samples = self.samples.wrapping_add(1);
        tracing::trace!(?out, ?engaged, "simulated sample");
        Ok(out)
    }
}

/// Simulated buttons. All released unless held through a handle; clones
/// share state, so a test or a demo driver can press buttons while the
/// session owns another clone.
#[derive(Clone, Default)]
pub struct SimulatedButtons {
    held: Arc<[AtomicBool; 3]>,
}

impl SimulatedButtons {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(button: Button) -> usize {
        match button {
            Button::Mode => 0,
            Button::ToleranceUp => 1,
            Button::ToleranceDown => 2,
        }
    }

    pub fn hold(&self, button: Button) {
        self.held[Self::slot(button)].store(true, Ordering::Relaxed);
    }

    pub fn release(&self, button: Button) {
        self.held[Self::slot(button)].store(false, Ordering::Relaxed);
    }
}

impl ButtonPins for SimulatedButtons {
    fn level(&mut self, button: Button) -> Level {
        if self.held[Self::slot(button)].load(Ordering::Relaxed) {
            Level::Low
        } else {
            Level::High
        }
    }
}
