use gear_traits::{Button, ButtonPins, Level};
use rppal::gpio::{Gpio, InputPin};

use crate::error::{HwError, Result};

/// Three front-panel buttons on GPIO inputs with internal pull-ups.
pub struct GpioButtons {
    mode: InputPin,
    up: InputPin,
    down: InputPin,
}

impl GpioButtons {
    pub fn new(mode_pin: u8, up_pin: u8, down_pin: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let input = |pin: u8| -> Result<InputPin> {
            Ok(gpio
                .get(pin)
                .map_err(|e| HwError::Gpio(format!("pin {pin}: {e}")))?
                .into_input_pullup())
        };
        let buttons = Self {
            mode: input(mode_pin)?,
            up: input(up_pin)?,
            down: input(down_pin)?,
        };
        tracing::info!(mode_pin, up_pin, down_pin, "buttons ready");
        Ok(buttons)
    }
}

impl ButtonPins for GpioButtons {
    fn level(&mut self, button: Button) -> Level {
        let pin = match button {
            Button::Mode => &self.mode,
            Button::ToleranceUp => &self.up,
            Button::ToleranceDown => &self.down,
        };
        if pin.is_low() { Level::Low } else { Level::High }
    }
}
