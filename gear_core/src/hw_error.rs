//! Maps `Box<dyn Error>` from trait boundaries to typed `GearError`.
//!
//! The traits in `gear_traits` use `Box<dyn Error + Send + Sync>` so any
//! back-end can plug in; this module converts those to our typed error enum,
//! with an optional feature-gated path for `gear_hardware::HwError`.

use crate::error::GearError;

/// Map a trait-boundary error to a typed `GearError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to the error's display text.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> GearError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<gear_hardware::error::HwError>() {
            return match hw {
                gear_hardware::error::HwError::Io(io) => GearError::Io(io.to_string()),
                other => GearError::HardwareFault(other.to_string()),
            };
        }
    }

    if let Some(io) = e.downcast_ref::<std::io::Error>() {
        return GearError::Io(io.to_string());
    }
    GearError::Hardware(e.to_string())
}

/// Convenience for the boxed errors returned by `gear_traits` implementations.
pub fn map_hw_error_dyn(e: &(dyn std::error::Error + Send + Sync + 'static)) -> GearError {
    map_hw_error(e)
}
