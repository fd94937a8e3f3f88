//! Human-readable error descriptions and structured JSON error formatting.

use gear_core::error::{BuildError, GearError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSensors => {
                "What happened: No Hall sensor array was provided to the engine.\nLikely causes: The ADC back-end failed to initialize or was not wired into the builder.\nHow to fix: Ensure the sensors are created successfully and passed via with_sensors(...).".to_string()
            }
            BuildError::MissingButtons => {
                "What happened: No button pins were provided to the engine.\nLikely causes: GPIO setup failed or was not wired into the builder.\nHow to fix: Ensure the buttons are created successfully and passed via with_buttons(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/gear_config.toml for a sample."
            ),
        };
    }

    if let Some(ge) = err.downcast_ref::<GearError>() {
        return match ge {
            GearError::Hardware(msg) | GearError::HardwareFault(msg) => format!(
                "What happened: The sensor hardware reported a fault ({msg}).\nLikely causes: MCP3008 not wired correctly, SPI disabled, or no power/ground.\nHow to fix: Verify the [pins] SPI settings and wiring, and that SPI is enabled on the board."
            ),
            GearError::Io(msg) => format!(
                "What happened: Reading the sensors failed with an I/O error ({msg}).\nLikely causes: Missing device node or insufficient permissions.\nHow to fix: Check that /dev/spidev* exists and the process may open it."
            ),
            GearError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(te) = err.downcast_ref::<toml::de::Error>() {
        return format!(
            "What happened: The config file is not valid TOML for this program.\nLikely causes: A typo, a wrong value type, or an unknown variant.\nHow to fix: Fix the config file. Parser says: {}",
            te.message()
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("open mcp3008") || lower.contains("open button pins") {
        return "What happened: Failed to initialize hardware.\nLikely causes: Incorrect pin or SPI numbers, or insufficient GPIO/SPI permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process has permission to access GPIO and SPI.".to_string();
    }

    // Readings CSV header special-case
    if format!("{err:#}")
        .to_ascii_lowercase()
        .contains("readings csv must have headers")
    {
        return "Invalid headers in readings CSV. Expected 'g1,g2,g3,g4,g5,r'.".to_string();
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 1 generic, 2 configuration, 3 hardware, 4 I/O.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() || err.downcast_ref::<toml::de::Error>().is_some()
    {
        return 2;
    }
    match err.downcast_ref::<GearError>() {
        Some(GearError::Config(_)) => 2,
        Some(GearError::Hardware(_) | GearError::HardwareFault(_)) => 3,
        Some(GearError::Io(_)) => 4,
        None => 1,
    }
}

/// Short machine-readable name for the error class.
fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(ge) = err.downcast_ref::<GearError>() {
        return match ge {
            GearError::Hardware(_) => "Hardware",
            GearError::HardwareFault(_) => "HardwareFault",
            GearError::Io(_) => "Io",
            GearError::Config(_) => "Config",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() || err.downcast_ref::<toml::de::Error>().is_some()
    {
        return "Config";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
        "chain": err.chain().map(ToString::to_string).collect::<Vec<_>>(),
    })
    .to_string()
}
