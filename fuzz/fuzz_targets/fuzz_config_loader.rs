#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing and validation may reject input but must never panic. Any
    // config that validates must also convert into engine settings and
    // build a session.
    let Ok(cfg) = gear_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    let session = gear_core::GearSession::builder()
        .with_sensors(gear_core::mocks::ScriptedSensors::default())
        .with_buttons(gear_core::mocks::ScriptedButtons::new())
        .with_resolver((&cfg.resolver).into())
        .with_debounce((&cfg.debounce).into())
        .with_diagnostics((&cfg.diagnostics).into())
        .with_display((&cfg.display).into())
        .build();
    assert!(session.is_ok(), "validated config rejected by builder");
});
