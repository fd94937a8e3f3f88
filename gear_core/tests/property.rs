use gear_core::{
    DebounceMachine, DebounceState, DisplayMode, GearVerdict, ModeController, Readings,
    Resolution, TOLERANCE_MAX, Tolerance, count_active, mean, resolve, standard_deviation,
};
use gear_traits::{Button, Level};
use proptest::prelude::*;

prop_compose! {
    fn readings_strategy()(raw in prop::array::uniform6(0u16..=1023)) -> Readings {
        Readings::new(raw)
    }
}

prop_compose! {
    fn tolerance_strategy()(steps in 0u16..=(TOLERANCE_MAX / 5)) -> u16 {
        steps * 5
    }
}

fn button_strategy() -> impl Strategy<Value = Button> {
    prop_oneof![
        Just(Button::Mode),
        Just(Button::ToleranceUp),
        Just(Button::ToleranceDown),
    ]
}

proptest! {
    #[test]
    fn verdict_agrees_with_active_count(r in readings_strategy(), tol in tolerance_strategy()) {
        let base = mean(&r);
        let n = count_active(&r, base, tol);
        let v = resolve(&r, base, tol);
        prop_assert_ne!(v, GearVerdict::Fault);
        match n {
            0 => prop_assert_eq!(v, GearVerdict::Neutral),
            1 => prop_assert!(v.in_gear()),
            _ => prop_assert_eq!(v, GearVerdict::Error),
        }
    }

    #[test]
    fn resolution_details_match_verdict(r in readings_strategy(), tol in tolerance_strategy()) {
        let base = mean(&r);
        let res = Resolution::compute(&r, base, tol);
        prop_assert_eq!(res.active.is_some(), res.verdict.in_gear());
        if let (Some(ch), Some(v), Some(d)) = (res.active, res.active_value, res.differential) {
            prop_assert_eq!(res.verdict.channel(), Some(ch));
            prop_assert_eq!(r.get(ch), v);
            prop_assert!(d > u32::from(tol));
        }
    }

    #[test]
    fn uniform_readings_are_neutral(v in 0u16..=1023, tol in tolerance_strategy()) {
        let r = Readings::uniform(v);
        prop_assert_eq!(resolve(&r, mean(&r), tol), GearVerdict::Neutral);
    }

    #[test]
    fn mean_stays_within_reading_range(r in readings_strategy()) {
        let lo = i32::from(*r.as_array().iter().min().unwrap_or(&0));
        let hi = i32::from(*r.as_array().iter().max().unwrap_or(&0));
        let m = mean(&r);
        prop_assert!(lo <= m && m <= hi);
    }

    #[test]
    fn standard_deviation_is_finite_and_bounded(r in readings_strategy()) {
        let sd = standard_deviation(&r, mean(&r));
        prop_assert!(sd.is_finite());
        prop_assert!((0.0..=5.0).contains(&sd));
    }

    #[test]
    fn tolerance_stays_in_bounds(presses in prop::collection::vec(button_strategy(), 0..400)) {
        let mut c = ModeController::default();
        for b in presses {
            c.on_press(b);
            let t = c.tolerance().get();
            prop_assert!(t <= TOLERANCE_MAX);
            prop_assert_eq!(t % 5, 0);
        }
    }

    #[test]
    fn mode_presses_cycle_modulo_nine(n in 0usize..100) {
        let mut c = ModeController::new(DisplayMode::Basic, Tolerance::default());
        for _ in 0..n {
            c.on_press(Button::Mode);
        }
        prop_assert_eq!(c.mode().index(), n % DisplayMode::COUNT);
        prop_assert_eq!(c.tolerance(), Tolerance::default());
    }

    #[test]
    fn debounce_confirms_only_when_every_poll_is_low(
        polls in prop::collection::vec(any::<bool>(), 6)
    ) {
        let mut m = DebounceMachine::new(Level::Low, 6);
        prop_assert_eq!(m.begin(Level::Low), DebounceState::Sampling { remaining: 6 });
        for &low in &polls {
            m.poll(if low { Level::Low } else { Level::High });
        }
        prop_assert_eq!(m.finish(), polls.iter().all(|&low| low));
    }
}
