use gear_hardware::{SIM_ENGAGED, SIM_REST, SimulatedSensors};
use gear_traits::HallSensors;
use rstest::rstest;

#[rstest]
#[case(None)]
#[case(Some(0))]
#[case(Some(3))]
#[case(Some(5))]
fn fixed_position_stays_put(#[case] position: Option<usize>) {
    let mut s = SimulatedSensors::new().fixed(position).with_jitter(0);
    for _ in 0..10 {
        let frame = s.sample().expect("simulated sample");
        for (i, &v) in frame.iter().enumerate() {
            let expected = if position == Some(i) { SIM_ENGAGED } else { SIM_REST };
            assert_eq!(v, expected, "channel {i}");
        }
    }
}

#[test]
fn jitter_is_bounded_and_deterministic() {
    let mut a = SimulatedSensors::new().fixed(None).with_jitter(12).with_seed(99);
    let mut b = SimulatedSensors::new().fixed(None).with_jitter(12).with_seed(99);
    for _ in 0..200 {
        let fa = a.sample().expect("sample");
        let fb = b.sample().expect("sample");
        assert_eq!(fa, fb);
        assert!(fa.iter().all(|&v| v.abs_diff(SIM_REST) <= 12));
    }
}

#[test]
fn cycle_visits_every_position_then_wraps() {
    let mut s = SimulatedSensors::new().with_hold(2).with_jitter(0);
    let mut positions = Vec::new();
    for _ in 0..14 {
        positions.push(s.position());
        s.sample().expect("sample");
    }
    let expected: Vec<Option<usize>> = [None, Some(0), Some(1), Some(2), Some(3), Some(4), Some(5)]
        .into_iter()
        .flat_map(|p| [p, p])
        .collect();
    assert_eq!(positions, expected);
    assert_eq!(s.position(), None);
}

#[test]
fn out_of_range_fixed_position_reads_neutral() {
    let mut s = SimulatedSensors::new().fixed(Some(9)).with_jitter(0);
    assert_eq!(s.sample().expect("sample"), [SIM_REST; 6]);
}
