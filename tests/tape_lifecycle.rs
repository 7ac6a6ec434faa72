use approx::assert_relative_eq;
use nestad::tape::{has_active_tape, with_active_tape, Tape, TapeGuard};
use nestad::Reverse;

#[test_log::test]
fn guard_installs_and_restores() {
    assert!(!has_active_tape::<f64>());
    let mut tape = Tape::<f64>::new();
    {
        let _guard = TapeGuard::new(&mut tape);
        assert!(has_active_tape::<f64>());
        assert!(!has_active_tape::<f32>());
    }
    assert!(!has_active_tape::<f64>());
}

#[test_log::test]
fn nested_guards_record_onto_the_innermost_tape() {
    let mut outer = Tape::<f64>::new();
    let mut inner = Tape::<f64>::new();
    let _outer_guard = TapeGuard::new(&mut outer);
    let x = Reverse::variable(3.0);
    {
        let _inner_guard = TapeGuard::new(&mut inner);
        let a = Reverse::variable(1.0);
        let b = a * a;
        assert_relative_eq!(b.grad(&[a])[0], 2.0);
        assert_eq!(with_active_tape(|t: &mut Tape<f64>| t.num_statements()), 1);
    }
    // back on the outer tape, which saw only the leaf
    assert_eq!(with_active_tape(|t: &mut Tape<f64>| t.num_statements()), 0);
    let y = x * x;
    assert_relative_eq!(y.grad(&[x])[0], 6.0);
}

#[test_log::test]
fn cleared_tape_is_reusable() {
    let mut tape = Tape::<f64>::with_capacity(16);
    for x0 in [1.0, 2.0, 3.0] {
        {
            let _guard = TapeGuard::new(&mut tape);
            let x = Reverse::variable(x0);
            let y = x * x * x;
            assert_relative_eq!(y.grad(&[x])[0], 3.0 * x0 * x0);
        }
        assert_eq!(tape.len(), 3);
        tape.clear();
        assert!(tape.is_empty());
    }
}

#[test_log::test]
fn single_precision_tape() {
    let mut tape = Tape::<f32>::new();
    let _guard = TapeGuard::new(&mut tape);
    let x = Reverse::<f32>::variable(2.0);
    let y = x * x + x;
    assert_relative_eq!(y.grad(&[x])[0], 5.0_f32);
}

#[test]
fn threads_record_independently() {
    let handles: Vec<_> = (1..=4)
        .map(|k| {
            std::thread::spawn(move || {
                let mut tape = Tape::<f64>::new();
                let _guard = TapeGuard::new(&mut tape);
                let x = Reverse::variable(k as f64);
                (x * x).grad(&[x])[0]
            })
        })
        .collect();
    for (k, h) in handles.into_iter().enumerate() {
        let g = h.join().unwrap();
        assert_relative_eq!(g, 2.0 * (k + 1) as f64);
    }
}

#[test]
#[should_panic(expected = "No active tape")]
fn variable_without_a_tape_panics() {
    let _ = Reverse::<f64>::variable(1.0);
}
