// tests/sampler.rs
use battle_surrogate::systems::normalizer::Normalizer;
use battle_surrogate::systems::sampler::{ParamBounds, Sample, draw_params, sample};
use battle_surrogate::systems::scenario::{RobotRole, Scenario, obstacle_count};
use battle_surrogate::systems::sdk::{CompletionObserver, Simulator, run_one};
use battle_surrogate::mechanics::uniform01;
use battle_surrogate::{Error, FailurePolicy, FnSimulator, SimulationError};
use bevy_prng::WyRand;
use rand_core::SeedableRng;

fn bounds() -> (ParamBounds, ParamBounds) {
    (ParamBounds::arena_size(800.0), ParamBounds::cooling_rate(0.5))
}

/// duration = round(100 * size / 800 + 50 * cooling / 0.5)
fn linear_stub() -> FnSimulator<impl Fn(&Scenario) -> Result<f64, SimulationError>> {
    FnSimulator(|s: &Scenario| {
        Ok((100.0 * s.arena_size / 800.0 + 50.0 * s.cooling_rate / 0.5).round())
    })
}

/* ──────────────────────────────────────────────────────────────────────────
1) Draws: reproducible and matching max * (offset + scale * U)
────────────────────────────────────────────────────────────────────────── */

#[test]
fn draws_are_bit_identical_for_a_fixed_seed() {
    let (arena, cooling) = bounds();
    let a = draw_params(200, &arena, &cooling, &mut WyRand::from_seed(42u64.to_le_bytes()));
    let b = draw_params(200, &arena, &cooling, &mut WyRand::from_seed(42u64.to_le_bytes()));
    assert_eq!(a.len(), 200);
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.0.to_bits(), y.0.to_bits());
        assert_eq!(x.1.to_bits(), y.1.to_bits());
    }

    let c = draw_params(200, &arena, &cooling, &mut WyRand::from_seed(43u64.to_le_bytes()));
    assert_ne!(a, c, "different seeds should give different draws");
}

#[test]
fn three_battles_follow_the_draw_formula() {
    let (arena, cooling) = bounds();
    let draws = draw_params(3, &arena, &cooling, &mut WyRand::from_seed(15u64.to_le_bytes()));

    // U1 before U2 for every sample.
    let mut check = WyRand::from_seed(15u64.to_le_bytes());
    for &(size, rate) in &draws {
        let u1 = uniform01(&mut check);
        let u2 = uniform01(&mut check);
        assert_eq!(size.to_bits(), (800.0 * (0.5 + 0.5 * u1)).to_bits());
        assert_eq!(rate.to_bits(), (0.5 * (0.2 + 0.8 * u2)).to_bits());
    }

    let set = sample(&draws, &linear_stub(), FailurePolicy::Abort).expect("stub never fails");
    assert_eq!(set.samples.len(), 3);
    assert!(set.skipped.is_empty());
    let normalizer = Normalizer::new([800.0, 0.5], 1000.0).expect("valid");
    for (s, &(size, rate)) in set.samples.iter().zip(draws.iter()) {
        assert_eq!(s.arena_size.to_bits(), size.to_bits());
        assert_eq!(s.cooling_rate.to_bits(), rate.to_bits());
        assert_eq!(s.duration, (100.0 * size / 800.0 + 50.0 * rate / 0.5).round());

        let n = normalizer.normalize(s);
        assert_eq!(n.target, s.duration / 1000.0);
        let [x1, x2] = n.inputs;
        assert!((0.5..=1.0).contains(&x1), "arena input {x1}");
        assert!((0.16..=1.0).contains(&x2), "cooling input {x2}");
        assert!(x2 >= 0.2 - 1e-12, "cooling input below its support: {x2}");
    }
}

#[test]
fn draws_stay_inside_the_engine_limits() {
    let (arena, cooling) = bounds();
    assert!(arena.validate().is_ok());
    assert!(cooling.validate().is_ok());

    let draws = draw_params(5_000, &arena, &cooling, &mut WyRand::from_seed(1u64.to_le_bytes()));
    for &(size, rate) in &draws {
        assert!(size >= arena.min_valid && size <= arena.max_range, "size {size}");
        assert!(rate >= cooling.min_valid && rate <= cooling.max_range, "rate {rate}");
    }
}

#[test]
fn bounds_reject_bad_maxima() {
    assert!(ParamBounds::arena_size(0.0).validate().is_err());
    assert!(ParamBounds::arena_size(-800.0).validate().is_err());
    assert!(ParamBounds::cooling_rate(f64::NAN).validate().is_err());
    // 600 * 0.5 = 300 would draw arenas below the 400 px minimum.
    assert!(ParamBounds::arena_size(600.0).validate().is_err());
}

/* ──────────────────────────────────────────────────────────────────────────
2) Scenario layout
────────────────────────────────────────────────────────────────────────── */

#[test]
fn obstacles_scale_with_the_square_of_the_arena() {
    assert_eq!(obstacle_count(400), 1);
    assert_eq!(obstacle_count(792), 6);
    assert_eq!(obstacle_count(799), 6);

    let s = Scenario::for_draw(792.7, 0.3);
    assert_eq!((s.width, s.height), (792, 792));
    assert_eq!(s.rounds, 1);
    assert_eq!(s.robots.len(), 7);

    let tracker = s.tracker().expect("tracker placed");
    assert_eq!(tracker.role, RobotRole::Tracker);
    assert_eq!(tracker.x, 2.0 * 792.7 / 3.0);
    assert_eq!(tracker.y, 792.7 / 2.0);

    let ys: Vec<f64> = s.obstacles().map(|o| o.y).collect();
    assert_eq!(ys.len(), 6);
    for (i, y) in ys.iter().enumerate() {
        assert_eq!(*y, (i + 1) as f64 * 792.7 / 7.0);
    }
    assert!(s.obstacles().all(|o| o.x == 792.7 / 3.0));
}

/* ──────────────────────────────────────────────────────────────────────────
3) Completion observer and failure policy
────────────────────────────────────────────────────────────────────────── */

struct Silent;
impl Simulator for Silent {
    fn run_battle(&self, _s: &Scenario, _o: &mut dyn CompletionObserver) -> Result<(), SimulationError> {
        Ok(())
    }
}

struct TwoRounds;
impl Simulator for TwoRounds {
    fn run_battle(&self, _s: &Scenario, o: &mut dyn CompletionObserver) -> Result<(), SimulationError> {
        o.record_duration(120.0);
        o.record_duration(340.0);
        Ok(())
    }
}

#[test]
fn observer_slot_validates_the_reported_duration() {
    let scenario = Scenario::for_draw(600.0, 0.3);
    assert_eq!(run_one(&Silent, &scenario), Err(SimulationError::NoDuration));
    assert_eq!(run_one(&TwoRounds, &scenario), Ok(340.0));

    let negative = FnSimulator(|_: &Scenario| -> Result<f64, SimulationError> { Ok(-3.0) });
    assert_eq!(run_one(&negative, &scenario), Err(SimulationError::InvalidDuration(-3.0)));

    let nan = FnSimulator(|_: &Scenario| -> Result<f64, SimulationError> { Ok(f64::NAN) });
    assert!(matches!(run_one(&nan, &scenario), Err(SimulationError::InvalidDuration(_))));
}

fn flaky() -> FnSimulator<impl Fn(&Scenario) -> Result<f64, SimulationError>> {
    FnSimulator(|s: &Scenario| {
        if s.cooling_rate > 0.3 {
            Err(SimulationError::Engine("robot crashed".into()))
        } else {
            Ok(500.0)
        }
    })
}

#[test]
fn skip_policy_drops_failed_battles_in_order() {
    let (arena, cooling) = bounds();
    let draws = draw_params(50, &arena, &cooling, &mut WyRand::from_seed(9u64.to_le_bytes()));
    let expected_skips: Vec<usize> = draws
        .iter()
        .enumerate()
        .filter(|(_, d)| d.1 > 0.3)
        .map(|(i, _)| i)
        .collect();
    assert!(!expected_skips.is_empty(), "seed should produce some failing draws");

    let set = sample(&draws, &flaky(), FailurePolicy::Skip).expect("skip never aborts");
    assert_eq!(set.skipped, expected_skips);
    assert_eq!(set.samples.len(), 50 - expected_skips.len());

    let kept: Vec<Sample> = draws
        .iter()
        .filter(|d| d.1 <= 0.3)
        .map(|&(arena_size, cooling_rate)| Sample { arena_size, cooling_rate, duration: 500.0 })
        .collect();
    assert_eq!(set.samples, kept);
}

#[test]
fn abort_policy_reports_the_first_failed_battle() {
    let (arena, cooling) = bounds();
    let draws = draw_params(50, &arena, &cooling, &mut WyRand::from_seed(9u64.to_le_bytes()));
    let first = draws.iter().position(|d| d.1 > 0.3).expect("some failing draw");

    match sample(&draws, &flaky(), FailurePolicy::Abort) {
        Err(Error::Simulation { index, source }) => {
            assert_eq!(index, first);
            assert_eq!(source, SimulationError::Engine("robot crashed".into()));
        }
        other => panic!("expected a simulation failure, got {:?}", other.map(|s| s.samples.len())),
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_sampling_matches_sequential() {
    use battle_surrogate::systems::sampler::sample_parallel;

    let (arena, cooling) = bounds();
    let draws = draw_params(300, &arena, &cooling, &mut WyRand::from_seed(3u64.to_le_bytes()));
    let seq = sample(&draws, &flaky(), FailurePolicy::Skip).expect("sequential");
    let par = sample_parallel(&draws, &flaky(), FailurePolicy::Skip).expect("parallel");
    assert_eq!(seq, par);
}
