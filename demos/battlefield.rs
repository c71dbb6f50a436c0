// demos/battlefield.rs
// Run with:
//   RUST_LOG=info cargo run --release --example battlefield
//
// Stand-in duel engine: the tracker drives toward the nearest living
// obstacle and fires a power-3 bullet whenever its gun has cooled. The
// battle is over when the last obstacle is destroyed.

use battle_surrogate::systems::scenario::{Placement, Scenario};
use battle_surrogate::{
    BattlefieldHooks, PngSink, SimulationError, SurrogateConfig, TrainingHook, evaluate_battlefield,
};

const START_HEAT: f64 = 3.0;
/// Heat added by a power-3 shot: 1 + power / 5.
const SHOT_HEAT: f64 = 1.6;
/// Damage of a power-3 shot: 4 * power + 2 * (power - 1).
const SHOT_DAMAGE: f64 = 16.0;
/// Bullet speed for power 3: 20 - 3 * power.
const BULLET_SPEED: f64 = 11.0;
const ROBOT_ENERGY: f64 = 100.0;
const DRIVE_SPEED: f64 = 8.0;
const FIRING_RANGE: f64 = 150.0;
const TURN_LIMIT: u64 = 50_000;

struct Target {
    x: f64,
    y: f64,
    energy: f64,
    /// Damage already in flight.
    incoming: f64,
}

fn duel(scenario: &Scenario) -> Result<f64, SimulationError> {
    let Some(&Placement { x, y, .. }) = scenario.tracker() else {
        return Err(SimulationError::Engine("no tracker in scenario".into()));
    };
    let (mut tx, mut ty) = (x, y);
    let mut targets: Vec<Target> = scenario
        .obstacles()
        .map(|o| Target { x: o.x, y: o.y, energy: ROBOT_ENERGY, incoming: 0.0 })
        .collect();
    if targets.is_empty() {
        return Ok(0.0);
    }

    let mut heat = START_HEAT;
    let mut in_flight: Vec<(u64, usize)> = Vec::new();

    for turn in 1..=TURN_LIMIT {
        heat = (heat - scenario.cooling_rate).max(0.0);

        in_flight.retain(|&(hit_at, idx)| {
            if hit_at == turn {
                targets[idx].energy -= SHOT_DAMAGE;
                targets[idx].incoming -= SHOT_DAMAGE;
                false
            } else {
                true
            }
        });
        if targets.iter().all(|t| t.energy <= 0.0) {
            return Ok(turn as f64);
        }

        let aim = targets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.energy - t.incoming > 0.0)
            .map(|(i, t)| (i, (t.x - tx).hypot(t.y - ty)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((idx, dist)) = aim else { continue };

        if dist > FIRING_RANGE {
            let step = DRIVE_SPEED.min(dist - FIRING_RANGE);
            tx += step * (targets[idx].x - tx) / dist;
            ty += step * (targets[idx].y - ty) / dist;
        }
        if heat == 0.0 {
            heat += SHOT_HEAT;
            targets[idx].incoming += SHOT_DAMAGE;
            in_flight.push((turn + (dist / BULLET_SPEED).ceil().max(1.0) as u64, idx));
        }
    }
    Err(SimulationError::Timeout)
}

struct Progress;
impl TrainingHook for Progress {
    fn on_finish(&mut self, epochs: usize, final_error: f64) {
        println!("trained {epochs} epochs, final error {final_error:.6}");
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = SurrogateConfig {
        sample_count: 300,
        epoch_count: 5_000,
        ..SurrogateConfig::default()
    };
    let mut sink = PngSink::new("battlefield_surface.png");
    let hooks = BattlefieldHooks { training: vec![Box::new(Progress)] };

    match evaluate_battlefield(&cfg, &battle_surrogate::FnSimulator(duel), &mut sink, hooks) {
        Ok(out) => {
            println!("== Battlefield Outcome ==");
            println!("battles   -> {} ok, {} skipped", out.samples.samples.len(), out.samples.skipped.len());
            println!("error     -> {:.6} -> {:.6}", out.training.first_error, out.training.final_error);
            println!("overlay   -> {} plotted, {} dropped", out.render.plotted, out.render.dropped);
            match &out.image {
                Ok(()) => println!("image     -> {}", sink.path().display()),
                Err(e) => println!("image     -> not written: {e}"),
            }
        }
        Err(e) => {
            eprintln!("battlefield run failed: {e}");
            std::process::exit(1);
        }
    }
}
