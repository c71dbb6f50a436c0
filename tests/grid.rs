// tests/grid.rs
use battle_surrogate::mechanics::{coord, round_half_up};
use battle_surrogate::systems::grid::{GridSpec, PredictionGrid, evaluate};
use battle_surrogate::systems::normalizer::NormalizedSample;
use battle_surrogate::systems::rprop::Rprop;
use battle_surrogate::systems::trainer::{FrozenNetwork, Hyper, train};
use bevy_prng::WyRand;
use rand_core::SeedableRng;

fn small_net(epochs: usize) -> FrozenNetwork {
    let data: Vec<NormalizedSample> = (0..20)
        .map(|i| {
            let t = i as f64 / 20.0;
            NormalizedSample { inputs: [0.5 + 0.5 * t, 0.2 + 0.8 * t], target: 0.1 + 0.6 * t }
        })
        .collect();
    let hyper = Hyper { num_inputs: 2, num_hidden: 5, num_epochs: epochs };
    let mut rng = WyRand::from_seed(15u64.to_le_bytes());
    train(&data, &hyper, Rprop::default(), &mut rng, &mut [], 0).expect("trains").0
}

/* ──────────────────────────────────────────────────────────────────────────
1) Coordinates
────────────────────────────────────────────────────────────────────────── */

#[test]
fn coordinates_cover_the_window_in_order() {
    let spec = GridSpec { rows: 601, cols: 501 };
    assert_eq!(spec.cells(), 601 * 501);

    assert_eq!(spec.row_coord(0), 0.1);
    assert_eq!(spec.col_coord(0), 0.1);
    let rows: Vec<f64> = (0..spec.rows).map(|k| spec.row_coord(k)).collect();
    let cols: Vec<f64> = (0..spec.cols).map(|k| spec.col_coord(k)).collect();
    for axis in [&rows, &cols] {
        assert!(axis.iter().all(|c| (0.1..1.0).contains(c)));
        assert!(axis.windows(2).all(|w| w[0] < w[1]));
    }

    let all: Vec<[f64; 2]> = spec.coords().collect();
    assert_eq!(all.len(), spec.cells());
    assert_eq!(all[0], [0.1, 0.1]);
    assert_eq!(all[1], [0.1, coord(1, 501)]);
    assert_eq!(all[501], [coord(1, 601), 0.1]);
}

#[test]
fn cell_index_inverts_the_coordinates() {
    let spec = GridSpec { rows: 601, cols: 501 };
    for row in (0..601).step_by(37) {
        for col in (0..501).step_by(29) {
            let idx = spec.cell_index([spec.row_coord(row), spec.col_coord(col)]);
            assert_eq!(idx, Some(col + row * 501));
        }
    }
}

#[test]
fn cell_index_rounds_half_up_and_rejects_outside() {
    assert_eq!(round_half_up(2.5), 3);
    assert_eq!(round_half_up(-2.5), -2);
    assert_eq!(round_half_up(-0.6), -1);

    let spec = GridSpec { rows: 10, cols: 10 };
    assert_eq!(spec.cell_index([0.1, 0.1]), Some(0));
    assert_eq!(spec.cell_index([0.0, 0.0]), None);
    assert_eq!(spec.cell_index([1.5, 0.5]), None);
    // one row past the end
    assert_eq!(spec.cell_index([1.0, 0.1]), None);
    // column 10 of row 2 is flat index 30, i.e. the start of row 3
    assert_eq!(spec.cell_index([coord(2, 10), 1.0]), Some(30));
}

/* ──────────────────────────────────────────────────────────────────────────
2) Evaluation
────────────────────────────────────────────────────────────────────────── */

#[test]
fn every_cell_holds_the_network_output() {
    let net = small_net(50);
    let spec = GridSpec { rows: 61, cols: 51 };
    let grid = evaluate(&net, spec);

    assert_eq!(grid.values().len(), spec.cells());
    for (v, x) in grid.values().iter().zip(spec.coords()) {
        assert_eq!(v.to_bits(), net.compute(&x).to_bits());
        assert!((0.0..=1.0).contains(v));
    }
    assert_eq!(grid.get(3, 7), Some(net.compute(&[spec.row_coord(3), spec.col_coord(7)])));
    assert_eq!(grid.get(61, 0), None);
}

#[test]
fn evaluation_is_deterministic() {
    let spec = GridSpec { rows: 40, cols: 30 };
    let a = evaluate(&small_net(20), spec);
    let b = evaluate(&small_net(20), spec);
    assert_eq!(a, b);
}

#[test]
fn grid_cells_can_be_overwritten_by_flat_index() {
    let spec = GridSpec { rows: 2, cols: 3 };
    assert!(PredictionGrid::from_values(spec, vec![0.0; 5]).is_none());

    let mut grid = PredictionGrid::from_values(spec, vec![0.0; 6]).expect("6 cells");
    assert!(grid.set_flat(4, 0.7));
    assert_eq!(grid.get(1, 1), Some(0.7));
    assert!(!grid.set_flat(6, 0.9));
    assert_eq!(grid.values(), &[0.0, 0.0, 0.0, 0.0, 0.7, 0.0]);
}
