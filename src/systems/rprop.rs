//! Resilient propagation (iRPROP+).
//!
//! Each weight keeps its own step size. Only the sign of the gradient moves
//! the weight; its magnitude never does.
//!
//! - same sign as last epoch: step *= 1.2 (capped), move against the gradient
//! - sign flipped: step *= 0.5 (floored), undo the last move if the epoch
//!   error went up, and forget the gradient so the next epoch moves again.
//!   The undo itself is recorded as the last move (zero when nothing was
//!   undone).
//! - either gradient zero: move by the current step against the gradient

use crate::systems::sdk::Optimizer;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RpropParams {
    pub initial_step: f64,
    pub max_step: f64,
    pub min_step: f64,
    pub increase: f64,
    pub decrease: f64,
    /// Gradients smaller than this count as zero.
    pub zero_tolerance: f64,
}

impl Default for RpropParams {
    fn default() -> Self {
        Self {
            initial_step: 0.1,
            max_step: 50.0,
            min_step: 1e-6,
            increase: 1.2,
            decrease: 0.5,
            zero_tolerance: 1e-17,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Rprop {
    params: RpropParams,
    steps: Vec<f64>,
    last_grads: Vec<f64>,
    last_moves: Vec<f64>,
    last_error: f64,
}

impl Default for Rprop {
    fn default() -> Self {
        Self::new(RpropParams::default())
    }
}

impl Rprop {
    pub fn new(params: RpropParams) -> Self {
        Self {
            params,
            steps: Vec::new(),
            last_grads: Vec::new(),
            last_moves: Vec::new(),
            last_error: f64::INFINITY,
        }
    }

    /// Current per-weight step sizes (empty before the first step).
    pub fn steps(&self) -> &[f64] {
        &self.steps
    }

    /// Weight change applied to each weight by the last step.
    pub fn last_moves(&self) -> &[f64] {
        &self.last_moves
    }

    #[inline]
    fn sign(&self, x: f64) -> f64 {
        if x.abs() < self.params.zero_tolerance {
            0.0
        } else if x > 0.0 {
            1.0
        } else {
            -1.0
        }
    }
}

impl Optimizer for Rprop {
    fn step(&mut self, weights: &mut [f64], gradients: &[f64], error: f64) {
        let n = weights.len();
        if self.steps.len() != n {
            self.steps = vec![self.params.initial_step; n];
            self.last_grads = vec![0.0; n];
            self.last_moves = vec![0.0; n];
        }
        let p = self.params;
        let error_rose = error > self.last_error;

        for i in 0..n {
            let g = gradients[i];
            let change = self.sign(g * self.last_grads[i]);

            if change > 0.0 {
                self.steps[i] = (self.steps[i] * p.increase).min(p.max_step);
                let mv = -self.sign(g) * self.steps[i];
                weights[i] += mv;
                self.last_moves[i] = mv;
                self.last_grads[i] = g;
            } else if change < 0.0 {
                self.steps[i] = (self.steps[i] * p.decrease).max(p.min_step);
                let undo = if error_rose { -self.last_moves[i] } else { 0.0 };
                weights[i] += undo;
                self.last_moves[i] = undo;
                self.last_grads[i] = 0.0;
            } else {
                let mv = -self.sign(g) * self.steps[i];
                weights[i] += mv;
                self.last_moves[i] = mv;
                self.last_grads[i] = g;
            }
        }
        self.last_error = error;
    }
}
