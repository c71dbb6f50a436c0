//! Surrogate trainer: a `inputs → hidden → 1` sigmoid regressor fitted by
//! full-batch epochs against mean-squared error.
//!
//! Lifecycle is carried by the types. `Trainer::new` builds and randomises the
//! network, `iteration` runs one epoch, `finish` consumes the trainer and
//! hands back a `FrozenNetwork`, which is the only thing that can be
//! evaluated on the grid.

use log::{debug, info};
use rand_core::RngCore;

use crate::error::{ConfigError, Error, Result};
use crate::mechanics::{sigmoid, sigmoid_slope, stoch};
use crate::systems::normalizer::NormalizedSample;
use crate::systems::sdk::{Optimizer, TrainingHook};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hyper {
    pub num_inputs: usize,
    pub num_hidden: usize,
    pub num_epochs: usize,
}

/// Weights are stored flat: for each hidden neuron its input weights then
/// its bias, followed by the output neuron's hidden weights then its bias.
#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    num_inputs: usize,
    num_hidden: usize,
    weights: Vec<f64>,
}

impl Network {
    pub fn weight_count(num_inputs: usize, num_hidden: usize) -> usize {
        num_hidden * (num_inputs + 1) + num_hidden + 1
    }

    /// Every weight and bias uniform in [-1, 1).
    pub fn random<R: RngCore + ?Sized>(num_inputs: usize, num_hidden: usize, rng: &mut R) -> Self {
        let weights = (0..Self::weight_count(num_inputs, num_hidden))
            .map(|_| stoch::uniform_range(rng, -1.0, 1.0))
            .collect();
        Self { num_inputs, num_hidden, weights }
    }

    /// `None` if `weights` has the wrong length for the layer widths.
    pub fn from_weights(num_inputs: usize, num_hidden: usize, weights: Vec<f64>) -> Option<Self> {
        (weights.len() == Self::weight_count(num_inputs, num_hidden))
            .then_some(Self { num_inputs, num_hidden, weights })
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_hidden(&self) -> usize {
        self.num_hidden
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    fn output_offset(&self) -> usize {
        self.num_hidden * (self.num_inputs + 1)
    }

    #[inline]
    fn hidden_activation(&self, h: usize, input: &[f64]) -> f64 {
        let stride = self.num_inputs + 1;
        let row = &self.weights[h * stride..(h + 1) * stride];
        let (w, bias) = row.split_at(self.num_inputs);
        let sum: f64 = w.iter().zip(input).map(|(w, x)| w * x).sum();
        sigmoid(sum + bias[0])
    }

    pub fn compute(&self, input: &[f64]) -> f64 {
        let out = &self.weights[self.output_offset()..];
        let mut sum = out[self.num_hidden];
        for h in 0..self.num_hidden {
            sum += out[h] * self.hidden_activation(h, input);
        }
        sigmoid(sum)
    }

    /// MSE over `data`; dMSE/dw is written into `grads`.
    fn gradient(&self, data: &[NormalizedSample], grads: &mut [f64], hidden: &mut [f64]) -> f64 {
        let stride = self.num_inputs + 1;
        let off = self.output_offset();
        let out_w = &self.weights[off..];

        grads.fill(0.0);
        let mut sse = 0.0;
        for s in data {
            let mut sum = out_w[self.num_hidden];
            for h in 0..self.num_hidden {
                hidden[h] = self.hidden_activation(h, &s.inputs);
                sum += out_w[h] * hidden[h];
            }
            let y = sigmoid(sum);
            let err = y - s.target;
            sse += err * err;

            let delta_o = err * sigmoid_slope(y);
            for h in 0..self.num_hidden {
                grads[off + h] += delta_o * hidden[h];
                let delta_h = delta_o * out_w[h] * sigmoid_slope(hidden[h]);
                let g = &mut grads[h * stride..(h + 1) * stride];
                for (gi, x) in g.iter_mut().zip(s.inputs.iter()) {
                    *gi += delta_h * x;
                }
                g[self.num_inputs] += delta_h;
            }
            grads[off + self.num_hidden] += delta_o;
        }

        let n = data.len() as f64;
        for g in grads.iter_mut() {
            *g *= 2.0 / n;
        }
        sse / n
    }
}

/// A trained network. Read-only; safe to share across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct FrozenNetwork(Network);

impl FrozenNetwork {
    #[inline]
    pub fn compute(&self, input: &[f64]) -> f64 {
        self.0.compute(input)
    }

    pub fn network(&self) -> &Network {
        &self.0
    }
}

pub struct Trainer<'a, O: Optimizer> {
    network: Network,
    data: &'a [NormalizedSample],
    optimizer: O,
    grads: Vec<f64>,
    hidden: Vec<f64>,
    epoch: usize,
    error: Option<f64>,
}

impl<'a, O: Optimizer> Trainer<'a, O> {
    pub fn new<R: RngCore + ?Sized>(
        data: &'a [NormalizedSample],
        hyper: &Hyper,
        optimizer: O,
        rng: &mut R,
    ) -> Result<Self> {
        let Some(first) = data.first() else {
            return Err(Error::InvalidDataset("no samples to train on".into()));
        };
        if first.inputs.len() != hyper.num_inputs {
            return Err(Error::InvalidDataset(format!(
                "samples carry {} inputs, network expects {}",
                first.inputs.len(),
                hyper.num_inputs
            )));
        }
        if hyper.num_hidden == 0 {
            return Err(ConfigError::ZeroHiddenWidth.into());
        }
        if let Some(i) = data
            .iter()
            .position(|s| !(s.target.is_finite() && s.inputs.iter().all(|x| x.is_finite())))
        {
            return Err(Error::InvalidDataset(format!("sample {i} is not finite")));
        }

        let network = Network::random(hyper.num_inputs, hyper.num_hidden, rng);
        let n_weights = network.weights.len();
        Ok(Self {
            network,
            data,
            optimizer,
            grads: vec![0.0; n_weights],
            hidden: vec![0.0; hyper.num_hidden],
            epoch: 0,
            error: None,
        })
    }

    pub fn epochs_run(&self) -> usize {
        self.epoch
    }

    /// MSE of the last completed epoch.
    pub fn error(&self) -> Option<f64> {
        self.error
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// One full-batch epoch. Returns the MSE measured before the update.
    pub fn iteration(&mut self) -> Result<f64> {
        let error = self.network.gradient(self.data, &mut self.grads, &mut self.hidden);
        if !error.is_finite() {
            return Err(Error::TrainingDivergence { epoch: self.epoch + 1, error });
        }
        self.optimizer.step(&mut self.network.weights, &self.grads, error);
        self.epoch += 1;
        self.error = Some(error);
        Ok(error)
    }

    pub fn finish(self) -> FrozenNetwork {
        FrozenNetwork(self.network)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingReport {
    pub epochs: usize,
    pub first_error: f64,
    pub final_error: f64,
}

/// Run exactly `hyper.num_epochs` epochs and freeze the result.
pub fn train<O: Optimizer, R: RngCore + ?Sized>(
    data: &[NormalizedSample],
    hyper: &Hyper,
    optimizer: O,
    rng: &mut R,
    hooks: &mut [Box<dyn TrainingHook>],
    log_every: usize,
) -> Result<(FrozenNetwork, TrainingReport)> {
    if hyper.num_epochs == 0 {
        return Err(ConfigError::ZeroEpochCount.into());
    }
    let mut trainer = Trainer::new(data, hyper, optimizer, rng)?;

    let mut first_error = f64::NAN;
    let mut final_error = f64::NAN;
    for epoch in 1..=hyper.num_epochs {
        let error = trainer.iteration()?;
        if epoch == 1 {
            first_error = error;
        }
        final_error = error;
        debug!("epoch #{epoch} error: {error}");
        if log_every > 0 && epoch % log_every == 0 {
            info!("epoch #{epoch}/{} error: {error:.6}", hyper.num_epochs);
        }
        for h in hooks.iter_mut() {
            h.on_epoch(epoch, error);
        }
    }
    for h in hooks.iter_mut() {
        h.on_finish(hyper.num_epochs, final_error);
    }

    let report = TrainingReport { epochs: trainer.epochs_run(), first_error, final_error };
    Ok((trainer.finish(), report))
}
