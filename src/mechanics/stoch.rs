/// Stochastic mechanics: uniform draws from a seeded generator.
/// Note: draws take `&mut R: RngCore` so one `bevy_prng::WyRand` can be
/// threaded through parameter sampling and weight initialisation in order.
use rand_core::RngCore;

/// Uniform [0,1) from the top 53 bits of a single `next_u64`.
#[inline]
pub fn uniform01<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    ((rng.next_u64() >> 11) as f64) / ((1u64 << 53) as f64)
}

/// Uniform [lo, hi).
#[inline]
pub fn uniform_range<R: RngCore + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * uniform01(rng)
}

/// Affine draw inside a bounded range: max * (offset + scale * u).
#[inline]
pub fn affine_draw(max: f64, offset: f64, scale: f64, u: f64) -> f64 {
    max * (offset + scale * u)
}
