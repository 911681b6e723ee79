//! Random train/test partitioning.

use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffle a copy of `data` and cut it into fractions `[prob, 1 - prob]`.
///
/// The cut index is `floor(len * prob)`; `prob` is clamped into `[0, 1]`. The
/// two halves are disjoint and together hold every input element exactly once.
/// Pass a seeded RNG (`StdRng::seed_from_u64`) for a reproducible split.
pub fn split_data<T, R>(data: &[T], prob: f64, rng: &mut R) -> (Vec<T>, Vec<T>)
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut shuffled = data.to_vec();
    shuffled.shuffle(rng);

    let prob = if prob.is_nan() { 0.0 } else { prob.clamp(0.0, 1.0) };
    let cut = ((shuffled.len() as f64) * prob).floor() as usize;
    let rest = shuffled.split_off(cut.min(shuffled.len()));
    (shuffled, rest)
}
