use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Seeded shuffle of `0..n` split into (train, validation) index sets.
///
/// With at least two samples both sides are non-empty; a single sample goes
/// to training and validation is empty.
pub fn split_indices(n: usize, validation_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_val = if n < 2 {
        0
    } else {
        ((n as f64) * validation_fraction).round().clamp(1.0, (n - 1) as f64) as usize
    };
    let train = indices.split_off(n_val);

    log::debug!(
        "Dataset split: {} training, {} validation (seed {})",
        train.len(),
        indices.len(),
        seed
    );

    (train, indices)
}
