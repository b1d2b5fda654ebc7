use super::defs::Continous;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

pub trait Weighted<S> {
    fn s(&self) -> S;

    fn p(&self) -> Continous;
}

/// Weighted draw over `probabilities`, which need not sum to 1.
///
/// `random_index(rng, &[0.2, 0.3, 0.5])` returns 0 with probability 0.2, 1 with
/// probability 0.3 and 2 with probability 0.5. `random_index(rng, &[1.0, 2.0])`
/// returns 0 with probability 1/3 and 1 with probability 2/3.
pub fn random_index<R: Rng + ?Sized>(rng: &mut R, probabilities: &[Continous]) -> usize {
    let dist = WeightedIndex::new(probabilities)
        .unwrap_or_else(|e| panic!("Cannot sample from weights {probabilities:?}: {e}"));
    dist.sample(rng)
}

pub fn pick_next<T, S, R>(rng: &mut R, ts: &[T]) -> S
where
    T: Weighted<S>,
    R: Rng + ?Sized,
{
    let ps = ts.iter().map(|t| t.p()).collect::<Vec<_>>();
    ts[random_index(rng, &ps)].s()
}
