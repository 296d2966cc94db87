//! Simple random sampling without replacement: repeatedly pick a
//! uniform index from the remaining working copy and remove it. Every
//! participant has equal probability; nobody can win twice.

use crate::error::{LotteryError, Result};
use gala_core::Participant;
use rand::Rng;

/// Draw `k` distinct winners from `pool` with the thread-local RNG.
pub fn sample(pool: &[Participant], k: usize) -> Result<Vec<Participant>> {
    sample_with(pool, k, &mut rand::thread_rng())
}

/// Draw with an injected RNG so tests can pin the outcome.
///
/// The pool itself is never mutated.
pub fn sample_with<R: Rng + ?Sized>(
    pool: &[Participant],
    k: usize,
    rng: &mut R,
) -> Result<Vec<Participant>> {
    if pool.is_empty() {
        return Err(LotteryError::EmptyPool);
    }
    if k == 0 {
        return Err(LotteryError::InvalidCount);
    }
    if k > pool.len() {
        return Err(LotteryError::InsufficientPool {
            requested: k,
            available: pool.len(),
        });
    }

    let mut remaining: Vec<Participant> = pool.to_vec();
    let mut winners = Vec::with_capacity(k);

    for _ in 0..k {
        let index = rng.gen_range(0..remaining.len());
        winners.push(remaining.remove(index));
    }

    Ok(winners)
}
