//! Donation lottery for the GALA event app.
//!
//! Draws K winners uniformly at random from the participants whose
//! accumulated donation clears the configured threshold, then hands
//! back a [`RevealSession`] - a tiered, timer-driven state machine the
//! presentation layer drives to animate the reveal.

pub mod error;
pub mod reveal;
pub mod sampler;

pub use error::{LotteryError, Result};
pub use reveal::{BackgroundLine, Phase, RevealEvent, RevealSession, RevealTimings, Tier};
pub use sampler::{sample, sample_with};

use gala_core::Participant;
use rand::Rng;

/// Validate, draw and package one lottery run.
///
/// Validation order is fixed: winner count first, then pool emptiness,
/// then pool size. The returned session is `Idle`; starting the timed
/// reveal is the caller's responsibility, which keeps selection pure.
pub fn run_lottery(
    roster: &[Participant],
    minimum_donation: f64,
    requested_winners: usize,
) -> Result<RevealSession> {
    run_lottery_with(
        roster,
        minimum_donation,
        requested_winners,
        &mut rand::thread_rng(),
    )
}

/// [`run_lottery`] with an injected RNG for deterministic tests.
pub fn run_lottery_with<R: Rng + ?Sized>(
    roster: &[Participant],
    minimum_donation: f64,
    requested_winners: usize,
    rng: &mut R,
) -> Result<RevealSession> {
    if requested_winners < 1 {
        return Err(LotteryError::InvalidCount);
    }

    let eligible: Vec<Participant> = roster
        .iter()
        .filter(|p| p.donation >= minimum_donation)
        .cloned()
        .collect();

    if eligible.is_empty() {
        return Err(LotteryError::NoEligibleParticipants);
    }
    if requested_winners > eligible.len() {
        return Err(LotteryError::TooManyWinners {
            max: eligible.len(),
        });
    }

    let winners = sampler::sample_with(&eligible, requested_winners, rng)?;
    tracing::info!(
        "Drew {} winners from {} eligible donors",
        winners.len(),
        eligible.len()
    );

    RevealSession::new(winners, eligible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn roster_with_donations(donations: &[f64]) -> Vec<Participant> {
        donations
            .iter()
            .enumerate()
            .map(|(i, &donation)| {
                let mut p =
                    Participant::new(format!("QR-{:03}", i), format!("Name{}", i), "Donor");
                p.donation = donation;
                p
            })
            .collect()
    }

    #[test]
    fn zero_winners_rejected_before_pool_checks() {
        // even with an empty roster the count check fires first
        assert_eq!(
            run_lottery(&[], 500.0, 0).unwrap_err(),
            LotteryError::InvalidCount
        );
    }

    #[test]
    fn empty_eligible_pool_rejected() {
        let roster = roster_with_donations(&[0.0, 100.0, 499.9]);
        assert_eq!(
            run_lottery(&roster, 500.0, 1).unwrap_err(),
            LotteryError::NoEligibleParticipants
        );
    }

    #[test]
    fn too_many_winners_reports_the_maximum() {
        let roster = roster_with_donations(&[500.0, 500.0, 500.0, 500.0, 500.0]);
        assert_eq!(
            run_lottery(&roster, 500.0, 6).unwrap_err(),
            LotteryError::TooManyWinners { max: 5 }
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        let roster = roster_with_donations(&[499.99, 500.0]);
        let session = run_lottery(&roster, 500.0, 1).unwrap();
        assert_eq!(session.eligible().len(), 1);
        assert_eq!(session.winners()[0].qr_code, "QR-001");
    }

    #[test]
    fn tier_follows_winner_count() {
        let roster = roster_with_donations(&[600.0; 10]);
        let mut rng = StdRng::seed_from_u64(5);

        let tiers = [(1, Tier::Single), (2, Tier::Small), (5, Tier::Small), (6, Tier::Large)];
        for (k, tier) in tiers {
            let session = run_lottery_with(&roster, 500.0, k, &mut rng).unwrap();
            assert_eq!(session.tier(), tier, "k={}", k);
            assert_eq!(session.phase(), Phase::Idle);
        }
    }

    #[test]
    fn end_to_end_draw_from_mixed_roster() {
        // donations [0,500,600,500,1200,300,500]: eligible = 1,2,4,6
        let roster = roster_with_donations(&[0.0, 500.0, 600.0, 500.0, 1200.0, 300.0, 500.0]);
        let mut rng = StdRng::seed_from_u64(11);

        let session = run_lottery_with(&roster, 500.0, 2, &mut rng).unwrap();
        assert_eq!(session.tier(), Tier::Small);
        assert_eq!(session.winners().len(), 2);

        let eligible_keys: HashSet<&str> = ["QR-001", "QR-002", "QR-003", "QR-004", "QR-006"]
            .into_iter()
            .collect();
        assert_eq!(session.eligible().len(), 5);

        let winner_keys: HashSet<&str> =
            session.winners().iter().map(|w| w.qr_code.as_str()).collect();
        assert_eq!(winner_keys.len(), 2);
        assert!(winner_keys.is_subset(&eligible_keys));
    }
}
