//! Tiered reveal state machine. One `RevealSession` covers one draw:
//! it owns the winner set, the eligible snapshot used for decoration,
//! and a deadline schedule. The presentation layer drives it with
//! `start` / `trigger_reveal` / `tick` / `close` and renders the
//! returned events; nothing here touches a UI.

use crate::error::{LotteryError, Result};
use chrono::{DateTime, Duration, Utc};
use gala_core::Participant;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Reveal tier, selected by winner count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Single,
    Small,
    Large,
}

impl Tier {
    pub fn for_winner_count(k: usize) -> Tier {
        match k {
            1 => Tier::Single,
            2..=5 => Tier::Small,
            _ => Tier::Large,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    /// Single/Small: looping name scroll behind face-down cards.
    Scrolling,
    /// Large: looping carousel before the countdown starts.
    PreCountdown,
    /// Large: 3-2-1, one tick per second.
    Counting(u8),
    /// Single/Small: cards face up.
    Revealed,
    /// Large: full ranked winner list shown.
    ListRevealed,
    Closed,
}

/// What the presentation layer renders. Card flips and the celebration
/// are separate from phase changes because they fire on their own
/// staggered deadlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealEvent {
    PhaseChanged { from: Phase, to: Phase },
    CardFlipped { index: usize },
    Celebration,
}

#[derive(Debug, Clone)]
pub struct RevealTimings {
    /// Scrolling auto-reveals after this long if nobody presses the button.
    pub auto_reveal: Duration,
    /// Large tier: carousel auto-starts the countdown after this long.
    pub auto_countdown: Duration,
    /// Small tier: delay between consecutive card flips.
    pub card_stagger: Duration,
    /// Small tier: celebration fires this long after the reveal trigger.
    pub celebration_delay: Duration,
    /// Large tier: countdown tick interval.
    pub countdown_tick: Duration,
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            auto_reveal: Duration::milliseconds(5000),
            auto_countdown: Duration::milliseconds(3000),
            card_stagger: Duration::milliseconds(300),
            celebration_delay: Duration::milliseconds(500),
            countdown_tick: Duration::milliseconds(1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    AutoReveal,
    FlipCard(usize),
    Celebrate,
    CountdownTick,
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: DateTime<Utc>,
    action: Action,
}

/// A decorative scrolling line for the Small tier background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundLine {
    pub reverse: bool,
    pub names: Vec<String>,
}

pub struct RevealSession {
    id: Uuid,
    tier: Tier,
    phase: Phase,
    winners: Vec<Participant>,
    eligible: Vec<Participant>,
    timings: RevealTimings,
    schedule: Vec<Scheduled>,
    revealed: bool,
    celebrated: bool,
}

impl RevealSession {
    /// Build a session in `Idle`. Winners must be distinct and drawn
    /// from the eligible snapshot; violations are programming errors
    /// upstream and rejected here.
    pub fn new(winners: Vec<Participant>, eligible: Vec<Participant>) -> Result<Self> {
        if winners.is_empty() {
            return Err(LotteryError::InvalidState("empty winner set".to_string()));
        }

        let mut keys = HashSet::new();
        for w in &winners {
            if !keys.insert(w.qr_code.as_str()) {
                return Err(LotteryError::InvalidState(format!(
                    "duplicate winner {}",
                    w.qr_code
                )));
            }
            if !eligible.iter().any(|p| p.qr_code == w.qr_code) {
                return Err(LotteryError::InvalidState(format!(
                    "winner {} is not eligible",
                    w.qr_code
                )));
            }
        }

        let tier = Tier::for_winner_count(winners.len());
        Ok(Self {
            id: Uuid::new_v4(),
            tier,
            phase: Phase::Idle,
            winners,
            eligible,
            timings: RevealTimings::default(),
            schedule: Vec::new(),
            revealed: false,
            celebrated: false,
        })
    }

    pub fn with_timings(mut self, timings: RevealTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winners(&self) -> &[Participant] {
        &self.winners
    }

    pub fn eligible(&self) -> &[Participant] {
        &self.eligible
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    /// Earliest pending deadline, for drivers that sleep between ticks.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.schedule.iter().map(|s| s.due).min()
    }

    /// Leave `Idle`: Single/Small start scrolling with an auto-reveal
    /// deadline, Large starts the carousel with an auto-countdown
    /// deadline.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<Vec<RevealEvent>> {
        if self.phase != Phase::Idle {
            return Err(LotteryError::InvalidState(format!(
                "cannot start from {:?}",
                self.phase
            )));
        }

        let mut events = Vec::new();
        match self.tier {
            Tier::Single | Tier::Small => {
                self.transition(Phase::Scrolling, &mut events);
                self.schedule_at(now + self.timings.auto_reveal, Action::AutoReveal);
            }
            Tier::Large => {
                self.transition(Phase::PreCountdown, &mut events);
                self.schedule_at(now + self.timings.auto_countdown, Action::AutoReveal);
            }
        }

        tracing::info!("Reveal session {} started ({:?} tier)", self.id, self.tier);
        Ok(events)
    }

    /// Manual reveal action. Races the auto deadline: whichever fires
    /// first wins and cancels the other; outside its expected phase
    /// this is a no-op so double triggers cannot corrupt the session.
    pub fn trigger_reveal(&mut self, now: DateTime<Utc>) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        if self.reveal_pending() {
            self.reveal(now, &mut events);
            // flips scheduled at `now` land in the same batch
            self.run_due(now, &mut events);
        }
        events
    }

    /// Fire all deadlines that are due. Every action re-checks the
    /// current phase before acting, so a stale timer (one queued for a
    /// state the session already left) does nothing.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        self.run_due(now, &mut events);
        events
    }

    /// Terminal. Cancels every outstanding deadline; nothing fires
    /// after this.
    pub fn close(&mut self) -> Vec<RevealEvent> {
        self.schedule.clear();

        let mut events = Vec::new();
        if self.phase != Phase::Closed {
            self.transition(Phase::Closed, &mut events);
            tracing::info!("Reveal session {} closed", self.id);
        }
        events
    }

    // --- decoration view-models, built from the eligible snapshot ---

    /// Single tier: continuously looping name roll (list doubled so the
    /// loop point is seamless).
    pub fn scroll_names(&self) -> Vec<String> {
        let names: Vec<String> = self.eligible.iter().map(|p| p.full_name()).collect();
        let mut doubled = names.clone();
        doubled.extend(names);
        doubled
    }

    /// Small tier: three parallel scrolling lines, alternating
    /// direction, each the eligible list repeated five times.
    pub fn background_lines(&self) -> Vec<BackgroundLine> {
        let names: Vec<String> = self.eligible.iter().map(|p| p.full_name()).collect();
        (0..3)
            .map(|i| BackgroundLine {
                reverse: i % 2 == 1,
                names: names
                    .iter()
                    .cycle()
                    .take(names.len() * 5)
                    .cloned()
                    .collect(),
            })
            .collect()
    }

    /// Large tier: carousel items (doubled for a seamless loop).
    pub fn carousel_items(&self) -> Vec<String> {
        let items: Vec<String> = self.eligible.iter().map(|p| p.full_name()).collect();
        let mut doubled = items.clone();
        doubled.extend(items);
        doubled
    }

    // --- internals ---

    fn reveal_pending(&self) -> bool {
        matches!(
            (self.tier, self.phase),
            (Tier::Single, Phase::Scrolling)
                | (Tier::Small, Phase::Scrolling)
                | (Tier::Large, Phase::PreCountdown)
        )
    }

    /// The reveal transition shared by the manual trigger and the auto
    /// deadline. `at` anchors the follow-up deadlines.
    fn reveal(&mut self, at: DateTime<Utc>, events: &mut Vec<RevealEvent>) {
        // the losing side of the trigger/timeout race must not fire
        self.schedule.retain(|s| s.action != Action::AutoReveal);

        match self.tier {
            Tier::Single => {
                self.transition(Phase::Revealed, events);
                self.revealed = true;
                self.celebrate(events);
            }
            Tier::Small => {
                self.transition(Phase::Revealed, events);
                self.revealed = true;
                for index in 0..self.winners.len() {
                    self.schedule_at(
                        at + self.timings.card_stagger * index as i32,
                        Action::FlipCard(index),
                    );
                }
                self.schedule_at(at + self.timings.celebration_delay, Action::Celebrate);
            }
            Tier::Large => {
                self.transition(Phase::Counting(3), events);
                self.schedule_at(at + self.timings.countdown_tick, Action::CountdownTick);
            }
        }
    }

    fn run_due(&mut self, now: DateTime<Utc>, events: &mut Vec<RevealEvent>) {
        loop {
            let next = self
                .schedule
                .iter()
                .enumerate()
                .filter(|(_, s)| s.due <= now)
                .min_by_key(|(_, s)| s.due)
                .map(|(i, _)| i);

            let Some(index) = next else { break };
            let scheduled = self.schedule.remove(index);
            self.apply(scheduled, events);
        }
    }

    fn apply(&mut self, scheduled: Scheduled, events: &mut Vec<RevealEvent>) {
        match scheduled.action {
            Action::AutoReveal => {
                if self.reveal_pending() {
                    self.reveal(scheduled.due, events);
                }
            }
            Action::FlipCard(index) => {
                if self.tier == Tier::Small && self.phase == Phase::Revealed {
                    events.push(RevealEvent::CardFlipped { index });
                }
            }
            Action::Celebrate => {
                if self.phase == Phase::Revealed {
                    self.celebrate(events);
                }
            }
            Action::CountdownTick => {
                if let Phase::Counting(n) = self.phase {
                    if n > 1 {
                        self.transition(Phase::Counting(n - 1), events);
                        self.schedule_at(
                            scheduled.due + self.timings.countdown_tick,
                            Action::CountdownTick,
                        );
                    } else {
                        self.transition(Phase::ListRevealed, events);
                        self.revealed = true;
                        self.celebrate(events);
                    }
                }
            }
        }
    }

    fn celebrate(&mut self, events: &mut Vec<RevealEvent>) {
        // exactly once per session
        if !self.celebrated {
            self.celebrated = true;
            events.push(RevealEvent::Celebration);
        }
    }

    fn transition(&mut self, to: Phase, events: &mut Vec<RevealEvent>) {
        let from = self.phase;
        self.phase = to;
        tracing::debug!("Session {}: {:?} -> {:?}", self.id, from, to);
        events.push(RevealEvent::PhaseChanged { from, to });
    }

    fn schedule_at(&mut self, due: DateTime<Utc>, action: Action) {
        self.schedule.push(Scheduled { due, action });
    }
}

impl std::fmt::Debug for RevealSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealSession")
            .field("id", &self.id)
            .field("tier", &self.tier)
            .field("phase", &self.phase)
            .field("winners", &self.winners.len())
            .field("eligible", &self.eligible.len())
            .field("revealed", &self.revealed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 19, 0, 0).unwrap()
    }

    fn ms(n: i64) -> Duration {
        Duration::milliseconds(n)
    }

    fn participants(n: usize) -> Vec<Participant> {
        (0..n)
            .map(|i| {
                let mut p =
                    Participant::new(format!("QR-{:03}", i), format!("Name{}", i), "Donor");
                p.donation = 500.0 + i as f64;
                p
            })
            .collect()
    }

    fn session(k: usize, pool: usize) -> RevealSession {
        let eligible = participants(pool);
        let winners = eligible[..k].to_vec();
        RevealSession::new(winners, eligible).unwrap()
    }

    fn phases(events: &[RevealEvent]) -> Vec<Phase> {
        events
            .iter()
            .filter_map(|e| match e {
                RevealEvent::PhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    fn celebrations(events: &[RevealEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, RevealEvent::Celebration))
            .count()
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(Tier::for_winner_count(1), Tier::Single);
        assert_eq!(Tier::for_winner_count(2), Tier::Small);
        assert_eq!(Tier::for_winner_count(5), Tier::Small);
        assert_eq!(Tier::for_winner_count(6), Tier::Large);
        assert_eq!(Tier::for_winner_count(100), Tier::Large);
    }

    #[test]
    fn new_rejects_duplicate_winners() {
        let eligible = participants(3);
        let winners = vec![eligible[0].clone(), eligible[0].clone()];
        assert!(matches!(
            RevealSession::new(winners, eligible).unwrap_err(),
            LotteryError::InvalidState(_)
        ));
    }

    #[test]
    fn new_rejects_winner_outside_eligible() {
        let eligible = participants(3);
        let winners = vec![Participant::new("QR-999", "Ghost", "Entry")];
        assert!(matches!(
            RevealSession::new(winners, eligible).unwrap_err(),
            LotteryError::InvalidState(_)
        ));
    }

    #[test]
    fn start_twice_is_an_error() {
        let mut s = session(1, 3);
        s.start(t0()).unwrap();
        assert!(s.start(t0()).is_err());
    }

    #[test]
    fn single_auto_reveals_after_timeout() {
        let mut s = session(1, 4);
        let events = s.start(t0()).unwrap();
        assert_eq!(phases(&events), vec![Phase::Scrolling]);

        // not due yet
        assert!(s.tick(t0() + ms(4999)).is_empty());
        assert_eq!(s.phase(), Phase::Scrolling);

        let events = s.tick(t0() + ms(5000));
        assert_eq!(phases(&events), vec![Phase::Revealed]);
        assert_eq!(celebrations(&events), 1);
        assert!(s.is_revealed());
    }

    #[test]
    fn manual_reveal_cancels_the_timeout() {
        let mut s = session(1, 4);
        s.start(t0()).unwrap();

        let events = s.trigger_reveal(t0() + ms(1000));
        assert_eq!(phases(&events), vec![Phase::Revealed]);
        assert_eq!(celebrations(&events), 1);

        // the original 5000ms deadline must now be a no-op
        let stale = s.tick(t0() + ms(6000));
        assert!(stale.is_empty());
        assert_eq!(s.phase(), Phase::Revealed);
    }

    #[test]
    fn timeout_then_manual_trigger_is_a_no_op() {
        let mut s = session(1, 4);
        s.start(t0()).unwrap();

        let auto = s.tick(t0() + ms(5000));
        assert_eq!(celebrations(&auto), 1);

        let manual = s.trigger_reveal(t0() + ms(5001));
        assert!(manual.is_empty());
        assert_eq!(s.phase(), Phase::Revealed);
    }

    #[test]
    fn small_tier_staggers_flips_and_delays_celebration() {
        let mut s = session(3, 6);
        s.start(t0()).unwrap();

        let trigger_at = t0() + ms(2000);
        let events = s.trigger_reveal(trigger_at);
        // phase change plus the zero-delay first flip
        assert_eq!(phases(&events), vec![Phase::Revealed]);
        assert_eq!(events.last(), Some(&RevealEvent::CardFlipped { index: 0 }));

        // card 1 at +300ms
        let events = s.tick(trigger_at + ms(300));
        assert_eq!(events, vec![RevealEvent::CardFlipped { index: 1 }]);

        // celebration at +500ms, before the last flip at +600ms
        let events = s.tick(trigger_at + ms(500));
        assert_eq!(events, vec![RevealEvent::Celebration]);

        let events = s.tick(trigger_at + ms(600));
        assert_eq!(events, vec![RevealEvent::CardFlipped { index: 2 }]);

        // nothing left
        assert!(s.tick(trigger_at + ms(10_000)).is_empty());
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn small_tier_late_tick_delivers_everything_in_order() {
        let mut s = session(2, 5);
        s.start(t0()).unwrap();

        // let the auto deadline and all follow-ups lapse, then tick once
        let events = s.tick(t0() + ms(60_000));
        assert_eq!(phases(&events), vec![Phase::Revealed]);
        let flips: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                RevealEvent::CardFlipped { index } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(flips, vec![0, 1]);
        assert_eq!(celebrations(&events), 1);
    }

    #[test]
    fn large_tier_counts_down_to_the_winner_list() {
        let mut s = session(6, 10);
        let events = s.start(t0()).unwrap();
        assert_eq!(phases(&events), vec![Phase::PreCountdown]);

        // carousel auto-starts the countdown at 3000ms
        let events = s.tick(t0() + ms(3000));
        assert_eq!(phases(&events), vec![Phase::Counting(3)]);

        let events = s.tick(t0() + ms(4000));
        assert_eq!(phases(&events), vec![Phase::Counting(2)]);
        let events = s.tick(t0() + ms(5000));
        assert_eq!(phases(&events), vec![Phase::Counting(1)]);

        let events = s.tick(t0() + ms(6000));
        assert_eq!(phases(&events), vec![Phase::ListRevealed]);
        assert_eq!(celebrations(&events), 1);
        assert!(s.is_revealed());
    }

    #[test]
    fn close_during_countdown_cancels_everything() {
        let mut s = session(6, 10);
        s.start(t0()).unwrap();
        s.trigger_reveal(t0() + ms(500));
        s.tick(t0() + ms(1500)); // Counting(2)
        assert_eq!(s.phase(), Phase::Counting(2));

        let events = s.close();
        assert_eq!(phases(&events), vec![Phase::Closed]);
        assert_eq!(s.next_deadline(), None);

        // well past every original deadline: no transition, no effect
        let events = s.tick(t0() + ms(120_000));
        assert!(events.is_empty());
        assert_eq!(s.phase(), Phase::Closed);
        assert!(!s.is_revealed());
    }

    #[test]
    fn close_is_idempotent() {
        let mut s = session(1, 2);
        s.start(t0()).unwrap();
        assert_eq!(s.close().len(), 1);
        assert!(s.close().is_empty());
        assert!(s.trigger_reveal(t0() + ms(9000)).is_empty());
    }

    #[test]
    fn celebration_fires_exactly_once_per_session() {
        let mut s = session(1, 3);
        s.start(t0()).unwrap();

        let mut total = 0;
        total += celebrations(&s.trigger_reveal(t0() + ms(100)));
        total += celebrations(&s.trigger_reveal(t0() + ms(200)));
        total += celebrations(&s.tick(t0() + ms(5000)));
        total += celebrations(&s.tick(t0() + ms(10_000)));
        assert_eq!(total, 1);
    }

    #[test]
    fn decoration_shapes() {
        let s = session(2, 4);
        assert_eq!(s.scroll_names().len(), 8);
        assert_eq!(s.carousel_items().len(), 8);

        let lines = s.background_lines();
        assert_eq!(lines.len(), 3);
        assert!(!lines[0].reverse);
        assert!(lines[1].reverse);
        assert!(!lines[2].reverse);
        assert_eq!(lines[0].names.len(), 20);
    }

    #[test]
    fn next_deadline_tracks_the_schedule() {
        let mut s = session(1, 2);
        assert_eq!(s.next_deadline(), None);
        s.start(t0()).unwrap();
        assert_eq!(s.next_deadline(), Some(t0() + ms(5000)));
        s.trigger_reveal(t0() + ms(100));
        assert_eq!(s.next_deadline(), None);
    }
}
