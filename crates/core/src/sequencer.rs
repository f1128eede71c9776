//! Reveal sequencer: runs N reels against one winner and reports a single reveal.
//!
//! Every cycle gets a fresh [`Epoch`]. Reels only accept events carrying the
//! current epoch, so a late event from a superseded or cancelled cycle can
//! neither advance the completion counter nor trigger a reveal. The counter is
//! only advanced by a reel's first `Settled` update, so duplicate deliveries
//! are harmless and arrival order does not matter.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Hero};
use crate::reel::{build_strip, Epoch, Reel, ReelEvent, ReelUpdate, ScheduledEvent};

pub const DEFAULT_REEL_COUNT: usize = 3;
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(300);
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(4500);
pub const DEFAULT_REVEAL_PAUSE: Duration = Duration::from_millis(300);
pub const DEFAULT_FLASH: Duration = Duration::from_millis(400);

/// Most reels a sequencer will run.
pub const MAX_REEL_COUNT: usize = 32;
/// Longest accepted value for any single timing.
pub const MAX_TIMING: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotteryPhase {
    #[default]
    Idle,
    Spinning,
    Revealed,
}

/// Reel count and timings for a sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerConfig {
    pub reels: usize,
    /// Extra launch delay for each successive reel.
    pub stagger: Duration,
    /// Time a reel scrolls before it settles.
    pub settle: Duration,
    /// Cosmetic pause between the last reel settling and the result card.
    pub reveal_pause: Duration,
    /// Length of the flash shown on reveal.
    pub flash: Duration,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        SequencerConfig {
            reels: DEFAULT_REEL_COUNT,
            stagger: DEFAULT_STAGGER,
            settle: DEFAULT_SETTLE,
            reveal_pause: DEFAULT_REVEAL_PAUSE,
            flash: DEFAULT_FLASH,
        }
    }
}

impl SequencerConfig {
    /// Same reel count, every timing zeroed.
    pub fn instant(self) -> Self {
        SequencerConfig {
            reels: self.reels,
            stagger: Duration::ZERO,
            settle: Duration::ZERO,
            reveal_pause: Duration::ZERO,
            flash: Duration::ZERO,
        }
    }
}

/// Events a driver must deliver for one cycle, ordered by delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinPlan {
    pub epoch: Epoch,
    pub events: Vec<ScheduledEvent>,
}

/// Emitted exactly once per cycle, when the last reel settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub epoch: Epoch,
    pub winner: Hero,
    pub pause: Duration,
    pub flash: Duration,
}

#[derive(Debug, Clone)]
pub struct RevealSequencer {
    config: SequencerConfig,
    reels: Vec<Reel>,
    epoch: Epoch,
    phase: LotteryPhase,
    completed: usize,
    winner: Option<Hero>,
}

impl RevealSequencer {
    /// The reel count is clamped to `1..=MAX_REEL_COUNT`.
    pub fn new(config: SequencerConfig) -> Self {
        let count = config.reels.clamp(1, MAX_REEL_COUNT);
        RevealSequencer {
            config: SequencerConfig {
                reels: count,
                ..config
            },
            reels: (0..count).map(Reel::new).collect(),
            epoch: Epoch::default(),
            phase: LotteryPhase::Idle,
            completed: 0,
            winner: None,
        }
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn phase(&self) -> LotteryPhase {
        self.phase
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Reels that have settled in the current cycle.
    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn winner(&self) -> Option<&Hero> {
        self.winner.as_ref()
    }

    /// Begin a new cycle, superseding any cycle still in flight.
    pub fn start<R: Rng + ?Sized>(&mut self, winner: &Hero, catalog: &Catalog, rng: &mut R) -> SpinPlan {
        if self.phase == LotteryPhase::Spinning {
            tracing::debug!(epoch = self.epoch.value(), "superseding spin in flight");
        }
        self.epoch = self.epoch.next();
        self.completed = 0;
        self.phase = LotteryPhase::Spinning;
        self.winner = Some(winner.clone());

        let epoch = self.epoch;
        let mut events = Vec::with_capacity(self.reels.len() * 2);
        for (i, reel) in self.reels.iter_mut().enumerate() {
            let strip = build_strip(catalog, winner, rng);
            let step = u32::try_from(i).unwrap_or(u32::MAX);
            let delay = self.config.stagger.saturating_mul(step);
            events.extend(reel.spin(epoch, Some(strip), delay, self.config.settle));
        }
        events.sort_by_key(|e| e.after);

        tracing::debug!(
            epoch = epoch.value(),
            hero = %winner.name,
            reels = self.reels.len(),
            "spin started"
        );
        SpinPlan { epoch, events }
    }

    /// Apply one timed event. Returns the reveal when this event completes the cycle.
    pub fn handle(&mut self, event: &ReelEvent) -> Option<Reveal> {
        if event.epoch != self.epoch || self.phase != LotteryPhase::Spinning {
            tracing::debug!(
                event_epoch = event.epoch.value(),
                current_epoch = self.epoch.value(),
                reel = event.reel,
                "dropping stale reel event"
            );
            return None;
        }
        let Some(reel) = self.reels.get_mut(event.reel) else {
            tracing::warn!(reel = event.reel, "event for unknown reel");
            return None;
        };

        match reel.handle(event) {
            ReelUpdate::Settled => {
                self.completed += 1;
                tracing::debug!(reel = event.reel, completed = self.completed, "reel settled");
            }
            ReelUpdate::Launched => {
                tracing::debug!(reel = event.reel, "reel launched");
                return None;
            }
            ReelUpdate::Stale | ReelUpdate::Ignored => return None,
        }

        if self.completed < self.reels.len() {
            return None;
        }
        self.phase = LotteryPhase::Revealed;
        let winner = self.winner.clone()?;
        Some(Reveal {
            epoch: self.epoch,
            winner,
            pause: self.config.reveal_pause,
            flash: self.config.flash,
        })
    }

    /// Return to idle. Events already scheduled for the old cycle become stale.
    pub fn reset(&mut self) {
        self.epoch = self.epoch.next();
        for reel in &mut self.reels {
            reel.reset(self.epoch);
        }
        self.completed = 0;
        self.phase = LotteryPhase::Idle;
        self.winner = None;
    }
}

impl Default for RevealSequencer {
    fn default() -> Self {
        RevealSequencer::new(SequencerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::{resting_offset_px, ReelEventKind, ReelState};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn winner() -> Hero {
        Catalog::builtin().get("李白").unwrap().clone()
    }

    fn started() -> (RevealSequencer, SpinPlan) {
        let mut seq = RevealSequencer::default();
        let plan = seq.start(&winner(), Catalog::builtin(), &mut StdRng::seed_from_u64(9));
        (seq, plan)
    }

    fn settles(plan: &SpinPlan) -> Vec<ReelEvent> {
        plan.events
            .iter()
            .filter(|e| e.event.kind == ReelEventKind::Settle)
            .map(|e| e.event)
            .collect()
    }

    const ORDERS: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    #[test]
    fn plan_staggers_reels() {
        let (seq, plan) = started();
        assert_eq!(seq.phase(), LotteryPhase::Spinning);
        assert_eq!(plan.events.len(), 6);

        let launches: Vec<(usize, Duration)> = plan
            .events
            .iter()
            .filter(|e| e.event.kind == ReelEventKind::Launch)
            .map(|e| (e.event.reel, e.after))
            .collect();
        assert_eq!(
            launches,
            vec![
                (0, Duration::ZERO),
                (1, Duration::from_millis(300)),
                (2, Duration::from_millis(600)),
            ]
        );
        assert!(plan.events.windows(2).all(|w| w[0].after <= w[1].after));
        assert!(seq.reels().iter().all(|r| r.target() == Some(&winner())));
    }

    #[test]
    fn reveals_once_in_plan_order() {
        let (mut seq, plan) = started();
        let mut reveals = Vec::new();
        for scheduled in &plan.events {
            if let Some(reveal) = seq.handle(&scheduled.event) {
                reveals.push(reveal);
            }
        }
        assert_eq!(reveals.len(), 1);
        assert_eq!(reveals[0].winner, winner());
        assert_eq!(reveals[0].flash, DEFAULT_FLASH);
        assert_eq!(seq.phase(), LotteryPhase::Revealed);
        assert_eq!(seq.completed(), 3);
        assert!(seq
            .reels()
            .iter()
            .all(|r| r.state() == ReelState::Settled && r.offset_px() == resting_offset_px()));
    }

    #[test]
    fn any_completion_order_reveals_exactly_once() {
        for order in ORDERS {
            let (mut seq, plan) = started();
            let settles = settles(&plan);
            let mut reveal_count = 0;
            for (n, &reel) in order.iter().enumerate() {
                let revealed = seq.handle(&settles[reel]).is_some();
                if revealed {
                    reveal_count += 1;
                }
                assert_eq!(revealed, n == 2, "order {:?}", order);
            }
            // Duplicated deliveries after the reveal change nothing.
            for event in &settles {
                assert!(seq.handle(event).is_none());
            }
            assert_eq!(reveal_count, 1);
            assert_eq!(seq.completed(), 3);
            assert_eq!(seq.phase(), LotteryPhase::Revealed);
        }
    }

    #[test]
    fn duplicate_settle_is_not_double_counted() {
        let (mut seq, plan) = started();
        let settles = settles(&plan);
        assert!(seq.handle(&settles[0]).is_none());
        assert!(seq.handle(&settles[0]).is_none());
        assert!(seq.handle(&settles[1]).is_none());
        assert_eq!(seq.completed(), 2);
        assert_eq!(seq.phase(), LotteryPhase::Spinning);
        assert!(seq.handle(&settles[2]).is_some());
    }

    #[test]
    fn restart_invalidates_previous_cycle() {
        let (mut seq, first) = started();
        let old = settles(&first);
        assert!(seq.handle(&old[0]).is_none());

        let other = Catalog::builtin().get("瑶").unwrap().clone();
        let second = seq.start(&other, Catalog::builtin(), &mut StdRng::seed_from_u64(10));
        assert_ne!(first.epoch, second.epoch);
        assert_eq!(seq.completed(), 0);

        // Every stale event from the first cycle is dropped.
        for event in &old {
            assert!(seq.handle(event).is_none());
        }
        assert_eq!(seq.completed(), 0);
        assert_eq!(seq.phase(), LotteryPhase::Spinning);

        let new = settles(&second);
        assert!(seq.handle(&new[2]).is_none());
        assert!(seq.handle(&new[0]).is_none());
        let reveal = seq.handle(&new[1]).expect("second cycle reveals");
        assert_eq!(reveal.winner, other);
        assert_eq!(reveal.epoch, second.epoch);
    }

    #[test]
    fn reset_returns_to_idle_and_ignores_late_events() {
        let (mut seq, plan) = started();
        for scheduled in plan.events.iter().take(3) {
            seq.handle(&scheduled.event);
        }
        seq.reset();

        assert_eq!(seq.phase(), LotteryPhase::Idle);
        assert_eq!(seq.completed(), 0);
        assert!(seq.winner().is_none());
        assert!(seq
            .reels()
            .iter()
            .all(|r| r.state() == ReelState::Idle && r.offset_px() == 0));

        for scheduled in &plan.events {
            assert!(seq.handle(&scheduled.event).is_none());
        }
        assert_eq!(seq.phase(), LotteryPhase::Idle);
    }

    #[test]
    fn single_reel_sequencer() {
        let mut seq = RevealSequencer::new(SequencerConfig {
            reels: 0,
            ..SequencerConfig::default()
        });
        assert_eq!(seq.reels().len(), 1);
        let plan = seq.start(&winner(), Catalog::builtin(), &mut StdRng::seed_from_u64(1));
        let reveals: Vec<Reveal> = plan
            .events
            .iter()
            .filter_map(|e| seq.handle(&e.event))
            .collect();
        assert_eq!(reveals.len(), 1);
    }

    #[test]
    fn oversized_config_is_clamped_without_overflow() {
        let mut seq = RevealSequencer::new(SequencerConfig {
            reels: usize::MAX,
            stagger: Duration::MAX,
            settle: Duration::MAX,
            ..SequencerConfig::default()
        });
        assert_eq!(seq.reels().len(), MAX_REEL_COUNT);
        assert_eq!(seq.config().reels, MAX_REEL_COUNT);

        let plan = seq.start(&winner(), Catalog::builtin(), &mut StdRng::seed_from_u64(1));
        assert_eq!(plan.events.len(), MAX_REEL_COUNT * 2);
        assert_eq!(plan.events[0].after, Duration::ZERO);
        assert!(plan.events[1..].iter().all(|e| e.after == Duration::MAX));

        let reveals: Vec<Reveal> = plan
            .events
            .iter()
            .filter_map(|e| seq.handle(&e.event))
            .collect();
        assert_eq!(reveals.len(), 1);
    }

    #[test]
    fn instant_config_zeroes_timings() {
        let config = SequencerConfig::default().instant();
        assert_eq!(config.reels, 3);
        assert_eq!(config.settle, Duration::ZERO);
        let mut seq = RevealSequencer::new(config);
        let plan = seq.start(&winner(), Catalog::builtin(), &mut StdRng::seed_from_u64(1));
        assert!(plan.events.iter().all(|e| e.after == Duration::ZERO));
    }
}
