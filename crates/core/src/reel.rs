//! A single slot reel as an explicit state machine.
//!
//! A reel never owns a timer. `spin` hands back the timed events the reel
//! expects (`Launch` after its stagger delay, `Settle` once the scroll has
//! come to rest), each tagged with the cycle's [`Epoch`]. Whoever owns the
//! clock delivers those events back through [`Reel::handle`]; events from an
//! older epoch are reported as stale and change nothing.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Hero};

/// Number of slots in a scroll strip.
pub const STRIP_LEN: usize = 90;
/// Distance of the target slot from the end of the strip.
pub const TARGET_FROM_END: usize = 2;
/// Height of one slot, in pixels.
pub const SLOT_HEIGHT_PX: u32 = 120;
/// Offset that centers a slot inside the reel window, in pixels.
pub const CENTER_OFFSET_PX: u32 = 160;

/// Index of the winning hero within every strip.
pub const fn target_index() -> usize {
    STRIP_LEN - TARGET_FROM_END
}

/// Scroll offset at which the target slot sits in the middle of the window.
pub const fn resting_offset_px() -> u32 {
    target_index() as u32 * SLOT_HEIGHT_PX - CENTER_OFFSET_PX
}

/// Tag identifying one spin cycle. Bumped whenever a cycle starts or is cancelled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Epoch(u64);

impl Epoch {
    pub fn next(self) -> Epoch {
        Epoch(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelEventKind {
    /// Stagger delay elapsed; the strip starts scrolling toward its resting offset.
    Launch,
    /// Scroll finished; the reel shows the winner.
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelEvent {
    pub epoch: Epoch,
    pub reel: usize,
    pub kind: ReelEventKind,
}

/// An event to deliver once `after` has elapsed from the start of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub after: Duration,
    pub event: ReelEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelState {
    /// No target; nothing is animating.
    Idle,
    /// Waiting out the stagger delay.
    Pending,
    /// Scrolling toward the resting offset.
    Scrolling,
    /// At rest on the target. Terminal for the epoch.
    Settled,
}

/// What applying an event did to a reel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelUpdate {
    /// The event belongs to a superseded epoch.
    Stale,
    /// The event is current but does not apply in the reel's state.
    Ignored,
    Launched,
    /// The reel completed. Returned at most once per epoch.
    Settled,
}

#[derive(Debug, Clone)]
pub struct Reel {
    index: usize,
    epoch: Epoch,
    state: ReelState,
    strip: Vec<Hero>,
    offset_px: u32,
}

impl Reel {
    pub fn new(index: usize) -> Self {
        Reel {
            index,
            epoch: Epoch::default(),
            state: ReelState::Idle,
            strip: Vec::new(),
            offset_px: 0,
        }
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn state(&self) -> ReelState {
        self.state
    }

    pub fn strip(&self) -> &[Hero] {
        &self.strip
    }

    pub fn offset_px(&self) -> u32 {
        self.offset_px
    }

    /// The hero the strip comes to rest on, if the reel has one.
    pub fn target(&self) -> Option<&Hero> {
        self.strip.get(target_index())
    }

    /// Start a cycle. A reel without a target goes idle and schedules nothing.
    pub fn spin(
        &mut self,
        epoch: Epoch,
        strip: Option<Vec<Hero>>,
        delay: Duration,
        settle: Duration,
    ) -> Vec<ScheduledEvent> {
        self.reset(epoch);
        let Some(strip) = strip else {
            return Vec::new();
        };
        self.strip = strip;
        self.state = ReelState::Pending;

        let reel = self.index;
        let event = |kind: ReelEventKind| ReelEvent { epoch, reel, kind };
        vec![
            ScheduledEvent {
                after: delay,
                event: event(ReelEventKind::Launch),
            },
            ScheduledEvent {
                after: delay.saturating_add(settle),
                event: event(ReelEventKind::Settle),
            },
        ]
    }

    pub fn handle(&mut self, event: &ReelEvent) -> ReelUpdate {
        if event.epoch != self.epoch {
            return ReelUpdate::Stale;
        }
        match (self.state, event.kind) {
            (ReelState::Pending, ReelEventKind::Launch) => {
                self.state = ReelState::Scrolling;
                self.offset_px = resting_offset_px();
                ReelUpdate::Launched
            }
            // A settle that overtakes its launch still lands on the target.
            (ReelState::Pending | ReelState::Scrolling, ReelEventKind::Settle) => {
                self.state = ReelState::Settled;
                self.offset_px = resting_offset_px();
                ReelUpdate::Settled
            }
            _ => ReelUpdate::Ignored,
        }
    }

    /// Drop back to idle under a new epoch, clearing strip and offset.
    pub fn reset(&mut self, epoch: Epoch) {
        self.epoch = epoch;
        self.state = ReelState::Idle;
        self.strip.clear();
        self.offset_px = 0;
    }
}

/// Build a scroll strip: shuffled catalog filler, cycled to [`STRIP_LEN`],
/// with `target` forced into [`target_index`].
pub fn build_strip<R: Rng + ?Sized>(catalog: &Catalog, target: &Hero, rng: &mut R) -> Vec<Hero> {
    let mut filler: Vec<&Hero> = catalog.heroes().iter().collect();
    filler.shuffle(rng);

    let mut strip: Vec<Hero> = if filler.is_empty() {
        vec![target.clone(); STRIP_LEN]
    } else {
        filler.iter().cycle().take(STRIP_LEN).map(|h| (*h).clone()).collect()
    };
    strip[target_index()] = target.clone();
    strip
}
