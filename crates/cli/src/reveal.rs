//! Timer runtime for the reels.
//!
//! Each event of a [`SpinPlan`] becomes a tokio task that sleeps for the
//! event's delay and then posts the event into one channel. A single
//! consumer applies events to the [`AppState`] in arrival order, so state is
//! only ever mutated from one place. Scheduling a new plan aborts the tasks
//! of the previous one; anything that was already queued carries the old
//! epoch and is dropped by the sequencer.

use lucky_core::{AppState, LotteryPhase, ReelEvent, Reveal, SpinPlan};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub(crate) struct Timeline {
    tx: mpsc::UnboundedSender<ReelEvent>,
    rx: mpsc::UnboundedReceiver<ReelEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl Timeline {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Timeline {
            tx,
            rx,
            tasks: Vec::new(),
        }
    }

    /// Start timers for `plan`, cancelling any timers still pending.
    pub(crate) fn schedule(&mut self, plan: &SpinPlan) {
        self.cancel();
        for scheduled in &plan.events {
            let tx = self.tx.clone();
            let after = scheduled.after;
            let event = scheduled.event;
            self.tasks.push(tokio::spawn(async move {
                tokio::time::sleep(after).await;
                // The receiver only goes away with the timeline itself.
                let _ = tx.send(event);
            }));
        }
    }

    pub(crate) fn cancel(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn inject(&self, event: ReelEvent) {
        let _ = self.tx.send(event);
    }
}

impl Drop for Timeline {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Feed timed events into `state` until the current cycle reveals.
///
/// `on_event` sees every event after it has been applied, stale ones
/// included. Returns `None` when nothing is spinning.
pub(crate) async fn run_to_reveal<F>(
    state: &mut AppState,
    timeline: &mut Timeline,
    mut on_event: F,
) -> Option<Reveal>
where
    F: FnMut(&ReelEvent, &AppState),
{
    if state.phase() != LotteryPhase::Spinning {
        return None;
    }
    while let Some(event) = timeline.rx.recv().await {
        let reveal = state.handle_reel_event(&event);
        on_event(&event, state);
        if let Some(reveal) = reveal {
            timeline.cancel();
            tokio::time::sleep(reveal.pause).await;
            return Some(reveal);
        }
    }
    None
}

/// Show the flash cue for a reveal and hold it for `reveal.flash`.
pub(crate) async fn flash<F>(reveal: &Reveal, show: F)
where
    F: FnOnce(&Reveal),
{
    show(reveal);
    tokio::time::sleep(reveal.flash).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucky_core::{Catalog, ReelEventKind, SequencerConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;
    use time::OffsetDateTime;
    use tokio::time::Instant;

    fn now() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn reveals_after_last_reel_settles() {
        let catalog = Catalog::builtin();
        let mut state = AppState::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut timeline = Timeline::new();

        let started = Instant::now();
        let outcome = state.draw(catalog, &mut rng, now()).unwrap();
        timeline.schedule(&outcome.plan);

        let mut settled = Vec::new();
        let reveal = run_to_reveal(&mut state, &mut timeline, |event, _| {
            if event.kind == ReelEventKind::Settle {
                settled.push(event.reel);
            }
        })
        .await
        .expect("reveal");

        assert_eq!(reveal.winner, outcome.result.hero);
        assert_eq!(settled, vec![0, 1, 2]);
        assert_eq!(state.phase(), LotteryPhase::Revealed);
        // Last reel: 600ms stagger + 4500ms settle, then the 300ms reveal pause.
        assert_eq!(started.elapsed(), Duration::from_millis(5400));
    }

    #[tokio::test(start_paused = true)]
    async fn new_plan_supersedes_pending_timers() {
        let catalog = Catalog::builtin();
        let mut state = AppState::default();
        let mut rng = StdRng::seed_from_u64(8);
        let mut timeline = Timeline::new();

        let first = state.draw(catalog, &mut rng, now()).unwrap();
        timeline.schedule(&first.plan);
        tokio::time::sleep(Duration::from_millis(1000)).await;

        let second = state.draw(catalog, &mut rng, now()).unwrap();
        timeline.schedule(&second.plan);
        // Late deliveries from the first cycle, as if they had already been queued.
        for scheduled in &first.plan.events {
            timeline.inject(scheduled.event);
        }

        let mut reveals = 0;
        let reveal = run_to_reveal(&mut state, &mut timeline, |_, state| {
            if state.phase() == LotteryPhase::Revealed {
                reveals += 1;
            }
        })
        .await
        .expect("reveal");

        assert_eq!(reveals, 1);
        assert_eq!(reveal.epoch, second.plan.epoch);
        assert_eq!(reveal.winner, second.result.hero);
    }

    #[tokio::test(start_paused = true)]
    async fn back_mid_spin_leaves_nothing_to_reveal() {
        let catalog = Catalog::builtin();
        let mut state = AppState::new(SequencerConfig::default(), Default::default());
        let mut rng = StdRng::seed_from_u64(2);
        let mut timeline = Timeline::new();

        let outcome = state.draw(catalog, &mut rng, now()).unwrap();
        timeline.schedule(&outcome.plan);
        tokio::time::sleep(Duration::from_millis(500)).await;
        state.back();
        timeline.cancel();

        assert!(run_to_reveal(&mut state, &mut timeline, |_, _| {})
            .await
            .is_none());
        assert_eq!(state.phase(), LotteryPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn flash_holds_for_configured_time() {
        let catalog = Catalog::builtin();
        let config = SequencerConfig {
            flash: Duration::from_millis(750),
            ..SequencerConfig::default().instant()
        };
        let mut state = AppState::new(config, Default::default());
        let mut timeline = Timeline::new();

        let outcome = state
            .draw(catalog, &mut StdRng::seed_from_u64(5), now())
            .unwrap();
        timeline.schedule(&outcome.plan);
        let reveal = run_to_reveal(&mut state, &mut timeline, |_, _| {})
            .await
            .expect("reveal");
        assert_eq!(reveal.flash, Duration::from_millis(750));

        let started = Instant::now();
        let mut shown = Vec::new();
        flash(&reveal, |r| shown.push(r.winner.name.clone())).await;

        assert_eq!(shown, vec![outcome.result.hero.name.clone()]);
        assert_eq!(started.elapsed(), Duration::from_millis(750));
    }

    #[tokio::test(start_paused = true)]
    async fn instant_config_reveals_immediately() {
        let catalog = Catalog::builtin();
        let mut state = AppState::new(SequencerConfig::default().instant(), Default::default());
        let mut timeline = Timeline::new();
        let started = Instant::now();

        let outcome = state
            .draw(catalog, &mut StdRng::seed_from_u64(6), now())
            .unwrap();
        timeline.schedule(&outcome.plan);
        let reveal = run_to_reveal(&mut state, &mut timeline, |_, _| {}).await;

        assert!(reveal.is_some());
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
