//! Browser bindings for the lottery state machine.
//!
//! The page owns timers and `localStorage`: it schedules the events returned
//! by [`draw`], feeds each one back through [`reel_event`], and writes the
//! `history` array from the draw response under `lottery_history`. Every
//! function returns a JSON string; failures are `{"error": "..."}`.

use std::cell::RefCell;
use std::time::Duration;

use lucky_core::reel::resting_offset_px;
use lucky_core::{
    AppState, Catalog, Error, Hero, History, HistoryEntry, ReelEvent, Role, SequencerConfig,
    MAX_REEL_COUNT, MAX_TIMING,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::json;
use slab::Slab;
use time::OffsetDateTime;
use wasm_bindgen::prelude::*;

/// Alert shown when the filters leave nobody to draw.
pub const EMPTY_POOL_ALERT: &str = "候选池为空，请调整分路或减少禁用英雄！";

struct StoredSession {
    state: AppState,
    rng: StdRng,
}

thread_local! {
    static SESSIONS: RefCell<Slab<StoredSession>> = const { RefCell::new(Slab::new()) };
}

fn error_json(msg: &str) -> String {
    json!({ "error": msg }).to_string()
}

fn with_session<F>(handle: u32, f: F) -> String
where
    F: FnOnce(&mut StoredSession) -> String,
{
    SESSIONS.with(|sessions| {
        let mut sessions = sessions.borrow_mut();
        match sessions.get_mut(handle as usize) {
            Some(stored) => f(stored),
            None => error_json(&format!("invalid session handle: {}", handle)),
        }
    })
}

/// Options accepted by [`new_session`]. Missing fields keep the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SessionOptions {
    reels: Option<usize>,
    stagger_ms: Option<u64>,
    settle_ms: Option<u64>,
    reveal_pause_ms: Option<u64>,
    flash_ms: Option<u64>,
    seed: Option<u64>,
}

impl SessionOptions {
    fn parse(json_str: &str) -> Result<Self, String> {
        let trimmed = json_str.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(SessionOptions::default());
        }
        serde_json::from_str(trimmed).map_err(|e| format!("invalid options JSON: {}", e))
    }

    fn sequencer(&self) -> Result<SequencerConfig, String> {
        let d = SequencerConfig::default();
        let reels = self.reels.unwrap_or(d.reels);
        if reels == 0 || reels > MAX_REEL_COUNT {
            return Err(format!("reels must be between 1 and {}", MAX_REEL_COUNT));
        }
        let ms = |key: &str, v: Option<u64>, default: Duration| -> Result<Duration, String> {
            let d = v.map_or(default, Duration::from_millis);
            if d > MAX_TIMING {
                return Err(format!("{} must be at most {}", key, millis(MAX_TIMING)));
            }
            Ok(d)
        };
        Ok(SequencerConfig {
            reels,
            stagger: ms("stagger_ms", self.stagger_ms, d.stagger)?,
            settle: ms("settle_ms", self.settle_ms, d.settle)?,
            reveal_pause: ms("reveal_pause_ms", self.reveal_pause_ms, d.reveal_pause)?,
            flash: ms("flash_ms", self.flash_ms, d.flash)?,
        })
    }
}

fn hero_json(hero: &Hero) -> serde_json::Value {
    json!({
        "name": hero.name,
        "roles": hero.roles,
        "imageUrl": hero.image_url_or_fallback(false),
    })
}

fn millis(d: Duration) -> u64 {
    d.as_millis() as u64
}

#[wasm_bindgen]
pub fn new_session(options_json: &str) -> String {
    let options = match SessionOptions::parse(options_json) {
        Ok(o) => o,
        Err(e) => return error_json(&e),
    };
    let config = match options.sequencer() {
        Ok(c) => c,
        Err(e) => return error_json(&e),
    };
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let handle = SESSIONS.with(|sessions| {
        sessions.borrow_mut().insert(StoredSession {
            state: AppState::new(config, History::new()),
            rng,
        })
    });
    json!({ "handle": handle }).to_string()
}

#[wasm_bindgen]
pub fn free_session(handle: u32) {
    SESSIONS.with(|sessions| {
        let mut sessions = sessions.borrow_mut();
        if sessions.contains(handle as usize) {
            sessions.remove(handle as usize);
        }
    });
}

/// Adopt the record read from `localStorage`.
///
/// A missing or unreadable record becomes an empty history, reported through
/// `discarded` rather than as an error. Lanes, bans and any spin in flight
/// are left alone.
#[wasm_bindgen]
pub fn load_history(handle: u32, history_json: &str) -> String {
    let trimmed = history_json.trim();
    let (entries, discarded) = if trimmed.is_empty() || trimmed == "null" {
        (Vec::new(), false)
    } else {
        match serde_json::from_str::<Vec<HistoryEntry>>(trimmed) {
            Ok(entries) => (entries, false),
            Err(_) => (Vec::new(), true),
        }
    };
    with_session(handle, |stored| {
        stored.state.replace_history(History::from_entries(entries));
        json!({
            "entries": stored.state.history().len(),
            "discarded": discarded,
        })
        .to_string()
    })
}

#[wasm_bindgen]
pub fn toggle_role(handle: u32, role: &str) -> String {
    let role: Role = match role.parse() {
        Ok(r) => r,
        Err(e) => return error_json(&format!("{}", e)),
    };
    with_session(handle, |stored| {
        let selected = stored.state.toggle_role(role);
        json!({
            "role": role,
            "selected": selected,
            "selectedRoles": stored.state.selected_roles(),
        })
        .to_string()
    })
}

#[wasm_bindgen]
pub fn toggle_ban(handle: u32, name: &str) -> String {
    with_session(handle, |stored| {
        match stored.state.toggle_ban(Catalog::builtin(), name) {
            Ok(banned) => json!({ "name": name, "banned": banned }).to_string(),
            Err(e) => error_json(&format!("{}", e)),
        }
    })
}

/// Draw a winner and start the reels.
///
/// `now_ms` is the page's `Date.now()`. The response carries the timed
/// events to schedule, each reel's strip, and the full `history` to persist.
#[wasm_bindgen]
pub fn draw(handle: u32, now_ms: f64) -> String {
    let now = match OffsetDateTime::from_unix_timestamp_nanos(now_ms as i128 * 1_000_000) {
        Ok(t) => t,
        Err(e) => return error_json(&format!("invalid timestamp: {}", e)),
    };
    with_session(handle, |stored| {
        let outcome = match stored.state.draw(Catalog::builtin(), &mut stored.rng, now) {
            Ok(o) => o,
            Err(Error::EmptyPool { .. }) => {
                return json!({ "error": EMPTY_POOL_ALERT, "emptyPool": true }).to_string();
            }
            Err(e) => return error_json(&format!("{}", e)),
        };

        let events: Vec<serde_json::Value> = outcome
            .plan
            .events
            .iter()
            .map(|s| json!({ "afterMs": millis(s.after), "event": s.event }))
            .collect();
        let reels: Vec<serde_json::Value> = stored
            .state
            .sequencer()
            .reels()
            .iter()
            .map(|reel| {
                let strip: Vec<_> = reel.strip().iter().map(hero_json).collect();
                json!({ "strip": strip, "offsetPx": resting_offset_px() })
            })
            .collect();

        json!({
            "hero": hero_json(&outcome.result.hero),
            "role": outcome.result.attributed_role,
            "epoch": outcome.plan.epoch.value(),
            "events": events,
            "reels": reels,
            "history": stored.state.history().entries(),
        })
        .to_string()
    })
}

/// Deliver one timer callback. `reveal` is non-null exactly once per cycle.
#[wasm_bindgen]
pub fn reel_event(handle: u32, event_json: &str) -> String {
    let event: ReelEvent = match serde_json::from_str(event_json) {
        Ok(e) => e,
        Err(e) => return error_json(&format!("invalid event JSON: {}", e)),
    };
    with_session(handle, |stored| {
        let reveal = stored.state.handle_reel_event(&event).map(|r| {
            json!({
                "winner": hero_json(&r.winner),
                "pauseMs": millis(r.pause),
                "flashMs": millis(r.flash),
            })
        });
        json!({
            "phase": stored.state.phase(),
            "completed": stored.state.sequencer().completed(),
            "reveal": reveal,
        })
        .to_string()
    })
}

#[wasm_bindgen]
pub fn back(handle: u32) -> String {
    with_session(handle, |stored| {
        stored.state.back();
        json!({ "phase": stored.state.phase() }).to_string()
    })
}

#[wasm_bindgen]
pub fn history_json(handle: u32) -> String {
    with_session(handle, |stored| {
        serde_json::to_string(stored.state.history().entries())
            .unwrap_or_else(|e| error_json(&format!("serialization error: {}", e)))
    })
}

/// Heroes for the ban screen, filtered by lane (or `""` for any) and name.
#[wasm_bindgen]
pub fn browse_heroes(role: &str, search: &str) -> String {
    let role = if role.trim().is_empty() {
        None
    } else {
        match role.parse::<Role>() {
            Ok(r) => Some(r),
            Err(e) => return error_json(&format!("{}", e)),
        }
    };
    let heroes: Vec<_> = Catalog::builtin()
        .browse(role, search)
        .map(hero_json)
        .collect();
    json!(heroes).to_string()
}
