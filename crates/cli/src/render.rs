//! Text and JSON rendering for terminal output.

use lucky_core::{
    AppState, Catalog, DrawOutcome, Hero, HistoryEntry, ReelEvent, ReelEventKind, Reveal, Role,
};
use serde_json::json;

/// Shown when no hero matches the lanes and bans.
pub(crate) const EMPTY_POOL_ALERT: &str = "候选池为空，请调整分路或减少禁用英雄！";
pub(crate) const EMPTY_POOL_HINT: &str =
    "hint: select more lanes or remove some bans (no hero matches the current filters)";

pub(crate) fn roles_label<'a>(roles: impl IntoIterator<Item = &'a Role>) -> String {
    roles
        .into_iter()
        .map(|r| r.label())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// One progress line per reel event; `None` for events that changed nothing.
pub(crate) fn reel_line(event: &ReelEvent, state: &AppState) -> Option<String> {
    if event.epoch != state.sequencer().epoch() {
        return None;
    }
    let reel = state.sequencer().reels().get(event.reel)?;
    match event.kind {
        ReelEventKind::Launch => Some(format!("  reel {} spinning...", event.reel + 1)),
        ReelEventKind::Settle => {
            let name = reel.target().map(|h| h.name.as_str()).unwrap_or("?");
            Some(format!(
                "  reel {} stopped on {} ({}/{})",
                event.reel + 1,
                name,
                state.sequencer().completed(),
                state.sequencer().reels().len()
            ))
        }
    }
}

pub(crate) fn spin_started(state: &AppState) -> String {
    format!(
        "Spinning {} reels for {}...",
        state.sequencer().reels().len(),
        roles_label(&state.requested_roles())
    )
}

/// Highlight shown for the flash cue, before the result card.
pub(crate) fn flash_line(reveal: &Reveal) -> String {
    format!("  ★ ★ ★  {}  ★ ★ ★", reveal.winner.name)
}

/// The result card printed once the reels have revealed.
pub(crate) fn reveal_card(reveal: &Reveal, role: Role) -> String {
    let hero = &reveal.winner;
    let mut out = String::new();
    out.push_str(&format!("  {}\n", hero.name));
    out.push_str(&format!("  分路: {}\n", role.label()));
    out.push_str(&format!("  {}", hero.image_url_or_fallback(false)));
    out
}

pub(crate) fn outcome_json(outcome: &DrawOutcome) -> serde_json::Value {
    json!({
        "hero": hero_json(&outcome.result.hero),
        "role": outcome.result.attributed_role,
        "timestamp": outcome.entry.timestamp,
        "epoch": outcome.plan.epoch.value(),
    })
}

pub(crate) fn hero_json(hero: &Hero) -> serde_json::Value {
    json!({
        "name": hero.name,
        "roles": hero.roles,
        "imageUrl": hero.image_url_or_fallback(false),
    })
}

pub(crate) fn history_lines(entries: &[HistoryEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No draws yet.".to_string()];
    }
    entries
        .iter()
        .map(|e| format!("  {}  {:<8} {}", e.time_label(), e.hero.name, e.role.label()))
        .collect()
}

pub(crate) fn hero_line(hero: &Hero, banned: bool) -> String {
    let marker = if banned { " [banned]" } else { "" };
    format!("  {:<8} {}{}", hero.name, roles_label(&hero.roles), marker)
}

pub(crate) fn roles_json(catalog: &Catalog) -> serde_json::Value {
    let roles: Vec<serde_json::Value> = Role::ALL
        .iter()
        .map(|&role| {
            json!({
                "code": role.code(),
                "label": role.label(),
                "heroes": catalog.browse(Some(role), "").count(),
            })
        })
        .collect();
    json!(roles)
}

pub(crate) fn roles_lines(catalog: &Catalog, selected: Option<&AppState>) -> Vec<String> {
    Role::ALL
        .iter()
        .map(|&role| {
            let mark = match selected {
                Some(state) if state.selected_roles().contains(&role) => "[x] ",
                Some(_) => "[ ] ",
                None => "",
            };
            format!(
                "  {}{:<8} {:<6} {} heroes",
                mark,
                role.code(),
                role.label(),
                catalog.browse(Some(role), "").count()
            )
        })
        .collect()
}
