//! Conformance checks for `KeyValueStore` and `HistoryStore` implementations.
//!
//! Backends call the runners with a factory that returns a fresh, empty
//! store for every check:
//!
//! ```ignore
//! use lucky_storage::conformance::run_history_conformance_suite;
//!
//! #[test]
//! fn sqlite_history_conformance() {
//!     let report = run_history_conformance_suite(|| open_test_sqlite_store());
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

use std::fmt;

use lucky_core::{Catalog, HistoryEntry, Role};

use crate::{HistoryStore, KeyValueStore};

/// Result of a single conformance check.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub category: String,
    pub name: String,
    pub passed: bool,
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        TestResult {
            category: category.to_string(),
            name: name.to_string(),
            passed: result.is_ok(),
            message: result.err(),
        }
    }
}

/// Aggregated report from a suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl ConformanceReport {
    fn from_results(results: Vec<TestResult>) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        let total = results.len();
        ConformanceReport {
            results,
            passed,
            failed: total - passed,
            total,
        }
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in self.results.iter().filter(|r| !r.passed) {
            writeln!(
                f,
                "  FAIL [{}/{}]: {}",
                r.category,
                r.name,
                r.message.as_deref().unwrap_or("(no message)")
            )?;
        }
        Ok(())
    }
}

fn check<S, F>(
    results: &mut Vec<TestResult>,
    category: &str,
    factory: &F,
    name: &str,
    test: fn(&S) -> Result<(), String>,
) where
    F: Fn() -> S,
{
    let store = factory();
    results.push(TestResult::from_result(category, name, test(&store)));
}

// ── Key-value checks ──────────────────────────────────────────────────────────

/// Run every key-value check against fresh stores from `factory`.
pub fn run_kv_conformance_suite<S, F>(factory: F) -> ConformanceReport
where
    S: KeyValueStore,
    F: Fn() -> S,
{
    let mut results = Vec::new();
    let r = &mut results;
    check(r, "kv", &factory, "missing_key_reads_none", kv_missing_key_reads_none);
    check(r, "kv", &factory, "set_then_get", kv_set_then_get);
    check(r, "kv", &factory, "set_overwrites", kv_set_overwrites);
    check(r, "kv", &factory, "remove_deletes", kv_remove_deletes);
    check(r, "kv", &factory, "remove_missing_is_ok", kv_remove_missing_is_ok);
    check(r, "kv", &factory, "keys_are_independent", kv_keys_are_independent);
    check(r, "kv", &factory, "unicode_round_trips", kv_unicode_round_trips);
    ConformanceReport::from_results(results)
}

fn kv_missing_key_reads_none<S: KeyValueStore>(s: &S) -> Result<(), String> {
    match s.get("absent").map_err(|e| e.to_string())? {
        None => Ok(()),
        Some(v) => Err(format!("expected None, got {:?}", v)),
    }
}

fn kv_set_then_get<S: KeyValueStore>(s: &S) -> Result<(), String> {
    s.set("k", "value").map_err(|e| e.to_string())?;
    expect_value(s, "k", "value")
}

fn kv_set_overwrites<S: KeyValueStore>(s: &S) -> Result<(), String> {
    s.set("k", "first").map_err(|e| e.to_string())?;
    s.set("k", "second").map_err(|e| e.to_string())?;
    expect_value(s, "k", "second")
}

fn kv_remove_deletes<S: KeyValueStore>(s: &S) -> Result<(), String> {
    s.set("k", "value").map_err(|e| e.to_string())?;
    s.remove("k").map_err(|e| e.to_string())?;
    match s.get("k").map_err(|e| e.to_string())? {
        None => Ok(()),
        Some(v) => Err(format!("removed key still reads {:?}", v)),
    }
}

fn kv_remove_missing_is_ok<S: KeyValueStore>(s: &S) -> Result<(), String> {
    s.remove("never_written").map_err(|e| e.to_string())
}

fn kv_keys_are_independent<S: KeyValueStore>(s: &S) -> Result<(), String> {
    s.set("a", "1").map_err(|e| e.to_string())?;
    s.set("b", "2").map_err(|e| e.to_string())?;
    s.remove("a").map_err(|e| e.to_string())?;
    expect_value(s, "b", "2")
}

fn kv_unicode_round_trips<S: KeyValueStore>(s: &S) -> Result<(), String> {
    let value = r#"[{"name":"鲁班大师","roles":["游走"]}]"#;
    s.set("unicode", value).map_err(|e| e.to_string())?;
    expect_value(s, "unicode", value)
}

fn expect_value<S: KeyValueStore>(s: &S, key: &str, expected: &str) -> Result<(), String> {
    match s.get(key).map_err(|e| e.to_string())? {
        Some(v) if v == expected => Ok(()),
        other => Err(format!("expected {:?} for '{}', got {:?}", expected, key, other)),
    }
}

// ── History checks ────────────────────────────────────────────────────────────

/// Run every history check against fresh stores from `factory`.
pub fn run_history_conformance_suite<S, F>(factory: F) -> ConformanceReport
where
    S: HistoryStore,
    F: Fn() -> S,
{
    let mut results = Vec::new();
    let r = &mut results;
    check(r, "history", &factory, "fresh_store_loads_empty", history_fresh_store_loads_empty);
    check(r, "history", &factory, "round_trip_preserves_order", history_round_trip_preserves_order);
    check(r, "history", &factory, "save_replaces_previous", history_save_replaces_previous);
    check(r, "history", &factory, "save_empty_clears", history_save_empty_clears);
    check(r, "history", &factory, "full_capacity_round_trips", history_full_capacity_round_trips);
    ConformanceReport::from_results(results)
}

fn sample_entries(count: usize) -> Vec<HistoryEntry> {
    let heroes = Catalog::builtin().heroes();
    (0..count)
        .map(|i| {
            let hero = heroes[i % heroes.len()].clone();
            let role = hero.roles.iter().next().copied().unwrap_or(Role::Top);
            HistoryEntry {
                hero,
                role,
                timestamp: 1_700_000_000_000 - (i as i64) * 60_000,
            }
        })
        .collect()
}

fn expect_entries<S: HistoryStore>(s: &S, expected: &[HistoryEntry]) -> Result<(), String> {
    let loaded = s.load().map_err(|e| e.to_string())?;
    if loaded != expected {
        return Err(format!(
            "loaded {} entries, expected {} (or contents differ)",
            loaded.len(),
            expected.len()
        ));
    }
    Ok(())
}

fn history_fresh_store_loads_empty<S: HistoryStore>(s: &S) -> Result<(), String> {
    expect_entries(s, &[])
}

fn history_round_trip_preserves_order<S: HistoryStore>(s: &S) -> Result<(), String> {
    let entries = sample_entries(5);
    s.save(&entries).map_err(|e| e.to_string())?;
    expect_entries(s, &entries)
}

fn history_save_replaces_previous<S: HistoryStore>(s: &S) -> Result<(), String> {
    s.save(&sample_entries(8)).map_err(|e| e.to_string())?;
    let newer = sample_entries(3);
    s.save(&newer).map_err(|e| e.to_string())?;
    expect_entries(s, &newer)
}

fn history_save_empty_clears<S: HistoryStore>(s: &S) -> Result<(), String> {
    s.save(&sample_entries(2)).map_err(|e| e.to_string())?;
    s.save(&[]).map_err(|e| e.to_string())?;
    expect_entries(s, &[])
}

fn history_full_capacity_round_trips<S: HistoryStore>(s: &S) -> Result<(), String> {
    let entries = sample_entries(lucky_core::HISTORY_CAPACITY);
    s.save(&entries).map_err(|e| e.to_string())?;
    expect_entries(s, &entries)
}
