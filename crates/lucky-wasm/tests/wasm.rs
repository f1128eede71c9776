use lucky_wasm::*;
use wasm_bindgen_test::*;

const NOW_MS: f64 = 1_700_000_000_000.0;

fn parse(s: &str) -> serde_json::Value {
    serde_json::from_str(s).expect("valid JSON response")
}

fn session(options: &str) -> u32 {
    let v = parse(&new_session(options));
    v["handle"].as_u64().expect("handle") as u32
}

/// Deliver every scheduled event in order; return the reveal responses.
fn deliver_all(handle: u32, drawn: &serde_json::Value) -> Vec<serde_json::Value> {
    drawn["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| parse(&reel_event(handle, &e["event"].to_string())))
        .filter(|r| !r["reveal"].is_null())
        .collect()
}

#[wasm_bindgen_test(unsupported = test)]
fn test_new_session_rejects_bad_options() {
    assert!(parse(&new_session("{nope")).get("error").is_some());
    assert!(parse(&new_session(r#"{"reels": 0}"#)).get("error").is_some());
    assert!(parse(&new_session(r#"{"speed": 2}"#)).get("error").is_some());
}

#[wasm_bindgen_test(unsupported = test)]
fn test_new_session_rejects_out_of_range_options() {
    let too_many = parse(&new_session(r#"{"reels": 33}"#));
    assert_eq!(too_many["error"], "reels must be between 1 and 32");
    let huge = parse(&new_session(r#"{"stagger_ms": 18446744073709551615}"#));
    assert_eq!(huge["error"], "stagger_ms must be at most 60000");
    assert!(parse(&new_session(r#"{"settle_ms": 60001}"#)).get("error").is_some());

    let h = session(r#"{"reels": 32, "settle_ms": 60000, "seed": 2}"#);
    let drawn = parse(&draw(h, NOW_MS));
    assert_eq!(drawn["reels"].as_array().unwrap().len(), 32);
    assert_eq!(deliver_all(h, &drawn).len(), 1);
    free_session(h);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_draw_schedules_staggered_reels_and_reveals_once() {
    let h = session(r#"{"seed": 42}"#);
    let drawn = parse(&draw(h, NOW_MS));
    assert!(drawn.get("error").is_none(), "{drawn}");

    let events = drawn["events"].as_array().unwrap();
    assert_eq!(events.len(), 6);
    let settles: Vec<u64> = events
        .iter()
        .filter(|e| e["event"]["kind"] == "settle")
        .map(|e| e["afterMs"].as_u64().unwrap())
        .collect();
    assert_eq!(settles, vec![4500, 4800, 5100]);

    let reels = drawn["reels"].as_array().unwrap();
    assert_eq!(reels.len(), 3);
    for reel in reels {
        let strip = reel["strip"].as_array().unwrap();
        assert_eq!(strip.len(), 90);
        assert_eq!(strip[88]["name"], drawn["hero"]["name"]);
    }

    let reveals = deliver_all(h, &drawn);
    assert_eq!(reveals.len(), 1);
    assert_eq!(reveals[0]["phase"], "revealed");
    assert_eq!(reveals[0]["reveal"]["winner"]["name"], drawn["hero"]["name"]);
    assert_eq!(reveals[0]["reveal"]["flashMs"], 400);
    free_session(h);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_stale_events_after_redraw_are_ignored() {
    let h = session(r#"{"seed": 7}"#);
    let first = parse(&draw(h, NOW_MS));
    let second = parse(&draw(h, NOW_MS + 1000.0));

    assert!(deliver_all(h, &first).is_empty());
    let reveals = deliver_all(h, &second);
    assert_eq!(reveals.len(), 1);
    assert_eq!(reveals[0]["reveal"]["winner"]["name"], second["hero"]["name"]);

    let history = parse(&history_json(h));
    assert_eq!(history.as_array().unwrap().len(), 2);
    free_session(h);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_empty_pool_returns_alert() {
    let h = session(r#"{"seed": 1}"#);
    parse(&toggle_role(h, "support"));
    let supports = parse(&browse_heroes("support", ""));
    for hero in supports.as_array().unwrap() {
        let r = parse(&toggle_ban(h, hero["name"].as_str().unwrap()));
        assert_eq!(r["banned"], true);
    }

    let drawn = parse(&draw(h, NOW_MS));
    assert_eq!(drawn["emptyPool"], true);
    assert_eq!(drawn["error"], EMPTY_POOL_ALERT);
    assert_eq!(parse(&history_json(h)).as_array().unwrap().len(), 0);
    free_session(h);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_load_history_adopts_record_and_tolerates_garbage() {
    let h = session("");
    let record = r#"[{"hero":{"name":"小乔","roles":["中路"],"imageUrl":"https://game.gtimg.cn/images/yxzj/img201605/hero/face/106.jpg"},"role":"中路","timestamp":1700000000000}]"#;
    let loaded = parse(&load_history(h, record));
    assert_eq!(loaded["entries"], 1);
    assert_eq!(loaded["discarded"], false);

    let drawn = parse(&draw(h, NOW_MS + 60_000.0));
    let history = drawn["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["hero"]["name"], "小乔");

    let garbage = parse(&load_history(h, "{broken"));
    assert_eq!(garbage["entries"], 0);
    assert_eq!(garbage["discarded"], true);
    free_session(h);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_load_history_mid_spin_keeps_cycle() {
    let h = session(r#"{"seed": 12}"#);
    let first = parse(&draw(h, NOW_MS));
    parse(&load_history(h, "[]"));
    let second = parse(&draw(h, NOW_MS + 1000.0));
    assert_ne!(first["epoch"], second["epoch"]);

    assert!(deliver_all(h, &first).is_empty());
    let reveals = deliver_all(h, &second);
    assert_eq!(reveals.len(), 1);
    assert_eq!(reveals[0]["reveal"]["winner"]["name"], second["hero"]["name"]);
    free_session(h);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_load_history_keeps_bans_and_lanes() {
    let h = session("");
    assert_eq!(parse(&toggle_ban(h, "后羿"))["banned"], true);
    assert_eq!(parse(&toggle_role(h, "adc"))["selected"], true);
    parse(&load_history(h, "[]"));

    // Toggling again undoes the earlier state, so it survived the load.
    assert_eq!(parse(&toggle_ban(h, "后羿"))["banned"], false);
    assert_eq!(parse(&toggle_role(h, "adc"))["selected"], false);
    free_session(h);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_toggle_role_and_unknown_inputs() {
    let h = session("");
    let r = parse(&toggle_role(h, "jungle"));
    assert_eq!(r["selected"], true);
    assert_eq!(r["selectedRoles"], serde_json::json!(["打野"]));
    assert!(parse(&toggle_role(h, "bench")).get("error").is_some());
    assert!(parse(&toggle_ban(h, "Nobody")).get("error").is_some());
    free_session(h);
}

#[wasm_bindgen_test(unsupported = test)]
fn test_back_returns_to_idle_and_invalid_handle() {
    let h = session(r#"{"seed": 3}"#);
    parse(&draw(h, NOW_MS));
    assert_eq!(parse(&back(h))["phase"], "idle");
    free_session(h);
    assert!(parse(&back(h)).get("error").is_some());
}
