use lucky_core::{Error, Role};

use crate::render::{self, EMPTY_POOL_ALERT, EMPTY_POOL_HINT};
use crate::reveal::{flash, run_to_reveal, Timeline};
use crate::session::Session;
use crate::{fail, report_error, GlobalOptions, OutputFormat};

pub(crate) fn cmd_spin(
    roles: &[String],
    bans: &[String],
    seed: Option<u64>,
    instant: bool,
    opts: &GlobalOptions,
) {
    let mut session = match Session::open(opts, instant, seed) {
        Ok(s) => s,
        Err(e) => fail(&format!("error: {}", e), opts),
    };

    for raw in roles {
        let role: Role = match raw.parse() {
            Ok(r) => r,
            Err(e) => fail(&format!("error: {}", e), opts),
        };
        if !session.state.selected_roles().contains(&role) {
            session.state.toggle_role(role);
        }
    }
    for name in bans {
        if session.state.bans().contains(name) {
            continue;
        }
        if let Err(e) = session.state.toggle_ban(session.catalog, name) {
            fail(&format!("error: {}", e), opts);
        }
    }

    let outcome = match session.draw() {
        Ok(o) => o,
        Err(e @ Error::EmptyPool { .. }) => {
            report_empty_pool(&e, opts);
            std::process::exit(1);
        }
        Err(e) => fail(&format!("error: {}", e), opts),
    };

    let show_progress = opts.output == OutputFormat::Text && !opts.quiet;
    if show_progress {
        println!("{}", render::spin_started(&session.state));
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => fail(&format!("error: could not start timer runtime: {}", e), opts),
    };
    let state = &mut session.state;
    let reveal = runtime.block_on(async {
        let mut timeline = Timeline::new();
        timeline.schedule(&outcome.plan);
        let reveal = run_to_reveal(state, &mut timeline, |event, state| {
            if show_progress {
                if let Some(line) = render::reel_line(event, state) {
                    println!("{}", line);
                }
            }
        })
        .await;
        if let Some(reveal) = reveal.as_ref().filter(|_| show_progress) {
            flash(reveal, |r| println!("\n{}", render::flash_line(r))).await;
        }
        reveal
    });

    let Some(reveal) = reveal else {
        fail("error: reels stopped before revealing a hero", opts);
    };

    match opts.output {
        OutputFormat::Text => {
            println!("{}", render::reveal_card(&reveal, outcome.result.attributed_role));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&render::outcome_json(&outcome))
                .unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}

/// Print the empty-pool alert. The text hint is skipped for JSON output.
pub(crate) fn report_empty_pool(err: &Error, opts: &GlobalOptions) {
    report_error(EMPTY_POOL_ALERT, opts.output, opts.quiet);
    if opts.output == OutputFormat::Text && !opts.quiet {
        eprintln!("{}", EMPTY_POOL_HINT);
    }
    tracing::debug!(error = %err, "draw refused");
}
