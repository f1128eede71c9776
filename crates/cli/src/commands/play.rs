//! `lucky play` -- interactive lottery session.
//!
//! Lane selections and bans live for the whole session; every spin is
//! written to history before the reels start, just like `lucky spin`.

use std::io::{self, BufRead, Write};

use lucky_core::{Error, LotteryPhase, Role};
use tokio::runtime::Runtime;

use super::spin::report_empty_pool;
use crate::render;
use crate::reveal::{flash, run_to_reveal, Timeline};
use crate::session::Session;
use crate::{fail, GlobalOptions};

pub(crate) fn cmd_play(seed: Option<u64>, instant: bool, opts: &GlobalOptions) {
    let mut session = match Session::open(opts, instant, seed) {
        Ok(s) => s,
        Err(e) => fail(&format!("error: {}", e), opts),
    };
    let runtime = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => fail(&format!("error: could not start timer runtime: {}", e), opts),
    };
    let mut timeline = Timeline::new();

    println!();
    println!("  Lucky Select: {} heroes", session.catalog.len());
    println!("  Commands: roles, role, ban, bans, spin, back, history, heroes, help, quit");
    println!();

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("{}> ", prompt(&session));
        if io::stdout().flush().is_err() {
            break;
        }

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => {
                // EOF (Ctrl-D)
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("error reading input: {}", e);
                break;
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
            None => (trimmed.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "help" => print_help(),
            "roles" => {
                for line in render::roles_lines(session.catalog, Some(&session.state)) {
                    println!("{}", line);
                }
            }
            "role" => {
                if arg.is_empty() {
                    eprintln!("usage: role <top|jungle|mid|adc|support|all>");
                    continue;
                }
                if arg.eq_ignore_ascii_case("all") {
                    session.state.clear_roles();
                    println!("  any lane");
                    continue;
                }
                match arg.parse::<Role>() {
                    Ok(role) => {
                        let on = session.state.toggle_role(role);
                        println!("  {} {}", role.label(), if on { "selected" } else { "cleared" });
                    }
                    Err(e) => eprintln!("  {}", e),
                }
            }
            "ban" => {
                if arg.is_empty() {
                    eprintln!("usage: ban <hero>");
                    continue;
                }
                match session.state.toggle_ban(session.catalog, arg) {
                    Ok(true) => println!("  banned {}", arg),
                    Ok(false) => println!("  unbanned {}", arg),
                    Err(e) => eprintln!("  {}", e),
                }
            }
            "bans" => {
                if session.state.bans().is_empty() {
                    println!("  no bans");
                }
                for name in session.state.bans().iter() {
                    println!("  {}", name);
                }
            }
            "heroes" => {
                let (role, search) = match arg.parse::<Role>() {
                    Ok(role) => (Some(role), ""),
                    Err(_) => (None, arg),
                };
                for hero in session.catalog.browse(role, search) {
                    println!("{}", render::hero_line(hero, session.state.bans().contains(&hero.name)));
                }
            }
            "spin" | "draw" => spin(&mut session, &runtime, &mut timeline, opts),
            "back" => {
                if session.state.phase() == LotteryPhase::Idle {
                    println!("  nothing to go back from");
                } else {
                    timeline.cancel();
                    session.state.back();
                }
            }
            "history" => {
                for line in render::history_lines(session.state.history().entries()) {
                    println!("{}", line);
                }
            }
            "quit" | "exit" => break,
            _ => {
                eprintln!(
                    "unknown command: {}. Type 'help' for available commands.",
                    cmd
                );
            }
        }
    }
}

fn prompt(session: &Session) -> &'static str {
    match session.state.phase() {
        LotteryPhase::Revealed => "lucky*",
        _ => "lucky",
    }
}

fn spin(session: &mut Session, runtime: &Runtime, timeline: &mut Timeline, opts: &GlobalOptions) {
    let outcome = match session.draw() {
        Ok(o) => o,
        Err(e @ Error::EmptyPool { .. }) => {
            report_empty_pool(&e, opts);
            return;
        }
        Err(e) => {
            eprintln!("  {}", e);
            return;
        }
    };
    println!("{}", render::spin_started(&session.state));

    let state = &mut session.state;
    let reveal = runtime.block_on(async {
        timeline.schedule(&outcome.plan);
        let reveal = run_to_reveal(state, timeline, |event, state| {
            if let Some(line) = render::reel_line(event, state) {
                println!("{}", line);
            }
        })
        .await;
        if let Some(reveal) = &reveal {
            flash(reveal, |r| println!("\n{}", render::flash_line(r))).await;
        }
        reveal
    });
    if let Some(reveal) = reveal {
        println!("{}", render::reveal_card(&reveal, outcome.result.attributed_role));
        println!("  (type 'back' to return, or 'spin' again)");
    }
}

fn print_help() {
    println!();
    println!("  help               Show this help");
    println!("  roles              List lanes; [x] marks the selected ones");
    println!("  role <lane>        Toggle a lane (top, jungle, mid, adc, support); 'all' clears");
    println!("  ban <hero>         Toggle a ban for this session");
    println!("  bans               List banned heroes");
    println!("  heroes [lane|text] Browse the catalog");
    println!("  spin               Draw a hero and spin the reels");
    println!("  back               Leave the result and return to idle");
    println!("  history            Show past draws, newest first");
    println!("  quit               Exit");
    println!();
}
