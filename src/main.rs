use env_logger::Env;
use log::error;
use nba_api::client::NbaApi;
use nba_rewind::SessionHandle;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let Some(args) = handle_cli_args() else {
        return Ok(());
    };

    let mut handle = match SessionHandle::start(NbaApi::new(), &args.game_id).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("initial load failed: {e}");
            std::process::exit(1);
        }
    };

    handle.set_speed(args.speed).await;
    handle.toggle_play().await;

    // Print each action the moment the virtual clock reveals it.
    let mut printed = 0usize;
    loop {
        tokio::time::sleep(Duration::from_millis(250)).await;
        let view = handle.view().await;

        // The read model lists newest first; print in chronological order.
        let total_visible = view.visible_actions.len();
        for timed in view.visible_actions.iter().rev().skip(printed) {
            let a = &timed.action;
            if a.description.is_empty() {
                continue;
            }
            println!(
                "[{}] {:>3}-{:<3}  {}",
                view.game_clock_label, a.home_score, a.away_score, a.description
            );
        }
        printed = total_visible;

        // Caught up with a live game: resume once a refresh extends the
        // timeline past the paused position.
        if !view.is_playing && view.is_live && view.current_time < view.total_duration {
            handle.toggle_play().await;
        }

        if !view.is_playing && view.current_time >= view.total_duration && !view.is_live {
            let home = &view.box_score.home;
            let away = &view.box_score.away;
            println!(
                "FINAL  {} {} - {} {}",
                home.label, home.totals.points, away.totals.points, away.label
            );
            break;
        }
    }

    handle.shutdown();
    Ok(())
}

struct CliArgs {
    game_id: String,
    speed: f64,
}

/// Returns None when the invocation was handled in place (help/version).
fn handle_cli_args() -> Option<CliArgs> {
    let mut game_id = None;
    let mut speed = 20.0;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return None;
            }
            "-V" | "--version" => {
                println!("rewind {}", env!("CARGO_PKG_VERSION"));
                return None;
            }
            "--speed" => {
                speed = args
                    .next()
                    .and_then(|s| s.parse().ok())
                    .filter(|&s| s > 0.0)
                    .unwrap_or_else(|| {
                        eprintln!("--speed expects a positive number\n\n{}", usage_text());
                        std::process::exit(2);
                    });
            }
            _ if game_id.is_none() && !arg.starts_with('-') => {
                game_id = Some(arg);
            }
            _ => {
                eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
                std::process::exit(2);
            }
        }
    }

    let Some(game_id) = game_id else {
        eprintln!("Missing game id\n\n{}", usage_text());
        std::process::exit(2);
    };

    Some(CliArgs { game_id, speed })
}

fn usage_text() -> &'static str {
    "rewind - replay an NBA game's play-by-play feed without spoilers

Usage:
  rewind <game_id>
  rewind <game_id> --speed 50
  rewind --help

Arguments:
  <game_id>     NBA game id, e.g. 0022300001

Options:
  --speed N     Playback speed multiplier (default 20)"
}
