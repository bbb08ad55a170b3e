//! Terminal impostor game.
//!
//! One human plays at stdin against three local bots. The session actor
//! owns the game; this binary only renders notifications and forwards the
//! human's input.

mod config;
mod play;

use std::sync::Arc;

use anyhow::Error;
use config::CliConfig;
use ctrlc::set_handler;
use impostor::{
    SessionActor,
    bot::{LocalBot, PacingParams},
    game::WordList,
};
use log::info;
use pico_args::Arguments;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Play the impostor word game in the terminal

USAGE:
  impostor_cli [OPTIONS]

OPTIONS:
  --name       NAME        Your display name, one word  [default: env IMPOSTOR_PLAYER_NAME or You]
  --seed       N           Seed for a reproducible game [default: env IMPOSTOR_SEED or random]

FLAGS:
  --instant                Bots answer without thinking time
  --json                   Print your final view as JSON after each game
  -h, --help               Print help information

ENVIRONMENT:
  IMPOSTOR_GENERATION_TIMEOUT_MS   Upper bound on one bot answer (default 10000)
  IMPOSTOR_TIE_BREAK               first-in-roster-order | no-accusation
  IMPOSTOR_BOT_THINK_MS            Bot thinking time for every style
  IMPOSTOR_BOT_THINK_VARIANCE_MS   Random variance around the thinking time
  RUST_LOG                         Log filter (e.g. impostor=debug)
";

/// Notifications buffered for the terminal.
const NOTIFICATION_CAPACITY: usize = 256;

struct Args {
    name: Option<String>,
    seed: Option<u64>,
    instant: bool,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        instant: pargs.contains("--instant"),
        json: pargs.contains("--json"),
        name: pargs.opt_value_from_str("--name")?,
        seed: pargs.opt_value_from_str("--seed")?,
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();

    let config = CliConfig::from_env(args.name, args.seed)?;
    config.validate()?;

    let mut bot = LocalBot::new(config.session.seed);
    if args.instant {
        bot = bot.with_pacing(PacingParams::instant());
    } else if let Some(pacing) = config.pacing {
        bot = bot.with_pacing(pacing);
    }

    let (actor, handle) = SessionActor::new(config.session, Arc::new(bot), Arc::new(WordList))?;
    let session = tokio::spawn(actor.run());
    info!("Session started");

    let mut notifications = handle.subscribe("terminal", NOTIFICATION_CAPACITY).await?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        handle.new_game().await?;
        let Some(results) = play::play_game(&handle, &mut notifications, &mut input).await?
        else {
            break;
        };

        if args.json {
            if let Some(view) = results.human().and_then(|h| results.view_for(&h.id)) {
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
        }

        match play::prompt(&mut input, "Play again? [y/N] ").await? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => continue,
            _ => break,
        }
    }

    handle.close().await?;
    session.await?;
    info!("Session closed");

    Ok(())
}
