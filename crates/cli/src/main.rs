//! Chess CLI
//!
//! Play a timed game against the computer from the terminal.

use std::env;
use std::error::Error;

use chess_cli::render;
use chess_cli::{parse_command, CliArgs, InputError, Response, Session, SessionEvent};
use tokio::io::{AsyncBufReadExt, BufReader};

fn print_usage() {
    println!("Chess");
    println!();
    println!("Usage:");
    println!("  chess [--config FILE] [--minutes M] [--increment S] [--seed N] [--fen FEN] [--black]");
    println!();
    println!("Options:");
    println!("  -c, --config FILE    read settings from a TOML file");
    println!("  -m, --minutes M      minutes per side (default 5)");
    println!("  -i, --increment S    seconds added per move (default 5)");
    println!("  -s, --seed N         seed the computer opponent");
    println!("  -f, --fen FEN        start from a position (placement and side to move)");
    println!("  -b, --black          play the black pieces");
    println!();
    println!("Set RUST_LOG to adjust logging, e.g. RUST_LOG=chess_core=debug");
}

fn print_response(resp: Response) {
    match resp {
        Response::Moved(outcome) => {
            println!("{}", render::move_line(&outcome));
            if outcome.status.is_terminal() {
                println!("{}", render::game_over_line(outcome.status, outcome.winner));
            }
        }
        Response::PauseToggled(true) => println!("Clocks paused"),
        Response::PauseToggled(false) => println!("Clocks running"),
        Response::TimeControlChanged(tc) => println!("Time control set to {tc}"),
        Response::Restarted => println!("New game"),
        Response::Text(text) => println!("{text}"),
        Response::Saved(path) => println!("Saved to {}", path.display()),
        Response::Quit => {}
    }
}

fn print_event(session: &Session, event: SessionEvent) {
    match event {
        SessionEvent::ComputerMoved(outcome) => println!("{}", render::move_line(&outcome)),
        SessionEvent::GameOver { status, winner } => {
            println!("{}", render::game_over_line(status, winner));
            println!("Type 'restart' for a new game");
        }
        SessionEvent::LowTime(color) => {
            println!(
                "{color} is low on time: {}",
                render::clock_line(&session.clock(), session.config().low_time_seconds)
            );
        }
        SessionEvent::ComputerFailed(reason) => eprintln!("Computer could not move: {reason}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_core=info,chess_cli=info,random_engine=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match CliArgs::parse(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {e}");
            print_usage();
            std::process::exit(2);
        }
    };
    if cli.help {
        print_usage();
        return Ok(());
    }
    let config = cli.resolve()?;

    let (mut session, mut events) = Session::new(config)?;
    tracing::info!(
        "chess v{} starting: {} vs {}, {}",
        env!("CARGO_PKG_VERSION"),
        session.config().human,
        session.config().engine,
        session.config().time_control()
    );
    session.start().await;

    {
        let game = session.game();
        let game = game.lock().await;
        println!("{}", render::board_view(&game));
    }
    println!("You play {}. Type 'help' for commands.", session.config().human);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let cmd = match parse_command(&line) {
                    Ok(cmd) => cmd,
                    Err(InputError::Empty) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match session.execute(cmd).await {
                    Ok(Response::Quit) => break,
                    Ok(resp) => print_response(resp),
                    Err(e) => println!("{e}"),
                }
            }
            Some(event) = events.recv() => print_event(&session, event),
        }
    }

    session.shutdown().await;
    Ok(())
}
