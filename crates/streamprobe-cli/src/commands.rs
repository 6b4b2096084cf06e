//! Interactive harness commands
//!
//! The REPL is the display collaborator: it renders log rows, maps a
//! selected row back to its full event text, and drives the session
//! with user commands. Player notices and user input are handled on
//! the same task, so log appends stay serialized with display reads.

use streamprobe_core::{HarnessSession, PlayerFacade, PlayerNotice, SettingsStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "\
Commands:
  url <address>   set the stream URL under test
  play            start or resume playback
  pause           pause playback
  stop            stop playback (destroys the current item)
  live            jump to the live edge
  log             show all recorded events
  show <index>    show the full text of one event
  errors          show the player's internal error log
  help            show this help
  quit            exit";

/// Run the interactive harness until the user quits
pub async fn run<P: PlayerFacade, S: SettingsStore>(
    mut session: HarnessSession<P, S>,
    mut notices: mpsc::UnboundedReceiver<PlayerNotice>,
) -> anyhow::Result<()> {
    match session.current_url() {
        Some(url) => println!("Stream URL: {url}"),
        None => println!("No stream URL set. Use: url <address>"),
    }
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_command(&mut session, line.trim()).await {
                    break;
                }
            }
            Some(notice) = notices.recv() => {
                let before = session.row_count();
                session.handle_notice(notice);
                // Render anything the notice appended
                for index in before..session.row_count() {
                    if let Some(row) = session.render_row(index) {
                        println!("{row}");
                    }
                }
            }
        }
    }

    Ok(())
}

/// Dispatch one command line; returns false on quit
async fn handle_command<P: PlayerFacade, S: SettingsStore>(
    session: &mut HarnessSession<P, S>,
    line: &str,
) -> bool {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "url" => {
            if rest.is_empty() {
                match session.current_url() {
                    Some(url) => println!("Stream URL: {url}"),
                    None => println!("No stream URL set. Use: url <address>"),
                }
            } else {
                session.set_url(rest).await;
                print_last_row(session);
            }
        }
        "play" => {
            session.play().await;
            print_last_row(session);
        }
        "pause" => {
            session.pause().await;
            print_last_row(session);
        }
        "stop" => {
            session.stop().await;
            print_last_row(session);
        }
        "live" => {
            session.live().await;
            print_last_row(session);
        }
        "log" => print_log(session),
        "show" => match rest.parse::<usize>().ok().and_then(|i| session.event_text(i)) {
            Some(text) => println!("{text}"),
            None => println!("No event at index '{rest}'"),
        },
        "errors" => {
            let errors = session.player_error_log();
            if errors.is_empty() {
                println!("Player error log is empty");
            } else {
                for entry in errors {
                    println!("{entry}");
                }
            }
        }
        "help" => println!("{HELP}"),
        "quit" | "exit" => return false,
        other => println!("Unknown command '{other}'. Type 'help' for commands."),
    }

    true
}

fn print_last_row<P: PlayerFacade, S: SettingsStore>(session: &HarnessSession<P, S>) {
    if let Some(row) = session.row_count().checked_sub(1).and_then(|i| session.render_row(i)) {
        println!("{row}");
    }
}

fn print_log<P: PlayerFacade, S: SettingsStore>(session: &HarnessSession<P, S>) {
    if session.row_count() == 0 {
        println!("No events recorded yet");
        return;
    }
    for index in 0..session.row_count() {
        if let Some(row) = session.render_row(index) {
            println!("{index:>3}  {row}");
        }
    }
}
