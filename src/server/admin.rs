//! Operator console
//!
//! Reads one command per line and reports on, or stops, the server.
//! Runs on its own OS thread with blocking I/O, outside the runtime.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::server::state::ServerState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Quit,
    Help,
    Empty,
    Unknown(String),
}

impl Command {
    /// Commands are matched after trimming and lower-casing.
    pub fn parse(line: &str) -> Self {
        let cmd = line.trim().to_lowercase();
        match cmd.as_str() {
            "status" => Command::Status,
            "quit" => Command::Quit,
            "help" => Command::Help,
            "" => Command::Empty,
            _ => Command::Unknown(cmd),
        }
    }
}

/// Runs until `quit` or until the input stream ends. End of input leaves
/// the server running.
pub fn run<R, W>(state: &ServerState, input: R, mut output: W) -> std::io::Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        match Command::parse(&line?) {
            Command::Status => {
                output.write_all(render_status(state).as_bytes())?;
            }
            Command::Quit => {
                output.write_all(b"Initiating server shutdown...\n")?;
                output.flush()?;
                if state.request_shutdown() {
                    tracing::info!("Shutdown requested from console");
                }
                return Ok(());
            }
            Command::Help => {
                output.write_all(HELP.as_bytes())?;
            }
            Command::Empty => continue,
            Command::Unknown(cmd) => {
                writeln!(output, "Unknown command: {}", cmd)?;
                writeln!(output, "Type 'help' for available commands")?;
            }
        }
        output.flush()?;
    }

    tracing::debug!("Console input closed");
    Ok(())
}

/// Starts the console on stdin/stdout in a detached thread.
pub fn spawn_stdio(state: Arc<ServerState>) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("admin-console".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            if let Err(e) = run(&state, stdin.lock(), std::io::stdout()) {
                tracing::error!("Console error: {}", e);
            }
        })
}

const HELP: &str = "\nAvailable commands:\n  status - Show server status and statistics\n  quit   - Gracefully shutdown the server\n  help   - Show this help message\n\n";

pub fn render_status(state: &ServerState) -> String {
    let snap = state.snapshot();
    format!(
        "\n=== SERVER STATUS ===\n\
         Uptime: {}\n\
         Total Users: {}\n\
         Active Users: {}\n\
         Directory: {}\n\
         Status: {}\n\
         ====================\n\n",
        format_uptime(snap.uptime),
        snap.total_users,
        snap.active_users,
        state.directory().display(),
        if snap.shutting_down { "Shutting down" } else { "Running" },
    )
}

/// Formats as e.g. "1h2m3.5s", "4m0.0s" or "12.3s".
pub fn format_uptime(d: Duration) -> String {
    let total = d.as_secs();
    let (h, m) = (total / 3600, (total % 3600) / 60);
    let secs = (total % 60) as f64 + f64::from(d.subsec_millis()) / 1000.0;

    if h > 0 {
        format!("{}h{}m{:.1}s", h, m, secs)
    } else if m > 0 {
        format!("{}m{:.1}s", m, secs)
    } else {
        format!("{:.1}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("status\n"), Command::Status);
        assert_eq!(Command::parse("  QUIT "), Command::Quit);
        assert_eq!(Command::parse("Help"), Command::Help);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse("restart"), Command::Unknown("restart".into()));
    }

    #[test]
    fn uptime_format() {
        assert_eq!(format_uptime(Duration::from_millis(12_300)), "12.3s");
        assert_eq!(format_uptime(Duration::from_secs(240)), "4m0.0s");
        assert_eq!(format_uptime(Duration::from_millis(3_723_500)), "1h2m3.5s");
    }
}
