use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use lightcycle_arena::input::key_binding;

use crate::session::DriverCommand;

/// Parse one line typed on the console. Key codes (`KeyW`, `ArrowLeft`, ...)
/// steer; `continue`, `stop`, `restart` and `quit` drive the round and
/// `leaderboard` asks for the current standings.
pub fn parse_line(line: &str) -> Option<DriverCommand> {
    let word = line.trim();
    if key_binding(word).is_some() {
        return Some(DriverCommand::Key {
            code: word.to_string(),
        });
    }
    match word.to_ascii_lowercase().as_str() {
        "c" | "continue" => Some(DriverCommand::Continue),
        "s" | "stop" => Some(DriverCommand::StopRound),
        "r" | "restart" => Some(DriverCommand::Restart),
        "l" | "leaderboard" => Some(DriverCommand::ShowLeaderboard),
        "q" | "quit" | "exit" => Some(DriverCommand::Shutdown),
        _ => None,
    }
}

/// Forward parsed console lines to the tick loop until input ends or the
/// loop goes away.
pub async fn forward_lines<R>(reader: R, cmd_tx: mpsc::Sender<DriverCommand>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Console read failed");
                break;
            },
        };
        let Some(cmd) = parse_line(&line) else {
            if !line.trim().is_empty() {
                tracing::debug!(line = %line.trim(), "Unrecognised console input");
            }
            continue;
        };
        if cmd_tx.send(cmd).await.is_err() {
            break;
        }
    }
}
