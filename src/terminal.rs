//! Read-eval-print loop over any line source.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::conversation::{Role, Session, BOT_NAME, FAREWELL, KICKOFF_PROMPT};

const EXIT_COMMANDS: [&str; 3] = ["sair", "exit", "quit"];
const USER_PROMPT: &str = "🙋 Você: ";

pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim();
    EXIT_COMMANDS
        .iter()
        .any(|cmd| cmd.eq_ignore_ascii_case(input))
}

/// Drives `session` from `input` until an exit command or end of input.
///
/// With `kickoff` set, the model is first asked to introduce itself instead of
/// showing the canned greeting.
pub async fn run<R, W>(session: &mut Session, input: R, mut output: W, kickoff: bool) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(format!("\n🤖 {BOT_NAME} está pronto para começar!\n").as_bytes())
        .await?;
    output
        .write_all("   Digite 'sair' a qualquer momento para encerrar.\n".as_bytes())
        .await?;

    if kickoff {
        let opening = reply_line(session, KICKOFF_PROMPT).await;
        output.write_all(opening.as_bytes()).await?;
    } else if let Some(greeting) = session
        .transcript()
        .iter()
        .find(|m| m.role() == Role::Assistant)
    {
        let line = format!("\n🤖 {BOT_NAME}: {}\n", greeting.content());
        output.write_all(line.as_bytes()).await?;
    }

    let mut lines = input.lines();
    loop {
        output.write_all(USER_PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            debug!("input closed");
            break;
        };
        if is_exit_command(&line) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let answer = reply_line(session, &line).await;
        output.write_all(answer.as_bytes()).await?;
    }

    output
        .write_all(format!("\n🤖 {BOT_NAME}: {FAREWELL}\n").as_bytes())
        .await?;
    output.flush().await?;
    Ok(())
}

async fn reply_line(session: &mut Session, text: &str) -> String {
    match session.submit(text).await {
        Ok(reply) => format!("\n🤖 {BOT_NAME}: {reply}\n"),
        Err(err) => {
            warn!(error = %err, "turn failed");
            format!("\n{}\n", err.user_message())
        }
    }
}
