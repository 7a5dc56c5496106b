// Line-oriented terminal front-end: read a line, dispatch one event, print the next frame.

use crate::domain::{BattleApi, BattleOutcome};
use crate::interface_adapters::input::{InputLine, parse_line, select_event};
use crate::interface_adapters::render::render_frame;
use crate::use_cases::{BattleFlow, Screen, UiEvent};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const HELP: &str = "Enter a number to choose, b to go back, r to retry, q to quit.";

/// Starts a battle and drives it from `input` until the battle is decided,
/// the user quits or the input ends. Returns the outcome when decided.
pub async fn run<A, R, W>(
    flow: &mut BattleFlow<A>,
    enemy_names: &[String],
    input: R,
    mut output: W,
) -> io::Result<Option<BattleOutcome>>
where
    A: BattleApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut screen = flow.start(enemy_names).await.map_err(|error| {
        tracing::error!(%error, "failed to start battle.");
        io::Error::other(error.to_string())
    })?;
    write_text(&mut output, &format!("{HELP}\n")).await?;

    let mut lines = input.lines();
    loop {
        write_text(&mut output, &render_frame(flow.snapshot(), &screen)).await?;
        if let Screen::Finished { outcome } = screen {
            tracing::info!(?outcome, "battle finished.");
            return Ok(Some(outcome));
        }

        let Some(line) = lines.next_line().await? else {
            tracing::info!("input closed.");
            return Ok(None);
        };
        let event = match parse_line(&line) {
            Some(InputLine::Quit) => return Ok(None),
            Some(InputLine::Back) => UiEvent::Cancel,
            Some(InputLine::Retry) => UiEvent::Retry,
            Some(InputLine::Select(number)) => match select_event(&screen, number) {
                Some(event) => event,
                None => {
                    write_text(&mut output, "! no such option\n").await?;
                    continue;
                }
            },
            None => {
                write_text(&mut output, &format!("! {HELP}\n")).await?;
                continue;
            }
        };

        match flow.dispatch(event).await {
            Ok(next) => screen = next,
            Err(error) => {
                tracing::warn!(%error, ?event, "event rejected.");
                write_text(&mut output, &format!("! {error}\n")).await?;
                screen = flow
                    .screen()
                    .map_err(|error| io::Error::other(error.to_string()))?;
            }
        }
    }
}

async fn write_text<W>(output: &mut W, text: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.flush().await
}
