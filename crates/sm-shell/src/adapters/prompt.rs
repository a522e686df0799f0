//! Line-oriented terminal input.

use std::time::Duration;

use anyhow::{anyhow, Context};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin};
use tokio::task::JoinHandle;

use super::console::Console;

/// Typing this at any prompt goes back one step.
pub const BACK_COMMAND: &str = ":back";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Back,
    /// Input closed.
    Eof,
}

pub struct Prompter<R> {
    lines: Lines<BufReader<R>>,
    console: Console,
}

impl Prompter<Stdin> {
    pub fn stdin(console: Console) -> Self {
        Self::new(tokio::io::stdin(), console)
    }
}

impl<R: AsyncRead + Unpin> Prompter<R> {
    pub fn new(reader: R, console: Console) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            console,
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub async fn ask(&mut self, question: &str) -> anyhow::Result<Answer> {
        self.console.partial(&format!("{question} "));
        let line = self
            .lines
            .next_line()
            .await
            .context("failed to read from terminal")?;
        Ok(match line {
            None => Answer::Eof,
            Some(line) if line.trim() == BACK_COMMAND => Answer::Back,
            Some(line) => Answer::Text(line),
        })
    }
}

/// Awaits a spawned task, printing a dot every `tick` until it finishes.
pub async fn wait_with_progress<T>(
    console: &Console,
    label: &str,
    tick: Duration,
    mut handle: JoinHandle<T>,
) -> anyhow::Result<T> {
    console.partial(label);
    let mut ticker = tokio::time::interval(tick);
    ticker.tick().await;
    loop {
        tokio::select! {
            result = &mut handle => {
                console.line("");
                return result.map_err(|e| anyhow!("background task failed: {e}"));
            }
            _ = ticker.tick() => console.partial("."),
        }
    }
}
