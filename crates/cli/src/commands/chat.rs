//! Chat command handler: an interactive question loop.

use clap::Args;
use pdfrag_core::{config::AppConfig, AppResult, Stage};
use pdfrag_knowledge::RagEngine;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const PROMPT: &str = "\nFaça sua pergunta (ou 'sair' para encerrar): ";
const GOODBYE: &str = "Encerrando o chat. Até logo!";
const EXIT_WORDS: [&str; 3] = ["sair", "exit", "quit"];

/// Interactive question loop
#[derive(Args, Debug)]
pub struct ChatCommand {}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        config.validate(Stage::Query)?;
        tracing::info!("Executing chat command");

        let engine = RagEngine::from_config(config).await?;
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();

        chat_loop(stdin, &mut stdout, |question| {
            let engine = &engine;
            async move { engine.search_prompt(&question).await }
        })
        .await
    }
}

/// What a line typed at the chat prompt asks for.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput {
    Exit,
    Blank,
    Question(String),
}

fn classify(line: &str) -> ChatInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        ChatInput::Blank
    } else if EXIT_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
        ChatInput::Exit
    } else {
        ChatInput::Question(trimmed.to_string())
    }
}

/// Read questions from `input` until an exit word or EOF, writing each
/// answer to `out`. A failed answer is reported and the loop continues.
async fn chat_loop<R, W, F, Fut>(input: R, out: &mut W, mut answer: F) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AppResult<String>>,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            tracing::debug!("End of input, leaving chat");
            return Ok(());
        };

        match classify(&line) {
            ChatInput::Exit => {
                writeln!(out, "{}", GOODBYE)?;
                return Ok(());
            }
            ChatInput::Blank => continue,
            ChatInput::Question(question) => match answer(question).await {
                Ok(text) => writeln!(out, "{}", text)?,
                Err(e) => {
                    tracing::error!("Failed to answer question: {}", e);
                    eprintln!("Error: {}", e);
                }
            },
        }
    }
}
