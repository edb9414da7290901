use meowlogy_chat::{AskOutcome, ChatAssembler, ChatError, ChatTransport};
use meowlogy_core::{Context, Error};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::chat::ask::stream_answer;
use crate::chat::render::history_line;

const PROMPT: &str = "> ";
const HELP: &str = "Type a question, or /history, /clear, /quit.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    Clear,
    History,
    Quit,
    Help,
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        match line {
            "/clear" => Self::Clear,
            "/history" => Self::History,
            "/quit" | "/exit" => Self::Quit,
            "/help" | "/?" => Self::Help,
            question => Self::Ask(question.to_owned()),
        }
    }
}

/// Interactive conversation over stdin. Ctrl-C at the prompt quits; Ctrl-C
/// while an answer is streaming clears the conversation instead.
pub async fn chat(ctx: &Context<'_>) -> Result<(), Error> {
    let username = ctx.require_session()?;
    debug!(username = %username, "chat session started");

    let mut assembler = ChatAssembler::new(ctx.data.api.clone());
    print_log(ctx, &assembler)?;
    ctx.say(HELP)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        ctx.print(PROMPT)?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            ctx.say("")?;
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => ctx.say(HELP)?,
            ReplCommand::History => print_log(ctx, &assembler)?,
            ReplCommand::Clear => {
                assembler.clear();
                ctx.say("Conversation cleared.")?;
                print_log(ctx, &assembler)?;
            }
            ReplCommand::Ask(question) => send(ctx, &mut assembler, &question).await?,
        }
    }

    Ok(())
}

/// Streams one answer, then shows the transient error of a failed send
/// before dismissing it. Rejected questions are reported and the loop goes on.
async fn send<T: ChatTransport>(
    ctx: &Context<'_>,
    assembler: &mut ChatAssembler<T>,
    question: &str,
) -> Result<(), Error> {
    match stream_answer(ctx, assembler, question).await {
        Ok(AskOutcome::Failed(_)) => {
            if let Some(error) = assembler.error() {
                ctx.say(format!("Error: {error}"))?;
            }
        }
        Ok(_) => {}
        Err(err) => match err.downcast_ref::<ChatError>() {
            Some(ChatError::Validation(invalid)) => ctx.say(invalid.to_string())?,
            _ => return Err(err),
        },
    }

    assembler.dismiss_error();
    Ok(())
}

fn print_log<T: ChatTransport>(
    ctx: &Context<'_>,
    assembler: &ChatAssembler<T>,
) -> Result<(), Error> {
    for message in assembler.log().messages() {
        ctx.say(history_line(message))?;
    }
    Ok(())
}
