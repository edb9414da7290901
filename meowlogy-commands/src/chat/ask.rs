use meowlogy_chat::{AskOutcome, ChatAssembler, ChatTransport};
use meowlogy_core::{Context, Error};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api_failure;
use crate::chat::render::{AI_SPEAKER, AnswerRenderer};

/// One-shot question: stream the answer to stdout and exit.
pub async fn ask(ctx: &Context<'_>, question: &str) -> Result<(), Error> {
    ctx.require_session()?;

    let mut assembler = ChatAssembler::new(ctx.data.api.clone());
    match stream_answer(ctx, &mut assembler, question).await? {
        AskOutcome::Completed { .. } | AskOutcome::Cleared => Ok(()),
        AskOutcome::Failed(err) => Err(api_failure(err)),
    }
}

/// Send `question` through `assembler`, printing the answer as it grows.
/// Ctrl-C while the answer is in flight clears the conversation.
pub(crate) async fn stream_answer<T: ChatTransport>(
    ctx: &Context<'_>,
    assembler: &mut ChatAssembler<T>,
    question: &str,
) -> Result<AskOutcome, Error> {
    let clear = CancellationToken::new();
    let interrupt = tokio::spawn({
        let clear = clear.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                clear.cancel();
            }
        }
    });

    let mut renderer = AnswerRenderer::for_next_answer(assembler.log());
    let mut started = false;
    let mut print_error = None;

    let result = assembler
        .ask_until(question, &clear, |log| {
            let Some(text) = renderer.update(log.messages()) else {
                return;
            };
            let printed = if started {
                ctx.print(&text)
            } else {
                started = true;
                ctx.print(format!("{AI_SPEAKER}: {}", text.trim_start_matches('\n')))
            };
            if let Err(err) = printed {
                print_error.get_or_insert(err);
            }
        })
        .await;
    interrupt.abort();

    if let Some(err) = print_error {
        return Err(err);
    }

    let outcome = result?;

    if started {
        ctx.print("\n")?;
    }
    match &outcome {
        AskOutcome::Completed { answer } => {
            debug!(chars = answer.chars().count(), "answer printed");
        }
        AskOutcome::Failed(_) => {}
        AskOutcome::Cleared => ctx.say("Conversation cleared.")?,
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::ask;
    use crate::testing::{data_for, printed, signed_in, signed_out};

    #[tokio::test]
    async fn streams_the_answer_under_the_ai_label() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ask-ai"))
            .and(body_json(json!({"question": "Why do cats purr?"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("Mostly contentment."))
            .expect(1)
            .mount(&server)
            .await;

        let data = data_for(&server.uri());
        let (ctx, out) = signed_in(&data);
        ask(&ctx, "  Why do cats purr?  ").await.unwrap();

        assert_eq!(printed(&out), "Cat Care AI: Mostly contentment.\n");
    }

    #[tokio::test]
    async fn server_failure_prints_the_apology() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ask-ai"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let data = data_for(&server.uri());
        let (ctx, out) = signed_in(&data);
        let err = ask(&ctx, "Why do cats purr?").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");

        assert_eq!(
            printed(&out),
            "Cat Care AI: Sorry, there was an error: Sorry, there was an error connecting to the AI service.\n"
        );
    }

    #[tokio::test]
    async fn short_questions_are_rejected_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let data = data_for(&server.uri());
        let (ctx, out) = signed_in(&data);
        let err = ask(&ctx, "hi").await.unwrap_err();

        assert!(err.to_string().contains("at least 5"));
        assert_eq!(printed(&out), "");
    }

    #[tokio::test]
    async fn requires_login() {
        let data = data_for("http://127.0.0.1:9");
        let (ctx, _) = signed_out(&data);
        assert!(ask(&ctx, "Why do cats purr?").await.is_err());
    }
}
