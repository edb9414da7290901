use async_trait::async_trait;
use futures::StreamExt;
use meowlogy_api::{ApiClient, ApiError, ChunkStream};
use meowlogy_utils::validation::ValidationError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    conversation::ConversationLog,
    decoder::Utf8StreamDecoder,
    error::ChatError,
    state::{ChatState, Effect, Transition},
    welcome::welcome_text,
};

const NETWORK_ERROR: &str = "Network error. Please check your connection.";
const AI_SERVICE_ERROR: &str = "Sorry, there was an error connecting to the AI service.";
const NO_RESPONSE: &str = "No response received from AI service.";

/// Opens the streaming answer for one question.
#[async_trait]
pub trait ChatTransport {
    async fn open(&self, question: &str) -> Result<ChunkStream, ApiError>;
}

#[async_trait]
impl ChatTransport for ApiClient {
    async fn open(&self, question: &str) -> Result<ChunkStream, ApiError> {
        self.ask_ai(question).await
    }
}

/// How a send operation ended. Validation problems are errors instead,
/// since they never touch the conversation.
#[derive(Debug)]
pub enum AskOutcome {
    Completed { answer: String },
    Failed(ApiError),
    /// The conversation was cleared while the answer was in flight.
    Cleared,
}

/// Turns a chunked answer into one AI message that grows in place.
pub struct ChatAssembler<T> {
    transport: T,
    log: ConversationLog,
    state: ChatState,
    error: Option<String>,
    welcome: String,
}

#[derive(Default)]
struct Outward {
    rejected: Option<ValidationError>,
    dispatch: Option<String>,
}

impl<T: ChatTransport> ChatAssembler<T> {
    pub fn new(transport: T) -> Self {
        Self::with_welcome(transport, welcome_text())
    }

    pub fn with_welcome(transport: T, welcome: impl Into<String>) -> Self {
        let welcome = welcome.into();
        Self {
            transport,
            log: ConversationLog::seeded(welcome.clone()),
            state: ChatState::Idle,
            error: None,
            welcome,
        }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// The transient error from the last failed or rejected send, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Reset to the seed message. Also recovers from a send whose future was
    /// dropped before it reached a terminal state.
    pub fn clear(&mut self) {
        let transition = self.state.clear();
        self.apply(transition, &mut |_: &ConversationLog| {});
    }

    pub async fn ask<F>(&mut self, input: &str, on_update: F) -> Result<AskOutcome, ChatError>
    where
        F: FnMut(&ConversationLog),
    {
        self.ask_until(input, &CancellationToken::new(), on_update)
            .await
    }

    /// Send `input` and stream the answer into the log, calling `on_update`
    /// after every change to the placeholder text. Cancelling `clear` is a
    /// request to clear the conversation: the stream is dropped and the log
    /// goes back to its seed.
    pub async fn ask_until<F>(
        &mut self,
        input: &str,
        clear: &CancellationToken,
        mut on_update: F,
    ) -> Result<AskOutcome, ChatError>
    where
        F: FnMut(&ConversationLog),
    {
        let submitted = self.state.submit(input)?;
        self.apply(submitted, &mut on_update);

        let validated = self.state.validate(self.log.len())?;
        let outward = self.apply(validated, &mut on_update);
        if let Some(err) = outward.rejected {
            debug!(%err, "question rejected before sending");
            return Err(err.into());
        }
        let Some(question) = outward.dispatch else {
            return Err(ChatError::InvalidTransition {
                state: self.state.name(),
                event: "dispatch",
            });
        };

        let opened = tokio::select! {
            biased;
            _ = clear.cancelled() => None,
            result = self.transport.open(&question) => Some(result),
        };
        let mut stream = match opened {
            None => return Ok(self.abandon()),
            Some(Ok(stream)) => stream,
            Some(Err(err)) => return self.fail(err, &mut on_update),
        };

        let streaming = self.state.opened()?;
        self.apply(streaming, &mut on_update);

        let mut decoder = Utf8StreamDecoder::new();
        loop {
            let next = tokio::select! {
                biased;
                _ = clear.cancelled() => None,
                next = stream.next() => Some(next),
            };

            match next {
                None => {
                    drop(stream);
                    return Ok(self.abandon());
                }
                Some(Some(Ok(bytes))) => {
                    let text = decoder.decode(&bytes);
                    let transition = self.state.chunk(&text)?;
                    self.apply(transition, &mut on_update);
                }
                Some(Some(Err(err))) => return self.fail(err, &mut on_update),
                Some(None) => break,
            }
        }

        let tail = decoder.finish();
        let transition = self.state.chunk(&tail)?;
        self.apply(transition, &mut on_update);

        let answer = match &self.state {
            ChatState::Streaming { answer, .. } => answer.clone(),
            _ => String::new(),
        };
        let completed = self.state.finish()?;
        self.apply(completed, &mut on_update);
        let settled = self.state.settle()?;
        self.apply(settled, &mut on_update);

        info!(chars = answer.chars().count(), "answer completed");
        Ok(AskOutcome::Completed { answer })
    }

    fn fail<F>(&mut self, err: ApiError, on_update: &mut F) -> Result<AskOutcome, ChatError>
    where
        F: FnMut(&ConversationLog),
    {
        warn!(?err, "ask-ai request failed");
        let failed = self.state.fail(failure_reason(&err))?;
        self.apply(failed, on_update);
        let settled = self.state.settle()?;
        self.apply(settled, on_update);

        Ok(AskOutcome::Failed(err))
    }

    fn abandon(&mut self) -> AskOutcome {
        info!(state = self.state.name(), "conversation cleared mid-answer; stream dropped");
        self.clear();
        AskOutcome::Cleared
    }

    fn apply<F>(&mut self, transition: Transition, on_update: &mut F) -> Outward
    where
        F: FnMut(&ConversationLog),
    {
        let mut outward = Outward::default();
        for effect in transition.effects {
            match effect {
                Effect::ClearError => self.error = None,
                Effect::ShowError(text) => self.error = Some(text),
                Effect::Reject(err) => {
                    self.error = Some(err.to_string());
                    outward.rejected = Some(err);
                }
                Effect::Append(message) => self.log.push(message),
                Effect::SetText { index, text } => {
                    if self.log.set_text(index, text) {
                        on_update(&self.log);
                    }
                }
                Effect::Dispatch { question } => outward.dispatch = Some(question),
                Effect::ResetLog => self.log.reset(self.welcome.clone()),
            }
        }
        self.state = transition.next;
        outward
    }
}

fn failure_reason(err: &ApiError) -> &'static str {
    match err {
        ApiError::Network(_) => NETWORK_ERROR,
        ApiError::NoBody => NO_RESPONSE,
        _ => AI_SERVICE_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::{StreamExt, stream};
    use meowlogy_api::{ApiError, ChunkStream};
    use meowlogy_utils::validation::ValidationError;
    use tokio_util::sync::CancellationToken;

    use super::{AskOutcome, ChatAssembler, ChatTransport};
    use crate::{conversation::Sender, error::ChatError, state::ChatState};

    const WELCOME: &str = "Hi! Ask me about cats.";

    enum Script {
        Chunks(Vec<Vec<u8>>),
        ChunksThenError(Vec<Vec<u8>>),
        OpenError(fn() -> ApiError),
        Pending,
    }

    /// In-memory stand-in for the collaborator; records every opened question.
    struct ScriptedTransport {
        script: Script,
        opened: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(script: Script) -> Self {
            Self {
                script,
                opened: Mutex::new(Vec::new()),
            }
        }

        fn text(chunks: &[&str]) -> Self {
            Self::new(Script::Chunks(
                chunks.iter().map(|c| c.as_bytes().to_vec()).collect(),
            ))
        }

        fn opened(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    fn to_stream(chunks: &[Vec<u8>], fail_at_end: bool) -> ChunkStream {
        let mut items: Vec<Result<Bytes, ApiError>> = chunks
            .iter()
            .map(|c| Ok(Bytes::from(c.clone())))
            .collect();
        if fail_at_end {
            items.push(Err(ApiError::Server {
                status: 500,
                detail: "stream aborted".to_owned(),
            }));
        }
        stream::iter(items).boxed()
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn open(&self, question: &str) -> Result<ChunkStream, ApiError> {
            self.opened.lock().unwrap().push(question.to_owned());
            match &self.script {
                Script::Chunks(chunks) => Ok(to_stream(chunks, false)),
                Script::ChunksThenError(chunks) => Ok(to_stream(chunks, true)),
                Script::OpenError(make) => Err(make()),
                Script::Pending => Ok(stream::pending().boxed()),
            }
        }
    }

    fn assembler(transport: ScriptedTransport) -> ChatAssembler<ScriptedTransport> {
        ChatAssembler::with_welcome(transport, WELCOME)
    }

    #[tokio::test]
    async fn placeholder_grows_in_place_chunk_by_chunk() {
        let mut chat = assembler(ScriptedTransport::text(&["Hel", "lo, ", "cat!"]));
        let mut seen = Vec::new();

        let outcome = chat
            .ask("Say hello please", |log| {
                let last = log.last().unwrap();
                seen.push((log.len(), last.sender, last.text.clone()));
            })
            .await
            .unwrap();

        assert_eq!(
            seen,
            vec![
                (3, Sender::Ai, "Hel".to_owned()),
                (3, Sender::Ai, "Hello, ".to_owned()),
                (3, Sender::Ai, "Hello, cat!".to_owned()),
            ]
        );
        assert!(matches!(outcome, AskOutcome::Completed { ref answer } if answer == "Hello, cat!"));

        let messages = chat.log().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].text, WELCOME);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].text, "Say hello please");
        assert_eq!(messages[2].text, "Hello, cat!");
        assert_eq!(chat.state(), &ChatState::Idle);
        assert_eq!(chat.error(), None);
        assert_eq!(chat.transport.opened(), vec!["Say hello please"]);
    }

    #[tokio::test]
    async fn multibyte_characters_split_across_chunks_survive() {
        let bytes = "Purr \u{1f63a}!".as_bytes();
        let chunks = vec![bytes[..6].to_vec(), bytes[6..8].to_vec(), bytes[8..].to_vec()];
        let mut chat = assembler(ScriptedTransport::new(Script::Chunks(chunks)));
        let mut seen = Vec::new();

        chat.ask("What does a happy cat do?", |log| {
            seen.push(log.last().unwrap().text.clone());
        })
        .await
        .unwrap();

        assert_eq!(seen, vec!["Purr ", "Purr \u{1f63a}!"]);
        assert!(seen.iter().all(|text| !text.contains('\u{fffd}')));
    }

    #[tokio::test]
    async fn invalid_questions_never_touch_the_log_or_network() {
        let mut chat = assembler(ScriptedTransport::text(&["unused"]));

        let too_long = "x".repeat(501);
        for input in ["", "  hi  ", too_long.as_str()] {
            let err = chat.ask(input, |_| panic!("no updates expected")).await.unwrap_err();
            assert!(matches!(err, ChatError::Validation(_)));
        }

        assert_eq!(chat.log().len(), 1);
        assert!(chat.transport.opened().is_empty());
        assert_eq!(
            chat.error(),
            Some(ValidationError::QuestionTooLong.to_string().as_str())
        );
        assert!(chat.state().is_idle());
    }

    #[tokio::test]
    async fn failure_before_any_chunk_leaves_apology_and_error() {
        let mut chat = assembler(ScriptedTransport::new(Script::ChunksThenError(Vec::new())));

        let outcome = chat.ask("Is catnip safe?", |_| {}).await.unwrap();

        assert!(matches!(outcome, AskOutcome::Failed(ApiError::Server { .. })));
        let placeholder = chat.log().last().unwrap();
        assert_eq!(placeholder.sender, Sender::Ai);
        assert_eq!(
            placeholder.text,
            "Sorry, there was an error: Sorry, there was an error connecting to the AI service."
        );
        assert_eq!(
            chat.error(),
            Some("Sorry, there was an error connecting to the AI service.")
        );
        assert_eq!(chat.log().len(), 3);
        assert!(chat.state().is_idle());
    }

    #[tokio::test]
    async fn failure_mid_stream_keeps_partial_text() {
        let mut chat = assembler(ScriptedTransport::new(Script::ChunksThenError(vec![
            b"Catnip is".to_vec(),
        ])));

        chat.ask("Is catnip safe?", |_| {}).await.unwrap();

        let text = &chat.log().last().unwrap().text;
        assert!(text.starts_with("Catnip is\n\nSorry, there was an error: "));
    }

    #[tokio::test]
    async fn missing_body_is_reported_distinctly() {
        let mut chat = assembler(ScriptedTransport::new(Script::OpenError(|| ApiError::NoBody)));

        let outcome = chat.ask("Is catnip safe?", |_| {}).await.unwrap();

        assert!(matches!(outcome, AskOutcome::Failed(ApiError::NoBody)));
        assert_eq!(
            chat.log().last().unwrap().text,
            "Sorry, there was an error: No response received from AI service."
        );
        assert_eq!(chat.error(), Some("No response received from AI service."));
    }

    #[tokio::test]
    async fn error_status_still_fills_the_placeholder() {
        let mut chat = assembler(ScriptedTransport::new(Script::OpenError(|| {
            ApiError::Server {
                status: 500,
                detail: "HTTP 500: Internal Server Error".to_owned(),
            }
        })));

        chat.ask("Is catnip safe?", |_| {}).await.unwrap();
        assert!(!chat.log().last().unwrap().text.is_empty());
        assert!(chat.error().is_some());
    }

    #[tokio::test]
    async fn next_send_clears_the_previous_error() {
        let mut chat = assembler(ScriptedTransport::text(&["Yes."]));
        assert!(chat.ask("hey", |_| {}).await.is_err());
        assert!(chat.error().is_some());

        chat.ask("Is catnip safe?", |_| {}).await.unwrap();
        assert_eq!(chat.error(), None);
        assert_eq!(chat.log().len(), 3);
    }

    #[tokio::test]
    async fn clear_always_leaves_only_the_seed() {
        let mut chat = assembler(ScriptedTransport::text(&["Meow."]));
        for _ in 0..3 {
            chat.ask("Tell me a cat fact", |_| {}).await.unwrap();
        }
        assert_eq!(chat.log().len(), 7);

        chat.clear();
        assert_eq!(chat.log().len(), 1);
        assert_eq!(chat.log().messages()[0].sender, Sender::Ai);
        assert_eq!(chat.log().messages()[0].text, WELCOME);

        chat.clear();
        assert_eq!(chat.log().len(), 1);
    }

    #[tokio::test]
    async fn clear_during_stream_cancels_it() {
        let mut chat = assembler(ScriptedTransport::new(Script::Pending));
        let clear = CancellationToken::new();

        let trigger = clear.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let outcome = chat
            .ask_until("Will this ever end?", &clear, |_| {})
            .await
            .unwrap();

        assert!(matches!(outcome, AskOutcome::Cleared));
        assert_eq!(chat.log().len(), 1);
        assert_eq!(chat.log().messages()[0].text, WELCOME);
        assert!(chat.state().is_idle());
        assert_eq!(chat.error(), None);
    }
}
