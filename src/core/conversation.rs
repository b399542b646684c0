//! Per-turn conversation state machine.
//!
//! `IDLE -> SUBMITTING -> (success | failure) -> IDLE`. A submission appends
//! the user turn, issues exactly one outbound request carrying the session
//! credential, classifies the payload, and appends the bot turn. Every
//! failure (transport, authorization, classification) folds into a single
//! fixed error turn instead of propagating; the conversation always stays
//! usable.

use std::fmt;

use tracing::debug;

use crate::api::{ChatTransport, TransportError};
use crate::auth::CredentialStore;
use crate::core::classify::{classify, ClassifyError, DisplayStructure};
use crate::core::transcript::{TranscriptStore, Turn};

/// Literal text of the bot turn appended on any failed submission.
pub const FETCH_ERROR_TEXT: &str = "Error: Unable to fetch a response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    Submitting,
}

/// How one call to [`ConversationController::submit`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing was appended.
    Ignored,
    /// A classified bot turn was appended.
    Answered,
    /// The fixed error turn was appended.
    Failed,
}

/// Everything that can go wrong between submit and the bot turn.
#[derive(Debug)]
enum TurnError {
    Transport(TransportError),
    Classify(ClassifyError),
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::Transport(err) => write!(f, "transport: {err}"),
            TurnError::Classify(err) => write!(f, "classification: {err}"),
        }
    }
}

impl From<TransportError> for TurnError {
    fn from(err: TransportError) -> Self {
        TurnError::Transport(err)
    }
}

impl From<ClassifyError> for TurnError {
    fn from(err: ClassifyError) -> Self {
        TurnError::Classify(err)
    }
}

/// Owns the transcript and the input buffer, and drives one turn at a time.
///
/// Collaborators are injected at construction; the controller never reads
/// ambient state. Taking `&mut self` in [`submit`](Self::submit) serializes
/// submissions, so a second one cannot start while the first is in flight.
pub struct ConversationController {
    transport: Box<dyn ChatTransport>,
    credentials: Box<dyn CredentialStore>,
    transcript: TranscriptStore,
    input: String,
    state: ConversationState,
}

impl ConversationController {
    pub fn new(transport: Box<dyn ChatTransport>, credentials: Box<dyn CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
            transcript: TranscriptStore::new(),
            input: String::new(),
            state: ConversationState::Idle,
        }
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    /// Runs one conversation turn for the buffered input.
    ///
    /// Blank or whitespace-only input is a no-op. Otherwise the user turn is
    /// appended first, then exactly one bot turn regardless of outcome, and
    /// the input buffer is cleared on both paths as the final step.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.input.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }

        let query = self.input.clone();
        self.transcript.append(Turn::user(query.clone()));
        self.state = ConversationState::Submitting;

        let outcome = match self.run_query(&query).await {
            Ok(display) => {
                self.transcript.append(Turn::bot(display));
                SubmitOutcome::Answered
            }
            Err(err) => {
                debug!(error = %err, "submission failed");
                self.transcript
                    .append(Turn::bot(DisplayStructure::plain(FETCH_ERROR_TEXT)));
                SubmitOutcome::Failed
            }
        };

        // Both arms above converge here; the buffer is cleared and the
        // machine returns to idle no matter which path was taken.
        self.input.clear();
        self.state = ConversationState::Idle;
        outcome
    }

    async fn run_query(&self, query: &str) -> Result<DisplayStructure, TurnError> {
        let credential = self
            .credentials
            .get()
            .map_err(|err| TransportError::CredentialStore(err.to_string()))?
            .ok_or(TransportError::MissingCredential)?;

        let payload = self.transport.send_query(query, &credential).await?;
        Ok(classify(&payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryCredentialStore;
    use crate::core::classify::FeatureRow;
    use crate::core::transcript::TurnPayload;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Transport stub that pops one canned result per query.
    struct StubTransport {
        results: Mutex<Vec<Result<Value, TransportError>>>,
    }

    impl StubTransport {
        fn with(results: Vec<Result<Value, TransportError>>) -> Box<Self> {
            Box::new(Self {
                results: Mutex::new(results),
            })
        }

        fn answering(payload: Value) -> Box<Self> {
            Self::with(vec![Ok(payload)])
        }
    }

    #[async_trait]
    impl ChatTransport for StubTransport {
        async fn send_query(&self, _query: &str, _credential: &str) -> Result<Value, TransportError> {
            self.results
                .lock()
                .expect("stub lock")
                .pop()
                .expect("stub transport exhausted")
        }
    }

    fn controller_with(transport: Box<dyn ChatTransport>) -> ConversationController {
        ConversationController::new(transport, Box::new(MemoryCredentialStore::with("token-123")))
    }

    fn error_turn() -> Turn {
        Turn::bot(DisplayStructure::plain(FETCH_ERROR_TEXT))
    }

    #[tokio::test]
    async fn blank_submission_is_a_no_op() {
        let mut controller = controller_with(StubTransport::with(vec![]));

        for blank in ["", "   ", "\t\n"] {
            controller.set_input(blank);
            assert_eq!(controller.submit().await, SubmitOutcome::Ignored);
            assert!(controller.transcript().is_empty());
            assert_eq!(controller.state(), ConversationState::Idle);
        }
    }

    #[tokio::test]
    async fn successful_turn_appends_user_then_bot() {
        let mut controller = controller_with(StubTransport::answering(json!("hi there")));

        controller.set_input("hello");
        assert_eq!(controller.submit().await, SubmitOutcome::Answered);

        let turns = controller.transcript().all();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("hello"));
        assert_eq!(turns[1], Turn::bot(DisplayStructure::plain("hi there")));
        assert_eq!(controller.input(), "");
        assert_eq!(controller.state(), ConversationState::Idle);
    }

    #[tokio::test]
    async fn transport_failure_appends_exactly_one_error_turn() {
        let mut controller = controller_with(StubTransport::with(vec![Err(
            TransportError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
        )]));

        controller.set_input("anything");
        assert_eq!(controller.submit().await, SubmitOutcome::Failed);

        let turns = controller.transcript().all();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1], error_turn());
        assert_eq!(controller.input(), "", "buffer clears on failure too");
        assert_eq!(controller.state(), ConversationState::Idle);
    }

    #[tokio::test]
    async fn classification_failure_uses_the_same_error_turn() {
        // Three entries: a mapping shape the classifier rejects.
        let payload = json!({"A": {"x": 1}, "B": {"x": 2}, "C": {"x": 3}});
        let mut controller = controller_with(StubTransport::answering(payload));

        controller.set_input("compare");
        assert_eq!(controller.submit().await, SubmitOutcome::Failed);
        assert_eq!(controller.transcript().last(), Some(&error_turn()));
    }

    #[tokio::test]
    async fn missing_credential_fails_without_reaching_the_wire() {
        let mut controller = ConversationController::new(
            StubTransport::with(vec![]),
            Box::new(MemoryCredentialStore::empty()),
        );

        controller.set_input("hello");
        assert_eq!(controller.submit().await, SubmitOutcome::Failed);
        assert_eq!(controller.transcript().last(), Some(&error_turn()));
    }

    #[tokio::test]
    async fn conversation_stays_usable_after_a_failure() {
        let mut controller = controller_with(StubTransport::with(vec![
            Ok(json!("recovered")),
            Err(TransportError::Unauthorized),
        ]));

        controller.set_input("first");
        assert_eq!(controller.submit().await, SubmitOutcome::Failed);
        controller.set_input("second");
        assert_eq!(controller.submit().await, SubmitOutcome::Answered);

        assert_eq!(controller.transcript().len(), 4);
        assert_eq!(
            controller.transcript().last(),
            Some(&Turn::bot(DisplayStructure::plain("recovered")))
        );
    }

    #[tokio::test]
    async fn compare_query_ends_with_a_comparison_turn() {
        let payload = json!({
            "Product A": {"price": 10, "rating": 4},
            "Product B": {"price": 12}
        });
        let mut controller = controller_with(StubTransport::answering(payload));

        controller.set_input("compare A and B");
        assert_eq!(controller.submit().await, SubmitOutcome::Answered);

        let turns = controller.transcript().all();
        assert_eq!(turns[0], Turn::user("compare A and B"));
        match &turns[1].payload {
            TurnPayload::Display(DisplayStructure::Comparison {
                label_a,
                label_b,
                features,
            }) => {
                assert_eq!(label_a, "Product A");
                assert_eq!(label_b, "Product B");
                assert_eq!(
                    features,
                    &vec![
                        FeatureRow::new("price", "10", "12"),
                        FeatureRow::new("rating", "4", "N/A"),
                    ]
                );
            }
            other => panic!("expected comparison bot turn, got {other:?}"),
        }
    }
}
