//! Scoring: rubric + resume text → raw analysis from the scoring model.
//!
//! The returned text is not validated here. Format compliance is the
//! model's job and is tolerated by [`crate::pipeline::parse`].

use crate::prompts::{candidate_message, EvaluationPrompt};
use crate::transport::{Message, ModelTransport};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Sends a resume to the scoring model.
#[derive(Clone)]
pub struct ScoringClient {
    transport: Arc<dyn ModelTransport>,
    model: String,
    timeout: Duration,
}

impl ScoringClient {
    pub fn new(transport: Arc<dyn ModelTransport>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            model: model.into(),
            timeout,
        }
    }

    /// Score `candidate_text` against `prompt`.
    ///
    /// Returns `None` without any network call when the text is empty, and
    /// `None` after a warning when the call fails, times out, or comes back
    /// empty. Callers treat `None` as a skip.
    pub async fn score(&self, prompt: &EvaluationPrompt, candidate_text: &str) -> Option<String> {
        if candidate_text.trim().is_empty() {
            return None;
        }

        let messages = build_messages(prompt, candidate_text);
        let call = self.transport.complete(&messages, &self.model);

        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(analysis)) if analysis.trim().is_empty() => {
                warn!("Scoring model '{}' returned an empty analysis", self.model);
                None
            }
            Ok(Ok(analysis)) => {
                debug!("Analysis received: {} chars", analysis.len());
                Some(analysis)
            }
            Ok(Err(e)) => {
                warn!("Scoring call failed: {}", e);
                None
            }
            Err(_) => {
                warn!("Scoring call timed out after {}s", self.timeout.as_secs());
                None
            }
        }
    }
}

/// System message = rubric, user message = wrapped resume text.
fn build_messages(prompt: &EvaluationPrompt, candidate_text: &str) -> [Message; 2] {
    [
        Message::system(prompt.as_str()),
        Message::user(candidate_message(candidate_text)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::Role;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        calls: AtomicUsize,
        reply: Result<String, TransportError>,
        delay: Duration,
    }

    #[async_trait]
    impl ModelTransport for Scripted {
        async fn complete(&self, _messages: &[Message], _model: &str) -> Result<String, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.reply.clone()
        }
    }

    fn client(reply: Result<String, TransportError>, delay: Duration) -> (ScoringClient, Arc<Scripted>) {
        let t = Arc::new(Scripted {
            calls: AtomicUsize::new(0),
            reply,
            delay,
        });
        (ScoringClient::new(t.clone(), "scorer", Duration::from_millis(200)), t)
    }

    #[tokio::test]
    async fn empty_text_short_circuits() {
        let (c, t) = client(Ok("Nota final: 90".into()), Duration::ZERO);
        assert_eq!(c.score(&EvaluationPrompt::default(), "").await, None);
        assert_eq!(c.score(&EvaluationPrompt::default(), " \n ").await, None);
        assert_eq!(t.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn returns_analysis_verbatim() {
        let (c, _) = client(Ok("Nome do candidato: Ana\nNota final: 90".into()), Duration::ZERO);
        let analysis = c.score(&EvaluationPrompt::default(), "Ana, Python").await;
        assert_eq!(analysis.as_deref(), Some("Nome do candidato: Ana\nNota final: 90"));
    }

    #[tokio::test]
    async fn failure_is_none() {
        let (c, _) = client(
            Err(TransportError::Call {
                model: "scorer".into(),
                detail: "429".into(),
            }),
            Duration::ZERO,
        );
        assert_eq!(c.score(&EvaluationPrompt::default(), "text").await, None);
    }

    #[tokio::test]
    async fn empty_reply_is_none() {
        let (c, _) = client(Ok("   ".into()), Duration::ZERO);
        assert_eq!(c.score(&EvaluationPrompt::default(), "text").await, None);
    }

    #[tokio::test]
    async fn timeout_is_none() {
        let (c, _) = client(Ok("Nota final: 90".into()), Duration::from_secs(5));
        assert_eq!(c.score(&EvaluationPrompt::default(), "text").await, None);
    }

    #[test]
    fn messages_carry_rubric_and_resume() {
        let prompt = EvaluationPrompt::new("RUBRIC");
        let [system, user] = build_messages(&prompt, "RESUME");
        assert_eq!(system.role, Role::System);
        assert_eq!(system.text, "RUBRIC");
        assert_eq!(user.role, Role::User);
        assert!(user.text.ends_with("RESUME"));
    }
}
