//! Rubric generation: job description → new [`EvaluationPrompt`].
//!
//! The model's answer is used verbatim (trimmed, outer code fence removed).
//! No structural validation is performed on the generated rubric; a rubric
//! that forgets the output markers is still returned, with a warning,
//! because the parser degrades to defaults rather than failing.

use crate::error::ScreenError;
use crate::prompts::{job_description_message, EvaluationPrompt, RUBRIC_META_PROMPT};
use crate::transport::{Message, ModelTransport};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\n(.*)\n```$").unwrap());

/// Ask `model` to write a rubric for `job_description`.
pub async fn generate_prompt(
    transport: &dyn ModelTransport,
    model: &str,
    job_description: &str,
) -> Result<EvaluationPrompt, ScreenError> {
    if job_description.trim().is_empty() {
        return Err(ScreenError::InvalidConfig("job description is empty".into()));
    }

    let messages = [
        Message::system(RUBRIC_META_PROMPT),
        Message::user(job_description_message(job_description)),
    ];
    let raw = transport
        .complete(&messages, model)
        .await
        .map_err(|e| ScreenError::LlmApiError {
            message: e.to_string(),
        })?;

    let text = strip_outer_fence(raw.trim());
    if text.is_empty() {
        return Err(ScreenError::LlmApiError {
            message: format!("model '{}' returned an empty rubric", model),
        });
    }

    let prompt = EvaluationPrompt::new(text);
    if !prompt.has_output_markers() {
        warn!("Generated rubric does not ask for 'Nome do candidato:' and 'Nota final:'; scores may default to 0");
    }
    info!("Generated rubric: {} chars", prompt.as_str().len());
    Ok(prompt)
}

fn strip_outer_fence(text: &str) -> String {
    match RE_OUTER_FENCE.captures(text) {
        Some(caps) => caps[1].trim().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        reply: Result<String, TransportError>,
        seen: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl ModelTransport for Recording {
        async fn complete(&self, messages: &[Message], _model: &str) -> Result<String, TransportError> {
            self.seen.lock().unwrap().extend_from_slice(messages);
            self.reply.clone()
        }
    }

    fn recording(reply: Result<String, TransportError>) -> Recording {
        Recording {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn returns_model_output_verbatim() {
        let t = recording(Ok("  <role>R</role>\nNome do candidato: N\nNota final: X \n".into()));
        let p = generate_prompt(&t, "m", "Vaga de engenheiro de dados").await.expect("ok");
        assert_eq!(p.as_str(), "<role>R</role>\nNome do candidato: N\nNota final: X");

        let seen = t.seen.lock().unwrap();
        assert_eq!(seen[0].text, RUBRIC_META_PROMPT);
        assert!(seen[1].text.contains("Vaga de engenheiro de dados"));
    }

    #[tokio::test]
    async fn strips_code_fence() {
        let t = recording(Ok("```markdown\n<role>R</role>\n```".into()));
        let p = generate_prompt(&t, "m", "vaga").await.expect("ok");
        assert_eq!(p.as_str(), "<role>R</role>");
    }

    #[tokio::test]
    async fn rubric_without_markers_is_still_accepted() {
        let t = recording(Ok("Avalie o candidato.".into()));
        let p = generate_prompt(&t, "m", "vaga").await.expect("ok");
        assert!(!p.has_output_markers());
    }

    #[tokio::test]
    async fn empty_job_description_is_rejected() {
        let t = recording(Ok("x".into()));
        let err = generate_prompt(&t, "m", "  ").await.unwrap_err();
        assert!(matches!(err, ScreenError::InvalidConfig(_)));
        assert!(t.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_an_error() {
        let t = recording(Err(TransportError::Call {
            model: "m".into(),
            detail: "boom".into(),
        }));
        let err = generate_prompt(&t, "m", "vaga").await.unwrap_err();
        assert!(matches!(err, ScreenError::LlmApiError { .. }));
    }

    #[tokio::test]
    async fn empty_output_is_an_error() {
        let t = recording(Ok("\n".into()));
        assert!(generate_prompt(&t, "m", "vaga").await.is_err());
    }
}
