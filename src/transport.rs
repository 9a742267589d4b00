//! Model transport: the black-box `complete(messages, model)` capability.
//!
//! Scoring, image transcription and rubric generation all go through
//! [`ModelTransport`]; they differ only in the messages and model they pass.
//! The pipeline never talks to a provider SDK directly, so tests can swap in
//! a scripted transport and count calls.
//!
//! [`LlmTransport`] is the production implementation on top of
//! `edgequake-llm`. Providers are created lazily, one per model id, and
//! cached for the lifetime of the transport.

use crate::error::{ScreenError, TransportError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Who a [`Message`] is from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

/// A base64 image attached to a user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub base64: String,
}

impl InlineImage {
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64: STANDARD.encode(bytes),
        }
    }
}

/// One chat turn sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub image: Option<InlineImage>,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
            image: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            image: None,
        }
    }

    pub fn user_with_image(text: impl Into<String>, image: InlineImage) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            image: Some(image),
        }
    }
}

/// Request/response access to a language model.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Send `messages` to `model` and return the completion text.
    async fn complete(&self, messages: &[Message], model: &str) -> Result<String, TransportError>;
}

/// [`ModelTransport`] backed by `edgequake-llm` providers.
pub struct LlmTransport {
    provider_name: Option<String>,
    fixed: Option<Arc<dyn LLMProvider>>,
    providers: Mutex<HashMap<String, Arc<dyn LLMProvider>>>,
    temperature: f32,
    max_tokens: usize,
}

impl LlmTransport {
    /// Resolve providers per model id.
    ///
    /// Resolution order for every model:
    /// 1. `provider_name` when given (e.g. `"openai"`, `"anthropic"`);
    /// 2. `EDGEQUAKE_LLM_PROVIDER` from the environment;
    /// 3. `openai` when `OPENAI_API_KEY` is set;
    /// 4. `ProviderFactory::from_env()` auto-detection (model id ignored).
    pub fn new(provider_name: Option<String>) -> Self {
        Self {
            provider_name,
            fixed: None,
            providers: Mutex::new(HashMap::new()),
            temperature: 0.2,
            max_tokens: 4096,
        }
    }

    /// Use one pre-built provider for every model id.
    pub fn with_provider(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            fixed: Some(provider),
            ..Self::new(None)
        }
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.max_tokens = n;
        self
    }

    /// Fail fast when no provider can be built for `model`.
    ///
    /// Called by the CLI before a run so a missing API key is a
    /// configuration error rather than N skipped documents.
    pub fn check(&self, model: &str) -> Result<(), ScreenError> {
        self.provider_for(model)
            .map(|_| ())
            .map_err(|e| ScreenError::ProviderNotConfigured {
                provider: self.provider_name.clone().unwrap_or_else(|| "auto".into()),
                hint: format!(
                    "Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or pass --provider.\nError: {}",
                    e
                ),
            })
    }

    fn provider_for(&self, model: &str) -> Result<Arc<dyn LLMProvider>, TransportError> {
        if let Some(ref provider) = self.fixed {
            return Ok(Arc::clone(provider));
        }

        let mut cache = self.providers.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(provider) = cache.get(model) {
            return Ok(Arc::clone(provider));
        }

        let provider = resolve_provider(self.provider_name.as_deref(), model)?;
        cache.insert(model.to_string(), Arc::clone(&provider));
        Ok(provider)
    }

    fn options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ModelTransport for LlmTransport {
    async fn complete(&self, messages: &[Message], model: &str) -> Result<String, TransportError> {
        let provider = self.provider_for(model)?;
        let chat: Vec<ChatMessage> = messages.iter().map(to_chat_message).collect();
        let options = self.options();

        let response = provider
            .chat(&chat, Some(&options))
            .await
            .map_err(|e| TransportError::Call {
                model: model.to_string(),
                detail: e.to_string(),
            })?;

        debug!(
            "{}: {} input tokens, {} output tokens",
            model, response.prompt_tokens, response.completion_tokens
        );
        Ok(response.content)
    }
}

fn to_chat_message(message: &Message) -> ChatMessage {
    match (message.role, &message.image) {
        (Role::System, _) => ChatMessage::system(message.text.as_str()),
        (Role::User, None) => ChatMessage::user(message.text.as_str()),
        (Role::User, Some(image)) => ChatMessage::user_with_images(
            message.text.as_str(),
            vec![ImageData::new(image.base64.clone(), image.mime_type.as_str()).with_detail("high")],
        ),
    }
}

fn resolve_provider(
    provider_name: Option<&str>,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, TransportError> {
    let create = |name: &str| {
        ProviderFactory::create_llm_provider(name, model).map_err(|e| TransportError::Provider {
            model: model.to_string(),
            detail: format!("{name}: {e}"),
        })
    };

    if let Some(name) = provider_name {
        return create(name);
    }

    if let Ok(name) = std::env::var("EDGEQUAKE_LLM_PROVIDER") {
        if !name.is_empty() {
            return create(&name);
        }
    }

    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            return create("openai");
        }
    }

    warn!("No provider named for model '{}'; auto-detecting from environment", model);
    let (provider, _embedding) = ProviderFactory::from_env().map_err(|e| TransportError::Provider {
        model: model.to_string(),
        detail: format!("auto-detect: {e}"),
    })?;
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_image_is_base64() {
        let img = InlineImage::from_bytes(&[0x89, b'P', b'N', b'G'], "image/png");
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(STANDARD.decode(&img.base64).expect("base64"), vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(Message::system("s").role, Role::System);
        assert_eq!(Message::user("u").role, Role::User);
        let img = InlineImage::from_bytes(b"x", "image/jpeg");
        let m = Message::user_with_image("", img.clone());
        assert_eq!(m.image, Some(img));
    }

    #[test]
    fn transport_options_follow_builder() {
        let t = LlmTransport::new(Some("openai".into())).temperature(5.0).max_tokens(512);
        let opts = t.options();
        assert_eq!(opts.temperature, Some(2.0));
        assert_eq!(opts.max_tokens, Some(512));
    }
}
