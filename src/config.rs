//! Configuration for a screening run.
//!
//! Everything a batch reads is held in one [`ScreeningConfig`]: the active
//! rubric, the approval threshold, the two destination lists, the models and
//! the per-call timeout. The config is immutable once a batch starts; to
//! change the rubric, build a new config for the next run.

use crate::error::ScreenError;
use crate::pipeline::route::Destinations;
use crate::progress::ProgressCallback;
use crate::prompts::EvaluationPrompt;
use std::fmt;

/// Default inclusive minimum score for the Approved bucket.
pub const DEFAULT_THRESHOLD: u8 = 80;

/// Default model for resume scoring and rubric generation.
pub const DEFAULT_SCORING_MODEL: &str = "gpt-4.1-mini";

/// Default vision model for image resumes.
pub const DEFAULT_VISION_MODEL: &str = "gpt-4.1-nano";

/// Configuration for one screening run.
///
/// Built via [`ScreeningConfig::builder()`]; `build()` refuses configs that
/// would route both buckets to the same list.
///
/// # Example
/// ```rust
/// use edgequake_screen::ScreeningConfig;
///
/// let config = ScreeningConfig::builder()
///     .destinations("list-approved", "list-reproved")
///     .threshold(75)
///     .build()
///     .unwrap();
/// assert_eq!(config.threshold, 75);
/// ```
#[derive(Clone)]
pub struct ScreeningConfig {
    /// Inclusive minimum score for Approved. Range 0–100. Default: 80.
    pub threshold: u8,

    /// Rubric sent as the system message for every resume in the batch.
    pub prompt: EvaluationPrompt,

    /// Card lists for the two buckets.
    pub destinations: Destinations,

    /// Model id used to score resumes. Default: gpt-4.1-mini.
    pub scoring_model: String,

    /// Model id used to transcribe JPEG/PNG resumes. Default: gpt-4.1-nano.
    pub vision_model: String,

    /// Per model call timeout in seconds. Default: 60.
    ///
    /// Expiry counts as an extraction or scoring failure and the document
    /// is skipped.
    pub api_timeout_secs: u64,

    /// Optional per-document progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ScreeningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreeningConfig")
            .field("threshold", &self.threshold)
            .field("prompt", &self.prompt)
            .field("destinations", &self.destinations)
            .field("scoring_model", &self.scoring_model)
            .field("vision_model", &self.vision_model)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ScreeningProgressCallback>"),
            )
            .finish()
    }
}

impl ScreeningConfig {
    /// Create a new builder for `ScreeningConfig`.
    pub fn builder() -> ScreeningConfigBuilder {
        ScreeningConfigBuilder {
            threshold: DEFAULT_THRESHOLD as u32,
            prompt: EvaluationPrompt::default(),
            destinations: None,
            scoring_model: DEFAULT_SCORING_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            api_timeout_secs: 60,
            progress_callback: None,
        }
    }
}

/// Builder for [`ScreeningConfig`].
pub struct ScreeningConfigBuilder {
    threshold: u32,
    prompt: EvaluationPrompt,
    destinations: Option<(String, String)>,
    scoring_model: String,
    vision_model: String,
    api_timeout_secs: u64,
    progress_callback: Option<ProgressCallback>,
}

impl ScreeningConfigBuilder {
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn prompt(mut self, prompt: EvaluationPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn destinations(mut self, approved: impl Into<String>, reproved: impl Into<String>) -> Self {
        self.destinations = Some((approved.into(), reproved.into()));
        self
    }

    pub fn scoring_model(mut self, model: impl Into<String>) -> Self {
        self.scoring_model = model.into();
        self
    }

    pub fn vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = model.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.api_timeout_secs = secs.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ScreeningConfig, ScreenError> {
        if self.threshold > 100 {
            return Err(ScreenError::InvalidConfig(format!(
                "threshold must be 0–100, got {}",
                self.threshold
            )));
        }
        if self.prompt.as_str().trim().is_empty() {
            return Err(ScreenError::InvalidConfig("evaluation prompt is empty".into()));
        }
        if self.scoring_model.trim().is_empty() || self.vision_model.trim().is_empty() {
            return Err(ScreenError::InvalidConfig("model ids must not be empty".into()));
        }
        let (approved, reproved) = self.destinations.ok_or_else(|| {
            ScreenError::InvalidConfig("approved and reproved lists are required".into())
        })?;
        let destinations = Destinations::new(approved, reproved)?;

        Ok(ScreeningConfig {
            threshold: self.threshold as u8,
            prompt: self.prompt,
            destinations,
            scoring_model: self.scoring_model,
            vision_model: self.vision_model,
            api_timeout_secs: self.api_timeout_secs,
            progress_callback: self.progress_callback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ScreeningConfig::builder()
            .destinations("a", "r")
            .build()
            .expect("valid");
        assert_eq!(c.threshold, 80);
        assert_eq!(c.scoring_model, DEFAULT_SCORING_MODEL);
        assert_eq!(c.vision_model, DEFAULT_VISION_MODEL);
        assert_eq!(c.api_timeout_secs, 60);
        assert_eq!(c.prompt, EvaluationPrompt::default());
    }

    #[test]
    fn identical_lists_are_rejected() {
        let err = ScreeningConfig::builder()
            .destinations("same", "same")
            .build()
            .unwrap_err();
        assert!(matches!(err, ScreenError::SameDestination { .. }));
    }

    #[test]
    fn missing_lists_are_rejected() {
        let err = ScreeningConfig::builder().build().unwrap_err();
        assert!(matches!(err, ScreenError::InvalidConfig(_)));
    }

    #[test]
    fn threshold_above_100_is_rejected() {
        let err = ScreeningConfig::builder()
            .destinations("a", "r")
            .threshold(101)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("101"));
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let err = ScreeningConfig::builder()
            .destinations("a", "r")
            .prompt(EvaluationPrompt::new("   "))
            .build()
            .unwrap_err();
        assert!(matches!(err, ScreenError::InvalidConfig(_)));
    }

    #[test]
    fn zero_timeout_is_raised_to_one_second() {
        let c = ScreeningConfig::builder()
            .destinations("a", "r")
            .api_timeout_secs(0)
            .build()
            .expect("valid");
        assert_eq!(c.api_timeout_secs, 1);
    }
}
