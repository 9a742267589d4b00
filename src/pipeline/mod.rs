//! Pipeline stages for screening one resume.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable and the orchestrator in [`crate::screen`] only
//! wires them together.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ extract ──▶ score ──▶ parse ──▶ route ──▶ card
//!          (pdfium /   (rubric +  (name,     (bucket,
//!           vision)     model)     score)     list id)
//! ```
//!
//! 1. [`extract`]: dispatch on content type; PDF text layer, UTF-8 text, or
//!    vision transcription via [`encode`]
//! 2. [`score`]: rubric as system message, resume as user message
//! 3. [`parse`]: total, pure parser over the free-text analysis
//! 4. [`route`]: threshold decision, destination list, card draft
//!
//! [`compose`] is the side path that writes new rubrics from a job
//! description; it runs between batches, never inside one.

pub mod compose;
pub mod encode;
pub mod extract;
pub mod parse;
pub mod route;
pub mod score;
