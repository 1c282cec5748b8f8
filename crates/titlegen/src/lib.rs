//! AI-assisted product-title generation.
//!
//! This crate turns product attributes into marketplace-ready listing
//! titles in four stages:
//!
//! 1. **Prompt building** (`prompt`) - attributes → deterministic
//!    instruction prompt for the completion service
//! 2. **Completion** (`completion`) - prompt → raw model text via the
//!    remote generative-language API
//! 3. **Sanitization** (`sanitizer`) - raw text → cleaned, length-bounded,
//!    de-duplicated candidate titles
//! 4. **Assembly** (`pipeline`) - accepted titles paired with the target
//!    market label, or a terminal error
//!
//! # Safety Principle
//!
//! The model output is never trusted: every candidate passes the full
//! sanitization pipeline before it can reach a caller, and an empty result
//! is a first-class terminal outcome rather than a panic or a fallback.

pub mod completion;
pub mod pipeline;
pub mod prompt;
pub mod sanitizer;

pub use completion::{CompletionClient, CompletionError, GeminiClient};
pub use pipeline::{GeneratedTitles, TitleGenError, TitleGenerator};
pub use prompt::{build_prompt, ProductAttributes};
pub use sanitizer::sanitize_titles;
