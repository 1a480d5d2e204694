//! # Generative Text Module
//!
//! Client for the Gemini `generateContent` REST endpoint, used as the
//! [`SongGenerator`](crate::recommendation::SongGenerator) behind the
//! recommendation resolver.
//!
//! ## Error Mapping
//!
//! - 401/403, or a 400 complaining about the API key → `GenerationError::Auth`
//! - 429 → `GenerationError::Quota`
//! - connection failures and timeouts → `GenerationError::Network`
//! - any other non-2xx → `GenerationError::Upstream`
//! - an undecodable body → `GenerationError::Malformed`
//!
//! A response without candidates (for instance a blocked prompt) counts as
//! empty text, which the resolver turns into an empty recommendation list.

mod client;
mod types;

pub use client::{GeminiClient, build_prompt};
pub use types::{GenerateContentRequest, GenerateContentResponse};
