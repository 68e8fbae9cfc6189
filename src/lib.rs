//! IYM — a mood-aware support chat orchestrator.
//!
//! Turns a user message into a moderated request, tries several
//! OpenAI-compatible providers in order with a bounded wait per attempt, and
//! turns whatever comes back into a reply that is safe to show. Crisis
//! keywords surface the matching Argentine emergency line.
//!
//! See `DESIGN.md` for full architecture documentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod conversation;
pub mod credentials;
pub mod logging;
pub mod providers;
pub mod safety;

pub mod agent;
