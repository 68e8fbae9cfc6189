//! Input screening that runs before any prompt is built.
//!
//! - [`crisis`] — keyword-based crisis category detection and urgency check
//! - [`guard`] — instruction extraction / override attempts
//!
//! Both are pure functions over the raw user text.

pub mod crisis;
pub mod guard;

pub use crisis::{CrisisCatalog, CrisisCategory};
pub use guard::{is_instruction_extraction_attempt, DEFLECTION_REPLY};
