//! Free-form resume text to structured `ResumeData`.
//!
//! No grammar, only heuristics: section headers are found by label, then each
//! section's lines run through a small state machine that decides where one
//! entry ends and the next begins. Malformed input never fails; it degrades
//! to empty fields.

pub mod assembler;
pub mod extractors;
pub mod handlers;
pub mod markdown;
pub mod model;
pub mod patterns;
pub mod segmenter;
