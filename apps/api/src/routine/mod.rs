// Routine generation: fixed template content, linked to the best-matching
// protocol sections, persisted once per questionnaire submission.

pub mod generator;
pub mod handlers;
pub mod template;
