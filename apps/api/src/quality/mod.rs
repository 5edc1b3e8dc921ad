// Prompt quality rubric and its HTTP surface.

pub mod evaluator;
pub mod handlers;
