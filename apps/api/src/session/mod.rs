// Turn-loop orchestration over the stateless scoring engine.
// Sessions live in memory only; a restart drops them.

pub mod draft;
pub mod handlers;
pub mod refinement;
pub mod store;
