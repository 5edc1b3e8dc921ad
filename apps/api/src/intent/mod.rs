// Intent engine: slot catalog, mention extraction, coverage scoring, question selection.
// Every component reads slot keys from the one `SlotCatalog` built at startup.

pub mod analyzer;
pub mod catalog;
pub mod handlers;
pub mod mentions;
pub mod questions;
