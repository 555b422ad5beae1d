//! Per-surface tab state

mod record;
mod value;

pub use record::{PinnedSlotState, TabRecord};
pub use value::{TabStatus, TabValue};
