//! # tabhost - Tab hosting lifecycle
//!
//! Keeps track of browsing surfaces hosted as tabs in browser windows:
//! which window owns a tab, where it sits in the tab strip, and how it is
//! moved, discarded or parked behind a placeholder without losing its
//! history or its slot.
//!
//! ## Architecture
//!
//! - **surface**: surfaces, their navigation history, the identity registry
//!   and the surface factory
//! - **window**: windows, tab strips, activation order and observer
//!   registration
//! - **tab**: per-surface tab records and their serializable snapshots
//! - **host**: the `TabHost` state machine tying the above together
//! - **utils**: shared error types

pub mod host;
pub mod surface;
pub mod tab;
pub mod utils;
pub mod window;

// Re-export main types for convenience
pub use host::{CloseOutcome, HostConfig, TabHost};
pub use surface::{SurfaceId, SurfaceParams};
pub use utils::error::{Result, TabHostError};
pub use window::WindowId;

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "tabhost";
