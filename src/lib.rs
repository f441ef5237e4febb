//! screenspan - content-region layout for windows spanning multiple displays
//!
//! Tracks the usable regions of a window on dual-screen devices and across
//! monitors: normalizes the raw rectangles a host reports, classifies how they
//! are split, picks the best region for primary content, and reports when the
//! layout changed materially.

pub mod config;
pub mod emulation;
pub mod layout;
pub mod source;
pub mod status;
pub mod tracing;
pub mod types;
pub mod x11;

pub use config::{Config, LayoutOptions};
pub use emulation::EmulationState;
pub use layout::{QueryError, RegionLayout};
pub use source::{RegionQuery, RegionSource, ScriptedSource};
pub use types::{LayoutSnapshot, Rect, SplitKind, WindowGeometry};
