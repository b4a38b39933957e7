//! Per-viewer visibility rules and their evaluation.
//!
//! Rules are attached to instances at placement time. On every refresh tick
//! the host builds a [`ViewerContext`] and asks the [`VisibilityEngine`]
//! whether each instance is revealed.
pub mod context;
pub mod engine;
pub mod occasion;
pub mod rule;

pub use context::{month_day, ViewerContext};
pub use engine::{FailurePolicy, VisibilityConfig, VisibilityEngine, VisibilityState};
pub use occasion::Occasion;
pub use rule::{VisibilityRule, WhitelistRule};
