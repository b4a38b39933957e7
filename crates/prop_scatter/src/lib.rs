#![forbid(unsafe_code)]
//! prop_scatter: Constraint-aware prop placement with rule-based visibility.
//!
//! Modules:
//! - sampling: placement volumes, constraints and the spatial sampler (ground snapping, overlap rejection)
//! - placement: batch commands, the placement planner, scene capability, events and reports
//! - visibility: visibility rules, viewer context and the rule engine
//! - whitelist: whitelist records, the JSON-backed store and in-memory catalogs
//!
//! Physics and scene access are consumed through traits; the crate never owns an engine.
pub mod error;
pub mod placement;
pub mod sampling;
pub mod visibility;
pub mod whitelist;

/// Convenient re-exports for common types. Import with `use prop_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{CreateOutcome, Error, Result};
    pub use crate::placement::events::{
        EventSink, FnSink, MultiSink, PlacementEvent, PlacementEventKind, VecSink,
    };
    pub use crate::placement::plan::{
        OverlapPolicy, PlaceBatchCommand, PlannerConfig, RuleAssignment,
    };
    pub use crate::placement::planner::{PlacementPlanner, Probes};
    pub use crate::placement::report::PlacementReport;
    pub use crate::placement::scene::{ComponentKind, MemoryScene, SceneGraph, SceneNode};
    pub use crate::placement::{InstanceDescriptor, InstanceId, NodeHandle, Template, TemplateId};
    pub use crate::sampling::{
        GroundProbe, GroundProbeConfig, NoGround, NoObstacles, OverlapProbe,
        PlacementConstraints, Sample, SpatialSampler, Volume,
    };
    pub use crate::visibility::{
        month_day, FailurePolicy, Occasion, ViewerContext, VisibilityConfig, VisibilityEngine,
        VisibilityRule, VisibilityState, WhitelistRule,
    };
    pub use crate::whitelist::{
        TrustLevel, WhitelistCatalog, WhitelistLookup, WhitelistMode, WhitelistRecord,
        WhitelistStore, WhitelistStoreConfig,
    };
}
