//! Event types and sinks for observing placement batches.
//!
//! This module defines [`PlacementEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while a [`crate::placement::planner::PlacementPlanner`]
//! executes a [`crate::placement::plan::PlaceBatchCommand`].
use crate::placement::{InstanceDescriptor, TemplateId};

/// Describes events emitted by placement operations.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PlacementEvent {
    /// Emitted once all prerequisites passed and sampling begins.
    BatchStarted {
        template: TemplateId,
        /// Number of instances requested.
        count: usize,
    },

    /// Emitted after an instance was created in the scene.
    InstancePlaced {
        descriptor: InstanceDescriptor,
        /// Draws spent by the sampler for this instance.
        attempts: u32,
    },

    /// Emitted when an instance was skipped after exhausting its attempts.
    InstanceSkipped {
        template: TemplateId,
        /// Zero-based index within the batch.
        index: usize,
        attempts: u32,
    },

    /// Emitted when a batch stops early. Earlier instances stay placed.
    BatchAborted {
        template: TemplateId,
        placed: usize,
        attempts: u32,
    },

    /// Emitted when the batch completes.
    BatchFinished {
        template: TemplateId,
        placed: usize,
        skipped: usize,
    },
}

impl PlacementEvent {
    pub fn kind(&self) -> PlacementEventKind {
        match self {
            PlacementEvent::BatchStarted { .. } => PlacementEventKind::BatchStarted,
            PlacementEvent::InstancePlaced { .. } => PlacementEventKind::InstancePlaced,
            PlacementEvent::InstanceSkipped { .. } => PlacementEventKind::InstanceSkipped,
            PlacementEvent::BatchAborted { .. } => PlacementEventKind::BatchAborted,
            PlacementEvent::BatchFinished { .. } => PlacementEventKind::BatchFinished,
        }
    }
}

/// Discriminant of [`PlacementEvent`], used to filter before building an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementEventKind {
    BatchStarted,
    InstancePlaced,
    InstanceSkipped,
    BatchAborted,
    BatchFinished,
}

/// A generic event sink that accepts [`PlacementEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PlacementEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PlacementEvent) {}

    #[inline]
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PlacementEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<PlacementEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PlacementEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Counts collected events of one kind.
    pub fn count(&self, kind: PlacementEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: PlacementEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: PlacementEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
