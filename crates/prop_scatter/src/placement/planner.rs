//! Batch placement of template instances.
//!
//! A [`PlacementPlanner`] owns the placement area and the set of instances
//! placed during the current session. Every [`PlaceBatchCommand`] is checked
//! against that state before anything is sampled, so a rejected command never
//! touches the scene.
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::error::{CreateOutcome, Error, Result};
use crate::placement::events::{EventSink, PlacementEvent, PlacementEventKind};
use crate::placement::plan::{OverlapPolicy, PlaceBatchCommand, PlannerConfig};
use crate::placement::scene::{ComponentKind, SceneGraph};
use crate::placement::{InstanceDescriptor, InstanceId, NodeHandle};
use crate::sampling::{
    GroundProbe, NoGround, NoObstacles, OverlapProbe, Sample, SpatialSampler, Volume,
};
use crate::visibility::VisibilityRule;

/// Physics capabilities handed to the sampler for one batch.
pub struct Probes<'a, G: ?Sized, O: ?Sized> {
    pub ground: &'a G,
    pub overlap: &'a O,
}

impl<'a, G: ?Sized, O: ?Sized> Probes<'a, G, O> {
    pub fn new(ground: &'a G, overlap: &'a O) -> Self {
        Self { ground, overlap }
    }
}

impl Probes<'static, NoGround, NoObstacles> {
    /// No ground to snap to and nothing to collide with.
    pub fn none() -> Self {
        Self {
            ground: &NoGround,
            overlap: &NoObstacles,
        }
    }
}

/// Places batches of instances inside one area and tracks what was placed.
#[derive(Debug, Clone)]
pub struct PlacementPlanner {
    config: PlannerConfig,
    area: Option<Volume>,
    placed: Vec<InstanceDescriptor>,
    next_id: u64,
    /// Group created from `default_parent_name`, shared by later batches.
    default_parent: Option<NodeHandle>,
}

impl Default for PlacementPlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl PlacementPlanner {
    pub fn try_new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn new(config: PlannerConfig) -> Self {
        debug_assert!(config.max_per_batch >= 1, "max_per_batch must be >= 1");
        Self {
            config,
            area: None,
            placed: Vec::new(),
            next_id: 0,
            default_parent: None,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Sets the placement area. A second call while an area exists changes nothing.
    pub fn create_area(&mut self, volume: Volume) -> Result<CreateOutcome> {
        if let Some(existing) = &self.area {
            info!(
                "Placement area already exists at {:?}; keeping it.",
                existing.center
            );
            return Ok(CreateOutcome::AlreadyExists);
        }
        volume.validate()?;
        info!(
            "Placement area created at {:?} with size {:?}.",
            volume.center,
            volume.size()
        );
        self.area = Some(volume);
        Ok(CreateOutcome::Created)
    }

    pub fn area(&self) -> Option<&Volume> {
        self.area.as_ref()
    }

    /// Removes the area, returning it if one existed.
    pub fn clear_area(&mut self) -> Option<Volume> {
        self.area.take()
    }

    /// All instances placed this session, in placement order.
    pub fn placed(&self) -> &[InstanceDescriptor] {
        &self.placed
    }

    pub fn placed_count_for(&self, template: &str) -> usize {
        self.placed.iter().filter(|d| d.template == template).count()
    }

    /// Drops an instance from the placed-set, e.g. after the host deleted its node.
    pub fn forget(&mut self, id: InstanceId) -> Option<InstanceDescriptor> {
        let idx = self.placed.iter().position(|d| d.id == id)?;
        Some(self.placed.remove(idx))
    }

    /// Re-seeds the placed-set from instances already present in the scene.
    pub fn seed(&mut self, instances: impl IntoIterator<Item = InstanceDescriptor>) {
        for instance in instances {
            self.next_id = self.next_id.max(instance.id.0 + 1);
            self.placed.push(instance);
        }
    }

    /// Places `cmd.count` instances and returns the ones created by this call.
    pub fn place_batch<S, G, O>(
        &mut self,
        cmd: &PlaceBatchCommand,
        scene: &mut S,
        probes: Probes<'_, G, O>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<InstanceDescriptor>>
    where
        S: SceneGraph + ?Sized,
        G: GroundProbe + ?Sized,
        O: OverlapProbe + ?Sized,
    {
        self.place_batch_internal(cmd, scene, probes, rng, &mut ())
    }

    pub fn place_batch_with_events<S, G, O>(
        &mut self,
        cmd: &PlaceBatchCommand,
        scene: &mut S,
        probes: Probes<'_, G, O>,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<InstanceDescriptor>>
    where
        S: SceneGraph + ?Sized,
        G: GroundProbe + ?Sized,
        O: OverlapProbe + ?Sized,
    {
        self.place_batch_internal(cmd, scene, probes, rng, sink)
    }

    /// Checks every prerequisite of `cmd` without mutating anything.
    fn prepare<S: SceneGraph + ?Sized>(
        &self,
        cmd: &PlaceBatchCommand,
        scene: &S,
    ) -> Result<SpatialSampler> {
        if cmd.template.id.trim().is_empty() {
            return Err(Error::MissingPrerequisite("no template selected".into()));
        }
        if cmd.count == 0 {
            return Err(Error::InvalidConfig("count must be >= 1".into()));
        }
        let Some(area) = self.area else {
            return Err(Error::MissingPrerequisite(
                "no placement area; create one first".into(),
            ));
        };
        if let Some(parent) = cmd.parent {
            if !scene.contains(parent) {
                return Err(Error::MissingPrerequisite(format!(
                    "parent node {} does not exist",
                    parent.0
                )));
            }
        }

        let placed = self.placed.len();
        if cmd.count > self.config.max_per_batch {
            warn!(
                "Rejected batch of {} '{}': at most {} per batch.",
                cmd.count, cmd.template.id, self.config.max_per_batch
            );
            return Err(Error::CapacityExceeded {
                requested: cmd.count,
                placed,
                max: self.config.max_per_batch,
            });
        }
        if let Some(max) = self.config.max_placed {
            if placed + cmd.count > max {
                warn!(
                    "Rejected batch of {} '{}': {} of {} already placed.",
                    cmd.count, cmd.template.id, placed, max
                );
                return Err(Error::CapacityExceeded {
                    requested: cmd.count,
                    placed,
                    max,
                });
            }
        }

        SpatialSampler::try_new(area, cmd.constraints)
    }

    fn place_batch_internal<S, G, O>(
        &mut self,
        cmd: &PlaceBatchCommand,
        scene: &mut S,
        probes: Probes<'_, G, O>,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<InstanceDescriptor>>
    where
        S: SceneGraph + ?Sized,
        G: GroundProbe + ?Sized,
        O: OverlapProbe + ?Sized,
    {
        let sampler = self.prepare(cmd, &*scene)?;
        let template = &cmd.template.id;

        info!("Placing {} instance(s) of '{}'.", cmd.count, template);
        if sink.wants(PlacementEventKind::BatchStarted) {
            sink.send(PlacementEvent::BatchStarted {
                template: template.clone(),
                count: cmd.count,
            });
        }

        let rule = cmd.rules.resolve();
        let mut parent = cmd.parent;
        let mut created = Vec::with_capacity(cmd.count);
        let mut skipped = 0;

        for index in 0..cmd.count {
            let sample = match sampler.sample(probes.ground, probes.overlap, rng) {
                Ok(sample) => sample,
                Err(Error::OverlapLimitExceeded { attempts }) => match cmd.on_overlap_failure {
                    OverlapPolicy::AbortBatch => {
                        warn!(
                            "No free position for '{}' #{} after {} attempts; aborting batch with {} placed.",
                            template,
                            index + 1,
                            attempts,
                            created.len()
                        );
                        if sink.wants(PlacementEventKind::BatchAborted) {
                            sink.send(PlacementEvent::BatchAborted {
                                template: template.clone(),
                                placed: created.len(),
                                attempts,
                            });
                        }
                        return Err(Error::OverlapLimitExceeded { attempts });
                    }
                    OverlapPolicy::SkipInstance => {
                        warn!(
                            "No free position for '{}' #{} after {} attempts; skipping.",
                            template,
                            index + 1,
                            attempts
                        );
                        if sink.wants(PlacementEventKind::InstanceSkipped) {
                            sink.send(PlacementEvent::InstanceSkipped {
                                template: template.clone(),
                                index,
                                attempts,
                            });
                        }
                        skipped += 1;
                        continue;
                    }
                },
                Err(e) => return Err(e),
            };

            if parent.is_none() {
                parent = self.default_parent(scene)?;
            }

            let descriptor = self.spawn(cmd, scene, &sample, parent, &rule)?;
            debug!(
                "Placed '{}' at {:?} after {} attempt(s).",
                descriptor.name, descriptor.position, sample.attempts
            );
            if sink.wants(PlacementEventKind::InstancePlaced) {
                sink.send(PlacementEvent::InstancePlaced {
                    descriptor: descriptor.clone(),
                    attempts: sample.attempts,
                });
            }
            created.push(descriptor);
        }

        if self.config.consume_area_after_batch {
            self.area = None;
        }

        info!(
            "Placed {} of {} '{}' instance(s), {} skipped.",
            created.len(),
            cmd.count,
            template,
            skipped
        );
        if sink.wants(PlacementEventKind::BatchFinished) {
            sink.send(PlacementEvent::BatchFinished {
                template: template.clone(),
                placed: created.len(),
                skipped,
            });
        }

        Ok(created)
    }

    /// Group named by `default_parent_name`, created on first use and reused
    /// until the host removes it from the scene.
    fn default_parent<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
    ) -> Result<Option<NodeHandle>> {
        let Some(name) = &self.config.default_parent_name else {
            return Ok(None);
        };
        if let Some(group) = self.default_parent.filter(|g| scene.contains(*g)) {
            return Ok(Some(group));
        }
        let group = scene.create_group(name)?;
        debug!("Created parent group '{}'.", name);
        self.default_parent = Some(group);
        Ok(Some(group))
    }

    /// Creates one instance in the scene and records it in the placed-set.
    fn spawn<S: SceneGraph + ?Sized>(
        &mut self,
        cmd: &PlaceBatchCommand,
        scene: &mut S,
        sample: &Sample,
        parent: Option<NodeHandle>,
        rule: &VisibilityRule,
    ) -> Result<InstanceDescriptor> {
        let name = match cmd.explicit_name() {
            Some(name) => name.to_owned(),
            None => format!(
                "{}_{}",
                cmd.template.name_prefix(),
                self.placed_count_for(&cmd.template.id) + 1
            ),
        };

        let node = scene.instantiate(&cmd.template)?;
        scene.set_transform(node, sample.position, sample.rotation)?;
        if let Some(parent) = parent {
            scene.set_parent(node, parent)?;
        }
        scene.set_name(node, &name)?;
        scene.attach_component(node, ComponentKind::Visibility, rule)?;

        let descriptor = InstanceDescriptor {
            id: InstanceId(self.next_id),
            name,
            template: cmd.template.id.clone(),
            node,
            position: sample.position,
            rotation: sample.rotation,
            parent,
            rule: rule.clone(),
            label: cmd.rules.label.clone(),
        };
        self.next_id += 1;
        self.placed.push(descriptor.clone());
        Ok(descriptor)
    }
}
