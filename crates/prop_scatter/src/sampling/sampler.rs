//! Constraint-aware sampling of a single placement.
//!
//! [`SpatialSampler`] draws a uniform point inside a [`Volume`], optionally drops
//! it onto the ground through a [`GroundProbe`], and rejects it when an
//! [`OverlapProbe`] reports colliders around it. Rejections are retried with a
//! fresh draw until [`PlacementConstraints::max_attempts`] draws have been spent.
use glam::{Quat, Vec3};
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::sampling::{next_down, rand01, GroundProbe, OverlapProbe, Volume};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 32;
pub const DEFAULT_OVERLAP_RADIUS: f32 = 1.0;

/// Geometry of the downward ray used for ground snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroundProbeConfig {
    /// How far above the candidate the ray starts.
    pub probe_height: f32,
    /// Maximum ray length.
    pub max_distance: f32,
}

impl Default for GroundProbeConfig {
    fn default() -> Self {
        Self {
            probe_height: 10.0,
            max_distance: 20.0,
        }
    }
}

impl GroundProbeConfig {
    pub fn new(probe_height: f32, max_distance: f32) -> Self {
        Self {
            probe_height,
            max_distance,
        }
    }

    /// Short ray for small collectibles: 5 units up, 10 units long.
    pub fn collectibles() -> Self {
        Self::new(5.0, 10.0)
    }

    /// Ray for decorative props: 10 units up, 20 units long.
    pub fn props() -> Self {
        Self::new(10.0, 20.0)
    }
}

/// Constraints applied to every sample of a placement session.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementConstraints {
    /// Draw a uniform yaw in `[0, 360)` degrees instead of identity.
    pub random_rotation: bool,
    /// Snap candidates onto the first surface below them.
    pub snap_to_ground: bool,
    /// Reject candidates whose overlap sphere touches a collider.
    pub avoid_overlap: bool,
    /// Radius of the overlap sphere in world units.
    pub overlap_radius: f32,
    /// Total number of draws allowed for one sample, the first draw included.
    pub max_attempts: u32,
    /// Ray geometry used when `snap_to_ground` is set.
    pub ground_probe: GroundProbeConfig,
}

impl Default for PlacementConstraints {
    fn default() -> Self {
        Self {
            random_rotation: false,
            snap_to_ground: false,
            avoid_overlap: false,
            overlap_radius: DEFAULT_OVERLAP_RADIUS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            ground_probe: GroundProbeConfig::default(),
        }
    }
}

impl PlacementConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collectible placement: short ground probe, overlap allowed.
    pub fn collectibles() -> Self {
        Self::default().with_ground_probe(GroundProbeConfig::collectibles())
    }

    /// Prop placement: long ground probe, unit-radius overlap avoidance.
    pub fn props() -> Self {
        Self::default()
            .with_ground_probe(GroundProbeConfig::props())
            .with_avoid_overlap(DEFAULT_OVERLAP_RADIUS)
    }

    pub fn with_random_rotation(mut self, enabled: bool) -> Self {
        self.random_rotation = enabled;
        self
    }

    pub fn with_snap_to_ground(mut self, enabled: bool) -> Self {
        self.snap_to_ground = enabled;
        self
    }

    /// Enables overlap avoidance with the given sphere radius.
    pub fn with_avoid_overlap(mut self, radius: f32) -> Self {
        self.avoid_overlap = true;
        self.overlap_radius = radius;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_ground_probe(mut self, ground_probe: GroundProbeConfig) -> Self {
        self.ground_probe = ground_probe;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be >= 1".into()));
        }
        if !self.overlap_radius.is_finite() || self.overlap_radius < 0.0 {
            return Err(Error::InvalidConfig(
                "overlap_radius must be finite and >= 0".into(),
            ));
        }
        let probe = self.ground_probe;
        if !probe.probe_height.is_finite() || !probe.max_distance.is_finite() {
            return Err(Error::InvalidConfig(
                "ground probe height and distance must be finite".into(),
            ));
        }
        if probe.max_distance <= 0.0 {
            return Err(Error::InvalidConfig(
                "ground probe max_distance must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// An accepted candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Final position after optional ground snapping.
    pub position: Vec3,
    /// Orientation, either a yaw around +Y or identity.
    pub rotation: Quat,
    /// The drawn yaw in degrees when random rotation is enabled.
    pub yaw_degrees: Option<f32>,
    /// Number of draws spent, including the accepted one.
    pub attempts: u32,
}

/// Samples placements inside one volume under fixed constraints.
///
/// The sampler holds no mutable state; independent samplers can run on
/// separate threads as long as each has its own RNG and probes.
#[derive(Debug, Clone, Copy)]
pub struct SpatialSampler {
    volume: Volume,
    constraints: PlacementConstraints,
}

impl SpatialSampler {
    /// Creates a sampler after validating the volume and constraints.
    pub fn try_new(volume: Volume, constraints: PlacementConstraints) -> Result<Self> {
        volume.validate()?;
        constraints.validate()?;
        Ok(Self {
            volume,
            constraints,
        })
    }

    pub fn new(volume: Volume, constraints: PlacementConstraints) -> Self {
        debug_assert!(
            volume.half_extents.min_element() >= 0.0,
            "half_extents must be >= 0"
        );
        debug_assert!(constraints.max_attempts >= 1, "max_attempts must be >= 1");
        Self {
            volume,
            constraints,
        }
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn constraints(&self) -> &PlacementConstraints {
        &self.constraints
    }

    /// Draws one accepted sample or fails with [`Error::OverlapLimitExceeded`].
    ///
    /// The overlap probe is consulted at most `max_attempts` times.
    pub fn sample<G, O>(&self, ground: &G, overlap: &O, rng: &mut dyn RngCore) -> Result<Sample>
    where
        G: GroundProbe + ?Sized,
        O: OverlapProbe + ?Sized,
    {
        let max_attempts = self.constraints.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let mut position = self.volume.random_point(rng);
            if self.constraints.snap_to_ground {
                position = self.snap_to_ground(position, ground);
            }

            if self.constraints.avoid_overlap {
                let hits = overlap.overlap(position.into(), self.constraints.overlap_radius);
                if !hits.is_empty() {
                    debug!(
                        "Candidate {:?} overlaps {} collider(s); attempt {}/{}.",
                        position,
                        hits.len(),
                        attempt,
                        max_attempts
                    );
                    continue;
                }
            }

            let (rotation, yaw_degrees) = self.draw_rotation(rng);
            return Ok(Sample {
                position,
                rotation,
                yaw_degrees,
                attempts: attempt,
            });
        }

        Err(Error::OverlapLimitExceeded {
            attempts: max_attempts,
        })
    }

    /// Moves `position` onto the surface hit by a downward ray, or keeps it on a miss.
    fn snap_to_ground<G: GroundProbe + ?Sized>(&self, position: Vec3, ground: &G) -> Vec3 {
        let probe = self.constraints.ground_probe;
        let origin = position + Vec3::Y * probe.probe_height;
        match ground.cast(origin.into(), Vec3::NEG_Y.into(), probe.max_distance) {
            Some(hit) => Vec3::from(hit),
            None => position,
        }
    }

    fn draw_rotation(&self, rng: &mut dyn RngCore) -> (Quat, Option<f32>) {
        if !self.constraints.random_rotation {
            return (Quat::IDENTITY, None);
        }
        let yaw = (rand01(rng) * 360.0).min(next_down(360.0));
        (Quat::from_rotation_y(yaw.to_radians()), Some(yaw))
    }
}
