//! Spatial sampling of candidate placements inside a 3D volume.
//!
//! This module defines the placement [`Volume`], the per-session
//! [`PlacementConstraints`], the physics capabilities consumed while sampling
//! ([`GroundProbe`], [`OverlapProbe`]) and the [`SpatialSampler`] that combines them.
use mint::Vector3;
use rand::RngCore;

pub mod sampler;
pub mod volume;

pub use sampler::{GroundProbeConfig, PlacementConstraints, Sample, SpatialSampler};
pub use volume::Volume;

/// Ray cast capability used to snap candidates onto a surface.
///
/// Returns the hit point of a ray starting at `origin` travelling along
/// `direction` for at most `max_distance`, or `None` when nothing was hit.
pub trait GroundProbe {
    fn cast(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<Vector3<f32>>;
}

impl<F> GroundProbe for F
where
    F: Fn(Vector3<f32>, Vector3<f32>, f32) -> Option<Vector3<f32>>,
{
    #[inline]
    fn cast(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<Vector3<f32>> {
        self(origin, direction, max_distance)
    }
}

/// Sphere overlap capability used to reject occupied candidates.
///
/// A non-empty result means the sphere intersects at least one collider.
pub trait OverlapProbe {
    /// Opaque reference to a collider owned by the host.
    type Collider;

    fn overlap(&self, center: Vector3<f32>, radius: f32) -> Vec<Self::Collider>;
}

impl<F, C> OverlapProbe for F
where
    F: Fn(Vector3<f32>, f32) -> Vec<C>,
{
    type Collider = C;

    #[inline]
    fn overlap(&self, center: Vector3<f32>, radius: f32) -> Vec<C> {
        self(center, radius)
    }
}

/// Ground probe that never reports a hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGround;

impl GroundProbe for NoGround {
    #[inline]
    fn cast(&self, _: Vector3<f32>, _: Vector3<f32>, _: f32) -> Option<Vector3<f32>> {
        None
    }
}

/// Overlap probe for an empty world.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl OverlapProbe for NoObstacles {
    type Collider = ();

    #[inline]
    fn overlap(&self, _: Vector3<f32>, _: f32) -> Vec<()> {
        Vec::new()
    }
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input, useful for
/// keeping half-open ranges such as `[0, 360)` half-open.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}
