//! Axis-aligned placement volume.
use glam::Vec3;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::rand01;

/// Axis-aligned box described by its center and half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Volume {
    /// World-space center of the box.
    pub center: Vec3,
    /// Half the box size along each axis. Never negative.
    pub half_extents: Vec3,
}

impl Volume {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Creates a volume from its full size, as authored in an area-size field.
    pub fn from_size(center: Vec3, size: Vec3) -> Self {
        Self::new(center, size * 0.5)
    }

    /// Returns the full size of the box.
    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Inclusive containment test on every axis.
    pub fn contains(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.cmpge(min).all() && point.cmple(max).all()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.center.is_finite() || !self.half_extents.is_finite() {
            return Err(Error::InvalidConfig(
                "volume center and half_extents must be finite".into(),
            ));
        }
        if self.half_extents.min_element() < 0.0 {
            return Err(Error::InvalidConfig(
                "volume half_extents must be >= 0 in every component".into(),
            ));
        }
        Ok(())
    }

    /// Draws an independent uniform value per axis in `[center - half, center + half]`.
    pub fn random_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        let min = self.min();
        let size = self.size();
        let x = min.x + rand01(rng) * size.x;
        let y = min.y + rand01(rng) * size.y;
        let z = min.z + rand01(rng) * size.z;
        // Rounding can overshoot the upper edge by an ulp.
        Vec3::new(x, y, z).max(min).min(self.max())
    }
}

impl Default for Volume {
    /// The 3x3x3 area authoring tools start with.
    fn default() -> Self {
        Self::from_size(Vec3::ZERO, Vec3::splat(3.0))
    }
}
