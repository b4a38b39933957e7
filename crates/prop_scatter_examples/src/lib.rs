#![forbid(unsafe_code)]
//! Shared helpers for the prop_scatter demos: logging setup and toy physics probes.
use glam::Vec3;
use mint::Vector3;
use prop_scatter::prelude::*;

/// Installs a `tracing` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,prop_scatter=debug".into());
    // A second init (e.g. from another demo helper) is harmless.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Infinite horizontal plane at `height`.
#[derive(Debug, Clone, Copy)]
pub struct FlatGround {
    pub height: f32,
}

impl GroundProbe for FlatGround {
    fn cast(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<Vector3<f32>> {
        // Only downward rays can reach the plane from above.
        if direction.y >= 0.0 || origin.y < self.height {
            return None;
        }
        let distance = (origin.y - self.height) / -direction.y;
        if distance > max_distance {
            return None;
        }
        Some(Vector3 {
            x: origin.x + direction.x * distance,
            y: self.height,
            z: origin.z + direction.z * distance,
        })
    }
}

/// Static sphere colliders, reported by index.
#[derive(Debug, Clone, Default)]
pub struct SphereObstacles {
    spheres: Vec<(Vec3, f32)>,
}

impl SphereObstacles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sphere(mut self, center: Vec3, radius: f32) -> Self {
        self.spheres.push((center, radius));
        self
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl OverlapProbe for SphereObstacles {
    type Collider = usize;

    fn overlap(&self, center: Vector3<f32>, radius: f32) -> Vec<usize> {
        let center = Vec3::from(center);
        self.spheres
            .iter()
            .enumerate()
            .filter(|(_, (c, r))| c.distance(center) < r + radius)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Logs one line per placed instance.
pub fn log_instances(instances: &[InstanceDescriptor]) {
    for instance in instances {
        tracing::info!(
            "{} at ({:.2}, {:.2}, {:.2}) rule {:?}",
            instance.name,
            instance.position.x,
            instance.position.y,
            instance.position.z,
            instance.rule
        );
    }
}
