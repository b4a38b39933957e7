//! Plain-text audit report of placed instances.
//!
//! One block per instance:
//!
//! ```text
//! Instance: Egg_1
//! Type: Christmas
//! Exact Position: (0.25, 1.00, -0.75)
//! Rotation: (0.00, 90.00, 0.00)
//! Material: Unknown
//! Enable On Date: 12/25
//! --------------------------
//! ```
//!
//! The report is write-only; nothing in the crate reads it back.
use std::fmt;
use std::fs;
use std::path::Path;

use glam::{EulerRot, Quat, Vec3};
use tracing::info;

use crate::error::{Error, Result};
use crate::placement::scene::SceneGraph;
use crate::placement::InstanceDescriptor;

const SEPARATOR: &str = "--------------------------";

/// Report over a set of placed instances.
#[derive(Debug, Clone, Copy)]
pub struct PlacementReport<'a> {
    instances: &'a [InstanceDescriptor],
}

impl<'a> PlacementReport<'a> {
    pub fn new(instances: &'a [InstanceDescriptor]) -> Self {
        Self { instances }
    }

    /// Renders every block. Material names are looked up in `scene`.
    pub fn render<S: SceneGraph + ?Sized>(&self, scene: &S) -> Result<String> {
        if self.instances.is_empty() {
            return Err(Error::MissingPrerequisite(
                "no placed instances to report".into(),
            ));
        }
        let mut out = String::new();
        for instance in self.instances {
            let block = Block {
                instance,
                material: scene.material_name(instance.node),
            };
            out.push_str(&block.to_string());
        }
        Ok(out)
    }

    /// Renders and writes the report to `path`, creating parent directories.
    pub fn write_to<S: SceneGraph + ?Sized>(&self, scene: &S, path: &Path) -> Result<()> {
        let text = self.render(scene)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, text)?;
        info!(
            "Wrote placement report for {} instance(s) to {}.",
            self.instances.len(),
            path.display()
        );
        Ok(())
    }
}

struct Block<'a> {
    instance: &'a InstanceDescriptor,
    material: Option<String>,
}

impl fmt::Display for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instance = self.instance;
        let label = instance.label.as_deref().unwrap_or(&instance.template);
        writeln!(f, "Instance: {}", instance.name)?;
        writeln!(f, "Type: {label}")?;
        writeln!(f, "Exact Position: {}", Triple(instance.position))?;
        writeln!(f, "Rotation: {}", Triple(euler_degrees(instance.rotation)))?;
        writeln!(
            f,
            "Material: {}",
            self.material.as_deref().unwrap_or("Unknown")
        )?;
        writeln!(
            f,
            "Enable On Date: {}",
            instance.rule.enable_date().unwrap_or("")
        )?;
        writeln!(f, "{SEPARATOR}")
    }
}

struct Triple(Vec3);

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}, {:.2})",
            tidy(self.0.x),
            tidy(self.0.y),
            tidy(self.0.z)
        )
    }
}

/// Rounds to two decimals before formatting so values like -0.001 never print as -0.00.
fn tidy(value: f32) -> f32 {
    // Adding zero turns -0.0 into 0.0.
    (value * 100.0).round() / 100.0 + 0.0
}

/// Euler angles in degrees as (pitch, yaw, roll), each in `[0, 360)`.
fn euler_degrees(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(
        wrap_degrees(pitch.to_degrees()),
        wrap_degrees(yaw.to_degrees()),
        wrap_degrees(roll.to_degrees()),
    )
}

fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // Values that would print as 360.00 wrap to zero.
    if wrapped >= 359.995 {
        0.0
    } else {
        wrapped + 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::scene::MemoryScene;
    use crate::placement::{InstanceId, Template};
    use crate::visibility::VisibilityRule;

    fn descriptor(scene: &mut MemoryScene, name: &str, rule: VisibilityRule) -> InstanceDescriptor {
        let node = scene.instantiate(&Template::new("Egg")).unwrap();
        InstanceDescriptor {
            id: InstanceId(node.0),
            name: name.into(),
            template: "Egg".into(),
            node,
            position: Vec3::new(0.25, 1.0, -0.75),
            rotation: Quat::from_rotation_y(90f32.to_radians()),
            parent: None,
            rule,
            label: None,
        }
    }

    #[test]
    fn renders_one_block_per_instance() {
        let mut scene = MemoryScene::new();
        let mut first = descriptor(&mut scene, "Egg_1", VisibilityRule::by_date("12/25"));
        first.label = Some("Christmas".into());
        scene.set_material(first.node, "GoldShell").unwrap();
        let second = descriptor(&mut scene, "Egg_2", VisibilityRule::AlwaysVisible);
        let placed = [first, second];

        let text = PlacementReport::new(&placed).render(&scene).unwrap();
        let expected = [
            "Instance: Egg_1",
            "Type: Christmas",
            "Exact Position: (0.25, 1.00, -0.75)",
            "Rotation: (0.00, 90.00, 0.00)",
            "Material: GoldShell",
            "Enable On Date: 12/25",
            SEPARATOR,
            "Instance: Egg_2",
            "Type: Egg",
            "Exact Position: (0.25, 1.00, -0.75)",
            "Rotation: (0.00, 90.00, 0.00)",
            "Material: Unknown",
            "Enable On Date: ",
            SEPARATOR,
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn negative_yaw_wraps_into_range() {
        let angles = euler_degrees(Quat::from_rotation_y((-90f32).to_radians()));
        assert!((angles.y - 270.0).abs() < 1e-3);
        assert_eq!(euler_degrees(Quat::IDENTITY), Vec3::ZERO);
        assert_eq!(wrap_degrees(-0.0).to_string(), "0");
        assert_eq!(wrap_degrees(-1e-6), 0.0);
    }

    #[test]
    fn tiny_negative_components_print_unsigned() {
        assert_eq!(
            Triple(Vec3::new(-0.001, -0.0, 1.004)).to_string(),
            "(0.00, 0.00, 1.00)"
        );
        assert_eq!(Triple(Vec3::new(-0.004, 0.0, -0.5)).to_string(), "(0.00, 0.00, -0.50)");
    }

    #[test]
    fn empty_report_is_an_error() {
        let scene = MemoryScene::new();
        assert!(matches!(
            PlacementReport::new(&[]).render(&scene),
            Err(Error::MissingPrerequisite(_))
        ));
    }

    #[test]
    fn write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = MemoryScene::new();
        let placed = [descriptor(&mut scene, "Egg_1", VisibilityRule::AlwaysVisible)];
        let path = dir.path().join("reports").join("placement_info.txt");

        PlacementReport::new(&placed).write_to(&scene, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Instance: Egg_1\n"));
        assert!(text.ends_with(&format!("{SEPARATOR}\n")));
    }
}
