//! Publishing looks with pipeline metadata.
//!
//! Publishing records, on every material used in a dressed scene, the names
//! of the objects it is applied to. The stamped materials are exported as a
//! [`ShaderLibrary`] that can later be assigned onto another scene.

use crate::core::find_ambiguous_targets;
use crate::scene::{SceneDocument, SceneObject, ShaderLibrary};

/// Materials in first-seen order, each with the objects using it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialUsage {
    entries: Vec<(String, Vec<String>)>,
}

impl MaterialUsage {
    /// Objects using `material`.
    pub fn objects(&self, material: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(m, _)| m == material)
            .map(|(_, objs)| objs.as_slice())
    }

    /// Iterate over (material, objects).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(m, o)| (m.as_str(), o.as_slice()))
    }

    /// Number of materials.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record(&mut self, material: &str, object: &str) {
        let pos = match self.entries.iter().position(|(m, _)| m == material) {
            Some(pos) => pos,
            None => {
                self.entries.push((material.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        let objects = &mut self.entries[pos].1;
        if !objects.iter().any(|o| o == object) {
            objects.push(object.to_string());
        }
    }
}

/// Map every material to the material-capable objects that use it.
pub fn collect_assignments(objects: &[SceneObject]) -> MaterialUsage {
    let mut usage = MaterialUsage::default();
    for obj in objects.iter().filter(|o| o.kind.can_hold_materials()) {
        for material in &obj.object.materials {
            usage.record(material, obj.name());
        }
    }
    usage
}

/// Result of [`publish_scene`].
#[derive(Clone, Debug, Default)]
pub struct PublishOutcome {
    /// Stamped materials ready to write out.
    pub library: ShaderLibrary,
    /// Objects per published material.
    pub usage: MaterialUsage,
    /// Object names containing the target separator.
    pub ambiguous: Vec<String>,
    /// Materials referenced by objects but not defined in the scene.
    pub undefined: Vec<String>,
}

/// Stamp pipeline metadata on the scene's materials and export them.
///
/// Re-publishing overwrites the attribute, so stamping is idempotent.
pub fn publish_scene(scene: &mut SceneDocument, attribute: &str) -> PublishOutcome {
    let usage = collect_assignments(&scene.objects);
    let mut outcome = PublishOutcome {
        library: ShaderLibrary {
            published_by: publisher_version(),
            materials: Vec::with_capacity(usage.len()),
        },
        ..Default::default()
    };

    for (material, objects) in usage.iter() {
        for name in find_ambiguous_targets(objects) {
            if !outcome.ambiguous.contains(&name) {
                outcome.ambiguous.push(name);
            }
        }

        match scene.materials.iter_mut().find(|m| m.name == material) {
            Some(def) => {
                def.metadata.set_pipeline_targets(attribute, objects);
                outcome.library.materials.push(def.clone());
            }
            None => outcome.undefined.push(material.to_string()),
        }
    }

    outcome.usage = usage;
    outcome
}

/// Tool version string recorded in published libraries.
pub fn publisher_version() -> String {
    let date = option_env!("LOOK_ASSIGNER_BUILD_DATE").unwrap_or("unknown");
    let time = option_env!("LOOK_ASSIGNER_BUILD_TIME").unwrap_or("unknown");
    format!(
        "look-assigner {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        date,
        time
    )
}
