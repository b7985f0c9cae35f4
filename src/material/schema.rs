//! Shader records, live objects and persisted material definitions.

use serde::{Deserialize, Serialize};

use crate::core::{decode_targets, MetaData};

/// One shader and its pipeline metadata.
///
/// A "standard" shader carries no recorded targets. A pipelined shader may
/// still record zero targets if its attribute was set to an empty string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderRecord {
    /// Batch-unique shader name.
    pub name: String,
    /// Recorded object names, or `None` for a standard shader.
    pub pipeline_targets: Option<Vec<String>>,
}

impl ShaderRecord {
    /// Create a shader record.
    pub fn new(name: &str, pipeline_targets: Option<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            pipeline_targets,
        }
    }

    /// Create a shader without pipeline metadata.
    pub fn standard(name: &str) -> Self {
        Self::new(name, None)
    }

    /// Create a pipelined shader from already-split target names.
    pub fn pipelined<S: AsRef<str>>(name: &str, targets: &[S]) -> Self {
        let targets = targets.iter().map(|s| s.as_ref().to_string()).collect();
        Self::new(name, Some(targets))
    }

    /// Create a pipelined shader from the raw `", "` joined attribute value.
    pub fn from_raw_targets(name: &str, raw: &str) -> Self {
        Self::new(name, Some(decode_targets(raw)))
    }

    /// Build a record from a persisted material, reading targets from `attribute`.
    pub fn from_material(material: &MaterialDef, attribute: &str) -> Self {
        Self::new(&material.name, material.metadata.pipeline_targets(attribute))
    }

    /// Whether this shader carries pipeline metadata.
    #[inline]
    pub fn is_pipelined(&self) -> bool {
        self.pipeline_targets.is_some()
    }

    /// Recorded target names (empty for standard shaders).
    pub fn targets(&self) -> &[String] {
        self.pipeline_targets.as_deref().unwrap_or(&[])
    }
}

/// An object in the destination pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveObject {
    /// Object name, unique within the pool.
    pub name: String,
    /// Assigned material names, slot order.
    #[serde(default)]
    pub materials: Vec<String>,
}

impl LiveObject {
    /// Create an object with no material slots.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            materials: Vec::new(),
        }
    }

    /// Create an object with the given material slots.
    pub fn with_materials<S: AsRef<str>>(name: &str, materials: &[S]) -> Self {
        Self {
            name: name.to_string(),
            materials: materials.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Material in slot 0, if any.
    pub fn primary_material(&self) -> Option<&str> {
        self.materials.first().map(|s| s.as_str())
    }

    /// Whether `material` is the one and only assigned material.
    pub fn has_sole_material(&self, material: &str) -> bool {
        self.materials.len() == 1 && self.materials[0] == material
    }

    /// Whether any slot references `material`.
    pub fn uses_material(&self, material: &str) -> bool {
        self.materials.iter().any(|m| m == material)
    }
}

/// Persisted material as it appears in scene and library documents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Material name.
    pub name: String,
    /// Free-form string attributes, including pipeline metadata.
    #[serde(default, skip_serializing_if = "MetaData::is_empty")]
    pub metadata: MetaData,
}

impl MaterialDef {
    /// Create a material with no attributes.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metadata: MetaData::new(),
        }
    }

    /// Whether the material carries the pipeline attribute.
    pub fn is_pipelined(&self, attribute: &str) -> bool {
        self.metadata.contains(attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PIPELINE_ATTRIBUTE;

    #[test]
    fn test_shader_record_kinds() {
        let standard = ShaderRecord::standard("floor_MAT");
        assert!(!standard.is_pipelined());
        assert!(standard.targets().is_empty());

        let empty = ShaderRecord::from_raw_targets("empty_MAT", "");
        assert!(empty.is_pipelined());
        assert!(empty.targets().is_empty());

        let skin = ShaderRecord::from_raw_targets("skin_MAT", "Torso, Head");
        assert_eq!(skin.targets(), ["Torso", "Head"]);
    }

    #[test]
    fn test_record_from_material() {
        let mut mat = MaterialDef::new("skin_MAT");
        assert_eq!(ShaderRecord::from_material(&mat, PIPELINE_ATTRIBUTE), ShaderRecord::standard("skin_MAT"));

        mat.metadata.set(PIPELINE_ATTRIBUTE, "Torso, Head");
        let record = ShaderRecord::from_material(&mat, PIPELINE_ATTRIBUTE);
        assert_eq!(record, ShaderRecord::pipelined("skin_MAT", &["Torso", "Head"]));

        // A differently configured attribute name ignores the default one.
        assert!(!ShaderRecord::from_material(&mat, "CUSTOM_ATTR").is_pipelined());
    }

    #[test]
    fn test_live_object_slots() {
        let obj = LiveObject::with_materials("Torso", &["skin_MAT"]);
        assert_eq!(obj.primary_material(), Some("skin_MAT"));
        assert!(obj.has_sole_material("skin_MAT"));

        let obj = LiveObject::with_materials("Torso", &["skin_MAT", "cloth_MAT"]);
        assert!(!obj.has_sole_material("skin_MAT"));
        assert!(obj.uses_material("cloth_MAT"));

        assert_eq!(LiveObject::new("Empty").primary_material(), None);
    }
}
