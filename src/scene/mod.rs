//! Scene and shader library documents.
//!
//! A [`SceneDocument`] is the JSON stand-in for a host scene: objects with
//! material slots plus the materials defined in the scene. A
//! [`ShaderLibrary`] is a published look file.
//!
//! This module also provides the object pool: the subset of scene objects
//! that may receive shaders, moved out for the engine and back afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::material::{LiveObject, MaterialDef};
use crate::util::{Error, Result};

/// Kind of scene object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Polygon mesh.
    #[default]
    Mesh,
    /// Curve object.
    Curve,
    /// NURBS surface.
    Surface,
    /// Metaball.
    Meta,
    /// Text object.
    Font,
    /// Transform-only object.
    Empty,
    /// Camera.
    Camera,
    /// Light.
    Light,
}

impl ObjectKind {
    /// Whether objects of this kind have material slots.
    pub fn can_hold_materials(self) -> bool {
        matches!(
            self,
            Self::Mesh | Self::Curve | Self::Surface | Self::Meta | Self::Font
        )
    }
}

/// An object in a scene document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object kind.
    #[serde(default)]
    pub kind: ObjectKind,
    /// Whether the object is part of the current selection.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    /// Name and material slots.
    #[serde(flatten)]
    pub object: LiveObject,
}

impl SceneObject {
    /// Create an unselected object.
    pub fn new(name: &str, kind: ObjectKind) -> Self {
        Self {
            kind,
            selected: false,
            object: LiveObject::new(name),
        }
    }

    /// Object name.
    pub fn name(&self) -> &str {
        &self.object.name
    }

    /// Set material slots.
    pub fn with_materials<S: AsRef<str>>(mut self, materials: &[S]) -> Self {
        self.object = LiveObject::with_materials(&self.object.name, materials);
        self
    }

    /// Mark as selected.
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

/// Which scene objects form the assignment pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolFilter {
    /// Restrict the pool to selected objects.
    pub selected_only: bool,
    /// Object kinds eligible for assignment.
    pub kinds: Vec<ObjectKind>,
}

impl Default for PoolFilter {
    fn default() -> Self {
        Self {
            selected_only: false,
            kinds: vec![ObjectKind::Mesh],
        }
    }
}

impl PoolFilter {
    /// Meshes only, optionally restricted to the selection.
    pub fn meshes(selected_only: bool) -> Self {
        Self {
            selected_only,
            ..Self::default()
        }
    }

    /// Check a single object.
    pub fn accepts(&self, obj: &SceneObject) -> bool {
        (!self.selected_only || obj.selected) && self.kinds.contains(&obj.kind)
    }
}

/// Objects moved out of a scene for assignment.
///
/// `indices[i]` is the scene position of `objects[i]`.
#[derive(Debug, Default)]
pub struct ObjectPool {
    /// Pool objects, in scene order.
    pub objects: Vec<LiveObject>,
    indices: Vec<usize>,
}

impl ObjectPool {
    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Object names in pool order.
    pub fn names(&self) -> Vec<&str> {
        self.objects.iter().map(|o| o.name.as_str()).collect()
    }
}

/// A scene: objects and the materials defined in it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Objects in scene order.
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    /// Materials defined in the scene.
    #[serde(default)]
    pub materials: Vec<MaterialDef>,
}

impl SceneDocument {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let scene: Self = read_json(path.as_ref())?;
        scene.check_unique_names()?;
        Ok(scene)
    }

    /// Save the scene as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), self)
    }

    /// Get an object by name.
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name() == name)
    }

    /// Get a material by name.
    pub fn material(&self, name: &str) -> Option<&MaterialDef> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Reject documents where two objects share a name.
    fn check_unique_names(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for obj in &self.objects {
            if !seen.insert(obj.name()) {
                return Err(Error::invalid(format!("duplicate object name '{}'", obj.name())));
            }
        }
        Ok(())
    }

    /// Move the objects accepted by `filter` out of the scene.
    ///
    /// The scene keeps placeholders until [`restore_pool`](Self::restore_pool).
    pub fn extract_pool(&mut self, filter: &PoolFilter) -> ObjectPool {
        let mut pool = ObjectPool::default();
        for (i, obj) in self.objects.iter_mut().enumerate() {
            if filter.accepts(obj) {
                pool.objects.push(std::mem::take(&mut obj.object));
                pool.indices.push(i);
            }
        }
        pool
    }

    /// Put pool objects back in their scene positions.
    pub fn restore_pool(&mut self, pool: ObjectPool) {
        for (obj, i) in pool.objects.into_iter().zip(pool.indices) {
            if let Some(slot) = self.objects.get_mut(i) {
                slot.object = obj;
            }
        }
    }

    /// Copy `names` from `library` into the scene.
    ///
    /// A scene material with the same name is replaced by the library copy.
    /// Returns the imported materials in request order; names the library
    /// does not define are returned separately.
    pub fn import_materials<S: AsRef<str>>(
        &mut self,
        library: &ShaderLibrary,
        names: &[S],
    ) -> (Vec<MaterialDef>, Vec<String>) {
        let mut imported = Vec::new();
        let mut missing = Vec::new();

        for name in names {
            let name = name.as_ref();
            let Some(mat) = library.material(name) else {
                missing.push(name.to_string());
                continue;
            };
            match self.materials.iter_mut().find(|m| m.name == name) {
                Some(existing) => *existing = mat.clone(),
                None => self.materials.push(mat.clone()),
            }
            imported.push(mat.clone());
        }

        (imported, missing)
    }

    /// Remove materials no object references. Returns how many were removed.
    pub fn purge_unused_materials(&mut self) -> usize {
        let objects = &self.objects;
        let before = self.materials.len();
        self.materials
            .retain(|m| objects.iter().any(|o| o.object.uses_material(&m.name)));
        before - self.materials.len()
    }
}

/// A published look file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderLibrary {
    /// Tool and build that wrote the file.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub published_by: String,
    /// Published materials.
    #[serde(default)]
    pub materials: Vec<MaterialDef>,
}

impl ShaderLibrary {
    /// Load a library from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }

    /// Save the library as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), self)
    }

    /// Get a material by name.
    pub fn material(&self, name: &str) -> Option<&MaterialDef> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Material names in file order.
    pub fn material_names(&self) -> Vec<&str> {
        self.materials.iter().map(|m| m.name.as_str()).collect()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
