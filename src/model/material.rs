// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Session-wide material lookup table

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

static NO_MATERIAL: Material = Material::none();

/// Material value attached to surfaces and instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// RGBA
    pub color: [u8; 4],
    #[serde(default)]
    pub use_opacity: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Material {
    pub fn new(name: impl Into<String>, color: [u8; 4]) -> Self {
        Self {
            name: name.into(),
            color,
            use_opacity: false,
            opacity: 1.0,
        }
    }

    /// The designated "no material" value
    pub const fn none() -> Self {
        Self {
            name: String::new(),
            color: [255, 255, 255, 255],
            use_opacity: false,
            opacity: 1.0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.name.is_empty()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::none()
    }
}

/// Read-only mapping from material identifier to material
///
/// Built once per session and shared by reference through every
/// recursive conversion step.
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    materials: AHashMap<String, Material>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_materials(materials: impl IntoIterator<Item = Material>) -> Self {
        let mut table = Self::new();
        for material in materials {
            table.insert(material);
        }
        table
    }

    /// Later inserts with the same name replace earlier ones.
    pub fn insert(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    /// Look up a material; absent identifiers yield [`Material::none`]
    pub fn get(&self, id: &str) -> &Material {
        self.materials.get(id).unwrap_or(&NO_MATERIAL)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.materials.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Materials sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        let mut materials: Vec<&Material> = self.materials.values().collect();
        materials.sort_by(|a, b| a.name.cmp(&b.name));
        materials.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_material_is_none() {
        let table = MaterialTable::from_materials([Material::new("Brick", [180, 60, 40, 255])]);
        assert_eq!(table.get("Brick").color, [180, 60, 40, 255]);
        assert!(table.get("Glass").is_none());
        assert!(!table.contains("Glass"));
    }

    #[test]
    fn test_iteration_is_sorted() {
        let table = MaterialTable::from_materials([
            Material::new("Zinc", [1, 1, 1, 255]),
            Material::new("Ash", [2, 2, 2, 255]),
        ]);
        let names: Vec<&str> = table.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Ash", "Zinc"]);
        assert_eq!(table.len(), 2);
    }
}
