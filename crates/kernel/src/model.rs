use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::debug;

use crate::geometry::curves::{Curve2d, Curve3d};
use crate::geometry::nurbs::{NurbsCurveGeometry2d, NurbsCurveGeometry3d, NurbsSurfaceGeometry};
use crate::geometry::surfaces::Surface;

// ─── Entity Keys ─────────────────────────────────────────────────────────────

new_key_type! {
    pub struct GeometryId;
}

// ─── Entities ────────────────────────────────────────────────────────────────

/// The geometry kinds a model can hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Geometry {
    NurbsCurve2d(Arc<NurbsCurveGeometry2d>),
    NurbsCurve3d(Arc<NurbsCurveGeometry3d>),
    NurbsSurface3d(Arc<NurbsSurfaceGeometry>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    NurbsCurve2d,
    NurbsCurve3d,
    NurbsSurface3d,
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::NurbsCurve2d(_) => GeometryKind::NurbsCurve2d,
            Geometry::NurbsCurve3d(_) => GeometryKind::NurbsCurve3d,
            Geometry::NurbsSurface3d(_) => GeometryKind::NurbsSurface3d,
        }
    }
}

impl From<NurbsCurveGeometry2d> for Geometry {
    fn from(geometry: NurbsCurveGeometry2d) -> Self {
        Geometry::NurbsCurve2d(Arc::new(geometry))
    }
}

impl From<NurbsCurveGeometry3d> for Geometry {
    fn from(geometry: NurbsCurveGeometry3d) -> Self {
        Geometry::NurbsCurve3d(Arc::new(geometry))
    }
}

impl From<NurbsSurfaceGeometry> for Geometry {
    fn from(geometry: NurbsSurfaceGeometry) -> Self {
        Geometry::NurbsSurface3d(Arc::new(geometry))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub name: Option<String>,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("An entry named '{0}' already exists")]
    DuplicateName(String),
}

// ─── Model ───────────────────────────────────────────────────────────────────

/// Arena of geometry entities addressed by generational keys.
///
/// Removing an entry invalidates its key; a stale key never resolves to a
/// later entry. Evaluators borrow geometry through views and never hold a
/// reference to the model.
#[derive(Debug, Clone, Default)]
pub struct Model {
    entries: SlotMap<GeometryId, Entry>,
    names: HashMap<String, GeometryId>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, geometry: impl Into<Geometry>) -> GeometryId {
        let geometry = geometry.into();
        let kind = geometry.kind();
        let id = self.entries.insert(Entry {
            name: None,
            geometry,
        });
        debug!(?id, ?kind, "added geometry");
        id
    }

    pub fn add_named(
        &mut self,
        name: impl Into<String>,
        geometry: impl Into<Geometry>,
    ) -> Result<GeometryId, ModelError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(ModelError::DuplicateName(name));
        }
        let geometry = geometry.into();
        let kind = geometry.kind();
        let id = self.entries.insert(Entry {
            name: Some(name.clone()),
            geometry,
        });
        debug!(?id, ?kind, name = %name, "added named geometry");
        self.names.insert(name, id);
        Ok(id)
    }

    pub fn get(&self, id: GeometryId) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<(GeometryId, &Entry)> {
        let id = *self.names.get(name)?;
        self.entries.get(id).map(|entry| (id, entry))
    }

    pub fn remove(&mut self, id: GeometryId) -> Option<Entry> {
        let entry = self.entries.remove(id)?;
        if let Some(name) = &entry.name {
            self.names.remove(name);
        }
        debug!(?id, "removed geometry");
        Some(entry)
    }

    /// Keys of all entries of `kind`, in arena order.
    pub fn of_type(&self, kind: GeometryKind) -> Vec<GeometryId> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.geometry.kind() == kind)
            .map(|(id, _)| id)
            .collect()
    }

    /// Full-domain view of a planar curve, `None` for a missing key or
    /// another kind.
    pub fn curve_2d(&self, id: GeometryId) -> Option<Curve2d> {
        match &self.entries.get(id)?.geometry {
            Geometry::NurbsCurve2d(geometry) => Some(Curve2d::new(Arc::clone(geometry))),
            _ => None,
        }
    }

    pub fn curve_3d(&self, id: GeometryId) -> Option<Curve3d> {
        match &self.entries.get(id)?.geometry {
            Geometry::NurbsCurve3d(geometry) => Some(Curve3d::new(Arc::clone(geometry))),
            _ => None,
        }
    }

    pub fn surface_3d(&self, id: GeometryId) -> Option<Surface> {
        match &self.entries.get(id)?.geometry {
            Geometry::NurbsSurface3d(geometry) => Some(Surface::new(Arc::clone(geometry))),
            _ => None,
        }
    }
}
