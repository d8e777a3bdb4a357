//! Persisted sketch data
//!
//! Serde-ready mirror of a session's authoritative fields, used to
//! round-trip a sketch through the host's attached data blob. The host
//! transport is external; this layer owns the typed boundary: capture a
//! session into [`SketchData`], apply a blob back onto a session, and
//! encode/decode the ron text between them.
//!
//! Loading is tolerant of partial damage: the origin and face must be
//! intact or the load fails without touching the session, but a point or
//! line entry with missing numeric components is simply skipped.

use glam::IVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Face, PlaneOrigin, SketchLine, SketchPoint};
use crate::session::Session;

/// Errors from loading or encoding persisted sketch data
#[derive(Debug, Clone, thiserror::Error)]
pub enum SketchDataError {
    #[error("sketch data has no usable origin")]
    MissingOrigin,
    #[error("invalid face name: {0}")]
    InvalidFace(String),
    #[error("encoding error: {0}")]
    Encode(String),
    #[error("decoding error: {0}")]
    Decode(String),
}

/// Persisted plane origin: anchor cell components plus the face name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OriginData {
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
    #[serde(default)]
    pub z: Option<i32>,
    #[serde(default)]
    pub face: Option<String>,
}

impl From<PlaneOrigin> for OriginData {
    fn from(origin: PlaneOrigin) -> Self {
        Self {
            x: Some(origin.cell.x),
            y: Some(origin.cell.y),
            z: Some(origin.cell.z),
            face: Some(origin.face.as_str().to_string()),
        }
    }
}

/// Persisted sketch point
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointData {
    #[serde(default)]
    pub u: Option<f64>,
    #[serde(default)]
    pub v: Option<f64>,
}

impl From<SketchPoint> for PointData {
    fn from(point: SketchPoint) -> Self {
        Self {
            u: Some(point.u),
            v: Some(point.v),
        }
    }
}

/// Persisted sketch line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineData {
    #[serde(default)]
    pub u1: Option<f64>,
    #[serde(default)]
    pub v1: Option<f64>,
    #[serde(default)]
    pub u2: Option<f64>,
    #[serde(default)]
    pub v2: Option<f64>,
}

impl From<SketchLine> for LineData {
    fn from(line: SketchLine) -> Self {
        Self {
            u1: Some(line.start.u),
            v1: Some(line.start.v),
            u2: Some(line.end.u),
            v2: Some(line.end.v),
        }
    }
}

/// Serialization mirror of a session's authoritative fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchData {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub origin: OriginData,
    #[serde(default)]
    pub points: Vec<PointData>,
    #[serde(default)]
    pub lines: Vec<LineData>,
    #[serde(default)]
    pub pending_line_start: Option<PointData>,
}

impl SketchData {
    /// Snapshot a session into persistable data.
    ///
    /// Returns `None` when the session has no origin (nothing worth
    /// persisting). Assigns the session a sketch id first if it lacks one,
    /// so the persisted blob and the live session agree.
    pub fn capture(session: &Session) -> Option<Self> {
        let origin = session.origin()?;
        let id = session.ensure_sketch_id();

        Some(Self {
            id: Some(id),
            origin: origin.into(),
            points: session.points().into_iter().map(PointData::from).collect(),
            lines: session.lines().into_iter().map(LineData::from).collect(),
            pending_line_start: session.pending_line_start().map(PointData::from),
        })
    }

    /// Replace a session's state with this data.
    ///
    /// The origin is validated up front; on failure the session is left
    /// unchanged. Malformed point/line/pending entries are skipped and the
    /// rest of the load proceeds.
    pub fn apply_to(&self, session: &Session) -> Result<(), SketchDataError> {
        let face_name = self
            .origin
            .face
            .as_deref()
            .ok_or(SketchDataError::MissingOrigin)?;
        let face = Face::parse(face_name)
            .ok_or_else(|| SketchDataError::InvalidFace(face_name.to_string()))?;
        let (Some(x), Some(y), Some(z)) = (self.origin.x, self.origin.y, self.origin.z) else {
            return Err(SketchDataError::MissingOrigin);
        };

        session.start(PlaneOrigin::new(IVec3::new(x, y, z), face));
        session.set_sketch_id(self.id);

        for point in &self.points {
            if let (Some(u), Some(v)) = (point.u, point.v) {
                session.add_point(SketchPoint::new(u, v));
            }
        }

        for line in &self.lines {
            if let (Some(u1), Some(v1), Some(u2), Some(v2)) = (line.u1, line.v1, line.u2, line.v2)
            {
                session.add_line(SketchLine::new(
                    SketchPoint::new(u1, v1),
                    SketchPoint::new(u2, v2),
                ));
            }
        }

        if let Some(pending) = &self.pending_line_start {
            if let (Some(u), Some(v)) = (pending.u, pending.v) {
                session.set_pending_line_start(Some(SketchPoint::new(u, v)));
            }
        }

        Ok(())
    }

    /// Encode to ron text
    pub fn to_ron_string(&self) -> Result<String, SketchDataError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SketchDataError::Encode(e.to_string()))
    }

    /// Decode from ron text
    pub fn from_ron_str(text: &str) -> Result<Self, SketchDataError> {
        ron::from_str(text).map_err(|e| SketchDataError::Decode(e.to_string()))
    }
}
