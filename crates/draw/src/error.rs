use crate::record::ShapeKind;

/// Why a pending draw stopped without producing a shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// A newer `draw()` call replaced it.
    Superseded,
    /// `remove_interaction()` was called while it was pending.
    Deactivated,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Superseded => write!(f, "superseded by a newer draw"),
            CancelReason::Deactivated => write!(f, "interaction deactivated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    TooFewVertices {
        kind: ShapeKind,
        min: usize,
        got: usize,
    },
    VertexCount {
        kind: ShapeKind,
        expected: usize,
        got: usize,
    },
    UnexpectedInput {
        kind: ShapeKind,
    },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::TooFewVertices { kind, min, got } => {
                write!(f, "{kind} needs at least {min} vertices, got {got}")
            }
            GeometryError::VertexCount {
                kind,
                expected,
                got,
            } => write!(f, "{kind} needs exactly {expected} vertices, got {got}"),
            GeometryError::UnexpectedInput { kind } => {
                write!(f, "interaction output does not fit a {kind}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Settlement error of a [`crate::DrawHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    Cancelled(CancelReason),
    /// The session was dropped while the draw was pending.
    SessionClosed,
    Geometry(GeometryError),
}

impl std::fmt::Display for DrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawError::Cancelled(reason) => write!(f, "draw cancelled: {reason}"),
            DrawError::SessionClosed => write!(f, "draw session closed"),
            DrawError::Geometry(err) => write!(f, "draw produced invalid geometry: {err}"),
        }
    }
}

impl std::error::Error for DrawError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DrawError::Geometry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GeometryError> for DrawError {
    fn from(err: GeometryError) -> Self {
        DrawError::Geometry(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplayError {
    EmptyGeometry { id: String },
    InvalidRadius { id: String, radius: f64 },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::EmptyGeometry { id } => write!(f, "shape {id} has no coordinates"),
            ReplayError::InvalidRadius { id, radius } => {
                write!(f, "shape {id} has invalid circle radius {radius}")
            }
        }
    }
}

impl std::error::Error for ReplayError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    UnknownKind(String),
    Coordinate { kind: ShapeKind, message: String },
    Json(String),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::UnknownKind(s) => write!(f, "unknown shape type: {s}"),
            RecordError::Coordinate { kind, message } => {
                write!(f, "coordinate does not match {kind}: {message}")
            }
            RecordError::Json(msg) => write!(f, "record json: {msg}"),
        }
    }
}

impl std::error::Error for RecordError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config io error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
