use foundation::ShapeId;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawEventKind {
    InteractionStarted,
    InteractionCancelled,
    ShapeFinalized,
    ShapeReplayed,
    ShapeRemoved,
    SourceCleared,
    DrawFailed,
}

/// Lifecycle event of a draw session, kept for hosts that want a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawEvent {
    pub seq: u64,
    pub kind: DrawEventKind,
    pub shape: Option<ShapeId>,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventLog {
    next_seq: u64,
    events: Vec<DrawEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(
        &mut self,
        kind: DrawEventKind,
        shape: Option<&ShapeId>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        debug!(seq = self.next_seq, ?kind, shape = ?shape, "{message}");
        self.events.push(DrawEvent {
            seq: self.next_seq,
            kind,
            shape: shape.cloned(),
            message,
        });
        self.next_seq += 1;
    }

    pub fn events(&self) -> &[DrawEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<DrawEvent> {
        std::mem::take(&mut self.events)
    }
}
