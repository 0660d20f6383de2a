use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::error::DrawError;
use crate::interaction::InteractionId;
use crate::record::{ShapeKind, ShapeRecord};

pub(crate) type DrawReply = oneshot::Sender<Result<ShapeRecord, DrawError>>;

/// Pending result of a `draw()` call.
///
/// Resolves with the finished record, or with a [`DrawError`] once the
/// session stops tracking the draw (superseded, deactivated, dropped).
#[derive(Debug)]
pub struct DrawHandle {
    kind: ShapeKind,
    interaction: InteractionId,
    rx: oneshot::Receiver<Result<ShapeRecord, DrawError>>,
}

impl DrawHandle {
    pub(crate) fn channel(kind: ShapeKind, interaction: InteractionId) -> (Self, DrawReply) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                kind,
                interaction,
                rx,
            },
            tx,
        )
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn interaction(&self) -> InteractionId {
        self.interaction
    }

    /// Non-blocking check. `None` while the draw is still pending.
    pub fn try_settle(&mut self) -> Option<Result<ShapeRecord, DrawError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(DrawError::SessionClosed)),
        }
    }
}

impl Future for DrawHandle {
    type Output = Result<ShapeRecord, DrawError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(DrawError::SessionClosed)))
    }
}
