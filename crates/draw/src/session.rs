//! Draw session: owns the active interaction and the drawn shapes.
//!
//! Lifecycle per `draw()` call is `Idle -> Active -> Idle`. At most one
//! interaction is active; starting another cancels the pending one and
//! settles its handle with [`CancelReason::Superseded`].
//!
//! Every shape is kept as one [`Shape`] aggregate (feature plus optional
//! popup) keyed by id, so single removal, popup dismissal and clearing all
//! tear down the same pieces.

use std::collections::HashMap;

use foundation::ShapeId;
use layers::vector::{Feature, VectorLayer};
use layers::{LayerId, StyleOptions, StyleResolver};
use tracing::{debug, info, warn};

use crate::config::DrawConfig;
use crate::error::{CancelReason, DrawError};
use crate::events::{DrawEvent, DrawEventKind, EventLog};
use crate::geometry::{GeometryDeriver, RawGeometry};
use crate::handle::{DrawHandle, DrawReply};
use crate::interaction::{Interaction, InteractionId, PointerEvent, Step};
use crate::popup::{Overlay, PopupController};
use crate::record::{ShapeKind, ShapeRecord};
use crate::surface::MapSurface;

const DRAW_LAYER_ID: LayerId = LayerId(1);

/// A shape on the map: its record, the rendered feature and its popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub record: ShapeRecord,
    pub feature: Feature,
    pub popup: Option<Overlay>,
    seq: u64,
}

impl Shape {
    pub fn id(&self) -> &ShapeId {
        &self.record.id
    }

    /// Removes feature and popup from the surface together.
    fn destroy<S: MapSurface + ?Sized>(&self, surface: &mut S, popups: &PopupController) {
        surface.remove_feature(self.id());
        if self.popup.is_some() && !popups.detach(surface, self.id()) {
            warn!("popup of {} was already gone from the surface", self.id());
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Origin {
    Drawn,
    Replayed,
}

struct ActiveDraw {
    interaction: Interaction,
    options: Option<StyleOptions>,
    reply: DrawReply,
}

pub struct DrawSession<S: MapSurface> {
    surface: S,
    resolver: StyleResolver,
    deriver: GeometryDeriver,
    popups: PopupController,
    layer: VectorLayer,
    finish_tolerance: f64,
    shapes: HashMap<ShapeId, Shape>,
    next_seq: u64,
    active: Option<ActiveDraw>,
    next_interaction: u64,
    events: EventLog,
}

impl<S: MapSurface> DrawSession<S> {
    /// Creates the session and adds its draw layer to `surface`.
    pub fn new(mut surface: S, config: &DrawConfig) -> Self {
        let layer = VectorLayer::new(DRAW_LAYER_ID, config.layer_class.clone());
        surface.add_layer(&layer);
        Self {
            surface,
            resolver: StyleResolver::new(config.symbology.clone()),
            deriver: GeometryDeriver::new(config.popup.circle_anchor),
            popups: PopupController::new(config.popup.clone()),
            layer,
            finish_tolerance: config.finish_tolerance,
            shapes: HashMap::new(),
            next_seq: 0,
            active: None,
            next_interaction: 0,
            events: EventLog::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn layer(&self) -> &VectorLayer {
        &self.layer
    }

    /// Starts drawing a `kind` shape. A pending draw is cancelled first.
    pub fn draw(&mut self, kind: ShapeKind, options: Option<StyleOptions>) -> DrawHandle {
        self.cancel_active(CancelReason::Superseded);

        let id = InteractionId(self.next_interaction);
        self.next_interaction += 1;

        let sketch_style = self
            .resolver
            .resolve(kind.style_category(), options.as_ref());
        let interaction = Interaction::new(id, kind, sketch_style, self.finish_tolerance);
        self.surface.add_interaction(interaction.spec());
        self.events.emit(
            DrawEventKind::InteractionStarted,
            None,
            format!("{kind} interaction {} started", id.0),
        );

        let (handle, reply) = DrawHandle::channel(kind, id);
        self.active = Some(ActiveDraw {
            interaction,
            options,
            reply,
        });
        handle
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_kind(&self) -> Option<ShapeKind> {
        self.active.as_ref().map(|a| a.interaction.kind())
    }

    /// Feeds pointer input to the active interaction. Returns the record when
    /// this event finished the shape.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<ShapeRecord> {
        let active = self.active.as_mut()?;
        match active.interaction.handle(event) {
            Step::Unchanged => None,
            Step::Sketch(sketch) => {
                self.surface.update_sketch(active.interaction.id(), &sketch);
                None
            }
            Step::Complete(raw) => self.complete(raw),
        }
    }

    /// Finishes the active shape with the vertices placed so far, if enough.
    pub fn finish_drawing(&mut self) -> Option<ShapeRecord> {
        let raw = self.active.as_ref()?.interaction.finish()?;
        self.complete(raw)
    }

    fn complete(&mut self, raw: RawGeometry) -> Option<ShapeRecord> {
        let active = self.active.take()?;
        let kind = active.interaction.kind();
        self.surface.remove_interaction(active.interaction.id());

        let finalized = match self.deriver.finalize(kind, raw) {
            Ok(finalized) => finalized,
            Err(err) => {
                warn!("{kind} draw failed: {err}");
                self.events
                    .emit(DrawEventKind::DrawFailed, None, err.to_string());
                if active.reply.send(Err(DrawError::Geometry(err))).is_err() {
                    debug!("draw handle for {kind} was dropped before it failed");
                }
                return None;
            }
        };

        let record = ShapeRecord::new(ShapeId::generate(), finalized.payload);
        self.install(record.clone(), active.options.as_ref(), Origin::Drawn);
        if active.reply.send(Ok(record.clone())).is_err() {
            debug!("draw handle for {} was dropped before completion", record.id);
        }
        Some(record)
    }

    /// Registers a shape: feature, style and (for line-like kinds) popup.
    /// An existing shape with the same id is replaced.
    pub(crate) fn install(
        &mut self,
        record: ShapeRecord,
        options: Option<&StyleOptions>,
        origin: Origin,
    ) {
        let kind = record.kind();
        if let Some(old) = self.shapes.remove(&record.id) {
            debug!("replacing existing shape {}", record.id);
            old.destroy(&mut self.surface, &self.popups);
        }

        let style = self.resolver.resolve(kind.style_category(), options);
        let feature = Feature::new(record.id.clone(), record.geometry.to_geometry(), style);
        self.surface.add_feature(&feature);

        let popup = if kind.has_popup() {
            self.deriver
                .popup_anchor(&record.geometry)
                .map(|anchor| self.popups.attach(&mut self.surface, &record.id, anchor))
        } else {
            None
        };

        let (event, verb) = match origin {
            Origin::Drawn => (DrawEventKind::ShapeFinalized, "drawn"),
            Origin::Replayed => (DrawEventKind::ShapeReplayed, "replayed"),
        };
        info!("{kind} {} {verb}", record.id);
        self.events
            .emit(event, Some(&record.id), format!("{kind} {verb}"));

        let seq = self.next_seq;
        self.next_seq += 1;
        self.shapes.insert(
            record.id.clone(),
            Shape {
                record,
                feature,
                popup,
                seq,
            },
        );
    }

    /// Removes the shape and its popup. Unknown ids are ignored.
    pub fn remove_feature_and_popup(&mut self, id: &ShapeId) -> bool {
        let Some(shape) = self.shapes.remove(id) else {
            return false;
        };
        shape.destroy(&mut self.surface, &self.popups);
        self.events
            .emit(DrawEventKind::ShapeRemoved, Some(id), "removed");
        true
    }

    /// Popup click callback: `data_id` is the affordance's `data-id`.
    pub fn dismiss(&mut self, data_id: &str) -> bool {
        self.remove_feature_and_popup(&ShapeId::new(data_id))
    }

    /// Deactivates the current interaction, if any.
    pub fn remove_interaction(&mut self) {
        self.cancel_active(CancelReason::Deactivated);
    }

    /// Removes every shape together with its popup.
    pub fn clear_source(&mut self) {
        self.surface.clear_features();
        let count = self.shapes.len();
        for (_, shape) in self.shapes.drain() {
            if shape.popup.is_some() {
                self.popups.detach(&mut self.surface, shape.id());
            }
        }
        self.events.emit(
            DrawEventKind::SourceCleared,
            None,
            format!("{count} shapes cleared"),
        );
    }

    fn cancel_active(&mut self, reason: CancelReason) {
        let Some(active) = self.active.take() else {
            return;
        };
        let id = active.interaction.id();
        self.surface.remove_interaction(id);
        if active.reply.send(Err(DrawError::Cancelled(reason))).is_err() {
            debug!("draw handle for interaction {} was dropped before cancellation", id.0);
        }
        self.events.emit(
            DrawEventKind::InteractionCancelled,
            None,
            format!("interaction {} cancelled: {reason}", id.0),
        );
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes in the order they were added.
    pub fn shapes(&self) -> Vec<&Shape> {
        let mut shapes: Vec<&Shape> = self.shapes.values().collect();
        shapes.sort_by_key(|s| s.seq);
        shapes
    }

    /// Records of all current shapes, in insertion order, ready to persist.
    pub fn records(&self) -> Vec<ShapeRecord> {
        self.shapes().into_iter().map(|s| s.record.clone()).collect()
    }

    pub fn events(&self) -> &[DrawEvent] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<DrawEvent> {
        self.events.drain()
    }
}
