//! The seam between the drawing engine and whatever renders the map.

use foundation::ShapeId;
use layers::vector::{Feature, Geometry, VectorLayer};

use crate::interaction::{InteractionId, InteractionSpec};
use crate::popup::Overlay;

/// Rendering host for drawn shapes: the draw layer, its feature source,
/// the active interaction and popup overlays.
pub trait MapSurface {
    fn add_layer(&mut self, layer: &VectorLayer);

    fn add_interaction(&mut self, interaction: &InteractionSpec);
    /// Also drops any sketch of that interaction.
    fn remove_interaction(&mut self, id: InteractionId);
    fn update_sketch(&mut self, id: InteractionId, sketch: &Geometry);

    fn add_feature(&mut self, feature: &Feature);
    fn remove_feature(&mut self, id: &ShapeId) -> bool;
    fn clear_features(&mut self);

    fn add_overlay(&mut self, overlay: &Overlay);
    fn remove_overlay(&mut self, id: &ShapeId) -> bool;
    fn overlay_ids(&self) -> Vec<ShapeId>;
}

/// Headless surface that keeps everything it is told in memory.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    layers: Vec<VectorLayer>,
    interactions: Vec<InteractionSpec>,
    sketch: Option<(InteractionId, Geometry)>,
    features: Vec<Feature>,
    overlays: Vec<Overlay>,
    overlays_added: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[VectorLayer] {
        &self.layers
    }

    pub fn interactions(&self) -> &[InteractionSpec] {
        &self.interactions
    }

    pub fn sketch(&self) -> Option<&Geometry> {
        self.sketch.as_ref().map(|(_, g)| g)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature(&self, id: &ShapeId) -> Option<&Feature> {
        self.features.iter().find(|f| &f.id == id)
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn overlay(&self, id: &ShapeId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| &o.id == id)
    }

    /// Total number of overlays ever added, removals not subtracted.
    pub fn overlays_added(&self) -> usize {
        self.overlays_added
    }
}

impl MapSurface for RecordingSurface {
    fn add_layer(&mut self, layer: &VectorLayer) {
        self.layers.push(layer.clone());
    }

    fn add_interaction(&mut self, interaction: &InteractionSpec) {
        self.interactions.push(interaction.clone());
    }

    fn remove_interaction(&mut self, id: InteractionId) {
        self.interactions.retain(|i| i.id != id);
        if self.sketch.as_ref().is_some_and(|(sid, _)| *sid == id) {
            self.sketch = None;
        }
    }

    fn update_sketch(&mut self, id: InteractionId, sketch: &Geometry) {
        self.sketch = Some((id, sketch.clone()));
    }

    fn add_feature(&mut self, feature: &Feature) {
        self.features.push(feature.clone());
    }

    fn remove_feature(&mut self, id: &ShapeId) -> bool {
        let before = self.features.len();
        self.features.retain(|f| &f.id != id);
        self.features.len() != before
    }

    fn clear_features(&mut self) {
        self.features.clear();
    }

    fn add_overlay(&mut self, overlay: &Overlay) {
        self.overlays.push(overlay.clone());
        self.overlays_added += 1;
    }

    fn remove_overlay(&mut self, id: &ShapeId) -> bool {
        let Some(idx) = self.overlays.iter().position(|o| &o.id == id) else {
            return false;
        };
        self.overlays.remove(idx);
        true
    }

    fn overlay_ids(&self) -> Vec<ShapeId> {
        self.overlays.iter().map(|o| o.id.clone()).collect()
    }
}
