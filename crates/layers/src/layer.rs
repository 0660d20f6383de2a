use serde::{Deserialize, Serialize};

/// Identifier of a layer on one map surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u64);

/// A layer as the map host sees it.
pub trait Layer {
    fn id(&self) -> LayerId;

    /// CSS class of the layer element.
    fn class_name(&self) -> &str;

    /// Whether features repeat across the antimeridian.
    fn wraps_x(&self) -> bool {
        false
    }
}
