//! Drawing and annotation engine for map surfaces.
//!
//! A [`DrawSession`] owns at most one active drawing interaction, turns
//! completed pointer input into [`ShapeRecord`]s, styles the resulting
//! features and attaches dismiss popups to line-like shapes. Stored records
//! can be shown again without interactive drawing through the replay API.

pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod handle;
pub mod interaction;
pub mod popup;
pub mod record;
pub mod replay;
pub mod session;
pub mod surface;

pub use config::*;
pub use error::*;
pub use events::*;
pub use handle::*;
pub use interaction::{InteractionId, InteractionMode, InteractionSpec, PointerEvent};
pub use popup::{CloseAffordance, Overlay, PopupConfig, Positioning};
pub use record::*;
pub use session::*;
pub use surface::*;
