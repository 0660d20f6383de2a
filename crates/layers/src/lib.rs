pub mod color;
pub mod labels;
pub mod layer;
pub mod symbology;
pub mod vector;

pub use color::*;
pub use layer::*;
pub use symbology::*;
