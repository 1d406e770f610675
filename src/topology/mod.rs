//! In-memory topology store
//!
//! A [`Dataset`] owns an [`ArcTable`] and an ordered list of [`ShapeRecord`]s.
//! Shape records never own coordinates; they reference arcs with signed
//! [`ArcRef`]s, so a boundary shared by two features exists once.
//!
//! ```rust
//! use geoexport::topology::Dataset;
//!
//! let dataset = Dataset::from_json(r#"{
//!     "arcs": [[[0, 0], [0, 1], [1, 1], [0, 0]]],
//!     "shapes": [[[0]]]
//! }"#).unwrap();
//! assert_eq!(dataset.shapes().len(), 1);
//! ```

pub mod arcs;
pub mod rings;
pub mod shapes;

pub use arcs::{ArcRef, ArcTable};
pub use shapes::{Dataset, DatasetDocument, ShapeRecord};
