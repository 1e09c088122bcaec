//! Flamecraft edits and exchanges fractal-flame definitions.
//!
//! A [`Flame`] holds camera and tone parameters, a [`Palette`] and an ordered
//! set of iterators, each an IFS map built from a pre-affine, a weighted sum
//! of variations and a post-affine. The crate covers:
//!
//! - the data model with validated setters and exact structural equality
//! - the per-sample transform chain ([`FlameIterator::evaluate`])
//! - the canvas/world camera mapping
//! - the XML interchange format, read and written losslessly
//!
//! Every flame is created inside a [`Session`], which carries the
//! configuration, the variation registry and the flame id allocator.
#![forbid(unsafe_code)]

pub mod config;
pub mod foundation;
pub mod geometry;
pub mod model;
pub mod palette;
pub mod session;
pub mod transform;
pub mod variation;
pub mod xml;

pub use crate::config::{FlameConfig, VariationStyle};
pub use crate::foundation::core::{Affine, Canvas, Point, Rgb8, Vec2};
pub use crate::foundation::error::{FlameError, FlameResult};
pub use crate::foundation::ids::{FlameId, IteratorId};
pub use crate::geometry::Polygon;
pub use crate::model::{
    Flame, FlameIterator, IteratorCollection, IteratorGroup, SamplePoint, read_flames,
    write_flames,
};
pub use crate::palette::Palette;
pub use crate::session::{CollectingSink, MessageSink, NullSink, Session};
pub use crate::variation::{Variation, VariationCollection, VariationRegistry};
pub use crate::xml::XmlElement;
