//! Flame data model: flames, their iterators and the document codecs.

pub mod batch;
mod camera;
pub mod flame;
pub mod iterator;
pub mod iterators;

pub use batch::{read_flames, write_flames};
pub use flame::Flame;
pub use iterator::{FlameIterator, IteratorGroup, SamplePoint};
pub use iterators::IteratorCollection;
