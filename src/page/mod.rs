//! The page document charts are mounted into, and its HTML serialization.

mod document;
pub mod html;

pub use document::{CHART_PLACEHOLDER_CLASSES, Document, Element, Node};
