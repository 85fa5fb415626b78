// src/prelude.rs
//! `use ultrabar::prelude::*;`: всё, что нужно для кодирования и чтения IR.

pub use crate::api::{Pipeline, PipelineBuilder, SymbologyDescriptor, REGISTRY};
pub use crate::core::pattern::{
    annotations_to_string, parse_annotations, Element, EncodedSymbol, Pattern, PatternError,
    PatternItem, Placement, TextAnnotation, Width,
};
pub use crate::core::types::{
    BarcodeFormat, BarcodeRequest, EncodeError, Geometry, Layout, Symbology, DEFAULT_MARGIN,
};
pub use crate::one_d::EncodeOptions;
