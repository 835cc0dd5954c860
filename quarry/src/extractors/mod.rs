//! Built-in extractors registered by [`Formats::with_defaults`], plus the
//! generic container extractors applications register per element type.
//!
//! [`Formats::with_defaults`]: crate::formats::Formats::with_defaults

mod containers;
mod numeric;
mod scalar;

pub use containers::{MapExtractor, OptionExtractor, SequenceExtractor};
pub use numeric::{
    F32Extractor, F64Extractor, I8Extractor, I16Extractor, I32Extractor, I64Extractor,
    U8Extractor, U16Extractor, U32Extractor, U64Extractor,
};
pub use scalar::{BoolExtractor, CharExtractor, StringExtractor, ValueExtractor};
