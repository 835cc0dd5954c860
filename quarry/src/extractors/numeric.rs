//! Built-in extractors for the numeric primitive types.
//!
//! Every integer extractor accepts any JSON number whose value fits the
//! destination width -- widening and narrowing both work, and a float-typed
//! number is accepted when it is integral and in range. Everything else is
//! reported as a soft problem.

use paste::paste;
use serde_json::Value;

use crate::extraction::{ExtractResult, Extraction, ExtractionContext, Extractor, TypeKey};
use crate::value::ValueExt;

macro_rules! integer_extractor {
    ($($int:ident),+ $(,)?) => {
        $(
            paste! {
                #[doc = concat!("Extracts `", stringify!($int), "` from any JSON number that fits.")]
                #[derive(Debug, Clone, Copy, Default)]
                pub struct [<$int:upper Extractor>];

                impl Extractor for [<$int:upper Extractor>] {
                    fn type_key(&self) -> TypeKey {
                        TypeKey::of::<$int>()
                    }

                    fn extract(
                        &self,
                        cx: &mut ExtractionContext<'_>,
                        node: &Value,
                    ) -> ExtractResult {
                        let Value::Number(number) = node else {
                            return cx.problem(format!(
                                "expected a number, found {}",
                                node.kind_name()
                            ));
                        };
                        if let Some(value) = number.as_i64() {
                            return match <$int>::try_from(value) {
                                Ok(converted) => Ok(Extraction::boxed(converted)),
                                Err(_) => cx.problem(format!(
                                    "value {value} does not fit in `{}`",
                                    stringify!($int)
                                )),
                            };
                        }
                        if let Some(value) = number.as_u64() {
                            return match <$int>::try_from(value) {
                                Ok(converted) => Ok(Extraction::boxed(converted)),
                                Err(_) => cx.problem(format!(
                                    "value {value} does not fit in `{}`",
                                    stringify!($int)
                                )),
                            };
                        }
                        // Remaining case: a float-typed number.
                        #[allow(
                            clippy::cast_precision_loss,
                            clippy::cast_possible_truncation,
                            reason = "integral and in-range checked before converting"
                        )]
                        if let Some(value) = number.as_f64()
                            && value.fract() == 0.0
                            && value >= <$int>::MIN as f64
                            && value <= <$int>::MAX as f64
                        {
                            return Ok(Extraction::boxed(value as $int));
                        }
                        cx.problem(format!(
                            "number {number} does not fit in `{}`",
                            stringify!($int)
                        ))
                    }
                }
            }
        )+
    };
}

integer_extractor!(i8, i16, i32, i64, u8, u16, u32, u64);

/// Extracts `f64` from any JSON number.
#[derive(Debug, Clone, Copy, Default)]
pub struct F64Extractor;

impl Extractor for F64Extractor {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<f64>()
    }

    fn extract(&self, cx: &mut ExtractionContext<'_>, node: &Value) -> ExtractResult {
        node.as_f64().map_or_else(
            || cx.problem(format!("expected a number, found {}", node.kind_name())),
            |value| Ok(Extraction::boxed(value)),
        )
    }
}

/// Extracts `f32` from any JSON number whose magnitude fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct F32Extractor;

impl Extractor for F32Extractor {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<f32>()
    }

    fn extract(&self, cx: &mut ExtractionContext<'_>, node: &Value) -> ExtractResult {
        let Some(value) = node.as_f64() else {
            return cx.problem(format!("expected a number, found {}", node.kind_name()));
        };
        if value.is_finite() && value.abs() > f64::from(f32::MAX) {
            return cx.problem(format!("number {value} does not fit in `f32`"));
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "magnitude checked against f32::MAX above"
        )]
        Ok(Extraction::boxed(value as f32))
    }
}
