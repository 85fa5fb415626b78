#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Публичные модули
pub mod api;     // высокий уровень: реестр символик, пайплайн
pub mod core;    // IR (паттерн + подписи), запрос, геометрия, ошибки
pub mod prelude; // удобные re-export'ы

pub mod one_d; // 1D кодировщики (ean, code39, code128, i25)

// Слой совместимости со старым API (целочисленные коды символик и флаги)
mod compat;
pub use compat::*;

pub use crate::core::pattern::{EncodedSymbol, Pattern, Placement, TextAnnotation};
pub use crate::core::types::{BarcodeFormat, BarcodeRequest, EncodeError, Geometry, Symbology};
pub use crate::one_d::EncodeOptions;

use crate::api::Pipeline;

/// One-shot: закодировать запрос пайплайном по умолчанию (все символики).
///
/// # Errors
/// См. [`Pipeline::encode`].
#[inline]
pub fn encode(req: &BarcodeRequest) -> Result<EncodedSymbol, EncodeError> {
    Pipeline::default().encode(req)
}

/// Упроститель: автоопределение символики, checksum по умолчанию.
///
/// # Errors
/// См. [`Pipeline::encode`].
#[inline]
pub fn encode_text(text: &str) -> Result<EncodedSymbol, EncodeError> {
    encode(&BarcodeRequest::new(text))
}
