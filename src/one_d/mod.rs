//! Линейные (1D) символики: таблицы ширин, валидаторы и кодировщики.
//!
//! Каждый кодировщик: чистая функция `&str -> EncodedSymbol`: все буферы
//! выделяются на вызов и возвращаются владельцу, общего состояния нет.

pub mod checksum;
pub mod code128;
pub mod code39;
pub mod ean;
pub mod i25;

pub use crate::core::types::BarcodeFormat;

use crate::core::pattern::{EncodedSymbol, Pattern, PatternItem, Placement, TextAnnotation, Width};
use crate::core::types::{EncodeError, Geometry, Symbology};

#[derive(Clone, Debug, PartialEq)]
pub struct EncodeOptions {
    /// Добавлять опциональный контрольный символ (Code 39, Interleaved 2 of 5).
    /// EAN/UPC и Code 128 считают его всегда.
    pub checksum: bool,
    /// Подсказки геометрии, передаются в результат как есть.
    pub geometry: Geometry,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            checksum: true,
            geometry: Geometry::default(),
        }
    }
}

/// ASCII-цифра -> значение.
#[inline]
pub(crate) fn digit(b: u8) -> Option<u8> {
    b.is_ascii_digit().then(|| b - b'0')
}

#[inline]
pub(crate) fn all_digits(s: &[u8]) -> bool {
    s.iter().all(u8::is_ascii_digit)
}

/// Значение -> ASCII-цифра для подписей.
#[inline]
pub(crate) fn digit_char(d: u8) -> char {
    char::from(b'0' + d)
}

/// Ровно `N` цифр -> массив значений.
pub(crate) fn parse_digits<const N: usize>(s: &[u8]) -> Option<[u8; N]> {
    if s.len() != N {
        return None;
    }
    let mut out = [0u8; N];
    for (o, &b) in out.iter_mut().zip(s) {
        *o = digit(b)?;
    }
    Some(out)
}

/// Таблица ширин "3211" -> [3, 2, 1, 1] во время компиляции.
pub(crate) const fn widths<const N: usize>(s: &[u8; N]) -> [u8; N] {
    let mut out = [0u8; N];
    let mut i = 0;
    while i < N {
        out[i] = s[i] - b'0';
        i += 1;
    }
    out
}

/// Сборщик результата одного вызова: паттерн + подписи.
/// Позиция следующей подписи: текущая ширина собранного паттерна.
pub(crate) struct SymbolBuilder {
    lead: u8,
    items: Vec<PatternItem>,
    text: Vec<TextAnnotation>,
    placement: Placement,
    width: u32,
}

impl SymbolBuilder {
    /// Зарезервировать место заранее: нехватка памяти: ошибка, а не abort.
    pub fn with_capacity(lead: u8, widths: usize, chars: usize) -> Result<Self, EncodeError> {
        let mut items = Vec::new();
        items.try_reserve(widths)?;
        let mut text = Vec::new();
        text.try_reserve(chars)?;
        Ok(Self {
            lead,
            items,
            text,
            placement: Placement::Below,
            width: u32::from(lead),
        })
    }

    #[inline]
    pub fn push(&mut self, w: Width) {
        self.width += u32::from(w.size());
        self.items.push(PatternItem::Width(w));
    }

    #[inline]
    pub fn extend(&mut self, ws: &[Width]) {
        for &w in ws {
            self.push(w);
        }
    }

    /// Обычные (не удлинённые) ширины из таблицы.
    #[inline]
    pub fn extend_normal(&mut self, ws: &[u8]) {
        for &w in ws {
            self.push(Width::normal(w));
        }
    }

    /// Маркер режима в паттерне; следующие подписи идут в этом режиме.
    pub fn mode(&mut self, placement: Placement) {
        self.placement = placement;
        self.items.push(PatternItem::Mode(placement));
    }

    #[inline]
    pub fn annotate(&mut self, x: f64, size: f64, ch: char) {
        self.text.push(TextAnnotation {
            x,
            size,
            ch,
            placement: self.placement,
        });
    }

    /// Подпись в текущей позиции паттерна.
    #[inline]
    pub fn annotate_here(&mut self, size: f64, ch: char) {
        self.annotate(f64::from(self.width), size, ch);
    }

    /// Текущая ширина, включая ведущий отступ.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn finish(self, symbology: Symbology, format: BarcodeFormat, geometry: Geometry) -> EncodedSymbol {
        tracing::trace!(format = format.name(), width = self.width, "encoded");
        EncodedSymbol {
            symbology,
            format,
            pattern: Pattern::from_parts(self.lead, self.items),
            text: self.text,
            geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_helpers() {
        assert_eq!(parse_digits::<3>(b"123"), Some([1, 2, 3]));
        assert_eq!(parse_digits::<3>(b"12a"), None);
        assert_eq!(parse_digits::<3>(b"1234"), None);
        assert_eq!(widths(b"3211"), [3, 2, 1, 1]);
        assert!(all_digits(b"0099"));
        assert!(!all_digits(b"00 9"));
        assert_eq!(digit_char(7), '7');
    }

    #[test]
    fn builder_tracks_width_and_mode() {
        let mut b = SymbolBuilder::with_capacity(9, 8, 2).unwrap();
        b.extend(&[Width::low(1), Width::normal(1), Width::low(1)]);
        b.annotate_here(12.0, '1');
        b.mode(Placement::Above);
        b.extend_normal(&[9, 1, 1, 2]);
        b.annotate_here(12.0, '2');
        let sym = b.finish(Symbology::Ean, BarcodeFormat::Ean13, Geometry::default());

        assert_eq!(sym.pattern_string(), "9a1a+9112");
        assert_eq!(sym.text_string(), "12:12:1 + 25:12:2");
    }
}
