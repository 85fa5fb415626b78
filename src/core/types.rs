// src/core/types.rs
//
// Общие типы, независимые от конкретных кодировщиков: селектор символики,
// запрос, подсказки геометрии и ошибки верхнего уровня.

use std::collections::TryReserveError;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::one_d::EncodeOptions;

/// Семейство символик, которое умеет кодировать движок.
///
/// Порядок вариантов совпадает с порядком автоопределения в [`crate::api::REGISTRY`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbology {
    /// EAN-13 / EAN-8 (+ add-on 2/5).
    Ean,
    /// UPC-A / UPC-E (+ add-on 2/5).
    Upc,
    /// ISBN, печатается как EAN-13 с префиксом 978.
    Isbn,
    /// Code 128, только набор C (пары цифр).
    Code128C,
    /// Code 39, 43 символа.
    Code39,
    /// Code 39 extended: весь ASCII через пары символов Code 39.
    Code39Extended,
    /// Interleaved 2 of 5.
    Interleaved2of5,
}

impl Symbology {
    /// Все символики в порядке приоритета автоопределения.
    pub const ALL: [Symbology; 7] = [
        Symbology::Ean,
        Symbology::Upc,
        Symbology::Isbn,
        Symbology::Code128C,
        Symbology::Code39,
        Symbology::Code39Extended,
        Symbology::Interleaved2of5,
    ];

    /// Человекочитаемое имя семейства.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Symbology::Ean => "EAN",
            Symbology::Upc => "UPC",
            Symbology::Isbn => "ISBN",
            Symbology::Code128C => "code 128-C",
            Symbology::Code39 => "code 39",
            Symbology::Code39Extended => "code 39 extended",
            Symbology::Interleaved2of5 => "interleaved 2 of 5",
        }
    }

    /// Разобрать селектор из командной строки/конфига.
    /// `any`/`auto`/пустая строка означают автоопределение (`Ok(None)`).
    ///
    /// # Errors
    /// [`EncodeError::UnsupportedSymbology`], если имя не известно.
    pub fn parse_selector(s: &str) -> Result<Option<Self>, EncodeError> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("any") || s.eq_ignore_ascii_case("auto") {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Symbology {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let sym = match lower.as_str() {
            "ean" | "ean13" | "ean-13" | "ean8" | "ean-8" => Symbology::Ean,
            "upc" | "upc-a" | "upca" | "upc-e" | "upce" => Symbology::Upc,
            "isbn" => Symbology::Isbn,
            "128c" | "code128c" | "code128-c" => Symbology::Code128C,
            "39" | "code39" => Symbology::Code39,
            "39ext" | "code39ext" | "code39-extended" => Symbology::Code39Extended,
            "i25" | "interleaved2of5" | "itf" => Symbology::Interleaved2of5,
            _ => return Err(EncodeError::UnsupportedSymbology(s.to_string())),
        };
        Ok(sym)
    }
}

/// Конкретный вариант, в который в итоге закодирован текст
/// (внутри семейства EAN/UPC выбор зависит от длины).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BarcodeFormat {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Isbn,
    Code39,
    Code39Extended,
    Code128C,
    Interleaved2of5,
}

impl BarcodeFormat {
    /// Имя, которое рендереры печатают в комментариях/метаданных.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BarcodeFormat::Ean13 => "EAN-13",
            BarcodeFormat::Ean8 => "EAN-8",
            BarcodeFormat::UpcA => "UPC-A",
            BarcodeFormat::UpcE => "UPC-E",
            BarcodeFormat::Isbn => "ISBN",
            BarcodeFormat::Code39 => "code 39",
            BarcodeFormat::Code39Extended => "code 39 extended",
            BarcodeFormat::Code128C => "code 128-C",
            BarcodeFormat::Interleaved2of5 => "interleaved 2 of 5",
        }
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Поле отступа по умолчанию (в единицах вывода).
pub const DEFAULT_MARGIN: i32 = 10;

/// Подсказки геометрии от вызывающего. Ноль означает «посчитай сам».
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub width: i32,
    pub height: i32,
    pub xoff: i32,
    pub yoff: i32,
    pub margin: i32,
    pub scale: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            xoff: 0,
            yoff: 0,
            margin: DEFAULT_MARGIN,
            scale: 0.0,
        }
    }
}

/// Итоговая геометрия, общая для всех бэкендов вывода.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    pub xoff: i32,
    pub yoff: i32,
    pub margin: i32,
    pub scale: f64,
}

impl Geometry {
    #[inline]
    #[must_use]
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_offset(mut self, xoff: i32, yoff: i32) -> Self {
        self.xoff = xoff;
        self.yoff = yoff;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Досчитать геометрию по полной ширине паттерна `barlen` (в модулях).
    ///
    /// 1) масштаб = ширина / barlen, если не задан явно;
    /// 2) ширина по умолчанию «впритык», слишком узкая: расширяем и центрируем;
    /// 3) высота по умолчанию 80 (с масштабом), минимум 20 (+20 под текст).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn resolve(&self, barlen: u32, with_text: bool) -> Layout {
        let bars = f64::from(barlen.max(1));
        let (mut width, mut height) = (self.width, self.height);
        let (mut xoff, mut yoff) = (self.xoff, self.yoff);

        let scale = if self.scale > 0.0 {
            self.scale
        } else {
            if width == 0 {
                width = barlen.max(1) as i32;
            }
            f64::from(width) / bars
        };

        let needed = bars * scale;
        if width == 0 {
            width = (needed + 1.0) as i32;
        }
        if f64::from(width) < needed {
            let wid = (needed + 1.0) as i32;
            xoff -= (wid - width) / 2;
            width = wid;
            // левее нуля уезжать нельзя
            if xoff < 0 {
                width += -xoff;
                xoff = 0;
            }
        }

        if height == 0 {
            height = (80.0 * scale) as i32;
        }
        let min_height = if with_text { 40.0 } else { 20.0 } * scale;
        if f64::from(height) < min_height {
            let hei = min_height as i32;
            yoff -= hei / 2;
            height = hei;
            if yoff < 0 {
                height += -yoff;
                yoff = 0;
            }
        }

        Layout {
            width,
            height,
            xoff,
            yoff,
            margin: self.margin,
            scale,
        }
    }
}

/// Неизменяемый запрос на одно кодирование.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BarcodeRequest {
    /// Исходный текст; `None`: текста нет вовсе.
    pub text: Option<String>,
    /// Явно выбранная символика; `None`: автоопределение.
    pub symbology: Option<Symbology>,
    pub options: EncodeOptions,
}

impl BarcodeRequest {
    #[inline]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_symbology(mut self, symbology: Symbology) -> Self {
        self.symbology = Some(symbology);
        self
    }

    /// Не добавлять контрольный символ там, где он опционален (Code 39, I2of5).
    #[inline]
    #[must_use]
    pub fn without_checksum(mut self) -> Self {
        self.options.checksum = false;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.options.geometry = geometry;
        self
    }
}

/// Ошибки кодирования верхнего уровня.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EncodeError {
    /// Текст не проходит проверку выбранной символики.
    #[error("{symbology} cannot encode {text:?}")]
    InvalidInput { symbology: Symbology, text: String },

    /// Текста нет вовсе.
    #[error("no text to encode")]
    MissingInput,

    /// Автоопределение не нашло ни одной подходящей символики.
    #[error("no symbology can encode {text:?}")]
    NoSuitableSymbology { text: String },

    /// Символика не зарегистрирована (или отключена в пайплайне).
    #[error("unsupported symbology: {0}")]
    UnsupportedSymbology(String),

    /// Не удалось выделить память под результат.
    #[error("out of memory while encoding")]
    ResourceExhausted,

    /// Валидатор пропустил текст, который кодировщик отверг. Это баг.
    #[error("{symbology} encoder rejected validated text {text:?}")]
    InternalInconsistency { symbology: Symbology, text: String },
}

impl From<TryReserveError> for EncodeError {
    #[inline]
    fn from(_: TryReserveError) -> Self {
        EncodeError::ResourceExhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_names_are_case_insensitive() {
        assert_eq!("EAN13".parse::<Symbology>(), Ok(Symbology::Ean));
        assert_eq!("Code39Ext".parse::<Symbology>(), Ok(Symbology::Code39Extended));
        assert_eq!("i25".parse::<Symbology>(), Ok(Symbology::Interleaved2of5));
        assert_eq!(Symbology::parse_selector("auto"), Ok(None));
        assert_eq!(Symbology::parse_selector(" any "), Ok(None));
        assert_eq!(
            "codabar".parse::<Symbology>(),
            Err(EncodeError::UnsupportedSymbology("codabar".into()))
        );
    }

    #[test]
    fn geometry_defaults_to_natural_size() {
        let layout = Geometry::default().resolve(95, true);
        assert_eq!(layout.width, 95);
        assert_eq!(layout.height, 80);
        assert_eq!(layout.margin, DEFAULT_MARGIN);
        assert!((layout.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn geometry_requested_width_sets_scale() {
        let layout = Geometry::default().with_size(190, 0).resolve(95, true);
        assert!((layout.scale - 2.0).abs() < f64::EPSILON);
        assert_eq!(layout.height, 160);
    }

    #[test]
    fn geometry_too_narrow_is_enlarged_and_centered() {
        // масштаб 2 => нужно 200, дали 100: расширяем и сдвигаем влево на 50
        let layout = Geometry::default()
            .with_size(100, 0)
            .with_offset(80, 0)
            .with_scale(2.0)
            .resolve(100, false);
        assert_eq!(layout.width, 201);
        assert_eq!(layout.xoff, 80 - 50);

        // сдвиг ушёл бы в минус: прижимаем к нулю и добираем ширину
        let layout = Geometry::default()
            .with_size(100, 0)
            .with_offset(10, 0)
            .with_scale(2.0)
            .resolve(100, false);
        assert_eq!(layout.xoff, 0);
        assert_eq!(layout.width, 201 + 40);
    }

    #[test]
    fn geometry_too_short_is_enlarged() {
        let layout = Geometry::default().with_size(0, 10).resolve(50, true);
        assert_eq!(layout.height, 40 + 20);
        assert_eq!(layout.yoff, 0);
    }

    #[test]
    fn request_builder() {
        let req = BarcodeRequest::new("CODE 39")
            .with_symbology(Symbology::Code39)
            .without_checksum();
        assert_eq!(req.text.as_deref(), Some("CODE 39"));
        assert_eq!(req.symbology, Some(Symbology::Code39));
        assert!(!req.options.checksum);
        assert!(BarcodeRequest::default().text.is_none());
    }
}
