// src/api.rs
//
// Верхнеуровневый API: статический реестр символик и пайплайн,
// который выбирает кодировщик (явно или по первому подходящему валидатору).

use std::fmt;

use crate::core::pattern::EncodedSymbol;
use crate::core::types::{BarcodeRequest, EncodeError, Symbology};
use crate::one_d::{code128, code39, ean, i25, EncodeOptions};

pub type ValidateFn = fn(&str) -> bool;
pub type EncodeFn = fn(&str, &EncodeOptions) -> Result<EncodedSymbol, EncodeError>;

/// Пара «валидатор + кодировщик» одной символики. Все экземпляры живут в [`REGISTRY`].
#[derive(Copy, Clone)]
pub struct SymbologyDescriptor {
    pub symbology: Symbology,
    pub name: &'static str,
    pub validate: ValidateFn,
    pub encode: EncodeFn,
}

impl fmt::Debug for SymbologyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbologyDescriptor")
            .field("symbology", &self.symbology)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Все символики в порядке автоопределения. Выигрывает первая, чей валидатор
/// принял текст; порядок: часть контракта.
pub static REGISTRY: [SymbologyDescriptor; 7] = [
    SymbologyDescriptor {
        symbology: Symbology::Ean,
        name: "EAN",
        validate: ean::validate_ean,
        encode: ean::encode_ean,
    },
    SymbologyDescriptor {
        symbology: Symbology::Upc,
        name: "UPC",
        validate: ean::validate_upc,
        encode: ean::encode_upc,
    },
    SymbologyDescriptor {
        symbology: Symbology::Isbn,
        name: "ISBN",
        validate: ean::validate_isbn,
        encode: ean::encode_isbn,
    },
    SymbologyDescriptor {
        symbology: Symbology::Code128C,
        name: "code 128-C",
        validate: code128::validate_code128c,
        encode: code128::encode_code128c,
    },
    SymbologyDescriptor {
        symbology: Symbology::Code39,
        name: "code 39",
        validate: code39::validate_code39,
        encode: code39::encode_code39,
    },
    SymbologyDescriptor {
        symbology: Symbology::Code39Extended,
        name: "code 39 extended",
        validate: code39::validate_code39_extended,
        encode: code39::encode_code39_extended,
    },
    SymbologyDescriptor {
        symbology: Symbology::Interleaved2of5,
        name: "interleaved 2 of 5",
        validate: i25::validate_i25,
        encode: i25::encode_i25,
    },
];

impl Symbology {
    #[must_use]
    pub fn descriptor(self) -> &'static SymbologyDescriptor {
        let i = match self {
            Symbology::Ean => 0,
            Symbology::Upc => 1,
            Symbology::Isbn => 2,
            Symbology::Code128C => 3,
            Symbology::Code39 => 4,
            Symbology::Code39Extended => 5,
            Symbology::Interleaved2of5 => 6,
        };
        &REGISTRY[i]
    }

    #[inline]
    #[must_use]
    pub fn validate(self, text: &str) -> bool {
        (self.descriptor().validate)(text)
    }

    /// Проверить и закодировать именно этой символикой.
    ///
    /// # Errors
    /// [`EncodeError::InvalidInput`], если валидатор отверг текст; ошибки кодировщика.
    pub fn encode(self, text: &str, opts: &EncodeOptions) -> Result<EncodedSymbol, EncodeError> {
        self.descriptor().run(text, opts)
    }
}

impl SymbologyDescriptor {
    fn run(&self, text: &str, opts: &EncodeOptions) -> Result<EncodedSymbol, EncodeError> {
        if !(self.validate)(text) {
            tracing::debug!(symbology = self.name, text, "rejected by validator");
            return Err(EncodeError::InvalidInput {
                symbology: self.symbology,
                text: text.to_string(),
            });
        }
        (self.encode)(text, opts)
    }
}

/// Набор включённых символик. По умолчанию включены все, в порядке [`REGISTRY`].
#[derive(Clone, Debug)]
pub struct Pipeline {
    enabled: Vec<&'static SymbologyDescriptor>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            enabled: REGISTRY.iter().collect(),
        }
    }
}

impl Pipeline {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Включена ли символика.
    #[must_use]
    pub fn supports(&self, symbology: Symbology) -> bool {
        self.find(symbology).is_some()
    }

    /// Включённые символики в порядке приоритета.
    pub fn symbologies(&self) -> impl Iterator<Item = Symbology> + '_ {
        self.enabled.iter().map(|d| d.symbology)
    }

    /// Первая символика, чей валидатор принимает текст. Ничего не кодирует.
    #[must_use]
    pub fn detect(&self, text: &str) -> Option<&'static SymbologyDescriptor> {
        self.enabled.iter().copied().find(|d| {
            let ok = (d.validate)(text);
            if !ok {
                tracing::trace!(symbology = d.name, "validator rejected");
            }
            ok
        })
    }

    /// Закодировать запрос.
    ///
    /// # Errors
    /// - [`EncodeError::MissingInput`]: нет текста;
    /// - [`EncodeError::UnsupportedSymbology`]: явно выбрана отключённая символика;
    /// - [`EncodeError::InvalidInput`]: выбранная символика отвергла текст;
    /// - [`EncodeError::NoSuitableSymbology`]: автоопределение ничего не нашло;
    /// - ошибки самих кодировщиков.
    pub fn encode(&self, req: &BarcodeRequest) -> Result<EncodedSymbol, EncodeError> {
        let text = req.text.as_deref().ok_or(EncodeError::MissingInput)?;

        let desc = match req.symbology {
            Some(sym) => self
                .find(sym)
                .ok_or_else(|| EncodeError::UnsupportedSymbology(sym.name().to_string()))?,
            None => self.detect(text).ok_or_else(|| {
                tracing::debug!(text, "no symbology accepted text");
                EncodeError::NoSuitableSymbology {
                    text: text.to_string(),
                }
            })?,
        };

        tracing::debug!(
            symbology = desc.name,
            explicit = req.symbology.is_some(),
            checksum = req.options.checksum,
            "encoding"
        );
        desc.run(text, &req.options)
    }

    fn find(&self, symbology: Symbology) -> Option<&'static SymbologyDescriptor> {
        self.enabled.iter().copied().find(|d| d.symbology == symbology)
    }
}

/// Сборка пайплайна с подмножеством символик. Порядок всегда берётся из [`REGISTRY`].
#[derive(Clone, Debug)]
pub struct PipelineBuilder {
    enabled: [bool; Symbology::ALL.len()],
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            enabled: [true; Symbology::ALL.len()],
        }
    }
}

impl PipelineBuilder {
    /// Все символики включены.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Начать с пустого набора.
    #[must_use]
    pub fn none() -> Self {
        Self {
            enabled: [false; Symbology::ALL.len()],
        }
    }

    #[must_use]
    pub fn enable(mut self, symbology: Symbology, on: bool) -> Self {
        if let Some(i) = REGISTRY.iter().position(|d| d.symbology == symbology) {
            self.enabled[i] = on;
        }
        self
    }

    #[must_use]
    pub fn enable_ean(self, on: bool) -> Self {
        self.enable(Symbology::Ean, on).enable(Symbology::Upc, on).enable(Symbology::Isbn, on)
    }

    #[must_use]
    pub fn enable_code39(self, on: bool) -> Self {
        self.enable(Symbology::Code39, on).enable(Symbology::Code39Extended, on)
    }

    #[must_use]
    pub fn enable_code128(self, on: bool) -> Self {
        self.enable(Symbology::Code128C, on)
    }

    #[must_use]
    pub fn enable_i25(self, on: bool) -> Self {
        self.enable(Symbology::Interleaved2of5, on)
    }

    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            enabled: REGISTRY
                .iter()
                .zip(self.enabled)
                .filter_map(|(d, on)| on.then_some(d))
                .collect(),
        }
    }
}
