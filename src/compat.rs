// src/compat.rs
//! Совместимость со старым целочисленным API: тип символики + флаги в одном слове.
//! Маппим старые коды на [`Symbology`] и гоняем через обычный [`Pipeline`].

use crate::api::Pipeline;
use crate::core::pattern::EncodedSymbol;
use crate::core::types::{BarcodeRequest, EncodeError, Symbology};

/// Младший байт флагов: код символики.
pub const ENCODING_MASK: u32 = 0x0000_00ff;
/// Не печатать текст (на кодирование не влияет).
pub const NO_ASCII: u32 = 0x0000_0100;
/// Не добавлять опциональный контрольный символ.
pub const NO_CHECKSUM: u32 = 0x0000_0200;

/// Исторические коды символик.
pub mod legacy {
    pub const ANY: u32 = 0;
    pub const EAN: u32 = 1;
    pub const UPC: u32 = 2;
    pub const ISBN: u32 = 3;
    pub const CODE39: u32 = 4;
    pub const CODE128: u32 = 5;
    pub const CODE128C: u32 = 6;
    pub const CODE128B: u32 = 7;
    pub const I25: u32 = 8;
    pub const CODE128RAW: u32 = 9;
    pub const CODABAR: u32 = 10;
    pub const MSI: u32 = 11;
    pub const PLESSEY: u32 = 12;
    pub const CODE93: u32 = 13;
    pub const CODE11: u32 = 14;
    pub const CODE39EXT: u32 = 15;
}

impl Symbology {
    /// Старый код -> символика. `Ok(None)`: автоопределение.
    ///
    /// # Errors
    /// [`EncodeError::UnsupportedSymbology`] для известных, но не реализованных
    /// кодов и для неизвестных.
    pub fn from_legacy_code(code: u32) -> Result<Option<Self>, EncodeError> {
        let sym = match code & ENCODING_MASK {
            legacy::ANY => return Ok(None),
            legacy::EAN => Symbology::Ean,
            legacy::UPC => Symbology::Upc,
            legacy::ISBN => Symbology::Isbn,
            legacy::CODE39 => Symbology::Code39,
            legacy::CODE128C => Symbology::Code128C,
            legacy::I25 => Symbology::Interleaved2of5,
            legacy::CODE39EXT => Symbology::Code39Extended,
            legacy::CODE128 => return Err(unsupported("code 128")),
            legacy::CODE128B => return Err(unsupported("code 128-B")),
            legacy::CODE128RAW => return Err(unsupported("128raw")),
            legacy::CODABAR => return Err(unsupported("codabar")),
            legacy::MSI => return Err(unsupported("msi")),
            legacy::PLESSEY => return Err(unsupported("plessey")),
            legacy::CODE93 => return Err(unsupported("code 93")),
            legacy::CODE11 => return Err(unsupported("code 11")),
            other => return Err(unsupported(&format!("#{other}"))),
        };
        Ok(Some(sym))
    }

    #[must_use]
    pub const fn legacy_code(self) -> u32 {
        match self {
            Symbology::Ean => legacy::EAN,
            Symbology::Upc => legacy::UPC,
            Symbology::Isbn => legacy::ISBN,
            Symbology::Code128C => legacy::CODE128C,
            Symbology::Code39 => legacy::CODE39,
            Symbology::Code39Extended => legacy::CODE39EXT,
            Symbology::Interleaved2of5 => legacy::I25,
        }
    }
}

fn unsupported(name: &str) -> EncodeError {
    EncodeError::UnsupportedSymbology(name.to_string())
}

/// Закодировать по старому слову флагов. Биты вне типа и [`NO_CHECKSUM`] игнорируются.
///
/// # Errors
/// Как у [`Pipeline::encode`], плюс [`EncodeError::UnsupportedSymbology`] для старых кодов.
pub fn encode_legacy(text: &str, flags: u32) -> Result<EncodedSymbol, EncodeError> {
    let mut req = BarcodeRequest::new(text);
    req.symbology = Symbology::from_legacy_code(flags)?;
    if flags & NO_CHECKSUM != 0 {
        req.options.checksum = false;
    }
    Pipeline::default().encode(&req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_codes_round_trip() {
        for sym in Symbology::ALL {
            assert_eq!(Symbology::from_legacy_code(sym.legacy_code()), Ok(Some(sym)));
        }
        assert_eq!(Symbology::from_legacy_code(legacy::ANY), Ok(None));
        // флаги выше младшего байта не мешают
        assert_eq!(
            Symbology::from_legacy_code(legacy::EAN | NO_CHECKSUM | NO_ASCII),
            Ok(Some(Symbology::Ean))
        );
    }

    #[test]
    fn unimplemented_codes_are_unsupported() {
        for code in [legacy::CODE128B, legacy::CODABAR, legacy::CODE93, 200] {
            assert!(matches!(
                Symbology::from_legacy_code(code),
                Err(EncodeError::UnsupportedSymbology(_))
            ));
        }
    }

    #[test]
    fn legacy_encode_honors_flags() {
        let with = encode_legacy("CODE 39", legacy::CODE39).unwrap();
        let without = encode_legacy("CODE 39", legacy::CODE39 | NO_CHECKSUM).unwrap();
        assert_eq!(with.pattern.element_count(), without.pattern.element_count() + 10);

        let auto = encode_legacy("400638133393", legacy::ANY).unwrap();
        assert_eq!(auto.name(), "EAN-13");
    }
}
