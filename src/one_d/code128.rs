//! Code 128, только набор C: две цифры на символ.
//!
//! Сборка: отступ 0, START C, пары, checksum (mod 103, всегда), STOP.
//! Бары START/STOP печатаются низкими. Наборы A/B и FNC не поддерживаются.

use crate::core::pattern::{EncodedSymbol, Width};
use crate::core::types::{EncodeError, Symbology};
use crate::one_d::{all_digits, checksum, digit, BarcodeFormat, EncodeOptions, SymbolBuilder};

/// Паттерны 0..=105: по 6 чисел (bar, space, ...), сумма 11.
const CODE128_PATTERNS_STR: [&str; 106] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214",
    "211232", // 103..105 = Start A/B/C
];

/// STOP-паттерн (7 чисел, сумма 13).
const CODE128_STOP: [u8; 7] = [2, 3, 3, 1, 1, 1, 2];

const START_C: u8 = 105;

const SYMBOL_WID: u32 = 11;
const TEXT_SIZE: f64 = 9.0;

/// Непустая строка цифр чётной длины.
#[must_use]
pub fn validate_code128c(text: &str) -> bool {
    let b = text.as_bytes();
    !b.is_empty() && b.len() % 2 == 0 && all_digits(b)
}

/// # Errors
/// [`EncodeError::InternalInconsistency`]: нечётная длина или не цифра,
/// [`EncodeError::ResourceExhausted`] при нехватке памяти.
pub fn encode_code128c(text: &str, opts: &EncodeOptions) -> Result<EncodedSymbol, EncodeError> {
    let bad = || EncodeError::InternalInconsistency {
        symbology: Symbology::Code128C,
        text: text.to_string(),
    };

    let bytes = text.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(bad());
    }

    let npairs = bytes.len() / 2;
    let mut b = SymbolBuilder::with_capacity(0, (npairs + 2) * 6 + CODE128_STOP.len(), bytes.len())?;
    let mut values = Vec::new();
    values.try_reserve(npairs)?;

    push_code(&mut b, START_C, true);

    let mut textpos = f64::from(SYMBOL_WID);
    for pair in bytes.chunks_exact(2) {
        let (hi, lo) = (digit(pair[0]).ok_or_else(bad)?, digit(pair[1]).ok_or_else(bad)?);
        let value = hi * 10 + lo;
        push_code(&mut b, value, false);
        values.push(value);

        b.annotate(textpos, TEXT_SIZE, char::from(pair[0]));
        b.annotate(textpos + f64::from(SYMBOL_WID) / 2.0, TEXT_SIZE, char::from(pair[1]));
        textpos += f64::from(SYMBOL_WID);
    }

    // флаг отключения checksum здесь не действует
    push_code(&mut b, checksum::code128(START_C, &values), false);
    for (i, &w) in CODE128_STOP.iter().enumerate() {
        b.push(if i % 2 == 0 { Width::low(w) } else { Width::normal(w) });
    }

    Ok(b.finish(Symbology::Code128C, BarcodeFormat::Code128C, opts.geometry))
}

/// Ширины символа со значением `value`.
#[inline]
fn get_pattern(value: u8) -> [u8; 6] {
    let s = CODE128_PATTERNS_STR[usize::from(value)].as_bytes();
    let mut out = [0u8; 6];
    for (o, &c) in out.iter_mut().zip(s) {
        *o = c - b'0';
    }
    out
}

/// Символ: бары на чётных позициях; `low`: для служебных символов.
fn push_code(b: &mut SymbolBuilder, value: u8, low: bool) {
    for (i, w) in get_pattern(value).into_iter().enumerate() {
        b.push(if low && i % 2 == 0 { Width::low(w) } else { Width::normal(w) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Обратное сопоставление 6-ширинных блоков со значениями (без STOP).
    fn values_of(sym: &EncodedSymbol) -> Vec<u8> {
        let sizes: Vec<u8> = sym.pattern.widths().map(|w| w.size()).collect();
        let body = &sizes[..sizes.len() - CODE128_STOP.len()];
        body.chunks_exact(6)
            .map(|chunk| {
                (0u8..=105)
                    .find(|&v| get_pattern(v) == chunk)
                    .expect("unknown code")
            })
            .collect()
    }

    #[test]
    fn table_is_consistent() {
        for v in 0u8..=105 {
            let p = get_pattern(v);
            assert_eq!(p.iter().map(|&x| u32::from(x)).sum::<u32>(), 11, "value {v}");
        }
        assert_eq!(CODE128_STOP.iter().map(|&x| u32::from(x)).sum::<u32>(), 13);
    }

    #[test]
    fn validator() {
        assert!(validate_code128c("00"));
        assert!(validate_code128c("0123456789"));
        assert!(!validate_code128c(""));
        assert!(!validate_code128c("123"));
        assert!(!validate_code128c("12a4"));
    }

    #[test]
    fn c_digits_with_checksum() {
        let sym = encode_code128c("123456", &EncodeOptions::default()).unwrap();
        assert_eq!(sym.name(), "code 128-C");
        // START C + 12·1 + 34·2 + 56·3 = 353 -> 44
        assert_eq!(values_of(&sym), vec![105, 12, 34, 56, 44]);
        assert_eq!(sym.pattern.lead(), 0);
        assert_eq!(sym.pattern.element_count(), 5 * 6 + 7);
        assert_eq!(sym.pattern.total_width(), 5 * 11 + 13);

        let p = sym.pattern_string();
        assert!(p.starts_with("0b1a2c2"), "{p}");
        assert!(p.ends_with("b3c1a1b"), "{p}");
    }

    #[test]
    fn checksum_flag_is_ignored() {
        let with = encode_code128c("1234", &EncodeOptions::default()).unwrap();
        let without = encode_code128c(
            "1234",
            &EncodeOptions {
                checksum: false,
                ..EncodeOptions::default()
            },
        )
        .unwrap();
        assert_eq!(with.pattern, without.pattern);
    }

    #[test]
    fn two_annotations_per_pair() {
        let sym = encode_code128c("0123", &EncodeOptions::default()).unwrap();
        assert_eq!(sym.text_string(), "11:9:0 16.5:9:1 22:9:2 27.5:9:3");
    }

    #[test]
    fn rejects_odd_length() {
        assert!(matches!(
            encode_code128c("123", &EncodeOptions::default()),
            Err(EncodeError::InternalInconsistency {
                symbology: Symbology::Code128C,
                ..
            })
        ));
    }
}
