//! Code 39 и Code 39 extended.
//!
//! Символ = узкий разделитель + 5 баров вперемешку с 4 пробелами.
//! Первые 40 символов алфавита берут бары по `index % 10`, пробелы по десятку;
//! последние четыре (`$ / + %`): особые. Старт/стоп: `*`, печатается как
//! низкий «наполнитель» и в тексте запрещён.

use crate::core::pattern::{EncodedSymbol, Width};
use crate::core::types::{EncodeError, Symbology};
use crate::one_d::{checksum, widths, BarcodeFormat, EncodeOptions, SymbolBuilder};

/// Алфавит, упорядоченный по десяткам.
const ALPHABET: &[u8; 44] = b"1234567890ABCDEFGHIJKLMNOPQRSTUVWXYZ-. *$/+%";
/// Порядок для контрольной суммы: без `*`, цифры с нуля.
const CHECKSUM_ALPHABET: &[u8; 43] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

const START_STOP: u8 = b'*';
const SPECIAL_BASE: usize = 40;

const BARS: [[u8; 5]; 10] = [
    widths(b"31113"),
    widths(b"13113"),
    widths(b"33111"),
    widths(b"11313"),
    widths(b"31311"),
    widths(b"13311"),
    widths(b"11133"),
    widths(b"31131"),
    widths(b"13131"),
    widths(b"11331"),
];
const SPACES: [[u8; 4]; 4] = [widths(b"1311"), widths(b"1131"), widths(b"1113"), widths(b"3111")];

const SPECIAL_BARS: [u8; 5] = widths(b"11111");
const SPECIAL_SPACES: [[u8; 4]; 4] = [widths(b"3331"), widths(b"3313"), widths(b"3133"), widths(b"1333")];

const N1: Width = Width::normal(1);
const N3: Width = Width::normal(3);
const L1: Width = Width::low(1);
const L3: Width = Width::low(3);

/// `*` без разделителя (после нулевого отступа) и с разделителем.
const HEAD: [Width; 9] = [L1, N3, L1, N1, L3, N1, L3, N1, L1];
const TAIL: [Width; 10] = [N1, L1, N3, L1, N1, L3, N1, L3, N1, L1];

const SYMBOL_WIDTHS: usize = 10;
const TEXT_X0: f64 = 22.0;
const TEXT_STEP: f64 = 16.0;
const TEXT_SIZE: f64 = 12.0;

/// ASCII 0..=127 -> одна или две буквы Code 39.
const EXTENDED: [&str; 128] = [
    "%U", "$A", "$B", "$C", "$D", "$E", "$F", "$G", "$H", "$I", "$J", "$K", "$L", "$M", "$N", "$O",
    "$P", "$Q", "$R", "$S", "$T", "$U", "$V", "$W", "$X", "$Y", "$Z", "%A", "%B", "%C", "%D", "%E",
    " ", "/A", "/B", "/C", "/D", "/E", "/F", "/G", "/H", "/I", "/J", "/K", "/L", "-", ".", "/O",
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "/Z", "%F", "%G", "%H", "%I", "%J",
    "%V", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
    "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "%K", "%L", "%M", "%N", "%O",
    "%W", "+A", "+B", "+C", "+D", "+E", "+F", "+G", "+H", "+I", "+J", "+K", "+L", "+M", "+N", "+O",
    "+P", "+Q", "+R", "+S", "+T", "+U", "+V", "+W", "+X", "+Y", "+Z", "%P", "%Q", "%R", "%S", "%T",
];

/// Индекс в [`ALPHABET`] после приведения к верхнему регистру; `*` не символ данных.
fn symbol_index(c: u8) -> Option<usize> {
    let c = c.to_ascii_uppercase();
    if c == START_STOP {
        return None;
    }
    ALPHABET.iter().position(|&a| a == c)
}

fn checksum_index(c: u8) -> Option<u8> {
    let c = c.to_ascii_uppercase();
    CHECKSUM_ALPHABET
        .iter()
        .position(|&a| a == c)
        .and_then(|i| u8::try_from(i).ok())
}

/// Непусто, все символы из алфавита; целиком строчные допускаются, смешанный регистр: нет.
#[must_use]
pub fn validate_code39(text: &str) -> bool {
    let b = text.as_bytes();
    if b.is_empty() || !b.iter().all(|&c| symbol_index(c).is_some()) {
        return false;
    }
    let lower = b.iter().any(u8::is_ascii_lowercase);
    let upper = b.iter().any(u8::is_ascii_uppercase);
    !(lower && upper)
}

/// Непусто, только ASCII 1..=127 (NUL не печатается).
#[must_use]
pub fn validate_code39_extended(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|c| (1..=127).contains(&c))
}

/// # Errors
/// [`EncodeError::InternalInconsistency`] для символа вне алфавита,
/// [`EncodeError::ResourceExhausted`] при нехватке памяти.
pub fn encode_code39(text: &str, opts: &EncodeOptions) -> Result<EncodedSymbol, EncodeError> {
    encode_symbols(text, Symbology::Code39, BarcodeFormat::Code39, opts)
}

/// Подстановка по таблице, затем обычный Code 39. Подписи показывают
/// подставленные символы, позиции считаются по подставленной длине.
///
/// # Errors
/// Как у [`encode_code39`]; байт вне 1..=127: [`EncodeError::InternalInconsistency`].
pub fn encode_code39_extended(text: &str, opts: &EncodeOptions) -> Result<EncodedSymbol, EncodeError> {
    let mut expanded = String::new();
    expanded.try_reserve(text.len() * 2)?;
    for c in text.bytes() {
        match EXTENDED.get(usize::from(c)) {
            Some(sub) if c != 0 => expanded.push_str(sub),
            _ => {
                return Err(EncodeError::InternalInconsistency {
                    symbology: Symbology::Code39Extended,
                    text: text.to_string(),
                })
            }
        }
    }
    tracing::trace!(from = text, to = %expanded, "code 39 extended substitution");
    encode_symbols(&expanded, Symbology::Code39Extended, BarcodeFormat::Code39Extended, opts)
}

fn encode_symbols(
    text: &str,
    symbology: Symbology,
    format: BarcodeFormat,
    opts: &EncodeOptions,
) -> Result<EncodedSymbol, EncodeError> {
    let bad = || EncodeError::InternalInconsistency {
        symbology,
        text: text.to_string(),
    };

    let n = text.len();
    let mut b = SymbolBuilder::with_capacity(0, (n + 1) * SYMBOL_WIDTHS + HEAD.len() + TAIL.len(), n)?;
    b.extend(&HEAD);

    let mut indices = Vec::new();
    indices.try_reserve(n)?;

    let mut x = TEXT_X0;
    for c in text.bytes() {
        let code = symbol_index(c).ok_or_else(bad)?;
        push_symbol(&mut b, code);
        indices.push(checksum_index(c).ok_or_else(bad)?);
        b.annotate(x, TEXT_SIZE, char::from(c.to_ascii_uppercase()));
        x += TEXT_STEP;
    }

    if opts.checksum {
        let check = CHECKSUM_ALPHABET[usize::from(checksum::code39(indices))];
        let code = symbol_index(check).ok_or_else(bad)?;
        push_symbol(&mut b, code);
    }

    b.extend(&TAIL);
    Ok(b.finish(symbology, format, opts.geometry))
}

/// Разделитель + b0 s0 b1 s1 b2 s2 b3 s3 b4.
fn push_symbol(b: &mut SymbolBuilder, code: usize) {
    let (bars, spaces) = if code < SPECIAL_BASE {
        (BARS[code % 10], SPACES[code / 10])
    } else {
        (SPECIAL_BARS, SPECIAL_SPACES[code - SPECIAL_BASE])
    };
    b.push(N1);
    for (bar, space) in bars.iter().zip(&spaces) {
        b.extend_normal(&[*bar, *space]);
    }
    b.push(Width::normal(bars[4]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn opts() -> EncodeOptions {
        EncodeOptions::default()
    }

    #[test]
    fn validator_case_rules() {
        assert!(validate_code39("CODE 39"));
        assert!(validate_code39("code 39"));
        assert!(validate_code39("12-.$/+%"));
        assert!(!validate_code39("Code 39"));
        assert!(!validate_code39(""));
        assert!(!validate_code39("A*B"));
        assert!(!validate_code39("ABC!"));
        assert!(!validate_code39("ÄBC"));
    }

    #[test]
    fn extended_validator() {
        assert!(validate_code39_extended("Hello, world!"));
        assert!(validate_code39_extended("\u{7f}"));
        assert!(!validate_code39_extended(""));
        assert!(!validate_code39_extended("a\0b"));
        assert!(!validate_code39_extended("é"));
    }

    #[test]
    fn code_39_with_checksum() {
        let sym = encode_code39("CODE 39", &opts()).unwrap();
        assert_eq!(sym.name(), "code 39");

        let p = sym.pattern_string();
        // C: бары 33111, пробелы 1131
        assert!(p.starts_with("0a3a1c1c1a1313113111"), "{p}");
        // сумма 27 -> 'R': бары 31131, пробелы 1113
        assert!(p.ends_with("13111113311a3a1c1c1a"), "{p}");

        assert_eq!(sym.pattern.element_count(), 9 + 8 * 10 + 10);
        assert_eq!(sym.pattern.element_count() % 2, 1);

        let chars: String = sym.text.iter().map(|t| t.ch).collect();
        assert_eq!(chars, "CODE 39");
        let xs: Vec<f64> = sym.text.iter().map(|t| t.x).collect();
        assert_eq!(xs, vec![22.0, 38.0, 54.0, 70.0, 86.0, 102.0, 118.0]);
        assert!(sym.text.iter().all(|t| t.size == 12.0));
    }

    #[test]
    fn checksum_can_be_suppressed() {
        let opts = EncodeOptions {
            checksum: false,
            ..EncodeOptions::default()
        };
        let sym = encode_code39("CODE 39", &opts).unwrap();
        assert_eq!(sym.pattern.element_count(), 9 + 7 * 10 + 10);
    }

    #[test]
    fn lower_case_folds_to_upper() {
        let lower = encode_code39("code 39", &opts()).unwrap();
        let upper = encode_code39("CODE 39", &opts()).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn special_symbols() {
        let sym = encode_code39("$", &opts()).unwrap();
        assert!(sym.pattern_string().starts_with("0a3a1c1c1a1131313111"));
        // каждый символ 16 модулей, '*' без разделителя: 15
        assert_eq!(sym.pattern.total_width(), 15 + 16 * 2 + 16);
    }

    #[test]
    fn extended_substitutes_before_layout() {
        let ext = encode_code39_extended("a", &opts()).unwrap();
        let plain = encode_code39("+A", &opts()).unwrap();
        assert_eq!(ext.name(), "code 39 extended");
        assert_eq!(ext.pattern, plain.pattern);
        assert_eq!(ext.text, plain.text);

        let sym = encode_code39_extended("Hi!", &opts()).unwrap();
        let chars: String = sym.text.iter().map(|t| t.ch).collect();
        assert_eq!(chars, "H+I/A");
        assert_eq!(sym.text.len(), 5);
        assert_eq!(sym.text[4].x, 22.0 + 4.0 * 16.0);
    }

    #[test]
    fn extended_rejects_nul() {
        assert!(matches!(
            encode_code39_extended("\0", &opts()),
            Err(EncodeError::InternalInconsistency {
                symbology: Symbology::Code39Extended,
                ..
            })
        ));
    }

    #[test]
    fn start_stop_is_not_data() {
        assert!(matches!(
            encode_code39("A*", &opts()),
            Err(EncodeError::InternalInconsistency { .. })
        ));
    }
}
