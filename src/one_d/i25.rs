//! Interleaved 2 of 5: цифры кодируются парами, бары первой цифры
//! чередуются с пробелами второй.

use crate::core::pattern::{EncodedSymbol, Width};
use crate::core::types::{EncodeError, Symbology};
use crate::one_d::{all_digits, checksum, digit, digit_char, widths, BarcodeFormat, EncodeOptions, SymbolBuilder};

/// 5 ширин на цифру: две широкие из пяти.
const CODES: [[u8; 5]; 10] = [
    widths(b"11331"),
    widths(b"31113"),
    widths(b"13113"),
    widths(b"33111"),
    widths(b"11313"),
    widths(b"31311"),
    widths(b"13311"),
    widths(b"11133"),
    widths(b"31131"),
    widths(b"13131"),
];

const GUARD_START: [Width; 4] = [Width::low(1), Width::normal(1), Width::low(1), Width::normal(1)];
const GUARD_STOP: [Width; 3] = [Width::low(3), Width::normal(1), Width::low(1)];

const TEXT_X0: f64 = 4.0;
const PAIR_WID: f64 = 18.0;
const TEXT_SIZE: f64 = 12.0;

#[must_use]
pub fn validate_i25(text: &str) -> bool {
    !text.is_empty() && all_digits(text.as_bytes())
}

/// # Errors
/// [`EncodeError::InternalInconsistency`] на нецифровом символе,
/// [`EncodeError::ResourceExhausted`] при нехватке памяти.
pub fn encode_i25(text: &str, opts: &EncodeOptions) -> Result<EncodedSymbol, EncodeError> {
    let bad = || EncodeError::InternalInconsistency {
        symbology: Symbology::Interleaved2of5,
        text: text.to_string(),
    };

    // (цифра, печатать ли подпись)
    let mut digits: Vec<(u8, bool)> = Vec::new();
    digits.try_reserve(text.len() + 2)?;

    // ведущий 0, чтобы вместе с чеком получилось чётное число цифр
    if (text.len() + usize::from(opts.checksum)) % 2 == 1 {
        digits.push((0, false));
    }
    for c in text.bytes() {
        digits.push((digit(c).ok_or_else(bad)?, true));
    }
    if opts.checksum {
        let values: Vec<u8> = digits.iter().map(|&(d, _)| d).collect();
        digits.push((checksum::i25(&values), false));
    }

    let mut b = SymbolBuilder::with_capacity(0, digits.len() * 5 + 7, text.len())?;
    b.extend(&GUARD_START);

    let mut textpos = TEXT_X0;
    for pair in digits.chunks_exact(2) {
        let (d1, show1) = pair[0];
        let (d2, show2) = pair[1];
        for (&bar, &space) in CODES[usize::from(d1)].iter().zip(&CODES[usize::from(d2)]) {
            b.extend_normal(&[bar, space]);
        }
        if show1 {
            b.annotate(textpos, TEXT_SIZE, digit_char(d1));
        }
        if show2 {
            b.annotate(textpos + PAIR_WID / 2.0, TEXT_SIZE, digit_char(d2));
        }
        textpos += PAIR_WID;
    }

    b.extend(&GUARD_STOP);
    Ok(b.finish(Symbology::Interleaved2of5, BarcodeFormat::Interleaved2of5, opts.geometry))
}
