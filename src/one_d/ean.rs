//! Кодировщик EAN-13/EAN-8, UPC-A/UPC-E и ISBN (+ add-on 2/5 цифр).
//!
//! Алгоритм:
//! 1) Считаем контрольную цифру (для UPC-E: по развёртке в UPC-A).
//! 2) Каждая цифра: 4 ширины из одной таблицы; «чётный» набор (G/B)
//!    получается зеркалированием ширин, отдельного алфавита нет.
//! 3) Левая половина EAN-13 зеркалится по маске первой цифры, правая: никогда.
//!    UPC-E и add-on зеркалятся по своим таблицам с ОБРАТНЫМ смыслом флага.
//! 4) Собираем: отступ, старт, левая половина, центр, правая, финал, add-on.

use crate::core::pattern::{EncodedSymbol, Placement, Width};
use crate::core::types::{EncodeError, Symbology};
use crate::one_d::{
    all_digits, checksum, digit, digit_char, parse_digits, widths, BarcodeFormat, EncodeOptions,
    SymbolBuilder,
};

/// Ширины цифр 0..9 (пробел, бар, пробел, бар). Набор A/L; B/G: реверс; C/R совпадает с A по ширинам.
const DIGIT_PATTERNS: [[u8; 4]; 10] = [
    widths(b"3211"),
    widths(b"2221"),
    widths(b"2122"),
    widths(b"1411"),
    widths(b"1132"),
    widths(b"1231"),
    widths(b"1114"),
    widths(b"1312"),
    widths(b"1213"),
    widths(b"3112"),
];

/// Маски первой цифры EAN-13 для шести левых цифр. true = зеркалить (B).
const FIRST_DIGIT_MASKS: [[bool; 6]; 10] = [
    [false, false, false, false, false, false], // 0
    [false, false, true, false, true, true],    // 1
    [false, false, true, true, false, true],    // 2
    [false, false, true, true, true, false],    // 3
    [false, true, false, false, true, true],    // 4
    [false, true, true, false, false, true],    // 5
    [false, true, true, true, false, false],    // 6
    [false, true, false, true, false, true],    // 7
    [false, true, false, true, true, false],    // 8
    [false, true, true, false, true, false],    // 9
];

/// UPC-E и add-5: true = НЕ зеркалить. Отличается от EAN строкой для 0.
static UPC_KEEP_MASKS: [[bool; 6]; 10] = [
    [false, false, false, true, true, true],
    [false, false, true, false, true, true],
    [false, false, true, true, false, true],
    [false, false, true, true, true, false],
    [false, true, false, false, true, true],
    [false, true, true, false, false, true],
    [false, true, true, true, false, false],
    [false, true, false, true, false, true],
    [false, true, false, true, true, false],
    [false, true, true, false, true, false],
];

/// Add-2: значение mod 4 -> маска двух цифр, смысл как у [`UPC_KEEP_MASKS`].
static ADDON2_KEEP_MASKS: [[bool; 2]; 4] = [[true, true], [true, false], [false, true], [false, false]];

const N1: Width = Width::normal(1);
const L1: Width = Width::low(1);

/// Охранные бары: старт (после отступа), центр, финал.
const GUARD_START: [Width; 3] = [L1, N1, L1];
const GUARD_MIDDLE: [Width; 5] = [N1, L1, N1, L1, N1];
const GUARD_END: [Width; 3] = [L1, N1, L1];
/// Финал UPC-E.
const GUARD_END_E: [Width; 6] = [N1, L1, N1, L1, N1, L1];
/// Add-on: отделяющий пробел + голова, разделитель между цифрами.
const ADDON_HEAD: [u8; 4] = widths(b"9112");
const ADDON_GAP: [u8; 2] = widths(b"11");

/// Отступ под вынесенную первую цифру EAN-13/UPC-A.
const LEAD_EXTRA_DIGIT: u8 = 9;

const SIZE_TEXT: f64 = 12.0;
const SIZE_SMALL: f64 = 10.0;

/// 12 цифр, или 7 (EAN-8), или 12 + пробел + add-on 2/5.
#[must_use]
pub fn validate_ean(text: &str) -> bool {
    validate_with_addon(text.as_bytes(), 12, 7)
}

/// 11 цифр (UPC-A), или 6 (UPC-E), или 11 + пробел + add-on 2/5.
#[must_use]
pub fn validate_upc(text: &str) -> bool {
    validate_with_addon(text.as_bytes(), 11, 6)
}

fn validate_with_addon(b: &[u8], long: usize, short: usize) -> bool {
    match b.len() {
        n if n == long || n == short => all_digits(b),
        n if n == long + 3 || n == long + 6 => {
            all_digits(&b[..long]) && b[long] == b' ' && all_digits(&b[long + 1..])
        }
        _ => false,
    }
}

/// 9 цифр (дефисы пропускаются), опционально контрольный символ (цифра или X),
/// опционально пробел + 5 цифр add-on.
#[must_use]
pub fn validate_isbn(text: &str) -> bool {
    let b = text.as_bytes();
    let mut i = 0usize;
    let mut ndigit = 0usize;

    while i < b.len() && ndigit < 9 {
        match b[i] {
            b'-' => {}
            c if c.is_ascii_digit() => ndigit += 1,
            _ => return false,
        }
        i += 1;
    }
    if ndigit != 9 {
        return false;
    }

    if b.get(i) == Some(&b'-') {
        i += 1;
    }
    if b.get(i).is_some_and(|&c| c.is_ascii_digit() || c.eq_ignore_ascii_case(&b'x')) {
        i += 1;
    }

    let rest = &b[i..];
    rest.is_empty() || (rest.len() == 6 && rest[0] == b' ' && all_digits(&rest[1..]))
}

/// EAN-13 или EAN-8 (по длине), с add-on.
///
/// # Errors
/// [`EncodeError::InternalInconsistency`], если текст не прошёл бы [`validate_ean`].
pub fn encode_ean(text: &str, opts: &EncodeOptions) -> Result<EncodedSymbol, EncodeError> {
    let bad = || inconsistency(Symbology::Ean, text);
    let (main, addon) = split_addon(text);
    match main.len() {
        12 => {
            let d: [u8; 12] = parse_digits(main.as_bytes()).ok_or_else(bad)?;
            encode_13(d, BarcodeFormat::Ean13, Symbology::Ean, addon, opts).ok_or_else(bad)?
        }
        7 if addon.is_none() => {
            let d: [u8; 7] = parse_digits(main.as_bytes()).ok_or_else(bad)?;
            encode_8(d, opts)
        }
        _ => Err(bad()),
    }
}

/// UPC-A (как EAN-13 с ведущим 0) или UPC-E (6 цифр), с add-on.
///
/// # Errors
/// [`EncodeError::InternalInconsistency`], если текст не прошёл бы [`validate_upc`].
pub fn encode_upc(text: &str, opts: &EncodeOptions) -> Result<EncodedSymbol, EncodeError> {
    let bad = || inconsistency(Symbology::Upc, text);
    let (main, addon) = split_addon(text);
    match main.len() {
        11 => {
            let d: [u8; 11] = parse_digits(main.as_bytes()).ok_or_else(bad)?;
            let mut padded = [0u8; 12];
            padded[1..].copy_from_slice(&d);
            encode_13(padded, BarcodeFormat::UpcA, Symbology::Upc, addon, opts).ok_or_else(bad)?
        }
        6 if addon.is_none() => {
            let d: [u8; 6] = parse_digits(main.as_bytes()).ok_or_else(bad)?;
            encode_upc_e(d, opts)
        }
        _ => Err(bad()),
    }
}

/// ISBN: берём первые 9 цифр, префикс 978, исходный контрольный символ
/// отбрасываем (пересчитывается как EAN-13).
///
/// # Errors
/// [`EncodeError::InternalInconsistency`], если цифр меньше девяти.
pub fn encode_isbn(text: &str, opts: &EncodeOptions) -> Result<EncodedSymbol, EncodeError> {
    let bad = || inconsistency(Symbology::Isbn, text);
    let (main, addon) = split_addon(text);

    let mut d = [9u8, 7, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    let mut n = 3usize;
    for v in main.bytes().filter_map(digit) {
        if n == d.len() {
            break;
        }
        d[n] = v;
        n += 1;
    }
    if n != d.len() {
        return Err(bad());
    }
    encode_13(d, BarcodeFormat::Isbn, Symbology::Isbn, addon, opts).ok_or_else(bad)?
}

/// Всё после первого пробела: add-on.
fn split_addon(text: &str) -> (&str, Option<&str>) {
    match text.split_once(' ') {
        Some((main, addon)) => (main, Some(addon)),
        None => (text, None),
    }
}

fn inconsistency(symbology: Symbology, text: &str) -> EncodeError {
    EncodeError::InternalInconsistency {
        symbology,
        text: text.to_string(),
    }
}

/// Ширины цифры, при необходимости зеркально.
#[inline]
fn digit_widths(d: u8, mirror: bool) -> [Width; 4] {
    let mut p = DIGIT_PATTERNS[usize::from(d)];
    if mirror {
        p.reverse();
    }
    p.map(Width::normal)
}

/// EAN-13 / UPC-A / ISBN. `None`: add-on некорректен.
fn encode_13(
    payload: [u8; 12],
    format: BarcodeFormat,
    symbology: Symbology,
    addon: Option<&str>,
    opts: &EncodeOptions,
) -> Option<Result<EncodedSymbol, EncodeError>> {
    let addon = match addon {
        Some(a) => Some(parse_addon(a)?),
        None => None,
    };
    Some(build_13(payload, format, symbology, addon.as_ref().map(Addon::digits), opts))
}

fn build_13(
    payload: [u8; 12],
    format: BarcodeFormat,
    symbology: Symbology,
    addon: Option<&[u8]>,
    opts: &EncodeOptions,
) -> Result<EncodedSymbol, EncodeError> {
    let mut d = [0u8; 13];
    d[..12].copy_from_slice(&payload);
    d[12] = checksum::ean(&payload);

    let upca = format == BarcodeFormat::UpcA;
    let addon_len = addon.map_or(0, <[u8]>::len);
    let mut b = SymbolBuilder::with_capacity(LEAD_EXTRA_DIGIT, 59 + 1 + addon_len * 6, 13 + addon_len)?;

    b.extend(&GUARD_START);
    // первая цифра EAN-13 печатается левее баров; у UPC-A она: ведущий 0, не печатается
    if !upca {
        b.annotate(0.0, SIZE_TEXT, digit_char(d[0]));
    }

    let mirror = FIRST_DIGIT_MASKS[usize::from(d[0])];
    for i in 1..7 {
        let mut w = digit_widths(d[i], mirror[i - 1]);
        if upca && i == 1 {
            // цифра системы UPC-A вынесена влево, её бары длинные
            b.annotate(0.0, SIZE_SMALL, digit_char(d[i]));
            w[1] = w[1].lowered();
            w[3] = w[3].lowered();
        } else {
            b.annotate_here(SIZE_TEXT, digit_char(d[i]));
        }
        b.extend(&w);
    }

    b.extend(&GUARD_MIDDLE);

    for i in 7..13 {
        let mut w = digit_widths(d[i], false);
        if upca && i == 12 {
            // контрольная цифра UPC-A вынесена вправо за финальный guard
            b.annotate(f64::from(b.width() + 13), SIZE_SMALL, digit_char(d[i]));
            w[0] = w[0].lowered();
            w[2] = w[2].lowered();
        } else {
            b.annotate_here(SIZE_TEXT, digit_char(d[i]));
        }
        b.extend(&w);
    }

    b.extend(&GUARD_END);

    if let Some(addon) = addon {
        push_addon(&mut b, addon);
    }

    Ok(finish(b, symbology, format, opts))
}

/// EAN-8: как EAN-13, но 4+4 цифры и без зеркалирования.
fn encode_8(payload: [u8; 7], opts: &EncodeOptions) -> Result<EncodedSymbol, EncodeError> {
    let mut d = [0u8; 8];
    d[..7].copy_from_slice(&payload);
    d[7] = checksum::ean(&payload);

    let mut b = SymbolBuilder::with_capacity(0, 43, 8)?;
    b.extend(&GUARD_START);
    for &v in &d[..4] {
        b.annotate_here(SIZE_TEXT, digit_char(v));
        b.extend(&digit_widths(v, false));
    }
    b.extend(&GUARD_MIDDLE);
    for &v in &d[4..] {
        b.annotate_here(SIZE_TEXT, digit_char(v));
        b.extend(&digit_widths(v, false));
    }
    b.extend(&GUARD_END);

    Ok(finish(b, Symbology::Ean, BarcodeFormat::Ean8, opts))
}

/// UPC-E: контрольная цифра не печатается, а кодируется зеркалированием всех шести.
fn encode_upc_e(d: [u8; 6], opts: &EncodeOptions) -> Result<EncodedSymbol, EncodeError> {
    let check = checksum::ean(&checksum::upc_e_to_a(&d));
    let keep = UPC_KEEP_MASKS[usize::from(check)];

    let mut b = SymbolBuilder::with_capacity(0, 33, 6)?;
    b.extend(&GUARD_START);
    for (&v, &keep) in d.iter().zip(&keep) {
        b.annotate_here(SIZE_TEXT, digit_char(v));
        b.extend(&digit_widths(v, !keep));
    }
    b.extend(&GUARD_END_E);

    Ok(finish(b, Symbology::Upc, BarcodeFormat::UpcE, opts))
}

/// Разобранный add-on: 2 или 5 цифр.
enum Addon {
    Two([u8; 2]),
    Five([u8; 5]),
}

impl Addon {
    fn digits(&self) -> &[u8] {
        match self {
            Addon::Two(d) => d,
            Addon::Five(d) => d,
        }
    }
}

fn parse_addon(s: &str) -> Option<Addon> {
    match s.len() {
        2 => parse_digits(s.as_bytes()).map(Addon::Two),
        5 => parse_digits(s.as_bytes()).map(Addon::Five),
        _ => None,
    }
}

/// Add-on печатается справа, подписи: над барами.
fn push_addon(b: &mut SymbolBuilder, addon: &[u8]) {
    let keep: &[bool] = if addon.len() == 5 {
        // из строки маски берутся только последние 5 флагов
        &UPC_KEEP_MASKS[usize::from(checksum::addon5(addon))][1..]
    } else {
        &ADDON2_KEEP_MASKS[usize::from(checksum::addon2(addon))]
    };

    b.mode(Placement::Above);
    for (i, (&v, &keep)) in addon.iter().zip(keep).enumerate() {
        b.extend_normal(if i == 0 { &ADDON_HEAD } else { &ADDON_GAP });
        b.annotate_here(SIZE_TEXT, digit_char(v));
        b.extend(&digit_widths(v, !keep));
    }
}

fn finish(b: SymbolBuilder, symbology: Symbology, format: BarcodeFormat, opts: &EncodeOptions) -> EncodedSymbol {
    let mut geometry = opts.geometry;
    if geometry.width == 0 {
        geometry.width = i32::try_from(b.width()).unwrap_or(i32::MAX);
    }
    b.finish(symbology, format, geometry)
}
