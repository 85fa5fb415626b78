//! Контрольные суммы всех поддерживаемых символик.
//!
//! Функции принимают уже разобранные значения (цифры 0..9, коды символов),
//! ничего не выделяют и не паникуют на пустом входе.

/// EAN/UPC: с конца, последняя цифра «чётная» (вес 3), дополнение до 10.
#[must_use]
pub fn ean(digits: &[u8]) -> u8 {
    let (even, odd) = split_sums(digits);
    let sum = 3 * even + odd;
    residue(10 - sum % 10, 10)
}

/// Add-on из 5 цифр: (3·чётные + 9·нечётные) mod 10, без дополнения.
#[must_use]
pub fn addon5(digits: &[u8]) -> u8 {
    let (even, odd) = split_sums(digits);
    residue(3 * even + 9 * odd, 10)
}

/// Add-on из 2 цифр: значение mod 4.
#[must_use]
pub fn addon2(digits: &[u8]) -> u8 {
    let value = digits.iter().fold(0u32, |acc, &d| acc * 10 + u32::from(d));
    residue(value, 4)
}

/// Остаток `sum mod m`; все модули здесь меньше 256.
#[inline]
fn residue(sum: u32, m: u32) -> u8 {
    u8::try_from(sum % m).unwrap_or(0)
}

/// Суммы цифр на «чётных» и «нечётных» позициях, считая с конца (последняя: чётная).
fn split_sums(digits: &[u8]) -> (u32, u32) {
    let mut even = 0u32;
    let mut odd = 0u32;
    for (i, &d) in digits.iter().rev().enumerate() {
        if i % 2 == 0 {
            even += u32::from(d);
        } else {
            odd += u32::from(d);
        }
    }
    (even, odd)
}

/// UPC-E (6 цифр, система 0) -> эквивалентные 11 цифр UPC-A.
/// Схема сжатия выбирается последней цифрой.
#[must_use]
pub fn upc_e_to_a(d: &[u8; 6]) -> [u8; 11] {
    let mut a = [0u8; 11];
    match d[5] {
        0..=2 => {
            // производитель d0 d1 d5 0 0, товар 0 0 d2 d3 d4
            a[1..3].copy_from_slice(&d[0..2]);
            a[3] = d[5];
            a[8..11].copy_from_slice(&d[2..5]);
        }
        3 => {
            a[1..4].copy_from_slice(&d[0..3]);
            a[9..11].copy_from_slice(&d[3..5]);
        }
        4 => {
            a[1..5].copy_from_slice(&d[0..4]);
            a[10] = d[4];
        }
        _ => {
            a[1..6].copy_from_slice(&d[0..5]);
            a[10] = d[5];
        }
    }
    a
}

/// Code 39: сумма индексов в контрольном алфавите mod 43.
#[must_use]
pub fn code39(indices: impl IntoIterator<Item = u8>) -> u8 {
    let sum: u32 = indices.into_iter().map(u32::from).sum();
    residue(sum, 43)
}

/// Code 128: старт + Σ значение·позиция (с 1), mod 103.
#[must_use]
pub fn code128(start: u8, values: &[u8]) -> u8 {
    let mut sum = u32::from(start);
    for (weight, &v) in (1u32..).zip(values) {
        sum += u32::from(v) * weight;
    }
    residue(sum, 103)
}

/// Interleaved 2 of 5: слева направо, позиции 1,3,5… (с единицы) с весом 3,
/// остальные с весом 1, дополнение до 10.
#[must_use]
pub fn i25(digits: &[u8]) -> u8 {
    let mut odd = 0u32;
    let mut even = 0u32;
    for (i, &d) in digits.iter().enumerate() {
        if i % 2 == 0 {
            odd += u32::from(d);
        } else {
            even += u32::from(d);
        }
    }
    let sum = odd * 3 + even;
    residue(10 - sum % 10, 10)
}
