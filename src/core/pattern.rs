// src/core/pattern.rs
//
// Промежуточное представление (IR), которое движок отдаёт рендерерам:
// последовательность ширин «пробел, бар, пробел, …» и позиции подписей.
//
// Строковая форма (wire):
//   паттерн : первая цифра 0..9 = отступ слева под вынесенную цифру,
//              дальше ширины 1..9 (обычные) или a..i (удлинённые вниз бары);
//              '+' / '-': маркер режима «подписи над/под барами», слота не занимает;
//   подписи : токены `x:size:c` через пробел, отдельный `+`/`-` переключает режим.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use thiserror::Error;

use super::types::{BarcodeFormat, Geometry, Layout, Symbology};

/// Где печатать подписи: под барами (по умолчанию) или над ними.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    #[default]
    Below,
    Above,
}

impl Placement {
    #[inline]
    const fn marker(self) -> char {
        match self {
            Placement::Below => '-',
            Placement::Above => '+',
        }
    }

    #[inline]
    const fn from_marker(c: char) -> Option<Self> {
        match c {
            '-' => Some(Placement::Below),
            '+' => Some(Placement::Above),
            _ => None,
        }
    }
}

/// Ширина одного элемента в модулях (1..=9). `low`: бар тянется ниже базовой линии
/// (охранные бары EAN/UPC, старт/стоп).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "char", into = "char")
)]
pub struct Width {
    size: u8,
    low: bool,
}

impl Width {
    pub const MAX: u8 = 9;

    /// `None`, если `size` вне 1..=9.
    #[inline]
    #[must_use]
    pub const fn new(size: u8, low: bool) -> Option<Self> {
        if matches!(size, 1..=Self::MAX) {
            Some(Self { size, low })
        } else {
            None
        }
    }

    /// # Panics
    /// Если `size` вне 1..=9 (в константах таблиц это ошибка компиляции).
    #[inline]
    #[must_use]
    pub const fn normal(size: u8) -> Self {
        assert!(matches!(size, 1..=Self::MAX), "width out of range 1..=9");
        Self { size, low: false }
    }

    /// # Panics
    /// Если `size` вне 1..=9.
    #[inline]
    #[must_use]
    pub const fn low(size: u8) -> Self {
        assert!(matches!(size, 1..=Self::MAX), "width out of range 1..=9");
        Self { size, low: true }
    }

    #[inline]
    #[must_use]
    pub const fn lowered(self) -> Self {
        Self { size: self.size, low: true }
    }

    #[inline]
    #[must_use]
    pub const fn size(self) -> u8 {
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_low(self) -> bool {
        self.low
    }

    /// Символ wire-формы: '1'..'9' или 'a'..'i'.
    #[inline]
    #[must_use]
    pub fn to_char(self) -> char {
        let base = if self.low { b'a' - 1 } else { b'0' };
        char::from(base + self.size)
    }

    /// Обратное к [`Width::to_char`]. Заглавные буквы: исторический синоним строчных.
    #[inline]
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        let b = u8::try_from(c).ok()?;
        match b {
            b'1'..=b'9' => Self::new(b - b'0', false),
            b'a'..=b'i' => Self::new(b - b'a' + 1, true),
            b'A'..=b'I' => Self::new(b - b'A' + 1, true),
            _ => None,
        }
    }
}

impl From<Width> for char {
    fn from(w: Width) -> Self {
        w.to_char()
    }
}

impl TryFrom<char> for Width {
    type Error = PatternError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Width::from_char(c).ok_or(PatternError::BadWidth { pos: 0, ch: c })
    }
}

/// Элемент паттерна после ведущего отступа.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatternItem {
    Width(Width),
    /// Переключение режима подписей; чётность бар/пробел не сдвигает.
    Mode(Placement),
}

/// Один бар или пробел с учётом текущего режима подписей.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Element {
    pub is_bar: bool,
    pub width: Width,
    pub placement: Placement,
}

/// Паттерн: ведущий отступ (это всегда первый пробел) и чередование бар/пробел.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Pattern {
    lead: u8,
    items: Vec<PatternItem>,
}

impl Pattern {
    #[inline]
    pub(crate) fn from_parts(lead: u8, items: Vec<PatternItem>) -> Self {
        Self { lead, items }
    }

    /// Ведущий отступ под цифру, вынесенную левее баров (EAN-13: 9, прочие: 0).
    #[inline]
    #[must_use]
    pub fn lead(&self) -> u8 {
        self.lead
    }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[PatternItem] {
        &self.items
    }

    /// Только ширины, без маркеров режима.
    pub fn widths(&self) -> impl Iterator<Item = Width> + '_ {
        self.items.iter().filter_map(|it| match it {
            PatternItem::Width(w) => Some(*w),
            PatternItem::Mode(_) => None,
        })
    }

    /// Бары и пробелы по порядку. Первый элемент после отступа: бар.
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        let mut placement = Placement::Below;
        let mut is_bar = false;
        self.items.iter().filter_map(move |it| match *it {
            PatternItem::Mode(p) => {
                placement = p;
                None
            }
            PatternItem::Width(width) => {
                is_bar = !is_bar;
                Some(Element {
                    is_bar,
                    width,
                    placement,
                })
            }
        })
    }

    /// Число элементов ширины (без отступа и маркеров).
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.widths().count()
    }

    /// Полная ширина в модулях, включая ведущий отступ.
    #[must_use]
    pub fn total_width(&self) -> u32 {
        u32::from(self.lead) + self.widths().map(|w| u32::from(w.size())).sum::<u32>()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(char::from(b'0' + self.lead))?;
        for it in &self.items {
            match *it {
                PatternItem::Width(w) => f.write_char(w.to_char())?,
                PatternItem::Mode(p) => f.write_char(p.marker())?,
            }
        }
        Ok(())
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let lead = match chars.next() {
            None => return Err(PatternError::Empty),
            Some(c) => match c.to_digit(10).and_then(|d| u8::try_from(d).ok()) {
                Some(d) => d,
                None => return Err(PatternError::BadLead(c)),
            },
        };
        let mut items = Vec::with_capacity(s.len().saturating_sub(1));
        for (pos, c) in chars.enumerate() {
            let item = if let Some(w) = Width::from_char(c) {
                PatternItem::Width(w)
            } else if let Some(p) = Placement::from_marker(c) {
                PatternItem::Mode(p)
            } else {
                return Err(PatternError::BadWidth { pos: pos + 1, ch: c });
            };
            items.push(item);
        }
        Ok(Self { lead, items })
    }
}

impl From<Pattern> for String {
    fn from(p: Pattern) -> Self {
        p.to_string()
    }
}

impl TryFrom<String> for Pattern {
    type Error = PatternError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Одна подпись: символ `ch` кеглем `size` (в пунктах до масштабирования) на позиции `x`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextAnnotation {
    pub x: f64,
    pub size: f64,
    pub ch: char,
    pub placement: Placement,
}

/// Сериализовать подписи в wire-строку `x:size:c x:size:c + x:size:c`.
#[must_use]
pub fn annotations_to_string(text: &[TextAnnotation]) -> String {
    let mut out = String::with_capacity(text.len() * 8);
    let mut mode = Placement::Below;
    for t in text {
        if t.placement != mode {
            mode = t.placement;
            if !out.is_empty() {
                out.push(' ');
            }
            out.push(mode.marker());
        }
        if !out.is_empty() {
            out.push(' ');
        }
        // f64 Display печатает кратчайшую форму: 12, 16.5
        out.push_str(&format!("{}:{}:{}", t.x, t.size, t.ch));
    }
    out
}

/// Разобрать wire-строку подписей. Символ подписи может быть и пробелом (Code 39).
///
/// # Errors
/// [`PatternError::BadAnnotation`] на первом нераспознанном токене.
pub fn parse_annotations(s: &str) -> Result<Vec<TextAnnotation>, PatternError> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut mode = Placement::Below;
    let mut i = 0usize;

    let bad = |at: usize| PatternError::BadAnnotation { pos: at };

    while i < chars.len() {
        if chars[i] == ' ' {
            i += 1;
            continue;
        }
        let start = i;

        // одиночный '+' / '-': переключатель режима
        if let Some(p) = Placement::from_marker(chars[i]) {
            if chars.get(i + 1).map_or(true, |&c| c == ' ') {
                mode = p;
                i += 1;
                continue;
            }
        }

        let x = read_number(&chars, &mut i).ok_or_else(|| bad(start))?;
        let size = read_number(&chars, &mut i).ok_or_else(|| bad(start))?;
        let ch = *chars.get(i).ok_or_else(|| bad(start))?;
        i += 1;
        if chars.get(i).is_some_and(|&c| c != ' ') {
            return Err(bad(start));
        }
        out.push(TextAnnotation {
            x,
            size,
            ch,
            placement: mode,
        });
    }
    Ok(out)
}

/// Прочитать число до ':' включительно.
fn read_number(chars: &[char], i: &mut usize) -> Option<f64> {
    let start = *i;
    while *i < chars.len() && chars[*i] != ':' && chars[*i] != ' ' {
        *i += 1;
    }
    if chars.get(*i) != Some(&':') {
        return None;
    }
    let num: String = chars[start..*i].iter().collect();
    *i += 1;
    num.parse().ok()
}

/// Ошибки разбора wire-формы IR.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,
    #[error("pattern must start with a lead digit, got {0:?}")]
    BadLead(char),
    #[error("bad width {ch:?} at position {pos}")]
    BadWidth { pos: usize, ch: char },
    #[error("bad text annotation at position {pos}")]
    BadAnnotation { pos: usize },
}

/// Результат кодирования: то, что получает внешний рендерер.
///
/// Создаётся заново на каждый вызов и после создания не меняется.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodedSymbol {
    pub symbology: Symbology,
    pub format: BarcodeFormat,
    pub pattern: Pattern,
    pub text: Vec<TextAnnotation>,
    pub geometry: Geometry,
}

impl EncodedSymbol {
    /// Имя варианта: "EAN-13", "interleaved 2 of 5" и т.п.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.format.name()
    }

    #[inline]
    #[must_use]
    pub fn pattern_string(&self) -> String {
        self.pattern.to_string()
    }

    #[inline]
    #[must_use]
    pub fn text_string(&self) -> String {
        annotations_to_string(&self.text)
    }

    /// Развернуть паттерн в ряд модулей (true = бар), без ведущего отступа.
    #[must_use]
    pub fn modules(&self) -> Vec<bool> {
        let mut out = Vec::with_capacity(usize::try_from(self.pattern.total_width()).unwrap_or(0));
        for e in self.pattern.elements() {
            out.extend(std::iter::repeat(e.is_bar).take(usize::from(e.width.size())));
        }
        out
    }

    /// Геометрия по умолчанию с учётом подсказок вызывающего.
    #[inline]
    #[must_use]
    pub fn layout(&self, with_text: bool) -> Layout {
        self.geometry.resolve(self.pattern.total_width(), with_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn width_chars() {
        assert_eq!(Width::normal(3).to_char(), '3');
        assert_eq!(Width::low(1).to_char(), 'a');
        assert_eq!(Width::low(9).to_char(), 'i');
        assert_eq!(Width::from_char('C'), Some(Width::low(3)));
        assert_eq!(Width::from_char('c'), Some(Width::low(3)));
        assert_eq!(Width::from_char('0'), None);
        assert_eq!(Width::from_char('j'), None);
    }

    #[test]
    fn width_range_is_checked() {
        assert_eq!(Width::new(0, false), None);
        assert_eq!(Width::new(10, true), None);
        assert_eq!(Width::new(3, true), Some(Width::low(3)));
        for size in 1..=Width::MAX {
            for low in [false, true] {
                let w = Width::new(size, low).unwrap();
                assert_eq!((w.size(), w.is_low()), (size, low));
                assert_eq!(Width::from_char(w.to_char()), Some(w));
            }
        }
        assert_eq!(Width::try_from('j'), Err(PatternError::BadWidth { pos: 0, ch: 'j' }));
    }

    #[test]
    #[should_panic(expected = "width out of range")]
    fn width_zero_panics() {
        let size = u8::from(false);
        let _ = Width::normal(size);
    }

    #[test]
    fn pattern_parse_and_print() {
        let p: Pattern = "9a1a3211+9112".parse().unwrap();
        assert_eq!(p.lead(), 9);
        assert_eq!(p.element_count(), 11);
        assert_eq!(p.total_width(), 9 + 3 + 7 + 13);
        assert_eq!(p.to_string(), "9a1a3211+9112");

        // заглавные читаются как строчные, печатаются строчными
        let p: Pattern = "0A1A".parse().unwrap();
        assert_eq!(p.to_string(), "0a1a");
    }

    #[test]
    fn pattern_parse_errors() {
        assert_eq!("".parse::<Pattern>(), Err(PatternError::Empty));
        assert_eq!("x11".parse::<Pattern>(), Err(PatternError::BadLead('x')));
        assert_eq!(
            "0a0".parse::<Pattern>(),
            Err(PatternError::BadWidth { pos: 2, ch: '0' })
        );
    }

    #[test]
    fn pattern_from_string_validates() {
        let p = Pattern::try_from(String::from("0a1a+11")).unwrap();
        assert_eq!(String::from(p), "0a1a+11");
        assert_eq!(
            Pattern::try_from(String::from("0a1:")),
            Err(PatternError::BadWidth { pos: 3, ch: ':' })
        );
        assert_eq!(Pattern::try_from(String::from("²1")), Err(PatternError::BadLead('²')));
    }

    #[test]
    fn mode_marker_keeps_parity() {
        let p: Pattern = "0a1+11".parse().unwrap();
        let kinds: Vec<(bool, Placement)> = p.elements().map(|e| (e.is_bar, e.placement)).collect();
        assert_eq!(
            kinds,
            vec![
                (true, Placement::Below),
                (false, Placement::Below),
                (true, Placement::Above),
                (false, Placement::Above),
            ]
        );
    }

    #[test]
    fn annotations_print_and_parse() {
        let text = vec![
            TextAnnotation { x: 0.0, size: 12.0, ch: '9', placement: Placement::Below },
            TextAnnotation { x: 16.5, size: 9.0, ch: ' ', placement: Placement::Below },
            TextAnnotation { x: 101.0, size: 12.0, ch: '+', placement: Placement::Above },
        ];
        let s = annotations_to_string(&text);
        assert_eq!(s, "0:12:9 16.5:9:  + 101:12:+");
        assert_eq!(parse_annotations(&s).unwrap(), text);
    }

    #[test]
    fn annotations_reject_garbage() {
        assert_eq!(
            parse_annotations("12:12:ab"),
            Err(PatternError::BadAnnotation { pos: 0 })
        );
        assert_eq!(
            parse_annotations("0:12:1 oops"),
            Err(PatternError::BadAnnotation { pos: 7 })
        );
    }
}
