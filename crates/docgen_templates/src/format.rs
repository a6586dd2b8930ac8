//! Per-placeholder format specifiers.
//!
//! The grammar follows the common format-spec mini-language:
//!
//! ```text
//! [[fill]align][sign][#][0][width][grouping][.precision][type]
//! ```
//!
//! Parsing and application both fail with [`FormatSpecError`]; the renderer
//! treats any failure as "use the default rendering" and never propagates it.

use docgen_data::{float_repr, Value};
use thiserror::Error;

/// Largest width or precision accepted; the std formatter panics on
/// precisions above `u16::MAX`.
const MAX_FIELD: usize = u16::MAX as usize;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatSpecError {
    #[error("invalid format specifier '{0}'")]
    Malformed(String),

    #[error("format code '{code}' not supported for {kind} values")]
    UnsupportedType { code: char, kind: &'static str },

    #[error("{0}")]
    Incompatible(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Self::Left),
            '>' => Some(Self::Right),
            '^' => Some(Self::Center),
            '=' => Some(Self::AfterSign),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Minus,
    Plus,
    Space,
}

/// A parsed format specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    fill: Option<char>,
    align: Option<Align>,
    sign: Option<Sign>,
    alternate: bool,
    zero: bool,
    width: usize,
    grouping: Option<char>,
    precision: Option<usize>,
    kind: Option<char>,
}

impl FormatSpec {
    pub fn parse(spec: &str) -> Result<Self, FormatSpecError> {
        let malformed = || FormatSpecError::Malformed(spec.to_string());
        let chars: Vec<char> = spec.chars().collect();
        let mut i = 0;

        let mut fill = None;
        let mut align = None;
        if chars.len() >= 2 {
            if let Some(a) = Align::from_char(chars[1]) {
                fill = Some(chars[0]);
                align = Some(a);
                i = 2;
            }
        }
        if align.is_none() {
            if let Some(a) = chars.first().and_then(|c| Align::from_char(*c)) {
                align = Some(a);
                i = 1;
            }
        }

        let sign = match chars.get(i) {
            Some('+') => Some(Sign::Plus),
            Some('-') => Some(Sign::Minus),
            Some(' ') => Some(Sign::Space),
            _ => None,
        };
        if sign.is_some() {
            i += 1;
        }

        let alternate = chars.get(i) == Some(&'#');
        if alternate {
            i += 1;
        }

        let zero = chars.get(i) == Some(&'0');
        if zero {
            i += 1;
        }

        let width = take_digits(&chars, &mut i).unwrap_or(0);

        let grouping = match chars.get(i) {
            Some(c @ (',' | '_')) => {
                i += 1;
                Some(*c)
            }
            _ => None,
        };

        let precision = if chars.get(i) == Some(&'.') {
            i += 1;
            Some(take_digits(&chars, &mut i).ok_or_else(malformed)?)
        } else {
            None
        };

        if width > MAX_FIELD || precision.is_some_and(|p| p > MAX_FIELD) {
            return Err(malformed());
        }

        let kind = match &chars[i..] {
            [] => None,
            [c] if "bcdoxXneEfFgGs%".contains(*c) => Some(*c),
            _ => return Err(malformed()),
        };

        Ok(Self {
            fill,
            align,
            sign,
            alternate,
            zero,
            width,
            grouping,
            precision,
            kind,
        })
    }

    /// Format `value` according to this specifier.
    pub fn apply(&self, value: &Value) -> Result<String, FormatSpecError> {
        match value {
            Value::Integer(i) => self.format_integer(*i),
            Value::Float(x) => self.format_float(*x),
            other => self.format_text(&other.to_string()),
        }
    }

    fn format_integer(&self, i: i64) -> Result<String, FormatSpecError> {
        let kind = self.kind.unwrap_or('d');
        if "eEfFgG%".contains(kind) {
            return self.format_float(i as f64);
        }
        if kind == 's' {
            return Err(FormatSpecError::UnsupportedType {
                code: kind,
                kind: "integer",
            });
        }
        if self.precision.is_some() {
            return Err(FormatSpecError::Incompatible(
                "precision not allowed in integer format specifier",
            ));
        }

        let abs = i.unsigned_abs();
        let (prefix, body) = match kind {
            'd' | 'n' => ("", group(&abs.to_string(), self.grouping, 3)),
            'b' | 'o' | 'x' | 'X' => {
                if self.grouping == Some(',') {
                    return Err(FormatSpecError::Incompatible(
                        "cannot use ',' grouping with a radix format",
                    ));
                }
                let (prefix, digits) = match kind {
                    'b' => ("0b", format!("{abs:b}")),
                    'o' => ("0o", format!("{abs:o}")),
                    'x' => ("0x", format!("{abs:x}")),
                    _ => ("0X", format!("{abs:X}")),
                };
                let prefix = if self.alternate { prefix } else { "" };
                (prefix, group(&digits, self.grouping, 4))
            }
            'c' => {
                if self.sign.is_some() || self.grouping.is_some() || self.alternate {
                    return Err(FormatSpecError::Incompatible(
                        "sign, '#' and grouping not allowed with 'c'",
                    ));
                }
                let c = u32::try_from(i)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(FormatSpecError::Incompatible("'c' argument out of range"))?;
                ("", c.to_string())
            }
            code => {
                return Err(FormatSpecError::UnsupportedType {
                    code,
                    kind: "integer",
                })
            }
        };

        Ok(self.pad_number(i < 0, prefix, &body))
    }

    fn format_float(&self, x: f64) -> Result<String, FormatSpecError> {
        let negative = x.is_sign_negative() && !x.is_nan();
        let abs = x.abs();
        let upper = matches!(self.kind, Some('E' | 'F' | 'G'));

        let body = if !abs.is_finite() {
            let text = if abs.is_nan() { "nan" } else { "inf" };
            let text = if upper { text.to_uppercase() } else { text.to_string() };
            if self.kind == Some('%') {
                format!("{text}%")
            } else {
                text
            }
        } else {
            match self.kind {
                Some('f' | 'F') => fixed_alt(abs, self.precision.unwrap_or(6), self.alternate),
                Some('e' | 'E') => {
                    scientific(abs, self.precision.unwrap_or(6), self.alternate, upper)
                }
                Some('g' | 'G' | 'n') => {
                    general(abs, self.precision.unwrap_or(6), self.alternate, upper)
                }
                Some('%') => format!(
                    "{}%",
                    fixed_alt(abs * 100.0, self.precision.unwrap_or(6), self.alternate)
                ),
                None => match self.precision {
                    Some(p) => {
                        let text = general(abs, p, self.alternate, false);
                        if text.contains(['.', 'e']) {
                            text
                        } else {
                            format!("{text}.0")
                        }
                    }
                    None => float_repr(abs),
                },
                Some(code) => {
                    return Err(FormatSpecError::UnsupportedType {
                        code,
                        kind: "float",
                    })
                }
            }
        };

        let body = if abs.is_finite() {
            group_leading_digits(&body, self.grouping)
        } else {
            body
        };
        Ok(self.pad_number(negative, "", &body))
    }

    fn format_text(&self, text: &str) -> Result<String, FormatSpecError> {
        if let Some(code) = self.kind.filter(|k| *k != 's') {
            return Err(FormatSpecError::UnsupportedType { code, kind: "text" });
        }
        if self.sign.is_some() {
            return Err(FormatSpecError::Incompatible(
                "sign not allowed in string format specifier",
            ));
        }
        if self.alternate {
            return Err(FormatSpecError::Incompatible(
                "alternate form not allowed in string format specifier",
            ));
        }
        if self.grouping.is_some() {
            return Err(FormatSpecError::Incompatible(
                "grouping not allowed in string format specifier",
            ));
        }
        if self.align == Some(Align::AfterSign) {
            return Err(FormatSpecError::Incompatible(
                "'=' alignment not allowed in string format specifier",
            ));
        }

        let truncated: String = match self.precision {
            Some(p) => text.chars().take(p).collect(),
            None => text.to_string(),
        };
        let fill = self.fill.unwrap_or(if self.zero { '0' } else { ' ' });
        Ok(pad(
            "",
            &truncated,
            self.width,
            fill,
            self.align.unwrap_or(Align::Left),
        ))
    }

    fn pad_number(&self, negative: bool, prefix: &str, body: &str) -> String {
        let sign = match (negative, self.sign) {
            (true, _) => "-",
            (false, Some(Sign::Plus)) => "+",
            (false, Some(Sign::Space)) => " ",
            _ => "",
        };
        let fill = self.fill.unwrap_or(if self.zero { '0' } else { ' ' });
        let align = self.align.unwrap_or(if self.zero {
            Align::AfterSign
        } else {
            Align::Right
        });
        pad(&format!("{sign}{prefix}"), body, self.width, fill, align)
    }
}

/// Fixed-point rendering with `precision` fraction digits; `nan`/`inf` for
/// non-finite values.
pub fn fixed(x: f64, precision: usize) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else {
        format!("{x:.precision$}")
    }
}

fn fixed_alt(x: f64, precision: usize, alternate: bool) -> String {
    let text = fixed(x, precision);
    if alternate && precision == 0 {
        format!("{text}.")
    } else {
        text
    }
}

fn scientific(x: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let raw = format!("{x:.precision$e}");
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let dot = if alternate && precision == 0 { "." } else { "" };
    let e = if upper { 'E' } else { 'e' };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}{dot}{e}{sign}{:02}", exponent.unsigned_abs())
}

fn general(x: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let p = precision.max(1);
    let exponent = if x == 0.0 {
        0
    } else {
        let raw = format!("{:.*e}", p - 1, x);
        raw.split_once('e')
            .and_then(|(_, exp)| exp.parse::<i32>().ok())
            .unwrap_or(0)
    };

    if (-4..p as i32).contains(&exponent) {
        let decimals = (p as i32 - 1 - exponent) as usize;
        let text = fixed(x, decimals);
        if alternate {
            if text.contains('.') {
                text
            } else {
                format!("{text}.")
            }
        } else {
            strip_fraction_zeros(&text)
        }
    } else {
        let text = scientific(x, p - 1, alternate, upper);
        if alternate {
            return text;
        }
        match text.split_once(['e', 'E']) {
            Some((mantissa, exp)) => {
                let e = if upper { 'E' } else { 'e' };
                format!("{}{e}{exp}", strip_fraction_zeros(mantissa))
            }
            None => text,
        }
    }
}

fn strip_fraction_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

/// Insert `separator` every `every` digits, counting from the right.
fn group(digits: &str, separator: Option<char>, every: usize) -> String {
    let Some(sep) = separator else {
        return digits.to_string();
    };
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / every);
    for (index, c) in chars.iter().enumerate() {
        if index > 0 && (chars.len() - index) % every == 0 {
            out.push(sep);
        }
        out.push(*c);
    }
    out
}

/// Group the leading integer digits of a float body (`1234.5` -> `1,234.5`).
fn group_leading_digits(body: &str, separator: Option<char>) -> String {
    if separator.is_none() {
        return body.to_string();
    }
    let split = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let (digits, rest) = body.split_at(split);
    format!("{}{rest}", group(digits, separator, 3))
}

fn pad(lead: &str, body: &str, width: usize, fill: char, align: Align) -> String {
    let len = lead.chars().count() + body.chars().count();
    if len >= width {
        return format!("{lead}{body}");
    }
    let padding = width - len;
    let fill_str = |n: usize| std::iter::repeat(fill).take(n).collect::<String>();
    match align {
        Align::Left => format!("{lead}{body}{}", fill_str(padding)),
        Align::Right => format!("{}{lead}{body}", fill_str(padding)),
        Align::Center => {
            let left = padding / 2;
            format!("{}{lead}{body}{}", fill_str(left), fill_str(padding - left))
        }
        Align::AfterSign => format!("{lead}{}{body}", fill_str(padding)),
    }
}

fn take_digits(chars: &[char], i: &mut usize) -> Option<usize> {
    let start = *i;
    while chars.get(*i).is_some_and(|c| c.is_ascii_digit()) {
        *i += 1;
    }
    if *i == start {
        return None;
    }
    chars[start..*i].iter().collect::<String>().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(spec: &str, value: impl Into<Value>) -> Result<String, FormatSpecError> {
        FormatSpec::parse(spec)?.apply(&value.into())
    }

    #[test]
    fn test_float_fixed_and_width() {
        assert_eq!(fmt(".2f", 9.999).unwrap(), "10.00");
        assert_eq!(fmt(".1f", 19.5).unwrap(), "19.5");
        assert_eq!(fmt("10.2f", 3.14159).unwrap(), "      3.14");
        assert_eq!(fmt("<8.1f", 2.26).unwrap(), "2.3     ");
        assert_eq!(fmt("f", 1.5).unwrap(), "1.500000");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(fmt(",", 1234567i64).unwrap(), "1,234,567");
        assert_eq!(fmt(",.2f", 1234567.891).unwrap(), "1,234,567.89");
        assert_eq!(fmt("_", 1000i64).unwrap(), "1_000");
        assert_eq!(fmt("_x", 0xFFFFFi64).unwrap(), "f_ffff");
        assert!(fmt(",b", 5i64).is_err());
    }

    #[test]
    fn test_integer_types() {
        assert_eq!(fmt("d", 42i64).unwrap(), "42");
        assert_eq!(fmt("05d", -42i64).unwrap(), "-0042");
        assert_eq!(fmt("#x", 255i64).unwrap(), "0xff");
        assert_eq!(fmt("X", 255i64).unwrap(), "FF");
        assert_eq!(fmt("#010b", 5i64).unwrap(), "0b00000101");
        assert_eq!(fmt("o", 8i64).unwrap(), "10");
        assert_eq!(fmt("c", 65i64).unwrap(), "A");
        assert_eq!(fmt("+d", 7i64).unwrap(), "+7");
        assert_eq!(fmt(" d", 7i64).unwrap(), " 7");
    }

    #[test]
    fn test_integer_with_float_type() {
        assert_eq!(fmt(".2f", 3i64).unwrap(), "3.00");
        assert_eq!(fmt(".0%", 1i64).unwrap(), "100%");
    }

    #[test]
    fn test_integer_rejects_precision() {
        assert!(fmt(".2", 3i64).is_err());
        assert!(fmt(".2d", 3i64).is_err());
    }

    #[test]
    fn test_scientific_and_general() {
        assert_eq!(fmt(".2e", 1500.0).unwrap(), "1.50e+03");
        assert_eq!(fmt("E", 0.000123).unwrap(), "1.230000E-04");
        assert_eq!(fmt("g", 1500.0).unwrap(), "1500");
        assert_eq!(fmt("g", 0.00001234).unwrap(), "1.234e-05");
        assert_eq!(fmt(".3g", 1234.5).unwrap(), "1.23e+03");
        assert_eq!(fmt("g", 0.0).unwrap(), "0");
        assert_eq!(fmt("#.3g", 1.0).unwrap(), "1.00");
    }

    #[test]
    fn test_float_without_type() {
        assert_eq!(fmt(">6", 2.5).unwrap(), "   2.5");
        assert_eq!(fmt(".3", 2.0).unwrap(), "2.0");
        assert_eq!(fmt(".2", 1234.5).unwrap(), "1.2e+03");
    }

    #[test]
    fn test_percent() {
        assert_eq!(fmt(".1%", 0.256).unwrap(), "25.6%");
    }

    #[test]
    fn test_alignment_and_fill() {
        assert_eq!(fmt("*^9", "mid").unwrap(), "***mid***");
        assert_eq!(fmt(">5", "ab").unwrap(), "   ab");
        assert_eq!(fmt("5", "ab").unwrap(), "ab   ");
        assert_eq!(fmt("5", 12i64).unwrap(), "   12");
        assert_eq!(fmt("=+6", 12i64).unwrap(), "+   12");
        assert_eq!(fmt("x<05", 5i64).unwrap(), "5xxxx");
    }

    #[test]
    fn test_text_precision_truncates() {
        assert_eq!(fmt(".3", "Привет").unwrap(), "При");
        assert_eq!(fmt("s", "plain").unwrap(), "plain");
    }

    #[test]
    fn test_text_with_numeric_spec_is_incompatible() {
        assert!(matches!(
            fmt(".2f", "abc"),
            Err(FormatSpecError::UnsupportedType { code: 'f', .. })
        ));
        assert!(fmt("+", "abc").is_err());
        assert!(fmt(",", "abc").is_err());
        assert!(fmt("=5", "abc").is_err());
    }

    #[test]
    fn test_non_numeric_values_use_text_rules() {
        assert_eq!(fmt(">6", true).unwrap(), "  true");
        assert_eq!(fmt("<5", Value::Null).unwrap(), "null ");
        assert!(fmt("d", true).is_err());
    }

    #[test]
    fn test_malformed_specs() {
        assert!(FormatSpec::parse("%%bogus").is_err());
        assert!(FormatSpec::parse(".f").is_err());
        assert!(FormatSpec::parse("10q").is_err());
        assert!(FormatSpec::parse("ff").is_err());
    }

    #[test]
    fn test_oversized_width_and_precision_are_malformed() {
        assert!(matches!(
            FormatSpec::parse(".70000f"),
            Err(FormatSpecError::Malformed(_))
        ));
        assert!(FormatSpec::parse(".70000e").is_err());
        assert!(FormatSpec::parse("99999999999").is_err());
        assert!(FormatSpec::parse("99999999999999999999999").is_err());
        assert_eq!(fmt(".65535f", 0.5).unwrap().len(), 65537);
    }

    #[test]
    fn test_float_rejects_integer_codes() {
        assert!(fmt("d", 1.5).is_err());
        assert!(fmt("x", 1.5).is_err());
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(fmt(".2f", f64::NAN).unwrap(), "nan");
        assert_eq!(fmt("F", f64::INFINITY).unwrap(), "INF");
        assert_eq!(fmt(".2f", f64::NEG_INFINITY).unwrap(), "-inf");
        assert_eq!(fixed(f64::NAN, 2), "nan");
        assert_eq!(fixed(19.5, 2), "19.50");
    }
}
