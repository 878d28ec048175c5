//! Typed views of raw metric strings.
//!
//! Metric values are presentation data, so coercion never fails: a value
//! without a parseable prefix degrades to zero, `false` or opaque white and
//! the problem is reported alongside the result so the caller can log it
//! for the theme author.

use std::fmt;

/// Which typed view a coercion produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int,
    Float,
    Bool,
    Color,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Bool => "boolean",
            ValueKind::Color => "color",
        };
        f.write_str(name)
    }
}

/// A raw value that could not be fully read as the requested kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected {expected} but found '{raw}', using {substituted}")]
pub struct MalformedMetricValue {
    pub expected: ValueKind,
    pub raw: String,
    pub substituted: String,
}

/// Result of a lenient coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    pub value: T,
    pub malformed: Option<MalformedMetricValue>,
}

impl<T> Coerced<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            malformed: None,
        }
    }
}

impl<T: fmt::Debug> Coerced<T> {
    fn degraded(value: T, expected: ValueKind, raw: &str) -> Self {
        let substituted = format!("{value:?}");
        Self {
            value,
            malformed: Some(MalformedMetricValue {
                expected,
                raw: raw.to_string(),
                substituted,
            }),
        }
    }
}

/// The closed set of types a metric can be read as.
pub trait MetricValue: Clone + fmt::Debug {
    const KIND: ValueKind;

    fn coerce(raw: &str) -> Coerced<Self>;
}

impl MetricValue for String {
    const KIND: ValueKind = ValueKind::String;

    /// `::` stands for a line break, which ini values cannot hold.
    fn coerce(raw: &str) -> Coerced<Self> {
        Coerced::clean(raw.replace("::", "\n"))
    }
}

impl MetricValue for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn coerce(raw: &str) -> Coerced<Self> {
        match int_prefix(raw) {
            Some(value) => Coerced::clean(value),
            None => Coerced::degraded(0, Self::KIND, raw),
        }
    }
}

impl MetricValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn coerce(raw: &str) -> Coerced<Self> {
        match float_prefix(raw) {
            Some(value) => Coerced::clean(value),
            None => Coerced::degraded(0.0, Self::KIND, raw),
        }
    }
}

impl MetricValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    /// True when the integer prefix is non-zero.
    fn coerce(raw: &str) -> Coerced<Self> {
        match int_prefix(raw) {
            Some(value) => Coerced::clean(value != 0),
            None => Coerced::degraded(false, Self::KIND, raw),
        }
    }
}

impl MetricValue for Color {
    const KIND: ValueKind = ValueKind::Color;

    fn coerce(raw: &str) -> Coerced<Self> {
        let (color, channels) = Color::parse_channels(raw);
        if channels == 4 {
            Coerced::clean(color)
        } else {
            Coerced::degraded(color, Self::KIND, raw)
        }
    }
}

/// RGBA color with float channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `"r,g,b,a"` or `#RRGGBB[AA]`, returning the color and how many
    /// channels were read.
    ///
    /// Channels start as opaque white and are overwritten left to right
    /// until one fails to parse, so `"1,0"` gives `(1, 0, 1, 1)`.
    pub fn parse_channels(raw: &str) -> (Color, usize) {
        let trimmed = raw.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return match parse_hex_color(hex) {
                Some(color) => (color, 4),
                None => (Color::WHITE, 0),
            };
        }

        let mut channels = [1.0f32; 4];
        let mut parsed = 0;
        let mut rest = trimmed;
        for (i, channel) in channels.iter_mut().enumerate() {
            if i > 0 {
                match rest.trim_start().strip_prefix(',') {
                    Some(after) => rest = after,
                    None => break,
                }
            }
            match float_prefix_len(rest) {
                Some((value, len)) => {
                    *channel = value;
                    parsed += 1;
                    rest = &rest[len..];
                }
                None => break,
            }
        }

        let [r, g, b, a] = channels;
        (Color::new(r, g, b, a), parsed)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| -> Option<f32> {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
    Some(Color::new(channel(0)?, channel(2)?, channel(4)?, a))
}

/// Leading integer of `s`, ignoring trailing text. Saturates at the `i32`
/// range.
pub fn int_prefix(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let digits_start = i;
    let mut value: i64 = 0;
    while let Some(d) = bytes.get(i).filter(|b| b.is_ascii_digit()) {
        value = (value * 10 + i64::from(d - b'0')).min(i64::from(i32::MAX) + 1);
        i += 1;
    }
    if i == digits_start {
        return None;
    }

    let value = if negative { -value } else { value };
    Some(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Leading floating point number of `s`, ignoring trailing text.
pub fn float_prefix(s: &str) -> Option<f32> {
    float_prefix_len(s.trim_start()).map(|(value, _)| value)
}

/// Leading float and the number of bytes it spans, after leading whitespace.
fn float_prefix_len(s: &str) -> Option<(f32, usize)> {
    let skipped = s.len() - s.trim_start().len();
    let bytes = s.as_bytes();
    let mut i = skipped;

    if matches!(bytes.get(i), Some(b'-' | b'+')) {
        i += 1;
    }

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            i = j;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'-' | b'+')) {
            j += 1;
        }
        let exp_start = j;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[skipped..i].parse::<f32>().ok().map(|value| (value, i))
}
