//! printf-style display templates for numeric cells
//!
//! Column formats are written the way C callers wrote them (`"%u"`,
//! `"%.2f"`, `"%08llx"`), so this module implements the subset of `printf`
//! conversions a numeric column can reasonably use. A template holds at most
//! one conversion; the cell value is the only argument.

use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// Longest rendering kept for a single cell, matching a 256 byte C buffer.
pub const MAX_RENDERED_CHARS: usize = 255;

/// Errors raised while parsing a display template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("template ends inside a conversion: {template:?}")]
    Truncated { template: String },

    #[error("unsupported conversion '%{conversion}'")]
    UnsupportedConversion { conversion: char },

    #[error("'*' width or precision needs an extra argument")]
    StarArgument,

    #[error("template has more than one conversion")]
    ExtraConversion,
}

/// The single value substituted into a template
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatArg {
    Signed { value: i64, bits: u32 },
    Unsigned { value: u64, bits: u32 },
    Float(f64),
}

impl FormatArg {
    fn as_signed(self) -> i128 {
        match self {
            FormatArg::Signed { value, .. } => value as i128,
            FormatArg::Unsigned { value, .. } => value as i128,
            FormatArg::Float(v) => v as i64 as i128,
        }
    }

    /// Two's complement reinterpretation at the argument's native width.
    fn as_unsigned(self) -> u128 {
        match self {
            FormatArg::Signed { value, bits: 32 } => value as i32 as u32 as u128,
            FormatArg::Signed { value, .. } => value as u64 as u128,
            FormatArg::Unsigned { value, .. } => value as u128,
            FormatArg::Float(v) if v < 0.0 => v as i64 as u64 as u128,
            FormatArg::Float(v) => v as u64 as u128,
        }
    }

    fn as_float(self) -> f64 {
        match self {
            FormatArg::Signed { value, .. } => value as f64,
            FormatArg::Unsigned { value, .. } => value as f64,
            FormatArg::Float(v) => v,
        }
    }

    fn plain(self) -> String {
        match self {
            FormatArg::Signed { value, .. } => value.to_string(),
            FormatArg::Unsigned { value, .. } => value.to_string(),
            FormatArg::Float(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct ConversionSpec {
    left: bool,
    plus: bool,
    space: bool,
    alt: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

/// Render `arg` through a printf-style `template`.
pub fn sprintf(template: &str, arg: FormatArg) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.chars().peekable();
    let mut converted = false;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let spec = parse_conversion(&mut chars, template)?;
        if converted {
            return Err(FormatError::ExtraConversion);
        }
        converted = true;
        out.push_str(&render(&spec, arg));
    }

    if out.chars().count() > MAX_RENDERED_CHARS {
        out = out.chars().take(MAX_RENDERED_CHARS).collect();
    }
    Ok(out)
}

fn parse_conversion(
    chars: &mut Peekable<Chars<'_>>,
    template: &str,
) -> Result<ConversionSpec, FormatError> {
    let mut spec = ConversionSpec::default();

    while let Some(&c) = chars.peek() {
        match c {
            '-' => spec.left = true,
            '+' => spec.plus = true,
            ' ' => spec.space = true,
            '#' => spec.alt = true,
            '0' => spec.zero = true,
            _ => break,
        }
        chars.next();
    }

    if chars.peek() == Some(&'*') {
        return Err(FormatError::StarArgument);
    }
    spec.width = parse_number(chars);

    if chars.peek() == Some(&'.') {
        chars.next();
        if chars.peek() == Some(&'*') {
            return Err(FormatError::StarArgument);
        }
        spec.precision = Some(parse_number(chars).unwrap_or(0));
    }

    // Length modifiers only describe the C argument width; the value already
    // carries its own.
    while let Some(&c) = chars.peek() {
        match c {
            'h' | 'l' | 'L' | 'q' | 'j' | 'z' | 't' => {
                chars.next();
            }
            'I' => {
                chars.next();
                while chars.peek().is_some_and(|d| d.is_ascii_digit()) {
                    chars.next();
                }
            }
            _ => break,
        }
    }

    let conversion = chars.next().ok_or_else(|| FormatError::Truncated {
        template: template.to_string(),
    })?;
    if !"diouxXfFeEgGcs".contains(conversion) {
        return Err(FormatError::UnsupportedConversion { conversion });
    }
    spec.conversion = conversion;
    Ok(spec)
}

fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        let next = value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize);
        value = Some(next.min(MAX_RENDERED_CHARS));
    }
    value
}

fn render(spec: &ConversionSpec, arg: FormatArg) -> String {
    match spec.conversion {
        'd' | 'i' => render_signed(spec, arg.as_signed()),
        'u' => render_unsigned(spec, arg.as_unsigned(), format!("{}", arg.as_unsigned()), ""),
        'o' => {
            let value = arg.as_unsigned();
            render_unsigned(spec, value, format!("{:o}", value), "")
        }
        'x' => {
            let value = arg.as_unsigned();
            let prefix = if spec.alt && value != 0 { "0x" } else { "" };
            render_unsigned(spec, value, format!("{:x}", value), prefix)
        }
        'X' => {
            let value = arg.as_unsigned();
            let prefix = if spec.alt && value != 0 { "0X" } else { "" };
            render_unsigned(spec, value, format!("{:X}", value), prefix)
        }
        'c' => {
            let byte = (arg.as_unsigned() & 0xff) as u8;
            pad(spec, "", &char::from(byte).to_string(), false)
        }
        's' => {
            let mut text = arg.plain();
            if let Some(precision) = spec.precision {
                text = text.chars().take(precision).collect();
            }
            pad(spec, "", &text, false)
        }
        _ => render_float(spec, arg.as_float()),
    }
}

fn apply_int_precision(spec: &ConversionSpec, is_zero: bool, digits: String) -> String {
    match spec.precision {
        Some(0) if is_zero => String::new(),
        Some(precision) if digits.len() < precision => {
            format!("{}{}", "0".repeat(precision - digits.len()), digits)
        }
        _ => digits,
    }
}

fn render_signed(spec: &ConversionSpec, value: i128) -> String {
    let digits = apply_int_precision(spec, value == 0, value.unsigned_abs().to_string());
    let sign = sign_prefix(spec, value < 0);
    pad(spec, sign, &digits, spec.zero && spec.precision.is_none())
}

fn render_unsigned(spec: &ConversionSpec, value: u128, digits: String, prefix: &str) -> String {
    let mut digits = apply_int_precision(spec, value == 0, digits);
    if spec.alt && spec.conversion == 'o' && !digits.starts_with('0') {
        digits.insert(0, '0');
    }
    pad(spec, prefix, &digits, spec.zero && spec.precision.is_none())
}

fn render_float(spec: &ConversionSpec, value: f64) -> String {
    let upper = spec.conversion.is_ascii_uppercase();
    let sign = sign_prefix(spec, value.is_sign_negative());
    let magnitude = value.abs();

    if !magnitude.is_finite() {
        let body = match (magnitude.is_nan(), upper) {
            (true, false) => "nan",
            (true, true) => "NAN",
            (false, false) => "inf",
            (false, true) => "INF",
        };
        return pad(spec, sign, body, false);
    }

    let precision = spec.precision.unwrap_or(6);
    let body = match spec.conversion.to_ascii_lowercase() {
        'f' => {
            let mut body = format!("{:.*}", precision, magnitude);
            if spec.alt && precision == 0 {
                body.push('.');
            }
            body
        }
        'e' => exponential(magnitude, precision, upper, spec.alt),
        _ => general(magnitude, precision, upper, spec.alt),
    };
    pad(spec, sign, &body, spec.zero)
}

/// `%e` layout: mantissa, `e`, sign, at least two exponent digits.
fn exponential(magnitude: f64, precision: usize, upper: bool, alt: bool) -> String {
    let rendered = format!("{:.*e}", precision, magnitude);
    let (mantissa, exponent) = rendered.split_once('e').unwrap_or((rendered.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let mut out = mantissa.to_string();
    if alt && precision == 0 {
        out.push('.');
    }
    out.push(if upper { 'E' } else { 'e' });
    out.push(if exponent < 0 { '-' } else { '+' });
    out.push_str(&format!("{:02}", exponent.abs()));
    out
}

/// `%g`: fixed or exponential depending on the decimal exponent, trailing
/// zeros removed unless `#` was given.
fn general(magnitude: f64, precision: usize, upper: bool, alt: bool) -> String {
    let significant = precision.max(1);
    let exponent = if magnitude == 0.0 {
        0
    } else {
        let probe = format!("{:.*e}", significant - 1, magnitude);
        probe
            .split_once('e')
            .and_then(|(_, e)| e.parse::<i32>().ok())
            .unwrap_or(0)
    };

    if exponent >= -4 && (exponent as i64) < significant as i64 {
        let decimals = (significant as i64 - 1 - exponent as i64).max(0) as usize;
        let fixed = format!("{:.*}", decimals, magnitude);
        if alt {
            fixed
        } else {
            strip_trailing_zeros(&fixed)
        }
    } else {
        let formatted = exponential(magnitude, significant - 1, upper, alt);
        if alt {
            return formatted;
        }
        let split = formatted.find(['e', 'E']).unwrap_or(formatted.len());
        let (mantissa, tail) = formatted.split_at(split);
        format!("{}{}", strip_trailing_zeros(mantissa), tail)
    }
}

fn strip_trailing_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

fn sign_prefix(spec: &ConversionSpec, negative: bool) -> &'static str {
    if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    }
}

fn pad(spec: &ConversionSpec, prefix: &str, body: &str, zero_fill: bool) -> String {
    let len = prefix.chars().count() + body.chars().count();
    let width = spec.width.unwrap_or(0);
    if len >= width {
        return format!("{}{}", prefix, body);
    }

    let fill = width - len;
    if spec.left {
        format!("{}{}{}", prefix, body, " ".repeat(fill))
    } else if zero_fill {
        format!("{}{}{}", prefix, "0".repeat(fill), body)
    } else {
        format!("{}{}{}", " ".repeat(fill), prefix, body)
    }
}
