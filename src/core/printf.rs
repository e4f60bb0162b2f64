//! printf-style template interpolation
//!
//! Records carry their template and positional arguments unrendered; the
//! worker that persists a record calls [`sprintf`] to produce the message.
//!
//! Supported verbs:
//!
//! | verb              | arguments                                  |
//! |-------------------|--------------------------------------------|
//! | `%v`              | any, natural representation                |
//! | `%d` `%i`         | integers, chars (code point)               |
//! | `%x` `%X` `%o` `%b` | integers, chars; `%x`/`%X` also strings  |
//! | `%c` `%q`         | integers and chars; `%q` also strings      |
//! | `%s`              | strings                                    |
//! | `%f` `%F` `%e` `%E` `%g` `%G` | floats                         |
//! | `%t`              | booleans                                   |
//! | `%%`              | literal percent, consumes nothing          |
//!
//! Flags `-`, `+`, `0`, space and `#`, a width and a `.precision` may
//! precede the verb. Nothing in here fails: mismatches are rendered inline
//! as `%!d(string=abc)`, `%!d(MISSING)`, `%!(NOVERB)` and
//! `%!(EXTRA int=1, string=x)`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::iter::Peekable;
use std::str::Chars;

/// Widths and precisions above this are clamped.
const MAX_WIDTH: usize = 4096;

/// Positional argument of a log template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormatArg {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl FormatArg {
    /// Type label used inside error markers
    pub fn type_name(&self) -> &'static str {
        match self {
            FormatArg::Str(_) => "string",
            FormatArg::Int(_) => "int",
            FormatArg::Uint(_) => "uint",
            FormatArg::Float(_) => "float64",
            FormatArg::Bool(_) => "bool",
            FormatArg::Char(_) => "char",
        }
    }
}

impl fmt::Display for FormatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatArg::Str(s) => write!(f, "{}", s),
            FormatArg::Int(i) => write!(f, "{}", i),
            FormatArg::Uint(u) => write!(f, "{}", u),
            FormatArg::Float(fl) => write!(f, "{}", fl),
            FormatArg::Bool(b) => write!(f, "{}", b),
            FormatArg::Char(c) => write!(f, "{}", c),
        }
    }
}

impl From<String> for FormatArg {
    fn from(s: String) -> Self {
        FormatArg::Str(s)
    }
}

impl From<&str> for FormatArg {
    fn from(s: &str) -> Self {
        FormatArg::Str(s.to_string())
    }
}

impl From<&String> for FormatArg {
    fn from(s: &String) -> Self {
        FormatArg::Str(s.clone())
    }
}

impl From<bool> for FormatArg {
    fn from(b: bool) -> Self {
        FormatArg::Bool(b)
    }
}

impl From<char> for FormatArg {
    fn from(c: char) -> Self {
        FormatArg::Char(c)
    }
}

impl From<f32> for FormatArg {
    fn from(f: f32) -> Self {
        FormatArg::Float(f64::from(f))
    }
}

impl From<f64> for FormatArg {
    fn from(f: f64) -> Self {
        FormatArg::Float(f)
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty; $($t:ty),*) => {
        $(
            impl From<$t> for FormatArg {
                fn from(v: $t) -> Self {
                    FormatArg::$variant(v as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int, i64; i8, i16, i32, i64, isize);
impl_from_int!(Uint, u64; u8, u16, u32, u64, usize);

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    minus: bool,
    plus: bool,
    zero: bool,
    space: bool,
    sharp: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Interpolate `args` into a printf-style `template`.
pub fn sprintf(template: &str, args: &[FormatArg]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut next_arg = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                '0' => spec.zero = true,
                ' ' => spec.space = true,
                '#' => spec.sharp = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = read_number(&mut chars);
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(read_number(&mut chars).unwrap_or(0));
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next_arg) {
            Some(arg) => {
                next_arg += 1;
                format_arg(&mut out, verb, &spec, arg);
            }
            None => {
                let _ = write!(out, "%!{}(MISSING)", verb);
            }
        }
    }

    if next_arg < args.len() {
        out.push_str("%!(EXTRA ");
        for (i, arg) in args[next_arg..].iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}={}", arg.type_name(), arg);
        }
        out.push(')');
    }

    out
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        let v = value.unwrap_or(0).saturating_mul(10).saturating_add(d as usize);
        value = Some(v.min(MAX_WIDTH));
    }
    value
}

fn format_arg(out: &mut String, verb: char, spec: &Spec, arg: &FormatArg) {
    let handled = match arg {
        FormatArg::Int(v) => format_integer(out, verb, spec, *v < 0, v.unsigned_abs()),
        FormatArg::Uint(v) => format_integer(out, verb, spec, false, *v),
        FormatArg::Float(v) => format_float(out, verb, spec, *v),
        FormatArg::Str(s) => format_str(out, verb, spec, s),
        FormatArg::Bool(b) => match verb {
            't' | 'v' => {
                pad_str(out, if *b { "true" } else { "false" }, spec);
                true
            }
            _ => false,
        },
        FormatArg::Char(c) => match verb {
            'c' | 'v' => {
                let mut buf = [0u8; 4];
                pad_str(out, c.encode_utf8(&mut buf), spec);
                true
            }
            'q' => {
                pad_str(out, &format!("{:?}", c), spec);
                true
            }
            _ => format_integer(out, verb, spec, false, u64::from(u32::from(*c))),
        },
    };

    if !handled {
        let _ = write!(out, "%!{}({}={})", verb, arg.type_name(), arg);
    }
}

fn format_integer(out: &mut String, verb: char, spec: &Spec, negative: bool, magnitude: u64) -> bool {
    let (mut digits, prefix) = match verb {
        'd' | 'i' | 'v' => (magnitude.to_string(), ""),
        'x' => (format!("{:x}", magnitude), "0x"),
        'X' => (format!("{:X}", magnitude), "0X"),
        'o' => (format!("{:o}", magnitude), "0"),
        'b' => (format!("{:b}", magnitude), "0b"),
        'c' | 'q' => {
            let ch = if negative {
                char::REPLACEMENT_CHARACTER
            } else {
                u32::try_from(magnitude)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER)
            };
            let rendered = if verb == 'q' { format!("{:?}", ch) } else { ch.to_string() };
            pad_str(out, &rendered, spec);
            return true;
        }
        _ => return false,
    };

    if let Some(precision) = spec.precision {
        if digits.len() < precision {
            digits = format!("{}{}", "0".repeat(precision - digits.len()), digits);
        }
    }

    let mut lead = String::from(sign(negative, spec));
    if spec.sharp {
        lead.push_str(prefix);
    }
    pad_number(out, &lead, &digits, spec, spec.precision.is_none());
    true
}

fn format_float(out: &mut String, verb: char, spec: &Spec, value: f64) -> bool {
    if !matches!(verb, 'f' | 'F' | 'e' | 'E' | 'g' | 'G' | 'v') {
        return false;
    }

    if value.is_nan() {
        pad_str(out, "NaN", spec);
        return true;
    }
    if value.is_infinite() {
        pad_str(out, if value > 0.0 { "+Inf" } else { "-Inf" }, spec);
        return true;
    }

    let negative = value.is_sign_negative();
    let abs = value.abs();
    let body = match verb {
        'f' | 'F' => format!("{:.*}", spec.precision.unwrap_or(6), abs),
        'e' => exponent_form(abs, spec.precision.unwrap_or(6), false),
        'E' => exponent_form(abs, spec.precision.unwrap_or(6), true),
        'G' => general_form(abs, spec.precision, true),
        _ => general_form(abs, spec.precision, false),
    };

    pad_number(out, sign(negative, spec), &body, spec, true);
    true
}

fn format_str(out: &mut String, verb: char, spec: &Spec, s: &str) -> bool {
    match verb {
        's' | 'v' => match spec.precision {
            Some(p) => {
                let truncated: String = s.chars().take(p).collect();
                pad_str(out, &truncated, spec);
            }
            None => pad_str(out, s, spec),
        },
        'q' => pad_str(out, &format!("{:?}", s), spec),
        'x' | 'X' => {
            let mut hex = String::with_capacity(s.len() * 2);
            for byte in s.bytes() {
                if verb == 'x' {
                    let _ = write!(hex, "{:02x}", byte);
                } else {
                    let _ = write!(hex, "{:02X}", byte);
                }
            }
            pad_str(out, &hex, spec);
        }
        _ => return false,
    }
    true
}

fn sign(negative: bool, spec: &Spec) -> &'static str {
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

/// `1.5e+03` style with at least two exponent digits.
fn exponent_form(abs: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, abs);
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let e = if upper { 'E' } else { 'e' };
    let exp_sign = if exp < 0 { '-' } else { '+' };
    format!("{}{}{}{:02}", mantissa, e, exp_sign, exp.unsigned_abs())
}

/// Shortest representation, switching to exponent form for very large or
/// very small magnitudes.
fn general_form(abs: f64, precision: Option<usize>, upper: bool) -> String {
    match precision {
        None => {
            let shortest = format!("{:e}", abs);
            let exp: i32 = shortest
                .split_once('e')
                .and_then(|(_, e)| e.parse().ok())
                .unwrap_or(0);
            if abs != 0.0 && !(-4..21).contains(&exp) {
                let (mantissa, _) = shortest.split_once('e').unwrap_or((shortest.as_str(), ""));
                let e = if upper { 'E' } else { 'e' };
                let exp_sign = if exp < 0 { '-' } else { '+' };
                format!("{}{}{}{:02}", mantissa, e, exp_sign, exp.unsigned_abs())
            } else {
                format!("{}", abs)
            }
        }
        Some(p) => {
            let significant = p.max(1);
            let probe = format!("{:.*e}", significant - 1, abs);
            let exp: i32 = probe
                .split_once('e')
                .and_then(|(_, e)| e.parse().ok())
                .unwrap_or(0);
            if exp < -4 || exp >= significant as i32 {
                let formatted = exponent_form(abs, significant - 1, upper);
                match formatted.find(['e', 'E']) {
                    Some(idx) => {
                        let (mantissa, rest) = formatted.split_at(idx);
                        format!("{}{}", trim_fraction(mantissa), rest)
                    }
                    None => formatted,
                }
            } else {
                let decimals = (significant as i32 - 1 - exp).max(0) as usize;
                trim_fraction(&format!("{:.*}", decimals, abs)).to_string()
            }
        }
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn pad_str(out: &mut String, s: &str, spec: &Spec) {
    let len = s.chars().count();
    let fill = spec.width.unwrap_or(0).saturating_sub(len);
    if fill == 0 {
        out.push_str(s);
    } else if spec.minus {
        out.push_str(s);
        out.extend(std::iter::repeat(' ').take(fill));
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(s);
    }
}

fn pad_number(out: &mut String, lead: &str, digits: &str, spec: &Spec, zero_allowed: bool) {
    let len = lead.chars().count() + digits.chars().count();
    let fill = spec.width.unwrap_or(0).saturating_sub(len);
    if fill == 0 {
        out.push_str(lead);
        out.push_str(digits);
    } else if spec.minus {
        out.push_str(lead);
        out.push_str(digits);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if spec.zero && zero_allowed {
        out.push_str(lead);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(lead);
        out.push_str(digits);
    }
}
