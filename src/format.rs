//! The three formatting strategies behind the logging calls.
//!
//! - [`sprint`]: operands concatenated, a space only between two adjacent
//!   operands when neither is a string
//! - [`sprintf`]: positional substitution into a format string
//! - [`sprintln`]: operands joined by single spaces, newline appended
//!
//! All three are pure functions from an argument list to a `String` so they
//! can be tested without any sink. Formatting never fails: a verb with no
//! operand, an operand of the wrong type or surplus operands are rendered
//! inline as `%!` markers.

use crate::value::Value;

/// Print-style formatting.
pub fn sprint(args: &[Value<'_>]) -> String {
    let mut out = String::new();
    let mut prev_string = false;
    for (i, arg) in args.iter().enumerate() {
        let is_string = arg.is_string();
        if i > 0 && !is_string && !prev_string {
            out.push(' ');
        }
        write_value(&mut out, arg, 'v', &Spec::default());
        prev_string = is_string;
    }
    out
}

/// Println-style formatting. The result always ends in a newline.
pub fn sprintln(args: &[Value<'_>]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_value(&mut out, arg, 'v', &Spec::default());
    }
    out.push('\n');
    out
}

/// Printf-style formatting.
///
/// Verbs: `%v %s %q %d %b %o %O %x %X %c %U %e %E %f %F %g %G %t %T %%`,
/// flags `+ - # 0 space`, width and precision as digits or `*`.
pub fn sprintf(format: &str, args: &[Value<'_>]) -> String {
    let chars: Vec<char> = format.chars().collect();
    let mut out = String::with_capacity(format.len());
    let mut arg_num = 0;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '%' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        i += 1;

        let mut spec = Spec::default();
        while i < chars.len() {
            match chars[i] {
                '#' => spec.sharp = true,
                '0' => spec.zero = !spec.minus,
                '+' => spec.plus = true,
                '-' => {
                    spec.minus = true;
                    spec.zero = false;
                }
                ' ' => spec.space = true,
                _ => break,
            }
            i += 1;
        }

        // Width
        if i < chars.len() && chars[i] == '*' {
            i += 1;
            match int_from_arg(args, &mut arg_num) {
                Some(w) if w < 0 => {
                    spec.minus = true;
                    spec.zero = false;
                    spec.width = Some(w.unsigned_abs() as usize);
                }
                Some(w) => spec.width = Some(w as usize),
                None => out.push_str("%!(BADWIDTH)"),
            }
        } else {
            spec.width = parse_num(&chars, &mut i);
        }

        // Precision
        if i < chars.len() && chars[i] == '.' {
            i += 1;
            if i < chars.len() && chars[i] == '*' {
                i += 1;
                match int_from_arg(args, &mut arg_num) {
                    Some(p) if p < 0 => spec.precision = None,
                    Some(p) => spec.precision = Some(p as usize),
                    None => out.push_str("%!(BADPREC)"),
                }
            } else {
                spec.precision = Some(parse_num(&chars, &mut i).unwrap_or(0));
            }
        }

        let Some(&verb) = chars.get(i) else {
            out.push_str("%!(NOVERB)");
            break;
        };
        i += 1;

        if verb == '%' {
            // A literal percent consumes no operand and ignores width
            out.push('%');
            continue;
        }
        let Some(arg) = args.get(arg_num) else {
            out.push_str("%!");
            out.push(verb);
            out.push_str("(MISSING)");
            continue;
        };
        arg_num += 1;

        if verb == 'T' {
            pad(&mut out, arg.type_name(), &spec);
            continue;
        }
        if verb == 'v' {
            // `+` and `#` change the meaning of %v rather than adding a sign
            spec.plus = false;
            spec.sharp_v = spec.sharp;
            spec.sharp = false;
        }
        write_value(&mut out, arg, verb, &spec);
    }

    if arg_num < args.len() {
        out.push_str("%!(EXTRA ");
        for (n, arg) in args[arg_num..].iter().enumerate() {
            if n > 0 {
                out.push_str(", ");
            }
            if let Value::Nil = arg {
                out.push_str("<nil>");
            } else {
                out.push_str(arg.type_name());
                out.push('=');
                write_value(&mut out, arg, 'v', &Spec::default());
            }
        }
        out.push(')');
    }

    out
}

/// Per-verb formatting options.
#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    minus: bool,
    plus: bool,
    sharp: bool,
    space: bool,
    zero: bool,
    sharp_v: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Upper bound on any width or precision, literal or taken from an operand
const TOO_LARGE: i64 = 1_000_000;

/// Highest precision `core::fmt` accepts at runtime
const MAX_FMT_PRECISION: usize = u16::MAX as usize;

/// Literal width or precision. A number above [`TOO_LARGE`] abandons the
/// rest of the format: `i` moves to the end and `None` is returned.
fn parse_num(chars: &[char], i: &mut usize) -> Option<usize> {
    let start = *i;
    let mut n: i64 = 0;
    while let Some(d) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        n = n * 10 + i64::from(d);
        if n > TOO_LARGE {
            *i = chars.len();
            return None;
        }
        *i += 1;
    }
    (*i > start).then_some(n as usize)
}

/// Width or precision taken from an operand. Only integers within a sane
/// range qualify; the operand is consumed whenever one is available.
fn int_from_arg(args: &[Value<'_>], arg_num: &mut usize) -> Option<i64> {
    let arg = args.get(*arg_num)?;
    *arg_num += 1;
    let n = match arg {
        Value::Int(n) => *n,
        Value::Uint(n) => i64::try_from(*n).ok()?,
        _ => return None,
    };
    (-TOO_LARGE..=TOO_LARGE).contains(&n).then_some(n)
}

fn write_value(out: &mut String, arg: &Value<'_>, verb: char, spec: &Spec) {
    match arg {
        Value::Nil => match verb {
            'v' => pad(out, "<nil>", spec),
            _ => bad_verb(out, arg, verb),
        },
        Value::Bool(b) => match verb {
            't' | 'v' => pad(out, if *b { "true" } else { "false" }, spec),
            _ => bad_verb(out, arg, verb),
        },
        Value::Int(n) => write_integer(out, arg, *n < 0, n.unsigned_abs(), verb, spec),
        Value::Uint(n) => write_integer(out, arg, false, *n, verb, spec),
        Value::Char(c) => match verb {
            'v' | 's' | 'c' => pad(out, c.encode_utf8(&mut [0; 4]), spec),
            _ => write_integer(out, arg, false, u64::from(u32::from(*c)), verb, spec),
        },
        Value::Float(f) => match verb {
            'v' => write_float(out, *f, 'g', spec.precision, spec),
            'e' | 'E' | 'f' | 'F' => write_float(out, *f, verb, Some(spec.precision.unwrap_or(6)), spec),
            'g' | 'G' => write_float(out, *f, verb, spec.precision, spec),
            _ => bad_verb(out, arg, verb),
        },
        Value::Str(s) => write_string(out, arg, s, verb, spec),
        Value::Other { text, .. } => write_string(out, arg, text, verb, spec),
    }
}

fn bad_verb(out: &mut String, arg: &Value<'_>, verb: char) {
    out.push_str("%!");
    out.push(verb);
    out.push('(');
    if let Value::Nil = arg {
        out.push_str("<nil>");
    } else {
        out.push_str(arg.type_name());
        out.push('=');
        write_value(out, arg, 'v', &Spec::default());
    }
    out.push(')');
}

fn pad(out: &mut String, s: &str, spec: &Spec) {
    let len = s.chars().count();
    let fill = match spec.width {
        Some(width) if width > len => width - len,
        _ => {
            out.push_str(s);
            return;
        }
    };
    if spec.minus {
        out.push_str(s);
        push_n(out, ' ', fill);
    } else {
        push_n(out, if spec.zero { '0' } else { ' ' }, fill);
        out.push_str(s);
    }
}

fn push_n(out: &mut String, c: char, n: usize) {
    out.extend(std::iter::repeat_n(c, n));
}

fn write_string(out: &mut String, arg: &Value<'_>, s: &str, verb: char, spec: &Spec) {
    match verb {
        'v' if spec.sharp_v => pad(out, &quote(s, '"', false), spec),
        'v' | 's' => match spec.precision {
            Some(p) => {
                let truncated: String = s.chars().take(p).collect();
                pad(out, &truncated, spec);
            }
            None => pad(out, s, spec),
        },
        'q' => pad(out, &quote(s, '"', spec.plus), spec),
        'x' | 'X' => {
            let bytes = match spec.precision {
                Some(p) => &s.as_bytes()[..p.min(s.len())],
                None => s.as_bytes(),
            };
            let mut hex = String::with_capacity(bytes.len() * 2);
            for (n, b) in bytes.iter().enumerate() {
                if spec.space && n > 0 {
                    hex.push(' ');
                }
                if spec.sharp && (spec.space || n == 0) {
                    hex.push_str(if verb == 'x' { "0x" } else { "0X" });
                }
                if verb == 'x' {
                    hex.push_str(&format!("{:02x}", b));
                } else {
                    hex.push_str(&format!("{:02X}", b));
                }
            }
            pad(out, &hex, spec);
        }
        _ => bad_verb(out, arg, verb),
    }
}

fn write_integer(
    out: &mut String,
    arg: &Value<'_>,
    negative: bool,
    magnitude: u64,
    verb: char,
    spec: &Spec,
) {
    let base = match verb {
        'd' | 'v' => 10,
        'b' => 2,
        'o' | 'O' => 8,
        'x' | 'X' => 16,
        'c' => {
            let c = u32::try_from(magnitude)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            pad(out, c.encode_utf8(&mut [0; 4]), spec);
            return;
        }
        'q' => {
            let c = u32::try_from(magnitude)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            pad(out, &quote(c.encode_utf8(&mut [0; 4]), '\'', spec.plus), spec);
            return;
        }
        'U' => {
            let mut s = format!("U+{:04X}", magnitude);
            if spec.sharp {
                if let Some(c) = u32::try_from(magnitude).ok().and_then(char::from_u32) {
                    if !c.is_control() {
                        s.push_str(" '");
                        s.push(c);
                        s.push('\'');
                    }
                }
            }
            pad(out, &s, spec);
            return;
        }
        _ => {
            bad_verb(out, arg, verb);
            return;
        }
    };

    let has_sign = negative || spec.plus || spec.space;

    let min_digits = match spec.precision {
        Some(0) if magnitude == 0 => {
            let blank = Spec { zero: false, ..*spec };
            pad(out, "", &blank);
            return;
        }
        Some(p) => p,
        None => match spec.width {
            Some(w) if spec.zero && !spec.minus => w.saturating_sub(usize::from(has_sign)),
            _ => 0,
        },
    };

    let mut digits = match (base, verb) {
        (2, _) => format!("{:b}", magnitude),
        (8, _) => format!("{:o}", magnitude),
        (16, 'X') => format!("{:X}", magnitude),
        (16, _) => format!("{:x}", magnitude),
        _ => magnitude.to_string(),
    };
    if digits.len() < min_digits {
        digits.insert_str(0, &"0".repeat(min_digits - digits.len()));
    }

    let mut num = String::with_capacity(digits.len() + 3);
    if negative {
        num.push('-');
    } else if spec.plus {
        num.push('+');
    } else if spec.space {
        num.push(' ');
    }
    if verb == 'O' {
        num.push_str("0o");
    } else if spec.sharp {
        match base {
            2 => num.push_str("0b"),
            8 if !digits.starts_with('0') => num.push('0'),
            16 => num.push_str(if verb == 'X' { "0X" } else { "0x" }),
            _ => {}
        }
    }
    num.push_str(&digits);

    pad(out, &num, &Spec { zero: false, ..*spec });
}

fn write_float(out: &mut String, v: f64, verb: char, precision: Option<usize>, spec: &Spec) {
    // `num` always carries a leading sign so zero padding can go after it
    let mut num = format_float(v, verb, precision);
    if !num.starts_with(['+', '-']) {
        num.insert(0, '+');
    }
    if spec.space && !spec.plus && num.starts_with('+') {
        num.replace_range(..1, " ");
    }

    if num[1..].starts_with(['I', 'N']) {
        // Infinities and NaN are never zero padded
        if num.ends_with("NaN") && !spec.space && !spec.plus {
            num.remove(0);
        }
        pad(out, &num, &Spec { zero: false, ..*spec });
        return;
    }

    if spec.sharp {
        num = force_decimal_point(num, verb, precision);
    }

    if spec.plus || !num.starts_with('+') {
        match spec.width {
            Some(width) if spec.zero && width > num.chars().count() => {
                let fill = width - num.chars().count();
                out.push_str(&num[..1]);
                push_n(out, '0', fill);
                out.push_str(&num[1..]);
            }
            _ => pad(out, &num, spec),
        }
        return;
    }
    pad(out, &num[1..], spec);
}

/// `#` flag: always print a decimal point and, for `%g`, keep trailing zeros
/// up to the precision.
fn force_decimal_point(num: String, verb: char, precision: Option<usize>) -> String {
    let mut digits: i64 = match verb {
        'g' | 'G' => precision.map_or(6, |p| p as i64),
        _ => 0,
    };

    let (body, tail) = match num.find(['e', 'E']) {
        Some(idx) => num.split_at(idx),
        None => (num.as_str(), ""),
    };

    let mut has_point = false;
    let mut saw_nonzero = false;
    for c in body[1..].chars() {
        match c {
            '.' => has_point = true,
            d => {
                if d != '0' {
                    saw_nonzero = true;
                }
                if saw_nonzero {
                    digits -= 1;
                }
            }
        }
    }

    let mut result = body.to_string();
    if !has_point {
        // A lone zero counts as one significant digit
        if body.len() == 2 && body.ends_with('0') {
            digits -= 1;
        }
        result.push('.');
    }
    while digits > 0 {
        result.push('0');
        digits -= 1;
    }
    result.push_str(tail);
    result
}

/// Render a float for `e`, `f` or `g` verbs. `None` precision selects the
/// shortest representation that round-trips. Negative values carry a `-`,
/// infinities a sign, NaN none.
fn format_float(v: f64, verb: char, precision: Option<usize>) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let mut out = String::new();
    if v.is_sign_negative() && v != 0.0 {
        out.push('-');
    }
    let abs = v.abs();

    match verb {
        'e' | 'E' => {
            let (digits, dp) = decimal_digits(abs, precision.map(|p| p + 1));
            let prec = precision.unwrap_or(digits.len().saturating_sub(1));
            write_exponent_form(&mut out, &digits, dp, prec, verb == 'E');
        }
        'f' | 'F' => match precision {
            Some(p) => {
                // Digits past the cap are all zero for any finite f64
                out.push_str(&format!("{:.*}", p.min(MAX_FMT_PRECISION), abs));
                push_n(&mut out, '0', p.saturating_sub(MAX_FMT_PRECISION));
            }
            None => out.push_str(&abs.to_string()),
        },
        _ => {
            let upper = verb == 'G';
            let significant = precision.map(|p| p.max(1));
            let (digits, dp) = decimal_digits(abs, significant);
            let nd = digits.len() as i64;
            let dp64 = dp as i64;

            let mut eprec = significant.map_or(6, |p| p as i64);
            if significant.is_some() && eprec > nd && nd >= dp64 {
                eprec = nd;
            }
            let exp = dp64 - 1;
            if exp < -4 || exp >= eprec {
                write_exponent_form(&mut out, &digits, dp, digits.len() - 1, upper);
            } else {
                write_fixed_form(&mut out, &digits, dp, (nd - dp64).max(0) as usize);
            }
        }
    }
    out
}

/// Decimal digits of `abs` (no trailing zeros, at least one digit) and the
/// position of the decimal point relative to the first digit.
fn decimal_digits(abs: f64, significant: Option<usize>) -> (Vec<u8>, i32) {
    let repr = match significant {
        Some(p) => format!("{:.*e}", p.saturating_sub(1).min(MAX_FMT_PRECISION), abs),
        None => format!("{:e}", abs),
    };
    let (mantissa, exp) = repr.split_once('e').unwrap_or((repr.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    let mut digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    while digits.len() > 1 && digits.last() == Some(&b'0') {
        digits.pop();
    }
    if digits.is_empty() {
        digits.push(b'0');
    }
    (digits, exp + 1)
}

fn write_exponent_form(out: &mut String, digits: &[u8], dp: i32, prec: usize, upper: bool) {
    out.push(char::from(digits[0]));
    if prec > 0 {
        out.push('.');
        for i in 1..=prec {
            out.push(char::from(digits.get(i).copied().unwrap_or(b'0')));
        }
    }
    out.push(if upper { 'E' } else { 'e' });
    let exp = if digits == [b'0'] { 0 } else { dp - 1 };
    out.push(if exp < 0 { '-' } else { '+' });
    let exp = exp.unsigned_abs();
    if exp < 10 {
        out.push('0');
    }
    out.push_str(&exp.to_string());
}

fn write_fixed_form(out: &mut String, digits: &[u8], dp: i32, prec: usize) {
    let digit_at = |idx: i64| -> char {
        if idx >= 0 && (idx as usize) < digits.len() {
            char::from(digits[idx as usize])
        } else {
            '0'
        }
    };

    if dp > 0 {
        for i in 0..dp as i64 {
            out.push(digit_at(i));
        }
    } else {
        out.push('0');
    }
    if prec > 0 {
        out.push('.');
        for i in 0..prec as i64 {
            out.push(digit_at(dp as i64 + i));
        }
    }
}

/// Double- or single-quoted literal with backslash escapes. With
/// `ascii_only`, every non-ASCII character is escaped as well.
fn quote(s: &str, delimiter: char, ascii_only: bool) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        match c {
            c if c == delimiter || c == '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            c if c.is_control() && (c as u32) < 0x80 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() || (ascii_only && !c.is_ascii()) => {
                if (c as u32) < 0x10000 {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                } else {
                    out.push_str(&format!("\\U{:08x}", c as u32));
                }
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}
