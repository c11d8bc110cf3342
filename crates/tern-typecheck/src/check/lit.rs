//! Literal checking.
//!
//! Integer literals are range-checked against their width and stored as
//! two's-complement values; string literals have their escapes decoded to
//! bytes.

use crate::config::MAX_INT_WIDTH;
use crate::error::{Result, TypeError};
use crate::infer::Context;
use crate::tast::TLit;
use crate::types::Ty;
use tern_syntax::Span;
use tern_syntax::ast::Literal;

/// Checks a literal, returning its value and type.
///
/// # Errors
///
/// [`TypeError::InvalidLiteral`] for an out-of-range integer, a bad width
/// or a bad escape.
pub fn check_lit(ctx: &mut Context, lit: &Literal, span: Span) -> Result<(TLit, Ty)> {
    match lit {
        Literal::Bool(b) => Ok((TLit::Bool(*b), ctx.registry.bool_ty())),
        Literal::Int { magnitude, width } => {
            let width = width.unwrap_or(ctx.options.default_int_width);
            let value = int_value(*magnitude, width, span)?;
            let ty = ctx.registry.int_ty(width, &mut ctx.interner);
            Ok((TLit::Int { width, value }, ty))
        }
        Literal::Str(raw) => Ok((TLit::Str(decode_str(raw, span)?), ctx.registry.string_ty())),
    }
}

/// Two's-complement value of `magnitude` as a `width`-bit integer.
///
/// Any bit pattern that fits in `width` bits is accepted, so `255i8` is
/// `-1`.
///
/// # Errors
///
/// Widths outside `1..=128` and magnitudes of `2^width` or more.
pub fn int_value(magnitude: u128, width: u32, span: Span) -> Result<i128> {
    if width == 0 || width > MAX_INT_WIDTH {
        return Err(TypeError::InvalidLiteral {
            reason: format!("integer width must be between 1 and {MAX_INT_WIDTH}, not {width}"),
            span,
        });
    }
    if width < 128 && magnitude >> width != 0 {
        return Err(TypeError::InvalidLiteral {
            reason: format!("{magnitude} does not fit in {width} bits"),
            span,
        });
    }
    let shift = 128 - width;
    Ok(((magnitude << shift) as i128) >> shift)
}

/// Decodes the escapes in a string literal body.
///
/// # Errors
///
/// Unknown escapes, bytes above `0o377`, code points above `0x10FFFF`,
/// surrogates and truncated escapes.
pub fn decode_str(raw: &str, span: Span) -> Result<Vec<u8>> {
    let invalid = |reason: String| TypeError::InvalidLiteral { reason, span };

    let mut out = Vec::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        let Some(escape) = chars.next() else {
            return Err(invalid("string ends in a backslash".to_string()));
        };
        match escape {
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            '0' if !chars.peek().is_some_and(|d| d.is_digit(8)) => out.push(0),
            '\\' => out.push(b'\\'),
            '"' => out.push(b'"'),
            '\'' => out.push(b'\''),
            'x' => {
                let hex: String = (0..2).filter_map(|_| chars.next()).collect();
                let byte = (hex.len() == 2)
                    .then(|| u8::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .ok_or_else(|| invalid(format!("bad byte escape \\x{hex}")))?;
                out.push(byte);
            }
            'u' => {
                if chars.next() != Some('{') {
                    return Err(invalid("expected `{` after \\u".to_string()));
                }
                let mut hex = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(d) if d.is_ascii_hexdigit() && hex.len() < 6 => hex.push(d),
                        _ => return Err(invalid(format!("bad unicode escape \\u{{{hex}"))),
                    }
                }
                let scalar = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| invalid(format!("\\u{{{hex}}} is not a unicode scalar value")))?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(scalar.encode_utf8(&mut buf).as_bytes());
            }
            d if d.is_digit(8) => {
                let mut value = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|n| n.to_digit(8)) {
                        Some(n) => {
                            value = value * 8 + n;
                            chars.next();
                        }
                        None => break,
                    }
                }
                let byte = u8::try_from(value)
                    .map_err(|_| invalid(format!("octal escape \\{value:o} is above \\377")))?;
                out.push(byte);
            }
            other => return Err(invalid(format!("unknown escape \\{other}"))),
        }
    }

    Ok(out)
}
