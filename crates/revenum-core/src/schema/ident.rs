//! Field name normalization.
//!
//! Enum members in the artifact are camel- or Pascal-cased (`UserId`,
//! `hpMax`, `slot10`). Rust fields are snake_case, and a handful of member
//! names collide with keywords.

/// Keywords that can be written as raw identifiers (`r#type`)
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that are not allowed as raw identifiers
const PATH_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Convert a raw member name to a snake_case identifier.
///
/// An underscore goes before every uppercase letter and before the first
/// digit of every digit run; everything is lowercased, and a single leading
/// underscore is dropped.
pub fn normalize_field_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_digit = false;

    for c in raw.chars() {
        if c.is_uppercase() {
            out.push('_');
            out.extend(c.to_lowercase());
        } else if c.is_ascii_digit() && !prev_digit {
            out.push('_');
            out.push(c);
        } else {
            out.push(c);
        }
        prev_digit = c.is_ascii_digit();
    }

    match out.strip_prefix('_') {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => out,
    }
}

/// Escape an identifier that collides with a Rust keyword.
///
/// The name itself is kept: `type` becomes `r#type`. Keywords that cannot
/// be raw identifiers get a trailing underscore instead.
pub fn escape_keyword(ident: &str) -> String {
    if RAW_KEYWORDS.contains(&ident) {
        format!("r#{}", ident)
    } else if PATH_KEYWORDS.contains(&ident) {
        format!("{}_", ident)
    } else {
        ident.to_string()
    }
}

/// Normalize a raw member name into a usable Rust field identifier
pub fn field_ident(raw: &str) -> String {
    escape_keyword(&normalize_field_name(raw))
}
