//! Parsing of type name spellings
//!
//! Array types are written either in source form (`int[][]`, `String[]`) or in
//! descriptor form (`[[I`, `[Ljava.lang.String;`). Both forms parse to the same
//! element and depth.

use super::Primitive;
use crate::consts::NESTED_SEPARATOR;
use crate::error::{Error, Result};

/// Element of an array spelling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementSpelling {
    Primitive(Primitive),
    /// Class name still to be resolved
    Named(String),
}

/// Parse an array spelling into its element and depth.
///
/// Returns `Ok(None)` when the spelling carries no brackets at all.
pub fn parse_array(spelling: &str) -> Result<Option<(ElementSpelling, usize)>> {
    let spelling = spelling.trim();
    if !spelling.contains(['[', ']']) {
        return Ok(None);
    }

    if spelling.starts_with('[') {
        parse_descriptor(spelling).map(Some)
    } else {
        parse_source_form(spelling).map(Some)
    }
}

fn parse_source_form(spelling: &str) -> Result<(ElementSpelling, usize)> {
    let mut rest = spelling;
    let mut dims = 0;
    while let Some(stripped) = rest.strip_suffix(']') {
        let stripped = stripped.trim_end();
        rest = stripped
            .strip_suffix('[')
            .ok_or_else(|| Error::malformed_type_name(spelling, "unbalanced brackets"))?
            .trim_end();
        dims += 1;
    }

    if rest.contains(['[', ']']) {
        return Err(Error::malformed_type_name(spelling, "brackets inside the element name"));
    }
    if rest.is_empty() {
        return Err(Error::malformed_type_name(spelling, "missing element type"));
    }
    if dims == 0 {
        return Err(Error::malformed_type_name(spelling, "unterminated brackets"));
    }

    match Primitive::from_keyword(rest) {
        Some(Primitive::Void) => Err(Error::malformed_type_name(spelling, "array of void")),
        Some(primitive) => Ok((ElementSpelling::Primitive(primitive), dims)),
        None => Ok((ElementSpelling::Named(rest.to_string()), dims)),
    }
}

fn parse_descriptor(spelling: &str) -> Result<(ElementSpelling, usize)> {
    let dims = spelling.chars().take_while(|c| *c == '[').count();
    let element = &spelling[dims..];

    let mut chars = element.chars();
    match (chars.next(), chars.as_str()) {
        (Some('L'), rest) => {
            let name = rest
                .strip_suffix(';')
                .ok_or_else(|| Error::malformed_type_name(spelling, "class descriptor without ';'"))?;
            if name.is_empty() || name.contains(['[', ']', ';']) {
                return Err(Error::malformed_type_name(spelling, "invalid class descriptor"));
            }
            Ok((ElementSpelling::Named(name.replace('/', ".")), dims))
        }
        (Some(c), "") => match Primitive::from_descriptor(c) {
            Some(Primitive::Void) | None => {
                Err(Error::malformed_type_name(spelling, format!("invalid element descriptor '{}'", c)))
            }
            Some(primitive) => Ok((ElementSpelling::Primitive(primitive), dims)),
        },
        _ => Err(Error::malformed_type_name(spelling, "missing element type")),
    }
}

/// True when some `$`-separated segment is all digits (`Outer$1`, `A$2$B`)
pub fn is_anonymous_spelling(name: &str) -> bool {
    name.split(NESTED_SEPARATOR)
        .skip(1)
        .any(|segment| {
            let digits = segment.split('.').next().unwrap_or("");
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        })
}

/// Progressive mangling: each entry replaces one more trailing `.` with `$`.
///
/// `a.b.C.D` yields `a.b.C$D`, `a.b$C$D`, `a$b$C$D`.
pub fn mangled_variants(name: &str) -> Vec<String> {
    let mut variants = Vec::new();
    let mut current = name.to_string();
    while let Some(dot) = current.rfind('.') {
        current.replace_range(dot..dot + 1, "$");
        variants.push(current.clone());
    }
    variants
}

/// Replace every `.` with `$`
pub fn mangle_all(name: &str) -> String {
    name.replace('.', &NESTED_SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_and_descriptor_forms_agree() {
        let source = parse_array("int[][]").unwrap();
        let descriptor = parse_array("[[I").unwrap();
        assert_eq!(source, descriptor);
        assert_eq!(source, Some((ElementSpelling::Primitive(Primitive::Int), 2)));

        assert_eq!(
            parse_array("[Ljava.lang.String;").unwrap(),
            Some((ElementSpelling::Named("java.lang.String".into()), 1))
        );
        assert_eq!(
            parse_array("[Ljava/util/Map$Entry;").unwrap(),
            Some((ElementSpelling::Named("java.util.Map$Entry".into()), 1))
        );
        assert_eq!(
            parse_array("String [ ]").unwrap(),
            Some((ElementSpelling::Named("String".into()), 1))
        );
    }

    #[test]
    fn non_arrays_are_not_parsed() {
        assert_eq!(parse_array("java.util.List").unwrap(), None);
    }

    #[test]
    fn malformed_brackets_are_rejected() {
        for bad in ["int[", "int]", "int[]]", "[]", "a[b]", "[", "[Lfoo", "[Q", "[V", "void[]", "[L;"] {
            assert!(
                matches!(parse_array(bad), Err(Error::MalformedTypeName { .. })),
                "{bad} should be malformed"
            );
        }
    }

    #[test]
    fn anonymous_spellings() {
        assert!(is_anonymous_spelling("Outer$1"));
        assert!(is_anonymous_spelling("p.Outer$12$Inner"));
        assert!(!is_anonymous_spelling("p.Outer$Inner"));
        assert!(!is_anonymous_spelling("p.Outer$1Local"));
        assert!(!is_anonymous_spelling("Outer"));
    }

    #[test]
    fn mangling_moves_right_to_left() {
        assert_eq!(mangled_variants("a.b.C.D"), vec!["a.b.C$D", "a.b$C$D", "a$b$C$D"]);
        assert!(mangled_variants("Plain").is_empty());
        assert_eq!(mangle_all("Map.Entry"), "Map$Entry");
    }
}
