//! Parser for CDL, the text form of a netCDF file printed by `ncdump`.
//!
//! Only what a thermal model needs is understood: dimensions, numeric
//! variables, the packing attributes (`scale_factor`, `add_offset`,
//! `_FillValue`, `missing_value`) and the data section. Character and string
//! variables are skipped; groups and user-defined types are not supported.
//!
//! ```text
//! netcdf model {
//! dimensions:
//!     depth = 3 ;
//! variables:
//!     double depth(depth) ;
//!         depth:units = "km" ;
//! data:
//!
//!  depth = 0, 5, 10 ;
//! }
//! ```

use std::collections::HashMap;

use ctm_common::{RawDimension, RawGrid, RawVariable};
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};

const NUMERIC_TYPES: &[&str] = &[
    "byte", "ubyte", "short", "ushort", "int", "uint", "int64", "uint64", "float", "double",
    "long", "real",
];

/// Packing attributes applied to raw stored values.
#[derive(Debug, Clone, Default)]
struct Packing {
    scale_factor: Option<f64>,
    add_offset: Option<f64>,
    fill_value: Option<f64>,
    missing_value: Option<f64>,
}

impl Packing {
    fn unpack(&self, raw: f64) -> f64 {
        if raw.is_nan() || self.fill_value == Some(raw) || self.missing_value == Some(raw) {
            return f64::NAN;
        }
        raw * self.scale_factor.unwrap_or(1.0) + self.add_offset.unwrap_or(0.0)
    }
}

#[derive(Debug)]
struct Declaration {
    dimensions: Vec<String>,
    numeric: bool,
    packing: Packing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Types,
    Dimensions,
    Variables,
}

/// Parse a full CDL document (header and data section) into a raw grid.
///
/// Variables that are declared but have no data (e.g. `ncdump -v` restricted
/// the output) are left out of the result.
pub fn parse_cdl(text: &str) -> NetCdfResult<RawGrid> {
    let (header, data) = split_data_section(text);

    let mut dimensions = Vec::new();
    let mut declarations: HashMap<String, Declaration> = HashMap::new();
    let mut order = Vec::new();
    let mut section = Section::Preamble;

    for line in header.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") || trimmed == "}" {
            continue;
        }
        match trimmed {
            "dimensions:" => {
                section = Section::Dimensions;
                continue;
            }
            "variables:" => {
                section = Section::Variables;
                continue;
            }
            "types:" => {
                section = Section::Types;
                continue;
            }
            _ => {}
        }
        if trimmed.starts_with("group:") {
            return Err(NetCdfError::InvalidFormat(
                "netCDF-4 groups are not supported".to_string(),
            ));
        }

        match section {
            Section::Dimensions => dimensions.push(parse_dimension_line(trimmed)?),
            Section::Variables => {
                if let Some((var, attr, value)) = split_attribute(trimmed) {
                    // Global attributes have no variable prefix
                    if var.is_empty() {
                        continue;
                    }
                    if let Some(decl) = declarations.get_mut(var) {
                        apply_attribute(&mut decl.packing, attr, value);
                    }
                } else if starts_with_type(trimmed) {
                    let (name, decl) = parse_declaration(trimmed)?;
                    order.push(name.clone());
                    declarations.insert(name, decl);
                } else {
                    // Continuation of a multi-line attribute value
                    continue;
                }
            }
            Section::Preamble | Section::Types => {}
        }
    }

    let mut values_by_name: HashMap<String, Vec<f64>> = HashMap::new();
    if let Some(data) = data {
        for statement in split_statements(data) {
            let Some((name, body)) = statement.split_once('=') else {
                continue;
            };
            let name = name.trim();
            let Some(decl) = declarations.get(name) else {
                return Err(NetCdfError::InvalidFormat(format!(
                    "data for undeclared variable '{}'",
                    name
                )));
            };
            if !decl.numeric {
                debug!(variable = %name, "Skipping non-numeric variable");
                continue;
            }
            let values = parse_values(name, body, &decl.packing)?;
            values_by_name.insert(name.to_string(), values);
        }
    }

    let mut grid = RawGrid {
        dimensions,
        variables: Vec::new(),
    };
    for name in order {
        if let (Some(values), Some(decl)) = (values_by_name.remove(&name), declarations.remove(&name)) {
            grid.variables.push(RawVariable {
                name,
                dimensions: decl.dimensions,
                values,
            });
        }
    }

    grid.validate()
        .map_err(|e| NetCdfError::InvalidFormat(e.to_string()))?;

    debug!(
        dimensions = grid.dimensions.len(),
        variables = grid.variables.len(),
        "Parsed CDL document"
    );

    Ok(grid)
}

/// Split the document at the `data:` line; the data part excludes the closing brace.
fn split_data_section(text: &str) -> (&str, Option<&str>) {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim() == "data:" {
            let header = &text[..offset];
            let rest = &text[offset + line.len()..];
            let rest = match rest.rfind('}') {
                Some(end) => &rest[..end],
                None => rest,
            };
            return (header, Some(rest));
        }
        offset += line.len();
    }
    (text, None)
}

/// Parse `name = 12 ;` or `time = UNLIMITED ; // (5 currently)`.
fn parse_dimension_line(line: &str) -> NetCdfResult<RawDimension> {
    let (name, rest) = line
        .split_once('=')
        .ok_or_else(|| NetCdfError::InvalidFormat(format!("bad dimension line '{}'", line)))?;
    let name = name.trim().to_string();
    let (value, comment) = match rest.split_once(';') {
        Some((v, c)) => (v.trim(), c),
        None => (rest.trim(), ""),
    };

    let len = if value.eq_ignore_ascii_case("UNLIMITED") {
        // ncdump reports the current length in a trailing comment
        comment
            .split_once('(')
            .and_then(|(_, tail)| tail.split_whitespace().next())
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    } else {
        value.parse().map_err(|_| {
            NetCdfError::InvalidFormat(format!("Failed to parse dimension {}", name))
        })?
    };

    Ok(RawDimension { name, len })
}

/// Split `var:attr = value ;` into its parts. Returns None for declarations.
fn split_attribute(line: &str) -> Option<(&str, &str, &str)> {
    let (lhs, rhs) = line.split_once('=')?;
    let (var, attr) = lhs.split_once(':')?;
    Some((var.trim(), attr.trim(), rhs.trim().trim_end_matches(';').trim()))
}

fn starts_with_type(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .map(|t| NUMERIC_TYPES.contains(&t) || t == "char" || t == "string")
        .unwrap_or(false)
}

/// Parse `double temperature(longitude, latitude, depth) ;`.
fn parse_declaration(line: &str) -> NetCdfResult<(String, Declaration)> {
    let line = line.trim_end_matches(';').trim();
    let (var_type, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| NetCdfError::InvalidFormat(format!("bad variable declaration '{}'", line)))?;
    let rest = rest.trim();

    let (name, dimensions) = match rest.split_once('(') {
        Some((name, dims)) => {
            let dims = dims.trim_end().trim_end_matches(')');
            let dims = dims
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
            (name.trim().to_string(), dims)
        }
        None => (rest.to_string(), Vec::new()),
    };

    Ok((
        name,
        Declaration {
            dimensions,
            numeric: NUMERIC_TYPES.contains(&var_type),
            packing: Packing::default(),
        },
    ))
}

fn apply_attribute(packing: &mut Packing, attr: &str, value: &str) {
    // Multi-valued attributes keep their first entry
    let first = value.split(',').next().unwrap_or("");
    let parsed = parse_number(first);
    match attr {
        "scale_factor" => packing.scale_factor = parsed,
        "add_offset" => packing.add_offset = parsed,
        "_FillValue" => packing.fill_value = parsed,
        "missing_value" => packing.missing_value = parsed,
        _ => {}
    }
}

/// Split the data section on `;` outside quoted strings, dropping `//` comments.
fn split_statements(data: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for line in data.lines() {
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '"' => {
                    in_quotes = !in_quotes;
                    current.push(c);
                }
                '\\' if in_quotes => {
                    current.push(c);
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                '/' if !in_quotes && chars.peek() == Some(&'/') => break,
                ';' if !in_quotes => {
                    statements.push(std::mem::take(&mut current));
                }
                _ => current.push(c),
            }
        }
        current.push(' ');
    }
    if !current.trim().is_empty() {
        statements.push(current);
    }
    statements
}

fn parse_values(name: &str, body: &str, packing: &Packing) -> NetCdfResult<Vec<f64>> {
    let mut values = Vec::new();
    for token in body.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        // `_` marks a fill value in ncdump output
        if token == "_" {
            values.push(f64::NAN);
            continue;
        }
        let raw = parse_number(token).ok_or_else(|| {
            NetCdfError::InvalidFormat(format!("Failed to parse value '{}' of {}", token, name))
        })?;
        values.push(packing.unpack(raw));
    }
    Ok(values)
}

/// Parse a CDL numeric literal, tolerating type suffixes (`1.5f`, `3s`, `7UL`).
pub(crate) fn parse_number(token: &str) -> Option<f64> {
    let lower = token.trim().to_ascii_lowercase();
    let negative = lower.starts_with('-');
    let unsigned = lower.trim_start_matches(|c| c == '+' || c == '-');
    if unsigned.starts_with("nan") {
        return Some(f64::NAN);
    }
    if unsigned.starts_with("inf") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }
    let core = lower.trim_end_matches(|c| matches!(c, 'f' | 'd' | 's' | 'b' | 'l' | 'u'));
    core.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_suffixes() {
        assert_eq!(parse_number("1.5f"), Some(1.5));
        assert_eq!(parse_number("-999.f"), Some(-999.0));
        assert_eq!(parse_number("1.e+30"), Some(1.0e30));
        assert_eq!(parse_number("12s"), Some(12.0));
        assert_eq!(parse_number("7UL"), Some(7.0));
        assert!(parse_number("NaNf").unwrap().is_nan());
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_unlimited_dimension() {
        let dim = parse_dimension_line("time = UNLIMITED ; // (5 currently)").unwrap();
        assert_eq!(dim.name, "time");
        assert_eq!(dim.len, 5);
    }

    #[test]
    fn test_declaration() {
        let (name, decl) = parse_declaration("float temperature(longitude, latitude, depth) ;").unwrap();
        assert_eq!(name, "temperature");
        assert_eq!(decl.dimensions, vec!["longitude", "latitude", "depth"]);
        assert!(decl.numeric);

        let (name, decl) = parse_declaration("char crs_wkt ;").unwrap();
        assert_eq!(name, "crs_wkt");
        assert!(decl.dimensions.is_empty());
        assert!(!decl.numeric);
    }

    #[test]
    fn test_packing_applied() {
        let cdl = "netcdf packed {\n\
                   dimensions:\n\
                   \tx = 3 ;\n\
                   variables:\n\
                   \tdouble x(x) ;\n\
                   \tshort t(x) ;\n\
                   \t\tt:scale_factor = 0.5 ;\n\
                   \t\tt:add_offset = 10. ;\n\
                   \t\tt:_FillValue = -1s ;\n\
                   data:\n\
                   \n x = 0, 1, 2 ;\n\
                   \n t = 4, -1, _ ;\n\
                   }\n";
        let grid = parse_cdl(cdl).unwrap();
        let t = grid.variable("t").unwrap();
        assert_eq!(t.values[0], 12.0);
        assert!(t.values[1].is_nan());
        assert!(t.values[2].is_nan());
    }

    #[test]
    fn test_statements_ignore_comments_and_quoted_semicolons() {
        let statements = split_statements(" a = 1, 2 ; // a(0:1)\n name = \"x;y\" ;\n");
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("a = 1, 2"));
        assert!(statements[1].contains("\"x;y\""));
    }

    #[test]
    fn test_header_only_document() {
        let cdl = "netcdf h {\ndimensions:\n\tx = 2 ;\nvariables:\n\tdouble x(x) ;\n}\n";
        let grid = parse_cdl(cdl).unwrap();
        assert_eq!(grid.dimensions.len(), 1);
        assert!(grid.variables.is_empty());
    }
}
