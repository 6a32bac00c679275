// Mapping override parser
//
// Format: role: target, role: target, ...
// Roles: x, y, z, color, size, category
// Targets: identifier, "quoted column name", index, count

use super::ast::{Binding, MappingOverride, RoleName, Target};
use super::lexer::{identifier, string_literal, ws};
use anyhow::{anyhow, Result};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{eof, map, value},
    multi::separated_list1,
    sequence::separated_pair,
    IResult,
};

fn parse_role(input: &str) -> IResult<&str, RoleName> {
    alt((
        value(RoleName::Color, tag("color")),
        value(RoleName::Category, tag("category")),
        value(RoleName::Size, tag("size")),
        value(RoleName::X, tag("x")),
        value(RoleName::Y, tag("y")),
        value(RoleName::Z, tag("z")),
    ))(input)
}

fn parse_target(input: &str) -> IResult<&str, Target> {
    alt((
        // Quoted names are always columns, even "index" or "count"
        map(string_literal, Target::Column),
        map(identifier, |ident| match ident.as_str() {
            "index" => Target::Index,
            "count" => Target::Count,
            _ => Target::Column(ident),
        }),
    ))(input)
}

fn parse_binding(input: &str) -> IResult<&str, Binding> {
    map(
        separated_pair(ws(parse_role), char(':'), ws(parse_target)),
        |(role, target)| Binding { role, target },
    )(input)
}

/// Parse a complete override expression, requiring all input to be consumed
pub fn parse_mapping_override(input: &str) -> IResult<&str, MappingOverride> {
    let (input, bindings) = separated_list1(ws(char(',')), parse_binding)(input)?;
    let (input, _) = ws(eof)(input)?;
    Ok((input, MappingOverride { bindings }))
}

/// Parse an override expression into an owned result with a readable error
pub fn parse_mapping(input: &str) -> Result<MappingOverride> {
    match parse_mapping_override(input) {
        Ok((_, overrides)) => Ok(overrides),
        Err(e) => Err(anyhow!("invalid mapping expression '{}': {}", input, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> Target {
        Target::Column(name.to_string())
    }

    #[test]
    fn test_parse_single_binding() {
        let overrides = parse_mapping("x: price").unwrap();
        assert_eq!(
            overrides.bindings,
            vec![Binding { role: RoleName::X, target: column("price") }]
        );
    }

    #[test]
    fn test_parse_all_roles() {
        let overrides = parse_mapping("x: a, y: b, z: c, color: d, size: e, category: f").unwrap();
        let roles: Vec<RoleName> = overrides.bindings.iter().map(|b| b.role).collect();
        assert_eq!(
            roles,
            vec![
                RoleName::X,
                RoleName::Y,
                RoleName::Z,
                RoleName::Color,
                RoleName::Size,
                RoleName::Category
            ]
        );
    }

    #[test]
    fn test_parse_sentinels() {
        let overrides = parse_mapping("y: index, size: count").unwrap();
        assert_eq!(overrides.bindings[0].target, Target::Index);
        assert_eq!(overrides.bindings[1].target, Target::Count);
    }

    #[test]
    fn test_quoted_names() {
        let overrides = parse_mapping(r#"x: "Unit Price", y: "index""#).unwrap();
        assert_eq!(overrides.bindings[0].target, column("Unit Price"));
        assert_eq!(overrides.bindings[1].target, column("index"));
    }

    #[test]
    fn test_whitespace_tolerated() {
        let overrides = parse_mapping("  color :temp ,size:  rain  ").unwrap();
        assert_eq!(overrides.bindings.len(), 2);
        assert_eq!(overrides.bindings[1].target, column("rain"));
    }

    #[test]
    fn test_unknown_role() {
        assert!(parse_mapping("w: a").is_err());
        assert!(parse_mapping("xx: a").is_err());
    }

    #[test]
    fn test_malformed() {
        assert!(parse_mapping("").is_err());
        assert!(parse_mapping("x a").is_err());
        assert!(parse_mapping("x: a,").is_err());
        assert!(parse_mapping("x: a,, y: b").is_err());
        assert!(parse_mapping("x: \"open").is_err());
    }
}
