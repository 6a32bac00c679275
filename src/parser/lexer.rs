// Shared token parsers

use nom::{
    bytes::complete::{is_not, take_while},
    character::complete::{char, multispace0, satisfy},
    combinator::recognize,
    error::ParseError,
    sequence::{delimited, pair},
    IResult,
};

/// Wrap a parser so that it skips surrounding whitespace
pub fn ws<'a, F, O, E>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, E>,
    E: ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

/// Bare column identifier: a letter or underscore, then letters, digits, `_`, `.` or `-`
pub fn identifier(input: &str) -> IResult<&str, String> {
    let (input, ident) = recognize(pair(
        satisfy(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '.' || c == '-'),
    ))(input)?;
    Ok((input, ident.to_string()))
}

/// Double-quoted, non-empty string without escapes
pub fn string_literal(input: &str) -> IResult<&str, String> {
    let (input, s) = delimited(char('"'), is_not("\""), char('"'))(input)?;
    Ok((input, s.to_string()))
}
