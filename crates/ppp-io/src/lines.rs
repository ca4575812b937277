//! Line scanning shared by both grammars

use crate::ParseError;
use ppp_core::Point;
use std::str::FromStr;

/// A non-comment line split into whitespace tokens.
pub(crate) struct Record<'a> {
    pub line: usize,
    pub tokens: Vec<&'a str>,
}

/// Lines that are neither blank nor comments, numbered from 1.
pub(crate) fn records(content: &str) -> impl Iterator<Item = Record<'_>> {
    content.lines().enumerate().filter_map(|(i, raw)| {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        match tokens.first() {
            None => None,
            Some(first) if first.starts_with('#') => None,
            Some(_) => Some(Record {
                line: i + 1,
                tokens,
            }),
        }
    })
}

impl Record<'_> {
    pub fn number<T: FromStr>(&self, index: usize, field: &'static str) -> Result<T, ParseError> {
        let token = self
            .tokens
            .get(index)
            .ok_or(ParseError::MissingCoordinate { line: self.line })?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            line: self.line,
            field,
            token: token.to_string(),
        })
    }

    pub fn point(&self) -> Result<Point, ParseError> {
        if self.tokens.len() < 2 {
            return Err(ParseError::MissingCoordinate { line: self.line });
        }
        Ok(Point::new(self.number(0, "x")?, self.number(1, "y")?))
    }
}

/// Next record, or [`ParseError::Missing`] naming what was expected.
pub(crate) fn next_record<'a>(
    records: &mut impl Iterator<Item = Record<'a>>,
    what: &'static str,
) -> Result<Record<'a>, ParseError> {
    records.next().ok_or(ParseError::Missing(what))
}
