//! Helpers shared by the daily challenges: reading input and splitting lines.

use std::{
    fs,
    io::{self, Read},
    str::FromStr,
};

use anyhow::Context;

use crate::error::ParseError;

/// Reads the whole puzzle input, from `file` if given or from stdin otherwise.
pub fn read_input(file: Option<&str>) -> anyhow::Result<String> {
    match file {
        Some(path) => {
            log::info!("reading input from {path}");
            fs::read_to_string(path).with_context(|| format!("failed to read input file {path:?}"))
        }
        None => {
            log::info!("reading input from stdin");
            let mut buf = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut buf)
                .context("failed to read input from stdin")?;
            Ok(buf)
        }
    }
}

/// Splits `line` around the first occurrence of `separator`.
pub fn split_once<'a>(line: &'a str, separator: &str) -> Result<(&'a str, &'a str), ParseError> {
    line.split_once(separator)
        .ok_or_else(|| ParseError::MissingSeparator {
            line: line.to_owned(),
            separator: separator.to_owned(),
        })
}

pub fn parse_number<T>(token: &str) -> Result<T, ParseError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    let token = token.trim();
    token.parse().map_err(|source| ParseError::InvalidNumber {
        token: token.to_owned(),
        source,
    })
}

/// Parses a whitespace-separated list of integers. Runs of spaces are fine.
pub fn parse_numbers<T>(text: &str) -> Result<Vec<T>, ParseError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    text.split_whitespace().map(parse_number).collect()
}
