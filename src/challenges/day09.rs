use itertools::Itertools;

use crate::{
    error::ParseError,
    input::{self, parse_numbers},
};

fn overflow(values: &[i64]) -> ParseError {
    ParseError::InvalidFormat(format!("history {values:?} overflows i64"))
}

/// Rows of successive differences, down to the first constant row.
fn difference_rows(values: &[i64]) -> Result<Vec<Vec<i64>>, ParseError> {
    let mut rows = vec![values.to_vec()];
    while let Some(last) = rows.last() {
        if last.iter().all_equal() {
            break;
        }
        let next = last
            .iter()
            .tuple_windows()
            .map(|(a, b)| b.checked_sub(*a).ok_or_else(|| overflow(values)))
            .collect::<Result<_, _>>()?;
        rows.push(next);
    }
    Ok(rows)
}

fn extrapolate_next(values: &[i64]) -> Result<i64, ParseError> {
    difference_rows(values)?
        .iter()
        .filter_map(|row| row.last())
        .try_fold(0i64, |acc, &last| acc.checked_add(last))
        .ok_or_else(|| overflow(values))
}

fn extrapolate_previous(values: &[i64]) -> Result<i64, ParseError> {
    difference_rows(values)?
        .iter()
        .rev()
        .filter_map(|row| row.first())
        .try_fold(0i64, |below, &first| first.checked_sub(below))
        .ok_or_else(|| overflow(values))
}

fn parse(input: &str) -> Result<Vec<Vec<i64>>, ParseError> {
    input
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(parse_numbers)
        .collect()
}

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Puzzle input, read from stdin when omitted
    file: Option<String>,
    /// Extrapolate backwards
    #[arg(long)]
    part2: bool,
}

pub fn entrypoint(args: &Args) -> anyhow::Result<()> {
    let histories = parse(&input::read_input(args.file.as_deref())?)?;
    let extrapolate = if args.part2 { extrapolate_previous } else { extrapolate_next };
    let sum = histories.iter().try_fold(0i64, |acc, h| {
        let value = extrapolate(h)?;
        log::debug!("{h:?} -> {value}");
        acc.checked_add(value)
            .ok_or_else(|| ParseError::InvalidFormat("sum of extrapolated values overflows i64".to_owned()))
    })?;
    if args.part2 {
        println!("Sum of the previous values : {sum}");
    } else {
        println!("Sum of the next values : {sum}");
    }
    Ok(())
}
