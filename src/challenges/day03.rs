use std::collections::HashMap;

use crate::{error::ParseError, input};

/// A maximal run of digits on one row.
#[derive(Debug, PartialEq, Eq)]
struct Number {
    row: usize,
    start: usize,
    end: usize,
    value: u64,
}

struct Schematic {
    rows: Vec<Vec<u8>>,
}

fn is_symbol(b: u8) -> bool {
    b != b'.' && !b.is_ascii_digit()
}

impl Schematic {
    fn parse(input: &str) -> Self {
        Schematic {
            rows: input
                .lines()
                .map(str::trim_end)
                .filter(|l| !l.is_empty())
                .map(|l| l.bytes().collect())
                .collect(),
        }
    }

    fn numbers(&self) -> Result<Vec<Number>, ParseError> {
        let mut numbers = Vec::new();
        for (row, line) in self.rows.iter().enumerate() {
            let mut col = 0;
            while col < line.len() {
                if !line[col].is_ascii_digit() {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < line.len() && line[col].is_ascii_digit() {
                    col += 1;
                }
                // the run is pure ASCII digits
                let repr = std::str::from_utf8(&line[start..col]).unwrap_or_default();
                numbers.push(Number {
                    row,
                    start,
                    end: col,
                    value: input::parse_number(repr)?,
                });
            }
        }
        Ok(numbers)
    }

    /// Symbols touching `number`, including diagonally.
    fn adjacent_symbols<'a>(
        &'a self,
        number: &'a Number,
    ) -> impl Iterator<Item = (usize, usize, u8)> + 'a {
        let rows = number.row.saturating_sub(1)..=number.row + 1;
        rows.filter_map(move |r| self.rows.get(r).map(|line| (r, line)))
            .flat_map(move |(r, line)| {
                let cols = number.start.saturating_sub(1)..(number.end + 1).min(line.len());
                cols.map(move |c| (r, c, line[c]))
            })
            .filter(|&(_, _, b)| is_symbol(b))
    }
}

fn part_numbers_sum(schematic: &Schematic) -> Result<u64, ParseError> {
    let mut sum = 0;
    for number in schematic.numbers()? {
        if schematic.adjacent_symbols(&number).next().is_some() {
            log::trace!(
                "part number {} at ({}, {})",
                number.value,
                number.row,
                number.start
            );
            sum += number.value;
        }
    }
    Ok(sum)
}

fn gear_ratios_sum(schematic: &Schematic) -> Result<u64, ParseError> {
    let mut gears: HashMap<(usize, usize), Vec<u64>> = HashMap::new();
    for number in schematic.numbers()? {
        for (r, c, b) in schematic.adjacent_symbols(&number) {
            if b == b'*' {
                gears.entry((r, c)).or_default().push(number.value);
            }
        }
    }
    Ok(gears
        .into_iter()
        .filter_map(|(pos, parts)| match parts[..] {
            [a, b] => {
                log::trace!("gear at {pos:?}: {a} * {b}");
                Some(a * b)
            }
            _ => None,
        })
        .sum())
}

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Puzzle input, read from stdin when omitted
    file: Option<String>,
    /// Sum the gear ratios instead
    #[arg(long)]
    part2: bool,
}

pub fn entrypoint(args: &Args) -> anyhow::Result<()> {
    let schematic = Schematic::parse(&input::read_input(args.file.as_deref())?);
    if args.part2 {
        println!("Sum of the gear ratios : {}", gear_ratios_sum(&schematic)?);
    } else {
        println!("Sum of the part numbers : {}", part_numbers_sum(&schematic)?);
    }
    Ok(())
}
