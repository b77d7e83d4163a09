use crate::{error::ParseError, input};

const SPELLED_DIGITS: [&str; 9] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// Digit starting at byte `pos` of `line`, if any.
fn digit_at(line: &str, pos: usize, spelled: bool) -> Option<u32> {
    let rest = &line[pos..];
    let first = rest.chars().next()?;
    if let Some(d) = first.to_digit(10) {
        return Some(d);
    }
    if !spelled {
        return None;
    }
    SPELLED_DIGITS
        .iter()
        .position(|word| rest.starts_with(word))
        .map(|i| i as u32 + 1)
}

fn calibration_value(line: &str, spelled: bool) -> Result<u32, ParseError> {
    // spellings overlap ("eightwo"), so every offset is a candidate
    let mut digits = line
        .char_indices()
        .filter_map(|(pos, _)| digit_at(line, pos, spelled));
    let first = digits
        .next()
        .ok_or_else(|| ParseError::MissingData(format!("no digit in line {line:?}")))?;
    let last = digits.last().unwrap_or(first);
    Ok(first * 10 + last)
}

fn calibration_sum(input: &str, spelled: bool) -> Result<u64, ParseError> {
    let mut total = 0;
    for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let value = calibration_value(line, spelled)?;
        log::debug!("{line} => {value}");
        total += u64::from(value);
    }
    Ok(total)
}

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Puzzle input, read from stdin when omitted
    file: Option<String>,
    /// Also count digits spelled out with letters
    #[arg(long)]
    part2: bool,
}

pub fn entrypoint(args: &Args) -> anyhow::Result<()> {
    let input = input::read_input(args.file.as_deref())?;
    let total = calibration_sum(&input, args.part2)?;
    println!("Sum of the calibration values : {total}");
    Ok(())
}
