use crate::{
    error::ParseError,
    input::{self, parse_number, parse_numbers, split_once},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Race {
    duration: u64,
    record: u64,
}

impl Race {
    /// Holding the button for `hold` ms travels `hold * (duration - hold)` mm.
    fn beats_record(&self, hold: u64) -> bool {
        hold <= self.duration
            && u128::from(hold) * u128::from(self.duration - hold) > u128::from(self.record)
    }

    /// Number of hold times that travel strictly further than the record.
    ///
    /// The distance is the parabola `f(t) = t (T - t)`, symmetric around
    /// `T / 2`. Its roots against the record are `(T ± sqrt(T² - 4R)) / 2`;
    /// the float estimate of the lower one is then nudged onto the exact
    /// integer boundary.
    fn ways_to_win(&self) -> u64 {
        let peak = self.duration / 2;
        if !self.beats_record(peak) {
            return 0;
        }
        let t = self.duration as f64;
        let delta = t * t - 4.0 * self.record as f64;
        let estimate = ((t - delta.max(0.0).sqrt()) / 2.0).floor().max(0.0) as u64;

        let mut lowest = estimate.min(peak);
        while !self.beats_record(lowest) {
            lowest += 1;
        }
        while lowest > 0 && self.beats_record(lowest - 1) {
            lowest -= 1;
        }
        let highest = self.duration - lowest;
        highest - lowest + 1
    }
}

fn values<'a>(line: Option<&'a str>, label: &str) -> Result<&'a str, ParseError> {
    let line = line.ok_or_else(|| ParseError::MissingData(format!("no {label} line")))?;
    Ok(split_once(line, ":")?.1)
}

fn parse(input: &str, kerning: bool) -> Result<Vec<Race>, ParseError> {
    let mut lines = input.lines().filter(|l| !l.trim().is_empty());
    let times = values(lines.next(), "Time")?;
    let distances = values(lines.next(), "Distance")?;

    if kerning {
        let join = |s: &str| s.split_whitespace().collect::<String>();
        return Ok(vec![Race {
            duration: parse_number(&join(times))?,
            record: parse_number(&join(distances))?,
        }]);
    }

    let times: Vec<u64> = parse_numbers(times)?;
    let distances: Vec<u64> = parse_numbers(distances)?;
    if times.len() != distances.len() {
        return Err(ParseError::InvalidFormat(format!(
            "{} times but {} distances",
            times.len(),
            distances.len()
        )));
    }
    Ok(times
        .into_iter()
        .zip(distances)
        .map(|(duration, record)| Race { duration, record })
        .collect())
}

fn ways_to_win_product(races: &[Race]) -> u64 {
    races
        .iter()
        .map(|race| {
            let wins = race.ways_to_win();
            log::info!(
                "Race (d={}ms, r={}mm) => {wins}",
                race.duration,
                race.record
            );
            wins
        })
        .product()
}

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Puzzle input, read from stdin when omitted
    file: Option<String>,
    /// Ignore the spaces between numbers: there is only one race
    #[arg(long)]
    part2: bool,
}

pub fn entrypoint(args: &Args) -> anyhow::Result<()> {
    let races = parse(&input::read_input(args.file.as_deref())?, args.part2)?;
    println!(
        "Product of the numbers of ways to win : {}",
        ways_to_win_product(&races)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "Time:      7  15   30\nDistance:  9  40  200\n";

    #[test]
    fn sample_part1() {
        let races = parse(SAMPLE, false).unwrap();
        assert_eq!(
            races.iter().map(Race::ways_to_win).collect::<Vec<_>>(),
            vec![4, 8, 9]
        );
        assert_eq!(ways_to_win_product(&races), 288);
    }

    #[test]
    fn sample_part2() {
        let races = parse(SAMPLE, true).unwrap();
        assert_eq!(
            races,
            vec![Race {
                duration: 71530,
                record: 940200
            }]
        );
        assert_eq!(ways_to_win_product(&races), 71503);
    }

    #[test]
    fn touching_the_record_is_not_a_win() {
        // best distance is exactly 9
        assert_eq!(Race { duration: 6, record: 9 }.ways_to_win(), 0);
        assert_eq!(Race { duration: 6, record: 8 }.ways_to_win(), 1);
        assert_eq!(Race { duration: 3, record: 5 }.ways_to_win(), 0);
    }

    #[test]
    fn large_race_is_exact() {
        let race = Race {
            duration: 40_929_790,
            record: 215_106_415_051_100,
        };
        let brute = (0..=race.duration).filter(|&t| race.beats_record(t)).count() as u64;
        assert_eq!(race.ways_to_win(), brute);
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        assert!(matches!(
            parse("Time: 1 2\nDistance: 3\n", false),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse("Time: 1 2\n", false),
            Err(ParseError::MissingData(_))
        ));
    }

    proptest! {
        #[test]
        fn closed_form_matches_counting(duration in 0u64..200, record in 0u64..10_000) {
            let race = Race { duration, record };
            let brute = (0..=duration).filter(|&t| race.beats_record(t)).count() as u64;
            prop_assert_eq!(race.ways_to_win(), brute);
        }
    }
}
