use std::ops::Range;

use itertools::Itertools;
use rayon::prelude::*;

use crate::{
    error::ParseError,
    input::{self, parse_numbers, split_once},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    source: u64,
    destination: u64,
    length: u64,
}

impl Entry {
    fn source_range(&self) -> Range<u64> {
        self.source..self.source + self.length
    }

    fn shift(&self, value: u64) -> u64 {
        self.destination + (value - self.source)
    }
}

/// One `x-to-y map:` section. The first entry containing a value wins;
/// values outside every entry map to themselves.
#[derive(Clone, Debug, Default)]
struct RangeMap {
    name: String,
    entries: Vec<Entry>,
}

impl RangeMap {
    fn get(&self, value: u64) -> u64 {
        self.entries
            .iter()
            .find(|e| e.source_range().contains(&value))
            .map_or(value, |e| e.shift(value))
    }

    /// Maps every value of `ranges` at once, splitting intervals at entry
    /// boundaries.
    fn map_ranges(&self, ranges: Vec<Range<u64>>) -> Vec<Range<u64>> {
        let mut pending = ranges;
        let mut mapped = Vec::new();
        for entry in &self.entries {
            let src = entry.source_range();
            let mut unmatched = Vec::new();
            for r in pending {
                let before = r.start..r.end.min(src.start);
                let inside = r.start.max(src.start)..r.end.min(src.end);
                let after = r.start.max(src.end)..r.end;
                if !inside.is_empty() {
                    let start = entry.shift(inside.start);
                    mapped.push(start..start + (inside.end - inside.start));
                }
                unmatched.extend([before, after].into_iter().filter(|r| !r.is_empty()));
            }
            pending = unmatched;
        }
        mapped.extend(pending);
        mapped
    }
}

#[derive(Debug)]
struct Almanac {
    seeds: Vec<u64>,
    maps: Vec<RangeMap>,
}

impl Almanac {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let mut lines = input.lines().map(str::trim).filter(|l| !l.is_empty());
        let seeds_line = lines
            .next()
            .ok_or_else(|| ParseError::MissingData("empty almanac".to_owned()))?;
        let (_, seeds) = split_once(seeds_line, ":")?;
        let seeds: Vec<u64> = parse_numbers(seeds)?;
        if seeds.is_empty() {
            return Err(ParseError::MissingData("no seeds".to_owned()));
        }

        let mut maps: Vec<RangeMap> = Vec::new();
        for line in lines {
            if let Some(name) = line.strip_suffix("map:") {
                maps.push(RangeMap {
                    name: name.trim().to_owned(),
                    entries: Vec::new(),
                });
                continue;
            }
            let Some(map) = maps.last_mut() else {
                return Err(ParseError::InvalidFormat(format!(
                    "entry {line:?} outside of any map"
                )));
            };
            let numbers: Vec<u64> = parse_numbers(line)?;
            let [destination, source, length] = numbers[..] else {
                return Err(ParseError::InvalidFormat(format!(
                    "expected 3 numbers in {line:?}"
                )));
            };
            if source.checked_add(length).is_none() || destination.checked_add(length).is_none() {
                return Err(ParseError::InvalidFormat(format!("entry {line:?} overflows")));
            }
            map.entries.push(Entry {
                source,
                destination,
                length,
            });
        }
        Ok(Almanac { seeds, maps })
    }

    fn location(&self, seed: u64) -> u64 {
        self.maps.iter().fold(seed, |value, map| map.get(value))
    }

    /// Seed values read as `(start, length)` pairs. Empty ranges are dropped.
    fn seed_ranges(&self) -> Result<Vec<Range<u64>>, ParseError> {
        if self.seeds.len() % 2 != 0 {
            return Err(ParseError::InvalidFormat(format!(
                "{} seed values can't be read as pairs",
                self.seeds.len()
            )));
        }
        self.seeds
            .chunks_exact(2)
            .map(|pair| {
                pair[0]
                    .checked_add(pair[1])
                    .map(|end| pair[0]..end)
                    .ok_or_else(|| ParseError::InvalidFormat(format!("seed range {pair:?} overflows")))
            })
            .filter_ok(|r| !r.is_empty())
            .collect()
    }
}

fn min_location(almanac: &Almanac) -> Result<u64, ParseError> {
    almanac
        .seeds
        .iter()
        .map(|&seed| {
            let location = almanac.location(seed);
            log::debug!("seed {seed} => location {location}");
            location
        })
        .min()
        .ok_or_else(|| ParseError::MissingData("no seeds".to_owned()))
}

fn min_location_of_ranges(almanac: &Almanac) -> Result<u64, ParseError> {
    let mut ranges = almanac.seed_ranges()?;
    for map in &almanac.maps {
        ranges = map.map_ranges(ranges);
        log::debug!("after {}: {} intervals", map.name, ranges.len());
    }
    ranges
        .iter()
        .map(|r| r.start)
        .min()
        .ok_or_else(|| ParseError::MissingData("all seed ranges are empty".to_owned()))
}

/// Tries every seed of every range in parallel.
fn min_location_brute_force(almanac: &Almanac) -> Result<u64, ParseError> {
    let ranges = almanac.seed_ranges()?;
    log::info!(
        "brute forcing {} seeds",
        ranges.iter().map(|r| r.end - r.start).sum::<u64>()
    );
    ranges
        .par_iter()
        .flat_map(|r| r.clone().into_par_iter())
        .map(|seed| almanac.location(seed))
        .min()
        .ok_or_else(|| ParseError::MissingData("all seed ranges are empty".to_owned()))
}

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Puzzle input, read from stdin when omitted
    file: Option<String>,
    /// Read the seeds as ranges
    #[arg(long)]
    part2: bool,
    /// Map every seed of the ranges one by one, in parallel
    #[arg(long, requires = "part2")]
    brute_force: bool,
}

pub fn entrypoint(args: &Args) -> anyhow::Result<()> {
    let almanac = Almanac::parse(&input::read_input(args.file.as_deref())?)?;
    let min = match (args.part2, args.brute_force) {
        (false, _) => min_location(&almanac)?,
        (true, false) => min_location_of_ranges(&almanac)?,
        (true, true) => min_location_brute_force(&almanac)?,
    };
    println!("Minimum location : {min}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "seeds: 79 14 55 13

seed-to-soil map:
50 98 2
52 50 48

soil-to-fertilizer map:
0 15 37
37 52 2
39 0 15

fertilizer-to-water map:
49 53 8
0 11 42
42 0 7
57 7 4

water-to-light map:
88 18 7
18 25 70

light-to-temperature map:
45 77 23
81 45 19
68 64 13

temperature-to-humidity map:
0 69 1
1 0 69

humidity-to-location map:
60 56 37
56 93 4
";

    #[test]
    fn sample_part1() {
        let almanac = Almanac::parse(SAMPLE).unwrap();
        assert_eq!(almanac.maps.len(), 7);
        assert_eq!(almanac.maps[0].name, "seed-to-soil");
        assert_eq!(
            almanac.seeds.iter().map(|&s| almanac.location(s)).collect::<Vec<_>>(),
            vec![82, 43, 86, 35]
        );
        assert_eq!(min_location(&almanac), Ok(35));
    }

    #[test]
    fn sample_part2() {
        let almanac = Almanac::parse(SAMPLE).unwrap();
        assert_eq!(min_location_of_ranges(&almanac), Ok(46));
        assert_eq!(min_location_brute_force(&almanac), Ok(46));
    }

    #[test]
    fn first_matching_entry_wins() {
        let map = RangeMap {
            name: "overlap".to_owned(),
            entries: vec![
                Entry {
                    source: 0,
                    destination: 100,
                    length: 10,
                },
                Entry {
                    source: 5,
                    destination: 200,
                    length: 10,
                },
            ],
        };
        assert_eq!(map.get(7), 107);
        assert_eq!(map.get(12), 207);
        assert_eq!(map.get(20), 20);
        let mut mapped = map.map_ranges(vec![3..13]);
        mapped.sort_by_key(|r| r.start);
        assert_eq!(mapped, vec![103..110, 205..208]);
    }

    #[test]
    fn odd_seed_count_cannot_form_ranges() {
        let almanac = Almanac::parse("seeds: 1 2 3\n\na-to-b map:\n0 1 1\n").unwrap();
        assert!(matches!(
            min_location_of_ranges(&almanac),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn empty_seed_ranges_are_skipped() {
        let almanac = Almanac::parse("seeds: 5 0 50 3\n\na-to-b map:\n").unwrap();
        assert_eq!(almanac.seed_ranges(), Ok(vec![50..53]));
        assert_eq!(min_location_of_ranges(&almanac), Ok(50));
        assert_eq!(min_location_brute_force(&almanac), Ok(50));

        let almanac = Almanac::parse("seeds: 5 0\n").unwrap();
        assert!(matches!(
            min_location_of_ranges(&almanac),
            Err(ParseError::MissingData(_))
        ));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        assert!(Almanac::parse("seeds: 1\n\n0 1 1\n").is_err());
        assert!(Almanac::parse("seeds: 1\n\na-to-b map:\n0 1\n").is_err());
        assert!(Almanac::parse("seeds:\n").is_err());
    }

    fn arb_map() -> impl Strategy<Value = RangeMap> {
        prop::collection::vec((0u64..60, 0u64..60, 0u64..15), 0..5).prop_map(|entries| RangeMap {
            name: "random".to_owned(),
            entries: entries
                .into_iter()
                .map(|(destination, source, length)| Entry {
                    source,
                    destination,
                    length,
                })
                .collect(),
        })
    }

    proptest! {
        #[test]
        fn interval_remapping_matches_brute_force(
            maps in prop::collection::vec(arb_map(), 0..4),
            seeds in prop::collection::vec((0u64..80, 0u64..20), 1..4),
        ) {
            let almanac = Almanac {
                seeds: seeds.iter().flat_map(|&(start, len)| [start, len]).collect(),
                maps,
            };
            prop_assert_eq!(
                min_location_of_ranges(&almanac),
                min_location_brute_force(&almanac)
            );
        }
    }
}
