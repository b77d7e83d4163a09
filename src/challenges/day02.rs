use crate::{
    error::ParseError,
    input::{self, parse_number, split_once},
};

/// Number of cubes of each colour in one handful.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cubes {
    red: u32,
    green: u32,
    blue: u32,
}

const BAG: Cubes = Cubes {
    red: 12,
    green: 13,
    blue: 14,
};

impl Cubes {
    fn power(&self) -> u64 {
        u64::from(self.red) * u64::from(self.green) * u64::from(self.blue)
    }

    fn fits_in(&self, bag: &Cubes) -> bool {
        self.red <= bag.red && self.green <= bag.green && self.blue <= bag.blue
    }

    fn max(self, other: Cubes) -> Cubes {
        Cubes {
            red: self.red.max(other.red),
            green: self.green.max(other.green),
            blue: self.blue.max(other.blue),
        }
    }

    fn parse(grab: &str) -> Result<Self, ParseError> {
        let mut cubes = Cubes::default();
        for part in grab.split(", ") {
            let (count, colour) = split_once(part.trim(), " ")?;
            let count: u32 = parse_number(count)?;
            match colour {
                "red" => cubes.red += count,
                "green" => cubes.green += count,
                "blue" => cubes.blue += count,
                other => {
                    return Err(ParseError::InvalidFormat(format!("unknown colour {other:?}")))
                }
            }
        }
        Ok(cubes)
    }
}

#[derive(Debug)]
struct Game {
    id: u32,
    grabs: Vec<Cubes>,
}

impl Game {
    fn parse(line: &str) -> Result<Self, ParseError> {
        let (header, list) = split_once(line, ": ")?;
        let (_, id) = split_once(header, " ")?;
        let grabs = list.split("; ").map(Cubes::parse).collect::<Result<_, _>>()?;
        Ok(Game {
            id: parse_number(id)?,
            grabs,
        })
    }

    fn is_possible(&self, bag: &Cubes) -> bool {
        self.grabs.iter().all(|grab| grab.fits_in(bag))
    }

    fn minimum_set(&self) -> Cubes {
        self.grabs.iter().fold(Cubes::default(), |acc, grab| acc.max(*grab))
    }
}

fn parse(input: &str) -> Result<Vec<Game>, ParseError> {
    input
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(Game::parse)
        .collect()
}

fn possible_ids_sum(games: &[Game]) -> u64 {
    games
        .iter()
        .filter(|game| game.is_possible(&BAG))
        .map(|game| u64::from(game.id))
        .sum()
}

fn power_sum(games: &[Game]) -> u64 {
    games
        .iter()
        .map(|game| {
            let min = game.minimum_set();
            log::debug!(
                "Min for game {} : {} red, {} green, {} blue",
                game.id,
                min.red,
                min.green,
                min.blue
            );
            min.power()
        })
        .sum()
}

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Puzzle input, read from stdin when omitted
    file: Option<String>,
    /// Sum the powers of the minimum cube sets instead
    #[arg(long)]
    part2: bool,
}

pub fn entrypoint(args: &Args) -> anyhow::Result<()> {
    let games = parse(&input::read_input(args.file.as_deref())?)?;
    if args.part2 {
        println!("Sum of the powers : {}", power_sum(&games));
    } else {
        println!("Sum of the game IDs : {}", possible_ids_sum(&games));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Game 1: 3 blue, 4 red; 1 red, 2 green, 6 blue; 2 green
Game 2: 1 blue, 2 green; 3 green, 4 blue, 1 red; 1 green, 1 blue
Game 3: 8 green, 6 blue, 20 red; 5 blue, 4 red, 13 green; 5 green, 1 red
Game 4: 1 green, 3 red, 6 blue; 3 green, 6 red; 3 green, 15 blue, 14 red
Game 5: 6 red, 1 blue, 3 green; 2 blue, 1 red, 2 green
";

    #[test]
    fn sample_part1() {
        let games = parse(SAMPLE).unwrap();
        assert_eq!(possible_ids_sum(&games), 8);
    }

    #[test]
    fn sample_part2() {
        let games = parse(SAMPLE).unwrap();
        assert_eq!(
            games[0].minimum_set(),
            Cubes {
                red: 4,
                green: 2,
                blue: 6
            }
        );
        assert_eq!(power_sum(&games), 2286);
    }

    #[test]
    fn unknown_colour_is_rejected() {
        assert!(matches!(
            Game::parse("Game 7: 3 purple"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            Game::parse("Game 7 3 blue"),
            Err(ParseError::MissingSeparator { .. })
        ));
    }
}
