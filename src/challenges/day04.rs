use std::collections::HashSet;

use crate::{
    error::ParseError,
    input::{self, parse_numbers, split_once},
};

#[derive(Debug)]
struct Card {
    held: HashSet<u32>,
    winning: HashSet<u32>,
}

impl Card {
    fn parse(line: &str) -> Result<Self, ParseError> {
        let (_, numbers) = split_once(line, ":")?;
        let (held, winning) = split_once(numbers, "|")?;
        Ok(Card {
            held: parse_numbers(held)?.into_iter().collect(),
            winning: parse_numbers(winning)?.into_iter().collect(),
        })
    }

    fn matches(&self) -> usize {
        self.held.intersection(&self.winning).count()
    }

    fn points(&self) -> Result<u64, ParseError> {
        match self.matches() {
            0 => Ok(0),
            n => u32::try_from(n - 1)
                .ok()
                .and_then(|shift| 1u64.checked_shl(shift))
                .ok_or_else(|| ParseError::InvalidFormat(format!("{n} matches overflow the points"))),
        }
    }
}

fn parse(input: &str) -> Result<Vec<Card>, ParseError> {
    input
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(Card::parse)
        .collect()
}

fn total_points(cards: &[Card]) -> Result<u64, ParseError> {
    cards.iter().try_fold(0u64, |acc, card| {
        acc.checked_add(card.points()?)
            .ok_or_else(|| ParseError::InvalidFormat("total points overflow".to_owned()))
    })
}

/// Every card wins copies of the cards right after it, one per match.
fn total_cards(cards: &[Card]) -> u64 {
    let mut copies = vec![1u64; cards.len()];
    for (i, card) in cards.iter().enumerate() {
        let won = card.matches();
        let count = copies[i];
        let end = (i + 1 + won).min(cards.len());
        for c in &mut copies[i + 1..end] {
            *c += count;
        }
        log::debug!("card {} x{count} wins {won}", i + 1);
    }
    copies.iter().sum()
}

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Puzzle input, read from stdin when omitted
    file: Option<String>,
    /// Count the cards won instead of the points
    #[arg(long)]
    part2: bool,
}

pub fn entrypoint(args: &Args) -> anyhow::Result<()> {
    let cards = parse(&input::read_input(args.file.as_deref())?)?;
    if args.part2 {
        println!("Total scratchcards : {}", total_cards(&cards));
    } else {
        println!("Total points : {}", total_points(&cards)?);
    }
    Ok(())
}
