use std::{cmp::Ordering, fmt};

use itertools::Itertools;

use crate::{
    error::ParseError,
    input::{self, parse_number, split_once},
};

const CARD_ORDER: &str = "23456789TJQKA";
const JOKER_CARD_ORDER: &str = "J23456789TQKA";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum HandType {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    FullHouse,
    FourOfAKind,
    FiveOfAKind,
}

impl HandType {
    fn of(cards: &str, jokers: bool) -> Self {
        let mut counts = cards.chars().counts();
        let wild = if jokers {
            counts.remove(&'J').unwrap_or(0)
        } else {
            0
        };
        let mut counts = counts.into_values().sorted_unstable().rev().collect_vec();
        // jokers join the largest group; five jokers make their own
        match counts.first_mut() {
            Some(largest) => *largest += wild,
            None => counts.push(wild),
        }
        match (counts[0], counts.get(1).copied().unwrap_or(0)) {
            (5, _) => HandType::FiveOfAKind,
            (4, _) => HandType::FourOfAKind,
            (3, 2) => HandType::FullHouse,
            (3, _) => HandType::ThreeOfAKind,
            (2, 2) => HandType::TwoPair,
            (2, _) => HandType::OnePair,
            _ => HandType::HighCard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Hand {
    cards: String,
    strengths: [u8; 5],
    kind: HandType,
    bid: u64,
}

impl Hand {
    fn parse(line: &str, jokers: bool) -> Result<Self, ParseError> {
        let (cards, bid) = split_once(line.trim(), " ")?;
        let order = if jokers { JOKER_CARD_ORDER } else { CARD_ORDER };
        let strengths: Vec<u8> = cards
            .chars()
            .map(|c| {
                order
                    .find(c)
                    .map(|i| i as u8)
                    .ok_or_else(|| ParseError::InvalidFormat(format!("unknown card {c:?}")))
            })
            .collect::<Result<_, _>>()?;
        let strengths: [u8; 5] = strengths.try_into().map_err(|v: Vec<u8>| {
            ParseError::InvalidFormat(format!("hand {cards:?} has {} cards", v.len()))
        })?;
        Ok(Hand {
            cards: cards.to_owned(),
            strengths,
            kind: HandType::of(cards, jokers),
            bid: parse_number(bid)?,
        })
    }
}

impl Ord for Hand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.strengths.cmp(&other.strengths))
            .then_with(|| self.bid.cmp(&other.bid))
    }
}

impl PartialOrd for Hand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.cards, self.bid)
    }
}

fn parse(input: &str, jokers: bool) -> Result<Vec<Hand>, ParseError> {
    input
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| Hand::parse(l, jokers))
        .collect()
}

fn total_winnings(mut hands: Vec<Hand>) -> u64 {
    hands.sort();
    hands
        .iter()
        .zip(1u64..)
        .map(|(hand, rank)| {
            let win = rank * hand.bid;
            log::debug!("[{rank}] {hand} -> {win}");
            win
        })
        .sum()
}

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Puzzle input, read from stdin when omitted
    file: Option<String>,
    /// Play `J` as a joker
    #[arg(long)]
    part2: bool,
}

pub fn entrypoint(args: &Args) -> anyhow::Result<()> {
    let hands = parse(&input::read_input(args.file.as_deref())?, args.part2)?;
    println!("Total winnings : {}", total_winnings(hands));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "32T3K 765\nT55J5 684\nKK677 28\nKTJJT 220\nQQQJA 483\n";

    #[test]
    fn sample_part1() {
        assert_eq!(total_winnings(parse(SAMPLE, false).unwrap()), 6440);
    }

    #[test]
    fn sample_part2() {
        assert_eq!(total_winnings(parse(SAMPLE, true).unwrap()), 5905);
    }

    #[test]
    fn hand_types() {
        assert_eq!(HandType::of("AAAAA", false), HandType::FiveOfAKind);
        assert_eq!(HandType::of("AA8AA", false), HandType::FourOfAKind);
        assert_eq!(HandType::of("23332", false), HandType::FullHouse);
        assert_eq!(HandType::of("TTT98", false), HandType::ThreeOfAKind);
        assert_eq!(HandType::of("23432", false), HandType::TwoPair);
        assert_eq!(HandType::of("A23A4", false), HandType::OnePair);
        assert_eq!(HandType::of("23456", false), HandType::HighCard);
    }

    #[test]
    fn jokers_take_the_best_shape() {
        assert_eq!(HandType::of("KTJJT", true), HandType::FourOfAKind);
        assert_eq!(HandType::of("JJJJJ", true), HandType::FiveOfAKind);
        assert_eq!(HandType::of("2345J", true), HandType::OnePair);
        assert_eq!(HandType::of("2233J", true), HandType::FullHouse);
        assert_eq!(HandType::of("KTJJT", false), HandType::TwoPair);
    }

    #[test]
    fn ties_break_card_by_card() {
        let a = Hand::parse("33332 1", false).unwrap();
        let b = Hand::parse("2AAAA 1", false).unwrap();
        assert!(a > b);
        // a joker is the weakest card when breaking ties
        let c = Hand::parse("JKKK2 1", true).unwrap();
        let d = Hand::parse("QQQQ2 1", true).unwrap();
        assert_eq!(c.kind, d.kind);
        assert!(c < d);
    }

    #[test]
    fn bad_hands_are_rejected() {
        assert!(Hand::parse("32T3 765", false).is_err());
        assert!(Hand::parse("32T3X 765", false).is_err());
        assert!(Hand::parse("32T3K", false).is_err());
    }

    #[test]
    fn identical_cards_order_by_bid() {
        let low = Hand::parse("32T3K 684", false).unwrap();
        let high = Hand::parse("32T3K 765", false).unwrap();
        assert_ne!(low, high);
        assert_eq!(low.cmp(&high), Ordering::Less);
        assert_eq!(low.cmp(&low.clone()), Ordering::Equal);
    }

    proptest! {
        #[test]
        fn equality_agrees_with_ordering(
            a in "[2-9TJQKA]{5}", b in "[2-9TJQKA]{5}",
            bid_a in 0u64..3, bid_b in 0u64..3, jokers: bool,
        ) {
            let a = Hand::parse(&format!("{a} {bid_a}"), jokers).unwrap();
            let b = Hand::parse(&format!("{b} {bid_b}"), jokers).unwrap();
            prop_assert_eq!(a == b, a.cmp(&b) == Ordering::Equal);
        }
    }
}
