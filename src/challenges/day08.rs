use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, bail};
use itertools::Itertools;
use num::Integer;
use pathfinding::directed::cycle_detection::brent;

use crate::{
    error::ParseError,
    input::{self, split_once},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Turn {
    Left,
    Right,
}

impl Turn {
    fn parse(c: char) -> Result<Self, ParseError> {
        match c {
            'L' => Ok(Turn::Left),
            'R' => Ok(Turn::Right),
            _ => Err(ParseError::InvalidFormat(format!("unknown instruction {c:?}"))),
        }
    }

    fn as_char(self) -> char {
        match self {
            Turn::Left => 'L',
            Turn::Right => 'R',
        }
    }
}

/// Nodes are interned: every name gets an index into `names`, `left` and `right`.
#[derive(Debug)]
struct Network {
    turns: Vec<Turn>,
    names: Vec<String>,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Position of a walker: a node and where it is in the instruction list.
type State = (usize, usize);

impl Network {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let mut lines = input.lines().map(str::trim).filter(|l| !l.is_empty());
        let turns: Vec<Turn> = lines
            .next()
            .ok_or_else(|| ParseError::MissingData("no instructions".to_owned()))?
            .chars()
            .map(Turn::parse)
            .collect::<Result<_, _>>()?;

        let mut edges = Vec::new();
        for line in lines {
            let (name, targets) = split_once(line, " = ")?;
            let targets = targets
                .strip_prefix('(')
                .and_then(|t| t.strip_suffix(')'))
                .ok_or_else(|| ParseError::InvalidFormat(format!("bad node line {line:?}")))?;
            let (left, right) = split_once(targets, ", ")?;
            edges.push((name, left, right));
        }

        let index: HashMap<&str, usize> =
            edges.iter().enumerate().map(|(i, &(name, _, _))| (name, i)).collect();
        let lookup = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| ParseError::MissingData(format!("unknown node {name:?}")))
        };
        let left: Vec<usize> = edges.iter().map(|&(_, l, _)| lookup(l)).collect::<Result<_, _>>()?;
        let right: Vec<usize> = edges.iter().map(|&(_, _, r)| lookup(r)).collect::<Result<_, _>>()?;

        Ok(Network {
            turns,
            names: edges.iter().map(|&(name, _, _)| name.to_owned()).collect(),
            left,
            right,
        })
    }

    fn node(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    fn next(&self, (node, pos): State) -> State {
        let next = match self.turns[pos] {
            Turn::Left => self.left[node],
            Turn::Right => self.right[node],
        };
        (next, (pos + 1) % self.turns.len())
    }

    /// Steps from `start` to `destination`, or an error if the walk loops
    /// without ever getting there.
    fn steps(&self, start: &str, destination: &str) -> anyhow::Result<u64> {
        let start = self
            .node(start)
            .ok_or_else(|| ParseError::MissingData(format!("no node named {start:?}")))?;
        let destination = self
            .node(destination)
            .ok_or_else(|| ParseError::MissingData(format!("no node named {destination:?}")))?;

        let mut seen = HashSet::new();
        let mut state = (start, 0);
        let mut steps = 0;
        while state.0 != destination {
            if !seen.insert(state) {
                bail!(
                    "{} is unreachable: walk loops back to {} after {steps} steps",
                    self.names[destination],
                    self.names[state.0]
                );
            }
            let next = self.next(state);
            steps += 1;
            log::trace!(
                "{} --({})--> {} (d={steps})",
                self.names[state.0],
                self.turns[state.1].as_char(),
                self.names[next.0]
            );
            state = next;
        }
        Ok(steps)
    }

    fn ghost(&self, start: usize) -> Ghost {
        let (cycle_len, _, cycle_start) = brent((start, 0), |s| self.next(s));
        let mut ghost = Ghost {
            name: self.names[start].clone(),
            cycle_start: cycle_start as u64,
            cycle_len: cycle_len as u64,
            tail_hits: HashSet::new(),
            cycle_hits: Vec::new(),
        };
        let mut state = (start, 0);
        for step in 0..(cycle_start + cycle_len) as u64 {
            if self.names[state.0].ends_with('Z') {
                if step < ghost.cycle_start {
                    ghost.tail_hits.insert(step);
                } else {
                    ghost.cycle_hits.push(step);
                }
            }
            state = self.next(state);
        }
        log::debug!(
            "ghost {}: cycle of {} steps from step {}, Z at {:?} then {:?}",
            ghost.name,
            ghost.cycle_len,
            ghost.cycle_start,
            ghost.tail_hits,
            ghost.cycle_hits
        );
        ghost
    }

    /// First step at which every walker started on a `..A` node stands on a
    /// `..Z` node.
    fn ghost_steps(&self) -> anyhow::Result<u64> {
        let ghosts = self
            .names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.ends_with('A'))
            .map(|(i, _)| self.ghost(i))
            .collect_vec();
        if ghosts.is_empty() {
            bail!(ParseError::MissingData("no node ending with 'A'".to_owned()));
        }

        // before every walker is in its cycle, only direct checks work
        let tail_answer = ghosts
            .iter()
            .flat_map(|g| g.tail_hits.iter().copied())
            .sorted_unstable()
            .find(|&step| ghosts.iter().all(|g| g.on_z_at(step)));
        if let Some(step) = tail_answer {
            return Ok(step);
        }

        let min_step = ghosts.iter().map(|g| g.cycle_start).max().unwrap_or(0);
        ghosts
            .iter()
            .map(|g| g.cycle_hits.iter().map(move |&hit| (hit % g.cycle_len, g.cycle_len)))
            .multi_cartesian_product()
            .filter_map(|congruences| {
                congruences
                    .into_iter()
                    .map(|(a, m)| (i128::from(a), i128::from(m)))
                    .try_fold((0, 1), merge_congruences)
            })
            .map(|(a, m)| first_at_least(a, m, i128::from(min_step)))
            .min()
            .map(|step| u64::try_from(step).map_err(|_| anyhow!("step count {step} overflows")))
            .unwrap_or_else(|| Err(anyhow!("walkers never stand on Z nodes together")))
    }
}

#[derive(Debug)]
struct Ghost {
    name: String,
    cycle_start: u64,
    cycle_len: u64,
    tail_hits: HashSet<u64>,
    cycle_hits: Vec<u64>,
}

impl Ghost {
    fn on_z_at(&self, step: u64) -> bool {
        if step < self.cycle_start {
            return self.tail_hits.contains(&step);
        }
        let offset = (step - self.cycle_start) % self.cycle_len;
        self.cycle_hits.contains(&(self.cycle_start + offset))
    }
}

/// Merges `t ≡ a1 (mod m1)` and `t ≡ a2 (mod m2)` into one congruence, if
/// they're compatible.
fn merge_congruences((a1, m1): (i128, i128), (a2, m2): (i128, i128)) -> Option<(i128, i128)> {
    let egcd = m1.extended_gcd(&m2);
    let g = egcd.gcd;
    if (a2 - a1) % g != 0 {
        return None;
    }
    let m = m1.checked_mul(m2 / g)?;
    let k = ((a2 - a1) / g % (m2 / g)).checked_mul(egcd.x)? % (m2 / g);
    let t = (a1 + m1.checked_mul(k)?).rem_euclid(m);
    Some((t, m))
}

/// Smallest `t >= min` with `t ≡ a (mod m)`, for `0 <= a < m`.
fn first_at_least(a: i128, m: i128, min: i128) -> i128 {
    if a >= min {
        a
    } else {
        a + (min - a + m - 1) / m * m
    }
}

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Puzzle input, read from stdin when omitted
    file: Option<String>,
    /// Walk from every `..A` node at once
    #[arg(long)]
    part2: bool,
}

pub fn entrypoint(args: &Args) -> anyhow::Result<()> {
    let network = Network::parse(&input::read_input(args.file.as_deref())?)?;
    let steps = if args.part2 {
        network.ghost_steps()?
    } else {
        network.steps("AAA", "ZZZ")?
    };
    println!("Number of steps : {steps}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_1: &str = "RL

AAA = (BBB, CCC)
BBB = (DDD, EEE)
CCC = (ZZZ, GGG)
DDD = (DDD, DDD)
EEE = (EEE, EEE)
GGG = (GGG, GGG)
ZZZ = (ZZZ, ZZZ)
";

    const SAMPLE_2: &str = "LLR

AAA = (BBB, BBB)
BBB = (AAA, ZZZ)
ZZZ = (ZZZ, ZZZ)
";

    const SAMPLE_3: &str = "LR

11A = (11B, XXX)
11B = (XXX, 11Z)
11Z = (11B, XXX)
22A = (22B, XXX)
22B = (22C, 22C)
22C = (22Z, 22Z)
22Z = (22B, 22B)
XXX = (XXX, XXX)
";

    #[test]
    fn sample_part1() {
        assert_eq!(Network::parse(SAMPLE_1).unwrap().steps("AAA", "ZZZ").unwrap(), 2);
        assert_eq!(Network::parse(SAMPLE_2).unwrap().steps("AAA", "ZZZ").unwrap(), 6);
    }

    #[test]
    fn sample_part2() {
        assert_eq!(Network::parse(SAMPLE_3).unwrap().ghost_steps().unwrap(), 6);
    }

    #[test]
    fn unreachable_destination_is_detected() {
        let network =
            Network::parse("L\n\nAAA = (BBB, BBB)\nBBB = (AAA, ZZZ)\nZZZ = (ZZZ, ZZZ)\n").unwrap();
        assert!(network.steps("AAA", "ZZZ").is_err());
    }

    #[test]
    fn ghosts_with_offset_cycles() {
        // 1A reaches 1Z at steps 2, 5, 8, ...; 2A at steps 1, 3, 5, ...
        let network = Network::parse(
            "L

1AA = (1BB, 1BB)
1BB = (1CZ, 1CZ)
1CZ = (1DD, 1DD)
1DD = (1BB, 1BB)
2AA = (2BZ, 2BZ)
2BZ = (2CC, 2CC)
2CC = (2BZ, 2BZ)
",
        )
        .unwrap();
        assert_eq!(network.ghost_steps().unwrap(), 5);
    }

    #[test]
    fn ghosts_that_never_meet() {
        // Z on odd steps only vs even steps only
        let network = Network::parse(
            "L

1AA = (1BZ, 1BZ)
1BZ = (1AA, 1AA)
2AA = (2BB, 2BB)
2BB = (2CZ, 2CZ)
2CZ = (2BB, 2BB)
",
        )
        .unwrap();
        assert!(network.ghost_steps().is_err());
    }

    #[test]
    fn congruences() {
        assert_eq!(merge_congruences((2, 3), (3, 5)), Some((8, 15)));
        assert_eq!(merge_congruences((0, 4), (2, 6)), Some((8, 12)));
        assert_eq!(merge_congruences((1, 4), (2, 6)), None);
        assert_eq!(first_at_least(2, 5, 11), 12);
        assert_eq!(first_at_least(7, 10, 3), 7);
    }

    #[test]
    fn unknown_nodes_are_rejected() {
        assert!(matches!(
            Network::parse("L\n\nAAA = (BBB, AAA)\n"),
            Err(ParseError::MissingData(_))
        ));
        assert!(matches!(
            Network::parse("LX\n\nAAA = (AAA, AAA)\n"),
            Err(ParseError::InvalidFormat(_))
        ));
    }
}
