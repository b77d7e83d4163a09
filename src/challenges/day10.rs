use std::{collections::HashSet, fmt};

use itertools::Itertools;
use pathfinding::directed::bfs::bfs_reach;

use crate::{error::ParseError, input};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    North,
    East,
    South,
    West,
}

use Direction::*;

const DIRECTIONS: [Direction; 4] = [North, East, South, West];

impl Direction {
    fn opposite(self) -> Self {
        match self {
            North => South,
            East => West,
            South => North,
            West => East,
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            North => (-1, 0),
            East => (0, 1),
            South => (1, 0),
            West => (0, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            North => "top",
            East => "right",
            South => "bottom",
            West => "left",
        };
        write!(f, "{s}")
    }
}

/// The two openings of a pipe tile.
fn connections(tile: u8) -> Option<[Direction; 2]> {
    match tile {
        b'|' => Some([North, South]),
        b'-' => Some([East, West]),
        b'L' => Some([North, East]),
        b'J' => Some([North, West]),
        b'7' => Some([South, West]),
        b'F' => Some([East, South]),
        _ => None,
    }
}

fn tile_for(a: Direction, b: Direction) -> u8 {
    let mut pair = [a, b];
    pair.sort_by_key(|&d| d as u8);
    match pair {
        [North, South] => b'|',
        [East, West] => b'-',
        [North, East] => b'L',
        [North, West] => b'J',
        [South, West] => b'7',
        _ => b'F',
    }
}

type Pos = (usize, usize);

#[derive(Debug)]
struct Maze {
    tiles: Vec<Vec<u8>>,
    start: Pos,
}

impl Maze {
    fn parse(input: &str) -> Result<Self, ParseError> {
        let tiles: Vec<Vec<u8>> = input
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .map(|l| l.bytes().collect())
            .collect();
        if let Some(bad) = tiles
            .iter()
            .flatten()
            .find(|&&b| b != b'.' && b != b'S' && connections(b).is_none())
        {
            return Err(ParseError::InvalidFormat(format!(
                "unknown tile {:?}",
                char::from(*bad)
            )));
        }
        let start = tiles
            .iter()
            .enumerate()
            .find_map(|(r, row)| row.iter().position(|&b| b == b'S').map(|c| (r, c)))
            .ok_or_else(|| ParseError::MissingData("no start tile".to_owned()))?;

        let mut maze = Maze { tiles, start };
        let linked: Vec<Direction> = DIRECTIONS
            .into_iter()
            .filter(|&d| {
                maze.neighbour(start, d)
                    .and_then(|n| connections(maze.tile(n)))
                    .is_some_and(|c| c.contains(&d.opposite()))
            })
            .collect();
        // more than two neighbours may point at the start; only one pair closes the loop
        for (a, b) in linked.iter().copied().tuple_combinations() {
            maze.tiles[start.0][start.1] = tile_for(a, b);
            if maze.main_loop().is_ok() {
                return Ok(maze);
            }
        }
        Err(ParseError::InvalidFormat(format!(
            "no loop through the start tile ({} connected pipes)",
            linked.len()
        )))
    }

    fn tile(&self, (r, c): Pos) -> u8 {
        self.tiles
            .get(r)
            .and_then(|row| row.get(c))
            .copied()
            .unwrap_or(b'.')
    }

    fn neighbour(&self, (r, c): Pos, d: Direction) -> Option<Pos> {
        let (dr, dc) = d.delta();
        let r = r.checked_add_signed(dr)?;
        let c = c.checked_add_signed(dc)?;
        (r < self.tiles.len() && c < self.tiles[r].len()).then_some((r, c))
    }

    /// Positions of the loop through the start tile, in walking order.
    fn main_loop(&self) -> Result<Vec<Pos>, ParseError> {
        let broken = |pos: Pos| ParseError::InvalidFormat(format!("pipe broken at {pos:?}"));
        let [mut heading, _] = connections(self.tile(self.start)).ok_or_else(|| broken(self.start))?;
        let mut path = vec![self.start];
        let mut current = self.start;
        loop {
            let next = self.neighbour(current, heading).ok_or_else(|| broken(current))?;
            log::trace!("{current:?} --({heading})--> {next:?}");
            if next == self.start {
                if !connections(self.tile(next)).is_some_and(|c| c.contains(&heading.opposite())) {
                    return Err(broken(next));
                }
                break;
            }
            let [a, b] = connections(self.tile(next)).ok_or_else(|| broken(next))?;
            let came_from = heading.opposite();
            heading = match (a == came_from, b == came_from) {
                (true, _) => b,
                (_, true) => a,
                _ => return Err(broken(next)),
            };
            path.push(next);
            current = next;
        }
        log::debug!("Total loop length : {}", path.len());
        Ok(path)
    }

    fn farthest_point(&self) -> Result<usize, ParseError> {
        Ok(self.main_loop()?.len() / 2)
    }

    /// Tiles fully surrounded by the loop.
    ///
    /// Every tile becomes a 3x3 block so that the gaps between adjacent pipes
    /// are cells of their own; the outside is then flood filled from a
    /// one-cell border around the whole map.
    fn enclosed_tiles(&self) -> Result<usize, ParseError> {
        let path = self.main_loop()?;
        let height = self.tiles.len() * 3 + 2;
        let width = self.tiles.iter().map(Vec::len).max().unwrap_or(0) * 3 + 2;
        let centre = |(r, c): Pos| (r * 3 + 2, c * 3 + 2);

        let mut walls = vec![vec![false; width]; height];
        for &pos in &path {
            let (cr, cc) = centre(pos);
            walls[cr][cc] = true;
            for d in connections(self.tile(pos)).into_iter().flatten() {
                let (dr, dc) = d.delta();
                walls[cr.wrapping_add_signed(dr)][cc.wrapping_add_signed(dc)] = true;
            }
        }

        let walls = &walls;
        let outside: HashSet<Pos> = bfs_reach((0, 0), move |&(r, c): &Pos| {
            DIRECTIONS.into_iter().filter_map(move |d| {
                let (dr, dc) = d.delta();
                let r = r.checked_add_signed(dr)?;
                let c = c.checked_add_signed(dc)?;
                (r < height && c < width && !walls[r][c]).then_some((r, c))
            })
        })
        .collect();

        let on_loop: HashSet<Pos> = path.into_iter().collect();
        Ok(self
            .tiles
            .iter()
            .enumerate()
            .flat_map(|(r, row)| (0..row.len()).map(move |c| (r, c)))
            .filter(|pos| !on_loop.contains(pos) && !outside.contains(&centre(*pos)))
            .count())
    }
}

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Puzzle input, read from stdin when omitted
    file: Option<String>,
    /// Count the tiles enclosed by the loop
    #[arg(long)]
    part2: bool,
}

pub fn entrypoint(args: &Args) -> anyhow::Result<()> {
    let maze = Maze::parse(&input::read_input(args.file.as_deref())?)?;
    if args.part2 {
        println!("Number of enclosed tiles : {}", maze.enclosed_tiles()?);
    } else {
        println!(
            "Number of steps to get to the farthest point : {}",
            maze.farthest_point()?
        );
    }
    Ok(())
}
