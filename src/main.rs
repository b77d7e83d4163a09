use clap::Parser;

mod challenges;
mod error;
mod input;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print trace output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Challenge Day
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Trebuchet?!
    Day01(challenges::day01::Args),
    /// Cube Conundrum
    Day02(challenges::day02::Args),
    /// Gear Ratios
    Day03(challenges::day03::Args),
    /// Scratchcards
    Day04(challenges::day04::Args),
    /// If You Give A Seed A Fertilizer
    Day05(challenges::day05::Args),
    /// Wait For It
    Day06(challenges::day06::Args),
    /// Camel Cards
    Day07(challenges::day07::Args),
    /// Haunted Wasteland
    Day08(challenges::day08::Args),
    /// Mirage Maintenance
    Day09(challenges::day09::Args),
    /// Pipe Maze
    Day10(challenges::day10::Args),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .parse_default_env()
        .init();

    match &cli.command {
        Command::Day01(args) => challenges::day01::entrypoint(args),
        Command::Day02(args) => challenges::day02::entrypoint(args),
        Command::Day03(args) => challenges::day03::entrypoint(args),
        Command::Day04(args) => challenges::day04::entrypoint(args),
        Command::Day05(args) => challenges::day05::entrypoint(args),
        Command::Day06(args) => challenges::day06::entrypoint(args),
        Command::Day07(args) => challenges::day07::entrypoint(args),
        Command::Day08(args) => challenges::day08::entrypoint(args),
        Command::Day09(args) => challenges::day09::entrypoint(args),
        Command::Day10(args) => challenges::day10::entrypoint(args),
    }
}
