use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use std::io::{stdin, stdout, Write};
use std::time::Instant;

use connect4_sss::{
    config::*,
    session::Match,
    tournament::{opening_count, run_openings},
    Player, DEFAULT_COLS, DEFAULT_ROWS,
};

mod display;

/// Play Connect 4 against a best-first (SSS*) search engine
#[derive(Parser)]
#[command(name = "connect4", about = "Play Connect 4 against an SSS* search engine")]
struct Cli {
    /// Number of rows on the board
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    /// Number of columns on the board
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,

    /// Search horizon of the engine in plies
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,

    /// Let the engine make the first move
    #[arg(long)]
    ai_first: bool,

    /// Queue every reply of an opponent node at once instead of one at a time
    #[arg(long)]
    simultaneous: bool,

    /// Play this many engine versus engine openings instead of an interactive game
    #[arg(long)]
    selfplay: Option<usize>,

    /// Search horizon of player two in self-play (defaults to --depth)
    #[arg(long)]
    rival_depth: Option<usize>,

    /// Log search statistics
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn and_expansion(&self) -> AndExpansion {
        if self.simultaneous {
            AndExpansion::Simultaneous
        } else {
            AndExpansion::Sequential
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    match cli.selfplay {
        Some(games) => selfplay(&cli, games),
        None => interactive(&cli),
    }
}

fn selfplay(cli: &Cli, games: usize) -> Result<()> {
    let config = TournamentConfig {
        rows: cli.rows,
        cols: cli.cols,
        games,
        depths: [cli.depth, cli.rival_depth.unwrap_or(cli.depth)],
        and_expansion: cli.and_expansion(),
    };
    config.validate()?;

    let progress = ProgressBar::new(opening_count(&config) as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Playing openings: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let start = Instant::now();
    let tally = run_openings(&config, Some(&progress))?;
    progress.finish_and_clear();

    println!(
        "{} games in {:.2}s (player one depth {}, player two depth {})",
        tally.games(),
        start.elapsed().as_secs_f64(),
        config.depths[0],
        config.depths[1]
    );
    println!("Player 1 wins: {}", tally.player_one_wins);
    println!("Player 2 wins: {}", tally.player_two_wins);
    println!("Draws: {}", tally.draws);
    Ok(())
}

fn interactive(cli: &Cli) -> Result<()> {
    let config = GameConfig {
        rows: cli.rows,
        cols: cli.cols,
        engine: EngineConfig {
            depth: cli.depth,
            and_expansion: cli.and_expansion(),
        },
        human: if cli.ai_first {
            Player::PlayerTwo
        } else {
            Player::PlayerOne
        },
    };

    println!("Welcome to Connect 4\n");
    if cli.ai_first {
        println!("AI is thinking...");
    }
    let mut game = Match::new(config)?;
    if let Some(column) = game.opening() {
        println!("AI plays column {}", column + 1);
    }

    let stdin = stdin();

    // game loop
    loop {
        display::draw(game.state().board())?;

        if game.is_over() {
            println!("{}", game.status());
            break;
        }

        print!("Move input > ");
        stdout().flush()?;
        let mut input_str = String::new();
        if stdin.read_line(&mut input_str)? == 0 {
            bail!("input closed before the game finished");
        }

        let column = match input_str.trim().parse::<usize>() {
            Ok(column) if column >= 1 => column - 1,
            _ => {
                println!("Invalid number: {}", input_str.trim());
                continue;
            }
        };

        let start = Instant::now();
        let report = match game.play(column) {
            Ok(report) => report,
            Err(err) if err.is_invalid_move() => {
                println!("Invalid move, column {} is not playable", column + 1);
                // try the move again
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if let Some(reply) = report.reply {
            println!("AI plays column {}", reply + 1);
            if cli.verbose {
                if let Some(search) = game.engine().last_report() {
                    println!(
                        "Searched {} positions in {:.3}s, value {}",
                        search.nodes_expanded,
                        start.elapsed().as_secs_f64(),
                        search.value
                    );
                }
            }
        }
    }
    Ok(())
}
