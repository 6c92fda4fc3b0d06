//! bb_cli
//!
//! Simulate games from a JSON request, or run seeded batches and print
//! league-style rates for tuning the engine config.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use rayon::prelude::*;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use bb_core::models::HitType;
#[cfg(feature = "cli")]
use bb_core::{simulate_game, AtBatOutcome, GameRequest, GameResult, Side};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "bb_cli")]
#[command(about = "Deterministic baseball game simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Simulate one game and print the result
    Simulate {
        /// Game request JSON file
        #[arg(long)]
        request: PathBuf,

        /// Pretty-print the full JSON result
        #[arg(long, default_value = "false")]
        pretty: bool,

        /// Print only the line score
        #[arg(long, default_value = "false")]
        line_score: bool,
    },

    /// Replay the request over consecutive seeds and print rate summaries
    Batch {
        /// Game request JSON file (its seed is replaced)
        #[arg(long)]
        request: PathBuf,

        /// Number of games
        #[arg(long, default_value_t = 100)]
        games: u64,

        /// First seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("BB_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate { request, pretty, line_score } => {
            let req = load_request(&request)?;
            let result = simulate_game(req).context("simulation failed")?;
            if line_score {
                print_line_score(&result);
            } else if pretty {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", serde_json::to_string(&result)?);
            }
        }
        Commands::Batch { request, games, seed } => {
            let template = load_request(&request)?;
            // games are independent; fold in seed order so output is stable
            let results = (0..games)
                .into_par_iter()
                .map(|offset| {
                    let mut req = template.clone();
                    req.seed = seed.wrapping_add(offset);
                    simulate_game(req).with_context(|| {
                        format!("simulation failed for seed {}", seed.wrapping_add(offset))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let mut rates = Rates::default();
            for result in &results {
                rates.add(result);
            }
            rates.print();
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn load_request(path: &Path) -> Result<GameRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid game request in {}", path.display()))
}

#[cfg(feature = "cli")]
fn print_line_score(result: &GameResult) {
    let innings = result.line_score.away.len().max(result.line_score.home.len());
    let header: String = (1..=innings).map(|i| format!("{i:>3}")).collect();
    println!("{:<16}{header}    R", "");
    for side in [Side::Away, Side::Home] {
        let name = match side {
            Side::Away => &result.away_team,
            Side::Home => &result.home_team,
        };
        let runs = result.line_score.runs(side);
        let cells: String = (0..innings)
            .map(|i| runs.get(i).map_or_else(|| "  x".to_string(), |r| format!("{r:>3}")))
            .collect();
        println!("{name:<16}{cells}  {:>3}", result.score(side));
    }
    println!("{}", result.summary());
}

#[cfg(feature = "cli")]
#[derive(Default)]
struct Rates {
    games: u64,
    home_wins: u64,
    ties: u64,
    extra_innings: u64,
    runs: u64,
    plate_appearances: u64,
    walks: u64,
    strikeouts: u64,
    home_runs: u64,
    hits: u64,
    at_bats: u64,
    ground: u64,
    line: u64,
    fly: u64,
    popup: u64,
    pitching_changes: u64,
}

#[cfg(feature = "cli")]
impl Rates {
    fn add(&mut self, result: &GameResult) {
        self.games += 1;
        match result.winner {
            Some(Side::Home) => self.home_wins += 1,
            None => self.ties += 1,
            Some(Side::Away) => {}
        }
        if result.innings > 9 {
            self.extra_innings += 1;
        }
        self.runs += u64::from(result.home_score + result.away_score);
        self.pitching_changes += result.pitching_changes.len() as u64;

        for play in &result.plays {
            let outcome = play.record.outcome;
            self.plate_appearances += 1;
            self.walks += u64::from(outcome == AtBatOutcome::Walk);
            self.strikeouts += u64::from(outcome.is_strikeout());
            self.home_runs += u64::from(outcome == AtBatOutcome::HomeRun);
            self.hits += u64::from(outcome.is_hit());
            self.at_bats += u64::from(outcome.counts_as_at_bat());
            if let Some(ball) = &play.record.batted_ball {
                match ball.hit_type {
                    HitType::Ground => self.ground += 1,
                    HitType::Line => self.line += 1,
                    HitType::Fly => self.fly += 1,
                    HitType::Popup => self.popup += 1,
                }
            }
        }
    }

    fn print(&self) {
        let pct = |n: u64, d: u64| if d == 0 { 0.0 } else { n as f64 / d as f64 * 100.0 };
        let balls = self.ground + self.line + self.fly + self.popup;
        println!("games            {}", self.games);
        println!("runs/game        {:.2}", self.runs as f64 / self.games.max(1) as f64);
        println!("home win %       {:.1}", pct(self.home_wins, self.games));
        println!("ties             {}", self.ties);
        println!("extra innings %  {:.1}", pct(self.extra_innings, self.games));
        println!("AVG              {:.3}", pct(self.hits, self.at_bats) / 100.0);
        println!("BB %             {:.1}", pct(self.walks, self.plate_appearances));
        println!("K %              {:.1}", pct(self.strikeouts, self.plate_appearances));
        println!("HR %             {:.2}", pct(self.home_runs, self.plate_appearances));
        println!(
            "GB/LD/FB/PU %    {:.1}/{:.1}/{:.1}/{:.1}",
            pct(self.ground, balls),
            pct(self.line, balls),
            pct(self.fly, balls),
            pct(self.popup, balls)
        );
        println!("pitching changes {:.2}/game", self.pitching_changes as f64 / self.games.max(1) as f64);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("bb_cli was built without the `cli` feature");
}
