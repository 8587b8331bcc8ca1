//! Self-play driver for the zero-mcts search engine.
//!
//! Plays complete games where every seat is driven by the same search and
//! reports how often each player won. Useful for sanity checking an oracle or
//! a set of search parameters on the bundled games.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt::Debug;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};
use zero_core::{Game, LegalActions, Outcome};
use zero_mcts::{
    games::{Countdown, TicTacToe},
    Evaluation, Mcts, MctsConfig, Oracle, OracleError, RolloutOracle, TreeStore, UniformOracle,
};

/// Self-play games driven by guided Monte Carlo tree search.
#[derive(Parser, Debug)]
#[command(name = "selfplay")]
#[command(about = "Play games against itself with MCTS and tally the results")]
struct Cli {
    /// Game to play.
    #[arg(long, value_enum, default_value = "tictactoe")]
    game: GameKind,

    /// Number of players (countdown only).
    #[arg(long, default_value = "3")]
    players: u8,

    /// Starting pile size (countdown only).
    #[arg(long, default_value = "10")]
    tokens: u8,

    /// Number of games to play.
    #[arg(short, long, default_value = "10")]
    games: usize,

    /// Number of MCTS simulations per move. Overrides the config file.
    #[arg(short, long)]
    simulations: Option<usize>,

    /// Exploration weight. Overrides the config file.
    #[arg(long)]
    cpuct: Option<f32>,

    /// Temperature for move selection. Overrides the config file.
    #[arg(short, long)]
    temperature: Option<f32>,

    /// JSON file with search parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Oracle used to expand new states.
    #[arg(long, value_enum, default_value = "uniform")]
    oracle: OracleKind,

    /// Maximum playout length for the rollout oracle.
    #[arg(long, default_value = "50")]
    rollout_depth: usize,

    /// Random seed for reproducibility.
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Keep the tree between moves of a game instead of starting fresh.
    #[arg(long)]
    reuse_tree: bool,

    /// Log level, used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GameKind {
    Tictactoe,
    Countdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OracleKind {
    Uniform,
    Rollout,
}

/// Oracle picked on the command line.
enum DriverOracle {
    Uniform(UniformOracle),
    Rollout(RolloutOracle<ChaCha8Rng>),
}

impl DriverOracle {
    fn new(kind: OracleKind, seed: u64, rollout_depth: usize) -> Self {
        match kind {
            OracleKind::Uniform => Self::Uniform(UniformOracle::new()),
            OracleKind::Rollout => Self::Rollout(RolloutOracle::new(
                ChaCha8Rng::seed_from_u64(seed),
                rollout_depth,
            )),
        }
    }
}

impl<G: Game> Oracle<G> for DriverOracle {
    fn evaluate(
        &self,
        game: &G,
        state: &G::State,
        legal: &LegalActions<G::Action>,
    ) -> Result<Evaluation, OracleError> {
        match self {
            Self::Uniform(oracle) => oracle.evaluate(game, state, legal),
            Self::Rollout(oracle) => oracle.evaluate(game, state, legal),
        }
    }
}

/// Options shared by every game of a run.
struct RunOptions {
    games: usize,
    oracle: OracleKind,
    rollout_depth: usize,
    seed: u64,
    reuse_tree: bool,
}

/// A finished game.
#[derive(Debug)]
struct Episode<P> {
    outcome: Outcome<P>,
    moves: usize,
}

/// Wins per player and ties over a run.
#[derive(Debug)]
struct Tally<P> {
    wins: Vec<(P, usize)>,
    ties: usize,
    moves: usize,
}

impl<P: Copy + Eq> Tally<P> {
    fn new() -> Self {
        Self {
            wins: Vec::new(),
            ties: 0,
            moves: 0,
        }
    }

    fn record(&mut self, episode: &Episode<P>) {
        self.moves += episode.moves;
        match episode.outcome {
            Outcome::Tie => self.ties += 1,
            Outcome::Win(winner) => match self.wins.iter_mut().find(|(p, _)| *p == winner) {
                Some((_, count)) => *count += 1,
                None => self.wins.push((winner, 1)),
            },
        }
    }

    #[cfg(test)]
    fn wins_for(&self, player: P) -> usize {
        self.wins
            .iter()
            .find(|(p, _)| *p == player)
            .map_or(0, |(_, count)| *count)
    }

    fn games(&self) -> usize {
        self.ties + self.wins.iter().map(|(_, count)| count).sum::<usize>()
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {}", level))?,
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

/// Search parameters from the config file (or defaults), with command line
/// overrides applied on top.
fn build_config(cli: &Cli) -> Result<MctsConfig> {
    let mut config = match &cli.config {
        Some(path) => MctsConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => MctsConfig::default(),
    };

    if let Some(simulations) = cli.simulations {
        config.num_simulations = simulations;
    }
    if let Some(cpuct) = cli.cpuct {
        config.cpuct = cpuct;
    }
    if let Some(temperature) = cli.temperature {
        config.temperature = temperature;
    }

    config.validate().context("Invalid search parameters")?;
    Ok(config)
}

/// Play one game from the initial state to the end.
fn play_episode<G, O>(
    game: &G,
    mcts: &Mcts<G, O>,
    rng: &mut ChaCha8Rng,
    reuse_tree: bool,
) -> Result<Episode<G::Player>>
where
    G: Game,
    O: Oracle<G>,
{
    let mut state = game.initial_state();
    let mut tree = TreeStore::new();
    let mut moves = 0;

    loop {
        if let Some(outcome) = game.terminal_result(&state) {
            return Ok(Episode { outcome, moves });
        }

        if !reuse_tree {
            tree.clear();
        }

        let temperature = mcts.config().effective_temperature(moves);
        let result = mcts
            .search(game, &mut tree, &state, temperature)
            .with_context(|| format!("Search failed at move {}", moves))?;
        let action = result
            .distribution
            .sample(rng)
            .with_context(|| format!("Empty move distribution at move {}", moves))?;

        debug!(
            move_number = moves,
            player = ?game.player_to_move(&state),
            ?action,
            root_value = result.root_value,
            nodes = tree.len(),
            "Move played"
        );

        state = game.apply_action(&state, action);
        moves += 1;
    }
}

/// Play `options.games` games of `game` and tally the results.
fn run_games<G>(game: &G, config: &MctsConfig, options: &RunOptions) -> Result<Tally<G::Player>>
where
    G: Game,
{
    let mut tally = Tally::new();

    for i in 0..options.games {
        let game_seed = options.seed.wrapping_add(i as u64 * 1000);
        let oracle = DriverOracle::new(
            options.oracle,
            game_seed.wrapping_add(1),
            options.rollout_depth,
        );
        let mcts =
            Mcts::try_new(config.clone(), oracle).context("Invalid search parameters")?;
        let mut rng = ChaCha8Rng::seed_from_u64(game_seed);

        let episode = play_episode(game, &mcts, &mut rng, options.reuse_tree)
            .with_context(|| format!("Game {} failed", i))?;
        info!(
            game = i,
            moves = episode.moves,
            outcome = ?episode.outcome,
            "Game finished"
        );
        tally.record(&episode);
    }

    Ok(tally)
}

fn report<P: Copy + Eq + Debug>(tally: &Tally<P>, elapsed_secs: f64) {
    let games = tally.games().max(1);
    println!("\nCompleted {} games in {:.2}s", tally.games(), elapsed_secs);
    println!(
        "Average game length: {:.1} moves",
        tally.moves as f64 / games as f64
    );
    for (player, wins) in &tally.wins {
        println!(
            "Player {:?} wins: {} ({:.1}%)",
            player,
            wins,
            *wins as f64 / games as f64 * 100.0
        );
    }
    println!(
        "Ties: {} ({:.1}%)",
        tally.ties,
        tally.ties as f64 / games as f64 * 100.0
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = build_config(&cli)?;
    let options = RunOptions {
        games: cli.games,
        oracle: cli.oracle,
        rollout_depth: cli.rollout_depth,
        seed: cli.seed,
        reuse_tree: cli.reuse_tree,
    };

    info!(
        game = ?cli.game,
        games = options.games,
        simulations = config.num_simulations,
        cpuct = config.cpuct,
        temperature = config.temperature,
        oracle = ?options.oracle,
        seed = options.seed,
        "Starting self-play"
    );

    let start = Instant::now();
    match cli.game {
        GameKind::Tictactoe => {
            let tally = run_games(&TicTacToe, &config, &options)?;
            report(&tally, start.elapsed().as_secs_f64());
        }
        GameKind::Countdown => {
            let game = Countdown::new(cli.players, cli.tokens);
            let tally = run_games(&game, &config, &options)?;
            report(&tally, start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
