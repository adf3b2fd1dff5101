use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::Parser;
use petgraph::dot::{Config, Dot};
use serde::Serialize;
use coup_engine::history::{eliminations, interaction_graph};
use coup_engine::{DecisionProvider, Game, GameConfig, GameEvent, PlayerId, RandomAi};

#[derive(Parser)]
#[command(version, about = "Simulate games of Coup between random players", long_about = None)]
struct Args {
    /// Seats at the table (overrides the config file)
    #[arg(short, long)]
    players: Option<usize>,

    /// Number of games to play
    #[arg(short, long, default_value_t = 1)]
    games: usize,

    /// Seed for the first game, later games use seed + n
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 0.2)]
    challenge_rate: f64,

    #[arg(long, default_value_t = 0.3)]
    block_rate: f64,

    /// JSON file holding a game config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Give up on a game after this many seats have been played
    #[arg(long, default_value_t = 10_000)]
    max_turns: usize,

    /// Write one CSV row per game
    #[arg(long)]
    results: Option<PathBuf>,

    /// Write every game event as JSON lines
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write a Graphviz graph of who targeted, challenged and blocked whom
    #[arg(long)]
    graph: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GameRecord {
    game: usize,
    seed: Option<u64>,
    players: usize,
    turns: usize,
    winner: Option<PlayerId>,
    // seat ids in the order they were knocked out
    eliminated: String,
}

#[derive(Serialize)]
struct EventLine<'a> {
    game: usize,
    #[serde(flatten)]
    event: &'a GameEvent,
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(file).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if let Some(players) = args.players {
        config.num_players = players;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    Ok(config)
}

fn new_game(config: GameConfig, args: &Args) -> Result<Game> {
    let providers = (0..config.num_players)
        .map(|player_idx| {
            let seed = match config.seed {
                Some(seed) => seed.wrapping_mul(31).wrapping_add(player_idx as u64 + 1),
                None => rand::random(),
            };
            let ai = RandomAi::new(seed)
                .with_challenge_rate(args.challenge_rate)
                .with_block_rate(args.block_rate);
            Box::new(ai) as Box<dyn DecisionProvider>
        })
        .collect();

    Game::new(config, providers).context("setting up the table")
}

fn report(winners: &[Option<PlayerId>], n_players: usize) {
    let mut win_counts: HashMap<PlayerId, usize> = HashMap::new();
    for winner in winners.iter().flatten() {
        *win_counts.entry(*winner).or_default() += 1;
    }

    let total_games = winners.len();
    for player_idx in 0..n_players {
        let wins = win_counts.get(&player_idx).copied().unwrap_or(0);
        println!("Win count for P{player_idx}: {wins}/{total_games}, ratio: {:.3}", wins as f64 / total_games as f64);
    }

    let unfinished = winners.iter().filter(|w| w.is_none()).count();
    if unfinished > 0 {
        println!("{unfinished} game(s) hit the turn limit");
    }
}

fn write_results(records: &[GameRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_events(games: &[(usize, Vec<GameEvent>)], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for (game, events) in games {
        for event in events {
            serde_json::to_writer(&mut writer, &EventLine { game: *game, event })?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_graph(events: &[GameEvent], n_players: usize, path: &Path) -> Result<()> {
    let graph = interaction_graph(events, n_players);
    let dot = Dot::with_config(&graph, &[Config::NodeIndexLabel]);
    std::fs::write(path, format!("{:?}", dot)).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let base = load_config(&args)?;
    log::info!("Running {} game(s) with {} players", args.games, base.num_players);

    let mut records = Vec::with_capacity(args.games);
    let mut histories = Vec::with_capacity(args.games);

    for game_idx in 0..args.games {
        let mut config = base.clone();
        config.seed = base.seed.map(|seed| seed.wrapping_add(game_idx as u64));

        let mut game = new_game(config.clone(), &args)?;
        let winner = game.play_to_end(Some(args.max_turns))?;

        match winner {
            Some(winner) => println!("Game {game_idx}: player {winner} wins after {} turns", game.turn()),
            None => println!("Game {game_idx}: no winner after {} turns", game.turn()),
        }

        let eliminated = eliminations(game.history())
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        records.push(GameRecord {
            game: game_idx,
            seed: config.seed,
            players: game.num_players(),
            turns: game.turn(),
            winner,
            eliminated,
        });
        histories.push((game_idx, game.history().to_vec()));
    }

    if args.games > 1 {
        let winners: Vec<Option<PlayerId>> = records.iter().map(|r| r.winner).collect();
        report(&winners, base.num_players);
    }

    if let Some(path) = &args.results {
        write_results(&records, path)?;
    }
    if let Some(path) = &args.events {
        write_events(&histories, path)?;
    }
    if let Some(path) = &args.graph {
        let all_events: Vec<GameEvent> = histories.into_iter().flat_map(|(_, events)| events).collect();
        write_graph(&all_events, base.num_players, path)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    run(Args::parse())
}
