use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use snakepath_core::{App, AppConfig};
use snakepath_crossterm::CrosstermDriver;
use snake_lib::{Game, Phase, ReplanPolicy, SnakeConfig, SteeringPolicy};

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Terminal snake steered by A* path finding")]
struct Cli {
    /// Playfield width (defaults to the terminal width)
    #[arg(long)]
    width: Option<i32>,

    /// Playfield height (defaults to the terminal height minus the status line)
    #[arg(long)]
    height: Option<i32>,

    /// Starting length of the snake
    #[arg(long, default_value = "3")]
    length: usize,

    /// Milliseconds per tick
    #[arg(long, default_value = "40")]
    tick_ms: u64,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the autopilot off
    #[arg(long)]
    manual: bool,

    /// When the autopilot searches for a new path
    #[arg(long, value_enum, default_value_t = ReplanPolicy::EveryTick)]
    replan: ReplanPolicy,

    /// How planned steps turn into headings
    #[arg(long, value_enum, default_value_t = SteeringPolicy::Direct)]
    steering: SteeringPolicy,

    /// Make the screen edges lethal instead of wrapping around
    #[arg(long)]
    no_wrap: bool,

    /// Give up a search after this many expanded cells
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Where to write the log (the terminal is busy with the game)
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    /// Run this many ticks without a terminal and print the score
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
}

fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let (term_w, term_h) = if cli.headless.is_some() {
        (80, 24)
    } else {
        CrosstermDriver::size()
    };
    let width = cli.width.unwrap_or(term_w);
    let height = cli.height.unwrap_or(term_h - 1);

    let mut config = SnakeConfig {
        width,
        height,
        initial_length: cli.length,
        tick: Duration::from_millis(cli.tick_ms.max(1)),
        seed: cli.seed,
        autopilot: !cli.manual,
        replan: cli.replan,
        steering: cli.steering,
        wrap: !cli.no_wrap,
        max_expansions: cli.max_expansions,
    };
    if cli.headless.is_none() && config.fit_to_screen(term_w, term_h) {
        log::warn!(
            "field {width}x{height} does not fit a {term_w}x{term_h} terminal, using {}x{}",
            config.width,
            config.height
        );
    }
    log::info!("starting with {config:?}");

    if let Some(ticks) = cli.headless {
        let mut game = Game::new(config);
        for _ in 0..ticks {
            game.step();
            if game.phase() == Phase::Over {
                break;
            }
        }
        println!(
            "score {} after {} ticks ({} searches)",
            game.score(),
            game.ticks(),
            game.autopilot().searches()
        );
        return Ok(());
    }

    let tick = config.tick;
    let mut app = App::new(AppConfig {
        model: Game::new(config),
        driver: CrosstermDriver::new(),
        width: term_w,
        height: term_h,
        tick: Some(tick),
    });
    app.run()?;
    println!("best score: {}", app.model().best());
    Ok(())
}
