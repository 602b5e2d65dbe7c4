//! jigsnap command line entry point.

use clap::Parser;
use jigsnap_app::Session;
use jigsnap_core::{PuzzleOptions, open_image};
use kurbo::Size;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jigsnap", version, about = "Headless jigsaw puzzle session")]
struct Cli {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// JSON options file
    #[arg(long)]
    options: Option<PathBuf>,

    /// Picture to cut into pieces (PNG, JPEG or WebP)
    #[arg(long)]
    image: Option<PathBuf>,

    #[arg(long, default_value_t = 1024.0)]
    board_width: f64,

    #[arg(long, default_value_t = 768.0)]
    board_height: f64,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of columns
    #[arg(long)]
    columns: Option<u32>,

    /// Override the number of rows
    #[arg(long)]
    rows: Option<u32>,

    /// Override the snap distance in pixels
    #[arg(long)]
    snap_distance: Option<f64>,

    /// Let the bot solve the puzzle
    #[arg(long)]
    autoplay: bool,

    /// Drop budget for the bot
    #[arg(long, default_value_t = 10_000)]
    max_drags: u32,
}

impl Cli {
    fn puzzle_options(&self) -> Result<PuzzleOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.options {
            Some(path) => PuzzleOptions::load(path)?,
            None => PuzzleOptions::default(),
        };
        if let Some(columns) = self.columns {
            options.pieces.x = columns;
        }
        if let Some(rows) = self.rows {
            options.pieces.y = rows;
        }
        if let Some(snap_distance) = self.snap_distance {
            options.snap_distance = snap_distance;
        }
        options.validate()?;
        Ok(options)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();
    log::info!("Starting jigsnap");

    let options = cli.puzzle_options()?;
    let image = cli.image.as_deref().map(open_image).transpose()?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let board = Size::new(cli.board_width, cli.board_height);
    let mut session = Session::new(options, board, image, seed)?;
    let spec = *session.puzzle().grid().spec();
    println!(
        "{}x{} puzzle, {} pieces of {}x{} px, seed {}",
        spec.columns,
        spec.rows,
        spec.piece_count(),
        spec.piece_width,
        spec.piece_height,
        seed
    );

    if cli.autoplay {
        let mut rng = StdRng::seed_from_u64(seed);
        let report = session.autoplay(cli.max_drags, &mut rng)?;
        if report.solved {
            println!("solved in {} drags", report.drags);
        } else {
            println!(
                "unsolved after {} drags, {} groups left",
                report.drags, report.groups_left
            );
        }
    }
    Ok(())
}
