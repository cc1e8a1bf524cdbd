use clap::{Args, Parser, Subcommand};
use coinsum::counter::{count_coins, export_json, CountOptions};
use coinsum_core::Denominations;
use coinsum_cv::{
    detection::{DetectionConfig, RadiusMaxMode},
    visualize::OverlayRenderer,
    PreprocessConfig, Result,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coinsum")]
#[command(about = "Detect coins with a circle Hough transform and sum their value")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect and value the coins in an image.
    Detect(DetectArgs),

    /// Print the default detection configuration as JSON.
    Config,
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// The input is already a binary edge map; skip preprocessing.
    #[arg(long)]
    edge_map: bool,

    /// JSON detection config; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sweep radii up to half the shorter image dimension (slow).
    #[arg(long)]
    exhaustive: bool,

    /// Override the vote threshold.
    #[arg(long)]
    threshold: Option<u32>,

    /// Denominations file: three `label,value` lines, smallest coin first.
    #[arg(long)]
    denominations: Option<PathBuf>,

    /// Path to write detection results (JSON).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Path to write the annotated image.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Directory to dump intermediate preprocessing stages into.
    #[arg(long)]
    steps_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&DetectionConfig::default())?);
            Ok(())
        }
    }
}

fn run_detect(args: &DetectArgs) -> Result<()> {
    let mut detection = match &args.config {
        Some(path) => DetectionConfig::load(path)?,
        None => DetectionConfig::default(),
    };
    if args.exhaustive {
        detection.radius_max_mode = RadiusMaxMode::HalfShorterDimension;
    }
    if let Some(threshold) = args.threshold {
        detection.vote_threshold = threshold;
    }

    let denominations = match &args.denominations {
        Some(path) => Denominations::load(path)?,
        None => Denominations::default(),
    };

    let options = CountOptions {
        detection,
        preprocess: PreprocessConfig {
            steps_dir: args.steps_dir.clone(),
            ..Default::default()
        },
        edge_map: args.edge_map,
        denominations,
        tier_margin: None,
    };

    tracing::info!("Loading image: {}", args.image.display());
    let report = count_coins(&args.image, &options)?;

    if let Some(valuation) = &report.valuation {
        for coin in &valuation.coins {
            tracing::info!(
                x = coin.circle.x,
                y = coin.circle.y,
                r = coin.circle.r,
                tier = ?coin.tier,
                value = coin.value,
                "coin"
            );
        }
        if let Some(path) = &args.overlay {
            OverlayRenderer::default().render_to_file(&report.working_image, valuation, path)?;
        }
    } else if args.overlay.is_some() {
        tracing::warn!("No coins detected; overlay not written");
    }

    if let Some(path) = &args.out {
        export_json(&report, path)?;
        tracing::info!("Results written to {}", path.display());
    }

    println!("total money in picture: {:.2}", report.total());
    println!("number of circles in picture: {}", report.coin_count());
    Ok(())
}
