use clap::Parser;
use court_analytics::{AnalyticsConfig, FrameInput, MatchSession};
use std::{error::Error, fs::File, io::BufReader, path::PathBuf, process::ExitCode};

/// Turn per-frame tracked detections into court-space match analytics.
#[derive(Parser, Debug)]
#[command(name = "court-analytics", version, about)]
struct Cli {
    /// JSON array of frames: `[{"frame_idx": 0, "detections": [...], "shuttle": [x, y]}]`.
    #[arg(long)]
    frames: PathBuf,

    /// Session config (JSON). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report path; overrides `output_path` from the config.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log level; overrides `logging.level` from the config.
    #[arg(long)]
    log_level: Option<String>,

    /// Grayscale-convertible image of the court, tried for automatic
    /// calibration when the config has no reference points.
    #[cfg(feature = "image")]
    #[arg(long)]
    court_frame: Option<PathBuf>,
}

#[cfg(feature = "image")]
fn auto_calibrate(session: &mut MatchSession, cli: &Cli) -> Result<(), Box<dyn Error>> {
    if let (false, Some(path)) = (session.is_calibrated(), &cli.court_frame) {
        let img = image::ImageReader::open(path)?.decode()?.to_luma8();
        session.try_auto_calibrate(&court_analytics::frame::gray_view(&img));
    }
    Ok(())
}

#[cfg(not(feature = "image"))]
fn auto_calibrate(_session: &mut MatchSession, _cli: &Cli) -> Result<(), Box<dyn Error>> {
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => AnalyticsConfig::load_json(path)?,
        None => AnalyticsConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    config.validate()?;

    #[cfg(feature = "tracing")]
    court_analytics::init_tracing(&config.logging, false)?;
    #[cfg(not(feature = "tracing"))]
    court_analytics::init_logging(&config.logging)?;

    let mut session = MatchSession::new(&config)?;

    auto_calibrate(&mut session, &cli)?;

    let reader = BufReader::new(File::open(&cli.frames)?);
    let frames: Vec<FrameInput> = serde_json::from_reader(reader)?;
    log::info!("loaded {} frames from {}", frames.len(), cli.frames.display());

    session.process_all(&frames)?;

    let report = session.report();
    let out = cli.output.clone().unwrap_or_else(|| config.output_path());
    report.write_json(&out)?;

    println!("{}", report.summary_line());
    println!("report written to {}", out.display());
    Ok(())
}
