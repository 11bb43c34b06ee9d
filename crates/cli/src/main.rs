use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use faceveil_core::blurring::domain::face_count_overlay::FaceCountOverlay;
use faceveil_core::blurring::domain::redaction_config::RedactionConfig;
use faceveil_core::blurring::domain::redactor::Redactor;
use faceveil_core::blurring::infrastructure::blurrer_factory::create_blurrer;
use faceveil_core::detection::domain::detector_config::DetectorConfig;
use faceveil_core::detection::domain::face_locator::FaceLocator;
use faceveil_core::detection::infrastructure::cascade_face_detector::CascadeFaceDetector;
use faceveil_core::pipeline::anonymize_stream_use_case::AnonymizeStreamUseCase;
use faceveil_core::pipeline::pipeline_logger::ConsolePipelineLogger;
use faceveil_core::shared::constants::{CASCADE_MODEL_NAME, CASCADE_MODEL_URL, WINDOW_TITLE};
use faceveil_core::shared::model_resolver;
use faceveil_core::video::domain::frame_source::{FrameSource, SourceSpec};
use faceveil_core::video::infrastructure::highgui_presenter::HighGuiPresenter;
use faceveil_core::video::infrastructure::source_factory::open_source;

/// Live face anonymization: blurs every detected face in a webcam feed or
/// video file and shows the result.
#[derive(Parser)]
#[command(name = "faceveil", version)]
struct Cli {
    /// Video or image file to anonymize. Uses the default webcam when omitted.
    source: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let spec = SourceSpec::from_arg(cli.source);

    match &spec {
        SourceSpec::File(path) => log::info!("Using video file: {}", path.display()),
        SourceSpec::Camera(_) => log::info!("Using webcam (to use video file: faceveil video.mp4)"),
    }

    let (source, locator) = open_then(&spec, build_locator)?;
    let redactor = Redactor::new(
        create_blurrer(&RedactionConfig::default())?,
        FaceCountOverlay::default(),
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;

    let presenter = HighGuiPresenter::new(WINDOW_TITLE, interrupted);

    log::info!("Press 'q' to quit");
    let mut use_case = AnonymizeStreamUseCase::new(
        source,
        locator,
        redactor,
        Box::new(presenter),
        Box::new(ConsolePipelineLogger::default()),
    );
    let summary = use_case.execute()?;

    log::info!("Processed {} frames", summary.frames_processed);
    log::info!("Done!");
    Ok(())
}

/// Opens the source before running `build`, so a bad source is reported
/// without resolving (and possibly downloading) the detector model.
fn open_then<T>(
    spec: &SourceSpec,
    build: impl FnOnce() -> Result<T, Box<dyn std::error::Error>>,
) -> Result<(Box<dyn FrameSource>, T), Box<dyn std::error::Error>> {
    let source = open_source(spec)?;
    let built = build()?;
    Ok((source, built))
}

fn build_locator() -> Result<FaceLocator, Box<dyn std::error::Error>> {
    let bundled = std::env::current_dir().ok();
    let model_path = model_resolver::resolve(
        CASCADE_MODEL_NAME,
        CASCADE_MODEL_URL,
        bundled.as_deref(),
        Some(Box::new(download_progress)),
    )?;

    let detector = CascadeFaceDetector::new(&model_path)?;
    Ok(FaceLocator::new(Box::new(detector), DetectorConfig::default())?)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face cascade... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading face cascade... {downloaded} bytes");
    }
}
