//! Tubely CLI: run the ingest pipeline against local files.
//!
//! Configuration comes from the environment (and `.env`); see `tubely_core::Config`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tubely_cli::{print_json, report_error, ProbeReport};
use tubely_core::validation::validate_video_content_type;
use tubely_core::{AppError, Config, ErrorMetadata};
use tubely_infra::{init_telemetry, LogFormat};
use tubely_processing::{
    DimensionProbe, FfprobeProbe, MediaFile, SignedAccessIssuer, UploadOrchestrator,
};
use tubely_storage::create_storage;

#[derive(Parser)]
#[command(name = "tubely", about = "Tubely video ingest tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dimensions and orientation of a video file
    Probe {
        /// Path to the video file
        file: PathBuf,
    },
    /// Remux a video for fast start and upload it to the object store
    Upload {
        /// Path to the video file
        file: PathBuf,
        /// Declared content type of the file
        #[arg(long, default_value = "video/mp4")]
        content_type: String,
    },
    /// Print a signed URL for a stored `bucket,key` reference
    Sign {
        /// Stored reference, e.g. "tubely-videos,landscape/abc.mp4"
        reference: String,
        /// URL lifetime in seconds (defaults to SIGNED_URL_EXPIRY_SECS)
        #[arg(long)]
        expires_secs: Option<u64>,
    },
}

fn load_config() -> Result<Config, AppError> {
    let config = Config::from_env()
        .and_then(|config| config.validate().map(|()| config))
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;
    Ok(config)
}

fn print_output(value: &impl serde::Serialize) -> Result<(), AppError> {
    print_json(value).map_err(|e| AppError::Internal(format!("{:#}", e)))
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let log_format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or_default();
    if let Err(e) = init_telemetry("tubely", log_format) {
        eprintln!("Failed to initialize tracing: {}", e);
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", report_error(&err));
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Probe { file } => {
            let config = Config::from_env().map_err(|e| AppError::Config(format!("{:#}", e)))?;
            let probe = FfprobeProbe::new(config.ffprobe_path.clone(), config.probe_timeout);
            let dimensions = probe.probe_dimensions(&file).await?;
            print_output(&ProbeReport::new(&file, dimensions))?;
        }
        Commands::Upload { file, content_type } => {
            let config = load_config()?;
            let media_type = validate_video_content_type(&content_type)?;
            let storage = create_storage(&config).await?;
            let orchestrator = UploadOrchestrator::from_config(&config, storage);

            let media = MediaFile::open(media_type, &file).await.map_err(|e| {
                AppError::NotFound(format!("Failed to open {}: {}", file.display(), e))
            })?;
            let reference = orchestrator.upload(media).await?;
            println!("{}", reference.encode());
        }
        Commands::Sign {
            reference,
            expires_secs,
        } => {
            let config = load_config()?;
            let storage = create_storage(&config).await?;
            let issuer = SignedAccessIssuer::with_default_expiry(storage, config.signed_url_expiry);
            let expiry = expires_secs
                .map(Duration::from_secs)
                .unwrap_or(issuer.default_expiry());

            let signed = issuer.issue_for(&reference, expiry).await?;
            print_output(&signed)?;
        }
    }

    Ok(())
}
