use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use watermarkize::acquisition::FileImageProvider;
use watermarkize::config::AppConfig;
use watermarkize::error::AppError;
use watermarkize::notify::TracingNotifier;
use watermarkize::permissions::{StaticDeviceInfo, StaticPermissionBroker};
use watermarkize::persistence::{SaveTarget, TokioFileSystem};
use watermarkize::session::{ActionOutcome, CancelToken, Collaborators, SessionController};
use watermarkize::watermark::ImageMarker;

/// Watermarkize - stamp "Created with Watermarkize" onto a photo and save it
#[derive(Parser, Debug)]
#[command(name = "watermarkize")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture a photo with the (file-backed) camera
    Capture(RunArgs),
    /// Pick a photo from the (file-backed) library
    Pick(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Image file the picker hands back
    #[arg(short, long)]
    input: PathBuf,

    /// Mark the photo but do not save it
    #[arg(long)]
    no_save: bool,

    /// Print the marked image as a data URI on stdout
    #[arg(long)]
    print_data_uri: bool,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path)
            .map_err(AppError::Config)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;

    watermarkize::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize logging subsystem")?;

    tracing::info!(
        config_file = ?args.config,
        downloads_dir = %config.storage.downloads_dir.display(),
        os_version = %config.device.os_version,
        "Configuration loaded successfully"
    );

    let (run, provider, is_capture) = match args.command {
        Command::Capture(run) => {
            let provider = FileImageProvider::new().with_capture_input(&run.input);
            (run, provider, true)
        }
        Command::Pick(run) => {
            let provider = FileImageProvider::new().with_library_input(&run.input);
            (run, provider, false)
        }
    };

    let collaborators = Collaborators {
        permission_broker: Arc::new(StaticPermissionBroker::new(config.permissions.clone())),
        device_info: Arc::new(StaticDeviceInfo::new(&config.device)),
        image_provider: Arc::new(provider),
        marking_engine: Arc::new(ImageMarker::new(config.marker.cache_dir())),
        file_system: Arc::new(TokioFileSystem),
        notifier: Arc::new(TracingNotifier::new().with_stderr()),
    };
    let controller =
        SessionController::new(collaborators, SaveTarget::at_startup(&config.storage.downloads_dir));

    controller.start().await;

    // Ctrl-C abandons whatever action is in flight
    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let outcome = if is_capture {
        controller.open_camera(&cancel).await
    } else {
        controller.open_gallery(&cancel).await
    };

    match outcome {
        ActionOutcome::Completed => {}
        ActionOutcome::NoSelection => {
            tracing::info!("No photo selected");
            return Ok(());
        }
        ActionOutcome::Cancelled => return Err(AppError::Cancelled.into()),
        ActionOutcome::Rejected(reason) => bail!("Action refused: {:?}", reason),
        ActionOutcome::Failed(e) => {
            return Err(anyhow::Error::new(e).context("Failed to mark photo"));
        }
    }

    if run.print_data_uri {
        if let Some(payload) = controller.state().payload {
            println!("{}", payload);
        }
    }

    if run.no_save {
        return Ok(());
    }

    match controller.save_to_device(&cancel).await {
        ActionOutcome::Completed => {
            tracing::info!(path = %controller.save_path().display(), "Done");
            Ok(())
        }
        ActionOutcome::Failed(e) => Err(anyhow::Error::new(e).context("Failed to save photo")),
        ActionOutcome::Rejected(reason) => bail!("Save refused: {:?}", reason),
        ActionOutcome::Cancelled => Err(AppError::Cancelled.into()),
        ActionOutcome::NoSelection => Ok(()),
    }
}
