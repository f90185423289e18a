use clap::{Parser, Subcommand};
use mirror_image_info::display::{DisplayConfig, FileImageSource, run_widget};
use mirror_image_info::helper::serve_lines;
use mirror_image_info::install_check::{ExiftoolStatus, check_exiftool, install_instructions};
use mirror_image_info::{ImageInfoRequest, MetadataResolver};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mirror-image-info")]
#[command(version)]
#[command(about = "Shows the filename, date and location of the current mirror wallpaper")]
struct Cli {
    /// Log level
    #[arg(short = 'v', long, default_value = "info", global = true)]
    log_level: String,

    /// Use this exiftool executable instead of searching PATH
    #[arg(long, value_name = "PATH", global = true)]
    exiftool: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the metadata of one image and print it as JSON
    Resolve {
        path: PathBuf,
        /// Also look up location tags
        #[arg(long)]
        location: bool,
        /// Skip exiftool and use only the built-in sources
        #[arg(long)]
        no_exiftool: bool,
    },
    /// Answer GET_IMAGE_INFO notifications read as JSON lines on stdin
    Serve {
        #[arg(long)]
        location: bool,
        /// Skip exiftool and use only the built-in sources
        #[arg(long)]
        no_exiftool: bool,
    },
    /// Follow a file holding the current wallpaper source and print the
    /// rendered widget whenever it changes
    Watch {
        #[arg(long, value_name = "FILE")]
        source_file: PathBuf,
        /// JSON display configuration
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Check whether exiftool is installed
    CheckExiftool,
}

fn resolver(exiftool: Option<PathBuf>, location: bool, probe: bool) -> MetadataResolver {
    MetadataResolver::builder()
        .maybe_exiftool_path(exiftool)
        .include_location(location)
        .probe_exiftool(probe)
        .build()
}

fn print_exiftool_check(executable: &Path) {
    match check_exiftool(executable) {
        ExiftoolStatus::Installed { version } => {
            println!("ExifTool is installed (version {version}).");
            println!("Image creation dates will be read with ExifTool.");
        }
        ExiftoolStatus::Missing => {
            println!("ExifTool is not installed or not in your PATH.");
            println!("Image info will still work, but creation dates may be less accurate.");
            for hint in install_instructions(std::env::consts::OS) {
                println!("\nFor {}:", hint.platform);
                for step in hint.steps {
                    println!("  {step}");
                }
            }
            println!("\nSee https://exiftool.org/ for more information.");
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log_filter = format!("mirror_image_info={}", cli.log_level);
    // Stdout carries JSON or rendered HTML, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Resolve {
            path,
            location,
            no_exiftool,
        } => {
            let mut resolver = resolver(cli.exiftool, location, !no_exiftool);
            let result = resolver.resolve(&ImageInfoRequest::for_path(&path));
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Serve {
            location,
            no_exiftool,
        } => {
            info!("Starting metadata helper v{}", env!("CARGO_PKG_VERSION"));
            let resolver = resolver(cli.exiftool, location, !no_exiftool);
            serve_lines(resolver, tokio::io::stdin(), tokio::io::stdout()).await?;
        }
        Command::Watch {
            source_file,
            config,
        } => {
            let config = match config {
                Some(path) => {
                    let config = DisplayConfig::from_json_file(&path)?;
                    info!("Configuration loaded from: {}", path.display());
                    config
                }
                None => DisplayConfig::default(),
            };
            let resolver = resolver(cli.exiftool, config.show_location, true);
            let source = FileImageSource::new(source_file);
            tokio::select! {
                () = run_widget(config, source, resolver, |fragment| println!("{}", fragment.to_html())) => {}
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    info!("Interrupted, shutting down");
                }
            }
        }
        Command::CheckExiftool => {
            let executable = cli.exiftool.unwrap_or_else(|| PathBuf::from("exiftool"));
            print_exiftool_check(&executable);
        }
    }

    Ok(())
}
