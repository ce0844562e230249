//! # ctp500 CLI
//!
//! Command-line interface for CTP500 thermal printing.
//!
//! ## Usage
//!
//! ```bash
//! # Print a message
//! ctp500 text --message "Hello World"
//!
//! # Print a text file with a TrueType font
//! ctp500 text --file notes.txt --font /usr/share/fonts/TTF/DejaVuSansMono.ttf --font-size 24
//!
//! # Print a picture
//! ctp500 image --file photo.jpg
//!
//! # Preview instead of printing
//! ctp500 --png preview.png image --file photo.jpg
//!
//! # Run the whole job against an in-memory link
//! ctp500 --dry-run text --message "test"
//!
//! # Query status / list services
//! ctp500 status --status-endpoint /dev/rfcomm0
//! ctp500 services
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};

use ctp500::{
    Ctp500Error,
    job::{self, RasterJob},
    printer::{BitPolarity, Config, config::parse_truthy},
    transport::{ChunkedTransport, DeviceLink, MemoryLink, SerialLink, ServiceInfo, serial},
};

/// ctp500 - CTP500 thermal printer utility
#[derive(Parser, Debug)]
#[command(name = "ctp500")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    link: LinkArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
struct LinkArgs {
    /// Printer device path
    #[arg(long, global = true, env = "CTP500_DEVICE", default_value = serial::DEFAULT_DEVICE)]
    device: PathBuf,

    /// Print width in dots
    #[arg(long, global = true, env = "CTP500_PRINTER_WIDTH", default_value_t = 384)]
    width: u32,

    /// Bytes per device write
    #[arg(long, global = true, default_value_t = 180)]
    chunk_size: usize,

    /// Pause after each raster chunk (ms)
    #[arg(long, global = true, default_value_t = 20)]
    chunk_delay_ms: u64,

    /// Pause after each control sequence (ms)
    #[arg(long, global = true, default_value_t = 100)]
    command_delay_ms: u64,

    /// Invert data bits (1 = black) for firmware that expects it
    #[arg(
        long,
        global = true,
        env = "CTP500_BLACK_IS_ONE",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = parse_flag,
    )]
    black_is_one: bool,

    /// Output to PNG file instead of printing
    #[arg(long, global = true, value_name = "FILE")]
    png: Option<PathBuf>,

    /// Send the job to an in-memory link instead of the device
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print text, word-wrapped to the paper width
    Text {
        /// Text to print
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        message: Option<String>,

        /// Read the text from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// TrueType/OpenType font (built-in font if omitted)
        #[arg(long, env = "CTP500_FONT")]
        font: Option<PathBuf>,

        /// Font size in points
        #[arg(long, env = "CTP500_FONT_SIZE", default_value_t = 28.0)]
        font_size: f32,
    },

    /// Print an image file
    Image {
        /// Image to print (PNG, JPEG, ...)
        #[arg(long)]
        file: PathBuf,
    },

    /// Request printer status
    Status {
        /// Endpoint the status reply is read from
        #[arg(long, env = "CTP500_STATUS_UUID")]
        status_endpoint: Option<String>,
    },

    /// List the device's services and characteristics
    Services,
}

fn parse_flag(value: &str) -> Result<bool, String> {
    Ok(parse_truthy(value))
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_config(link: &LinkArgs) -> Config {
    let mut config = Config::default();
    config.printer.width_dots = link.width;
    config.printer = config
        .printer
        .with_polarity(BitPolarity::from_black_is_one(link.black_is_one));
    config.transport.chunk_size = link.chunk_size;
    config.transport.chunk_delay = Duration::from_millis(link.chunk_delay_ms);
    config.transport.command_delay = Duration::from_millis(link.command_delay_ms);
    config
}

async fn run() -> Result<(), Ctp500Error> {
    let cli = Cli::parse();
    let mut config = build_config(&cli.link);

    match cli.command {
        Commands::Text {
            message,
            file,
            font,
            font_size,
        } => {
            let text = match (message, file) {
                (Some(message), _) => message,
                (None, Some(path)) => std::fs::read_to_string(&path)?,
                (None, None) => String::new(),
            };
            let text = text.trim();
            if text.is_empty() {
                return Err(Ctp500Error::Config("no text to print".to_string()));
            }

            config.text.font_path = font;
            config.text.font_size = font_size;

            let job = job::text_job(text, &config)?;
            for warning in &job.warnings {
                eprintln!("Warning: {}", warning);
            }
            output(&cli.link, &config, job).await?;
        }

        Commands::Image { file } => {
            let image = job::load_image(&file)?;
            let job = job::image_job(&image, &config)?;
            output(&cli.link, &config, job).await?;
        }

        Commands::Status { status_endpoint } => {
            config.transport.status_endpoint = status_endpoint;
            let reply = if cli.link.dry_run {
                let endpoint = config.transport.status_endpoint.clone().unwrap_or_default();
                let link = MemoryLink::new().with_response(&endpoint, Vec::new());
                ChunkedTransport::new(link, config.transport.clone())?
                    .request_status()
                    .await?
            } else {
                let link = SerialLink::open(&cli.link.device)?;
                ChunkedTransport::new(link, config.transport.clone())?
                    .request_status()
                    .await?
            };
            match reply {
                Some(bytes) => println!("Status: {:02X?}", bytes),
                None => println!("No status endpoint configured"),
            }
        }

        Commands::Services => {
            let services = if cli.link.dry_run {
                MemoryLink::new().list_services().await?
            } else {
                SerialLink::open(&cli.link.device)?.list_services().await?
            };
            print_services(&services);
        }
    }

    Ok(())
}

/// Save a preview or send the job to the printer.
async fn output(link: &LinkArgs, config: &Config, job: RasterJob) -> Result<(), Ctp500Error> {
    if let Some(png_path) = &link.png {
        job.bitmap.save_png(png_path)?;
        println!(
            "Saved {}x{} preview to {}",
            job.bitmap.width(),
            job.bitmap.height(),
            png_path.display()
        );
        return Ok(());
    }

    if link.dry_run {
        let mut transport_config = config.transport.clone();
        transport_config.chunk_delay = Duration::ZERO;
        transport_config.command_delay = Duration::ZERO;
        let memory = MemoryLink::new().with_max_payload(transport_config.chunk_size);
        let mut transport = ChunkedTransport::new(memory, transport_config)?;
        let report = transport.print(&job.data).await?;
        println!(
            "Dry run: {} writes ({} raster chunks, {} raster bytes)",
            transport.link().write_count(),
            report.chunks,
            report.bytes
        );
        return Ok(());
    }

    let serial = SerialLink::open(&link.device)?;
    let mut transport = ChunkedTransport::new(serial, config.transport.clone())?;
    let report = transport.print(&job.data).await?;
    println!(
        "Printed successfully to {}! ({} chunks, {} bytes)",
        transport.link().path().display(),
        report.chunks,
        report.bytes
    );
    Ok(())
}

fn print_services(services: &[ServiceInfo]) {
    if services.is_empty() {
        println!("No services reported");
        return;
    }
    for service in services {
        println!("Service {} ({})", service.uuid, service.description);
        for ch in &service.characteristics {
            println!(
                "  {} [{}] {}",
                ch.uuid,
                ch.properties.join(", "),
                ch.description
            );
        }
    }
}
