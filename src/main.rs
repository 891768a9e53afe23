use clap::{Parser, Subcommand};
use floorsite::relay::{QuoteRelay, ResendMailer};
use floorsite::{config, generate, output, scan, server};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "floorsite")]
#[command(about = "Site builder and quote relay for a flooring business")]
#[command(long_about = "\
Site builder and quote relay for a flooring business

Markdown pages and a gallery catalog become a static site; `serve` hosts it
and relays contact form submissions to the business by email.

Content structure:

  content/
  ├── config.toml          # Business, gallery, relay, services, colors
  ├── gallery-config.xml   # <category id name/> and <image id category title description src/>
  ├── index.md             # Home page introduction
  ├── 010-about.md         # Page (numbered = shown in nav)
  ├── 020-services.md
  ├── warranty.md          # No number prefix = generated, hidden from nav
  └── assets/              # Copied to the output root (images, logo.svg)

The gallery catalog may also be an http(s) URL (`[gallery] catalog`).
The relay reads the email provider key from $RESEND_API_KEY by default.

Run 'floorsite gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".floorsite-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Produce the HTML site from the manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Serve the built site and relay quote requests
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let manifest_path = cli.temp_dir.join("manifest.json");

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source).await?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate => {
            let report = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&report);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source).await?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source).await?;
            output::print_scan_output(&manifest, &cli.source);
            if let Some(error) = manifest.gallery.error() {
                return Err(format!("gallery catalog: {error}").into());
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Serve { addr } => {
            if !cli.output.is_dir() {
                return Err(server::ServeError::MissingSite(cli.output.display().to_string()).into());
            }
            let site_config = config::load_config(&cli.source)?;
            let mailer = ResendMailer::from_config(&site_config.relay)?;
            let relay = QuoteRelay::new(mailer, &site_config);
            let app = server::router(relay, &site_config.relay.endpoint, Some(&cli.output));
            server::serve(addr, app).await?;
        }
    }

    Ok(())
}

fn write_manifest(manifest: &scan::Manifest, temp_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)?;
    Ok(())
}
