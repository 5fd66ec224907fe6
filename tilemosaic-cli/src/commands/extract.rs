//! `extract` command: download an area and write the mosaic.

use std::path::{Path, PathBuf};

use clap::Args;
use tilemosaic::config::ConfigFile;
use tilemosaic::orchestrator::{ExtractRequest, MosaicOrchestrator};
use tilemosaic::provider::{AsyncReqwestClient, XyzTileSource};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::common::AreaArgs;
use crate::error::CliError;
use crate::progress::DownloadProgress;

/// Arguments for `extract`.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub area: AreaArgs,

    /// Tile source base URL, the part before /{z}/{x}/{y} (default from config)
    #[arg(long)]
    pub source: Option<String>,

    /// Appended after the tile row, e.g. "@2x.jpg?key=KEY" (default from config)
    #[arg(long, allow_hyphen_values = true)]
    pub suffix: Option<String>,

    /// Output mosaic path; the world file is written next to it
    #[arg(long, short, default_value = "mosaic.jpg")]
    pub output: PathBuf,

    /// Number of tile requests in flight (default from config: 16)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Timeout in seconds for each tile request (default from config: 30)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Write each tile as {x}_{y}.jpg plus world file into DIR instead of a mosaic
    #[arg(long, value_name = "DIR")]
    pub tiles_only: Option<PathBuf>,
}

/// Everything `extract` needs once flags and config are merged.
#[derive(Debug)]
struct ResolvedExtract {
    request: ExtractRequest,
    url: String,
    suffix: String,
    timeout: u64,
    jpeg_quality: u8,
}

fn resolve(args: &ExtractArgs, config: &ConfigFile) -> Result<ResolvedExtract, CliError> {
    let url = args
        .source
        .clone()
        .or_else(|| config.source.url.clone())
        .ok_or_else(|| {
            CliError::Config(
                "No tile source configured. Pass --source or run \
                 'tilemosaic config set source.url <URL>'"
                    .to_string(),
            )
        })?;

    let mut request = args.area.to_request(config)?;
    if let Some(concurrency) = args.concurrency {
        request = request.with_concurrency(concurrency);
    }

    Ok(ResolvedExtract {
        request,
        url,
        suffix: args
            .suffix
            .clone()
            .unwrap_or_else(|| config.source.suffix.clone()),
        timeout: args.timeout.unwrap_or(config.download.timeout),
        jpeg_quality: config.mosaic.jpeg_quality,
    })
}

/// Run the extract command.
pub fn run(args: ExtractArgs) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let resolved = resolve(&args, &config)?;

    let client = AsyncReqwestClient::with_timeout(resolved.timeout)
        .map_err(|e| CliError::Setup(e.to_string()))?;
    let source = XyzTileSource::new(client, resolved.url.as_str(), resolved.suffix.as_str());
    let orchestrator = MosaicOrchestrator::new(source);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Setup(format!("Failed to start async runtime: {}", e)))?;

    let cancellation = CancellationToken::new();
    let on_signal = cancellation.clone();
    ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("Received interrupt, cancelling downloads...");
        on_signal.cancel();
    })
    .map_err(|e| CliError::Setup(format!("Failed to set signal handler: {}", e)))?;

    let progress = DownloadProgress::new();

    match &args.tiles_only {
        Some(dir) => {
            let fetched = runtime.block_on(orchestrator.fetch_tiles(
                &resolved.request,
                &cancellation,
                &progress,
            ));
            progress.finish();
            let (grid, tiles) = fetched?;
            std::fs::create_dir_all(dir).map_err(|error| write_error(dir, error))?;
            for tile in tiles.iter() {
                tile.save(dir).map_err(|error| write_error(dir, error))?;
            }
            info!(tiles = tiles.len(), dir = %dir.display(), "Tiles written");
            println!("Wrote {} tiles ({}) to {}", tiles.len(), grid, dir.display());
        }
        None => {
            let mosaic = runtime.block_on(orchestrator.extract_with_progress(
                &resolved.request,
                cancellation,
                &progress,
            ));
            progress.finish();
            let mosaic = mosaic?;
            mosaic
                .save_with_quality(&args.output, resolved.jpeg_quality)
                .map_err(|error| write_error(&args.output, error))?;
            println!(
                "Wrote {} ({} × {} px) and its world file",
                args.output.display(),
                mosaic.width(),
                mosaic.height()
            );
        }
    }

    Ok(())
}

fn write_error(path: &Path, error: std::io::Error) -> CliError {
    CliError::FileWrite {
        path: path.display().to_string(),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::BboxArg;

    fn args(source: Option<&str>) -> ExtractArgs {
        ExtractArgs {
            area: AreaArgs {
                bbox: BboxArg {
                    west: 2.25,
                    north: 48.9,
                    east: 2.42,
                    south: 48.8,
                },
                degrees: true,
                zoom: 12,
                max_tiles: None,
                low_dpi: false,
            },
            source: source.map(str::to_string),
            suffix: None,
            output: PathBuf::from("mosaic.jpg"),
            concurrency: None,
            timeout: None,
            tiles_only: None,
        }
    }

    #[test]
    fn test_missing_source_is_config_error() {
        let err = resolve(&args(None), &ConfigFile::default()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_source_from_config() {
        let mut config = ConfigFile::default();
        config.source.url = Some("https://tiles.example.com".to_string());
        config.source.suffix = "@2x.jpg?key=k".to_string();
        config.download.timeout = 12;

        let resolved = resolve(&args(None), &config).unwrap();
        assert_eq!(resolved.url, "https://tiles.example.com");
        assert_eq!(resolved.suffix, "@2x.jpg?key=k");
        assert_eq!(resolved.timeout, 12);
        assert_eq!(resolved.jpeg_quality, 100);
    }

    #[test]
    fn test_flags_win_over_config() {
        let mut config = ConfigFile::default();
        config.source.url = Some("https://config.example.com".to_string());

        let mut cli = args(Some("https://flag.example.com"));
        cli.suffix = Some(".png".to_string());
        cli.concurrency = Some(2);
        cli.timeout = Some(5);

        let resolved = resolve(&cli, &config).unwrap();
        assert_eq!(resolved.url, "https://flag.example.com");
        assert_eq!(resolved.suffix, ".png");
        assert_eq!(resolved.request.max_concurrent_fetches, 2);
        assert_eq!(resolved.timeout, 5);
    }
}
