//! `plan` command: show the tile grid for an area without downloading.

use tilemosaic::config::ConfigFile;
use tilemosaic::georef::{resolution, tile_size};
use tilemosaic::grid::plan_grid;
use tilemosaic::orchestrator::ExtractError;

use super::common::AreaArgs;
use crate::error::CliError;

/// Run the plan command.
///
/// Fails (exit code 1) when the grid exceeds the tile cap.
pub fn run(args: AreaArgs) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let request = args.to_request(&config)?;

    let grid = plan_grid(&request.bbox, request.zoom, request.max_tiles)
        .map_err(ExtractError::Plan)?;

    let size = tile_size(request.high_dpi);
    let width = u64::from(grid.width()) * u64::from(size);
    let height = u64::from(grid.height()) * u64::from(size);

    println!("Zoom:        {}", grid.zoom());
    println!("Columns:     {}..={} ({})", grid.x_min(), grid.x_max(), grid.width());
    println!("Rows:        {}..={} ({})", grid.y_min(), grid.y_max(), grid.height());
    println!("Tiles:       {} (max {})", grid.tile_count(), request.max_tiles);
    println!("Mosaic:      {} × {} px", width, height);
    println!(
        "Resolution:  {} m/px",
        resolution(grid.zoom(), request.high_dpi)
    );

    Ok(())
}
