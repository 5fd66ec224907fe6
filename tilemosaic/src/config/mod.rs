//! User configuration.
//!
//! Settings live in `~/.tilemosaic/config.ini`:
//!
//! ```ini
//! [source]
//! url = https://tiles.example.com/satellite
//! suffix = @2x.jpg?key=YOUR_KEY
//! high_dpi = true
//!
//! [mosaic]
//! max_tiles = 500
//! jpeg_quality = 100
//!
//! [download]
//! timeout = 30
//! concurrency = 16
//! ```
//!
//! A missing file yields defaults; command-line flags override file values.

mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{ConfigFile, DownloadSettings, MosaicSettings, SourceSettings, DEFAULT_SUFFIX};
