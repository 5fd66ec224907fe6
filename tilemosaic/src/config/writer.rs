//! INI serialization: `ConfigFile` → commented INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let url = config.source.url.as_deref().unwrap_or("");

    format!(
        r#"[source]
; Base URL of the XYZ tile server, the part before /{{z}}/{{x}}/{{y}}
; Example: url = https://tiles.example.com/satellite
url = {}
; Appended after the tile row: format, @2x marker, API key
; Example: suffix = @2x.jpg?key=YOUR_KEY
suffix = {}
; true if the source serves 512 px (@2x) tiles, false for 256 px tiles
high_dpi = {}

[mosaic]
; Largest number of tiles a single extraction may download (default: 500)
max_tiles = {}
; JPEG quality of the assembled mosaic, 1-100 (default: 100)
jpeg_quality = {}

[download]
; Timeout in seconds for a single tile request (default: 30)
timeout = {}
; Number of tile requests in flight (default: 16)
concurrency = {}
"#,
        url,
        config.source.suffix,
        config.source.high_dpi,
        config.mosaic.max_tiles,
        config.mosaic.jpeg_quality,
        config.download.timeout,
        config.download.concurrency,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_render_all_sections() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("[source]"));
        assert!(text.contains("[mosaic]"));
        assert!(text.contains("[download]"));
        assert!(text.contains("max_tiles = 500"));
        assert!(text.contains("/{z}/{x}/{y}"));
    }
}
