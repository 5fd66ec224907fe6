//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.
//! The value parsers are shared with [`super::keys`] so that `config set`
//! accepts exactly what the file accepts.

use std::str::FromStr;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [source] section
    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = section.get("url") {
            config.source.url = parse_url(v).map_err(|reason| invalid("source", "url", v, reason))?;
        }
        if let Some(v) = section.get("suffix") {
            config.source.suffix = v.trim().to_string();
        }
        if let Some(v) = section.get("high_dpi") {
            config.source.high_dpi =
                parse_bool(v).map_err(|reason| invalid("source", "high_dpi", v, reason))?;
        }
    }

    // [mosaic] section
    if let Some(section) = ini.section(Some("mosaic")) {
        if let Some(v) = section.get("max_tiles") {
            config.mosaic.max_tiles =
                parse_positive(v).map_err(|reason| invalid("mosaic", "max_tiles", v, reason))?;
        }
        if let Some(v) = section.get("jpeg_quality") {
            config.mosaic.jpeg_quality =
                parse_quality(v).map_err(|reason| invalid("mosaic", "jpeg_quality", v, reason))?;
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("timeout") {
            config.download.timeout =
                parse_positive(v).map_err(|reason| invalid("download", "timeout", v, reason))?;
        }
        if let Some(v) = section.get("concurrency") {
            config.download.concurrency = parse_positive(v)
                .map_err(|reason| invalid("download", "concurrency", v, reason))?;
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: String) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}

/// Empty means "not configured".
pub(super) fn parse_url(value: &str) -> Result<Option<String>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err("must start with http:// or https://".to_string());
    }
    Ok(Some(value.trim_end_matches('/').to_string()))
}

pub(super) fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err("must be true or false".to_string()),
    }
}

pub(super) fn parse_positive<T>(value: &str) -> Result<T, String>
where
    T: FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err("must be a positive integer".to_string()),
    }
}

pub(super) fn parse_quality(value: &str) -> Result<u8, String> {
    match value.trim().parse::<u8>() {
        Ok(q) if (1..=100).contains(&q) => Ok(q),
        _ => Err("must be an integer between 1 and 100".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(text).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_ini_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_full_ini() {
        let config = parse(
            "[source]\n\
             url = https://tiles.example.com/satellite/\n\
             suffix = @2x.jpg?key=abc\n\
             high_dpi = false\n\
             [mosaic]\n\
             max_tiles = 1200\n\
             jpeg_quality = 90\n\
             [download]\n\
             timeout = 10\n\
             concurrency = 4\n",
        )
        .unwrap();

        assert_eq!(
            config.source.url.as_deref(),
            Some("https://tiles.example.com/satellite")
        );
        assert_eq!(config.source.suffix, "@2x.jpg?key=abc");
        assert!(!config.source.high_dpi);
        assert_eq!(config.mosaic.max_tiles, 1200);
        assert_eq!(config.mosaic.jpeg_quality, 90);
        assert_eq!(config.download.timeout, 10);
        assert_eq!(config.download.concurrency, 4);
    }

    #[test]
    fn test_invalid_quality() {
        let err = parse("[mosaic]\njpeg_quality = 101\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, value, .. } => {
                assert_eq!(section, "mosaic");
                assert_eq!(key, "jpeg_quality");
                assert_eq!(value, "101");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values() {
        assert!(parse("[download]\nconcurrency = 0\n").is_err());
        assert!(parse("[download]\ntimeout = soon\n").is_err());
        assert!(parse("[source]\nhigh_dpi = maybe\n").is_err());
        assert!(parse("[source]\nurl = ftp://tiles\n").is_err());
        assert!(parse("[mosaic]\nmax_tiles = -5\n").is_err());
    }

    #[test]
    fn test_empty_url_is_unset() {
        let config = parse("[source]\nurl =\n").unwrap();
        assert!(config.source.url.is_none());
    }

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool("Yes"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("").is_err());
    }
}
