use std::path::Path;

use anyhow::{Context, Result};
use sanity_core::CheckerConfig;

const DEFAULT_CONFIG_NAME: &str = "sanity-checker.toml";

/// Load checker thresholds.
///
/// An explicitly requested file must parse; the default config file is
/// optional and missing fields fall back to built-in defaults.
pub fn load_checker_config(path: Option<&Path>) -> Result<CheckerConfig> {
    if let Some(path) = path {
        return from_path(path).with_context(|| format!("load config {}", path.display()));
    }
    let default = Path::new(DEFAULT_CONFIG_NAME);
    if default.exists() {
        return from_path(default).with_context(|| format!("load config {DEFAULT_CONFIG_NAME}"));
    }
    Ok(CheckerConfig::default())
}

fn from_path(path: &Path) -> Result<CheckerConfig> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_config_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "watermark_border_px = 70\nsmall_flag_area = 50").unwrap();
        let cfg = load_checker_config(Some(file.path())).unwrap();
        assert_eq!(cfg.watermark_border_px, 70);
        assert_eq!(cfg.small_flag_area, 50);
        assert_eq!(cfg.duplicate_tolerance_px, 2);
    }

    #[test]
    fn explicit_config_must_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "watermark_border_px = \"wide\"").unwrap();
        assert!(load_checker_config(Some(file.path())).is_err());
    }

    #[test]
    fn missing_default_file_yields_defaults() {
        let cfg = load_checker_config(None).unwrap();
        assert_eq!(cfg.watermark_border_px, CheckerConfig::default().watermark_border_px);
    }
}
