//! Registry configuration from YAML plus command-line overrides.

use std::path::Path;

use openrouting_drivers::RegistryConfig;

use crate::error::CliError;

/// Load the registry configuration.
///
/// Without a file the defaults apply. Overrides replace the file's values.
pub fn load(
    path: Option<&Path>,
    open_timeout_ms: Option<u64>,
    close_timeout_ms: Option<u64>,
) -> Result<RegistryConfig, CliError> {
    let mut config = match path {
        Some(path) => parse(&std::fs::read_to_string(path)?)?,
        None => RegistryConfig::default(),
    };

    if let Some(ms) = open_timeout_ms {
        // 0 disables the open timeout
        config.open_timeout_ms = (ms > 0).then_some(ms);
    }
    if let Some(ms) = close_timeout_ms {
        if ms == 0 {
            return Err(CliError::InvalidConfiguration(
                "close timeout must be greater than zero".to_string(),
            ));
        }
        config.close_timeout_ms = ms;
    }
    Ok(config)
}

pub fn parse(text: &str) -> Result<RegistryConfig, CliError> {
    if text.trim().is_empty() {
        return Ok(RegistryConfig::default());
    }
    Ok(serde_yaml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_defaults_without_file() -> TestResult {
        let config = load(None, None, None)?;
        assert_eq!(config, RegistryConfig::default());
        Ok(())
    }

    #[test]
    fn test_yaml_partial() -> TestResult {
        let config = parse("close_timeout_ms: 750\n")?;
        assert_eq!(config.close_timeout_ms, 750);
        assert_eq!(config.open_timeout_ms, Some(10_000));
        Ok(())
    }

    #[test]
    fn test_file_with_overrides() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("routectl.yaml");
        std::fs::write(&path, "open_timeout_ms: 3000\nclose_timeout_ms: 500\n")?;

        let config = load(Some(&path), Some(0), None)?;
        assert_eq!(config.open_timeout_ms, None);
        assert_eq!(config.close_timeout_ms, 500);
        Ok(())
    }

    #[test]
    fn test_zero_close_timeout_rejected() {
        assert!(matches!(
            load(None, None, Some(0)),
            Err(CliError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(parse("open_timeout_ms: [1"), Err(CliError::YamlError(_))));
    }
}
