//! Run settings, layered: defaults, then a properties file, then the
//! environment, then command-line flags (applied by the binary).

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::corpus::LoadMode;
use crate::error::PipelineError;

pub const DEFAULT_WINDOW_SIZE: usize = 25;
pub const DEFAULT_COLLECTOR_COUNT: usize = 2000;
pub const DEFAULT_FAIL_THRESHOLD: f64 = 66.0;
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Tokens taken on each side of a focus noun.
    pub window_size: usize,
    /// Overrides the `window_size / 2` admission minimum.
    pub min_valid_size: Option<usize>,
    /// Top-N words kept by frequency rankings (0 keeps all).
    pub collector_count: usize,
    /// Stop admitting samples for a noun once its file reaches this size (0 disables).
    pub max_bytes_per_noun: u64,
    /// Success rate (percent) below which ambiguous samples are written out.
    pub fail_threshold: f64,
    /// Safety bound on bootstrapping passes per noun.
    pub max_iterations: usize,
    pub load_mode: LoadMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_valid_size: None,
            collector_count: DEFAULT_COLLECTOR_COUNT,
            max_bytes_per_noun: 0,
            fail_threshold: DEFAULT_FAIL_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            load_mode: LoadMode::Mmap,
        }
    }
}

impl Settings {
    pub fn min_valid_size(&self) -> usize {
        self.min_valid_size.unwrap_or(self.window_size / 2)
    }

    /// Defaults overlaid with a `key = value` properties file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PipelineError::read(path, e))?;
        Self::parse(&text)
    }

    /// Defaults overlaid with properties text. Lines starting with `#` or
    /// `//` are comments; unknown keys are ignored.
    pub fn parse(text: &str) -> Result<Self, PipelineError> {
        let mut settings = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            settings.set(key.trim(), value.trim())?;
        }
        Ok(settings)
    }

    /// Apply a single setting by its properties-file key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PipelineError> {
        match key {
            "windowSize" => self.window_size = parse_value(key, value)?,
            "minValidSize" => self.min_valid_size = Some(parse_value(key, value)?),
            "collectorCount" => self.collector_count = parse_value(key, value)?,
            "maxFileSizeInBytes" => {
                let raw: i64 = parse_value(key, value)?;
                self.max_bytes_per_noun = raw.max(0) as u64;
            }
            "failThreshold" => self.fail_threshold = parse_value(key, value)?,
            "maxIterations" => self.max_iterations = parse_value(key, value)?,
            "loadMode" => self.load_mode = parse_value(key, value)?,
            other => debug!("ignoring unknown setting {other}"),
        }
        Ok(())
    }

    /// Overlay `WSD_*` environment variables; unparsable values are ignored.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| env::var(name).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        const VARS: [(&str, &str); 6] = [
            ("WSD_WINDOW_SIZE", "windowSize"),
            ("WSD_COLLECTOR_COUNT", "collectorCount"),
            ("WSD_MAX_FILE_SIZE", "maxFileSizeInBytes"),
            ("WSD_FAIL_THRESHOLD", "failThreshold"),
            ("WSD_MAX_ITERATIONS", "maxIterations"),
            ("WSD_LOAD_MODE", "loadMode"),
        ];
        for (var, key) in VARS {
            if let Some(value) = lookup(var)
                && self.set(key, value.trim()).is_err()
            {
                debug!("ignoring {var}={value:?}");
            }
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, PipelineError> {
    value.parse().map_err(|_| PipelineError::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_documented_values() {
        let s = Settings::default();
        assert_eq!(s.window_size, 25);
        assert_eq!(s.min_valid_size(), 12);
        assert_eq!(s.collector_count, 2000);
        assert_eq!(s.max_bytes_per_noun, 0);
        assert_eq!(s.fail_threshold, 66.0);
    }

    #[test]
    fn parses_properties_with_comments() {
        let s = Settings::parse(
            "# wsd settings\n// legacy comment\nwindowSize = 10\nfailThreshold=50.5\n\
             maxFileSizeInBytes=-1\nloadMode = owned\nsomethingElse=1\nnot a pair\n",
        )
        .unwrap();
        assert_eq!(s.window_size, 10);
        assert_eq!(s.min_valid_size(), 5);
        assert_eq!(s.fail_threshold, 50.5);
        assert_eq!(s.max_bytes_per_noun, 0);
        assert_eq!(s.load_mode, LoadMode::Owned);
    }

    #[test]
    fn rejects_unparsable_values() {
        let err = Settings::parse("windowSize=wide\n").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidSetting { ref key, .. } if key == "windowSize"));
    }

    #[test]
    fn env_overrides_skip_bad_values() {
        let vars = HashMap::from([
            ("WSD_WINDOW_SIZE", "8"),
            ("WSD_FAIL_THRESHOLD", "not-a-number"),
            ("WSD_LOAD_MODE", "MMAP"),
        ]);
        let mut s = Settings::default();
        s.load_mode = LoadMode::Owned;
        s.apply_vars(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(s.window_size, 8);
        assert_eq!(s.fail_threshold, DEFAULT_FAIL_THRESHOLD);
        assert_eq!(s.load_mode, LoadMode::Mmap);
    }

    #[test]
    fn missing_settings_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wsd.properties");
        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Read { path: ref p, .. } if *p == path));
        assert!(err.to_string().contains("wsd.properties"));
    }

    #[test]
    fn explicit_min_valid_size_wins() {
        let s = Settings::parse("windowSize=10\nminValidSize=2\n").unwrap();
        assert_eq!(s.min_valid_size(), 2);
    }
}
