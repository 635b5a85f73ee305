//! INI file configuration adapter.

use crate::domain::error::QuantError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    /// Like [`from_file`](Self::from_file), reporting failures as
    /// [`QuantError::ConfigParse`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, QuantError> {
        let path = path.as_ref();
        Self::from_file(path).map_err(|e| QuantError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_value<T: FromStr>(
        &self,
        section: &str,
        key: &str,
        expected: &str,
    ) -> Result<Option<T>, QuantError> {
        let Some(raw) = self.config.get(section, key) else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(|_| QuantError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("'{raw}' is not {expected}"),
        })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, QuantError> {
        Ok(self
            .parse_value(section, key, "an integer")?
            .unwrap_or(default))
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, QuantError> {
        match self.parse_value::<f64>(section, key, "a number")? {
            None => Ok(default),
            Some(value) if value.is_finite() => Ok(value),
            Some(value) => Err(QuantError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("{value} is not a finite number"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[data]
dir = data/prices
symbol = DEMO

[strategy]
type = ma_crossover
short_window = 5
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "dir"),
            Some("data/prices".to_string())
        );
        assert_eq!(
            adapter.get_string("strategy", "type"),
            Some("ma_crossover".to_string())
        );
        assert_eq!(adapter.get_int("strategy", "short_window", 0).unwrap(), 5);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\nsymbol = DEMO\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_missing_or_blank() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nlookback =\n").unwrap();
        assert_eq!(adapter.get_int("strategy", "rsi_window", 14).unwrap(), 14);
        assert_eq!(adapter.get_int("strategy", "lookback", 10).unwrap(), 10);
    }

    #[test]
    fn get_int_rejects_non_integer() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nshort_window = five\nlong_window = 20.5\n")
                .unwrap();
        for key in ["short_window", "long_window"] {
            let err = adapter.get_int("strategy", key, 5).unwrap_err();
            assert!(
                matches!(&err, QuantError::ConfigInvalid { key: k, .. } if k == key),
                "{err:?}"
            );
        }
    }

    #[test]
    fn get_double_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\ninitial_capital = 100000.5\n").unwrap();
        assert_eq!(
            adapter.get_double("backtest", "initial_capital", 0.0).unwrap(),
            100000.5
        );
        assert_eq!(adapter.get_double("backtest", "missing", 0.02).unwrap(), 0.02);
    }

    #[test]
    fn get_double_rejects_non_numeric_and_non_finite() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\ninitial_capital = not_a_number\ncommission_pct = NaN\nrisk_free_rate = inf\n",
        )
        .unwrap();
        for key in ["initial_capital", "commission_pct", "risk_free_rate"] {
            assert!(matches!(
                adapter.get_double("backtest", key, 1.0),
                Err(QuantError::ConfigInvalid { .. })
            ));
        }
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\nsymbol = DEMO\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("data", "symbol"), Some("DEMO".to_string()));
    }

    #[test]
    fn load_missing_file_is_config_parse_error() {
        let err = FileConfigAdapter::load("/nonexistent/path/config.ini").unwrap_err();
        assert!(matches!(err, QuantError::ConfigParse { file, .. } if file.contains("config.ini")));
    }
}
