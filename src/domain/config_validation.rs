//! Configuration validation.
//!
//! Checks the `[data]` and `[backtest]` sections before any data is loaded.
//! Strategy parameters are validated by the strategy constructors.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::QuantError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), QuantError> {
    validate_data_config(config)?;
    validate_backtest_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), QuantError> {
    require_non_empty(config, "data", "dir")?;
    require_non_empty(config, "data", "symbol")?;
    let (start, end) = data_date_range(config)?;
    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(QuantError::ConfigInvalid {
                section: "data".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must be before end_date".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), QuantError> {
    validate_initial_capital(config)?;
    validate_commission(config)?;
    validate_risk_free_rate(config)?;
    Ok(())
}

/// Optional `[data] start_date` / `end_date`.
pub fn data_date_range(
    config: &dyn ConfigPort,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), QuantError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;
    Ok((start, end))
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, QuantError> {
    let defaults = BacktestConfig::default();
    Ok(BacktestConfig {
        initial_capital: config.get_double("backtest", "initial_capital", defaults.initial_capital)?,
        commission_pct: config.get_double("backtest", "commission_pct", defaults.commission_pct)?,
        risk_free_rate: config.get_double("backtest", "risk_free_rate", defaults.risk_free_rate)?,
    })
}

fn require_non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), QuantError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(QuantError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), QuantError> {
    let value = config.get_double(
        "backtest",
        "initial_capital",
        BacktestConfig::default().initial_capital,
    )?;
    if value <= 0.0 {
        return Err(QuantError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), QuantError> {
    let pct = config.get_double("backtest", "commission_pct", 0.0)?;
    if !(0.0..100.0).contains(&pct) {
        return Err(QuantError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "commission_pct".to_string(),
            reason: "commission_pct must be between 0 and 100".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), QuantError> {
    let value = config.get_double("backtest", "risk_free_rate", 0.0)?;
    if !(0.0..1.0).contains(&value) {
        return Err(QuantError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn parse_optional_date(config: &dyn ConfigPort, field: &str) -> Result<Option<NaiveDate>, QuantError> {
    match config.get_string("data", field) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| QuantError::ConfigInvalid {
                section: "data".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        let config = make_config(
            r#"
[data]
dir = data
symbol = DEMO
start_date = 2023-01-01
end_date = 2023-12-31

[backtest]
initial_capital = 100000.0
commission_pct = 0.1
risk_free_rate = 0.02
"#,
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn backtest_section_is_optional() {
        let config = make_config("[data]\ndir = data\nsymbol = DEMO\n");
        assert!(validate_config(&config).is_ok());
        assert_eq!(build_backtest_config(&config).unwrap(), BacktestConfig::default());
    }

    #[test]
    fn missing_symbol_fails() {
        let config = make_config("[data]\ndir = data\n");
        let err = validate_data_config(&config).unwrap_err();
        assert!(matches!(err, QuantError::ConfigMissing { key, .. } if key == "symbol"));
    }

    #[test]
    fn blank_dir_fails() {
        let config = make_config("[data]\ndir =\nsymbol = DEMO\n");
        let err = validate_data_config(&config).unwrap_err();
        assert!(matches!(err, QuantError::ConfigMissing { key, .. } if key == "dir"));
    }

    #[test]
    fn invalid_date_format_fails() {
        let config = make_config("[data]\ndir = d\nsymbol = S\nstart_date = 2020/01/01\n");
        let err = validate_data_config(&config).unwrap_err();
        assert!(matches!(err, QuantError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn start_after_end_fails() {
        let config =
            make_config("[data]\ndir = d\nsymbol = S\nstart_date = 2024-12-31\nend_date = 2020-01-01\n");
        let err = validate_data_config(&config).unwrap_err();
        assert!(matches!(err, QuantError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn date_range_is_optional() {
        let config = make_config("[data]\ndir = d\nsymbol = S\nend_date = 2024-06-30\n");
        let (start, end) = data_date_range(&config).unwrap();
        assert_eq!(start, None);
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 6, 30));
    }

    #[test]
    fn non_positive_capital_fails() {
        let config = make_config("[backtest]\ninitial_capital = 0\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, QuantError::ConfigInvalid { key, .. } if key == "initial_capital"));
    }

    #[test]
    fn negative_commission_fails() {
        let config = make_config("[backtest]\ncommission_pct = -0.1\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, QuantError::ConfigInvalid { key, .. } if key == "commission_pct"));
    }

    #[test]
    fn risk_free_rate_out_of_range_fails() {
        let config = make_config("[backtest]\nrisk_free_rate = 1.5\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, QuantError::ConfigInvalid { key, .. } if key == "risk_free_rate"));
    }

    #[test]
    fn unparseable_backtest_value_fails() {
        let config = make_config("[data]\ndir = d\nsymbol = S\n\n[backtest]\ncommission_pct = 0,1\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, QuantError::ConfigInvalid { key, .. } if key == "commission_pct"));
        assert!(build_backtest_config(&config).is_err());
    }

    #[test]
    fn build_backtest_config_reads_values() {
        let config = make_config(
            "[backtest]\ninitial_capital = 5000\ncommission_pct = 0.25\nrisk_free_rate = 0.03\n",
        );
        let bt = build_backtest_config(&config).unwrap();
        assert_eq!(bt.initial_capital, 5000.0);
        assert_eq!(bt.commission_pct, 0.25);
        assert_eq!(bt.risk_free_rate, 0.03);
    }
}
