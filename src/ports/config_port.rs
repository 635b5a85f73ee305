//! Configuration access port trait.

use crate::domain::error::QuantError;

/// Read access to a sectioned key/value configuration.
///
/// Typed getters return `default` when the key is missing or blank, and
/// [`QuantError::ConfigInvalid`] when a value is present but does not parse.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, QuantError>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, QuantError>;
}
