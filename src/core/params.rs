use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// White balance (percentile contrast stretch) parameters, suitable for config files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteBalanceParams {
    /// Low cutoff percentile; the high cutoff is `100 - percent_for_balance`
    pub percent_for_balance: f64,
}

impl Default for WhiteBalanceParams {
    fn default() -> Self {
        Self {
            percent_for_balance: 0.7,
        }
    }
}

impl WhiteBalanceParams {
    pub fn new(percent_for_balance: f64) -> Result<Self> {
        Self {
            percent_for_balance,
        }
        .validated()
    }

    /// Cutoffs must satisfy `0 < low < 50` so that `low < high`
    pub fn validated(self) -> Result<Self> {
        let p = self.percent_for_balance;
        if !(p > 0.0 && p < 50.0) {
            return Err(Error::InvalidArgument {
                arg: "percent_for_balance",
                value: p.to_string(),
            });
        }
        Ok(self)
    }

    pub fn low_percentile(&self) -> f64 {
        self.percent_for_balance
    }

    pub fn high_percentile(&self) -> f64 {
        100.0 - self.percent_for_balance
    }

    /// Load from a JSON file; missing keys take their default value
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&text).map_err(|e| Error::InvalidArgument {
            arg: "params",
            value: format!("{}: {}", path.display(), e),
        })?;
        params.validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cutoffs() {
        let p = WhiteBalanceParams::default();
        assert_eq!(p.low_percentile(), 0.7);
        assert!((p.high_percentile() - 99.3).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_percent_is_rejected() {
        assert!(WhiteBalanceParams::new(50.0).is_err());
        assert!(WhiteBalanceParams::new(-0.1).is_err());
        assert!(WhiteBalanceParams::new(0.0).is_err());
        assert!(WhiteBalanceParams::new(f64::INFINITY).is_err());
        assert!(WhiteBalanceParams::new(f64::NAN).is_err());
        assert!(WhiteBalanceParams::new(2.5).is_ok());
    }

    #[test]
    fn loads_from_json_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{ "percent_for_balance": 2.0 }"#).unwrap();
        assert_eq!(
            WhiteBalanceParams::from_json_file(&path).unwrap(),
            WhiteBalanceParams::new(2.0).unwrap()
        );

        std::fs::write(&path, "{}").unwrap();
        assert_eq!(
            WhiteBalanceParams::from_json_file(&path).unwrap(),
            WhiteBalanceParams::default()
        );
    }

    #[test]
    fn invalid_json_is_an_argument_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{ "percent_for_balance": 75 }"#).unwrap();
        assert!(matches!(
            WhiteBalanceParams::from_json_file(&path),
            Err(Error::InvalidArgument { .. })
        ));
    }
}
