use serde::{Deserialize, Serialize};

/// Project-wide defaults, persisted with the project.
///
/// Percentages are fractions (0.19 for 19 %).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub currency: String,
    pub vat: f64,
    pub safety_deposit: f64,
    pub cumulative_invoices: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            currency: "EUR".into(),
            vat: 0.19,
            safety_deposit: 0.05,
            cumulative_invoices: true,
        }
    }
}
