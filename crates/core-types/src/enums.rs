use serde::{Deserialize, Serialize};

/// Denominator used when turning units sold into a conversion percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionBasis {
    /// Divide by the number of daily visit records.
    #[default]
    RecordCount,
    /// Divide by the total number of visits across the records.
    VisitTotal,
}

impl ConversionBasis {
    /// Returns the configuration spelling of this basis.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionBasis::RecordCount => "record_count",
            ConversionBasis::VisitTotal => "visit_total",
        }
    }
}
