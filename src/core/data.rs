use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::{BindingError, BindingResult};

/// One entry of a dataset.
///
/// Serialized the way chart libraries accept it: a bare number, an `{x, y}`
/// object, or `null` for a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Number(f64),
    Point { x: f64, y: f64 },
    Missing,
}

impl DataValue {
    pub fn from_decimal(value: Decimal) -> BindingResult<Self> {
        Ok(Self::Number(decimal_to_f64(value, "value")?))
    }

    #[must_use]
    pub fn time_point(time: DateTime<Utc>, y: f64) -> Self {
        Self::Point {
            x: datetime_to_unix_seconds(time),
            y,
        }
    }

    #[must_use]
    pub fn y(self) -> Option<f64> {
        match self {
            Self::Number(y) | Self::Point { y, .. } => Some(y),
            Self::Missing => None,
        }
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for DataValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub data: Vec<DataValue>,
    /// Styling and controller-specific keys passed through untouched.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Dataset {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        self.data = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn push(&mut self, value: impl Into<DataValue>) {
        self.data.push(value.into());
    }
}

/// Labels plus datasets handed to a chart instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.iter().all(|dataset| dataset.data.is_empty())
    }

    pub fn from_json_str(input: &str) -> BindingResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| BindingError::InvalidData(format!("failed to parse chart data json: {e}")))
    }

    pub fn to_json_pretty(&self) -> BindingResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            BindingError::InvalidData(format!("failed to serialize chart data json: {e}"))
        })
    }
}
