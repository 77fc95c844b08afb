use std::fmt;

use serde::{Deserialize, Serialize};

/// Bounding box of a rendering surface or its container, in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Chart controller requested at construction time.
///
/// `Custom` names a controller contributed by a registered module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Doughnut,
    Radar,
    PolarArea,
    Bubble,
    Scatter,
    #[serde(untagged)]
    Custom(String),
}

impl ChartKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
            Self::Radar => "radar",
            Self::PolarArea => "polarArea",
            Self::Bubble => "bubble",
            Self::Scatter => "scatter",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
