use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// One of the three per-repository time series.
///
/// The declaration order is the order in which datasets appear in every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    Contributors,
    Watchers,
    Stars,
}

impl Series {
    /// All series, in chart order.
    pub const ALL: [Self; 3] = [Self::Contributors, Self::Watchers, Self::Stars];

    /// Name of the field carrying this series in a `/chartData` payload.
    #[must_use]
    pub const fn wire_field(self) -> &'static str {
        match self {
            Self::Contributors => "cont",
            Self::Watchers => "watch",
            Self::Stars => "star",
        }
    }

    /// Suffix appended to a repository identifier to name the recorded metric (`octo/repo_stars`).
    #[must_use]
    pub const fn metric_suffix(self) -> &'static str {
        match self {
            Self::Contributors => "_contributors",
            Self::Watchers => "_watchers",
            Self::Stars => "_stars",
        }
    }

    /// Legend text of the series.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Contributors => "Contributors",
            Self::Watchers => "Watchers",
            Self::Stars => "Stars",
        }
    }

    /// Position of this series in chart order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_iteration_matches_chart_order() {
        let all: Vec<_> = Series::iter().collect();
        assert_eq!(all, Series::ALL);

        for (i, series) in Series::ALL.iter().enumerate() {
            assert_eq!(series.index(), i);
        }
    }

    #[test]
    fn test_wire_fields() {
        assert_eq!(Series::Contributors.wire_field(), "cont");
        assert_eq!(Series::Watchers.wire_field(), "watch");
        assert_eq!(Series::Stars.wire_field(), "star");
    }
}
