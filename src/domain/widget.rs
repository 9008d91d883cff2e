// Widget catalog - the known widget identifiers a dashboard can enable
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetId {
    Progress,
    Highlights,
    Trend,
    Workload,
    Phases,
    Risks,
    Actions,
    Budget,
    Sentiment,
}

#[derive(Debug, Clone, Serialize)]
pub struct WidgetInfo {
    pub id: WidgetId,
    pub label: &'static str,
    pub description: &'static str,
}

impl WidgetId {
    pub const ALL: [WidgetId; 9] = [
        Self::Progress,
        Self::Highlights,
        Self::Trend,
        Self::Workload,
        Self::Phases,
        Self::Risks,
        Self::Actions,
        Self::Budget,
        Self::Sentiment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::Highlights => "highlights",
            Self::Trend => "trend",
            Self::Workload => "workload",
            Self::Phases => "phases",
            Self::Risks => "risks",
            Self::Actions => "actions",
            Self::Budget => "budget",
            Self::Sentiment => "sentiment",
        }
    }

    pub fn info(self) -> WidgetInfo {
        let (label, description) = match self {
            Self::Progress => ("Velocity Pie", "Completion breakdown"),
            Self::Highlights => ("Highlights", "Key achievements list"),
            Self::Trend => ("Progress Trend", "Daily activity area chart"),
            Self::Workload => ("Team Workload", "Capacity bar chart"),
            Self::Phases => ("Phase Progress", "Linear phase tracking"),
            Self::Risks => ("Risk Registry", "Threat cards"),
            Self::Actions => ("Operational Actions", "Task table"),
            Self::Budget => ("Finance Health", "Budget utilization"),
            Self::Sentiment => ("Morale Pulse", "Team happiness level"),
        };
        WidgetInfo {
            id: self,
            label,
            description,
        }
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown widget: {0}")]
pub struct UnknownWidget(pub String);

impl FromStr for WidgetId {
    type Err = UnknownWidget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| UnknownWidget(s.to_string()))
    }
}

/// Full catalog in display order
pub fn catalog() -> Vec<WidgetInfo> {
    WidgetId::ALL.into_iter().map(WidgetId::info).collect()
}

/// Keep only identifiers the catalog knows, dropping duplicates
pub fn known_widgets(ids: &[String]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for id in ids {
        if id.parse::<WidgetId>().is_ok() && !kept.contains(id) {
            kept.push(id.clone());
        }
    }
    kept
}
