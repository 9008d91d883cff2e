// Dashboard domain model - the persisted status report record
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::widget::WidgetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    #[serde(rename = "🟢 On Track", alias = "On Track")]
    OnTrack,
    #[serde(rename = "🟡 At Risk", alias = "At Risk")]
    AtRisk,
    #[serde(rename = "🔴 Off Track", alias = "Off Track")]
    OffTrack,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 3] = [Self::OnTrack, Self::AtRisk, Self::OffTrack];

    pub fn label(self) -> &'static str {
        match self {
            Self::OnTrack => "🟢 On Track",
            Self::AtRisk => "🟡 At Risk",
            Self::OffTrack => "🔴 Off Track",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    #[default]
    Open,
    Completed,
    #[serde(rename = "In Progress")]
    InProgress,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestoneStatus {
    Completed,
    #[default]
    Upcoming,
    Delayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSentiment {
    Positive,
    Neutral,
    Stressed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Risk {
    pub id: String,
    pub description: String,
    pub impact: Impact,
    pub mitigation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionItem {
    pub id: String,
    pub task: String,
    pub owner: String,
    pub due_date: String,
    pub status: ActionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    pub id: String,
    pub label: String,
    pub date: String,
    pub status: MilestoneStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Progress {
    #[serde(deserialize_with = "count")]
    pub completed: u32,
    #[serde(deserialize_with = "count")]
    pub in_progress: u32,
    #[serde(deserialize_with = "count")]
    pub todo: u32,
    #[serde(deserialize_with = "count")]
    pub blocked: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityDistribution {
    #[serde(deserialize_with = "count")]
    pub high: u32,
    #[serde(deserialize_with = "count")]
    pub medium: u32,
    #[serde(deserialize_with = "count")]
    pub low: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadEntry {
    pub name: String,
    #[serde(deserialize_with = "count")]
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseProgress {
    pub phase: String,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Budget {
    pub total: f64,
    pub spent: f64,
    pub currency: String,
}

/// One project's status report, the unit the dashboard store persists.
///
/// Fields this type does not model are kept in `extra` so a record always
/// round-trips whole through the store and the export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRecord {
    pub id: String,
    pub project_name: String,
    #[serde(default)]
    pub reporting_period: String,
    pub overall_status: HealthStatus,
    pub executive_summary: String,
    pub schedule_health: HealthStatus,
    pub scope_health: HealthStatus,
    pub quality_health: HealthStatus,
    pub resource_health: HealthStatus,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub planned_work: Vec<String>,
    #[serde(default)]
    pub risks: Vec<Risk>,
    #[serde(default)]
    pub blockers: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub progress: Progress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_distribution: Option<PriorityDistribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload_distribution: Option<Vec<WorkloadEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_trend: Option<Vec<TrendPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_progress: Option<Vec<PhaseProgress>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Vec<Milestone>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_sentiment: Option<TeamSentiment>,
    #[serde(default)]
    pub active_widgets: Vec<String>,
    pub last_updated: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DashboardRecord {
    /// A blank record for manual entry before any analysis has run.
    pub fn blank(id: String, active_widgets: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            project_name: String::new(),
            reporting_period: String::new(),
            overall_status: HealthStatus::OnTrack,
            executive_summary: String::new(),
            schedule_health: HealthStatus::OnTrack,
            scope_health: HealthStatus::OnTrack,
            quality_health: HealthStatus::OnTrack,
            resource_health: HealthStatus::OnTrack,
            achievements: Vec::new(),
            planned_work: Vec::new(),
            risks: Vec::new(),
            blockers: Vec::new(),
            action_items: Vec::new(),
            progress: Progress::default(),
            priority_distribution: None,
            workload_distribution: None,
            burn_trend: None,
            phase_progress: None,
            milestones: None,
            budget: None,
            team_sentiment: None,
            active_widgets,
            last_updated: now,
            extra: Map::new(),
        }
    }

    /// Enable the widget if it is off, disable it if it is on.
    /// Returns whether the widget is active afterwards.
    pub fn toggle_widget(&mut self, widget: WidgetId) -> bool {
        let id = widget.as_str();
        if let Some(pos) = self.active_widgets.iter().position(|w| w == id) {
            self.active_widgets.remove(pos);
            false
        } else {
            self.active_widgets.push(id.to_string());
            true
        }
    }

    pub fn add_risk(&mut self, id: String) -> &Risk {
        self.risks.push(Risk {
            id,
            description: "New risk identified".to_string(),
            impact: Impact::Medium,
            mitigation: "TBD".to_string(),
        });
        &self.risks[self.risks.len() - 1]
    }

    pub fn add_action_item(&mut self, id: String) -> &ActionItem {
        self.action_items.push(ActionItem {
            id,
            task: "New action item".to_string(),
            owner: "Unassigned".to_string(),
            due_date: "TBD".to_string(),
            status: ActionStatus::Open,
        });
        &self.action_items[self.action_items.len() - 1]
    }
}

/// Fresh opaque identifier for records and their list entries
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Counts arrive from the model as JSON numbers that may carry a fraction.
fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 {
        return Err(D::Error::custom(format!("invalid count: {}", value)));
    }
    Ok(value.round().min(u32::MAX as f64) as u32)
}
