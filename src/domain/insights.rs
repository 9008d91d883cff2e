// Generated insights - typed boundary for the model's dashboard JSON
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::dashboard::{
    ActionItem, Budget, DashboardRecord, HealthStatus, Milestone, PhaseProgress,
    PriorityDistribution, Progress, Risk, TeamSentiment, TrendPoint, WorkloadEntry,
};

/// A dashboard as the insight generator returns it: no storage identity yet,
/// and only project name, overall status, and summary are guaranteed.
///
/// Any `id` or `lastUpdated` the generator emits is not modelled; both are
/// assigned by `into_record`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedInsights {
    pub project_name: String,
    #[serde(default)]
    pub reporting_period: String,
    pub overall_status: HealthStatus,
    pub executive_summary: String,
    #[serde(default)]
    pub schedule_health: Option<HealthStatus>,
    #[serde(default)]
    pub scope_health: Option<HealthStatus>,
    #[serde(default)]
    pub quality_health: Option<HealthStatus>,
    #[serde(default)]
    pub resource_health: Option<HealthStatus>,
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
    #[serde(default)]
    pub priority_distribution: Option<PriorityDistribution>,
    #[serde(default)]
    pub workload_distribution: Option<Vec<WorkloadEntry>>,
    #[serde(default)]
    pub burn_trend: Option<Vec<TrendPoint>>,
    #[serde(default)]
    pub phase_progress: Option<Vec<PhaseProgress>>,
    #[serde(default)]
    pub milestones: Option<Vec<Milestone>>,
    #[serde(default)]
    pub budget: Option<Budget>,
    #[serde(default)]
    pub team_sentiment: Option<TeamSentiment>,
    #[serde(default)]
    pub active_widgets: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeneratedInsights {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Complete the draft into a storable record.
    ///
    /// `next_id` is called for the record itself, and for every risk, action
    /// item, and milestone missing one. The generator knows nothing about
    /// stored records, so an id it offers is never trusted.
    pub fn into_record(
        self,
        now: DateTime<Utc>,
        default_widgets: &[String],
        mut next_id: impl FnMut() -> String,
    ) -> DashboardRecord {
        let id = next_id();
        let overall = self.overall_status;

        let mut risks = self.risks;
        for risk in &mut risks {
            if risk.id.is_empty() {
                risk.id = next_id();
            }
        }
        let mut action_items = self.action_items;
        for item in &mut action_items {
            if item.id.is_empty() {
                item.id = next_id();
            }
        }
        let mut milestones = self.milestones;
        for milestone in milestones.iter_mut().flatten() {
            if milestone.id.is_empty() {
                milestone.id = next_id();
            }
        }

        DashboardRecord {
            id,
            project_name: self.project_name,
            reporting_period: self.reporting_period,
            overall_status: overall,
            executive_summary: self.executive_summary,
            schedule_health: self.schedule_health.unwrap_or(overall),
            scope_health: self.scope_health.unwrap_or(overall),
            quality_health: self.quality_health.unwrap_or(overall),
            resource_health: self.resource_health.unwrap_or(overall),
            achievements: self.achievements,
            planned_work: self.planned_work,
            risks,
            blockers: self.blockers,
            action_items,
            progress: self.progress,
            priority_distribution: self.priority_distribution,
            workload_distribution: self.workload_distribution,
            burn_trend: self.burn_trend,
            phase_progress: self.phase_progress,
            milestones,
            budget: self.budget,
            team_sentiment: self.team_sentiment,
            active_widgets: self
                .active_widgets
                .unwrap_or_else(|| default_widgets.to_vec()),
            last_updated: now,
            extra: without_record_fields(self.extra),
        }
    }
}

/// Keys owned by `DashboardRecord` itself. Left in the flattened remainder
/// they would serialize twice and make the stored collection unreadable.
const RECORD_FIELDS: &[&str] = &["id", "lastUpdated"];

fn without_record_fields(mut extra: Map<String, Value>) -> Map<String, Value> {
    for key in RECORD_FIELDS {
        if extra.remove(*key).is_some() {
            tracing::debug!("Dropping generator-supplied {}", key);
        }
    }
    extra
}
