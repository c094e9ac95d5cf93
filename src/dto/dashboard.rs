use serde::Serialize;

/// One slice of the lead-status breakdown.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub label: String,
    pub count: usize,
}

/// Figures shown on the admin dashboard.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_blogs: usize,
    pub total_cars: usize,
    pub total_messages: usize,
    pub lead_statuses: Vec<StatusCount>,
}
