use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub responses_this_month: usize,
    pub average_response_time: f64,
    pub false_alerts_today: usize,
    pub resolved_alerts_today: usize,
    pub most_reported_locations: Vec<LocationCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationCount {
    pub location: String,
    pub count: usize,
}
