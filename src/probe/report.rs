//! Serializable summary of a completed probe cycle.

use crate::probe::types::Position;
use crate::probe::workflows::Workflow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record kept by the service after a cycle reaches its terminal state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Identifier shared with the cycle's log lines
    pub id: Uuid,

    pub workflow: Workflow,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    /// Names of the states visited, initial state first
    pub path: Vec<String>,

    pub start_position: Position,

    pub probe_position1: Option<Position>,

    pub probe_position2: Option<Position>,

    pub x_offset: Option<f64>,

    pub y_offset: Option<f64>,

    pub z_offset: Option<f64>,
}

impl CycleReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_roundtrips_through_json() {
        let now = Utc::now();
        let report = CycleReport {
            id: Uuid::new_v4(),
            workflow: Workflow::Depth,
            started_at: now,
            finished_at: now,
            path: vec!["Waiting".to_string(), "FastApproach".to_string()],
            start_position: Position::new(1.0, 2.0, 3.0),
            probe_position1: None,
            probe_position2: None,
            x_offset: None,
            y_offset: None,
            z_offset: Some(0.5),
        };

        let json = report.to_json().unwrap();
        assert!(json.contains("\"workflow\": \"depth\""));

        let back: CycleReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
