//! The four-step progress timeline, as data.

use crate::tracking::DerivedStatus;
use serde::{Deserialize, Serialize};

pub const TIMELINE_STAGES: [&str; 4] = ["Placed", "Confirmed", "Out for Delivery", "Delivered"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepState {
    Completed,
    Current,
    Delayed,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineStep {
    pub label: &'static str,
    pub state: StepState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Timeline {
    /// Replaces the steps entirely.
    Cancelled,
    Progress {
        steps: Vec<TimelineStep>,
        delayed: bool,
    },
}

impl Timeline {
    pub fn for_status(status: DerivedStatus) -> Self {
        let Some(current) = status.timeline_index() else {
            return Timeline::Cancelled;
        };
        let delayed = status == DerivedStatus::Delayed;

        let steps = TIMELINE_STAGES
            .iter()
            .enumerate()
            .map(|(index, stage)| {
                let state = if index < current {
                    StepState::Completed
                } else if index > current {
                    StepState::Pending
                } else if delayed {
                    StepState::Delayed
                } else {
                    StepState::Current
                };
                let label = if state == StepState::Delayed {
                    "Delayed"
                } else {
                    *stage
                };
                TimelineStep { label, state }
            })
            .collect();

        Timeline::Progress { steps, delayed }
    }

    pub fn current_step(&self) -> Option<&TimelineStep> {
        match self {
            Timeline::Cancelled => None,
            Timeline::Progress { steps, .. } => steps
                .iter()
                .find(|step| matches!(step.state, StepState::Current | StepState::Delayed)),
        }
    }
}
