use std::sync::Arc;

use learn_core::model::Resource;

use crate::api::LearningApi;
use crate::error::ApiError;

/// Identifies the step a panel request was issued for.
///
/// The backend answers guide, note and resource requests for whatever it considers the
/// current step, so responses are matched to the ticket that was live when they were
/// requested. A response carrying an older ticket is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelTicket {
    generation: u64,
    step_index: usize,
}

impl PanelTicket {
    pub(crate) fn new(generation: u64, step_index: usize) -> Self {
        Self {
            generation,
            step_index,
        }
    }

    #[must_use]
    pub fn step_index(&self) -> usize {
        self.step_index
    }
}

/// Detached panel request; holds everything it needs so it can outlive a borrow of the
/// controller.
pub struct PanelFetcher {
    pub(crate) api: Arc<dyn LearningApi>,
    pub(crate) ticket: PanelTicket,
    pub(crate) topic: String,
    pub(crate) step_title: String,
}

impl PanelFetcher {
    #[must_use]
    pub fn ticket(&self) -> PanelTicket {
        self.ticket
    }

    /// Fetch guide, note and resources in that order.
    pub async fn fetch(self) -> PanelFetch {
        let guide = self.api.guide().await;
        let note = self.api.note().await;
        let resources = self.api.resources(&self.topic, &self.step_title).await;
        PanelFetch {
            ticket: self.ticket,
            guide,
            note,
            resources,
        }
    }
}

/// Responses gathered by a [`PanelFetcher`], waiting to be applied.
#[derive(Debug)]
pub struct PanelFetch {
    pub ticket: PanelTicket,
    pub guide: Result<String, ApiError>,
    pub note: Result<Option<String>, ApiError>,
    pub resources: Result<Option<Vec<Resource>>, ApiError>,
}
