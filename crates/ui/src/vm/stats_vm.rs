use learn_core::model::LearningStats;

/// Start-screen dashboard tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsVm {
    pub total_topics: String,
    pub completed_topics: String,
    pub progress: String,
}

#[must_use]
pub fn map_stats(stats: Option<&LearningStats>) -> StatsVm {
    let stats = stats.copied().unwrap_or_default();
    StatsVm {
        total_topics: stats.total_topics.to_string(),
        completed_topics: stats.completed_topics.to_string(),
        progress: format!("{}%", stats.progress_percent),
    }
}
