/// Totals shown on the start-screen dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LearningStats {
    pub total_topics: u32,
    pub completed_topics: u32,
    pub progress_percent: u8,
}
