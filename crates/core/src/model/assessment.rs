/// Career recommendation produced by analysing an assessment.
///
/// `starting_topic` seeds a new roadmap when the learner follows the recommendation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recommendation {
    pub recommended_domain: String,
    pub explanation: String,
    pub starting_topic: String,
}
