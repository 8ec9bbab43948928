pub mod attempt;
pub mod insights;
pub mod practice;
pub mod quiz;

pub use attempt::{
    AptitudeAttempt, CodingAttempt, Difficulty, DifficultyAggregate, TopicAggregate,
    TrackCodingAttemptRequest, UserSummary,
};
pub use insights::InsightsResponse;
pub use practice::{PracticeProblem, ProblemView};
pub use quiz::{QuizScore, QuizSession, QuizStep, SubmitAnswerRequest};
