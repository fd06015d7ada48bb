//! Completion-backed judges.
//!
//! A dimension judge rates one rubric dimension over the whole evidence
//! store. The meta evaluator then scores that judge's output, seeing only
//! the blocks it cited.

mod dimension;
mod meta;
mod traits;

pub use dimension::DimensionAgent;
pub use meta::MetaEvaluator;
pub use traits::{AgentError, AgentRun, DimensionJudge};
