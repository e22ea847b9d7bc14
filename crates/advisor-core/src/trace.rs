//! Reasoning trace types
//!
//! A [`Trace`] is the append-only record of one session: one [`Step`] per
//! loop iteration, each pairing the model's thought and requested action
//! with the exact observation the dispatched tool returned. The controller
//! never edits an observation after it is recorded.

use serde::{Deserialize, Serialize};

/// One recorded reasoning step, immutable once appended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// The model's reasoning text preceding the action
    pub thought: String,

    /// Name of the dispatched tool; empty for a parse-failure step
    pub action: String,

    /// Input handed to the tool, verbatim from the model
    pub action_input: String,

    /// Exactly what the tool returned for `action_input`
    pub observation: String,
}

/// Append-only sequence of steps, owned by one controller invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    /// Create an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step; steps are never removed or reordered
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether any step has been recorded
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Ordered view of the recorded steps
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Iterate over the recorded steps in order
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// The controller's interpretation of one raw model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// The model produced its final answer
    FinalAnswer {
        /// Answer text following the marker
        text: String,
    },

    /// The model requested a tool invocation
    ActionRequest {
        /// Requested tool name (may or may not exist in the registry)
        tool_name: String,
        /// Verbatim input for the tool
        action_input: String,
    },

    /// The response matched neither grammar
    Unparseable {
        /// The raw model output, kept for corrective feedback
        raw_text: String,
    },
}

/// Terminal status of a reasoning session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentStatus {
    /// The model emitted a final answer
    Completed,

    /// The iteration cap was reached without a final answer; the output is
    /// best-effort partial text. A normal terminal state, not an error.
    IterationLimitReached,

    /// A fatal condition ended the session
    Failed {
        /// Human-readable cause for the UI to render
        cause: String,
    },
}

/// Result handed to the caller; assembled once at loop exit, never mutated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    /// Final or best-effort answer text
    pub output: String,

    /// Full ordered step trace for downstream rendering
    pub trace: Trace,

    /// How the session terminated
    pub status: AgentStatus,
}

impl AgentResult {
    /// Whether the session produced a proper final answer
    pub fn is_completed(&self) -> bool {
        self.status == AgentStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_step() -> Step {
        Step {
            thought: "I should look up the ticker".to_string(),
            action: "get stock ticker".to_string(),
            action_input: "Amazon".to_string(),
            observation: "AMZN".to_string(),
        }
    }

    #[test]
    fn test_trace_append_order() {
        let mut trace = Trace::new();
        assert!(trace.is_empty());

        trace.push(sample_step());
        trace.push(Step {
            thought: "now fetch prices".to_string(),
            action: "get stock price".to_string(),
            action_input: "AMZN".to_string(),
            observation: "Date,Open,High,Low,Close,Volume".to_string(),
        });

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.steps()[0].action, "get stock ticker");
        assert_eq!(trace.steps()[1].action, "get stock price");
    }

    #[test]
    fn test_status_roundtrip() {
        let status = AgentStatus::Failed {
            cause: "model call failed".to_string(),
        };
        let json = serde_json::to_string(&status).unwrap();
        let back: AgentStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }

    #[test]
    fn test_result_serialization() {
        let mut trace = Trace::new();
        trace.push(sample_step());

        let result = AgentResult {
            output: "Buy".to_string(),
            trace,
            status: AgentStatus::Completed,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"]["kind"], "completed");
        assert_eq!(json["trace"]["steps"][0]["observation"], "AMZN");
        assert!(result.is_completed());
    }
}
