//! Bounded reasoning loop

use crate::directive::{extract_thought, parse_directive};
use crate::events::{ControllerEventHandler, NoOpEventHandler};
use advisor_core::{AgentQuery, AgentResult, AgentStatus, CancelToken, Directive, Step, Trace};
use advisor_llm::{GenerationParams, TextGenerator, TokenObserver};
use advisor_prompt::PromptAssembler;
use advisor_tools::ToolRegistry;
use std::sync::Arc;
use tracing::{info, warn};

/// Corrective observation appended after an unparseable response
const PARSE_FAILURE_OBSERVATION: &str =
    "Invalid format. Either provide an Action line naming one of the available tools \
     together with an Action Input line, or provide your answer after 'Final Answer:'.";

/// Fallback output when the iteration cap is hit before any thought
const NO_PROGRESS_OUTPUT: &str =
    "I could not gather sufficient information to answer the question within the allotted steps.";

/// Bounds and sampling settings for one controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Maximum reasoning cycles per session
    pub max_iterations: usize,

    /// Consecutive unparseable responses tolerated before the session fails
    pub max_consecutive_parse_failures: usize,

    /// Sampling parameters for every loop completion
    pub generation: GenerationParams,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 7,
            max_consecutive_parse_failures: 3,
            // Stop before the model fabricates its own observation
            generation: GenerationParams::default()
                .with_stop_sequences(vec!["\nObservation:".to_string()]),
        }
    }
}

/// Drives the Thought/Action/Observation cycle to a terminal status
///
/// `run` is infallible: fatal conditions (model call failure, repeated
/// unparseable output, cancellation) terminate the session with
/// [`AgentStatus::Failed`] and whatever trace was accumulated.
pub struct ReasoningController {
    generator: Arc<dyn TextGenerator>,
    assembler: Arc<PromptAssembler>,
    registry: Arc<ToolRegistry>,
    config: ControllerConfig,
    events: Arc<dyn ControllerEventHandler>,
    token_observer: Option<Arc<dyn TokenObserver>>,
}

impl ReasoningController {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        assembler: Arc<PromptAssembler>,
        registry: Arc<ToolRegistry>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            generator,
            assembler,
            registry,
            config,
            events: Arc::new(NoOpEventHandler),
            token_observer: None,
        }
    }

    /// Attach a lifecycle event handler
    pub fn with_event_handler(mut self, events: Arc<dyn ControllerEventHandler>) -> Self {
        self.events = events;
        self
    }

    /// Attach a streaming token observer for every model call
    pub fn with_token_observer(mut self, observer: Arc<dyn TokenObserver>) -> Self {
        self.token_observer = Some(observer);
        self
    }

    /// Run one reasoning session to completion
    pub async fn run(&self, query: &AgentQuery, cancel: &CancelToken) -> AgentResult {
        let mut trace = Trace::new();
        let mut consecutive_parse_failures = 0usize;
        let mut last_thought: Option<String> = None;

        info!(input = %query.input, max_iterations = self.config.max_iterations, "Session started");

        for iteration in 0..self.config.max_iterations {
            if cancel.is_cancelled() {
                return self.fail(trace, "session cancelled by caller").await;
            }

            let prompt = match self.assembler.render(query, &trace, &self.registry) {
                Ok(prompt) => prompt,
                Err(e) => {
                    return self.fail(trace, &format!("prompt rendering failed: {e}")).await;
                }
            };

            let raw = match self
                .generator
                .generate(
                    &prompt,
                    &self.config.generation,
                    self.token_observer.as_deref(),
                )
                .await
            {
                Ok(raw) => raw,
                Err(e) => {
                    return self.fail(trace, &format!("model call failed: {e}")).await;
                }
            };

            match parse_directive(&raw) {
                Directive::FinalAnswer { text } => {
                    info!(iteration, steps = trace.len(), "Session completed");
                    let result = AgentResult {
                        output: text,
                        trace,
                        status: AgentStatus::Completed,
                    };
                    self.events.on_complete(&result).await;
                    return result;
                }

                Directive::ActionRequest {
                    tool_name,
                    action_input,
                } => {
                    consecutive_parse_failures = 0;
                    let thought = extract_thought(&raw);
                    info!(iteration, tool_name = %tool_name, "Dispatching tool");

                    self.events.on_tool_start(&tool_name, &action_input).await;
                    let observation = self.registry.dispatch(&tool_name, &action_input).await;
                    self.events.on_tool_done(&tool_name, &observation).await;

                    // An action line with no reasoning text contributes
                    // nothing to the best-effort output
                    if !thought.trim().is_empty() {
                        last_thought = Some(thought.clone());
                    }
                    trace.push(Step {
                        thought,
                        action: tool_name,
                        action_input,
                        observation,
                    });
                }

                Directive::Unparseable { raw_text } => {
                    consecutive_parse_failures += 1;
                    warn!(
                        iteration,
                        consecutive_parse_failures,
                        "Unparseable model response"
                    );
                    if consecutive_parse_failures >= self.config.max_consecutive_parse_failures {
                        return self
                            .fail(
                                trace,
                                &format!(
                                    "model output could not be parsed after \
                                     {consecutive_parse_failures} attempts"
                                ),
                            )
                            .await;
                    }
                    trace.push(Step {
                        thought: raw_text.trim().to_string(),
                        action: String::new(),
                        action_input: String::new(),
                        observation: PARSE_FAILURE_OBSERVATION.to_string(),
                    });
                }
            }
        }

        info!(steps = trace.len(), "Iteration limit reached");
        let result = AgentResult {
            output: last_thought.unwrap_or_else(|| NO_PROGRESS_OUTPUT.to_string()),
            trace,
            status: AgentStatus::IterationLimitReached,
        };
        self.events.on_complete(&result).await;
        result
    }

    async fn fail(&self, trace: Trace, cause: &str) -> AgentResult {
        warn!(cause = %cause, steps = trace.len(), "Session failed");
        let result = AgentResult {
            output: String::new(),
            trace,
            status: AgentStatus::Failed {
                cause: cause.to_string(),
            },
        };
        self.events.on_complete(&result).await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_llm::LLMError;
    use advisor_tools::Tool;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed sequence of responses; `Err` entries fail the call
    struct ScriptedGenerator {
        responses: Mutex<VecDeque<std::result::Result<String, String>>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<std::result::Result<&str, &str>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _params: &GenerationParams,
            _observer: Option<&dyn TokenObserver>,
        ) -> std::result::Result<String, LLMError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err("script exhausted".to_string()))
                .map_err(LLMError::RequestFailed)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        async fn invoke(&self, input: &str) -> advisor_tools::Result<String> {
            Ok(format!("observed: {input}"))
        }

        fn name(&self) -> &str {
            "get stock ticker"
        }

        fn description(&self) -> &str {
            "Get the stock ticker for a company name."
        }
    }

    fn controller(
        generator: Arc<ScriptedGenerator>,
        config: ControllerConfig,
    ) -> ReasoningController {
        let registry = ToolRegistry::new(vec![Arc::new(EchoTool) as Arc<dyn Tool>]).unwrap();
        ReasoningController::new(
            generator,
            Arc::new(PromptAssembler::new().unwrap()),
            Arc::new(registry),
            config,
        )
    }

    fn query() -> AgentQuery {
        AgentQuery::new(
            "Is Amazon a buy?",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_immediate_final_answer() {
        let generator = ScriptedGenerator::new(vec![Ok(
            "I already know this.\nFinal Answer: Amazon looks fairly valued.",
        )]);
        let result = controller(generator, ControllerConfig::default())
            .run(&query(), &CancelToken::new())
            .await;

        assert_eq!(result.status, AgentStatus::Completed);
        assert_eq!(result.output, "Amazon looks fairly valued.");
        assert!(result.trace.is_empty());
    }

    #[tokio::test]
    async fn test_tool_step_then_final_answer() {
        let generator = ScriptedGenerator::new(vec![
            Ok("find the ticker first.\nAction: get stock ticker\nAction Input: Amazon"),
            Ok("now I can answer.\nFinal Answer: hold"),
        ]);
        let result = controller(generator, ControllerConfig::default())
            .run(&query(), &CancelToken::new())
            .await;

        assert!(result.is_completed());
        assert_eq!(result.trace.len(), 1);
        let step = &result.trace.steps()[0];
        assert_eq!(step.thought, "find the ticker first.");
        assert_eq!(step.action, "get stock ticker");
        assert_eq!(step.action_input, "Amazon");
        assert_eq!(step.observation, "observed: Amazon");
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_observation_and_loop_continues() {
        let generator = ScriptedGenerator::new(vec![
            Ok("try something.\nAction: get weather\nAction Input: Seattle"),
            Ok("Final Answer: never mind"),
        ]);
        let result = controller(generator, ControllerConfig::default())
            .run(&query(), &CancelToken::new())
            .await;

        assert!(result.is_completed());
        let step = &result.trace.steps()[0];
        assert!(step.observation.starts_with("Error: unknown tool 'get weather'"));
        assert!(step.observation.contains("get stock ticker"));
    }

    #[tokio::test]
    async fn test_parse_failure_recovery() {
        let generator = ScriptedGenerator::new(vec![
            Ok("I forgot the format entirely"),
            Ok("Final Answer: recovered"),
        ]);
        let result = controller(generator, ControllerConfig::default())
            .run(&query(), &CancelToken::new())
            .await;

        assert!(result.is_completed());
        assert_eq!(result.output, "recovered");
        let step = &result.trace.steps()[0];
        assert!(step.action.is_empty());
        assert!(step.observation.starts_with("Invalid format."));
    }

    #[tokio::test]
    async fn test_consecutive_parse_failures_fail_session() {
        let generator = ScriptedGenerator::new(vec![
            Ok("garbled one"),
            Ok("garbled two"),
            Ok("garbled three"),
        ]);
        let result = controller(generator, ControllerConfig::default())
            .run(&query(), &CancelToken::new())
            .await;

        match result.status {
            AgentStatus::Failed { cause } => assert!(cause.contains("could not be parsed")),
            other => panic!("expected failure, got {other:?}"),
        }
        // Only the non-terminal failures were recorded as steps
        assert_eq!(result.trace.len(), 2);
    }

    #[tokio::test]
    async fn test_parse_failure_counter_resets_on_valid_step() {
        let generator = ScriptedGenerator::new(vec![
            Ok("garbled one"),
            Ok("garbled two"),
            Ok("ok now.\nAction: get stock ticker\nAction Input: Amazon"),
            Ok("garbled three"),
            Ok("Final Answer: done"),
        ]);
        let result = controller(generator, ControllerConfig::default())
            .run(&query(), &CancelToken::new())
            .await;

        assert!(result.is_completed());
        assert_eq!(result.trace.len(), 4);
    }

    #[tokio::test]
    async fn test_iteration_limit_yields_partial_output() {
        let generator = ScriptedGenerator::new(vec![
            Ok("still digging.\nAction: get stock ticker\nAction Input: Amazon"),
            Ok("one more look.\nAction: get stock ticker\nAction Input: Amazon"),
        ]);
        let config = ControllerConfig {
            max_iterations: 2,
            ..ControllerConfig::default()
        };
        let result = controller(generator, config)
            .run(&query(), &CancelToken::new())
            .await;

        assert_eq!(result.status, AgentStatus::IterationLimitReached);
        assert_eq!(result.output, "one more look.");
        assert_eq!(result.trace.len(), 2);
    }

    #[tokio::test]
    async fn test_iteration_limit_with_thoughtless_actions_still_has_output() {
        // Bare action lines carry no thought text; the fallback message must
        // be used rather than an empty output
        let generator = ScriptedGenerator::new(vec![
            Ok("Action: get stock ticker\nAction Input: Amazon"),
            Ok("Action: get stock ticker\nAction Input: Amazon"),
        ]);
        let config = ControllerConfig {
            max_iterations: 2,
            ..ControllerConfig::default()
        };
        let result = controller(generator, config)
            .run(&query(), &CancelToken::new())
            .await;

        assert_eq!(result.status, AgentStatus::IterationLimitReached);
        assert!(!result.output.is_empty());
        assert!(result.output.contains("sufficient information"));
        assert_eq!(result.trace.len(), 2);
    }

    #[tokio::test]
    async fn test_iteration_limit_without_progress() {
        let generator = ScriptedGenerator::new(vec![Ok("garbled")]);
        let config = ControllerConfig {
            max_iterations: 1,
            ..ControllerConfig::default()
        };
        let result = controller(generator, config)
            .run(&query(), &CancelToken::new())
            .await;

        assert_eq!(result.status, AgentStatus::IterationLimitReached);
        assert!(result.output.contains("sufficient information"));
    }

    #[tokio::test]
    async fn test_cancellation_checked_before_model_call() {
        let generator = ScriptedGenerator::new(vec![Ok("Final Answer: should not run")]);
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = controller(generator, ControllerConfig::default())
            .run(&query(), &cancel)
            .await;

        match result.status {
            AgentStatus::Failed { cause } => assert!(cause.contains("cancelled")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_model_failure_fails_session_with_trace() {
        let generator = ScriptedGenerator::new(vec![
            Ok("step one.\nAction: get stock ticker\nAction Input: Amazon"),
            Err("connection reset"),
        ]);
        let result = controller(generator, ControllerConfig::default())
            .run(&query(), &CancelToken::new())
            .await;

        match result.status {
            AgentStatus::Failed { cause } => assert!(cause.contains("model call failed")),
            other => panic!("expected failure, got {other:?}"),
        }
        // The step recorded before the failure is preserved
        assert_eq!(result.trace.len(), 1);
    }

    #[tokio::test]
    async fn test_default_config_stops_before_fabricated_observations() {
        let config = ControllerConfig::default();
        assert_eq!(config.max_iterations, 7);
        assert_eq!(
            config.generation.stop_sequences,
            vec!["\nObservation:".to_string()]
        );
    }
}
