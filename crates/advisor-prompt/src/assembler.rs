//! Deterministic prompt rendering
//!
//! Transcript text (thoughts, observations, chat history) is model- or
//! attacker-controlled and re-enters the prompt here. It is therefore
//! pre-formatted in Rust and substituted as opaque strings; the template
//! engine never interprets it.

use crate::{PromptError, Result};
use advisor_core::{AgentQuery, ChatRole, Trace};
use advisor_tools::ToolRegistry;
use minijinja::Environment;
use minijinja::context;

/// The reasoning-loop template; its exact text is part of the external
/// interface and is pinned by tests.
pub const REACT_TEMPLATE: &str = include_str!("../templates/react.j2");

/// Constrained company-name extraction template used by ticker resolution.
pub const EXTRACT_COMPANY_TEMPLATE: &str = include_str!("../templates/extract_company.j2");

const REACT_NAME: &str = "react";
const EXTRACT_NAME: &str = "extract_company";

/// Renders the running transcript into the next model prompt
pub struct PromptAssembler {
    env: Environment<'static>,
}

impl PromptAssembler {
    /// Build an assembler, validating the bundled templates
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in [
            (REACT_NAME, REACT_TEMPLATE),
            (EXTRACT_NAME, EXTRACT_COMPANY_TEMPLATE),
        ] {
            env.add_template(name, source)
                .map_err(|e| PromptError::TemplateParseFailed {
                    name: name.to_string(),
                    detail: e.to_string(),
                })?;
        }
        Ok(Self { env })
    }

    /// Render the next reasoning prompt for `query` given the trace so far
    ///
    /// Rendering is pure substitution: every observation reappears verbatim
    /// in the scratchpad section, and the prompt ends with the `Thought:` cue.
    pub fn render(
        &self,
        query: &AgentQuery,
        trace: &Trace,
        registry: &ToolRegistry,
    ) -> Result<String> {
        let tools = registry
            .describe()
            .iter()
            .map(|spec| format!("{}: {}", spec.name, spec.description))
            .collect::<Vec<_>>()
            .join("\n");
        let tool_names = registry.names().join(", ");

        let template =
            self.env
                .get_template(REACT_NAME)
                .map_err(|e| PromptError::RenderFailed {
                    name: REACT_NAME.to_string(),
                    detail: e.to_string(),
                })?;

        template
            .render(context! {
                tools => tools,
                tool_names => tool_names,
                today => query.today.format("%Y-%m-%d").to_string(),
                chat_history => format_chat_history(query),
                question => query.input,
                agent_scratchpad => format_scratchpad(trace),
            })
            .map_err(|e| PromptError::RenderFailed {
                name: REACT_NAME.to_string(),
                detail: e.to_string(),
            })
    }

    /// Render the company-name extraction prompt for the ticker resolver
    pub fn render_company_extraction(&self, input: &str) -> Result<String> {
        let template =
            self.env
                .get_template(EXTRACT_NAME)
                .map_err(|e| PromptError::RenderFailed {
                    name: EXTRACT_NAME.to_string(),
                    detail: e.to_string(),
                })?;

        template
            .render(context! { text => input })
            .map_err(|e| PromptError::RenderFailed {
                name: EXTRACT_NAME.to_string(),
                detail: e.to_string(),
            })
    }
}

/// Format prior steps as Thought/Action/Action Input/Observation lines,
/// ending with the `Thought:` cue for the next completion.
fn format_scratchpad(trace: &Trace) -> String {
    let mut scratchpad = String::new();
    for step in trace {
        if step.action.is_empty() {
            // Parse-failure step: no action was dispatched
            scratchpad.push_str(&format!(
                "Thought: {}\nObservation: {}\n",
                step.thought, step.observation
            ));
        } else {
            scratchpad.push_str(&format!(
                "Thought: {}\nAction: {}\nAction Input: {}\nObservation: {}\n",
                step.thought, step.action, step.action_input, step.observation
            ));
        }
    }
    scratchpad.push_str("Thought:");
    scratchpad
}

fn format_chat_history(query: &AgentQuery) -> String {
    query
        .chat_history
        .iter()
        .map(|turn| {
            let role = match turn.role {
                ChatRole::User => "User",
                ChatRole::Assistant => "Assistant",
            };
            format!("{role}: {}", turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{ChatTurn, Step};
    use advisor_tools::Tool;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct NamedTool {
        name: &'static str,
        description: &'static str,
    }

    #[async_trait]
    impl Tool for NamedTool {
        async fn invoke(&self, _input: &str) -> advisor_tools::Result<String> {
            Ok(String::new())
        }

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            self.description
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new(vec![
            Arc::new(NamedTool {
                name: "get stock ticker",
                description: "Get the stock ticker for a company name.",
            }) as Arc<dyn Tool>,
            Arc::new(NamedTool {
                name: "get stock price",
                description: "Get historic share price data for a ticker.",
            }),
        ])
        .unwrap()
    }

    fn query() -> AgentQuery {
        AgentQuery::new(
            "Is Amazon a buy?",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    #[test]
    fn test_template_is_pinned() {
        // The template text is part of the external interface; changing any
        // of these lines changes observable model behavior.
        assert!(REACT_TEMPLATE.starts_with("Human: You are a financial advisor"));
        assert!(REACT_TEMPLATE.contains("Action: the action to take, should be one of [{{ tool_names }}]"));
        assert!(REACT_TEMPLATE.contains("Final Answer:"));
        assert!(REACT_TEMPLATE.contains("{{ agent_scratchpad }}"));
        assert!(EXTRACT_COMPANY_TEMPLATE.contains("just return NONE"));
    }

    #[test]
    fn test_render_substitutes_question_date_and_tools() {
        let assembler = PromptAssembler::new().unwrap();
        let prompt = assembler
            .render(&query(), &Trace::new(), &registry())
            .unwrap();

        assert!(prompt.contains("Question: Is Amazon a buy?"));
        assert!(prompt.contains("2024-06-01"));
        assert!(prompt.contains("get stock ticker: Get the stock ticker for a company name."));
        assert!(prompt.contains("one of [get stock ticker, get stock price]"));
        assert!(prompt.trim_end().ends_with("Thought:"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let assembler = PromptAssembler::new().unwrap();
        let registry = registry();
        let first = assembler.render(&query(), &Trace::new(), &registry).unwrap();
        let second = assembler.render(&query(), &Trace::new(), &registry).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_observation_round_trips_verbatim() {
        let assembler = PromptAssembler::new().unwrap();
        // Model-controlled text with template-looking content must come back
        // byte-for-byte, never interpreted.
        let observation = "AMZN {{ not_a_variable }} {% if x %}raw{% endif %}\nline2\t tabs ";
        let mut trace = Trace::new();
        trace.push(Step {
            thought: "look up the ticker".to_string(),
            action: "get stock ticker".to_string(),
            action_input: "Amazon".to_string(),
            observation: observation.to_string(),
        });

        let prompt = assembler.render(&query(), &trace, &registry()).unwrap();
        assert!(prompt.contains(observation));
    }

    #[test]
    fn test_parse_failure_step_rendered_without_action() {
        let assembler = PromptAssembler::new().unwrap();
        let mut trace = Trace::new();
        trace.push(Step {
            thought: "garbled output".to_string(),
            action: String::new(),
            action_input: String::new(),
            observation: "Invalid format.".to_string(),
        });

        let prompt = assembler.render(&query(), &trace, &registry()).unwrap();
        assert!(prompt.contains("Thought: garbled output\nObservation: Invalid format.\n"));
        assert!(!prompt.contains("Action: \n"));
    }

    #[test]
    fn test_chat_history_included_when_present() {
        let assembler = PromptAssembler::new().unwrap();
        let with_history = query().with_history(vec![
            ChatTurn::user("what about Tesla?"),
            ChatTurn::assistant("Tesla looks overvalued."),
        ]);

        let prompt = assembler
            .render(&with_history, &Trace::new(), &registry())
            .unwrap();
        assert!(prompt.contains("Previous conversation:"));
        assert!(prompt.contains("User: what about Tesla?"));
        assert!(prompt.contains("Assistant: Tesla looks overvalued."));

        let bare = assembler.render(&query(), &Trace::new(), &registry()).unwrap();
        assert!(!bare.contains("Previous conversation:"));
    }

    #[test]
    fn test_company_extraction_prompt() {
        let assembler = PromptAssembler::new().unwrap();
        let prompt = assembler.render_company_extraction("삼성전자 분석").unwrap();
        assert!(prompt.contains("Human input: 삼성전자 분석"));
        assert!(prompt.contains("just return NONE"));
    }
}
