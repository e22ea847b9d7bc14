//! Response grammar for the reasoning loop
//!
//! The model's raw completion is interpreted against two markers. A final
//! answer wins over an action request when both appear, so a response that
//! narrates its tool use while concluding still terminates the session.

use advisor_core::Directive;
use regex::Regex;
use std::sync::LazyLock;

const FINAL_ANSWER_MARKER: &str = "Final Answer:";

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Accepts "Action:" / "Action Input:" with flexible whitespace; the
    // input capture runs to the end of the response.
    Regex::new(r"(?s)Action\s*:\s*(.*?)\s*Action\s+Input\s*:\s*(.*)")
        .expect("hardcoded pattern is valid")
});

/// Interpret one raw model response
pub fn parse_directive(raw: &str) -> Directive {
    if let Some(index) = raw.rfind(FINAL_ANSWER_MARKER) {
        let text = raw[index + FINAL_ANSWER_MARKER.len()..].trim().to_string();
        return Directive::FinalAnswer { text };
    }

    if let Some(captures) = ACTION_RE.captures(raw) {
        let tool_name = strip_quotes(captures[1].trim()).to_string();
        let action_input = strip_quotes(captures[2].trim()).to_string();
        return Directive::ActionRequest {
            tool_name,
            action_input,
        };
    }

    Directive::Unparseable {
        raw_text: raw.to_string(),
    }
}

/// The reasoning text preceding the first recognized marker
///
/// The prompt ends with a `Thought:` cue, so the completion usually starts
/// mid-thought; a leading `Thought:` echo is stripped if present.
pub fn extract_thought(raw: &str) -> String {
    let end = ACTION_RE
        .find(raw)
        .map(|m| m.start())
        .or_else(|| raw.find(FINAL_ANSWER_MARKER))
        .unwrap_or(raw.len());

    raw[..end]
        .trim()
        .strip_prefix("Thought:")
        .map_or_else(|| raw[..end].trim(), str::trim)
        .to_string()
}

fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}
