//! Planner module
//!
//! The Planner is responsible for:
//! - Classifying a free-text command into an intent
//! - Producing the ordered action sequence for that intent
//!
//! The Planner does NOT handle:
//! - Persistence (the caller stores the resulting Command)
//! - Input validation beyond empty text
//! - Real natural-language understanding; matching is a fixed rule table
//!
//! Rules are evaluated in a fixed priority order and the first rule with
//! any trigger substring present in the normalized text wins. Ambiguous
//! text matching an earlier rule never reaches a later one; this keeps
//! classification deterministic and cheap.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::types::{ActionKind, Command, DeviceAction, Intent};

/// Planner errors
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Command text must not be empty")]
    EmptyText,
}

/// Input to the planner
#[derive(Debug, Clone, Default)]
pub struct PlanInput {
    /// Raw user instruction
    pub text: String,
    /// Opaque language tag, passed through to the Command
    pub language: Option<String>,
    /// Target device, passed through to the Command
    pub device_id: Option<String>,
}

impl PlanInput {
    /// Create an input with just text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            device_id: None,
        }
    }

    /// Attach a target device
    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Attach a language tag
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Planner trait - turns a raw instruction into a planned Command
///
/// Implementations can use different classification strategies; the
/// shipped one is a rule table.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Plan a command. Same input always yields the same intent and
    /// action content (ids and timestamps aside).
    async fn plan(&self, input: &PlanInput) -> Result<Command, PlanError>;
}

const DIALER_PACKAGE: &str = "com.android.dialer";
const MESSAGES_PACKAGE: &str = "com.google.android.apps.messaging";
const YOUTUBE_PACKAGE: &str = "com.google.android.youtube";
const SETTINGS_PACKAGE: &str = "com.android.settings";
const DEFAULT_URL: &str = "http://google.com";

/// Separator phrases meaning "to", tried in order, first hit wins
const CALL_SEPARATORS: &[&str] = &["to ", "কে ", "কেকে "];
const MESSAGE_SEPARATORS: &[&str] = &["to ", "কে "];

/// Multi-word trigger phrases removed from a YouTube query as substrings
const YOUTUBE_STRIP_PHRASES: &[&str] = &["ভিডিও চালাও", "play video"];

/// Single-word triggers and framing verbs removed from a YouTube query.
/// These are dropped as whole whitespace-delimited tokens only, so words
/// that merely contain them ("playlist", "copenhagen") survive.
const YOUTUBE_STRIP_WORDS: &[&str] = &["ইউটিউব", "youtube", "watch", "open", "play"];

/// One row of the intent table: trigger substrings plus the action builder
struct IntentRule {
    intent: Intent,
    triggers: &'static [&'static str],
    build: fn(&str) -> Vec<DeviceAction>,
}

/// The intent table. Order is priority order; do not reorder.
const RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::CallContact,
        triggers: &["কল কর", "ফোন কর", "call", "dial"],
        build: build_call,
    },
    IntentRule {
        intent: Intent::SendMessage,
        triggers: &["মেসেজ", "message", "sms", "টেক্সট"],
        build: build_message,
    },
    IntentRule {
        intent: Intent::OpenYoutube,
        triggers: &["ইউটিউব", "youtube", "ভিডিও চালাও", "play video"],
        build: build_youtube,
    },
    IntentRule {
        intent: Intent::ToggleWifi,
        triggers: &["wifi", "ওয়াইফাই", "wi-fi"],
        build: build_wifi,
    },
    IntentRule {
        intent: Intent::ToggleBluetooth,
        triggers: &["ব্লুটুথ", "bluetooth"],
        build: build_bluetooth,
    },
    IntentRule {
        intent: Intent::OpenUrl,
        triggers: &["ব্রাউজ", "ওপেন", "open", "visit", "url", "browse"],
        build: build_open_url,
    },
];

fn build_call(text: &str) -> Vec<DeviceAction> {
    vec![
        DeviceAction::with_target(ActionKind::OpenApp, DIALER_PACKAGE),
        contact_search(extract_after_separator(text, CALL_SEPARATORS)),
        DeviceAction::with_target(ActionKind::Tap, "call_button"),
    ]
}

fn build_message(text: &str) -> Vec<DeviceAction> {
    let mut args = HashMap::new();
    args.insert("text".to_string(), Value::String(String::new()));
    vec![
        DeviceAction::with_target(ActionKind::OpenApp, MESSAGES_PACKAGE),
        contact_search(extract_after_separator(text, MESSAGE_SEPARATORS)),
        DeviceAction::new(ActionKind::TypeText).with_args(args),
        DeviceAction::with_target(ActionKind::Tap, "send_button"),
    ]
}

fn build_youtube(text: &str) -> Vec<DeviceAction> {
    let query = youtube_query(text);
    vec![
        DeviceAction::with_target(ActionKind::OpenApp, YOUTUBE_PACKAGE),
        contact_search(if query.is_empty() { None } else { Some(query) }),
        DeviceAction::with_target(ActionKind::Tap, "first_result"),
    ]
}

fn build_wifi(_text: &str) -> Vec<DeviceAction> {
    vec![
        DeviceAction::with_target(ActionKind::OpenApp, SETTINGS_PACKAGE),
        DeviceAction::with_target(ActionKind::Search, "Wi-Fi"),
        DeviceAction::with_target(ActionKind::Tap, "toggle_wifi"),
    ]
}

fn build_bluetooth(_text: &str) -> Vec<DeviceAction> {
    vec![
        DeviceAction::with_target(ActionKind::OpenApp, SETTINGS_PACKAGE),
        DeviceAction::with_target(ActionKind::Search, "Bluetooth"),
        DeviceAction::with_target(ActionKind::Tap, "toggle_bluetooth"),
    ]
}

fn build_open_url(text: &str) -> Vec<DeviceAction> {
    let url = text
        .split_whitespace()
        .find(|w| w.starts_with("http") || w.contains(".com"))
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_URL.to_string());
    vec![DeviceAction::with_target(ActionKind::OpenUrl, url)]
}

/// Search action whose target may be absent when no name was extracted
fn contact_search(target: Option<String>) -> DeviceAction {
    match target {
        Some(target) => DeviceAction::with_target(ActionKind::Search, target),
        None => DeviceAction::new(ActionKind::Search),
    }
}

/// Everything after the first occurrence of the first matching separator,
/// trimmed. Separators are tried in list order; search stops at the first
/// separator present in the text.
fn extract_after_separator(text: &str, separators: &[&str]) -> Option<String> {
    for separator in separators {
        if let Some(position) = text.find(separator) {
            let rest = text[position + separator.len()..].trim();
            if rest.is_empty() {
                return None;
            }
            return Some(rest.to_string());
        }
    }
    None
}

/// Remove trigger phrases and framing verbs, collapsing the remaining
/// whitespace into the search query
fn youtube_query(text: &str) -> String {
    let mut out = text.to_string();
    for phrase in YOUTUBE_STRIP_PHRASES {
        out = out.replace(phrase, " ");
    }
    out.split_whitespace()
        .filter(|word| !YOUTUBE_STRIP_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rule-table planner: ordered substring triggers, first-match-wins
#[derive(Debug, Default)]
pub struct RulePlanner;

impl RulePlanner {
    /// Create a new rule planner
    pub fn new() -> Self {
        Self
    }

    fn plan_input(&self, input: &PlanInput) -> Result<Command, PlanError> {
        let trimmed = input.text.trim();
        if trimmed.is_empty() {
            return Err(PlanError::EmptyText);
        }

        // Normalized form is used only for matching; the stored text stays
        // verbatim.
        let normalized = trimmed.to_lowercase();
        let (intent, actions) = match RULES
            .iter()
            .find(|rule| rule.triggers.iter().any(|t| normalized.contains(t)))
        {
            Some(rule) => (rule.intent, (rule.build)(&normalized)),
            None => (Intent::Unknown, vec![DeviceAction::new(ActionKind::Unknown)]),
        };

        Ok(Command::new(input.text.clone(), intent, actions)
            .with_language(input.language.clone())
            .with_device(input.device_id.clone()))
    }
}

#[async_trait]
impl Planner for RulePlanner {
    async fn plan(&self, input: &PlanInput) -> Result<Command, PlanError> {
        self.plan_input(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(text: &str) -> Command {
        tokio_test::block_on(RulePlanner::new().plan(&PlanInput::new(text))).unwrap()
    }

    fn targets(command: &Command) -> Vec<Option<&str>> {
        command.actions.iter().map(|a| a.target.as_deref()).collect()
    }

    #[test]
    fn test_call_intent_action_shape() {
        let command = plan("Call to Rahim");
        assert_eq!(command.intent, Intent::CallContact);
        let kinds: Vec<_> = command.actions.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![ActionKind::OpenApp, ActionKind::Search, ActionKind::Tap]
        );
        assert_eq!(command.actions[0].target.as_deref(), Some(DIALER_PACKAGE));
        assert_eq!(command.actions[2].target.as_deref(), Some("call_button"));
    }

    #[test]
    fn test_call_bilingual_target_extraction() {
        let command = plan("call মায়ের to Rahim");
        assert_eq!(command.intent, Intent::CallContact);
        assert_eq!(command.actions[1].target.as_deref(), Some("rahim"));
    }

    #[test]
    fn test_call_without_separator_has_no_search_target() {
        let command = plan("dial now");
        assert_eq!(command.intent, Intent::CallContact);
        assert!(command.actions[1].target.is_none());
    }

    #[test]
    fn test_message_intent_action_shape() {
        let command = plan("send sms to Karim");
        assert_eq!(command.intent, Intent::SendMessage);
        let kinds: Vec<_> = command.actions.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActionKind::OpenApp,
                ActionKind::Search,
                ActionKind::TypeText,
                ActionKind::Tap
            ]
        );
        assert_eq!(command.actions[1].target.as_deref(), Some("karim"));
        assert_eq!(
            command.actions[2].args.get("text"),
            Some(&serde_json::Value::String(String::new()))
        );
        assert_eq!(command.actions[3].target.as_deref(), Some("send_button"));
    }

    #[test]
    fn test_first_match_priority_call_beats_message() {
        // Contains both a call trigger and a message trigger; the call rule
        // is earlier in the table and must win.
        let command = plan("call and message Rahim");
        assert_eq!(command.intent, Intent::CallContact);
    }

    #[test]
    fn test_youtube_query_strips_trigger_words() {
        let command = plan("open youtube cricket highlights");
        assert_eq!(command.intent, Intent::OpenYoutube);
        assert_eq!(
            targets(&command),
            vec![
                Some(YOUTUBE_PACKAGE),
                Some("cricket highlights"),
                Some("first_result")
            ]
        );
    }

    #[test]
    fn test_youtube_query_keeps_words_containing_verbs() {
        // "play" and "open" are dropped only as whole tokens; words that
        // contain them must come through intact.
        let command = plan("youtube playlist mix");
        assert_eq!(command.intent, Intent::OpenYoutube);
        assert_eq!(command.actions[1].target.as_deref(), Some("playlist mix"));

        let command = plan("open youtube copenhagen street food");
        assert_eq!(
            command.actions[1].target.as_deref(),
            Some("copenhagen street food")
        );
    }

    #[test]
    fn test_youtube_play_video_trigger() {
        let command = plan("play video despacito");
        assert_eq!(command.intent, Intent::OpenYoutube);
        assert_eq!(command.actions[1].target.as_deref(), Some("despacito"));
    }

    #[test]
    fn test_wifi_toggle_plan() {
        let command = plan("turn on wifi please");
        assert_eq!(command.intent, Intent::ToggleWifi);
        assert_eq!(
            targets(&command),
            vec![Some(SETTINGS_PACKAGE), Some("Wi-Fi"), Some("toggle_wifi")]
        );
    }

    #[test]
    fn test_bluetooth_toggle_plan() {
        let command = plan("bluetooth on");
        assert_eq!(command.intent, Intent::ToggleBluetooth);
        assert_eq!(command.actions[2].target.as_deref(), Some("toggle_bluetooth"));
    }

    #[test]
    fn test_open_url_picks_first_url_token() {
        let command = plan("visit https://example.org now");
        assert_eq!(command.intent, Intent::OpenUrl);
        assert_eq!(
            command.actions[0].target.as_deref(),
            Some("https://example.org")
        );
    }

    #[test]
    fn test_open_url_dot_com_token() {
        let command = plan("browse example.com");
        assert_eq!(command.intent, Intent::OpenUrl);
        assert_eq!(command.actions[0].target.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_open_url_falls_back_to_default() {
        let command = plan("open something");
        assert_eq!(command.intent, Intent::OpenUrl);
        assert_eq!(command.actions[0].target.as_deref(), Some(DEFAULT_URL));
    }

    #[test]
    fn test_unknown_fallback_single_action() {
        let command = plan("what is the weather");
        assert_eq!(command.intent, Intent::Unknown);
        assert_eq!(command.actions.len(), 1);
        assert_eq!(command.actions[0].kind, ActionKind::Unknown);
        assert!(command.actions[0].target.is_none());
    }

    #[test]
    fn test_stored_text_is_verbatim() {
        let command = plan("  CALL to Rahim  ");
        assert_eq!(command.text, "  CALL to Rahim  ");
    }

    #[test]
    fn test_plan_is_deterministic() {
        let input = PlanInput::new("call to Rahim")
            .with_device("d1")
            .with_language("en");
        let planner = RulePlanner::new();
        let a = tokio_test::block_on(planner.plan(&input)).unwrap();
        let b = tokio_test::block_on(planner.plan(&input)).unwrap();
        assert_eq!(a.intent, b.intent);
        assert_eq!(a.actions, b.actions);
        assert_eq!(a.language, b.language);
        assert_eq!(a.device_id, b.device_id);
    }

    #[test]
    fn test_empty_text_rejected() {
        let planner = RulePlanner::new();
        let result = tokio_test::block_on(planner.plan(&PlanInput::new("   ")));
        assert!(matches!(result, Err(PlanError::EmptyText)));
    }
}
