//! Intent type definitions
//!
//! Intent is the classified purpose of a user command. The set is closed;
//! anything the matcher cannot place lands on `Unknown`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classified purpose of a user command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CallContact,
    SendMessage,
    OpenYoutube,
    ToggleWifi,
    ToggleBluetooth,
    OpenUrl,
    Unknown,
}

impl Intent {
    /// Stable wire label for this intent
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::CallContact => "call_contact",
            Intent::SendMessage => "send_message",
            Intent::OpenYoutube => "open_youtube",
            Intent::ToggleWifi => "toggle_wifi",
            Intent::ToggleBluetooth => "toggle_bluetooth",
            Intent::OpenUrl => "open_url",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
