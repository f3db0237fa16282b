use serde::{Deserialize, Serialize};

/// Property name of [`WelcomeUserState`] inside the user record.
pub const WELCOME_USER_STATE_PROPERTY: &str = "WelcomeUserState";

/// Per-user record kept by the welcome bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeUserState {
    pub did_bot_welcome_user: bool,
}
