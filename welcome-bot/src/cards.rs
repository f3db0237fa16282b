//! Intro card shown for `intro` / `help`.

use wbot_core::{CardAction, HeroCard};

pub const INTRO_CARD_TITLE: &str = "Está com dúvidas?";
pub const INTRO_CARD_TEXT: &str = "Que tal aprender mais?";
pub const INTRO_ACTION_LABEL: &str = "Ver Documentação do Bot Framework";
pub const INTRO_ACTION_URL: &str =
    "https://learn.microsoft.com/en-us/microsoftteams/platform/bots/bot-features";

pub fn intro_card() -> HeroCard {
    HeroCard {
        title: Some(INTRO_CARD_TITLE.to_string()),
        text: Some(INTRO_CARD_TEXT.to_string()),
        buttons: vec![CardAction::open_url(INTRO_ACTION_LABEL, INTRO_ACTION_URL)],
        ..Default::default()
    }
}
