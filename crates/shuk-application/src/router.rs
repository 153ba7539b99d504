//! Inbound message routing.
//!
//! One entry point per inbound chat message. Handlers run in a fixed order
//! and the first one that produces a reply wins: flow starts, then the
//! active report flow, then language selection and onboarding, then the
//! active search flow, and finally the intro fallback.

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use shuk_core::error::Result;
use shuk_core::i18n::{MessageKey, Translator};
use shuk_core::locale::{Locale, detect};
use shuk_core::message::{Button, FlowReply};
use shuk_core::text::normalize_for_match;
use shuk_core::units;
use shuk_core::user::{User, UserRepository};

use crate::report_flow::ReportFlowService;
use crate::search_flow::SearchFlowService;

/// Button id that starts the report flow.
pub const BUTTON_ADD_DEAL: &str = "add_deal";
/// Button id that starts the search flow.
pub const BUTTON_FIND_DEAL: &str = "find_deal";
/// Prefix of unit-type quick-reply button ids.
pub const BUTTON_UNIT_TYPE_PREFIX: &str = "unit_type:";

const ADD_COMMANDS: [&str; 4] = ["add deal", "add a deal", "הוסף דיל", "הוספת דיל"];
const FIND_COMMANDS: [&str; 4] = ["find deal", "find a deal", "מצא דיל", "חפש דיל"];

static RE_LANG_HE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bhe\b").expect("static regex"));
static RE_LANG_EN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\ben\b").expect("static regex"));

/// A single inbound chat message, already stripped of transport envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessage {
    pub text: String,
    pub button_id: Option<String>,
}

impl InboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            button_id: None,
        }
    }

    pub fn button(id: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            button_id: Some(id.into()),
        }
    }
}

/// Routes inbound messages to the right flow and owns user bookkeeping.
pub struct MessageRouter {
    users: Arc<dyn UserRepository>,
    report_flow: ReportFlowService,
    search_flow: SearchFlowService,
    translator: Arc<dyn Translator>,
}

impl MessageRouter {
    pub fn new(
        users: Arc<dyn UserRepository>,
        report_flow: ReportFlowService,
        search_flow: SearchFlowService,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            users,
            report_flow,
            search_flow,
            translator,
        }
    }

    /// Handles one inbound message and returns the reply to dispatch.
    pub async fn handle(&self, sender_id: &str, message: InboundMessage) -> Result<FlowReply> {
        let (mut user, created) = self.resolve_user(sender_id, &message.text).await?;
        user.last_seen = Some(Utc::now());
        self.users.save(&user).await?;

        // unit-type button taps become plain text in the user's language so
        // the step handler sees one input shape
        let mut text = message.text.clone();
        let mut button_id = message.button_id.as_deref();
        if let Some(slug) = button_id.and_then(|id| id.strip_prefix(BUTTON_UNIT_TYPE_PREFIX)) {
            if let Some(label) = units::label_for_locale(slug, user.locale) {
                text = label.to_string();
                button_id = None;
            }
        }

        let norm = normalize_for_match(&text);
        if button_id == Some(BUTTON_ADD_DEAL) || ADD_COMMANDS.contains(&norm.as_str()) {
            return self.report_flow.start(&user).await;
        }
        if button_id == Some(BUTTON_FIND_DEAL) || FIND_COMMANDS.contains(&norm.as_str()) {
            return self.search_flow.start(&user).await;
        }

        if let Some(reply) = self
            .report_flow
            .handle_message(&user, &text, button_id)
            .await?
        {
            return Ok(reply);
        }

        if let Some(choice) = parse_language_choice(&text) {
            if choice != user.locale {
                user.locale = choice;
                self.users.save(&user).await?;
            }
            return Ok(self.intro_reply(user.locale));
        }

        if created {
            return Ok(FlowReply::text(
                self.translator.plain(MessageKey::LanguagePrompt, user.locale),
            ));
        }

        if let Some(reply) = self.search_flow.handle_message(&user, &text).await? {
            return Ok(reply);
        }

        Ok(self.intro_reply(user.locale))
    }

    async fn resolve_user(&self, sender_id: &str, text: &str) -> Result<(User, bool)> {
        if let Some(user) = self.users.find_by_id(sender_id).await? {
            return Ok((user, false));
        }
        // numeric-only first contact must not pick Hebrew/English by accident
        let locale = detect(text).unwrap_or(Locale::En);
        Ok((User::new(sender_id, locale), true))
    }

    fn intro_reply(&self, locale: Locale) -> FlowReply {
        FlowReply::with_buttons(
            self.translator.plain(MessageKey::Intro, locale),
            vec![
                Button::new(
                    BUTTON_ADD_DEAL,
                    self.translator.plain(MessageKey::ButtonAddDeal, locale),
                ),
                Button::new(
                    BUTTON_FIND_DEAL,
                    self.translator.plain(MessageKey::ButtonFindDeal, locale),
                ),
            ],
        )
    }
}

/// Parses an explicit language choice ("1"/"2", names, short codes).
fn parse_language_choice(text: &str) -> Option<Locale> {
    let t = text.trim().to_lowercase();
    if t.is_empty() {
        return None;
    }
    if t.contains("עברית") || RE_LANG_HE.is_match(&t) || t == "1" {
        return Some(Locale::He);
    }
    if t.contains("english") || RE_LANG_EN.is_match(&t) || t == "2" {
        return Some(Locale::En);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuk_core::config::EngineConfig;
    use shuk_core::i18n::StaticTranslator;
    use shuk_infrastructure::memory::{
        InMemoryCityRepository, InMemoryLookupSessionRepository, InMemoryPriceReportRepository,
        InMemoryProductRepository, InMemoryReportSessionRepository, InMemoryStoreRepository,
        InMemoryUserRepository,
    };
    use std::sync::Arc;

    struct Fixture {
        router: MessageRouter,
        users: Arc<InMemoryUserRepository>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let cities = Arc::new(InMemoryCityRepository::new());
        let stores = Arc::new(InMemoryStoreRepository::new());
        let products = Arc::new(InMemoryProductRepository::new());
        let reports = Arc::new(InMemoryPriceReportRepository::new(
            stores.clone(),
            products.clone(),
            cities.clone(),
        ));
        let translator: Arc<dyn Translator> = Arc::new(StaticTranslator);
        let config = EngineConfig::default();
        let report_flow = ReportFlowService::new(
            Arc::new(InMemoryReportSessionRepository::new()),
            users.clone(),
            cities.clone(),
            stores.clone(),
            products.clone(),
            reports.clone(),
            translator.clone(),
            config.clone(),
        );
        let search_flow = SearchFlowService::new(
            Arc::new(InMemoryLookupSessionRepository::new()),
            reports,
            stores,
            products,
            cities,
            translator.clone(),
            config,
        );
        let router = MessageRouter::new(users.clone(), report_flow, search_flow, translator);
        Fixture { router, users }
    }

    #[tokio::test]
    async fn test_new_user_gets_language_prompt() {
        let f = fixture();
        let reply = f
            .router
            .handle("u-1", InboundMessage::text("hi there"))
            .await
            .unwrap();
        assert!(reply.text.contains("choose your language"));
        assert!(f.users.find_by_id("u-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_language_choice_updates_locale_and_shows_intro() {
        let f = fixture();
        f.router
            .handle("u-1", InboundMessage::text("hello"))
            .await
            .unwrap();
        let reply = f.router.handle("u-1", InboundMessage::text("1")).await.unwrap();
        assert!(reply.text.contains("שוק"));
        let user = f.users.find_by_id("u-1").await.unwrap().unwrap();
        assert_eq!(user.locale, Locale::He);
    }

    #[tokio::test]
    async fn test_add_command_starts_report_flow() {
        let f = fixture();
        f.router.handle("u-1", InboundMessage::text("hi")).await.unwrap();
        let reply = f
            .router
            .handle("u-1", InboundMessage::text("add a deal"))
            .await
            .unwrap();
        assert!(reply.text.to_lowercase().contains("city"));
    }

    #[tokio::test]
    async fn test_add_button_starts_report_flow_in_hebrew() {
        let f = fixture();
        f.router
            .handle("u-1", InboundMessage::text("שלום"))
            .await
            .unwrap();
        let reply = f
            .router
            .handle("u-1", InboundMessage::button(BUTTON_ADD_DEAL))
            .await
            .unwrap();
        assert!(reply.text.contains("עיר"));
    }

    #[tokio::test]
    async fn test_unit_button_maps_to_label() {
        let f = fixture();
        f.router.handle("u-1", InboundMessage::text("hi")).await.unwrap();
        f.router
            .handle("u-1", InboundMessage::text("add a deal"))
            .await
            .unwrap();
        for text in ["Tel Aviv", "Mega", "skip", "Milk 3%", "skip"] {
            f.router
                .handle("u-1", InboundMessage::text(text))
                .await
                .unwrap();
        }
        // tapping the liter button answers the unit-type question
        let reply = f
            .router
            .handle("u-1", InboundMessage::button("unit_type:liter"))
            .await
            .unwrap();
        assert!(reply.text.to_lowercase().contains("how much per package"));
    }

    #[tokio::test]
    async fn test_fallback_is_intro_with_buttons() {
        let f = fixture();
        f.router.handle("u-1", InboundMessage::text("hi")).await.unwrap();
        let reply = f
            .router
            .handle("u-1", InboundMessage::text("what is this"))
            .await
            .unwrap();
        assert!(reply.text.contains("Shuk"));
        assert_eq!(reply.buttons.len(), 2);
        assert_eq!(reply.buttons[0].id, BUTTON_ADD_DEAL);
    }

    #[tokio::test]
    async fn test_numeric_first_contact_defaults_to_english() {
        let f = fixture();
        f.router.handle("u-1", InboundMessage::text("12345")).await.unwrap();
        let user = f.users.find_by_id("u-1").await.unwrap().unwrap();
        assert_eq!(user.locale, Locale::En);
    }

    #[tokio::test]
    async fn test_hebrew_first_contact_detected() {
        let f = fixture();
        f.router
            .handle("u-1", InboundMessage::text("שלום לכם"))
            .await
            .unwrap();
        let user = f.users.find_by_id("u-1").await.unwrap().unwrap();
        assert_eq!(user.locale, Locale::He);
    }

    #[test]
    fn test_parse_language_choice() {
        assert_eq!(parse_language_choice("1"), Some(Locale::He));
        assert_eq!(parse_language_choice("2"), Some(Locale::En));
        assert_eq!(parse_language_choice("English please"), Some(Locale::En));
        assert_eq!(parse_language_choice("עברית"), Some(Locale::He));
        assert_eq!(parse_language_choice("switch to he"), Some(Locale::He));
        assert_eq!(parse_language_choice("hello"), None);
        assert_eq!(parse_language_choice(""), None);
    }
}
