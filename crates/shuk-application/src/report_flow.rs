//! The price-report conversation state machine.
//!
//! Every inbound message for a user with an active report session lands in
//! [`ReportFlowService::handle_message`]. Global behaviors (empty input,
//! cancel keyword, defensive completion) run first; the current step's
//! handler then validates the input and returns an explicit [`StepOutcome`]
//! describing the transition. Skips and jumps are values a test can assert
//! on, not side effects.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use shuk_core::city::{City, CityRepository};
use shuk_core::config::EngineConfig;
use shuk_core::error::Result;
use shuk_core::i18n::{MessageKey, Translator};
use shuk_core::locale::Locale;
use shuk_core::message::{Button, FlowReply};
use shuk_core::product::{Product, ProductRepository};
use shuk_core::report::PriceReportRepository;
use shuk_core::session::{ReportSession, ReportSessionRepository, ReportStep};
use shuk_core::store::{Store, StoreRepository};
use shuk_core::text::{KeywordCategory, is_keyword_norm, normalize_for_match, normalize_token};
use shuk_core::units;
use shuk_core::user::{User, UserRepository};

use crate::entity_resolver::{CityResolution, EntityResolver};
use crate::materializer::ReportMaterializer;

/// Button id: use the saved default city.
pub const BUTTON_CITY_DEFAULT: &str = "city_default";
/// Button id: ask for a different city.
pub const BUTTON_CITY_CHANGE: &str = "city_change";

/// The explicit result of one step handler.
///
/// The engine owns the actual step mutation; handlers only report what
/// should happen next.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Keep the current step and send this reply (validation error or a
    /// refreshed disambiguation list).
    Stay(FlowReply),
    /// Move to the given step and send its standard prompt.
    Advance(ReportStep),
    /// Move to the given step and send a custom reply instead of the
    /// standard prompt (e.g. a candidate list).
    AdvanceWith(ReportStep, FlowReply),
    /// Every question is answered; complete and materialize.
    Finish,
}

struct StepInput<'a> {
    raw: &'a str,
    norm: String,
    button_id: Option<&'a str>,
}

/// Drives the report conversation for all users.
pub struct ReportFlowService {
    sessions: Arc<dyn ReportSessionRepository>,
    users: Arc<dyn UserRepository>,
    cities: Arc<dyn CityRepository>,
    stores: Arc<dyn StoreRepository>,
    products: Arc<dyn ProductRepository>,
    resolver: EntityResolver,
    materializer: ReportMaterializer,
    translator: Arc<dyn Translator>,
}

impl ReportFlowService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<dyn ReportSessionRepository>,
        users: Arc<dyn UserRepository>,
        cities: Arc<dyn CityRepository>,
        stores: Arc<dyn StoreRepository>,
        products: Arc<dyn ProductRepository>,
        reports: Arc<dyn PriceReportRepository>,
        translator: Arc<dyn Translator>,
        config: EngineConfig,
    ) -> Self {
        let resolver = EntityResolver::new(
            cities.clone(),
            stores.clone(),
            products.clone(),
            config.clone(),
        );
        let materializer = ReportMaterializer::new(
            resolver.clone(),
            cities.clone(),
            products.clone(),
            reports,
            translator.clone(),
            config,
        );
        Self {
            sessions,
            users,
            cities,
            stores,
            products,
            resolver,
            materializer,
            translator,
        }
    }

    /// Starts a fresh report flow, superseding any active session.
    pub async fn start(&self, user: &User) -> Result<FlowReply> {
        self.sessions.deactivate_all(&user.id).await?;
        let session = ReportSession::new(&user.id);
        self.sessions.save(&session).await?;

        if user.has_saved_city() {
            let city = user.saved_city_display().to_string();
            let text = self.translator.translate(
                MessageKey::CitySavedChoice,
                user.locale,
                &[("city", city.clone())],
            );
            return Ok(FlowReply::with_buttons(
                text,
                vec![
                    Button::new(BUTTON_CITY_DEFAULT, city),
                    Button::new(
                        BUTTON_CITY_CHANGE,
                        self.translator.plain(MessageKey::ButtonChangeCity, user.locale),
                    ),
                ],
            ));
        }
        Ok(self.prompt_for(ReportStep::City, user.locale))
    }

    /// Routes a message into the user's active report session.
    ///
    /// Returns `Ok(None)` when the user has no active report session so the
    /// caller can try the other flows.
    pub async fn handle_message(
        &self,
        user: &User,
        text: &str,
        button_id: Option<&str>,
    ) -> Result<Option<FlowReply>> {
        let Some(mut session) = self.sessions.find_active(&user.id).await? else {
            return Ok(None);
        };
        let locale = user.locale;

        let mut raw = text.trim();
        // numeric disambiguation buttons carry the index as their id
        if raw.is_empty() {
            if let Some(id) = button_id.filter(|id| is_numeric(id)) {
                raw = id;
            }
        }
        if raw.is_empty() && button_id.is_none() {
            return Ok(Some(self.plain_reply(MessageKey::EmptyReply, locale)));
        }

        let norm = normalize_for_match(raw);
        if is_keyword_norm(&norm, KeywordCategory::Cancel, locale) {
            session.cancel();
            self.sessions.save(&session).await?;
            return Ok(Some(self.plain_reply(MessageKey::CanceledReport, locale)));
        }

        let input = StepInput {
            raw,
            norm,
            button_id,
        };
        let Some(outcome) = self.dispatch(&mut session, user, &input).await? else {
            // no handler for this step: don't trap the user, close out
            session.complete();
            self.sessions.save(&session).await?;
            return Ok(Some(self.plain_reply(MessageKey::GenericThanks, locale)));
        };

        let reply = match outcome {
            StepOutcome::Stay(reply) => {
                session.touch();
                self.sessions.save(&session).await?;
                reply
            }
            StepOutcome::Advance(step) => {
                session.step = step;
                session.touch();
                self.sessions.save(&session).await?;
                self.prompt_for(step, locale)
            }
            StepOutcome::AdvanceWith(step, reply) => {
                session.step = step;
                session.touch();
                self.sessions.save(&session).await?;
                reply
            }
            StepOutcome::Finish => self.complete(&mut session, user).await?,
        };
        Ok(Some(reply))
    }

    async fn dispatch(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> Result<Option<StepOutcome>> {
        let outcome = match session.step {
            ReportStep::City => self.handle_city(session, user, input).await?,
            ReportStep::Store => self.handle_store(session, input),
            ReportStep::Branch => self.handle_branch(session, user, input).await?,
            ReportStep::StoreConfirm => self.handle_store_confirm(session, user, input).await?,
            ReportStep::Product => self.handle_product(session, input),
            ReportStep::Brand => self.handle_brand(session, user, input),
            ReportStep::UnitType => self.handle_unit_type(session, user, input).await?,
            ReportStep::UnitQuantity => self.handle_unit_quantity(session, user, input),
            ReportStep::Price => self.handle_price(session, user, input),
            ReportStep::Units => self.handle_units(session, user, input),
            ReportStep::Club => self.handle_club(session, user, input),
            ReportStep::Limit => self.handle_limit(session, user, input),
            ReportStep::Cart => self.handle_cart(session, user, input),
            ReportStep::Complete | ReportStep::Canceled => return Ok(None),
        };
        Ok(Some(outcome))
    }

    // ---- step handlers -------------------------------------------------

    async fn handle_city(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> Result<StepOutcome> {
        let locale = user.locale;

        if input.button_id == Some(BUTTON_CITY_DEFAULT) && user.has_saved_city() {
            session.draft.city_id = user.city_id.clone();
            session.draft.city_he =
                Some(user.city_he.clone()).filter(|c| !c.is_empty());
            session.draft.city_en =
                Some(user.city_en.clone()).filter(|c| !c.is_empty());
            return Ok(StepOutcome::Advance(ReportStep::Store));
        }
        if input.button_id == Some(BUTTON_CITY_CHANGE)
            || is_keyword_norm(&input.norm, KeywordCategory::CityChange, locale)
        {
            return Ok(StepOutcome::Stay(self.plain_reply(MessageKey::CityQuestion, locale)));
        }

        // pending disambiguation list: a number selects from it
        if !session.draft.city_candidates.is_empty() {
            let candidates = session.draft.city_candidates.clone();
            if let Some(index) = parse_choice(input.raw, candidates.len()) {
                if let Some(city) = self.cities.find_by_id(&candidates[index - 1]).await? {
                    session.draft.city_candidates.clear();
                    self.apply_city(session, user, &city).await?;
                    return Ok(StepOutcome::Advance(ReportStep::Store));
                }
            } else if is_numeric(input.raw) {
                let reply = self.city_list_reply(&candidates, locale, true).await?;
                return Ok(StepOutcome::Stay(reply));
            }
            // free text falls through to a fresh resolution
            session.draft.city_candidates.clear();
        }

        match self.resolver.resolve_city(input.raw).await? {
            CityResolution::Exact(city) => {
                self.apply_city(session, user, &city).await?;
                Ok(StepOutcome::Advance(ReportStep::Store))
            }
            CityResolution::Candidates(cities) => {
                session.draft.city_candidates = cities.iter().map(|c| c.id.clone()).collect();
                let reply = self
                    .city_list_reply(&session.draft.city_candidates.clone(), locale, false)
                    .await?;
                Ok(StepOutcome::Stay(reply))
            }
            CityResolution::NoMatch => {
                let city = self.resolver.create_city(input.raw).await?;
                self.apply_city(session, user, &city).await?;
                Ok(StepOutcome::Advance(ReportStep::Store))
            }
        }
    }

    fn handle_store(&self, session: &mut ReportSession, input: &StepInput<'_>) -> StepOutcome {
        session.draft.store_name = Some(input.raw.to_string());
        session.draft.reset_store();
        StepOutcome::Advance(ReportStep::Branch)
    }

    async fn handle_branch(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> Result<StepOutcome> {
        if is_keyword_norm(&input.norm, KeywordCategory::Skip, user.locale) {
            session.draft.branch = None;
        } else {
            session.draft.branch = Some(input.raw.to_string());
        }
        self.search_and_route(session, user).await
    }

    async fn handle_store_confirm(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> Result<StepOutcome> {
        let candidates = session.draft.store_candidates.clone();
        if let Some(index) = parse_choice(input.raw, candidates.len()) {
            session.draft.store_id = Some(candidates[index - 1].clone());
            session.draft.store_candidates.clear();
            return Ok(StepOutcome::Advance(ReportStep::Product));
        }
        if is_numeric(input.raw) {
            let reply = self
                .store_list_reply(&candidates, user.locale, true)
                .await?;
            return Ok(StepOutcome::Stay(reply));
        }

        // free text refines the branch/address detail and searches again
        session.draft.branch = Some(input.raw.to_string());
        self.search_and_route(session, user).await
    }

    /// Shared by Branch and StoreConfirm: run the candidate search and route
    /// by how many stores came back.
    async fn search_and_route(
        &self,
        session: &mut ReportSession,
        user: &User,
    ) -> Result<StepOutcome> {
        let Some(name) = session.draft.store_name.clone() else {
            return Ok(StepOutcome::Advance(ReportStep::Product));
        };
        let filter = EntityResolver::city_filter(&session.draft);
        let candidates = self
            .resolver
            .find_store_candidates(&name, &filter, session.draft.branch.as_deref())
            .await?;

        match candidates.len() {
            0 => {
                session.draft.store_id = None;
                session.draft.store_candidates.clear();
                Ok(StepOutcome::Advance(ReportStep::Product))
            }
            1 => {
                session.draft.store_id = Some(candidates[0].id.clone());
                session.draft.store_candidates.clear();
                Ok(StepOutcome::Advance(ReportStep::Product))
            }
            _ => {
                session.draft.store_candidates =
                    candidates.iter().map(|s| s.id.clone()).collect();
                let reply = render_store_list(
                    &candidates,
                    &self.translator.plain(MessageKey::StoreConfirmHeader, user.locale),
                );
                if session.step == ReportStep::StoreConfirm {
                    Ok(StepOutcome::Stay(reply))
                } else {
                    Ok(StepOutcome::AdvanceWith(ReportStep::StoreConfirm, reply))
                }
            }
        }
    }

    fn handle_product(&self, session: &mut ReportSession, input: &StepInput<'_>) -> StepOutcome {
        session.draft.product_name = Some(input.raw.to_string());
        session.draft.brand = None;
        StepOutcome::Advance(ReportStep::Brand)
    }

    fn handle_brand(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> StepOutcome {
        let skip = is_keyword_norm(&input.norm, KeywordCategory::Skip, user.locale)
            || is_keyword_norm(&input.norm, KeywordCategory::No, user.locale);
        session.draft.brand = if skip {
            None
        } else {
            Some(input.raw.to_string())
        };
        StepOutcome::Advance(ReportStep::UnitType)
    }

    async fn handle_unit_type(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> Result<StepOutcome> {
        let skipped = is_keyword_norm(&input.norm, KeywordCategory::Skip, user.locale);
        if skipped {
            session.draft.unit_type_slug = None;
            session.draft.unit_type_he = None;
            session.draft.unit_type_en = None;
            session.draft.unit_quantity = None;
            // no unit type, nothing to quantify
            return Ok(StepOutcome::Advance(ReportStep::Price));
        }

        let resolution = units::resolve(input.raw);
        session.draft.unit_type_slug =
            Some(resolution.slug.clone()).filter(|s| !s.is_empty());
        session.draft.unit_type_he = Some(resolution.he.clone());
        session.draft.unit_type_en = Some(resolution.en.clone());

        // a known product with a matching default lets us skip the
        // quantity question
        if let Some(product) = self.lookup_product(&session.draft.product_name).await? {
            if product.default_unit_quantity.is_some()
                && unit_matches_default(&resolution.he, &resolution.en, &product)
            {
                session.draft.unit_quantity = product.default_unit_quantity;
                return Ok(StepOutcome::Advance(ReportStep::Price));
            }
        }
        Ok(StepOutcome::Advance(ReportStep::UnitQuantity))
    }

    fn handle_unit_quantity(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> StepOutcome {
        match parse_decimal(input.raw) {
            Some(value) if value > Decimal::ZERO => {
                session.draft.unit_quantity = Some(value);
                StepOutcome::Advance(ReportStep::Price)
            }
            _ => StepOutcome::Stay(self.plain_reply(MessageKey::QuantityInvalid, user.locale)),
        }
    }

    fn handle_price(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> StepOutcome {
        let Some(value) = parse_decimal(input.raw) else {
            return StepOutcome::Stay(self.plain_reply(MessageKey::PriceDigits, user.locale));
        };
        if value <= Decimal::ZERO {
            return StepOutcome::Stay(self.plain_reply(MessageKey::PricePositive, user.locale));
        }
        session.draft.price = Some(quantize(value));
        StepOutcome::Advance(ReportStep::Units)
    }

    fn handle_units(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> StepOutcome {
        if input.raw.is_empty() {
            session.draft.units_in_price = Some(1);
            return StepOutcome::Advance(ReportStep::Club);
        }
        let Some(units) = parse_whole_number(input.raw) else {
            return StepOutcome::Stay(self.plain_reply(MessageKey::UnitsWholeNumber, user.locale));
        };
        if units == 0 {
            return StepOutcome::Stay(self.plain_reply(MessageKey::UnitsMin, user.locale));
        }
        session.draft.units_in_price = Some(units);
        StepOutcome::Advance(ReportStep::Club)
    }

    fn handle_club(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> StepOutcome {
        if is_keyword_norm(&input.norm, KeywordCategory::Yes, user.locale) {
            session.draft.club_only = Some(true);
        } else if is_keyword_norm(&input.norm, KeywordCategory::No, user.locale) {
            session.draft.club_only = Some(false);
        } else {
            return StepOutcome::Stay(self.plain_reply(MessageKey::YesNo, user.locale));
        }
        StepOutcome::Advance(ReportStep::Limit)
    }

    fn handle_limit(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> StepOutcome {
        if input.raw.is_empty() || is_keyword_norm(&input.norm, KeywordCategory::No, user.locale) {
            session.draft.limit_qty = None;
            return StepOutcome::Advance(ReportStep::Cart);
        }
        let Some(limit) = parse_whole_number(input.raw) else {
            return StepOutcome::Stay(self.plain_reply(MessageKey::LimitNumber, user.locale));
        };
        if limit == 0 {
            return StepOutcome::Stay(self.plain_reply(MessageKey::LimitMin, user.locale));
        }
        session.draft.limit_qty = Some(limit);
        StepOutcome::Advance(ReportStep::Cart)
    }

    fn handle_cart(
        &self,
        session: &mut ReportSession,
        user: &User,
        input: &StepInput<'_>,
    ) -> StepOutcome {
        if input.raw.is_empty() || is_keyword_norm(&input.norm, KeywordCategory::No, user.locale) {
            session.draft.min_cart_total = None;
            return StepOutcome::Finish;
        }
        let Some(value) = parse_decimal(input.raw) else {
            return StepOutcome::Stay(self.plain_reply(MessageKey::CartDigits, user.locale));
        };
        if value <= Decimal::ZERO {
            return StepOutcome::Stay(self.plain_reply(MessageKey::CartPositive, user.locale));
        }
        session.draft.min_cart_total = Some(quantize(value));
        StepOutcome::Finish
    }

    // ---- completion ----------------------------------------------------

    async fn complete(&self, session: &mut ReportSession, user: &User) -> Result<FlowReply> {
        session.complete();
        let summary = self.render_summary(session, user.locale);

        // persistence trouble must never strand the reporter; log and keep
        // the session data for out-of-band reconciliation
        if let Err(error) = self.materializer.materialize(session, user).await {
            tracing::error!(
                target: "report_flow",
                session_id = %session.id,
                %error,
                "failed to materialize price report"
            );
        }
        self.sessions.save(session).await?;

        let locale = user.locale;
        let moderation = self.translator.plain(MessageKey::ModerationPending, locale);
        let closing = self.translator.plain(MessageKey::CompletionClosing, locale);
        let gratitude = self.translator.plain(MessageKey::CompletionGratitude, locale);
        Ok(FlowReply::text(format!(
            "{summary}\n\n{moderation}\n\n{closing}\n{gratitude}"
        )))
    }

    fn render_summary(&self, session: &ReportSession, locale: Locale) -> String {
        let draft = &session.draft;
        let hebrew = locale.is_hebrew();
        let missing = "\u{2014}";

        let mut lines = Vec::new();
        let store = draft.store_name.as_deref().unwrap_or(missing);
        lines.push(self.translator.translate(
            MessageKey::SummaryStore,
            locale,
            &[("value", store.to_string())],
        ));
        let city = draft.city_display(hebrew);
        lines.push(self.translator.translate(
            MessageKey::SummaryCity,
            locale,
            &[("value", if city.is_empty() { missing } else { city }.to_string())],
        ));
        let product = draft.product_name.as_deref().unwrap_or(missing);
        lines.push(self.translator.translate(
            MessageKey::SummaryProduct,
            locale,
            &[("value", product.to_string())],
        ));
        if let Some(brand) = draft.brand.as_deref().filter(|b| !b.is_empty()) {
            lines.push(self.translator.translate(
                MessageKey::SummaryBrand,
                locale,
                &[("value", brand.to_string())],
            ));
        }
        if let Some(price) = draft.price {
            let units = draft.units_in_price.unwrap_or(1);
            lines.push(self.translator.translate(
                MessageKey::SummaryPrice,
                locale,
                &[("price", price.to_string()), ("units", units.to_string())],
            ));
        }
        if draft.has_unit() {
            let label = if hebrew {
                draft.unit_type_he.as_deref().or(draft.unit_type_en.as_deref())
            } else {
                draft.unit_type_en.as_deref().or(draft.unit_type_he.as_deref())
            }
            .unwrap_or_default();
            let value = match draft.unit_quantity {
                Some(quantity) => format!("{quantity} {label}"),
                None => label.to_string(),
            };
            lines.push(self.translator.translate(
                MessageKey::SummaryUnit,
                locale,
                &[("value", value)],
            ));
        }
        match draft.club_only {
            Some(true) => lines.push(self.translator.plain(MessageKey::SummaryClubYes, locale)),
            Some(false) => lines.push(self.translator.plain(MessageKey::SummaryClubNo, locale)),
            None => {}
        }
        if let Some(limit) = draft.limit_qty {
            lines.push(self.translator.translate(
                MessageKey::SummaryLimit,
                locale,
                &[("limit", limit.to_string())],
            ));
        }
        if let Some(cart) = draft.min_cart_total {
            lines.push(self.translator.translate(
                MessageKey::SummaryMinCart,
                locale,
                &[("amount", cart.to_string())],
            ));
        }
        lines.join("\n")
    }

    // ---- helpers -------------------------------------------------------

    fn plain_reply(&self, key: MessageKey, locale: Locale) -> FlowReply {
        FlowReply::text(self.translator.plain(key, locale))
    }

    /// The standard prompt for a step, with quick-reply buttons where the
    /// step has a small canonical answer set.
    fn prompt_for(&self, step: ReportStep, locale: Locale) -> FlowReply {
        let key = match step {
            ReportStep::City => MessageKey::CityQuestion,
            ReportStep::Store => MessageKey::StoreQuestion,
            ReportStep::Branch => MessageKey::BranchQuestion,
            ReportStep::StoreConfirm => MessageKey::StoreConfirmHeader,
            ReportStep::Product => MessageKey::ProductQuestion,
            ReportStep::Brand => MessageKey::BrandQuestion,
            ReportStep::UnitType => MessageKey::UnitTypeQuestion,
            ReportStep::UnitQuantity => MessageKey::UnitQuantityQuestion,
            ReportStep::Price => MessageKey::PriceQuestion,
            ReportStep::Units => MessageKey::UnitsQuestion,
            ReportStep::Club => MessageKey::ClubQuestion,
            ReportStep::Limit => MessageKey::LimitQuestion,
            ReportStep::Cart => MessageKey::CartQuestion,
            ReportStep::Complete | ReportStep::Canceled => MessageKey::GenericThanks,
        };
        let text = self.translator.plain(key, locale);
        if step == ReportStep::UnitType {
            let buttons = ["liter", "kilogram", "unit"]
                .into_iter()
                .filter_map(|slug| {
                    units::label_for_locale(slug, locale)
                        .map(|label| Button::new(format!("unit_type:{slug}"), label))
                })
                .collect();
            return FlowReply::with_buttons(text, buttons);
        }
        FlowReply::text(text)
    }

    async fn apply_city(
        &self,
        session: &mut ReportSession,
        user: &User,
        city: &City,
    ) -> Result<()> {
        session.draft.city_id = Some(city.id.clone());
        session.draft.city_he = Some(city.name_he.clone()).filter(|n| !n.is_empty());
        session.draft.city_en = Some(city.name_en.clone()).filter(|n| !n.is_empty());

        // remember the choice as the user's default city for next time
        let mut updated = user.clone();
        updated.city_id = Some(city.id.clone());
        updated.city_he = city.name_he.clone();
        updated.city_en = city.name_en.clone();
        self.users.save(&updated).await
    }

    async fn lookup_product(&self, name: &Option<String>) -> Result<Option<Product>> {
        let Some(name) = name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(None);
        };
        if let Some(product) = self.products.find_by_name_he(name).await? {
            return Ok(Some(product));
        }
        self.products.find_by_name_en(name).await
    }

    async fn city_list_reply(
        &self,
        city_ids: &[String],
        locale: Locale,
        with_error: bool,
    ) -> Result<FlowReply> {
        let mut cities = Vec::new();
        for id in city_ids {
            if let Some(city) = self.cities.find_by_id(id).await? {
                cities.push(city);
            }
        }
        let header = self.translator.plain(MessageKey::CityListHeader, locale);
        let mut lines = vec![header];
        let mut buttons = Vec::new();
        for (i, city) in cities.iter().enumerate() {
            let label = if locale.is_hebrew() && !city.name_he.is_empty() {
                city.name_he.as_str()
            } else {
                city.display_name()
            };
            lines.push(format!("{}) {label}", i + 1));
            buttons.push(Button::new((i + 1).to_string(), label));
        }
        let mut text = lines.join("\n");
        if with_error {
            let error = self.translator.plain(MessageKey::ChoiceNumber, locale);
            text = format!("{error}\n\n{text}");
        }
        Ok(FlowReply::with_buttons(text, buttons))
    }

    async fn store_list_reply(
        &self,
        store_ids: &[String],
        locale: Locale,
        with_error: bool,
    ) -> Result<FlowReply> {
        let mut stores = Vec::new();
        for id in store_ids {
            if let Some(store) = self.stores.find_by_id(id).await? {
                stores.push(store);
            }
        }
        let header = self.translator.plain(MessageKey::StoreConfirmHeader, locale);
        let mut reply = render_store_list(&stores, &header);
        if with_error {
            let error = self.translator.plain(MessageKey::ChoiceNumber, locale);
            reply.text = format!("{error}\n\n{}", reply.text);
        }
        Ok(reply)
    }
}

/// Renders a numbered `index) label — detail` candidate list.
fn render_store_list(stores: &[Store], header: &str) -> FlowReply {
    let mut lines = vec![header.to_string()];
    let mut buttons = Vec::new();
    for (i, store) in stores.iter().enumerate() {
        let detail = store.detail();
        if detail.is_empty() {
            lines.push(format!("{}) {}", i + 1, store.label()));
        } else {
            lines.push(format!("{}) {} \u{2014} {}", i + 1, store.label(), detail));
        }
        buttons.push(Button::new((i + 1).to_string(), store.label()));
    }
    FlowReply::with_buttons(lines.join("\n"), buttons)
}

fn unit_matches_default(he: &str, en: &str, product: &Product) -> bool {
    let he = normalize_token(he);
    let en = normalize_token(en);
    (!he.is_empty() && he == normalize_token(&product.default_unit_type_he))
        || (!en.is_empty() && en == normalize_token(&product.default_unit_type_en))
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().replace(',', ".");
    Decimal::from_str(&cleaned).ok()
}

fn quantize(value: Decimal) -> Decimal {
    let mut v = value.round_dp(2);
    v.rescale(2);
    v
}

fn parse_whole_number(raw: &str) -> Option<u32> {
    let t = raw.trim();
    if t.is_empty() || !t.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    t.parse().ok()
}

fn is_numeric(raw: &str) -> bool {
    let t = raw.trim();
    !t.is_empty() && t.chars().all(|c| c.is_ascii_digit())
}

/// Parses a 1-based choice index within a candidate list.
fn parse_choice(raw: &str, len: usize) -> Option<usize> {
    let index = parse_whole_number(raw)? as usize;
    if (1..=len).contains(&index) {
        Some(index)
    } else {
        None
    }
}
