//! Message keys for user-facing strings.
//!
//! Every prompt, validation error and summary fragment the engine emits is a
//! key here; the actual wording lives in a [`super::Translator`]
//! implementation. Handlers never embed literal user-facing text.

/// Keys for every user-facing string the engine can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    // price-report prompts
    CityQuestion,
    CitySavedChoice,
    CityListHeader,
    StoreQuestion,
    BranchQuestion,
    StoreConfirmHeader,
    ProductQuestion,
    BrandQuestion,
    UnitTypeQuestion,
    UnitQuantityQuestion,
    PriceQuestion,
    UnitsQuestion,
    ClubQuestion,
    LimitQuestion,
    CartQuestion,

    // validation errors
    EmptyReply,
    PriceDigits,
    PricePositive,
    QuantityInvalid,
    UnitsWholeNumber,
    UnitsMin,
    YesNo,
    LimitNumber,
    LimitMin,
    CartDigits,
    CartPositive,
    ChoiceNumber,

    // terminal replies
    CanceledReport,
    GenericThanks,

    // completion summary fragments
    SummaryStore,
    SummaryCity,
    SummaryProduct,
    SummaryBrand,
    SummaryPrice,
    SummaryUnit,
    SummaryClubYes,
    SummaryClubNo,
    SummaryLimit,
    SummaryMinCart,
    ModerationPending,
    CompletionClosing,
    CompletionGratitude,
    DealNoteLimit,

    // price-search flow
    SearchProductQuestion,
    SearchBrandQuestion,
    SearchCityQuestion,
    SearchResultsHeader,
    SearchResultLine,
    SearchNoResults,
    SearchRestart,
    SearchTip,
    CanceledSearch,

    // intro / onboarding
    Intro,
    ButtonAddDeal,
    ButtonFindDeal,
    ButtonChangeCity,
    LanguagePrompt,
}
