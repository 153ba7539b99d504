//! Built-in English/Hebrew string catalog.
//!
//! Templates use `{name}` placeholders substituted from the call-site
//! params. A missing translation never panics: English is the fallback for
//! everything.

use super::keys::MessageKey;
use super::{Params, Translator};
use crate::locale::Locale;

/// The default [`Translator`]: immutable in-process catalog for `en`/`he`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTranslator;

impl Translator for StaticTranslator {
    fn translate(&self, key: MessageKey, locale: Locale, params: Params<'_>) -> String {
        let template = match locale {
            Locale::He => template_he(key),
            Locale::En => template_en(key),
        };
        render(template, params)
    }
}

fn render(template: &str, params: Params<'_>) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

fn template_en(key: MessageKey) -> &'static str {
    use MessageKey::*;
    match key {
        CityQuestion => "Which city is the store in?",
        CitySavedChoice => {
            "Your saved city is {city}. Use it, or send another city name to change."
        }
        CityListHeader => "Which of these cities did you mean? Reply with a number:",
        StoreQuestion => "Which store is this price from?\nExample: \u{201c}Shufersal\u{201d}.",
        BranchQuestion => {
            "Which branch? Reply with a branch name or address, or \u{201c}skip\u{201d}."
        }
        StoreConfirmHeader => {
            "I found a few matching stores. Reply with a number, or send more detail:"
        }
        ProductQuestion => "What product is this? Include brand and size if possible.",
        BrandQuestion => "What brand is it? Reply with a brand or \u{201c}skip\u{201d}.",
        UnitTypeQuestion => {
            "What unit is the package measured in? E.g., liter, kilogram, unit."
        }
        UnitQuantityQuestion => "How much per package? Reply with a number (e.g., 1.5).",
        PriceQuestion => "What is the price? Reply with numbers only (e.g., 4.90).",
        UnitsQuestion => "How many units does this price cover? Reply with a number (default 1).",
        ClubQuestion => {
            "Is this deal only for club/loyalty members? Reply \u{201c}yes\u{201d} or \u{201c}no\u{201d}."
        }
        LimitQuestion => {
            "Is there a quantity limit per shopper? Reply with a number or \u{201c}no\u{201d}."
        }
        CartQuestion => {
            "Is there a minimum cart total to unlock this deal? Reply with an amount or \u{201c}no\u{201d}."
        }

        EmptyReply => "Please send a reply so I can continue.",
        PriceDigits => "Please send the price as digits, e.g., 4.90",
        PricePositive => "Price must be greater than zero.",
        QuantityInvalid => "Please send a positive amount, e.g., 1 or 1.5.",
        UnitsWholeNumber => "Please reply with a whole number, e.g., 1 or 3.",
        UnitsMin => "Number of units must be at least 1.",
        YesNo => "Please reply \u{201c}yes\u{201d} or \u{201c}no\u{201d}.",
        LimitNumber => "Please reply with a number (e.g., 2) or \u{201c}no\u{201d}.",
        LimitMin => "Limit must be at least 1, or reply \u{201c}no\u{201d}.",
        CartDigits => "Please send the amount as digits, e.g., 100 or 150.5",
        CartPositive => "Cart total must be greater than zero, or reply \u{201c}no\u{201d}.",
        ChoiceNumber => "Please reply with one of the listed numbers.",

        CanceledReport => {
            "Okay, I canceled that report. Tap \u{201c}Add a deal\u{201d} anytime to start again."
        }
        GenericThanks => "Thanks! You can start a new report anytime.",

        SummaryStore => "Store: {value}",
        SummaryCity => "City: {value}",
        SummaryProduct => "Product: {value}",
        SummaryBrand => "Brand: {value}",
        SummaryPrice => "Price: {price} ({units} unit(s))",
        SummaryUnit => "Unit: {value}",
        SummaryClubYes => "Club members only: yes",
        SummaryClubNo => "Club members only: no",
        SummaryLimit => "Quantity limit: {limit}",
        SummaryMinCart => "Minimum cart: {amount}",
        ModerationPending => "Status: awaiting moderation",
        CompletionClosing => {
            "Thanks! We'll review this deal and let everyone know. You can tap \u{201c}Add a deal\u{201d} to share another one."
        }
        CompletionGratitude => "Thank you for helping the community save together!",
        DealNoteLimit => "Limit per shopper: {limit}",

        SearchProductQuestion => "Which product are you looking for?",
        SearchBrandQuestion => "Any particular brand? Reply with a brand or \u{201c}skip\u{201d}.",
        SearchCityQuestion => "Type the city so I can find deals near you.",
        SearchResultsHeader => "Here are the latest deals:",
        SearchResultLine => "\u{2022} {product} \u{2014} {price}\u{20aa} at {store} ({city})",
        SearchNoResults => "Sorry, I couldn't find any recent deals for {product}.",
        SearchRestart => "Please start again and tell me which product you want.",
        SearchTip => "Tip: tap \u{201c}Add a deal\u{201d} to share your own find.",
        CanceledSearch => "Okay, I stopped the search. Tap \u{201c}Find a deal\u{201d} to try again.",

        Intro => {
            "\u{1f6d2} Shuk \u{2014} save together on groceries.\n\
             Send prices you see in the supermarket and help everyone find cheaper options.\n\n\
             Choose one of the buttons (or type the text):\n\
             \u{2022} add a deal \u{2014} share a price you just found\n\
             \u{2022} find a deal \u{2014} see what others reported nearby\n\n\
             Type \"help\" anytime to see this again."
        }
        ButtonAddDeal => "Add a deal",
        ButtonFindDeal => "Find a deal",
        ButtonChangeCity => "Change city",
        LanguagePrompt => "Please choose your language / נא לבחור שפה\n1) עברית\n2) English",
    }
}

fn template_he(key: MessageKey) -> &'static str {
    use MessageKey::*;
    match key {
        CityQuestion => "באיזו עיר נמצאת החנות?",
        CitySavedChoice => "העיר השמורה שלך היא {city}. אפשר להשתמש בה, או לשלוח שם עיר אחרת.",
        CityListHeader => "לאיזו עיר התכוונת? נא להשיב במספר:",
        StoreQuestion => "מאיזו חנות המחיר הזה?\nלדוגמה: \u{201c}שופרסל\u{201d}.",
        BranchQuestion => "איזה סניף? אפשר לשלוח שם סניף או כתובת, או \u{201c}דלג\u{201d}.",
        StoreConfirmHeader => "מצאתי כמה חנויות מתאימות. נא להשיב במספר, או לשלוח פרט נוסף:",
        ProductQuestion => "איזה מוצר זה? כדאי לציין מותג וגודל.",
        BrandQuestion => "מאיזה מותג? נא להשיב עם שם מותג או \u{201c}דלג\u{201d}.",
        UnitTypeQuestion => "באיזו יחידת מידה נמכרת האריזה? לדוגמה: ליטר, קילוגרם, יחידה.",
        UnitQuantityQuestion => "כמה באריזה? נא להשיב במספר (לדוגמה 1.5).",
        PriceQuestion => "מה המחיר? נא להשיב בספרות בלבד (לדוגמה 4.90).",
        UnitsQuestion => "כמה יחידות כולל המחיר? נא להשיב במספר (ברירת המחדל 1).",
        ClubQuestion => "האם המבצע לחברי מועדון בלבד? נא להשיב \u{201c}כן\u{201d} או \u{201c}לא\u{201d}.",
        LimitQuestion => "האם יש הגבלת כמות לקונה? נא להשיב במספר או \u{201c}לא\u{201d}.",
        CartQuestion => "האם נדרש סכום קנייה מינימלי למימוש? נא להשיב בסכום או \u{201c}לא\u{201d}.",

        EmptyReply => "נא לשלוח תשובה כדי שאוכל להמשיך.",
        PriceDigits => "נא לשלוח את המחיר בספרות, לדוגמה 4.90",
        PricePositive => "המחיר חייב להיות גדול מאפס.",
        QuantityInvalid => "נא לשלוח כמות חיובית, לדוגמה 1 או 1.5.",
        UnitsWholeNumber => "נא להשיב במספר שלם, לדוגמה 1 או 3.",
        UnitsMin => "מספר היחידות חייב להיות לפחות 1.",
        YesNo => "נא להשיב \u{201c}כן\u{201d} או \u{201c}לא\u{201d}.",
        LimitNumber => "נא להשיב במספר (לדוגמה 2) או \u{201c}לא\u{201d}.",
        LimitMin => "ההגבלה חייבת להיות לפחות 1, או להשיב \u{201c}לא\u{201d}.",
        CartDigits => "נא לשלוח את הסכום בספרות, לדוגמה 100 או 150.5",
        CartPositive => "סכום הקנייה חייב להיות גדול מאפס, או להשיב \u{201c}לא\u{201d}.",
        ChoiceNumber => "נא להשיב באחד מהמספרים שברשימה.",

        CanceledReport => "בסדר, ביטלתי את הדיווח. אפשר ללחוץ על \u{201c}הוסף דיל\u{201d} בכל זמן כדי להתחיל מחדש.",
        GenericThanks => "תודה! אפשר להתחיל דיווח חדש בכל זמן.",

        SummaryStore => "חנות: {value}",
        SummaryCity => "עיר: {value}",
        SummaryProduct => "מוצר: {value}",
        SummaryBrand => "מותג: {value}",
        SummaryPrice => "מחיר: {price} ({units} יח')",
        SummaryUnit => "יחידת מידה: {value}",
        SummaryClubYes => "לחברי מועדון בלבד: כן",
        SummaryClubNo => "לחברי מועדון בלבד: לא",
        SummaryLimit => "הגבלת כמות: {limit}",
        SummaryMinCart => "מינימום קנייה: {amount}",
        ModerationPending => "סטטוס: ממתין לאישור",
        CompletionClosing => "תודה! נבדוק את הדיווח ונעדכן את כולם. אפשר ללחוץ על \u{201c}הוסף דיל\u{201d} כדי לשתף עוד אחד.",
        CompletionGratitude => "תודה שאתם עוזרים לקהילה לחסוך ביחד!",
        DealNoteLimit => "הגבלה לקונה: {limit}",

        SearchProductQuestion => "איזה מוצר אתם מחפשים?",
        SearchBrandQuestion => "מותג מסוים? נא להשיב עם שם מותג או \u{201c}דלג\u{201d}.",
        SearchCityQuestion => "באיזו עיר לחפש?",
        SearchResultsHeader => "הנה הדילים האחרונים:",
        SearchResultLine => "\u{2022} {product} \u{2014} {price}\u{20aa} ב{store} ({city})",
        SearchNoResults => "מצטערים, לא מצאתי דילים עדכניים עבור {product}.",
        SearchRestart => "נא להתחיל מחדש ולציין איזה מוצר לחפש.",
        SearchTip => "טיפ: לחצו על \u{201c}הוסף דיל\u{201d} כדי לשתף מציאה משלכם.",
        CanceledSearch => "בסדר, עצרתי את החיפוש. אפשר ללחוץ על \u{201c}מצא דיל\u{201d} כדי לנסות שוב.",

        Intro => {
            "\u{1f6d2} שוק \u{2014} חוסכים ביחד על הקניות.\n\
             שלחו מחירים שראיתם בסופר ועזרו לכולם למצוא זול יותר.\n\n\
             בחרו אחד מהכפתורים (או כתבו):\n\
             \u{2022} הוסף דיל \u{2014} שתפו מחיר שמצאתם\n\
             \u{2022} מצא דיל \u{2014} ראו מה אחרים דיווחו באזור\n\n\
             אפשר לכתוב \"עזרה\" בכל שלב כדי לראות את ההודעה הזו שוב."
        }
        ButtonAddDeal => "הוסף דיל",
        ButtonFindDeal => "מצא דיל",
        ButtonChangeCity => "עיר אחרת",
        // deliberately bilingual, shown before a locale is known
        LanguagePrompt => "Please choose your language / נא לבחור שפה\n1) עברית\n2) English",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_substitution() {
        let t = StaticTranslator;
        let text = t.translate(
            MessageKey::SummaryPrice,
            Locale::En,
            &[("price", "4.90".to_string()), ("units", "2".to_string())],
        );
        assert_eq!(text, "Price: 4.90 (2 unit(s))");
    }

    #[test]
    fn test_hebrew_catalog() {
        let t = StaticTranslator;
        let text = t.translate(MessageKey::CityQuestion, Locale::He, &[]);
        assert_eq!(text, "באיזו עיר נמצאת החנות?");
    }

    #[test]
    fn test_language_prompt_is_bilingual_everywhere() {
        let t = StaticTranslator;
        assert_eq!(
            t.translate(MessageKey::LanguagePrompt, Locale::He, &[]),
            t.translate(MessageKey::LanguagePrompt, Locale::En, &[]),
        );
    }

    #[test]
    fn test_unused_params_are_ignored() {
        let t = StaticTranslator;
        let text = t.translate(
            MessageKey::CityQuestion,
            Locale::En,
            &[("city", "Holon".to_string())],
        );
        assert_eq!(text, "Which city is the store in?");
    }
}
