//! Bank description parsing.
//!
//! Card statements pack a time, a `MM/DD` date, a phone number, the country
//! and state into the description. Each is peeled off in turn and what is left
//! is normalized into a merchant name.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Components extracted from a raw description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDescription {
    /// Description with the extracted parts removed.
    pub description: String,
    /// `HH:MM:SS`.
    pub time: Option<String>,
    /// `MM/DD`.
    pub date: Option<String>,
    /// `NNN-NNN-NNNN`.
    pub phone: Option<String>,
    /// Trailing `US`.
    pub country: Option<String>,
    /// Trailing US state code.
    pub state: Option<String>,
    /// Upper-case merchant; a single space when nothing is left.
    pub merchant: String,
}

macro_rules! regex {
    ($name:ident, $pattern:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).expect("valid pattern"));
    };
}

regex!(TIME_RE, r"([0-9]{2}:[0-9]{2}:[0-9]{2})");
regex!(DATE_RE, r"([0-1][0-9]/[0-3][0-9])");
regex!(BRANCH_RE, r"(?i)Branch Cash Withdrawal");
regex!(PHONE_RE, r"([0-9]{3}-[0-9]{3}-[0-9]{4})");
regex!(POS_RE, r"^POS ");
regex!(COUNTRY_RE, r"(US)$");
regex!(
    STATE_RE,
    concat!(
        r"(AL|AK|AZ|AR|CA|CO|CT|DE|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|",
        r"NJ|NM|NY|NC|ND|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VT|VA|WA|WV|WI|WY)$"
    )
);
regex!(THIRD_PARTY_RE, r"^(...?\*|LEVELUP\*|PAYPAL \*)");
regex!(TRAILING_COLUMNS_RE, r"\s\s+.+$");
regex!(MASKED_RE, r"\bX+-?X+");
regex!(PAYMENT_ID_RE, r"( ID:.*| PAYMENT ID:.*| PMT ID:.*)");
regex!(STORE_NUMBER_RE, r"[#]?[ ]?[0-9]+$");
regex!(SEPARATOR_RE, r"([ ]?-[ ]?|[_])");
regex!(DOT_COM_RE, r"(?i)[.]com.*$");
regex!(TRAILING_CHAR_RE, r" .$");

/// Removes the first match of `re`, returning the matched text.
fn take_first(re: &Regex, text: &mut String) -> Option<String> {
    let found = re.find(text)?.as_str().to_string();
    *text = re.replace(text, "").into_owned();
    Some(found)
}

fn strip_all(re: &Regex, text: &str) -> String {
    re.replace_all(text, "").trim().to_string()
}

/// Splits a raw bank description into its components.
#[must_use]
pub fn parse_description(raw: &str) -> ParsedDescription {
    let mut desc = raw.to_string();

    let time = take_first(&TIME_RE, &mut desc);
    let date = take_first(&DATE_RE, &mut desc);
    desc = BRANCH_RE.replace_all(&desc, "").into_owned();
    let phone = take_first(&PHONE_RE, &mut desc);

    desc = POS_RE.replace(desc.trim(), "").into_owned();

    let country = take_first(&COUNTRY_RE, &mut desc);
    if country.is_some() {
        desc = desc.trim().to_string();
    }
    let state = take_first(&STATE_RE, &mut desc);
    if state.is_some() {
        desc = desc.trim().to_string();
    }

    ParsedDescription {
        merchant: normalize_merchant(&desc),
        description: desc.trim().to_string(),
        time,
        date,
        phone,
        country,
        state,
    }
}

/// Reduces a cleaned description to a bare merchant name.
fn normalize_merchant(desc: &str) -> String {
    let mut merchant = THIRD_PARTY_RE.replace(&desc.to_uppercase(), "").into_owned();
    merchant = strip_all(&TRAILING_COLUMNS_RE, &merchant);
    merchant = strip_all(&MASKED_RE, &merchant);
    merchant = strip_all(&PAYMENT_ID_RE, &merchant);
    merchant = strip_all(&STORE_NUMBER_RE, &merchant);
    merchant = strip_all(&SEPARATOR_RE, &merchant);
    merchant = strip_all(&DOT_COM_RE, &merchant);
    merchant = strip_all(&TRAILING_CHAR_RE, &merchant);
    if merchant.is_empty() {
        merchant.push(' ');
    }
    merchant
}
