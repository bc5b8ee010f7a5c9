//! Ordered type-coercion rule chain
//!
//! Each raw field is matched against a fixed, documented sequence of
//! rules; the first matching rule produces the typed value. The order
//! is a first-class artifact ([`RULE_ORDER`]) so it can be asserted in
//! tests rather than living implicitly in an if/else ladder.
//!
//! A rule whose predicate matches but whose payload fails to parse
//! (e.g. a lone `"."`) is treated as a non-match and evaluation falls
//! through to the next rule.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use rowcast_formats::FieldValue;

/// One coercion rule, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Already-native values pass through untouched
    NativePassthrough,
    /// All-digit string becomes an integer; in the designated size
    /// column it becomes megabytes, rounded to 2 decimal places
    DigitsToInt,
    /// Digit string with at most one decimal point becomes a float
    DecimalToFloat,
    /// Quoted installs count like `"1,000,000+"` becomes an integer
    QuotedInstalls,
    /// Bare installs count like `500+` becomes an integer
    BareInstalls,
    /// `M`-suffixed size like `19M` keeps its leading float
    MegabyteSuffix,
    /// `k`-suffixed size like `4.3k` becomes the leading float / 1000
    KiloSuffix,
    /// Quoted `"Month DD, YYYY"` becomes a date; parse failure leaves
    /// the original quoted string
    QuotedDate,
    /// `$`-prefixed price becomes a float
    DollarPrefix,
    /// Everything else stays as the original string, quotes included
    TextPassthrough,
}

/// The fixed evaluation order of the coercion chain
pub const RULE_ORDER: &[Rule] = &[
    Rule::NativePassthrough,
    Rule::DigitsToInt,
    Rule::DecimalToFloat,
    Rule::QuotedInstalls,
    Rule::BareInstalls,
    Rule::MegabyteSuffix,
    Rule::KiloSuffix,
    Rule::QuotedDate,
    Rule::DollarPrefix,
    Rule::TextPassthrough,
];

static RE_FLOAT: OnceLock<Regex> = OnceLock::new();
static RE_MEGA: OnceLock<Regex> = OnceLock::new();
static RE_KILO: OnceLock<Regex> = OnceLock::new();
static RE_QUOTED_INSTALLS: OnceLock<Regex> = OnceLock::new();
static RE_BARE_INSTALLS: OnceLock<Regex> = OnceLock::new();

fn re_float() -> &'static Regex {
    RE_FLOAT.get_or_init(|| Regex::new(r"^[0-9.]+$").expect("float regex"))
}

fn re_mega() -> &'static Regex {
    RE_MEGA.get_or_init(|| Regex::new(r"^[0-9.]+M$").expect("mega regex"))
}

fn re_kilo() -> &'static Regex {
    RE_KILO.get_or_init(|| Regex::new(r"^[0-9.]+k$").expect("kilo regex"))
}

fn re_quoted_installs() -> &'static Regex {
    RE_QUOTED_INSTALLS
        .get_or_init(|| Regex::new(r#"^"[0-9][0-9,]*\+"$"#).expect("quoted installs regex"))
}

fn re_bare_installs() -> &'static Regex {
    // The whole field must be digits followed by one trailing `+`.
    // Prefixed variants fall through to later rules.
    RE_BARE_INSTALLS.get_or_init(|| Regex::new(r"^\d+\+$").expect("bare installs regex"))
}

/// Round to 2 decimal places
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Applies the coercion chain to raw field values
#[derive(Debug, Clone, Default)]
pub struct Coercer {
    /// Column index holding a byte size, converted to megabytes
    size_column: Option<usize>,
}

impl Coercer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A coercer that treats the given column as a byte-size field
    pub fn with_size_column(column: usize) -> Self {
        Self {
            size_column: Some(column),
        }
    }

    /// Coerce a value that may already be native (rule 1 short-circuit)
    pub fn coerce_value(&self, value: FieldValue, column: usize) -> FieldValue {
        match value {
            FieldValue::Text(raw) => self.coerce(&raw, column),
            native => native,
        }
    }

    /// Coerce a raw string field at the given column position
    pub fn coerce(&self, raw: &str, column: usize) -> FieldValue {
        for rule in RULE_ORDER {
            if let Some(value) = self.apply(*rule, raw, column) {
                return value;
            }
        }
        // RULE_ORDER ends in TextPassthrough, which always matches
        FieldValue::Text(raw.to_string())
    }

    fn apply(&self, rule: Rule, raw: &str, column: usize) -> Option<FieldValue> {
        match rule {
            // Native inputs never reach the string chain
            Rule::NativePassthrough => None,

            Rule::DigitsToInt => {
                if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                if self.size_column == Some(column) {
                    let bytes: f64 = raw.parse().ok()?;
                    Some(FieldValue::Float(round2(bytes / 1_000_000.0)))
                } else {
                    raw.parse::<i64>().ok().map(FieldValue::Int)
                }
            }

            Rule::DecimalToFloat => {
                if raw.is_empty() || !re_float().is_match(raw) {
                    return None;
                }
                if raw.matches('.').count() > 1 {
                    return None;
                }
                raw.parse::<f64>().ok().map(FieldValue::Float)
            }

            Rule::QuotedInstalls => {
                if !re_quoted_installs().is_match(raw) {
                    return None;
                }
                let inner: String = raw
                    .trim_matches('"')
                    .trim_end_matches('+')
                    .chars()
                    .filter(|c| *c != ',')
                    .collect();
                inner.parse::<i64>().ok().map(FieldValue::Int)
            }

            Rule::BareInstalls => {
                if !re_bare_installs().is_match(raw) {
                    return None;
                }
                raw.trim_end_matches('+').parse::<i64>().ok().map(FieldValue::Int)
            }

            Rule::MegabyteSuffix => {
                if !re_mega().is_match(raw) {
                    return None;
                }
                let lead = &raw[..raw.len() - 1];
                lead.parse::<f64>().ok().map(FieldValue::Float)
            }

            Rule::KiloSuffix => {
                if !re_kilo().is_match(raw) {
                    return None;
                }
                let lead = &raw[..raw.len() - 1];
                lead.parse::<f64>().ok().map(|f| FieldValue::Float(f / 1000.0))
            }

            Rule::QuotedDate => {
                if raw.len() < 2 || !raw.starts_with('"') || !raw.ends_with('"') {
                    return None;
                }
                let inner = &raw[1..raw.len() - 1];
                NaiveDate::parse_from_str(inner, "%B %d, %Y")
                    .ok()
                    .map(FieldValue::Date)
            }

            Rule::DollarPrefix => {
                let rest = raw.strip_prefix('$')?;
                rest.parse::<f64>().ok().map(FieldValue::Float)
            }

            Rule::TextPassthrough => Some(FieldValue::Text(raw.to_string())),
        }
    }
}
