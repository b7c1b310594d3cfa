//! Admin-supplied lookup options and their validation.
//!
//! The host sends options as `{ "<key>": { "value": <any> } }`. Values are
//! untyped until [`validate_options`] has accepted them; after that,
//! [`LookupOptions::to_search_params`] yields typed query parameters.

use crate::error::IntegrationError;
use cse_search::SearchParams;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const API_KEY: &str = "apiKey";
const CX: &str = "cx";
const MAX_RESULTS: &str = "maxResults";

/// A single option as sent by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionValue {
    /// `None` when the host sent no value (or `null`).
    #[serde(default)]
    pub value: Option<Value>,
}

impl OptionValue {
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

/// The option bag for one lookup or validation call.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupOptions {
    #[serde(rename = "apiKey", default)]
    pub api_key: Option<OptionValue>,
    #[serde(default)]
    pub cx: Option<OptionValue>,
    #[serde(rename = "maxResults", default)]
    pub max_results: Option<OptionValue>,
    /// Any other options the host forwards; ignored.
    #[serde(flatten)]
    pub other: serde_json::Map<String, Value>,
}

impl std::fmt::Debug for LookupOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("cx", &self.cx)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

/// One rejected option, keyed by the option name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionViolation {
    pub key: String,
    pub message: String,
}

impl LookupOptions {
    /// Build an option bag from plain values.
    #[must_use]
    pub fn new(
        api_key: impl Into<Value>,
        cx: impl Into<Value>,
        max_results: impl Into<Value>,
    ) -> Self {
        Self {
            api_key: Some(OptionValue::new(api_key)),
            cx: Some(OptionValue::new(cx)),
            max_results: Some(OptionValue::new(max_results)),
            other: serde_json::Map::new(),
        }
    }

    /// Convert validated options into CSE query parameters.
    ///
    /// `maxResults` is coerced like the host does and truncated to a whole
    /// number, never below 1.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Config`] listing every violation if the
    /// options would not pass [`validate_options`].
    pub fn to_search_params(&self) -> Result<SearchParams, IntegrationError> {
        let violations = validate_options(self);
        if !violations.is_empty() {
            let keys: Vec<&str> = violations.iter().map(|v| v.key.as_str()).collect();
            return Err(IntegrationError::Config(format!(
                "invalid options: {}",
                keys.join(", ")
            )));
        }

        let max_results = value_of(self.max_results.as_ref())
            .map(coerce_number)
            .unwrap_or(f64::NAN);
        // Validated finite and > 0 above; the float-to-int cast saturates.
        let max_results = (max_results.trunc() as u32).max(1);

        Ok(SearchParams {
            api_key: string_of(self.api_key.as_ref()).unwrap_or_default().to_owned(),
            cx: string_of(self.cx.as_ref()).unwrap_or_default().to_owned(),
            max_results,
        })
    }
}

/// Check the options an administrator supplied.
///
/// Never fails; returns zero or more violations in check order
/// (`apiKey`, `cx`, `maxResults`).
#[must_use]
pub fn validate_options(options: &LookupOptions) -> Vec<OptionViolation> {
    let mut errors = Vec::new();

    validate_string_option(
        &mut errors,
        options.api_key.as_ref(),
        API_KEY,
        "You must provide a valid API Key.",
    );
    validate_string_option(
        &mut errors,
        options.cx.as_ref(),
        CX,
        "You must provide a Custom Search Engine ID.",
    );
    validate_numeric_option(
        &mut errors,
        options.max_results.as_ref(),
        MAX_RESULTS,
        "You must provide a Maximum Number of Results to return greater than 0",
    );

    tracing::trace!(violations = errors.len(), "validated options");
    errors
}

fn validate_string_option(
    errors: &mut Vec<OptionViolation>,
    option: Option<&OptionValue>,
    key: &str,
    message: &str,
) {
    if string_of(option).map_or(true, str::is_empty) {
        errors.push(OptionViolation {
            key: key.to_owned(),
            message: message.to_owned(),
        });
    }
}

fn validate_numeric_option(
    errors: &mut Vec<OptionViolation>,
    option: Option<&OptionValue>,
    key: &str,
    message: &str,
) {
    let valid = value_of(option).is_some_and(|value| {
        let number = coerce_number(value);
        number.is_finite() && number > 0.0
    });
    if !valid {
        errors.push(OptionViolation {
            key: key.to_owned(),
            message: message.to_owned(),
        });
    }
}

fn value_of(option: Option<&OptionValue>) -> Option<&Value> {
    option.and_then(|o| o.value.as_ref())
}

fn string_of(option: Option<&OptionValue>) -> Option<&str> {
    value_of(option).and_then(Value::as_str)
}

/// Numeric coercion following the host's rules.
///
/// Numbers are themselves; strings go through [`parse_number_string`];
/// booleans are 0 or 1; `null` is 0. Arrays and objects are NaN, which never
/// compares greater than 0.
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number_string(s),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Parse a string the way the host's numeric conversion does.
///
/// Surrounding whitespace is ignored and the empty string is 0. Accepts
/// unsigned `0x`/`0b`/`0o` integers, signed decimal literals with optional
/// fraction and exponent, and exactly `Infinity` with an optional sign.
/// Everything else, including `inf` and `NaN`, is NaN.
fn parse_number_string(raw: &str) -> f64 {
    let s = raw.trim();
    match s {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0b" | "0B") => Some(2),
        Some("0o" | "0O") => Some(8),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return f64::NAN;
        }
        return digits.chars().filter_map(|c| c.to_digit(radix)).fold(0.0, |acc, digit| {
            acc * f64::from(radix) + f64::from(digit)
        });
    }

    let decimal_chars = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !decimal_chars {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(violations: &[OptionViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.key.as_str()).collect()
    }

    #[test]
    fn valid_options_have_no_violations() {
        let options = LookupOptions::new("k", "c", 5);
        assert!(validate_options(&options).is_empty());
    }

    #[test]
    fn empty_api_key_is_the_only_violation() {
        let options = LookupOptions::new("", "abc", 5);
        let violations = validate_options(&options);
        assert_eq!(keys(&violations), vec!["apiKey"]);
        assert_eq!(violations[0].message, "You must provide a valid API Key.");
    }

    #[test]
    fn zero_max_results_is_the_only_violation() {
        let options = LookupOptions::new("k", "c", 0);
        let violations = validate_options(&options);
        assert_eq!(keys(&violations), vec!["maxResults"]);
        assert_eq!(
            violations[0].message,
            "You must provide a Maximum Number of Results to return greater than 0"
        );
    }

    #[test]
    fn violations_follow_check_order() {
        let options = LookupOptions::new("", "", -1);
        assert_eq!(
            keys(&validate_options(&options)),
            vec!["apiKey", "cx", "maxResults"]
        );
    }

    #[test]
    fn missing_options_are_violations() {
        let options = LookupOptions::default();
        assert_eq!(validate_options(&options).len(), 3);
    }

    #[test]
    fn non_string_key_is_a_violation() {
        let options = LookupOptions::new(12345, "c", 5);
        assert_eq!(keys(&validate_options(&options)), vec!["apiKey"]);
    }

    #[test]
    fn numeric_string_max_results_accepted() {
        let options = LookupOptions::new("k", "c", "7");
        assert!(validate_options(&options).is_empty());
        let params = options.to_search_params().expect("valid");
        assert_eq!(params.max_results, 7);
    }

    #[test]
    fn non_numeric_max_results_rejected() {
        for bad in [json!("lots"), json!(""), json!(null), json!([]), json!(false)] {
            let options = LookupOptions::new("k", "c", bad.clone());
            assert_eq!(keys(&validate_options(&options)), vec!["maxResults"], "value {bad}");
        }
    }

    #[test]
    fn prefixed_integer_strings_accepted() {
        for (raw, expected) in [("0x10", 16), ("0X1f", 31), ("0b101", 5), ("0o7", 7)] {
            let options = LookupOptions::new("k", "c", raw);
            assert!(validate_options(&options).is_empty(), "value {raw}");
            assert_eq!(options.to_search_params().expect("valid").max_results, expected);
        }
    }

    #[test]
    fn infinity_and_nan_spellings_rejected() {
        let spellings = [
            "inf", "infinity", "Infinity", "+Infinity", "NaN", "nan", "1e400", "-0x10", "0x",
        ];
        for bad in spellings {
            let options = LookupOptions::new("k", "c", bad);
            assert_eq!(keys(&validate_options(&options)), vec!["maxResults"], "value {bad}");
        }
    }

    #[test]
    fn number_string_parsing_matches_host() {
        assert_eq!(parse_number_string("  12 "), 12.0);
        assert_eq!(parse_number_string(""), 0.0);
        assert_eq!(parse_number_string(".5"), 0.5);
        assert_eq!(parse_number_string("2e1"), 20.0);
        assert_eq!(parse_number_string("0x10"), 16.0);
        assert_eq!(parse_number_string("Infinity"), f64::INFINITY);
        assert_eq!(parse_number_string("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_number_string("inf").is_nan());
        assert!(parse_number_string("NaN").is_nan());
        assert!(parse_number_string("12abc").is_nan());
    }

    #[test]
    fn deserializes_host_option_bag() {
        let options: LookupOptions = serde_json::from_value(json!({
            "apiKey": {"value": "AIza"},
            "cx": {"value": "engine"},
            "maxResults": {"value": 3},
            "_unused": {"value": true}
        }))
        .expect("deserialize");
        let params = options.to_search_params().expect("valid");
        assert_eq!(params.api_key, "AIza");
        assert_eq!(params.cx, "engine");
        assert_eq!(params.max_results, 3);
    }

    #[test]
    fn fractional_max_results_truncated_but_at_least_one() {
        let params = |value: f64| {
            LookupOptions::new("k", "c", value)
                .to_search_params()
                .expect("valid")
        };
        assert_eq!(params(4.9).max_results, 4);
        assert_eq!(params(0.5).max_results, 1);
    }

    #[test]
    fn invalid_options_do_not_convert() {
        let err = LookupOptions::new("k", "", 5).to_search_params().unwrap_err();
        assert!(err.to_string().contains("cx"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", LookupOptions::new("AIzaSecret", "c", 5));
        assert!(!rendered.contains("AIzaSecret"));
    }
}
