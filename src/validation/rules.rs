//! Primitive field rules
//!
//! A `Rule` is a pure predicate over one JSON value. On success it returns the
//! normalized value (integral floats become integers, everything else is
//! passed through unchanged). On failure it returns a `Violation` whose
//! message names the constraint that was broken.
//!
//! Only the first failing check of a primitive rule is reported.
//!
//! Rules are serde-tagged by `rule` so schemas can be declared in JSON:
//!
//! ```json
//! { "name": "name", "rule": "text", "min": 1, "max": 50, "required": true }
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use super::errors::FieldError;
use super::types::Schema;
use super::validator::validate_object;

/// local-part "@" labels, with at least one dot in the domain
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?$";

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    // The pattern is a literal; failing to compile it is a programming error.
    EMAIL_REGEX.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Password strength requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_lowercase: true,
            require_uppercase: true,
            require_digit: true,
        }
    }
}

impl PasswordPolicy {
    /// Validate a password against this policy
    pub fn check(&self, password: &str) -> Result<(), String> {
        check_password(password, self)
    }
}

/// Why a value failed its rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A primitive check failed; the message names the constraint
    Invalid(String),
    /// A nested object failed; paths are relative to the field
    Nested(Vec<FieldError>),
}

impl Violation {
    fn invalid(message: impl Into<String>) -> Self {
        Violation::Invalid(message.into())
    }
}

fn default_min() -> usize {
    1
}

/// A field rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Non-empty string in `local@domain.tld` form
    Email,
    /// String meeting a `PasswordPolicy`
    Password(PasswordPolicy),
    /// String whose character count lies in `min..=max`
    Text {
        #[serde(default = "default_min")]
        min: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
    /// Integer greater than zero, optionally capped
    PositiveInt {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// Finite number greater than zero
    PositiveNumber,
    /// Absolute URL
    Url,
    /// String equal to one of `values`
    OneOf { values: Vec<String> },
    /// Array of strings
    StringList,
    /// Any JSON object; values pass through unvalidated
    Record,
    /// Nested object validated by its own schema
    Object { schema: Schema },
}

impl Rule {
    pub fn email() -> Self {
        Rule::Email
    }

    pub fn password() -> Self {
        Rule::Password(PasswordPolicy::default())
    }

    pub fn text(min: usize, max: usize) -> Self {
        Rule::Text {
            min,
            max: Some(max),
        }
    }

    /// Presence check only: at least one character, no upper bound.
    pub fn non_empty() -> Self {
        Rule::Text { min: 1, max: None }
    }

    pub fn min_length(min: usize) -> Self {
        Rule::Text { min, max: None }
    }

    pub fn positive_int() -> Self {
        Rule::PositiveInt { max: None }
    }

    pub fn positive_int_max(max: i64) -> Self {
        Rule::PositiveInt { max: Some(max) }
    }

    pub fn positive_number() -> Self {
        Rule::PositiveNumber
    }

    pub fn url() -> Self {
        Rule::Url
    }

    pub fn one_of(values: &[&str]) -> Self {
        Rule::OneOf {
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn string_list() -> Self {
        Rule::StringList
    }

    pub fn record() -> Self {
        Rule::Record
    }

    pub fn object(schema: Schema) -> Self {
        Rule::Object { schema }
    }

    /// Returns the rule name used in schema listings
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Email => "email",
            Rule::Password(_) => "password",
            Rule::Text { .. } => "text",
            Rule::PositiveInt { .. } => "positive_int",
            Rule::PositiveNumber => "positive_number",
            Rule::Url => "url",
            Rule::OneOf { .. } => "one_of",
            Rule::StringList => "string_list",
            Rule::Record => "record",
            Rule::Object { .. } => "object",
        }
    }

    /// Checks that the rule's own parameters are consistent.
    ///
    /// Called once at schema construction.
    pub fn check_params(&self) -> Result<(), String> {
        match self {
            Rule::Text { min, max: Some(max) } if max < min => {
                Err(format!("max {} is less than min {}", max, min))
            }
            Rule::PositiveInt { max: Some(max) } if *max < 1 => {
                Err(format!("max {} admits no positive integer", max))
            }
            Rule::OneOf { values } if values.is_empty() => {
                Err("one_of requires at least one value".into())
            }
            _ => Ok(()),
        }
    }

    /// Runs the rule against `value`, returning the normalized value.
    pub fn check(&self, value: &Value) -> Result<Value, Violation> {
        match self {
            Rule::Email => {
                let s = expect_str(value)?;
                check_email(s).map_err(Violation::Invalid)?;
                Ok(value.clone())
            }
            Rule::Password(policy) => {
                let s = expect_str(value)?;
                check_password(s, policy).map_err(Violation::Invalid)?;
                Ok(value.clone())
            }
            Rule::Text { min, max } => {
                let s = expect_str(value)?;
                check_length(s, *min, *max).map_err(Violation::Invalid)?;
                Ok(value.clone())
            }
            Rule::PositiveInt { max } => {
                let n = check_positive_int(value, *max).map_err(Violation::Invalid)?;
                Ok(Value::from(n))
            }
            Rule::PositiveNumber => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| type_mismatch("number", value))?;
                if !n.is_finite() || n <= 0.0 {
                    return Err(Violation::invalid("must be positive"));
                }
                Ok(value.clone())
            }
            Rule::Url => {
                let s = expect_str(value)?;
                url::Url::parse(s).map_err(|_| Violation::invalid("must be a valid URL"))?;
                Ok(value.clone())
            }
            Rule::OneOf { values } => {
                let s = expect_str(value)?;
                if !values.iter().any(|v| v == s) {
                    return Err(Violation::invalid(format!(
                        "must be one of: {}",
                        values.join(", ")
                    )));
                }
                Ok(value.clone())
            }
            Rule::StringList => {
                let items = value
                    .as_array()
                    .ok_or_else(|| type_mismatch("array", value))?;
                if let Some(i) = items.iter().position(|item| !item.is_string()) {
                    return Err(Violation::invalid(format!(
                        "item {} must be a string",
                        i
                    )));
                }
                Ok(value.clone())
            }
            Rule::Record => {
                if !value.is_object() {
                    return Err(type_mismatch("object", value));
                }
                Ok(value.clone())
            }
            Rule::Object { schema } => {
                let obj = value
                    .as_object()
                    .ok_or_else(|| type_mismatch("object", value))?;
                validate_object(schema, obj)
                    .map(Value::Object)
                    .map_err(Violation::Nested)
            }
        }
    }
}

/// Fails on empty strings and anything outside `local@domain.tld`.
pub fn check_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("must not be empty".into());
    }
    if !email_regex().is_match(email) {
        return Err("must be a valid email address".into());
    }
    Ok(())
}

/// Validate password against policy. Lengths count characters.
pub fn check_password(password: &str, policy: &PasswordPolicy) -> Result<(), String> {
    if password.chars().count() < policy.min_length {
        return Err(format!(
            "must be at least {} characters",
            policy.min_length
        ));
    }

    if policy.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("must contain at least one lowercase letter".into());
    }

    if policy.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("must contain at least one uppercase letter".into());
    }

    if policy.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("must contain at least one digit".into());
    }

    Ok(())
}

/// Bounded character count.
pub fn check_length(s: &str, min: usize, max: Option<usize>) -> Result<(), String> {
    let len = s.chars().count();
    if len < min {
        return Err(if min == 1 {
            "must not be empty".into()
        } else {
            format!("must be at least {} characters", min)
        });
    }
    if let Some(max) = max {
        if len > max {
            return Err(format!("must be at most {} characters", max));
        }
    }
    Ok(())
}

/// Integer > 0 and, if given, <= `max`. Integral floats are accepted.
pub fn check_positive_int(value: &Value, max: Option<i64>) -> Result<i64, String> {
    let n = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if n.is_u64() {
                return Err("is out of range".into());
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
                    _ => return Err("must be an integer".into()),
                }
            }
        }
        other => return Err(format!("expected integer, got {}", json_type_name(other))),
    };

    if n <= 0 {
        return Err("must be positive".into());
    }
    if let Some(max) = max {
        if n > max {
            return Err(format!("must be at most {}", max));
        }
    }
    Ok(n)
}

fn expect_str(value: &Value) -> Result<&str, Violation> {
    value.as_str().ok_or_else(|| type_mismatch("string", value))
}

fn type_mismatch(expected: &str, actual: &Value) -> Violation {
    Violation::Invalid(format!(
        "expected {}, got {}",
        expected,
        json_type_name(actual)
    ))
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(result: Result<Value, Violation>) -> String {
        match result {
            Err(Violation::Invalid(msg)) => msg,
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_email_rule() {
        assert!(Rule::email().check(&json!("test@example.com")).is_ok());
        assert!(Rule::email().check(&json!("first.last+tag@mail.example.co.jp")).is_ok());
        assert!(Rule::email().check(&json!("invalid-email")).is_err());
        assert!(Rule::email().check(&json!("user@localhost")).is_err());
        assert!(Rule::email().check(&json!("a@b.")).is_err());
        assert!(Rule::email().check(&json!("two@@example.com")).is_err());
        assert_eq!(message(Rule::email().check(&json!(""))), "must not be empty");
    }

    #[test]
    fn test_password_rule() {
        let rule = Rule::password();
        assert!(rule.check(&json!("Password123")).is_ok());
        assert!(message(rule.check(&json!("password123"))).contains("uppercase"));
        assert!(message(rule.check(&json!("PASSWORD123"))).contains("lowercase"));
        assert!(message(rule.check(&json!("Password"))).contains("digit"));
        assert!(message(rule.check(&json!("Pass1"))).contains("at least 8"));
    }

    #[test]
    fn test_password_length_counts_characters() {
        // 7 characters, more than 8 bytes
        assert!(check_password("Pässwö1", &PasswordPolicy::default()).is_err());
        assert!(check_password("Pässwör1", &PasswordPolicy::default()).is_ok());
    }

    #[test]
    fn test_relaxed_policy() {
        let policy = PasswordPolicy {
            min_length: 4,
            require_uppercase: false,
            ..Default::default()
        };
        assert!(policy.check("abc1").is_ok());
        assert!(policy.check("abcd").is_err());
    }

    #[test]
    fn test_text_bounds() {
        let rule = Rule::text(1, 50);
        assert!(rule.check(&json!("John Doe")).is_ok());
        assert_eq!(message(rule.check(&json!(""))), "must not be empty");
        assert!(message(rule.check(&json!("a".repeat(51)))).contains("at most 50"));
        assert!(rule.check(&json!("é".repeat(50))).is_ok());
        assert!(message(Rule::min_length(32).check(&json!("short"))).contains("at least 32"));
    }

    #[test]
    fn test_text_rejects_non_strings() {
        assert_eq!(
            message(Rule::text(1, 50).check(&json!(42))),
            "expected string, got integer"
        );
        assert_eq!(
            message(Rule::email().check(&Value::Null)),
            "expected string, got null"
        );
    }

    #[test]
    fn test_positive_int() {
        let rule = Rule::positive_int_max(100);
        assert_eq!(rule.check(&json!(10)).unwrap(), json!(10));
        assert_eq!(rule.check(&json!(2.0)).unwrap(), json!(2));
        assert_eq!(message(rule.check(&json!(0))), "must be positive");
        assert_eq!(message(rule.check(&json!(-1))), "must be positive");
        assert_eq!(message(rule.check(&json!(101))), "must be at most 100");
        assert_eq!(message(rule.check(&json!(1.5))), "must be an integer");
        assert_eq!(message(rule.check(&json!("5"))), "expected integer, got string");
        assert!(Rule::positive_int().check(&json!(1_000_000)).is_ok());
    }

    #[test]
    fn test_positive_number() {
        assert!(Rule::positive_number().check(&json!(0.5)).is_ok());
        assert!(Rule::positive_number().check(&json!(5242880)).is_ok());
        assert!(Rule::positive_number().check(&json!(0)).is_err());
        assert!(Rule::positive_number().check(&json!("1")).is_err());
    }

    #[test]
    fn test_url_and_one_of() {
        assert!(Rule::url().check(&json!("postgres://localhost:5432/app")).is_ok());
        assert!(Rule::url().check(&json!("not a url")).is_err());
        let rule = Rule::one_of(&["development", "production", "test"]);
        assert!(rule.check(&json!("test")).is_ok());
        assert!(message(rule.check(&json!("staging"))).contains("development, production, test"));
    }

    #[test]
    fn test_string_list_and_record() {
        assert!(Rule::string_list().check(&json!(["image/png"])).is_ok());
        assert!(Rule::string_list().check(&json!([])).is_ok());
        assert_eq!(
            message(Rule::string_list().check(&json!(["a", 1]))),
            "item 1 must be a string"
        );
        let filters = json!({"category": "test", "nested": {"any": [1, null]}});
        assert_eq!(Rule::record().check(&filters).unwrap(), filters);
        assert!(Rule::record().check(&json!("x")).is_err());
    }

    #[test]
    fn test_check_params() {
        assert!(Rule::text(1, 50).check_params().is_ok());
        assert!(Rule::Text { min: 10, max: Some(5) }.check_params().is_err());
        assert!(Rule::positive_int_max(0).check_params().is_err());
        assert!(Rule::OneOf { values: vec![] }.check_params().is_err());
    }

    #[test]
    fn test_rule_serde_tagging() {
        let rule: Rule = serde_json::from_value(json!({"rule": "text", "max": 100})).unwrap();
        assert_eq!(rule, Rule::text(1, 100));

        let rule: Rule = serde_json::from_value(json!({"rule": "password"})).unwrap();
        assert_eq!(rule, Rule::password());

        let json = serde_json::to_value(Rule::positive_int_max(100)).unwrap();
        assert_eq!(json, json!({"rule": "positive_int", "max": 100}));
    }
}
