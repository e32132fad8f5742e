//! Declarative field validation.
//!
//! A [`Validator`] evaluates one [`Validation`] against one [`Value`] and
//! reports every failing check. Rule groups run in a fixed order: presence,
//! format, length, numericality. Nothing short-circuits except the numeric
//! comparisons, which only run once the value passed the numericality type
//! check.
//!
//! Two behaviours are kept deliberately for compatibility with existing
//! generated code:
//!
//! - the `minimum` length bound fails when the length *exceeds* it, and the
//!   `maximum` bound fails when the length is *below* it;
//! - comparisons and parity checks read the value as an integer, so floating
//!   point values compare as `0`.
//!
//! A length rule also re-runs both bounds as a range check, and a failing
//! `odd` check is reported together with the `even` message.

mod errors;
mod rules;

pub use errors::Errors;
pub use rules::*;

use regex::Regex;

use crate::value::Value;

fn render(template: &str, count: impl ToString, value: &Value) -> String {
    template
        .replace("{count}", &count.to_string())
        .replace("{value}", &value.to_string())
}

/// Evaluates a rule set. The format pattern is compiled once on construction.
#[derive(Debug, Clone)]
pub struct Validator {
    rule: Validation,
    pattern: Option<Regex>,
}

impl Validator {
    pub fn new(rule: Validation) -> Self {
        let pattern = rule
            .format
            .as_ref()
            .filter(|f| !f.with.is_empty())
            .and_then(|f| Regex::new(&f.with).ok());
        Self { rule, pattern }
    }

    pub fn rule(&self) -> &Validation {
        &self.rule
    }

    /// Returns whether `value` passed and every failure message, in check order.
    pub fn is_valid(&self, value: &Value) -> (bool, Vec<String>) {
        let mut messages = Vec::new();
        if let Some(presence) = &self.rule.presence {
            messages.extend(Self::check_presence(presence, value));
        }
        if let Some(format) = &self.rule.format {
            messages.extend(self.check_format(format, value));
        }
        if let Some(length) = &self.rule.length {
            messages.extend(Self::check_length(length, value));
        }
        if let Some(numericality) = &self.rule.numericality {
            messages.extend(Self::check_numericality(numericality, value));
        }
        (messages.is_empty(), messages)
    }

    fn check_presence(presence: &Presence, value: &Value) -> Option<String> {
        value.is_zero().then(|| render(&presence.message, "", value))
    }

    fn check_format(&self, format: &Format, value: &Value) -> Option<String> {
        if format.with.is_empty() {
            return None;
        }
        let matched = match (value.as_text(), &self.pattern) {
            (Some(text), Some(pattern)) => pattern.is_match(text),
            _ => false,
        };
        (!matched).then(|| render(&format.message, &format.with, value))
    }

    fn check_length(length: &Length, value: &Value) -> Vec<String> {
        let count = value.to_string().chars().count();
        let minimum = |b: &Bound| {
            (b.is_set() && count > b.number).then(|| render(&b.message, b.number, value))
        };
        let maximum = |b: &Bound| {
            (b.is_set() && count < b.number).then(|| render(&b.message, b.number, value))
        };

        let mut messages = Vec::new();
        messages.extend(minimum(&length.minimum));
        messages.extend(maximum(&length.maximum));
        if length.is.is_set() && count != length.is.number {
            messages.push(render(&length.is.message, length.is.number, value));
        }
        // Combined range check: repeats the first failing bound.
        if let Some(message) = minimum(&length.minimum).or_else(|| maximum(&length.maximum)) {
            messages.push(message);
        }
        messages
    }

    fn check_numericality(numericality: &Numericality, value: &Value) -> Vec<String> {
        let number = match value {
            Value::Int(i) => *i,
            Value::UInt(u) => i64::try_from(*u).unwrap_or(i64::MAX),
            Value::Float(_) if numericality.only_integer.enabled => {
                return vec![render(&numericality.only_integer.message, "", value)];
            }
            Value::Float(_) => 0,
            _ => return vec![render(&numericality.message, "", value)],
        };

        let comparisons: [(&Option<Threshold>, fn(i64, i64) -> bool); 5] = [
            (&numericality.greater_than, |n, t| n > t),
            (&numericality.greater_than_or_equal_to, |n, t| n >= t),
            (&numericality.equal_to, |n, t| n == t),
            (&numericality.less_than, |n, t| n < t),
            (&numericality.less_than_or_equal_to, |n, t| n <= t),
        ];
        let mut messages: Vec<String> = comparisons
            .into_iter()
            .filter_map(|(threshold, passes)| {
                let threshold = threshold.as_ref()?;
                (!passes(number, threshold.number))
                    .then(|| render(&threshold.message, threshold.number, value))
            })
            .collect();

        if numericality.odd.enabled && number % 2 == 0 {
            messages.push(render(&numericality.odd.message, "", value));
            messages.push(render(&numericality.even_message, "", value));
        }
        messages
    }
}

impl From<Validation> for Validator {
    fn from(rule: Validation) -> Self {
        Self::new(rule)
    }
}
