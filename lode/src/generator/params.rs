//! Source parameter tokens: positional values followed by `key=value` options.
//!
//! ```text
//! dynamic 55.7522 37.6156 speed=20 radius=0.5
//!         ^^^^^^^ ^^^^^^^ ^^^^^^^^^^^^^^^^^^^
//!         positional      named
//! ```

use std::collections::HashMap;
use std::str::FromStr;

use super::GeneratorError;
use crate::position::Transition;

/// Parsed and validated parameters for one generator source.
#[derive(Debug, Clone, Default)]
pub struct SourceParams {
    positional: Vec<(&'static str, String)>,
    named: HashMap<String, String>,
}

impl SourceParams {
    /// Split `tokens` into the required positional values and `key=value` options.
    ///
    /// The first `positional.len()` tokens are taken verbatim; every remaining
    /// token must be `key=value` with a key listed in `allowed`.
    pub fn parse<S: AsRef<str>>(
        tokens: &[S],
        positional: &[&'static str],
        allowed: &[&str],
    ) -> Result<Self, GeneratorError> {
        if tokens.len() < positional.len() {
            return Err(GeneratorError::MissingParameter(positional[tokens.len()]));
        }

        let (head, tail) = tokens.split_at(positional.len());
        let positional = positional
            .iter()
            .zip(head)
            .map(|(name, token)| (*name, token.as_ref().to_string()))
            .collect();

        let mut named = HashMap::new();
        for token in tail {
            let token = token.as_ref();
            let Some((key, value)) = token.split_once('=') else {
                return Err(GeneratorError::UnknownParameter(token.to_string()));
            };
            let key = key.trim();
            if !allowed.contains(&key) {
                return Err(GeneratorError::UnknownParameter(key.to_string()));
            }
            named.insert(key.to_string(), value.trim().to_string());
        }

        Ok(Self { positional, named })
    }

    /// Positional value by name.
    pub fn required(&self, name: &'static str) -> Result<&str, GeneratorError> {
        self.positional
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value.as_str())
            .ok_or(GeneratorError::MissingParameter(name))
    }

    /// Positional value parsed as a number.
    pub fn required_f64(&self, name: &'static str) -> Result<f64, GeneratorError> {
        parse_value(name, self.required(name)?)
    }

    /// Named option as raw text, if present.
    pub fn named(&self, key: &str) -> Option<&str> {
        self.named.get(key).map(String::as_str)
    }

    /// Named option parsed as a number, falling back to `default`.
    pub fn named_f64(&self, key: &str, default: f64) -> Result<f64, GeneratorError> {
        match self.named(key) {
            Some(value) => parse_value(key, value),
            None => Ok(default),
        }
    }

    /// Named option parsed as a transition, falling back to `default`.
    pub fn named_transition(
        &self,
        key: &str,
        default: Transition,
    ) -> Result<Transition, GeneratorError> {
        match self.named(key) {
            Some(value) => parse_value(key, value),
            None => Ok(default),
        }
    }
}

fn parse_value<T>(name: &str, value: &str) -> Result<T, GeneratorError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| GeneratorError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}
