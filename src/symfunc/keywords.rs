/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::FailResult;

#[derive(Debug, Fail)]
pub enum KeywordError {
    #[fail(display = "compulsory keyword {} is missing", _0)]
    Missing(String),
    #[fail(display = "keyword {} was given more than once", _0)]
    Duplicate(String),
    #[fail(display = "could not parse {}={}: {}", key, value, message)]
    BadValue { key: String, value: String, message: String },
    #[fail(display = "malformed keyword '{}'", _0)]
    Malformed(String),
}

/// The words of an action line after its name, split into `KEY=VALUE`
/// pairs and bare flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords {
    values: BTreeMap<String, String>,
    flags: BTreeSet<String>,
}

impl Keywords {
    pub fn parse<S: AsRef<str>>(words: &[S]) -> FailResult<Keywords> {
        let mut out = Keywords::default();
        for word in words {
            let word = word.as_ref();
            let fresh = match split_keyword(word) {
                (key, _) if key.is_empty() => throw!(KeywordError::Malformed(word.to_string())),
                (key, Some(value)) => {
                    !out.flags.contains(key)
                        && out.values.insert(key.to_string(), value.to_string()).is_none()
                },
                (key, None) => !out.values.contains_key(key) && out.flags.insert(key.to_string()),
            };
            if !fresh {
                throw!(KeywordError::Duplicate(split_keyword(word).0.to_string()));
            }
        }
        Ok(out)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| &s[..])
    }

    pub fn flag(&self, key: &str) -> bool { self.flags.contains(key) }

    pub fn compulsory<T: FromStr>(&self, key: &str) -> FailResult<T>
    where T::Err: fmt::Display,
    {
        match self.optional(key)? {
            Some(value) => Ok(value),
            None => throw!(KeywordError::Missing(key.to_string())),
        }
    }

    pub fn optional<T: FromStr>(&self, key: &str) -> FailResult<Option<T>>
    where T::Err: fmt::Display,
    {
        let value = match self.get(key) {
            Some(value) => value,
            None => return Ok(None),
        };
        value.parse().map(Some).map_err(|e: T::Err| {
            KeywordError::BadValue {
                key: key.to_string(),
                value: value.to_string(),
                message: e.to_string(),
            }.into()
        })
    }
}

/// `"KEY=VALUE"` into `("KEY", Some("VALUE"))`, and `"FLAG"` into `("FLAG", None)`.
///
/// Only the first `=` separates; values may contain more of them.
pub fn split_keyword(word: &str) -> (&str, Option<&str>) {
    match word.find('=') {
        Some(pos) => (&word[..pos], Some(&word[pos + 1..])),
        None => (word, None),
    }
}
