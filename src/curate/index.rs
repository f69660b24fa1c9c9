//! # Locators
//!
//! A UI refers to a record either by its identity or by where it sits on
//! screen. Both are needed: right after an add, the record only has a pending
//! identity, and a client that has not seen the new key yet can still point at
//! it by position.
//!
//! Textual forms, used by the CLI and by anything parsing user input:
//!
//! - `42`: persisted id
//! - `temp-<key>`: pending local key
//! - `@3`: third record (1-based) of the current scope
//! - `@2-@4`: range of positions, expanded to `@2 @3 @4`

use crate::error::{CurateError, Result};
use crate::model::{Identity, Scope};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    Key(Identity),
    /// 0-based position within `scope`.
    Position { scope: Scope, index: usize },
}

impl Locator {
    pub fn at(scope: Scope, index: usize) -> Self {
        Locator::Position { scope, index }
    }

    /// Re-targets a positional locator at `scope`; keys are unaffected.
    pub fn in_scope(self, scope: Scope) -> Self {
        match self {
            Locator::Position { index, .. } => Locator::Position { scope, index },
            key => key,
        }
    }
}

impl From<Identity> for Locator {
    fn from(id: Identity) -> Self {
        Locator::Key(id)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Key(id) => write!(f, "{}", id),
            Locator::Position { index, .. } => write!(f, "@{}", index + 1),
        }
    }
}

fn parse_position(s: &str) -> Option<Result<usize>> {
    let rest = s.strip_prefix('@')?;
    Some(match rest.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CurateError::InvalidLocator(s.to_string())),
    })
}

impl FromStr for Locator {
    type Err = CurateError;

    /// Positions parse into the root scope; use [`Locator::in_scope`] for nested lists.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(position) = parse_position(s) {
            return position.map(|index| Locator::at(Scope::Root, index));
        }
        s.parse::<Identity>().map(Locator::Key)
    }
}

/// Parses a locator or a positional range such as `@2-@4`.
///
/// Ranges are only supported for positions; both ends must be positions and
/// start must not exceed end.
pub fn parse_locator_or_range(s: &str) -> Result<Vec<Locator>> {
    let s = s.trim();
    if s.starts_with('@') {
        if let Some((start, end)) = s.split_once('-') {
            let start = parse_position(start)
                .ok_or_else(|| CurateError::InvalidLocator(s.to_string()))??;
            let end = parse_position(end)
                .ok_or_else(|| CurateError::InvalidLocator(s.to_string()))??;
            if start > end {
                return Err(CurateError::InvalidLocator(format!(
                    "{} (start must be <= end)",
                    s
                )));
            }
            return Ok((start..=end).map(|i| Locator::at(Scope::Root, i)).collect());
        }
    }
    Locator::from_str(s).map(|loc| vec![loc])
}
