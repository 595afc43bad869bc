//! Renaming and dropping deprecated keyword arguments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RemapError;
use crate::options::Kwargs;

/// Ordered table of deprecated keys and their replacements.
///
/// A `None` replacement means the key is discarded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenameTable {
    entries: Vec<(String, Option<String>)>,
}

impl RenameTable {
    pub fn new() -> Self { Self::default() }

    pub fn rename(self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.insert(old.into(), Some(new.into()))
    }

    pub fn discard(self, old: impl Into<String>) -> Self { self.insert(old.into(), None) }

    fn insert(mut self, old: String, new: Option<String>) -> Self {
        match self.entries.iter_mut().find(|(k, _)| *k == old) {
            Some(entry) => entry.1 = new,
            None => self.entries.push((old, new)),
        }
        self
    }

    /// `Some(None)` for a discarded key, `None` for a key not in the table.
    pub fn target(&self, old: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == old)
            .map(|(_, new)| new.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl<K, V> FromIterator<(K, Option<V>)> for RenameTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |table, (old, new)| {
            table.insert(old.into(), new.map(Into::into))
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Renamed,
    Dropped,
}

/// One change [`remap`] made to a keyword mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemapAction {
    pub old:  String,
    pub new:  Option<String>,
    pub kind: ActionKind,
}

impl RemapAction {
    /// Deprecation notice for a call to `fn_name`.
    pub fn message(&self, fn_name: &str) -> String {
        match &self.new {
            Some(new) => format!(
                "Deprecated keyword {} in {fn_name}() call - please use {new} instead.",
                self.old
            ),
            None => format!("Deprecated keyword {} in {fn_name}() call - ignoring.", self.old),
        }
    }
}

impl fmt::Display for RemapAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.new {
            Some(new) => write!(f, "{} -> {new}", self.old),
            None => write!(f, "{} dropped", self.old),
        }
    }
}

/// Apply `table` to a copy of `kwargs`.
///
/// Fails before touching anything when two present deprecated keys share a
/// replacement. Renamed values overwrite an existing value under the new key.
pub fn remap(kwargs: &Kwargs, table: &RenameTable) -> Result<(Kwargs, Vec<RemapAction>), RemapError> {
    check_conflicts(kwargs, table)?;

    let mut out = kwargs.clone();
    let mut actions = Vec::new();
    for key in kwargs.keys() {
        let Some(target) = table.target(key) else {
            continue;
        };
        let Some(value) = out.shift_remove(key) else {
            continue;
        };
        let kind = match target {
            Some(new) => {
                out.insert(new.to_owned(), value);
                ActionKind::Renamed
            }
            None => ActionKind::Dropped,
        };
        actions.push(RemapAction {
            old: key.clone(),
            new: target.map(str::to_owned),
            kind,
        });
    }
    Ok((out, actions))
}

fn check_conflicts(kwargs: &Kwargs, table: &RenameTable) -> Result<(), RemapError> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for (old, new) in table.iter() {
        let Some(new) = new else { continue };
        if !kwargs.contains_key(old) {
            continue;
        }
        match groups.iter_mut().find(|(target, _)| *target == new) {
            Some((_, olds)) => olds.push(old),
            None => groups.push((new, vec![old])),
        }
    }

    match groups.into_iter().find(|(_, olds)| olds.len() > 1) {
        Some((new_key, old_keys)) => Err(RemapError::Conflict {
            old_keys: old_keys.into_iter().map(str::to_owned).collect(),
            new_key:  new_key.to_owned(),
        }),
        None => Ok(()),
    }
}
