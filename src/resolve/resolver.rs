use std::collections::BTreeSet;

use log::trace;
use serde::Serialize;

use crate::types::{JurisdictionType, ScoreIndex};
use super::{index::{build_index, NameIndex}, normalize::{normalize, squash}};

/// Outcome of resolving one boundary name against the score keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "keys", rename_all = "snake_case")]
pub enum ResolvedMatch {
    #[default]
    Unresolved,
    Single(String),
    Many(Vec<String>),
}

impl ResolvedMatch {
    /// Canonical keys in match order.
    pub fn keys(&self) -> &[String] {
        match self {
            ResolvedMatch::Unresolved => &[],
            ResolvedMatch::Single(key) => std::slice::from_ref(key),
            ResolvedMatch::Many(keys) => keys,
        }
    }

    #[inline] pub fn is_resolved(&self) -> bool { !self.keys().is_empty() }
}

/// Matches boundary names to score keys despite naming drift between datasets.
/// Holds only the static key tables; every lookup is a pure function of its input.
#[derive(Debug, Clone)]
pub struct NameResolver {
    keys: Vec<String>,     // In key order
    lowered: Vec<String>,  // keys[i].to_lowercase()
    key_set: BTreeSet<String>,
    index: NameIndex,
}

impl NameResolver {
    pub fn new<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keys: Vec<String> = keys.into_iter().map(str::to_string).collect();
        let lowered = keys.iter().map(|k| k.to_lowercase()).collect();
        let key_set = keys.iter().cloned().collect();
        let index = build_index(keys.iter().map(String::as_str));
        Self { keys, lowered, key_set, index }
    }

    pub fn from_scores(scores: &ScoreIndex) -> Self {
        Self::new(scores.keys())
    }

    #[inline] pub fn keys(&self) -> &[String] { &self.keys }

    #[inline] pub fn index(&self) -> &NameIndex { &self.index }

    /// Resolve a 1:1 boundary name to a single key, trying progressively looser matches.
    pub fn resolve_one(&self, name: &str) -> Option<&str> {
        if let Some(key) = self.key_set.get(name) {
            trace!("[resolve_one] '{name}' matched exactly");
            return Some(key.as_str())
        }

        let normalized = normalize(name);
        if let Some(key) = self.key_set.get(normalized.as_str()) {
            trace!("[resolve_one] '{name}' matched as normalized '{normalized}'");
            return Some(key.as_str())
        }

        let lowered = normalized.to_lowercase();
        if let Some(key) = self.index.get(&lowered) {
            trace!("[resolve_one] '{name}' matched via case-insensitive index");
            return Some(key)
        }

        if let Some(key) = self.index.get(&squash(&lowered)) {
            trace!("[resolve_one] '{name}' matched via space-insensitive index");
            return Some(key)
        }

        if lowered.is_empty() { return None }
        let found = self.keys.iter().zip(&self.lowered)
            .find(|(_, key)| key.starts_with(&lowered) || lowered.starts_with(key.as_str()))
            .map(|(key, _)| key.as_str());
        if found.is_some() { trace!("[resolve_one] '{name}' matched by prefix") }
        found
    }

    /// Resolve a jurisdiction spanning several precincts to every key it covers.
    pub fn resolve_many(&self, name: &str, ty: &JurisdictionType) -> Vec<&str> {
        let bare = normalize(name).to_lowercase();
        if bare.is_empty() { return Vec::new() }

        // (variant, jurisdiction kind the variant spells out)
        let variants = [
            (bare.clone(), None),
            (format!("{bare} township"), Some(JurisdictionType::Township)),
            (format!("{bare} charter township"), Some(JurisdictionType::Township)),
            (format!("city of {bare}"), Some(JurisdictionType::City)),
            (format!("{bare} city"), Some(JurisdictionType::City)),
        ];

        // Per matched key: whether some variant spells out the boundary's own kind.
        let hits: Vec<(&str, bool)> = self.keys.iter().zip(&self.lowered)
            .filter_map(|(key, lowered)| {
                let mut hit: Option<bool> = None;
                for (variant, kind) in &variants {
                    let Some(rest) = strip_variant(lowered, variant) else { continue };
                    match kind {
                        Some(kind) if !opposes(ty, kind) => hit = Some(hit.unwrap_or(false) || kind == ty),
                        None if !conflicts_with(rest, ty) => hit = Some(hit.unwrap_or(false)),
                        _ => {}
                    }
                }
                hit.map(|spelled| (key.as_str(), spelled))
            })
            .collect();

        // Once a township's precincts carry "Township", bare-name keys belong to
        // the city of the same name.
        let spelled_out = *ty == JurisdictionType::Township && hits.iter().any(|&(_, spelled)| spelled);
        let strict: Vec<&str> = hits.into_iter()
            .filter(|&(_, spelled)| spelled || !spelled_out)
            .map(|(key, _)| key)
            .collect();
        if !strict.is_empty() {
            trace!("[resolve_many] '{name}' matched {} keys", strict.len());
            return strict
        }

        let loose: Vec<&str> = self.keys.iter().zip(&self.lowered)
            .filter(|(_, key)| key.match_indices(bare.as_str()).any(|(at, _)| {
                !claimed_by_other(&key[..at], &key[at + bare.len()..], ty)
            }))
            .map(|(key, _)| key.as_str())
            .collect();
        if !loose.is_empty() {
            trace!("[resolve_many] '{name}' matched {} keys by substring", loose.len());
        }
        loose
    }

    /// Resolve a boundary according to its jurisdiction type.
    pub fn resolve(&self, name: &str, ty: &JurisdictionType) -> ResolvedMatch {
        if ty.is_aggregate() {
            let keys = self.resolve_many(name, ty);
            if keys.is_empty() {
                ResolvedMatch::Unresolved
            } else {
                ResolvedMatch::Many(keys.into_iter().map(str::to_string).collect())
            }
        } else {
            self.resolve_one(name)
                .map_or(ResolvedMatch::Unresolved, |key| ResolvedMatch::Single(key.to_string()))
        }
    }
}

/// If `key` equals `variant` or continues it with a space or comma, return the remainder.
fn strip_variant<'a>(key: &'a str, variant: &str) -> Option<&'a str> {
    let rest = key.strip_prefix(variant)?;
    if rest.is_empty() || rest.starts_with([' ', ',']) { Some(rest) } else { None }
}

/// Cities and townships never claim each other's precincts.
fn opposes(ty: &JurisdictionType, kind: &JurisdictionType) -> bool {
    matches!(
        (ty, kind),
        (JurisdictionType::City, JurisdictionType::Township) | (JurisdictionType::Township, JurisdictionType::City)
    )
}

/// True when a bare-name match continues into another jurisdiction kind's
/// boilerplate, e.g. a city named Lansing against "lansing township precinct 1".
fn conflicts_with(rest: &str, ty: &JurisdictionType) -> bool {
    let rest = rest.trim_start_matches([' ', ',']);
    match ty {
        JurisdictionType::City => rest.starts_with("township") || rest.starts_with("charter township"),
        JurisdictionType::Township => rest.starts_with("city"),
        _ => false,
    }
}

/// Substring hit whose surrounding text names the opposing jurisdiction,
/// e.g. "city of lansing precinct 1" seen from Lansing Township.
fn claimed_by_other(before: &str, rest: &str, ty: &JurisdictionType) -> bool {
    let before = before.trim_end_matches([' ', ',']);
    match ty {
        JurisdictionType::Township => conflicts_with(rest, ty) || before.ends_with("city of"),
        _ => conflicts_with(rest, ty),
    }
}
