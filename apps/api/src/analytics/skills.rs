//! Skill normalization and skill-set matching.
//!
//! Raw skill strings are split on runs of `;`, `,`, `|` or `/`, trimmed and
//! lowercased. A `SkillSet` keeps first-seen order so that `matched` and
//! `missing` lists come out in a deterministic order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const SKILL_DELIMITERS: &[char] = &[';', ',', '|', '/'];

/// Deduplicated, normalized skill tokens in first-seen order.
///
/// Equality is set equality: `{"sql", "python"} == {"python", "sql"}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SkillSet {
    tokens: Vec<String>,
}

impl SkillSet {
    /// Builds a set from already-split tokens, normalizing each one.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = SkillSet::default();
        for token in tokens {
            set.insert(token.as_ref());
        }
        set
    }

    fn insert(&mut self, raw: &str) {
        let token = raw.trim().to_lowercase();
        if !token.is_empty() && !self.contains(&token) {
            self.tokens.push(token);
        }
    }

    /// Exact membership test against a normalized token.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl PartialEq for SkillSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl Eq for SkillSet {}

/// Splits a raw, delimiter-separated skill string into a `SkillSet`.
pub fn normalize(raw: &str) -> SkillSet {
    SkillSet::from_tokens(raw.split(SKILL_DELIMITERS))
}

/// Result of matching a user's skills against required skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillFit {
    /// 0 – 100. `None` when there were no required skills to match against.
    pub score: Option<u32>,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// `round(100 × matched / required)`, or `None` when nothing is required.
///
/// Shared by local matching and by fits re-derived from a remote analysis payload.
pub fn fit_score(matched: usize, required: usize) -> Option<u32> {
    if required == 0 {
        return None;
    }
    Some((100.0 * matched as f64 / required as f64).round() as u32)
}

/// Set-membership fit of `user` against `required`. No partial credit.
pub fn match_fit(required: &SkillSet, user: &SkillSet) -> SkillFit {
    let (matched, missing): (Vec<&str>, Vec<&str>) =
        required.iter().partition(|skill| user.contains(skill));

    SkillFit {
        score: fit_score(matched.len(), required.len()),
        matched: matched.into_iter().map(str::to_string).collect(),
        missing: missing.into_iter().map(str::to_string).collect(),
    }
}

/// Ranks skills by how many skill sets mention them and keeps the top `n`.
///
/// Ties keep first-encountered order.
pub fn top_skills<'a, I>(skill_sets: I, n: usize) -> SkillSet
where
    I: IntoIterator<Item = &'a SkillSet>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for set in skill_sets {
        for skill in set.iter() {
            let count = counts.entry(skill).or_insert(0);
            if *count == 0 {
                order.push(skill);
            }
            *count += 1;
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(n);
    SkillSet::from_tokens(order)
}
