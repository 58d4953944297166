//! Candidate selection: which team members may review a pull request, and
//! the random draw among them.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::contract::model::User;

/// Who must not be picked: the author and everyone already reviewing.
#[derive(Debug, Clone, Copy)]
pub struct Exclusion<'a> {
    pub author_id: &'a str,
    pub assigned: &'a [String],
}

impl<'a> Exclusion<'a> {
    pub fn author_only(author_id: &'a str) -> Self {
        Self {
            author_id,
            assigned: &[],
        }
    }

    fn excludes(&self, user_id: &str) -> bool {
        user_id == self.author_id || self.assigned.iter().any(|a| a == user_id)
    }
}

/// Active roster members that are neither the author nor already assigned,
/// in roster order. Never fails; an empty roster yields an empty set.
pub fn eligible<'r>(roster: &'r [User], exclusion: Exclusion<'_>) -> Vec<&'r User> {
    let mut out: Vec<&User> = Vec::with_capacity(roster.len());
    for user in roster {
        if !user.is_active || exclusion.excludes(&user.id) {
            continue;
        }
        // a roster with repeated rows must not yield the same user twice
        if out.iter().any(|u| u.id == user.id) {
            continue;
        }
        out.push(user);
    }
    out
}

/// Uniform draw of up to `count` distinct candidates, without replacement.
pub fn pick<R: Rng + ?Sized>(candidates: &[&User], count: usize, rng: &mut R) -> Vec<String> {
    candidates
        .choose_multiple(rng, count)
        .map(|u| u.id.clone())
        .collect()
}

/// Uniform draw of exactly one candidate; `None` for an empty set.
pub fn pick_one<R: Rng + ?Sized>(candidates: &[&User], rng: &mut R) -> Option<String> {
    candidates.choose(rng).map(|u| u.id.clone())
}
