//! Item combination: data-driven, symmetric crafting rules.
//!
//! Rules are data, not code. Each rule names an unordered pair of item kinds
//! and what they turn into. The resolver normalizes every pair before lookup,
//! so `lemon + water bucket` and `water bucket + lemon` always agree.

use std::collections::HashMap;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::geometry::Position;
use crate::items::{Item, ItemKind, ItemKind as K};

// ── Rules ────────────────────────────────────────────────────────────────────

/// What a reacting pair turns into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub result: ItemKind,
    /// Secondary product, e.g. the bucket left over after brewing lemonade.
    pub byproduct: Option<ItemKind>,
}

/// One edge of the combination graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub a: ItemKind,
    pub b: ItemKind,
    pub outcome: Outcome,
}

impl Rule {
    pub const fn new(a: ItemKind, b: ItemKind, result: ItemKind) -> Self {
        Self { a, b, outcome: Outcome { result, byproduct: None } }
    }

    pub const fn with_byproduct(mut self, byproduct: ItemKind) -> Self {
        self.outcome.byproduct = Some(byproduct);
        self
    }

    /// True if this rule takes `kind` as one of its reactants.
    pub fn uses(&self, kind: ItemKind) -> bool {
        self.a == kind || self.b == kind
    }

    /// True if this rule yields `kind`, as result or byproduct.
    pub fn produces(&self, kind: ItemKind) -> bool {
        self.outcome.result == kind || self.outcome.byproduct == Some(kind)
    }
}

/// The game's recipe book.
pub static RULES: [Rule; 9] = [
    // Lemonade
    Rule::new(K::Lemon, K::WaterBucket, K::LemonyWater),
    Rule::new(K::Lemon, K::SugaryWater, K::SugaryLemonWater),
    Rule::new(K::WaterBucket, K::Sugar, K::SugaryWater),
    Rule::new(K::LemonyWater, K::Sugar, K::SugaryLemonWater),
    Rule::new(K::SugaryLemonWater, K::Fire, K::Lemonade).with_byproduct(K::EmptyBucket),
    Rule::new(K::EmptyBucket, K::River, K::WaterBucket),
    // Laundry
    Rule::new(K::WaterBucket, K::Soap, K::SoapyWater),
    Rule::new(K::DirtyRobes, K::SoapyWater, K::WhiteLaundry),
    Rule::new(K::RedSock, K::WhiteLaundry, K::ColorRunLaundry),
];

/// Order-independent key for the rule table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct KindPair(ItemKind, ItemKind);

impl KindPair {
    fn new(a: ItemKind, b: ItemKind) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

// ── Combination ──────────────────────────────────────────────────────────────

/// Result of combining two items. Both fields are `None` when the items do
/// not react, which is the normal answer for unrelated items.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Combination {
    pub result: Option<Item>,
    pub byproduct: Option<Item>,
}

impl Combination {
    pub const NONE: Self = Self { result: None, byproduct: None };

    pub fn is_reaction(&self) -> bool {
        self.result.is_some()
    }
}

// ── Resolver ─────────────────────────────────────────────────────────────────

/// Looks up reactions in an immutable table of unordered kind pairs.
///
/// The resolver holds no state besides the table; every call is independent
/// and calling it twice with the same inputs gives the same answer.
#[derive(Clone, Debug)]
pub struct Resolver {
    table: HashMap<KindPair, Outcome>,
    /// One entry per distinct pair, in the order first seen.
    rules: Vec<Rule>,
}

impl Resolver {
    /// Resolver over the built-in [`RULES`].
    pub fn new() -> Self {
        // RULES lists each unordered pair once; `builtin_table_is_consistent`
        // keeps it that way, so building it cannot fail.
        Self::from_rules(&RULES).expect("built-in rule table has no conflicts")
    }

    /// Build a resolver from an arbitrary rule list.
    ///
    /// The same pair may appear more than once (in either order) only if every
    /// occurrence agrees on the outcome; otherwise `Error::ConflictingRule`.
    pub fn from_rules(rules: &[Rule]) -> Result<Self> {
        let mut table = HashMap::with_capacity(rules.len());
        let mut unique = Vec::with_capacity(rules.len());

        for rule in rules {
            let key = KindPair::new(rule.a, rule.b);
            match table.get(&key) {
                Some(existing) if *existing == rule.outcome => {
                    trace!("rule {} + {} listed twice", rule.a, rule.b);
                }
                Some(_) => return Err(Error::ConflictingRule { a: rule.a, b: rule.b }),
                None => {
                    table.insert(key, rule.outcome);
                    unique.push(*rule);
                }
            }
        }

        debug!("resolver built with {} rules", unique.len());
        Ok(Self { table, rules: unique })
    }

    /// Kind-level lookup, without positions.
    pub fn combine_kinds(&self, a: ItemKind, b: ItemKind) -> Option<Outcome> {
        self.table.get(&KindPair::new(a, b)).copied()
    }

    /// Combine two items. Products are placed at the first reactant's position.
    pub fn combine(&self, a: &Item, b: &Item) -> Combination {
        let Some(outcome) = self.combine_kinds(a.kind, b.kind) else {
            trace!("{} + {}: no reaction", a.kind, b.kind);
            return Combination::NONE;
        };

        debug!(
            "{} + {} -> {}{}",
            a.kind,
            b.kind,
            outcome.result,
            outcome.byproduct.map(|k| format!(" (+ {k})")).unwrap_or_default()
        );

        let at = a.position;
        Combination {
            result: Some(Item::new(outcome.result, at)),
            byproduct: outcome.byproduct.map(|k| Item::new(k, at)),
        }
    }

    pub fn can_combine(&self, a: &Item, b: &Item) -> bool {
        self.combine_kinds(a.kind, b.kind).is_some()
    }

    /// Combine two kinds given by name. Unknown names are rejected rather than
    /// treated as "no reaction".
    pub fn combine_named(&self, a: &str, b: &str, at: Position) -> Result<Combination> {
        let a = Item::new(a.parse()?, at);
        let b = Item::new(b.parse()?, at);
        Ok(self.combine(&a, &b))
    }

    /// Every rule, one per unordered pair.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules that yield `kind`.
    pub fn recipes_for(&self, kind: ItemKind) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter().filter(move |r| r.produces(kind))
    }

    /// Rules that consume or use `kind`.
    pub fn uses_of(&self, kind: ItemKind) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter().filter(move |r| r.uses(kind))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ItemKind::*;

    #[test]
    fn builtin_table_is_consistent() {
        let resolver = Resolver::from_rules(&RULES).unwrap();
        assert_eq!(resolver.rules().len(), RULES.len());
    }

    #[test]
    fn pair_key_ignores_order() {
        assert_eq!(KindPair::new(Lemon, Sugar), KindPair::new(Sugar, Lemon));
        assert_eq!(KindPair::new(Fire, Fire), KindPair(Fire, Fire));
    }

    #[test]
    fn reversed_duplicate_with_same_outcome_is_accepted() {
        let rules = [Rule::new(Lemon, WaterBucket, LemonyWater), Rule::new(WaterBucket, Lemon, LemonyWater)];
        let resolver = Resolver::from_rules(&rules).unwrap();
        assert_eq!(resolver.rules().len(), 1);
    }

    #[test]
    fn conflicting_duplicate_is_rejected() {
        let rules = [Rule::new(Lemon, WaterBucket, LemonyWater), Rule::new(WaterBucket, Lemon, Lemonade)];
        let err = Resolver::from_rules(&rules).unwrap_err();
        assert!(matches!(err, Error::ConflictingRule { a: WaterBucket, b: Lemon }));
    }

    #[test]
    fn byproduct_shares_reactant_position() {
        let resolver = Resolver::new();
        let a = Item::at(SugaryLemonWater, 40, 50);
        let c = resolver.combine(&a, &Item::at(Fire, 900, 900));
        assert_eq!(c.result, Some(Item::at(Lemonade, 40, 50)));
        assert_eq!(c.byproduct, Some(Item::at(EmptyBucket, 40, 50)));
    }

    #[test]
    fn recipes_for_includes_byproducts() {
        let resolver = Resolver::new();
        let buckets: Vec<_> = resolver.recipes_for(EmptyBucket).collect();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].outcome.result, Lemonade);
    }

    #[test]
    fn uses_of_water_bucket() {
        let resolver = Resolver::new();
        let mut partners: Vec<_> = resolver
            .uses_of(WaterBucket)
            .map(|r| if r.a == WaterBucket { r.b } else { r.a })
            .collect();
        partners.sort();
        assert_eq!(partners, vec![Lemon, Sugar, Soap]);
    }
}
