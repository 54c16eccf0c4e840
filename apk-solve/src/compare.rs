//! Candidate ordering and selection.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    sync::Arc,
};

use apk_types::Package;

use crate::{resolver::Resolver, types::PinnedPackage};

/// The reference context against which candidates are ranked.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CompareContext<'a> {
    /// Rank candidates sharing this package's repository (and origin) first.
    pub(crate) compare: Option<&'a Package>,
    /// The name being resolved; effective versions are computed against it.
    pub(crate) name: &'a str,
    /// Packages already selected, by name.
    pub(crate) existing: &'a HashMap<String, Arc<Package>>,
    /// Origins of packages already selected.
    pub(crate) existing_origins: &'a HashSet<String>,
    /// The pin label preferred for this resolution step.
    pub(crate) pin: &'a str,
}

impl Resolver {
    /// Core logic behind choosing the right candidate from a set.
    ///
    /// Implements a total order in which the *smallest* element is the best
    /// candidate:
    ///
    /// 1. candidates in the reference package's repository, ties broken by
    ///    identical origin,
    /// 2. candidates matching the version of an already-selected package of
    ///    the same name,
    /// 3. candidates whose origin is already part of the install set,
    /// 4. candidates carrying the preferred pin,
    /// 5. higher provider priority,
    /// 6. higher effective version for the queried name, then higher
    ///    package version (parse failures rank last),
    /// 7. name ascending, so the order is deterministic regardless of
    ///    iteration order.
    pub(crate) fn compare_candidates(
        &self,
        context: &CompareContext,
        a: &PinnedPackage,
        b: &PinnedPackage,
    ) -> Ordering {
        if let Some(reference) = context.compare {
            let same_repository =
                |candidate: &PinnedPackage| candidate.package.repository == reference.repository;
            let ordering = same_repository(b).cmp(&same_repository(a));
            if ordering.is_ne() {
                return ordering;
            }
            let same_origin =
                |candidate: &PinnedPackage| candidate.package.origin == reference.origin;
            let ordering = same_origin(b).cmp(&same_origin(a));
            if ordering.is_ne() {
                return ordering;
            }
        }

        let selected = |candidate: &PinnedPackage| {
            context
                .existing
                .get(&candidate.package.name)
                .is_some_and(|existing| existing.version == candidate.package.version)
        };
        let ordering = selected(b).cmp(&selected(a));
        if ordering.is_ne() {
            return ordering;
        }

        let known_origin = |candidate: &PinnedPackage| {
            context.existing_origins.contains(&candidate.package.origin)
        };
        let ordering = known_origin(b).cmp(&known_origin(a));
        if ordering.is_ne() {
            return ordering;
        }

        let pinned = |candidate: &PinnedPackage| candidate.pin == context.pin;
        let ordering = pinned(b).cmp(&pinned(a));
        if ordering.is_ne() {
            return ordering;
        }

        let ordering = b
            .package
            .provider_priority
            .cmp(&a.package.provider_priority);
        if ordering.is_ne() {
            return ordering;
        }

        let ordering = self.compare_versions_descending(
            &self.effective_version(&a.package, context.name),
            &self.effective_version(&b.package, context.name),
        );
        if ordering.is_ne() {
            return ordering;
        }
        let ordering = self.compare_versions_descending(&a.package.version, &b.package.version);
        if ordering.is_ne() {
            return ordering;
        }

        a.package.name.cmp(&b.package.name)
    }

    /// Compares two raw versions descending (the higher version orders
    /// first); versions that fail to parse order last.
    fn compare_versions_descending(&self, a: &str, b: &str) -> Ordering {
        match (self.parse_version(a), self.parse_version(b)) {
            (Ok(a), Ok(b)) => b.cmp(&a),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => Ordering::Equal,
        }
    }

    /// Sorts `candidates` best first.
    pub(crate) fn sort_candidates(
        &self,
        context: &CompareContext,
        candidates: &mut [PinnedPackage],
    ) {
        candidates.sort_by(|a, b| self.compare_candidates(context, a, b));
    }

    /// Returns the best candidate of `candidates`, if any.
    pub(crate) fn best_candidate(
        &self,
        context: &CompareContext,
        candidates: &[PinnedPackage],
    ) -> Option<PinnedPackage> {
        candidates
            .iter()
            .min_by(|a, b| self.compare_candidates(context, a, b))
            .cloned()
    }
}
