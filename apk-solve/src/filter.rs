//! Candidate filtering.

use std::{collections::HashSet, sync::Arc};

use apk_types::{Package, VersionComparison};

use crate::{
    resolver::Resolver,
    types::{Disqualified, PinnedPackage},
};

/// The predicate stack applied to a candidate list.
///
/// Every predicate is optional; disqualified candidates are always
/// excluded.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FilterOptions<'a> {
    /// Retain only candidates whose effective version for the queried name
    /// satisfies the comparison. A `None` comparison accepts any version.
    pub(crate) version: Option<(Option<VersionComparison>, &'a str)>,
    /// Non-exclusive: when any candidate carries this pin, drop the ones
    /// that do not; otherwise keep all.
    pub(crate) prefer_pin: Option<&'a str>,
    /// Exclusive: candidates carrying a pin must carry exactly this one;
    /// unpinned candidates always pass.
    pub(crate) allow_pin: Option<&'a str>,
    /// Soft pin to an already-selected package: when a candidate matches its
    /// name and version, drop the ones that do not; otherwise keep all.
    pub(crate) installed: Option<&'a Arc<Package>>,
}

impl Resolver {
    /// Applies a predicate stack to `candidates` for the name being queried.
    ///
    /// Candidates in the disqualified set never pass; duplicates (the same
    /// package listed more than once under a name) are reduced to their
    /// first occurrence. Candidates whose version fails to parse are
    /// silently dropped by the version predicate, not disqualified.
    pub(crate) fn filter_candidates(
        &self,
        name: &str,
        candidates: &[PinnedPackage],
        options: &FilterOptions,
        disqualified: &Disqualified,
    ) -> Vec<PinnedPackage> {
        let mut seen = HashSet::new();
        let mut result: Vec<PinnedPackage> = candidates
            .iter()
            .filter(|candidate| !disqualified.contains(candidate.id))
            .filter(|candidate| seen.insert(candidate.id))
            .cloned()
            .collect();

        if let Some((Some(comparison), required)) = options.version {
            let required = self.parse_version(required);
            result.retain(|candidate| {
                let Ok(required) = &required else {
                    return false;
                };
                let effective = self.effective_version(&candidate.package, name);
                match self.parse_version(&effective) {
                    Ok(actual) => comparison.satisfied_by(&actual, required),
                    Err(_) => false,
                }
            });
        }

        if let Some(allow) = options.allow_pin {
            result.retain(|candidate| candidate.pin.is_empty() || candidate.pin == allow);
        }

        if let Some(installed) = options.installed {
            let matches = |candidate: &PinnedPackage| {
                candidate.package.name == installed.name
                    && candidate.package.version == installed.version
            };
            if result.iter().any(matches) {
                result.retain(matches);
            }
        }

        if let Some(pin) = options.prefer_pin {
            if result.iter().any(|candidate| candidate.pin == pin) {
                result.retain(|candidate| candidate.pin == pin);
            }
        }

        result
    }

    /// Returns the version under which `package` satisfies `name`.
    ///
    /// The package's own version applies when it carries the name itself, or
    /// when the matching provider token does not declare a version of its
    /// own.
    pub(crate) fn effective_version(&self, package: &Package, name: &str) -> String {
        if package.name == name {
            return package.version.clone();
        }
        for token in &package.provides {
            let provided = self.parse_constraint(token);
            if provided.name == name {
                return if provided.version.is_empty() {
                    package.version.clone()
                } else {
                    provided.version
                };
            }
        }
        package.version.clone()
    }
}
