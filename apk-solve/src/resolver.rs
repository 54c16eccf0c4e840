//! The dependency resolver.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    fmt,
    fmt::{Debug, Formatter},
    str::FromStr,
    sync::{Arc, Mutex, PoisonError},
};

use apk_types::{Constraint, Package, Version, VersionComparison};
use log::{debug, trace};

use crate::{
    Cancellation, Disqualified, Error, NamedIndex, PackageSolution, Solution,
    compare::CompareContext,
    filter::FilterOptions,
    types::PinnedPackage,
};

/// The dependency resolver for a fixed set of repository indexes.
///
/// A `Resolver` pre-computes which candidates can satisfy which names
/// (packages and their provided virtuals alike) and which packages are
/// triggered by which install-if tokens. The indexes and the derived maps
/// stay immutable for the resolver's lifetime; every resolution call owns
/// its own mutable state, so nothing is carried between calls.
///
/// The memoization caches for parsed versions and constraints are shared
/// across calls and guarded, so a resolver may be handed to several
/// threads; callers that want to avoid the lock traffic construct one
/// resolver per thread instead.
pub struct Resolver {
    /// Candidates per name, aggregated over package names and provider
    /// tokens. Lists are never empty.
    pub(crate) name_map: HashMap<String, Vec<PinnedPackage>>,
    /// Candidates triggered per raw install-if token.
    pub(crate) install_if_map: HashMap<String, Vec<PinnedPackage>>,
    /// Memoized version parses.
    versions: Mutex<HashMap<String, Result<Version, apk_types::Error>>>,
    /// Memoized constraint parses.
    constraints: Mutex<HashMap<String, Constraint>>,
    /// Checked opportunistically before candidate scans.
    cancellation: Option<Cancellation>,
}

impl Resolver {
    /// Creates a [`Resolver`] over a set of indexes.
    ///
    /// Each package is registered once under its own name and once per
    /// provider token, sharing a single candidate identity, so that
    /// `name_map[name]` aggregates every way `name` can be satisfied.
    pub fn new(indexes: impl IntoIterator<Item = NamedIndex>) -> Self {
        let mut name_map: HashMap<String, Vec<PinnedPackage>> = HashMap::new();
        let mut install_if_map: HashMap<String, Vec<PinnedPackage>> = HashMap::new();

        let mut id = 0;
        for index in indexes {
            for package in index.packages() {
                let candidate = PinnedPackage {
                    id,
                    package: Arc::clone(package),
                    pin: index.name().to_string(),
                };
                id += 1;

                name_map
                    .entry(candidate.package.name.clone())
                    .or_default()
                    .push(candidate.clone());
                for token in &candidate.package.provides {
                    let provided = Constraint::parse(token);
                    name_map
                        .entry(provided.name)
                        .or_default()
                        .push(candidate.clone());
                }
                for trigger in &candidate.package.install_if {
                    install_if_map
                        .entry(trigger.clone())
                        .or_default()
                        .push(candidate.clone());
                }
            }
        }

        Self {
            name_map,
            install_if_map,
            versions: Mutex::default(),
            constraints: Mutex::default(),
            cancellation: None,
        }
    }

    /// Installs a cancellation handle checked during resolution.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    /// Returns all candidates able to satisfy `token`, best first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no index lists the name, or
    /// [`Error::Unsatisfiable`] listing why each candidate was ruled out.
    pub fn resolve_package(
        &self,
        token: &str,
        disqualified: &Disqualified,
    ) -> Result<Vec<Arc<Package>>, Error> {
        let constraint = self.parse_constraint(token);
        let candidates = self
            .name_map
            .get(&constraint.name)
            .ok_or_else(|| Error::NotFound(constraint.name.clone()))?;

        let options = FilterOptions {
            version: Some((constraint.comparison, constraint.version.as_str())),
            prefer_pin: constraint.pin.as_deref(),
            ..Default::default()
        };
        let mut filtered =
            self.filter_candidates(&constraint.name, candidates, &options, disqualified);
        if filtered.is_empty() {
            return Err(self.unsatisfiable(&constraint, candidates, disqualified));
        }

        let existing = HashMap::new();
        let existing_origins = HashSet::new();
        let context = CompareContext {
            compare: None,
            name: &constraint.name,
            existing: &existing,
            existing_origins: &existing_origins,
            pin: constraint.pin.as_deref().unwrap_or(""),
        };
        self.sort_candidates(&context, &mut filtered);

        Ok(filtered
            .into_iter()
            .map(|candidate| candidate.package)
            .collect())
    }

    /// Resolves `token` and its transitive dependencies.
    ///
    /// `existing` holds packages selected by earlier, layered calls; their
    /// versions and origins steer candidate selection so repeated calls
    /// converge on the same choices. After the dependency walk, install-if
    /// entries are expanded: every package whose triggers are all satisfied
    /// by the resolved set is appended to
    /// [`PackageSolution::triggered`].
    ///
    /// # Errors
    ///
    /// Returns an error if the package or one of its dependencies cannot be
    /// satisfied, or if the resolution is cancelled.
    pub fn package_with_dependencies(
        &self,
        token: &str,
        existing: &HashMap<String, Arc<Package>>,
        disqualified: &mut Disqualified,
    ) -> Result<PackageSolution, Error> {
        let constraint = self.parse_constraint(token);

        let mut local_existing = existing.clone();
        let mut local_origins: HashSet<String> = existing
            .values()
            .map(|package| package.origin.clone())
            .collect();

        let selected = self.resolve_one(&constraint, &local_existing, &local_origins, disqualified)?;
        local_existing.insert(
            selected.package.name.clone(),
            Arc::clone(&selected.package),
        );
        local_origins.insert(selected.package.origin.clone());

        let pin = constraint.pin.as_deref().unwrap_or("");
        let parents = HashSet::new();
        let (dependencies, mut conflicts) = self.dependencies_of(
            &selected,
            pin,
            true,
            &parents,
            &mut local_existing,
            &mut local_origins,
            disqualified,
        )?;

        // keep the first sighting of every name, children before parents
        let mut deduped: Vec<Arc<Package>> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for dependency in dependencies {
            if dependency.package.name == selected.package.name {
                continue;
            }
            if seen.insert(dependency.package.name.clone()) {
                deduped.push(Arc::clone(&dependency.package));
            }
        }

        let mut added: HashMap<String, Arc<Package>> = deduped
            .iter()
            .map(|package| (package.name.clone(), Arc::clone(package)))
            .collect();
        added.insert(
            selected.package.name.clone(),
            Arc::clone(&selected.package),
        );
        let mut seed: Vec<Arc<Package>> = deduped.clone();
        seed.push(Arc::clone(&selected.package));
        let triggered = self.expand_install_if(&seed, &mut added, disqualified)?;

        let mut seen_conflicts = HashSet::new();
        conflicts.retain(|conflict| seen_conflicts.insert(conflict.clone()));

        Ok(PackageSolution {
            package: selected.package,
            dependencies: deduped,
            triggered,
            conflicts,
        })
    }

    /// Resolves a set of requested constraint tokens into an install list
    /// and a conflict list.
    ///
    /// The install list is a topological order of the discovered subgraph:
    /// for every dependency edge the dependency precedes its dependent, and
    /// every package appears exactly once. Install-if triggered packages
    /// follow the packages that triggered them. Given the same resolver and
    /// requests the output is identical across calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Constraint`] naming the request that failed, with
    /// the underlying disqualification reasons as its source, or
    /// [`Error::Cancelled`] if the resolution was cancelled.
    pub fn packages_with_dependencies<S>(&self, tokens: &[S]) -> Result<Solution, Error>
    where
        S: AsRef<str>,
    {
        let mut disqualified = Disqualified::new();
        let mut constraints: Vec<Constraint> = tokens
            .iter()
            .map(|token| self.parse_constraint(token.as_ref()))
            .collect();
        self.constrain(&mut constraints, &mut disqualified)?;
        let requests = constraints.clone();

        // select one candidate per request, most constrained request first
        let mut dependencies: HashMap<String, Arc<Package>> = HashMap::new();
        let mut origins: HashSet<String> = HashSet::new();
        while !constraints.is_empty() {
            self.check_cancelled()?;

            let mut next: Option<(usize, String, Vec<PinnedPackage>)> = None;
            for (position, constraint) in constraints.iter().enumerate() {
                let candidates = self
                    .name_map
                    .get(&constraint.name)
                    .map(|candidates| {
                        self.filter_candidates(
                            &constraint.name,
                            candidates,
                            &FilterOptions {
                                version: Some((
                                    constraint.comparison,
                                    constraint.version.as_str(),
                                )),
                                prefer_pin: constraint.pin.as_deref(),
                                ..Default::default()
                            },
                            &disqualified,
                        )
                    })
                    .unwrap_or_default();
                if candidates.is_empty() {
                    return Err(Error::Constraint {
                        token: constraint.to_string(),
                        source: Box::new(self.resolution_failure(constraint, &disqualified)),
                    });
                }

                let token = constraint.to_string();
                let better = match &next {
                    None => true,
                    Some((_, best_token, best_candidates)) => {
                        (candidates.len(), &token) < (best_candidates.len(), best_token)
                    }
                };
                if better {
                    next = Some((position, token, candidates));
                }
            }
            let Some((position, _, candidates)) = next else {
                break;
            };
            let constraint = constraints.remove(position);

            let best = {
                let context = CompareContext {
                    compare: None,
                    name: &constraint.name,
                    existing: &dependencies,
                    existing_origins: &origins,
                    pin: constraint.pin.as_deref().unwrap_or(""),
                };
                self.best_candidate(&context, &candidates)
            };
            let Some(best) = best else {
                break;
            };
            debug!("selected {} for '{constraint}'", best.package.filename());

            dependencies.insert(best.package.name.clone(), Arc::clone(&best.package));
            origins.insert(best.package.origin.clone());
            self.disqualify_conflicts(&best, &mut disqualified);
        }

        // expand each original request depth-first
        let mut packages: Vec<Arc<Package>> = Vec::new();
        let mut installed: HashSet<String> = HashSet::new();
        let mut conflicts: Vec<String> = Vec::new();
        for request in &requests {
            let token = request.to_string();
            let solution = self
                .package_with_dependencies(&token, &dependencies, &mut disqualified)
                .map_err(|source| Error::Constraint {
                    token: token.clone(),
                    source: Box::new(source),
                })?;

            let ordered = solution
                .dependencies
                .into_iter()
                .chain([solution.package])
                .chain(solution.triggered);
            for package in ordered {
                if installed.insert(package.name.clone()) {
                    packages.push(package);
                }
            }
            conflicts.extend(solution.conflicts);
        }

        // a trigger may only be fully satisfied by the union of all requests
        let mut added: HashMap<String, Arc<Package>> = packages
            .iter()
            .map(|package| (package.name.clone(), Arc::clone(package)))
            .collect();
        let seed = packages.clone();
        packages.extend(self.expand_install_if(&seed, &mut added, &disqualified)?);

        let mut seen = HashSet::new();
        conflicts.retain(|conflict| seen.insert(conflict.clone()));

        Ok(Solution {
            packages,
            conflicts,
        })
    }

    /// Picks the best candidate for a single non-negated constraint.
    fn resolve_one(
        &self,
        constraint: &Constraint,
        existing: &HashMap<String, Arc<Package>>,
        existing_origins: &HashSet<String>,
        disqualified: &Disqualified,
    ) -> Result<PinnedPackage, Error> {
        let candidates = self
            .name_map
            .get(&constraint.name)
            .ok_or_else(|| Error::NotFound(constraint.name.clone()))?;

        let options = FilterOptions {
            version: Some((constraint.comparison, constraint.version.as_str())),
            prefer_pin: constraint.pin.as_deref(),
            installed: existing.get(&constraint.name),
            ..Default::default()
        };
        let filtered =
            self.filter_candidates(&constraint.name, candidates, &options, disqualified);
        if filtered.is_empty() {
            return Err(self.unsatisfiable(constraint, candidates, disqualified));
        }

        let context = CompareContext {
            compare: None,
            name: &constraint.name,
            existing,
            existing_origins,
            pin: constraint.pin.as_deref().unwrap_or(""),
        };
        self.best_candidate(&context, &filtered)
            .ok_or_else(|| Error::NotFound(constraint.name.clone()))
    }

    /// Walks the dependencies of `package` depth-first.
    ///
    /// Children are emitted before their parents. `parents` carries the
    /// ancestor chain for cycle breaking and is branch-local; `existing`
    /// and `existing_origins` accumulate the selections of completed
    /// subtrees so sibling branches converge on the same choices.
    ///
    /// Negated dependency tokens are returned (stripped) as conflicts, not
    /// searched. Tokens the package provides itself, and tokens an
    /// acceptable version of the package itself satisfies (when
    /// `allow_self_fulfill` is set), are skipped.
    fn dependencies_of(
        &self,
        package: &PinnedPackage,
        allow_pin: &str,
        allow_self_fulfill: bool,
        parents: &HashSet<String>,
        existing: &mut HashMap<String, Arc<Package>>,
        existing_origins: &mut HashSet<String>,
        disqualified: &mut Disqualified,
    ) -> Result<(Vec<PinnedPackage>, Vec<String>), Error> {
        if parents.contains(&package.package.name) {
            return Ok((Vec::new(), Vec::new()));
        }
        self.check_cancelled()?;

        let mut provided_names: HashSet<String> = HashSet::new();
        for token in &package.package.provides {
            provided_names.insert(token.clone());
            provided_names.insert(self.parse_constraint(token).name);
        }

        let mut constraints: Vec<Constraint> = package
            .package
            .dependencies
            .iter()
            .map(|token| self.parse_constraint(token))
            .collect();
        let mut conflicts = self
            .constrain(&mut constraints, disqualified)
            .map_err(|source| Error::Dependency {
                package: package.package.to_string(),
                source: Box::new(source),
            })?;

        // tokens this package satisfies on its own are not searched
        constraints.retain(|constraint| {
            if provided_names.contains(&constraint.to_string())
                || provided_names.contains(&constraint.name)
            {
                trace!("{}: '{constraint}' is self-provided", package.package);
                return false;
            }
            if allow_self_fulfill && constraint.name == package.package.name {
                match constraint.comparison {
                    None => return false,
                    Some(comparison) => {
                        // malformed self-versions fall through to the search
                        if let (Ok(actual), Ok(required)) = (
                            self.parse_version(&package.package.version),
                            self.parse_version(&constraint.version),
                        ) {
                            if comparison.satisfied_by(&actual, &required) {
                                return false;
                            }
                        }
                    }
                }
            }
            true
        });

        let mut dependencies: Vec<PinnedPackage> = Vec::new();
        while !constraints.is_empty() {
            self.check_cancelled()?;

            let mut next: Option<(usize, String, Vec<PinnedPackage>)> = None;
            for (position, constraint) in constraints.iter().enumerate() {
                let all = self.name_map.get(&constraint.name);
                let candidates = all
                    .map(|all| {
                        self.filter_candidates(
                            &constraint.name,
                            all,
                            &FilterOptions {
                                version: Some((
                                    constraint.comparison,
                                    constraint.version.as_str(),
                                )),
                                allow_pin: Some(allow_pin),
                                installed: existing.get(&constraint.name),
                                ..Default::default()
                            },
                            disqualified,
                        )
                    })
                    .unwrap_or_default();
                if candidates.is_empty() {
                    let source = match all {
                        None => Error::NotFound(constraint.name.clone()),
                        Some(all) => self.unsatisfiable(constraint, all, disqualified),
                    };
                    return Err(Error::Dependency {
                        package: package.package.to_string(),
                        source: Box::new(source),
                    });
                }

                let token = constraint.to_string();
                let better = match &next {
                    None => true,
                    Some((_, best_token, best_candidates)) => {
                        (candidates.len(), &token) < (best_candidates.len(), best_token)
                    }
                };
                if better {
                    next = Some((position, token, candidates));
                }
            }
            let Some((position, _, candidates)) = next else {
                break;
            };
            let constraint = constraints.remove(position);

            let best = {
                let context = CompareContext {
                    compare: Some(&package.package),
                    name: &constraint.name,
                    existing: &*existing,
                    existing_origins: &*existing_origins,
                    pin: constraint.pin.as_deref().unwrap_or(allow_pin),
                };
                self.best_candidate(&context, &candidates)
            };
            let Some(best) = best else {
                break;
            };
            trace!(
                "{} depends on '{constraint}': selected {}",
                package.package,
                best.package.filename()
            );
            self.disqualify_conflicts(&best, disqualified);

            let mut child_parents = parents.clone();
            child_parents.insert(package.package.name.clone());
            let mut child_existing = existing.clone();
            let mut child_origins = existing_origins.clone();
            let (sub_dependencies, sub_conflicts) = self.dependencies_of(
                &best,
                allow_pin,
                allow_self_fulfill,
                &child_parents,
                &mut child_existing,
                &mut child_origins,
                disqualified,
            )?;

            for sub in sub_dependencies.iter().chain([&best]) {
                existing.insert(sub.package.name.clone(), Arc::clone(&sub.package));
                existing_origins.insert(sub.package.origin.clone());
            }
            dependencies.extend(sub_dependencies);
            dependencies.push(best);
            conflicts.extend(sub_conflicts);
        }

        Ok((dependencies, conflicts))
    }

    /// Applies negative and pinned version constraints up front.
    ///
    /// Negated tokens disqualify their providers and are removed from the
    /// list; their stripped forms are returned so callers can report them
    /// as conflicts. Versioned tokens preemptively disqualify candidates
    /// that can never satisfy them, both by their own version and by the
    /// versions of their provider tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if a *requested* version fails to parse; malformed
    /// candidate versions are left for the filter to drop.
    fn constrain(
        &self,
        constraints: &mut Vec<Constraint>,
        disqualified: &mut Disqualified,
    ) -> Result<Vec<String>, Error> {
        let mut stripped = Vec::new();
        let mut remaining = Vec::new();

        for constraint in constraints.drain(..) {
            if constraint.negated {
                self.disqualify_providers(&constraint, disqualified);
                stripped.push(constraint.stripped().to_string());
                continue;
            }

            if let Some(comparison) = constraint.comparison {
                let required = self.parse_version(&constraint.version)?;
                if let Some(candidates) = self.name_map.get(&constraint.name) {
                    for candidate in candidates {
                        if candidate.package.name == constraint.name {
                            if let Ok(actual) = self.parse_version(&candidate.package.version) {
                                if !comparison.satisfied_by(&actual, &required) {
                                    disqualified.insert(
                                        candidate.id,
                                        format!(
                                            "{} does not satisfy '{constraint}'",
                                            candidate.package.filename()
                                        ),
                                    );
                                }
                            }
                            continue;
                        }
                        for token in &candidate.package.provides {
                            let provided = self.parse_constraint(token);
                            if provided.name != constraint.name {
                                continue;
                            }
                            let version = if provided.version.is_empty() {
                                candidate.package.version.clone()
                            } else {
                                provided.version
                            };
                            if let Ok(actual) = self.parse_version(&version) {
                                if !comparison.satisfied_by(&actual, &required) {
                                    disqualified.insert(
                                        candidate.id,
                                        format!(
                                            "{} provides {} which does not satisfy '{constraint}'",
                                            candidate.package.filename(),
                                            constraint.name
                                        ),
                                    );
                                }
                            }
                        }
                    }
                }
            }

            remaining.push(constraint);
        }

        *constraints = remaining;
        Ok(stripped)
    }

    /// Disqualifies every provider a negative constraint rules out.
    fn disqualify_providers(&self, constraint: &Constraint, disqualified: &mut Disqualified) {
        let Some(candidates) = self.name_map.get(&constraint.name) else {
            return;
        };
        let options = FilterOptions {
            version: Some((constraint.comparison, constraint.version.as_str())),
            prefer_pin: constraint.pin.as_deref(),
            ..Default::default()
        };
        for candidate in
            self.filter_candidates(&constraint.name, candidates, &options, disqualified)
        {
            debug!(
                "disqualifying {}: excluded by '{constraint}'",
                candidate.package.filename()
            );
            disqualified.insert(candidate.id, format!("excluded by '{constraint}'"));
        }
    }

    /// Disqualifies every other candidate under the names `selected`
    /// provides.
    ///
    /// Invoked after a package is definitively selected. Disqualification
    /// does not ripple backward: earlier decisions stand even if a later
    /// one would have invalidated them.
    fn disqualify_conflicts(&self, selected: &PinnedPackage, disqualified: &mut Disqualified) {
        for token in &selected.package.provides {
            let provided = self.parse_constraint(token);
            let Some(candidates) = self.name_map.get(&provided.name) else {
                continue;
            };
            for candidate in candidates {
                if candidate.id == selected.id {
                    continue;
                }
                disqualified.insert(
                    candidate.id,
                    format!(
                        "{} already provides {}",
                        selected.package.filename(),
                        provided.name
                    ),
                );
            }
        }
    }

    /// Appends install-if triggered packages until a fixpoint is reached.
    ///
    /// `seed` is the resolved set in install order; `added` maps every
    /// resolved name to its package and is extended with each triggered
    /// package, so chained triggers fire. A trigger token is satisfied by a
    /// bare name match, or by a `name=version` token whose version equals
    /// the added package's version *literally* (by string comparison, not
    /// version algebra).
    fn expand_install_if(
        &self,
        seed: &[Arc<Package>],
        added: &mut HashMap<String, Arc<Package>>,
        disqualified: &Disqualified,
    ) -> Result<Vec<Arc<Package>>, Error> {
        let mut triggered = Vec::new();
        let mut queue: VecDeque<Arc<Package>> = seed.iter().cloned().collect();

        while let Some(package) = queue.pop_front() {
            self.check_cancelled()?;
            for key in [
                package.name.clone(),
                format!("{}={}", package.name, package.version),
            ] {
                let Some(candidates) = self.install_if_map.get(&key) else {
                    continue;
                };
                for candidate in candidates {
                    if disqualified.contains(candidate.id)
                        || added.contains_key(&candidate.package.name)
                    {
                        continue;
                    }
                    if self.install_if_satisfied(&candidate.package, added) {
                        debug!("install-if: adding {}", candidate.package.filename());
                        added.insert(
                            candidate.package.name.clone(),
                            Arc::clone(&candidate.package),
                        );
                        triggered.push(Arc::clone(&candidate.package));
                        queue.push_back(Arc::clone(&candidate.package));
                    }
                }
            }
        }

        Ok(triggered)
    }

    /// Returns `true` if all install-if tokens of `package` are satisfied
    /// by the `added` set.
    fn install_if_satisfied(
        &self,
        package: &Package,
        added: &HashMap<String, Arc<Package>>,
    ) -> bool {
        package.install_if.iter().all(|token| {
            let trigger = self.parse_constraint(token);
            match added.get(&trigger.name) {
                None => false,
                Some(present) => match trigger.comparison {
                    None => true,
                    // literal string comparison, not version algebra
                    Some(VersionComparison::Equal) => present.version == trigger.version,
                    Some(_) => false,
                },
            }
        })
    }

    /// Builds the join error explaining why every candidate for
    /// `constraint` is gone.
    fn unsatisfiable(
        &self,
        constraint: &Constraint,
        candidates: &[PinnedPackage],
        disqualified: &Disqualified,
    ) -> Error {
        let mut reasons = Vec::new();
        let mut seen = HashSet::new();
        for candidate in candidates {
            if !seen.insert(candidate.id) {
                continue;
            }
            let reason = disqualified
                .reason(candidate.id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("does not satisfy '{constraint}'"));
            reasons.push(Error::Disqualified {
                package: candidate.package.filename(),
                reason,
            });
        }
        if reasons.is_empty() {
            Error::NotFound(constraint.name.clone())
        } else {
            Error::Unsatisfiable(reasons)
        }
    }

    /// Builds the failure for a request that has no surviving candidates.
    fn resolution_failure(&self, constraint: &Constraint, disqualified: &Disqualified) -> Error {
        match self.name_map.get(&constraint.name) {
            None => Error::NotFound(constraint.name.clone()),
            Some(candidates) => self.unsatisfiable(constraint, candidates, disqualified),
        }
    }

    /// Parses `version` through the memoization cache.
    pub(crate) fn parse_version(&self, version: &str) -> Result<Version, apk_types::Error> {
        let mut cache = self
            .versions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(parsed) = cache.get(version) {
            return parsed.clone();
        }
        let parsed = Version::from_str(version);
        cache.insert(version.to_string(), parsed.clone());
        parsed
    }

    /// Parses `token` through the memoization cache.
    pub(crate) fn parse_constraint(&self, token: &str) -> Constraint {
        let mut cache = self
            .constraints
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(parsed) = cache.get(token) {
            return parsed.clone();
        }
        let parsed = Constraint::parse(token);
        cache.insert(token.to_string(), parsed.clone());
        parsed
    }

    /// Fails with [`Error::Cancelled`] once the cancellation handle fires.
    fn check_cancelled(&self) -> Result<(), Error> {
        match &self.cancellation {
            Some(cancellation) if cancellation.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

impl Debug for Resolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("names", &self.name_map.len())
            .field("install_if_triggers", &self.install_if_map.len())
            .finish_non_exhaustive()
    }
}
