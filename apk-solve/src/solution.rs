//! Solution representation for dependency resolution.

use std::{
    fmt,
    fmt::{Display, Formatter},
    sync::Arc,
};

use apk_types::Package;

/// The result of resolving a single package and its dependency subtree.
#[derive(Clone, Debug)]
pub struct PackageSolution {
    /// The package selected for the request.
    pub package: Arc<Package>,
    /// The packages the selection depends on, dependencies before
    /// dependents, deduplicated by name.
    pub dependencies: Vec<Arc<Package>>,
    /// Packages auto-installed because all their install-if triggers are
    /// satisfied by the selection. They install after `package`.
    pub triggered: Vec<Arc<Package>>,
    /// Conflict tokens collected from the subtree (negated dependencies,
    /// stripped of their negation), deduplicated.
    pub conflicts: Vec<String>,
}

/// The result of resolving a set of requested packages.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    /// The packages to install, in installation order: for every dependency
    /// edge the dependency precedes its dependent, and every package
    /// appears exactly once.
    pub packages: Vec<Arc<Package>>,
    /// Conflict tokens collected across all subtrees, deduplicated.
    pub conflicts: Vec<String>,
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for package in &self.packages {
            writeln!(
                f,
                "[+] {:>9} {:<30} {}",
                "install:", package.name, package.version
            )?;
        }
        for conflict in &self.conflicts {
            writeln!(f, "[-] {:>9} {conflict}", "conflict:")?;
        }
        Ok(())
    }
}
