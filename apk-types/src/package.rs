//! Package metadata consumed by the resolver.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The metadata record of a single package in a repository index.
///
/// A `Package` is immutable input to the resolver; it is produced by the
/// index loader and never modified afterwards. Dependency, provider and
/// install-if entries are kept as raw constraint tokens (see
/// [`crate::Constraint`]) and parsed lazily where needed.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Package {
    /// The name of the package.
    pub name: String,
    /// The package version.
    pub version: String,
    /// The source package this package was built from.
    ///
    /// Packages built together share their origin, which makes it usable as
    /// a grouping label during candidate selection.
    #[serde(default)]
    pub origin: String,
    /// The URI of the index this package belongs to.
    #[serde(default)]
    pub repository: String,
    /// Preference used to rank competing providers of the same virtual name.
    #[serde(default)]
    pub provider_priority: u64,
    /// Constraint tokens this package depends on.
    ///
    /// Negated tokens (leading `!`) declare conflicts.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Virtual names this package provides, each optionally `name=version`.
    #[serde(default)]
    pub provides: Vec<String>,
    /// Constraint tokens that, when all of them are satisfied by the
    /// selected package set, trigger automatic installation of this package.
    #[serde(default)]
    pub install_if: Vec<String>,
}

impl Package {
    /// Returns the file name of the package archive.
    ///
    /// ## Examples
    /// ```
    /// use apk_types::Package;
    ///
    /// let package = Package {
    ///     name: "busybox".to_string(),
    ///     version: "1.36.1-r5".to_string(),
    ///     ..Default::default()
    /// };
    /// assert_eq!("busybox-1.36.1-r5.apk", package.filename());
    /// ```
    pub fn filename(&self) -> String {
        format!("{}-{}.apk", self.name, self.version)
    }
}

impl Display for Package {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        write!(fmt, "{}-{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn package_from_json() -> TestResult {
        let package: Package = serde_json::from_str(
            r#"{
                "name": "tzdata",
                "version": "2024a-r0",
                "origin": "tzdata",
                "install_if": ["docs", "tzdata=2024a-r0"]
            }"#,
        )?;
        assert_eq!("tzdata", package.name);
        assert_eq!("tzdata-2024a-r0.apk", package.filename());
        assert_eq!("tzdata-2024a-r0", format!("{package}"));
        assert!(package.dependencies.is_empty());
        assert_eq!(2, package.install_if.len());
        Ok(())
    }
}
