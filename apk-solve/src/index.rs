//! The index view consumed by the resolver.

use std::sync::Arc;

use apk_types::Package;

/// A named, sourced collection of packages.
///
/// The name doubles as the *pin* label: constraints of the form `name@pin`
/// prefer (or, while descending into dependencies, require) candidates from
/// the index carrying that label. Indexes that are not meant to be pinned
/// use an empty name.
///
/// The resolver does not parse index files; a `NamedIndex` is handed to it
/// fully loaded and stays immutable afterwards.
///
/// ## Examples
/// ```
/// use apk_solve::NamedIndex;
/// use apk_types::Package;
///
/// let index = NamedIndex::new(
///     "edge",
///     "https://example.org/edge/main",
///     [Package {
///         name: "busybox".to_string(),
///         version: "1.37.0-r0".to_string(),
///         ..Default::default()
///     }],
/// );
/// assert_eq!("edge", index.name());
/// assert_eq!(1, index.count());
/// ```
#[derive(Clone, Debug)]
pub struct NamedIndex {
    name: String,
    source: String,
    packages: Vec<Arc<Package>>,
}

impl NamedIndex {
    /// Creates a new index from a pin label, a source URI and its packages.
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        packages: impl IntoIterator<Item = Package>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            packages: packages.into_iter().map(Arc::new).collect(),
        }
    }

    /// Returns the pin label of the index (empty for unlabeled indexes).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the source URI of the index, for diagnostics.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the number of packages in the index.
    pub fn count(&self) -> usize {
        self.packages.len()
    }

    /// Returns the packages in the index.
    pub fn packages(&self) -> &[Arc<Package>] {
        &self.packages
    }
}
