//! Dependency constraint tokens.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::VersionComparison;

/// A parsed dependency constraint token.
///
/// A constraint takes the form `[!]name[@pin][op version]`:
///
/// - a leading `!` negates the constraint (the named package must *not* be
///   installed),
/// - an `@pin` suffix on the name restricts or prefers candidates from the
///   index carrying that label,
/// - an operator (see [`VersionComparison`]) and version restrict the
///   acceptable versions; without them any version is acceptable.
///
/// Parsing is infallible: input that does not match the grammar degrades to
/// a name-only constraint accepting any version. The `version` field keeps
/// the raw string and is only validated when a comparison is evaluated.
///
/// ## Examples
/// ```
/// use apk_types::{Constraint, VersionComparison};
///
/// let constraint = Constraint::parse("!curl@edge<8.5.0");
/// assert!(constraint.negated);
/// assert_eq!(constraint.name, "curl");
/// assert_eq!(constraint.pin.as_deref(), Some("edge"));
/// assert_eq!(constraint.comparison, Some(VersionComparison::Less));
/// assert_eq!(constraint.version, "8.5.0");
/// assert_eq!("!curl@edge<8.5.0", format!("{constraint}"));
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Constraint {
    /// Whether the constraint is negated (leading `!`).
    pub negated: bool,
    /// The name of the required package or virtual.
    pub name: String,
    /// The label of the index the constraint is pinned to, if any.
    pub pin: Option<String>,
    /// The comparison against `version`; `None` accepts any version.
    pub comparison: Option<VersionComparison>,
    /// The raw required version; empty when no comparison is present.
    pub version: String,
}

impl Constraint {
    /// Parses a constraint token.
    ///
    /// Never fails; ill-formed input yields a name-only constraint.
    pub fn parse(token: &str) -> Self {
        let (negated, rest) = match token.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, token),
        };

        // NOTE: The operator splitting relies on the specific ordering of
        // the VersionComparison variants (which orders two-character
        // comparators over one-character ones)!
        let mut split = None;
        for comparison in VersionComparison::iter() {
            if let Some((name_part, version)) = rest.split_once(comparison.as_ref()) {
                split = Some((name_part, Some(comparison), version.to_string()));
                break;
            }
        }
        let (name_part, comparison, version) = split.unwrap_or((rest, None, String::new()));

        let (name, pin) = match name_part.split_once('@') {
            Some((name, pin)) => (name.to_string(), Some(pin.to_string())),
            None => (name_part.to_string(), None),
        };

        Self {
            negated,
            name,
            pin,
            comparison,
            version,
        }
    }

    /// Returns the constraint with its negation stripped.
    pub fn stripped(&self) -> Constraint {
        Constraint {
            negated: false,
            ..self.clone()
        }
    }
}

impl From<&str> for Constraint {
    /// Creates a [`Constraint`] from a string slice via [`Constraint::parse`].
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl Display for Constraint {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        if self.negated {
            write!(fmt, "!")?;
        }
        write!(fmt, "{}", self.name)?;
        if let Some(pin) = &self.pin {
            write!(fmt, "@{pin}")?;
        }
        if let Some(comparison) = self.comparison {
            write!(fmt, "{}{}", comparison, self.version)?;
        }
        Ok(())
    }
}
