//! Package version handling.

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::Serialize;
use winnow::{
    ModalResult,
    Parser,
    ascii::{digit0, digit1},
    combinator::{alt, opt, preceded, repeat, separated},
    token::one_of,
};

use crate::Error;

/// The rank at which a version without any remaining suffix sorts.
///
/// Suffixes below this rank are pre-releases, suffixes above it are
/// post-releases (see [`VersionSuffix::rank`]).
const NO_SUFFIX_RANK: u8 = 4;

/// Compares two raw digit sequences as numbers of arbitrary length.
///
/// Leading zeros are insignificant. After discarding them, the longer
/// sequence is the greater number; sequences of equal length compare
/// lexicographically.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// A suffix word of a package version.
///
/// Suffix words are attached to a version with a leading `_` and an optional
/// trailing number (e.g. `1.2_rc3`). Pre-release suffixes order a version
/// *before* the same version without the suffix, the `p` (patch) suffix
/// orders it *after*.
///
/// ## Examples
/// ```
/// use apk_types::VersionSuffix;
///
/// assert_eq!("rc", format!("{}", VersionSuffix::Rc));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum VersionSuffix {
    /// An alpha pre-release (`_alpha`)
    Alpha,
    /// A beta pre-release (`_beta`)
    Beta,
    /// A generic pre-release (`_pre`)
    Pre,
    /// A release candidate (`_rc`)
    Rc,
    /// A patch post-release (`_p`)
    P,
}

impl VersionSuffix {
    /// Returns the position of the suffix in the version order.
    ///
    /// The absence of a suffix ranks at [`NO_SUFFIX_RANK`], in between the
    /// pre-release suffixes and `p`.
    fn rank(self) -> u8 {
        match self {
            VersionSuffix::Alpha => 0,
            VersionSuffix::Beta => 1,
            VersionSuffix::Pre => 2,
            VersionSuffix::Rc => 3,
            VersionSuffix::P => 5,
        }
    }
}

/// A version suffix together with its optional trailing number.
///
/// The number is kept as the raw digit sequence; an absent number compares
/// as `0`.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Suffix {
    word: VersionSuffix,
    number: String,
}

/// A package version.
///
/// A `Version` tracks the dotted numeric release components, an optional
/// trailing letter, any number of suffixes (see [`VersionSuffix`]) and an
/// optional `-r<N>` build release.
///
/// Numeric components are kept as raw digit sequences, so versions with
/// components beyond machine integer range still parse and compare.
///
/// ## Examples
/// ```
/// use std::str::FromStr;
///
/// use apk_types::Version;
///
/// # fn main() -> Result<(), apk_types::Error> {
/// let version = Version::from_str("1.2.3_rc1-r4")?;
/// assert_eq!("1.2.3_rc1-r4", format!("{version}"));
///
/// assert!(Version::from_str("1.2_alpha")? < Version::from_str("1.2")?);
/// assert!(Version::from_str("1.2")? < Version::from_str("1.2_p1")?);
/// assert!(Version::from_str("1.2-r1")? < Version::from_str("1.2-r2")?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Eq)]
pub struct Version {
    components: Vec<String>,
    letter: Option<char>,
    suffixes: Vec<Suffix>,
    revision: Option<String>,
}

impl Version {
    /// Recognizes a [`Version`] in a string slice.
    ///
    /// The accepted grammar is
    /// `digits { '.' digits } [ 'a'..'z' ] { '_' suffix [digits] } [ '-r' digits ]`.
    ///
    /// # Errors
    ///
    /// Returns an error if no [`Version`] can be recognized at the start of
    /// `input`.
    pub fn parser(input: &mut &str) -> ModalResult<Self> {
        let components: Vec<String> =
            separated(1.., digit1.map(|digits: &str| digits.to_string()), ".").parse_next(input)?;
        let letter = opt(one_of('a'..='z')).parse_next(input)?;
        let suffixes: Vec<Suffix> =
            repeat(0.., preceded("_", Self::suffix_parser)).parse_next(input)?;
        let revision = opt(preceded(
            "-r",
            digit1.map(|digits: &str| digits.to_string()),
        ))
        .parse_next(input)?;

        Ok(Version {
            components,
            letter,
            suffixes,
            revision,
        })
    }

    /// Recognizes a single [`Suffix`] (without its leading `_`).
    fn suffix_parser(input: &mut &str) -> ModalResult<Suffix> {
        // "pre" must be tried before "p" so the longer word wins.
        let word = alt((
            "alpha".value(VersionSuffix::Alpha),
            "beta".value(VersionSuffix::Beta),
            "pre".value(VersionSuffix::Pre),
            "rc".value(VersionSuffix::Rc),
            "p".value(VersionSuffix::P),
        ))
        .parse_next(input)?;
        let number = digit0
            .map(|digits: &str| digits.to_string())
            .parse_next(input)?;

        Ok(Suffix { word, number })
    }

    /// Returns `true` if `self` equals `required` at the precision spelled
    /// out by `required`.
    ///
    /// All release components of `required` must match the leading
    /// components of `self`; the letter, suffixes and build release of
    /// `required` are only compared when `required` carries them. This
    /// implements the `~=` operator.
    ///
    /// ## Examples
    /// ```
    /// use std::str::FromStr;
    ///
    /// use apk_types::Version;
    ///
    /// # fn main() -> Result<(), apk_types::Error> {
    /// let actual = Version::from_str("1.2.3-r2")?;
    /// assert!(actual.fuzzy_equals(&Version::from_str("1.2")?));
    /// assert!(actual.fuzzy_equals(&Version::from_str("1.2.3")?));
    /// assert!(!actual.fuzzy_equals(&Version::from_str("1.3")?));
    /// assert!(!actual.fuzzy_equals(&Version::from_str("1.2.3-r1")?));
    /// # Ok(())
    /// # }
    /// ```
    pub fn fuzzy_equals(&self, required: &Version) -> bool {
        if self.components.len() < required.components.len() {
            return false;
        }
        for (mine, theirs) in self.components.iter().zip(required.components.iter()) {
            if compare_digits(mine, theirs).is_ne() {
                return false;
            }
        }

        if required.letter.is_some() && self.letter != required.letter {
            return false;
        }

        if !required.suffixes.is_empty() {
            if self.suffixes.len() != required.suffixes.len() {
                return false;
            }
            for (mine, theirs) in self.suffixes.iter().zip(required.suffixes.iter()) {
                if mine.word != theirs.word || compare_digits(&mine.number, &theirs.number).is_ne()
                {
                    return false;
                }
            }
        }

        if let Some(required_revision) = &required.revision {
            let mine = self.revision.as_deref().unwrap_or("0");
            if compare_digits(mine, required_revision).is_ne() {
                return false;
            }
        }

        true
    }
}

impl FromStr for Version {
    type Err = Error;
    /// Creates a [`Version`] from a string slice.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` does not match the version grammar in its
    /// entirety.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parser
            .parse(input)
            .map_err(|_| Error::InvalidVersion(input.to_string()))
    }
}

impl Display for Version {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        write!(fmt, "{}", self.components.join("."))?;

        if let Some(letter) = self.letter {
            write!(fmt, "{letter}")?;
        }

        for suffix in &self.suffixes {
            write!(fmt, "_{}{}", suffix.word, suffix.number)?;
        }

        if let Some(revision) = &self.revision {
            write!(fmt, "-r{revision}")?;
        }

        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // release components pairwise, then the longer component list wins
        for (mine, theirs) in self.components.iter().zip(other.components.iter()) {
            let ordering = compare_digits(mine, theirs);
            if ordering.is_ne() {
                return ordering;
            }
        }
        let length_ordering = self.components.len().cmp(&other.components.len());
        if length_ordering.is_ne() {
            return length_ordering;
        }

        // a trailing letter orders after the same version without one
        let letter_ordering = self.letter.cmp(&other.letter);
        if letter_ordering.is_ne() {
            return letter_ordering;
        }

        // suffixes pairwise, the missing side padded with the empty suffix
        for position in 0..self.suffixes.len().max(other.suffixes.len()) {
            let (mine_rank, mine_number) = self
                .suffixes
                .get(position)
                .map(|suffix| (suffix.word.rank(), suffix.number.as_str()))
                .unwrap_or((NO_SUFFIX_RANK, "0"));
            let (theirs_rank, theirs_number) = other
                .suffixes
                .get(position)
                .map(|suffix| (suffix.word.rank(), suffix.number.as_str()))
                .unwrap_or((NO_SUFFIX_RANK, "0"));

            let ordering = mine_rank
                .cmp(&theirs_rank)
                .then_with(|| compare_digits(mine_number, theirs_number));
            if ordering.is_ne() {
                return ordering;
            }
        }

        compare_digits(
            self.revision.as_deref().unwrap_or("0"),
            other.revision.as_deref().unwrap_or("0"),
        )
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

/// Specifies the comparison function for a version constraint.
///
/// The package version can be required to be less than (`<`), less than or
/// equal to (`<=`), equal to (`=`), greater than or equal to (`>=`) or
/// greater than (`>`) the specified version, or to fuzzy-equal it (`~=`,
/// equality up to the precision of the specified version).
///
/// ## Note
///
/// The ordering of variants is relied upon when splitting constraint
/// tokens: two-character operators are listed before the one-character
/// operators they contain, so iteration matches the longest operator first.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Serialize, strum::AsRefStr, strum::Display, strum::EnumIter,
)]
pub enum VersionComparison {
    /// The actual version must be less than or equal to the required one.
    #[strum(serialize = "<=")]
    LessOrEqual,
    /// The actual version must be greater than or equal to the required one.
    #[strum(serialize = ">=")]
    GreaterOrEqual,
    /// The actual version must fuzzy-equal the required one.
    #[strum(serialize = "~=")]
    Fuzzy,
    /// The actual version must be less than the required one.
    #[strum(serialize = "<")]
    Less,
    /// The actual version must be equal to the required one.
    #[strum(serialize = "=")]
    Equal,
    /// The actual version must be greater than the required one.
    #[strum(serialize = ">")]
    Greater,
}

impl VersionComparison {
    /// Returns `true` if the result of a comparison between the actual and
    /// required package versions satisfies the comparison function.
    fn is_compatible_with(self, ordering: Ordering) -> bool {
        matches!(
            (self, ordering),
            (VersionComparison::Less, Ordering::Less)
                | (
                    VersionComparison::LessOrEqual,
                    Ordering::Less | Ordering::Equal
                )
                | (
                    VersionComparison::Equal | VersionComparison::Fuzzy,
                    Ordering::Equal
                )
                | (
                    VersionComparison::GreaterOrEqual,
                    Ordering::Greater | Ordering::Equal
                )
                | (VersionComparison::Greater, Ordering::Greater)
        )
    }

    /// Returns `true` if the comparison holds for `actual` against
    /// `required`.
    ///
    /// ## Examples
    /// ```
    /// use std::str::FromStr;
    ///
    /// use apk_types::{Version, VersionComparison};
    ///
    /// # fn main() -> Result<(), apk_types::Error> {
    /// let actual = Version::from_str("1.6")?;
    /// let required = Version::from_str("1.5")?;
    ///
    /// assert!(VersionComparison::GreaterOrEqual.satisfied_by(&actual, &required));
    /// assert!(!VersionComparison::Equal.satisfied_by(&actual, &required));
    /// # Ok(())
    /// # }
    /// ```
    pub fn satisfied_by(self, actual: &Version, required: &Version) -> bool {
        match self {
            VersionComparison::Fuzzy => actual.fuzzy_equals(required),
            _ => self.is_compatible_with(actual.cmp(required)),
        }
    }
}
