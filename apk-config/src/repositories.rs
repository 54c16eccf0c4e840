//! The repositories configuration file.

use std::{
    fmt::{Display, Formatter},
    fs,
    path::Path,
    str::FromStr,
};

use log::debug;

use crate::Error;

/// A single repository entry: an optional pin tag and the repository URL.
///
/// On disk a repository is one line of the form `url` or `@tag url`. The tag
/// becomes the pin label of the index loaded from the URL, so constraints of
/// the form `name@tag` can prefer or require it.
///
/// ## Examples
/// ```
/// use std::str::FromStr;
///
/// use apk_config::Repository;
///
/// # fn main() -> Result<(), apk_config::Error> {
/// let plain = Repository::from_str("https://dl-cdn.alpinelinux.org/alpine/v3.19/main")?;
/// assert_eq!(None, plain.tag);
///
/// let tagged = Repository::from_str("@edge https://dl-cdn.alpinelinux.org/alpine/edge/main")?;
/// assert_eq!(Some("edge".to_string()), tagged.tag);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Repository {
    /// The pin tag of the repository, if any.
    pub tag: Option<String>,
    /// The repository URL.
    pub url: String,
}

impl FromStr for Repository {
    type Err = Error;
    /// Parses a single repository line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is empty, carries a tag without a URL,
    /// or contains stray whitespace.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = line.strip_prefix('@') {
            return match rest.split_once(' ') {
                Some((tag, url)) if !tag.is_empty() && !url.is_empty() && !url.contains(' ') => {
                    Ok(Self {
                        tag: Some(tag.to_string()),
                        url: url.to_string(),
                    })
                }
                _ => Err(Error::InvalidRepository(line.to_string())),
            };
        }
        if line.is_empty() || line.contains(' ') {
            return Err(Error::InvalidRepository(line.to_string()));
        }
        Ok(Self {
            tag: None,
            url: line.to_string(),
        })
    }
}

impl Display for Repository {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        if let Some(tag) = &self.tag {
            write!(fmt, "@{tag} ")?;
        }
        write!(fmt, "{}", self.url)
    }
}

/// The ordered contents of a repositories file.
///
/// The file lists one repository per line and requires a trailing newline;
/// blank lines are ignored on read.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Repositories(Vec<Repository>);

impl Repositories {
    /// Creates a new list of repositories.
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self(repositories)
    }

    /// Reads a repositories file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is missing its trailing
    /// newline, or contains an invalid line.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("Reading repositories file {path:?}.");
        let contents = fs::read_to_string(path).map_err(|source| Error::IoPath {
            path: path.to_path_buf(),
            context: "reading the repositories file",
            source,
        })?;
        if !contents.is_empty() && !contents.ends_with('\n') {
            return Err(Error::MissingTrailingNewline {
                path: path.to_path_buf(),
            });
        }
        contents.parse()
    }

    /// Writes the repositories file, with the required trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        fs::write(path, self.to_string()).map_err(|source| Error::IoPath {
            path: path.to_path_buf(),
            context: "writing the repositories file",
            source,
        })
    }
}

impl FromStr for Repositories {
    type Err = Error;
    /// Parses the contents of a repositories file, skipping blank lines.
    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(Repository::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Display for Repositories {
    fn fmt(&self, fmt: &mut Formatter) -> std::fmt::Result {
        for repository in &self.0 {
            writeln!(fmt, "{repository}")?;
        }
        Ok(())
    }
}

impl AsRef<[Repository]> for Repositories {
    fn as_ref(&self) -> &[Repository] {
        &self.0
    }
}
