#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod constraint;
pub use constraint::Constraint;

mod error;
pub use error::Error;

mod package;
pub use package::Package;

mod version;
pub use version::Version;
pub use version::VersionComparison;
pub use version::VersionSuffix;
