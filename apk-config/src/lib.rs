#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod architecture;
pub use architecture::read_architecture;
pub use architecture::write_architecture;

mod error;
pub use error::Error;

mod keys;
pub use keys::SigningKey;
pub use keys::read_keys;

mod repositories;
pub use repositories::Repositories;
pub use repositories::Repository;
