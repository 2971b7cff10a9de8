//! In-memory driver for the unifs contract
//!
//! [`RamFileSystem`] implements only the mandatory primitives and inherits
//! every derived operation, which makes it both a usable scratch volume and
//! the reference driver the contract's behavior is validated against.

mod ram;
mod stream;

pub use ram::RamFileSystem;
