#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Error types for hash table construction.
pub mod error;

/// A hash table using separate chaining.
///
/// This module provides the `HashTable` along with its bucket view and
/// iterators.
pub mod hash_table;

/// The fixed hash function used to place keys in buckets.
pub mod hasher;

pub use error::Error;
pub use error::Result;
pub use hash_table::HashTable;
pub use hasher::DefaultHashBuilder;
