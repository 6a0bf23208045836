//! Styleguide demo data generator for the Reinhardt framework.
//!
//! This crate builds a self-contained demo page tree and fills it with
//! example records for every fixture table known to a schema registry. It
//! also seeds a pair of demo accounts and groups plus a folder of sample
//! assets, and removes all of it again on request.
//!
//! # Features
//!
//! - `argon2-hasher` - Argon2 credential hashing for demo accounts (enabled by default)
//! - `local-storage` - local file system asset storage (enabled by default)
//! - `full` - All features enabled
//!
//! # Quick Start
//!
//! ```ignore
//! use reinhardt_styleguide::prelude::*;
//!
//! let styleguide = Styleguide::new(settings, handler, records, schema, storage, hasher);
//! let tree = styleguide.create().await?;
//! println!("Created demo tree below page {}", tree.root_uid);
//!
//! styleguide.delete().await?;
//! ```
//!
//! # Architecture
//!
//! ## Fixture tables
//!
//! Table names are split by a configurable prefix list:
//!
//! - [`classify`](classifier::classify) - main table, child table, or not a fixture table
//! - [`order_main_tables`](orderer::order_main_tables) - population order, lookup table first
//!
//! ## Creation
//!
//! - [`PageTreeBuilder`](tree::PageTreeBuilder) - demo root page plus one page per main table
//! - [`ThirdPartyPopulator`](populator::ThirdPartyPopulator) - demo accounts, groups and sample assets
//! - [`GeneratorRegistry`](generator::GeneratorRegistry) - first matching [`FixtureGenerator`](generator::FixtureGenerator) per table
//!
//! ## Removal
//!
//! - [`Remover`](remover::Remover) - one command batch for all demo trees, accounts and groups
//!
//! ## Host collaborators
//!
//! All side effects go through injected traits: [`DataHandler`](backend::DataHandler),
//! [`RecordStore`](backend::RecordStore), [`SchemaRegistry`](schema::SchemaRegistry),
//! [`AssetStorage`](storage::AssetStorage) and [`CredentialHasher`](hasher::CredentialHasher).
//! [`InMemoryDatabase`](backend::InMemoryDatabase) implements the record traits for tests.
//!
//! ## Commands
//!
//! - [`StyleguideCommand`](commands::StyleguideCommand) - `create` / `delete` management command

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backend;
pub mod classifier;
pub mod commands;
pub mod datamap;
pub mod error;
pub mod generator;
pub mod hasher;
pub mod orderer;
pub mod populator;
pub mod prelude;
pub mod remover;
pub mod schema;
pub mod settings;
pub mod storage;
pub mod styleguide;
pub mod tree;

// Re-export commonly used types at crate root
pub use error::{StyleguideError, StyleguideResult};
pub use settings::StyleguideSettings;
pub use styleguide::Styleguide;
