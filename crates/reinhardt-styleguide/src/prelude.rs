//! Convenience re-exports for common usage.
//!
//! # Example
//!
//! ```ignore
//! use reinhardt_styleguide::prelude::*;
//! ```

// Error types
pub use crate::error::{StyleguideError, StyleguideResult};

// Settings
pub use crate::settings::{AccountSettings, AssetSettings, MarkerSettings, StyleguideSettings};

// Table classification
pub use crate::classifier::{FixtureTable, TableClassifier, TableKind, classify};
pub use crate::orderer::order_main_tables;

// Record batches
pub use crate::datamap::{
	CommandMap, DataMap, NewRecord, Parent, Placeholder, RecordRef, SubstitutionMap,
};

// Collaborators
pub use crate::backend::{DataHandler, InMemoryDatabase, PageTreeListener, RecordStore};
pub use crate::hasher::{CredentialHasher, generate_secret};
pub use crate::schema::{ColumnKind, SchemaRegistry, StaticSchemaRegistry, TableSchema};
pub use crate::storage::AssetStorage;

#[cfg(feature = "argon2-hasher")]
pub use crate::hasher::Argon2CredentialHasher;
#[cfg(feature = "local-storage")]
pub use crate::storage::LocalAssetStorage;

// Generators
pub use crate::generator::{
	FixtureGenerator, GeneralGenerator, GeneratorContext, GeneratorRegistry, InlineMmGenerator,
	StaticDataGenerator,
};

// Orchestration
pub use crate::commands::{StyleguideAction, StyleguideCommand, StyleguideOptions, StyleguideOutcome};
pub use crate::populator::ThirdPartyPopulator;
pub use crate::remover::{RemovalReport, Remover};
pub use crate::styleguide::Styleguide;
pub use crate::tree::{PageTree, PageTreeBuilder};
