//! Fixture generators.
//!
//! Each main table is populated by exactly one [`FixtureGenerator`]. The
//! [`GeneratorRegistry`] holds the generators in priority order and hands a
//! table to the first one whose [`matches`](FixtureGenerator::matches)
//! returns true. A table nobody claims is a setup error and aborts the run.
//!
//! Built-in generators, in default priority order:
//!
//! - [`StaticDataGenerator`] - the reserved lookup table
//! - [`InlineMmGenerator`] - tables with many-to-many inline columns
//! - [`GeneralGenerator`] - any other table known to the schema registry

pub mod fields;
pub mod general;
pub mod inline_mm;
pub mod static_data;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::{DataHandler, RecordStore};
use crate::error::{StyleguideError, StyleguideResult};
use crate::schema::SchemaRegistry;
use crate::settings::StyleguideSettings;
use crate::tree::PageTree;

pub use fields::{RecordBuilder, field_value};
pub use general::GeneralGenerator;
pub use inline_mm::InlineMmGenerator;
pub use static_data::StaticDataGenerator;

/// Everything a generator may use while populating a table.
///
/// Generators are stateless; rows written by earlier generators are visible
/// through [`records`](Self::records).
#[derive(Clone)]
pub struct GeneratorContext {
	/// Generator settings.
	pub settings: Arc<StyleguideSettings>,
	/// Record-mutation subsystem.
	pub data_handler: Arc<dyn DataHandler>,
	/// Record lookups.
	pub records: Arc<dyn RecordStore>,
	/// Table layouts.
	pub schema: Arc<dyn SchemaRegistry>,
	/// Stored demo page tree.
	pub pages: PageTree,
}

impl GeneratorContext {
	/// Returns the page uid of a main table.
	///
	/// # Errors
	///
	/// Returns `StyleguideError::NotFound` if the table has no page in the tree.
	pub fn page_of(&self, table: &str) -> StyleguideResult<u64> {
		self.pages
			.page_of(table)
			.ok_or_else(|| StyleguideError::NotFound(format!("demo page for table {table}")))
	}

	/// Returns the record marker field.
	pub fn record_marker_field(&self) -> &str {
		&self.settings.markers.record_field
	}

	/// Returns the record marker value.
	pub fn record_marker_value(&self) -> Value {
		Value::from(1)
	}
}

impl std::fmt::Debug for GeneratorContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GeneratorContext")
			.field("settings", &self.settings)
			.field("pages", &self.pages)
			.finish_non_exhaustive()
	}
}

/// Strategy that populates one kind of main table.
#[async_trait]
pub trait FixtureGenerator: Send + Sync {
	/// Short name used in log output.
	fn name(&self) -> &str;

	/// Returns true if this generator is responsible for `table`.
	fn matches(&self, table: &str, ctx: &GeneratorContext) -> bool;

	/// Creates the demo rows of `table` and of its child tables.
	///
	/// Every created row must carry the record marker.
	async fn populate(&self, table: &str, ctx: &GeneratorContext) -> StyleguideResult<()>;
}

/// Generators in priority order.
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
	generators: Vec<Arc<dyn FixtureGenerator>>,
}

impl GeneratorRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry holding the built-in generators.
	pub fn with_defaults() -> Self {
		Self::new()
			.with(StaticDataGenerator::new())
			.with(InlineMmGenerator::new())
			.with(GeneralGenerator::new())
	}

	/// Appends a generator with the lowest priority so far.
	pub fn with<G: FixtureGenerator + 'static>(mut self, generator: G) -> Self {
		self.register(generator);
		self
	}

	/// Appends a generator with the lowest priority so far.
	pub fn register<G: FixtureGenerator + 'static>(&mut self, generator: G) -> &mut Self {
		self.generators.push(Arc::new(generator));
		self
	}

	/// Returns the generator names in priority order.
	pub fn names(&self) -> Vec<&str> {
		self.generators.iter().map(|generator| generator.name()).collect()
	}

	/// Returns the number of registered generators.
	pub fn len(&self) -> usize {
		self.generators.len()
	}

	/// Returns true if no generator is registered.
	pub fn is_empty(&self) -> bool {
		self.generators.is_empty()
	}

	/// Returns the first generator that matches `table`.
	///
	/// # Errors
	///
	/// Returns `StyleguideError::NoGeneratorFound` if none matches.
	pub fn find(&self, table: &str, ctx: &GeneratorContext) -> StyleguideResult<Arc<dyn FixtureGenerator>> {
		self.generators
			.iter()
			.find(|generator| generator.matches(table, ctx))
			.cloned()
			.ok_or_else(|| StyleguideError::NoGeneratorFound(table.to_string()))
	}

	/// Populates `table` with the first matching generator.
	pub async fn populate(&self, table: &str, ctx: &GeneratorContext) -> StyleguideResult<()> {
		let generator = match self.find(table, ctx) {
			Ok(generator) => generator,
			Err(error) => {
				tracing::warn!(table, "no fixture generator matches table");
				return Err(error);
			}
		};
		tracing::debug!(table, generator = generator.name(), "populating table");
		generator.populate(table, ctx).await
	}
}

impl std::fmt::Debug for GeneratorRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GeneratorRegistry")
			.field("generators", &self.names())
			.finish()
	}
}

#[cfg(test)]
pub(crate) mod test_support {
	use super::*;
	use crate::backend::InMemoryDatabase;
	use crate::schema::StaticSchemaRegistry;
	use indexmap::IndexMap;

	/// Context over an in-memory database with one page per table in `tables`.
	pub(crate) fn context(
		schema: StaticSchemaRegistry,
		tables: &[&str],
	) -> (GeneratorContext, Arc<InMemoryDatabase>) {
		let db = Arc::new(InMemoryDatabase::new());
		let mut page_uids = IndexMap::new();
		for (index, table) in tables.iter().enumerate() {
			page_uids.insert(table.to_string(), 100 + index as u64);
		}
		let ctx = GeneratorContext {
			settings: Arc::new(StyleguideSettings::default()),
			data_handler: db.clone(),
			records: db.clone(),
			schema: Arc::new(schema),
			pages: PageTree {
				root_uid: 99,
				page_uids,
			},
		};
		(ctx, db)
	}
}
