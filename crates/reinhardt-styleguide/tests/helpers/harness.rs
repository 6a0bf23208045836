//! Styleguide test harness.
//!
//! Wires a [`Styleguide`] to an in-memory database, the bundled test schema
//! and a local asset storage inside a temporary directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use reinhardt_styleguide::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Schema used by the integration tests.
pub const SCHEMA_JSON: &str = include_str!("../data/styleguide_schema.json");

/// Hasher producing a fixed, recognisable credential.
#[derive(Debug, Default)]
pub struct FixedHasher;

impl CredentialHasher for FixedHasher {
	fn hash(&self, secret: &[u8]) -> StyleguideResult<String> {
		Ok(format!("fixed${}", secret.len()))
	}
}

/// Listener counting page tree notifications.
#[derive(Debug, Default)]
pub struct CountingListener {
	calls: AtomicUsize,
}

impl CountingListener {
	/// Returns the number of notifications received.
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl PageTreeListener for CountingListener {
	fn page_tree_changed(&self) {
		self.calls.fetch_add(1, Ordering::SeqCst);
	}
}

/// A styleguide with its collaborators exposed for assertions.
pub struct StyleguideHarness {
	pub db: Arc<InMemoryDatabase>,
	pub dir: TempDir,
	pub listener: Arc<CountingListener>,
	pub styleguide: Styleguide,
}

impl StyleguideHarness {
	/// Creates a harness with default settings and the built-in generators.
	pub fn new() -> Self {
		Self::with(StyleguideSettings::default(), GeneratorRegistry::with_defaults())
	}

	/// Creates a harness with custom settings and generators.
	pub fn with(settings: StyleguideSettings, registry: GeneratorRegistry) -> Self {
		let dir = TempDir::new().unwrap();
		let db = Arc::new(InMemoryDatabase::with_page_table(settings.page_table.clone()));
		let listener = Arc::new(CountingListener::default());
		let schema = StaticSchemaRegistry::from_json_str(SCHEMA_JSON).unwrap();
		let styleguide = Styleguide::new(
			Arc::new(settings),
			db.clone(),
			db.clone(),
			Arc::new(schema),
			Arc::new(LocalAssetStorage::new(dir.path()).unwrap()),
			Arc::new(FixedHasher),
		)
		.with_registry(registry)
		.with_listener(listener.clone());

		Self {
			db,
			dir,
			listener,
			styleguide,
		}
	}

	/// Returns the path of the asset folder.
	pub fn asset_folder(&self) -> PathBuf {
		self.dir
			.path()
			.join(&self.styleguide.settings().assets.folder)
	}

	/// Returns the number of rows in `table` carrying the record marker.
	pub fn marked_records(&self, table: &str) -> usize {
		let field = &self.styleguide.settings().markers.record_field;
		self.db.count_where(table, field, &Value::from(1))
	}

	/// Returns the number of demo root pages.
	pub fn root_pages(&self) -> usize {
		let settings = self.styleguide.settings();
		self.db.count_where(
			&settings.page_table,
			&settings.markers.page_field,
			&Value::from(settings.markers.root_value.as_str()),
		)
	}
}
