//! Entry points for creating and deleting the demo data.

use std::sync::Arc;

use crate::backend::{DataHandler, PageTreeListener, RecordStore};
use crate::classifier::TableClassifier;
use crate::error::StyleguideResult;
use crate::generator::{GeneratorContext, GeneratorRegistry};
use crate::hasher::CredentialHasher;
use crate::orderer::order_main_tables;
use crate::populator::ThirdPartyPopulator;
use crate::remover::{RemovalReport, Remover};
use crate::schema::SchemaRegistry;
use crate::settings::StyleguideSettings;
use crate::storage::AssetStorage;
use crate::tree::{PageTree, PageTreeBuilder};

/// Creates and deletes the styleguide demo data.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use reinhardt_styleguide::prelude::*;
///
/// # async fn example() -> StyleguideResult<()> {
/// let db = Arc::new(InMemoryDatabase::new());
/// let schema = StaticSchemaRegistry::from_json_str(
/// 	r#"{"tx_styleguide_staticdata": {"columns": {}}}"#,
/// )?;
/// let styleguide = Styleguide::new(
/// 	Arc::new(StyleguideSettings::default()),
/// 	db.clone(),
/// 	db.clone(),
/// 	Arc::new(schema),
/// 	Arc::new(LocalAssetStorage::new("/var/www/fileadmin")?),
/// 	Arc::new(Argon2CredentialHasher::new()),
/// );
///
/// let tree = styleguide.create().await?;
/// println!("demo root page: {}", tree.root_uid);
/// styleguide.delete().await?;
/// # Ok(())
/// # }
/// ```
pub struct Styleguide {
	settings: Arc<StyleguideSettings>,
	data_handler: Arc<dyn DataHandler>,
	records: Arc<dyn RecordStore>,
	schema: Arc<dyn SchemaRegistry>,
	storage: Arc<dyn AssetStorage>,
	hasher: Arc<dyn CredentialHasher>,
	registry: GeneratorRegistry,
	listener: Option<Arc<dyn PageTreeListener>>,
}

impl Styleguide {
	/// Creates a styleguide using the built-in generators.
	pub fn new(
		settings: Arc<StyleguideSettings>,
		data_handler: Arc<dyn DataHandler>,
		records: Arc<dyn RecordStore>,
		schema: Arc<dyn SchemaRegistry>,
		storage: Arc<dyn AssetStorage>,
		hasher: Arc<dyn CredentialHasher>,
	) -> Self {
		Self {
			settings,
			data_handler,
			records,
			schema,
			storage,
			hasher,
			registry: GeneratorRegistry::with_defaults(),
			listener: None,
		}
	}

	/// Replaces the generator registry.
	pub fn with_registry(mut self, registry: GeneratorRegistry) -> Self {
		self.registry = registry;
		self
	}

	/// Sets the listener notified after the page tree changed.
	pub fn with_listener(mut self, listener: Arc<dyn PageTreeListener>) -> Self {
		self.listener = Some(listener);
		self
	}

	/// Returns the settings.
	pub fn settings(&self) -> &StyleguideSettings {
		&self.settings
	}

	/// Returns the generator registry.
	pub fn registry(&self) -> &GeneratorRegistry {
		&self.registry
	}

	/// Returns the main tables in population order.
	pub fn main_tables(&self) -> Vec<String> {
		let classifier = TableClassifier::new(
			self.settings.table_prefixes.clone(),
			self.settings.static_table.as_str(),
		);
		order_main_tables(self.schema.table_names(), &classifier)
	}

	/// Builds the demo page tree, seeds accounts and assets, and populates
	/// every main table.
	///
	/// Each call adds a new tree; earlier trees are left alone.
	///
	/// # Errors
	///
	/// Stops at the first failure. Rows created before the failure stay in
	/// place; [`delete`](Self::delete) removes them. A main table no
	/// generator claims fails with `StyleguideError::NoGeneratorFound`.
	pub async fn create(&self) -> StyleguideResult<PageTree> {
		self.settings.validate()?;

		let tables = self.main_tables();
		tracing::info!(tables = tables.len(), "creating styleguide demo data");

		let lowest = self
			.records
			.lowest_sorting(&self.settings.page_table, 0)
			.await?;
		let mut pending = PageTreeBuilder::new(&self.settings).build(&tables, lowest);
		let data = std::mem::take(&mut pending.data);
		let substitutions = self.data_handler.process_data_map(data).await?;
		let pages = pending.resolve(&substitutions)?;
		tracing::debug!(root = pages.root_uid, "created demo page tree");
		if let Some(listener) = &self.listener {
			listener.page_tree_changed();
		}

		self.populator().populate().await?;

		let ctx = GeneratorContext {
			settings: self.settings.clone(),
			data_handler: self.data_handler.clone(),
			records: self.records.clone(),
			schema: self.schema.clone(),
			pages,
		};
		for table in &tables {
			self.registry.populate(table, &ctx).await?;
		}

		tracing::info!(root = ctx.pages.root_uid, "created styleguide demo data");
		Ok(ctx.pages)
	}

	/// Deletes all demo pages, rows, accounts, groups and the asset folder.
	///
	/// # Errors
	///
	/// Invalid settings fail with `StyleguideError::InvalidSettings` before
	/// anything is deleted.
	pub async fn delete(&self) -> StyleguideResult<RemovalReport> {
		self.settings.validate()?;
		tracing::info!("deleting styleguide demo data");
		let mut remover = Remover::new(
			self.settings.clone(),
			self.data_handler.clone(),
			self.records.clone(),
			self.storage.clone(),
		);
		if let Some(listener) = &self.listener {
			remover = remover.with_listener(listener.clone());
		}
		remover.delete_all().await
	}

	fn populator(&self) -> ThirdPartyPopulator {
		ThirdPartyPopulator::new(
			self.settings.clone(),
			self.data_handler.clone(),
			self.records.clone(),
			self.storage.clone(),
			self.hasher.clone(),
		)
	}
}

impl std::fmt::Debug for Styleguide {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Styleguide")
			.field("settings", &self.settings)
			.field("registry", &self.registry)
			.field("listener", &self.listener.is_some())
			.finish_non_exhaustive()
	}
}
