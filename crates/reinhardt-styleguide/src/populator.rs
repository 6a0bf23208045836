//! Baseline accounts, groups and sample assets.
//!
//! Both steps are idempotent in a cheap way. Accounts are only created when
//! no demo group exists; groups and accounts are assumed to be created and
//! deleted together, so removing only one of them by hand leaves the next run
//! skipping (or duplicating) the other. Assets are only copied when the asset
//! folder had to be created; existing folder contents are not inspected.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::backend::{DataHandler, RecordStore};
use crate::datamap::{DataMap, NewRecord, Parent, RecordRef};
use crate::error::StyleguideResult;
use crate::hasher::{CredentialHasher, generate_secret};
use crate::settings::StyleguideSettings;
use crate::storage::AssetStorage;

/// Sample files copied into every fresh asset folder.
pub const SAMPLE_ASSETS: &[(&str, &[u8])] = &[
	(
		"styleguide.svg",
		br##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64"><rect width="64" height="64" fill="#ff8700"/><path d="M16 44l12-24 8 16 4-8 8 16z" fill="#fff"/></svg>
"##,
	),
	(
		"styleguide.txt",
		b"Sample file created by the styleguide demo data generator.\n",
	),
];

/// Seeds accounts, groups and sample files.
pub struct ThirdPartyPopulator {
	settings: Arc<StyleguideSettings>,
	data_handler: Arc<dyn DataHandler>,
	records: Arc<dyn RecordStore>,
	storage: Arc<dyn AssetStorage>,
	hasher: Arc<dyn CredentialHasher>,
}

impl ThirdPartyPopulator {
	/// Creates a populator.
	pub fn new(
		settings: Arc<StyleguideSettings>,
		data_handler: Arc<dyn DataHandler>,
		records: Arc<dyn RecordStore>,
		storage: Arc<dyn AssetStorage>,
		hasher: Arc<dyn CredentialHasher>,
	) -> Self {
		Self {
			settings,
			data_handler,
			records,
			storage,
			hasher,
		}
	}

	/// Runs both seeding steps.
	pub async fn populate(&self) -> StyleguideResult<()> {
		self.ensure_baseline_accounts().await?;
		self.ensure_baseline_assets().await?;
		Ok(())
	}

	/// Creates the two baseline groups and accounts unless a demo group exists.
	///
	/// Returns true if the rows were created.
	pub async fn ensure_baseline_accounts(&self) -> StyleguideResult<bool> {
		let accounts = &self.settings.accounts;
		let marker = self.settings.markers.record_field.as_str();

		let existing = self
			.records
			.find_uids(&accounts.group_table, marker, &Value::from(1))
			.await?;
		if !existing.is_empty() {
			tracing::info!(
				groups = existing.len(),
				"demo groups exist, skipping baseline accounts"
			);
			return Ok(false);
		}

		let top_level = || Parent::Page(RecordRef::Uid(0));
		let mut data = DataMap::new();

		let groups: Vec<RecordRef> = accounts
			.group_titles
			.iter()
			.map(|title| {
				let placeholder = data.insert(
					accounts.group_table.as_str(),
					NewRecord::new(top_level())
						.with_field("title", title.as_str())
						.with_field("hidden", 1)
						.with_field(marker, 1),
				);
				RecordRef::from(placeholder)
			})
			.collect();

		data.insert(
			accounts.account_table.as_str(),
			NewRecord::new(top_level())
				.with_field("username", accounts.editor_username.as_str())
				.with_field("password", self.hasher.hash(&generate_secret())?)
				.with_field("admin", 0)
				.with_field("disable", 1)
				.with_field(marker, 1)
				.with_references("usergroup", groups),
		);
		data.insert(
			accounts.account_table.as_str(),
			NewRecord::new(top_level())
				.with_field("username", accounts.admin_username.as_str())
				.with_field("password", self.hasher.hash(&generate_secret())?)
				.with_field("admin", 1)
				.with_field("disable", 1)
				.with_field(marker, 1),
		);

		self.data_handler.process_data_map(data).await?;
		tracing::info!("created baseline demo groups and accounts");
		Ok(true)
	}

	/// Creates the asset folder and copies the sample files into it.
	///
	/// Returns false without copying anything if the folder already exists.
	pub async fn ensure_baseline_assets(&self) -> StyleguideResult<bool> {
		let folder = self.settings.assets.folder.as_str();

		match self.storage.create_folder(folder).await {
			Ok(()) => {}
			Err(error) if error.is_already_exists() => {
				tracing::info!(folder, "asset folder exists, skipping sample files");
				return Ok(false);
			}
			Err(error) => return Err(error),
		}

		for (name, content) in SAMPLE_ASSETS {
			self.storage.add_file(folder, name, content).await?;
		}

		if let Some(sample_dir) = &self.settings.assets.sample_dir {
			self.copy_sample_dir(folder, sample_dir).await?;
		}

		tracing::info!(folder, "copied sample assets");
		Ok(true)
	}

	async fn copy_sample_dir(&self, folder: &str, sample_dir: &Path) -> StyleguideResult<()> {
		let mut files = Vec::new();
		let mut entries = tokio::fs::read_dir(sample_dir).await?;
		while let Some(entry) = entries.next_entry().await? {
			if entry.file_type().await?.is_file() {
				files.push(entry.path());
			}
		}
		files.sort();

		for path in files {
			let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
				tracing::warn!(path = %path.display(), "skipping sample file with non UTF-8 name");
				continue;
			};
			let content = tokio::fs::read(&path).await?;
			let stored = self.storage.add_file(folder, name, &content).await?;
			tracing::debug!(file = %stored, "copied sample file");
		}
		Ok(())
	}
}

impl std::fmt::Debug for ThirdPartyPopulator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ThirdPartyPopulator")
			.field("settings", &self.settings)
			.finish_non_exhaustive()
	}
}
