//! Removal of everything the generator created.

use std::sync::Arc;

use serde_json::Value;

use crate::backend::{DataHandler, PageTreeListener, RecordStore};
use crate::datamap::CommandMap;
use crate::error::{StyleguideError, StyleguideResult};
use crate::settings::StyleguideSettings;
use crate::storage::AssetStorage;

/// Summary of one removal run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalReport {
	/// Demo root pages deleted, each with its whole subtree.
	pub root_pages: usize,
	/// Demo accounts deleted.
	pub accounts: usize,
	/// Demo groups deleted.
	pub groups: usize,
	/// True if the asset folder existed and was deleted.
	pub asset_folder: bool,
}

/// Deletes all demo pages, accounts, groups and the asset folder.
pub struct Remover {
	settings: Arc<StyleguideSettings>,
	data_handler: Arc<dyn DataHandler>,
	records: Arc<dyn RecordStore>,
	storage: Arc<dyn AssetStorage>,
	listener: Option<Arc<dyn PageTreeListener>>,
}

impl Remover {
	/// Creates a remover.
	pub fn new(
		settings: Arc<StyleguideSettings>,
		data_handler: Arc<dyn DataHandler>,
		records: Arc<dyn RecordStore>,
		storage: Arc<dyn AssetStorage>,
	) -> Self {
		Self {
			settings,
			data_handler,
			records,
			storage,
			listener: None,
		}
	}

	/// Sets the listener notified after the page tree changed.
	pub fn with_listener(mut self, listener: Arc<dyn PageTreeListener>) -> Self {
		self.listener = Some(listener);
		self
	}

	/// Deletes every demo root page, demo account and demo group in one
	/// command batch, then deletes the asset folder.
	///
	/// Running it when nothing exists is a no-op. Demo rows on pages outside
	/// a demo tree are not found and are left in place.
	pub async fn delete_all(&self) -> StyleguideResult<RemovalReport> {
		let markers = &self.settings.markers;
		let accounts = &self.settings.accounts;
		let demo_record = Value::from(1);

		let root_pages = self
			.records
			.find_uids(
				&self.settings.page_table,
				&markers.page_field,
				&Value::from(markers.root_value.as_str()),
			)
			.await?;
		let users = self
			.records
			.find_uids(&accounts.account_table, &markers.record_field, &demo_record)
			.await?;
		let groups = self
			.records
			.find_uids(&accounts.group_table, &markers.record_field, &demo_record)
			.await?;

		let mut commands = CommandMap::new();
		for uid in &root_pages {
			commands.delete(self.settings.page_table.as_str(), *uid);
		}
		for uid in &users {
			commands.delete(accounts.account_table.as_str(), *uid);
		}
		for uid in &groups {
			commands.delete(accounts.group_table.as_str(), *uid);
		}

		if !commands.is_empty() {
			tracing::debug!(commands = commands.len(), "deleting demo records");
			self.data_handler.process_command_map(commands).await?;
		}

		let folder = self.settings.assets.folder.as_str();
		let asset_folder = match self.storage.delete_folder(folder).await {
			Ok(()) => true,
			Err(StyleguideError::NotFound(_)) => {
				tracing::debug!(folder, "asset folder does not exist");
				false
			}
			Err(error) => return Err(error),
		};

		if !root_pages.is_empty() {
			if let Some(listener) = &self.listener {
				listener.page_tree_changed();
			}
		}

		let report = RemovalReport {
			root_pages: root_pages.len(),
			accounts: users.len(),
			groups: groups.len(),
			asset_folder,
		};
		tracing::info!(
			root_pages = report.root_pages,
			accounts = report.accounts,
			groups = report.groups,
			asset_folder = report.asset_folder,
			"removed styleguide demo data"
		);
		Ok(report)
	}
}

impl std::fmt::Debug for Remover {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Remover")
			.field("settings", &self.settings)
			.field("listener", &self.listener.is_some())
			.finish_non_exhaustive()
	}
}
