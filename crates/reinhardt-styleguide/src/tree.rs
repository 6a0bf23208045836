//! Demo page tree.
//!
//! The tree is one root page above all existing top-level pages, with one
//! page per main table directly below it. The table pages are declared as a
//! sibling chain (each inserted after the previous one) so the listing shows
//! them in population order.

use indexmap::IndexMap;
use serde_json::Value;

use crate::datamap::{
	DataMap, NewRecord, Parent, Placeholder, RecordRef, SORTING_STEP, SubstitutionMap,
};
use crate::error::{StyleguideError, StyleguideResult};
use crate::settings::StyleguideSettings;

/// Sorting value that places a new top-level page above all existing ones.
pub fn root_sorting(lowest_top_level: Option<i64>) -> i64 {
	lowest_top_level.map_or(SORTING_STEP, |lowest| lowest.saturating_sub(SORTING_STEP))
}

/// Page batch that has not been submitted yet.
#[derive(Debug, Clone)]
pub struct PendingPageTree {
	/// Rows to submit.
	pub data: DataMap,
	/// Placeholder of the root page.
	pub root: Placeholder,
	/// Placeholder of each main table page, in population order.
	pub pages: IndexMap<String, Placeholder>,
}

impl PendingPageTree {
	/// Maps the placeholders to the uids assigned by the mutation subsystem.
	///
	/// # Errors
	///
	/// Returns `StyleguideError::Mutation` if a page placeholder was not resolved.
	pub fn resolve(&self, substitutions: &SubstitutionMap) -> StyleguideResult<PageTree> {
		let lookup = |placeholder: &Placeholder| {
			substitutions.uid(placeholder).ok_or_else(|| {
				StyleguideError::Mutation(format!("page placeholder {placeholder} was not resolved"))
			})
		};

		let root_uid = lookup(&self.root)?;
		let mut page_uids = IndexMap::with_capacity(self.pages.len());
		for (table, placeholder) in &self.pages {
			page_uids.insert(table.clone(), lookup(placeholder)?);
		}

		Ok(PageTree {
			root_uid,
			page_uids,
		})
	}
}

/// Stored demo page tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTree {
	/// Uid of the root page.
	pub root_uid: u64,
	/// Uid of each main table page, in population order.
	pub page_uids: IndexMap<String, u64>,
}

impl PageTree {
	/// Returns the page uid of a main table.
	pub fn page_of(&self, table: &str) -> Option<u64> {
		self.page_uids.get(table).copied()
	}
}

/// Builds the page batch for a list of main tables.
#[derive(Debug, Clone, Copy)]
pub struct PageTreeBuilder<'a> {
	settings: &'a StyleguideSettings,
}

impl<'a> PageTreeBuilder<'a> {
	/// Creates a builder.
	pub fn new(settings: &'a StyleguideSettings) -> Self {
		Self { settings }
	}

	/// Builds the page batch.
	///
	/// `lowest_top_level` is the lowest `sorting` among existing top-level pages.
	pub fn build<S: AsRef<str>>(&self, main_tables: &[S], lowest_top_level: Option<i64>) -> PendingPageTree {
		let page_table = self.settings.page_table.as_str();
		let marker = self.settings.markers.page_field.as_str();

		let mut data = DataMap::new();
		let root = data.insert(
			page_table,
			NewRecord::new(Parent::Page(RecordRef::Uid(0)))
				.with_field("title", self.settings.root_page_title.as_str())
				.with_field("hidden", 0)
				.with_field("sorting", root_sorting(lowest_top_level))
				.with_field(marker, self.settings.markers.root_value.as_str()),
		);

		let mut pages = IndexMap::with_capacity(main_tables.len());
		let mut previous: Option<Placeholder> = None;
		for table in main_tables {
			let table = table.as_ref();
			let parent = match &previous {
				None => Parent::Page(RecordRef::from(&root)),
				Some(sibling) => Parent::After(RecordRef::from(sibling)),
			};
			let placeholder = data.insert(
				page_table,
				NewRecord::new(parent)
					.with_field("title", table)
					.with_field("hidden", 0)
					.with_field(marker, Value::from(table)),
			);
			pages.insert(table.to_string(), placeholder.clone());
			previous = Some(placeholder);
		}

		PendingPageTree { data, root, pages }
	}
}
