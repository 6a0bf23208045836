//! In-memory record store and mutation subsystem.
//!
//! Used by the test suite and for dry runs. Every batch is applied to a
//! staged copy and swapped in only when the whole batch succeeded.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use super::{DataHandler, RecordStore};
use crate::datamap::{
	CommandMap, DataMap, Parent, RecordCommand, RecordRef, Row, SORTING_STEP, SubstitutionMap,
};
use crate::error::{StyleguideError, StyleguideResult};

#[derive(Debug, Clone, Default)]
struct Tables {
	rows: HashMap<String, BTreeMap<u64, Row>>,
	next_uid: HashMap<String, u64>,
}

impl Tables {
	fn allocate(&mut self, table: &str) -> u64 {
		let next = self.next_uid.entry(table.to_string()).or_insert(1);
		let uid = *next;
		*next += 1;
		uid
	}

	fn lowest_sorting(&self, table: &str, pid: u64) -> Option<i64> {
		self.rows
			.get(table)?
			.values()
			.filter(|row| pid_of(row) == pid)
			.map(sorting_of)
			.min()
	}

	fn shift_siblings_after(&mut self, table: &str, pid: u64, sorting: i64) {
		if let Some(rows) = self.rows.get_mut(table) {
			for row in rows.values_mut() {
				if pid_of(row) == pid && sorting_of(row) > sorting {
					let shifted = sorting_of(row).saturating_add(SORTING_STEP);
					row.insert("sorting".to_string(), Value::from(shifted));
				}
			}
		}
	}

	fn remove_page_subtree(&mut self, page_table: &str, uid: u64) {
		let Some(pages) = self.rows.get_mut(page_table) else {
			return;
		};
		if pages.remove(&uid).is_none() {
			return;
		}

		let mut removed = HashSet::from([uid]);
		let mut frontier = vec![uid];
		while let Some(parent) = frontier.pop() {
			let children: Vec<u64> = pages
				.iter()
				.filter(|(_, row)| pid_of(row) == parent)
				.map(|(uid, _)| *uid)
				.collect();
			for child in children {
				pages.remove(&child);
				removed.insert(child);
				frontier.push(child);
			}
		}

		for rows in self.rows.values_mut() {
			rows.retain(|_, row| !removed.contains(&pid_of(row)));
		}
	}
}

fn pid_of(row: &Row) -> u64 {
	row.get("pid").and_then(Value::as_u64).unwrap_or(0)
}

fn sorting_of(row: &Row) -> i64 {
	row.get("sorting").and_then(Value::as_i64).unwrap_or(0)
}

/// Thread-safe in-memory implementation of [`DataHandler`] and [`RecordStore`].
///
/// Rows are JSON objects carrying `uid`, `pid` and `sorting` columns in
/// addition to their fields. Deleting a row of the page table removes the
/// page, all pages below it, and every row of any table stored on one of
/// those pages.
#[derive(Debug)]
pub struct InMemoryDatabase {
	page_table: String,
	tables: RwLock<Tables>,
}

impl Default for InMemoryDatabase {
	fn default() -> Self {
		Self::new()
	}
}

impl InMemoryDatabase {
	/// Creates an empty database whose page table is `pages`.
	pub fn new() -> Self {
		Self::with_page_table("pages")
	}

	/// Creates an empty database with a custom page table name.
	pub fn with_page_table(page_table: impl Into<String>) -> Self {
		Self {
			page_table: page_table.into(),
			tables: RwLock::new(Tables::default()),
		}
	}

	/// Stores a row directly, bypassing placeholder handling. Returns its uid.
	///
	/// Missing `pid` and `sorting` columns default to 0.
	pub fn insert_row(&self, table: &str, mut row: Row) -> u64 {
		let mut tables = self.tables.write();
		let uid = tables.allocate(table);
		row.insert("uid".to_string(), Value::from(uid));
		row.entry("pid").or_insert(Value::from(0u64));
		row.entry("sorting").or_insert(Value::from(0i64));
		tables.rows.entry(table.to_string()).or_default().insert(uid, row);
		uid
	}

	/// Returns a copy of a row.
	pub fn row(&self, table: &str, uid: u64) -> Option<Row> {
		self.tables.read().rows.get(table)?.get(&uid).cloned()
	}

	/// Returns copies of all rows of `table` in uid order.
	pub fn rows(&self, table: &str) -> Vec<Row> {
		self.tables
			.read()
			.rows
			.get(table)
			.map(|rows| rows.values().cloned().collect())
			.unwrap_or_default()
	}

	/// Returns the number of rows in `table`.
	pub fn count(&self, table: &str) -> usize {
		self.tables.read().rows.get(table).map_or(0, BTreeMap::len)
	}

	/// Returns the number of rows in `table` whose `field` equals `value`.
	pub fn count_where(&self, table: &str, field: &str, value: &Value) -> usize {
		self.tables.read().rows.get(table).map_or(0, |rows| {
			rows.values()
				.filter(|row| row.get(field) == Some(value))
				.count()
		})
	}

	/// Returns the names of all tables holding at least one row.
	pub fn table_names(&self) -> Vec<String> {
		let tables = self.tables.read();
		let mut names: Vec<String> = tables
			.rows
			.iter()
			.filter(|(_, rows)| !rows.is_empty())
			.map(|(name, _)| name.clone())
			.collect();
		names.sort();
		names
	}

	/// Returns the uids of the rows on page `pid` of `table`, ordered by `sorting`.
	pub fn children_in_order(&self, table: &str, pid: u64) -> Vec<u64> {
		let tables = self.tables.read();
		let Some(rows) = tables.rows.get(table) else {
			return Vec::new();
		};
		let mut children: Vec<(i64, u64)> = rows
			.iter()
			.filter(|(_, row)| pid_of(row) == pid)
			.map(|(uid, row)| (sorting_of(row), *uid))
			.collect();
		children.sort();
		children.into_iter().map(|(_, uid)| uid).collect()
	}
}

fn resolve(substitutions: &SubstitutionMap, reference: &RecordRef) -> StyleguideResult<u64> {
	substitutions.resolve(reference).ok_or_else(|| {
		StyleguideError::Mutation(format!("unresolved placeholder reference: {reference:?}"))
	})
}

#[async_trait]
impl DataHandler for InMemoryDatabase {
	async fn process_data_map(&self, data: DataMap) -> StyleguideResult<SubstitutionMap> {
		let mut tables = self.tables.write();
		let mut staged = tables.clone();

		let mut substitutions = SubstitutionMap::new();
		for (table, placeholder, _) in data.iter() {
			let uid = staged.allocate(table);
			substitutions.insert(placeholder.clone(), uid);
		}

		for (table, placeholder, record) in data.iter() {
			let uid = resolve(&substitutions, &RecordRef::Placeholder(placeholder.clone()))?;
			let mut row = record.fields.clone();

			for (field, references) in &record.references {
				let uids = references
					.iter()
					.map(|reference| resolve(&substitutions, reference).map(|uid| uid.to_string()))
					.collect::<StyleguideResult<Vec<_>>>()?;
				row.insert(field.clone(), Value::from(uids.join(",")));
			}
			for (field, target) in &record.relations {
				row.insert(field.clone(), Value::from(resolve(&substitutions, target)?));
			}

			let (pid, sorting) = match &record.parent {
				Parent::Page(page) => {
					let pid = resolve(&substitutions, page)?;
					let sorting = match row.get("sorting").and_then(Value::as_i64) {
						Some(explicit) => explicit,
						None => staged
							.lowest_sorting(table, pid)
							.map_or(SORTING_STEP, |lowest| lowest.saturating_sub(SORTING_STEP)),
					};
					(pid, sorting)
				}
				Parent::After(sibling) => {
					let sibling_uid = resolve(&substitutions, sibling)?;
					let sibling_row = staged
						.rows
						.get(table)
						.and_then(|rows| rows.get(&sibling_uid))
						.ok_or_else(|| {
							StyleguideError::Mutation(format!(
								"cannot insert after missing row {table}:{sibling_uid}"
							))
						})?;
					let pid = pid_of(sibling_row);
					let after = sorting_of(sibling_row);
					staged.shift_siblings_after(table, pid, after);
					(pid, after.saturating_add(SORTING_STEP))
				}
			};

			row.insert("uid".to_string(), Value::from(uid));
			row.insert("pid".to_string(), Value::from(pid));
			row.insert("sorting".to_string(), Value::from(sorting));
			staged.rows.entry(table.to_string()).or_default().insert(uid, row);
		}

		*tables = staged;
		Ok(substitutions)
	}

	async fn process_command_map(&self, commands: CommandMap) -> StyleguideResult<()> {
		let mut tables = self.tables.write();
		let mut staged = tables.clone();

		for (table, uid, command) in commands.iter() {
			match command {
				RecordCommand::Delete if table == self.page_table => {
					staged.remove_page_subtree(&self.page_table, uid);
				}
				RecordCommand::Delete => {
					if let Some(rows) = staged.rows.get_mut(table) {
						rows.remove(&uid);
					}
				}
			}
		}

		*tables = staged;
		Ok(())
	}
}

#[async_trait]
impl RecordStore for InMemoryDatabase {
	async fn find_uids(&self, table: &str, field: &str, value: &Value) -> StyleguideResult<Vec<u64>> {
		let tables = self.tables.read();
		Ok(tables
			.rows
			.get(table)
			.map(|rows| {
				rows.iter()
					.filter(|(_, row)| row.get(field) == Some(value))
					.map(|(uid, _)| *uid)
					.collect()
			})
			.unwrap_or_default())
	}

	async fn lowest_sorting(&self, table: &str, pid: u64) -> StyleguideResult<Option<i64>> {
		Ok(self.tables.read().lowest_sorting(table, pid))
	}
}
