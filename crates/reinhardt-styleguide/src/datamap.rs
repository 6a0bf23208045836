//! Batches submitted to the record-mutation subsystem.
//!
//! A [`DataMap`] describes rows that do not exist yet. Each row is keyed by a
//! [`Placeholder`]; rows reference each other (as parent page, as preceding
//! sibling, or through relation fields) by placeholder, and the mutation
//! subsystem returns a [`SubstitutionMap`] with the real uids once the batch is
//! stored.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Distance between the `sorting` values of neighbouring siblings.
pub const SORTING_STEP: i64 = 256;

/// Column values of a single row.
pub type Row = Map<String, Value>;

/// Temporary identifier of a row inside one data map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Placeholder(String);

impl Placeholder {
	/// Allocates a fresh placeholder (`NEW` followed by a random suffix).
	pub fn new() -> Self {
		Self(format!("NEW{}", Uuid::new_v4().simple()))
	}

	/// Returns the placeholder string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for Placeholder {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for Placeholder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Reference to an existing row or to a row of the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordRef {
	/// Existing row.
	Uid(u64),
	/// Row created earlier in the same batch.
	Placeholder(Placeholder),
}

impl From<u64> for RecordRef {
	fn from(uid: u64) -> Self {
		Self::Uid(uid)
	}
}

impl From<Placeholder> for RecordRef {
	fn from(placeholder: Placeholder) -> Self {
		Self::Placeholder(placeholder)
	}
}

impl From<&Placeholder> for RecordRef {
	fn from(placeholder: &Placeholder) -> Self {
		Self::Placeholder(placeholder.clone())
	}
}

/// Where a new row is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parent {
	/// On the given page, above existing siblings unless `sorting` is set.
	/// `Uid(0)` is the top level.
	Page(RecordRef),
	/// On the same page as the given row of the same table, directly after it.
	After(RecordRef),
}

/// Specification of one row to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
	/// Insert position.
	pub parent: Parent,
	/// Plain column values.
	pub fields: Row,
	/// Columns whose value is a list of references, stored as a comma-separated uid list.
	pub references: IndexMap<String, Vec<RecordRef>>,
	/// Columns pointing at exactly one row, stored as that row's integer uid.
	#[serde(default)]
	pub relations: IndexMap<String, RecordRef>,
}

impl NewRecord {
	/// Creates an empty row at `parent`.
	pub fn new(parent: Parent) -> Self {
		Self {
			parent,
			fields: Row::new(),
			references: IndexMap::new(),
			relations: IndexMap::new(),
		}
	}

	/// Sets a plain column value.
	pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.fields.insert(name.into(), value.into());
		self
	}

	/// Sets a reference column.
	pub fn with_references(mut self, name: impl Into<String>, refs: Vec<RecordRef>) -> Self {
		self.references.insert(name.into(), refs);
		self
	}

	/// Sets a column that points at a single row.
	pub fn with_relation(mut self, name: impl Into<String>, target: impl Into<RecordRef>) -> Self {
		self.relations.insert(name.into(), target.into());
		self
	}
}

/// Ordered set of new rows, grouped by table.
///
/// Rows are stored in insertion order; the mutation subsystem processes them
/// in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataMap {
	tables: IndexMap<String, IndexMap<Placeholder, NewRecord>>,
}

impl DataMap {
	/// Creates an empty data map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a row under a fresh placeholder and returns it.
	pub fn insert(&mut self, table: impl Into<String>, record: NewRecord) -> Placeholder {
		let placeholder = Placeholder::new();
		self.insert_with(table, placeholder.clone(), record);
		placeholder
	}

	/// Adds a row under a caller-chosen placeholder.
	pub fn insert_with(&mut self, table: impl Into<String>, placeholder: Placeholder, record: NewRecord) {
		self.tables
			.entry(table.into())
			.or_default()
			.insert(placeholder, record);
	}

	/// Returns a row by table and placeholder.
	pub fn get(&self, table: &str, placeholder: &Placeholder) -> Option<&NewRecord> {
		self.tables.get(table)?.get(placeholder)
	}

	/// Returns a mutable row by table and placeholder.
	pub fn get_mut(&mut self, table: &str, placeholder: &Placeholder) -> Option<&mut NewRecord> {
		self.tables.get_mut(table)?.get_mut(placeholder)
	}

	/// Iterates over `(table, placeholder, row)` in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Placeholder, &NewRecord)> {
		self.tables.iter().flat_map(|(table, rows)| {
			rows.iter()
				.map(move |(placeholder, record)| (table.as_str(), placeholder, record))
		})
	}

	/// Returns the tables in insertion order.
	pub fn tables(&self) -> impl Iterator<Item = &str> {
		self.tables.keys().map(String::as_str)
	}

	/// Returns the number of rows in the map.
	pub fn len(&self) -> usize {
		self.tables.values().map(IndexMap::len).sum()
	}

	/// Returns true if the map holds no rows.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Command applied to an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordCommand {
	/// Delete the row. Pages are deleted with their whole subtree.
	Delete,
}

/// Commands grouped by table and uid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandMap {
	tables: IndexMap<String, IndexMap<u64, RecordCommand>>,
}

impl CommandMap {
	/// Creates an empty command map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Schedules deletion of a row.
	pub fn delete(&mut self, table: impl Into<String>, uid: u64) -> &mut Self {
		self.tables
			.entry(table.into())
			.or_default()
			.insert(uid, RecordCommand::Delete);
		self
	}

	/// Iterates over `(table, uid, command)` in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u64, RecordCommand)> {
		self.tables.iter().flat_map(|(table, commands)| {
			commands
				.iter()
				.map(move |(uid, command)| (table.as_str(), *uid, *command))
		})
	}

	/// Returns the number of commands.
	pub fn len(&self) -> usize {
		self.tables.values().map(IndexMap::len).sum()
	}

	/// Returns true if no command is scheduled.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Placeholder to real uid mapping produced by one data map submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
	uids: HashMap<Placeholder, u64>,
}

impl SubstitutionMap {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records the uid assigned to `placeholder`.
	pub fn insert(&mut self, placeholder: Placeholder, uid: u64) {
		self.uids.insert(placeholder, uid);
	}

	/// Returns the uid assigned to `placeholder`.
	pub fn uid(&self, placeholder: &Placeholder) -> Option<u64> {
		self.uids.get(placeholder).copied()
	}

	/// Resolves a reference, leaving existing uids untouched.
	pub fn resolve(&self, reference: &RecordRef) -> Option<u64> {
		match reference {
			RecordRef::Uid(uid) => Some(*uid),
			RecordRef::Placeholder(placeholder) => self.uid(placeholder),
		}
	}

	/// Returns the number of resolved placeholders.
	pub fn len(&self) -> usize {
		self.uids.len()
	}

	/// Returns true if nothing was resolved.
	pub fn is_empty(&self) -> bool {
		self.uids.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_placeholders_are_unique() {
		let first = Placeholder::new();
		let second = Placeholder::new();
		assert_ne!(first, second);
		assert!(first.as_str().starts_with("NEW"));
	}

	#[rstest]
	fn test_data_map_preserves_insertion_order() {
		let mut data = DataMap::new();
		let root = data.insert(
			"pages",
			NewRecord::new(Parent::Page(RecordRef::Uid(0))).with_field("title", "root"),
		);
		let child = data.insert(
			"pages",
			NewRecord::new(Parent::Page(root.clone().into())).with_field("title", "child"),
		);
		data.insert(
			"tx_demo",
			NewRecord::new(Parent::Page(child.clone().into())).with_field("value", 1),
		);

		let order: Vec<(&str, &Placeholder)> = data.iter().map(|(t, p, _)| (t, p)).collect();
		assert_eq!(order.len(), 3);
		assert_eq!(order[0], ("pages", &root));
		assert_eq!(order[1], ("pages", &child));
		assert_eq!(order[2].0, "tx_demo");
		assert_eq!(data.tables().collect::<Vec<_>>(), vec!["pages", "tx_demo"]);
		assert_eq!(
			data.get("pages", &child).unwrap().fields.get("title"),
			Some(&json!("child"))
		);
	}

	#[rstest]
	fn test_command_map_deduplicates_per_uid() {
		let mut commands = CommandMap::new();
		commands.delete("pages", 3).delete("pages", 3).delete("be_users", 1);

		assert_eq!(commands.len(), 2);
		let collected: Vec<_> = commands.iter().collect();
		assert_eq!(
			collected,
			vec![
				("pages", 3, RecordCommand::Delete),
				("be_users", 1, RecordCommand::Delete)
			]
		);
	}

	#[rstest]
	fn test_substitution_resolve() {
		let placeholder = Placeholder::new();
		let mut substitutions = SubstitutionMap::new();
		substitutions.insert(placeholder.clone(), 42);

		assert_eq!(substitutions.resolve(&RecordRef::Uid(7)), Some(7));
		assert_eq!(substitutions.resolve(&placeholder.into()), Some(42));
		assert_eq!(substitutions.resolve(&Placeholder::new().into()), None);
	}
}
