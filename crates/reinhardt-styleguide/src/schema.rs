//! Schema registry.
//!
//! The generator only needs two things from the host's table configuration:
//! the list of known table names, and for each table a coarse description of
//! its columns so that plausible demo values can be produced. Everything
//! else in the host configuration stays opaque.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StyleguideResult;

/// Coarse column type, as far as demo value generation is concerned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
	/// Single-line text.
	Input {
		/// Maximum length in characters.
		#[serde(default)]
		max: Option<usize>,
	},
	/// Multi-line text.
	Text {
		/// Whether the column holds rich text markup.
		#[serde(default)]
		rich_text: bool,
	},
	/// Boolean checkbox.
	Check,
	/// Integer.
	Number {
		/// Lower bound.
		#[serde(default)]
		min: Option<i64>,
		/// Upper bound.
		#[serde(default)]
		max: Option<i64>,
	},
	/// Choice from a static item list.
	Select {
		/// Item values.
		#[serde(default)]
		items: Vec<String>,
	},
	/// Reference to a demo row of another table.
	Relation {
		/// Referenced table.
		foreign_table: String,
	},
	/// Inline child rows.
	Inline {
		/// Child table.
		foreign_table: String,
		/// Child column pointing back to the parent row.
		#[serde(default)]
		foreign_field: Option<String>,
		/// Join table for many-to-many children.
		#[serde(default)]
		mm: Option<String>,
	},
	/// Anything else; no value is generated.
	#[serde(other)]
	Other,
}

impl ColumnKind {
	/// Returns true for inline columns backed by a join table.
	pub fn is_mm_inline(&self) -> bool {
		matches!(self, Self::Inline { mm: Some(_), .. })
	}
}

/// Column layout of one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
	/// Columns in declaration order.
	#[serde(default)]
	pub columns: IndexMap<String, ColumnKind>,
}

impl TableSchema {
	/// Creates a schema without columns.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a column.
	pub fn with_column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
		self.columns.insert(name.into(), kind);
		self
	}

	/// Returns true if any column is a many-to-many inline column.
	pub fn has_mm_inline(&self) -> bool {
		self.columns.values().any(ColumnKind::is_mm_inline)
	}
}

/// Source of table names and column layouts.
pub trait SchemaRegistry: Send + Sync {
	/// Returns all known table names in discovery order.
	fn table_names(&self) -> Vec<String>;

	/// Returns the layout of `table`, if known.
	fn table(&self, table: &str) -> Option<&TableSchema>;
}

/// Schema registry backed by a fixed table list.
///
/// Loadable from JSON of the form
/// `{"tx_demo_foo": {"columns": {"title": {"type": "input"}}}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticSchemaRegistry {
	tables: IndexMap<String, TableSchema>,
}

impl StaticSchemaRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a registry from JSON, keeping the document's table order.
	pub fn from_json_str(source: &str) -> StyleguideResult<Self> {
		Ok(serde_json::from_str(source)?)
	}

	/// Registers a table.
	pub fn with_table(mut self, name: impl Into<String>, schema: TableSchema) -> Self {
		self.register(name, schema);
		self
	}

	/// Registers or replaces a table.
	pub fn register(&mut self, name: impl Into<String>, schema: TableSchema) {
		self.tables.insert(name.into(), schema);
	}
}

impl SchemaRegistry for StaticSchemaRegistry {
	fn table_names(&self) -> Vec<String> {
		self.tables.keys().cloned().collect()
	}

	fn table(&self, table: &str) -> Option<&TableSchema> {
		self.tables.get(table)
	}
}
