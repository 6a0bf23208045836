//! Main/child table classification.
//!
//! A fixture table name is `<prefix><segment>` for a main table and
//! `<prefix><segment>_<segment>...` for a child table owned by the main table
//! `<prefix><first segment>`.

use serde::{Deserialize, Serialize};

/// Classification of a single table name against a prefix list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
	/// Exactly one segment follows the matching prefix.
	Main,
	/// More than one segment follows the matching prefix.
	Child {
		/// Main table formed by the prefix and the first segment.
		owner: String,
	},
	/// No prefix matches.
	NotMatched,
}

/// A table that takes part in fixture generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixtureTable {
	/// Gets its own page in the demo tree.
	Main(String),
	/// Rows are owned by rows of `owner`.
	Child {
		/// Table name.
		name: String,
		/// Owning main table.
		owner: String,
	},
}

impl FixtureTable {
	/// Returns the table name.
	pub fn name(&self) -> &str {
		match self {
			Self::Main(name) => name,
			Self::Child { name, .. } => name,
		}
	}

	/// Returns true for main tables.
	pub fn is_main(&self) -> bool {
		matches!(self, Self::Main(_))
	}
}

/// Classifies `table` against `prefixes`.
///
/// Prefixes are tried in the given order and only the first literal match is
/// considered; a later, longer prefix is never re-tried. An empty remainder
/// after the prefix does not count as a segment.
///
/// # Examples
///
/// ```
/// use reinhardt_styleguide::classifier::{TableKind, classify};
///
/// let prefixes = ["tx_x_"];
/// assert_eq!(classify("tx_x_foo", &prefixes), TableKind::Main);
/// assert_eq!(
///     classify("tx_x_foo_bar", &prefixes),
///     TableKind::Child { owner: "tx_x_foo".to_string() }
/// );
/// assert_eq!(classify("tx_y_baz", &prefixes), TableKind::NotMatched);
/// ```
pub fn classify<P: AsRef<str>>(table: &str, prefixes: &[P]) -> TableKind {
	let Some((prefix, remainder)) = prefixes.iter().find_map(|prefix| {
		let prefix = prefix.as_ref();
		table.strip_prefix(prefix).map(|rest| (prefix, rest))
	}) else {
		return TableKind::NotMatched;
	};

	if remainder.is_empty() {
		return TableKind::NotMatched;
	}

	let mut segments = remainder.split('_');
	let first = segments.next().unwrap_or_default();
	if segments.next().is_none() {
		TableKind::Main
	} else {
		TableKind::Child {
			owner: format!("{prefix}{first}"),
		}
	}
}

/// Classifier bound to a prefix list and the reserved lookup table.
#[derive(Debug, Clone)]
pub struct TableClassifier {
	prefixes: Vec<String>,
	reserved: String,
}

impl TableClassifier {
	/// Creates a classifier.
	pub fn new(prefixes: Vec<String>, reserved: impl Into<String>) -> Self {
		Self {
			prefixes,
			reserved: reserved.into(),
		}
	}

	/// Returns the reserved lookup table.
	pub fn reserved(&self) -> &str {
		&self.reserved
	}

	/// Returns the prefixes in priority order.
	pub fn prefixes(&self) -> &[String] {
		&self.prefixes
	}

	/// Classifies `table` as a fixture table.
	///
	/// Returns `None` for the reserved table and for unmatched names.
	pub fn fixture_table(&self, table: &str) -> Option<FixtureTable> {
		if table == self.reserved {
			return None;
		}
		match classify(table, &self.prefixes) {
			TableKind::Main => Some(FixtureTable::Main(table.to_string())),
			TableKind::Child { owner } => Some(FixtureTable::Child {
				name: table.to_string(),
				owner,
			}),
			TableKind::NotMatched => None,
		}
	}
}
