//! Main table ordering.

use std::collections::HashSet;

use crate::classifier::{FixtureTable, TableClassifier};

/// Returns the main tables to populate, in population order.
///
/// The reserved lookup table always comes first, whether or not it appears in
/// `tables`. All other main tables keep their discovery order; child tables,
/// unmatched names and duplicates are dropped.
///
/// # Examples
///
/// ```
/// use reinhardt_styleguide::classifier::TableClassifier;
/// use reinhardt_styleguide::orderer::order_main_tables;
///
/// let classifier = TableClassifier::new(vec!["tx_x_".to_string()], "tx_x_static");
/// let ordered = order_main_tables(["tx_x_foo", "tx_x_foo_bar", "tx_y_baz"], &classifier);
/// assert_eq!(ordered, vec!["tx_x_static", "tx_x_foo"]);
/// ```
pub fn order_main_tables<I, S>(tables: I, classifier: &TableClassifier) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut seen = HashSet::new();
	let mut ordered = vec![classifier.reserved().to_string()];
	seen.insert(classifier.reserved().to_string());

	for table in tables {
		if let Some(FixtureTable::Main(name)) = classifier.fixture_table(table.as_ref()) {
			if seen.insert(name.clone()) {
				ordered.push(name);
			}
		}
	}

	ordered
}
