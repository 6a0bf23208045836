//! Generator for the reserved lookup table.

use async_trait::async_trait;

use super::{FixtureGenerator, GeneratorContext, RecordBuilder};
use crate::datamap::DataMap;
use crate::error::StyleguideResult;

/// Column receiving the lookup values.
pub const VALUE_FIELD: &str = "value_1";

/// Creates one lookup row per configured static value.
///
/// Other generators reference these rows through relation columns, which is
/// why the reserved table is always populated first.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticDataGenerator;

impl StaticDataGenerator {
	/// Creates the generator.
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl FixtureGenerator for StaticDataGenerator {
	fn name(&self) -> &str {
		"static_data"
	}

	fn matches(&self, table: &str, ctx: &GeneratorContext) -> bool {
		table == ctx.settings.static_table
	}

	async fn populate(&self, table: &str, ctx: &GeneratorContext) -> StyleguideResult<()> {
		let builder = RecordBuilder::new(ctx, ctx.page_of(table)?);

		let mut data = DataMap::new();
		for value in &ctx.settings.static_values {
			data.insert(
				table,
				builder.marked_record().with_field(VALUE_FIELD, value.as_str()),
			);
		}

		ctx.data_handler.process_data_map(data).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::generator::test_support::context;
	use crate::schema::StaticSchemaRegistry;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[tokio::test]
	async fn test_matches_only_reserved_table() {
		let (ctx, _db) = context(StaticSchemaRegistry::new(), &[]);
		let generator = StaticDataGenerator::new();

		assert!(generator.matches("tx_styleguide_staticdata", &ctx));
		assert!(!generator.matches("tx_styleguide_elements_basic", &ctx));
	}

	#[rstest]
	#[tokio::test]
	async fn test_populate_creates_marked_rows_in_order() {
		let (ctx, db) = context(StaticSchemaRegistry::new(), &["tx_styleguide_staticdata"]);

		StaticDataGenerator::new()
			.populate("tx_styleguide_staticdata", &ctx)
			.await
			.unwrap();

		let rows = db.rows("tx_styleguide_staticdata");
		let values: Vec<&serde_json::Value> = rows.iter().map(|row| &row[VALUE_FIELD]).collect();
		assert_eq!(
			values,
			vec![&json!("foo"), &json!("bar"), &json!("foofoo"), &json!("barbar")]
		);
		assert!(rows.iter().all(|row| row["tx_styleguide_isdemorecord"] == json!(1)));
		assert!(rows.iter().all(|row| row["pid"] == json!(100)));
	}

	#[rstest]
	#[tokio::test]
	async fn test_populate_without_page_fails() {
		let (ctx, db) = context(StaticSchemaRegistry::new(), &[]);

		let result = StaticDataGenerator::new()
			.populate("tx_styleguide_staticdata", &ctx)
			.await;

		assert!(result.is_err());
		assert_eq!(db.count("tx_styleguide_staticdata"), 0);
	}
}
