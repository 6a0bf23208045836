//! Generator for tables with many-to-many inline columns.

use async_trait::async_trait;
use serde_json::Value;

use super::{FixtureGenerator, GeneratorContext, RecordBuilder};
use crate::datamap::{DataMap, Placeholder};
use crate::error::StyleguideResult;
use crate::schema::ColumnKind;

/// Join table column pointing to the parent row.
pub const MM_LOCAL_FIELD: &str = "uid_local";

/// Join table column pointing to the child row.
pub const MM_FOREIGN_FIELD: &str = "uid_foreign";

/// Creates a parent row, its many-to-many children, and the join rows linking them.
///
/// The parent column stores the number of linked children. Non-mm columns are
/// filled the same way [`GeneralGenerator`](super::GeneralGenerator) fills them.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineMmGenerator;

impl InlineMmGenerator {
	/// Creates the generator.
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl FixtureGenerator for InlineMmGenerator {
	fn name(&self) -> &str {
		"inline_mm"
	}

	fn matches(&self, table: &str, ctx: &GeneratorContext) -> bool {
		ctx.schema
			.table(table)
			.is_some_and(|schema| schema.has_mm_inline())
	}

	async fn populate(&self, table: &str, ctx: &GeneratorContext) -> StyleguideResult<()> {
		let builder = RecordBuilder::new(ctx, ctx.page_of(table)?);
		let children = ctx.settings.inline_children;
		let mm_columns: Vec<(String, String, String)> = ctx
			.schema
			.table(table)
			.map(|schema| {
				schema
					.columns
					.iter()
					.filter_map(|(column, kind)| match kind {
						ColumnKind::Inline {
							foreign_table,
							mm: Some(mm),
							..
						} => Some((column.clone(), foreign_table.clone(), mm.clone())),
						_ => None,
					})
					.collect()
			})
			.unwrap_or_default();

		let mut data = DataMap::new();
		let parent = Placeholder::new();
		builder
			.build(table, parent.clone(), None, 0, &mut data)
			.await?;

		for (column, child_table, mm_table) in mm_columns {
			for position in 0..children {
				let child = Placeholder::new();
				builder
					.build(&child_table, child.clone(), None, 1, &mut data)
					.await?;
				data.insert(
					mm_table.as_str(),
					builder
						.marked_record()
						.with_field("sorting", Value::from(position as i64 + 1))
						.with_relation(MM_LOCAL_FIELD, &parent)
						.with_relation(MM_FOREIGN_FIELD, &child),
				);
			}

			if let Some(record) = data.get_mut(table, &parent) {
				record.fields.insert(column, Value::from(children));
			}
		}

		ctx.data_handler.process_data_map(data).await?;
		Ok(())
	}
}
