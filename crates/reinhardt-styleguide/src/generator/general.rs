//! Fallback generator for tables known to the schema registry.

use async_trait::async_trait;

use super::{FixtureGenerator, GeneratorContext, RecordBuilder};
use crate::datamap::{DataMap, Placeholder};
use crate::error::StyleguideResult;

/// Creates one demo row with generated column values plus its inline children.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeneralGenerator;

impl GeneralGenerator {
	/// Creates the generator.
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl FixtureGenerator for GeneralGenerator {
	fn name(&self) -> &str {
		"general"
	}

	fn matches(&self, table: &str, ctx: &GeneratorContext) -> bool {
		ctx.schema.table(table).is_some()
	}

	async fn populate(&self, table: &str, ctx: &GeneratorContext) -> StyleguideResult<()> {
		let builder = RecordBuilder::new(ctx, ctx.page_of(table)?);

		let mut data = DataMap::new();
		builder
			.build(table, Placeholder::new(), None, 0, &mut data)
			.await?;

		ctx.data_handler.process_data_map(data).await?;
		Ok(())
	}
}
