//! Schema-driven demo rows.

use futures::future::BoxFuture;
use serde_json::Value;

use super::GeneratorContext;
use crate::datamap::{DataMap, NewRecord, Parent, Placeholder, RecordRef};
use crate::error::StyleguideResult;
use crate::schema::ColumnKind;

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor.";

/// Returns the demo value for a plain column, or `None` if the column is left empty.
///
/// Relation and inline columns are not plain and always yield `None` here.
pub fn field_value(column: &str, kind: &ColumnKind) -> Option<Value> {
	match kind {
		ColumnKind::Input { max } => {
			let text = column.replace('_', " ");
			let text = match max {
				Some(max) => text.chars().take(*max).collect(),
				None => text,
			};
			Some(Value::from(text))
		}
		ColumnKind::Text { rich_text: true } => Some(Value::from(format!("<p>{LOREM}</p>"))),
		ColumnKind::Text { rich_text: false } => Some(Value::from(LOREM)),
		ColumnKind::Check => Some(Value::from(1)),
		ColumnKind::Number { min, max } => {
			let value = min.unwrap_or(0);
			Some(Value::from(max.map_or(value, |max| value.min(max))))
		}
		ColumnKind::Select { items } => items.first().map(|item| Value::from(item.as_str())),
		ColumnKind::Relation { .. } | ColumnKind::Inline { .. } | ColumnKind::Other => None,
	}
}

/// Builds demo rows for a table and its inline children.
///
/// All rows go to the same page. Many-to-many inline columns are skipped;
/// [`InlineMmGenerator`](super::InlineMmGenerator) handles them.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'a> {
	ctx: &'a GeneratorContext,
	pid: u64,
}

impl<'a> RecordBuilder<'a> {
	/// Creates a builder placing rows on page `pid`.
	pub fn new(ctx: &'a GeneratorContext, pid: u64) -> Self {
		Self { ctx, pid }
	}

	/// Returns the page rows are placed on.
	pub fn pid(&self) -> u64 {
		self.pid
	}

	/// Returns an empty row on the builder's page carrying the record marker.
	pub fn marked_record(&self) -> NewRecord {
		NewRecord::new(Parent::Page(RecordRef::Uid(self.pid))).with_field(
			self.ctx.record_marker_field(),
			self.ctx.record_marker_value(),
		)
	}

	/// Adds a row of `table` under `placeholder`, followed by its inline children.
	///
	/// `back_reference` names a column of `table` that must point to a parent
	/// row. `depth` is the current inline nesting level; children are only
	/// created below `inline_depth`.
	pub fn build<'b>(
		&'b self,
		table: &'b str,
		placeholder: Placeholder,
		back_reference: Option<(String, Placeholder)>,
		depth: usize,
		data: &'b mut DataMap,
	) -> BoxFuture<'b, StyleguideResult<()>> {
		Box::pin(async move {
			let settings = &self.ctx.settings;
			let mut record = self.marked_record();
			if let Some((field, parent)) = back_reference {
				record = record.with_relation(field, parent);
			}

			let mut children: Vec<(String, Option<String>, Vec<Placeholder>)> = Vec::new();
			let columns = self
				.ctx
				.schema
				.table(table)
				.map(|schema| schema.columns.clone())
				.unwrap_or_default();

			for (column, kind) in &columns {
				match kind {
					ColumnKind::Relation { foreign_table } => {
						let uids = self
							.ctx
							.records
							.find_uids(
								foreign_table,
								self.ctx.record_marker_field(),
								&self.ctx.record_marker_value(),
							)
							.await?;
						if let Some(uid) = uids.first() {
							record.fields.insert(column.clone(), Value::from(*uid));
						}
					}
					ColumnKind::Inline {
						foreign_table,
						foreign_field,
						mm: None,
					} if depth < settings.inline_depth => {
						let placeholders: Vec<Placeholder> = (0..settings.inline_children)
							.map(|_| Placeholder::new())
							.collect();
						match foreign_field {
							Some(_) => {
								record
									.fields
									.insert(column.clone(), Value::from(placeholders.len()));
							}
							None => {
								record.references.insert(
									column.clone(),
									placeholders.iter().map(RecordRef::from).collect(),
								);
							}
						}
						children.push((foreign_table.clone(), foreign_field.clone(), placeholders));
					}
					other => {
						if let Some(value) = field_value(column, other) {
							record.fields.insert(column.clone(), value);
						}
					}
				}
			}

			data.insert_with(table, placeholder.clone(), record);

			for (child_table, foreign_field, placeholders) in children {
				for child in placeholders {
					let back_reference = foreign_field
						.clone()
						.map(|field| (field, placeholder.clone()));
					self.build(&child_table, child, back_reference, depth + 1, data)
						.await?;
				}
			}

			Ok(())
		})
	}
}
