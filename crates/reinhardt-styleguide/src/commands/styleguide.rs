//! styleguide command implementation.
//!
//! This command creates or deletes the styleguide demo data.

use std::fmt;
use std::str::FromStr;

use crate::error::{StyleguideError, StyleguideResult};
use crate::remover::RemovalReport;
use crate::styleguide::Styleguide;
use crate::tree::PageTree;

/// Action performed by the styleguide command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleguideAction {
	/// Create a new demo page tree with fixtures, accounts and assets.
	Create,
	/// Delete all demo data.
	Delete,
}

impl FromStr for StyleguideAction {
	type Err = StyleguideError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"create" => Ok(Self::Create),
			"delete" => Ok(Self::Delete),
			other => Err(StyleguideError::UnknownAction(other.to_string())),
		}
	}
}

impl fmt::Display for StyleguideAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Create => f.write_str("create"),
			Self::Delete => f.write_str("delete"),
		}
	}
}

/// Options for the styleguide command.
#[derive(Debug, Clone, Default)]
pub struct StyleguideOptions {
	/// Verbosity level.
	pub verbosity: u8,
}

impl StyleguideOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets verbosity level.
	pub fn with_verbosity(mut self, level: u8) -> Self {
		self.verbosity = level;
		self
	}
}

/// Result of one command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleguideOutcome {
	/// A demo page tree was created.
	Created(PageTree),
	/// Demo data was deleted.
	Deleted(RemovalReport),
}

/// The styleguide command for managing the demo data.
///
/// # Example
///
/// ```ignore
/// let command = StyleguideCommand::new(styleguide);
/// let options = StyleguideOptions::new().with_verbosity(1);
/// command.execute(StyleguideAction::Create, options).await?;
/// ```
#[derive(Debug)]
pub struct StyleguideCommand {
	styleguide: Styleguide,
}

impl StyleguideCommand {
	/// Creates a new styleguide command.
	pub fn new(styleguide: Styleguide) -> Self {
		Self { styleguide }
	}

	/// Returns the command name.
	pub fn name(&self) -> &str {
		"styleguide"
	}

	/// Returns the command description.
	pub fn description(&self) -> &str {
		"Creates or deletes the styleguide demo page tree and its records"
	}

	/// Returns the command help text.
	pub fn help(&self) -> &str {
		r#"
Usage: styleguide [options] action

Creates or deletes the styleguide demo data.

Arguments:
  action               create | delete

  create               Adds a demo page tree with one page per fixture table,
                       demo accounts, groups and sample assets
  delete               Removes all demo page trees, accounts, groups and the
                       asset folder

Options:
  --verbosity LEVEL    Verbosity level (0=minimal, 1=normal, 2=verbose)
"#
	}

	/// Executes the styleguide command.
	pub async fn execute(
		&self,
		action: StyleguideAction,
		options: StyleguideOptions,
	) -> StyleguideResult<StyleguideOutcome> {
		let outcome = match action {
			StyleguideAction::Create => StyleguideOutcome::Created(self.styleguide.create().await?),
			StyleguideAction::Delete => StyleguideOutcome::Deleted(self.styleguide.delete().await?),
		};

		if options.verbosity > 0 {
			self.print_outcome(&outcome);
		}

		Ok(outcome)
	}

	/// Prints the outcome summary.
	fn print_outcome(&self, outcome: &StyleguideOutcome) {
		match outcome {
			StyleguideOutcome::Created(tree) => {
				println!(
					"Created styleguide page tree {} with {} table page(s)",
					tree.root_uid,
					tree.page_uids.len()
				);
			}
			StyleguideOutcome::Deleted(report) => {
				println!(
					"Deleted {} page tree(s), {} account(s), {} group(s)",
					report.root_pages, report.accounts, report.groups
				);
				if report.asset_folder {
					println!("Deleted asset folder");
				}
			}
		}
	}
}

#[cfg(all(test, feature = "local-storage"))]
mod tests {
	use super::*;
	use crate::backend::InMemoryDatabase;
	use crate::hasher::CredentialHasher;
	use crate::schema::{StaticSchemaRegistry, TableSchema};
	use crate::settings::StyleguideSettings;
	use crate::storage::LocalAssetStorage;
	use rstest::rstest;
	use std::sync::Arc;
	use tempfile::TempDir;

	struct PlainHasher;

	impl CredentialHasher for PlainHasher {
		fn hash(&self, _secret: &[u8]) -> StyleguideResult<String> {
			Ok("plain".to_string())
		}
	}

	fn command(dir: &TempDir) -> (StyleguideCommand, Arc<InMemoryDatabase>) {
		let db = Arc::new(InMemoryDatabase::new());
		let schema = StaticSchemaRegistry::new()
			.with_table("tx_styleguide_staticdata", TableSchema::new());
		let styleguide = Styleguide::new(
			Arc::new(StyleguideSettings::default()),
			db.clone(),
			db.clone(),
			Arc::new(schema),
			Arc::new(LocalAssetStorage::new(dir.path()).unwrap()),
			Arc::new(PlainHasher),
		);
		(StyleguideCommand::new(styleguide), db)
	}

	#[rstest]
	fn test_command_metadata() {
		let dir = TempDir::new().unwrap();
		let (cmd, _db) = command(&dir);
		assert_eq!(cmd.name(), "styleguide");
		assert!(!cmd.description().is_empty());
		assert!(cmd.help().contains("create"));
	}

	#[rstest]
	#[case("create", StyleguideAction::Create)]
	#[case("Delete", StyleguideAction::Delete)]
	#[case(" create ", StyleguideAction::Create)]
	fn test_parse_action(#[case] input: &str, #[case] expected: StyleguideAction) {
		assert_eq!(input.parse::<StyleguideAction>().unwrap(), expected);
	}

	#[rstest]
	fn test_parse_unknown_action() {
		let result = "reset".parse::<StyleguideAction>();
		assert!(matches!(result, Err(StyleguideError::UnknownAction(ref a)) if a == "reset"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_execute_create_then_delete() {
		let dir = TempDir::new().unwrap();
		let (cmd, db) = command(&dir);

		let created = cmd
			.execute(StyleguideAction::Create, StyleguideOptions::new())
			.await
			.unwrap();
		let StyleguideOutcome::Created(tree) = created else {
			panic!("expected a created tree");
		};
		assert_eq!(tree.page_uids.len(), 1);
		assert_eq!(db.count("tx_styleguide_staticdata"), 4);

		let deleted = cmd
			.execute(StyleguideAction::Delete, StyleguideOptions::new().with_verbosity(1))
			.await
			.unwrap();
		assert!(matches!(deleted, StyleguideOutcome::Deleted(report) if report.root_pages == 1));
		assert_eq!(db.count("pages"), 0);
		assert_eq!(db.count("tx_styleguide_staticdata"), 0);
	}
}
