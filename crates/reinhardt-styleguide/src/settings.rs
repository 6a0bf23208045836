//! Generator settings.
//!
//! Settings are plain serde structs. Every field has a default matching the
//! styleguide conventions, so an empty TOML document is a valid configuration:
//!
//! ```toml
//! table_prefixes = ["tx_demo_"]
//! static_table = "tx_demo_staticdata"
//!
//! [assets]
//! folder = "demo"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StyleguideError, StyleguideResult};
use crate::storage::is_relative_folder;

/// Top-level settings for the styleguide generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleguideSettings {
	/// Table name prefixes in priority order. The first matching prefix wins.
	pub table_prefixes: Vec<String>,

	/// Lookup table that is always populated first.
	pub static_table: String,

	/// Values written to the static lookup table, one row each.
	pub static_values: Vec<String>,

	/// Table holding the page tree.
	pub page_table: String,

	/// Title of the demo root page.
	pub root_page_title: String,

	/// Demo marker configuration.
	pub markers: MarkerSettings,

	/// Baseline account configuration.
	pub accounts: AccountSettings,

	/// Sample asset configuration.
	pub assets: AssetSettings,

	/// Number of child rows created per inline column.
	pub inline_children: usize,

	/// Maximum nesting depth for inline child rows.
	pub inline_depth: usize,
}

impl Default for StyleguideSettings {
	fn default() -> Self {
		Self {
			table_prefixes: vec![
				"tx_styleguide_elements_".to_string(),
				"tx_styleguide_inline_".to_string(),
				"tx_styleguide_".to_string(),
			],
			static_table: "tx_styleguide_staticdata".to_string(),
			static_values: vec![
				"foo".to_string(),
				"bar".to_string(),
				"foofoo".to_string(),
				"barbar".to_string(),
			],
			page_table: "pages".to_string(),
			root_page_title: "styleguide TCA demo".to_string(),
			markers: MarkerSettings::default(),
			accounts: AccountSettings::default(),
			assets: AssetSettings::default(),
			inline_children: 2,
			inline_depth: 2,
		}
	}
}

/// Field names and values used to tag demo data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
	/// Page field holding `root_value` or the main table name.
	pub page_field: String,

	/// Boolean record field set on every generated row.
	pub record_field: String,

	/// Page marker value of the demo root page.
	pub root_value: String,
}

impl Default for MarkerSettings {
	fn default() -> Self {
		Self {
			page_field: "tx_styleguide_containsdemo".to_string(),
			record_field: "tx_styleguide_isdemorecord".to_string(),
			root_value: "root".to_string(),
		}
	}
}

/// Baseline accounts and groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
	/// Group table.
	pub group_table: String,

	/// Account table.
	pub account_table: String,

	/// Titles of the two baseline groups.
	pub group_titles: [String; 2],

	/// Username of the non-privileged account.
	pub editor_username: String,

	/// Username of the administrative account.
	pub admin_username: String,
}

impl Default for AccountSettings {
	fn default() -> Self {
		Self {
			group_table: "be_groups".to_string(),
			account_table: "be_users".to_string(),
			group_titles: [
				"styleguide demo group 1".to_string(),
				"styleguide demo group 2".to_string(),
			],
			editor_username: "styleguide demo user 1".to_string(),
			admin_username: "styleguide demo user 2".to_string(),
		}
	}
}

/// Sample asset folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
	/// Folder created inside the asset storage.
	pub folder: String,

	/// Optional directory whose files are copied in addition to the built-in samples.
	pub sample_dir: Option<PathBuf>,
}

impl Default for AssetSettings {
	fn default() -> Self {
		Self {
			folder: "styleguide".to_string(),
			sample_dir: None,
		}
	}
}

impl StyleguideSettings {
	/// Parses and validates settings from a TOML document.
	pub fn from_toml_str(source: &str) -> StyleguideResult<Self> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads, parses and validates settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> StyleguideResult<Self> {
		let source = std::fs::read_to_string(path.as_ref())?;
		Self::from_toml_str(&source)
	}

	/// Checks cross-field constraints.
	pub fn validate(&self) -> StyleguideResult<()> {
		if self.table_prefixes.is_empty() || self.table_prefixes.iter().any(String::is_empty) {
			return Err(invalid(
				"table_prefixes",
				"at least one non-empty prefix is required",
			));
		}
		if !self
			.table_prefixes
			.iter()
			.any(|prefix| self.static_table.starts_with(prefix.as_str()))
		{
			return Err(invalid(
				"static_table",
				format!("{} does not carry a configured prefix", self.static_table),
			));
		}
		if self.markers.page_field.is_empty() {
			return Err(invalid("markers.page_field", "must not be empty"));
		}
		if self.markers.record_field.is_empty() {
			return Err(invalid("markers.record_field", "must not be empty"));
		}
		if !is_relative_folder(&self.assets.folder) {
			return Err(invalid(
				"assets.folder",
				"must be a non-empty relative path without `.` or `..` components",
			));
		}
		if self.inline_children == 0 {
			return Err(invalid("inline_children", "must be at least 1"));
		}
		Ok(())
	}
}

fn invalid(field: &str, message: impl Into<String>) -> StyleguideError {
	StyleguideError::InvalidSettings {
		field: field.to_string(),
		message: message.into(),
	}
}
