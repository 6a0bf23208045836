//! Error types for the styleguide generator.
//!
//! Failures fall into three groups: configuration errors that abort
//! `create` immediately ([`StyleguideError::NoGeneratorFound`]), expected
//! "already there" conditions that callers swallow
//! ([`StyleguideError::AlreadyExists`]), and everything reported by the host
//! collaborators, which is propagated untouched.

use thiserror::Error;

/// Errors that can occur while creating or deleting styleguide demo data.
#[derive(Debug, Error)]
pub enum StyleguideError {
	/// No fixture generator declared itself responsible for a main table.
	#[error("No fixture generator found for table: {0}")]
	NoGeneratorFound(String),

	/// The folder, file or record set to be created already exists.
	#[error("Already exists: {0}")]
	AlreadyExists(String),

	/// A referenced record, folder or page was not found.
	#[error("Not found: {0}")]
	NotFound(String),

	/// The record-mutation subsystem rejected a data or command map.
	#[error("Mutation error: {0}")]
	Mutation(String),

	/// A record lookup failed.
	#[error("Database error: {0}")]
	Database(String),

	/// The asset storage failed.
	#[error("Storage error: {0}")]
	Storage(String),

	/// Credential hashing failed.
	#[error("Hashing error: {0}")]
	Hashing(String),

	/// A command was given an action it does not know.
	#[error("Unknown action: {0}")]
	UnknownAction(String),

	/// Settings failed validation.
	#[error("Invalid settings: {field}: {message}")]
	InvalidSettings {
		/// Offending settings field.
		field: String,
		/// Validation error message.
		message: String,
	},

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// TOML settings could not be parsed.
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
}

impl StyleguideError {
	/// Returns true for errors caused by a wrong generator or schema setup.
	///
	/// These are programming errors and are never retried.
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			Self::NoGeneratorFound(_) | Self::InvalidSettings { .. }
		)
	}

	/// Returns true if the error reports an already existing target.
	pub fn is_already_exists(&self) -> bool {
		matches!(self, Self::AlreadyExists(_))
	}
}

/// Result type alias for styleguide operations.
pub type StyleguideResult<T> = Result<T, StyleguideError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_no_generator_found_error() {
		let error = StyleguideError::NoGeneratorFound("tx_styleguide_foo".to_string());
		assert_eq!(
			error.to_string(),
			"No fixture generator found for table: tx_styleguide_foo"
		);
		assert!(error.is_configuration_error());
		assert!(!error.is_already_exists());
	}

	#[rstest]
	fn test_invalid_settings_error() {
		let error = StyleguideError::InvalidSettings {
			field: "table_prefixes".to_string(),
			message: "at least one prefix is required".to_string(),
		};
		assert_eq!(
			error.to_string(),
			"Invalid settings: table_prefixes: at least one prefix is required"
		);
		assert!(error.is_configuration_error());
	}

	#[rstest]
	fn test_already_exists_is_not_configuration_error() {
		let error = StyleguideError::AlreadyExists("styleguide".to_string());
		assert!(error.is_already_exists());
		assert!(!error.is_configuration_error());
	}

	#[rstest]
	fn test_io_error_from() {
		let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
		let error: StyleguideError = io_error.into();
		assert!(matches!(error, StyleguideError::Io(_)));
	}

	#[rstest]
	fn test_toml_error_from() {
		let toml_error = toml::from_str::<toml::Value>("= broken").unwrap_err();
		let error: StyleguideError = toml_error.into();
		assert!(matches!(error, StyleguideError::Toml(_)));
	}
}
