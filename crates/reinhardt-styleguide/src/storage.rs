//! Asset storage used for the sample files.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::error::{StyleguideError, StyleguideResult};

/// Folder-oriented asset storage.
///
/// # Examples
///
/// ```rust,no_run
/// use reinhardt_styleguide::storage::{AssetStorage, LocalAssetStorage};
///
/// # async fn example() -> reinhardt_styleguide::StyleguideResult<()> {
/// let storage = LocalAssetStorage::new("/var/www/fileadmin")?;
/// storage.create_folder("styleguide").await?;
/// let name = storage.add_file("styleguide", "logo.svg", b"<svg/>").await?;
/// assert_eq!(name, "logo.svg");
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait AssetStorage: Send + Sync {
	/// Creates a folder.
	///
	/// # Errors
	///
	/// Returns `StyleguideError::AlreadyExists` if the folder exists.
	async fn create_folder(&self, folder: &str) -> StyleguideResult<()>;

	/// Returns true if the folder exists.
	async fn folder_exists(&self, folder: &str) -> StyleguideResult<bool>;

	/// Deletes a folder and everything in it.
	///
	/// # Errors
	///
	/// Returns `StyleguideError::NotFound` if the folder does not exist.
	async fn delete_folder(&self, folder: &str) -> StyleguideResult<()>;

	/// Stores a file in `folder`, renaming it if the name is taken.
	///
	/// Returns the name the file was stored under.
	async fn add_file(&self, folder: &str, name: &str, content: &[u8]) -> StyleguideResult<String>;

	/// Lists the file names in `folder`, sorted.
	async fn list_files(&self, folder: &str) -> StyleguideResult<Vec<String>>;
}

/// Returns the `attempt`-th alternative for a taken file name.
///
/// `photo.jpg` becomes `photo_01.jpg`, `photo_02.jpg`, ...; names without an
/// extension get the suffix appended.
pub fn alternative_name(name: &str, attempt: usize) -> String {
	match name.rsplit_once('.') {
		Some((stem, extension)) if !stem.is_empty() => {
			format!("{stem}_{attempt:02}.{extension}")
		}
		_ => format!("{name}_{attempt:02}"),
	}
}

/// Returns true if `folder` is a relative path made of plain names only.
///
/// Absolute paths, `.`/`..` components and prefixes are rejected, so the
/// folder always resolves below the storage root.
pub fn is_relative_folder(folder: &str) -> bool {
	let path = Path::new(folder);
	!folder.is_empty()
		&& !path.is_absolute()
		&& path
			.components()
			.all(|component| matches!(component, Component::Normal(_)))
}

/// Upper bound for rename attempts before giving up.
const MAX_RENAME_ATTEMPTS: usize = 99;

/// Local file system asset storage.
#[cfg(feature = "local-storage")]
#[derive(Debug, Clone)]
pub struct LocalAssetStorage {
	base_path: PathBuf,
}

#[cfg(feature = "local-storage")]
impl LocalAssetStorage {
	/// Creates a storage rooted at `base_path`.
	///
	/// # Errors
	///
	/// Returns `StyleguideError::Storage` if the base path is not an existing directory.
	pub fn new(base_path: impl Into<PathBuf>) -> StyleguideResult<Self> {
		let base_path = base_path.into();

		if !base_path.is_dir() {
			return Err(StyleguideError::Storage(format!(
				"Base path is not a directory: {}",
				base_path.display()
			)));
		}

		Ok(Self { base_path })
	}

	/// Returns the base path.
	pub fn base_path(&self) -> &Path {
		&self.base_path
	}

	fn folder_path(&self, folder: &str) -> StyleguideResult<PathBuf> {
		if !is_relative_folder(folder) {
			return Err(StyleguideError::Storage(format!(
				"Invalid folder name: {folder:?}"
			)));
		}
		Ok(self.base_path.join(folder))
	}
}

#[cfg(feature = "local-storage")]
#[async_trait]
impl AssetStorage for LocalAssetStorage {
	async fn create_folder(&self, folder: &str) -> StyleguideResult<()> {
		let path = self.folder_path(folder)?;
		match tokio::fs::create_dir(&path).await {
			Ok(()) => Ok(()),
			Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => {
				Err(StyleguideError::AlreadyExists(folder.to_string()))
			}
			Err(error) => Err(error.into()),
		}
	}

	async fn folder_exists(&self, folder: &str) -> StyleguideResult<bool> {
		let path = self.folder_path(folder)?;
		Ok(path.is_dir())
	}

	async fn delete_folder(&self, folder: &str) -> StyleguideResult<()> {
		let path = self.folder_path(folder)?;

		if !path.is_dir() {
			return Err(StyleguideError::NotFound(folder.to_string()));
		}

		tokio::fs::remove_dir_all(&path).await?;
		Ok(())
	}

	async fn add_file(&self, folder: &str, name: &str, content: &[u8]) -> StyleguideResult<String> {
		let folder_path = self.folder_path(folder)?;
		if name.is_empty() || name.contains('/') {
			return Err(StyleguideError::Storage(format!("Invalid file name: {name:?}")));
		}
		if !folder_path.is_dir() {
			return Err(StyleguideError::NotFound(folder.to_string()));
		}

		let mut candidate = name.to_string();
		let mut attempt = 0;
		while folder_path.join(&candidate).exists() {
			attempt += 1;
			if attempt > MAX_RENAME_ATTEMPTS {
				return Err(StyleguideError::AlreadyExists(format!("{folder}/{name}")));
			}
			candidate = alternative_name(name, attempt);
		}

		tokio::fs::write(folder_path.join(&candidate), content).await?;
		Ok(candidate)
	}

	async fn list_files(&self, folder: &str) -> StyleguideResult<Vec<String>> {
		let path = self.folder_path(folder)?;
		if !path.is_dir() {
			return Err(StyleguideError::NotFound(folder.to_string()));
		}

		let mut names = Vec::new();
		let mut entries = tokio::fs::read_dir(&path).await?;
		while let Some(entry) = entries.next_entry().await? {
			if entry.file_type().await?.is_file() {
				names.push(entry.file_name().to_string_lossy().into_owned());
			}
		}
		names.sort();
		Ok(names)
	}
}
