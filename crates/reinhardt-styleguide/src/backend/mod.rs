//! Host collaborators consumed by the generator.
//!
//! The generator never talks to a database directly. Row creation and
//! deletion go through a [`DataHandler`], lookups go through a
//! [`RecordStore`]. Both are injected, so a real host binding and the
//! [`InMemoryDatabase`](memory::InMemoryDatabase) are interchangeable.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::datamap::{CommandMap, DataMap, SubstitutionMap};
use crate::error::StyleguideResult;

pub use memory::InMemoryDatabase;

/// Record-mutation subsystem.
///
/// Each call is one batch. The implementation is responsible for resolving
/// placeholders and for keeping the batch consistent; the generator performs
/// no locking and no rollback of its own.
#[async_trait]
pub trait DataHandler: Send + Sync {
	/// Creates all rows of `data` and returns the uids assigned to their placeholders.
	///
	/// # Errors
	///
	/// Returns `StyleguideError::Mutation` if a reference cannot be resolved
	/// or the batch is rejected.
	async fn process_data_map(&self, data: DataMap) -> StyleguideResult<SubstitutionMap>;

	/// Executes all commands of `commands`.
	///
	/// Deleting a page deletes its whole subtree.
	async fn process_command_map(&self, commands: CommandMap) -> StyleguideResult<()>;
}

/// Read access to stored rows.
#[async_trait]
pub trait RecordStore: Send + Sync {
	/// Returns the uids of all rows of `table` whose `field` equals `value`, in uid order.
	async fn find_uids(&self, table: &str, field: &str, value: &Value) -> StyleguideResult<Vec<u64>>;

	/// Returns the lowest `sorting` value among rows of `table` on page `pid`.
	async fn lowest_sorting(&self, table: &str, pid: u64) -> StyleguideResult<Option<i64>>;
}

/// Receives page tree change notifications.
///
/// Notifications are advisory; implementations typically refresh a cached
/// navigation tree.
pub trait PageTreeListener: Send + Sync {
	/// Called after the page tree was modified.
	fn page_tree_changed(&self);
}
