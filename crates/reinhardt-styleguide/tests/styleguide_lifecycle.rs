//! Create/delete lifecycle tests against the in-memory database.

mod helpers;

use helpers::harness::StyleguideHarness;
use reinhardt_styleguide::generator::StaticDataGenerator;
use reinhardt_styleguide::prelude::*;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const FIXTURE_TABLES: &[&str] = &[
	"tx_styleguide_staticdata",
	"tx_styleguide_elements_basic",
	"tx_styleguide_inline_1n",
	"tx_styleguide_inline_1n_child",
	"tx_styleguide_inline_mm",
	"tx_styleguide_inline_mm_child",
	"tx_styleguide_inline_mm_mm",
];

#[fixture]
fn harness() -> StyleguideHarness {
	StyleguideHarness::new()
}

#[rstest]
fn test_main_tables_order(harness: StyleguideHarness) {
	assert_eq!(
		harness.styleguide.main_tables(),
		vec![
			"tx_styleguide_staticdata",
			"tx_styleguide_elements_basic",
			"tx_styleguide_inline_1n",
			"tx_styleguide_inline_mm",
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_create_builds_tree_and_fixtures(harness: StyleguideHarness) {
	let tree = harness.styleguide.create().await.unwrap();
	let db = &harness.db;

	// Root plus one page per main table, all table pages directly below root.
	assert_eq!(db.count("pages"), 5);
	assert_eq!(harness.root_pages(), 1);
	let table_pages: Vec<u64> = tree.page_uids.values().copied().collect();
	assert_eq!(db.children_in_order("pages", tree.root_uid), table_pages);
	for (table, uid) in &tree.page_uids {
		let page = db.row("pages", *uid).unwrap();
		assert_eq!(page["title"], json!(table));
		assert_eq!(page["tx_styleguide_containsdemo"], json!(table));
	}

	assert_eq!(harness.marked_records("tx_styleguide_staticdata"), 4);
	assert_eq!(harness.marked_records("tx_styleguide_elements_basic"), 1);
	assert_eq!(harness.marked_records("tx_styleguide_inline_1n"), 1);
	assert_eq!(harness.marked_records("tx_styleguide_inline_1n_child"), 2);
	assert_eq!(harness.marked_records("tx_styleguide_inline_mm"), 1);
	assert_eq!(harness.marked_records("tx_styleguide_inline_mm_child"), 2);
	assert_eq!(harness.marked_records("tx_styleguide_inline_mm_mm"), 2);
	assert_eq!(db.count("tt_content"), 0);

	assert_eq!(harness.marked_records("be_groups"), 2);
	assert_eq!(harness.marked_records("be_users"), 2);
	assert!(harness.asset_folder().join("styleguide.svg").is_file());
	assert_eq!(harness.listener.calls(), 1);
}

#[rstest]
#[tokio::test]
async fn test_generated_rows_live_on_their_table_page(harness: StyleguideHarness) {
	let tree = harness.styleguide.create().await.unwrap();
	let db = &harness.db;

	let basic = &db.rows("tx_styleguide_elements_basic")[0];
	assert_eq!(basic["pid"], json!(tree.page_of("tx_styleguide_elements_basic").unwrap()));
	assert_eq!(basic["input_1"], json!("input 1"));
	assert_eq!(basic["checkbox_1"], json!(1));
	assert_eq!(basic["number_1"], json!(5));
	assert_eq!(basic["select_1"], json!("first"));
	assert!(basic["rte_1"].as_str().unwrap().starts_with("<p>"));
	assert!(basic.get("flex_1").is_none());

	// The relation points at the first lookup row.
	let lookup = db.rows("tx_styleguide_staticdata");
	assert_eq!(basic["select_static"], lookup[0]["uid"]);
	assert_eq!(lookup[0]["value_1"], json!("foo"));

	let mm_page = tree.page_of("tx_styleguide_inline_mm").unwrap();
	for table in [
		"tx_styleguide_inline_mm",
		"tx_styleguide_inline_mm_child",
		"tx_styleguide_inline_mm_mm",
	] {
		for row in db.rows(table) {
			assert_eq!(row["pid"], json!(mm_page), "{table}");
		}
	}
}

#[rstest]
#[tokio::test]
async fn test_delete_after_create_leaves_no_demo_rows(harness: StyleguideHarness) {
	harness.styleguide.create().await.unwrap();
	let report = harness.styleguide.delete().await.unwrap();

	assert_eq!(report.root_pages, 1);
	assert_eq!(report.accounts, 2);
	assert_eq!(report.groups, 2);
	assert!(report.asset_folder);

	assert_eq!(harness.db.count("pages"), 0);
	for table in FIXTURE_TABLES {
		assert_eq!(harness.db.count(table), 0, "{table}");
	}
	assert_eq!(harness.marked_records("be_users"), 0);
	assert_eq!(harness.marked_records("be_groups"), 0);
	assert!(!harness.asset_folder().exists());
	assert_eq!(harness.listener.calls(), 2);
}

#[rstest]
#[tokio::test]
async fn test_delete_without_demo_data_is_noop(harness: StyleguideHarness) {
	let report = harness.styleguide.delete().await.unwrap();

	assert_eq!(report, RemovalReport::default());
	assert_eq!(harness.listener.calls(), 0);
}

#[rstest]
#[tokio::test]
async fn test_root_is_sorted_above_existing_pages(harness: StyleguideHarness) {
	let existing = harness.db.insert_row(
		"pages",
		json!({"title": "Home", "sorting": 512}).as_object().cloned().unwrap(),
	);

	let tree = harness.styleguide.create().await.unwrap();

	let root = harness.db.row("pages", tree.root_uid).unwrap();
	assert_eq!(root["sorting"], json!(256));
	assert_eq!(root["pid"], json!(0));
	assert_eq!(
		harness.db.children_in_order("pages", 0),
		vec![tree.root_uid, existing]
	);
}

#[rstest]
#[tokio::test]
async fn test_repeated_create_appends_tree_and_seeds_once(harness: StyleguideHarness) {
	let first = harness.styleguide.create().await.unwrap();
	let second = harness.styleguide.create().await.unwrap();

	assert_ne!(first.root_uid, second.root_uid);
	assert_eq!(harness.root_pages(), 2);
	assert_eq!(
		harness.db.children_in_order("pages", 0),
		vec![second.root_uid, first.root_uid]
	);
	assert_eq!(harness.marked_records("tx_styleguide_staticdata"), 8);

	// Accounts and assets are only seeded by the first run.
	assert_eq!(harness.marked_records("be_users"), 2);
	assert_eq!(harness.marked_records("be_groups"), 2);
	let files = std::fs::read_dir(harness.asset_folder()).unwrap().count();
	assert_eq!(files, 2);

	harness.styleguide.delete().await.unwrap();
	assert_eq!(harness.db.count("pages"), 0);
	assert_eq!(harness.db.count("tx_styleguide_staticdata"), 0);
}

#[rstest]
#[tokio::test]
async fn test_existing_asset_folder_is_kept_as_is(harness: StyleguideHarness) {
	std::fs::create_dir(harness.asset_folder()).unwrap();
	std::fs::write(harness.asset_folder().join("mine.txt"), b"mine").unwrap();

	harness.styleguide.create().await.unwrap();

	let files: Vec<String> = std::fs::read_dir(harness.asset_folder())
		.unwrap()
		.map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
		.collect();
	assert_eq!(files, vec!["mine.txt"]);
}

#[rstest]
#[tokio::test]
async fn test_baseline_accounts() {
	let harness = StyleguideHarness::new();
	harness.styleguide.create().await.unwrap();

	let users = harness.db.rows("be_users");
	let groups = harness.db.rows("be_groups");
	let group_uids: Vec<String> = groups
		.iter()
		.map(|group| group["uid"].as_u64().unwrap().to_string())
		.collect();

	assert_eq!(users[0]["username"], json!("styleguide demo user 1"));
	assert_eq!(users[0]["admin"], json!(0));
	assert_eq!(users[0]["usergroup"], json!(group_uids.join(",")));
	assert_eq!(users[1]["username"], json!("styleguide demo user 2"));
	assert_eq!(users[1]["admin"], json!(1));
	for user in &users {
		assert_eq!(user["disable"], json!(1));
		assert_eq!(user["password"], json!("fixed$32"));
	}
	for group in &groups {
		assert_eq!(group["hidden"], json!(1));
		assert_eq!(group["pid"], json!(0));
	}
}

#[rstest]
#[tokio::test]
async fn test_missing_generator_aborts_but_keeps_earlier_rows() {
	let harness = StyleguideHarness::with(
		StyleguideSettings::default(),
		GeneratorRegistry::new().with(StaticDataGenerator::new()),
	);

	let error = harness.styleguide.create().await.unwrap_err();

	assert!(
		matches!(error, StyleguideError::NoGeneratorFound(ref table) if table == "tx_styleguide_elements_basic")
	);
	assert!(error.is_configuration_error());
	assert_eq!(harness.marked_records("tx_styleguide_staticdata"), 4);
	assert_eq!(harness.db.count("tx_styleguide_elements_basic"), 0);
	assert_eq!(harness.root_pages(), 1);

	// Partial runs are cleaned up by delete.
	harness.styleguide.delete().await.unwrap();
	assert_eq!(harness.db.count("tx_styleguide_staticdata"), 0);
}

#[rstest]
#[tokio::test]
async fn test_invalid_settings_abort_before_any_write() {
	let mut settings = StyleguideSettings::default();
	settings.inline_children = 0;
	let harness = StyleguideHarness::with(settings, GeneratorRegistry::with_defaults());

	let error = harness.styleguide.create().await.unwrap_err();

	assert!(matches!(error, StyleguideError::InvalidSettings { .. }));
	assert!(harness.db.table_names().is_empty());
	assert!(!harness.asset_folder().exists());
}

#[rstest]
#[case("")]
#[case("../styleguide")]
#[tokio::test]
async fn test_delete_with_invalid_settings_keeps_everything(#[case] folder: &str) {
	let mut settings = StyleguideSettings::default();
	settings.assets.folder = folder.to_string();
	let harness = StyleguideHarness::with(settings, GeneratorRegistry::with_defaults());
	harness.db.insert_row(
		"pages",
		json!({"tx_styleguide_containsdemo": "root"}).as_object().cloned().unwrap(),
	);
	std::fs::write(harness.dir.path().join("customer.txt"), b"keep").unwrap();

	let error = harness.styleguide.delete().await.unwrap_err();

	assert!(
		matches!(error, StyleguideError::InvalidSettings { ref field, .. } if field == "assets.folder")
	);
	assert_eq!(harness.root_pages(), 1);
	assert!(harness.dir.path().join("customer.txt").is_file());
	assert_eq!(harness.listener.calls(), 0);
}

#[rstest]
#[tokio::test]
async fn test_custom_markers_are_used_throughout() {
	let settings = StyleguideSettings::from_toml_str(
		r#"
[markers]
page_field = "demo_page"
record_field = "demo_record"
root_value = "demo_root"
"#,
	)
	.unwrap();
	let harness = StyleguideHarness::with(settings, GeneratorRegistry::with_defaults());

	let tree = harness.styleguide.create().await.unwrap();

	let root = harness.db.row("pages", tree.root_uid).unwrap();
	assert_eq!(root["demo_page"], Value::from("demo_root"));
	assert_eq!(harness.marked_records("tx_styleguide_staticdata"), 4);
	assert_eq!(
		harness
			.db
			.count_where("tx_styleguide_staticdata", "tx_styleguide_isdemorecord", &json!(1)),
		0
	);

	harness.styleguide.delete().await.unwrap();
	assert_eq!(harness.db.count("pages"), 0);
	assert_eq!(harness.marked_records("be_users"), 0);
}
