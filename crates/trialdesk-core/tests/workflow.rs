//! Integration tests driving the data model through [`MockService`].
//!
//! These run the browse → extract → select → summarise → download sequence
//! against the mock, without a backend or a terminal.

use std::collections::BTreeMap;

use serde_json::json;
use trialdesk_core::results::find_selected;
use trialdesk_core::{
    Category, ExtractionRecord, ExtractionResponse, FieldPath, FolderListing, GroupedResults,
    MockService, NestedField, RemoteError, RemoteService, SelectionSet, SummaryDraft,
    SummaryResponse, save_document,
};

fn cde_record(name: &str) -> ExtractionRecord {
    let mut rec: ExtractionRecord = serde_json::from_value(json!({
        "literature_name": name,
        "section_name": Category::Cde.name(),
        "md_file_path": format!("E:\\data\\{name}.md"),
        "company_name": "某药业",
        "total_sample_size": 240,
    }))
    .unwrap();
    rec.inclusion_criteria = Some("18-75岁".into());
    rec
}

fn listing() -> FolderListing {
    let mut map = BTreeMap::new();
    map.insert(Category::Cde.name().to_string(), vec!["doc1".to_string()]);
    map.insert(Category::ForeignTrial.name().to_string(), vec![]);
    FolderListing::from_map(map)
}

#[tokio::test]
async fn end_to_end_single_cde_document() {
    let svc = MockService::new()
        .with_listing(listing())
        .with_extraction(Ok(ExtractionResponse {
            results: vec![cde_record("doc1")],
            total_processed: Some(1),
        }));

    assert!(svc.health_check().await);
    let folders = svc.get_all_folders().await;
    assert_eq!(folders.total_items(), 1);

    let mut selection = SelectionSet::new();
    selection.toggle_item(Category::Cde, &folders.items(Category::Cde)[0]);
    let keys = selection.extractable_keys();
    let resp = svc.extract_key_info(&keys).await.unwrap();

    assert_eq!(
        svc.extract_calls(),
        vec![vec!["CDE同类品种-临床备案公示平台试验信息/doc1".to_string()]]
    );

    let grouped = GroupedResults::build(&resp.results);
    assert_eq!(grouped.row_count(Category::Cde), 1);
    assert_eq!(grouped.row_count(Category::ForeignTrial), 0);
    assert_eq!(grouped.footer(), "共处理 1 个文献，成功 1 个，失败 0 个");
    let row = grouped.rows().next().unwrap();
    assert_eq!(row.cells[0], "某药业");
    assert_eq!(row.cells[6], "240");
}

#[tokio::test]
async fn selected_record_round_trips_to_summary_request() {
    let records = vec![cde_record("same"), {
        let mut r = cde_record("same");
        r.section_name = Some(Category::ForeignTrial.name().to_string());
        r
    }];
    let svc = MockService::new().with_summary(Ok(SummaryResponse {
        summary: serde_json::from_value(json!({"study_title": "T", "sponsor": "S"})).unwrap(),
    }));

    let key = records[0].key();
    let chosen = find_selected(&records, &key).unwrap();
    let resp = svc.generate_summary(chosen).await.unwrap();

    let sent = svc.summary_calls();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].category(), Some(Category::Cde));
    assert_eq!(sent[0].md_file_path.as_deref(), Some("E:\\data\\same.md"));
    assert_eq!(resp.summary.editable_copy().sponsor, "");
}

#[tokio::test]
async fn edited_leaf_is_the_only_difference_in_download() {
    let original: SummaryDraft = serde_json::from_value(json!({
        "study_title": "T",
        "trial_design": {
            "study_population_selection": "pop",
            "positive_control_selection": "old",
        }
    }))
    .unwrap();
    let svc = MockService::new().with_document(Ok(b"PK-docx".to_vec()));

    let mut draft = original.editable_copy();
    let path = FieldPath::Nested(NestedField::PositiveControlSelection);
    draft.set(path, "X".into());
    let bytes = svc.download_summary(&draft).await.unwrap();

    let sent = svc.download_calls().remove(0);
    let mut expected = original.editable_copy();
    expected.trial_design.positive_control_selection = "X".into();
    assert_eq!(sent, expected);

    let dir = tempfile::tempdir().unwrap();
    let saved = save_document(dir.path(), bytes).unwrap();
    assert_eq!(std::fs::read(saved).unwrap(), b"PK-docx");
}

#[tokio::test]
async fn extraction_failure_surfaces_message() {
    let svc = MockService::new().with_extraction(Err(RemoteError::http_status(500)));
    let err = svc
        .extract_key_info(&["国外试验文献调研/p".to_string()])
        .await
        .unwrap_err();
    assert_eq!(format!("提取关键信息失败: {}", err.message()), "提取关键信息失败: HTTP error! status: 500");
}
