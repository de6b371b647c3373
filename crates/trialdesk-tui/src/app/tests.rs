use std::path::PathBuf;

use tokio::sync::mpsc;
use trialdesk_core::summary::form_fields;
use trialdesk_core::{
    Category, ExtractionRecord, ExtractionResponse, FieldPath, NestedField, RemoteError,
    SummaryResponse,
};

use super::*;
use crate::action::Action;
use crate::tui_event::BackendEvent;

/// An App wired to a command channel the test can inspect.
fn test_app() -> (App, mpsc::UnboundedReceiver<BackendCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(
        Theme::hacker(),
        "http://localhost:5000".into(),
        "/data".into(),
        PathBuf::from("/tmp/downloads"),
    );
    app.backend_cmd_tx = Some(tx);
    (app, rx)
}

fn listing() -> FolderListing {
    let mut listing = FolderListing::empty();
    listing.insert(Category::Cde, vec!["a".into(), "b".into()]);
    listing.insert(Category::ForeignTrial, vec!["c".into()]);
    listing.insert(Category::Regulation, vec!["r".into()]);
    listing
}

fn record(name: &str, category: Category) -> ExtractionRecord {
    ExtractionRecord {
        literature_name: name.to_string(),
        section_name: Some(category.name().to_string()),
        ..Default::default()
    }
}

fn next_command(rx: &mut mpsc::UnboundedReceiver<BackendCommand>) -> BackendCommand {
    rx.try_recv().expect("a command was sent")
}

/// Run the startup sequence against `listing()` and land on the browser.
fn loaded_app() -> (App, mpsc::UnboundedReceiver<BackendCommand>) {
    let (mut app, mut rx) = test_app();
    app.start_load();
    let BackendCommand::Load { generation } = next_command(&mut rx) else {
        panic!("expected Load");
    };
    app.handle_backend_event(BackendEvent::Loaded {
        generation,
        healthy: true,
        listing: listing(),
    });
    (app, rx)
}

/// Select the first CDE item, extract, and answer with `records`.
fn results_app(records: Vec<ExtractionRecord>) -> (App, mpsc::UnboundedReceiver<BackendCommand>) {
    let (mut app, mut rx) = loaded_app();
    app.update(Action::Toggle);
    app.update(Action::Extract);
    let BackendCommand::Extract { generation, .. } = next_command(&mut rx) else {
        panic!("expected Extract");
    };
    app.handle_backend_event(BackendEvent::Extracted {
        generation,
        result: Ok(ExtractionResponse {
            results: records,
            total_processed: None,
        }),
    });
    (app, rx)
}

/// Select the only CDE result and answer the summary request.
fn summary_app() -> (App, mpsc::UnboundedReceiver<BackendCommand>) {
    let (mut app, mut rx) = results_app(vec![record("a", Category::Cde)]);
    app.update(Action::Toggle);
    app.update(Action::GenerateSummary);
    let BackendCommand::GenerateSummary { generation, .. } = next_command(&mut rx) else {
        panic!("expected GenerateSummary");
    };
    let mut summary = trialdesk_core::SummaryDraft::default();
    summary.study_title = "T".into();
    summary.sponsor = "S".into();
    summary.study_objectives.primary_objective = "P".into();
    app.handle_backend_event(BackendEvent::SummaryGenerated {
        generation,
        result: Ok(SummaryResponse { summary }),
    });
    (app, rx)
}

// ── Startup ─────────────────────────────────────────────────────

#[test]
fn start_load_sends_load_and_shows_loading() {
    let (mut app, mut rx) = test_app();
    app.start_load();
    assert_eq!(app.render_mode(), RenderMode::Loading);
    assert_eq!(app.backend_status, BackendStatus::Checking);
    assert!(matches!(next_command(&mut rx), BackendCommand::Load { .. }));
}

#[test]
fn healthy_load_shows_browser() {
    let (app, _rx) = loaded_app();
    assert_eq!(app.render_mode(), RenderMode::Main);
    assert_eq!(app.backend_status, BackendStatus::Connected);
    assert_eq!(app.browser.entries.len(), 4);
}

#[test]
fn unhealthy_backend_is_a_load_error() {
    let (mut app, mut rx) = test_app();
    app.start_load();
    let BackendCommand::Load { generation } = next_command(&mut rx) else {
        panic!("expected Load");
    };
    app.handle_backend_event(BackendEvent::Loaded {
        generation,
        healthy: false,
        listing: FolderListing::default(),
    });
    assert_eq!(app.render_mode(), RenderMode::Error);
    assert_eq!(app.backend_status, BackendStatus::Error);
    let error = app.error.as_ref().unwrap();
    assert_eq!(error.context.heading(), "加载失败");
    assert_eq!(error.message, MSG_BACKEND_DOWN);

    // Load errors cannot be dismissed, only reloaded.
    app.update(Action::NavigateBack);
    assert_eq!(app.render_mode(), RenderMode::Error);
    app.update(Action::Reload);
    assert_eq!(app.render_mode(), RenderMode::Loading);
    assert!(matches!(next_command(&mut rx), BackendCommand::Load { .. }));
}

#[test]
fn empty_listing_reports_no_folders() {
    let (mut app, mut rx) = test_app();
    app.start_load();
    let BackendCommand::Load { generation } = next_command(&mut rx) else {
        panic!("expected Load");
    };
    app.handle_backend_event(BackendEvent::Loaded {
        generation,
        healthy: true,
        listing: FolderListing::empty(),
    });
    assert_eq!(app.backend_status, BackendStatus::Connected);
    assert_eq!(app.error.as_ref().unwrap().message, MSG_NO_FOLDERS);
}

// ── Browser selection ───────────────────────────────────────────

#[test]
fn toggling_twice_restores_selection() {
    let (mut app, _rx) = loaded_app();
    app.update(Action::Toggle);
    assert_eq!(app.selection.len(), 1);
    app.update(Action::Toggle);
    assert!(app.selection.is_empty());
}

#[test]
fn disabled_category_items_cannot_be_selected() {
    let (mut app, _rx) = loaded_app();
    app.update(Action::GoBottom);
    assert_eq!(app.browser.current().unwrap().category, Category::Regulation);
    app.update(Action::Toggle);
    assert!(app.selection.is_empty());
    assert_eq!(app.notice.as_deref(), Some("demo不支持处理此类材料"));
}

#[test]
fn extract_with_empty_selection_does_nothing() {
    let (mut app, mut rx) = loaded_app();
    app.update(Action::Extract);
    assert_eq!(app.render_mode(), RenderMode::Main);
    assert!(rx.try_recv().is_err());
}

#[test]
fn extract_with_nothing_extractable_never_reaches_backend() {
    let (mut app, mut rx) = loaded_app();
    app.selection.toggle_item(Category::Label, "x");
    app.update(Action::Extract);
    assert_eq!(app.render_mode(), RenderMode::Error);
    assert_eq!(app.error.as_ref().unwrap().message, MSG_NOTHING_EXTRACTABLE);
    assert!(rx.try_recv().is_err());
}

// ── Extraction ──────────────────────────────────────────────────

#[test]
fn extract_sends_only_extractable_keys() {
    let (mut app, mut rx) = loaded_app();
    app.update(Action::Toggle);
    app.selection.toggle_item(Category::Label, "x");
    app.update(Action::Extract);
    assert_eq!(app.render_mode(), RenderMode::Loading);
    let BackendCommand::Extract { keys, .. } = next_command(&mut rx) else {
        panic!("expected Extract");
    };
    assert_eq!(keys, [Category::Cde.item_key("a")]);
}

#[test]
fn successful_extraction_shows_results() {
    let (app, _rx) = results_app(vec![
        record("a", Category::Cde),
        record("c", Category::ForeignTrial),
    ]);
    assert_eq!(app.render_mode(), RenderMode::Results);
    let results = app.results.as_ref().unwrap();
    assert_eq!(results.row_count(), 2);
    assert!(results.selected.is_none());
}

#[test]
fn extraction_failure_is_dismissible() {
    let (mut app, mut rx) = loaded_app();
    app.update(Action::Toggle);
    app.update(Action::Extract);
    let BackendCommand::Extract { generation, .. } = next_command(&mut rx) else {
        panic!("expected Extract");
    };
    app.handle_backend_event(BackendEvent::Extracted {
        generation,
        result: Err(RemoteError::http_status(500)),
    });
    let error = app.error.as_ref().unwrap();
    assert_eq!(error.context.heading(), "提取失败");
    assert_eq!(error.message, "提取关键信息失败: HTTP error! status: 500");

    app.update(Action::NavigateBack);
    assert_eq!(app.render_mode(), RenderMode::Main);
    assert_eq!(app.selection.len(), 1);
}

#[test]
fn stale_extraction_after_reload_is_ignored() {
    let (mut app, mut rx) = loaded_app();
    app.update(Action::Toggle);
    app.update(Action::Extract);
    let BackendCommand::Extract { generation, .. } = next_command(&mut rx) else {
        panic!("expected Extract");
    };

    app.reload();
    app.handle_backend_event(BackendEvent::Extracted {
        generation,
        result: Ok(ExtractionResponse::default()),
    });
    assert!(app.results.is_none());
    assert_eq!(app.stage, Stage::Main);
    assert!(app.selection.is_empty());
    // Still waiting on the reload's own Load.
    assert_eq!(app.render_mode(), RenderMode::Loading);
}

// ── Results ─────────────────────────────────────────────────────

#[test]
fn column_keys_page_result_fields() {
    let (mut app, _rx) = results_app(vec![record("a", Category::Cde)]);
    app.update(Action::ColumnRight);
    app.update(Action::ColumnRight);
    assert_eq!(app.results.as_ref().unwrap().column_offset, 2);
    app.update(Action::ColumnLeft);
    assert_eq!(app.results.as_ref().unwrap().column_offset, 1);
    assert!(app.results.as_ref().unwrap().selected.is_none());
}

#[test]
fn result_selection_is_exclusive() {
    let (mut app, _rx) = results_app(vec![
        record("a", Category::Cde),
        record("c", Category::ForeignTrial),
    ]);
    app.update(Action::Toggle);
    app.update(Action::MoveDown);
    app.update(Action::Toggle);
    let results = app.results.as_ref().unwrap();
    assert_eq!(
        results.selected_record().map(|r| r.literature_name.as_str()),
        Some("c")
    );
}

#[test]
fn summary_without_selection_sends_nothing() {
    let (mut app, mut rx) = results_app(vec![record("a", Category::Cde)]);
    app.update(Action::GenerateSummary);
    assert_eq!(app.render_mode(), RenderMode::Results);
    assert_eq!(app.notice.as_deref(), Some("请先选择一篇关键文献"));
    assert!(rx.try_recv().is_err());
}

#[test]
fn summary_request_carries_selected_record() {
    let (mut app, mut rx) = results_app(vec![record("a", Category::Cde)]);
    app.update(Action::Toggle);
    app.update(Action::GenerateSummary);
    assert_eq!(app.render_mode(), RenderMode::Loading);
    let BackendCommand::GenerateSummary { record: sent, .. } = next_command(&mut rx) else {
        panic!("expected GenerateSummary");
    };
    assert_eq!(sent, record("a", Category::Cde));
}

#[test]
fn summary_success_blanks_sponsor() {
    let (app, _rx) = summary_app();
    assert_eq!(app.render_mode(), RenderMode::Summary);
    let summary = app.summary.as_ref().unwrap();
    assert_eq!(summary.draft.study_title, "T");
    assert_eq!(summary.draft.sponsor, "");
    assert!(!summary.dirty);
}

#[test]
fn summary_failure_stays_on_results() {
    let (mut app, mut rx) = results_app(vec![record("a", Category::Cde)]);
    app.update(Action::Toggle);
    app.update(Action::GenerateSummary);
    let BackendCommand::GenerateSummary { generation, .. } = next_command(&mut rx) else {
        panic!("expected GenerateSummary");
    };
    app.handle_backend_event(BackendEvent::SummaryGenerated {
        generation,
        result: Err(RemoteError::Failed("model timeout".into())),
    });
    assert_eq!(app.error.as_ref().unwrap().message, "生成方案摘要失败: model timeout");
    app.update(Action::NavigateBack);
    assert_eq!(app.render_mode(), RenderMode::Results);
    assert!(app.results.as_ref().unwrap().selected.is_some());
}

#[test]
fn back_from_results_discards_them() {
    let (mut app, _rx) = results_app(vec![record("a", Category::Cde)]);
    app.update(Action::NavigateBack);
    assert_eq!(app.render_mode(), RenderMode::Main);
    assert!(app.results.is_none());
    assert_eq!(app.selection.len(), 1);
}

// ── Summary editing and download ────────────────────────────────

#[test]
fn edited_nested_leaf_is_the_only_change_downloaded() {
    let (mut app, mut rx) = summary_app();
    let original = app.summary.as_ref().unwrap().draft.clone();
    let index = form_fields()
        .position(|f| f.path == FieldPath::Nested(NestedField::PrimaryObjective))
        .unwrap();
    app.summary.as_mut().unwrap().cursor = index;

    app.update(Action::DrillIn);
    assert_eq!(app.input_mode, InputMode::TextInput);
    app.update(Action::InputChar('2'));
    app.update(Action::InputConfirm);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.summary.as_ref().unwrap().dirty);

    app.update(Action::Download);
    let BackendCommand::Download { draft, dir, .. } = next_command(&mut rx) else {
        panic!("expected Download");
    };
    assert_eq!(dir, PathBuf::from("/tmp/downloads"));
    let mut expected = original;
    expected.study_objectives.primary_objective = "P2".into();
    assert_eq!(draft, expected);
}

#[test]
fn cancelled_edit_changes_nothing() {
    let (mut app, _rx) = summary_app();
    let original = app.summary.as_ref().unwrap().draft.clone();
    app.update(Action::EditField);
    app.update(Action::InputChar('x'));
    // Keys that would navigate in normal mode only edit text here.
    app.update(Action::InputChar('q'));
    assert!(!app.confirm_quit);
    app.update(Action::InputCancel);
    assert_eq!(app.summary.as_ref().unwrap().draft, original);
}

#[test]
fn download_success_records_path() {
    let (mut app, mut rx) = summary_app();
    app.update(Action::Download);
    assert!(app.summary.as_ref().unwrap().downloading);
    // A second press while downloading is ignored.
    app.update(Action::Download);
    let BackendCommand::Download { generation, .. } = next_command(&mut rx) else {
        panic!("expected Download");
    };
    assert!(rx.try_recv().is_err());

    let path = PathBuf::from("/tmp/downloads/方案摘要.docx");
    app.handle_backend_event(BackendEvent::Downloaded {
        generation,
        result: Ok(path.clone()),
    });
    let summary = app.summary.as_ref().unwrap();
    assert!(!summary.downloading);
    assert_eq!(summary.saved_to.as_ref(), Some(&path));
    assert_eq!(app.render_mode(), RenderMode::Summary);
}

#[test]
fn download_failure_stays_on_summary() {
    let (mut app, mut rx) = summary_app();
    app.update(Action::Download);
    let BackendCommand::Download { generation, .. } = next_command(&mut rx) else {
        panic!("expected Download");
    };
    app.handle_backend_event(BackendEvent::Downloaded {
        generation,
        result: Err("HTTP error! status: 502".into()),
    });
    let error = app.error.as_ref().unwrap();
    assert_eq!(error.context.heading(), "下载失败");
    assert_eq!(error.message, "下载方案摘要失败: HTTP error! status: 502");

    app.update(Action::NavigateBack);
    assert_eq!(app.render_mode(), RenderMode::Summary);
    assert!(!app.summary.as_ref().unwrap().downloading);
}

#[test]
fn download_landing_after_back_is_dropped() {
    let (mut app, mut rx) = summary_app();
    app.update(Action::Download);
    let BackendCommand::Download { generation, .. } = next_command(&mut rx) else {
        panic!("expected Download");
    };
    app.update(Action::NavigateBack);
    assert_eq!(app.render_mode(), RenderMode::Results);

    app.handle_backend_event(BackendEvent::Downloaded {
        generation,
        result: Err("late".into()),
    });
    assert!(app.error.is_none());
    assert!(app.notice.is_none());
}

// ── Global keys ─────────────────────────────────────────────────

#[test]
fn reload_resets_everything() {
    let (mut app, mut rx) = summary_app();
    app.update(Action::NavigateBack);
    app.update(Action::NavigateBack);
    app.update(Action::Reload);
    assert!(app.results.is_none());
    assert!(app.summary.is_none());
    assert!(app.selection.is_empty());
    assert_eq!(app.render_mode(), RenderMode::Loading);
    assert!(matches!(next_command(&mut rx), BackendCommand::Load { .. }));
}

#[test]
fn quit_asks_for_confirmation() {
    let (mut app, _rx) = loaded_app();
    assert!(!app.update(Action::Quit));
    assert!(app.confirm_quit);
    app.update(Action::NavigateBack);
    assert!(!app.confirm_quit);
    app.update(Action::Quit);
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

#[test]
fn force_quit_works_while_loading() {
    let (mut app, _rx) = test_app();
    app.start_load();
    assert!(app.update(Action::ForceQuit));
}

#[test]
fn help_overlay_swallows_navigation() {
    let (mut app, _rx) = loaded_app();
    app.update(Action::ToggleHelp);
    app.update(Action::MoveDown);
    assert_eq!(app.browser.cursor, 0);
    app.update(Action::ToggleHelp);
    assert!(!app.show_help);
}
