use trialdesk_core::SelectionSet;

use super::{App, ErrorContext, InputMode, MSG_NOTHING_EXTRACTABLE, Op, Stage};
use crate::model::browser::BrowserState;
use crate::tui_event::BackendCommand;

impl App {
    /// Toggle the folder item under the cursor. Items of disabled categories
    /// cannot be selected.
    pub(crate) fn toggle_current_item(&mut self) {
        let Some(entry) = self.browser.current() else {
            return;
        };
        if !entry.category.enabled() {
            self.notice = Some("demo不支持处理此类材料".to_string());
            return;
        }
        let key = entry.key();
        self.selection.toggle(&key);
        self.notice = None;
    }

    /// Send the extractable part of the selection to the backend. An empty
    /// selection does nothing; a selection with nothing extractable is an
    /// error that never reaches the backend.
    pub(crate) fn request_extract(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let keys = self.selection.extractable_keys();
        if keys.is_empty() {
            self.set_error(ErrorContext::Extract, MSG_NOTHING_EXTRACTABLE);
            return;
        }
        self.error = None;
        self.extracting = true;
        let generation = self.generations.bump(Op::Extract);
        self.send(BackendCommand::Extract { generation, keys });
    }

    /// Ask for a summary of the selected record. Without a selection there
    /// is nothing to send.
    pub(crate) fn request_summary(&mut self) {
        let Some(record) = self
            .results
            .as_ref()
            .and_then(|r| r.selected_record())
            .cloned()
        else {
            self.notice = Some("请先选择一篇关键文献".to_string());
            return;
        };
        self.error = None;
        self.notice = None;
        self.generating_summary = true;
        let generation = self.generations.bump(Op::Summary);
        self.send(BackendCommand::GenerateSummary { generation, record });
    }

    /// Send the current draft for rendering. Ignored while a download is
    /// already running.
    pub(crate) fn request_download(&mut self) {
        let Some(summary) = self.summary.as_mut() else {
            return;
        };
        if summary.downloading {
            return;
        }
        summary.downloading = true;
        let draft = summary.draft.clone();
        self.error = None;
        self.notice = None;
        let generation = self.generations.bump(Op::Download);
        self.send(BackendCommand::Download {
            generation,
            draft,
            dir: self.download_dir.clone(),
        });
    }

    /// Results → Main. Extraction and summary state are discarded.
    pub(crate) fn back_to_main(&mut self) {
        self.generations.bump(Op::Summary);
        self.generations.bump(Op::Download);
        self.results = None;
        self.summary = None;
        self.stage = Stage::Main;
        self.notice = None;
    }

    /// Summary → Results. The draft is discarded, the results kept.
    pub(crate) fn back_to_results(&mut self) {
        self.generations.bump(Op::Download);
        self.summary = None;
        self.input_mode = InputMode::Normal;
        self.stage = Stage::Results;
        self.notice = None;
    }

    /// Drop every piece of in-memory state and rerun the startup sequence.
    /// Generations keep counting up so nothing issued before the reload can
    /// land afterwards.
    pub(crate) fn reload(&mut self) {
        tracing::info!("reloading");
        self.generations.bump_all();
        self.stage = Stage::Main;
        self.input_mode = InputMode::Normal;
        self.extracting = false;
        self.generating_summary = false;
        self.error = None;
        self.listing = Default::default();
        self.browser = BrowserState::default();
        self.selection = SelectionSet::new();
        self.results = None;
        self.summary = None;
        self.notice = None;
        self.start_load();
    }
}
