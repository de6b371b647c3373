use super::{App, BackendStatus, ErrorContext, MSG_BACKEND_DOWN, MSG_NO_FOLDERS, Op, Stage};
use crate::model::browser::BrowserState;
use crate::model::results::ResultsState;
use crate::model::summary::SummaryState;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state. Events from a
    /// superseded request are logged and dropped.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Loaded {
                generation,
                healthy,
                listing,
            } => {
                if !self.accept(Op::Load, generation) {
                    return;
                }
                self.loading = false;
                if !healthy {
                    self.backend_status = BackendStatus::Error;
                    self.set_error(ErrorContext::Load, MSG_BACKEND_DOWN);
                    return;
                }
                self.backend_status = BackendStatus::Connected;
                let total = listing.total_items();
                tracing::info!(total, "folder listing loaded");
                self.browser = BrowserState::from_listing(&listing);
                self.listing = listing;
                if total == 0 {
                    self.set_error(ErrorContext::Load, MSG_NO_FOLDERS);
                }
            }
            BackendEvent::Extracted { generation, result } => {
                if !self.accept(Op::Extract, generation) {
                    return;
                }
                self.extracting = false;
                match result {
                    Ok(resp) => {
                        tracing::info!(records = resp.results.len(), "extraction results received");
                        self.results = Some(ResultsState::new(resp.results));
                        self.summary = None;
                        self.stage = Stage::Results;
                    }
                    Err(e) => {
                        self.set_error(
                            ErrorContext::Extract,
                            format!("提取关键信息失败: {}", e.message()),
                        );
                    }
                }
            }
            BackendEvent::SummaryGenerated { generation, result } => {
                if !self.accept(Op::Summary, generation) {
                    return;
                }
                self.generating_summary = false;
                match result {
                    Ok(resp) => {
                        self.summary = Some(SummaryState::new(&resp.summary));
                        self.stage = Stage::Summary;
                    }
                    Err(e) => {
                        self.set_error(
                            ErrorContext::Summary,
                            format!("生成方案摘要失败: {}", e.message()),
                        );
                    }
                }
            }
            BackendEvent::Downloaded { generation, result } => {
                if !self.accept(Op::Download, generation) {
                    return;
                }
                if let Some(summary) = self.summary.as_mut() {
                    summary.downloading = false;
                }
                match result {
                    Ok(path) => {
                        self.notice = Some(format!("已保存: {}", path.display()));
                        if let Some(summary) = self.summary.as_mut() {
                            summary.saved_to = Some(path);
                        }
                    }
                    Err(msg) => {
                        self.set_error(ErrorContext::Download, format!("下载方案摘要失败: {msg}"));
                    }
                }
            }
        }
    }

    fn accept(&self, op: Op, generation: u64) -> bool {
        let current = self.generations.is_current(op, generation);
        if !current {
            tracing::info!(?op, generation, "dropping stale backend response");
        }
        current
    }
}
