mod backend;
mod requests;
mod update;

use std::path::PathBuf;

use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;

use trialdesk_core::{FolderListing, SelectionSet};

use crate::model::browser::BrowserState;
use crate::model::results::ResultsState;
use crate::model::summary::SummaryState;
use crate::theme::Theme;
use crate::tui_event::BackendCommand;

pub const MSG_BACKEND_DOWN: &str = "后端服务连接失败，请确保Python服务已启动";
pub const MSG_NO_FOLDERS: &str = "未找到任何文件夹，请检查路径是否正确";
pub const MSG_NOTHING_EXTRACTABLE: &str =
    "请选择至少一个\"CDE同类品种-临床备案公示平台试验信息\"或\"国外试验文献调研\"类目下的文献";

/// Which of the three content screens is current once nothing is loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Main,
    Results,
    Summary,
}

/// What the frame shows. Derived from the flags and the stage, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Loading,
    Error,
    Main,
    Results,
    Summary,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    TextInput,
}

/// Backend reachability as last observed by the startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Checking,
    Connected,
    Error,
}

impl BackendStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Checking => "检查服务状态...",
            Self::Connected => "服务已连接",
            Self::Error => "服务连接失败",
        }
    }
}

/// The operation that failed; picks the banner heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    Load,
    Extract,
    Summary,
    Download,
}

impl ErrorContext {
    pub fn heading(self) -> &'static str {
        match self {
            Self::Load => "加载失败",
            Self::Extract => "提取失败",
            Self::Summary => "生成摘要失败",
            Self::Download => "下载失败",
        }
    }

    /// Load failures leave nothing to go back to; only reload helps.
    pub fn dismissible(self) -> bool {
        self != Self::Load
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub context: ErrorContext,
    pub message: String,
}

/// Request kinds tracked by the in-flight guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Load,
    Extract,
    Summary,
    Download,
}

/// Latest generation issued per request kind. A response is applied only if
/// it carries the latest generation for its kind.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    load: u64,
    extract: u64,
    summary: u64,
    download: u64,
}

impl Generations {
    fn slot(&mut self, op: Op) -> &mut u64 {
        match op {
            Op::Load => &mut self.load,
            Op::Extract => &mut self.extract,
            Op::Summary => &mut self.summary,
            Op::Download => &mut self.download,
        }
    }

    /// Issue a new generation, invalidating everything in flight for `op`.
    pub fn bump(&mut self, op: Op) -> u64 {
        let slot = self.slot(op);
        *slot += 1;
        *slot
    }

    pub fn bump_all(&mut self) {
        for op in [Op::Load, Op::Extract, Op::Summary, Op::Download] {
            self.bump(op);
        }
    }

    pub fn is_current(&self, op: Op, generation: u64) -> bool {
        let latest = match op {
            Op::Load => self.load,
            Op::Extract => self.extract,
            Op::Summary => self.summary,
            Op::Download => self.download,
        };
        latest == generation
    }
}

/// Root state container. Owned by `main`; views read it, `update` and
/// `handle_backend_event` are the only writers.
pub struct App {
    pub theme: Theme,
    pub api_url: String,
    pub data_root: String,
    pub download_dir: PathBuf,

    pub stage: Stage,
    pub input_mode: InputMode,
    pub backend_status: BackendStatus,
    pub loading: bool,
    pub extracting: bool,
    pub generating_summary: bool,
    pub error: Option<ErrorBanner>,

    pub listing: FolderListing,
    pub browser: BrowserState,
    pub selection: SelectionSet,
    pub results: Option<ResultsState>,
    pub summary: Option<SummaryState>,

    /// One-line notice in the footer, cleared on the next navigation.
    pub notice: Option<String>,
    pub generations: Generations,
    pub tick: usize,
    pub visible_rows: usize,
    pub show_help: bool,
    pub confirm_quit: bool,
    pub should_quit: bool,
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(theme: Theme, api_url: String, data_root: String, download_dir: PathBuf) -> Self {
        Self {
            theme,
            api_url,
            data_root,
            download_dir,
            stage: Stage::Main,
            input_mode: InputMode::Normal,
            backend_status: BackendStatus::Checking,
            loading: true,
            extracting: false,
            generating_summary: false,
            error: None,
            listing: FolderListing::empty(),
            browser: BrowserState::default(),
            selection: SelectionSet::new(),
            results: None,
            summary: None,
            notice: None,
            generations: Generations::default(),
            tick: 0,
            visible_rows: 20,
            show_help: false,
            confirm_quit: false,
            should_quit: false,
            backend_cmd_tx: None,
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        if self.loading || self.extracting || self.generating_summary {
            return RenderMode::Loading;
        }
        if self.error.is_some() {
            return RenderMode::Error;
        }
        match self.stage {
            Stage::Main => RenderMode::Main,
            Stage::Results => RenderMode::Results,
            Stage::Summary => RenderMode::Summary,
        }
    }

    pub(crate) fn set_error(&mut self, context: ErrorContext, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(heading = context.heading(), %message, "showing error");
        self.error = Some(ErrorBanner { context, message });
    }

    /// Hand a command to the backend task. Without a backend (tests, or after
    /// shutdown) the command is logged and dropped.
    pub(crate) fn send(&self, cmd: BackendCommand) {
        match &self.backend_cmd_tx {
            Some(tx) => {
                if tx.send(cmd).is_err() {
                    tracing::warn!("backend task is gone, command dropped");
                }
            }
            None => tracing::debug!(?cmd, "no backend attached"),
        }
    }

    /// Kick off the startup sequence: health check, then folder listing.
    pub fn start_load(&mut self) {
        self.loading = true;
        self.backend_status = BackendStatus::Checking;
        let generation = self.generations.bump(Op::Load);
        tracing::info!(generation, api_url = %self.api_url, "loading folder data");
        self.send(BackendCommand::Load { generation });
    }

    /// Render the current frame.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        crate::view::header::render(f, self, header_area);

        match self.render_mode() {
            RenderMode::Loading => crate::view::loading::render_in(f, self, body_area, footer_area),
            RenderMode::Error => crate::view::error::render_in(f, self, body_area, footer_area),
            RenderMode::Main => crate::view::browser::render_in(f, self, body_area, footer_area),
            RenderMode::Results => crate::view::results::render_in(f, self, body_area, footer_area),
            RenderMode::Summary => crate::view::summary::render_in(f, self, body_area, footer_area),
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests;
