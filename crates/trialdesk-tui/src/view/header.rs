use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;

/// Title bar with the backend status indicator on the right.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let [left, right] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(24)]).areas(area);

    let title = Line::from(vec![
        Span::styled(" 医学方案摘要协作平台 ", theme.header_style()),
        Span::styled(
            format!(" {}", stage_title(app)),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(title), left);

    let status = Line::from(vec![
        Span::styled(
            "\u{25CF} ",
            Style::default().fg(theme.backend_status_color(app.backend_status)),
        ),
        Span::styled(app.backend_status.label(), Style::default().fg(theme.dim)),
        Span::raw(" "),
    ])
    .alignment(Alignment::Right);
    f.render_widget(Paragraph::new(status), right);
}

fn stage_title(app: &App) -> &'static str {
    match app.render_mode() {
        crate::app::RenderMode::Results => "关键信息提取结果",
        crate::app::RenderMode::Summary => "关键文献方案摘要",
        _ => "",
    }
}
