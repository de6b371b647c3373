use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use unicode_width::UnicodeWidthStr;

use crate::app::{App, BackendStatus};
use crate::view::centered_rect;

/// Error banner. Replaces the current screen until dismissed or reloaded.
pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let Some(banner) = &app.error else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("\u{26A0} {}", banner.context.heading()),
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            banner.message.clone(),
            Style::default().fg(theme.text),
        )),
    ];

    if app.backend_status == BackendStatus::Error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "请确保:",
            Style::default().fg(theme.dim),
        )));
        for hint in [
            "Python后端服务已启动 (运行 python backend/app.py)".to_string(),
            format!("服务运行在 {}", app.api_url),
            "指定的文件夹路径存在".to_string(),
        ] {
            lines.push(Line::from(Span::styled(
                format!("  \u{2022} {hint}"),
                Style::default().fg(theme.dim),
            )));
        }
    }

    let width = area.width.saturating_sub(4).min(80);
    // Wrapped message lines beyond the first.
    let wrapped = banner.message.width() as u16 / width.saturating_sub(2).max(1);
    let height = (lines.len() as u16 + 2 + wrapped).min(area.height);
    let popup = centered_rect(width, height, area);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .title(" 错误 "),
    );
    f.render_widget(paragraph, popup);

    let mut spans = vec![Span::styled(" [r] 重新加载 ", theme.key_badge_style())];
    if banner.context.dismissible() {
        spans.push(Span::styled(" Esc:返回", theme.footer_style()));
    }
    spans.push(Span::styled("  ?:help  q:quit", theme.footer_style()));
    f.render_widget(Paragraph::new(Line::from(spans)), footer_area);
}
