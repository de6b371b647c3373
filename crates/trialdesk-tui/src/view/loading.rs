use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::view::{centered_rect, spinner_char};

/// Blocking spinner shown while a load, extraction or summary request runs.
pub fn render_in(f: &mut Frame, app: &App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let message = loading_message(app);

    let popup = centered_rect(44, 5, area);
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{} ", spinner_char(app.tick)),
                Style::default()
                    .fg(theme.spinner)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(message, Style::default().fg(theme.text)),
        ]),
    ];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style()),
    );
    f.render_widget(paragraph, popup);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(" q:quit", theme.footer_style()))),
        footer_area,
    );
}

pub fn loading_message(app: &App) -> &'static str {
    if app.loading {
        "正在加载文件夹数据..."
    } else if app.extracting {
        "正在提取关键信息，请稍候..."
    } else {
        "正在生成方案摘要，请稍候..."
    }
}
