use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup = centered_rect(60, 34, area);

    let lines = vec![
        Line::from(Span::styled(
            " 快捷键 ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("移动", theme),
        key_line("j / \u{2193}", "下移", theme),
        key_line("k / \u{2191}", "上移", theme),
        key_line("Ctrl+d / PgDn", "下翻页", theme),
        key_line("Ctrl+u / PgUp", "上翻页", theme),
        key_line("g / Home", "跳到顶部", theme),
        key_line("G / End", "跳到底部", theme),
        key_line("Esc", "返回上一步 / 关闭错误", theme),
        Line::from(""),
        section_header("文件夹", theme),
        key_line("Space", "勾选 / 取消勾选", theme),
        key_line("x / Enter", "提取关键信息", theme),
        key_line("r", "重新加载", theme),
        Line::from(""),
        section_header("提取结果", theme),
        key_line("Space / Enter", "选择关键文献", theme),
        key_line("h / l", "左右翻看字段列", theme),
        key_line("s", "生成方案摘要", theme),
        Line::from(""),
        section_header("方案摘要", theme),
        key_line("Enter / e", "编辑当前字段", theme),
        key_line("Alt+Enter", "编辑时换行", theme),
        key_line("d", "下载方案摘要", theme),
        Line::from(""),
        section_header("全局", theme),
        key_line("?", "显示 / 隐藏帮助", theme),
        key_line("q", "退出", theme),
        key_line("Ctrl+c", "强制退出", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<16}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
