//! UI module: View components for the TUI.

pub mod batch;
pub mod dashboard;
pub mod policy_form;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::ClaimTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Predictions are statistical estimates to support underwriting review, not a decision on any policy.",
            ClaimTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Categories the model was not trained on are flagged and carry no signal.",
            ClaimTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(ClaimTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Header bar shared by every screen.
pub(crate) fn render_header(f: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClaimTheme::text()),
        Span::styled(title.to_string(), ClaimTheme::title()),
        Span::styled(" │ ", ClaimTheme::text_muted()),
        Span::styled(subtitle.to_string(), ClaimTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClaimTheme::border()),
    );

    f.render_widget(header, area);
}

/// Footer line of `[key] description` pairs.
pub(crate) fn render_key_hints(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!("[{key}] "), ClaimTheme::key_hint()),
                Span::styled(format!("{desc} "), ClaimTheme::key_desc()),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClaimTheme::border()),
    );

    f.render_widget(footer, area);
}
