//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::styles::ClaimTheme;

use super::render_header;

/// Counters for the current session only; nothing is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    pub single_predictions: usize,
    pub likely_to_claim: usize,
    pub batches_run: usize,
    pub rows_predicted: usize,
}

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub model_kind: String,
    pub model_path: String,
    pub schema_columns: usize,
    /// Encoder column and class count, if an encoder was loaded.
    pub encoder: Option<(String, usize)>,
    pub verified: bool,
    pub export_path: String,
    pub session: SessionCounters,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(f, chunks[0], "ClaimGuard", "Claim Likelihood Prediction");

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_status_panels(f, columns[0], state);
    render_session(f, columns[1], &state.session);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .margin(1)
        .split(area);

    let encoder_line = match &state.encoder {
        Some((column, classes)) => Line::from(vec![
            Span::styled("  OK ", ClaimTheme::success()),
            Span::styled(
                format!("Encoder: {column} ({classes} classes)"),
                ClaimTheme::text(),
            ),
        ]),
        None => Line::from(vec![
            Span::styled("  -- ", ClaimTheme::warning()),
            Span::styled("Encoder: none (batch categorical column unavailable)", ClaimTheme::text()),
        ]),
    };

    let status_items = vec![
        Line::from(vec![
            Span::styled("  OK ", ClaimTheme::success()),
            Span::styled(format!("Model: {}", state.model_kind), ClaimTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("     Columns: ", ClaimTheme::text_secondary()),
            Span::styled(state.schema_columns.to_string(), ClaimTheme::text()),
        ]),
        encoder_line,
        format_integrity(state.verified),
        Line::from(vec![
            Span::styled("     Source: ", ClaimTheme::text_secondary()),
            Span::styled(state.model_path.clone(), ClaimTheme::text_muted()),
        ]),
        Line::from(vec![
            Span::styled("     Export: ", ClaimTheme::text_secondary()),
            Span::styled(state.export_path.clone(), ClaimTheme::text_muted()),
        ]),
    ];

    let status_block = Block::default()
        .title(Span::styled(" Model Status ", ClaimTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClaimTheme::border());

    f.render_widget(Paragraph::new(status_items).block(status_block), chunks[0]);

    let actions = [
        ("N", "New Policyholder"),
        ("B", "Batch Prediction"),
        ("Q", "Quit"),
    ]
    .iter()
    .map(|(key, desc)| {
        Line::from(vec![
            Span::styled(format!("[{key}] "), ClaimTheme::key_hint()),
            Span::styled(*desc, ClaimTheme::key_desc()),
        ])
    })
    .collect::<Vec<_>>();

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", ClaimTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClaimTheme::border());

    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn format_integrity(verified: bool) -> Line<'static> {
    let (icon, style, text) = if verified {
        ("OK", ClaimTheme::success(), "Artifacts verified against manifest")
    } else {
        ("--", ClaimTheme::warning(), "No manifest; artifacts unverified")
    };

    Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(text, ClaimTheme::text()),
    ])
}

fn render_session(f: &mut Frame, area: Rect, session: &SessionCounters) {
    let block = Block::default()
        .title(Span::styled(" This Session ", ClaimTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClaimTheme::border());

    if session.single_predictions == 0 && session.batches_run == 0 {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No predictions yet. Press [N] or [B] to start.",
            ClaimTheme::text_muted(),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let counter = |label: &'static str, value: usize| {
        Line::from(vec![
            Span::styled(label, ClaimTheme::text_secondary()),
            Span::styled(value.to_string(), ClaimTheme::text()),
        ])
    };

    let lines = vec![
        counter("Single predictions: ", session.single_predictions),
        Line::from(vec![
            Span::styled("  likely to claim: ", ClaimTheme::text_secondary()),
            Span::styled(session.likely_to_claim.to_string(), ClaimTheme::danger()),
        ]),
        Line::from(""),
        counter("Batches run: ", session.batches_run),
        counter("Rows predicted: ", session.rows_predicted),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}
