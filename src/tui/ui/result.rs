//! Single prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::SinglePrediction;
use crate::tui::styles::ClaimTheme;

use super::{render_header, render_key_hints};

#[derive(Debug, Clone, Default)]
pub enum ResultState {
    #[default]
    Idle,
    Complete { prediction: SinglePrediction },
    Error { message: String },
}

pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Prediction Result", "Single Policyholder");

    match state {
        ResultState::Idle => {
            let idle = Paragraph::new(Line::from(Span::styled(
                "No prediction yet",
                ClaimTheme::text_muted(),
            )))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(ClaimTheme::border()),
            );
            f.render_widget(idle, chunks[1]);
        }
        ResultState::Complete { prediction } => render_prediction(f, chunks[1], prediction),
        ResultState::Error { message } => render_error(f, chunks[1], message),
    }

    let hints: &[(&str, &str)] = match state {
        ResultState::Error { .. } => &[("Enter", "Back to Form"), ("Esc", "Dashboard")],
        _ => &[("Enter", "Dashboard"), ("N", "New Policyholder")],
    };
    render_key_hints(f, chunks[2], hints);
}

fn render_prediction(f: &mut Frame, area: Rect, result: &SinglePrediction) {
    let block = Block::default()
        .title(Span::styled(" Claim Prediction ", ClaimTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClaimTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Verdict
            Constraint::Length(3), // Probability
            Constraint::Min(0),    // Alignment warnings
        ])
        .margin(1)
        .split(inner);

    let prediction = &result.prediction;
    let verdict = prediction.verdict();
    let style = ClaimTheme::verdict(verdict);

    let verdict_display = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{verdict} TO CLAIM"),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(prediction.summary(), ClaimTheme::text_secondary())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(verdict_display, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Claim Probability ", ClaimTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(ClaimTheme::border()),
        )
        .gauge_style(ClaimTheme::gauge(prediction.probability))
        .ratio(prediction.probability.clamp(0.0, 1.0))
        .label(format!("{:.2}", prediction.probability));
    f.render_widget(gauge, chunks[1]);

    let notices = alignment_notices(result);
    if !notices.is_empty() {
        f.render_widget(Paragraph::new(notices).wrap(Wrap { trim: false }), chunks[2]);
    }
}

/// Warnings about values the model saw as zeros.
fn alignment_notices(result: &SinglePrediction) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if !result.unknown_categories.is_empty() {
        lines.push(Line::from(Span::styled(
            "! Categories not seen in training (encoded as all zeros):",
            ClaimTheme::warning(),
        )));
        lines.extend(
            result
                .unknown_categories
                .iter()
                .map(|u| Line::from(Span::styled(format!("  {u}"), ClaimTheme::text()))),
        );
    }

    if !result.unfilled_columns.is_empty() {
        lines.push(Line::from(Span::styled(
            "! Model inputs not collected by the form (filled with 0):",
            ClaimTheme::warning(),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", result.unfilled_columns.join(", ")),
            ClaimTheme::text(),
        )));
    }

    lines
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", ClaimTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, ClaimTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClaimTheme::danger()),
    );

    f.render_widget(content, area);
}
