//! Batch prediction view: file path input, validation outcome and a preview
//! of the annotated table.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table as TableWidget, Wrap},
    Frame,
};

use crate::domain::{BatchPrediction, PREDICTION_COLUMN};
use crate::tui::styles::ClaimTheme;

use super::{render_header, render_key_hints};

/// Rows shown in the preview.
pub const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, Default)]
pub enum BatchOutcome {
    #[default]
    Idle,
    Complete(BatchPrediction),
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct BatchState {
    pub path_input: String,
    /// Whether keystrokes go to the path input.
    pub editing: bool,
    pub outcome: BatchOutcome,
    /// Result of the last export attempt.
    pub export_message: Option<Result<String, String>>,
}

impl BatchState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            editing: true,
            ..Self::default()
        }
    }

    pub fn input_char(&mut self, c: char) {
        if self.editing && !c.is_control() {
            self.path_input.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if self.editing {
            self.path_input.pop();
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&BatchPrediction> {
        match &self.outcome {
            BatchOutcome::Complete(result) => Some(result),
            _ => None,
        }
    }
}

pub fn render_batch(f: &mut Frame, area: Rect, state: &BatchState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Path input
            Constraint::Length(4), // Status
            Constraint::Min(0),    // Preview
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Batch Prediction", "Delimited file with header row");
    render_path_input(f, chunks[1], state);
    render_status(f, chunks[2], state);

    if let BatchOutcome::Complete(result) = &state.outcome {
        render_preview(f, chunks[3], result);
    }

    let hints: &[(&str, &str)] = if state.editing {
        &[("Enter", "Run"), ("Tab", "Done Editing"), ("Esc", "Dashboard")]
    } else if state.result().is_some() {
        &[("E", "Export"), ("Tab", "Edit Path"), ("Enter", "Re-run"), ("Esc", "Dashboard")]
    } else {
        &[("Tab", "Edit Path"), ("Enter", "Run"), ("Esc", "Dashboard")]
    };
    render_key_hints(f, chunks[4], hints);
}

fn render_path_input(f: &mut Frame, area: Rect, state: &BatchState) {
    let (border, title) = if state.editing {
        (ClaimTheme::border_focused(), ClaimTheme::focused())
    } else {
        (ClaimTheme::border(), ClaimTheme::text_secondary())
    };

    let mut spans = vec![Span::raw(" ")];
    if state.path_input.is_empty() {
        spans.push(Span::styled("path/to/policyholders.csv", ClaimTheme::text_muted()));
    } else {
        spans.push(Span::styled(state.path_input.as_str(), ClaimTheme::text()));
    }
    if state.editing {
        spans.push(Span::styled("▌", ClaimTheme::cursor()));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(Span::styled(" Input File ", title))
            .borders(Borders::ALL)
            .border_style(border),
    );
    f.render_widget(input, area);
}

fn render_status(f: &mut Frame, area: Rect, state: &BatchState) {
    let mut lines: Vec<Line> = match &state.outcome {
        BatchOutcome::Idle => vec![Line::from(Span::styled(
            "Enter a file path and press Enter to run the batch.",
            ClaimTheme::text_muted(),
        ))],
        BatchOutcome::Error(message) => vec![Line::from(vec![
            Span::styled("! ", ClaimTheme::danger()),
            Span::styled(message.as_str(), ClaimTheme::danger()),
        ])],
        BatchOutcome::Complete(result) => {
            let mut lines = vec![Line::from(vec![
                Span::styled("OK ", ClaimTheme::success()),
                Span::styled(
                    format!(
                        "{} rows predicted, {} likely to claim",
                        result.row_count(),
                        result.positive_count
                    ),
                    ClaimTheme::text(),
                ),
            ])];
            lines.extend(result.warnings.iter().map(|w| {
                Line::from(vec![
                    Span::styled("! ", ClaimTheme::warning()),
                    Span::styled(w.to_string(), ClaimTheme::warning()),
                ])
            }));
            lines
        }
    };

    match &state.export_message {
        Some(Ok(message)) => lines.push(Line::from(Span::styled(
            message.as_str(),
            ClaimTheme::info(),
        ))),
        Some(Err(message)) => lines.push(Line::from(Span::styled(
            message.as_str(),
            ClaimTheme::danger(),
        ))),
        None => {}
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_preview(f: &mut Frame, area: Rect, result: &BatchPrediction) {
    let preview = result.table.head(PREVIEW_ROWS);
    let columns = preview.columns();
    let prediction_idx = preview.column_index(PREDICTION_COLUMN);

    let header = Row::new(
        columns
            .iter()
            .map(|c| Cell::from(c.as_str()))
            .collect::<Vec<_>>(),
    )
    .style(ClaimTheme::table_header());

    let rows = preview.rows().iter().map(|row| {
        Row::new(
            row.iter()
                .enumerate()
                .map(|(i, cell)| {
                    let style = if Some(i) == prediction_idx {
                        if cell == "1" {
                            ClaimTheme::danger()
                        } else {
                            ClaimTheme::success()
                        }
                    } else {
                        ClaimTheme::text()
                    };
                    Cell::from(cell.clone()).style(style)
                })
                .collect::<Vec<_>>(),
        )
    });

    let widths = vec![Constraint::Min(8); columns.len()];
    let title = format!(
        " Preview ({} of {} rows) ",
        preview.row_count(),
        result.row_count()
    );

    let table = TableWidget::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(Span::styled(title, ClaimTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(ClaimTheme::border()),
        );

    f.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_only_while_editing() {
        let mut state = BatchState::new();
        for c in "data.csv".chars() {
            state.input_char(c);
        }
        state.delete_char();
        assert_eq!(state.path_input, "data.cs");

        state.editing = false;
        state.input_char('e');
        state.delete_char();
        assert_eq!(state.path_input, "data.cs");
    }
}
