//! Policyholder input form.
//!
//! Numeric fields are typed; choice fields cycle through the categories the
//! model was trained on, so the form cannot produce an unseen category.

use std::ops::RangeInclusive;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{
    Gender, PolicyType, PolicyholderRecord, Region, AGE_RANGE, ANNUAL_PREMIUM_RANGE,
    CLAIMS_HISTORY_RANGE, CREDIT_SCORE_RANGE, DEPENDENTS_RANGE, VEHICLE_AGE_RANGE,
};
use crate::tui::styles::ClaimTheme;

use super::{render_header, render_key_hints};

#[derive(Debug, Clone)]
pub enum FieldKind {
    Numeric {
        range: RangeInclusive<u32>,
        value: String,
    },
    Choice {
        options: Vec<&'static str>,
        selected: usize,
    },
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
}

impl FormField {
    fn numeric(label: &'static str, hint: &'static str, range: RangeInclusive<u32>) -> Self {
        Self {
            label,
            hint,
            kind: FieldKind::Numeric {
                range,
                value: String::new(),
            },
        }
    }

    fn choice(label: &'static str, options: Vec<&'static str>) -> Self {
        Self {
            label,
            hint: "◀ ▶ to change",
            kind: FieldKind::Choice {
                options,
                selected: 0,
            },
        }
    }

    fn display(&self) -> &str {
        match &self.kind {
            FieldKind::Numeric { value, .. } => value,
            FieldKind::Choice { options, selected } => options[*selected],
        }
    }
}

// Field order follows `ATTRIBUTE_NAMES`.
const AGE: usize = 0;
const GENDER: usize = 1;
const POLICY_TYPE: usize = 2;
const VEHICLE_AGE: usize = 3;
const ANNUAL_PREMIUM: usize = 4;
const CLAIMS_HISTORY: usize = 5;
const REGION: usize = 6;
const CREDIT_SCORE: usize = 7;
const DEPENDENTS: usize = 8;

/// Policyholder form state
pub struct PolicyFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PolicyFormState {
    fn default() -> Self {
        let mut state = Self {
            fields: vec![
                FormField::numeric("Age", "years (18-70)", AGE_RANGE),
                FormField::choice("Gender", Gender::ALL.iter().map(Gender::as_str).collect()),
                FormField::choice(
                    "Policy Type",
                    PolicyType::ALL.iter().map(PolicyType::as_str).collect(),
                ),
                FormField::numeric("Vehicle Age", "years (0-20)", VEHICLE_AGE_RANGE),
                FormField::numeric("Annual Premium", "ZAR (1000-20000)", ANNUAL_PREMIUM_RANGE),
                FormField::numeric("Previous Claims", "count (0-10)", CLAIMS_HISTORY_RANGE),
                FormField::choice("Region", Region::ALL.iter().map(Region::as_str).collect()),
                FormField::numeric("Credit Score", "300-850", CREDIT_SCORE_RANGE),
                FormField::numeric("Dependents", "count (0-5)", DEPENDENTS_RANGE),
            ],
            selected_field: 0,
            error_message: None,
        };
        state.load_defaults();
        state
    }
}

impl PolicyFormState {
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a digit to the current numeric field.
    pub fn input_char(&mut self, c: char) {
        if let FieldKind::Numeric { value, .. } = &mut self.fields[self.selected_field].kind {
            if c.is_ascii_digit() && value.len() < 6 {
                value.push(c);
                self.error_message = None;
            }
        }
    }

    pub fn delete_char(&mut self) {
        if let FieldKind::Numeric { value, .. } = &mut self.fields[self.selected_field].kind {
            value.pop();
        }
    }

    pub fn clear_field(&mut self) {
        if let FieldKind::Numeric { value, .. } = &mut self.fields[self.selected_field].kind {
            value.clear();
        }
    }

    /// Step the current choice field forward or backward, wrapping around.
    pub fn cycle_choice(&mut self, forward: bool) {
        if let FieldKind::Choice { options, selected } = &mut self.fields[self.selected_field].kind
        {
            let n = options.len();
            *selected = if forward {
                (*selected + 1) % n
            } else {
                (*selected + n - 1) % n
            };
            self.error_message = None;
        }
    }

    /// Fill every field from `PolicyholderRecord::default()`.
    pub fn load_defaults(&mut self) {
        self.load_record(&PolicyholderRecord::default());
        self.error_message = None;
    }

    fn load_record(&mut self, record: &PolicyholderRecord) {
        let numeric = [
            (AGE, record.age),
            (VEHICLE_AGE, record.vehicle_age),
            (ANNUAL_PREMIUM, record.annual_premium),
            (CLAIMS_HISTORY, record.claims_history),
            (CREDIT_SCORE, record.credit_score),
            (DEPENDENTS, record.number_of_dependents),
        ];
        for (idx, v) in numeric {
            if let FieldKind::Numeric { value, .. } = &mut self.fields[idx].kind {
                value.zeroize();
                *value = v.to_string();
            }
        }

        let choices = [
            (GENDER, record.gender.as_str()),
            (POLICY_TYPE, record.policy_type.as_str()),
            (REGION, record.region.as_str()),
        ];
        for (idx, label) in choices {
            if let FieldKind::Choice { options, selected } = &mut self.fields[idx].kind {
                *selected = options.iter().position(|o| *o == label).unwrap_or(0);
            }
        }
    }

    /// Wipe all numeric buffers and reset the form.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            match &mut field.kind {
                FieldKind::Numeric { value, .. } => value.zeroize(),
                FieldKind::Choice { selected, .. } => *selected = 0,
            }
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Parse and range-check the form into a typed record.
    ///
    /// # Errors
    /// Returns a message naming the first empty, non-numeric or out-of-range
    /// field.
    pub fn to_record(&self) -> Result<PolicyholderRecord, String> {
        let number = |idx: usize| -> Result<u32, String> {
            let field = &self.fields[idx];
            match &field.kind {
                FieldKind::Numeric { range, value } => {
                    let v: u32 = value
                        .parse()
                        .map_err(|_| format!("{}: Invalid number", field.label))?;
                    if !range.contains(&v) {
                        return Err(format!(
                            "{}: Value must be between {} and {}",
                            field.label,
                            range.start(),
                            range.end()
                        ));
                    }
                    Ok(v)
                }
                FieldKind::Choice { .. } => Err(format!("{}: not a numeric field", field.label)),
            }
        };
        let choice = |idx: usize| -> usize {
            match &self.fields[idx].kind {
                FieldKind::Choice { selected, .. } => *selected,
                FieldKind::Numeric { .. } => 0,
            }
        };

        Ok(PolicyholderRecord {
            age: number(AGE)?,
            gender: Gender::ALL[choice(GENDER) % Gender::ALL.len()],
            policy_type: PolicyType::ALL[choice(POLICY_TYPE) % PolicyType::ALL.len()],
            vehicle_age: number(VEHICLE_AGE)?,
            annual_premium: number(ANNUAL_PREMIUM)?,
            claims_history: number(CLAIMS_HISTORY)?,
            region: Region::ALL[choice(REGION) % Region::ALL.len()],
            credit_score: number(CREDIT_SCORE)?,
            number_of_dependents: number(DEPENDENTS)?,
        })
    }
}

/// Render the policyholder input form
pub fn render_policy_form(f: &mut Frame, area: Rect, state: &PolicyFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_header(f, chunks[0], "Policyholder Details", "Single Prediction");
    render_form_fields(f, chunks[1], state);

    match &state.error_message {
        Some(err) => {
            let footer = Paragraph::new(Line::from(vec![
                Span::styled("! ", ClaimTheme::danger()),
                Span::styled(err.clone(), ClaimTheme::danger()),
            ]))
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(ClaimTheme::border()),
            );
            f.render_widget(footer, chunks[2]);
        }
        None => render_key_hints(
            f,
            chunks[2],
            &[
                ("↑↓", "Navigate"),
                ("◀▶", "Change"),
                ("Enter", "Predict"),
                ("S", "Defaults"),
                ("Esc", "Cancel"),
            ],
        ),
    }
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PolicyFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = state.fields.len().div_ceil(2);

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (ClaimTheme::border_focused(), ClaimTheme::focused())
        } else {
            (ClaimTheme::border(), ClaimTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        match &field.kind {
            FieldKind::Numeric { value, .. } if value.is_empty() => {
                spans.push(Span::styled(field.hint, ClaimTheme::text_muted()));
            }
            FieldKind::Numeric { .. } => {
                spans.push(Span::styled(field.display(), ClaimTheme::text()));
            }
            FieldKind::Choice { .. } => {
                spans.push(Span::styled("◀ ", ClaimTheme::text_muted()));
                spans.push(Span::styled(field.display(), ClaimTheme::text()));
                spans.push(Span::styled(" ▶", ClaimTheme::text_muted()));
            }
        }
        if is_selected && matches!(field.kind, FieldKind::Numeric { .. }) {
            spans.push(Span::styled("▌", ClaimTheme::cursor()));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_yields_default_record() {
        let state = PolicyFormState::default();
        assert_eq!(
            state.to_record().expect("defaults"),
            PolicyholderRecord::default()
        );
    }

    #[test]
    fn test_typing_replaces_numeric_value() {
        let mut state = PolicyFormState::default();
        state.clear_field();
        state.input_char('4');
        state.input_char('x');
        state.input_char('2');
        assert_eq!(state.to_record().expect("record").age, 42);

        state.delete_char();
        state.delete_char();
        assert_eq!(
            state.to_record().expect_err("empty age"),
            "Age: Invalid number"
        );
    }

    #[test]
    fn test_out_of_range_value_is_rejected() {
        let mut state = PolicyFormState::default();
        state.selected_field = CREDIT_SCORE;
        state.clear_field();
        for c in "900".chars() {
            state.input_char(c);
        }
        assert_eq!(
            state.to_record().expect_err("out of range"),
            "Credit Score: Value must be between 300 and 850"
        );
    }

    #[test]
    fn test_cycle_choice_wraps() {
        let mut state = PolicyFormState::default();
        state.selected_field = POLICY_TYPE;
        state.cycle_choice(false);
        assert_eq!(
            state.to_record().expect("record").policy_type,
            PolicyType::ThirdPartyFireAndTheft
        );
        state.cycle_choice(true);
        assert_eq!(
            state.to_record().expect("record").policy_type,
            PolicyType::Comprehensive
        );

        // Typing into a choice field does nothing.
        state.input_char('7');
        assert_eq!(
            state.to_record().expect("record").policy_type,
            PolicyType::Comprehensive
        );
    }

    #[test]
    fn test_clear_sensitive_wipes_numeric_fields() {
        let mut state = PolicyFormState::default();
        state.selected_field = REGION;
        state.cycle_choice(true);
        state.clear_sensitive();

        assert_eq!(state.selected_field, 0);
        assert!(state.fields.iter().all(|f| match &f.kind {
            FieldKind::Numeric { value, .. } => value.is_empty(),
            FieldKind::Choice { selected, .. } => *selected == 0,
        }));

        state.load_defaults();
        assert!(state.to_record().is_ok());
    }
}
