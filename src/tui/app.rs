//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration (both pipelines run to completion in the event loop)

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::ModelArtifact;
use crate::application::{BatchPredictionService, InferenceContext, SinglePredictionService};
use crate::config::AppConfig;
use crate::domain::Verdict;

use super::ui::{
    batch::{render_batch, BatchOutcome, BatchState},
    dashboard::{render_dashboard, DashboardState},
    policy_form::{render_policy_form, PolicyFormState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    PolicyForm,
    Result,
    Batch,
}

/// Main application state
pub struct App {
    screen: Screen,

    should_quit: bool,

    single_service: SinglePredictionService<ModelArtifact>,

    batch_service: BatchPredictionService<ModelArtifact>,

    /// Field delimiter for uploaded files
    delimiter: u8,

    export_path: PathBuf,

    dashboard_state: DashboardState,

    policy_form_state: PolicyFormState,

    result_state: ResultState,

    batch_state: BatchState,
}

impl App {
    /// Create a new application instance by loading the artifacts named in
    /// `config`.
    ///
    /// The app refuses to start if the artifacts cannot be loaded, verified
    /// or reconciled with each other.
    ///
    /// # Errors
    /// Returns error if the inference context cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let context = InferenceContext::load(&config.model_path, config.categorical_column.as_str())
            .map_err(|e| {
                anyhow!(
                    "Failed to load model artifacts from {:?}: {}. Set CLAIMGUARD_MODEL_PATH to a directory containing model.json and model_columns.json.",
                    config.model_path,
                    e
                )
            })?;

        Self::with_dependencies(Arc::new(context), config)
    }

    /// Create application with an injected context (Composition Root pattern).
    ///
    /// # Errors
    /// Returns error if initialization fails.
    pub fn with_dependencies(
        context: Arc<InferenceContext<ModelArtifact>>,
        config: &AppConfig,
    ) -> Result<Self> {
        let dashboard_state = DashboardState {
            model_kind: context.model_kind().to_string(),
            model_path: config.model_path.display().to_string(),
            schema_columns: context.schema().len(),
            encoder: context
                .encoder()
                .map(|e| (e.column().to_string(), e.classes().len())),
            verified: context.is_verified(),
            export_path: config.export_path.display().to_string(),
            session: Default::default(),
        };

        Ok(Self {
            screen: Screen::Dashboard,
            should_quit: false,
            single_service: SinglePredictionService::new(context.clone()),
            batch_service: BatchPredictionService::new(context),
            delimiter: config.delimiter,
            export_path: config.export_path.clone(),
            dashboard_state,
            policy_form_state: PolicyFormState::default(),
            result_state: ResultState::default(),
            batch_state: BatchState::new(),
        })
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let content_area = chunks[0];
                match self.screen {
                    Screen::Dashboard => render_dashboard(f, content_area, &self.dashboard_state),
                    Screen::PolicyForm => {
                        render_policy_form(f, content_area, &self.policy_form_state)
                    }
                    Screen::Result => render_result(f, content_area, &self.result_state),
                    Screen::Batch => render_batch(f, content_area, &self.batch_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::PolicyForm => self.handle_policy_form_key(key),
            Screen::Result => self.handle_result_key(key),
            Screen::Batch => self.handle_batch_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => self.open_policy_form(),
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.batch_state.editing = true;
                self.screen = Screen::Batch;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn open_policy_form(&mut self) {
        self.policy_form_state = PolicyFormState::default();
        self.screen = Screen::PolicyForm;
    }

    fn handle_policy_form_key(&mut self, key: KeyCode) {
        let form = &mut self.policy_form_state;
        match key {
            KeyCode::Esc => {
                form.clear_sensitive();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up | KeyCode::BackTab => form.prev_field(),
            KeyCode::Down | KeyCode::Tab => form.next_field(),
            KeyCode::Left => form.cycle_choice(false),
            KeyCode::Right => form.cycle_choice(true),
            KeyCode::Char('s') | KeyCode::Char('S') => form.load_defaults(),
            KeyCode::Char(c) => form.input_char(c),
            KeyCode::Backspace => form.delete_char(),
            KeyCode::Delete => form.clear_field(),
            KeyCode::Enter => self.submit_policy_form(),
            _ => {}
        }
    }

    fn submit_policy_form(&mut self) {
        let record = match self.policy_form_state.to_record() {
            Ok(record) => record,
            Err(e) => {
                self.policy_form_state.error_message = Some(e);
                return;
            }
        };

        self.result_state = match self.single_service.predict_policyholder(&record) {
            Ok(prediction) => {
                let session = &mut self.dashboard_state.session;
                session.single_predictions += 1;
                if prediction.prediction.verdict() == Verdict::LikelyToClaim {
                    session.likely_to_claim += 1;
                }
                ResultState::Complete { prediction }
            }
            Err(e) => {
                tracing::error!("Single prediction failed: {}", e);
                ResultState::Error {
                    message: e.to_string(),
                }
            }
        };

        self.policy_form_state.clear_sensitive();
        self.screen = Screen::Result;
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        let failed = matches!(self.result_state, ResultState::Error { .. });
        match (failed, key) {
            (true, KeyCode::Enter) => self.open_policy_form(),
            (_, KeyCode::Enter | KeyCode::Esc) => self.screen = Screen::Dashboard,
            (_, KeyCode::Char('n') | KeyCode::Char('N')) => self.open_policy_form(),
            _ => {}
        }
    }

    fn handle_batch_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::Dashboard,
            KeyCode::Tab => self.batch_state.editing = !self.batch_state.editing,
            KeyCode::Enter => self.run_batch(),
            KeyCode::Backspace => self.batch_state.delete_char(),
            KeyCode::Char(c) if self.batch_state.editing => self.batch_state.input_char(c),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_batch(),
            _ => {}
        }
    }

    fn run_batch(&mut self) {
        let path = self.batch_state.path_input.trim().to_string();
        self.batch_state.export_message = None;

        if path.is_empty() {
            self.batch_state.outcome = BatchOutcome::Error("Enter a file path first".to_string());
            return;
        }

        self.batch_state.outcome = match self
            .batch_service
            .predict_file(PathBuf::from(&path).as_path(), self.delimiter)
        {
            Ok(result) => {
                let session = &mut self.dashboard_state.session;
                session.batches_run += 1;
                session.rows_predicted += result.row_count();
                self.batch_state.editing = false;
                BatchOutcome::Complete(result)
            }
            Err(e) => {
                tracing::error!("Batch prediction failed: {}", e);
                BatchOutcome::Error(e.to_string())
            }
        };
    }

    fn export_batch(&mut self) {
        let Some(result) = self.batch_state.result() else {
            self.batch_state.export_message =
                Some(Err("Nothing to export; run a batch first".to_string()));
            return;
        };

        let message = match self.batch_service.export(result, &self.export_path) {
            Ok(()) => Ok(format!(
                "Exported {} rows to {}",
                result.row_count(),
                self.export_path.display()
            )),
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                Err(format!("Export failed: {e}"))
            }
        };
        self.batch_state.export_message = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnSchema, LabelEncoder};
    use tempfile::tempdir;

    const MODEL: &str = r#"{
        "kind": "logistic",
        "feature_names": ["age", "vehicle_type", "claims_history"],
        "coefficients": [0.0, 0.0, 1.5],
        "intercept": -3.0
    }"#;

    fn app(export_path: PathBuf) -> App {
        let model = ModelArtifact::from_json(MODEL).expect("model");
        let schema = ColumnSchema::new(["age", "vehicle_type", "claims_history"]).expect("schema");
        let encoder = LabelEncoder::fit("vehicle_type", ["SUV", "Sedan"]).expect("encoder");
        let context =
            InferenceContext::new(model, schema, Some(encoder), "vehicle_type").expect("context");
        let config = AppConfig {
            export_path,
            ..AppConfig::default()
        };
        App::with_dependencies(Arc::new(context), &config).expect("app")
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_form_predicts_and_returns_to_dashboard() {
        // This schema has no indicator columns; the form's categories are
        // dropped and the prediction comes from the numeric passthroughs.
        let mut app = app(PathBuf::from("unused.csv"));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::PolicyForm);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Result);
        assert!(matches!(app.result_state, ResultState::Complete { .. }));
        assert_eq!(app.dashboard_state.session.single_predictions, 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[test]
    fn test_invalid_form_stays_on_form() {
        let mut app = app(PathBuf::from("unused.csv"));
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::PolicyForm);
        assert_eq!(
            app.policy_form_state.error_message.as_deref(),
            Some("Age: Invalid number")
        );
    }

    #[test]
    fn test_batch_run_and_export() {
        let temp = tempdir().expect("tempdir");
        let input = temp.path().join("in.csv");
        let output = temp.path().join("out.csv");
        std::fs::write(
            &input,
            "claims_history,age,vehicle_type,notes\n0,30,Sedan,x\n4,52,SUV,y\n",
        )
        .expect("write input");

        let mut app = app(output.clone());
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.screen, Screen::Batch);

        type_text(&mut app, &input.display().to_string());
        press(&mut app, KeyCode::Enter);

        let result = app.batch_state.result().expect("batch result");
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.positive_count, 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(!app.batch_state.editing);
        assert_eq!(app.dashboard_state.session.rows_predicted, 2);

        press(&mut app, KeyCode::Char('e'));
        assert!(matches!(app.batch_state.export_message, Some(Ok(_))));
        let exported = std::fs::read_to_string(&output).expect("read export");
        assert_eq!(
            exported,
            "age,vehicle_type,claims_history,prediction\n30,Sedan,0,0\n52,SUV,4,1\n"
        );
    }

    #[test]
    fn test_batch_error_is_shown_not_raised() {
        let temp = tempdir().expect("tempdir");
        let input = temp.path().join("in.csv");
        std::fs::write(&input, "age,vehicle_type\n30,Hovercraft\n").expect("write input");

        let mut app = app(temp.path().join("out.csv"));
        press(&mut app, KeyCode::Char('b'));
        type_text(&mut app, &input.display().to_string());
        press(&mut app, KeyCode::Enter);

        match &app.batch_state.outcome {
            BatchOutcome::Error(message) => {
                assert!(message.contains("claims_history"), "{message}")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(app.batch_state.editing);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('e'));
        assert!(matches!(app.batch_state.export_message, Some(Err(_))));
    }
}
