use crate::dashboard::{Dashboard, DashboardView};
use crate::grade::GRADE_PROMPT;
use crate::models::OutputFormat;
use crate::report;
use crate::selection::{Level, SelectionRequest};
use anyhow::Result;
use std::io::{BufRead, Write};

pub const HELP: &str = "commands: university <name> | track <name> | program <name> | grade [value] | options | show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(Level, String),
    Grade(String),
    Options,
    Show,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        let select = |level| (!rest.is_empty()).then(move || Command::Select(level, rest.to_string()));
        match keyword.to_lowercase().as_str() {
            "university" | "u" => select(Level::University),
            "track" | "t" => select(Level::Track),
            "program" | "p" => select(Level::Program),
            "grade" | "g" => Some(Command::Grade(rest.to_string())),
            "options" | "o" => Some(Command::Options),
            "show" | "s" | "" => Some(Command::Show),
            "help" | "h" | "?" => Some(Command::Help),
            "quit" | "q" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Widget state for one interactive session. Every change re-renders from scratch.
pub struct Session<'a> {
    dashboard: &'a Dashboard,
    request: SelectionRequest,
    grade_text: String,
    format: OutputFormat,
}

impl<'a> Session<'a> {
    pub fn new(dashboard: &'a Dashboard, request: SelectionRequest, grade_text: String, format: OutputFormat) -> Self {
        Self {
            dashboard,
            request,
            grade_text,
            format,
        }
    }

    pub fn view(&self) -> DashboardView {
        self.dashboard.render(&self.request, &self.grade_text)
    }

    /// Applies a command and returns the text to show, or `None` to end the session.
    pub fn apply(&mut self, command: Command) -> Result<Option<String>> {
        let output = match command {
            Command::Select(level, value) => {
                tracing::debug!(level = ?level, value = %value, "selection changed");
                self.request.set(level, Some(value));
                self.refresh()?
            }
            Command::Grade(text) => {
                self.grade_text = text;
                self.refresh()?
            }
            Command::Options => report::render_options(&self.view()),
            Command::Show => report::render(&self.view(), self.format)?,
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(None),
        };
        Ok(Some(output))
    }

    /// Renders the current state and pins the request to what the widgets now show.
    fn refresh(&mut self) -> Result<String> {
        let view = self.view();
        self.request = view.controls.effective.clone();
        report::render(&view, self.format)
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        writeln!(output, "{}", report::render(&self.view(), self.format)?)?;
        writeln!(output, "{}", HELP)?;
        writeln!(output, "📝 {}", GRADE_PROMPT)?;

        for line in input.lines() {
            let line = line?;
            let Some(command) = Command::parse(&line) else {
                writeln!(output, "❓ Unknown command: {}", line.trim())?;
                writeln!(output, "{}", HELP)?;
                continue;
            };

            match self.apply(command)? {
                Some(text) => writeln!(output, "{}", text)?,
                None => break,
            }
            output.flush()?;
        }
        Ok(())
    }
}
