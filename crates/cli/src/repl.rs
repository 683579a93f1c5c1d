//! Interactive chat input and the state kept between questions.

use runtime::{OrchestrationResult, Projection, follow_ups, project};

pub const SAMPLE_QUESTIONS: &[&str] = &[
    "B2B summary",
    "Lead metrics",
    "Intent signals",
    "Conversion funnel",
    "High bounce pages",
    "Pages to sunset",
    "Accounts to reach out",
    "Paid media",
    "Attribution",
    "Anomalies",
    "360 Goldman Sachs",
    "Campaign brief",
];

/// One line of chat input.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Empty,
    Question(&'a str),
    /// 1-based index into the current suggestion menu.
    Pick(usize),
    New,
    Csv(Option<&'a str>),
    Export(Option<&'a str>),
    Stats,
    Help,
    Quit,
    Unknown(&'a str),
}

pub fn parse(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if let Ok(n) = line.parse::<usize>() {
        return Input::Pick(n);
    }
    if line == "quit" || line == "exit" {
        return Input::Quit;
    }
    let Some(command) = line.strip_prefix(':') else {
        return Input::Question(line);
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (command, None),
    };
    match name {
        "new" | "clear" => Input::New,
        "csv" => Input::Csv(arg),
        "export" => Input::Export(arg),
        "stats" => Input::Stats,
        "help" | "h" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        _ => Input::Unknown(name),
    }
}

/// The last answer's projection and the numbered suggestions on offer.
pub struct ChatState {
    last: Option<Projection>,
    menu: Vec<String>,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            last: None,
            menu: owned(SAMPLE_QUESTIONS),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Remember `result`. Without a successful tool the previous projection
    /// is dropped and the sample questions are offered again.
    pub fn record(&mut self, result: &OrchestrationResult) -> Option<&Projection> {
        match &result.last_tool {
            Some(tool) => {
                self.last = Some(project(&tool.tool_name, &tool.payload));
                self.menu = owned(follow_ups(&tool.tool_name));
            }
            None => {
                self.last = None;
                self.menu = owned(SAMPLE_QUESTIONS);
            }
        }
        self.last.as_ref()
    }

    pub fn last(&self) -> Option<&Projection> {
        self.last.as_ref()
    }

    pub fn menu(&self) -> &[String] {
        &self.menu
    }

    /// The suggestion numbered `n`, counting from 1.
    pub fn pick(&self, n: usize) -> Option<&str> {
        let index = n.checked_sub(1)?;
        self.menu.get(index).map(String::as_str)
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|q| q.to_string()).collect()
}

pub const HELP: &str = "\
  <question>       ask a question
  <number>         pick a suggested question
  :new             start a new conversation
  :csv <path>      save the last table as CSV
  :export <path>   save the conversation as markdown
  :stats           show session statistics
  :quit            leave
";
