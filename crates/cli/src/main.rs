mod config;
mod error;
mod export;
mod render;
mod repl;
mod source;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use runtime::{
    AnthropicBackend, OrchestrationResult, Orchestrator, Projection, Session, ToolExecutor,
    project,
};
use serde_json::json;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use config::{CONFIG_FILE, Config};
use error::{Error, Result};
use repl::{ChatState, Input, SAMPLE_QUESTIONS};
use source::Source;

type Agent = Orchestrator<AnthropicBackend, ToolExecutor<Source>>;

const TABLE_PREVIEW_ROWS: usize = 10;

#[derive(Parser)]
#[command(name = "beacon")]
#[command(about = "A tool-calling marketing analytics agent", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat,
    /// Answer one question and exit
    Ask {
        question: Vec<String>,
        /// Print the answer, charts and table as JSON
        #[arg(long)]
        json: bool,
        /// Also save the result table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List the tools available to the model
    Tools,
    /// List sample questions
    Questions,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Chat) | None => cmd_chat(&cli.config).await,
        Some(Commands::Ask {
            question,
            json,
            csv,
        }) => cmd_ask(&cli.config, &question.join(" "), json, csv.as_deref()).await,
        Some(Commands::Tools) => {
            print!("{}", render::tools(&runtime::catalog::registry()));
            Ok(())
        }
        Some(Commands::Questions) => {
            print!("{}", render::numbered(SAMPLE_QUESTIONS, 1));
            Ok(())
        }
    }
}

fn load_agent(path: &Path) -> Result<(Agent, Config)> {
    let mut config = Config::load_or_default(path)?;
    config.apply_env(|key| std::env::var(key).ok());
    debug!(
        path = %path.display(),
        model = %config.model.name,
        data = ?config.data.mode,
        "configuration loaded"
    );
    let agent = Orchestrator::new(config.backend()?, config.executor()?, config.loop_config()?)?;
    Ok((agent, config))
}

async fn cmd_ask(path: &Path, question: &str, as_json: bool, csv: Option<&Path>) -> Result<()> {
    if question.trim().is_empty() {
        return Err(Error::Usage("beacon ask <question>"));
    }
    let (agent, _) = load_agent(path)?;
    let mut session = Session::new();
    let result = agent.run(&mut session, question).await?;
    finish_ask(&mut io::stdout(), &result, as_json, csv)
}

/// Write the answer, then save the table if asked. The answer is written
/// even when there is no table to save.
fn finish_ask(
    out: &mut impl Write,
    result: &OrchestrationResult,
    as_json: bool,
    csv: Option<&Path>,
) -> Result<()> {
    let projection = result
        .last_tool
        .as_ref()
        .map(|tool| project(&tool.tool_name, &tool.payload));

    if as_json {
        let (charts, table) = match &projection {
            Some(p) => (
                p.charts
                    .iter()
                    .map(|(label, chart)| json!({ "label": label, "chart": chart }))
                    .collect(),
                json!(p.table),
            ),
            None => (Vec::new(), json!(null)),
        };
        let output = json!({
            "answer": result.final_answer,
            "tools": result.tool_calls_made,
            "round_trips": result.round_trips,
            "charts": charts,
            "table": table,
        });
        writeln!(out, "{output:#}")?;
    } else {
        write!(out, "{}", render::answer(result))?;
        if let Some(projection) = &projection {
            writeln!(out)?;
            write!(out, "{}", render::projection(projection, TABLE_PREVIEW_ROWS))?;
        }
    }
    out.flush()?;

    if let Some(path) = csv {
        let table = projection
            .as_ref()
            .and_then(|p| p.table.as_ref())
            .ok_or(Error::NothingToExport)?;
        export::csv(table, path)?;
    }
    Ok(())
}

async fn cmd_chat(path: &Path) -> Result<()> {
    let (agent, config) = load_agent(path)?;
    let mut session = Session::new();

    println!("beacon v{}", env!("CARGO_PKG_VERSION"));
    println!("Model: {}", agent.backend());
    println!("Data: {}", agent.host().source());
    println!("Session ID: {}", session.id);
    println!("Tool rounds per question: {}", config.agent.max_round_trips);
    println!("Type a question, a number, or :help.\n");

    let mut state = ChatState::new();
    print!("{}", render::numbered(state.menu(), 1));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("\n> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let question = match repl::parse(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Question(q) => q.to_string(),
            Input::Pick(n) => match state.pick(n) {
                Some(q) => {
                    println!("> {q}");
                    q.to_string()
                }
                None => {
                    eprintln!("No suggestion numbered {n}.");
                    continue;
                }
            },
            Input::New => {
                session.reset();
                state.reset();
                println!("Started a new conversation.");
                print!("{}", render::numbered(state.menu(), 1));
                continue;
            }
            Input::Csv(target) => {
                report(save_csv(state.last(), target));
                continue;
            }
            Input::Export(target) => {
                let result = target
                    .ok_or(Error::Usage(":export <path>"))
                    .and_then(|t| export::transcript(&session, Path::new(t)).map(|()| t));
                report(result);
                continue;
            }
            Input::Stats => {
                print!("{}", render::stats(session.stats()));
                continue;
            }
            Input::Help => {
                print!("{}", repl::HELP);
                continue;
            }
            Input::Unknown(name) => {
                eprintln!("Unknown command :{name}. Type :help for a list.");
                continue;
            }
        };

        match agent.run(&mut session, &question).await {
            Ok(result) => {
                println!();
                print!("{}", render::answer(&result));
                if let Some(projection) = state.record(&result) {
                    println!();
                    print!("{}", render::projection(projection, TABLE_PREVIEW_ROWS));
                    println!("\nFollow-ups:");
                    print!("{}", render::numbered(state.menu(), 1));
                }
            }
            Err(e) if e.is_auth() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "question failed");
                eprintln!("Error: {e}");
            }
        }
    }

    println!("\nSession ended.");
    Ok(())
}

fn save_csv<'a>(last: Option<&Projection>, target: Option<&'a str>) -> Result<&'a str> {
    let target = target.ok_or(Error::Usage(":csv <path>"))?;
    let table = last
        .and_then(|p| p.table.as_ref())
        .ok_or(Error::NothingToExport)?;
    export::csv(table, Path::new(target))?;
    Ok(target)
}

fn report(result: Result<&str>) {
    match result {
        Ok(path) => println!("Saved {path}."),
        Err(e) => eprintln!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtime::{Termination, ToolOutput, Usage};
    use std::time::Duration;

    fn answered(last_tool: Option<ToolOutput>) -> OrchestrationResult {
        OrchestrationResult {
            final_answer: "Pipeline is healthy.".into(),
            tool_calls_made: Vec::new(),
            last_tool,
            elapsed: Duration::ZERO,
            termination: Termination::Completed,
            round_trips: 1,
            usage: Usage::default(),
        }
    }

    #[test]
    fn answer_is_written_before_missing_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut out = Vec::new();

        let err = finish_ask(&mut out, &answered(None), false, Some(&path)).unwrap_err();
        assert!(matches!(err, Error::NothingToExport));
        assert!(String::from_utf8(out).unwrap().contains("Pipeline is healthy."));
        assert!(!path.exists());
    }

    #[test]
    fn table_is_saved_after_answer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let tool = ToolOutput {
            tool_name: "get_conversion_funnel".into(),
            payload: json!({ "data": [{ "stage": "Leads", "count": 10 }] }),
        };
        let mut out = Vec::new();

        finish_ask(&mut out, &answered(Some(tool)), true, Some(&path)).unwrap();
        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["answer"], "Pipeline is healthy.");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "stage,count\nLeads,10\n");
    }
}
