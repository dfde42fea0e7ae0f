//! Interactive learning REPL.
//!
//! Plain input is sent to the tutor as an answer to the current question;
//! slash commands drive navigation and show progress.

use std::path::{Path, PathBuf};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tanke_core::config;
use tanke_engine::{AdvanceOutcome, ProgressionEngine, SubmitOutcome};
use tanke_models::{Dimension, LearningStatus, NodeStatus};
use tracing::debug;

use crate::error::Result;

/// Help information for a command.
pub struct CommandHelp {
    /// Command name (e.g., "next").
    pub name: &'static str,
    /// Command aliases (e.g., ["n"]).
    pub aliases: &'static [&'static str],
    /// Brief one-line description.
    pub brief: &'static str,
    /// Usage syntax.
    pub usage: &'static str,
    /// Examples with descriptions.
    pub examples: &'static [(&'static str, &'static str)],
}

/// Static help entries for all commands.
static COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "next",
        aliases: &["n"],
        brief: "Move to the next question or dimension",
        usage: "/next",
        examples: &[("/next", "Go on to the next challenge")],
    },
    CommandHelp {
        name: "dim",
        aliases: &["d"],
        brief: "Jump to a dimension",
        usage: "/dim <dimension>",
        examples: &[
            ("/dim 为何", "Jump by label"),
            ("/dim what_if", "Jump by code"),
            ("/dim 5", "Jump by position"),
        ],
    },
    CommandHelp {
        name: "status",
        aliases: &["s"],
        brief: "Show progress and the current question",
        usage: "/status",
        examples: &[("/status", "Show progress")],
    },
    CommandHelp {
        name: "map",
        aliases: &["m"],
        brief: "Show the knowledge map",
        usage: "/map",
        examples: &[("/map", "Show every dimension with its status")],
    },
    CommandHelp {
        name: "scaffold",
        aliases: &["sc"],
        brief: "Show resources for the current dimension",
        usage: "/scaffold",
        examples: &[("/scaffold", "List recommended videos, exercises and readings")],
    },
    CommandHelp {
        name: "diagnosis",
        aliases: &["dx"],
        brief: "Show the latest mastery diagnosis",
        usage: "/diagnosis",
        examples: &[("/diagnosis", "Show mastery, gaps and advice")],
    },
    CommandHelp {
        name: "help",
        aliases: &["h", "?"],
        brief: "Show help",
        usage: "/help [command]",
        examples: &[("/help", "Show all commands"), ("/help dim", "Show help for /dim")],
    },
    CommandHelp {
        name: "quit",
        aliases: &["q", "exit"],
        brief: "Exit the session",
        usage: "/quit",
        examples: &[("/quit", "Exit the REPL")],
    },
];

/// Tab completion for slash commands.
struct CommandCompleter;

impl CommandCompleter {
    const COMMANDS: &'static [&'static str] = &[
        "/diagnosis", "/dim", "/help", "/map", "/next", "/quit", "/scaffold", "/status",
    ];
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let prefix = &line[..pos];
        let matches: Vec<Pair> = Self::COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Commands available in the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Advance to the next question
    Next,
    /// Jump to a dimension
    Dimension(Dimension),
    /// Show progress
    Status,
    /// Show the knowledge map
    Map,
    /// Show scaffold resources
    Scaffold,
    /// Show the latest diagnosis
    Diagnosis,
    /// Show help (optionally for a specific command)
    Help(Option<String>),
    /// Quit the REPL
    Quit,
    /// Unknown command or bad argument
    Unknown(String),
    /// An answer for the tutor
    Answer(String),
    /// Blank line
    Empty,
}

impl ReplCommand {
    /// Parses input into a REPL command.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if input.is_empty() {
            return ReplCommand::Empty;
        }

        let Some(stripped) = input.strip_prefix('/') else {
            return ReplCommand::Answer(input.to_string());
        };

        let parts: Vec<&str> = stripped.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let arg = parts
            .get(1)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        match cmd.as_str() {
            "next" | "n" => ReplCommand::Next,
            "dim" | "d" => match arg {
                Some(arg) => arg
                    .parse()
                    .map(ReplCommand::Dimension)
                    .unwrap_or_else(|e| ReplCommand::Unknown(format!("{}", e))),
                None => ReplCommand::Unknown("dim requires a dimension".to_string()),
            },
            "status" | "s" => ReplCommand::Status,
            "map" | "m" => ReplCommand::Map,
            "scaffold" | "sc" => ReplCommand::Scaffold,
            "diagnosis" | "dx" => ReplCommand::Diagnosis,
            "help" | "h" | "?" => ReplCommand::Help(arg),
            "quit" | "q" | "exit" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(cmd),
        }
    }
}

/// REPL state
pub struct Repl {
    editor: Editor<CommandCompleter, DefaultHistory>,
    engine: ProgressionEngine,
    runtime: tokio::runtime::Runtime,
    history_path: PathBuf,
}

impl Repl {
    /// Creates a new REPL around an engine that has not been initialized yet.
    pub fn new(engine: ProgressionEngine, state_dir: &Path) -> Result<Self> {
        let editor_config = rustyline::Config::builder()
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut editor = Editor::with_config(editor_config)?;
        editor.set_helper(Some(CommandCompleter));

        config::ensure_state_dir(state_dir)?;
        let history_path = config::history_file(state_dir);
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
        }

        let runtime = tokio::runtime::Runtime::new()?;

        Ok(Self {
            editor,
            engine,
            runtime,
            history_path,
        })
    }

    /// Runs the REPL loop.
    pub fn run(&mut self) -> Result<()> {
        self.engine.initialize()?;

        println!("探课AI v{}", env!("CARGO_PKG_VERSION"));
        println!("Type your answer, /help for commands, /quit to exit");
        println!();
        self.print_latest_message()?;

        loop {
            let prompt = self.prompt()?;

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    self.editor.add_history_entry(&line)?;

                    let cmd = ReplCommand::parse(&line);
                    debug!(?cmd, "Parsed command");

                    match self.handle_command(cmd) {
                        Ok(true) => break, // Quit requested
                        Ok(false) => {}
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        let _ = self.editor.save_history(&self.history_path);

        println!("再见！");
        Ok(())
    }

    /// Returns the prompt string, e.g. `tanke [是何 1/3]> `.
    fn prompt(&self) -> Result<String> {
        let state = self.engine.snapshot()?;
        let total = self.engine.bank().len_for(state.current_dimension);
        Ok(format!(
            "tanke [{} {}/{}]> ",
            state.current_dimension.label(),
            state.current_question_index + 1,
            total
        ))
    }

    /// Handles a REPL command. Returns Ok(true) if should quit.
    fn handle_command(&mut self, cmd: ReplCommand) -> Result<bool> {
        match cmd {
            ReplCommand::Answer(text) => {
                println!("(老师正在思考...)");
                match self.runtime.block_on(self.engine.submit_answer(&text))? {
                    SubmitOutcome::Answered(reply) => {
                        println!("\n老师：{}\n", reply.text);
                        if let Some(status) = &reply.diagnosis {
                            println!("  [掌握度 {}%]\n", status.mastery_level);
                        }
                    }
                    SubmitOutcome::Busy => println!("Still waiting for the previous reply."),
                    SubmitOutcome::Rejected => {}
                }
            }
            ReplCommand::Next => {
                let outcome = self.engine.advance()?;
                debug!(?outcome, "Advanced");
                match outcome {
                    AdvanceOutcome::AlreadyComplete => {
                        println!("All dimensions are complete. Use /dim to review any of them.");
                    }
                    _ => self.print_latest_message()?,
                }
            }
            ReplCommand::Dimension(dimension) => {
                self.engine.select_dimension(dimension)?;
                let question = self.engine.current_question()?;
                println!("【{}】{}", dimension.label(), dimension.description());
                println!("\n{}\n", question.question);
            }
            ReplCommand::Status => self.print_status()?,
            ReplCommand::Map => self.print_map()?,
            ReplCommand::Scaffold => {
                let resources = self.engine.recommended_scaffolds()?;
                if resources.is_empty() {
                    println!("No resources for this dimension.");
                }
                for r in resources {
                    println!("  [{:?}] {} - {}", r.kind, r.title, r.description);
                }
            }
            ReplCommand::Diagnosis => match self.engine.last_diagnosis()? {
                Some(status) => print_diagnosis(&status),
                None => println!("No diagnosis yet. Answer a question first."),
            },
            ReplCommand::Help(topic) => print_help(topic.as_deref()),
            ReplCommand::Quit => return Ok(true),
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}. Type /help for available commands.", cmd);
            }
            ReplCommand::Empty => {}
        }
        Ok(false)
    }

    fn print_latest_message(&self) -> Result<()> {
        let state = self.engine.snapshot()?;
        if let Some(message) = state.transcript.last() {
            println!("老师：{}\n", message.text);
        }
        Ok(())
    }

    fn print_status(&self) -> Result<()> {
        let state = self.engine.snapshot()?;
        let question = self.engine.current_question()?;
        let completed: Vec<_> = state
            .completed_dimensions
            .iter()
            .map(|d| d.label())
            .collect();

        println!(
            "Dimension: {} ({}/{})",
            state.current_dimension.label(),
            state.current_question_index + 1,
            self.engine.bank().len_for(state.current_dimension)
        );
        println!("Question:  {}", question.question);
        println!("Context:   {}", question.context);
        println!(
            "Completed: {}/{} {}",
            completed.len(),
            Dimension::ALL.len(),
            completed.join(" ")
        );
        if let Some(status) = &state.last_diagnosis {
            println!("Mastery:   {}%", status.mastery_level);
        }
        println!("Messages:  {}", state.transcript.len());
        if self.engine.is_complete()? {
            println!("Chain finished. Use /dim to revisit any dimension.");
        }
        Ok(())
    }

    fn print_map(&self) -> Result<()> {
        let map = self.engine.knowledge_map()?;
        println!("Knowledge map ({}/{} lit)", map.completed, map.total);
        for node in &map.nodes {
            let marker = match node.status {
                NodeStatus::Completed => "●",
                NodeStatus::Active => "◉",
                NodeStatus::Locked => "○",
            };
            println!(
                "\n{} {} · {}",
                marker,
                node.dimension.label(),
                node.sub_topics.join(" / ")
            );
            for q in &node.questions {
                println!("    - {}", q.question);
            }
        }
        Ok(())
    }
}

fn print_diagnosis(status: &LearningStatus) {
    println!("Mastery: {}%", status.mastery_level);
    if status.has_gaps() {
        println!("Gaps:");
        for gap in &status.identified_gaps {
            println!("  - {}", gap);
        }
    }
    println!("Advice:  {}", status.recommended_action);
}

/// Finds help for a command by name or alias.
fn find_command_help(name: &str) -> Option<&'static CommandHelp> {
    let name_lower = name.trim_start_matches('/').to_lowercase();
    COMMAND_HELP
        .iter()
        .find(|h| h.name == name_lower || h.aliases.contains(&name_lower.as_str()))
}

/// Prints help information.
fn print_help(topic: Option<&str>) {
    match topic {
        Some(cmd) => {
            if let Some(help) = find_command_help(cmd) {
                println!("/{} - {}", help.name, help.brief);
                if !help.aliases.is_empty() {
                    println!("Aliases: {}", help.aliases.join(", "));
                }
                println!();
                println!("Usage:");
                println!("  {}", help.usage);
                if !help.examples.is_empty() {
                    println!();
                    println!("Examples:");
                    for (example, desc) in help.examples {
                        println!("  {}  # {}", example, desc);
                    }
                }
            } else {
                println!(
                    "Unknown command: {}. Type /help for available commands.",
                    cmd
                );
            }
        }
        None => {
            println!("探课AI - 5D 浮力问题链");
            println!();
            println!("Type an answer to reply to the tutor.");
            println!();
            println!("COMMANDS:");
            for help in COMMAND_HELP {
                println!("    {:<20} {}", help.usage, help.brief);
            }
            println!();
            println!("DIMENSIONS:");
            for d in Dimension::ALL {
                println!("    {}. {:<8} {}", d.ordinal() + 1, d.code(), d.label());
            }
            println!();
            println!("Type /help <command> for detailed help on a specific command.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(
            ReplCommand::parse("  浮力方向向上 "),
            ReplCommand::Answer("浮力方向向上".to_string())
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ReplCommand::parse(""), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
    }

    #[test]
    fn test_parse_navigation() {
        assert_eq!(ReplCommand::parse("/next"), ReplCommand::Next);
        assert_eq!(ReplCommand::parse("/n"), ReplCommand::Next);
        assert_eq!(
            ReplCommand::parse("/dim 若何"),
            ReplCommand::Dimension(Dimension::WhatIf)
        );
        assert_eq!(
            ReplCommand::parse("/d 2"),
            ReplCommand::Dimension(Dimension::Why)
        );
    }

    #[test]
    fn test_parse_dim_errors() {
        assert!(matches!(ReplCommand::parse("/dim"), ReplCommand::Unknown(_)));
        assert!(matches!(ReplCommand::parse("/dim 9"), ReplCommand::Unknown(_)));
    }

    #[test]
    fn test_parse_views() {
        assert_eq!(ReplCommand::parse("/status"), ReplCommand::Status);
        assert_eq!(ReplCommand::parse("/map"), ReplCommand::Map);
        assert_eq!(ReplCommand::parse("/scaffold"), ReplCommand::Scaffold);
        assert_eq!(ReplCommand::parse("/dx"), ReplCommand::Diagnosis);
    }

    #[test]
    fn test_parse_help() {
        assert_eq!(ReplCommand::parse("/help"), ReplCommand::Help(None));
        assert_eq!(
            ReplCommand::parse("/help dim"),
            ReplCommand::Help(Some("dim".to_string()))
        );
    }

    #[test]
    fn test_parse_quit() {
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/EXIT"), ReplCommand::Quit);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            ReplCommand::parse("/fly"),
            ReplCommand::Unknown("fly".to_string())
        );
    }

    #[test]
    fn test_find_command_help() {
        assert_eq!(find_command_help("next").unwrap().name, "next");
        assert_eq!(find_command_help("/d").unwrap().name, "dim");
        assert!(find_command_help("unknown").is_none());
    }
}
