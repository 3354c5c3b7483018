//! Interactive chat loop.
//!
//! Free text goes to the assistant; lines starting with `:` are local
//! commands. Turns are numbered as printed, and reaction/source
//! commands address turns by that number.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use comfy_table::{Cell, Table};
use console::style;
use ssassist_client::export;
use ssassist_client::{ChatClient, HttpTransport, ReactionInput};
use ssassist_protocol::{Reaction, Sender, Turn, ISSUE_TAGS};

const HELP: &str = "\
Commands:
  :up N           thumbs-up turn N (again to clear)
  :down N         thumbs-down turn N (prompts for detail; again to clear)
  :sources N      show the documents behind turn N
  :export [PATH]  save the conversation as HTML
  :reset          start a new conversation
  :help           show this help
  :quit           exit";

pub struct Repl {
    client: ChatClient<HttpTransport>,
    transcripts_dir: PathBuf,
}

impl Repl {
    pub fn new(client: ChatClient<HttpTransport>, transcripts_dir: PathBuf) -> Self {
        Self {
            client,
            transcripts_dir,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.client.greet();
        let turns = self.client.turns();
        print_turn(turns.len(), &turns[turns.len() - 1]);

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            prompt()?;
            let Some(line) = lines.next() else { break };
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(command) = line.strip_prefix(':') {
                if !self.run_command(command, &mut lines).await? {
                    break;
                }
                continue;
            }

            let before = self.client.turns().len();
            self.client.send(line).await;
            for (offset, turn) in self.client.turns()[before..].iter().enumerate() {
                print_turn(before + offset + 1, turn);
            }
        }
        Ok(())
    }

    /// Returns false when the loop should exit.
    async fn run_command(
        &mut self,
        command: &str,
        lines: &mut impl Iterator<Item = io::Result<String>>,
    ) -> anyhow::Result<bool> {
        let mut parts = command.split_whitespace();
        match parts.next() {
            Some("quit") | Some("q") => return Ok(false),
            Some("help") => println!("{HELP}"),
            Some("reset") => {
                self.client.reset();
                self.client.greet();
                println!("{}", style("Conversation cleared.").dim());
                print_turn(1, &self.client.turns()[0]);
            }
            Some("up") => {
                if let Some(id) = self.resolve_turn(parts.next()) {
                    let outcome = self.client.react(&id, ReactionInput::ThumbsUp).await;
                    match outcome.reaction {
                        Some(Reaction::Positive) => println!("{}", style("Thanks!").dim()),
                        _ => println!("{}", style("Reaction cleared.").dim()),
                    }
                }
            }
            Some("down") => {
                if let Some(id) = self.resolve_turn(parts.next()) {
                    let outcome = self.client.react(&id, ReactionInput::ThumbsDown).await;
                    if outcome.detail_capture {
                        let input = capture_detail(lines)?;
                        self.client.react(&id, input).await;
                        println!("{}", style("Feedback recorded.").dim());
                    } else {
                        println!("{}", style("Reaction cleared.").dim());
                    }
                }
            }
            Some("sources") => {
                if let Some(id) = self.resolve_turn(parts.next()) {
                    self.print_sources(&id);
                }
            }
            Some("export") => {
                let path = match parts.next() {
                    Some(p) => PathBuf::from(p),
                    None => self
                        .transcripts_dir
                        .join(format!("ssassist-{}.html", Local::now().format("%Y%m%d-%H%M%S"))),
                };
                self.export(&path)?;
            }
            _ => println!("Unknown command. {}", style(":help lists commands").dim()),
        }
        Ok(true)
    }

    /// Map a 1-based turn number to its id. Provisional turns have no
    /// id yet and cannot be addressed.
    fn resolve_turn(&self, arg: Option<&str>) -> Option<String> {
        let turns = self.client.turns();
        let number: usize = match arg.and_then(|a| a.parse().ok()) {
            Some(n) if n >= 1 && n <= turns.len() => n,
            _ => {
                println!("Expected a turn number between 1 and {}.", turns.len());
                return None;
            }
        };
        let turn = &turns[number - 1];
        if turn.id.is_empty() {
            println!("That turn has no server identity yet.");
            return None;
        }
        Some(turn.id.clone())
    }

    fn print_sources(&self, turn_id: &str) {
        let Some(turn) = self.client.store().find(turn_id) else {
            return;
        };
        if !turn.has_sources() {
            println!("{}", style("No sources for that turn.").dim());
            return;
        }

        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("Source"),
            Cell::new("Title"),
            Cell::new("Type"),
            Cell::new("Relevance"),
        ]);
        for doc in &turn.sources {
            table.add_row(vec![
                Cell::new(&doc.id),
                Cell::new(&doc.metadata.title),
                Cell::new(&doc.metadata.document_type),
                Cell::new(format!("{:.2}", doc.relevance_score)),
            ]);
        }
        println!("{table}");
    }

    fn export(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        export::write_transcript(self.client.turns(), path)?;
        println!("Saved transcript to {}", style(path.display()).green());
        Ok(())
    }
}

/// Prompt for issue tags and a free-text comment after a thumbs-down.
/// An empty tag line with no comment dismisses the detail step; the
/// bare negative signal is still sent.
fn capture_detail(
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> anyhow::Result<ReactionInput> {
    println!("What went wrong? (comma-separated, or leave blank)");
    for (tag, label) in ISSUE_TAGS {
        println!("  {:<12} {}", style(tag).cyan(), label);
    }
    print!("tags> ");
    io::stdout().flush()?;
    let tag_line = lines.next().transpose()?.unwrap_or_default();

    print!("comment> ");
    io::stdout().flush()?;
    let comment = lines.next().transpose()?.unwrap_or_default();
    let comment = comment.trim().to_string();

    let issues: Vec<String> = tag_line
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if issues.is_empty() && comment.is_empty() {
        return Ok(ReactionInput::DetailDismissed);
    }
    Ok(ReactionInput::DetailSubmitted { issues, comment })
}

fn prompt() -> io::Result<()> {
    print!("{} ", style(">").bold().cyan());
    io::stdout().flush()
}

fn print_turn(number: usize, turn: &Turn) {
    let label = match turn.sender {
        Sender::User => style(format!("[{number}] You")).bold().cyan(),
        Sender::Assistant => style(format!("[{number}] SSAssist")).bold().green(),
    };
    println!("{label}");
    println!("{}", turn.text);
    if turn.has_sources() {
        println!(
            "{}",
            style(format!(
                "({} sources, :sources {} to view)",
                turn.sources.len(),
                number
            ))
            .dim()
        );
    }
    println!();
}
