//! Interactive prompt.
//!
//! Reads commands line by line, applies them to the session, and re-renders
//! the dashboard after every rating that is recorded.

use super::{RatingForm, Session};
use crate::cli::OutputFormat;
use crate::report::{generate_json_dashboard, generate_markdown_dashboard};
use anyhow::Result;
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  add                       record a rating, one field at a time
  add <customer>;<item>;<rating>
                            record a rating in one line
  show                      print the dashboard
  tail                      print the latest events
  menu                      list the menu
  help                      show this help
  quit                      end the session
";

/// A parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Option<String>),
    Show,
    Tail,
    Menu,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Command::Empty,
            "add" | "rate" if rest.is_empty() => Command::Add(None),
            "add" | "rate" => Command::Add(Some(rest.to_string())),
            "show" | "dashboard" => Command::Show,
            "tail" | "events" => Command::Tail,
            "menu" => Command::Menu,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Render the current dashboard in the requested format.
pub fn render(session: &Session, format: OutputFormat) -> Result<String> {
    let dashboard = session.dashboard();
    match format {
        OutputFormat::Markdown => Ok(generate_markdown_dashboard(
            &dashboard,
            session.config().dashboard.chart_width,
        )),
        OutputFormat::Json => generate_json_dashboard(&dashboard),
    }
}

/// Numbered menu listing.
pub fn menu_listing(session: &Session) -> String {
    session
        .config()
        .menu
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("  {}. {}\n", i + 1, item))
        .collect()
}

/// Why the prompt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    EndOfInput,
    Interrupted,
}

/// Input lines, cut short when `shutdown` resolves.
struct Prompt<R, S> {
    lines: Lines<R>,
    shutdown: Pin<Box<S>>,
    end: SessionEnd,
}

impl<R, S> Prompt<R, S>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    /// Next line, or `None` once input is closed or shutdown was requested.
    async fn next_line(&mut self) -> Result<Option<String>> {
        tokio::select! {
            // Lines already buffered are handled before the shutdown signal.
            biased;
            line = self.lines.next_line() => {
                let line = line?;
                if line.is_none() {
                    debug!("End of input");
                    self.end = SessionEnd::EndOfInput;
                }
                Ok(line)
            }
            _ = &mut self.shutdown => {
                debug!("Shutdown requested");
                self.end = SessionEnd::Interrupted;
                Ok(None)
            }
        }
    }
}

/// Run the prompt until `quit`, end of input, or `shutdown` resolves.
pub async fn run<R, W, S>(
    session: &mut Session,
    input: R,
    out: &mut W,
    format: OutputFormat,
    shutdown: S,
) -> Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: Future<Output = ()>,
{
    let mut prompt = Prompt {
        lines: input.lines(),
        shutdown: Box::pin(shutdown),
        end: SessionEnd::Quit,
    };

    writeln!(out, "{}", render(session, format)?)?;
    writeln!(out, "Type 'help' for commands.")?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = prompt.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Help => write!(out, "{}", HELP)?,
            Command::Menu => write!(out, "{}", menu_listing(session))?,
            Command::Show => writeln!(out, "{}", render(session, format)?)?,
            Command::Tail => {
                let tail_size = session.config().dashboard.tail_size;
                for event in session.log().tail(tail_size) {
                    writeln!(
                        out,
                        "  {} | {} | {} | {}",
                        event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        event.customer,
                        event.item,
                        event.rating
                    )?;
                }
            }
            Command::Add(inline) => {
                let form = match inline {
                    Some(text) => RatingForm::parse_inline(&text),
                    None => match read_form(session, &mut prompt, out).await? {
                        Some(form) => Ok(form),
                        None => break,
                    },
                };

                match form.and_then(|form| session.submit(&form)) {
                    Ok(event) => {
                        writeln!(
                            out,
                            "✅ New rating added to the stream: {} rated {} by {}\n",
                            event.item, event.rating, event.customer
                        )?;
                        writeln!(out, "{}", render(session, format)?)?;
                    }
                    Err(e) => {
                        warn!("Rejected rating: {}", e);
                        writeln!(out, "❌ {}", e)?;
                    }
                }
            }
            Command::Unknown(text) => {
                writeln!(out, "Unknown command: {} (type 'help')", text)?;
            }
        }
    }

    if prompt.end == SessionEnd::Interrupted {
        writeln!(out)?;
    }
    writeln!(out, "👋 Session ended with {} events.", session.log().len())?;
    Ok(prompt.end)
}

/// Ask for each form field in turn. Returns `None` if the prompt ends first.
async fn read_form<R, W, S>(
    session: &Session,
    prompt: &mut Prompt<R, S>,
    out: &mut W,
) -> Result<Option<RatingForm>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: Future<Output = ()>,
{
    let config = session.config();

    write!(
        out,
        "👤 Customer name [{}]: ",
        config.general.default_customer
    )?;
    out.flush()?;
    let Some(customer) = prompt.next_line().await? else {
        return Ok(None);
    };

    write!(out, "{}🍽️  Menu item (number or name): ", menu_listing(session))?;
    out.flush()?;
    let Some(item) = prompt.next_line().await? else {
        return Ok(None);
    };

    write!(
        out,
        "⭐ Rating ({}-{}) [{}]: ",
        config.scale.min, config.scale.max, config.scale.default
    )?;
    out.flush()?;
    let Some(rating) = prompt.next_line().await? else {
        return Ok(None);
    };

    Ok(Some(RatingForm {
        customer,
        item,
        rating,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{HistoricalRecord, Rating};
    use chrono::Utc;
    use tokio::io::AsyncWriteExt;

    fn seeded_session() -> Session {
        let history = [("Capuccino", 4.0), ("Capuccino", 2.0), ("Latte", 5.0)]
            .iter()
            .map(|(item, rating)| HistoricalRecord {
                customer: "Cliente_1".to_string(),
                item: item.to_string(),
                rating: Rating::Score(*rating),
                timestamp: None,
            })
            .collect();
        Session::from_history(Config::default(), history, Utc::now())
    }

    async fn run_script(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        let end = run(
            session,
            script.as_bytes(),
            &mut out,
            OutputFormat::Markdown,
            std::future::pending(),
        )
        .await
        .unwrap();
        assert_ne!(end, SessionEnd::Interrupted);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("add"), Command::Add(None));
        assert_eq!(
            Command::parse("ADD Ana; Latte; 5"),
            Command::Add(Some("Ana; Latte; 5".to_string()))
        );
        assert_eq!(Command::parse("  show "), Command::Show);
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(
            Command::parse("dance"),
            Command::Unknown("dance".to_string())
        );
    }

    #[tokio::test]
    async fn test_inline_add_updates_dashboard() {
        let mut session = seeded_session();
        let output = run_script(&mut session, "add X;Mocaccino;3\nquit\n").await;

        assert_eq!(session.log().len(), 4);
        assert!(output.contains("New rating added to the stream: Mocaccino rated 3 by X"));
        assert!(output.contains("| Mocaccino | 3.00 | 1 |"));
        assert!(output.contains("Top recommended item right now: Latte"));
        assert!(output.contains("Session ended with 4 events."));
    }

    #[tokio::test]
    async fn test_guided_form() {
        let mut session = seeded_session();
        let output = run_script(&mut session, "add\n\n3\n5\n").await;

        assert!(output.contains("Customer name [Cliente_nuevo]"));
        let last = session.log().tail(1)[0].clone();
        assert_eq!(last.customer, "Cliente_nuevo");
        assert_eq!(last.item, "Mocaccino");
        assert_eq!(last.rating, Rating::Score(5.0));
    }

    #[tokio::test]
    async fn test_rejected_input_keeps_log() {
        let mut session = seeded_session();
        let output = run_script(&mut session, "add X;Latte;9\nadd X;Pizza;3\nadd nope\n").await;

        assert_eq!(session.log().len(), 3);
        assert!(output.contains("❌ rating 9 is outside the scale 1-5"));
        assert!(output.contains("❌ unknown menu item: Pizza"));
        assert!(output.contains("❌ expected \"customer;item;rating\""));
    }

    #[tokio::test]
    async fn test_form_interrupted_by_end_of_input() {
        let mut session = seeded_session();
        let output = run_script(&mut session, "add\nAna\n").await;

        assert_eq!(session.log().len(), 3);
        assert!(output.contains("Session ended with 3 events."));
    }

    #[tokio::test]
    async fn test_no_data_message() {
        let mut session = Session::from_history(Config::default(), Vec::new(), Utc::now());
        let output = run_script(&mut session, "show\nmenu\n").await;

        assert!(output.contains("No data available"));
        assert!(output.contains("6. Sandwich de Jamón"));
    }

    #[tokio::test]
    async fn test_quit_and_end_of_input() {
        let mut session = seeded_session();
        let mut out = Vec::new();

        let end = run(
            &mut session,
            "quit\n".as_bytes(),
            &mut out,
            OutputFormat::Markdown,
            std::future::pending(),
        )
        .await
        .unwrap();
        assert_eq!(end, SessionEnd::Quit);

        let end = run(
            &mut session,
            "show\n".as_bytes(),
            &mut out,
            OutputFormat::Markdown,
            std::future::pending(),
        )
        .await
        .unwrap();
        assert_eq!(end, SessionEnd::EndOfInput);
    }

    #[tokio::test]
    async fn test_shutdown_ends_prompt_while_input_stays_open() {
        let mut session = seeded_session();
        let (reader, mut writer) = tokio::io::duplex(256);
        writer.write_all(b"add X;Croissant;4\n").await.unwrap();

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        stop_tx.send(()).unwrap();
        let shutdown = async {
            let _ = stop_rx.await;
        };

        let mut out = Vec::new();
        let end = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            run(
                &mut session,
                tokio::io::BufReader::new(reader),
                &mut out,
                OutputFormat::Markdown,
                shutdown,
            ),
        )
        .await
        .expect("prompt kept waiting for input after shutdown")
        .unwrap();

        // The writer is still open, so only the shutdown signal can end the loop.
        drop(writer);
        let output = String::from_utf8(out).unwrap();
        assert_eq!(end, SessionEnd::Interrupted);
        assert_eq!(session.log().len(), 4);
        assert!(output.contains("Session ended with 4 events."));
    }

    #[tokio::test]
    async fn test_shutdown_during_guided_form_records_nothing() {
        let mut session = seeded_session();
        let (reader, mut writer) = tokio::io::duplex(256);
        writer.write_all(b"add\nAna\n").await.unwrap();

        let mut out = Vec::new();
        let end = run(
            &mut session,
            tokio::io::BufReader::new(reader),
            &mut out,
            OutputFormat::Markdown,
            tokio::time::sleep(std::time::Duration::from_millis(50)),
        )
        .await
        .unwrap();

        drop(writer);
        assert_eq!(end, SessionEnd::Interrupted);
        assert_eq!(session.log().len(), 3);
    }
}
