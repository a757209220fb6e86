mod app;
mod commands;

use anyhow::{Context, Result, bail};
use app::App;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use docwalk_config::Config;
use docwalk_document::Document;
use docwalk_engine::{Granularities, walker_for_label};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

const USAGE: &str = "Usage:
  docwalk [FILE]                  read FILE interactively
  docwalk check FILE              verify every configured granularity on FILE
  docwalk dump GRANULARITY FILE   print what is spoken at each position";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Read(Option<PathBuf>),
    Check(PathBuf),
    Dump(String, PathBuf),
}

fn parse_args(args: &[String]) -> Option<Command> {
    match args {
        [] => Some(Command::Read(None)),
        [cmd, file] if cmd == "check" => Some(Command::Check(PathBuf::from(file))),
        [cmd, label, file] if cmd == "dump" => {
            Some(Command::Dump(label.clone(), PathBuf::from(file)))
        }
        [file] if file != "check" && file != "dump" && !file.starts_with('-') => {
            Some(Command::Read(Some(PathBuf::from(file))))
        }
        _ => None,
    }
}

fn load_document(path: &Path) -> Result<Document> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    Document::from_bytes(&bytes).with_context(|| format!("Failed to load '{}'", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = parse_args(&args) else {
        eprintln!("{USAGE}");
        process::exit(2);
    };

    let config_path = Config::config_path();
    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    log::debug!("config from {}: {config:?}", config_path.display());
    let granularities = Granularities::from_labels(&config.granularities)
        .with_context(|| format!("Invalid granularities in '{}'", config_path.display()))?;

    match command {
        Command::Check(path) => {
            let doc = load_document(&path)?;
            let (lines, ok) = commands::check(&doc, &granularities);
            for line in lines {
                println!("{line}");
            }
            if !ok {
                process::exit(1);
            }
        }
        Command::Dump(label, path) => {
            let Some(walker) = walker_for_label(&label) else {
                bail!("Unknown granularity '{label}'");
            };
            let doc = load_document(&path)?;
            for line in commands::dump(&doc, walker.as_ref()) {
                println!("{line}");
            }
        }
        Command::Read(path) => {
            let Some(path) = path.or(config.document.clone()) else {
                eprintln!("Error: No document given and none configured");
                eprintln!("{USAGE}");
                eprintln!(
                    "Or set `document` in the config file at {}",
                    config_path.display()
                );
                process::exit(1);
            };
            let doc = load_document(&path)?;
            let start = config
                .starting_granularity()
                .and_then(|label| granularities.position(label))
                .unwrap_or(0);
            let app = App::new(doc, granularities, start, config.wrap);
            run_terminal(app, &path)?;
        }
    }

    Ok(())
}

fn run_terminal(mut app: App, path: &Path) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let title = path.display().to_string();
    let res = run_app(&mut terminal, &mut app, &title);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    title: &str,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app, title))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => {
                    app.step(false);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    app.step(true);
                }
                KeyCode::Char('g') => app.cycle_granularity(false),
                KeyCode::Char('G') => app.cycle_granularity(true),
                KeyCode::Enter | KeyCode::Char(' ') => app.activate(),
                KeyCode::Char(c @ '1'..='9') => app.choose(c as usize - '0' as usize),
                _ => {}
            }
        }
    }
}

/// The braille line with the selected part highlighted.
fn braille_line(app: &App) -> Line<'static> {
    let braille = &app.braille;
    let chars: Vec<char> = braille.text.chars().collect();
    let start = braille.start.min(chars.len());
    let end = braille.end.clamp(start, chars.len());
    let before: String = chars[..start].iter().collect();
    let selected: String = chars[start..end].iter().collect();
    let after: String = chars[end..].iter().collect();
    Line::from(vec![
        Span::raw(before),
        Span::styled(
            selected,
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(after),
    ])
}

fn ui(f: &mut Frame, app: &App, title: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let speech = Paragraph::new(app.spoken.clone())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{title} [{}]", app.granularity_label())),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(speech, chunks[0]);

    let braille = Paragraph::new(braille_line(app))
        .block(Block::default().borders(Borders::ALL).title("Braille"));
    f.render_widget(braille, chunks[1]);

    let messages: Vec<Line> = app
        .actions
        .messages
        .iter()
        .rev()
        .map(|m| Line::from(m.clone()))
        .collect();
    let actions = Paragraph::new(messages)
        .block(Block::default().borders(Borders::ALL).title("Actions"))
        .wrap(Wrap { trim: true });
    f.render_widget(actions, chunks[2]);

    let help = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↓/j: Next | "),
        Span::raw("↑/k: Previous | "),
        Span::raw("g/G: Granularity | "),
        Span::raw("Enter/Space: Act | 1-9: Choose"),
    ]);
    f.render_widget(Paragraph::new(help), chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(&[], Some(Command::Read(None)))]
    #[case(&["notes.md"], Some(Command::Read(Some(PathBuf::from("notes.md")))))]
    #[case(&["check", "a.md"], Some(Command::Check(PathBuf::from("a.md"))))]
    #[case(&["dump", "word", "a.md"], Some(Command::Dump("word".to_string(), PathBuf::from("a.md"))))]
    #[case(&["check"], None)]
    #[case(&["--help"], None)]
    #[case(&["a.md", "b.md"], None)]
    fn parses_arguments(#[case] input: &[&str], #[case] expected: Option<Command>) {
        assert_eq!(parse_args(&args(input)), expected);
    }

    #[test]
    fn loads_documents_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Hello\n\nWorld\n").unwrap();
        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc.leaves().len(), 2);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        bad.write_all(&[0xff, 0xfe]).unwrap();
        assert!(load_document(bad.path()).is_err());
        assert!(load_document(Path::new("/definitely/not/here.md")).is_err());
    }

    #[test]
    fn braille_line_splits_on_selection() {
        let doc = Document::from_markdown("Café [au](x) lait\n");
        let mut app = App::new(doc, Granularities::standard(), 0, false);
        app.step(false);
        let line = braille_line(&app);
        let parts: Vec<String> = line.spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(parts, vec!["Café ", "au", " lait"]);
    }
}
