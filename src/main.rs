//! questterm - demo for the terminal session engine
//!
//! Walks through every collaborator-facing operation: the size guard,
//! centered writes with reflow, the select menu, the multi-line editor and
//! the line prompts.
//!
//! # Quick Start
//!
//! ```text
//! questterm                  # Interactive demo
//! questterm -r               # Resize test screen
//! questterm --theme nord     # Pick a color theme
//! ```

use std::env;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use questterm::config::Theme;
use questterm::ui::keys::Key;
use questterm::{Config, InputEvent, ScreenStack, SelectOption, TerminalSession};

/// Command line options
#[derive(Debug, Default)]
struct Args {
    /// Show the resize test screen instead of the demo
    resize_test: bool,
    /// Theme name overriding config.toml
    theme: Option<String>,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

const LOREM: &str = "Every line written through the session is remembered. When the \
window changes size the content column is recomputed and the whole history is wrapped \
again, so nothing is lost and nothing is cut in half. Try making the window narrower \
and wider while this text is on screen.";

fn print_version() {
    eprintln!("questterm {}", VERSION);
}

fn print_help() {
    eprintln!("questterm {} - A resize-aware terminal session engine", VERSION);
    eprintln!();
    eprintln!("Usage: questterm [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -r, --resize          Resize test screen");
    eprintln!("  --theme <NAME>        Color theme");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Menu keys:");
    eprintln!("  ↑/↓ or k/j            Move highlight");
    eprintln!("  Enter                 Select");
    eprintln!("  Esc, Ctrl+C           Back");
    eprintln!();
    eprintln!("Editor keys:");
    eprintln!("  Enter                 New line");
    eprintln!("  Ctrl+S                Submit (submit_key in config.toml)");
    eprintln!("  Ctrl+C                Quit");
    eprintln!();
    eprintln!("External editor: $VISUAL, then $EDITOR, then nano");
    eprintln!("Configuration: ~/.questterm/config.toml");
    eprintln!("Log file:      ~/.questterm/questterm.log");
    eprintln!();
    eprintln!("Themes: {}", Theme::list().join(", "));
    eprintln!();
    eprintln!("Minimum terminal size: 60x20");
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-r" | "--resize" => {
                parsed.resize_test = true;
            }
            "--theme" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing theme argument".to_string());
                }
                parsed.theme = Some(args[i].clone());
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(parsed)
}

/// Log to ~/.questterm/questterm.log; silently disabled if it can't be opened
fn init_logging() {
    let log_path = Config::log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging();
    info!("questterm {} starting...", VERSION);

    let mut config = Config::load();
    if let Some(theme) = args.theme {
        config.theme = theme;
    }

    let mut session = TerminalSession::stdout(config)?;
    session.wait_for_valid_size()?;

    if args.resize_test {
        run_resize_test(&mut session)?;
    } else {
        run_demo(&mut session)?;
    }

    session.clear()?;
    session.show_cursor()?;
    info!("questterm exiting");
    Ok(())
}

fn run_demo(session: &mut TerminalSession) -> anyhow::Result<()> {
    let mut screens = ScreenStack::new();

    loop {
        let options = vec![
            SelectOption::new("Reflow", "reflow").with_description("long text that rewraps on resize"),
            SelectOption::new("Editor", "editor").with_description("multi-line answer"),
            SelectOption::new("External", "external").with_description("answer in $EDITOR"),
            SelectOption::new("Prompts", "prompts").with_description("line questions"),
            SelectOption::new("Quit", "home"),
        ];
        let choice = session.show_select_menu("questterm demo", options)?;
        info!("Demo menu choice: {}", choice);

        match choice.as_str() {
            "reflow" => {
                screens.begin_screen(session, "reflow");
                session.write_header(Some("Reflow"))?;
                session.write_line(LOREM)?;
                session.write_line("")?;
                let hint = session.center_text("Resize the window, then press Enter.");
                session.write_line(&hint)?;
                session.press_enter("")?;
                screens.end_screen();
            }
            "editor" => {
                screens.begin_screen(session, "editor");
                session.write_header(Some("Editor"))?;
                session.write_line("Describe your favourite command-line tool.")?;
                session.write_line("")?;
                let text = session.prompt_multiline_text()?;

                session.write_line(&format!("You wrote {} line(s):", text.lines().count()))?;
                for line in text.lines() {
                    session.write_line(&format!("  {}", line))?;
                }
                session.write_line("")?;
                session.press_enter("Press Enter to return to the menu")?;
                screens.end_screen();
            }
            "external" => {
                screens.begin_screen(session, "external");
                session.write_header(Some("External editor"))?;
                let question = "What would you automate next?";
                session.write_line(question)?;
                session.press_enter("Press Enter to open your editor")?;
                let text = session.prompt_answer(question)?;

                session.write_line(&format!("Answer: {}", text))?;
                session.write_line("")?;
                session.press_enter("Press Enter to return to the menu")?;
                screens.end_screen();
            }
            "prompts" => {
                screens.begin_screen(session, "prompts");
                session.write_header(Some("Prompts"))?;
                let name = session.ask_line("What is your name? ")?;
                let name = if name.is_empty() { "stranger".to_string() } else { name };
                session.write_line(&format!("Hello, {}!", name))?;
                screens.save_current_screen(session);

                if session.ask_yes_no("Tidy up the prompts?", true)? {
                    // redraw the greeting without the prompt lines
                    screens.refresh_current_screen(session)?;
                }
                session.press_enter("Press Enter to return to the menu")?;
                screens.end_screen();
            }
            _ => break,
        }
    }
    Ok(())
}

fn run_resize_test(session: &mut TerminalSession) -> anyhow::Result<()> {
    session.clear()?;
    session.write_header(Some("Resize test"))?;
    session.write_line(LOREM)?;
    session.write_line("")?;
    session.write_line("Press q or Esc to quit.")?;

    let mut raw = session.raw_input()?;
    let status_row = raw.height().saturating_sub(1);
    let line = status_line(&raw);
    raw.render_row(status_row, &line)?;

    loop {
        match raw.next_event()? {
            InputEvent::Resize(dims) => {
                info!("Resize test: {}x{}", dims.width, dims.height);
                let row = dims.height.saturating_sub(1);
                let line = status_line(&raw);
                raw.render_row(row, &line)?;
            }
            InputEvent::Key(event) => {
                match raw.keys().decode(&event) {
                    Some(Key::Escape) | Some(Key::Interrupt) | Some(Key::Char('q')) => break,
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

fn status_line(session: &TerminalSession) -> String {
    let dims = session.dimensions();
    let text = format!(
        "{}x{}  content width {}  padding {}",
        dims.width,
        dims.height,
        session.content_width(),
        session.left_padding()
    );
    session.center_text(&text)
}
