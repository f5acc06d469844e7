//! External editor capture
//!
//! Long answers can be written in the user's own editor: `$VISUAL`, then
//! `$EDITOR`, then a platform default. The editor gets a scratch file that
//! starts with `#` comment lines; comment lines are dropped from the result.

use std::env;
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info, warn};

use crate::core::error::{Result, TermError};
use crate::core::session::TerminalSession;

#[cfg(windows)]
const DEFAULT_EDITOR: &str = "notepad";
#[cfg(not(windows))]
const DEFAULT_EDITOR: &str = "nano";

/// Editor command line from `$VISUAL` / `$EDITOR` values. Empty values are skipped.
pub fn editor_from(visual: Option<String>, editor: Option<String>) -> String {
    [visual, editor]
        .into_iter()
        .flatten()
        .map(|cmd| cmd.trim().to_string())
        .find(|cmd| !cmd.is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// The user's preferred editor command line
pub fn editor_command() -> String {
    editor_from(env::var("VISUAL").ok(), env::var("EDITOR").ok())
}

/// Whether `program` resolves to a file, directly or through `path_var`
fn find_program(program: &str, path_var: Option<OsString>) -> bool {
    let program = Path::new(program);
    if program.components().count() > 1 {
        return program.is_file();
    }
    let Some(paths) = path_var else {
        return false;
    };
    env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(program);
        candidate.is_file() || (cfg!(windows) && candidate.with_extension("exe").is_file())
    })
}

/// The preferred editor can be found on `PATH`
pub fn is_editor_available() -> bool {
    let command = editor_command();
    match command.split_whitespace().next() {
        Some(program) => find_program(program, env::var_os("PATH")),
        None => false,
    }
}

/// Scratch file contents shown to the user
pub fn initial_content(prompt: &str) -> String {
    if prompt.is_empty() {
        "# Write your answer below:\n\n".to_string()
    } else {
        format!("# {}\n# Write your answer below this line:\n\n", prompt)
    }
}

/// Drop `#` comment lines, join the rest and trim
pub fn strip_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

impl TerminalSession {
    /// Let the user write an answer in their own editor
    pub fn open_editor(&mut self, prompt: &str) -> Result<String> {
        let command = editor_command();
        self.run_editor(&command, prompt)
    }

    /// Answer through the external editor, or the built-in editor when it
    /// is unavailable or fails
    pub fn prompt_answer(&mut self, prompt: &str) -> Result<String> {
        if !self.is_interactive() || !is_editor_available() {
            debug!("External editor unavailable, using the built-in editor");
            return self.prompt_multiline_text();
        }
        let command = editor_command();
        self.answer_with(&command, prompt)
    }

    fn answer_with(&mut self, command: &str, prompt: &str) -> Result<String> {
        match self.run_editor(command, prompt) {
            Ok(answer) => {
                self.write("\u{2705} Answer captured!", false)?;
                Ok(answer)
            }
            Err(err @ (TermError::Editor { .. } | TermError::EditorExit { .. })) => {
                warn!("{}", err);
                self.write(&format!("\u{274c} Error opening editor: {}", err), false)?;
                self.write("Falling back to inline input...", false)?;
                self.prompt_multiline_text()
            }
            Err(err) => Err(err),
        }
    }

    fn run_editor(&mut self, command: &str, prompt: &str) -> Result<String> {
        let failed = |source| TermError::Editor {
            command: command.to_string(),
            source,
        };

        let mut file = tempfile::Builder::new()
            .prefix("questterm-")
            .suffix(".txt")
            .tempfile()
            .map_err(failed)?;
        file.write_all(initial_content(prompt).as_bytes()).map_err(failed)?;
        // close our handle so the editor can replace the file
        let path = file.into_temp_path();

        let mut parts = command.split_whitespace();
        let program = parts.next().unwrap_or(DEFAULT_EDITOR);
        info!("Opening editor {:?} on {}", command, path.display());

        self.show_cursor()?;
        let status = Command::new(program)
            .args(parts)
            .arg(&path)
            .status()
            .map_err(failed);
        self.hide_cursor()?;
        // the editor drew over the screen
        if !self.is_showing_warning() {
            self.replay()?;
        }

        let status = status?;
        if !status.success() {
            return Err(TermError::EditorExit {
                command: command.to_string(),
                status,
            });
        }
        let content = std::fs::read_to_string(&path).map_err(failed)?;
        Ok(strip_comments(&content))
    }
}
