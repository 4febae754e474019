//! Terminal host implementation using Reedline.
//!
//! This host provides interactive terminal I/O with:
//! - Readline-style line editing (Vi and Emacs modes)
//! - Tab completion of commands, modes and store paths
//! - Syntax highlighting
//! - Command history
//!
//! Reedline wants a `'static + Send` completer, but path completion needs the
//! session, which borrows the open transaction. The editor therefore runs on
//! its own thread. It asks the session thread for path completions over a
//! channel, and the session thread answers them while it waits for a line.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use nu_ansi_term::{Color, Style};
use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    ColumnarMenu, DefaultHinter, EditMode, Emacs, FileBackedHistory, KeyCode,
    KeyModifiers, MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch,
    PromptHistorySearchStatus, Reedline, ReedlineEvent, ReedlineMenu, Signal as ReedlineSignal, Vi,
};

use crate::completer::ReplCompleter;
use crate::highlighter::ReplHighlighter;
use crate::io::{
    CompletionKind, InputLine, IoError, IoHost, Output, OutputStyle, PathSource, PromptConfig,
    Signal,
};

/// A path completion request from the editor thread.
struct PathQuery {
    partial: String,
    kind: CompletionKind,
    reply: Sender<Vec<String>>,
}

/// Everything the editor thread reports back.
enum EditorEvent {
    Line(String),
    Signal(Signal),
    Complete(PathQuery),
    Failed(String),
}

/// Terminal host using Reedline for interactive I/O.
pub struct TerminalHost {
    prompts: Option<Sender<PromptConfig>>,
    events: Receiver<EditorEvent>,
    editor: Option<JoinHandle<()>>,
    pending_input: Option<InputLine>,
    pending_signal: Option<Signal>,
    current_prompt: PromptConfig,
}

impl TerminalHost {
    /// Create a new terminal host and start its editor thread.
    pub fn new() -> io::Result<Self> {
        let (prompt_tx, prompt_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let editor = thread::Builder::new()
            .name("thunder-editor".to_string())
            .spawn(move || editor_loop(prompt_rx, event_tx))?;

        Ok(Self {
            prompts: Some(prompt_tx),
            events: event_rx,
            editor: Some(editor),
            pending_input: None,
            pending_signal: None,
            current_prompt: PromptConfig::default(),
        })
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        // Closing the prompt channel ends the editor loop, which saves history.
        self.prompts.take();
        if let Some(editor) = self.editor.take() {
            if editor.join().is_err() {
                log::warn!("Line editor thread panicked");
            }
        }
    }
}

fn editor_loop(prompts: Receiver<PromptConfig>, events: Sender<EditorEvent>) {
    let mut line_editor = build_editor(events.clone());

    while let Ok(config) = prompts.recv() {
        let prompt = TerminalPrompt::from_config(&config);
        let event = match line_editor.read_line(&prompt) {
            Ok(ReedlineSignal::Success(line)) => EditorEvent::Line(line),
            Ok(ReedlineSignal::CtrlC) => EditorEvent::Signal(Signal::Interrupt),
            Ok(ReedlineSignal::CtrlD) => EditorEvent::Signal(Signal::Eof),
            Err(e) => EditorEvent::Failed(format!("Reedline error: {}", e)),
        };
        if events.send(event).is_err() {
            break;
        }
    }
}

fn build_editor(events: Sender<EditorEvent>) -> Reedline {
    let completer = Box::new(ReplCompleter::new(move |partial: &str, kind| {
        let (reply, answer) = mpsc::channel();
        let query = PathQuery {
            partial: partial.to_string(),
            kind,
            reply,
        };
        if events.send(EditorEvent::Complete(query)).is_err() {
            return Vec::new();
        }
        answer.recv().unwrap_or_default()
    }));
    let highlighter = Box::new(ReplHighlighter::new());
    let hinter =
        Box::new(DefaultHinter::default().with_style(Style::new().fg(Color::LightGray).dimmed()));

    let completion_menu = Box::new(
        ColumnarMenu::default()
            .with_name("completion_menu")
            .with_text_style(Style::new().fg(Color::Cyan))
            .with_selected_text_style(Style::new().fg(Color::Black).on(Color::Cyan).bold()),
    );

    let tab = ReedlineEvent::UntilFound(vec![
        ReedlineEvent::Menu("completion_menu".to_string()),
        ReedlineEvent::MenuNext,
    ]);
    let edit_mode: Box<dyn EditMode> = if should_use_vi_mode() {
        let mut insert_keybindings = default_vi_insert_keybindings();
        insert_keybindings.add_binding(KeyModifiers::NONE, KeyCode::Tab, tab);
        Box::new(Vi::new(insert_keybindings, default_vi_normal_keybindings()))
    } else {
        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(KeyModifiers::NONE, KeyCode::Tab, tab);
        Box::new(Emacs::new(keybindings))
    };

    let mut line_editor = Reedline::create()
        .with_completer(completer)
        .with_highlighter(highlighter)
        .with_hinter(hinter)
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_edit_mode(edit_mode);

    if let Some(history_path) = history_path() {
        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(1000, history_path) {
            Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
            Err(e) => log::debug!("History unavailable: {}", e),
        }
    }

    line_editor
}

impl IoHost for TerminalHost {
    fn wait_for_input(&mut self, paths: &dyn PathSource) -> Result<(), IoError> {
        let stopped = || IoError::Io("line editor stopped".to_string());

        self.prompts
            .as_ref()
            .ok_or_else(stopped)?
            .send(self.current_prompt.clone())
            .map_err(|_| stopped())?;

        loop {
            match self.events.recv().map_err(|_| stopped())? {
                EditorEvent::Complete(query) => {
                    // The editor may have given up waiting; nothing to do then.
                    let _ = query.reply.send(paths.complete_path(&query.partial, query.kind));
                }
                EditorEvent::Line(line) => {
                    self.pending_input = Some(InputLine { line });
                    return Ok(());
                }
                EditorEvent::Signal(signal) => {
                    self.pending_signal = Some(signal);
                    return Ok(());
                }
                EditorEvent::Failed(message) => return Err(IoError::Io(message)),
            }
        }
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.pending_input.take())
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.pending_signal.take())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        match output.style {
            OutputStyle::Normal => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(&output.data)?;
                stdout.write_all(b"\n")?;
            }
            OutputStyle::Error => eprintln!(
                "{} {}",
                Color::Red.bold().paint("Error:"),
                String::from_utf8_lossy(&output.data)
            ),
            OutputStyle::Info | OutputStyle::Banner => {
                println!("{}", Color::Cyan.paint(String::from_utf8_lossy(&output.data)))
            }
        }
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.current_prompt = config;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        io::stdout().flush()?;
        io::stderr().flush()?;
        Ok(())
    }
}

/// `[<file> <path>] # ` in color, or nothing at all in batch mode.
struct TerminalPrompt {
    config: PromptConfig,
}

impl TerminalPrompt {
    fn from_config(config: &PromptConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl Prompt for TerminalPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        if !self.config.interactive {
            return Cow::Borrowed("");
        }
        Cow::Owned(format!(
            "[{} {}]",
            Color::Blue.bold().paint(&self.config.file_name),
            Color::Yellow.paint(&self.config.current_path)
        ))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        if !self.config.interactive {
            return Cow::Borrowed("");
        }
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => {
                Cow::Owned(format!(" {} ", Color::Green.bold().paint("#")))
            }
            PromptEditMode::Vi(vi_mode) => {
                let indicator = match vi_mode {
                    reedline::PromptViMode::Normal => Color::Blue.bold().paint("#"),
                    reedline::PromptViMode::Insert => Color::Green.bold().paint("#"),
                };
                Cow::Owned(format!(" {} ", indicator))
            }
            PromptEditMode::Custom(s) => Cow::Owned(format!(" ({}) # ", s)),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(": ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("thunder").join("history.txt"))
}

fn names_vi(value: &str) -> bool {
    let value = value.to_lowercase();
    value.contains("vim") || value == "vi" || value.ends_with("/vi")
}

/// Check if vi mode should be used based on environment configuration.
///
/// `THUNDER_EDIT_MODE` (set by `--vi` and `--emacs`) wins over everything.
fn should_use_vi_mode() -> bool {
    if let Ok(mode) = std::env::var("THUNDER_EDIT_MODE") {
        return names_vi(&mode);
    }

    if std::env::var("EDITOR").is_ok_and(|editor| names_vi(&editor)) {
        return true;
    }
    if std::env::var("VISUAL").is_ok_and(|visual| names_vi(&visual)) {
        return true;
    }

    check_inputrc_vi_mode()
}

/// Check .inputrc for vi mode setting.
fn check_inputrc_vi_mode() -> bool {
    let inputrc_paths = [
        std::env::var("INPUTRC").ok().map(PathBuf::from),
        dirs::home_dir().map(|p| p.join(".inputrc")),
        Some(PathBuf::from("/etc/inputrc")),
    ];

    inputrc_paths
        .into_iter()
        .flatten()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .any(|content| content.lines().any(inputrc_selects_vi))
}

/// `set editing-mode vi`
fn inputrc_selects_vi(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    matches!(words.as_slice(), ["set", "editing-mode", "vi", ..])
}
