use std::io::{self, BufRead, BufReader, IsTerminal as _, Write as _};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};

use crate::dprintln;
use crate::output::{debugger_colors, Output};

/// Must be ASCII, so the prompt width equals its byte length.
const PROMPT: &str = "gbdb> ";

/// Yields one command at a time.
pub trait Read {
    /// `None` indicates EOF. The command may carry surrounding whitespace.
    fn read(&mut self) -> Option<&str>;
}

/// Commands from the `--command` argument, then from stdin.
#[derive(Debug)]
pub struct CommandReader {
    argument: Option<Line>,
    stream: Stream,
}

#[derive(Debug)]
enum Stream {
    Piped(Piped<BufReader<io::Stdin>>),
    Terminal(Terminal),
}

/// Text holding several commands, separated by `;` or newlines.
#[derive(Debug, Default)]
struct Line {
    text: String,
    /// Byte index of the next command.
    cursor: usize,
}

/// Input which is not a terminal, read a line at a time.
#[derive(Debug)]
struct Piped<R> {
    input: R,
    line: Line,
}

/// Interactive terminal with line editing.
#[derive(Debug)]
struct Terminal {
    stderr: io::Stderr,
    editor: Editor,
    line: Line,
}

/// Line being typed, and the lines submitted before it.
#[derive(Debug, Default)]
struct Editor {
    draft: String,
    /// Char index into the displayed line.
    cursor: usize,
    history: Vec<String>,
    /// Displayed history entry, or the draft if equal to `history.len()`.
    focus: usize,
}

#[derive(Debug)]
enum Key {
    Interrupt,
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Char(char),
}

#[derive(Debug, PartialEq, Eq)]
enum Edit {
    Continue,
    Submit,
    EndOfInput,
}

/// Show a command which was not typed at the prompt.
fn echo(command: Option<&str>) {
    match command.map(str::trim) {
        Some("") => (),
        Some(command) => dprintln!(Sometimes, Normal, "\x1b[1m{}{}\x1b[0m", PROMPT, command),
        None => dprintln!(Sometimes, Normal, "\x1b[1m{}\x1b[3m(end of input)\x1b[0m", PROMPT),
    }
}

impl CommandReader {
    pub fn from(argument: Option<String>) -> Self {
        let stdin = io::stdin();
        let stream = if stdin.is_terminal() {
            Stream::Terminal(Terminal::new())
        } else {
            Stream::Piped(Piped::new(BufReader::new(stdin)))
        };
        Self {
            argument: argument.map(Line::new),
            stream,
        }
    }

    /// Whether a user can interrupt auto-run from the keyboard.
    pub fn is_interactive(&self) -> bool {
        matches!(self.stream, Stream::Terminal(_))
    }

    /// Block for up to `timeout`. Returns `true` if a key was pressed meanwhile.
    ///
    /// Piped input just sleeps.
    pub fn wait_for_key(&mut self, timeout: Duration) -> io::Result<bool> {
        match self.stream {
            Stream::Piped(_) => {
                std::thread::sleep(timeout);
                Ok(false)
            }
            Stream::Terminal(_) => Terminal::poll_key(timeout),
        }
    }
}

impl Read for CommandReader {
    fn read(&mut self) -> Option<&str> {
        if let Some(argument) = &mut self.argument {
            if let Some(command) = argument.next_command() {
                echo(Some(command));
                return Some(command);
            }
        }
        match &mut self.stream {
            Stream::Piped(piped) => {
                let command = piped.read();
                echo(command);
                command
            }
            Stream::Terminal(terminal) => terminal.read(),
        }
    }
}

impl Line {
    fn new(text: String) -> Self {
        Self { text, cursor: 0 }
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.text.len()
    }

    fn next_command(&mut self) -> Option<&str> {
        if self.is_exhausted() {
            return None;
        }
        let start = self.cursor;
        let rest = &self.text[start..];
        let length = rest.find([';', '\n']).unwrap_or(rest.len());
        // Both delimiters are one byte
        self.cursor += length + 1;
        Some(&self.text[start..start + length])
    }
}

impl<R: BufRead> Piped<R> {
    fn new(input: R) -> Self {
        Self {
            input,
            line: Line::default(),
        }
    }

    /// Replace the line buffer. Returns `false` at EOF, or if the input is unreadable.
    fn fill_line(&mut self) -> bool {
        let mut bytes = Vec::new();
        match self.input.read_until(b'\n', &mut bytes) {
            Ok(0) => false,
            Ok(_) => {
                self.line = Line::new(String::from_utf8_lossy(&bytes).into_owned());
                true
            }
            Err(error) => {
                log::error!("Failed to read from stdin: {}", error);
                false
            }
        }
    }
}

impl<R: BufRead> Read for Piped<R> {
    fn read(&mut self) -> Option<&str> {
        while self.line.is_exhausted() {
            if !self.fill_line() {
                return None;
            }
        }
        self.line.next_command()
    }
}

impl Terminal {
    fn new() -> Self {
        Self {
            stderr: io::stderr(),
            editor: Editor::default(),
            line: Line::default(),
        }
    }

    /// Redraw the prompt and the displayed line, then place the cursor.
    fn draw(&mut self) -> io::Result<()> {
        execute!(
            self.stderr,
            terminal::Clear(terminal::ClearType::CurrentLine),
            cursor::MoveToColumn(0),
        )?;
        if Output::is_minimal() {
            write!(self.stderr, "{}", PROMPT)?;
        } else {
            let color = debugger_colors::PRIMARY;
            write!(self.stderr, "\x1b[1;{}m{}\x1b[0m", color, PROMPT)?;
        }
        write!(self.stderr, "{}", self.editor.current())?;
        let column = PROMPT.len() + self.editor.cursor;
        execute!(self.stderr, cursor::MoveToColumn(column as u16))
    }

    /// Edit one line in raw mode. `None` at end of input.
    fn edit_line(&mut self) -> io::Result<Option<String>> {
        terminal::enable_raw_mode()?;
        let line = self.edit_line_raw();
        terminal::disable_raw_mode()?;
        eprintln!();
        Output::set_line_start(true);
        line
    }

    fn edit_line_raw(&mut self) -> io::Result<Option<String>> {
        loop {
            self.draw()?;
            let Some(key) = Key::from_event(event::read()?) else {
                continue;
            };
            match self.editor.handle_key(key) {
                Edit::Continue => (),
                Edit::Submit => return Ok(Some(self.editor.submit())),
                Edit::EndOfInput => return Ok(None),
            }
        }
    }

    /// Wait up to `timeout` for a key press, consuming it.
    fn poll_key(timeout: Duration) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        let pressed = event::poll(timeout).and_then(|ready| {
            if !ready {
                return Ok(false);
            }
            Ok(Key::from_event(event::read()?).is_some())
        });
        terminal::disable_raw_mode()?;
        pressed
    }
}

impl Read for Terminal {
    fn read(&mut self) -> Option<&str> {
        while self.line.is_exhausted() {
            match self.edit_line() {
                Ok(Some(text)) => self.line = Line::new(text),
                Ok(None) => return None,
                Err(error) => {
                    log::error!("Failed to read from terminal: {}", error);
                    return None;
                }
            }
        }
        self.line.next_command()
    }
}

impl Editor {
    fn current(&self) -> &str {
        self.history.get(self.focus).unwrap_or(&self.draft)
    }

    fn current_len(&self) -> usize {
        self.current().chars().count()
    }

    /// Copy a focused history entry into the draft, so editing leaves history untouched.
    fn detach(&mut self) {
        if let Some(entry) = self.history.get(self.focus) {
            self.draft = entry.clone();
            self.focus = self.history.len();
        }
    }

    fn handle_key(&mut self, key: Key) -> Edit {
        match key {
            Key::Interrupt => return Edit::EndOfInput,
            Key::Enter => {
                if !self.current().trim().is_empty() {
                    return Edit::Submit;
                }
                self.draft.clear();
                self.cursor = 0;
                self.focus = self.history.len();
            }

            Key::Char(ch) if ch.is_control() => (),
            Key::Char(ch) => {
                self.detach();
                self.draft.insert(byte_index(&self.draft, self.cursor), ch);
                self.cursor += 1;
            }
            Key::Backspace => {
                self.detach();
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.draft.remove(byte_index(&self.draft, self.cursor));
                }
            }
            Key::Delete => {
                self.detach();
                if self.cursor < self.current_len() {
                    self.draft.remove(byte_index(&self.draft, self.cursor));
                }
            }

            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(self.current_len()),
            Key::Up => {
                if self.focus > 0 {
                    self.focus -= 1;
                    self.cursor = self.current_len();
                }
            }
            Key::Down => {
                if self.focus < self.history.len() {
                    self.focus += 1;
                    self.cursor = self.current_len();
                }
            }
        }
        Edit::Continue
    }

    /// Take the displayed line. It is added to history unless it repeats the last entry.
    fn submit(&mut self) -> String {
        let line = self.current().to_string();
        if self.history.last() != Some(&line) {
            self.history.push(line.clone());
        }
        self.draft.clear();
        self.cursor = 0;
        self.focus = self.history.len();
        line
    }
}

impl Key {
    fn from_event(event: Event) -> Option<Self> {
        let Event::Key(event) = event else {
            return None;
        };
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let key = match (event.modifiers, event.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c' | 'd')) => Self::Interrupt,
            (_, KeyCode::Enter) | (_, KeyCode::Char('\n')) => Self::Enter,
            (_, KeyCode::Backspace) => Self::Backspace,
            (_, KeyCode::Delete) => Self::Delete,
            (KeyModifiers::NONE, KeyCode::Left) => Self::Left,
            (KeyModifiers::NONE, KeyCode::Right) => Self::Right,
            (KeyModifiers::NONE, KeyCode::Up) => Self::Up,
            (KeyModifiers::NONE, KeyCode::Down) => Self::Down,
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(ch)) => Self::Char(ch),
            _ => return None,
        };
        Some(key)
    }
}

/// Byte index of the char at `index`, or the end of `string`.
fn byte_index(string: &str, index: usize) -> usize {
    string
        .char_indices()
        .nth(index)
        .map_or(string.len(), |(byte, _)| byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            editor.handle_key(Key::Char(ch));
        }
    }

    #[test]
    fn line_splits_on_delimiters() {
        let mut line = Line::new("step 2; reg\nnext;;quit".to_string());
        assert_eq!(line.next_command(), Some("step 2"));
        assert_eq!(line.next_command(), Some(" reg"));
        assert_eq!(line.next_command(), Some("next"));
        assert_eq!(line.next_command(), Some(""));
        assert_eq!(line.next_command(), Some("quit"));
        assert_eq!(line.next_command(), None);

        let mut line = Line::new("run 3;".to_string());
        assert_eq!(line.next_command(), Some("run 3"));
        assert_eq!(line.next_command(), None);
    }

    #[test]
    fn piped_input_spans_lines() {
        let mut piped = Piped::new(&b"step\nstep;registers\n\nquit"[..]);
        assert_eq!(piped.read(), Some("step"));
        assert_eq!(piped.read(), Some("step"));
        assert_eq!(piped.read(), Some("registers"));
        assert_eq!(piped.read(), Some(""));
        assert_eq!(piped.read(), Some("quit"));
        assert_eq!(piped.read(), None);
    }

    #[test]
    fn piped_input_keeps_multibyte_chars() {
        let mut piped = Piped::new("list → 3;héllo\n".as_bytes());
        assert_eq!(piped.read(), Some("list → 3"));
        assert_eq!(piped.read(), Some("héllo"));

        let mut piped = Piped::new(&b"st\xffep\n"[..]);
        assert_eq!(piped.read(), Some("st\u{fffd}ep"));
    }

    #[test]
    fn editing_multibyte_line() {
        let mut editor = Editor::default();
        type_str(&mut editor, "ab");
        editor.handle_key(Key::Left);
        editor.handle_key(Key::Char('é'));
        assert_eq!(editor.current(), "aéb");
        editor.handle_key(Key::Delete);
        assert_eq!(editor.current(), "aé");
        editor.handle_key(Key::Backspace);
        assert_eq!(editor.current(), "a");
        assert_eq!(editor.cursor, 1);
        editor.handle_key(Key::Char('\x07'));
        assert_eq!(editor.current(), "a");
    }

    #[test]
    fn history_editing() {
        let mut editor = Editor::default();
        type_str(&mut editor, "step");
        assert_eq!(editor.handle_key(Key::Enter), Edit::Submit);
        assert_eq!(editor.submit(), "step");
        type_str(&mut editor, "list");
        editor.submit();

        editor.handle_key(Key::Up);
        assert_eq!(editor.current(), "list");
        editor.handle_key(Key::Up);
        assert_eq!(editor.current(), "step");
        type_str(&mut editor, " 4");
        assert_eq!(editor.current(), "step 4");
        // History entry itself is unchanged
        assert_eq!(editor.history, ["step", "list"]);

        assert_eq!(editor.submit(), "step 4");
        editor.handle_key(Key::Up);
        assert_eq!(editor.submit(), "step 4");
        assert_eq!(editor.history, ["step", "list", "step 4"]);
    }

    #[test]
    fn blank_enter_and_interrupt() {
        let mut editor = Editor::default();
        type_str(&mut editor, "  ");
        assert_eq!(editor.handle_key(Key::Enter), Edit::Continue);
        assert_eq!(editor.current(), "");
        assert_eq!(editor.handle_key(Key::Interrupt), Edit::EndOfInput);
    }
}
