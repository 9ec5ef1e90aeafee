use std::cell::RefCell;
use std::str::Chars;

use colored::{ColoredString, Colorize};

/// ANSI colour codes shared by the prompt and the panels.
pub mod debugger_colors {
    pub const PRIMARY: &str = "34";
    pub const HIGHLIGHT: &str = "7";
    pub const DIM: &str = "2";
}

#[macro_export]
macro_rules! dprint {
    ( $condition:ident, $category:ident, $fmt:literal $($tt:tt)* ) => {{
        let s = format!(
            $fmt
            $($tt)*
        );
        $crate::output::Output::Debugger(
            $crate::output::Condition::$condition,
            $crate::output::Category::$category,
        )
        .print_str(&s);
    }};
}

#[macro_export]
macro_rules! dprintln {
    ( $condition:ident ) => {{
        $crate::output::Output::Debugger(
            $crate::output::Condition::$condition,
            $crate::output::Category::Normal,
        )
        .print_str("\n");
    }};
    ( $condition:ident, $category:ident, $fmt:literal $($tt:tt)* ) => {{
        let s = format!(
            concat!($fmt, "\n")
            $($tt)*
        );
        $crate::output::Output::Debugger(
            $crate::output::Condition::$condition,
            $crate::output::Category::$category,
        )
        .print_str(&s);
    }};
}

#[derive(Clone, Copy, Debug)]
pub enum Output {
    /// Program output on stdout, such as a disassembly listing.
    Normal,
    /// Debugger chatter and panels on stderr.
    Debugger(Condition, Category),
}

/// Whether a line survives `--minimal`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Condition {
    #[default]
    Always,
    /// Decoration, such as headings and hints.
    Sometimes,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Category {
    /// Panels, which carry their own colours.
    #[default]
    Normal,
    Info,
    Warning,
    Error,
    Special,
}

struct Decolored<'a> {
    chars: Chars<'a>,
}

impl Output {
    thread_local! {
        static IS_LINE_START: RefCell<bool> = const { RefCell::new(true) };
        static IS_MINIMAL: RefCell<bool> = const { RefCell::new(false) };
    }

    pub fn set_line_start(new_value: bool) -> bool {
        Self::IS_LINE_START.with(|value| value.replace(new_value))
    }
    fn is_line_start() -> bool {
        Self::IS_LINE_START.with(|value| *value.borrow())
    }
    pub fn set_minimal(new_value: bool) -> bool {
        Self::IS_MINIMAL.with(|value| value.replace(new_value))
    }
    pub fn is_minimal() -> bool {
        Self::IS_MINIMAL.with(|value| *value.borrow())
    }

    fn set_line_start_from_str(string: &str) {
        if let Some(ch) = Decolored::new(string).last() {
            Output::set_line_start(ch == '\n');
        }
    }

    pub fn print_str(&self, string: &str) {
        match self {
            Self::Normal => {
                print!("{}", string);
            }

            Self::Debugger(condition, category) => match (Self::is_minimal(), *condition) {
                (false, _) => {
                    eprint!("{}", category.paint(string));
                    Self::set_line_start_from_str(string);
                }
                // Always remove colour if `--minimal`
                (true, Condition::Always) => {
                    eprint_colorless(string);
                    Self::set_line_start_from_str(string);
                }
                (true, Condition::Sometimes) => (),
            },
        }
    }

    pub fn start_new_line(&self) {
        if !Self::is_line_start() {
            self.print_str("\n");
        }
    }
}

impl Category {
    fn paint(self, string: &str) -> ColoredString {
        let string = ColoredString::from(string);
        match self {
            Self::Normal => string,
            Self::Info => string.blue(),
            Self::Warning => string.yellow(),
            Self::Error => string.red(),
            Self::Special => string.magenta(),
        }
    }
}

impl<'a> Decolored<'a> {
    pub fn new(string: &'a str) -> Self {
        Self {
            chars: string.chars(),
        }
    }
}

impl Iterator for Decolored<'_> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ch) = self.chars.next() {
            // Skip everything between '\x1b' and 'm' (inclusive)
            if ch == '\x1b' {
                while self.chars.next().is_some_and(|ch| ch != 'm') {}
                continue;
            }
            return Some(ch);
        }
        None
    }
}

fn eprint_colorless(string: &str) {
    let string: String = Decolored::new(string).collect();
    eprint!("{}", string);
}
