use super::{error, CommandName};

#[rustfmt::skip]
const COMMANDS: CommandNameList = &[
    (CommandName::Help,      &["help", "--help", "h", "-h", "?"]),
    (CommandName::Step,      &["step", "s"]),
    (CommandName::Run,       &["run", "r"]),
    (CommandName::Registers, &["registers", "reg"]),
    (CommandName::Next,      &["next", "n"]),
    (CommandName::List,      &["list", "l"]),
    (CommandName::View,      &["view", "v"]),
    (CommandName::Rom,       &["rom", "m"]),
    (CommandName::Reset,     &["reset"]),
    (CommandName::Quit,      &["quit", "q", "exit"]),
];

/// A [`CommandName`] with a list of name candidates.
type CommandNameList<'a> = &'a [(CommandName, CandidateList<'a>)];
/// List of single-word aliases for a command.
type CandidateList<'a> = &'a [&'a str];

/// Iterator over a command string which yields the command name, then argument values.
pub struct Arguments<'a> {
    buffer: &'a str,
    /// Byte index.
    cursor: usize,
    /// Amount of arguments requested (successfully or not).
    arg_count: u8,
}

impl<'a> From<&'a str> for Arguments<'a> {
    fn from(buffer: &'a str) -> Self {
        Self {
            buffer,
            cursor: 0,
            arg_count: 0,
        }
    }
}

impl<'a> Arguments<'a> {
    pub fn arg_count(&self) -> u8 {
        self.arg_count
    }

    /// Parse the command name.
    ///
    /// Assumes line is non-empty.
    pub fn get_command_name(&mut self) -> Result<CommandName, error::Command> {
        let command_name = self.next_token_str().unwrap_or("");
        if let Some(command) = find_name_match(command_name, COMMANDS) {
            return Ok(command);
        }
        Err(error::Command::Invalid {
            command_name: command_name.to_string(),
            suggested: suggest(command_name),
        })
    }

    fn next_argument_str(&mut self) -> Option<&'a str> {
        let argument = self.next_token_str()?;
        self.arg_count += 1;
        Some(argument)
    }

    fn next_token_str(&mut self) -> Option<&'a str> {
        let rest = &self.buffer[self.cursor..];
        let start = rest.len() - rest.trim_start().len();
        let rest = &rest[start..];
        let length = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if length == 0 {
            return None;
        }
        let token = &rest[..length];
        self.cursor += start + length;
        Some(token)
    }

    /// Returns an error if the command string has any arguments left.
    pub fn expect_end(&mut self, expected_count: u8) -> Result<(), error::Argument> {
        if self.next_argument_str().is_none() {
            Ok(())
        } else {
            Err(error::Argument::TooManyArguments {
                expected_count,
                actual_count: self.arg_count,
            })
        }
    }

    /// Parse next argument as an integer no greater than `max`.
    pub fn next_integer(
        &mut self,
        argument_name: &'static str,
        expected_count: u8,
        max: u32,
    ) -> Result<u32, error::Argument> {
        let actual_count = self.arg_count;
        self.next_integer_or_none(argument_name, max)?
            .ok_or(error::Argument::Missing {
                argument_name,
                expected_count,
                actual_count,
            })
    }

    /// Parse next argument as an integer no greater than `max`, if one is given.
    pub fn next_integer_or_none(
        &mut self,
        argument_name: &'static str,
        max: u32,
    ) -> Result<Option<u32>, error::Argument> {
        Ok(self
            .next_integer_argument(argument_name, max)?
            .map(|(_, integer)| integer))
    }

    /// Like [`Self::next_integer_or_none`], but rejects zero.
    pub fn next_positive_integer_or_none(
        &mut self,
        argument_name: &'static str,
        max: u32,
    ) -> Result<Option<u32>, error::Argument> {
        match self.next_integer_argument(argument_name, max)? {
            Some((argument, 0)) => Err(error::Argument::invalid_value(argument_name, argument)(
                error::Value::NotPositive {},
            )),
            Some((_, integer)) => Ok(Some(integer)),
            None => Ok(None),
        }
    }

    fn next_integer_argument(
        &mut self,
        argument_name: &'static str,
        max: u32,
    ) -> Result<Option<(&'a str, u32)>, error::Argument> {
        let Some(argument) = self.next_argument_str() else {
            return Ok(None);
        };
        let integer = parse_integer(argument)
            .map_err(error::Argument::invalid_value(argument_name, argument))?;
        if integer > max {
            return Err(error::Argument::invalid_value(argument_name, argument)(
                error::Value::IntegerTooLarge { max },
            ));
        }
        Ok(Some((argument, integer)))
    }
}

/// Decimal, `0x` hex, or `$` hex.
fn parse_integer(string: &str) -> Result<u32, error::Value> {
    let (digits, radix) = if let Some(digits) = string
        .strip_prefix("0x")
        .or_else(|| string.strip_prefix("0X"))
        .or_else(|| string.strip_prefix('$'))
    {
        (digits, 16)
    } else {
        (string, 10)
    };
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_digit(radix)) {
        return Err(error::Value::MalformedInteger {});
    }
    u32::from_str_radix(digits, radix).map_err(|_| error::Value::IntegerTooLarge { max: u32::MAX })
}

/// Returns the first [`CommandName`], which has a corresponding candidate which matches `name`
/// (case insensitive).
fn find_name_match(name: &str, commands: CommandNameList) -> Option<CommandName> {
    for (command, candidates) in commands {
        if name_matches(name, candidates) {
            return Some(*command);
        }
    }
    None
}

/// Returns `true` if `name` matchs any item of `candidates` (case insensitive).
fn name_matches(name: &str, candidates: CandidateList) -> bool {
    for candidate in candidates {
        if name.eq_ignore_ascii_case(candidate) {
            return true;
        }
    }
    false
}

/// Command whose full name starts with `name`, or which `name` starts with.
fn suggest(name: &str) -> Option<CommandName> {
    if name.len() < 2 {
        return None;
    }
    let name = name.to_ascii_lowercase();
    COMMANDS.iter().find_map(|(command, candidates)| {
        let full = candidates[0];
        (full.starts_with(&name) || name.starts_with(full)).then_some(*command)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens() {
        let mut args = Arguments::from("  rom   $150\t 4 ");
        assert_eq!(args.next_token_str(), Some("rom"));
        assert_eq!(args.next_argument_str(), Some("$150"));
        assert_eq!(args.next_argument_str(), Some("4"));
        assert_eq!(args.next_argument_str(), None);
        assert_eq!(args.arg_count(), 2);
    }

    #[test]
    fn integers() {
        assert_eq!(parse_integer("42"), Ok(42));
        assert_eq!(parse_integer("0x150"), Ok(0x150));
        assert_eq!(parse_integer("$7FFF"), Ok(0x7fff));
        assert_eq!(parse_integer("0x"), Err(error::Value::MalformedInteger {}));
        assert_eq!(parse_integer("12ab"), Err(error::Value::MalformedInteger {}));
        assert_eq!(parse_integer("-1"), Err(error::Value::MalformedInteger {}));
        assert_eq!(
            parse_integer("99999999999"),
            Err(error::Value::IntegerTooLarge { max: u32::MAX })
        );
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(
            Arguments::from("STEP").get_command_name(),
            Ok(CommandName::Step)
        );
        assert_eq!(
            Arguments::from("Exit").get_command_name(),
            Ok(CommandName::Quit)
        );
    }

    #[test]
    fn suggestions() {
        assert_eq!(suggest("regs"), None);
        assert_eq!(suggest("regi"), Some(CommandName::Registers));
        assert_eq!(suggest("steps"), Some(CommandName::Step));
        assert_eq!(suggest("x"), None);
        assert_eq!(suggest("continue"), None);
    }
}
