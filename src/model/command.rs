use serde::{Deserialize, Serialize};

/// Outbound request from the player: a command name plus ordered arguments.
///
/// Fire-and-forget; there is no response correlation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerCommand {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl PlayerCommand {
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a typed line like `say "hello there"` into a command.
    ///
    /// Words are split shell-style, so quoted arguments keep their spaces.
    /// Lines with unbalanced quotes fall back to whitespace splitting.
    /// Returns `None` for blank lines.
    pub fn parse_line(line: &str) -> Option<Self> {
        let words = shlex::split(line)
            .unwrap_or_else(|| line.split_whitespace().map(String::from).collect());
        let mut words = words.into_iter();
        let command = words.next()?;
        Some(Self {
            command,
            args: words.collect(),
        })
    }
}
