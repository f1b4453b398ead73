/// A command name and its argument tokens, split out of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// The first token, lower-cased. Empty for a bare prefix.
    pub name: String,
    /// The remaining tokens, verbatim and in order.
    pub args: Vec<String>,
}

/// Splits `raw` into a command name and arguments.
///
/// Returns `None` when `raw` does not start with `prefix`. Otherwise the
/// prefix is stripped and the rest is split on runs of whitespace; the first
/// token becomes the lower-cased command name and the others are kept as
/// given.
///
/// Quotes and escapes have no meaning: `!say "hello world"` yields the
/// arguments `"hello` and `world"`.
///
/// # Example
///
/// ```
/// use aginah_framework::command::parse_command;
///
/// let parsed = parse_command("!Help me", "!").unwrap();
/// assert_eq!(parsed.name, "help");
/// assert_eq!(parsed.args, vec!["me"]);
///
/// assert!(parse_command("hello", "!").is_none());
/// ```
pub fn parse_command(raw: &str, prefix: &str) -> Option<ParsedCommand> {
    let rest = raw.strip_prefix(prefix)?;
    let mut tokens = rest.split_whitespace();
    let name = tokens.next().map(str::to_lowercase).unwrap_or_default();
    let args = tokens.map(str::to_string).collect();
    Some(ParsedCommand { name, args })
}
