#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,           // /help
    Clear,          // /clear — drop results and error, keep the draft
    Quit,           // /quit or /exit
    Unknown(String),
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Command::Unknown(trimmed.to_string());
    }
    let verb = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default();

    match verb {
        "/help" => Command::Help,
        "/clear" => Command::Clear,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}
