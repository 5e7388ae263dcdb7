/// One line typed at the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the query field contents.
    Edit(String),
    /// Press the search button, optionally replacing the field contents first.
    Press(Option<String>),
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == ":q" || line == ":quit" {
            return Command::Quit;
        }
        match line.strip_prefix('!') {
            Some("") => Command::Press(None),
            Some(text) => Command::Press(Some(text.to_string())),
            None => Command::Edit(line.to_string()),
        }
    }
}
