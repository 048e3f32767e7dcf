//! Line commands typed at the prompt.
//!
//! Plain text searches for it; a number selects that result; anything
//! starting with `/` is a command.

use metafetch_core::{Msg, ResultId, SourceId};

#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    Search(String),
    SetTitle(String),
    SearchByTitle,
    Select(ResultId),
    Toggle(SourceId),
    ShowForm,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub const HELP: &str = "\
<keyword>         search both catalogs
<n>               copy result n into the edit form
/title [text]     set the form title, or search by it when no text is given
/toggle <source>  show or hide google / douban results
/form             print the edit form
/help             this text
/quit             exit";

pub fn parse(line: &str) -> InputCommand {
    let line = line.trim();
    if line.is_empty() {
        return InputCommand::Empty;
    }
    if let Ok(n) = line.parse::<usize>() {
        return InputCommand::Select(ResultId(n));
    }
    let Some(command) = line.strip_prefix('/') else {
        return InputCommand::Search(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "title" if arg.is_empty() => InputCommand::SearchByTitle,
        "title" => InputCommand::SetTitle(arg.to_string()),
        "toggle" | "show" => match SourceId::parse(arg) {
            Some(source) => InputCommand::Toggle(source),
            None => InputCommand::Invalid(format!("unknown source {arg:?}")),
        },
        "form" => InputCommand::ShowForm,
        "help" | "?" => InputCommand::Help,
        "quit" | "q" | "exit" => InputCommand::Quit,
        other => InputCommand::Invalid(format!("unknown command /{other}")),
    }
}

impl InputCommand {
    /// Messages for the core; empty for commands the front-end handles itself.
    pub fn into_msgs(self) -> Vec<Msg> {
        match self {
            InputCommand::Search(keyword) => {
                vec![Msg::KeywordChanged(keyword), Msg::KeywordSubmitted]
            }
            InputCommand::SetTitle(title) => vec![Msg::FormTitleChanged(title)],
            InputCommand::SearchByTitle => vec![Msg::SearchByFormTitle],
            InputCommand::Select(id) => vec![Msg::ResultSelected(id)],
            InputCommand::Toggle(source) => vec![Msg::SourceVisibilityToggled(source)],
            InputCommand::ShowForm
            | InputCommand::Help
            | InputCommand::Quit
            | InputCommand::Empty
            | InputCommand::Invalid(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_is_a_search() {
        assert_eq!(parse("  dune messiah "), InputCommand::Search("dune messiah".into()));
        assert_eq!(
            parse("沙丘").into_msgs(),
            vec![Msg::KeywordChanged("沙丘".into()), Msg::KeywordSubmitted]
        );
    }

    #[test]
    fn number_selects() {
        assert_eq!(parse("3"), InputCommand::Select(ResultId(3)));
        // "1984" is both a number and a title; numbers win.
        assert_eq!(parse("1984"), InputCommand::Select(ResultId(1984)));
    }

    #[test]
    fn title_commands() {
        assert_eq!(parse("/title"), InputCommand::SearchByTitle);
        assert_eq!(parse("/title  Dune "), InputCommand::SetTitle("Dune".into()));
        assert_eq!(
            parse("/title Dune").into_msgs(),
            vec![Msg::FormTitleChanged("Dune".into())]
        );
    }

    #[test]
    fn toggle_accepts_short_names() {
        assert_eq!(parse("/toggle google"), InputCommand::Toggle(SourceId::Google));
        assert_eq!(parse("/show d"), InputCommand::Toggle(SourceId::Douban));
        assert!(matches!(parse("/toggle amazon"), InputCommand::Invalid(_)));
    }

    #[test]
    fn front_end_commands_send_nothing() {
        for line in ["/form", "/help", "/quit", "", "/bogus"] {
            assert!(parse(line).into_msgs().is_empty(), "{line}");
        }
        assert_eq!(parse("/q"), InputCommand::Quit);
    }
}
