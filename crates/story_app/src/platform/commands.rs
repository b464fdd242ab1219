use story_core::{Choice, Filter, Msg};

pub const HELP: &str = "\
y / n          log YES or NO for the current profile
j / k          next / previous profile (j opens the first after a load)
b              back to the previously viewed profile
g N            jump to row N
s [N]          toggle skip (current row when N is omitted)
special [N]    toggle special profile
undo [N]       forget the verdict
remove [N]     drop the row from this session
more           load the next page
f yes|no|pending   toggle a filter
search         toggle search mode (YES profiles only)
find NAME      search the log sheet for NAME
> / <          next / previous match
o              reopen the current page
r              reload profiles (forgets verdicts)
clear          start over
copy           export YES links
q              save and quit";

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Redraw,
    Help,
    Quit,
}

/// Parses an input line. Row numbers are one-based as displayed; commands
/// that accept an optional row fall back to `cursor`.
pub fn parse(line: &str, cursor: Option<usize>) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msg = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(Command::Redraw),
        "h" | "help" | "?" => return Ok(Command::Help),
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        "y" | "yes" => Msg::ChoiceMade(Choice::Yes),
        "n" | "no" => Msg::ChoiceMade(Choice::No),
        "j" | "next" => Msg::NextClicked,
        "k" | "prev" => Msg::PrevClicked,
        "b" | "back" => Msg::BackClicked,
        "g" | "go" => Msg::ProfileSelected(row(rest, None)?),
        "s" | "skip" => Msg::SkipToggled(row(rest, cursor)?),
        "special" => Msg::SpecialToggled(row(rest, cursor)?),
        "undo" => Msg::UndoClicked(row(rest, cursor)?),
        "remove" | "rm" => Msg::RemoveClicked(row(rest, cursor)?),
        "more" => Msg::LoadMoreClicked,
        "f" | "filter" => Msg::FilterToggled(filter(rest)?),
        "search" => Msg::SearchModeToggled,
        "find" => Msg::SearchRequested(rest.to_string()),
        ">" => Msg::SearchNextClicked,
        "<" => Msg::SearchPrevClicked,
        "o" | "open" => Msg::ReloadPageClicked,
        "r" | "reload" => Msg::ReloadClicked,
        "clear" => Msg::ClearClicked,
        "copy" => Msg::CopyYesLinksClicked,
        other => return Err(format!("Unknown command {other:?}; type help")),
    };
    Ok(Command::Dispatch(msg))
}

fn row(arg: &str, fallback: Option<usize>) -> Result<usize, String> {
    if arg.is_empty() {
        return fallback.ok_or_else(|| "Row number required".to_string());
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("Invalid row {arg:?}")),
    }
}

fn filter(arg: &str) -> Result<Filter, String> {
    match arg.to_ascii_lowercase().as_str() {
        "yes" | "y" => Ok(Filter::Yes),
        "no" | "n" => Ok(Filter::No),
        "pending" | "p" => Ok(Filter::Pending),
        other => Err(format!("Unknown filter {other:?}; use yes, no or pending")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdicts_and_navigation() {
        assert_eq!(
            parse("Y", None),
            Ok(Command::Dispatch(Msg::ChoiceMade(Choice::Yes)))
        );
        assert_eq!(parse("j", None), Ok(Command::Dispatch(Msg::NextClicked)));
        assert_eq!(
            parse("g 3", None),
            Ok(Command::Dispatch(Msg::ProfileSelected(2)))
        );
        assert_eq!(parse("  ", None), Ok(Command::Redraw));
        assert_eq!(parse("q", None), Ok(Command::Quit));
    }

    #[test]
    fn row_commands_fall_back_to_cursor() {
        assert_eq!(
            parse("s", Some(4)),
            Ok(Command::Dispatch(Msg::SkipToggled(4)))
        );
        assert_eq!(
            parse("undo 2", Some(4)),
            Ok(Command::Dispatch(Msg::UndoClicked(1)))
        );
        assert!(parse("s", None).is_err());
        assert!(parse("g", Some(1)).is_err());
        assert!(parse("remove 0", None).is_err());
    }

    #[test]
    fn filters_and_search() {
        assert_eq!(
            parse("f pending", None),
            Ok(Command::Dispatch(Msg::FilterToggled(Filter::Pending)))
        );
        assert!(parse("f maybe", None).is_err());
        assert_eq!(
            parse("find  Mary Ann ", None),
            Ok(Command::Dispatch(Msg::SearchRequested("Mary Ann".to_string())))
        );
        assert_eq!(parse(">", None), Ok(Command::Dispatch(Msg::SearchNextClicked)));
    }

    #[test]
    fn unknown_words_are_errors() {
        assert_eq!(
            parse("dance", None),
            Err("Unknown command \"dance\"; type help".to_string())
        );
    }
}
