//! Turns a token sequence into an instruction for the dispatcher.

use crate::command::Mode;
use crate::lexer::BACKGROUND_MARKER;

/// A single command line ready to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Program or built-in name.
    pub name: String,
    /// Remaining tokens, passed through untouched.
    pub args: Vec<String>,
    /// Background when the line ended in a lone `&`.
    pub mode: Mode,
}

/// Build an instruction from `tokens`.
///
/// A trailing `&` token is removed and switches the instruction to
/// [`Mode::Background`]; an `&` anywhere else is an ordinary argument.
/// Returns `None` when nothing is left to run.
pub fn construct_instruction(mut tokens: Vec<String>) -> Option<Instruction> {
    let mode = if tokens.last().map(String::as_str) == Some(BACKGROUND_MARKER) {
        tokens.pop();
        Mode::Background
    } else {
        Mode::Foreground
    };

    let mut tokens = tokens.into_iter();
    let name = tokens.next()?;
    Some(Instruction {
        name,
        args: tokens.collect(),
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::split_into_tokens;

    fn parse(line: &str) -> Option<Instruction> {
        construct_instruction(split_into_tokens(line))
    }

    #[test]
    fn test_trailing_marker_sets_background() {
        let instr = parse("sleep 1 &").unwrap();
        assert_eq!(instr.name, "sleep");
        assert_eq!(instr.args, vec!["1"]);
        assert_eq!(instr.mode, Mode::Background);
    }

    #[test]
    fn test_foreground_by_default() {
        let instr = parse("ls -l /tmp").unwrap();
        assert_eq!(instr.args, vec!["-l", "/tmp"]);
        assert_eq!(instr.mode, Mode::Foreground);
    }

    #[test]
    fn test_inner_marker_is_an_argument() {
        let instr = parse("echo & done").unwrap();
        assert_eq!(instr.args, vec!["&", "done"]);
        assert_eq!(instr.mode, Mode::Foreground);
    }

    #[test]
    fn test_only_last_marker_is_stripped() {
        let instr = parse("echo & &").unwrap();
        assert_eq!(instr.args, vec!["&"]);
        assert_eq!(instr.mode, Mode::Background);
    }

    #[test]
    fn test_empty_and_lone_marker_yield_nothing() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("&"), None);
    }
}
