//! Terminal implementation of the [`Selector`] port.

use console::Term;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;

use tmdbtrack_search::present::{Menu, Selector};

/// Parse a 1-based index or `none` into a zero-based choice.
pub fn parse_choice(input: &str, len: usize) -> Result<Option<usize>, String> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(Some(n - 1)),
        _ => Err(format!("enter a number between 1 and {len}, or 'none'")),
    }
}

/// Prints the menu table on stdout and reads the answer from the terminal.
pub struct TerminalSelector {
    term: Term,
}

impl Default for TerminalSelector {
    fn default() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Selector for TerminalSelector {
    fn select(&self, menu: &Menu) -> std::io::Result<Option<usize>> {
        self.term.write_str(&menu.table.render())?;
        let len = menu.len();
        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(menu.prompt.as_str())
            .validate_with(|input: &String| parse_choice(input, len).map(|_| ()))
            .interact_text_on(&self.term)
            .map_err(std::io::Error::other)?;
        parse_choice(&answer, len)
            .map_err(|msg| std::io::Error::new(std::io::ErrorKind::InvalidInput, msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_one_based_index() {
        assert_eq!(parse_choice("1", 3), Ok(Some(0)));
        assert_eq!(parse_choice(" 3 ", 3), Ok(Some(2)));
    }

    #[test]
    fn accepts_none_in_any_case() {
        assert_eq!(parse_choice("none", 3), Ok(None));
        assert_eq!(parse_choice("NONE", 3), Ok(None));
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert!(parse_choice("0", 3).is_err());
        assert!(parse_choice("4", 3).is_err());
        assert!(parse_choice("two", 3).is_err());
        assert!(parse_choice("", 3).is_err());
    }
}
