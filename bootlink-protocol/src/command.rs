//! Inbound command tokens
//!
//! A command is a whole line equal to one of the tokens below. Matching is
//! exact and case-sensitive; a token embedded in a longer line, or a line
//! holding only part of a token, is not a command.

/// Token asking for loader reentry
pub const TOKEN_BOOTSEL: &str = "BOOTSEL";

/// Long-form alias of [`TOKEN_BOOTSEL`]
pub const TOKEN_ENTER_BOOTSEL: &str = "ENTER_BOOTSEL";

/// Commands recognized on the inbound line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Reenter the mask-ROM USB bootloader
    EnterBootsel,
}

impl Command {
    /// Every recognized token and the command it maps to
    pub const TOKENS: [(&'static str, Command); 2] = [
        (TOKEN_BOOTSEL, Command::EnterBootsel),
        (TOKEN_ENTER_BOOTSEL, Command::EnterBootsel),
    ];

    /// Length of the longest recognized token
    pub const LONGEST_TOKEN: usize = longest_token(&Self::TOKENS);

    /// Match a complete line (terminator already stripped)
    pub fn parse(line: &[u8]) -> Option<Self> {
        Self::TOKENS
            .iter()
            .find(|(token, _)| token.as_bytes() == line)
            .map(|&(_, command)| command)
    }
}

const fn longest_token(tokens: &[(&str, Command)]) -> usize {
    let mut longest = 0;
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].0.len() > longest {
            longest = tokens[i].0.len();
        }
        i += 1;
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_tokens_match() {
        assert_eq!(Command::parse(b"BOOTSEL"), Some(Command::EnterBootsel));
        assert_eq!(Command::parse(b"ENTER_BOOTSEL"), Some(Command::EnterBootsel));
    }

    #[test]
    fn test_partial_and_extended_lines_rejected() {
        for line in [
            &b"BOOTSELX"[..],
            b"BOOTSE",
            b"XBOOTSEL",
            b" BOOTSEL",
            b"BOOTSEL ",
            b"ENTER_BOOTSE",
            b"ENTER_BOOTSELL",
            b"",
        ] {
            assert_eq!(Command::parse(line), None);
        }
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(Command::parse(b"bootsel"), None);
        assert_eq!(Command::parse(b"Enter_Bootsel"), None);
    }

    #[test]
    fn test_longest_token() {
        assert_eq!(Command::LONGEST_TOKEN, TOKEN_ENTER_BOOTSEL.len());
    }
}
