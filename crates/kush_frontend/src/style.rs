//! ANSI terminal color styling for rendered diagnostics.
//!
//! Simple escape-code wrappers used by [`crate::diagnostics`] when turning a
//! diagnostic into a human-readable report. All colors reset at the end.

/// ANSI escape code styling utilities.
pub struct Style;

impl Style {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const BLUE: &'static str = "\x1b[34m";
    pub const CYAN: &'static str = "\x1b[36m";

    pub fn red(s: &str) -> String {
        format!("{}{}{}", Self::RED, s, Self::RESET)
    }

    pub fn green(s: &str) -> String {
        format!("{}{}{}", Self::GREEN, s, Self::RESET)
    }

    pub fn blue(s: &str) -> String {
        format!("{}{}{}", Self::BLUE, s, Self::RESET)
    }

    pub fn cyan(s: &str) -> String {
        format!("{}{}{}", Self::CYAN, s, Self::RESET)
    }

    pub fn bold_red(s: &str) -> String {
        format!("{}{}{}{}", Self::BOLD, Self::RED, s, Self::RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_wrap_and_reset() {
        let rendered = Style::red("bad");
        assert!(rendered.starts_with("\x1b[31m"));
        assert!(rendered.contains("bad"));
        assert!(rendered.ends_with("\x1b[0m"));
    }

    #[test]
    fn bold_red_combines_codes() {
        let rendered = Style::bold_red("error");
        assert!(rendered.contains("\x1b[1m"));
        assert!(rendered.contains("\x1b[31m"));
    }
}
