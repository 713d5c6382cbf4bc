//! The one error type used across the crate.
//!
//! Every failure carries the process exit code it should map to:
//! - `2`: input problems (missing source, unreadable or malformed documents, bad arguments)
//! - `3`: a renderer could not find an element it needs in its document
//! - `4`: output problems (writing the site, terminal I/O)

pub const EXIT_INPUT: u8 = 2;
pub const EXIT_RENDER: u8 = 3;
pub const EXIT_OUTPUT: u8 = 4;

#[derive(Clone, PartialEq, Eq)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::new(EXIT_RENDER, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(EXIT_OUTPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_carry_exit_codes() {
        assert_eq!(AppError::input("x").exit_code(), EXIT_INPUT);
        assert_eq!(AppError::render("x").exit_code(), EXIT_RENDER);
        assert_eq!(AppError::output("x").exit_code(), EXIT_OUTPUT);
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = AppError::render("kimarite_ranking.json: fewer than two entries");
        assert_eq!(err.to_string(), "kimarite_ranking.json: fewer than two entries");
        assert_eq!(err.message(), "kimarite_ranking.json: fewer than two entries");
    }
}
