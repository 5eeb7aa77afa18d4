use thiserror::Error;

/// Errors raised when a game is configured with values it cannot play with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Pong ball speed outside 1..=15
    #[error("ball speed {0} is out of range (expected {min}-{max})", min = crate::games::pong::MIN_SPEED, max = crate::games::pong::MAX_SPEED)]
    InvalidSpeed(u32),

    /// Jigsaw side length outside the supported range
    #[error("puzzle size {0} is out of range (expected {min}-{max})", min = crate::games::jigsaw::MIN_SIZE, max = crate::games::jigsaw::MAX_SIZE)]
    InvalidPuzzleSize(usize),

    /// A picture with no printable content
    #[error("picture has no content")]
    EmptyPicture,

    /// Game id not present in the registry
    #[error("unknown game '{0}'")]
    UnknownGame(String),

    /// Sudoku difficulty name not recognised
    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),

    /// Memory deck name not recognised
    #[error("unknown deck '{0}'")]
    UnknownDeck(String),
}

/// Result alias for arcade operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidSpeed(20).to_string(),
            "ball speed 20 is out of range (expected 1-15)"
        );
        assert_eq!(
            Error::InvalidPuzzleSize(9).to_string(),
            "puzzle size 9 is out of range (expected 2-8)"
        );
        assert_eq!(Error::UnknownGame("golf".into()).to_string(), "unknown game 'golf'");
    }
}
