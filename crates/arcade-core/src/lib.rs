//! Arcade core - rules and state for a collection of small single-screen games
//!
//! Every game lives in its own module under [`games`] and is independent of the
//! others. The only shared pieces are the geometry and timing helpers and the
//! [`Playable`] seam the front end uses to drive any game uniformly.
//!
//! Nothing in this crate touches a terminal. Real-time games advance by
//! [`std::time::Duration`] deltas and every randomised game accepts a seed, so
//! each game can be driven deterministically.

pub mod clock;
pub mod error;
pub mod game;
pub mod games;
pub mod geometry;

pub use clock::{Countdown, FrameClock, Ticker, FRAME};
pub use error::{Error, Result};
pub use game::{GameKind, Playable, ScoreOrder, Status};
pub use geometry::{Direction, GridPos, Rect, Vec2};
