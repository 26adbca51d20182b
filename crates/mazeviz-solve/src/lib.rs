//! Timed manual traversal of a maze grid.
//!
//! A [`SolveSession`] lets a player race the clock from the grid's Start to
//! its End, one orthogonal move per tick. It only needs the [`Grid`]; it is
//! independent of the search and generation crates.
//!
//! [`Grid`]: mazeviz_core::Grid

pub mod clock;
pub mod error;
pub mod input;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::SolveError;
pub use input::{HeldArrows, MovePacer};
pub use session::{Phase, SolveSession};
