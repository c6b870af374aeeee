//! Scripted navigation narration.
//!
//! There is no routing: each [`Destination`] maps to a fixed list of spoken
//! steps, and [`NavigationPlayer`] paces them one synthesis completion plus a
//! fixed delay apart.

pub mod player;
pub mod routes;

pub use player::{NavAction, NavigationPlayer, StepTicket};
pub use routes::{Destination, NavigationScript, APOLOGY_STEP};
