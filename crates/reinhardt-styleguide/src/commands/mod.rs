//! Management commands.

mod styleguide;

pub use styleguide::{StyleguideAction, StyleguideCommand, StyleguideOptions, StyleguideOutcome};
