#![doc = include_str!("../README.md")]

use crate::position::Position;
use std::fmt::{Display, Formatter};

pub mod position;
pub mod token;

/// An error with a location
#[derive(Debug, thiserror::Error)]
pub struct PositionedError<E> {
    error: E,
    location: Option<Position>,
}

impl<E> PositionedError<E> {
    pub fn new(error: E, location: impl Into<Option<Position>>) -> Self {
        Self {
            error,
            location: location.into(),
        }
    }

    /// The error without its location
    pub fn error(&self) -> &E {
        &self.error
    }

    /// Where the error occurred, if it occurred inside the source
    pub fn location(&self) -> Option<Position> {
        self.location
    }
}

impl<E: Display> Display for PositionedError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}\t")?;
        }
        write!(f, "{}", self.error)
    }
}
