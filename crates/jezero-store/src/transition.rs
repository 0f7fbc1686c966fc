//! Declared state transitions (the only mutation path of the store).

use core::fmt;

use jezero_types::{AppData, GeoDataset};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How a success payload treats the store's `error` field.
///
/// Mirrors a shallow merge: a payload that says nothing about `error`
/// leaves it alone; one that carries an explicit value replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ErrorUpdate {
    /// Leave the current error untouched.
    #[default]
    Keep,
    /// Set the error to absent.
    Clear,
    /// Replace the error message.
    Replace(String),
}

/// Partial state carried by [`Transition::Success`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuccessPayload {
    /// Data to merge slot-wise into the store's data.
    pub data: Option<AppData>,
    /// What to do with the store's error.
    pub error: ErrorUpdate,
}

impl SuccessPayload {
    /// A payload carrying a map dataset and no opinion on `error`.
    pub const fn map(map: GeoDataset) -> Self {
        Self {
            data: Some(AppData { map }),
            error: ErrorUpdate::Keep,
        }
    }

    /// Mark the payload as explicitly clearing the error.
    #[must_use]
    pub fn clearing_error(mut self) -> Self {
        self.error = ErrorUpdate::Clear;
        self
    }
}

/// A state transition message.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// A load episode started.
    Request,
    /// A load episode settled.
    Fulfill,
    /// A load episode failed with this message.
    Failure(String),
    /// A load episode produced data.
    Success(Box<SuccessPayload>),
}

impl Transition {
    /// Build a success transition.
    pub fn success(payload: SuccessPayload) -> Self {
        Self::Success(Box::new(payload))
    }

    /// The payload-free kind of this transition.
    pub const fn kind(&self) -> TransitionKind {
        match self {
            Self::Request => TransitionKind::Request,
            Self::Fulfill => TransitionKind::Fulfill,
            Self::Failure(_) => TransitionKind::Failure,
            Self::Success(_) => TransitionKind::Success,
        }
    }
}

/// The kind of a [`Transition`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TransitionKind {
    /// See [`Transition::Request`].
    Request,
    /// See [`Transition::Fulfill`].
    Fulfill,
    /// See [`Transition::Failure`].
    Failure,
    /// See [`Transition::Success`].
    Success,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Request => "request",
            Self::Fulfill => "fulfill",
            Self::Failure => "failure",
            Self::Success => "success",
        })
    }
}
