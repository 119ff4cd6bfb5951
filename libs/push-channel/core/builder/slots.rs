//! Required-field slots of the channel builder
//!
//! Each required field is a type parameter that is either [`Missing`] or
//! carries the value itself, so `build()` only exists once the URL and the
//! sink are both present.

use crate::traits::NotificationSink;
use std::sync::Arc;

mod sealed {
    pub trait Sealed {}
}

/// A required builder field, filled or not
pub trait Slot: sealed::Sealed {}

/// Field not provided yet
#[derive(Debug, Clone, Copy, Default)]
pub struct Missing;

/// Endpoint URL of the push channel
#[derive(Debug, Clone)]
pub struct Url(pub(crate) String);

/// Sink the channel renders toasts into
#[derive(Clone)]
pub struct Sink(pub(crate) Arc<dyn NotificationSink>);

impl sealed::Sealed for Missing {}
impl sealed::Sealed for Url {}
impl sealed::Sealed for Sink {}

impl Slot for Missing {}
impl Slot for Url {}
impl Slot for Sink {}
