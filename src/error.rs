use std::{error::Error, fmt};

const ERR_MSG_CANCELLED: &str = "operation cancelled";

/// The only failure mode of a blocking stop operation: the caller's token
/// was cancelled while the thread was suspended on a predicate.
///
/// Like a failed send, cancellation hands the value back: a `deliver_to` or
/// `arrive` that never committed returns the cart inside the error so the
/// caller still owns it.
#[derive(Debug)]
pub struct Cancelled<T = ()> {
    pub value: Option<T>,
}

impl Cancelled {
    pub fn new() -> Self {
        Self { value: None }
    }
}

impl Default for Cancelled {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Cancelled<T> {
    /// Cancellation that returns ownership of `value` to the caller.
    pub fn returning(value: T) -> Self {
        Self { value: Some(value) }
    }

    /// Take the returned value out, if any.
    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

impl<T> fmt::Display for Cancelled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ERR_MSG_CANCELLED}")
    }
}

impl<T: fmt::Debug> Error for Cancelled<T> {}
