//! Precondition wrappers that refuse or skip a call.

use std::io;

use tracing::debug;

use crate::error::GuardError;

/// Data that may contain masked (missing) samples.
pub trait MaskedData {
    fn is_masked(&self) -> bool;
}

/// A `None` sample is masked.
impl<T> MaskedData for Option<T> {
    fn is_masked(&self) -> bool { self.is_none() }
}

impl<T: MaskedData> MaskedData for [T] {
    fn is_masked(&self) -> bool { self.iter().any(MaskedData::is_masked) }
}

impl<T: MaskedData> MaskedData for Vec<T> {
    fn is_masked(&self) -> bool { self.as_slice().is_masked() }
}

impl<T: MaskedData + ?Sized> MaskedData for &T {
    fn is_masked(&self) -> bool { (**self).is_masked() }
}

macro_rules! never_masked {
    ($($ty:ty),*) => {
        $(impl MaskedData for $ty {
            fn is_masked(&self) -> bool { false }
        })*
    };
}

never_masked!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

pub trait HasData {
    fn has_data(&self) -> bool;
}

impl<T> HasData for [T] {
    fn has_data(&self) -> bool { !self.is_empty() }
}

impl<T> HasData for Vec<T> {
    fn has_data(&self) -> bool { !self.is_empty() }
}

impl HasData for str {
    fn has_data(&self) -> bool { !self.is_empty() }
}

impl HasData for String {
    fn has_data(&self) -> bool { !self.is_empty() }
}

impl<T> HasData for Option<T> {
    fn has_data(&self) -> bool { self.is_some() }
}

impl<T: HasData + ?Sized> HasData for &T {
    fn has_data(&self) -> bool { (**self).has_data() }
}

/// Call `f` only when `value` holds no masked samples.
pub fn raise_if_masked<V, R, F>(value: &V, f: F) -> Result<R, GuardError>
where
    V: MaskedData + ?Sized,
    F: FnOnce(&V) -> R,
{
    if value.is_masked() {
        return Err(GuardError::Masked);
    }
    Ok(f(value))
}

/// Call `f` only when `value` has data; otherwise do nothing.
pub fn skip_if_no_data<V, R, F>(value: &V, f: F) -> Option<R>
where
    V: HasData + ?Sized,
    F: FnOnce(&V) -> R,
{
    if !value.has_data() {
        return None;
    }
    Some(f(value))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkOutcome<T> {
    Completed(T),
    /// The body hit a network timeout; carries the error text.
    Skipped(String),
}

impl<T> NetworkOutcome<T> {
    pub fn is_skipped(&self) -> bool { matches!(self, Self::Skipped(_)) }

    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(v) => Some(v),
            Self::Skipped(_) => None,
        }
    }
}

/// Run a network-bound test body, turning timeouts into a skip.
///
/// Socket read timeouts surface as `WouldBlock` on Unix and `TimedOut`
/// elsewhere; both count. Every other error is returned as is.
pub fn skip_on_network_error<T, F>(f: F) -> io::Result<NetworkOutcome<T>>
where
    F: FnOnce() -> io::Result<T>,
{
    match f() {
        Ok(v) => Ok(NetworkOutcome::Completed(v)),
        Err(e) if is_timeout(&e) => {
            debug!(error = %e, "network timeout, skipping");
            Ok(NetworkOutcome::Skipped(e.to_string()))
        }
        Err(e) => Err(e),
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}
