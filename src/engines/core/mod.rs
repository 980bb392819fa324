//! Core runtime support for the engines

#[cfg(feature = "parallel")]
pub mod parallel;

/// Whether the crate was built with the parallel runtime
pub const fn parallel_available() -> bool {
    cfg!(feature = "parallel")
}

/// Thread-safety required of a strategy by `WindowEngine::run`.
///
/// This is `Sync` only when the `parallel` runtime is compiled in, so
/// sequential builds accept strategies holding `Cell` or `Rc` state.
#[cfg(feature = "parallel")]
pub trait MaybeSync: Sync {}

#[cfg(feature = "parallel")]
impl<T: Sync + ?Sized> MaybeSync for T {}

/// Thread-safety required of a strategy by `WindowEngine::run`.
///
/// This is `Sync` only when the `parallel` runtime is compiled in, so
/// sequential builds accept strategies holding `Cell` or `Rc` state.
#[cfg(not(feature = "parallel"))]
pub trait MaybeSync {}

#[cfg(not(feature = "parallel"))]
impl<T: ?Sized> MaybeSync for T {}
