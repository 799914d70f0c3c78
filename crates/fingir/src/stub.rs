//! Stub registration and resolution.
//!
//! [`StubBuilder`] is the chainable registration handle a mock builder's
//! per-method calls return; [`StubResolver`] is what the mock method itself
//! uses to turn a recorded interaction back into a stubbed value.

use std::fmt;
use std::marker::PhantomData;

use crate::matcher::Matcheable;
use crate::mock::{Mock, MockBuilder};
use crate::recorder::Recorder;
use crate::result::{FingirError, FingirResult};

/// Chainable stub-registration handle for one mocked method.
///
/// `Args` is the method's argument tuple and `Ret` its return type; both are
/// fixed by the mock builder method that constructs this handle, so the
/// erased payload stored in the recorder can always be cast back at
/// resolution time.
pub struct StubBuilder<'a, B, Args, Ret>
where
    B: MockBuilder<'a>,
{
    recorder: &'a Recorder<<B::Mock as Mock>::Props>,
    pattern: <B::Mock as Mock>::Props,
    _signature: PhantomData<fn(Args) -> Ret>,
}

impl<'a, B, Args, Ret> StubBuilder<'a, B, Args, Ret>
where
    B: MockBuilder<'a>,
    Args: 'static,
    Ret: 'static,
{
    /// Pair a recorder with the pattern the builder method constructed.
    pub fn new(
        recorder: &'a Recorder<<B::Mock as Mock>::Props>,
        pattern: <B::Mock as Mock>::Props,
    ) -> Self {
        Self {
            recorder,
            pattern,
            _signature: PhantomData,
        }
    }

    /// Stub a plain return value and hand the parent builder back for
    /// chaining.
    pub fn and_return(self, value: Ret) -> B
    where
        Ret: Clone,
    {
        self.recorder.register_value(value, self.pattern);
        B::from_recorder(self.recorder)
    }

    /// Stub a computation invoked with the real call's arguments.
    pub fn with<F>(self, closure: F) -> B
    where
        F: Fn(Args) -> Ret + 'static,
    {
        self.recorder.register_closure(closure, self.pattern);
        B::from_recorder(self.recorder)
    }
}

impl<'a, B, Args, Ret> fmt::Debug for StubBuilder<'a, B, Args, Ret>
where
    B: MockBuilder<'a>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubBuilder")
            .field("pattern", &self.pattern)
            .field("recorder", &self.recorder)
            .finish()
    }
}

/// Return shapes with a neutral default a test can safely fall back to when
/// no stub was registered.
///
/// Deliberately a closed, opt-in set rather than a blanket [`Default`]
/// delegation: only shapes whose neutral value cannot mislead a test (empty
/// string, zero, `None`, empty collection, unit) participate. Every other
/// unstubbed return shape aborts the test instead.
pub trait ReturnDefault {
    /// The neutral default for this shape.
    fn return_default() -> Self;
}

macro_rules! impl_return_default {
    ($($ty:ty => $value:expr),* $(,)?) => {
        $(
            impl ReturnDefault for $ty {
                fn return_default() -> Self {
                    $value
                }
            }
        )*
    };
}

impl_return_default! {
    () => (),
    String => String::new(),
    i8 => 0, i16 => 0, i32 => 0, i64 => 0, i128 => 0, isize => 0,
    u8 => 0, u16 => 0, u32 => 0, u64 => 0, u128 => 0, usize => 0,
    f32 => 0.0, f64 => 0.0,
}

impl<T> ReturnDefault for Option<T> {
    fn return_default() -> Self {
        None
    }
}

impl<T> ReturnDefault for Vec<T> {
    fn return_default() -> Self {
        Vec::new()
    }
}

impl<K, V> ReturnDefault for std::collections::HashMap<K, V> {
    fn return_default() -> Self {
        std::collections::HashMap::new()
    }
}

/// Resolves a recorded interaction against the recorder's stub table at a
/// concrete method signature.
///
/// `Args` and `Ret` pin the signature a stored closure is downcast to; a
/// failed downcast means the stub registration code and the mock method
/// disagree, which is always fatal to the test.
pub struct StubResolver<'a, P: Matcheable, Args, Ret> {
    recorder: &'a Recorder<P>,
    _signature: PhantomData<fn(Args) -> Ret>,
}

impl<'a, P, Args, Ret> StubResolver<'a, P, Args, Ret>
where
    P: Matcheable,
    Args: 'static,
    Ret: 'static,
{
    /// Bind a resolver to the mock's recorder.
    pub fn new(recorder: &'a Recorder<P>) -> Self {
        Self {
            recorder,
            _signature: PhantomData,
        }
    }

    /// Resolve without asserting, surfacing [`FingirError`] to the caller.
    pub fn try_resolve(&self, interaction: &P, args: Args) -> FingirResult<Ret> {
        self.recorder.resolve(interaction, |stored| {
            stored
                .downcast_ref::<Box<dyn Fn(Args) -> Ret>>()
                .map(|closure| closure(args))
                .ok_or_else(|| FingirError::SignatureMismatch {
                    interaction: format!("{interaction:?}"),
                })
        })
    }

    /// Resolve a call whose return shape has no neutral default.
    ///
    /// # Panics
    ///
    /// Panics on an unstubbed call or a signature mismatch; both are defects
    /// in the test's mock setup and abort the test case with a message
    /// naming the call.
    #[track_caller]
    pub fn resolve(&self, interaction: &P, args: Args) -> Ret {
        match self.try_resolve(interaction, args) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    /// Resolve a call whose return shape has a neutral default.
    ///
    /// An unstubbed call falls back to [`ReturnDefault::return_default`], so
    /// stub omissions cannot crash tests that don't care about the value. A
    /// signature mismatch is still fatal.
    #[track_caller]
    pub fn resolve_or_default(&self, interaction: &P, args: Args) -> Ret
    where
        Ret: ReturnDefault,
    {
        match self.try_resolve(interaction, args) {
            Ok(value) => value,
            Err(FingirError::UnstubbedCall { .. }) => {
                tracing::debug!(interaction = ?interaction, "unstubbed call, returning neutral default");
                Ret::return_default()
            }
            Err(error) => panic!("{error}"),
        }
    }
}

impl<'a, P: Matcheable, Args, Ret> fmt::Debug for StubResolver<'a, P, Args, Ret> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubResolver")
            .field("recorder", &self.recorder)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Matcher;

    #[derive(Debug, Clone, PartialEq)]
    enum Props {
        Fetch(Matcher<String>),
    }

    impl Matcheable for Props {
        fn matches(&self, other: &Self) -> bool {
            let (Self::Fetch(a), Self::Fetch(b)) = (self, other);
            a.matches(b)
        }
    }

    fn fetch(key: &str) -> Props {
        Props::Fetch(Matcher::Exact(key.to_string()))
    }

    #[test]
    fn test_try_resolve_returns_the_stubbed_value() {
        let recorder: Recorder<Props> = Recorder::new();
        recorder.register_value(42_i64, fetch("x"));

        let resolver: StubResolver<'_, Props, String, i64> = StubResolver::new(&recorder);
        assert_eq!(resolver.try_resolve(&fetch("x"), "x".to_string()).unwrap(), 42);
    }

    #[test]
    fn test_try_resolve_invokes_a_stubbed_closure_with_real_arguments() {
        let recorder: Recorder<Props> = Recorder::new();
        recorder.register_closure(|key: String| key.len() as i64, Props::Fetch(Matcher::Any));

        let resolver: StubResolver<'_, Props, String, i64> = StubResolver::new(&recorder);
        assert_eq!(resolver.try_resolve(&fetch("abcd"), "abcd".to_string()).unwrap(), 4);
    }

    #[test]
    fn test_closure_signature_mismatch_is_reported() {
        let recorder: Recorder<Props> = Recorder::new();
        // Registered with a u32 argument, resolved at a String signature.
        recorder.register_closure(|n: u32| i64::from(n), Props::Fetch(Matcher::Any));

        let resolver: StubResolver<'_, Props, String, i64> = StubResolver::new(&recorder);
        assert!(matches!(
            resolver.try_resolve(&fetch("x"), "x".to_string()),
            Err(FingirError::SignatureMismatch { .. })
        ));
    }

    #[test]
    fn test_resolve_or_default_falls_back_on_unstubbed_call() {
        let recorder: Recorder<Props> = Recorder::new();
        let resolver: StubResolver<'_, Props, String, i64> = StubResolver::new(&recorder);
        assert_eq!(resolver.resolve_or_default(&fetch("x"), "x".to_string()), 0);

        let strings: StubResolver<'_, Props, String, String> = StubResolver::new(&recorder);
        assert_eq!(strings.resolve_or_default(&fetch("x"), "x".to_string()), "");

        let lists: StubResolver<'_, Props, String, Vec<u8>> = StubResolver::new(&recorder);
        assert!(lists.resolve_or_default(&fetch("x"), "x".to_string()).is_empty());

        let options: StubResolver<'_, Props, String, Option<u8>> = StubResolver::new(&recorder);
        assert!(options.resolve_or_default(&fetch("x"), "x".to_string()).is_none());
    }

    #[test]
    #[should_panic(expected = "no stub registered")]
    fn test_resolve_panics_on_unstubbed_call() {
        #[derive(Debug, Clone)]
        struct Opaque;

        let recorder: Recorder<Props> = Recorder::new();
        let resolver: StubResolver<'_, Props, String, Opaque> = StubResolver::new(&recorder);
        let _ = resolver.resolve(&fetch("x"), "x".to_string());
    }

    #[test]
    #[should_panic(expected = "signature mismatch")]
    fn test_resolve_or_default_still_panics_on_signature_mismatch() {
        let recorder: Recorder<Props> = Recorder::new();
        recorder.register_closure(|n: u32| i64::from(n), Props::Fetch(Matcher::Any));

        let resolver: StubResolver<'_, Props, String, i64> = StubResolver::new(&recorder);
        let _ = resolver.resolve_or_default(&fetch("x"), "x".to_string());
    }
}
