//! The per-interface boundary contract and the test-author entry points.
//!
//! Each mocked interface supplies three hand-authored pieces: a Props enum
//! (one case per method, arguments wrapped in [`crate::Matcher`]s), a
//! builder exposing one stub-registration method per mocked method, and a
//! verifier exposing one expectation-registration method per mocked method.
//! The mock's trait methods construct a recorded Props, [`record`] it, then
//! resolve a stubbed result — everything else is generic machinery.
//!
//! [`record`]: crate::Recorder::record

use crate::matcher::Matcheable;
use crate::recorder::Recorder;
use crate::verify::VerifyMode;

/// A test double backed by one [`Recorder`].
///
/// The builder and verifier types are parameterized by the borrow of the
/// recorder they forward to; they live for a single fluent call chain and
/// never outlive the mock.
pub trait Mock: Sized {
    /// Interaction shape: one case per mocked method.
    type Props: Matcheable + Clone + 'static;
    /// Fluent stub-registration façade.
    type Builder<'a>: MockBuilder<'a, Mock = Self>
    where
        Self: 'a;
    /// Fluent expectation-registration façade.
    type Verifier<'a>: MockVerifier<'a, Mock = Self>
    where
        Self: 'a;

    /// The recorder this mock instance exclusively owns.
    fn recorder(&self) -> &Recorder<Self::Props>;

    /// Obtain the stub-registration façade.
    fn builder(&self) -> Self::Builder<'_>;

    /// Obtain the expectation-registration façade.
    fn verifier(&self) -> Self::Verifier<'_>;
}

/// Stub-registration façade over a borrowed recorder.
///
/// `from_recorder` lets a [`crate::StubBuilder`] hand the parent façade back
/// after each registration so call chains read naturally.
pub trait MockBuilder<'a>: Sized {
    /// The mock type this façade registers stubs for.
    type Mock: Mock + 'a;

    /// Rebuild the façade from the recorder borrow it forwards to.
    fn from_recorder(recorder: &'a Recorder<<Self::Mock as Mock>::Props>) -> Self;
}

/// Expectation-registration façade over a borrowed recorder.
pub trait MockVerifier<'a>: Sized {
    /// The mock type this façade registers expectations for.
    type Mock: Mock + 'a;

    /// Rebuild the façade from the recorder borrow it forwards to.
    fn from_recorder(recorder: &'a Recorder<<Self::Mock as Mock>::Props>) -> Self;
}

/// Obtain the fluent stub-registration façade for a mock.
pub fn stub<M: Mock>(mock: &M) -> M::Builder<'_> {
    mock.builder()
}

/// Obtain the fluent expectation-registration façade for a mock.
pub fn expect<M: Mock>(mock: &M) -> M::Verifier<'_> {
    mock.verifier()
}

/// Verify declared expectations against the recorded interaction log,
/// raising one aggregated assertion failure if any expectation is unmet.
///
/// Leftover interactions no expectation accounts for are not an error; use
/// [`verify_with`] and [`VerifyMode::Exhaustive`] to fail on those too.
#[track_caller]
pub fn verify<M: Mock>(mock: &M) {
    mock.recorder().verify_expectations(VerifyMode::default());
}

/// Verify with an explicit [`VerifyMode`].
#[track_caller]
pub fn verify_with<M: Mock>(mock: &M, mode: VerifyMode) {
    mock.recorder().verify_expectations(mode);
}
