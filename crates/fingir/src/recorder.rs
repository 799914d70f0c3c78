//! The stateful core of a mock: interaction log, stub table, expectations.
//!
//! One [`Recorder`] is exclusively owned by one mock instance and lives
//! exactly as long as it. All operations are plain synchronous calls with no
//! internal locking; a test drives a mock's recorder from one logical thread
//! of control at a time. Callers that dispatch mocked methods onto another
//! thread must synchronize before verifying.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

use crate::matcher::Matcheable;
use crate::result::{FingirError, FingirResult};
use crate::verify::{check_expectations, Expectation, Recurrence, VerificationReport, VerifyMode};

/// Type-erased payload of a registered stub: either a plain value or a
/// computation invoked with the real call's arguments.
#[derive(Clone)]
enum ReturnKind {
    /// Erased `Box<dyn Fn() -> Ret>` reproducing the stubbed value.
    Value(Rc<dyn Any>),
    /// Erased `Box<dyn Fn(Args) -> Ret>` computing the value per call.
    Closure(Rc<dyn Any>),
}

/// A stub table entry: a pattern plus its return payload, tagged with a
/// process-unique identity so structurally identical patterns coexist as
/// independent entries. Lookups always use `matches`, never the id.
struct StubEntry<P> {
    id: Uuid,
    pattern: P,
    kind: ReturnKind,
}

struct RecorderState<P> {
    stubs: Vec<StubEntry<P>>,
    interactions: Vec<P>,
    expectations: Vec<Expectation<P>>,
}

/// Owns the interaction log, the stub table, and the expectation list of a
/// single mock instance.
///
/// The log is ordered and append-only; entries are removed only by the
/// verification algorithm, never by the recording path. The expectation list
/// is appended by registration and drained by verification. The stub table
/// grows by registration only and is scanned most-recently-registered first,
/// so later, more specific stubs override earlier catch-all ones.
pub struct Recorder<P: Matcheable> {
    state: RefCell<RecorderState<P>>,
}

impl<P: Matcheable> Recorder<P> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(RecorderState {
                stubs: Vec::new(),
                interactions: Vec::new(),
                expectations: Vec::new(),
            }),
        }
    }

    /// Append one recorded interaction to the log, unconditionally.
    ///
    /// Called exactly once per real mock method invocation, with a Props
    /// value wrapping `Exact` of every argument actually passed.
    pub fn record(&self, interaction: P) {
        tracing::trace!(interaction = ?interaction, "recording mock interaction");
        self.state.borrow_mut().interactions.push(interaction);
    }

    /// Register a plain stubbed value under a fresh stub entry.
    ///
    /// Every registration creates a new entry; two structurally identical
    /// patterns registered twice coexist, and resolution picks the most
    /// recently registered match.
    pub fn register_value<Ret>(&self, value: Ret, pattern: P)
    where
        Ret: Clone + 'static,
    {
        let produce: Box<dyn Fn() -> Ret> = Box::new(move || value.clone());
        self.push_stub(pattern, ReturnKind::Value(Rc::new(produce)));
    }

    /// Register a computed stub: the closure runs with the real call's
    /// arguments every time the stub resolves.
    pub fn register_closure<Args, Ret, F>(&self, closure: F, pattern: P)
    where
        Args: 'static,
        Ret: 'static,
        F: Fn(Args) -> Ret + 'static,
    {
        let erased: Box<dyn Fn(Args) -> Ret> = Box::new(closure);
        self.push_stub(pattern, ReturnKind::Closure(Rc::new(erased)));
    }

    fn push_stub(&self, pattern: P, kind: ReturnKind) {
        let id = Uuid::new_v4();
        tracing::debug!(stub = %id, pattern = ?pattern, "registering stub");
        self.state.borrow_mut().stubs.push(StubEntry { id, pattern, kind });
    }

    /// Append one expectation to the list.
    pub fn add_expectation(&self, pattern: P, recurrence: Recurrence) {
        tracing::debug!(pattern = ?pattern, recurrence = ?recurrence, "registering expectation");
        self.state
            .borrow_mut()
            .expectations
            .push(Expectation { pattern, recurrence });
    }

    /// Find the stub matching a recorded interaction and produce its value.
    ///
    /// Scans the stub table most-recently-registered first. A `Value` entry
    /// is downcast to a producer of `Ret`; a `Closure` entry is handed to
    /// `invoke_closure`, which downcasts it to the caller's concrete
    /// signature and applies the real arguments. No borrow is held while
    /// either runs, so a stubbed closure may itself call back into this
    /// recorder.
    pub fn resolve<Ret, F>(&self, interaction: &P, invoke_closure: F) -> FingirResult<Ret>
    where
        Ret: 'static,
        F: FnOnce(&dyn Any) -> FingirResult<Ret>,
    {
        let found = {
            let state = self.state.borrow();
            state
                .stubs
                .iter()
                .rev()
                .find(|entry| entry.pattern.matches(interaction))
                .map(|entry| (entry.id, entry.kind.clone()))
        };

        let Some((id, kind)) = found else {
            return Err(FingirError::UnstubbedCall {
                interaction: format!("{interaction:?}"),
            });
        };
        tracing::trace!(stub = %id, interaction = ?interaction, "resolving stubbed call");

        match kind {
            ReturnKind::Value(stored) => stored
                .as_ref()
                .downcast_ref::<Box<dyn Fn() -> Ret>>()
                .map(|produce| produce())
                .ok_or_else(|| FingirError::SignatureMismatch {
                    interaction: format!("{interaction:?}"),
                }),
            ReturnKind::Closure(stored) => invoke_closure(stored.as_ref()),
        }
    }

    /// Drain the expectation list and check it against the interaction log,
    /// returning the aggregated report without asserting.
    pub fn run_verification(&self, mode: VerifyMode) -> VerificationReport {
        let mut state = self.state.borrow_mut();
        let expectations = std::mem::take(&mut state.expectations);
        check_expectations(expectations, &mut state.interactions, mode)
    }

    /// Drain and check expectations, raising one aggregated assertion
    /// failure if any expectation is unmet.
    #[track_caller]
    pub fn verify_expectations(&self, mode: VerifyMode) {
        self.run_verification(mode).assert();
    }

    /// Interactions currently in the log.
    pub fn interaction_count(&self) -> usize {
        self.state.borrow().interactions.len()
    }

    /// Registered stub entries.
    pub fn stub_count(&self) -> usize {
        self.state.borrow().stubs.len()
    }

    /// Expectations not yet drained by verification.
    pub fn expectation_count(&self) -> usize {
        self.state.borrow().expectations.len()
    }
}

impl<P: Matcheable> Default for Recorder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Matcheable> fmt::Debug for Recorder<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Recorder")
            .field("stubs", &state.stubs.len())
            .field("interactions", &state.interactions.len())
            .field("expectations", &state.expectations.len())
            .finish()
    }
}

impl<P: Matcheable> Drop for Recorder<P> {
    /// Implicit verification on mock teardown.
    ///
    /// Unmet expectations panic through the test runner's assertion channel.
    /// If the thread is already unwinding the report is logged instead, so a
    /// verification failure never escalates an in-flight panic into an
    /// abort.
    fn drop(&mut self) {
        let report = self.run_verification(VerifyMode::Declared);
        if report.passed() {
            return;
        }
        if std::thread::panicking() {
            tracing::error!("mock verification failed during unwind:\n{report}");
        } else {
            panic!("mock verification failed on drop:\n{report}");
        }
    }
}
