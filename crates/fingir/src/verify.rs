//! Expectation registration and the consuming verification algorithm.
//!
//! Expectations are declared through the fluent [`VerifierBuilder`] and
//! checked against the recorded interaction log in one pass: expectations are
//! processed most-recently-registered first, every matched interaction is
//! consumed once credited, and all failures are aggregated into a single
//! [`VerificationReport`] so a test author sees every mismatch at once.

use std::fmt;

use crate::matcher::Matcheable;
use crate::mock::{Mock, MockVerifier};
use crate::recorder::Recorder;

/// Cardinality policy of an expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recurrence {
    /// No matching interaction may be recorded.
    Never,
    /// Exactly one matching interaction.
    #[default]
    Once,
    /// One or more matching interactions.
    AtLeastOnce,
    /// Exactly this many matching interactions.
    Times(usize),
}

impl Recurrence {
    /// Whether `observed` matching interactions satisfy this policy.
    pub fn is_satisfied_by(self, observed: usize) -> bool {
        match self {
            Self::Never => observed == 0,
            Self::Once => observed == 1,
            Self::AtLeastOnce => observed >= 1,
            Self::Times(expected) => observed == expected,
        }
    }

    fn description(self) -> String {
        match self {
            Self::Never => "never".to_string(),
            Self::Once => "exactly once".to_string(),
            Self::AtLeastOnce => "at least once".to_string(),
            Self::Times(expected) => format!("exactly {expected} time(s)"),
        }
    }
}

/// How verification treats interactions no expectation accounts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyMode {
    /// Enforce declared expectations only; leftover interactions are ignored.
    #[default]
    Declared,
    /// Additionally fail if any interaction remains unmatched after all
    /// expectations are processed.
    Exhaustive,
}

/// A declared expectation: a pattern plus its required call cardinality.
pub(crate) struct Expectation<P> {
    pub(crate) pattern: P,
    pub(crate) recurrence: Recurrence,
}

/// One unmet expectation, rendered for the test author.
#[derive(Debug, Clone)]
pub struct VerificationFailure {
    /// Rendered expected pattern
    pub expected: String,
    /// Human-readable description of the mismatch
    pub message: String,
}

/// Aggregated outcome of a verification pass.
#[derive(Debug, Default)]
pub struct VerificationReport {
    failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// True when every expectation was met.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// The accumulated failures, in processing order.
    pub fn failures(&self) -> &[VerificationFailure] {
        &self.failures
    }

    /// Raise the aggregated failure through the test runner's normal
    /// assertion channel.
    ///
    /// # Panics
    ///
    /// Panics with every accumulated failure message if any expectation was
    /// unmet.
    #[track_caller]
    pub fn assert(&self) {
        assert!(self.passed(), "mock verification failed:\n{}", self);
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "- {}", failure.message)?;
        }
        Ok(())
    }
}

/// Run the consuming strict check over a drained expectation list.
///
/// Expectations are drained most-recently-registered first, so narrower
/// late-registered expectations claim their interactions before broader
/// earlier ones can starve them. Matched interactions are consumed whether or
/// not the cardinality check passed.
pub(crate) fn check_expectations<P: Matcheable>(
    mut expectations: Vec<Expectation<P>>,
    interactions: &mut Vec<P>,
    mode: VerifyMode,
) -> VerificationReport {
    let mut failures = Vec::new();

    while let Some(expectation) = expectations.pop() {
        let matched: Vec<usize> = interactions
            .iter()
            .enumerate()
            .filter(|(_, recorded)| recorded.matches(&expectation.pattern))
            .map(|(position, _)| position)
            .collect();

        if let Some(message) = cardinality_failure(&expectation, matched.len()) {
            failures.push(VerificationFailure {
                expected: format!("{:?}", expectation.pattern),
                message,
            });
        }

        // Consume back-to-front so earlier positions stay valid.
        for position in matched.into_iter().rev() {
            interactions.remove(position);
        }
    }

    if mode == VerifyMode::Exhaustive {
        for leftover in interactions.drain(..) {
            failures.push(VerificationFailure {
                expected: "no further interactions".to_string(),
                message: format!("unexpected interaction with no matching expectation: {leftover:?}"),
            });
        }
    }

    VerificationReport { failures }
}

fn cardinality_failure<P: Matcheable>(expectation: &Expectation<P>, observed: usize) -> Option<String> {
    if expectation.recurrence.is_satisfied_by(observed) {
        return None;
    }
    let pattern = &expectation.pattern;
    let wanted = expectation.recurrence.description();
    Some(if observed == 0 {
        format!("expected an interaction matching {pattern:?} ({wanted}), but none were recorded")
    } else {
        format!("expected {pattern:?} to be called {wanted}, but it was called {observed} time(s)")
    })
}

/// Chainable expectation-registration handle returned by a mock verifier's
/// per-method calls.
///
/// Each terminal method appends one expectation to the recorder and hands the
/// parent verifier back so further expectations can be chained.
pub struct VerifierBuilder<'a, V: MockVerifier<'a>> {
    recorder: &'a Recorder<<V::Mock as Mock>::Props>,
    pattern: <V::Mock as Mock>::Props,
}

impl<'a, V: MockVerifier<'a>> VerifierBuilder<'a, V> {
    /// Pair a recorder with the pattern the verifier method constructed.
    pub fn new(
        recorder: &'a Recorder<<V::Mock as Mock>::Props>,
        pattern: <V::Mock as Mock>::Props,
    ) -> Self {
        Self { recorder, pattern }
    }

    /// Expect exactly one matching call.
    pub fn once(self) -> V {
        self.to_be_called(Recurrence::Once)
    }

    /// Expect one or more matching calls.
    pub fn at_least_once(self) -> V {
        self.to_be_called(Recurrence::AtLeastOnce)
    }

    /// Expect exactly `count` matching calls.
    pub fn times(self, count: usize) -> V {
        self.to_be_called(Recurrence::Times(count))
    }

    /// Expect no matching call at all.
    pub fn not_to_be_called(self) -> V {
        self.to_be_called(Recurrence::Never)
    }

    /// Expect calls matching an explicit [`Recurrence`].
    pub fn to_be_called(self, recurrence: Recurrence) -> V {
        self.recorder.add_expectation(self.pattern, recurrence);
        V::from_recorder(self.recorder)
    }
}

impl<'a, V: MockVerifier<'a>> fmt::Debug for VerifierBuilder<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifierBuilder")
            .field("pattern", &self.pattern)
            .field("recorder", &self.recorder)
            .finish()
    }
}
