//! Fingir: Mock/Stub/Verify Test Doubles for Rust
//!
//! Fingir (Spanish: "to feign") builds test doubles of arbitrary interfaces:
//! argument matching over heterogeneous types, stubbed return values (static
//! or computed), an interaction log, and a consuming-match verification
//! algorithm with configurable call-count semantics.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      FINGIR Control Flow                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  stub(&mock).method(..)      ┌──────────┐   expect(&mock)        │
//! │     .and_return(v) ─────────►│ Recorder │◄──── .method(..).once()│
//! │                              │  stubs   │                        │
//! │  SUT calls mock.method(a) ──►│  log     │──► verify(&mock)       │
//! │     record + resolve         │  expects │    consume + report    │
//! │                              └──────────┘                        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use fingir::prelude::*;
//!
//! let repo = MockPostsRepository::new();
//! stub(&repo).fetch(Matcher::Exact("x".into())).and_return(42);
//!
//! let sut = FeedViewModel::new(&repo);
//! sut.refresh();
//!
//! expect(&repo).fetch(Matcher::Exact("x".into())).once();
//! verify(&repo);
//! ```
//!
//! The framework is single-threaded and synchronous: it provides no internal
//! locking, and a test must drive a mock's recorder from one logical thread
//! of control at a time.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod argument;
mod matcher;
mod mock;
mod recorder;
mod result;
mod stub;
mod verify;


pub use argument::ArgumentValue;
pub use matcher::{Matcheable, Matcher};
pub use mock::{expect, stub, verify, verify_with, Mock, MockBuilder, MockVerifier};
pub use recorder::Recorder;
pub use result::{FingirError, FingirResult};
pub use stub::{ReturnDefault, StubBuilder, StubResolver};
pub use verify::{
    Recurrence, VerificationFailure, VerificationReport, VerifierBuilder, VerifyMode,
};

/// Convenience re-exports for test modules.
pub mod prelude {
    pub use super::argument::ArgumentValue;
    pub use super::matcher::{Matcheable, Matcher};
    pub use super::mock::{expect, stub, verify, verify_with, Mock, MockBuilder, MockVerifier};
    pub use super::recorder::Recorder;
    pub use super::result::{FingirError, FingirResult};
    pub use super::stub::{ReturnDefault, StubBuilder, StubResolver};
    pub use super::verify::{
        Recurrence, VerificationFailure, VerificationReport, VerifierBuilder, VerifyMode,
    };
}
