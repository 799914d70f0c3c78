//! Type-erased equality bridge for heterogeneous arguments.
//!
//! Props cases for different methods carry arguments of different types, and
//! some of those types cannot be required to implement `PartialEq` at the
//! framework level. [`ArgumentValue`] wraps an arbitrary value together with
//! a comparison captured at the moment a concrete, comparable value was
//! wrapped; comparing two erased values invokes one side's captured closure
//! against the other's opaque payload, downcasting internally and returning
//! `false` on a type mismatch rather than failing.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::matcher::Matcher;

/// A value erased to `dyn Any`, paired with the equality test captured when
/// it was wrapped and a pre-rendered debug description.
#[derive(Clone)]
pub struct ArgumentValue {
    value: Rc<dyn Any>,
    compare: Rc<dyn Fn(&dyn Any) -> bool>,
    rendered: String,
}

impl ArgumentValue {
    /// Wrap a comparable value, capturing its native equality.
    pub fn of<T>(value: T) -> Self
    where
        T: PartialEq + fmt::Debug + 'static,
    {
        let rendered = format!("{value:?}");
        let shared = Rc::new(value);
        let probe = Rc::clone(&shared);
        Self {
            value: shared,
            compare: Rc::new(move |other: &dyn Any| {
                other.downcast_ref::<T>().is_some_and(|rhs| *probe == *rhs)
            }),
            rendered,
        }
    }

    /// Wrap a value that has no `PartialEq`, supplying the comparison at the
    /// construction site.
    pub fn with_comparator<T, F>(value: T, compare: F) -> Self
    where
        T: fmt::Debug + 'static,
        F: Fn(&T, &T) -> bool + 'static,
    {
        let rendered = format!("{value:?}");
        let shared = Rc::new(value);
        let probe = Rc::clone(&shared);
        Self {
            value: shared,
            compare: Rc::new(move |other: &dyn Any| {
                other.downcast_ref::<T>().is_some_and(|rhs| compare(&probe, rhs))
            }),
            rendered,
        }
    }

    /// Borrow the wrapped value back at its concrete type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.as_ref().downcast_ref::<T>()
    }
}

impl PartialEq for ArgumentValue {
    fn eq(&self, other: &Self) -> bool {
        (self.compare)(other.value.as_ref())
    }
}

impl fmt::Debug for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl<T: PartialEq + fmt::Debug + 'static> Matcher<T> {
    /// Convert into the erased form, capturing the value's native equality.
    pub fn erase(self) -> Matcher<ArgumentValue> {
        match self {
            Self::Any => Matcher::Any,
            Self::Exact(value) => Matcher::Exact(ArgumentValue::of(value)),
        }
    }
}

impl<T: fmt::Debug + 'static> Matcher<T> {
    /// Convert into the erased form for a type with no comparability.
    ///
    /// # Panics
    ///
    /// Panics on the `Exact` variant: matching exactly against a value that
    /// cannot be compared is a contract violation on the interface author's
    /// part, not a runtime data error. Use [`Matcher::Any`], or wrap the
    /// value with [`ArgumentValue::with_comparator`] instead.
    pub fn erase_opaque(self) -> Matcher<ArgumentValue> {
        match self {
            Self::Any => Matcher::Any,
            Self::Exact(value) => panic!(
                "Matcher::Exact({value:?}) over a type without PartialEq cannot be erased; \
                 use Matcher::Any or ArgumentValue::with_comparator"
            ),
        }
    }
}
