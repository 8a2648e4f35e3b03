//! Generic scope stack for name bindings.
//!
//! Used by the scope resolver for both its value and type environments.
//! Frames are searched from innermost to outermost, so an inner binding
//! shadows an outer one until its frame is popped:
//! ```text
//! let a = 1
//! fn f(a) { a }   // inner `a` is the parameter
//! ```

use ecow::EcoString;
use hashbrown::HashMap;
use thiserror::Error;

/// A stack of binding frames.
#[derive(Debug, Clone)]
pub struct ScopeStack<T> {
    frames: Vec<HashMap<EcoString, T>>,
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<T: Clone> ScopeStack<T> {
    /// Create a new empty scope stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an empty frame.
    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Push a frame pre-populated with bindings.
    ///
    /// Later entries win when a name appears twice.
    pub fn push_frame<I, N>(&mut self, bindings: I)
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<EcoString>,
    {
        self.frames.push(
            bindings
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        );
    }

    /// Pop the topmost frame.
    ///
    /// Returns an error if the stack is empty.
    pub fn pop(&mut self) -> Result<HashMap<EcoString, T>, PopError> {
        self.frames.pop().ok_or(PopError::EmptyStack)
    }

    /// Look up a name, searching frames from innermost to outermost.
    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Bind a value in the topmost frame.
    ///
    /// Rebinding a name in the same frame replaces it; Logic allows
    /// redeclaring a local in the same block.
    pub fn bind_in_current(&mut self, name: &str, value: T) -> Result<Option<T>, BindError> {
        let frame = self.frames.last_mut().ok_or(BindError::NoScope)?;
        Ok(frame.insert(EcoString::from(name), value))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Every visible binding, with inner frames shadowing outer ones.
    pub fn flatten(&self) -> HashMap<EcoString, T> {
        let mut visible = HashMap::new();
        for frame in &self.frames {
            for (name, value) in frame {
                visible.insert(name.clone(), value.clone());
            }
        }
        visible
    }
}

/// Error when trying to bind a name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// No frame exists to bind in.
    #[error("no scope to bind in")]
    NoScope,
}

/// Error when trying to pop a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PopError {
    /// The stack is empty.
    #[error("cannot pop from empty scope stack")]
    EmptyStack,
}
