//! Enter/leave traversal over syntax trees.
//!
//! Every compiler pass is a [`Visitor`]. [`walk`] calls `enter` before a
//! node's children and `leave` after them, so a pass can set up state on the
//! way down (push a frame, record an expected type) and combine child results
//! on the way back up.

use super::Node;

/// What the walker does after `enter` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Visit children, then call `leave`.
    Continue,
    /// Do not visit children, but still call `leave`.
    SkipChildren,
    /// Abort the whole walk. No further `enter` or `leave` calls are made.
    Stop,
}

pub trait Visitor<'a> {
    type Error;

    fn enter(&mut self, _node: &'a Node<'a>) -> Result<Traversal, Self::Error> {
        Ok(Traversal::Continue)
    }

    fn leave(&mut self, _node: &'a Node<'a>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walks `root` depth-first, left to right.
///
/// Returns `Ok(false)` if a visitor asked to stop.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    root: &'a Node<'a>,
) -> Result<bool, V::Error> {
    match visitor.enter(root)? {
        Traversal::Stop => return Ok(false),
        Traversal::SkipChildren => {}
        Traversal::Continue => {
            for child in root.children() {
                if !walk(visitor, child)? {
                    return Ok(false);
                }
            }
        }
    }
    visitor.leave(root)?;
    Ok(true)
}

/// [`walk`] for visitors that cannot fail.
pub fn walk_infallible<'a, V>(visitor: &mut V, root: &'a Node<'a>) -> bool
where
    V: Visitor<'a, Error = core::convert::Infallible> + ?Sized,
{
    walk(visitor, root).unwrap_or_else(|never| match never {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{NodeKind, TreeBuilder};
    use bumpalo::Bump;
    use core::convert::Infallible;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Trace {
        events: Vec<String>,
        skip: Option<&'static str>,
        stop: Option<&'static str>,
    }

    fn label(node: &Node<'_>) -> String {
        match node.kind {
            NodeKind::Identifier { name } => name.to_string(),
            NodeKind::Literal(_) => "lit".to_string(),
            _ => node.declared_name().unwrap_or("?").to_string(),
        }
    }

    impl<'a> Visitor<'a> for Trace {
        type Error = Infallible;

        fn enter(&mut self, node: &'a Node<'a>) -> Result<Traversal, Infallible> {
            let name = label(node);
            self.events.push(format!("+{name}"));
            if self.stop == Some(name.as_str()) {
                return Ok(Traversal::Stop);
            }
            if self.skip == Some(name.as_str()) {
                return Ok(Traversal::SkipChildren);
            }
            Ok(Traversal::Continue)
        }

        fn leave(&mut self, node: &'a Node<'a>) -> Result<(), Infallible> {
            self.events.push(format!("-{}", label(node)));
            Ok(())
        }
    }

    fn sample<'a>(b: &TreeBuilder<'a>) -> &'a Node<'a> {
        b.namespace(
            "N",
            &[
                b.variable("a", None, Some(b.number(1.0))),
                b.variable("b", None, Some(b.identifier("a"))),
            ],
        )
    }

    #[test]
    fn enter_and_leave_bracket_children() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let mut trace = Trace::default();

        assert!(walk_infallible(&mut trace, sample(&b)));
        assert_eq!(
            trace.events,
            vec!["+N", "+a", "+lit", "-lit", "-a", "+b", "+a", "-a", "-b", "-N"]
        );
    }

    #[test]
    fn skip_children_still_leaves() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let mut trace = Trace {
            skip: Some("b"),
            ..Trace::default()
        };

        walk_infallible(&mut trace, sample(&b));
        assert_eq!(
            trace.events,
            vec!["+N", "+a", "+lit", "-lit", "-a", "+b", "-b", "-N"]
        );
    }

    #[test]
    fn stop_aborts_without_leaving() {
        let arena = Bump::new();
        let b = TreeBuilder::new(&arena);
        let mut trace = Trace {
            stop: Some("lit"),
            ..Trace::default()
        };

        assert!(!walk_infallible(&mut trace, sample(&b)));
        assert_eq!(trace.events, vec!["+N", "+a", "+lit"]);
    }
}
