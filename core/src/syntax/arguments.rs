//! Aligning call arguments to declared parameters.
//!
//! Labeled arguments go to the parameter of that name. Unlabeled arguments
//! fill the next parameter not yet filled, in declaration order. The result
//! has one slot per parameter; `None` means the caller omitted it.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSlot<'a> {
    pub name: &'a str,
    pub has_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    #[error("no parameter named `{0}`")]
    UnknownLabel(String),

    #[error("parameter `{0}` was given more than once")]
    DuplicateArgument(String),

    #[error("expected at most {expected} arguments, got {found}")]
    TooManyArguments { expected: usize, found: usize },
}

pub fn align<T, L, I>(
    parameters: &[ParameterSlot<'_>],
    arguments: I,
) -> Result<Vec<Option<T>>, AlignmentError>
where
    L: AsRef<str>,
    I: IntoIterator<Item = (Option<L>, T)>,
{
    let arguments: Vec<_> = arguments.into_iter().collect();
    let found = arguments.len();
    let mut slots: Vec<Option<T>> = parameters.iter().map(|_| None).collect();
    let mut cursor = 0;

    for (label, argument) in arguments {
        let position = match label {
            Some(label) => {
                let label = label.as_ref();
                parameters
                    .iter()
                    .position(|parameter| parameter.name == label)
                    .ok_or_else(|| AlignmentError::UnknownLabel(label.to_string()))?
            }
            None => {
                while cursor < slots.len() && slots[cursor].is_some() {
                    cursor += 1;
                }
                if cursor == slots.len() {
                    return Err(AlignmentError::TooManyArguments {
                        expected: parameters.len(),
                        found,
                    });
                }
                cursor
            }
        };
        if slots[position].is_some() {
            return Err(AlignmentError::DuplicateArgument(
                parameters[position].name.to_string(),
            ));
        }
        slots[position] = Some(argument);
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POINT: &[ParameterSlot<'static>] = &[
        ParameterSlot {
            name: "x",
            has_default: true,
        },
        ParameterSlot {
            name: "y",
            has_default: true,
        },
    ];

    #[test]
    fn positional_fill_in_order() {
        let slots = align(POINT, [(None::<&str>, 1), (None, 2)]).unwrap();
        assert_eq!(slots, vec![Some(1), Some(2)]);
    }

    #[test]
    fn labels_pick_their_slot() {
        let slots = align(POINT, [(Some("y"), 2), (None, 1)]).unwrap();
        assert_eq!(slots, vec![Some(1), Some(2)]);
    }

    #[test]
    fn omitted_parameters_stay_empty() {
        let slots = align(POINT, [(Some("x"), 5)]).unwrap();
        assert_eq!(slots, vec![Some(5), None]);
    }

    #[test]
    fn rejects_bad_calls() {
        assert_eq!(
            align(POINT, [(Some("z"), 0)]),
            Err(AlignmentError::UnknownLabel("z".to_string()))
        );
        assert_eq!(
            align(POINT, [(Some("x"), 0), (Some("x"), 1)]),
            Err(AlignmentError::DuplicateArgument("x".to_string()))
        );
        assert_eq!(
            align(POINT, [(None::<&str>, 0), (None, 1), (None, 2)]),
            Err(AlignmentError::TooManyArguments {
                expected: 2,
                found: 3
            })
        );
    }
}
