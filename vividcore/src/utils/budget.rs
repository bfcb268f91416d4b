//! Iteration budgets.
//!
//! Every enumeration of the engine is lazy but may still be astronomically
//! long. A [`Budgeted`] iterator caps the number of items it lets through and
//! reports the overflow as [`VividError::BudgetExhausted`] instead of silently
//! truncating the enumeration.
use log::warn;
use strum::{Display, EnumIter};

use crate::utils::error::{VividError, VividResult};

/// What a budget is counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum BudgetKind {
    #[strum(serialize = "worlds")]
    Worlds,
    #[strum(serialize = "variable assignments")]
    Assignments,
    #[strum(serialize = "alternate extensions")]
    Alternates,
}

/// Iterator adapter enforcing an optional item budget.
#[derive(Debug, Clone)]
pub struct Budgeted<I> {
    inner: I,
    kind: BudgetKind,
    limit: Option<usize>,
    yielded: usize,
    exhausted: bool,
}

impl<I: Iterator> Iterator for Budgeted<I> {
    type Item = VividResult<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let item = self.inner.next()?;
        match self.limit {
            Some(limit) if self.yielded >= limit => {
                self.exhausted = true;
                warn!("enumeration of {} stopped after {} item(s)", self.kind, limit);
                Some(Err(VividError::BudgetExhausted {
                    kind: self.kind,
                    limit,
                }))
            }
            _ => {
                self.yielded += 1;
                Some(Ok(item))
            }
        }
    }
}

pub trait BudgetExt: Iterator + Sized {
    /// Let at most `limit` items through; `None` means unbounded.
    fn budgeted(self, kind: BudgetKind, limit: Option<usize>) -> Budgeted<Self> {
        Budgeted {
            inner: self,
            kind,
            limit,
            yielded: 0,
            exhausted: false,
        }
    }
}

impl<I: Iterator> BudgetExt for I {}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn items_within_budget_pass_through() {
        let items: Vec<_> = (0..3)
            .budgeted(BudgetKind::Worlds, Some(3))
            .collect::<VividResult<_>>()
            .unwrap();
        assert_eq!(items, vec![0, 1, 2]);

        let unbounded: VividResult<Vec<_>> =
            (0..100).budgeted(BudgetKind::Worlds, None).collect();
        assert_eq!(unbounded.unwrap().len(), 100);
    }

    #[test]
    fn overflow_is_an_error_not_a_truncation() {
        for kind in BudgetKind::iter() {
            let mut iter = (0..10).budgeted(kind, Some(2));
            assert_eq!(iter.next().unwrap().unwrap(), 0);
            assert_eq!(iter.next().unwrap().unwrap(), 1);
            let err = iter.next().unwrap().unwrap_err();
            assert!(matches!(err, VividError::BudgetExhausted { kind: k, limit: 2 } if k == kind));
            assert!(iter.next().is_none());
        }
    }
}
