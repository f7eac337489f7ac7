//! Engagement state reconciliation

mod guard;
mod plan;
mod reconciler;

pub use guard::{PairGuard, PairKey, PairLease};
pub use plan::Mutation;
pub use reconciler::{Reconciled, Reconciler, DEFAULT_STORE_TIMEOUT};

#[cfg(test)]
mod tests;
