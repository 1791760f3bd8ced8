//! Shared test doubles for the notebook gateway workspace.
//!
//! Each mock implements one collaborator contract from `nb_core` and
//! records the calls it receives, so integration tests can assert not
//! just on responses but on which collaborators were (not) invoked.

mod mocks;

pub use mocks::*;
