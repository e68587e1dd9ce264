//! Booking consistency engine
//!
//! Keeps three independently persisted facts coherent under concurrent,
//! retry-prone invocations with no cross-key transactions: slot
//! availability, order records, and remote payment-authorization state.
//!
//! - `store`: strongly consistent key-value blob store with revision
//!   tokens (conditional writes)
//! - `slots`: fixed-size slot registry, CAS reserve/free
//! - `ledger`: append-style order collection with a guarded status
//!   state machine
//! - `paypal`: payment processor client (credential exchange,
//!   capture, void)
//! - `coordinator`: composes the above into cross-entity operations
//!   with compensating actions on partial failure

pub mod coordinator;
pub mod ledger;
pub mod paypal;
pub mod slots;
pub mod store;
