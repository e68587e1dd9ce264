//! Types library for the commission booking backend
//!
//! This library provides the core type definitions shared by the booking
//! engine and the HTTP gateway: identifiers, the slot availability board,
//! order records with their status state machine, and the error taxonomy.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, AuthorizationId)
//! - `slot`: Fixed-size slot availability board
//! - `order`: Order lifecycle types
//! - `errors`: Error taxonomy

pub mod errors;
pub mod ids;
pub mod order;
pub mod slot;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::order::*;
    pub use crate::slot::*;
}
