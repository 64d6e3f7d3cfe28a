//! # Communications interface crate.
//!
//! Provides all common interface data types exchanged between the landing executable and the
//! equipment around it (flight control stack, localisation, corridor generation). No transport is
//! defined here, only the data that moves over one.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Command, state and message definitions for equipment (like the flight control stack)
pub mod eqpt;
