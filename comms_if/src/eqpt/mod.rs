//! # Equipment Interface
//!
//! This module defines the interface structures which will be exchanged with equipment
//! servers/clients.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod fcs;
pub mod loc;
