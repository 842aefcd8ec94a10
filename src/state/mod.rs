//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! One `Session` is built per application and provided via context; there is
//! no global session.

pub mod session;
