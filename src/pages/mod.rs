//! Page modules for route-level screens.

pub mod activation;
pub mod home;
pub mod login;
