//! Request and response bodies

pub mod notify;
