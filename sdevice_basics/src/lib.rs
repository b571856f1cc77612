//! Infrastructure shared by the sdevice front-end crates: source text management and
//! diagnostics.

pub mod diag;
pub mod source;
