//! Recognition of the `#` directives of sdevice command files.
//!
//! The preprocessor-like directives (`#define`, `#undef`, `#setdep`, `#if`, `#elif`, `#else`,
//! `#endif`) share their sigil with line comments, so the host parser tells the
//! [`scanner::DirectiveScanner`] which of them it can accept before every scan.
//! [`outline::Outline`] is a small host that does this for a whole file.

pub mod cursor;
pub mod diags;
pub mod outline;
pub mod scanner;
pub mod token;
