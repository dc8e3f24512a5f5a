//! Request wire formats for each vendor
//!
//! Pure serde structs matching each vendor's JSON request body, used only at
//! the serialization boundary. Vendor responses are not modelled here: they
//! are navigated leniently as generic JSON so that partial or mistyped
//! replies degrade instead of failing.

pub mod claude;
pub mod gemini;
pub mod openai;
