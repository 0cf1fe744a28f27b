// handlers/mod.rs - 3-tier handler layout
//
// Public (no auth) -> Protected (bearer access token) -> Elevated (admin roles)
// Route tables live in `app.rs`; handlers here only extract, call a service
// and shape the envelope.

pub mod elevated;
pub mod protected;
pub mod public;
