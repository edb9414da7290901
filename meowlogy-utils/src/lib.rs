/// User-facing formatting helpers (clock labels, apology text).
pub mod formatting;
/// Incremental terminal printing for text that grows in place.
pub mod stream_print;
/// Local input rules shared by the fact, chat, and auth flows.
pub mod validation;

