//! marklink core: find URLs in text and rewrite them as titled links.
//!
//! Pipeline per line: [`matcher`] finds links, [`title`] fetches missing titles,
//! [`transform`] applies per-domain fixes, [`format`] renders the link, and
//! [`rewrite`] ties them together over a stream.

pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod logging;
pub mod matcher;
pub mod rewrite;
pub mod title;
pub mod transform;
