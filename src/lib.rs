//! Secure configuration handling for the BrowserReporter collector.
//! Configuration documents are shipped as an encrypted envelope file so the
//! collector never reads plaintext settings off disk; the envelope format is
//! a wire contract shared with an independent collector implementation.

pub mod config;
pub mod crypto;
