//! Cryptography module for the secure config pipeline. The codec and the
//! integrity helpers are kept in separate submodules so the envelope format
//! stays auditable next to the primitives it is built from.

pub mod codec;
pub mod integrity;
