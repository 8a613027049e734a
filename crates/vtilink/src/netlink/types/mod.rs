//! Fixed-layout structures and attribute numbers used on the wire.

pub mod link;
