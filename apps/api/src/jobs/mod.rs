//! Job listing and insertion: thin pass-through to the record store.

pub mod handlers;
