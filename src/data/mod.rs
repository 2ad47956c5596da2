//! Local artefacts consumed at startup.

pub mod bundle;
