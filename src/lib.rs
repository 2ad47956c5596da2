//! Biomedical entity extraction and vocabulary normalisation.

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod nlp;
pub mod normalize;
pub mod pipeline;
pub mod registry;
pub mod ui;
