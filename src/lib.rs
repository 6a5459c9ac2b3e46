//! Filter-and-rank explorer for municipal incident reports.
//!
//! The [`data`] module is the engine: it projects raw rows into
//! [`data::model::Incident`]s, narrows them with a [`data::filter::FilterSet`]
//! and computes rankings and summaries over the result. Everything else is
//! the egui front end.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
