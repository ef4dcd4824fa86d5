//! # Delta-Notch Runtime
//!
//! Population stepping and the standalone simulation loop.
//!
//! The [`coordinator`] is the per-step driver: it classifies every cell's
//! phenotype and assigns its target area. The rest of the crate is what a
//! host simulation would normally provide: a [`tissue`] that manages
//! division and apoptotic removal, scripted [`signal`] sources standing in
//! for the Delta/Notch reaction network, and the [`simulation`] loop that
//! ties them together and records [`snapshot`]s.

pub mod coordinator;
pub mod tissue;
pub mod signal;
pub mod snapshot;
pub mod simulation;
pub mod prelude;
