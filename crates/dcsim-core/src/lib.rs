//! Dense Modified Nodal Analysis solver for steady-state DC netlists.
//!
//! A netlist of resistors, voltage sources, capacitors and inductors is
//! normalized (ground aliases collapse to "0", capacitors open, inductors
//! become near-zero shorts), stamped into a dense MNA system, solved by
//! SVD least squares and mapped back onto every component as voltage,
//! current and power plus network aggregates.
//!
//! ```
//! use dcsim_core::{solve_dc, Netlist};
//!
//! let netlist: Netlist = serde_json::from_str(
//!     r#"{"components": [
//!         {"type": "R", "name": "R1", "n1": "a", "n2": "0", "value": 10.0},
//!         {"type": "V", "name": "V1", "n1": "a", "n2": "0", "value": 5.0}
//!     ]}"#,
//! )?;
//! let report = solve_dc(&netlist)?;
//! assert!((report.node_voltages["A"] - 5.0).abs() < 1e-9);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod circuit;
pub mod dc;
pub mod error;
pub mod mna;
pub mod netlist;
pub mod report;
pub mod solver;

pub use circuit::{Circuit, NodeTable, SourceEntry};
pub use dc::{solve_dc, DcSolution};
pub use error::{Error, Result};
pub use netlist::{Component, Element, ElementKind, Netlist, GROUND, INDUCTOR_SHORT_OHMS};
pub use report::{DcReport, ElementReport};
