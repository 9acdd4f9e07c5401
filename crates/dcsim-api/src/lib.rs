//! HTTP front end for the dcsim DC netlist solver.

pub mod http;
pub mod schema;
