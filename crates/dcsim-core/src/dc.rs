//! The DC operating-point pipeline.

use nalgebra::DVector;
use tracing::debug;

use crate::circuit::Circuit;
use crate::error::Result;
use crate::mna;
use crate::netlist::{normalize, Netlist};
use crate::report::{derive_report, DcReport};
use crate::solver::solve_least_squares;

/// Solved unknowns, split into node voltages and source branch currents.
#[derive(Debug, Clone)]
pub struct DcSolution {
    node_voltages: DVector<f64>,
    branch_currents: DVector<f64>,
}

impl DcSolution {
    /// Split the raw solution vector after the first `num_nodes` entries.
    pub fn from_vector(x: DVector<f64>, num_nodes: usize) -> Self {
        let node_voltages = x.rows(0, num_nodes).into_owned();
        let branch_currents = x.rows(num_nodes, x.len() - num_nodes).into_owned();
        Self {
            node_voltages,
            branch_currents,
        }
    }

    pub fn node_voltage(&self, index: usize) -> f64 {
        self.node_voltages[index]
    }

    /// Current through the k-th voltage source, oriented from its first
    /// terminal to its second.
    pub fn branch_current(&self, index: usize) -> f64 {
        self.branch_currents[index]
    }
}

/// Solve the steady-state operating point of a netlist.
///
/// Normalization, indexing, assembly, solve and reporting run start to
/// finish on every call; the function holds no state, so the same netlist
/// always produces the same report.
pub fn solve_dc(netlist: &Netlist) -> Result<DcReport> {
    let elements = normalize(&netlist.components);
    let circuit = Circuit::from_elements(&elements)?;
    debug!(
        components = elements.len(),
        nodes = circuit.num_nodes(),
        sources = circuit.num_sources(),
        "assembling MNA system"
    );

    let system = mna::assemble(&circuit, &elements)?;
    let x = solve_least_squares(system.matrix(), system.rhs())?;
    let solution = DcSolution::from_vector(x, circuit.num_nodes());

    Ok(derive_report(&elements, &circuit, &solution))
}
