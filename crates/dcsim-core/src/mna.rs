//! Stamping and assembly of the dense MNA system.

use nalgebra::{DMatrix, DVector};

use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::netlist::{Element, ElementKind, INDUCTOR_SHORT_OHMS};

/// The linear system `A x = z`.
///
/// The first `num_nodes` rows are KCL equations (conductance block plus the
/// source incidence columns); the last `num_sources` rows are the source
/// voltage constraints. The unknown vector is node voltages followed by
/// source branch currents. Built fresh for every solve; nothing is shared
/// across calls.
#[derive(Debug, Clone)]
pub struct MnaSystem {
    matrix: DMatrix<f64>,
    rhs: DVector<f64>,
    num_nodes: usize,
    num_sources: usize,
}

impl MnaSystem {
    pub fn new(num_nodes: usize, num_sources: usize) -> Self {
        let size = num_nodes + num_sources;
        Self {
            matrix: DMatrix::zeros(size, size),
            rhs: DVector::zeros(size),
            num_nodes,
            num_sources,
        }
    }

    pub fn size(&self) -> usize {
        self.num_nodes + self.num_sources
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_sources(&self) -> usize {
        self.num_sources
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }

    /// Stamp a conductance `g` between two nodes (`None` is ground).
    ///
    /// Adds `g` on both diagonals and `-g` on the off-diagonals; entries
    /// involving ground are simply dropped.
    pub fn stamp_conductance(&mut self, node_i: Option<usize>, node_j: Option<usize>, g: f64) {
        if let Some(i) = node_i {
            self.matrix[(i, i)] += g;
        }
        if let Some(j) = node_j {
            self.matrix[(j, j)] += g;
        }
        if let (Some(i), Some(j)) = (node_i, node_j) {
            self.matrix[(i, j)] -= g;
            self.matrix[(j, i)] -= g;
        }
    }

    /// Stamp the voltage source with branch index `k`.
    ///
    /// `+1` couples the first terminal to the branch column, `-1` the
    /// second, mirrored into the constraint row; the source value lands in
    /// the rhs. The branch current is therefore oriented from the first
    /// terminal to the second through the source. Incidence entries are
    /// assigned rather than accumulated, so a source whose terminals
    /// collapse to one node keeps the `-1` of its second terminal.
    pub fn stamp_voltage_source(
        &mut self,
        node_pos: Option<usize>,
        node_neg: Option<usize>,
        k: usize,
        voltage: f64,
    ) {
        let row = self.num_nodes + k;
        if let Some(i) = node_pos {
            self.matrix[(i, row)] = 1.0;
            self.matrix[(row, i)] = 1.0;
        }
        if let Some(j) = node_neg {
            self.matrix[(j, row)] = -1.0;
            self.matrix[(row, j)] = -1.0;
        }
        self.rhs[row] = voltage;
    }
}

/// Assemble the MNA system for a circuit.
///
/// Resistors stamp their conductance and must have a strictly positive
/// value; inductors stamp the fixed [`INDUCTOR_SHORT_OHMS`] short.
/// Capacitors and unrecognized kinds are skipped entirely.
pub fn assemble(circuit: &Circuit, elements: &[Element]) -> Result<MnaSystem> {
    let mut mna = MnaSystem::new(circuit.num_nodes(), circuit.num_sources());

    for element in elements {
        match &element.kind {
            ElementKind::Resistor => {
                if element.value <= 0.0 {
                    return Err(Error::InvalidComponent {
                        name: element.name.clone(),
                        value: element.value,
                    });
                }
                mna.stamp_conductance(
                    circuit.nodes.index_of(&element.n1),
                    circuit.nodes.index_of(&element.n2),
                    1.0 / element.value,
                );
            }
            ElementKind::Inductor => {
                mna.stamp_conductance(
                    circuit.nodes.index_of(&element.n1),
                    circuit.nodes.index_of(&element.n2),
                    1.0 / INDUCTOR_SHORT_OHMS,
                );
            }
            ElementKind::VoltageSource | ElementKind::Capacitor | ElementKind::Other(_) => {}
        }
    }

    for (k, source) in circuit.sources.iter().enumerate() {
        mna.stamp_voltage_source(
            circuit.nodes.index_of(&source.n1),
            circuit.nodes.index_of(&source.n2),
            k,
            source.value,
        );
    }

    Ok(mna)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::{normalize, Component};

    fn comp(kind: &str, name: &str, n1: &str, n2: &str, value: f64) -> Component {
        Component {
            kind: kind.to_string(),
            name: name.to_string(),
            n1: Some(n1.to_string()),
            n2: Some(n2.to_string()),
            value: Some(value),
        }
    }

    #[test]
    fn conductance_stamp_between_two_nodes() {
        let mut mna = MnaSystem::new(2, 0);
        mna.stamp_conductance(Some(0), Some(1), 0.5);
        assert_eq!(mna.matrix()[(0, 0)], 0.5);
        assert_eq!(mna.matrix()[(1, 1)], 0.5);
        assert_eq!(mna.matrix()[(0, 1)], -0.5);
        assert_eq!(mna.matrix()[(1, 0)], -0.5);
    }

    #[test]
    fn conductance_stamp_to_ground_touches_one_diagonal() {
        let mut mna = MnaSystem::new(2, 0);
        mna.stamp_conductance(Some(1), None, 0.25);
        assert_eq!(mna.matrix()[(1, 1)], 0.25);
        assert_eq!(mna.matrix()[(0, 0)], 0.0);
        assert_eq!(mna.matrix()[(0, 1)], 0.0);
    }

    #[test]
    fn parallel_conductances_accumulate() {
        let mut mna = MnaSystem::new(1, 0);
        mna.stamp_conductance(Some(0), None, 0.1);
        mna.stamp_conductance(Some(0), None, 0.2);
        assert!((mna.matrix()[(0, 0)] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn voltage_source_stamp_writes_incidence_and_rhs() {
        let mut mna = MnaSystem::new(2, 1);
        mna.stamp_voltage_source(Some(0), Some(1), 0, 9.0);
        assert_eq!(mna.matrix()[(0, 2)], 1.0);
        assert_eq!(mna.matrix()[(2, 0)], 1.0);
        assert_eq!(mna.matrix()[(1, 2)], -1.0);
        assert_eq!(mna.matrix()[(2, 1)], -1.0);
        assert_eq!(mna.rhs()[2], 9.0);
        assert_eq!(mna.matrix()[(2, 2)], 0.0);
    }

    #[test]
    fn source_with_identical_terminals_keeps_the_negative_entry() {
        let mut mna = MnaSystem::new(1, 1);
        mna.stamp_voltage_source(Some(0), Some(0), 0, 5.0);
        assert_eq!(mna.matrix()[(0, 1)], -1.0);
        assert_eq!(mna.matrix()[(1, 0)], -1.0);
        assert_eq!(mna.rhs()[1], 5.0);
    }

    #[test]
    fn assemble_single_loop() {
        let elements = normalize(&[
            comp("R", "R1", "a", "0", 10.0),
            comp("V", "V1", "a", "0", 5.0),
        ]);
        let circuit = Circuit::from_elements(&elements).unwrap();
        let mna = assemble(&circuit, &elements).unwrap();

        assert_eq!(mna.size(), 2);
        assert!((mna.matrix()[(0, 0)] - 0.1).abs() < 1e-12);
        assert_eq!(mna.matrix()[(0, 1)], 1.0);
        assert_eq!(mna.matrix()[(1, 0)], 1.0);
        assert_eq!(mna.matrix()[(1, 1)], 0.0);
        assert_eq!(mna.rhs()[0], 0.0);
        assert_eq!(mna.rhs()[1], 5.0);
    }

    #[test]
    fn non_positive_resistor_is_rejected() {
        let elements = normalize(&[
            comp("R", "RBAD", "a", "0", 0.0),
            comp("V", "V1", "a", "0", 5.0),
        ]);
        let circuit = Circuit::from_elements(&elements).unwrap();
        let err = assemble(&circuit, &elements).unwrap_err();
        match err {
            Error::InvalidComponent { name, value } => {
                assert_eq!(name, "RBAD");
                assert_eq!(value, 0.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn inductor_stamps_the_fixed_short() {
        let elements = normalize(&[
            comp("L", "L1", "a", "0", 1e-3),
            comp("V", "V1", "a", "0", 1.0),
        ]);
        let circuit = Circuit::from_elements(&elements).unwrap();
        let mna = assemble(&circuit, &elements).unwrap();
        assert!((mna.matrix()[(0, 0)] - 1.0 / INDUCTOR_SHORT_OHMS).abs() < 1.0);
    }

    #[test]
    fn capacitor_stamps_nothing() {
        let elements = normalize(&[
            comp("R", "R1", "a", "0", 10.0),
            comp("C", "C1", "a", "0", 1e-6),
            comp("V", "V1", "a", "0", 5.0),
        ]);
        let circuit = Circuit::from_elements(&elements).unwrap();
        let mna = assemble(&circuit, &elements).unwrap();
        assert!((mna.matrix()[(0, 0)] - 0.1).abs() < 1e-12);
    }
}
