//! Mapping a raw solution back onto the netlist.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::circuit::Circuit;
use crate::dc::DcSolution;
use crate::netlist::{Element, ElementKind, GROUND, INDUCTOR_SHORT_OHMS};

/// Electrical quantities of one element, keyed by component name in
/// [`DcReport::elements`].
///
/// `voltage` is the potential drop from `n1` to `n2`. `current` flows from
/// `n1` to `n2` through the element, except for voltage sources where it is
/// the raw branch unknown (negative when the source drives current out of
/// its first terminal). `power` is their product, positive for power
/// absorbed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementReport {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub n1: String,
    pub n2: String,
    pub value: f64,
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
}

/// Complete solve output.
///
/// Both maps are ordered so that identical inputs serialize to identical
/// JSON. `node_voltages` always contains ground at exactly 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcReport {
    pub node_voltages: BTreeMap<String, f64>,
    pub elements: BTreeMap<String, ElementReport>,
    pub total_current: f64,
    pub equivalent_resistance: Option<f64>,
}

/// Derive per-element quantities and network aggregates.
///
/// Later elements overwrite earlier ones of the same name, so duplicate
/// names resolve to the last occurrence. Inductors are first written as
/// their stamped stand-in resistor and then relabeled, which keeps their
/// numbers consistent with what was actually in the matrix.
pub fn derive_report(elements: &[Element], circuit: &Circuit, solution: &DcSolution) -> DcReport {
    let mut node_voltages = BTreeMap::new();
    node_voltages.insert(GROUND.to_string(), 0.0);
    for (index, name) in circuit.nodes.names().iter().enumerate() {
        node_voltages.insert(name.clone(), solution.node_voltage(index));
    }

    // Nodes that never reached the matrix (capacitor-only terminals) read
    // as 0.0.
    let voltage_at = |node: &str| node_voltages.get(node).copied().unwrap_or(0.0);

    let mut table: BTreeMap<String, ElementReport> = BTreeMap::new();
    for element in elements {
        match &element.kind {
            ElementKind::Resistor => {
                let voltage = voltage_at(&element.n1) - voltage_at(&element.n2);
                let current = voltage / element.value;
                table.insert(
                    element.name.clone(),
                    ElementReport {
                        kind: ElementKind::Resistor,
                        n1: element.n1.clone(),
                        n2: element.n2.clone(),
                        value: element.value,
                        voltage,
                        current,
                        power: voltage * current,
                    },
                );
            }
            ElementKind::Inductor => {
                let voltage = voltage_at(&element.n1) - voltage_at(&element.n2);
                let current = voltage / INDUCTOR_SHORT_OHMS;
                table.insert(
                    element.name.clone(),
                    ElementReport {
                        kind: ElementKind::Resistor,
                        n1: element.n1.clone(),
                        n2: element.n2.clone(),
                        value: INDUCTOR_SHORT_OHMS,
                        voltage,
                        current,
                        power: voltage * current,
                    },
                );
            }
            ElementKind::VoltageSource => {
                let current = circuit
                    .source_index(&element.name)
                    .map(|k| solution.branch_current(k))
                    .unwrap_or(0.0);
                let voltage = element.value;
                table.insert(
                    element.name.clone(),
                    ElementReport {
                        kind: ElementKind::VoltageSource,
                        n1: element.n1.clone(),
                        n2: element.n2.clone(),
                        value: element.value,
                        voltage,
                        current,
                        power: voltage * current,
                    },
                );
            }
            ElementKind::Capacitor => {
                let voltage = voltage_at(&element.n1) - voltage_at(&element.n2);
                table.insert(
                    element.name.clone(),
                    ElementReport {
                        kind: ElementKind::Capacitor,
                        n1: element.n1.clone(),
                        n2: element.n2.clone(),
                        value: element.value,
                        voltage,
                        current: 0.0,
                        power: 0.0,
                    },
                );
            }
            ElementKind::Other(_) => {}
        }
    }

    // Relabel the inductor stand-ins. If one got lost (name collision with
    // a later element), report the DC voltage across it with zero current.
    for element in elements {
        if element.kind != ElementKind::Inductor {
            continue;
        }
        match table.get_mut(&element.name) {
            Some(entry) => entry.kind = ElementKind::Inductor,
            None => {
                let voltage = voltage_at(&element.n1) - voltage_at(&element.n2);
                table.insert(
                    element.name.clone(),
                    ElementReport {
                        kind: ElementKind::Inductor,
                        n1: element.n1.clone(),
                        n2: element.n2.clone(),
                        value: element.value,
                        voltage,
                        current: 0.0,
                        power: 0.0,
                    },
                );
            }
        }
    }

    let total_current: f64 = table
        .values()
        .filter(|entry| entry.kind == ElementKind::VoltageSource)
        .map(|entry| entry.current.abs())
        .sum();

    let equivalent_resistance = match circuit.sources.as_slice() {
        [only] if total_current > 0.0 => Some(only.value.abs() / total_current),
        _ => None,
    };

    DcReport {
        node_voltages,
        elements: table,
        total_current,
        equivalent_resistance,
    }
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
    fn report_serializes_with_wire_field_names() {
        let elements = normalize(&[
            comp("R", "R1", "a", "0", 10.0),
            comp("V", "V1", "a", "0", 5.0),
        ]);
        let circuit = Circuit::from_elements(&elements).unwrap();
        let solution = DcSolution::from_vector(
            nalgebra::DVector::from_row_slice(&[5.0, -0.5]),
            circuit.num_nodes(),
        );
        let report = derive_report(&elements, &circuit, &solution);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["elements"]["R1"]["type"], "R");
        assert_eq!(json["elements"]["V1"]["type"], "V");
        assert_eq!(json["node_voltages"]["0"], 0.0);
        assert_eq!(json["equivalent_resistance"], 10.0);
    }

    #[test]
    fn unknown_kinds_are_dropped_from_the_element_table() {
        let elements = normalize(&[
            comp("R", "R1", "a", "0", 10.0),
            comp("V", "V1", "a", "0", 5.0),
            comp("Q", "Q1", "a", "0", 1.0),
        ]);
        let circuit = Circuit::from_elements(&elements).unwrap();
        let solution = DcSolution::from_vector(
            nalgebra::DVector::from_row_slice(&[5.0, -0.5]),
            circuit.num_nodes(),
        );
        let report = derive_report(&elements, &circuit, &solution);
        assert!(!report.elements.contains_key("Q1"));
        assert_eq!(report.elements.len(), 2);
    }

    #[test]
    fn equivalent_resistance_requires_exactly_one_source() {
        let elements = normalize(&[
            comp("R", "R1", "a", "b", 10.0),
            comp("V", "V1", "a", "0", 5.0),
            comp("V", "V2", "b", "0", 3.0),
        ]);
        let circuit = Circuit::from_elements(&elements).unwrap();
        let solution = DcSolution::from_vector(
            nalgebra::DVector::from_row_slice(&[5.0, 3.0, -0.2, 0.2]),
            circuit.num_nodes(),
        );
        let report = derive_report(&elements, &circuit, &solution);
        assert!((report.total_current - 0.4).abs() < 1e-12);
        assert_eq!(report.equivalent_resistance, None);
    }
}
