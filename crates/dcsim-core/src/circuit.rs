//! Node and source indexing for the MNA system.

use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};
use crate::netlist::{Element, ElementKind, GROUND};

/// Map between non-ground node names and matrix row indices.
///
/// Indices follow ascending lexicographic name order. That ordering is an
/// observable contract (it fixes the layout of the unknown vector), not an
/// implementation accident.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    name_to_index: HashMap<String, usize>,
    names: Vec<String>,
}

impl NodeTable {
    fn from_names(names: BTreeSet<String>) -> Self {
        let names: Vec<String> = names.into_iter().collect();
        let name_to_index = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();
        Self {
            name_to_index,
            names,
        }
    }

    /// Matrix index of a node, `None` for ground or names never indexed.
    pub fn index_of(&self, node: &str) -> Option<usize> {
        self.name_to_index.get(node).copied()
    }

    /// Number of non-ground nodes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Node names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// One independent voltage source. Its position in [`Circuit::sources`] is
/// its branch-current index in the solution vector.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub name: String,
    pub n1: String,
    pub n2: String,
    pub value: f64,
}

/// Indexed view of a normalized netlist: the node table plus the voltage
/// sources in encounter order.
#[derive(Debug, Clone)]
pub struct Circuit {
    pub nodes: NodeTable,
    pub sources: Vec<SourceEntry>,
}

impl Circuit {
    /// Discover the unknowns of the system.
    ///
    /// Nodes come from the non-ground terminals of resistors, inductors
    /// (shorts at DC) and voltage sources. Capacitors are open at DC and
    /// unrecognized kinds are never stamped, so neither contributes.
    pub fn from_elements(elements: &[Element]) -> Result<Self> {
        let mut names = BTreeSet::new();
        let mut sources = Vec::new();

        for element in elements {
            match &element.kind {
                ElementKind::Resistor | ElementKind::Inductor => {
                    insert_non_ground(&mut names, element);
                }
                ElementKind::VoltageSource => {
                    insert_non_ground(&mut names, element);
                    sources.push(SourceEntry {
                        name: element.name.clone(),
                        n1: element.n1.clone(),
                        n2: element.n2.clone(),
                        value: element.value,
                    });
                }
                ElementKind::Capacitor | ElementKind::Other(_) => {}
            }
        }

        if names.is_empty() && sources.is_empty() {
            return Err(Error::UnsolvableNetwork);
        }

        Ok(Self {
            nodes: NodeTable::from_names(names),
            sources,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_sources(&self) -> usize {
        self.sources.len()
    }

    /// Index of the first source with this name. Reported source currents
    /// are matched by name, so duplicates resolve to the first occurrence.
    pub fn source_index(&self, name: &str) -> Option<usize> {
        self.sources.iter().position(|s| s.name == name)
    }
}

fn insert_non_ground(names: &mut BTreeSet<String>, element: &Element) {
    for node in [&element.n1, &element.n2] {
        if node.as_str() != GROUND {
            names.insert(node.clone());
        }
    }
}
