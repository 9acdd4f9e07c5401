//! Inbound netlist records and their DC normalization.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Canonical name of the reference node. Its voltage is 0.0 by definition
/// and it never gets a matrix row.
pub const GROUND: &str = "0";

/// Resistance stamped in place of an inductor at DC.
///
/// An ideal short would make the conductance infinite, so inductors are
/// modeled as this fixed near-zero resistance instead. The value is part of
/// the solver's observable output (it shows up as the reported `value` of
/// an inductor entry) and must not drift.
pub const INDUCTOR_SHORT_OHMS: f64 = 1e-9;

/// One raw component record as submitted by a client.
///
/// Terminals and value are optional on the wire; normalization fills the
/// gaps (missing terminal means ground, missing value means 0.0).
#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub n1: Option<String>,
    #[serde(default)]
    pub n2: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

/// An ordered list of components. The sole input to a solve.
#[derive(Debug, Clone, Deserialize)]
pub struct Netlist {
    pub components: Vec<Component>,
}

/// Component tag after normalization.
///
/// Unrecognized tags are kept verbatim (uppercased) so later phases can
/// skip them without losing the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Resistor,
    VoltageSource,
    Capacitor,
    Inductor,
    Other(String),
}

impl ElementKind {
    fn from_raw(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "R" => ElementKind::Resistor,
            "V" => ElementKind::VoltageSource,
            "C" => ElementKind::Capacitor,
            "L" => ElementKind::Inductor,
            other => ElementKind::Other(other.to_string()),
        }
    }

    /// Single-letter tag used on the wire.
    pub fn symbol(&self) -> &str {
        match self {
            ElementKind::Resistor => "R",
            ElementKind::VoltageSource => "V",
            ElementKind::Capacitor => "C",
            ElementKind::Inductor => "L",
            ElementKind::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.symbol())
    }
}

impl Serialize for ElementKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

/// A component after normalization: canonical kind, ground-collapsed
/// uppercase terminals, defaulted value.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub name: String,
    pub n1: String,
    pub n2: String,
    pub value: f64,
}

/// Collapse ground aliases and canonicalize a node name.
///
/// A missing terminal is ground. Names are trimmed and uppercased, then
/// "0", "GND" and "GROUND" all map to [`GROUND`].
pub fn normalize_node(node: Option<&str>) -> String {
    let Some(raw) = node else {
        return GROUND.to_string();
    };
    let name = raw.trim().to_uppercase();
    if name == "0" || name == "GND" || name == "GROUND" {
        GROUND.to_string()
    } else {
        name
    }
}

/// Normalize every raw record, preserving order.
///
/// Kinds are tagged here; the DC substitutions (capacitor open, inductor
/// short) are applied by the stamping and reporting phases, which dispatch
/// on the tag.
pub fn normalize(components: &[Component]) -> Vec<Element> {
    components
        .iter()
        .map(|c| Element {
            kind: ElementKind::from_raw(&c.kind),
            name: c.name.clone(),
            n1: normalize_node(c.n1.as_deref()),
            n2: normalize_node(c.n2.as_deref()),
            value: c.value.unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_aliases_collapse() {
        assert_eq!(normalize_node(None), "0");
        assert_eq!(normalize_node(Some("0")), "0");
        assert_eq!(normalize_node(Some("gnd")), "0");
        assert_eq!(normalize_node(Some(" Ground ")), "0");
    }

    #[test]
    fn node_names_are_trimmed_and_uppercased() {
        assert_eq!(normalize_node(Some(" out ")), "OUT");
        assert_eq!(normalize_node(Some("n1")), "N1");
    }

    #[test]
    fn kind_tags_are_case_insensitive() {
        assert_eq!(ElementKind::from_raw("r"), ElementKind::Resistor);
        assert_eq!(ElementKind::from_raw(" v "), ElementKind::VoltageSource);
        assert_eq!(ElementKind::from_raw("C"), ElementKind::Capacitor);
        assert_eq!(ElementKind::from_raw("l"), ElementKind::Inductor);
        assert_eq!(
            ElementKind::from_raw("zz"),
            ElementKind::Other("ZZ".to_string())
        );
    }

    #[test]
    fn missing_terminals_and_value_get_defaults() {
        let raw = Component {
            kind: "V".to_string(),
            name: "V1".to_string(),
            n1: Some("in".to_string()),
            n2: None,
            value: None,
        };
        let elements = normalize(&[raw]);
        assert_eq!(elements[0].n1, "IN");
        assert_eq!(elements[0].n2, "0");
        assert_eq!(elements[0].value, 0.0);
    }

    #[test]
    fn netlist_deserializes_from_wire_shape() {
        let netlist: Netlist = serde_json::from_str(
            r#"{"components": [{"type": "R", "name": "R1", "n1": "a", "n2": "0", "value": 10.0}]}"#,
        )
        .unwrap();
        assert_eq!(netlist.components.len(), 1);
        assert_eq!(netlist.components[0].kind, "R");
        assert_eq!(netlist.components[0].n1.as_deref(), Some("a"));
    }
}
