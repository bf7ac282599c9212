//! The deployments compared on the chart.
//!
//! The x axis measures task drift and long-tailness (0 is fully stable,
//! 1 is highly drifting); the y axis the effective outcomes per unit
//! of cost.

/// A dominant deployment, used to fit the frontier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint {
    pub x: f64,
    pub y: f64,
}

/// A labelled (tool, task regime) combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeploymentPoint {
    pub label: &'static str,
    pub x: f64,
    pub y: f64,
}

const fn anchor(x: f64, y: f64) -> AnchorPoint {
    AnchorPoint { x, y }
}

const fn deployment(label: &'static str, x: f64, y: f64) -> DeploymentPoint {
    DeploymentPoint { label, x, y }
}

/// Best tool per regime.
pub const ANCHORS: [AnchorPoint; 4] = [
    anchor(0.05, 1.25), // Algorithm for °F→°C
    anchor(0.35, 0.90), // Specialized ML for spam
    anchor(0.55, 0.72), // LLM for intent translation
    anchor(0.85, 0.68), // Human escalation handling
];

/// All viable deployments, dominated ones included.
pub const DEPLOYMENTS: [DeploymentPoint; 11] = [
    deployment("Algorithm for °F→°C", 0.05, 1.25),
    deployment("Human for °F→°C", 0.05, 0.55),
    deployment("LLM for °F→°C", 0.05, 0.30),
    deployment("ML for °F→°C", 0.05, 0.45),

    deployment("Specialized ML for Spam", 0.35, 0.90),
    deployment("LLM for Spam", 0.35, 0.45),
    deployment("Human for Spam", 0.35, 0.30),

    deployment("LLM for Intent Translation", 0.55, 0.72),
    deployment("Human for Intent Translation", 0.55, 0.55),

    deployment("Human Escalation Handling", 0.85, 0.68),
    deployment("LLM-only Escalation Handling", 0.85, 0.25),
];

/// Smallest interval containing the abscissas of `anchors`, or `None`
/// if there are none.
pub fn anchor_span(anchors: &[AnchorPoint]) -> Option<(f64, f64)> {
    anchors.iter().map(|p| (p.x, p.x))
        .reduce(|(a, b), (x0, x1)| (a.min(x0), b.max(x1)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn deployments_within_anchor_span() {
        let (a, b) = anchor_span(&ANCHORS).unwrap();
        assert_eq!((a, b), (0.05, 0.85));
        for d in &DEPLOYMENTS {
            assert!(a <= d.x && d.x <= b, "{} outside [{a}, {b}]", d.label);
            assert!(d.y >= 0.);
        }
    }

    #[test]
    fn labels_are_unique() {
        let labels: HashSet<_> = DEPLOYMENTS.iter().map(|d| d.label).collect();
        assert_eq!(labels.len(), DEPLOYMENTS.len());
    }

    #[test]
    fn every_anchor_is_a_deployment() {
        for a in &ANCHORS {
            assert!(DEPLOYMENTS.iter().any(|d| d.x == a.x && d.y == a.y));
        }
    }

    #[test]
    fn empty_span() {
        assert_eq!(anchor_span(&[]), None);
    }
}
