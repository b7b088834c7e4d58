use crate::compliance::outcome::{ComplianceMatrix, MatrixRow, ResolvedCompound, Verdict};
use crate::model::DescriptorSet;
use crate::rules::schema::RuleDefinition;

/// Evaluate a descriptor set against one rule set.
///
/// Outcomes follow the rule's predicate order.
pub fn evaluate(descriptors: &DescriptorSet, rule: &RuleDefinition) -> Verdict {
    let outcomes: Vec<bool> = rule
        .predicates
        .iter()
        .map(|p| p.test(descriptors.value(p.parameter)))
        .collect();
    let pass_count = outcomes.iter().filter(|&&passed| passed).count();
    Verdict {
        accepted: rule.policy.accepts(pass_count),
        outcomes,
        pass_count,
    }
}

/// Assemble a compliance matrix from resolved compounds, keeping their order.
pub fn build_matrix(compounds: &[ResolvedCompound], rule: &RuleDefinition) -> ComplianceMatrix {
    let rows = compounds
        .iter()
        .map(|c| MatrixRow {
            id: c.id.clone(),
            name: c.name.clone(),
            verdict: evaluate(&c.descriptors, rule),
            descriptors: c.descriptors.clone(),
        })
        .collect();

    ComplianceMatrix {
        rule_key: rule.key.clone(),
        rule_name: rule.name.clone(),
        columns: rule.column_labels(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CompoundId;
    use crate::rules::builtin::load_preset;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn aspirin_like() -> DescriptorSet {
        DescriptorSet {
            molecular_weight: dec!(180.16),
            hbond_acceptors: 4,
            hbond_donors: 1,
            logp: dec!(1.2),
            rotatable_bonds: 1,
            polar_surface_area: dec!(63.6),
            ring_count: 1,
            carbon_count: 9,
            heteroatom_count: 4,
        }
    }

    #[test]
    fn test_lipinski_accepts_aspirin_like() {
        let rule = load_preset("lipinski").unwrap();
        let verdict = evaluate(&aspirin_like(), &rule);
        assert_eq!(verdict.pass_count, 4);
        assert!(verdict.accepted);
    }

    #[test]
    fn test_ro3_rejects_aspirin_like() {
        let rule = load_preset("ro3").unwrap();
        let verdict = evaluate(&aspirin_like(), &rule);
        assert_eq!(verdict.outcomes, vec![true, true, false, true, true, false]);
        assert_eq!(verdict.pass_count, 4);
        assert!(!verdict.accepted);
    }

    #[test]
    fn test_muegge_accepts_mid_range_compound() {
        let rule = load_preset("muegge").unwrap();
        let set = DescriptorSet {
            molecular_weight: dec!(350),
            hbond_acceptors: 5,
            hbond_donors: 2,
            logp: dec!(2),
            rotatable_bonds: 5,
            polar_surface_area: dec!(80),
            ring_count: 3,
            carbon_count: 20,
            heteroatom_count: 5,
        };
        let verdict = evaluate(&set, &rule);
        assert_eq!(verdict.pass_count, 9);
        assert!(verdict.accepted);
    }

    #[test]
    fn test_lipinski_boundaries_are_inclusive() {
        let rule = load_preset("lipinski").unwrap();
        let set = DescriptorSet {
            molecular_weight: dec!(500),
            hbond_acceptors: 10,
            hbond_donors: 5,
            logp: dec!(5),
            ..aspirin_like()
        };
        let verdict = evaluate(&set, &rule);
        assert_eq!(verdict.outcomes, vec![true; 4]);
    }

    #[test]
    fn test_lipinski_tolerates_one_violation() {
        let rule = load_preset("lipinski").unwrap();
        let one_off = DescriptorSet {
            molecular_weight: dec!(512.3),
            ..aspirin_like()
        };
        assert!(evaluate(&one_off, &rule).accepted);

        let two_off = DescriptorSet {
            molecular_weight: dec!(512.3),
            logp: dec!(5.01),
            ..aspirin_like()
        };
        let verdict = evaluate(&two_off, &rule);
        assert_eq!(verdict.pass_count, 2);
        assert!(!verdict.accepted);
    }

    #[test]
    fn test_veber_only_reads_its_parameters() {
        let rule = load_preset("veber").unwrap();
        let set = DescriptorSet {
            molecular_weight: dec!(2000),
            logp: dec!(12),
            rotatable_bonds: 10,
            polar_surface_area: dec!(140),
            ..aspirin_like()
        };
        assert!(evaluate(&set, &rule).accepted);
    }

    #[test]
    fn test_build_matrix_keeps_order_and_columns() {
        let rule = load_preset("veber").unwrap();
        let compounds = vec![
            ResolvedCompound {
                id: CompoundId::normalize("CCO").unwrap(),
                name: None,
                descriptors: Arc::new(aspirin_like()),
            },
            ResolvedCompound {
                id: CompoundId::normalize("c1ccccc1").unwrap(),
                name: Some("benzene".into()),
                descriptors: Arc::new(DescriptorSet {
                    rotatable_bonds: 11,
                    ..aspirin_like()
                }),
            },
        ];
        let matrix = build_matrix(&compounds, &rule);
        assert_eq!(matrix.columns, vec!["ROTB <= 10", "PSA <= 140"]);
        assert_eq!(matrix.rows[0].id.as_str(), "CCO");
        assert!(matrix.rows[0].verdict.accepted);
        assert_eq!(matrix.rows[1].verdict.outcomes, vec![false, true]);
        assert!(Arc::ptr_eq(
            &matrix.rows[1].descriptors,
            &compounds[1].descriptors
        ));
    }
}
