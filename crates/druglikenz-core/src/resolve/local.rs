use crate::chem::{crippen, descriptors, parse_smiles, ring, Molecule};
use crate::model::{CompoundId, Descriptor, PartialDescriptors};
use crate::resolve::{DescriptorSource, SourceError};

/// Computes descriptors from the SMILES string itself.
///
/// LogP is left absent for structures containing an element without a
/// Crippen atom type (noble gases, lanthanides, actinides), so a remote
/// source can supply it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmilesCalculator;

impl DescriptorSource for SmilesCalculator {
    fn name(&self) -> &str {
        "local"
    }

    fn lookup(
        &self,
        id: &CompoundId,
        wanted: &[Descriptor],
    ) -> Result<PartialDescriptors, SourceError> {
        let mol = parse_smiles(id.as_str()).map_err(|e| SourceError::Unparseable(e.to_string()))?;
        Ok(compute(&mol, wanted))
    }
}

/// Compute the requested descriptors for a parsed molecule.
pub fn compute(mol: &Molecule, wanted: &[Descriptor]) -> PartialDescriptors {
    let ring_bonds = ring::ring_bonds(mol);
    let mut out = PartialDescriptors::new();
    for &d in wanted {
        match d {
            Descriptor::MolecularWeight => out.set_f64(d, descriptors::molecular_weight(mol)),
            Descriptor::HBondAcceptors => {
                out.set_count(d, descriptors::hbond_acceptors(mol, &ring_bonds))
            }
            Descriptor::HBondDonors => out.set_count(d, descriptors::hbond_donors(mol)),
            Descriptor::LogP => {
                if let Some(logp) = crippen::logp(mol) {
                    out.set_f64(d, logp);
                }
            }
            Descriptor::RotatableBonds => {
                out.set_count(d, descriptors::rotatable_bonds(mol, &ring_bonds))
            }
            Descriptor::PolarSurfaceArea => out.set_f64(d, descriptors::tpsa(mol)),
            Descriptor::RingCount => out.set_count(d, ring::ring_count(mol)),
            Descriptor::CarbonCount => out.set_count(d, descriptors::carbon_count(mol)),
            Descriptor::HeteroatomCount => out.set_count(d, descriptors::heteroatom_count(mol)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DescriptorSet;
    use rust_decimal_macros::dec;

    fn lookup(smiles: &str) -> Result<PartialDescriptors, SourceError> {
        SmilesCalculator.lookup(&CompoundId::normalize(smiles).unwrap(), &Descriptor::ALL)
    }

    #[test]
    fn test_aspirin_complete_set() {
        let partial = lookup("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let set = DescriptorSet::from_partial(&partial).unwrap();
        assert_eq!(set.molecular_weight, dec!(180.159));
        assert_eq!(set.hbond_acceptors, 3);
        assert_eq!(set.logp, dec!(1.3101));
        assert_eq!(set.hbond_donors, 1);
        assert_eq!(set.polar_surface_area, dec!(63.6));
        assert_eq!(set.rotatable_bonds, 3);
        assert_eq!(set.ring_count, 1);
        assert_eq!(set.carbon_count, 9);
        assert_eq!(set.heteroatom_count, 4);
    }

    #[test]
    fn test_untyped_element_leaves_logp_missing() {
        let partial = lookup("F[Xe]F").unwrap();
        assert_eq!(partial.missing_from(&Descriptor::ALL), vec![Descriptor::LogP]);
    }

    #[test]
    fn test_rare_elements_are_parsed_not_rejected() {
        for smiles in ["[W]", "[U]", "[La+3]", "[Eu]", "C[Ir]C", "CC[Po]", "*C"] {
            let partial = lookup(smiles).unwrap_or_else(|e| panic!("{smiles}: {e}"));
            assert!(partial.get(Descriptor::MolecularWeight).is_some(), "{smiles}");
        }
    }

    #[test]
    fn test_only_wanted_fields_computed() {
        let id = CompoundId::normalize("CCO").unwrap();
        let partial = SmilesCalculator
            .lookup(&id, &[Descriptor::CarbonCount])
            .unwrap();
        assert_eq!(partial.len(), 1);
        assert_eq!(partial.get(Descriptor::CarbonCount), Some(dec!(2)));
    }

    #[test]
    fn test_garbage_is_unparseable() {
        assert!(matches!(
            lookup("not-a-structure"),
            Err(SourceError::Unparseable(_))
        ));
    }
}
