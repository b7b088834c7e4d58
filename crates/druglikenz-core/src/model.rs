use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Decimal places kept when a floating-point descriptor is converted to `Decimal`.
pub const DESCRIPTOR_SCALE: u32 = 4;

/// A normalized structure identifier (a SMILES string in practice).
///
/// Two identifiers are the same compound iff their normalized strings are
/// byte-equal. Normalization only trims surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompoundId(String);

impl CompoundId {
    /// Normalize a raw identifier. Returns `None` for blank input.
    pub fn normalize(raw: &str) -> Option<CompoundId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(CompoundId(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The nine physicochemical descriptors every rule set draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Descriptor {
    #[serde(rename = "MW")]
    MolecularWeight,
    #[serde(rename = "HBA")]
    HBondAcceptors,
    #[serde(rename = "HBD")]
    HBondDonors,
    #[serde(rename = "LogP")]
    LogP,
    #[serde(rename = "ROTB")]
    RotatableBonds,
    #[serde(rename = "PSA")]
    PolarSurfaceArea,
    #[serde(rename = "NumRings")]
    RingCount,
    #[serde(rename = "NumCarbons")]
    CarbonCount,
    #[serde(rename = "NumHeteroatoms")]
    HeteroatomCount,
}

impl Descriptor {
    /// All descriptors, in export column order.
    pub const ALL: [Descriptor; 9] = [
        Descriptor::MolecularWeight,
        Descriptor::HBondAcceptors,
        Descriptor::HBondDonors,
        Descriptor::LogP,
        Descriptor::RotatableBonds,
        Descriptor::PolarSurfaceArea,
        Descriptor::RingCount,
        Descriptor::CarbonCount,
        Descriptor::HeteroatomCount,
    ];

    /// Short label used in rule files and exported column headers.
    pub fn label(self) -> &'static str {
        match self {
            Descriptor::MolecularWeight => "MW",
            Descriptor::HBondAcceptors => "HBA",
            Descriptor::HBondDonors => "HBD",
            Descriptor::LogP => "LogP",
            Descriptor::RotatableBonds => "ROTB",
            Descriptor::PolarSurfaceArea => "PSA",
            Descriptor::RingCount => "NumRings",
            Descriptor::CarbonCount => "NumCarbons",
            Descriptor::HeteroatomCount => "NumHeteroatoms",
        }
    }

    /// Label used in predicate text ("Rings <= 7").
    pub fn short_name(self) -> &'static str {
        match self {
            Descriptor::RingCount => "Rings",
            Descriptor::CarbonCount => "Carbons",
            Descriptor::HeteroatomCount => "Heteroatoms",
            other => other.label(),
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(
            self,
            Descriptor::MolecularWeight | Descriptor::LogP | Descriptor::PolarSurfaceArea
        )
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A complete, immutable set of descriptors for one compound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorSet {
    #[serde(rename = "MW")]
    pub molecular_weight: Decimal,
    #[serde(rename = "HBA")]
    pub hbond_acceptors: u32,
    #[serde(rename = "HBD")]
    pub hbond_donors: u32,
    #[serde(rename = "LogP")]
    pub logp: Decimal,
    #[serde(rename = "ROTB")]
    pub rotatable_bonds: u32,
    #[serde(rename = "PSA")]
    pub polar_surface_area: Decimal,
    #[serde(rename = "NumRings")]
    pub ring_count: u32,
    #[serde(rename = "NumCarbons")]
    pub carbon_count: u32,
    #[serde(rename = "NumHeteroatoms")]
    pub heteroatom_count: u32,
}

impl DescriptorSet {
    /// Value of a descriptor; integer fields are widened exactly.
    pub fn value(&self, descriptor: Descriptor) -> Decimal {
        match descriptor {
            Descriptor::MolecularWeight => self.molecular_weight,
            Descriptor::HBondAcceptors => Decimal::from(self.hbond_acceptors),
            Descriptor::HBondDonors => Decimal::from(self.hbond_donors),
            Descriptor::LogP => self.logp,
            Descriptor::RotatableBonds => Decimal::from(self.rotatable_bonds),
            Descriptor::PolarSurfaceArea => self.polar_surface_area,
            Descriptor::RingCount => Decimal::from(self.ring_count),
            Descriptor::CarbonCount => Decimal::from(self.carbon_count),
            Descriptor::HeteroatomCount => Decimal::from(self.heteroatom_count),
        }
    }

    /// Build a complete set from partial results.
    ///
    /// Fails with the list of absent descriptors. An integer descriptor
    /// holding a negative or fractional value counts as absent.
    pub fn from_partial(partial: &PartialDescriptors) -> Result<DescriptorSet, Vec<Descriptor>> {
        let mut missing = Vec::new();
        let mut real = |d: Descriptor| match partial.get(d) {
            Some(v) => v,
            None => {
                missing.push(d);
                Decimal::ZERO
            }
        };
        let molecular_weight = real(Descriptor::MolecularWeight);
        let logp = real(Descriptor::LogP);
        let polar_surface_area = real(Descriptor::PolarSurfaceArea);

        let mut count = |d: Descriptor| match partial.get(d).and_then(as_count) {
            Some(v) => v,
            None => {
                missing.push(d);
                0
            }
        };
        let hbond_acceptors = count(Descriptor::HBondAcceptors);
        let hbond_donors = count(Descriptor::HBondDonors);
        let rotatable_bonds = count(Descriptor::RotatableBonds);
        let ring_count = count(Descriptor::RingCount);
        let carbon_count = count(Descriptor::CarbonCount);
        let heteroatom_count = count(Descriptor::HeteroatomCount);

        if !missing.is_empty() {
            missing.sort();
            return Err(missing);
        }

        Ok(DescriptorSet {
            molecular_weight,
            hbond_acceptors,
            hbond_donors,
            logp,
            rotatable_bonds,
            polar_surface_area,
            ring_count,
            carbon_count,
            heteroatom_count,
        })
    }
}

fn as_count(value: Decimal) -> Option<u32> {
    if value.is_sign_negative() || !value.fract().is_zero() {
        return None;
    }
    value.to_u32()
}

/// Descriptors produced by one source, some possibly absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDescriptors {
    values: BTreeMap<Descriptor, Decimal>,
}

impl PartialDescriptors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, descriptor: Descriptor) -> Option<Decimal> {
        self.values.get(&descriptor).copied()
    }

    pub fn set(&mut self, descriptor: Descriptor, value: Decimal) {
        self.values.insert(descriptor, value);
    }

    /// Set a descriptor from a floating-point computation, rounded to
    /// [`DESCRIPTOR_SCALE`] places. Non-finite values are left absent.
    pub fn set_f64(&mut self, descriptor: Descriptor, value: f64) {
        if let Some(d) = decimal_from_f64(value) {
            self.values.insert(descriptor, d);
        }
    }

    pub fn set_count(&mut self, descriptor: Descriptor, value: usize) {
        self.values.insert(descriptor, Decimal::from(value as u64));
    }

    /// Descriptors from `wanted` that this set does not hold.
    pub fn missing_from(&self, wanted: &[Descriptor]) -> Vec<Descriptor> {
        wanted
            .iter()
            .copied()
            .filter(|d| !self.values.contains_key(d))
            .collect()
    }

    /// Fill absent descriptors from `other`. Values already present win.
    pub fn merge(&mut self, other: &PartialDescriptors) {
        for (d, v) in &other.values {
            self.values.entry(*d).or_insert(*v);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Convert a float to a `Decimal` rounded to [`DESCRIPTOR_SCALE`] places.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    Decimal::try_from(value)
        .ok()
        .map(|d| d.round_dp(DESCRIPTOR_SCALE).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn full_partial() -> PartialDescriptors {
        let mut p = PartialDescriptors::new();
        p.set(Descriptor::MolecularWeight, dec!(180.16));
        p.set(Descriptor::HBondAcceptors, dec!(4));
        p.set(Descriptor::HBondDonors, dec!(1));
        p.set(Descriptor::LogP, dec!(1.2));
        p.set(Descriptor::RotatableBonds, dec!(1));
        p.set(Descriptor::PolarSurfaceArea, dec!(63.6));
        p.set(Descriptor::RingCount, dec!(1));
        p.set(Descriptor::CarbonCount, dec!(9));
        p.set(Descriptor::HeteroatomCount, dec!(4));
        p
    }

    #[test]
    fn test_normalize_trims() {
        let id = CompoundId::normalize("  CCO \t").unwrap();
        assert_eq!(id.as_str(), "CCO");
        assert!(CompoundId::normalize("   ").is_none());
    }

    #[test]
    fn test_from_partial_complete() {
        let set = DescriptorSet::from_partial(&full_partial()).unwrap();
        assert_eq!(set.hbond_acceptors, 4);
        assert_eq!(set.value(Descriptor::PolarSurfaceArea), dec!(63.6));
        assert_eq!(set.value(Descriptor::CarbonCount), dec!(9));
    }

    #[test]
    fn test_from_partial_reports_missing_sorted() {
        let mut p = PartialDescriptors::new();
        p.set(Descriptor::MolecularWeight, dec!(100));
        let missing = DescriptorSet::from_partial(&p).unwrap_err();
        assert_eq!(missing.len(), 8);
        assert_eq!(missing[0], Descriptor::HBondAcceptors);
        assert!(missing.contains(&Descriptor::LogP));
    }

    #[test]
    fn test_fractional_count_is_missing() {
        let mut p = full_partial();
        p.set(Descriptor::RingCount, dec!(1.5));
        let missing = DescriptorSet::from_partial(&p).unwrap_err();
        assert_eq!(missing, vec![Descriptor::RingCount]);
    }

    #[test]
    fn test_merge_keeps_existing_values() {
        let mut a = PartialDescriptors::new();
        a.set(Descriptor::LogP, dec!(1.0));
        let mut b = PartialDescriptors::new();
        b.set(Descriptor::LogP, dec!(9.0));
        b.set(Descriptor::RingCount, dec!(2));
        a.merge(&b);
        assert_eq!(a.get(Descriptor::LogP), Some(dec!(1.0)));
        assert_eq!(a.get(Descriptor::RingCount), Some(dec!(2)));
    }

    #[test]
    fn test_decimal_from_f64_rounds() {
        assert_eq!(decimal_from_f64(180.15899999), Some(dec!(180.159)));
        assert_eq!(decimal_from_f64(f64::NAN), None);
    }

    #[test]
    fn test_descriptor_labels_round_trip_through_serde() {
        let json = serde_json::to_string(&Descriptor::RingCount).unwrap();
        assert_eq!(json, "\"NumRings\"");
    }
}
