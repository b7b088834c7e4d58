//! Graph descriptors for drug-likeness screening.

use crate::chem::element::{self, HYDROGEN_MASS};
use crate::chem::molecule::{BondOrder, Molecule};

/// Average molecular weight, implicit hydrogens included.
///
/// Isotope-labelled atoms use the isotope's mass; wildcard atoms weigh nothing.
pub fn molecular_weight(mol: &Molecule) -> f64 {
    mol.atoms
        .iter()
        .map(|a| {
            let mass = match a.isotope {
                Some(mass_number) if a.element != element::WILDCARD => {
                    element::isotope_mass(a.element, mass_number)
                }
                _ => element::by_number(a.element).map_or(0.0, |e| e.mass),
            };
            mass + f64::from(a.implicit_h) * HYDROGEN_MASS
        })
        .sum()
}

/// Hydrogen-bond acceptors, by the usual Lipinski-style atom rules:
///
/// - O or S with one hydrogen, unless bonded to an atom carrying a double
///   bond to O, N, P or S (acid hydroxyls are not acceptors)
/// - O or S with two connections and no hydrogen, and any anionic O or S
/// - trivalent nitrogen not bonded to an atom with an acyclic double bond
///   to O, N, P or S (amide nitrogens are not acceptors)
/// - neutral aromatic nitrogen without hydrogen, aromatic O and S
/// - fluorine
pub fn hbond_acceptors(mol: &Molecule, ring_bonds: &[bool]) -> usize {
    (0..mol.atom_count())
        .filter(|&i| is_acceptor(mol, ring_bonds, i))
        .count()
}

fn is_acceptor(mol: &Molecule, ring_bonds: &[bool], i: usize) -> bool {
    let atom = &mol.atoms[i];
    match atom.element {
        9 => true,
        7 if atom.aromatic => atom.charge == 0 && mol.total_h(i) == 0,
        8 | 16 if atom.aromatic => atom.charge == 0,
        8 | 16 => {
            if atom.charge < 0 {
                return true;
            }
            match (mol.total_h(i), mol.valence(i)) {
                (0, 2) => true,
                (1, 2) => mol.neighbors(i).iter().all(|&(n, bond)| {
                    mol.atoms[n].is_hydrogen()
                        || (mol.bonds[bond].order == BondOrder::Single
                            && !has_double_bond_to_polar(mol, ring_bonds, n, false))
                }),
                _ => false,
            }
        }
        7 => {
            mol.valence(i) == 3
                && !mol.neighbors(i).iter().any(|&(n, bond)| {
                    mol.bonds[bond].order == BondOrder::Single
                        && has_double_bond_to_polar(mol, ring_bonds, n, true)
                })
        }
        _ => false,
    }
}

/// Whether `atom` has a double bond to an aliphatic O, N, P or S,
/// optionally only counting bonds outside rings.
fn has_double_bond_to_polar(mol: &Molecule, ring_bonds: &[bool], atom: usize, acyclic: bool) -> bool {
    mol.neighbors(atom).iter().any(|&(n, bond)| {
        let other = &mol.atoms[n];
        mol.bonds[bond].order == BondOrder::Double
            && !(acyclic && ring_bonds[bond])
            && !other.aromatic
            && matches!(other.element, 7 | 8 | 15 | 16)
    })
}

/// Hydrogen-bond donors: N-H on neutral trivalent or cationic tetravalent
/// nitrogen, neutral O-H and S-H, and neutral aromatic N-H.
pub fn hbond_donors(mol: &Molecule) -> usize {
    (0..mol.atom_count())
        .filter(|&i| {
            let atom = &mol.atoms[i];
            let h = mol.total_h(i);
            match atom.element {
                7 if atom.aromatic => atom.charge == 0 && h == 1,
                7 => {
                    h > 0
                        && matches!(
                            (atom.charge, mol.valence(i)),
                            (0, 3) | (1, 4)
                        )
                }
                8 | 16 if !atom.aromatic => atom.charge == 0 && h == 1,
                _ => false,
            }
        })
        .count()
}

pub fn carbon_count(mol: &Molecule) -> usize {
    mol.atoms.iter().filter(|a| a.element == 6).count()
}

/// Atoms other than carbon and hydrogen.
pub fn heteroatom_count(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .filter(|a| !matches!(a.element, 1 | 6 | element::WILDCARD))
        .count()
}

/// Single, non-ring bonds between two non-terminal heavy atoms.
///
/// Bonds next to a triple bond and amide C-N bonds are not counted.
pub fn rotatable_bonds(mol: &Molecule, ring_bonds: &[bool]) -> usize {
    mol.bonds
        .iter()
        .enumerate()
        .filter(|&(i, bond)| {
            let (a, b) = (bond.begin, bond.end);
            bond.order == BondOrder::Single
                && !ring_bonds[i]
                && !mol.atoms[a].is_hydrogen()
                && !mol.atoms[b].is_hydrogen()
                && mol.heavy_degree(a) > 1
                && mol.heavy_degree(b) > 1
                && !mol.has_bond_of(a, BondOrder::Triple)
                && !mol.has_bond_of(b, BondOrder::Triple)
                && !is_amide_bond(mol, a, b)
        })
        .count()
}

fn is_amide_bond(mol: &Molecule, a: usize, b: usize) -> bool {
    let (carbon, nitrogen) = match (mol.atoms[a].element, mol.atoms[b].element) {
        (6, 7) => (a, b),
        (7, 6) => (b, a),
        _ => return false,
    };
    mol.neighbors(carbon).iter().any(|&(n, bond)| {
        n != nitrogen && mol.atoms[n].element == 8 && mol.bonds[bond].order == BondOrder::Double
    })
}

#[derive(Debug, Default, Clone, Copy)]
struct BondCounts {
    single: usize,
    double: usize,
    triple: usize,
    aromatic: usize,
}

fn heavy_bond_counts(mol: &Molecule, atom: usize) -> BondCounts {
    let mut counts = BondCounts::default();
    for order in mol.heavy_bond_orders(atom) {
        match order {
            BondOrder::Single => counts.single += 1,
            BondOrder::Double => counts.double += 1,
            BondOrder::Triple => counts.triple += 1,
            BondOrder::Aromatic => counts.aromatic += 1,
        }
    }
    counts
}

/// Topological polar surface area (Ertl, Rohde & Selzer 2000), nitrogen
/// and oxygen contributions only.
pub fn tpsa(mol: &Molecule) -> f64 {
    (0..mol.atom_count())
        .map(|i| match mol.atoms[i].element {
            7 => nitrogen_psa(mol, i),
            8 => oxygen_psa(mol, i),
            _ => 0.0,
        })
        .sum()
}

fn nitrogen_psa(mol: &Molecule, i: usize) -> f64 {
    let atom = &mol.atoms[i];
    let h = mol.total_h(i);
    let c = heavy_bond_counts(mol, i);

    if atom.aromatic {
        return match (atom.charge, h, c.aromatic, c.single) {
            (0, 0, 2, 0) => 12.89,
            (0, 0, 3, _) => 4.41,
            (0, 0, 2, 1) => 4.93,
            (0, _, _, _) if h > 0 => 15.79,
            (1, 1, 2, _) => 14.14,
            (1, 0, 2, 1) => 3.88,
            (1, 0, 3, _) => 0.0,
            _ => 12.89,
        };
    }

    match (atom.charge, h, c.single, c.double, c.triple) {
        (0, 0, 3, 0, 0) => 3.24,
        (0, 0, 1, 1, 0) => 12.36,
        (0, 0, 0, 0, 1) => 23.79,
        (0, 0, 1, 2, 0) => 11.68,
        (0, 0, 0, 2, 0) | (0, 0, 0, 1, 1) => 13.6,
        (0, 1, 2, 0, 0) => 12.03,
        (0, 1, 0, 1, 0) => 23.85,
        (0, 2, 1, 0, 0) | (0, 3, 0, 0, 0) => 26.02,
        (1, 3, 1, 0, 0) => 27.64,
        (1, 2, 2, 0, 0) => 16.61,
        (1, 2, 0, 1, 0) => 25.59,
        (1, 1, 3, 0, 0) => 4.44,
        (1, 1, 1, 1, 0) => 13.97,
        (1, 0, 4, 0, 0) => 0.0,
        (1, 0, 2, 1, 0) => 3.01,
        (1, 0, 1, 0, 1) => 4.36,
        (0, 0, _, _, _) => 3.24,
        (0, 1, _, _, _) => 12.03,
        (0, _, _, _, _) => 26.02,
        _ => 0.0,
    }
}

fn oxygen_psa(mol: &Molecule, i: usize) -> f64 {
    let atom = &mol.atoms[i];
    let h = mol.total_h(i);
    let c = heavy_bond_counts(mol, i);

    if atom.aromatic {
        return 13.14;
    }
    match (atom.charge, h, c.single, c.double) {
        (0, 1, 1, 0) | (0, 2, 0, 0) => 20.23,
        (0, 0, 2, 0) => 9.23,
        (0, 0, 0, 1) => 17.07,
        (-1, 0, 1, 0) => 23.06,
        (0, _, _, _) if h > 0 => 20.23,
        (0, _, _, _) => 9.23,
        _ => 0.0,
    }
}
