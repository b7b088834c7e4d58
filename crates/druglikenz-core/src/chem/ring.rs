//! Ring perception.

use std::collections::VecDeque;

use crate::chem::molecule::Molecule;

/// Number of independent rings, i.e. the size of the smallest set of
/// smallest rings: bonds - atoms + connected components.
pub fn ring_count(mol: &Molecule) -> usize {
    (mol.bond_count() + component_count(mol)).saturating_sub(mol.atom_count())
}

/// For each bond, whether it lies on a cycle.
pub fn ring_bonds(mol: &Molecule) -> Vec<bool> {
    (0..mol.bond_count())
        .map(|b| closes_cycle(mol, b))
        .collect()
}

/// For each atom, whether any of its bonds lies on a cycle.
pub fn ring_atoms(mol: &Molecule, ring_bonds: &[bool]) -> Vec<bool> {
    let mut in_ring = vec![false; mol.atom_count()];
    for (bond, _) in mol.bonds.iter().zip(ring_bonds).filter(|&(_, &r)| r) {
        in_ring[bond.begin] = true;
        in_ring[bond.end] = true;
    }
    in_ring
}

/// A bond is a ring bond iff its ends stay connected without it.
fn closes_cycle(mol: &Molecule, bond: usize) -> bool {
    let target = mol.bonds[bond].end;
    let mut seen = vec![false; mol.atom_count()];
    let mut queue = VecDeque::from([mol.bonds[bond].begin]);
    seen[mol.bonds[bond].begin] = true;

    while let Some(atom) = queue.pop_front() {
        for &(next, via) in mol.neighbors(atom) {
            if via == bond || seen[next] {
                continue;
            }
            if next == target {
                return true;
            }
            seen[next] = true;
            queue.push_back(next);
        }
    }
    false
}

fn component_count(mol: &Molecule) -> usize {
    let mut seen = vec![false; mol.atom_count()];
    let mut components = 0;
    for start in 0..mol.atom_count() {
        if seen[start] {
            continue;
        }
        components += 1;
        seen[start] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(atom) = queue.pop_front() {
            for &(next, _) in mol.neighbors(atom) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
    }
    components
}
