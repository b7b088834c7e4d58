//! Wildman-Crippen logP (J. Chem. Inf. Comput. Sci. 1999, 39, 868-873).
//!
//! Every atom, hydrogens included, gets one of the published atom types
//! and the logP is the sum of the type contributions. Within an element the
//! types are tried in table order and the first match wins, so the checks
//! below must stay in that order.

use crate::chem::element::WILDCARD;
use crate::chem::molecule::{BondOrder, Molecule};

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomType {
    // carbon
    C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14,
    C15, C16, C17, C18, C19, C20, C21, C22, C23, C24, C25, C26, C27, CS,
    // hydrogen
    H1, H2, H3, H4, HS,
    // nitrogen
    N1, N2, N3, N4, N5, N6, N7, N8, N9, N10, N11, N12, N13, N14, NS,
    // oxygen
    O1, O2, O3, O4, O5, O6, O7, O8, O9, O10, O11, O12, OS,
    // halogens, phosphorus, sulfur
    F, Cl, Br, I, Hal, P, S1, S2, S3,
    // main-group and transition metals
    Me1, Me2,
}

impl AtomType {
    pub fn logp(self) -> f64 {
        use AtomType::*;
        match self {
            C1 => 0.1441,
            C2 => 0.0,
            C3 => -0.2035,
            C4 => -0.2051,
            C5 => -0.2783,
            C6 => 0.1551,
            C7 => 0.0017,
            C8 => 0.08452,
            C9 => -0.1444,
            C10 => -0.0516,
            C11 => 0.1193,
            C12 => -0.0967,
            C13 => -0.5443,
            C14 => 0.0,
            C15 => 0.245,
            C16 => 0.198,
            C17 => 0.0,
            C18 => 0.1581,
            C19 => 0.2955,
            C20 => 0.2713,
            C21 => 0.136,
            C22 => 0.4619,
            C23 => 0.5437,
            C24 => 0.1893,
            C25 => -0.8186,
            C26 => 0.264,
            C27 => 0.2148,
            CS => 0.08129,
            H1 => 0.123,
            H2 => -0.2677,
            H3 => 0.2142,
            H4 => 0.298,
            HS => 0.1125,
            N1 => -1.019,
            N2 => -0.7096,
            N3 => -1.027,
            N4 => -0.5188,
            N5 => 0.08387,
            N6 => 0.1836,
            N7 => -0.3187,
            N8 => -0.4458,
            N9 => 0.01508,
            N10 => -1.95,
            N11 => -0.3239,
            N12 => -1.119,
            N13 => -0.3396,
            N14 => 0.2887,
            NS => -0.4806,
            O1 => 0.1552,
            O2 => -0.2893,
            O3 => -0.0684,
            O4 => -0.4195,
            O5 => 0.0335,
            O6 => -0.3339,
            O7 => -1.189,
            O8 => 0.1788,
            O9 => -0.1526,
            O10 => 0.1129,
            O11 => 0.4833,
            O12 => -1.326,
            OS => -0.1188,
            F => 0.4202,
            Cl => 0.6895,
            Br => 0.8456,
            I => 0.8857,
            Hal => -2.996,
            P => 0.8612,
            S1 => 0.6482,
            S2 => -0.0024,
            S3 => 0.6237,
            Me1 => -0.3808,
            Me2 => -0.0025,
        }
    }
}

/// Crippen logP of the whole structure.
///
/// Returns `None` when an element has no atom type (noble gases,
/// lanthanides, actinides and the heaviest elements). Wildcard atoms
/// contribute nothing.
pub fn logp(mol: &Molecule) -> Option<f64> {
    let mut total = 0.0;
    for i in 0..mol.atom_count() {
        let atom = &mol.atoms[i];
        if atom.element == WILDCARD {
            continue;
        }
        if atom.is_hydrogen() {
            let parent = mol.neighbors(i).first().map(|&(n, _)| n);
            total += hydrogen_type(mol, parent).logp();
            continue;
        }
        total += heavy_atom_type(mol, i)?.logp();
        if atom.implicit_h > 0 {
            total += f64::from(atom.implicit_h) * hydrogen_type(mol, Some(i)).logp();
        }
    }
    Some(total)
}

/// A bonded non-hydrogen neighbor.
#[derive(Debug, Clone, Copy)]
struct Neighbor {
    index: usize,
    element: u8,
    aromatic: bool,
    order: BondOrder,
}

impl Neighbor {
    fn aliphatic(&self) -> bool {
        !self.aromatic
    }

    fn single(&self) -> bool {
        self.order == BondOrder::Single
    }

    fn double(&self) -> bool {
        self.order == BondOrder::Double
    }
}

fn heavy_neighbors(mol: &Molecule, atom: usize) -> Vec<Neighbor> {
    mol.neighbors(atom)
        .iter()
        .filter(|&&(n, _)| !mol.atoms[n].is_hydrogen())
        .map(|&(n, bond)| Neighbor {
            index: n,
            element: mol.atoms[n].element,
            aromatic: mol.atoms[n].aromatic,
            order: mol.bonds[bond].order,
        })
        .collect()
}

/// N, O, P, S and the halogens, as the carbon types use them.
fn polar(element: u8) -> bool {
    matches!(element, 7 | 8 | 15 | 16 | 9 | 17 | 35 | 53)
}

pub fn heavy_atom_type(mol: &Molecule, i: usize) -> Option<AtomType> {
    let atom = &mol.atoms[i];
    let kind = match atom.element {
        6 if atom.aromatic => aromatic_carbon(mol, i),
        6 => aliphatic_carbon(mol, i),
        7 => nitrogen(mol, i),
        8 => oxygen(mol, i),
        9 if atom.charge == 0 => AtomType::F,
        17 if atom.charge == 0 => AtomType::Cl,
        35 if atom.charge == 0 => AtomType::Br,
        53 if atom.charge == 0 => AtomType::I,
        9 | 17 | 35 | 53 => AtomType::Hal,
        15 => AtomType::P,
        16 if atom.aromatic => AtomType::S3,
        16 if atom.charge == 0 => AtomType::S1,
        16 => AtomType::S2,
        3 | 11 | 19 | 37 | 55 | 4 | 12 | 20 | 38 | 56 | 5 | 13 | 31 | 49 | 81 | 14 | 32 | 50
        | 82 | 33 | 51 | 83 | 34 | 52 | 84 => AtomType::Me1,
        21..=30 | 39..=48 | 72..=80 => AtomType::Me2,
        _ => return None,
    };
    Some(kind)
}

fn aliphatic_carbon(mol: &Molecule, i: usize) -> AtomType {
    use AtomType::*;
    let h = mol.total_h(i);
    let heavy = heavy_neighbors(mol, i);
    let connections = heavy.len() + h;
    let single_aliphatic = heavy.iter().filter(|n| n.single() && n.aliphatic()).count();
    let single_carbon = heavy
        .iter()
        .filter(|n| n.single() && n.aliphatic() && n.element == 6)
        .count();
    let single_polar = heavy
        .iter()
        .filter(|n| n.single() && n.aliphatic() && polar(n.element))
        .count();
    let any_aromatic = heavy.iter().any(|n| n.aromatic);
    let double_carbon = heavy
        .iter()
        .any(|n| n.double() && n.aliphatic() && n.element == 6);

    if h == 4 || (h == 3 && single_carbon >= 1) || (h == 2 && single_carbon >= 2) {
        return C1;
    }
    if (h == 1 && single_carbon >= 3) || (h == 0 && single_carbon >= 4) {
        return C2;
    }
    if single_polar > 0 {
        if h == 3 || (h == 2 && connections == 4 && single_aliphatic >= 2) {
            return C3;
        }
        if connections == 4 && single_aliphatic + h >= 4 && h <= 1 {
            return C4;
        }
    }
    if heavy
        .iter()
        .any(|n| n.double() && n.aliphatic() && n.element != 6)
    {
        return C5;
    }
    if double_carbon && !any_aromatic {
        return C6;
    }
    if connections == 2
        && heavy
            .iter()
            .any(|n| n.order == BondOrder::Triple && n.aliphatic())
    {
        return C7;
    }
    if h == 3 && heavy.iter().any(|n| n.aromatic && n.element == 6) {
        return C8;
    }
    if h == 3 && any_aromatic {
        return C9;
    }
    if connections == 4 && any_aromatic {
        match h {
            2 => return C10,
            1 => return C11,
            0 => return C12,
            _ => {}
        }
    }
    if (double_carbon && any_aromatic)
        || heavy
            .iter()
            .any(|n| n.double() && n.aromatic && n.element == 6)
    {
        return C26;
    }
    if connections == 4
        && heavy
            .iter()
            .any(|n| n.aliphatic() && n.element != 6 && !polar(n.element))
    {
        return C27;
    }
    CS
}

fn aromatic_carbon(mol: &Molecule, i: usize) -> AtomType {
    use AtomType::*;
    let h = mol.total_h(i);
    let heavy = heavy_neighbors(mol, i);

    if h == 0
        && heavy.iter().any(|n| {
            n.single() && n.aliphatic() && !matches!(n.element, 6 | 7 | 8 | 16 | 9 | 17 | 35 | 53)
        })
    {
        return C13;
    }
    for (element, kind) in [(9, C14), (17, C15), (35, C16), (53, C17)] {
        if heavy.iter().any(|n| n.element == element) {
            return kind;
        }
    }
    if h == 1 {
        return C18;
    }

    let ring_bonds = heavy
        .iter()
        .filter(|n| n.order == BondOrder::Aromatic)
        .count();
    if ring_bonds >= 3 {
        return C19;
    }
    if ring_bonds == 2 {
        let Some(other) = heavy.iter().find(|n| n.order != BondOrder::Aromatic) else {
            return CS;
        };
        return match (other.order, other.aromatic, other.element) {
            (BondOrder::Single, true, _) => C20,
            (BondOrder::Single, false, 6) => C21,
            (BondOrder::Single, false, 7) => C22,
            (BondOrder::Single, false, 8) => C23,
            (BondOrder::Single, false, 16) => C24,
            (BondOrder::Double, false, 6 | 7 | 8) => C25,
            _ => CS,
        };
    }
    CS
}

fn nitrogen(mol: &Molecule, i: usize) -> AtomType {
    use AtomType::*;
    let atom = &mol.atoms[i];
    if atom.aromatic {
        return match atom.charge {
            0 => N11,
            c if c > 0 => N12,
            _ => NS,
        };
    }

    let h = mol.total_h(i);
    let heavy = heavy_neighbors(mol, i);
    let singles: Vec<&Neighbor> = heavy.iter().filter(|n| n.single()).collect();
    let doubles: Vec<&Neighbor> = heavy.iter().filter(|n| n.double()).collect();
    let triple = heavy.iter().any(|n| n.order == BondOrder::Triple);

    if atom.charge == 0 {
        let aliphatic = singles.iter().filter(|n| n.aliphatic()).count();
        let aromatic = singles.len() - aliphatic;
        if h == 2 && aliphatic >= 1 {
            return N1;
        }
        if h == 1 && aliphatic >= 2 {
            return N2;
        }
        if h == 2 && aromatic >= 1 {
            return N3;
        }
        if h == 1 && aromatic >= 1 && singles.len() >= 2 {
            return N4;
        }
        if h == 1 && !doubles.is_empty() {
            return N5;
        }
        if !doubles.is_empty() && !singles.is_empty() {
            return N6;
        }
        if aliphatic >= 3 {
            return N7;
        }
        if singles.len() >= 3 {
            return N8;
        }
        if triple {
            return N9;
        }
        return NS;
    }

    if atom.charge < 0 {
        return N14;
    }

    if (1..=3).contains(&h) {
        return N10;
    }
    if h == 0 {
        let aliphatic_singles = singles.iter().filter(|n| n.aliphatic()).count();
        if singles.len() == 4 && aliphatic_singles == 4 {
            return N13;
        }
        if doubles.len() == 1
            && doubles[0].aliphatic()
            && singles.len() == 2
            && aliphatic_singles >= 1
        {
            return N13;
        }
        if doubles.len() == 2 {
            let to_carbon = doubles.iter().any(|n| n.element == 6);
            let to_nitrogen = doubles.iter().any(|n| n.element == 7);
            if to_carbon && to_nitrogen {
                return N13;
            }
            if to_nitrogen && doubles.iter().any(|n| mol.atoms[n.index].charge < 0) {
                return N14;
            }
        }
        if triple {
            return N14;
        }
    }
    NS
}

fn oxygen(mol: &Molecule, i: usize) -> AtomType {
    use AtomType::*;
    let atom = &mol.atoms[i];
    if atom.aromatic {
        return O1;
    }

    let h = mol.total_h(i);
    let heavy = heavy_neighbors(mol, i);
    if h == 1 || h == 2 {
        return O2;
    }

    let singles: Vec<&Neighbor> = heavy.iter().filter(|n| n.single()).collect();
    if singles.len() == 2 {
        return if singles.iter().all(|n| n.aliphatic()) {
            O3
        } else {
            O4
        };
    }

    if heavy.iter().any(|n| n.double() && matches!(n.element, 7 | 8)) {
        return O5;
    }
    if atom.charge < 0 && heavy.len() == 1 {
        let n = heavy[0];
        return match n.element {
            7 => O5,
            16 => O6,
            6 if carbonyl_carbon(mol, n.index, i) => O12,
            _ => O7,
        };
    }

    let Some(carbon) = heavy.iter().find(|n| n.double() && n.element == 6) else {
        return OS;
    };
    if carbon.aromatic {
        return O8;
    }
    carbonyl_oxygen(mol, carbon.index, i)
}

/// Whether `carbon` has a double bond to an oxygen other than `except`.
fn carbonyl_carbon(mol: &Molecule, carbon: usize, except: usize) -> bool {
    heavy_neighbors(mol, carbon)
        .iter()
        .any(|n| n.index != except && n.element == 8 && n.double())
}

/// O9 to O11: a carbonyl oxygen, typed by what else sits on its carbon.
fn carbonyl_oxygen(mol: &Molecule, carbon: usize, oxygen: usize) -> AtomType {
    use AtomType::*;
    let h = mol.total_h(carbon);
    let others: Vec<Neighbor> = heavy_neighbors(mol, carbon)
        .into_iter()
        .filter(|n| n.index != oxygen)
        .collect();

    let aliphatic_carbon = others.iter().any(|n| n.aliphatic() && n.element == 6);
    let all_aliphatic = others.iter().all(|n| n.aliphatic());
    let aromatic = others.iter().any(|n| n.aromatic);
    let carbon_neighbor = others.iter().any(|n| n.element == 6);

    if h == 2 {
        return O9;
    }
    if h == 1
        && others.len() == 1
        && others[0].aliphatic()
        && matches!(others[0].element, 6 | 7 | 8)
    {
        return O9;
    }
    if others.len() == 2 && aliphatic_carbon && all_aliphatic {
        return O9;
    }
    if others.len() == 1 && others[0].double() && others[0].element == 8 {
        // carbon dioxide
        return O9;
    }
    if h == 1 && others.len() == 1 && others[0].aromatic && others[0].element == 6 {
        return O10;
    }
    if others.len() == 2 && aromatic && carbon_neighbor {
        return O10;
    }
    if others.len() == 2 && !carbon_neighbor {
        return O11;
    }
    OS
}

/// Type of a hydrogen bonded to `parent`; `None` for a lone hydrogen.
pub fn hydrogen_type(mol: &Molecule, parent: Option<usize>) -> AtomType {
    use AtomType::*;
    let Some(parent) = parent else {
        return HS;
    };
    match mol.atoms[parent].element {
        1 | 6 => H1,
        7 => H3,
        8 => hydroxyl_hydrogen(mol, parent),
        _ => H2,
    }
}

fn hydroxyl_hydrogen(mol: &Molecule, oxygen: usize) -> AtomType {
    use AtomType::*;
    // the oxygen's partner, other than hydrogens
    let partner = heavy_neighbors(mol, oxygen).into_iter().next();
    let Some(partner) = partner else {
        // water
        return if mol.total_h(oxygen) >= 2 { H2 } else { HS };
    };

    match partner.element {
        6 if partner.aromatic => H2,
        6 => {
            let connections = mol.heavy_degree(partner.index) + mol.total_h(partner.index);
            if connections == 4 {
                return H2;
            }
            let unsaturated = heavy_neighbors(mol, partner.index)
                .iter()
                .any(|n| n.double() && matches!(n.element, 6 | 7 | 8 | 16));
            if unsaturated {
                H4
            } else {
                HS
            }
        }
        7 => H3,
        8 | 16 => H4,
        _ => H2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::parse_smiles;

    fn crippen(smiles: &str) -> f64 {
        let mol = parse_smiles(smiles).unwrap();
        logp(&mol).unwrap_or_else(|| panic!("{smiles} has an untyped atom"))
    }

    fn heavy_type(smiles: &str, atom: usize) -> Option<AtomType> {
        heavy_atom_type(&parse_smiles(smiles).unwrap(), atom)
    }

    #[test]
    fn test_reference_values() {
        let cases = [
            ("c1ccccc1", 1.6866),
            ("CCO", -0.0014),
            ("CC(=O)Oc1ccccc1C(=O)O", 1.3101),
            ("c1ccncc1", 1.0816),
            ("Oc1ccccc1", 1.3922),
            ("CC(=O)O", 0.0909),
            ("Nc1ccccc1", 1.2688),
            // tamoxifen
            ("CCC(=C(c1ccccc1)c1ccc(OCCN(C)C)cc1)c1ccccc1", 5.9961),
            // imatinib
            ("Cc1ccc(NC(=O)c2ccc(CN3CCN(C)CC3)cc2)cc1Nc1nccc(-c2cccnc2)n1", 4.5903),
        ];
        for (smiles, expected) in cases {
            let got = crippen(smiles);
            assert!((got - expected).abs() < 1e-3, "{smiles}: {got} != {expected}");
        }
    }

    #[test]
    fn test_aspirin_atom_types() {
        use AtomType::*;
        let smiles = "CC(=O)Oc1ccccc1C(=O)O";
        let expected = [C1, C5, O9, O4, C23, C18, C18, C18, C18, C21, C5, O10, O2];
        for (i, kind) in expected.into_iter().enumerate() {
            assert_eq!(heavy_type(smiles, i), Some(kind), "atom {i}");
        }
    }

    #[test]
    fn test_nitrogen_types() {
        use AtomType::*;
        assert_eq!(heavy_type("CN", 1), Some(N1));
        assert_eq!(heavy_type("CNC", 1), Some(N2));
        assert_eq!(heavy_type("CN(C)C", 1), Some(N7));
        assert_eq!(heavy_type("CC#N", 2), Some(N9));
        assert_eq!(heavy_type("C[NH3+]", 1), Some(N10));
        assert_eq!(heavy_type("c1ccccc1[N+](=O)[O-]", 6), Some(N13));
        assert_eq!(heavy_type("c1ccccc1[N+](=O)[O-]", 7), Some(O5));
        assert_eq!(heavy_type("c1cc[nH]c1", 3), Some(N11));
    }

    #[test]
    fn test_hydrogen_types() {
        use AtomType::*;
        let acid = parse_smiles("CC(=O)O").unwrap();
        assert_eq!(hydrogen_type(&acid, Some(3)), H4);
        assert_eq!(hydrogen_type(&acid, Some(0)), H1);
        let ethanol = parse_smiles("CCO").unwrap();
        assert_eq!(hydrogen_type(&ethanol, Some(2)), H2);
        let amine = parse_smiles("CN").unwrap();
        assert_eq!(hydrogen_type(&amine, Some(1)), H3);
    }

    #[test]
    fn test_explicit_hydrogen_nodes_match_implicit() {
        let explicit = crippen("[H]OCC");
        let implicit = crippen("OCC");
        assert!((explicit - implicit).abs() < 1e-9);
    }

    #[test]
    fn test_untyped_elements() {
        assert!(logp(&parse_smiles("F[Xe]F").unwrap()).is_none());
        assert!(logp(&parse_smiles("[U]").unwrap()).is_none());
        assert!(logp(&parse_smiles("C[Si](C)(C)C").unwrap()).is_some());
        assert!(logp(&parse_smiles("OB(O)c1ccccc1").unwrap()).is_some());
    }

    #[test]
    fn test_wildcard_contributes_nothing() {
        // the methyl is typed C27, next to an atom that is neither C nor polar
        let expected = AtomType::C27.logp() + 3.0 * AtomType::H1.logp();
        assert!((crippen("*C") - expected).abs() < 1e-9);
    }
}
