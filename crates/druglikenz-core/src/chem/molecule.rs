//! Molecular graph.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Valence consumed on an atom by this bond. Aromatic bonds count as
    /// one sigma bond; the pi electron is accounted for per atom.
    pub fn valence(self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// Atomic number.
    pub element: u8,
    pub charge: i8,
    pub isotope: Option<u16>,
    pub aromatic: bool,
    /// Hydrogens not present as graph nodes.
    pub implicit_h: u8,
    /// Written in `[...]` form, so `implicit_h` was given explicitly.
    pub bracket: bool,
}

impl Atom {
    pub fn is_hydrogen(&self) -> bool {
        self.element == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn other(&self, atom: usize) -> usize {
        if self.begin == atom {
            self.end
        } else {
            self.begin
        }
    }
}

#[derive(Debug, Clone)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    /// adjacency[atom] = (neighbor, bond index)
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (i, bond) in bonds.iter().enumerate() {
            adjacency[bond.begin].push((bond.end, i));
            adjacency[bond.end].push((bond.begin, i));
        }
        Molecule {
            atoms,
            bonds,
            adjacency,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        &self.adjacency[atom]
    }

    /// Number of bonded non-hydrogen neighbors.
    pub fn heavy_degree(&self, atom: usize) -> usize {
        self.adjacency[atom]
            .iter()
            .filter(|&&(n, _)| !self.atoms[n].is_hydrogen())
            .count()
    }

    /// Implicit hydrogens plus hydrogen atoms bonded in the graph.
    pub fn total_h(&self, atom: usize) -> usize {
        let explicit = self.adjacency[atom]
            .iter()
            .filter(|&&(n, _)| self.atoms[n].is_hydrogen())
            .count();
        self.atoms[atom].implicit_h as usize + explicit
    }

    /// Sum of bond valences plus implicit hydrogens.
    pub fn valence(&self, atom: usize) -> usize {
        let bonded: usize = self.adjacency[atom]
            .iter()
            .map(|&(_, b)| usize::from(self.bonds[b].order.valence()))
            .sum();
        bonded + self.atoms[atom].implicit_h as usize
    }

    /// Orders of bonds from `atom` to heavy neighbors.
    pub fn heavy_bond_orders(&self, atom: usize) -> impl Iterator<Item = BondOrder> + '_ {
        self.adjacency[atom]
            .iter()
            .filter(|&&(n, _)| !self.atoms[n].is_hydrogen())
            .map(|&(_, b)| self.bonds[b].order)
    }

    pub fn has_bond_of(&self, atom: usize, order: BondOrder) -> bool {
        self.adjacency[atom]
            .iter()
            .any(|&(_, b)| self.bonds[b].order == order)
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency[a]
            .iter()
            .find(|&&(n, _)| n == b)
            .map(|&(_, bond)| bond)
    }
}
