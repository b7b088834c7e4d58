//! SMILES reader.
//!
//! Covers the organic subset, bracket atoms (isotope, chirality marks,
//! hydrogen count, charge, atom class), branches, ring closures including
//! `%nn`, explicit and aromatic bonds, dot-separated fragments and the
//! `*` wildcard atom. Stereo marks are read and dropped.

use std::collections::{BTreeMap, HashSet};

use crate::chem::element::{self, organic_valences};
use crate::chem::molecule::{Atom, Bond, BondOrder, Molecule};
use crate::chem::ring;
use crate::chem::SmilesError;

/// Parse a SMILES string into a molecular graph with implicit hydrogens assigned.
pub fn parse_smiles(smiles: &str) -> Result<Molecule, SmilesError> {
    let mut reader = Reader::new(smiles);
    reader.read()?;
    reader.finish()
}

struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<Atom>,
    /// Input offset of each atom, for error messages.
    atom_pos: Vec<usize>,
    bonds: Vec<Bond>,
    /// (lower, higher) atom index of every bond added so far
    bonded: HashSet<(usize, usize)>,
    /// ring number -> (opening atom, bond symbol written at the opening)
    open_rings: BTreeMap<u16, (usize, Option<BondOrder>)>,
    branches: Vec<usize>,
    prev: Option<usize>,
    pending: Option<BondOrder>,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Reader {
            input: input.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            atom_pos: Vec::new(),
            bonds: Vec::new(),
            bonded: HashSet::new(),
            open_rings: BTreeMap::new(),
            branches: Vec::new(),
            prev: None,
            pending: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn error(&self, message: impl Into<String>) -> SmilesError {
        SmilesError::new(self.pos, message)
    }

    fn read(&mut self) -> Result<(), SmilesError> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    let anchor = self
                        .prev
                        .ok_or_else(|| self.error("branch without a preceding atom"))?;
                    self.pos += 1;
                    self.branches.push(anchor);
                }
                b')' => {
                    let anchor = self
                        .branches
                        .pop()
                        .ok_or_else(|| self.error("unmatched ')'"))?;
                    if self.pending.is_some() {
                        return Err(self.error("bond symbol before ')'"));
                    }
                    self.pos += 1;
                    self.prev = Some(anchor);
                }
                b'-' | b'=' | b'#' | b':' | b'/' | b'\\' => {
                    if self.pending.is_some() {
                        return Err(self.error("two bond symbols in a row"));
                    }
                    self.pending = Some(match ch {
                        b'=' => BondOrder::Double,
                        b'#' => BondOrder::Triple,
                        b':' => BondOrder::Aromatic,
                        _ => BondOrder::Single,
                    });
                    self.pos += 1;
                }
                b'.' => {
                    if self.pending.is_some() {
                        return Err(self.error("bond symbol before '.'"));
                    }
                    self.pos += 1;
                    self.prev = None;
                }
                b'%' => {
                    self.pos += 1;
                    let number = self.two_digit_ring_number()?;
                    self.ring_bond(number)?;
                }
                b'0'..=b'9' => {
                    self.pos += 1;
                    self.ring_bond(u16::from(ch - b'0'))?;
                }
                b'[' => self.bracket_atom()?,
                _ => self.organic_atom()?,
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<(), SmilesError> {
        let ch = self.input[self.pos];
        let next = self.input.get(self.pos + 1).copied();
        let (element, aromatic, len) = match (ch, next) {
            (b'C', Some(b'l')) => (17, false, 2),
            (b'B', Some(b'r')) => (35, false, 2),
            (b'B', _) => (5, false, 1),
            (b'C', _) => (6, false, 1),
            (b'N', _) => (7, false, 1),
            (b'O', _) => (8, false, 1),
            (b'P', _) => (15, false, 1),
            (b'S', _) => (16, false, 1),
            (b'F', _) => (9, false, 1),
            (b'I', _) => (53, false, 1),
            (b'*', _) => (element::WILDCARD, false, 1),
            (b'b', _) => (5, true, 1),
            (b'c', _) => (6, true, 1),
            (b'n', _) => (7, true, 1),
            (b'o', _) => (8, true, 1),
            (b'p', _) => (15, true, 1),
            (b's', _) => (16, true, 1),
            _ => {
                return Err(self.error(format!("unexpected character '{}'", ch as char)));
            }
        };
        let start = self.pos;
        self.pos += len;
        self.push_atom(
            Atom {
                element,
                charge: 0,
                isotope: None,
                aromatic,
                implicit_h: 0,
                bracket: false,
            },
            start,
        )
    }

    fn bracket_atom(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        self.pos += 1;

        let isotope = match self.number() {
            Some(n) => Some(
                u16::try_from(n).map_err(|_| self.error("isotope out of range"))?,
            ),
            None => None,
        };
        let (element, aromatic) = self.bracket_symbol()?;

        // chirality: @, @@, @TH1, @SP2, ...
        if self.peek() == Some(b'@') {
            while self.peek() == Some(b'@') {
                self.pos += 1;
            }
            let class = self.input.get(self.pos..self.pos + 2);
            if matches!(class, Some(b"TH" | b"AL" | b"SP" | b"TB" | b"OH")) {
                self.pos += 2;
                self.number();
            }
        }

        let mut implicit_h = 0u8;
        if self.peek() == Some(b'H') {
            self.pos += 1;
            let count = self.number().unwrap_or(1);
            implicit_h =
                u8::try_from(count).map_err(|_| self.error("hydrogen count out of range"))?;
        }

        let charge = self.charge();

        if self.peek() == Some(b':') {
            self.pos += 1;
            if self.number().is_none() {
                return Err(self.error("atom class without a number"));
            }
        }

        if self.peek() != Some(b']') {
            return Err(self.error("expected ']'"));
        }
        self.pos += 1;

        self.push_atom(
            Atom {
                element,
                charge,
                isotope,
                aromatic,
                implicit_h,
                bracket: true,
            },
            start,
        )
    }

    fn bracket_symbol(&mut self) -> Result<(u8, bool), SmilesError> {
        let first = self
            .peek()
            .ok_or_else(|| self.error("unterminated bracket atom"))?;

        if first.is_ascii_lowercase() {
            for (text, number) in [("se", 34u8), ("as", 33), ("te", 52)] {
                if self.input[self.pos..].starts_with(text.as_bytes()) {
                    self.pos += 2;
                    return Ok((number, true));
                }
            }
            let number = match first {
                b'b' => 5,
                b'c' => 6,
                b'n' => 7,
                b'o' => 8,
                b'p' => 15,
                b's' => 16,
                _ => return Err(self.error("unknown aromatic element")),
            };
            self.pos += 1;
            return Ok((number, true));
        }

        if first == b'*' {
            self.pos += 1;
            return Ok((element::WILDCARD, false));
        }
        if !first.is_ascii_uppercase() {
            return Err(self.error("expected an element symbol"));
        }

        // nothing valid after a symbol starts with a lowercase letter
        let len = match self.input.get(self.pos + 1) {
            Some(second) if second.is_ascii_lowercase() => 2,
            _ => 1,
        };
        let symbol = std::str::from_utf8(&self.input[self.pos..self.pos + len]).unwrap_or("?");
        let e = element::by_symbol(symbol)
            .ok_or_else(|| self.error(format!("unknown element '{symbol}'")))?;
        self.pos += len;
        Ok((e.number, false))
    }

    fn number(&mut self) -> Option<u32> {
        let mut value: Option<u32> = None;
        while let Some(c) = self.peek().filter(u8::is_ascii_digit) {
            let digit = u32::from(c - b'0');
            value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            self.pos += 1;
        }
        value
    }

    fn charge(&mut self) -> i8 {
        let sign: i8 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return 0,
        };
        let symbol = self.input[self.pos];
        self.pos += 1;
        if let Some(n) = self.number() {
            return sign * n.min(15) as i8;
        }
        let mut magnitude: i8 = 1;
        while self.peek() == Some(symbol) && magnitude < 15 {
            self.pos += 1;
            magnitude += 1;
        }
        sign * magnitude
    }

    fn two_digit_ring_number(&mut self) -> Result<u16, SmilesError> {
        match self.input.get(self.pos..self.pos + 2) {
            Some(&[a, b]) if a.is_ascii_digit() && b.is_ascii_digit() => {
                self.pos += 2;
                Ok(u16::from(a - b'0') * 10 + u16::from(b - b'0'))
            }
            _ => Err(self.error("expected two digits after '%'")),
        }
    }

    fn default_order(&self, a: usize, b: usize) -> BondOrder {
        if self.atoms[a].aromatic && self.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn push_atom(&mut self, atom: Atom, start: usize) -> Result<(), SmilesError> {
        let index = self.atoms.len();
        self.atoms.push(atom);
        self.atom_pos.push(start);
        match self.prev {
            Some(prev) => {
                let order = self
                    .pending
                    .take()
                    .unwrap_or_else(|| self.default_order(prev, index));
                self.add_bond(prev, index, order)?;
            }
            None if self.pending.is_some() => {
                return Err(SmilesError::new(start, "bond without a preceding atom"));
            }
            None => {}
        }
        self.prev = Some(index);
        Ok(())
    }

    fn ring_bond(&mut self, number: u16) -> Result<(), SmilesError> {
        let current = self
            .prev
            .ok_or_else(|| self.error("ring closure without a preceding atom"))?;

        match self.open_rings.remove(&number) {
            Some((opening, written)) => {
                let order = match (self.pending.take(), written) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(self.error(format!("conflicting bonds for ring {number}")));
                    }
                    (Some(order), _) | (None, Some(order)) => order,
                    (None, None) => self.default_order(opening, current),
                };
                self.add_bond(opening, current, order)
            }
            None => {
                let written = self.pending.take();
                self.open_rings.insert(number, (current, written));
                Ok(())
            }
        }
    }

    fn add_bond(&mut self, begin: usize, end: usize, order: BondOrder) -> Result<(), SmilesError> {
        if begin == end {
            return Err(self.error("atom bonded to itself"));
        }
        if !self.bonded.insert((begin.min(end), begin.max(end))) {
            return Err(self.error("duplicate bond"));
        }
        self.bonds.push(Bond { begin, end, order });
        Ok(())
    }

    fn finish(mut self) -> Result<Molecule, SmilesError> {
        let end = self.input.len();
        if let Some(number) = self.open_rings.keys().next() {
            return Err(SmilesError::new(end, format!("ring {number} is never closed")));
        }
        if !self.branches.is_empty() {
            return Err(SmilesError::new(end, "unclosed branch"));
        }
        if self.pending.is_some() {
            return Err(SmilesError::new(end, "dangling bond symbol"));
        }
        if self.atoms.is_empty() {
            return Err(SmilesError::new(end, "no atoms"));
        }

        self.assign_implicit_hydrogens()?;

        let atom_pos = self.atom_pos;
        let mut mol = Molecule::new(self.atoms, self.bonds);

        let ring_bonds = ring::ring_bonds(&mol);
        let in_ring = ring::ring_atoms(&mol, &ring_bonds);
        if let Some(i) = (0..mol.atom_count()).find(|&i| mol.atoms[i].aromatic && !in_ring[i]) {
            return Err(SmilesError::new(atom_pos[i], "aromatic atom outside a ring"));
        }

        // a bond joining two aromatic rings, as in biphenyl, is single
        for (bond, &cyclic) in mol.bonds.iter_mut().zip(&ring_bonds) {
            if bond.order == BondOrder::Aromatic && !cyclic {
                bond.order = BondOrder::Single;
            }
        }

        Ok(mol)
    }

    /// Fill in hydrogens for organic-subset atoms from their default valences.
    fn assign_implicit_hydrogens(&mut self) -> Result<(), SmilesError> {
        let mut used = vec![0usize; self.atoms.len()];
        for bond in &self.bonds {
            let v = usize::from(bond.order.valence());
            used[bond.begin] += v;
            used[bond.end] += v;
        }

        for (i, atom) in self.atoms.iter_mut().enumerate() {
            if atom.bracket {
                continue;
            }
            let Some(valences) = organic_valences(atom.element) else {
                continue;
            };
            let h = if atom.aromatic {
                // one valence goes to the pi system
                usize::from(valences[0])
                    .saturating_sub(1)
                    .saturating_sub(used[i])
            } else {
                let target = valences
                    .iter()
                    .map(|&v| usize::from(v))
                    .find(|&v| v >= used[i])
                    .ok_or_else(|| {
                        SmilesError::new(
                            self.atom_pos[i],
                            format!("valence {} is too high for this atom", used[i]),
                        )
                    })?;
                target - used[i]
            };
            atom.implicit_h = u8::try_from(h).unwrap_or(u8::MAX);
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn organic_chain() -> impl Strategy<Value = String> {
        let atoms = prop_oneof![Just("C"), Just("N"), Just("O"), Just("S"), Just("Cl")];
        proptest::collection::vec(atoms, 1..=20).prop_map(|parts| parts.join(""))
    }

    proptest! {
        #[test]
        fn parse_smiles_does_not_panic(s in "\\PC{0,80}") {
            let _ = parse_smiles(&s);
        }

        #[test]
        fn chains_parse_with_one_atom_per_symbol(smi in organic_chain()) {
            let expected = smi.matches(|c: char| c.is_ascii_uppercase()).count();
            if let Ok(mol) = parse_smiles(&smi) {
                prop_assert_eq!(mol.atom_count(), expected);
            }
        }
    }
}
