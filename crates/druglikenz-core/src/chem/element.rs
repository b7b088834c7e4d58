//! Element symbols and standard atomic weights.

/// Average mass of hydrogen, used for implicit hydrogens.
pub const HYDROGEN_MASS: f64 = 1.008;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub number: u8,
    pub symbol: &'static str,
    /// Standard atomic weight (average over natural isotopes).
    pub mass: f64,
}

const fn el(number: u8, symbol: &'static str, mass: f64) -> Element {
    Element {
        number,
        symbol,
        mass,
    }
}

static ELEMENTS: &[Element] = &[
    el(1, "H", 1.008),
    el(2, "He", 4.003),
    el(3, "Li", 6.941),
    el(4, "Be", 9.012),
    el(5, "B", 10.812),
    el(6, "C", 12.011),
    el(7, "N", 14.007),
    el(8, "O", 15.999),
    el(9, "F", 18.998),
    el(10, "Ne", 20.18),
    el(11, "Na", 22.99),
    el(12, "Mg", 24.305),
    el(13, "Al", 26.982),
    el(14, "Si", 28.086),
    el(15, "P", 30.974),
    el(16, "S", 32.065),
    el(17, "Cl", 35.453),
    el(18, "Ar", 39.948),
    el(19, "K", 39.098),
    el(20, "Ca", 40.078),
    el(21, "Sc", 44.956),
    el(22, "Ti", 47.867),
    el(23, "V", 50.942),
    el(24, "Cr", 51.996),
    el(25, "Mn", 54.938),
    el(26, "Fe", 55.845),
    el(27, "Co", 58.933),
    el(28, "Ni", 58.693),
    el(29, "Cu", 63.546),
    el(30, "Zn", 65.39),
    el(31, "Ga", 69.723),
    el(32, "Ge", 72.61),
    el(33, "As", 74.922),
    el(34, "Se", 78.96),
    el(35, "Br", 79.904),
    el(36, "Kr", 83.8),
    el(37, "Rb", 85.468),
    el(38, "Sr", 87.62),
    el(39, "Y", 88.906),
    el(40, "Zr", 91.224),
    el(41, "Nb", 92.906),
    el(42, "Mo", 95.94),
    el(43, "Tc", 98.0),
    el(44, "Ru", 101.07),
    el(45, "Rh", 102.906),
    el(46, "Pd", 106.42),
    el(47, "Ag", 107.868),
    el(48, "Cd", 112.411),
    el(49, "In", 114.818),
    el(50, "Sn", 118.71),
    el(51, "Sb", 121.76),
    el(52, "Te", 127.6),
    el(53, "I", 126.904),
    el(54, "Xe", 131.29),
    el(55, "Cs", 132.905),
    el(56, "Ba", 137.327),
    el(57, "La", 138.906),
    el(58, "Ce", 140.116),
    el(59, "Pr", 140.908),
    el(60, "Nd", 144.24),
    el(61, "Pm", 145.0),
    el(62, "Sm", 150.36),
    el(63, "Eu", 151.964),
    el(64, "Gd", 157.25),
    el(65, "Tb", 158.925),
    el(66, "Dy", 162.5),
    el(67, "Ho", 164.93),
    el(68, "Er", 167.26),
    el(69, "Tm", 168.934),
    el(70, "Yb", 173.04),
    el(71, "Lu", 174.967),
    el(72, "Hf", 178.49),
    el(73, "Ta", 180.948),
    el(74, "W", 183.84),
    el(75, "Re", 186.207),
    el(76, "Os", 190.23),
    el(77, "Ir", 192.217),
    el(78, "Pt", 195.078),
    el(79, "Au", 196.967),
    el(80, "Hg", 200.59),
    el(81, "Tl", 204.383),
    el(82, "Pb", 207.2),
    el(83, "Bi", 208.98),
    el(84, "Po", 209.0),
    el(85, "At", 210.0),
    el(86, "Rn", 222.0),
    el(87, "Fr", 223.0),
    el(88, "Ra", 226.0),
    el(89, "Ac", 227.0),
    el(90, "Th", 232.038),
    el(91, "Pa", 231.036),
    el(92, "U", 238.029),
    el(93, "Np", 237.0),
    el(94, "Pu", 244.0),
    el(95, "Am", 243.0),
    el(96, "Cm", 247.0),
    el(97, "Bk", 247.0),
    el(98, "Cf", 251.0),
    el(99, "Es", 252.0),
    el(100, "Fm", 257.0),
    el(101, "Md", 258.0),
    el(102, "No", 259.0),
    el(103, "Lr", 262.0),
    el(104, "Rf", 267.0),
    el(105, "Db", 268.0),
    el(106, "Sg", 269.0),
    el(107, "Bh", 270.0),
    el(108, "Hs", 269.0),
    el(109, "Mt", 278.0),
    el(110, "Ds", 281.0),
    el(111, "Rg", 282.0),
    el(112, "Cn", 285.0),
    el(113, "Nh", 286.0),
    el(114, "Fl", 289.0),
    el(115, "Mc", 290.0),
    el(116, "Lv", 293.0),
    el(117, "Ts", 294.0),
    el(118, "Og", 294.0),
];

pub fn by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

pub fn by_number(number: u8) -> Option<&'static Element> {
    let index = usize::from(number).checked_sub(1)?;
    ELEMENTS.get(index)
}

/// Atomic number used for the `*` wildcard atom. It has no mass.
pub const WILDCARD: u8 = 0;

/// Mass of a specific isotope, for isotope-labelled atoms like `[13C]`.
///
/// Common labels use their measured mass; anything else falls back to the
/// mass number.
pub fn isotope_mass(number: u8, mass_number: u16) -> f64 {
    match (number, mass_number) {
        (1, 1) => 1.00783,
        (1, 2) => 2.0141,
        (1, 3) => 3.01605,
        (6, 11) => 11.01143,
        (6, 12) => 12.0,
        (6, 13) => 13.00335,
        (6, 14) => 14.00324,
        (7, 15) => 15.00011,
        (8, 17) => 16.99913,
        (8, 18) => 17.99916,
        (9, 18) => 18.00094,
        (15, 32) => 31.97391,
        (16, 35) => 34.96903,
        (17, 36) => 35.96831,
        (53, 123) => 122.90559,
        (53, 125) => 124.90463,
        (53, 131) => 130.90613,
        _ => f64::from(mass_number),
    }
}

/// Allowed valences for atoms written without brackets, lowest first.
pub fn organic_valences(number: u8) -> Option<&'static [u8]> {
    match number {
        5 => Some(&[3]),
        6 => Some(&[4]),
        7 => Some(&[3, 5]),
        8 => Some(&[2]),
        15 => Some(&[3, 5]),
        16 => Some(&[2, 4, 6]),
        9 | 17 | 35 | 53 => Some(&[1]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_ways() {
        let cl = by_symbol("Cl").unwrap();
        assert_eq!(cl.number, 17);
        assert_eq!(by_number(17).unwrap().symbol, "Cl");
        assert!(by_symbol("Xx").is_none());
    }

    #[test]
    fn test_table_is_complete_and_indexed_by_number() {
        assert_eq!(ELEMENTS.len(), 118);
        for (i, e) in ELEMENTS.iter().enumerate() {
            assert_eq!(usize::from(e.number), i + 1);
        }
        assert!(by_number(WILDCARD).is_none());
        assert!(by_number(119).is_none());
    }

    #[test]
    fn test_heavy_and_rare_elements() {
        for symbol in ["W", "U", "La", "Eu", "Ir", "Os", "Po", "Rn", "Og"] {
            assert!(by_symbol(symbol).is_some(), "{symbol}");
        }
        assert_eq!(by_symbol("W").unwrap().number, 74);
        assert_eq!(by_number(92).unwrap().symbol, "U");
    }

    #[test]
    fn test_isotope_mass() {
        assert!((isotope_mass(6, 13) - 13.00335).abs() < 1e-9);
        assert!((isotope_mass(1, 2) - 2.0141).abs() < 1e-9);
        assert_eq!(isotope_mass(26, 57), 57.0);
    }

    #[test]
    fn test_organic_valences() {
        assert_eq!(organic_valences(16), Some(&[2u8, 4, 6][..]));
        assert!(organic_valences(26).is_none());
    }
}
