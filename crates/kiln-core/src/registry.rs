//! Builtin atomic-mass registry.
//!
//! Read-only table of atomic masses (g/mol) for the nuclides a fuel-cycle
//! simulation routinely tracks: light isotopes, activation and fission
//! products, and the actinide inventory. Lookups for well-formed nuclides
//! missing from the table fall back to the mass number, so exotic members of
//! decay chains still participate numerically instead of failing.

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::debug;

use crate::constants::{AVOGADRO, GRAMS_PER_KG};
use crate::nuclide::Nuclide;

/// Atomic masses in g/mol, keyed by canonical nuclide id. AME-derived values
/// rounded to six decimals.
const ATOMIC_MASSES: &[(u32, f64)] = &[
    (10010000, 1.007825),
    (10020000, 2.014102),
    (10030000, 3.016049),
    (20030000, 3.016029),
    (20040000, 4.002602),
    (30060000, 6.015123),
    (30070000, 7.016003),
    (40090000, 9.012183),
    (50100000, 10.012937),
    (50110000, 11.009305),
    (60120000, 12.0),
    (60130000, 13.003355),
    (60140000, 14.003242),
    (70140000, 14.003074),
    (70150000, 15.000109),
    (80160000, 15.994915),
    (80170000, 16.999132),
    (80180000, 17.999160),
    (90190000, 18.998403),
    (110230000, 22.989769),
    (120240000, 23.985042),
    (130270000, 26.981538),
    (140280000, 27.976927),
    (150310000, 30.973762),
    (160320000, 31.972071),
    (170350000, 34.968853),
    (190390000, 38.963706),
    (200400000, 39.962591),
    (260560000, 55.934936),
    (270590000, 58.933194),
    (270600000, 59.933816),
    (280580000, 57.935342),
    (280600000, 59.930786),
    (290630000, 62.929598),
    (360830000, 82.914127),
    (360840000, 83.911498),
    (360850000, 84.912527),
    (370850000, 84.911790),
    (380880000, 87.905612),
    (380890000, 88.907451),
    (380900000, 89.907730),
    (390890000, 88.905840),
    (390900000, 89.907144),
    (390910000, 90.907298),
    (400900000, 89.904698),
    (400910000, 90.905640),
    (400920000, 91.905035),
    (400930000, 92.906470),
    (400940000, 93.906312),
    (400950000, 94.908040),
    (400960000, 95.908271),
    (410930000, 92.906373),
    (420950000, 94.905838),
    (420980000, 97.905404),
    (430990000, 98.906250),
    (440990000, 98.905930),
    (441010000, 100.905573),
    (451030000, 102.905494),
    (461050000, 104.905079),
    (471090000, 108.904756),
    (531270000, 126.904472),
    (531290000, 128.904984),
    (531310000, 130.906126),
    (541310000, 130.905084),
    (541320000, 131.904155),
    (541340000, 133.905393),
    (541350000, 134.907232),
    (541360000, 135.907214),
    (551330000, 132.905452),
    (551340000, 133.906719),
    (551350000, 134.905977),
    (551370000, 136.907089),
    (561340000, 133.904508),
    (561370000, 136.905827),
    (561380000, 137.905247),
    (571390000, 138.906356),
    (581400000, 139.905443),
    (581440000, 143.913653),
    (591410000, 140.907658),
    (591440000, 143.913311),
    (601430000, 142.909820),
    (601440000, 143.910093),
    (601450000, 144.912579),
    (611470000, 146.915145),
    (621490000, 148.917192),
    (621510000, 150.919939),
    (631530000, 152.921238),
    (631540000, 153.922987),
    (631550000, 154.922901),
    (641550000, 154.922630),
    (641570000, 156.923968),
    (822060000, 205.974466),
    (822070000, 206.975897),
    (822080000, 207.976653),
    (832090000, 208.980399),
    (842100000, 209.982874),
    (862220000, 222.017578),
    (882260000, 226.025410),
    (882280000, 228.031071),
    (892270000, 227.027752),
    (902280000, 228.028741),
    (902290000, 229.031763),
    (902300000, 230.033134),
    (902310000, 231.036304),
    (902320000, 232.038056),
    (902340000, 234.043601),
    (912310000, 231.035884),
    (912330000, 233.040247),
    (912340000, 234.043308),
    (922320000, 232.037156),
    (922330000, 233.039635),
    (922340000, 234.040952),
    (922350000, 235.043930),
    (922360000, 236.045568),
    (922370000, 237.048730),
    (922380000, 238.050788),
    (932370000, 237.048174),
    (932390000, 239.052939),
    (942380000, 238.049560),
    (942390000, 239.052164),
    (942400000, 240.053814),
    (942410000, 241.056853),
    (942420000, 242.058743),
    (952410000, 241.056829),
    (952420000, 242.059549),
    (952430000, 243.061381),
    (962420000, 242.058836),
    (962430000, 243.061389),
    (962440000, 244.062753),
    (962450000, 245.065491),
    (962460000, 246.067224),
];

static TABLE: LazyLock<HashMap<u32, f64>> =
    LazyLock::new(|| ATOMIC_MASSES.iter().copied().collect());

/// Atomic mass of a nuclide in g/mol.
///
/// Excited states resolve through their ground state (the isomeric mass
/// difference is far below the simulation's tolerance). Nuclides absent from
/// the table fall back to the mass number, logged once per call site at debug
/// level.
///
/// # Examples
///
/// ```
/// use kiln_core::nuclide::Nuclide;
/// use kiln_core::registry::atomic_mass_g_mol;
///
/// let u235 = Nuclide::parse("U-235").unwrap();
/// assert!((atomic_mass_g_mol(u235) - 235.0439).abs() < 1e-3);
///
/// // Not tabulated: falls back to A.
/// let fr221 = Nuclide::parse("Fr-221").unwrap();
/// assert_eq!(atomic_mass_g_mol(fr221), 221.0);
/// ```
pub fn atomic_mass_g_mol(nuclide: Nuclide) -> f64 {
    if let Some(&mass) = TABLE.get(&nuclide.id()) {
        return mass;
    }
    if let Some(&mass) = TABLE.get(&nuclide.ground_state().id()) {
        return mass;
    }
    debug!(%nuclide, "atomic mass not tabulated, using mass number");
    f64::from(nuclide.a())
}

/// Mass in kilograms of `atoms` atoms of `nuclide`.
pub fn mass_kg(nuclide: Nuclide, atoms: f64) -> f64 {
    atoms * atomic_mass_g_mol(nuclide) / AVOGADRO / GRAMS_PER_KG
}

/// Atom count equivalent to `kg` kilograms of `nuclide`.
pub fn atoms_of_kg(nuclide: Nuclide, kg: f64) -> f64 {
    kg * GRAMS_PER_KG / atomic_mass_g_mol(nuclide) * AVOGADRO
}
