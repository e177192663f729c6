//! Reference cells and the extended test catalogue.

use dendra_cell::{
    CableCell, IonDependency, Location, MechanismCatalogue, MechanismInfo, MechanismKind,
    Paintable, Placeable, Region, SomaCellBuilder,
};

/// A ball-and-stick cell: soma of diameter 12.6157 µm (500 µm² area)
/// with `hh`, one 200 µm dendrite of 1 µm diameter with `pas`, four
/// compartments.
pub fn make_ball_and_stick() -> CableCell {
    let mut builder = SomaCellBuilder::new(12.6157 / 2.0);
    builder
        .add_branch(0, 200.0, 0.5, 0.5, 4, "dend")
        .expect("soma is a valid parent");
    let mut cell = builder.make_cell();
    cell.paint("soma", "hh");
    cell.paint("dend", "pas");
    cell
}

/// The two-cell reference population.
///
/// Cell 0 is a ball-and-stick. Cell 1 is a soma (14 µm diameter) with
/// three dendrites meeting at a branch point, four compartments each,
/// heterogeneous membrane capacitance, bulk resistivity 90 Ω·cm, and a
/// current clamp at the end of each distal dendrite.
pub fn two_cell_system() -> Vec<CableCell> {
    let mut cells = vec![make_ball_and_stick()];

    let mut builder = SomaCellBuilder::new(7.0);
    let b1 = builder.add_branch(0, 200.0, 0.5, 0.5, 4, "dend").unwrap();
    let b2 = builder.add_branch(b1, 300.0, 0.4, 0.4, 4, "dend").unwrap();
    let b3 = builder.add_branch(b1, 180.0, 0.35, 0.35, 4, "dend").unwrap();
    let mut cell = builder.make_cell();

    cell.paint("soma", "hh");
    cell.paint("dend", "pas");

    cell.paint(Region::branch(b1), Paintable::MembraneCapacitance(0.017));
    cell.paint(Region::branch(b2), Paintable::MembraneCapacitance(0.013));
    cell.paint(Region::branch(b3), Paintable::MembraneCapacitance(0.018));

    cell.place(
        Location::new(b2, 1.0),
        Placeable::CurrentClamp {
            delay: 5.0,
            duration: 80.0,
            amplitude: 0.45,
        },
    )
    .unwrap();
    cell.place(
        Location::new(b3, 1.0),
        Placeable::CurrentClamp {
            delay: 40.0,
            duration: 10.0,
            amplitude: -0.2,
        },
    )
    .unwrap();

    cell.default_parameters.axial_resistivity = Some(90.0);

    cells.push(cell);
    cells
}

/// The standard catalogue extended with instrumentation mechanisms:
///
/// - `test_ca`: density mechanism writing the internal `ca`
///   concentration;
/// - `test_cl_valence`: density mechanism expecting chloride with
///   valence −1;
/// - `read_ea`, `read_eb`, `read_ec`: density mechanisms reading one
///   reversal potential;
/// - `write_ea`, `write_ec`: single-ion reversal potential providers;
/// - `write_eb_ec`: reversal potential provider writing ions `b` and
///   `c`.
pub fn test_catalogue() -> MechanismCatalogue {
    let mut cat = MechanismCatalogue::standard();
    cat.insert(
        "test_ca",
        MechanismInfo::new(MechanismKind::Density)
            .with_ion("ca", IonDependency::writes_int_concentration()),
    );
    cat.insert(
        "test_cl_valence",
        MechanismInfo::new(MechanismKind::Density).with_ion(
            "cl",
            IonDependency {
                expected_valence: Some(-1),
                ..IonDependency::default()
            },
        ),
    );
    for ion in ["a", "b", "c"] {
        cat.insert(
            format!("read_e{ion}"),
            MechanismInfo::new(MechanismKind::Density)
                .with_ion(ion, IonDependency::reads_rev_pot()),
        );
    }
    for ion in ["a", "c"] {
        cat.insert(
            format!("write_e{ion}"),
            MechanismInfo::new(MechanismKind::ReversalPotential)
                .with_ion(ion, IonDependency::writes_rev_pot()),
        );
    }
    cat.insert(
        "write_eb_ec",
        MechanismInfo::new(MechanismKind::ReversalPotential)
            .with_ion("b", IonDependency::writes_rev_pot())
            .with_ion("c", IonDependency::writes_rev_pot()),
    );
    cat
}
