//! Default electrical parameters, ion data and global properties.

use crate::mechanism::{MechanismCatalogue, MechanismDesc};
use dendra_core::Value;
use indexmap::IndexMap;

/// Initial state of one ion species.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IonData {
    /// Initial internal concentration [mM].
    pub init_int_concentration: Value,
    /// Initial external concentration [mM].
    pub init_ext_concentration: Value,
    /// Initial reversal potential [mV].
    pub init_reversal_potential: Value,
}

/// Electrical defaults, either per cell (all optional, overriding the
/// global set) or global (expected to be complete).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CableParameters {
    /// Specific membrane capacitance [F/m²].
    pub membrane_capacitance: Option<Value>,
    /// Axial (bulk) resistivity [Ω·cm].
    pub axial_resistivity: Option<Value>,
    /// Per-ion initial state.
    pub ion_data: IndexMap<String, IonData>,
    /// Per-ion reversal potential provider.
    pub reversal_potential_method: IndexMap<String, MechanismDesc>,
}

impl CableParameters {
    /// An empty parameter set: everything falls through to the next
    /// level.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard parameter set: membrane capacitance 0.01 F/m²,
    /// axial resistivity 35.4 Ω·cm, and the canonical na/k/ca initial
    /// concentrations and reversal potentials.
    pub fn neuron_defaults() -> Self {
        let mut ion_data = IndexMap::new();
        ion_data.insert(
            "na".to_string(),
            IonData {
                init_int_concentration: 10.0,
                init_ext_concentration: 140.0,
                init_reversal_potential: 50.0,
            },
        );
        ion_data.insert(
            "k".to_string(),
            IonData {
                init_int_concentration: 54.4,
                init_ext_concentration: 2.5,
                init_reversal_potential: -77.0,
            },
        );
        ion_data.insert(
            "ca".to_string(),
            IonData {
                init_int_concentration: 5e-5,
                init_ext_concentration: 2.0,
                init_reversal_potential: 132.4579341637009,
            },
        );
        Self {
            membrane_capacitance: Some(0.01),
            axial_resistivity: Some(35.4),
            ion_data,
            reversal_potential_method: IndexMap::new(),
        }
    }
}

/// Properties shared by the whole cell population.
///
/// The catalogue is consulted (read-only) for every painted or placed
/// mechanism during a build; `ion_species` maps ion names to their
/// charge (valence); `coalesce_synapses` controls whether identical
/// co-located point mechanisms are folded into one instance.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalProperties {
    /// Mechanism lookup table.
    pub catalogue: MechanismCatalogue,
    /// Population-wide electrical defaults.
    pub default_parameters: CableParameters,
    /// Known ion species and their valence.
    pub ion_species: IndexMap<String, i32>,
    /// Fold identical co-located point mechanisms into multi-instances.
    pub coalesce_synapses: bool,
}

impl Default for GlobalProperties {
    fn default() -> Self {
        let mut ion_species = IndexMap::new();
        ion_species.insert("na".to_string(), 1);
        ion_species.insert("k".to_string(), 1);
        ion_species.insert("ca".to_string(), 2);
        Self {
            catalogue: MechanismCatalogue::standard(),
            default_parameters: CableParameters::neuron_defaults(),
            ion_species,
            coalesce_synapses: true,
        }
    }
}

impl GlobalProperties {
    /// The default property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ion species: its valence plus initial state.
    pub fn add_ion(
        &mut self,
        name: impl Into<String>,
        valence: i32,
        init_int_concentration: Value,
        init_ext_concentration: Value,
        init_reversal_potential: Value,
    ) {
        let name = name.into();
        self.ion_species.insert(name.clone(), valence);
        self.default_parameters.ion_data.insert(
            name,
            IonData {
                init_int_concentration,
                init_ext_concentration,
                init_reversal_potential,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neuron_defaults_complete() {
        let p = CableParameters::neuron_defaults();
        assert_eq!(p.membrane_capacitance, Some(0.01));
        assert_eq!(p.axial_resistivity, Some(35.4));
        assert_eq!(p.ion_data.get("na").unwrap().init_int_concentration, 10.0);
        assert_eq!(p.ion_data.get("k").unwrap().init_reversal_potential, -77.0);
        assert_eq!(p.ion_data.get("ca").unwrap().init_ext_concentration, 2.0);
    }

    #[test]
    fn add_ion_registers_both_tables() {
        let mut gprop = GlobalProperties::default();
        gprop.add_ion("cl", -1, 1.0, 1.0, 0.0);
        assert_eq!(gprop.ion_species.get("cl"), Some(&-1));
        assert!(gprop.default_parameters.ion_data.contains_key("cl"));
    }

    #[test]
    fn default_ion_valences() {
        let gprop = GlobalProperties::default();
        assert_eq!(gprop.ion_species.get("na"), Some(&1));
        assert_eq!(gprop.ion_species.get("ca"), Some(&2));
        assert!(gprop.coalesce_synapses);
    }
}
