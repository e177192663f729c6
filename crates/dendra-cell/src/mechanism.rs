//! Mechanism descriptions and the mechanism catalogue.

use dendra_core::Value;
use indexmap::IndexMap;
use std::fmt;

/// What a mechanism is: membrane density, point process, or reversal
/// potential provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MechanismKind {
    /// Distributed over membrane area; parameters are densities.
    Density,
    /// Attached at a point (a synapse); addressed by target index.
    Point,
    /// Computes an ion's reversal potential on demand.
    ReversalPotential,
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Density => write!(f, "density"),
            Self::Point => write!(f, "point"),
            Self::ReversalPotential => write!(f, "reversal potential"),
        }
    }
}

/// A mechanism instance request: a catalogue name plus parameter
/// overrides, in insertion order.
///
/// # Examples
///
/// ```
/// use dendra_cell::MechanismDesc;
///
/// let syn = MechanismDesc::new("expsyn").with("e", 0.1).with("tau", 0.2);
/// assert_eq!(syn.get("e"), Some(0.1));
/// assert_eq!(syn.get("gbar"), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MechanismDesc {
    name: String,
    values: IndexMap<String, Value>,
}

impl MechanismDesc {
    /// A description with no overrides.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    /// Catalogue name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set an override, builder style.
    pub fn with(mut self, param: impl Into<String>, value: Value) -> Self {
        self.set(param, value);
        self
    }

    /// Set an override in place.
    pub fn set(&mut self, param: impl Into<String>, value: Value) {
        self.values.insert(param.into(), value);
    }

    /// Look up an override.
    pub fn get(&self, param: &str) -> Option<Value> {
        self.values.get(param).copied()
    }

    /// All overrides in insertion order.
    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }
}

impl From<&str> for MechanismDesc {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MechanismDesc {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// How a mechanism interacts with one ion species.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IonDependency {
    /// Writes the internal concentration.
    pub write_int_concentration: bool,
    /// Writes the external concentration.
    pub write_ext_concentration: bool,
    /// Reads the reversal potential.
    pub read_reversal_potential: bool,
    /// Writes the reversal potential.
    pub write_reversal_potential: bool,
    /// Valence the mechanism was built for, if it insists on one.
    pub expected_valence: Option<i32>,
}

impl IonDependency {
    /// Dependency that only reads the reversal potential.
    pub fn reads_rev_pot() -> Self {
        Self {
            read_reversal_potential: true,
            ..Self::default()
        }
    }

    /// Dependency that writes the reversal potential.
    pub fn writes_rev_pot() -> Self {
        Self {
            write_reversal_potential: true,
            ..Self::default()
        }
    }

    /// Dependency that writes the internal concentration.
    pub fn writes_int_concentration() -> Self {
        Self {
            write_int_concentration: true,
            ..Self::default()
        }
    }
}

/// Catalogue entry for one mechanism.
#[derive(Clone, Debug, PartialEq)]
pub struct MechanismInfo {
    /// Mechanism kind.
    pub kind: MechanismKind,
    /// Declared parameters with their default values, in declaration
    /// order.
    pub parameters: IndexMap<String, Value>,
    /// Ion species the mechanism reads or writes.
    pub ions: IndexMap<String, IonDependency>,
}

impl MechanismInfo {
    /// An entry with no parameters and no ion dependencies.
    pub fn new(kind: MechanismKind) -> Self {
        Self {
            kind,
            parameters: IndexMap::new(),
            ions: IndexMap::new(),
        }
    }

    /// Declare a parameter with its default, builder style.
    pub fn with_parameter(mut self, name: impl Into<String>, default: Value) -> Self {
        self.parameters.insert(name.into(), default);
        self
    }

    /// Declare an ion dependency, builder style.
    pub fn with_ion(mut self, ion: impl Into<String>, dep: IonDependency) -> Self {
        self.ions.insert(ion.into(), dep);
        self
    }
}

/// Name → [`MechanismInfo`] lookup table.
///
/// The catalogue is read-only during a discretization build.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MechanismCatalogue {
    infos: IndexMap<String, MechanismInfo>,
}

impl MechanismCatalogue {
    /// An empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard catalogue: `hh`, `pas`, `expsyn` and `exp2syn` with
    /// their canonical defaults.
    pub fn standard() -> Self {
        let mut cat = Self::new();
        cat.insert(
            "hh",
            MechanismInfo::new(MechanismKind::Density)
                .with_parameter("gnabar", 0.12)
                .with_parameter("gkbar", 0.036)
                .with_parameter("gl", 0.0003)
                .with_parameter("el", -54.3)
                .with_ion("na", IonDependency::reads_rev_pot())
                .with_ion("k", IonDependency::reads_rev_pot()),
        );
        cat.insert(
            "pas",
            MechanismInfo::new(MechanismKind::Density)
                .with_parameter("g", 0.001)
                .with_parameter("e", -70.0),
        );
        cat.insert(
            "expsyn",
            MechanismInfo::new(MechanismKind::Point)
                .with_parameter("e", 0.0)
                .with_parameter("tau", 2.0),
        );
        cat.insert(
            "exp2syn",
            MechanismInfo::new(MechanismKind::Point)
                .with_parameter("e", 0.0)
                .with_parameter("tau1", 0.5)
                .with_parameter("tau2", 2.0),
        );
        cat
    }

    /// Register or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, info: MechanismInfo) {
        self.infos.insert(name.into(), info);
    }

    /// Look up an entry.
    pub fn info(&self, name: &str) -> Option<&MechanismInfo> {
        self.infos.get(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.infos.contains_key(name)
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.infos.keys().map(String::as_str)
    }
}
