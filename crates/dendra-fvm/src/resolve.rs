//! Parameter fall-through resolution: painted value, then cell default,
//! then global default.

use crate::error::FvmError;
use dendra_cell::{CableCell, CableParameters, Paintable, Region};
use dendra_core::Value;

/// Segments selected by `region`, failing on an empty selection.
pub(crate) fn region_segments_checked(
    cell: &CableCell,
    region: &Region,
) -> Result<Vec<usize>, FvmError> {
    let segments = cell.region_segments(region);
    if segments.is_empty() {
        return Err(FvmError::EmptyRegion {
            region: region.to_string(),
        });
    }
    Ok(segments)
}

fn region_covers(cell: &CableCell, region: &Region, seg: usize) -> bool {
    match region {
        Region::All => true,
        Region::Branch(id) => *id == seg,
        Region::Tagged(name) => cell.segment(seg).tag() == Some(name.as_str()),
    }
}

/// Last painted value matching `seg` selected by `pick`, if any.
fn painted_value<F>(cell: &CableCell, seg: usize, pick: F) -> Option<Value>
where
    F: Fn(&Paintable) -> Option<Value>,
{
    let mut found = None;
    for (region, prop) in cell.paints() {
        if let Some(v) = pick(prop) {
            if region_covers(cell, region, seg) {
                found = Some(v);
            }
        }
    }
    found
}

/// Specific membrane capacitance [F/m²] on segment `seg`.
pub(crate) fn membrane_capacitance(
    cell: &CableCell,
    seg: usize,
    global: &CableParameters,
) -> Result<Value, FvmError> {
    painted_value(cell, seg, |p| match p {
        Paintable::MembraneCapacitance(v) => Some(*v),
        _ => None,
    })
    .or(cell.default_parameters.membrane_capacitance)
    .or(global.membrane_capacitance)
    .ok_or(FvmError::MissingParameter {
        name: "membrane capacitance".into(),
    })
}

/// Axial resistivity [Ω·cm] on segment `seg`.
pub(crate) fn axial_resistivity(
    cell: &CableCell,
    seg: usize,
    global: &CableParameters,
) -> Result<Value, FvmError> {
    painted_value(cell, seg, |p| match p {
        Paintable::AxialResistivity(v) => Some(*v),
        _ => None,
    })
    .or(cell.default_parameters.axial_resistivity)
    .or(global.axial_resistivity)
    .ok_or(FvmError::MissingParameter {
        name: "axial resistivity".into(),
    })
}

/// Which initial ion quantity to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IonField {
    IntConcentration,
    ExtConcentration,
    ReversalPotential,
}

/// Initial ion value of `field` for `ion` on segment `seg`.
pub(crate) fn ion_value(
    cell: &CableCell,
    seg: usize,
    ion: &str,
    field: IonField,
    global: &CableParameters,
) -> Result<Value, FvmError> {
    let painted = painted_value(cell, seg, |p| match (field, p) {
        (IonField::IntConcentration, Paintable::InitIntConcentration { ion: i, value })
        | (IonField::ExtConcentration, Paintable::InitExtConcentration { ion: i, value })
        | (IonField::ReversalPotential, Paintable::InitReversalPotential { ion: i, value })
            if i == ion =>
        {
            Some(*value)
        }
        _ => None,
    });
    if let Some(v) = painted {
        return Ok(v);
    }
    let data = cell
        .default_parameters
        .ion_data
        .get(ion)
        .or_else(|| global.ion_data.get(ion))
        .ok_or_else(|| FvmError::MissingParameter {
            name: format!("initial data for ion '{ion}'"),
        })?;
    Ok(match field {
        IonField::IntConcentration => data.init_int_concentration,
        IonField::ExtConcentration => data.init_ext_concentration,
        IonField::ReversalPotential => data.init_reversal_potential,
    })
}
