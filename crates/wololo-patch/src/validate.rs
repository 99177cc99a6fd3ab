use crate::{PatchError, RecordKind, Result};
use wololo_dat::{DatFile, UnitTypeID};

fn check_unit(dat: &DatFile, id: UnitTypeID) -> Result<()> {
    if dat.has_unit(id) {
        Ok(())
    } else {
        Err(PatchError::missing(RecordKind::Unit, u16::from(id)))
    }
}

/// Check that every reference in the data file points at a record that exists.
///
/// Checks unit references in effect commands, the tech tree, task lists and dead units, tech
/// references in the tech tree, effect references in techs, and graphic references in units and
/// graphic deltas. Returns the first dangling reference found.
pub fn validate_references(dat: &DatFile) -> Result<()> {
    for effect in &dat.effects {
        for id in effect.commands.iter().flat_map(|command| command.unit_refs()) {
            match UnitTypeID::try_from(id) {
                Ok(id) => check_unit(dat, id)?,
                Err(_) => return Err(PatchError::missing(RecordKind::Unit, id)),
            }
        }
    }

    let mut result = Ok(());
    dat.tech_tree.for_each_unit_ref(|id| {
        if result.is_ok() {
            result = check_unit(dat, id);
        }
    });
    result?;
    let mut result = Ok(());
    dat.tech_tree.for_each_tech_ref(|id| {
        if result.is_ok() && dat.tech(id).is_none() {
            result = Err(PatchError::missing(RecordKind::Tech, u16::from(id)));
        }
    });
    result?;

    for tech in &dat.techs {
        if let Some(effect) = tech.effect_id {
            if dat.effect(effect).is_none() {
                return Err(PatchError::missing(RecordKind::Effect, u16::from(effect)));
            }
        }
    }

    for task in dat.task_lists.iter().flatten().flat_map(|tasks| tasks.iter()) {
        if let Some(id) = task.unit_id {
            check_unit(dat, id)?;
        }
    }

    for unit in dat.civilizations.iter().flat_map(|civ| civ.units()) {
        if let Some(dead) = unit.dead_unit_id {
            check_unit(dat, dead)?;
        }
        for graphic in unit.graphics() {
            if dat.graphic(graphic).is_none() {
                return Err(PatchError::missing(RecordKind::Graphic, u16::from(graphic)));
            }
        }
    }

    for graphic in dat.graphics.iter().flatten() {
        for delta in graphic.delta_graphics() {
            if dat.graphic(delta).is_none() {
                return Err(PatchError::missing(RecordKind::Graphic, u16::from(delta)));
            }
        }
    }

    log::debug!("all references in the data file resolve");
    Ok(())
}
