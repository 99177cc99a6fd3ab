use crate::{PatchError, RecordKind, Result};
use wololo_dat::{DatFile, UnitTypeID};

fn swap_id<T: PartialEq + Copy>(value: &mut T, a: T, b: T) {
    if *value == a {
        *value = b;
    } else if *value == b {
        *value = a;
    }
}

fn grow<T: Default>(slots: &mut Vec<T>, len: usize) {
    if slots.len() < len {
        slots.resize_with(len, Default::default);
    }
}

/// Exchange two unit types, in every civilization, and rewrite every reference to them.
///
/// Afterwards a reference to `a` points at `b` and vice versa, in effect commands, the tech tree,
/// task lists and dead unit IDs. Either slot may be empty.
pub fn swap_units(dat: &mut DatFile, a: UnitTypeID, b: UnitTypeID) -> Result<()> {
    if a == b {
        return Ok(());
    }
    let a_raw = i16::try_from(a).map_err(|_| PatchError::missing(RecordKind::Unit, u16::from(a)))?;
    let b_raw = i16::try_from(b).map_err(|_| PatchError::missing(RecordKind::Unit, u16::from(b)))?;
    let (a_index, b_index) = (usize::from(a), usize::from(b));
    let len = a_index.max(b_index) + 1;

    grow(&mut dat.task_lists, len);
    dat.task_lists.swap(a_index, b_index);
    for civ in &mut dat.civilizations {
        grow(&mut civ.units, len);
        if let Some(unit) = &mut civ.units[a_index] {
            unit.set_id(b);
        }
        if let Some(unit) = &mut civ.units[b_index] {
            unit.set_id(a);
        }
        civ.units.swap(a_index, b_index);
    }

    for effect in &mut dat.effects {
        for command in &mut effect.commands {
            for id in command.unit_refs_mut() {
                swap_id(id, a_raw, b_raw);
            }
        }
    }

    dat.tech_tree
        .for_each_unit_ref_mut(|id| swap_id(id, a, b));

    for civ in &mut dat.civilizations {
        for unit in civ.units_mut() {
            if let Some(dead) = &mut unit.dead_unit_id {
                swap_id(dead, a, b);
            }
        }
    }

    for tasks in dat.task_lists.iter_mut().flatten() {
        for task in tasks.iter_mut() {
            if let Some(id) = &mut task.unit_id {
                swap_id(id, a, b);
            }
        }
    }

    log::debug!("swapped units {} and {}", a, b);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use wololo_dat::{
        EffectCommand, Task, TaskList, TechTreeBuilding, TechTreeDependency, TechTreeUnit,
    };

    fn sample() -> DatFile {
        let mut dat = fixtures::dat(2, &[4, 83, 1001], 1, 0);
        for civ in &mut dat.civilizations {
            if let Some(villager) = civ.unit_mut(83.into()) {
                villager.dead_unit_id = Some(1001.into());
            }
            if let Some(organ_gun) = civ.unit_mut(1001.into()) {
                organ_gun.name = "Organ Gun".into();
                organ_gun.dead_unit_id = Some(106.into());
            }
        }
        dat.effects[0].commands = vec![
            EffectCommand {
                command_type: EffectCommand::UPGRADE_UNIT,
                target_unit: 1001,
                unit_class: 106,
                ..Default::default()
            },
            EffectCommand {
                command_type: EffectCommand::ENABLE_UNIT,
                target_unit: 106,
                ..Default::default()
            },
            EffectCommand {
                command_type: EffectCommand::DISABLE_TECH,
                amount: 1001.0,
                target_unit: 1001,
                ..Default::default()
            },
        ];
        dat.tech_tree.buildings.push(TechTreeBuilding {
            building_id: 82.into(),
            dependent_units: vec![1001.into()],
            prerequisites: vec![TechTreeDependency::Unit(106.into())],
            ..Default::default()
        });
        dat.tech_tree.units.push(TechTreeUnit {
            unit_id: 1001.into(),
            building: 82.into(),
            ..Default::default()
        });
        dat.set_task_list(
            83.into(),
            Some(TaskList::from(vec![Task {
                unit_id: Some(1001.into()),
                ..Default::default()
            }])),
        );
        dat.set_task_list(1001.into(), Some(TaskList::from(vec![Task::default(); 3])));
        dat
    }

    #[test]
    fn swaps_records_and_references() -> anyhow::Result<()> {
        let mut dat = sample();
        swap_units(&mut dat, 1001.into(), 106.into())?;

        for civ in &dat.civilizations {
            let moved = civ.unit(106.into()).expect("unit was moved");
            assert_eq!(moved.name, "Organ Gun");
            assert_eq!(moved.id, UnitTypeID::from(106));
            assert_eq!(moved.base_id, UnitTypeID::from(106));
            assert_eq!(moved.dead_unit_id, Some(1001.into()));
            assert!(civ.unit(1001.into()).is_none());
            assert_eq!(
                civ.unit(83.into()).and_then(|u| u.dead_unit_id),
                Some(106.into())
            );
        }

        let commands = &dat.effects[0].commands;
        assert_eq!((commands[0].target_unit, commands[0].unit_class), (106, 1001));
        assert_eq!(commands[1].target_unit, 1001);
        // Not a unit command.
        assert_eq!(commands[2].target_unit, 1001);

        assert_eq!(dat.tech_tree.buildings[0].dependent_units, vec![106.into()]);
        assert_eq!(
            dat.tech_tree.buildings[0].prerequisites,
            vec![TechTreeDependency::Unit(1001.into())]
        );
        assert_eq!(dat.tech_tree.units[0].unit_id, UnitTypeID::from(106));

        assert_eq!(dat.task_list(106.into()).map(|t| t.len()), Some(3));
        assert!(dat.task_list(1001.into()).is_none());
        assert_eq!(
            dat.task_list(83.into()).and_then(|t| t[0].unit_id),
            Some(106.into())
        );
        Ok(())
    }

    #[test]
    fn swapping_twice_restores_the_original() -> anyhow::Result<()> {
        let original = sample();
        let mut dat = original.clone();
        swap_units(&mut dat, 1001.into(), 106.into())?;
        swap_units(&mut dat, 106.into(), 1001.into())?;
        assert_eq!(dat, original);
        Ok(())
    }
}
