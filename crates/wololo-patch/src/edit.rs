use crate::{PatchContext, PatchError, RecordKind, Result};
use wololo_dat::{DatFile, EffectID, Tech, TechID, Unit, UnitTypeID};

/// Apply a change to the given unit types, in every civilization that has them.
///
/// Returns the number of units changed.
pub fn edit_units<I>(dat: &mut DatFile, ids: I, mut edit: impl FnMut(&mut Unit)) -> usize
where
    I: IntoIterator<Item = UnitTypeID>,
    I::IntoIter: Clone,
{
    let ids = ids.into_iter();
    let mut count = 0;
    for civ in &mut dat.civilizations {
        for id in ids.clone() {
            if let Some(unit) = civ.unit_mut(id) {
                edit(unit);
                count += 1;
            }
        }
    }
    count
}

/// Append copies of all commands of one effect to another.
///
/// Returns the number of commands appended.
pub fn append_commands(ctx: &mut PatchContext, from: EffectID, to: EffectID) -> Result<usize> {
    let commands = ctx.effect(from)?.commands.clone();
    let count = commands.len();
    ctx.effect_mut(to)?.commands.extend(commands);
    Ok(count)
}

/// Append a copy of an effect's command, changed to apply to another unit type.
pub fn push_retargeted(
    ctx: &mut PatchContext,
    effect_id: EffectID,
    index: usize,
    target: UnitTypeID,
) -> Result<()> {
    let target = i16::try_from(target)
        .map_err(|_| PatchError::missing(RecordKind::Unit, u16::from(target)))?;
    let effect = ctx.effect_mut(effect_id)?;
    let mut command = effect
        .commands
        .get(index)
        .cloned()
        .ok_or(PatchError::MissingCommand {
            effect: effect_id,
            index,
        })?;
    command.target_unit = target;
    effect.commands.push(command);
    Ok(())
}

/// Overwrite a tech with a copy of another, and return the copy for further changes.
pub fn copy_tech(ctx: &mut PatchContext, from: TechID, to: TechID) -> Result<&mut Tech> {
    let tech = ctx.tech(from)?.clone();
    let slot = ctx.tech_mut(to)?;
    *slot = tech;
    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use wololo_dat::EffectCommand;

    fn command(target_unit: i16, amount: f32) -> EffectCommand {
        EffectCommand {
            command_type: EffectCommand::ADD_ATTRIBUTE,
            target_unit,
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn edits_units_in_every_civilization() {
        let mut dat = fixtures::dat(3, &[527, 528], 0, 0);
        dat.civilizations[1].units[528] = None;
        let count = edit_units(&mut dat, [527, 528, 653].map(UnitTypeID::from), |unit| {
            unit.hero_mode = 96;
        });
        assert_eq!(count, 5);
        assert_eq!(dat.unit(1.into(), 527.into()).map(|u| u.hero_mode), Some(96));
    }

    #[test]
    fn appends_commands() -> anyhow::Result<()> {
        let mut ctx = PatchContext::new(fixtures::dat(0, &[], 3, 0));
        ctx.dat.effects[0].commands = vec![command(-1, 1.0), command(-1, 2.0)];
        ctx.dat.effects[2].commands = vec![command(4, 3.0)];
        assert_eq!(append_commands(&mut ctx, 0.into(), 2.into())?, 2);
        let amounts: Vec<f32> = ctx.dat.effects[2].commands.iter().map(|c| c.amount).collect();
        assert_eq!(amounts, vec![3.0, 1.0, 2.0]);
        assert_eq!(ctx.dat.effects[0].commands.len(), 2);
        assert!(append_commands(&mut ctx, 0.into(), 3.into()).is_err());
        Ok(())
    }

    #[test]
    fn retargets_a_copy() -> anyhow::Result<()> {
        let mut ctx = PatchContext::new(fixtures::dat(0, &[], 1, 0));
        ctx.dat.effects[0].commands = vec![command(550, 1.0), command(280, 2.0)];
        push_retargeted(&mut ctx, 0.into(), 1, 948.into())?;
        let last = ctx.dat.effects[0].commands.last().cloned();
        assert_eq!(last, Some(command(948, 2.0)));
        assert!(matches!(
            push_retargeted(&mut ctx, 0.into(), 5, 948.into()),
            Err(PatchError::MissingCommand { index: 5, .. })
        ));
        Ok(())
    }

    #[test]
    fn copies_techs() -> anyhow::Result<()> {
        let mut ctx = PatchContext::new(fixtures::dat(0, &[], 0, 3));
        ctx.dat.techs[0].name = "Siege Onager".into();
        copy_tech(&mut ctx, 0.into(), 2.into())?.research_time = 0;
        assert_eq!(ctx.dat.techs[2].name, "Siege Onager");
        assert!(copy_tech(&mut ctx, 0.into(), 3.into()).is_err());
        Ok(())
    }
}
