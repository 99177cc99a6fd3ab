//! The data fixes WololoKingdoms applies to the converted data file.

use crate::{
    append_commands, copy_tech, edit_units, push_retargeted, swap_units, DatPatch, PatchContext,
    PatchError, RecordKind, Result, ARCHITECTURES,
};
use wololo_dat::{EffectCommand, EffectID, ResourceCost, UnitTypeID};

/// The fixes in the order they are applied.
///
/// Architectures are separated first, and unit IDs are moved last, since both the architecture
/// tables and the other fixes use HD Edition unit IDs.
pub fn default_patches() -> Vec<DatPatch> {
    vec![
        ARCHITECTURES,
        BERBERS_UT,
        DEMOSHIP,
        ETHIOPIANS_FREE_PIKE,
        DISABLE_NONWORKING_UNITS,
        CUTTING,
        AI900_UNIT_IDS,
    ]
}

/// Rewrite the Kasbah effect to use hero regeneration.
pub const BERBERS_UT: DatPatch = DatPatch {
    name: "berbers_ut",
    description: "Berbers unique technologies alternative",
    apply: berbers_ut,
};

fn berbers_ut(ctx: &mut PatchContext) -> Result<()> {
    const KASBAH: u16 = 608;
    const HERO_REGENERATION: i16 = 40;
    const HERO_TIMER: i16 = 45;

    let kasbah = ctx.effect_mut(KASBAH.into())?;
    let mut timers = Vec::with_capacity(kasbah.commands.len());
    for command in &mut kasbah.commands {
        command.command_type = EffectCommand::SET_ATTRIBUTE;
        command.attribute = HERO_REGENERATION;
        command.amount = 4.0;
        timers.push(EffectCommand {
            attribute: HERO_TIMER,
            ..command.clone()
        });
    }
    kasbah.commands.extend(timers);
    Ok(())
}

/// Make demolition ships explode through the hero mode flag.
pub const DEMOSHIP: DatPatch = DatPatch {
    name: "demoship",
    description: "Demolition ships not exploding fix",
    apply: demoship,
};

fn demoship(ctx: &mut PatchContext) -> Result<()> {
    const DETONATE: u8 = 96;
    let ids = [653, 527, 528].map(UnitTypeID::from);
    let count = edit_units(&mut ctx.dat, ids, |unit| unit.hero_mode = DETONATE);
    log::debug!("set hero mode on {} demolition units", count);
    Ok(())
}

/// Free tech effects only work from the civilization's tech tree effect.
pub const ETHIOPIANS_FREE_PIKE: DatPatch = DatPatch {
    name: "ethiopians_free_pike",
    description: "Ethiopians free pike/halbs upgrades not working fix",
    apply: ethiopians_free_pike,
};

fn ethiopians_free_pike(ctx: &mut PatchContext) -> Result<()> {
    const FREE_PIKE_HALB: u16 = 616;
    const ETHIOPIAN_TECH_TREE: u16 = 48;
    append_commands(ctx, FREE_PIKE_HALB.into(), ETHIOPIAN_TECH_TREE.into())?;
    Ok(())
}

/// Hide units that do not work in the scenario editor.
pub const DISABLE_NONWORKING_UNITS: DatPatch = DatPatch {
    name: "disable_nonworking_units",
    description: "Hide units in the scenario editor",
    apply: disable_nonworking_units,
};

fn disable_nonworking_units(ctx: &mut PatchContext) -> Result<()> {
    let ids = [1119, 1145, 1147, 1221]
        .into_iter()
        .chain(1224..=1401)
        .map(UnitTypeID::from);
    let count = edit_units(&mut ctx.dat, ids, |unit| unit.hidden_in_editor = true);
    log::debug!("hid {} units", count);
    Ok(())
}

/// Split the onager into a tree cutting and a non-cutting version, and add the techs that
/// choose between them per map.
pub const CUTTING: DatPatch = DatPatch {
    name: "cutting",
    description: "Option of non-cutting onagers and cutting tech per map",
    apply: cutting,
};

mod cutting {
    pub const ONAGER: u16 = 550;
    pub const CUTTING_ONAGER: u16 = 948;
    /// Task that lets onagers destroy trees.
    pub const CUTTING_TASK: usize = 4;
    /// Added to the string IDs of the non-cutting onager.
    pub const STRING_OFFSET: i32 = 205;

    pub const ONAGER_EFFECT: u16 = 247;
    pub const ONAGER_CUTTING_EFFECT: u16 = 308;
    pub const DISABLING_EFFECT: u16 = 309;
    pub const SIEGE_ONAGER_EFFECT: u16 = 320;
    pub const TURKS_TECH_TREE: u16 = 263;
    pub const HUNS_TECH_TREE: u16 = 448;
    pub const CHEMISTRY: u16 = 47;
    pub const FUROR_CELTICA: u16 = 239;
    pub const KOREAN_TEAM_BONUS: u16 = 505;
    pub const SHINKICHON: u16 = 506;

    pub const CUTTING_RESEARCH: u16 = 152;
    pub const AUTO_ONAGER_CUTTING: u16 = 153;
    pub const ONAGER_CUTTING: u16 = 154;
    pub const CUTTING_DISABLER: u16 = 155;
    pub const SIEGE_ONAGER: u16 = 320;
    pub const DISABLER_TEMPLATE: u16 = 332;
    pub const ONAGER_TECH: i16 = 257;
    pub const DARK_AGE: i16 = 101;
}

fn cutting(ctx: &mut PatchContext) -> Result<()> {
    use self::cutting::*;

    let onager = UnitTypeID::from(ONAGER);
    let cutting_onager = UnitTypeID::from(CUTTING_ONAGER);

    let tasks = ctx
        .dat
        .task_list(onager)
        .cloned()
        .ok_or_else(|| PatchError::missing(RecordKind::Task, ONAGER))?;
    if tasks.len() <= CUTTING_TASK {
        return Err(PatchError::missing(RecordKind::Task, ONAGER));
    }
    ctx.dat.set_task_list(cutting_onager, Some(tasks));
    if let Some(tasks) = ctx.dat.task_list_mut(onager) {
        tasks.remove(CUTTING_TASK);
    }

    let mut copied = 0;
    for civ in &mut ctx.dat.civilizations {
        let mut copy = match civ.unit(onager) {
            Some(unit) => unit.clone(),
            None => continue,
        };
        copy.set_id(cutting_onager);
        civ.set_unit(copy);
        if let Some(unit) = civ.unit_mut(onager) {
            unit.blast_attack_level = 2;
            unit.creation_string_id += STRING_OFFSET;
            unit.help_string_id += STRING_OFFSET;
            unit.name_string_id += STRING_OFFSET;
        }
        copied += 1;
    }
    if copied == 0 {
        return Err(PatchError::missing(RecordKind::Unit, ONAGER));
    }

    let onager_effect = EffectID::from(ONAGER_EFFECT);
    let mut command = ctx
        .effect(onager_effect)?
        .commands
        .first()
        .cloned()
        .ok_or(PatchError::MissingCommand {
            effect: onager_effect,
            index: 0,
        })?;
    fn push(ctx: &mut PatchContext, effects: &[u16], command: &EffectCommand) -> Result<()> {
        for &effect in effects {
            ctx.effect_mut(effect.into())?.commands.push(command.clone());
        }
        Ok(())
    }
    command.unit_class = CUTTING_ONAGER as i16;
    push(ctx, &[ONAGER_CUTTING_EFFECT], &command)?;
    command.target_unit = ONAGER as i16;
    push(ctx, &[ONAGER_CUTTING_EFFECT], &command)?;
    ctx.effect_mut(ONAGER_CUTTING_EFFECT.into())?.name = "Onager Cutting Tech".into();
    command.target_unit = CUTTING_ONAGER as i16;
    push(ctx, &[SIEGE_ONAGER_EFFECT], &command)?;

    command.command_type = EffectCommand::DISABLE_TECH;
    command.amount = f32::from(CUTTING_RESEARCH);
    push(ctx, &[DISABLING_EFFECT, TURKS_TECH_TREE, HUNS_TECH_TREE], &command)?;
    command.amount = f32::from(ONAGER_CUTTING);
    push(ctx, &[DISABLING_EFFECT, TURKS_TECH_TREE, HUNS_TECH_TREE], &command)?;
    command.amount = f32::from(AUTO_ONAGER_CUTTING);
    push(ctx, &[TURKS_TECH_TREE, HUNS_TECH_TREE], &command)?;

    // Bonuses that apply to the onager also apply to the cutting onager.
    for (effect, index) in [
        (CHEMISTRY, 66),
        (FUROR_CELTICA, 0),
        (KOREAN_TEAM_BONUS, 0),
        (SHINKICHON, 0),
        (SHINKICHON, 1),
    ] {
        push_retargeted(ctx, effect.into(), index, cutting_onager)?;
    }

    let research = copy_tech(ctx, SIEGE_ONAGER.into(), CUTTING_RESEARCH.into())?;
    research.required_techs[1] = ONAGER_TECH;
    research.required_tech_count = 2;
    research.effect_id = None;
    research.button_id = 10;
    research.icon_id = 5;
    research.name = "Cutting Research".into();
    research.description_string_id = 8440;
    research.help_string_id = 107_440;
    research.name_string_id = 7440;
    research.tech_tree_string_id = 157_440;

    let auto = copy_tech(ctx, SIEGE_ONAGER.into(), AUTO_ONAGER_CUTTING.into())?;
    auto.research_time = 0;
    auto.research_location = -1;
    auto.effect_id = Some(ONAGER_CUTTING_EFFECT.into());
    auto.resource_costs[0] = ResourceCost::FREE;
    auto.resource_costs[1] = ResourceCost::FREE;
    auto.name = "Auto Onager Cutting".into();
    auto.description_string_id = 0;
    auto.name_string_id = 0;

    let manual = copy_tech(ctx, AUTO_ONAGER_CUTTING.into(), ONAGER_CUTTING.into())?;
    manual.required_techs[0] = CUTTING_RESEARCH as i16;
    manual.name = "Onager Cutting".into();

    let disabler = copy_tech(ctx, DISABLER_TEMPLATE.into(), CUTTING_DISABLER.into())?;
    disabler.effect_id = Some(DISABLING_EFFECT.into());
    disabler.name = "Cutting Research Disabler".into();
    disabler.required_techs[0] = DARK_AGE;
    disabler.required_tech_count = 1;

    log::debug!("split onager into {} and {} for {} civilizations", onager, cutting_onager, copied);
    Ok(())
}

/// Move units with IDs above 899 to IDs the AI can use.
pub const AI900_UNIT_IDS: DatPatch = DatPatch {
    name: "ai900_unit_ids",
    description: "AI can't use unit id over 900 workaround",
    apply: ai900_unit_ids,
};

/// Pairs of unit IDs to swap, in order. Some IDs are swapped more than once.
const UNIT_SWAPS: [(u16, u16); 34] = [
    (1103, 529), // Fire Galley, Fire Ship
    (1104, 527), // Demolition Raft, Demolition Ship
    (1001, 106), // Organ Gun
    (949, 108),  // Trade Cart
    (1003, 114), // Elite Organ Gun
    (1006, 183), // Elite Caravel
    (1007, 203), // Camel Archer
    (1009, 208), // Elite Camel Archer
    (1010, 223), // Genitour
    (1012, 230), // Elite Genitour
    (1013, 260), // Gbeto
    (936, 412),  // Elephant
    (1015, 418), // Elite Gbeto
    (1016, 453), // Shotel Warrior
    (1018, 459), // Elite Shotel Warrior
    (1103, 467), // Fire Ship
    (1105, 494), // Siege Tower
    (1104, 653), // Demolition Ship
    (948, 701),  // Cutting Onager
    (1079, 732), // Genitour placeholder
    (1021, 734), // Feitoria
    (1120, 760), // Ballista Elephant
    (1155, 762), // Imperial Skirmisher
    (1134, 766), // Elite Battle Elephant
    (1132, 774), // Battle Elephant
    (1131, 782), // Elite Rattan Archer
    (1129, 784), // Rattan Archer
    (1128, 811), // Elite Arambai
    (1126, 823), // Arambai
    (1125, 830), // Elite Karambit
    (1123, 836), // Karambit
    (946, 848),  // Non-cutting Ballista Elephant
    (1004, 861), // Caravel
    (1122, 891), // Elite Ballista Elephant
];

fn ai900_unit_ids(ctx: &mut PatchContext) -> Result<()> {
    for (a, b) in UNIT_SWAPS {
        swap_units(&mut ctx.dat, a.into(), b.into())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::cutting::*;
    use super::*;
    use crate::fixtures;
    use wololo_dat::{Task, TaskList, Tech, TechID};

    fn command(command_type: u8, target_unit: i16, attribute: i16) -> EffectCommand {
        EffectCommand {
            command_type,
            target_unit,
            attribute,
            ..Default::default()
        }
    }

    #[test]
    fn kasbah_uses_hero_regeneration() -> anyhow::Result<()> {
        let mut ctx = PatchContext::new(fixtures::dat(0, &[], 609, 0));
        ctx.dat.effects[608].commands = vec![command(5, 82, 42), command(5, 1251, 42)];
        (BERBERS_UT.apply)(&mut ctx)?;
        let commands = &ctx.dat.effects[608].commands;
        let summary: Vec<_> = commands
            .iter()
            .map(|c| (c.command_type, c.target_unit, c.attribute, c.amount))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, 82, 40, 4.0),
                (0, 1251, 40, 4.0),
                (0, 82, 45, 4.0),
                (0, 1251, 45, 4.0)
            ]
        );
        Ok(())
    }

    #[test]
    fn demolition_units_detonate() -> anyhow::Result<()> {
        let mut ctx = PatchContext::new(fixtures::dat(2, &[527, 528, 529, 653], 0, 0));
        (DEMOSHIP.apply)(&mut ctx)?;
        for civ in 0..2u8 {
            for (id, hero_mode) in [(527, 96), (528, 96), (653, 96), (529, 0)] {
                assert_eq!(ctx.unit(civ.into(), UnitTypeID::from(id))?.hero_mode, hero_mode);
            }
        }
        Ok(())
    }

    #[test]
    fn ethiopians_get_free_pikes() -> anyhow::Result<()> {
        let mut ctx = PatchContext::new(fixtures::dat(0, &[], 617, 0));
        ctx.dat.effects[616].commands = vec![command(3, 358, 0), command(3, 359, 0)];
        ctx.dat.effects[48].commands = vec![command(2, 1120, 0)];
        (ETHIOPIANS_FREE_PIKE.apply)(&mut ctx)?;
        let targets: Vec<_> = ctx.dat.effects[48]
            .commands
            .iter()
            .map(|c| c.target_unit)
            .collect();
        assert_eq!(targets, vec![1120, 358, 359]);
        Ok(())
    }

    #[test]
    fn nonworking_units_are_hidden() -> anyhow::Result<()> {
        let mut ctx = PatchContext::new(fixtures::dat(1, &[1119, 1223, 1224, 1401, 1402], 0, 0));
        (DISABLE_NONWORKING_UNITS.apply)(&mut ctx)?;
        let hidden: Vec<_> = ctx.dat.civilizations[0]
            .units()
            .filter(|unit| unit.hidden_in_editor)
            .map(|unit| u16::from(unit.id))
            .collect();
        assert_eq!(hidden, vec![1119, 1224, 1401]);
        Ok(())
    }

    fn cutting_dat() -> PatchContext {
        let mut dat = fixtures::dat(2, &[ONAGER], 507, 333);
        let tasks = (0..6)
            .map(|id| Task {
                id,
                ..Default::default()
            })
            .collect::<Vec<_>>();
        dat.set_task_list(ONAGER.into(), Some(TaskList::from(tasks)));
        for civ in &mut dat.civilizations {
            if let Some(unit) = civ.unit_mut(ONAGER.into()) {
                unit.name_string_id = 5000;
                unit.blast_attack_level = 1;
            }
        }
        dat.effects[usize::from(ONAGER_EFFECT)].commands = vec![command(3, 280, 0)];
        dat.effects[usize::from(CHEMISTRY)].commands = (0..69).map(|i| command(4, i, 9)).collect();
        for effect in [FUROR_CELTICA, KOREAN_TEAM_BONUS, SHINKICHON] {
            dat.effects[usize::from(effect)].commands =
                vec![command(4, ONAGER as i16, 1), command(5, ONAGER as i16, 2)];
        }
        dat.techs[usize::from(SIEGE_ONAGER)] = Tech {
            name: "Siege Onager".into(),
            required_techs: [101, -1, -1, -1, -1, -1],
            required_tech_count: 1,
            resource_costs: [ResourceCost {
                resource_type: 0,
                amount: 1450,
                paid: true,
            }; 3],
            research_location: 82,
            research_time: 150,
            effect_id: Some(SIEGE_ONAGER_EFFECT.into()),
            ..Default::default()
        };
        dat.techs[usize::from(DISABLER_TEMPLATE)].name = "template".into();
        PatchContext::new(dat)
    }

    #[test]
    fn cutting_splits_the_onager() -> anyhow::Result<()> {
        let mut ctx = cutting_dat();
        (CUTTING.apply)(&mut ctx)?;

        let onager = UnitTypeID::from(ONAGER);
        let cutting_onager = UnitTypeID::from(CUTTING_ONAGER);
        assert_eq!(ctx.dat.task_list(onager).map(|t| t.len()), Some(5));
        assert_eq!(ctx.dat.task_list(cutting_onager).map(|t| t.len()), Some(6));
        assert!(ctx
            .dat
            .task_list(onager)
            .into_iter()
            .flat_map(|tasks| tasks.iter())
            .all(|task| task.id != 4));
        for civ in 0..2u8 {
            let plain = ctx.unit(civ.into(), onager)?;
            assert_eq!((plain.blast_attack_level, plain.name_string_id), (2, 5205));
            let cutting = ctx.unit(civ.into(), cutting_onager)?;
            assert_eq!(cutting.id, cutting_onager);
            assert_eq!((cutting.blast_attack_level, cutting.name_string_id), (1, 5000));
        }

        let effect = |id: u16| ctx.dat.effects[usize::from(id)].commands.clone();
        let onager_cutting = effect(ONAGER_CUTTING_EFFECT);
        assert_eq!(ctx.dat.effects[usize::from(ONAGER_CUTTING_EFFECT)].name, "Onager Cutting Tech");
        assert_eq!(
            onager_cutting
                .iter()
                .map(|c| (c.target_unit, c.unit_class))
                .collect::<Vec<_>>(),
            vec![(280, 948), (550, 948)]
        );
        assert_eq!(effect(SIEGE_ONAGER_EFFECT)[0].target_unit, 948);
        let disabled = |id: u16| -> Vec<f32> {
            effect(id)
                .iter()
                .filter(|c| c.command_type == EffectCommand::DISABLE_TECH)
                .map(|c| c.amount)
                .collect()
        };
        assert_eq!(disabled(DISABLING_EFFECT), vec![152.0, 154.0]);
        assert_eq!(disabled(TURKS_TECH_TREE), vec![152.0, 154.0, 153.0]);
        assert_eq!(disabled(HUNS_TECH_TREE), vec![152.0, 154.0, 153.0]);

        let chemistry = effect(CHEMISTRY);
        assert_eq!(chemistry.len(), 70);
        assert_eq!(chemistry[69].target_unit, 948);
        assert_eq!(chemistry[66].target_unit, 66);
        let shinkichon = effect(SHINKICHON);
        assert_eq!(
            shinkichon.iter().map(|c| c.target_unit).collect::<Vec<_>>(),
            vec![550, 550, 948, 948]
        );
        assert_eq!(shinkichon[3].command_type, 5);

        let tech = |id: u16| ctx.tech(TechID::from(id)).cloned();
        let research = tech(CUTTING_RESEARCH)?;
        assert_eq!(research.name, "Cutting Research");
        assert_eq!(&research.required_techs[..2], &[101, 257]);
        assert_eq!(research.effect_id, None);
        assert_eq!(research.research_time, 150);
        let auto = tech(AUTO_ONAGER_CUTTING)?;
        assert_eq!(auto.effect_id, Some(ONAGER_CUTTING_EFFECT.into()));
        assert_eq!((auto.research_time, auto.research_location), (0, -1));
        assert_eq!(auto.resource_costs[0], ResourceCost::FREE);
        assert_eq!(auto.resource_costs[2].amount, 1450);
        let manual = tech(ONAGER_CUTTING)?;
        assert_eq!(manual.required_techs[0], 152);
        assert_eq!(manual.effect_id, auto.effect_id);
        let disabler = tech(CUTTING_DISABLER)?;
        assert_eq!(disabler.effect_id, Some(DISABLING_EFFECT.into()));
        assert_eq!((disabler.required_techs[0], disabler.required_tech_count), (101, 1));
        Ok(())
    }

    #[test]
    fn cutting_needs_the_cutting_task() {
        let mut ctx = cutting_dat();
        if let Some(tasks) = ctx.dat.task_list_mut(ONAGER.into()) {
            tasks.truncate(4);
        }
        assert!(matches!(
            (CUTTING.apply)(&mut ctx),
            Err(PatchError::InconsistentReference {
                kind: RecordKind::Task,
                id: 550
            })
        ));
    }

    #[test]
    fn high_unit_ids_are_moved() -> anyhow::Result<()> {
        let mut ctx = PatchContext::new(fixtures::dat(1, &[529, 1001, 1103], 0, 0));
        for (id, name) in [(529, "Fire Ship"), (1001, "Organ Gun"), (1103, "Fire Galley")] {
            ctx.unit_mut(0.into(), UnitTypeID::from(id))?.name = name.into();
        }
        (AI900_UNIT_IDS.apply)(&mut ctx)?;
        let name = |id: u16| ctx.dat.unit(0.into(), id.into()).map(|u| u.name.clone());
        assert_eq!(name(106).as_deref(), Some("Organ Gun"));
        assert_eq!(name(529).as_deref(), Some("Fire Galley"));
        assert_eq!(name(467).as_deref(), Some("Fire Ship"));
        assert_eq!(name(1001), None);
        assert_eq!(name(1103), None);
        Ok(())
    }
}
