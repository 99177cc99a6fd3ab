use crate::{adjust_flags, ArtScheme, DatPatch, GraphicDuplicator, PatchContext, Result};
use nohash_hasher::IntMap;
use wololo_dat::{CivilizationID, GraphicID, Unit, UnitTypeID};
use wololo_drs::ResourceType;

const BUILDINGS: [u16; 101] = [
    10, 14, 18, 19, 20, 30, 31, 32, 47, 49, 51, 63, 64, 67, 71, 78, 79, 80, 81, 82, 84, 85, 86, 87,
    88, 90, 91, 92, 95, 101, 103, 104, 105, 110, 116, 117, 129, 130, 131, 132, 133, 137, 141, 142,
    150, 153, 155, 179, 190, 209, 210, 234, 235, 236, 276, 463, 464, 465, 481, 482, 483, 484, 487,
    488, 490, 491, 498, 562, 563, 564, 565, 584, 585, 586, 587, 597, 611, 612, 613, 614, 615, 616,
    617, 659, 660, 661, 662, 663, 664, 665, 666, 667, 668, 669, 670, 671, 672, 673, 674, 1102,
    1189,
];
const SHIPS: [u16; 13] = [17, 21, 420, 442, 527, 528, 529, 532, 539, 545, 691, 1103, 1104];
const CIVS: [u8; 18] = [13, 23, 7, 17, 14, 31, 21, 6, 11, 12, 27, 1, 4, 18, 9, 8, 16, 24];
const GROUPS: [&[u8]; 12] = [
    &[3, 4, 11],
    &[7, 23],
    &[14, 19, 24],
    &[5],
    &[6, 18],
    &[28, 29, 30, 31],
    &[8, 9, 10, 27],
    &[20],
    &[25, 26],
    &[15, 16, 21],
    &[17, 12],
    &[22],
];
const GROUP_UNITS: [u16; 53] = [
    125, 134, 286, 4, 3, 5, 98, 6, 100, 7, 238, 24, 26, 37, 113, 38, 111, 39, 34, 74, 152, 75, 154,
    77, 180, 93, 140, 283, 139, 329, 330, 495, 358, 501, 359, 502, 440, 441, 480, 448, 449, 473,
    500, 474, 631, 492, 496, 546, 547, 567, 568, 569, 570,
];

/// Mediterranean buildings whose garrison flags the Italians and Portuguese must not share.
const MEDITERRANEAN_FLAG_BUILDINGS: [u16; 7] = [47, 51, 116, 137, 234, 235, 236];
const ITALIANS: u8 = 19;
const PORTUGUESE: u8 = 24;

/// Construction graphics up to this ID are shared by all civilizations.
const LAST_SHARED_CONSTRUCTION: u16 = 130;
const SHARED_CONSTRUCTION: u16 = 4248;

/// Which civilizations get their own architecture, and which unit art is split between groups of
/// civilizations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureSet {
    /// A civilization that already has its own building art, used to find out which graphics
    /// need copies.
    pub reference_civ: CivilizationID,
    /// Civilizations that get their own architecture, in the order their SLP ranges are assigned.
    pub civs: Vec<CivilizationID>,
    /// Buildings that get civilization specific art.
    pub buildings: Vec<UnitTypeID>,
    /// Units, mostly ships, that get civilization specific art.
    pub ships: Vec<UnitTypeID>,
    /// Civilization groups that share unit art, in the order their SLP ranges are assigned.
    pub groups: Vec<Vec<CivilizationID>>,
    /// Units that get per-group art.
    pub group_units: Vec<UnitTypeID>,
    /// Civilization whose units are the reference for per-group art.
    pub group_reference_civ: CivilizationID,
}

impl Default for ArchitectureSet {
    /// The WololoKingdoms architecture split, using the Burmese buildings as reference.
    fn default() -> Self {
        Self {
            reference_civ: 30.into(),
            civs: CIVS.iter().copied().map(Into::into).collect(),
            buildings: BUILDINGS.iter().copied().map(Into::into).collect(),
            ships: SHIPS.iter().copied().map(Into::into).collect(),
            groups: GROUPS
                .iter()
                .map(|group| group.iter().copied().map(Into::into).collect())
                .collect(),
            group_units: GROUP_UNITS.iter().copied().map(Into::into).collect(),
            group_reference_civ: 0.into(),
        }
    }
}

fn replace(
    duplicator: &mut GraphicDuplicator,
    ctx: &mut PatchContext,
    slot: &mut Option<GraphicID>,
    reference: Option<GraphicID>,
) -> Result<()> {
    if let (Some(graphic), Some(reference)) = (*slot, reference) {
        *slot = Some(duplicator.duplicate(ctx, graphic, reference)?);
    }
    Ok(())
}

fn is_shared_construction(graphic: GraphicID) -> bool {
    let id = u16::from(graphic);
    id <= LAST_SHARED_CONSTRUCTION || id == SHARED_CONSTRUCTION
}

/// Give each civilization in `set.civs` its own copies of building and ship graphics.
///
/// Garrison flags are copied as-is, once per civilization, so their offsets can be adjusted
/// per civilization afterwards.
pub fn separate_civ_architectures(ctx: &mut PatchContext, set: &ArchitectureSet) -> Result<()> {
    for (index, &civ) in (0u16..).zip(&set.civs) {
        let mut duplicator = GraphicDuplicator::new(ArtScheme::Civilization(index));
        let mut flags: IntMap<u16, GraphicID> = IntMap::default();

        for &id in &set.buildings {
            let reference = ctx.unit(set.reference_civ, id)?.clone();
            let mut unit = ctx.unit(civ, id)?.clone();
            replace(
                &mut duplicator,
                ctx,
                &mut unit.standing_graphic.0,
                reference.standing_graphic.0,
            )?;
            if !unit.construction_graphic.map_or(true, is_shared_construction) {
                replace(
                    &mut duplicator,
                    ctx,
                    &mut unit.construction_graphic,
                    reference.construction_graphic,
                )?;
            }
            for (damage, reference) in unit
                .damage_graphics
                .iter_mut()
                .zip(&reference.damage_graphics)
            {
                replace(&mut duplicator, ctx, &mut damage.graphic_id, reference.graphic_id)?;
            }
            if let Some(flag) = unit.garrison_graphic {
                let copy = match flags.get(&u16::from(flag)) {
                    Some(&copy) => copy,
                    None => {
                        let graphic = ctx.graphic(flag)?.clone();
                        let copy = ctx.dat.push_graphic(graphic)?;
                        flags.insert(flag.into(), copy);
                        copy
                    }
                };
                unit.garrison_graphic = Some(copy);
            }
            *ctx.unit_mut(civ, id)? = unit;
        }

        for &id in &set.ships {
            let reference = ctx.unit(set.reference_civ, id)?.clone();
            let mut unit = ctx.unit(civ, id)?.clone();
            separate_moving_graphics(&mut duplicator, ctx, &mut unit, &reference, false)?;
            *ctx.unit_mut(civ, id)? = unit;
        }

        log::debug!(
            "civilization {}: {} graphics and {} flags copied",
            civ,
            duplicator.len(),
            flags.len()
        );
    }
    Ok(())
}

fn separate_moving_graphics(
    duplicator: &mut GraphicDuplicator,
    ctx: &mut PatchContext,
    unit: &mut Unit,
    reference: &Unit,
    dying: bool,
) -> Result<()> {
    replace(duplicator, ctx, &mut unit.standing_graphic.0, reference.standing_graphic.0)?;
    replace(duplicator, ctx, &mut unit.walking_graphic, reference.walking_graphic)?;
    replace(duplicator, ctx, &mut unit.attack_graphic, reference.attack_graphic)?;
    if dying {
        replace(duplicator, ctx, &mut unit.dying_graphic, reference.dying_graphic)?;
    }
    Ok(())
}

/// Give each civilization group in `set.groups` its own copies of unit graphics.
///
/// All civilizations in a group share the same copies. Units without a walking graphic are dead
/// units, and only get their standing graphic copied.
pub fn separate_group_graphics(ctx: &mut PatchContext, set: &ArchitectureSet) -> Result<()> {
    for (index, group) in (0u16..).zip(&set.groups) {
        let mut duplicator = GraphicDuplicator::new(ArtScheme::Group(index));
        for &civ in group {
            for &id in &set.group_units {
                let reference = ctx.unit(set.group_reference_civ, id)?.clone();
                let mut unit = ctx.unit(civ, id)?.clone();
                if unit.walking_graphic.is_some() {
                    separate_moving_graphics(&mut duplicator, ctx, &mut unit, &reference, true)?;
                } else {
                    replace(
                        &mut duplicator,
                        ctx,
                        &mut unit.standing_graphic.0,
                        reference.standing_graphic.0,
                    )?;
                }
                *ctx.unit_mut(civ, id)? = unit;
            }
        }
        log::debug!("civilization group {}: {} graphics copied", index, duplicator.len());
    }
    Ok(())
}

/// Give the Italians and Portuguese their own garrison flags on Mediterranean buildings.
///
/// Both civilizations share one copy of each flag graphic, so flag offsets for the Italians also
/// apply to the Portuguese and no longer move the flags of other Mediterranean civilizations.
pub fn separate_mediterranean_flags(ctx: &mut PatchContext) -> Result<()> {
    for id in MEDITERRANEAN_FLAG_BUILDINGS {
        let id = UnitTypeID::from(id);
        let flag = match ctx.unit(ITALIANS.into(), id)?.garrison_graphic {
            Some(flag) => flag,
            None => continue,
        };
        let graphic = ctx.graphic(flag)?.clone();
        let copy = ctx.dat.push_graphic(graphic)?;
        for civ in [ITALIANS, PORTUGUESE] {
            ctx.unit_mut(civ.into(), id)?.garrison_graphic = Some(copy);
        }
    }
    Ok(())
}

/// Split architectures and move building flags.
///
/// Runs before the unit ID fixes: the architecture tables use HD Edition unit IDs.
pub const ARCHITECTURES: DatPatch = DatPatch {
    name: "architectures",
    description: "Separate civilization architectures and adjust building flags",
    apply: architectures,
};

fn architectures(ctx: &mut PatchContext) -> Result<()> {
    separate_mediterranean_flags(ctx)?;
    let shared_flags = ctx.shared_flags.clone();
    adjust_flags(ctx, &shared_flags)?;
    patch_architectures(ctx)?;
    let civ_flags = ctx.civ_flags.clone();
    adjust_flags(ctx, &civ_flags)
}

/// Split HD Edition architecture and unit art the way WololoKingdoms expects it.
///
/// Fixes a few graphics that reference the wrong deltas first, then separates architectures and
/// unit art using [`ArchitectureSet::default`], and finally adds the flag SLPs that the
/// Portuguese buildings need.
pub fn patch_architectures(ctx: &mut PatchContext) -> Result<()> {
    let deltas = &mut ctx.graphic_mut(3229.into())?.deltas;
    for (delta, id) in deltas.iter_mut().zip([427u16, 428]) {
        delta.graphic_id = Some(id.into());
    }
    let deltas = &mut ctx.graphic_mut(9196.into())?.deltas;
    if !deltas.is_empty() {
        deltas.remove(0);
    }

    let set = ArchitectureSet::default();
    separate_civ_architectures(ctx, &set)?;
    separate_group_graphics(ctx, &set)?;

    for (slp, source) in [(41178u32, 4522), (41181, 4523)] {
        let path = ctx.find_slp(source)?;
        ctx.slp_overrides.insert(ResourceType::SLP, slp, path);
    }
    log::info!(
        "separated {} architectures and {} unit groups",
        set.civs.len(),
        set.groups.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures, parse_flag_offsets, Pipeline, AI900_UNIT_IDS};
    use std::fs;
    use wololo_dat::DamageGraphic;

    fn set() -> ArchitectureSet {
        ArchitectureSet {
            reference_civ: 2.into(),
            civs: vec![1.into(), 3.into()],
            buildings: vec![82.into(), 84.into()],
            ships: vec![],
            groups: vec![vec![1.into(), 2.into()], vec![3.into()]],
            group_units: vec![125.into(), 134.into()],
            group_reference_civ: 0.into(),
        }
    }

    #[test]
    fn default_tables() {
        let set = ArchitectureSet::default();
        assert_eq!(set.reference_civ, CivilizationID::from(30));
        assert_eq!(set.civs.len(), 18);
        assert_eq!(set.buildings.len(), 101);
        assert_eq!(set.groups.len(), 12);
        assert_eq!(set.groups[5].len(), 4);
        assert!(set.group_units.contains(&UnitTypeID::from(125)));
    }

    #[test]
    fn civilizations_get_their_own_buildings() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("2280.slp"), b"castle")?;
        fs::write(dir.path().join("2281.slp"), b"castle damaged")?;

        let mut dat = fixtures::dat(4, &[82, 84], 0, 0);
        let castle = fixtures::graphic(&mut dat, 2280, &[]);
        let damaged = fixtures::graphic(&mut dat, 2281, &[]);
        let flag = fixtures::graphic(&mut dat, 4522, &[]);
        let construction = fixtures::graphic(&mut dat, 236, &[]);
        let reference_castle = fixtures::graphic(&mut dat, 18030, &[]);
        let reference_damaged = fixtures::graphic(&mut dat, 18031, &[]);
        for (index, civ) in dat.civilizations.iter_mut().enumerate() {
            for id in [82u16, 84] {
                let unit = civ.unit_mut(id.into()).expect("fixture unit");
                let (standing, damage) = if index == 2 {
                    (reference_castle, reference_damaged)
                } else {
                    (castle, damaged)
                };
                unit.standing_graphic.0 = Some(standing);
                unit.damage_graphics = vec![DamageGraphic {
                    graphic_id: Some(damage),
                    damage_percent: 25,
                    apply_mode: 0,
                }];
                unit.construction_graphic = Some(construction);
                unit.garrison_graphic = Some(flag);
            }
        }
        let set = set();
        let mut ctx = PatchContext::new(dat).with_graphics_dir(dir.path());
        separate_civ_architectures(&mut ctx, &set)?;

        let first = ctx.unit(1.into(), 82.into())?.clone();
        let second = ctx.unit(3.into(), 82.into())?.clone();
        let first_castle = first.standing_graphic.0.expect("standing graphic");
        assert_eq!(ctx.graphic(first_castle)?.slp_id, 24030);
        let second_castle = second.standing_graphic.0.expect("standing graphic");
        assert_eq!(ctx.graphic(second_castle)?.slp_id, 25030);
        let damage = first.damage_graphics[0].graphic_id.expect("damage graphic");
        assert_eq!(ctx.graphic(damage)?.slp_id, 24031);
        // Shared construction graphics stay shared.
        assert_eq!(first.construction_graphic, Some(construction));

        // Both buildings share one flag copy per civilization.
        let flag_copy = first.garrison_graphic.expect("garrison graphic");
        assert_ne!(flag_copy, flag);
        assert_eq!(
            ctx.unit(1.into(), 84.into())?.garrison_graphic,
            Some(flag_copy)
        );
        assert_ne!(second.garrison_graphic, Some(flag_copy));
        assert_eq!(ctx.graphic(flag_copy)?.slp_id, 4522);

        // The reference civilization and other civilizations are untouched.
        assert_eq!(
            ctx.unit(2.into(), 82.into())?.standing_graphic.0,
            Some(reference_castle)
        );
        assert_eq!(ctx.unit(0.into(), 82.into())?.standing_graphic.0, Some(castle));
        assert!(ctx.slp_overrides.contains(ResourceType::SLP, 24030));
        assert!(ctx.slp_overrides.contains(ResourceType::SLP, 25031));
        Ok(())
    }

    #[test]
    fn groups_share_unit_art() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        for slp in [776, 777, 778, 779] {
            fs::write(dir.path().join(format!("{}.slp", slp)), b"monk")?;
        }
        let mut dat = fixtures::dat(4, &[125, 134], 0, 0);
        let standing = fixtures::graphic(&mut dat, 776, &[]);
        let walking = fixtures::graphic(&mut dat, 777, &[]);
        let attack = fixtures::graphic(&mut dat, 778, &[]);
        let dying = fixtures::graphic(&mut dat, 779, &[]);
        for civ in &mut dat.civilizations {
            let monk = civ.unit_mut(125.into()).expect("fixture unit");
            monk.standing_graphic.0 = Some(standing);
            monk.walking_graphic = Some(walking);
            monk.attack_graphic = Some(attack);
            monk.dying_graphic = Some(dying);
            let dead = civ.unit_mut(134.into()).expect("fixture unit");
            dead.standing_graphic.0 = Some(dying);
        }
        let set = set();
        let mut ctx = PatchContext::new(dat).with_graphics_dir(dir.path());
        separate_group_graphics(&mut ctx, &set)?;

        let first = ctx.unit(1.into(), 125.into())?.clone();
        assert_eq!(first, ctx.unit(2.into(), 125.into())?.clone());
        let slp = |ctx: &PatchContext, id: Option<GraphicID>| -> anyhow::Result<i32> {
            Ok(ctx.graphic(id.ok_or_else(|| anyhow::anyhow!("no graphic"))?)?.slp_id)
        };
        assert_eq!(slp(&ctx, first.standing_graphic.0)?, 60776);
        assert_eq!(slp(&ctx, first.walking_graphic)?, 60777);
        assert_eq!(slp(&ctx, first.attack_graphic)?, 60778);
        assert_eq!(slp(&ctx, first.dying_graphic)?, 60779);
        // The dead unit's standing graphic is the monk's dying graphic, and reuses its copy.
        assert_eq!(
            ctx.unit(1.into(), 134.into())?.standing_graphic.0,
            first.dying_graphic
        );

        let third = ctx.unit(3.into(), 125.into())?.clone();
        assert_eq!(slp(&ctx, third.standing_graphic.0)?, 70776);
        assert_eq!(ctx.unit(0.into(), 125.into())?.standing_graphic.0, Some(standing));
        Ok(())
    }

    #[test]
    fn mediterranean_flags_are_split() -> anyhow::Result<()> {
        let mut dat = fixtures::dat(25, &MEDITERRANEAN_FLAG_BUILDINGS, 0, 0);
        let pole = fixtures::graphic(&mut dat, 4521, &[]);
        let flag = fixtures::graphic(&mut dat, 4522, &[u16::from(pole)]);
        for civ in &mut dat.civilizations {
            civ.unit_mut(47.into()).expect("fixture unit").garrison_graphic = Some(flag);
        }
        let mut ctx = PatchContext::new(dat);
        separate_mediterranean_flags(&mut ctx)?;
        adjust_flags(&mut ctx, &parse_flag_offsets("19,47,0,5,-6")?)?;

        let italian = ctx.unit(ITALIANS.into(), 47.into())?.garrison_graphic;
        assert_ne!(italian, ctx.unit(2.into(), 47.into())?.garrison_graphic);
        assert_eq!(italian, ctx.unit(PORTUGUESE.into(), 47.into())?.garrison_graphic);
        let italian = ctx.graphic(italian.ok_or_else(|| anyhow::anyhow!("no flag"))?)?;
        assert_eq!((italian.deltas[0].offset_x, italian.deltas[0].offset_y), (5, -6));
        assert_eq!(ctx.graphic(flag)?.deltas[0].offset_x, 0);
        // Buildings without a flag are skipped.
        assert_eq!(ctx.unit(ITALIANS.into(), 51.into())?.garrison_graphic, None);
        Ok(())
    }

    #[test]
    fn ships_are_separated_before_their_ids_move() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        for slp in [530, 4522, 4523] {
            fs::write(dir.path().join(format!("{}.slp", slp)), b"art")?;
        }
        let units: Vec<u16> = BUILDINGS
            .iter()
            .chain(&SHIPS)
            .chain(&GROUP_UNITS)
            .chain(&MEDITERRANEAN_FLAG_BUILDINGS)
            .copied()
            .collect();
        let mut dat = fixtures::dat(32, &units, 0, 0);
        // The delta fixes touch graphics 3229 and 9196.
        while dat.graphics.len() <= 9196 {
            fixtures::graphic(&mut dat, -1, &[]);
        }
        let fire_ship = fixtures::graphic(&mut dat, 530, &[]);
        let reference = fixtures::graphic(&mut dat, 18530, &[]);
        for (index, civ) in dat.civilizations.iter_mut().enumerate() {
            let ship = civ.unit_mut(529.into()).expect("fixture unit");
            ship.standing_graphic.0 = Some(if index == 30 { reference } else { fire_ship });
        }

        let mut ctx = PatchContext::new(dat).with_graphics_dir(dir.path());
        Pipeline::new(vec![ARCHITECTURES, AI900_UNIT_IDS]).run(&mut ctx)?;

        // The Fire Ship ends up at 467, with the Celts' own art.
        let ship = ctx.unit(13.into(), 467.into())?;
        assert_eq!(ship.id, UnitTypeID::from(467));
        let standing = ship.standing_graphic.0.ok_or_else(|| anyhow::anyhow!("no graphic"))?;
        assert_eq!(ctx.graphic(standing)?.slp_id, 24530);
        assert!(ctx.slp_overrides.contains(ResourceType::SLP, 24530));
        assert!(ctx.slp_overrides.contains(ResourceType::SLP, 41178));
        Ok(())
    }
}
