use crate::{PatchContext, PatchError, Result};
use nohash_hasher::{IntMap, IntSet};
use std::ops::Range;
use wololo_dat::{DatFile, Graphic, GraphicID};
use wololo_drs::ResourceType;

/// SLPs in this range hold art that differs between civilizations.
const CIV_ART_SLPS: Range<i32> = 18000..19000;

/// Graphic names ending in one of these letters name an architecture set.
const ARCHITECTURE_LETTERS: &str = "XEWMFI";
/// Name suffixes for the civilizations that get their own architecture, by index.
const CIV_CODES: [&str; 18] = [
    "CE", "SL", "BY", "HU", "SP", "VI", "IC", "CH", "VK", "MO", "BE", "BR", "TE", "KO", "SA", "PE",
    "MY", "PO",
];
/// Name suffixes for the first civilization groups.
const GROUP_CODES: [&str; 3] = ["AS", "SO", "AM"];

/// How copies of a graphic get their own SLP IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtScheme {
    /// Architecture for a single civilization, by its index in the list of civilizations that get
    /// their own architecture. Only graphics with civilization specific art are copied, and the
    /// copies use SLPs `24000 + 1000 * index + (slp - 18000)`.
    Civilization(u16),
    /// Unit art for a civilization group, by its index. Every graphic is copied, and the copies
    /// use SLPs `60000 + 10000 * index + slp`.
    Group(u16),
}

/// Replace the architecture letter at the end of a copy's name with the civilization's code.
fn rename(graphic: &mut Graphic, scheme: ArtScheme) {
    let code = match scheme {
        ArtScheme::Civilization(index) => CIV_CODES.get(usize::from(index)),
        ArtScheme::Group(index) => GROUP_CODES.get(usize::from(index)),
    };
    let code = match code {
        Some(code) => code,
        None => return,
    };
    if !graphic.name.ends_with(|c: char| ARCHITECTURE_LETTERS.contains(c)) {
        return;
    }
    if graphic.file_name == graphic.name {
        graphic.file_name.pop();
        graphic.file_name.push_str(code);
        graphic.name = graphic.file_name.clone();
    } else {
        graphic.name.pop();
        graphic.name.push_str(code);
    }
}

/// Check whether a graphic, or any graphic it draws through its deltas, uses civilization
/// specific art.
pub fn uses_civ_art(dat: &DatFile, graphic: GraphicID) -> bool {
    fn check(dat: &DatFile, id: GraphicID, visited: &mut IntSet<u16>) -> bool {
        visited.insert(id.into());
        let graphic = match dat.graphic(id) {
            Some(graphic) => graphic,
            None => return false,
        };
        CIV_ART_SLPS.contains(&graphic.slp_id)
            || graphic
                .delta_graphics()
                .any(|delta| !visited.contains(&u16::from(delta)) && check(dat, delta, visited))
    }
    check(dat, graphic, &mut IntSet::default())
}

/// Copies graphics for one civilization or civilization group.
///
/// Each graphic is copied at most once. Asking for a graphic again returns the earlier copy.
#[derive(Debug, Clone)]
pub struct GraphicDuplicator {
    scheme: ArtScheme,
    copies: IntMap<u16, GraphicID>,
}

impl GraphicDuplicator {
    /// Create a duplicator for a civilization or group.
    pub fn new(scheme: ArtScheme) -> Self {
        Self {
            scheme,
            copies: IntMap::default(),
        }
    }

    /// The SLP numbering scheme.
    pub fn scheme(&self) -> ArtScheme {
        self.scheme
    }

    /// The copy made of a graphic, if any.
    pub fn copy_of(&self, graphic: GraphicID) -> Option<GraphicID> {
        self.copies.get(&u16::from(graphic)).copied()
    }

    /// Number of graphics copied so far.
    pub fn len(&self) -> usize {
        self.copies.len()
    }

    /// Check if nothing was copied.
    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }

    /// Get this civilization's version of `graphic`.
    ///
    /// `reference` is the same graphic as used by a civilization that already has its own art,
    /// and decides whether a copy is needed and which SLP ID it gets. Returns `graphic` itself if
    /// no copy is needed. New SLP files are added to the context's SLP overrides.
    pub fn duplicate(
        &mut self,
        ctx: &mut PatchContext,
        graphic: GraphicID,
        reference: GraphicID,
    ) -> Result<GraphicID> {
        if let Some(copy) = self.copy_of(graphic) {
            return Ok(copy);
        }

        let reference_slp = ctx.graphic(reference)?.slp_id;
        let mut copy = ctx.graphic(graphic)?.clone();
        let new_slp = match self.scheme {
            ArtScheme::Group(index) => {
                if reference_slp >= 10000 {
                    return Err(PatchError::SlpOutOfRange {
                        graphic: reference,
                        slp: reference_slp,
                    });
                }
                Some(60000 + 10000 * i32::from(index) + copy.slp_id)
            }
            ArtScheme::Civilization(index) if CIV_ART_SLPS.contains(&reference_slp) => {
                Some(24000 + 1000 * i32::from(index) + reference_slp - CIV_ART_SLPS.start)
            }
            // Only some deltas need new art.
            ArtScheme::Civilization(_) if uses_civ_art(&ctx.dat, reference) => None,
            ArtScheme::Civilization(_) => return Ok(graphic),
        };

        rename(&mut copy, self.scheme);
        let copy_id = ctx.dat.push_graphic(copy.clone())?;
        // Recorded before the deltas are copied, so cycles resolve to this copy.
        self.copies.insert(graphic.into(), copy_id);
        copy.id = copy_id;

        if let Some(slp) = new_slp {
            if copy.slp_id >= 0 && slp != copy.slp_id && slp != reference_slp {
                let source = ctx.find_slp(copy.slp_id)?;
                let slp_id = u32::try_from(slp).map_err(|_| PatchError::SlpOutOfRange {
                    graphic,
                    slp,
                })?;
                log::debug!("graphic {} -> {}: {} as {}.slp", graphic, copy_id, source.display(), slp);
                ctx.slp_overrides.insert(ResourceType::SLP, slp_id, source);
                copy.slp_id = slp;
            }
        }

        if let ArtScheme::Civilization(_) = self.scheme {
            let reference_deltas: Vec<_> = ctx
                .graphic(reference)?
                .deltas
                .iter()
                .map(|delta| delta.graphic_id)
                .collect();
            // Damage graphics often have a different number of flames; those keep the deltas.
            if reference_deltas.len() == copy.deltas.len() {
                for (delta, reference) in copy.deltas.iter_mut().zip(reference_deltas) {
                    if let (Some(id), Some(reference)) = (delta.graphic_id, reference) {
                        delta.graphic_id = Some(self.duplicate(ctx, id, reference)?);
                    }
                }
            }
        }

        *ctx.graphic_mut(copy_id)? = copy;
        Ok(copy_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use std::fs;

    #[test]
    fn civ_art_check_follows_deltas_and_cycles() {
        let mut dat = fixtures::dat(0, &[], 0, 0);
        let shared = fixtures::graphic(&mut dat, 4248, &[]);
        let civ_art = fixtures::graphic(&mut dat, 18020, &[]);
        // 2 <-> 3, and 3 draws the civ art
        let a = fixtures::graphic(&mut dat, 100, &[3]);
        let b = fixtures::graphic(&mut dat, 101, &[2, 1]);
        let lonely_cycle = fixtures::graphic(&mut dat, 102, &[4, 0]);

        assert!(!uses_civ_art(&dat, shared));
        assert!(uses_civ_art(&dat, civ_art));
        assert!(uses_civ_art(&dat, a));
        assert!(uses_civ_art(&dat, b));
        assert!(!uses_civ_art(&dat, lonely_cycle));
        assert!(!uses_civ_art(&dat, 99.into()));
    }

    #[test]
    fn civilization_copies() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("2280.slp"), b"castle")?;
        fs::write(dir.path().join("2281.slp"), b"castle shadow")?;

        let mut dat = fixtures::dat(0, &[], 0, 0);
        let flag = fixtures::graphic(&mut dat, 4522, &[]);
        let shadow = fixtures::graphic(&mut dat, 2281, &[]);
        let castle = fixtures::graphic(&mut dat, 2280, &[u16::from(shadow), u16::from(flag)]);
        let reference_shadow = fixtures::graphic(&mut dat, 18031, &[]);
        let reference = fixtures::graphic(
            &mut dat,
            18030,
            &[u16::from(reference_shadow), u16::from(flag)],
        );
        let unrelated = fixtures::graphic(&mut dat, 3000, &[]);

        let mut ctx = PatchContext::new(dat).with_graphics_dir(dir.path());
        let mut duplicator = GraphicDuplicator::new(ArtScheme::Civilization(2));
        let copy = duplicator.duplicate(&mut ctx, castle, reference)?;
        assert_ne!(copy, castle);
        assert_eq!(duplicator.duplicate(&mut ctx, castle, reference)?, copy);
        // Shared art is not copied.
        assert_eq!(duplicator.duplicate(&mut ctx, unrelated, flag)?, unrelated);

        let copied = ctx.graphic(copy)?.clone();
        assert_eq!(copied.id, copy);
        assert_eq!(copied.slp_id, 26030);
        let shadow_copy = copied.deltas[0].graphic_id.expect("shadow delta");
        assert_eq!(ctx.graphic(shadow_copy)?.slp_id, 26031);
        assert_eq!(copied.deltas[1].graphic_id, Some(flag));
        assert_eq!(duplicator.len(), 2);

        assert_eq!(
            ctx.slp_overrides.get(ResourceType::SLP, 26030),
            Some(dir.path().join("2280.slp").as_path())
        );
        assert_eq!(
            ctx.slp_overrides.get(ResourceType::SLP, 26031),
            Some(dir.path().join("2281.slp").as_path())
        );
        // The originals are untouched.
        assert_eq!(ctx.graphic(castle)?.deltas[0].graphic_id, Some(shadow));
        Ok(())
    }

    #[test]
    fn group_copies() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("776.slp"), b"monk")?;

        let mut dat = fixtures::dat(0, &[], 0, 0);
        let monk = fixtures::graphic(&mut dat, 776, &[]);
        let building = fixtures::graphic(&mut dat, 18030, &[]);
        let mut ctx = PatchContext::new(dat).with_graphics_dir(dir.path());

        let mut duplicator = GraphicDuplicator::new(ArtScheme::Group(3));
        let copy = duplicator.duplicate(&mut ctx, monk, monk)?;
        assert_eq!(ctx.graphic(copy)?.slp_id, 90776);
        assert!(ctx.slp_overrides.contains(ResourceType::SLP, 90776));

        assert!(matches!(
            duplicator.duplicate(&mut ctx, building, building),
            Err(PatchError::SlpOutOfRange { slp: 18030, .. })
        ));
        Ok(())
    }

    #[test]
    fn copies_are_named_after_the_civilization() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("2280.slp"), b"castle")?;
        fs::write(dir.path().join("776.slp"), b"monk")?;

        let mut dat = fixtures::dat(0, &[], 0, 0);
        let castle = fixtures::graphic(&mut dat, 2280, &[]);
        let reference = fixtures::graphic(&mut dat, 18030, &[]);
        let monk = fixtures::graphic(&mut dat, 776, &[]);
        for (id, name, file_name) in [
            (castle, "CSTL_W", "CSTL_W"),
            (reference, "CSTL_B", "CSTL_B"),
            (monk, "MONK_E", "monk_e.slp"),
        ] {
            let graphic = dat.graphic_mut(id).expect("fixture graphic");
            graphic.name = name.to_string();
            graphic.file_name = file_name.to_string();
        }
        let mut ctx = PatchContext::new(dat).with_graphics_dir(dir.path());

        let copy = GraphicDuplicator::new(ArtScheme::Civilization(2))
            .duplicate(&mut ctx, castle, reference)?;
        let copy = ctx.graphic(copy)?;
        assert_eq!((copy.name.as_str(), copy.file_name.as_str()), ("CSTL_BY", "CSTL_BY"));

        let copy = GraphicDuplicator::new(ArtScheme::Group(1)).duplicate(&mut ctx, monk, monk)?;
        let copy = ctx.graphic(copy)?;
        assert_eq!((copy.name.as_str(), copy.file_name.as_str()), ("MONK_SO", "monk_e.slp"));

        // No code for this group, and the original is left alone.
        let copy = GraphicDuplicator::new(ArtScheme::Group(5)).duplicate(&mut ctx, monk, monk)?;
        assert_eq!(ctx.graphic(copy)?.name, "MONK_E");
        assert_eq!(ctx.graphic(castle)?.name, "CSTL_W");
        Ok(())
    }

    #[test]
    fn missing_slp_file() {
        let mut dat = fixtures::dat(0, &[], 0, 0);
        let monk = fixtures::graphic(&mut dat, 776, &[]);
        let mut ctx = PatchContext::new(dat);
        let mut duplicator = GraphicDuplicator::new(ArtScheme::Group(0));
        assert!(matches!(
            duplicator.duplicate(&mut ctx, monk, monk),
            Err(PatchError::MissingAsset { .. })
        ));
    }
}
