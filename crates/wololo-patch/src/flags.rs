use crate::{PatchContext, PatchError, RecordKind, Result};
use wololo_dat::{CivilizationID, UnitTypeID};

/// Buildings whose flags are drawn by their standing graphic instead of a garrison graphic.
const FLAGS_IN_STANDING_GRAPHIC: [u16; 2] = [18, 103];

/// Position of a flag on a building, for one civilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagOffset {
    /// Civilization whose flag is moved.
    pub civ: CivilizationID,
    /// The building.
    pub unit: UnitTypeID,
    /// Index of the delta that draws the flag.
    pub delta: usize,
    /// New horizontal offset.
    pub x: i16,
    /// New vertical offset.
    pub y: i16,
}

/// Parse a flag offset table with one `civ,unit,delta,x,y` line per flag.
///
/// Blank lines are skipped.
pub fn parse_flag_offsets(text: &str) -> Result<Vec<FlagOffset>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_line(line).ok_or_else(|| PatchError::InvalidFlagOffset {
                line: index + 1,
                text: line.to_string(),
            })
        })
        .collect()
}

fn parse_line(line: &str) -> Option<FlagOffset> {
    let mut fields = line.split(',').map(str::trim);
    let offset = FlagOffset {
        civ: fields.next()?.parse::<u8>().ok()?.into(),
        unit: fields.next()?.parse::<u16>().ok()?.into(),
        delta: fields.next()?.parse().ok()?,
        x: fields.next()?.parse().ok()?,
        y: fields.next()?.parse().ok()?,
    };
    match fields.next() {
        Some(_) => None,
        None => Some(offset),
    }
}

/// Move building flags to new positions.
///
/// Flags moved before [`separate_civ_architectures`](crate::separate_civ_architectures) move for
/// every civilization sharing the graphic. The [`ARCHITECTURES`](crate::ARCHITECTURES) patch
/// applies a context's shared and per-civilization flag tables around the separation.
pub fn adjust_flags(ctx: &mut PatchContext, offsets: &[FlagOffset]) -> Result<()> {
    for offset in offsets {
        let unit = ctx.unit(offset.civ, offset.unit)?;
        let graphic = if FLAGS_IN_STANDING_GRAPHIC.contains(&u16::from(offset.unit)) {
            unit.standing_graphic.0
        } else {
            unit.garrison_graphic
        }
        .ok_or_else(|| PatchError::missing(RecordKind::Graphic, -1))?;
        let delta = ctx
            .graphic_mut(graphic)?
            .deltas
            .get_mut(offset.delta)
            .ok_or_else(|| {
                PatchError::missing(RecordKind::GraphicDelta, offset.delta as i64)
            })?;
        delta.offset_x = offset.x;
        delta.offset_y = offset.y;
    }
    log::debug!("adjusted {} flags", offsets.len());
    Ok(())
}
