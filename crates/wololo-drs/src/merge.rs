use crate::{DRSReader, DRSWriter, ResourceIndex};
use std::io::{Result, Write};
use std::ops::RangeInclusive;

/// Which IDs of an existing archive are moved out of the way when an override takes their place.
///
/// An ID is only remapped if it falls into one of the `ranges` *and* an override with the same
/// type and ID is being added. The old entry is then kept under `id + shift`, where the game never
/// looks for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapRule {
    /// ID ranges whose entries are kept when overridden.
    pub ranges: Vec<RangeInclusive<u32>>,
    /// Added to a remapped ID.
    pub shift: u32,
}

impl Default for RemapRule {
    fn default() -> Self {
        Self {
            ranges: vec![60000..=60138, 70000..=70138, 80000..=80017],
            shift: 900_000,
        }
    }
}

impl RemapRule {
    /// A rule that never remaps: overrides simply replace old entries.
    pub fn none() -> Self {
        Self {
            ranges: vec![],
            shift: 0,
        }
    }

    /// Check if `id` falls in one of the remappable ranges.
    pub fn is_candidate(&self, id: u32) -> bool {
        self.ranges.iter().any(|range| range.contains(&id))
    }

    /// The ID an old entry should be stored under, given whether it is being overridden.
    pub fn remap(&self, id: u32, overridden: bool) -> u32 {
        if overridden && self.is_candidate(id) {
            id.saturating_add(self.shift)
        } else {
            id
        }
    }
}

/// Counts of what [`merge_archive`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    /// Entries copied from the old archive, including remapped ones.
    pub copied: usize,
    /// Old entries that were moved to a shifted ID.
    pub remapped: usize,
    /// Override entries added on top.
    pub overrides: usize,
}

/// Copy every entry of an existing archive into `writer`, then add `overrides` on top.
///
/// Old entries whose ID is overridden and eligible per `rule` are kept under a shifted ID.
/// Other overridden entries are replaced, since later additions to a writer win.
pub fn merge_archive<B, W>(
    reader: &DRSReader<B>,
    writer: &mut DRSWriter<W>,
    overrides: &ResourceIndex,
    rule: &RemapRule,
) -> Result<MergeStats>
where
    B: AsRef<[u8]>,
    W: Write,
{
    let mut stats = MergeStats::default();
    for table in reader.read_tables()? {
        for resource in reader.read_files(&table)? {
            let overridden = overrides.contains(table.resource_type, resource.id);
            let id = rule.remap(resource.id, overridden);
            if id != resource.id {
                log::debug!(
                    "keeping overridden {}.{} as {}",
                    resource.id,
                    table.resource_type,
                    id
                );
                stats.remapped += 1;
            }
            writer.add(table.resource_type, id, reader.read_file(&resource)?);
            stats.copied += 1;
        }
    }

    stats.overrides = overrides.add_to(writer);
    log::info!(
        "merged {} old entries ({} remapped) with {} overrides",
        stats.copied,
        stats.remapped,
        stats.overrides
    );
    Ok(stats)
}
