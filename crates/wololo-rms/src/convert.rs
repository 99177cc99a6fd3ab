use crate::text::{self, Anchors};
use crate::{
    ConvertError, ReplacementRule, Terrain, TerrainCatalog, TerrainGraphics, TerrainGroup,
    TerrainUsage,
};
use regex::{NoExpand, Regex};
use std::collections::BTreeMap;

/// Files that make up a converted map, by file name.
pub type MapFiles = BTreeMap<String, Vec<u8>>;

/// The result of converting a map script's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// The rewritten script.
    pub script: String,
    /// Terrain graphics to ship with the script, by file name.
    pub images: MapFiles,
}

/// Tree that grows on a WololoKingdoms forest slot.
fn forest_tree(terrain: Terrain) -> Option<&'static str> {
    match terrain {
        Terrain::FOREST => Some("FOREST_TREE"),
        Terrain::PALM_DESERT => Some("PALMTREE"),
        Terrain::SNOW_FOREST => Some("SNOWPINETREE"),
        _ => None,
    }
}

/// Tree that should grow on a converted HD Edition forest.
fn replacement_tree(old_terrain: Terrain) -> &'static str {
    if old_terrain == Terrain::DRAGON_FOREST {
        "DRAGONTREE"
    } else {
        "DLC_RAINTREE"
    }
}

/// Converts HD Edition map scripts to use WololoKingdoms terrain slots.
///
/// ## Usage
///
/// ```rust
/// use std::collections::BTreeMap;
/// use wololo_rms::{MapConverter, TerrainCatalog};
/// # fn main() -> Result<(), wololo_rms::ConvertError> {
/// let catalog = TerrainCatalog::default();
/// let mut graphics: BTreeMap<String, Vec<u8>> = BTreeMap::new();
/// graphics.insert("DLC_RAINFOREST.slp".into(), vec![0; 16]);
///
/// let converter = MapConverter::new(&catalog, &graphics)?;
/// let files = converter.convert("jungle.rms", b"#const DLC_RAINFOREST 56\n")?;
/// assert!(files.contains_key("15011.slp"));
/// # Ok(())
/// # }
/// ```
pub struct MapConverter<'a, G: ?Sized> {
    catalog: &'a TerrainCatalog,
    graphics: &'a G,
    anchors: Anchors,
}

impl<'a, G> MapConverter<'a, G>
where
    G: TerrainGraphics + ?Sized,
{
    /// Create a converter using the given catalog and graphics.
    pub fn new(catalog: &'a TerrainCatalog, graphics: &'a G) -> Result<Self, ConvertError> {
        Ok(Self {
            catalog,
            graphics,
            anchors: Anchors::new()?,
        })
    }

    /// The terrain catalog in use.
    pub fn catalog(&self) -> &TerrainCatalog {
        self.catalog
    }

    /// Convert a map script file. The result holds the script under `name` and any graphics it
    /// needs.
    ///
    /// If the result is a single file, it can be saved as a plain script; otherwise it needs to be
    /// packaged as a `ZR@` map.
    pub fn convert(&self, name: &str, source: &[u8]) -> Result<MapFiles, ConvertError> {
        let Conversion { script, mut images } = self.convert_text(&text::decode(source))?;
        images.insert(name.to_string(), text::encode(&script));
        Ok(images)
    }

    /// Convert the text of a map script.
    pub fn convert_text(&self, source: &str) -> Result<Conversion, ConvertError> {
        let mut usage = TerrainUsage::new();
        for rule in &self.catalog.rules {
            if rule
                .const_names
                .iter()
                .any(|name| text::contains_token(source, name))
            {
                // Savannah and up are not part of the fallback search.
                if rule.new_terrain < Terrain::SAVANNAH {
                    usage.mark(rule.new_terrain);
                }
                usage.mark(rule.old_terrain);
            }
        }

        let mut script = source.to_string();
        let mut images = MapFiles::new();
        for rule in &self.catalog.rules {
            if !usage.is_used(rule.old_terrain) {
                continue;
            }
            let terrain = self.choose_slot(rule, &mut usage, source);
            script = self.rewrite_constants(script, rule, terrain)?;

            let skip = match rule.group {
                TerrainGroup::None => true,
                TerrainGroup::Water => usage.uses_multiple_water(source),
                _ => false,
            };
            if skip {
                continue;
            }
            let image_name = match self.catalog.image_name(terrain) {
                Some(name) => name,
                None => {
                    log::warn!("no graphic slot for terrain {}", terrain);
                    continue;
                }
            };
            images.insert(image_name.to_string(), self.graphics.read(&rule.slp_name)?);
            log::debug!("{} installed as {}", rule.slp_name, image_name);

            if rule.group == TerrainGroup::Forest {
                if let Some(old_tree) = forest_tree(terrain) {
                    let line = format!(
                        "  effect_amount GAIA_UPGRADE_UNIT {} {} 0",
                        old_tree,
                        replacement_tree(rule.old_terrain)
                    );
                    script = self.anchors.add_player_setup_line(&script, &line);
                }
            }
        }

        if usage.is_used(Terrain::DESERT2) {
            for name in &self.catalog.desert2_images {
                images.insert(name.clone(), self.graphics.read(name)?);
            }
        }

        Ok(Conversion { script, images })
    }

    /// Pick the slot for a rule's terrain, and claim it.
    fn choose_slot(&self, rule: &ReplacementRule, usage: &mut TerrainUsage, source: &str) -> Terrain {
        let mut terrain = rule.new_terrain;
        if rule.group.has_fallback() && usage.script_uses(terrain, source, self.catalog) {
            let fallback = self
                .catalog
                .group_members(rule.group)
                .iter()
                .map(|member| member.terrain)
                .find(|&slot| {
                    !usage.is_used(slot) && !usage.script_uses(slot, source, self.catalog)
                });
            if let Some(free) = fallback {
                terrain = free;
            } else if rule.group == TerrainGroup::Land
                && !usage.is_used(Terrain::LEAVES)
                && !usage.script_uses(Terrain::LEAVES, source, self.catalog)
            {
                terrain = Terrain::LEAVES;
            } else {
                log::warn!(
                    "no free slot for {}, sharing terrain {} with the script",
                    rule.replaced_name,
                    terrain
                );
            }
        }
        usage.claim(terrain);
        log::debug!(
            "{} ({}) uses terrain {}",
            rule.replaced_name,
            rule.old_terrain,
            terrain
        );
        terrain
    }

    /// Point the rule's constants at `terrain`.
    fn rewrite_constants(
        &self,
        script: String,
        rule: &ReplacementRule,
        terrain: Terrain,
    ) -> Result<String, ConvertError> {
        if terrain == rule.new_terrain {
            let names = rule
                .const_names
                .iter()
                .map(|name| regex::escape(name))
                .collect::<Vec<_>>()
                .join("|");
            let definition = Regex::new(&format!(
                r"#const\s+({})\s+{}\b",
                names, rule.old_terrain
            ))?;
            let replacement = format!("#const ${{1}} {}", terrain);
            return Ok(definition
                .replace_all(&script, replacement.as_str())
                .into_owned());
        }

        let alias = format!("MY{}", rule.replaced_name);
        let script = text::replace_tokens(&script, &rule.const_names, &alias);
        let definition = Regex::new(&format!(
            r"#const\s+{}\s+{}\b",
            regex::escape(&alias),
            rule.old_terrain
        ))?;
        let line = format!("#const {} {}", alias, terrain);
        if definition.is_match(&script) {
            Ok(definition
                .replace_all(&script, NoExpand(&line))
                .into_owned())
        } else {
            Ok(format!("{}{}{}", line, text::line_ending(&script), script))
        }
    }
}
