use crate::{ConvertError, MapConverter, MapFiles, TerrainCatalog, TerrainGraphics};
use std::fs::{self, File};
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Options for converting a directory of maps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Overwrite maps that already exist in the output directory.
    pub replace: bool,
}

/// What happened to the maps in a directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertStats {
    /// Maps that were converted.
    pub converted: usize,
    /// `ZR@` maps that were copied as they are.
    pub copied: usize,
    /// Maps that were left alone.
    pub skipped: usize,
}

/// Package map files as a `ZR@` map: an uncompressed zip archive.
pub fn write_zr_map<W: Write + Seek>(output: W, files: &MapFiles) -> Result<W, ConvertError> {
    let mut zip = ZipWriter::new(output);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, data) in files {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(data)?;
    }
    Ok(zip.finish()?)
}

/// Read all files from a `ZR@` map.
pub fn read_zr_map<R: Read + Seek>(input: R) -> Result<MapFiles, ConvertError> {
    let mut zip = ZipArchive::new(input)?;
    let mut files = MapFiles::new();
    for index in 0..zip.len() {
        let mut file = zip.by_index(index)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        files.insert(file.name().to_string(), data);
    }
    Ok(files)
}

/// Check if `source` was modified after `target`, or `target` does not exist.
fn is_newer(source: &Path, target: &Path) -> io::Result<bool> {
    let target = match fs::metadata(target) {
        Ok(metadata) => metadata.modified()?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(err) => return Err(err),
    };
    Ok(fs::metadata(source)?.modified()? > target)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        result => result,
    }
}

impl<'a, G> MapConverter<'a, G>
where
    G: TerrainGraphics + ?Sized,
{
    /// Convert every `.rms` file in `input_dir`, writing the results to `output_dir`.
    ///
    /// - `ZR@` maps are copied as they are, if the output does not have them yet or has an older
    ///   version.
    /// - `es_` maps are skipped.
    /// - Maps that already exist in the output, as plain or `ZR@` maps, are skipped unless
    ///   `options.replace` is set.
    /// - `rw_` and `sm_` maps are packaged with the scenario of the same name.
    pub fn convert_dir(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        options: ConvertOptions,
    ) -> Result<ConvertStats, ConvertError> {
        let mut stats = ConvertStats::default();
        for entry in WalkDir::new(input_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || !path
                    .extension()
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("rms"))
            {
                continue;
            }
            let name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };

            if name.starts_with("ZR@") {
                let target = output_dir.join(&name);
                if options.replace || is_newer(path, &target)? {
                    fs::copy(path, target)?;
                    stats.copied += 1;
                } else {
                    stats.skipped += 1;
                }
                continue;
            }
            if name.starts_with("es_") {
                log::debug!("skipping {}", name);
                stats.skipped += 1;
                continue;
            }

            let plain = output_dir.join(&name);
            let packaged = output_dir.join(format!("ZR@{}", name));
            if plain.exists() || packaged.exists() {
                if !options.replace {
                    log::info!("{} already exists, skipping", name);
                    stats.skipped += 1;
                    continue;
                }
                remove_if_exists(&plain)?;
                remove_if_exists(&packaged)?;
            }

            let mut files = self.convert(&name, &fs::read(path)?)?;
            if name.starts_with("rw_") || name.starts_with("sm_") {
                let scenario = path.with_extension("scx");
                let scenario_name = format!(
                    "{}.scx",
                    path.file_stem().and_then(|s| s.to_str()).unwrap_or(&name)
                );
                let data = fs::read(&scenario).map_err(|err| match err.kind() {
                    io::ErrorKind::NotFound => ConvertError::MissingAsset {
                        name: scenario_name.clone(),
                    },
                    _ => err.into(),
                })?;
                files.insert(scenario_name, data);
            }

            if files.len() == 1 {
                if let Some(script) = files.remove(&name) {
                    fs::write(&plain, script)?;
                }
            } else {
                log::debug!("packaging {} with {} extra files", name, files.len() - 1);
                write_zr_map(File::create(&packaged)?, &files)?;
            }
            stats.converted += 1;
        }
        log::info!(
            "maps: {} converted, {} copied, {} skipped",
            stats.converted,
            stats.copied,
            stats.skipped
        );
        Ok(stats)
    }
}

/// Convert a directory of maps with the built-in terrain catalog.
pub fn convert_maps<G>(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    graphics: &G,
    options: ConvertOptions,
) -> Result<ConvertStats, ConvertError>
where
    G: TerrainGraphics + ?Sized,
{
    let catalog = TerrainCatalog::default();
    MapConverter::new(&catalog, graphics)?.convert_dir(
        input_dir.as_ref(),
        output_dir.as_ref(),
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn graphics() -> BTreeMap<String, Vec<u8>> {
        let mut graphics = BTreeMap::new();
        graphics.insert("DLC_RAINFOREST.slp".to_string(), b"rainforest".to_vec());
        graphics
    }

    #[test]
    fn zr_map_round_trip() -> anyhow::Result<()> {
        let mut files = MapFiles::new();
        files.insert("jungle.rms".into(), b"#const DLC_RAINFOREST 10\n".to_vec());
        files.insert("15011.slp".into(), vec![1, 2, 3]);
        let zip = write_zr_map(io::Cursor::new(vec![]), &files)?;
        assert_eq!(read_zr_map(io::Cursor::new(zip.into_inner()))?, files);
        Ok(())
    }

    #[test]
    fn converts_a_directory() -> anyhow::Result<()> {
        let input = tempfile::tempdir()?;
        let output = tempfile::tempdir()?;
        fs::write(input.path().join("plain.rms"), b"base_terrain GRASS\n")?;
        fs::write(
            input.path().join("jungle.rms"),
            b"#const DLC_RAINFOREST 56\nbase_terrain DLC_RAINFOREST\n",
        )?;
        fs::write(input.path().join("ZR@packed.rms"), b"zip")?;
        fs::write(input.path().join("es_voobly.rms"), b"base_terrain GRASS\n")?;
        fs::write(input.path().join("rw_regicide.rms"), b"base_terrain GRASS\n")?;
        fs::write(input.path().join("rw_regicide.scx"), b"scenario")?;
        fs::write(input.path().join("notes.txt"), b"not a map")?;

        let stats = convert_maps(input.path(), output.path(), &graphics(), Default::default())?;
        assert_eq!(
            stats,
            ConvertStats {
                converted: 3,
                copied: 1,
                skipped: 1
            }
        );

        assert_eq!(fs::read(output.path().join("plain.rms"))?, b"base_terrain GRASS\n");
        assert_eq!(fs::read(output.path().join("ZR@packed.rms"))?, b"zip");
        assert!(!output.path().join("es_voobly.rms").exists());
        assert!(!output.path().join("jungle.rms").exists());

        let jungle = read_zr_map(File::open(output.path().join("ZR@jungle.rms"))?)?;
        assert_eq!(jungle["15011.slp"], b"rainforest");
        assert!(String::from_utf8(jungle["jungle.rms"].clone())?.contains("#const DLC_RAINFOREST 10"));

        let regicide = read_zr_map(File::open(output.path().join("ZR@rw_regicide.rms"))?)?;
        assert_eq!(regicide["rw_regicide.scx"], b"scenario");
        Ok(())
    }

    #[test]
    fn existing_maps_are_kept_unless_replacing() -> anyhow::Result<()> {
        let input = tempfile::tempdir()?;
        let output = tempfile::tempdir()?;
        fs::write(input.path().join("plain.rms"), b"base_terrain GRASS\n")?;
        fs::write(output.path().join("ZR@plain.rms"), b"old")?;

        let stats = convert_maps(input.path(), output.path(), &graphics(), Default::default())?;
        assert_eq!(stats.skipped, 1);
        assert_eq!(fs::read(output.path().join("ZR@plain.rms"))?, b"old");

        let stats = convert_maps(
            input.path(),
            output.path(),
            &graphics(),
            ConvertOptions { replace: true },
        )?;
        assert_eq!(stats.converted, 1);
        assert!(!output.path().join("ZR@plain.rms").exists());
        assert!(output.path().join("plain.rms").exists());
        Ok(())
    }

    #[test]
    fn packaged_maps_are_updated_when_newer() -> anyhow::Result<()> {
        let input = tempfile::tempdir()?;
        let output = tempfile::tempdir()?;
        let source = input.path().join("ZR@packed.rms");
        let target = output.path().join("ZR@packed.rms");
        fs::write(&source, b"new")?;
        fs::write(&target, b"old")?;

        let now = std::time::SystemTime::now();
        File::options()
            .write(true)
            .open(&source)?
            .set_modified(now - std::time::Duration::from_secs(60))?;
        File::options().write(true).open(&target)?.set_modified(now)?;
        let stats = convert_maps(input.path(), output.path(), &graphics(), Default::default())?;
        assert_eq!(stats.skipped, 1);
        assert_eq!(fs::read(&target)?, b"old");

        File::options()
            .write(true)
            .open(&source)?
            .set_modified(now + std::time::Duration::from_secs(60))?;
        let stats = convert_maps(input.path(), output.path(), &graphics(), Default::default())?;
        assert_eq!(stats.copied, 1);
        assert_eq!(fs::read(&target)?, b"new");
        Ok(())
    }

    #[test]
    fn scenario_maps_need_their_scenario() -> anyhow::Result<()> {
        let input = tempfile::tempdir()?;
        let output = tempfile::tempdir()?;
        fs::write(input.path().join("sm_missing.rms"), b"base_terrain GRASS\n")?;
        let result = convert_maps(input.path(), output.path(), &graphics(), Default::default());
        assert!(matches!(
            result,
            Err(ConvertError::MissingAsset { name }) if name == "sm_missing.scx"
        ));
        Ok(())
    }
}
