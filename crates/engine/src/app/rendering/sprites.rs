use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use image::ImageReader;
use tracing::warn;

use crate::resource_names::validate_resource_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadedSprite {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl LoadedSprite {
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.rgba[idx],
            self.rgba[idx + 1],
            self.rgba[idx + 2],
            self.rgba[idx + 3],
        ]
    }
}

/// Decoded PNGs keyed by image name. Failures are cached too, so a broken
/// image is reported once and then skipped.
#[derive(Debug)]
pub(crate) struct SpriteCache {
    images_dir: PathBuf,
    sprites: HashMap<String, Option<LoadedSprite>>,
    warned: HashSet<String>,
}

impl SpriteCache {
    pub(crate) fn new(images_dir: PathBuf) -> Self {
        Self {
            images_dir,
            sprites: HashMap::new(),
            warned: HashSet::new(),
        }
    }

    pub(crate) fn get(&mut self, name: &str) -> Option<&LoadedSprite> {
        if !self.sprites.contains_key(name) {
            let loaded = self.load(name);
            self.sprites.insert(name.to_string(), loaded);
        }
        self.sprites.get(name).and_then(Option::as_ref)
    }

    fn load(&mut self, name: &str) -> Option<LoadedSprite> {
        let result = validate_resource_name(name)
            .map_err(|error| format!("invalid_name:{error}"))
            .map(|()| self.images_dir.join(format!("{name}.png")))
            .and_then(|path| load_sprite_rgba(&path));
        match result {
            Ok(sprite) => Some(sprite),
            Err(reason) => {
                if self.warned.insert(name.to_string()) {
                    warn!(
                        image = name,
                        dir = %self.images_dir.display(),
                        reason = reason.as_str(),
                        "renderer_sprite_load_failed"
                    );
                }
                None
            }
        }
    }
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn loads_png_and_caches_it() {
        let temp = TempDir::new().expect("tempdir");
        let mut image = image::RgbaImage::new(2, 1);
        image.put_pixel(1, 0, image::Rgba([1, 2, 3, 255]));
        image.save(temp.path().join("dot.png")).expect("save");

        let mut cache = SpriteCache::new(temp.path().to_path_buf());
        let sprite = cache.get("dot").expect("sprite loads");
        assert_eq!((sprite.width, sprite.height), (2, 1));
        assert_eq!(sprite.pixel(1, 0), [1, 2, 3, 255]);

        std::fs::remove_file(temp.path().join("dot.png")).expect("remove");
        assert!(cache.get("dot").is_some());
    }

    #[test]
    fn missing_and_invalid_names_yield_none() {
        let temp = TempDir::new().expect("tempdir");
        let mut cache = SpriteCache::new(temp.path().to_path_buf());
        assert!(cache.get("nothing").is_none());
        assert!(cache.get("../escape").is_none());
        assert!(cache.get("nothing").is_none());
    }
}
