use anyhow::{bail, Context, Result};
use image::GenericImageView;
use log::{info, warn};
use std::path::Path;

use super::device::Device;
use crate::gl_call;

/// Longueur du tableau `u_Textures` déclaré par le fragment shader.
pub const MAX_TEXTURE_SLOTS: usize = 8;

/// Pixels RGBA8 décodés, prêts pour l'upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Décode une image en RGBA8, retournée verticalement (OpenGL attend l'origine en bas à gauche).
pub fn decode_rgba8<P: AsRef<Path>>(path: P) -> Result<DecodedImage> {
    let path = path.as_ref();
    let img = image::open(path)
        .with_context(|| format!("Failed to load texture '{}'", path.display()))?
        .flipv();
    let (width, height) = img.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: img.to_rgba8().into_raw(),
    })
}

#[derive(Debug)]
pub struct Texture {
    id: u32,
    width: u32,
    height: u32,
    label: String,
}

impl Texture {
    pub fn from_rgba8<D: Device + ?Sized>(
        device: &mut D,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            bail!(
                "Texture '{}': {} bytes for {}x{} RGBA8 (expected {})",
                label,
                pixels.len(),
                width,
                height,
                expected
            );
        }
        let id = gl_call!(device, device.create_texture_rgba8(width, height, pixels));
        Ok(Self {
            id,
            width,
            height,
            label: label.to_string(),
        })
    }

    pub fn from_file<D: Device + ?Sized, P: AsRef<Path>>(device: &mut D, path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = decode_rgba8(path)?;
        let texture = Self::from_rgba8(
            device,
            &path.display().to_string(),
            image.width,
            image.height,
            &image.pixels,
        )?;
        info!(
            "🖼️ Texture '{}' loaded ({}x{})",
            texture.label, texture.width, texture.height
        );
        Ok(texture)
    }

    /// Damier 2x2 magenta/noir.
    pub fn checkerboard<D: Device + ?Sized>(device: &mut D) -> Self {
        const MAGENTA: [u8; 4] = [255, 0, 255, 255];
        const BLACK: [u8; 4] = [0, 0, 0, 255];
        let pixels: Vec<u8> = [MAGENTA, BLACK, BLACK, MAGENTA].concat();
        let id = gl_call!(device, device.create_texture_rgba8(2, 2, &pixels));
        Self {
            id,
            width: 2,
            height: 2,
            label: "checkerboard".to_string(),
        }
    }

    /// Charge `path`, ou le damier si le fichier est illisible.
    pub fn load_or_fallback<D: Device + ?Sized, P: AsRef<Path>>(device: &mut D, path: P) -> Self {
        match Self::from_file(device, path.as_ref()) {
            Ok(texture) => texture,
            Err(e) => {
                warn!("{:#}; using checkerboard fallback", e);
                Self::checkerboard(device)
            }
        }
    }

    pub fn bind<D: Device + ?Sized>(&self, device: &mut D, slot: u32) {
        gl_call!(device, device.bind_texture_unit(slot, self.id));
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn destroy<D: Device + ?Sized>(self, device: &mut D) {
        gl_call!(device, device.delete_texture(self.id));
    }
}

/// Table slot → texture, rétablie avant chaque draw.
///
/// La texture d'indice `i` est liée à l'unité `i`.
#[derive(Debug, Default)]
pub struct TextureSlots {
    textures: Vec<Texture>,
}

impl TextureSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute une texture et retourne son slot.
    pub fn push(&mut self, texture: Texture) -> Result<u32> {
        if self.textures.len() >= MAX_TEXTURE_SLOTS {
            bail!(
                "Cannot bind texture '{}': all {} slots are in use",
                texture.label(),
                MAX_TEXTURE_SLOTS
            );
        }
        self.textures.push(texture);
        Ok((self.textures.len() - 1) as u32)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn get(&self, slot: u32) -> Option<&Texture> {
        self.textures.get(slot as usize)
    }

    pub fn bind_all<D: Device + ?Sized>(&self, device: &mut D) {
        for (slot, texture) in self.textures.iter().enumerate() {
            texture.bind(device, slot as u32);
        }
    }

    /// Valeurs pour l'uniform `u_Textures` : `[0, 1, .., MAX_TEXTURE_SLOTS)`.
    pub fn sampler_indices() -> [i32; MAX_TEXTURE_SLOTS] {
        std::array::from_fn(|i| i as i32)
    }

    pub fn destroy<D: Device + ?Sized>(self, device: &mut D) {
        for texture in self.textures {
            texture.destroy(device);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer_engine::recording_device::RecordingDevice;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        // Ligne du haut rouge, le reste bleu
        let img = image::RgbaImage::from_fn(width, height, |_, y| {
            if y == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_decode_flips_vertically() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "stripe.png", 3, 2);

        let image = decode_rgba8(&path).unwrap();
        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(image.pixels.len(), 3 * 2 * 4);
        // La ligne rouge se retrouve en dernier
        assert_eq!(&image.pixels[..4], &[0, 0, 255, 255]);
        assert_eq!(&image.pixels[3 * 4..3 * 4 + 4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_from_file_uploads_texture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "logo.png", 4, 4);
        let mut device = RecordingDevice::new();

        let texture = Texture::from_file(&mut device, &path).unwrap();
        assert_eq!(device.texture_size(texture.id()), Some((4, 4)));
        assert!(device.raised_errors().is_empty());
    }

    #[test]
    fn test_missing_file_falls_back_to_checkerboard() {
        let mut device = RecordingDevice::new();
        let texture = Texture::load_or_fallback(&mut device, "does/not/exist.png");
        assert_eq!(texture.label(), "checkerboard");
        assert_eq!(device.texture_size(texture.id()), Some((2, 2)));
    }

    #[test]
    fn test_from_rgba8_rejects_wrong_pixel_count() {
        let mut device = RecordingDevice::new();
        assert!(Texture::from_rgba8(&mut device, "bad", 2, 2, &[0; 15]).is_err());
        assert_eq!(device.live_texture_count(), 0);
    }

    #[test]
    fn test_slots_bind_in_order() {
        let mut device = RecordingDevice::new();
        let mut slots = TextureSlots::new();
        let a = Texture::checkerboard(&mut device);
        let b = Texture::checkerboard(&mut device);
        let (id_a, id_b) = (a.id(), b.id());
        assert_eq!(slots.push(a).unwrap(), 0);
        assert_eq!(slots.push(b).unwrap(), 1);

        slots.bind_all(&mut device);
        assert_eq!(device.bound_texture(0), id_a);
        assert_eq!(device.bound_texture(1), id_b);
    }

    #[test]
    fn test_slots_refuse_more_than_max() {
        let mut device = RecordingDevice::new();
        let mut slots = TextureSlots::new();
        for _ in 0..MAX_TEXTURE_SLOTS {
            slots.push(Texture::checkerboard(&mut device)).unwrap();
        }
        assert!(slots.push(Texture::checkerboard(&mut device)).is_err());
        assert_eq!(slots.len(), MAX_TEXTURE_SLOTS);
    }

    #[test]
    fn test_sampler_indices() {
        assert_eq!(TextureSlots::sampler_indices(), [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_destroy_releases_all_textures() {
        let mut device = RecordingDevice::new();
        let mut slots = TextureSlots::new();
        slots.push(Texture::checkerboard(&mut device)).unwrap();
        slots.push(Texture::checkerboard(&mut device)).unwrap();
        slots.destroy(&mut device);
        assert_eq!(device.live_texture_count(), 0);
    }
}
