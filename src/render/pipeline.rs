//! Side compositing and the async render entry point.

use image::{DynamicImage, RgbaImage};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::fonts::FontBook;
use super::layers::{draw_background, draw_photo, draw_signature};
use super::text::draw_field;
use crate::error::{CardError, Result};
use crate::model::{EmployeeResource, Side, SideKind, Template};
use crate::resource::{ImageSource, short_ref};

/// Output bitmap size. Twice the 300×480 design surface.
pub const CARD_WIDTH: u32 = 600;
pub const CARD_HEIGHT: u32 = 960;

/// Font sizes, stroke widths and shadow blurs are multiplied by this.
pub const RENDER_SCALE: f32 = 2.0;

/// Decoded inputs for one side. `None` means absent or failed to load.
#[derive(Debug, Clone, Default)]
pub struct CardImages {
    pub background: Option<DynamicImage>,
    pub photo: Option<DynamicImage>,
    pub signature: Option<DynamicImage>,
}

/// Draw a side with already-decoded images.
///
/// Background, photo (front only), signature, then fields in list order.
pub fn compose(kind: SideKind, side: &Side, images: &CardImages, fonts: &FontBook) -> RgbaImage {
    let mut canvas = RgbaImage::new(CARD_WIDTH, CARD_HEIGHT);

    draw_background(&mut canvas, images.background.as_ref());

    if kind == SideKind::Front
        && let Some(photo) = &images.photo
    {
        draw_photo(&mut canvas, &side.photo, photo, RENDER_SCALE);
    }

    if let Some(signature) = &images.signature {
        draw_signature(&mut canvas, &side.signature, signature, RENDER_SCALE);
    }

    for field in &side.fields {
        draw_field(&mut canvas, field, fonts, RENDER_SCALE);
    }

    canvas
}

/// Fetches a side's images and composites it.
///
/// Renders on one renderer run one at a time; a second call waits for the
/// first to finish.
pub struct CardRenderer {
    source: Arc<dyn ImageSource>,
    fonts: Arc<FontBook>,
    gate: Mutex<()>,
}

impl CardRenderer {
    pub fn new(source: Arc<dyn ImageSource>, fonts: Arc<FontBook>) -> Self {
        Self {
            source,
            fonts,
            gate: Mutex::new(()),
        }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Render one side at 600×960.
    ///
    /// All three images are fetched concurrently and awaited before drawing
    /// starts. A failed load is logged and its layer falls back; it is never
    /// returned as an error.
    pub async fn render(
        &self,
        kind: SideKind,
        side: &Side,
        employee: Option<&EmployeeResource>,
    ) -> Result<RgbaImage> {
        let _turn = self.gate.lock().await;

        let photo_ref = match kind {
            SideKind::Front if side.photo.visible => employee.and_then(|e| e.photo_ref.as_deref()),
            _ => None,
        };
        let signature_ref = if side.signature.visible {
            employee.and_then(|e| e.signature_ref.as_deref())
        } else {
            None
        };

        let (background, photo, signature) = tokio::join!(
            self.fetch("background", side.background.as_deref()),
            self.fetch("photo", photo_ref),
            self.fetch("signature", signature_ref),
        );
        debug!(
            side = kind.name(),
            background = background.is_some(),
            photo = photo.is_some(),
            signature = signature.is_some(),
            "images resolved"
        );

        let images = CardImages {
            background,
            photo,
            signature,
        };
        let side = side.clone();
        let fonts = Arc::clone(&self.fonts);
        let canvas = tokio::task::spawn_blocking(move || compose(kind, &side, &images, &fonts))
            .await
            .map_err(|e| CardError::Render(format!("Render task failed: {}", e)))?;

        debug!(side = kind.name(), "side composited");
        Ok(canvas)
    }

    /// Render front then back.
    pub async fn render_template(
        &self,
        template: &Template,
        employee: Option<&EmployeeResource>,
    ) -> Result<(RgbaImage, RgbaImage)> {
        let front = self.render(SideKind::Front, &template.front, employee).await?;
        let back = self.render(SideKind::Back, &template.back, employee).await?;
        Ok((front, back))
    }

    async fn fetch(&self, layer: &'static str, reference: Option<&str>) -> Option<DynamicImage> {
        let reference = reference.map(str::trim).filter(|r| !r.is_empty())?;
        match self.source.load(reference).await {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(
                    layer,
                    reference = short_ref(reference),
                    error = %e,
                    "image unavailable, drawing without it"
                );
                None
            }
        }
    }
}
