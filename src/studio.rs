//! Studio: the explicit context a host drives the renderer through
//!
//! It holds what a poster editor page keeps around between renders (the
//! current config, the loaded background, the flag catalog and the language)
//! and re-renders synchronously whenever the host reports a change.

use std::ops::Range;
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::assets::{AssetSource, BackgroundImage, BackgroundVariant, FlagCatalog, Language};
use crate::config::FormValues;
use crate::editor::{wrap_highlight, HighlightEdit};
use crate::rendering::compositor::compose;
use crate::rendering::paint::DisplayList;
use crate::rendering::raster::Rasterizer;
use crate::rendering::Frame;
use crate::{CanvasSize, RenderConfig, Result};

pub struct Studio {
    config: RenderConfig,
    language: Language,
    background: Option<Arc<BackgroundImage>>,
    flags: FlagCatalog,
    rasterizer: Rasterizer,
}

impl Studio {
    /// A studio with system fonts, localised sample text and footer.
    pub fn new(language: Language) -> Self {
        Self::with_rasterizer(language, Rasterizer::new())
    }

    pub fn with_rasterizer(language: Language, rasterizer: Rasterizer) -> Self {
        let mut studio = Self {
            config: RenderConfig::default(),
            language,
            background: None,
            flags: FlagCatalog::fallback(),
            rasterizer,
        };
        studio.config.text = language.sample_text().to_string();
        studio.refresh_footer(today());
        studio
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    /// Replace the whole config. A different background drops the loaded
    /// image so the next render never pairs one template with another's pixels.
    pub fn set_config(&mut self, config: RenderConfig) {
        let previous = self.config.background;
        self.config = config;
        if self.config.background != previous {
            log::debug!("background changed {} -> {}, dropping loaded image", previous, self.config.background);
            self.background = None;
        }
    }

    /// Replace the config from raw form values.
    pub fn apply_form(&mut self, form: &FormValues) {
        let config = form.to_render_config(&self.flags);
        self.set_config(config);
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language, resetting the sample text and footer caption.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.config.text = language.sample_text().to_string();
        self.refresh_footer(today());
    }

    /// Footer caption for the current background and language on `date`.
    pub fn refresh_footer(&mut self, date: NaiveDate) {
        self.config.footer_text = self.language.footer_text(self.config.background, date);
    }

    pub fn flags(&self) -> &FlagCatalog {
        &self.flags
    }

    pub fn set_flags(&mut self, catalog: FlagCatalog) {
        self.config.flags = catalog.default_pair();
        self.flags = catalog;
    }

    pub fn background(&self) -> Option<&Arc<BackgroundImage>> {
        self.background.as_ref()
    }

    /// Select a background; the image (if any) arrives later via
    /// `set_background_image`, until then renders use the solid fill.
    pub fn select_background(&mut self, variant: BackgroundVariant) {
        self.config.background = variant;
        self.background = None;
        self.refresh_footer(today());
    }

    pub fn set_background_image(&mut self, image: Option<BackgroundImage>) {
        self.background = image.map(Arc::new);
    }

    /// Install an image loaded for `variant`, selecting that variant first
    /// when it is not the current one.
    pub fn set_loaded_background(&mut self, variant: BackgroundVariant, image: Option<BackgroundImage>) {
        if self.config.background != variant {
            self.select_background(variant);
        }
        self.set_background_image(image);
    }

    /// Load the current background and the flag list synchronously.
    pub fn load_assets<S: AssetSource + ?Sized>(&mut self, source: &S) {
        self.set_background_image(source.load_background(self.config.background));
        self.set_flags(source.load_flags());
    }

    /// Surface size: the background's natural size, or the default.
    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize::for_background(self.background.as_deref())
    }

    /// Wrap the selected chars of the text in highlight markers.
    pub fn highlight_selection(&mut self, selection: Range<usize>) -> Option<usize> {
        let HighlightEdit { text, cursor } = wrap_highlight(&self.config.text, selection)?;
        self.config.text = text;
        Some(cursor)
    }

    pub fn display_list(&mut self) -> DisplayList {
        let size = self.canvas_size();
        compose(&self.config, self.background.as_ref(), size, &mut self.rasterizer)
    }

    /// Clear and fully repaint a frame.
    pub fn render(&mut self) -> Result<Frame> {
        let size = self.canvas_size();
        let list = self.display_list();
        self.rasterizer.rasterize(&list, size)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
