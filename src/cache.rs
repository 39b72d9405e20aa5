//! Memoizes the expensive decode+preprocess step per image.
//!
//! Keyed by display name, like the store. The decode routine runs at most
//! once between insert and the next eviction; measurement and display
//! callers share the same cached object.

use crate::error::MtfResult;
use crate::mtf::ImagePreprocessor;
use crate::types::{display_name, PreprocessedImage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct ImageCache {
    loader: Box<dyn ImagePreprocessor>,
    entries: HashMap<String, Arc<PreprocessedImage>>,
}

impl ImageCache {
    pub fn new(loader: Box<dyn ImagePreprocessor>) -> Self {
        ImageCache {
            loader,
            entries: HashMap::new(),
        }
    }

    /// Cached image for this path, decoding it on first request. The flag
    /// reports whether the image was freshly computed by this call.
    pub fn get(&mut self, path: &str) -> MtfResult<(Arc<PreprocessedImage>, bool)> {
        let name = display_name(path);
        if let Some(image) = self.entries.get(&name) {
            return Ok((Arc::clone(image), false));
        }
        debug!(path, "preprocessing image");
        let image = Arc::new(self.loader.preprocess(Path::new(path))?);
        self.entries.insert(name, Arc::clone(&image));
        Ok((image, true))
    }

    pub fn evict(&mut self, name: &str) {
        self.entries.remove(name);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
