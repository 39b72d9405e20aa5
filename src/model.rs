//! The orchestrating model: sequences the measure and write batch passes,
//! translating between the store's text-encoded series and the numeric
//! blocks the engine and writer exchange.

use crate::cache::ImageCache;
use crate::config::TemplateParams;
use crate::error::MtfResult;
use crate::excel::SpreadsheetWriter;
use crate::mtf::{ImagePreprocessor, MtfEngine};
use crate::store::EdgeStore;
use crate::types::EdgePosition;
use tracing::{info, warn};

pub struct Model<W: SpreadsheetWriter> {
    store: EdgeStore,
    cache: ImageCache,
    engine: Box<dyn MtfEngine>,
    writer: W,
    params: TemplateParams,
}

impl<W: SpreadsheetWriter> Model<W> {
    pub fn new(
        loader: Box<dyn ImagePreprocessor>,
        engine: Box<dyn MtfEngine>,
        writer: W,
        params: TemplateParams,
    ) -> MtfResult<Self> {
        Ok(Model {
            store: EdgeStore::new()?,
            cache: ImageCache::new(loader),
            engine,
            writer,
            params,
        })
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn store(&self) -> &EdgeStore {
        &self.store
    }

    pub fn add_files<I, P>(&mut self, paths: I) -> MtfResult<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        self.store.add_files(paths)
    }

    pub fn names(&self) -> MtfResult<Vec<String>> {
        self.store.names()
    }

    /// Remove one record and its cached image.
    pub fn delete(&mut self, name: &str) -> MtfResult<()> {
        self.store.delete_by_name(name)?;
        self.cache.evict(name);
        Ok(())
    }

    /// Remove every record and drop all cached images.
    pub fn clear(&mut self) -> MtfResult<()> {
        self.store.delete_all()?;
        self.cache.clear();
        Ok(())
    }

    /// Measure every unprocessed record. A failing record is logged and
    /// left unprocessed; the batch always runs to the end.
    pub fn measure_all(&mut self) -> MtfResult<()> {
        let pending = self.store.unprocessed_paths()?;
        info!(count = pending.len(), "measuring unprocessed records");
        for path in pending {
            if let Err(error) = self.measure_one(&path) {
                warn!(%path, %error, "measurement failed; record left unprocessed");
            }
        }
        Ok(())
    }

    fn measure_one(&mut self, path: &str) -> MtfResult<()> {
        let (image, _fresh) = self.cache.get(path)?;
        let meta = &image.meta;
        let (manufacturer, mfr_params) = self.params.resolve(&meta.manufacturer)?;
        let sample_spacing = meta.pixel_spacing * mfr_params.magnification_for(&meta.mode);

        let n = self.engine.sample_count();
        let mut frequency = vec![f64::NAN; n];
        let mut columns: [Vec<f64>; 4] = [
            vec![f64::NAN; n],
            vec![f64::NAN; n],
            vec![f64::NAN; n],
            vec![f64::NAN; n],
        ];

        // A failed edge keeps its NaN column; the record still completes.
        for (slot, position) in EdgePosition::ALL.iter().enumerate() {
            match self.engine.measure_edge(&image, *position, sample_spacing) {
                Ok(curve) => {
                    copy_into(&mut frequency, &curve.frequency);
                    copy_into(&mut columns[slot], &curve.response);
                }
                Err(error) => {
                    warn!(path, position = %position, %error, "edge measurement failed");
                }
            }
        }

        let [left, right, top, bottom] = columns;
        self.store.update_result(
            path,
            manufacturer,
            &meta.mode,
            &meta.orientation,
            &frequency,
            &left,
            &right,
            &top,
            &bottom,
        )
    }

    /// Write every processed record through the write engine. A failing
    /// record is logged and does not block the rest of the batch.
    pub fn write_all(&mut self) -> MtfResult<()> {
        let records = self.store.processed_records()?;
        info!(count = records.len(), "writing processed records");
        for record in records {
            let data = record.matrix();
            if let Err(error) =
                self.writer
                    .write_data(&record.name, &record.manufacturer, &record.mode, &data)
            {
                warn!(name = %record.name, %error, "write failed; continuing with next record");
            }
        }
        Ok(())
    }

    /// Preprocessed image for display purposes, via the cache.
    pub fn image_for(
        &mut self,
        path: &str,
    ) -> MtfResult<std::sync::Arc<crate::types::PreprocessedImage>> {
        Ok(self.cache.get(path)?.0)
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }
}

fn copy_into(target: &mut [f64], source: &[f64]) {
    for (t, s) in target.iter_mut().zip(source.iter()) {
        *t = *s;
    }
}
