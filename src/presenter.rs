//! Presenter: translates UI events into model operations and pushes state
//! back into the view. The view itself (widgets, event loop) is external
//! and reached through the [`View`] trait.

use crate::error::{MtfError, MtfResult};
use crate::excel::{SpreadsheetWriter, WriteMode, NO_BOOK};
use crate::model::Model;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::warn;

/// How often the workbook picker is refreshed from the host.
pub const WORKBOOK_POLL_PERIOD: Duration = Duration::from_secs(2);

/// What the presenter needs from the GUI shell.
pub trait View {
    fn update_image_list(&mut self, names: Vec<String>);
    fn update_workbook_list(&mut self, options: Vec<String>);
    fn set_workbook_selection(&mut self, value: &str);
    fn set_active_cell_text(&mut self, value: &str);
    fn on_template_select(&mut self);
    fn on_active_cell_select(&mut self);

    fn selected_image(&self) -> Option<String>;
    fn selected_workbook(&self) -> String;
    fn selected_write_mode(&self) -> WriteMode;
}

/// Split a drop-event string into individual file paths. Paths containing
/// spaces arrive wrapped in `{ }`; the rest are whitespace-separated.
pub fn split_drop_string(event_string: &str) -> Vec<String> {
    static BOUNDED: OnceLock<Regex> = OnceLock::new();
    let bounded = BOUNDED.get_or_init(|| Regex::new(r"\{[^}{]*\}").expect("valid drop regex"));

    let mut paths: Vec<String> = bounded
        .find_iter(event_string)
        .map(|m| m.as_str().trim_matches(|c| c == '{' || c == '}').to_string())
        .collect();

    let remainder = bounded.replace_all(event_string, " ");
    paths.extend(remainder.split_whitespace().map(str::to_string));
    paths
}

pub struct Presenter<V: View, W: SpreadsheetWriter> {
    model: Model<W>,
    view: V,
}

impl<V: View, W: SpreadsheetWriter> Presenter<V, W> {
    pub fn new(model: Model<W>, view: V) -> Self {
        Presenter { model, view }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn model(&self) -> &Model<W> {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model<W> {
        &mut self.model
    }

    fn update_image_list(&mut self) -> MtfResult<()> {
        let names = self.model.names()?;
        self.view.update_image_list(names);
        Ok(())
    }

    pub fn handle_files_dropped(&mut self, event_string: &str) -> MtfResult<()> {
        let dropped = split_drop_string(event_string);
        self.model.add_files(dropped)?;
        self.update_image_list()
    }

    pub fn handle_delete(&mut self) -> MtfResult<()> {
        if let Some(name) = self.view.selected_image() {
            self.model.delete(&name)?;
        }
        self.update_image_list()
    }

    pub fn handle_clear(&mut self) -> MtfResult<()> {
        self.model.clear()?;
        self.update_image_list()
    }

    pub fn handle_workbook_selected(&mut self) {
        let book = self.view.selected_workbook();
        self.model.writer_mut().select_book(&book);
    }

    pub fn handle_calculate(&mut self) -> MtfResult<()> {
        self.model.measure_all()
    }

    pub fn handle_write(&mut self) -> MtfResult<()> {
        self.model.write_all()
    }

    pub fn handle_calculate_write(&mut self) -> MtfResult<()> {
        self.handle_calculate()?;
        self.handle_write()
    }

    pub fn handle_write_mode(&mut self) {
        match self.view.selected_write_mode() {
            WriteMode::Template => self.handle_template_select(),
            WriteMode::ActiveCell => self.handle_active_select(),
        }
    }

    pub fn handle_template_select(&mut self) {
        self.view.on_template_select();
        self.model.writer_mut().set_write_mode(WriteMode::Template);
    }

    pub fn handle_active_select(&mut self) {
        self.view.on_active_cell_select();
        self.model
            .writer_mut()
            .set_write_mode(WriteMode::ActiveCell);
        self.handle_active_cell_refresh();
    }

    /// Re-capture the operator's selection as the write anchor. An invalid
    /// selection clears the shown cell so the operator reselects.
    pub fn handle_active_cell_refresh(&mut self) {
        match self.model.writer_mut().capture_active_cell() {
            Ok(address) => self.view.set_active_cell_text(&address),
            Err(error) => {
                warn!(%error, "active cell capture failed");
                self.view.set_active_cell_text("");
            }
        }
    }

    /// One workbook-list refresh tick. A lost host connection degrades to
    /// an empty picker with the `"-"` sentinel selected, never an error.
    pub fn refresh_workbook_list(&mut self) {
        match self.model.writer().book_names() {
            Ok(names) => self.view.update_workbook_list(names),
            Err(MtfError::SpreadsheetUnavailable(reason)) => {
                warn!(%reason, "workbook polling degraded to empty list");
                self.view.update_workbook_list(Vec::new());
                self.view.set_workbook_selection(NO_BOOK);
                self.model.writer_mut().select_book(NO_BOOK);
            }
            Err(error) => {
                warn!(%error, "workbook list refresh failed");
            }
        }
    }

    /// Self-rescheduling workbook-list refresh; each tick completes before
    /// the next is scheduled. Runs for the lifetime of the UI.
    pub async fn poll_workbooks(&mut self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.refresh_workbook_list();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_drop_string_plain_paths() {
        let paths = split_drop_string("/data/a.dcm /data/b.dcm");
        assert_eq!(paths, vec!["/data/a.dcm", "/data/b.dcm"]);
    }

    #[test]
    fn test_split_drop_string_braced_paths() {
        let paths = split_drop_string("{/data/with space/a.dcm} /data/b.dcm");
        assert_eq!(paths, vec!["/data/with space/a.dcm", "/data/b.dcm"]);
    }

    #[test]
    fn test_split_drop_string_mixed_order() {
        let paths = split_drop_string("/x/a.dcm {/y z/b.dcm} /x/c.dcm {/y z/d.dcm}");
        assert_eq!(
            paths,
            vec!["/y z/b.dcm", "/y z/d.dcm", "/x/a.dcm", "/x/c.dcm"]
        );
    }

    #[test]
    fn test_split_drop_string_empty() {
        assert!(split_drop_string("").is_empty());
        assert!(split_drop_string("   ").is_empty());
    }
}
