//! The state behind both frontends: where we are, what is listed, how to go back.
//!
//! A frontend renders [`Browser::entries`] as the Name/Size table and forwards
//! its three triggers: select folder, activate a row, back. Everything runs
//! synchronously; a large folder blocks the caller until its walk is done.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::format::{format_size_with, SizeUnits};
use crate::history::NavigationHistory;
use crate::listing::{list_directory_with_report, sort_by_size_desc, Entry};
use crate::opener::{Open, Opener};
use crate::size::ScanReport;

/// What activating a row did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The row was a folder and is now the current folder.
    Entered,
    /// The row was handed to the opener.
    Opened,
}

#[derive(Debug)]
pub struct Browser<O: Open = Opener> {
    history: NavigationHistory,
    entries: Vec<Entry>,
    report: ScanReport,
    units: SizeUnits,
    opener: O,
}

impl Default for Browser<Opener> {
    fn default() -> Self {
        Self::new(Opener::detect())
    }
}

impl<O: Open> Browser<O> {
    pub fn new(opener: O) -> Self {
        Self {
            history: NavigationHistory::new(),
            entries: Vec::new(),
            report: ScanReport::default(),
            units: SizeUnits::default(),
            opener,
        }
    }

    pub fn with_units(mut self, units: SizeUnits) -> Self {
        self.units = units;
        self
    }

    /// Show `folder`, typically one picked in a folder dialog.
    ///
    /// Nothing changes if the folder cannot be listed.
    pub fn select_folder<P: AsRef<Path>>(&mut self, folder: P) -> Result<()> {
        self.enter(folder.as_ref())
    }

    /// Double-click on a row: folders are entered, anything else is opened.
    pub fn activate<P: AsRef<Path>>(&mut self, path: P) -> Result<Activation> {
        let path = path.as_ref();
        if path.is_dir() {
            self.enter(path)?;
            Ok(Activation::Entered)
        } else {
            self.opener.open(path)?;
            Ok(Activation::Opened)
        }
    }

    /// Return to the previous folder and list it again.
    ///
    /// If the previous folder can no longer be listed, it still becomes
    /// current, the table is emptied and the listing error is returned.
    pub fn go_back(&mut self) -> Result<()> {
        let previous = self.history.go_back()?.to_path_buf();
        info!(folder = %previous.display(), "going back");
        if let Err(e) = self.show(&previous) {
            self.entries.clear();
            self.report = ScanReport::default();
            return Err(e);
        }
        Ok(())
    }

    /// List the current folder again.
    pub fn refresh(&mut self) -> Result<()> {
        let current = self.history.current()?.to_path_buf();
        self.show(&current)
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn current_folder(&self) -> Option<&Path> {
        self.history.current().ok()
    }

    /// Rows of the current folder, largest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn report(&self) -> &ScanReport {
        &self.report
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn units(&self) -> SizeUnits {
        self.units
    }

    pub fn total_size(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.size))
    }

    pub fn format(&self, bytes: u64) -> String {
        format_size_with(bytes, self.units)
    }

    fn enter(&mut self, folder: &Path) -> Result<()> {
        self.show(folder)?;
        info!(folder = %folder.display(), "entered folder");
        self.history.push(folder);
        Ok(())
    }

    fn show(&mut self, folder: &Path) -> Result<()> {
        let (mut entries, report) = list_directory_with_report(folder)?;
        sort_by_size_desc(&mut entries);
        self.entries = entries;
        self.report = report;
        Ok(())
    }
}

/// Row a frontend should keep selected after the table changed to `len` rows.
pub fn clamp_selection(selected: Option<usize>, len: usize) -> Option<usize> {
    match (selected, len) {
        (_, 0) => None,
        (None, _) => Some(0),
        (Some(i), len) => Some(i.min(len - 1)),
    }
}
