//! Graphical User Interface for folder-sizes
//!
//! # Architecture
//!
//! A thin wrapper around [`folder_sizes::Browser`]. It uses `eframe` for
//! rendering and `rfd` for the native folder picker. Double-clicking a row
//! enters a folder or opens a file; the Back button walks the history.

use clap::Parser;
use eframe::egui;
use folder_sizes::{logging, Browser, Opener, SizeUnits};
use std::path::PathBuf;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "folder-sizes-gui", version, about = "Browse folder sizes in a window")]
struct Args {
    /// Folder to show at startup
    path: Option<PathBuf>,

    /// Label sizes GiB/MiB instead of GB/MB
    #[arg(long)]
    binary_units: bool,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct FolderSizesApp {
    browser: Browser,
    popup_message: Option<String>,
    selected_index: Option<usize>,
}

impl FolderSizesApp {
    fn new(browser: Browser, initial_path: Option<PathBuf>) -> Self {
        let mut app = Self {
            browser,
            popup_message: None,
            selected_index: None,
        };
        if let Some(path) = initial_path {
            app.select_folder(path);
        }
        app
    }

    fn report(&mut self, result: folder_sizes::Result<()>) {
        if let Err(e) = result {
            error!(error = %e, "action failed");
            self.popup_message = Some(e.to_string());
        }
        self.selected_index = None;
    }

    fn select_folder(&mut self, path: PathBuf) {
        let result = self.browser.select_folder(&path);
        self.report(result);
    }

    fn activate(&mut self, path: PathBuf) {
        let result = self.browser.activate(&path).map(|_| ());
        self.report(result);
    }

    fn go_back(&mut self) {
        let result = self.browser.go_back();
        self.report(result);
    }

    fn refresh(&mut self) {
        let result = self.browser.refresh();
        self.report(result);
    }
}

impl eframe::App for FolderSizesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track user actions to apply after rendering
        let mut should_pick_folder = false;
        let mut should_go_back = false;
        let mut should_refresh = false;
        let mut should_activate: Option<PathBuf> = None;

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("📂 Select Folder").clicked() {
                    should_pick_folder = true;
                }
                if ui
                    .add_enabled(self.browser.can_go_back(), egui::Button::new("← Back"))
                    .clicked()
                {
                    should_go_back = true;
                }
                if ui
                    .add_enabled(
                        self.browser.current_folder().is_some(),
                        egui::Button::new("⟳ Refresh"),
                    )
                    .clicked()
                {
                    should_refresh = true;
                }
            });
            ui.add_space(4.0);

            let location = self
                .browser
                .current_folder()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "No folder selected".to_string());
            ui.horizontal(|ui| {
                ui.label("Location:");
                ui.label(egui::RichText::new(location).color(egui::Color32::from_rgb(100, 200, 255)));
            });
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Items: {}", self.browser.entries().len()));
                ui.separator();
                ui.label(format!(
                    "Total: {}",
                    self.browser.format(self.browser.total_size())
                ));
                ui.separator();
                ui.label(format!(
                    "Skipped: {} entries",
                    self.browser.report().skipped.len()
                ));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    egui::Grid::new("entries")
                        .num_columns(2)
                        .striped(true)
                        .min_col_width(120.0)
                        .show(ui, |ui| {
                            ui.strong("Name");
                            ui.strong("Size");
                            ui.end_row();

                            for (idx, entry) in self.browser.entries().iter().enumerate() {
                                let icon = if entry.is_dir { "📁" } else { "📄" };
                                let is_selected = self.selected_index == Some(idx);
                                let response = ui.selectable_label(
                                    is_selected,
                                    format!("{} {}", icon, entry.name),
                                );

                                if response.clicked() {
                                    self.selected_index = Some(idx);
                                }
                                if response.double_clicked() {
                                    should_activate = Some(entry.path.clone());
                                }

                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        ui.label(self.browser.format(entry.size));
                                    },
                                );
                                ui.end_row();
                            }
                        });
                });
        });

        // Apply actions after rendering; listing blocks until the walk is done.
        if should_pick_folder {
            if let Some(path) = rfd::FileDialog::new().pick_folder() {
                self.select_folder(path);
            }
        }
        if should_go_back {
            self.go_back();
        }
        if should_refresh {
            self.refresh();
        }
        if let Some(path) = should_activate {
            self.activate(path);
        }

        // Popup modal
        let popup_msg = self.popup_message.clone();
        if let Some(message) = popup_msg {
            let mut should_close = false;
            egui::Window::new("Message")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(&message);
                    ui.add_space(10.0);

                    if ui.button("OK").clicked() {
                        should_close = true;
                    }
                });

            if should_close {
                self.popup_message = None;
            }
        }
    }
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    logging::init_logging();

    let units = if args.binary_units {
        SizeUnits::Binary
    } else {
        SizeUnits::Legacy
    };
    let browser = Browser::new(Opener::detect()).with_units(units);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 400.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "folder-sizes",
        options,
        Box::new(move |_cc| Ok(Box::new(FolderSizesApp::new(browser, args.path)))),
    )
}
