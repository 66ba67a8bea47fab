use eframe::egui;
use std::sync::mpsc;
use std::time::Duration;

use crate::backend::catalog::{self, Catalog, LoadSource};
use crate::backend::debounce::Debouncer;
use crate::backend::filter::{self, FilterCriteria, SortOrder};
use crate::backend::record::{ProductRecord, clean_url, twitter_handle};
use crate::backend::settings::{SUBMIT_FORM_URL, Settings, Theme};
use crate::gui::windows::settings::SettingsWindow;

pub struct DirectoryState {
    catalog: Catalog,
    criteria: FilterCriteria,
    visible: Vec<ProductRecord>,
    debouncer: Debouncer,
    json_modal: Option<(String, String)>,
}

impl DirectoryState {
    fn new(catalog: Catalog, debounce_delay: Duration) -> Self {
        let criteria = FilterCriteria::default();
        let visible = filter::apply(&catalog.products, &criteria);
        Self {
            catalog,
            criteria,
            visible,
            debouncer: Debouncer::new(debounce_delay),
            json_modal: None,
        }
    }

    fn recompute(&mut self) {
        self.visible = filter::apply(&self.catalog.products, &self.criteria);
    }
}

pub enum AppState {
    Loading(String),
    Directory(DirectoryState),
    Error(String),
}

pub struct GuiApp {
    state: AppState,
    settings: Settings,
    show_settings: bool,
    settings_window: SettingsWindow,
    pending: Option<mpsc::Receiver<anyhow::Result<Catalog>>>,
}

impl GuiApp {
    pub fn new(cc: &eframe::CreationContext<'_>, source: LoadSource, settings: Settings) -> Self {
        // Remote product logos go through the egui_extras image loaders.
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut app = Self {
            state: AppState::Loading(source.describe()),
            settings,
            show_settings: false,
            settings_window: SettingsWindow::new(),
            pending: None,
        };
        app.start_load(source);
        app
    }

    fn start_load(&mut self, source: LoadSource) {
        self.state = AppState::Loading(source.describe());
        self.pending = Some(catalog::spawn_load(source));
    }

    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()
        {
            self.start_load(LoadSource::File(path));
        }
    }

    fn poll_pending(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(catalog)) => {
                self.state = AppState::Directory(DirectoryState::new(
                    catalog,
                    Duration::from_millis(self.settings.debounce_ms),
                ));
                self.pending = None;
            }
            Ok(Err(e)) => {
                self.state = AppState::Error(format!("{e:#}"));
                self.pending = None;
            }
            Err(mpsc::TryRecvError::Empty) => {
                ctx.request_repaint_after(Duration::from_millis(100));
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                self.state = AppState::Error("Load worker exited unexpectedly".to_string());
                self.pending = None;
            }
        }
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        apply_style(ctx, &self.settings);
        self.poll_pending(ctx);

        let mut reload = false;
        let mut open_file = false;

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open CSV…").clicked() {
                        open_file = true;
                        ui.close_menu();
                    }
                    if ui.button("Reload feed").clicked() {
                        reload = true;
                        ui.close_menu();
                    }
                });
                if ui.button("Settings").clicked() {
                    self.show_settings = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Submit a product").clicked() {
                        ctx.open_url(egui::OpenUrl::new_tab(SUBMIT_FORM_URL));
                    }
                });
            });
        });

        if open_file {
            self.open_file_dialog();
        }
        if reload {
            self.start_load(LoadSource::Url(self.settings.feed_url.clone()));
        }

        if self.show_settings {
            let mut open = true;
            self.settings_window.show(ctx, &mut open, &mut self.settings);
            if !open {
                self.show_settings = false;
            }
        }

        let mut retry = false;

        match &mut self.state {
            AppState::Loading(name) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(100.0);
                        ui.heading(format!("Loading {name}…"));
                        ui.spinner();
                    });
                });
            }
            AppState::Error(msg) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(100.0);
                        ui.heading("Nothing to show");
                        ui.label(msg.as_str());
                        if ui.button("Retry").clicked() {
                            retry = true;
                        }
                    });
                });
            }
            AppState::Directory(state) => {
                state
                    .debouncer
                    .set_delay(Duration::from_millis(self.settings.debounce_ms));
                render_directory(state, ctx, &self.settings);
            }
        }

        if retry {
            self.start_load(LoadSource::Url(self.settings.feed_url.clone()));
        }
    }
}

fn render_directory(state: &mut DirectoryState, ctx: &egui::Context, settings: &Settings) {
    // Coalesced filter changes land here once the input has gone quiet.
    if state.debouncer.poll() {
        state.recompute();
    }
    if let Some(left) = state.debouncer.time_left() {
        ctx.request_repaint_after(left);
    }

    let mut recompute_now = false;

    egui::SidePanel::left("filter_panel")
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("Filters");
            ui.separator();

            ui.label("Sort by");
            let mut sort = state.criteria.sort;
            egui::ComboBox::from_id_salt("sort_order")
                .selected_text(sort.name())
                .show_ui(ui, |ui| {
                    for order in SortOrder::all() {
                        ui.selectable_value(&mut sort, *order, order.name());
                    }
                });
            if sort != state.criteria.sort {
                state.criteria.sort = sort;
                state.debouncer.trigger();
            }

            ui.separator();
            // Badge toggles apply immediately; only the multi-select
            // filters are debounced.
            if ui
                .checkbox(&mut state.criteria.flagship_only, "Flagship projects")
                .changed()
            {
                recompute_now = true;
            }
            if ui
                .checkbox(&mut state.criteria.s_tier_only, "S-tier only")
                .changed()
            {
                recompute_now = true;
            }
            if ui
                .checkbox(&mut state.criteria.new_only, "New products")
                .changed()
            {
                recompute_now = true;
            }

            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::CollapsingHeader::new("Categories")
                    .default_open(true)
                    .show(ui, |ui| {
                        facet_checkboxes(
                            ui,
                            &state.catalog.categories,
                            &mut state.criteria.categories,
                            &mut state.debouncer,
                        );
                    });
                egui::CollapsingHeader::new("Blockchains")
                    .default_open(true)
                    .show(ui, |ui| {
                        facet_checkboxes(
                            ui,
                            &state.catalog.blockchains,
                            &mut state.criteria.blockchains,
                            &mut state.debouncer,
                        );
                    });
            });

            if !state.criteria.is_unrestricted() {
                ui.separator();
                if ui.button("Clear filters").clicked() {
                    let sort = state.criteria.sort;
                    state.criteria = FilterCriteria {
                        sort,
                        ..Default::default()
                    };
                    recompute_now = true;
                }
            }
        });

    if recompute_now {
        state.recompute();
    }

    let mut json_request = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.heading("Products");
            ui.label(
                egui::RichText::new(format!(
                    "{} of {}",
                    state.visible.len(),
                    state.catalog.products.len()
                ))
                .color(egui::Color32::from_gray(150)),
            );
        });
        ui.separator();

        if state.visible.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                if state.catalog.is_empty() {
                    ui.label("No approved products in the feed.");
                } else {
                    ui.label("Nothing matches the current filters.");
                }
            });
            return;
        }

        let row_height = settings.row_height.max(40.0);
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show_rows(ui, row_height, state.visible.len(), |ui, row_range| {
                for product in &state.visible[row_range] {
                    if let Some(json) = product_row(ui, ctx, product, row_height) {
                        json_request = Some(json);
                    }
                    ui.separator();
                }
            });
    });

    if let Some(request) = json_request {
        state.json_modal = Some(request);
    }

    if let Some((name, json)) = &state.json_modal {
        let mut open = true;
        egui::Window::new(format!("{name} — record"))
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add(egui::TextEdit::multiline(&mut json.as_str()).code_editor());
                });
            });
        if !open {
            state.json_modal = None;
        }
    }
}

fn facet_checkboxes(
    ui: &mut egui::Ui,
    options: &[String],
    selected: &mut std::collections::HashSet<String>,
    debouncer: &mut Debouncer,
) {
    for option in options {
        let mut checked = selected.contains(option);
        if ui.checkbox(&mut checked, option).changed() {
            if checked {
                selected.insert(option.clone());
            } else {
                selected.remove(option);
            }
            debouncer.trigger();
        }
    }
}

/// One product row: logo, name with badges, description, meta line, links.
/// Returns the (name, json) pair when the user asks to inspect the record.
fn product_row(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    product: &ProductRecord,
    row_height: f32,
) -> Option<(String, String)> {
    let mut json_request = None;

    ui.horizontal(|ui| {
        let logo_side = row_height - 16.0;
        if product.logo_url.is_empty() {
            ui.add_sized([logo_side, logo_side], egui::Label::new("🌐"));
        } else {
            ui.add(
                egui::Image::from_uri(&product.logo_url)
                    .fit_to_exact_size(egui::vec2(logo_side, logo_side))
                    .corner_radius(4.0),
            );
        }

        ui.vertical(|ui| {
            ui.horizontal_wrapped(|ui| {
                let name = egui::Label::new(egui::RichText::new(&product.name).strong())
                    .sense(egui::Sense::click());
                let response = ui.add(name);
                if response.clicked() && !product.website.is_empty() {
                    ctx.open_url(egui::OpenUrl::new_tab(&product.website));
                }
                response.context_menu(|ui| {
                    if ui.button("View as JSON").clicked() {
                        let json = serde_json::to_string_pretty(product).unwrap_or_default();
                        json_request = Some((product.name.clone(), json));
                        ui.close();
                    }
                });

                if product.is_flagship {
                    ui.label(
                        egui::RichText::new("flagship")
                            .small()
                            .color(egui::Color32::from_rgb(240, 200, 80)),
                    );
                }
                if product.is_s_tier {
                    ui.label(
                        egui::RichText::new("S")
                            .small()
                            .color(egui::Color32::from_rgb(100, 200, 255)),
                    );
                }
                if product.is_new {
                    ui.label(
                        egui::RichText::new("new")
                            .small()
                            .color(egui::Color32::from_rgb(120, 220, 120)),
                    );
                }

                if !product.description.is_empty() {
                    ui.add(egui::Label::new(format!("– {}", product.description)).truncate());
                }
                if let Some(handle) = twitter_handle(&product.founder_twitter) {
                    ui.label("built by");
                    ui.hyperlink_to(format!("@{handle}"), &product.founder_twitter);
                }
            });

            let mut meta = product.categories.join(" · ");
            let chain = product.chain_label();
            if !chain.is_empty() {
                if !meta.is_empty() {
                    meta.push_str(" · ");
                }
                meta.push_str(&chain);
            }
            if !meta.is_empty() {
                ui.label(egui::RichText::new(meta).color(egui::Color32::from_gray(140)));
            }

            ui.horizontal(|ui| {
                if !product.website.is_empty() {
                    ui.hyperlink_to(clean_url(&product.website), &product.website);
                }
                if !product.product_twitter.is_empty() {
                    if let Some(handle) = twitter_handle(&product.product_twitter) {
                        ui.hyperlink_to(format!("@{handle}"), &product.product_twitter);
                    }
                }
            });
        });
    });

    json_request
}

fn apply_style(ctx: &egui::Context, settings: &Settings) {
    match settings.theme {
        Theme::System => {
            ctx.set_visuals(egui::Visuals::default());
        }
        Theme::Dark => {
            let mut visuals = egui::Visuals::dark();
            visuals.window_corner_radius = 8.0.into();
            visuals.widgets.noninteractive.bg_fill = egui::Color32::from_rgb(20, 20, 25);
            ctx.set_visuals(visuals);
        }
        Theme::Light => {
            ctx.set_visuals(egui::Visuals::light());
        }
    }
}
