use eframe::egui;

use crate::backend::settings::{DEFAULT_FEED_URL, Settings, Theme};

pub struct SettingsWindow {
    selected_tab: SettingsTab,
}

#[derive(PartialEq, Clone, Copy, Debug)]
enum SettingsTab {
    General,
    Feed,
    Theme,
}

impl SettingsWindow {
    pub fn new() -> Self {
        Self {
            selected_tab: SettingsTab::General,
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, open: &mut bool, settings: &mut Settings) {
        egui::Window::new("Settings")
            .open(open)
            .min_width(400.0)
            .min_height(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.selected_tab, SettingsTab::General, "General");
                    ui.selectable_value(&mut self.selected_tab, SettingsTab::Feed, "Feed");
                    ui.selectable_value(&mut self.selected_tab, SettingsTab::Theme, "Theme");
                });
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| match self.selected_tab {
                    SettingsTab::General => self.show_general(ui, settings),
                    SettingsTab::Feed => self.show_feed(ui, settings),
                    SettingsTab::Theme => self.show_theme(ui, settings),
                });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save Settings").clicked() {
                        settings.save();
                    }
                    if ui.button("Reset to Defaults").clicked() {
                        Settings::reset();
                        *settings = Settings::default();
                    }
                });
            });
    }

    fn show_general(&mut self, ui: &mut egui::Ui, settings: &mut Settings) {
        ui.heading("Appearance");
        ui.add(egui::Slider::new(&mut settings.font_size, 10.0..=24.0).text("Font Size"));
        ui.add(egui::Slider::new(&mut settings.row_height, 40.0..=96.0).text("Row Height"));
    }

    fn show_feed(&mut self, ui: &mut egui::Ui, settings: &mut Settings) {
        ui.heading("Data Feed");
        ui.label("Published CSV URL");
        ui.add(
            egui::TextEdit::singleline(&mut settings.feed_url).desired_width(f32::INFINITY),
        );
        if settings.feed_url != DEFAULT_FEED_URL && ui.button("Restore default URL").clicked() {
            settings.feed_url = DEFAULT_FEED_URL.to_string();
        }

        ui.separator();
        ui.heading("Filtering");
        let mut debounce = settings.debounce_ms as u32;
        ui.add(
            egui::Slider::new(&mut debounce, 0..=1000)
                .text("Filter debounce (ms)")
                .step_by(50.0),
        );
        settings.debounce_ms = debounce as u64;
        ui.label(
            egui::RichText::new("Rapid filter changes are coalesced into one recomputation.")
                .weak()
                .small(),
        );
    }

    fn show_theme(&mut self, ui: &mut egui::Ui, settings: &mut Settings) {
        ui.heading("Theme");
        egui::ComboBox::from_id_salt("theme_selector")
            .selected_text(settings.theme.name())
            .show_ui(ui, |ui| {
                for theme in Theme::all() {
                    let selected = settings.theme == *theme;
                    if ui.selectable_label(selected, theme.name()).clicked() {
                        settings.theme = *theme;
                    }
                }
            });
    }
}
