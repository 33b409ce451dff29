/*!
 * Desktop dashboard for urbix-rs - urban-sustainability indicators
 *
 * A cross-platform desktop application that:
 * - Fetches the indicator records once on start (in the background)
 * - Ranks valid records by composite score and filters them by year
 * - Shows summary statistics and one card with progress bars per region
 * - Exports the current selection to CSV/JSON and the cards to SVG
 *
 * Platform support: Windows, macOS, Linux
 */

use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use urbix_rs::ApiError;
use urbix_rs::dashboard::LoadState;
use urbix_rs::stats::DashboardView;
use urbix_rs::{Client, Config, Dashboard, IndicatorRecord, YearFilter};
use urbix_rs::{card, format, storage, viz};

const CARD_WIDTH: f32 = 260.0;

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("Urban Sustainability Indicators - urbix"),
        ..Default::default()
    };

    eframe::run_native(
        "Urban Sustainability Indicators",
        options,
        Box::new(|_cc| Ok(Box::new(UrbixApp::new(Config::from_env())))),
    )
}

/// Main application state
struct UrbixApp {
    config: Config,
    board: Dashboard,

    // Export options
    export_format: ExportFormat,
    output_path: String,
    export_svg: bool,
    export_requested: bool,

    status_message: String,
    error_message: String,

    // Background fetch
    fetch_receiver: Option<mpsc::Receiver<Result<Vec<IndicatorRecord>, ApiError>>>,
}

#[derive(Debug, Clone, PartialEq)]
enum ExportFormat {
    Csv,
    Json,
    Both,
}

impl UrbixApp {
    fn new(config: Config) -> Self {
        // Default to user's home directory for output
        let home_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        let mut app = Self {
            config,
            board: Dashboard::new(),
            export_format: ExportFormat::Csv,
            output_path: home_dir,
            export_svg: false,
            export_requested: false,
            status_message: String::new(),
            error_message: String::new(),
            fetch_receiver: None,
        };
        app.start_fetch();
        app
    }

    /// Kick off the single fetch on a background thread.
    fn start_fetch(&mut self) {
        let (sender, receiver) = mpsc::channel();
        self.fetch_receiver = Some(receiver);
        let config = self.config.clone();

        thread::spawn(move || {
            let result = Client::new(&config).and_then(|client| client.fetch_indicators());
            let _ = sender.send(result);
        });
    }

    fn check_fetch_result(&mut self) {
        if let Some(receiver) = &self.fetch_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.fetch_receiver = None;
            self.board = std::mem::take(&mut self.board).loaded(result);
        }
    }

    fn export(&mut self) {
        let Some(view) = self.board.view() else {
            return;
        };
        let result = export_view(
            &view,
            &self.export_format,
            &self.output_path,
            self.export_svg,
            &self.config.locale,
        );
        match result {
            Ok(files) => {
                self.status_message = format!("Files created:\n{}", files.join("\n"));
                self.error_message.clear();
            }
            Err(err) => {
                self.error_message = format!("Export failed: {:#}", err);
                self.status_message.clear();
            }
        }
    }
}

impl eframe::App for UrbixApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for the completed background fetch
        self.check_fetch_result();

        // Request repaint if loading (for spinner animation)
        if self.board.is_loading() {
            ctx.request_repaint();
        }

        let mut selected = self.board.filter();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Indicator Dashboard");
                ui.add_space(10.0);

                match self.board.state() {
                    LoadState::Loading => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Loading...");
                        });
                    }
                    LoadState::Failed(msg) => {
                        ui.colored_label(egui::Color32::RED, msg);
                    }
                    LoadState::Ready(_) => {
                        let Some(view) = self.board.view() else {
                            return;
                        };
                        let locale = self.config.locale.as_str();

                        ui.horizontal(|ui| {
                            ui.label("Filter by year:");
                            egui::ComboBox::from_id_salt("year-filter")
                                .selected_text(match selected {
                                    YearFilter::All => "All years".to_string(),
                                    YearFilter::Year(y) => y.to_string(),
                                })
                                .show_ui(ui, |ui| {
                                    ui.selectable_value(&mut selected, YearFilter::All, "All years");
                                    for y in &view.years {
                                        ui.selectable_value(
                                            &mut selected,
                                            YearFilter::Year(*y),
                                            y.to_string(),
                                        );
                                    }
                                });
                        });

                        ui.add_space(10.0);
                        summary_row(ui, &view, locale);
                        ui.add_space(10.0);

                        // Export options section
                        ui.collapsing("Export", |ui| {
                            ui.horizontal(|ui| {
                                ui.label("Format:");
                                ui.radio_value(&mut self.export_format, ExportFormat::Csv, "CSV");
                                ui.radio_value(&mut self.export_format, ExportFormat::Json, "JSON");
                                ui.radio_value(&mut self.export_format, ExportFormat::Both, "Both");
                            });

                            ui.horizontal(|ui| {
                                ui.label("Output path:");
                                ui.text_edit_singleline(&mut self.output_path);
                                if ui.button("Browse").clicked()
                                    && let Some(path) = rfd::FileDialog::new().pick_folder()
                                {
                                    self.output_path = path.to_string_lossy().to_string();
                                }
                            });

                            ui.checkbox(&mut self.export_svg, "Also draw cards as SVG");

                            if ui
                                .add_enabled(!view.records.is_empty(), egui::Button::new("Export"))
                                .clicked()
                            {
                                self.export_requested = true;
                            }
                        });

                        ui.add_space(10.0);

                        ui.horizontal_wrapped(|ui| {
                            for record in &view.records {
                                card_widget(ui, record, locale);
                            }
                        });
                    }
                }

                ui.add_space(10.0);

                // Status messages
                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
                }

                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::RED, &self.error_message);
                }
            });
        });

        if selected != self.board.filter() {
            self.board = std::mem::take(&mut self.board).with_filter(selected);
        }

        if self.export_requested {
            self.export_requested = false;
            self.export();
        }
    }
}

fn summary_row(ui: &mut egui::Ui, view: &DashboardView<'_>, locale: &str) {
    let stats = [
        ("Total regions", format::format_count(view.summary.count, locale)),
        (
            "Mean smart score",
            format::format_percent(view.summary.mean_smart_pct, locale),
        ),
        (
            "Mean sustainability score",
            format::format_percent(view.summary.mean_sustainable_pct, locale),
        ),
    ];
    ui.horizontal(|ui| {
        for (label, value) in stats {
            ui.group(|ui| {
                ui.set_width(180.0);
                ui.vertical(|ui| {
                    ui.label(label);
                    ui.heading(value);
                });
            });
        }
    });
}

fn card_widget(ui: &mut egui::Ui, record: &IndicatorRecord, locale: &str) {
    let card = card::render_card_locale(record, locale);
    ui.group(|ui| {
        ui.set_width(CARD_WIDTH);
        ui.vertical(|ui| {
            ui.strong(&card.title);
            ui.label(format!("Year: {}", card.year));
            ui.add_space(4.0);

            ui.label("Smart score");
            ui.add(
                egui::ProgressBar::new((card.smart_pct / 100.0) as f32)
                    .text(card.smart_label())
                    .fill(egui::Color32::from_rgb(68, 114, 196)),
            );
            ui.label("Sustainability score");
            ui.add(
                egui::ProgressBar::new((card.sustainable_pct / 100.0) as f32)
                    .text(card.sustainable_label())
                    .fill(egui::Color32::from_rgb(112, 173, 71)),
            );

            ui.add_space(4.0);
            ui.label(format!("HDI: {}", card.hdi));
            ui.label(format!("Life expectancy: {}", card.life_expectancy));
            ui.label(format!("HDI income: {}", card.hdi_income));
        });
    });
}

fn export_view(
    view: &DashboardView<'_>,
    export_format: &ExportFormat,
    output_path: &str,
    export_svg: bool,
    locale: &str,
) -> anyhow::Result<Vec<String>> {
    if output_path.trim().is_empty() {
        anyhow::bail!("Please specify an output directory");
    }
    let output_dir = PathBuf::from(output_path);
    let records: Vec<IndicatorRecord> = view.records.iter().map(|r| (*r).clone()).collect();
    let suffix = view.filter.to_string();
    let mut output_files = Vec::new();

    if matches!(export_format, ExportFormat::Csv | ExportFormat::Both) {
        let csv_path = output_dir.join(format!("urbix_{}.csv", suffix));
        storage::save_csv(&records, &csv_path)?;
        output_files.push(csv_path.to_string_lossy().to_string());
    }

    if matches!(export_format, ExportFormat::Json | ExportFormat::Both) {
        let json_path = output_dir.join(format!("urbix_{}.json", suffix));
        storage::save_json(&records, &json_path)?;
        output_files.push(json_path.to_string_lossy().to_string());
    }

    if export_svg {
        let svg_path = output_dir.join(format!("urbix_cards_{}.svg", suffix));
        viz::plot_cards(view, &svg_path, 1280, locale)?;
        output_files.push(svg_path.to_string_lossy().to_string());
    }

    log::info!("exported {} records for year filter {}", records.len(), suffix);
    Ok(output_files)
}
