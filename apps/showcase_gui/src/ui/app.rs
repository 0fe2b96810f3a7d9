//! App shell: event intake from the backend worker, top bar, landing page,
//! and the my-area overlay composition.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::domain::SessionUser;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{classify_sign_in_failure, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::hero::HeroSection;
use crate::ui::my_area::MyAreaOverlay;

pub const SETTINGS_STORAGE_KEY: &str = "wohnenwo_showcase_settings";

/// Endpoints the backend worker talks to, resolved from the command line.
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub identity_url: String,
    pub storage_url: String,
    pub signer_url: String,
    pub bucket: String,
    pub api_key: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PersistedShowcaseSettings {
    pub last_email: String,
}

pub struct ShowcaseApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    hero: HeroSection,
    my_area: MyAreaOverlay,
    session_user: Option<SessionUser>,
    status: String,
    last_error: Option<UiError>,
    tick: u64,
}

impl ShowcaseApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted: Option<PersistedShowcaseSettings>,
    ) -> Self {
        let mut my_area = MyAreaOverlay::new();
        if let Some(persisted) = persisted {
            my_area.email_input = persisted.last_email;
        }
        Self {
            cmd_tx,
            ui_rx,
            hero: HeroSection::new(),
            my_area,
            session_user: None,
            status: String::new(),
            last_error: None,
            tick: 0,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::SignedIn { user } => {
                    self.status = format!("Angemeldet als {}", user.email);
                    self.session_user = Some(user);
                    self.last_error = None;
                }
                UiEvent::SignedOut => {
                    self.session_user = None;
                    self.my_area.clear_session_data();
                    self.status = "Abgemeldet".to_string();
                }
                UiEvent::SoftRefresh => {
                    // The backend decides what the listing looks like now;
                    // after sign-out it comes back empty and clears the view.
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::FetchDocuments,
                        &mut self.status,
                    );
                }
                UiEvent::Documents(documents) => {
                    self.my_area.set_documents(documents);
                }
                UiEvent::DocumentLinks(results) => {
                    self.my_area.apply_link_results(results);
                }
                UiEvent::Error(error) => {
                    self.status = match error.context() {
                        UiErrorContext::SignIn => classify_sign_in_failure(error.message()),
                        _ => error.message().to_string(),
                    };
                    if error.requires_reauth() {
                        self.session_user = None;
                    }
                    self.last_error = Some(error);
                }
            }
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        let signed_in_email = self.session_user.as_ref().map(|user| user.email.clone());
        egui::TopBottomPanel::top("showcase_top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("WohnenWo");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Mein Bereich").clicked() {
                        self.my_area.set_open(true);
                        if signed_in_email.is_some() {
                            dispatch_backend_command(
                                &self.cmd_tx,
                                BackendCommand::FetchDocuments,
                                &mut self.status,
                            );
                        }
                    }
                    if let Some(email) = &signed_in_email {
                        ui.label(egui::RichText::new(email).weak());
                    }
                });
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("showcase_status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let text = if self.status.is_empty() {
                    "Bereit"
                } else {
                    self.status.as_str()
                };
                if self.last_error.is_some() {
                    ui.colored_label(ui.visuals().error_fg_color, text);
                } else {
                    ui.label(egui::RichText::new(text).weak());
                }
            });
        });
    }

    fn show_landing(&mut self, ctx: &egui::Context, now: Instant) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("landing_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.hero.show(ui, now);
                    landing_sections(ui);
                });
        });
    }
}

fn landing_sections(ui: &mut egui::Ui) {
    ui.add_space(56.0);
    ui.vertical_centered(|ui| {
        feature_block(
            ui,
            "Faire Mieten",
            "Transparente Nebenkosten und Mietverträge ohne Kleingedrucktes.",
        );
        feature_block(
            ui,
            "Digitale Verwaltung",
            "Reparaturen melden, Termine abstimmen und Antworten erhalten, alles online.",
        );
        feature_block(
            ui,
            "Dokumente an einem Ort",
            "Rechnungen und Verträge liegen sicher im Mieterbereich bereit.",
        );
        ui.add_space(48.0);
        ui.label(egui::RichText::new("WohnenWo Wohnungsgesellschaft mbH").weak());
        ui.add_space(24.0);
    });
}

fn feature_block(ui: &mut egui::Ui, title: &str, body: &str) {
    ui.add_space(24.0);
    ui.heading(title);
    ui.add_space(4.0);
    ui.label(body);
}

impl eframe::App for ShowcaseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick = self.tick.wrapping_add(1);
        let now = Instant::now();

        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        self.show_landing(ctx, now);

        self.my_area.show(
            ctx,
            self.session_user.as_ref(),
            &self.cmd_tx,
            &mut self.status,
        );

        // The overlay tracks scroll geometry every frame; the landing can
        // relax between carousel deadlines.
        if self.my_area.is_open() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedShowcaseSettings {
            last_email: self.my_area.email_input.clone(),
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
