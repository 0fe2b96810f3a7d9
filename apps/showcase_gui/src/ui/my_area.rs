//! My-area overlay: account sheet, document listing, and the close control
//! that docks to the viewport edge once the sheet corner scrolls away.

use std::collections::HashMap;

use crossbeam_channel::Sender;
use eframe::egui;
use motion::dock::{DockController, DockParams, DockPlacement};
use motion::kurbo;
use motion::viewport::{sentinel_visible, Margin};
use shared::domain::{DocumentSummary, SessionUser};
use shared::protocol::SignedUrlResult;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::orchestration::dispatch_backend_command;

const SHEET_MAX_WIDTH: f32 = 920.0;
const SHEET_TOP_GAP: f32 = 48.0;
const SHEET_EDGE_GAP: f32 = 24.0;
const CLOSE_BUTTON_SIZE: f32 = 32.0;
/// Dock slightly before the sheet corner actually leaves the viewport so the
/// control never visibly pops out of the clipped region.
const SENTINEL_TOP_MARGIN: f64 = -24.0;

pub struct MyAreaOverlay {
    open: bool,
    dock: DockController,
    pub email_input: String,
    password_input: String,
    documents: Vec<DocumentSummary>,
    links: HashMap<String, String>,
    link_errors: HashMap<String, String>,
}

impl MyAreaOverlay {
    pub fn new() -> Self {
        Self {
            open: false,
            dock: DockController::new(DockParams {
                margin: Margin::top_only(SENTINEL_TOP_MARGIN),
                threshold: 0.0,
                safe_area_top: 0.0,
            }),
            email_input: String::new(),
            password_input: String::new(),
            documents: Vec::new(),
            links: HashMap::new(),
            link_errors: HashMap::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
        if !open {
            self.dock.set_active(false);
        }
    }

    pub fn set_documents(&mut self, documents: Vec<DocumentSummary>) {
        // Links created for a previous listing only survive if their path is
        // still listed.
        self.links
            .retain(|path, _| documents.iter().any(|document| &document.path == path));
        self.link_errors.clear();
        self.documents = documents;
    }

    pub fn apply_link_results(&mut self, results: Vec<SignedUrlResult>) {
        for result in results {
            match (result.url, result.error) {
                (Some(url), _) => {
                    self.link_errors.remove(&result.path);
                    self.links.insert(result.path, url);
                }
                (None, Some(error)) => {
                    self.link_errors.insert(result.path, error);
                }
                (None, None) => {}
            }
        }
    }

    pub fn clear_session_data(&mut self) {
        self.documents.clear();
        self.links.clear();
        self.link_errors.clear();
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        session_user: Option<&SessionUser>,
        cmd_tx: &Sender<BackendCommand>,
        status: &mut String,
    ) {
        if !self.open {
            self.dock.set_active(false);
            return;
        }
        self.dock.set_active(true);

        let screen = ctx.screen_rect();
        let mut card_rect = None;
        let mut close_clicked = false;

        egui::Area::new(egui::Id::new("my_area_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.set_clip_rect(screen);
                let backdrop = ui.allocate_rect(screen, egui::Sense::click());
                ui.painter().rect_filled(
                    screen,
                    egui::CornerRadius::ZERO,
                    egui::Color32::from_black_alpha(140),
                );

                let mut page = ui.new_child(
                    egui::UiBuilder::new()
                        .max_rect(screen)
                        .layout(egui::Layout::top_down(egui::Align::Min)),
                );
                page.set_clip_rect(screen);
                egui::ScrollArea::vertical()
                    .id_salt("my_area_scroll")
                    .auto_shrink([false, false])
                    .max_height(screen.height())
                    .show(&mut page, |ui| {
                        card_rect = Some(self.show_sheet(ui, screen, session_user, cmd_tx, status));
                        // Breathing room below the sheet keeps the corner
                        // transition reachable on short listings.
                        ui.add_space(screen.height() * 0.5);
                    });

                if backdrop.clicked() {
                    close_clicked = true;
                }
            });

        if let Some(card) = card_rect {
            let viewport = kurbo::Rect::new(
                screen.left() as f64,
                screen.top() as f64,
                screen.right() as f64,
                screen.bottom() as f64,
            );
            // Zero-height sentinel pinned to the sheet's top edge.
            let sentinel = kurbo::Rect::new(
                card.left() as f64,
                card.top() as f64,
                card.right() as f64,
                card.top() as f64,
            );
            let params = self.dock.params();
            self.dock.observe_sentinel(sentinel_visible(
                sentinel,
                viewport,
                params.margin,
                params.threshold,
            ));
            self.dock.update_geometry(screen.width() as f64, card.right() as f64);

            match self.dock.placement() {
                DockPlacement::Anchored { top, right } => {
                    let pos = egui::pos2(
                        card.right() - right as f32 - CLOSE_BUTTON_SIZE,
                        card.top() + top as f32,
                    );
                    if show_close_button(ctx, "my_area_close_anchored", egui::Order::Middle, pos) {
                        close_clicked = true;
                    }
                }
                DockPlacement::Docked { top, right } => {
                    let pos = egui::pos2(
                        screen.right() - right as f32 - CLOSE_BUTTON_SIZE,
                        screen.top() + top as f32,
                    );
                    if show_close_button(ctx, "my_area_close_docked", egui::Order::Foreground, pos)
                    {
                        close_clicked = true;
                    }
                }
            }
        }

        if close_clicked {
            self.set_open(false);
        }
    }

    fn show_sheet(
        &mut self,
        ui: &mut egui::Ui,
        screen: egui::Rect,
        session_user: Option<&SessionUser>,
        cmd_tx: &Sender<BackendCommand>,
        status: &mut String,
    ) -> egui::Rect {
        ui.add_space(SHEET_TOP_GAP);
        let sheet_width = (screen.width() - 2.0 * SHEET_EDGE_GAP).min(SHEET_MAX_WIDTH);
        let indent = ((ui.available_width() - sheet_width) / 2.0).max(0.0);
        let mut card = egui::Rect::NOTHING;
        ui.horizontal(|ui| {
            ui.add_space(indent);
            let response = egui::Frame::new()
                .fill(ui.visuals().panel_fill)
                .corner_radius(egui::CornerRadius::same(16))
                .inner_margin(egui::Margin::symmetric(28, 24))
                .show(ui, |ui| {
                    ui.set_width(sheet_width - 56.0);
                    self.sheet_contents(ui, session_user, cmd_tx, status);
                });
            card = response.response.rect;
        });
        card
    }

    fn sheet_contents(
        &mut self,
        ui: &mut egui::Ui,
        session_user: Option<&SessionUser>,
        cmd_tx: &Sender<BackendCommand>,
        status: &mut String,
    ) {
        ui.heading("Mein Bereich");
        ui.add_space(8.0);
        match session_user {
            None => self.sign_in_form(ui, cmd_tx, status),
            Some(user) => self.documents_section(ui, user, cmd_tx, status),
        }
    }

    fn sign_in_form(
        &mut self,
        ui: &mut egui::Ui,
        cmd_tx: &Sender<BackendCommand>,
        status: &mut String,
    ) {
        ui.label("Melde dich an, um deine Dokumente zu sehen.");
        ui.add_space(12.0);
        ui.add(egui::TextEdit::singleline(&mut self.email_input).hint_text("E-Mail-Adresse"));
        ui.add_space(6.0);
        ui.add(
            egui::TextEdit::singleline(&mut self.password_input)
                .password(true)
                .hint_text("Passwort"),
        );
        ui.add_space(12.0);
        let ready = !self.email_input.trim().is_empty() && !self.password_input.is_empty();
        if ui.add_enabled(ready, egui::Button::new("Anmelden")).clicked() {
            dispatch_backend_command(
                cmd_tx,
                BackendCommand::SignIn {
                    email: self.email_input.trim().to_string(),
                    password: std::mem::take(&mut self.password_input),
                },
                status,
            );
        }
    }

    fn documents_section(
        &mut self,
        ui: &mut egui::Ui,
        user: &SessionUser,
        cmd_tx: &Sender<BackendCommand>,
        status: &mut String,
    ) {
        ui.horizontal(|ui| {
            ui.label(format!("Angemeldet als {}", user.email));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Abmelden").clicked() {
                    dispatch_backend_command(cmd_tx, BackendCommand::SignOut, status);
                }
            });
        });
        ui.add_space(12.0);
        ui.separator();
        ui.add_space(8.0);
        ui.heading("Dokumente");
        ui.add_space(4.0);

        if self.documents.is_empty() {
            ui.label("Keine Dokumente vorhanden.");
            return;
        }

        for document in &self.documents {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&document.name).strong());
                    let mut meta = human_readable_bytes(document.size_bytes);
                    if let Some(updated) = document.updated_at {
                        meta = format!("{meta}, {}", updated.format("%d.%m.%Y"));
                    }
                    ui.label(egui::RichText::new(meta).weak());
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Link erstellen").clicked() {
                        dispatch_backend_command(
                            cmd_tx,
                            BackendCommand::SignDocuments {
                                paths: vec![document.path.clone()],
                            },
                            status,
                        );
                    }
                });
            });
            if let Some(url) = self.links.get(&document.path) {
                ui.hyperlink_to("Dokument öffnen", url);
            } else if let Some(error) = self.link_errors.get(&document.path) {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }
        }
    }
}

impl Default for MyAreaOverlay {
    fn default() -> Self {
        Self::new()
    }
}

fn show_close_button(ctx: &egui::Context, id: &str, order: egui::Order, pos: egui::Pos2) -> bool {
    let mut clicked = false;
    egui::Area::new(egui::Id::new(id))
        .order(order)
        .fixed_pos(pos)
        .show(ctx, |ui| {
            let (rect, response) = ui.allocate_exact_size(
                egui::vec2(CLOSE_BUTTON_SIZE, CLOSE_BUTTON_SIZE),
                egui::Sense::click(),
            );
            let visuals = ui.style().interact(&response);
            ui.painter().rect_filled(
                rect,
                egui::CornerRadius::same((CLOSE_BUTTON_SIZE / 2.0) as u8),
                visuals.bg_fill,
            );
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "✕",
                egui::FontId::proportional(16.0),
                visuals.text_color(),
            );
            clicked = response.clicked();
        });
    clicked
}

pub(crate) fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format_scaled_unit(bytes, KB, "KB");
    }
    if bytes < GB {
        return format_scaled_unit(bytes, MB, "MB");
    }
    format_scaled_unit(bytes, GB, "GB")
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let value_text = format!("{value:.1}");
    let compact_value = value_text.strip_suffix(".0").unwrap_or(&value_text);
    format!("{compact_value} {unit_label}")
}

#[cfg(test)]
mod tests {
    use super::{human_readable_bytes, MyAreaOverlay};
    use shared::domain::DocumentSummary;
    use shared::protocol::SignedUrlResult;

    fn document(path: &str) -> DocumentSummary {
        DocumentSummary {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            size_bytes: 1024,
            updated_at: None,
        }
    }

    #[test]
    fn formats_document_sizes_readably() {
        assert_eq!(human_readable_bytes(0), "0 B");
        assert_eq!(human_readable_bytes(1023), "1023 B");
        assert_eq!(human_readable_bytes(1024), "1 KB");
        assert_eq!(human_readable_bytes(1536), "1.5 KB");
        assert_eq!(human_readable_bytes(2 * 1024 * 1024), "2 MB");
        assert_eq!(human_readable_bytes(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn link_results_land_on_their_documents() {
        let mut overlay = MyAreaOverlay::new();
        overlay.set_documents(vec![document("u1/a.pdf"), document("u1/b.pdf")]);
        overlay.apply_link_results(vec![
            SignedUrlResult::signed("u1/a.pdf", "https://x/a"),
            SignedUrlResult::failed("u1/b.pdf", "object not found"),
        ]);
        assert_eq!(overlay.links.get("u1/a.pdf").map(String::as_str), Some("https://x/a"));
        assert_eq!(
            overlay.link_errors.get("u1/b.pdf").map(String::as_str),
            Some("object not found")
        );
    }

    #[test]
    fn relisting_drops_links_for_removed_documents() {
        let mut overlay = MyAreaOverlay::new();
        overlay.set_documents(vec![document("u1/a.pdf"), document("u1/b.pdf")]);
        overlay.apply_link_results(vec![
            SignedUrlResult::signed("u1/a.pdf", "https://x/a"),
            SignedUrlResult::signed("u1/b.pdf", "https://x/b"),
        ]);
        overlay.set_documents(vec![document("u1/a.pdf")]);
        assert!(overlay.links.contains_key("u1/a.pdf"));
        assert!(!overlay.links.contains_key("u1/b.pdf"));
    }

    #[test]
    fn retrying_a_failed_link_clears_the_error() {
        let mut overlay = MyAreaOverlay::new();
        overlay.set_documents(vec![document("u1/a.pdf")]);
        overlay.apply_link_results(vec![SignedUrlResult::failed(
            "u1/a.pdf",
            "upstream unavailable",
        )]);
        overlay.apply_link_results(vec![SignedUrlResult::signed("u1/a.pdf", "https://x/a")]);
        assert!(overlay.links.contains_key("u1/a.pdf"));
        assert!(overlay.link_errors.is_empty());
    }

    #[test]
    fn clearing_session_data_empties_the_sheet() {
        let mut overlay = MyAreaOverlay::new();
        overlay.set_documents(vec![document("u1/a.pdf")]);
        overlay.apply_link_results(vec![SignedUrlResult::signed("u1/a.pdf", "https://x/a")]);
        overlay.clear_session_data();
        assert!(overlay.documents.is_empty());
        assert!(overlay.links.is_empty());
        assert!(overlay.link_errors.is_empty());
    }
}
