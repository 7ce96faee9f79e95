use std::cell::RefCell;
use std::rc::Rc;

use egui::{Button, Color32, Sense, Stroke, Vec2, vec2};

use crate::color::HexColor;
use crate::command::Command;
use crate::error::DrawOverResult;
use crate::event::{HistoryStatus, PaletteColors, SubscriptionId};
use crate::renderer::RenderTarget;
use crate::surface::DrawOver;

const SWATCH_SIZE: Vec2 = vec2(18.0, 18.0);

/// Everything the control panel displays, kept in sync by notifications
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub color: HexColor,
    pub width: f32,
    pub erasing: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub colors: PaletteColors,
}

#[derive(Debug, Clone, Copy)]
struct PanelSubscriptions {
    color: SubscriptionId,
    width: SubscriptionId,
    mode: SubscriptionId,
    colors: SubscriptionId,
    history: SubscriptionId,
}

/// A control panel bound to one drawing surface.
///
/// The panel never reads the models directly after binding: its state only
/// changes through the surface's notifications, and its widgets only act
/// through [`Command`]s.
#[derive(Debug)]
pub struct ControlPanel {
    state: Rc<RefCell<PanelState>>,
    subscriptions: PanelSubscriptions,
    width_draft: f32,
    width_dragging: bool,
    /// Picker color not yet remembered in the palette
    picker_pending: Option<HexColor>,
}

impl ControlPanel {
    pub fn bind<T: RenderTarget + 'static>(surface: &DrawOver<T>) -> Self {
        let pen = surface.pen();
        let history = surface.history();
        let state = Rc::new(RefCell::new(PanelState {
            color: pen.color(),
            width: pen.width(),
            erasing: pen.is_erasing(),
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
            colors: surface.palette().colors(),
        }));

        let color_state = Rc::clone(&state);
        let color = pen.color_changed().subscribe(move |color: &HexColor| {
            color_state.borrow_mut().color = *color;
        });

        let width_state = Rc::clone(&state);
        let width = pen.width_changed().subscribe(move |width: &f32| {
            width_state.borrow_mut().width = *width;
        });

        let mode_state = Rc::clone(&state);
        let mode = pen.mode_changed().subscribe(move |erasing: &bool| {
            mode_state.borrow_mut().erasing = *erasing;
        });

        let colors_state = Rc::clone(&state);
        let colors = surface
            .palette()
            .colors_changed()
            .subscribe(move |colors: &PaletteColors| {
                colors_state.borrow_mut().colors = colors.clone();
            });

        let history_state = Rc::clone(&state);
        let history = history.changed().subscribe(move |status: &HistoryStatus| {
            let mut state = history_state.borrow_mut();
            state.can_undo = status.can_undo();
            state.can_redo = status.can_redo();
        });

        let width_draft = pen.width();
        Self {
            state,
            subscriptions: PanelSubscriptions {
                color,
                width,
                mode,
                colors,
                history,
            },
            width_draft,
            width_dragging: false,
            picker_pending: None,
        }
    }

    /// Stops listening to `surface`, which must be the one passed to `bind`
    pub fn unbind<T: RenderTarget + 'static>(self, surface: &DrawOver<T>) {
        let subscriptions = self.subscriptions;
        surface.pen().color_changed().unsubscribe(subscriptions.color);
        surface.pen().width_changed().unsubscribe(subscriptions.width);
        surface.pen().mode_changed().unsubscribe(subscriptions.mode);
        surface.palette().colors_changed().unsubscribe(subscriptions.colors);
        surface.history().changed().unsubscribe(subscriptions.history);
    }

    pub fn state(&self) -> PanelState {
        self.state.borrow().clone()
    }

    /// Draws the panel and applies whatever the user did to `surface`
    pub fn show<T: RenderTarget + 'static>(
        &mut self,
        ui: &mut egui::Ui,
        surface: &mut DrawOver<T>,
    ) -> DrawOverResult<()> {
        let commands = self.ui(ui, surface.width_range());
        for command in commands {
            log::debug!("Control panel command: {}", command.name());
            command.execute(surface)?;
        }
        Ok(())
    }

    fn ui(&mut self, ui: &mut egui::Ui, width_range: std::ops::RangeInclusive<f32>) -> Vec<Command> {
        let state = self.state();
        let mut commands = Vec::new();

        ui.horizontal(|ui| {
            if ui.add_enabled(state.can_undo, Button::new("⟲ Undo")).clicked() {
                commands.push(Command::Undo);
            }
            if ui.add_enabled(state.can_redo, Button::new("⟳ Redo")).clicked() {
                commands.push(Command::Redo);
            }
            if ui.button("🗑 Clear").clicked() {
                commands.push(Command::Clear);
            }
        });

        ui.separator();

        ui.horizontal(|ui| {
            let mut picked = state.color.to_color32();
            let response = egui::color_picker::color_edit_button_srgba(
                ui,
                &mut picked,
                egui::color_picker::Alpha::Opaque,
            );
            if response.changed() {
                let color = HexColor::from_color32(picked);
                self.picker_pending = Some(color);
                commands.push(Command::PreviewColor(color));
            } else if !ui.memory(|memory| memory.any_popup_open()) {
                if let Some(color) = self.picker_pending.take() {
                    commands.push(Command::PickColor(color));
                }
            }

            if ui.selectable_label(state.erasing, "⌫ Eraser").clicked() {
                commands.push(Command::ToggleErase);
            }
        });

        ui.horizontal_wrapped(|ui| {
            for color in &state.colors.defaults {
                if swatch(ui, Some(*color), *color == state.color).clicked() {
                    commands.push(Command::SelectColor(*color));
                }
            }
        });

        ui.horizontal_wrapped(|ui| {
            for slot in &state.colors.custom {
                // Empty slots render disabled and never report clicks
                let selected = *slot == Some(state.color);
                if swatch(ui, *slot, selected).clicked() {
                    if let Some(color) = slot {
                        commands.push(Command::SelectColor(*color));
                    }
                }
            }
        });

        ui.separator();

        ui.horizontal(|ui| {
            if !self.width_dragging {
                self.width_draft = state.width;
            }

            let response = ui.add(egui::Slider::new(&mut self.width_draft, width_range).text("Width"));
            self.width_dragging = response.dragged();
            if response.drag_stopped() || (response.changed() && !response.dragged()) {
                commands.push(Command::SetWidth(self.width_draft));
            }

            width_preview(ui, self.width_draft, state.color.to_color32());
        });

        commands
    }
}

fn swatch(ui: &mut egui::Ui, color: Option<HexColor>, selected: bool) -> egui::Response {
    let fill = color.map_or(Color32::TRANSPARENT, HexColor::to_color32);
    let button = Button::new("")
        .fill(fill)
        .min_size(SWATCH_SIZE)
        .selected(selected);
    ui.add_enabled(color.is_some(), button)
}

/// A horizontal line as thick as the pen
fn width_preview(ui: &mut egui::Ui, width: f32, color: Color32) {
    let height = width.max(SWATCH_SIZE.y);
    let (rect, _) = ui.allocate_exact_size(vec2(60.0, height), Sense::hover());
    ui.painter()
        .line_segment([rect.left_center(), rect.right_center()], Stroke::new(width, color));
}
