//! Side-panel rendering of a built panel as egui widgets.

use crate::config::Value;
use crate::controls::{ControlId, Widget};
use crate::manager::GuiManager;
use eframe::egui;

enum Interaction {
    Edited(Value),
    Clicked,
}

impl<S> GuiManager<S> {
    /// Draws every control. Edits and clicks are dispatched as soon as the
    /// widget reports them, within the same frame.
    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut S) {
        if let Some(top) = self.registry.top() {
            self.show_control(ui, top, state);
        }
    }

    fn show_control(&mut self, ui: &mut egui::Ui, id: ControlId, state: &mut S) {
        let Some(control) = self.registry.get_mut(id) else {
            return;
        };

        if control.is_folder() {
            let children = control.children.clone();
            if control.is_root_container() {
                for child in children {
                    self.show_control(ui, child, state);
                }
                return;
            }
            let open = control.open_request.take();
            egui::CollapsingHeader::new(egui::RichText::new(control.name.as_str()).strong())
                .id_salt(control.path.as_str())
                .open(open)
                .show(ui, |ui| {
                    for child in children {
                        self.show_control(ui, child, state);
                    }
                });
            return;
        }

        let interaction = ui
            .add_enabled_ui(control.enabled, |ui| {
                ui.horizontal(|ui| draw_leaf(ui, control.path.as_str(), control.name.as_str(), &control.widget, control.display.as_ref(), control.invalid))
                    .inner
            })
            .inner;

        let result = match interaction {
            Some(Interaction::Edited(value)) => self.apply_widget_value(id, value, state),
            Some(Interaction::Clicked) => self.trigger_action(id, state),
            None => Ok(()),
        };
        if let Err(e) = result {
            log::warn!("{e}");
        }
    }
}

fn draw_leaf(
    ui: &mut egui::Ui,
    path: &str,
    name: &str,
    widget: &Widget,
    display: Option<&Value>,
    invalid: bool,
) -> Option<Interaction> {
    let label = if invalid {
        egui::RichText::new(name).color(ui.visuals().error_fg_color)
    } else {
        egui::RichText::new(name)
    };

    if let Widget::Button(_) = widget {
        return ui.button(label).clicked().then_some(Interaction::Clicked);
    }
    ui.label(label);

    match (widget, display) {
        (Widget::Number { range, step }, Some(Value::Number(n))) => {
            let mut v = *n;
            let changed = match range {
                Some(range) => {
                    let mut slider = egui::Slider::new(&mut v, range.clone())
                        .clamping(egui::SliderClamping::Edits);
                    if let Some(step) = step {
                        slider = slider.step_by(*step);
                    }
                    ui.add(slider).changed()
                }
                None => ui.add(egui::DragValue::new(&mut v).speed(step.unwrap_or(0.1))).changed(),
            };
            changed.then_some(Interaction::Edited(Value::Number(v)))
        }
        (Widget::Options(choices), Some(Value::Text(current))) => {
            let mut picked = None;
            egui::ComboBox::from_id_salt(path)
                .selected_text(current.as_str())
                .show_ui(ui, |ui| {
                    for choice in choices {
                        if ui.selectable_label(choice == current, choice.as_str()).clicked() && choice != current {
                            picked = Some(choice.clone());
                        }
                    }
                });
            picked.map(|c| Interaction::Edited(Value::Text(c)))
        }
        (Widget::Checkbox, Some(Value::Bool(b))) => {
            let mut v = *b;
            ui.checkbox(&mut v, "").changed().then_some(Interaction::Edited(Value::Bool(v)))
        }
        (Widget::Text, Some(Value::Text(s))) => {
            let mut v = s.clone();
            ui.text_edit_singleline(&mut v).changed().then_some(Interaction::Edited(Value::Text(v)))
        }
        (_, display) => {
            let text = display.map(Value::to_string).unwrap_or_default();
            ui.label(egui::RichText::new(text).weak());
            None
        }
    }
}
