//! Application shell and eframe integration.
//!
//! Hosts the rotation-input panel: builds it from the embedded layout,
//! wires change and action handlers to [`AppState`], and keeps the input
//! groups gated on the active input type.

use eframe::egui;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use rotation_panel::config::{ConfigNode, Value};
use rotation_panel::controls::{Control, ControlKind};
use rotation_panel::error::GuiResult;
use rotation_panel::manager::GuiManager;
use rotation_panel::values::ValueTree;
use std::collections::VecDeque;

pub(crate) const PANEL_LAYOUT: &str = include_str!("../assets/rotation_panel.json");

const HISTORY_LEN: usize = 64;

const START_POSITION: &str = "/Object Properties/Starting Position/";
const ACTIVE_INPUT: &str = "/Inputs/Active Input Type";
const AXIS_ANGLE: &str = "/Inputs/Axis-Angle Input/";
const QUATERNION_INPUT: &str = "/Inputs/Quaternion Proportional Input/";
const ACTUAL_VALUES: &str = "/Quaternion Actual Values/";
const SHOW_AXIS: &str = "/Quaternion Actual Values/Show Axis Of Rotation";

const NORMALIZE_AXIS_ACTION: &str = "normalize_axis_display";
const APPLY_QUATERNION_ACTION: &str = "apply_quaternion";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum InputType {
    EulerAngles,
    AxisAngle,
    Quaternion,
}

impl InputType {
    pub(crate) const ALL: [InputType; 3] = [InputType::EulerAngles, InputType::AxisAngle, InputType::Quaternion];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            InputType::EulerAngles => "Euler Angles",
            InputType::AxisAngle => "Axis-Angle",
            InputType::Quaternion => "Quaternion",
        }
    }

    pub(crate) fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Folder holding this input type's controls.
    pub(crate) fn group_path(&self) -> &'static str {
        match self {
            InputType::EulerAngles => "/Inputs/Euler Angles Input/",
            InputType::AxisAngle => AXIS_ANGLE,
            InputType::Quaternion => QUATERNION_INPUT,
        }
    }
}

pub(crate) struct ChangeRecord {
    pub(crate) path: String,
    pub(crate) value: String,
}

pub(crate) struct AppState {
    pub(crate) active_input: InputType,
    pub(crate) rotation: UnitQuaternion<f64>,
    pub(crate) start_position: Vector3<f64>,
    pub(crate) show_axis_of_rotation: bool,
    pub(crate) history: VecDeque<ChangeRecord>,
    pub(crate) needs_sync: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_input: InputType::EulerAngles,
            rotation: UnitQuaternion::identity(),
            start_position: Vector3::new(1.0, 0.0, 0.0),
            show_axis_of_rotation: false,
            history: VecDeque::with_capacity(HISTORY_LEN),
            needs_sync: false,
        }
    }
}

impl AppState {
    fn record(&mut self, path: &str, value: &Value) {
        if self.history.len() == HISTORY_LEN {
            self.history.pop_back();
        }
        self.history.push_front(ChangeRecord {
            path: path.to_string(),
            value: value.to_string(),
        });
    }
}

fn read_vector(values: &ValueTree, folder: &str, names: [&str; 3]) -> Option<Vector3<f64>> {
    let [x, y, z] = names.map(|n| values.number(&format!("{folder}{n}")));
    Some(Vector3::new(x?, y?, z?))
}

fn on_panel_changed(state: &mut AppState, values: &mut ValueTree, path: &str, value: &Value) {
    log::debug!("{path} = {value}");
    state.record(path, value);

    if path.starts_with(START_POSITION) {
        if let Some(position) = read_vector(values, START_POSITION, ["X", "Y", "Z"]) {
            state.start_position = position;
        }
    } else if path == ACTIVE_INPUT {
        match value.as_text().and_then(InputType::from_label) {
            Some(input) => state.active_input = input,
            None => log::warn!("unknown input type {value}"),
        }
    } else if path == SHOW_AXIS {
        state.show_axis_of_rotation = value.as_bool().unwrap_or(false);
    }
    state.needs_sync = true;
}

fn normalize_axis_display(state: &mut AppState, values: &mut ValueTree) {
    let names = ["Axis X", "Axis Y", "Axis Z"];
    let Some(axis) = read_vector(values, AXIS_ANGLE, names) else {
        return;
    };
    if let Some(unit) = axis.try_normalize(f64::EPSILON) {
        for (name, component) in names.iter().zip(unit.iter()) {
            values.set(&format!("{AXIS_ANGLE}{name}"), *component);
        }
    }
    state.needs_sync = true;
}

fn apply_quaternion(state: &mut AppState, values: &mut ValueTree) {
    let [x, y, z, w] = ["X", "Y", "Z", "W"].map(|n| values.number(&format!("{QUATERNION_INPUT}{n}")).unwrap_or(0.0));
    state.rotation = UnitQuaternion::try_new(Quaternion::new(w, x, y, z), f64::EPSILON)
        .unwrap_or_else(UnitQuaternion::identity);
    log::info!("applied rotation {:?}", state.rotation.quaternion().coords);
    state.needs_sync = true;
}

pub(crate) fn build_panel(layout: &str) -> Result<GuiManager<AppState>, Box<dyn std::error::Error + Send + Sync>> {
    let mut panel = GuiManager::new();
    panel.make_gui(&ConfigNode::from_json(layout)?, "/")?;
    panel.on_change(on_panel_changed);
    panel.register_action(NORMALIZE_AXIS_ACTION, normalize_axis_display);
    panel.register_action(APPLY_QUATERNION_ACTION, apply_quaternion);

    panel.for_each_control("/*", ControlKind::Folder, Control::open)?;
    panel.for_each_control(&format!("{ACTUAL_VALUES}*"), ControlKind::Value, |c| c.disable(false))?;
    panel.for_each_control(SHOW_AXIS, ControlKind::Value, Control::enable)?;
    Ok(panel)
}

/// Gates the input groups on the active input type and mirrors the current
/// rotation into the read-only actual values.
pub(crate) fn sync_panel(panel: &mut GuiManager<AppState>, state: &AppState) -> GuiResult<()> {
    for input in InputType::ALL {
        let group = input.group_path();
        let members = format!("{group}*");
        if input == state.active_input {
            panel.for_each_control(&members, ControlKind::Value, Control::enable)?;
            panel.for_each_control(group, ControlKind::Folder, Control::open)?;
        } else {
            panel.for_each_control(&members, ControlKind::Value, |c| c.disable(true))?;
        }
    }

    let q = state.rotation.quaternion();
    let values = panel.values_mut();
    for (name, component) in [("X", q.i), ("Y", q.j), ("Z", q.k), ("W", q.w)] {
        values.set(&format!("{ACTUAL_VALUES}{name}"), component);
    }
    values.set(SHOW_AXIS, state.show_axis_of_rotation);
    panel.refresh_display();
    Ok(())
}

pub(crate) struct App {
    pub(crate) panel: GuiManager<AppState>,
    pub(crate) state: AppState,
    dark_mode: bool,
}

impl App {
    pub(crate) fn new(_cc: &eframe::CreationContext<'_>) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::from_layout(PANEL_LAYOUT).inspect_err(|e| log::error!("failed to build panel: {e}"))
    }

    pub(crate) fn from_layout(layout: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut panel = build_panel(layout)?;
        let state = AppState::default();
        sync_panel(&mut panel, &state)?;
        log::info!("panel ready with {} controls", panel.registry().len());
        Ok(Self {
            panel,
            state,
            dark_mode: true,
        })
    }

    fn show_summary(&self, ui: &mut egui::Ui) {
        let s = &self.state;
        ui.label(egui::RichText::new("Rotation").strong());
        egui::Grid::new("rotation_summary").striped(true).show(ui, |ui| {
            let q = s.rotation.quaternion();
            ui.label("Active input");
            ui.label(s.active_input.label());
            ui.end_row();
            ui.label("Quaternion (x, y, z, w)");
            ui.monospace(format!("{:.4}, {:.4}, {:.4}, {:.4}", q.i, q.j, q.k, q.w));
            ui.end_row();
            ui.label("Starting position");
            ui.monospace(format!(
                "{:.2}, {:.2}, {:.2}",
                s.start_position.x, s.start_position.y, s.start_position.z
            ));
            ui.end_row();
            ui.label("Axis of rotation shown");
            ui.label(if s.show_axis_of_rotation { "yes" } else { "no" });
            ui.end_row();
        });

        ui.separator();
        ui.label(egui::RichText::new("Changes").strong());
        if s.history.is_empty() {
            ui.label(egui::RichText::new("No changes yet").weak());
            return;
        }
        egui::ScrollArea::vertical().id_salt("history_scroll").show(ui, |ui| {
            egui::Grid::new("history").striped(true).show(ui, |ui| {
                for record in &s.history {
                    ui.monospace(record.path.as_str());
                    ui.monospace(record.value.as_str());
                    ui.end_row();
                }
            });
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.dark_mode {
            let mut vis = egui::Visuals::dark();
            let black = egui::Color32::BLACK;
            vis.window_fill = black;
            vis.panel_fill = black;
            vis.extreme_bg_color = black;
            vis.faint_bg_color = egui::Color32::from_gray(15);
            vis
        } else {
            egui::Visuals::light()
        });

        egui::SidePanel::left("settings_panel")
            .resizable(true)
            .default_width(ctx.screen_rect().width() / 4.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.strong("Inputs");
                    ui.checkbox(&mut self.dark_mode, "Dark");
                    ui.label(egui::RichText::new(env!("GIT_HASH")).small().weak());
                });
                ui.separator();
                egui::ScrollArea::vertical().id_salt("settings_scroll").show(ui, |ui| {
                    self.panel.show(ui, &mut self.state);
                });
            });

        if self.state.needs_sync {
            self.state.needs_sync = false;
            if let Err(e) = sync_panel(&mut self.panel, &self.state) {
                log::error!("failed to update panel: {e}");
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| self.show_summary(ui));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn app() -> App {
        App::from_layout(PANEL_LAYOUT).unwrap()
    }

    fn set(app: &mut App, path: &str, value: Value) {
        let id = app.panel.lookup(path).unwrap();
        app.panel.apply_widget_value(id, value, &mut app.state).unwrap();
        sync_panel(&mut app.panel, &app.state).unwrap();
    }

    fn click(app: &mut App, path: &str) {
        let id = app.panel.lookup(path).unwrap();
        app.panel.trigger_action(id, &mut app.state).unwrap();
        sync_panel(&mut app.panel, &app.state).unwrap();
    }

    fn enabled(app: &App, path: &str) -> bool {
        app.panel.control(app.panel.lookup(path).unwrap()).unwrap().is_enabled()
    }

    #[test]
    fn layout_builds_every_control() {
        let app = app();
        let registry = app.panel.registry();
        assert_eq!(registry.query("/*", ControlKind::Folder).unwrap().len(), 8);
        assert_eq!(registry.query("/*", ControlKind::Value).unwrap().len(), 25);
        assert_eq!(app.panel.values().text(ACTIVE_INPUT), Some("Euler Angles"));
        assert_eq!(app.panel.values().number("/Quaternion Actual Values/W"), Some(1.0));
    }

    #[test]
    fn startup_gating_enables_euler_group_only() {
        let app = app();
        assert!(enabled(&app, "/Inputs/Euler Angles Input/Rot X"));
        assert!(!enabled(&app, "/Inputs/Axis-Angle Input/Angle"));
        assert!(!enabled(&app, "/Inputs/Quaternion Proportional Input/Apply"));

        let actual = app.panel.control(app.panel.lookup("/Quaternion Actual Values/X").unwrap()).unwrap();
        assert!(!actual.is_enabled() && !actual.is_invalid());
        assert!(enabled(&app, SHOW_AXIS));
        assert!(app
            .panel
            .controls("/*", ControlKind::Folder)
            .unwrap()
            .iter()
            .all(|id| app.panel.control(*id).unwrap().has_open_request()));
    }

    #[test]
    fn switching_input_type_moves_the_gate() {
        let mut app = app();
        set(&mut app, ACTIVE_INPUT, Value::from("Quaternion"));

        assert_eq!(app.state.active_input, InputType::Quaternion);
        let x = app.panel.control(app.panel.lookup("/Inputs/Euler Angles Input/Rot X").unwrap()).unwrap();
        assert!(!x.is_enabled() && x.is_invalid());
        assert!(enabled(&app, "/Inputs/Quaternion Proportional Input/W"));
        assert!(enabled(&app, "/Inputs/Quaternion Proportional Input/Apply"));
        assert_eq!(app.state.history.front().map(|r| r.path.as_str()), Some(ACTIVE_INPUT));
    }

    #[test]
    fn apply_normalizes_the_proportional_quaternion() {
        let mut app = app();
        set(&mut app, ACTIVE_INPUT, Value::from("Quaternion"));
        set(&mut app, "/Inputs/Quaternion Proportional Input/X", Value::Number(1.0));
        set(&mut app, "/Inputs/Quaternion Proportional Input/W", Value::Number(1.0));
        click(&mut app, "/Inputs/Quaternion Proportional Input/Apply");

        let half = std::f64::consts::FRAC_1_SQRT_2;
        let values = app.panel.values();
        assert_relative_eq!(values.number("/Quaternion Actual Values/X").unwrap(), half, epsilon = 1e-12);
        assert_relative_eq!(values.number("/Quaternion Actual Values/W").unwrap(), half, epsilon = 1e-12);
        assert_relative_eq!(values.number("/Quaternion Actual Values/Y").unwrap(), 0.0);

        let shown = app.panel.control(app.panel.lookup("/Quaternion Actual Values/X").unwrap()).unwrap();
        assert_relative_eq!(shown.display().and_then(Value::as_number).unwrap(), half, epsilon = 1e-12);
    }

    #[test]
    fn apply_with_zero_quaternion_resets_to_identity() {
        let mut app = app();
        set(&mut app, "/Inputs/Quaternion Proportional Input/W", Value::Number(0.0));
        click(&mut app, "/Inputs/Quaternion Proportional Input/Apply");
        assert_eq!(app.state.rotation, UnitQuaternion::identity());
    }

    #[test]
    fn normalize_axis_display_scales_to_unit_length() {
        let mut app = app();
        set(&mut app, "/Inputs/Axis-Angle Input/Axis X", Value::Number(3.0));
        set(&mut app, "/Inputs/Axis-Angle Input/Axis Z", Value::Number(4.0));
        click(&mut app, "/Inputs/Axis-Angle Input/Normalize Axis Display");

        let values = app.panel.values();
        assert_relative_eq!(values.number("/Inputs/Axis-Angle Input/Axis X").unwrap(), 0.6, epsilon = 1e-12);
        assert_relative_eq!(values.number("/Inputs/Axis-Angle Input/Axis Z").unwrap(), 0.8, epsilon = 1e-12);
        assert_eq!(app.state.history.len(), 2);
    }

    #[test]
    fn zero_axis_is_left_alone() {
        let mut app = app();
        click(&mut app, "/Inputs/Axis-Angle Input/Normalize Axis Display");
        assert_eq!(app.panel.values().number("/Inputs/Axis-Angle Input/Axis Y"), Some(0.0));
    }

    #[test]
    fn starting_position_tracks_sliders() {
        let mut app = app();
        set(&mut app, "/Object Properties/Starting Position/Y", Value::Number(1.5));
        assert_eq!(app.state.start_position, Vector3::new(1.0, 1.5, 0.0));
    }

    #[test]
    fn show_axis_toggle_survives_sync() {
        let mut app = app();
        set(&mut app, SHOW_AXIS, Value::Bool(true));
        assert!(app.state.show_axis_of_rotation);
        assert_eq!(app.panel.values().boolean(SHOW_AXIS), Some(true));
    }

    #[test]
    fn history_is_bounded() {
        let mut state = AppState::default();
        for i in 0..HISTORY_LEN + 10 {
            state.record("/x", &Value::Number(i as f64));
        }
        assert_eq!(state.history.len(), HISTORY_LEN);
        assert_eq!(state.history.front().map(|r| r.value.as_str()), Some("73"));
    }
}
