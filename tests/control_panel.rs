use draw_over::{Command, ControlPanel, DrawOver, DrawOverConfig, HexColor, HostElement};
use egui::{Rect, pos2, vec2};

fn surface() -> DrawOver {
    let host = HostElement::new(Rect::from_min_size(pos2(0.0, 0.0), vec2(40.0, 30.0)), 1.0);
    let mut surface = DrawOver::new(host, DrawOverConfig::default()).unwrap();
    surface.mount(host);
    surface
}

fn draw_line(surface: &mut DrawOver) {
    surface.pointer_down(pos2(5.0, 15.0));
    surface.pointer_move(pos2(35.0, 15.0));
    surface.pointer_up().unwrap();
}

#[test]
fn test_bound_panel_starts_from_current_models() {
    let mut surface = surface();
    surface.pen_mut().set_width(9.0).unwrap();

    let panel = ControlPanel::bind(&surface);
    let state = panel.state();

    assert_eq!(state.color, HexColor::BLACK);
    assert_eq!(state.width, 9.0);
    assert!(!state.erasing);
    assert!(!state.can_undo);
    assert!(!state.can_redo);
    assert_eq!(state.colors.defaults.len(), 12);
    assert!(state.colors.custom.iter().all(Option::is_none));
}

#[test]
fn test_panel_follows_notifications() {
    let mut surface = surface();
    let panel = ControlPanel::bind(&surface);
    let teal = HexColor::parse("#008080").unwrap();

    Command::PickColor(teal).execute(&mut surface).unwrap();
    Command::SetWidth(20.0).execute(&mut surface).unwrap();
    Command::ToggleErase.execute(&mut surface).unwrap();
    draw_line(&mut surface);

    let state = panel.state();
    assert_eq!(state.color, teal);
    assert_eq!(state.width, 20.0);
    assert!(state.erasing);
    assert_eq!(state.colors.custom[0], Some(teal));
    assert!(state.can_undo);
    assert!(!state.can_redo);

    Command::Undo.execute(&mut surface).unwrap();
    let state = panel.state();
    assert!(!state.can_undo);
    assert!(state.can_redo);
}

#[test]
fn test_swatch_selection_does_not_grow_the_custom_colors() {
    let mut surface = surface();
    let panel = ControlPanel::bind(&surface);
    let blue = HexColor::from_rgb(0, 0, 255);

    Command::SelectColor(blue).execute(&mut surface).unwrap();
    Command::PreviewColor(blue).execute(&mut surface).unwrap();

    let state = panel.state();
    assert_eq!(state.color, blue);
    assert!(state.colors.custom.iter().all(Option::is_none));
}

#[test]
fn test_invalid_width_is_rejected_and_not_shown() {
    let mut surface = surface();
    let panel = ControlPanel::bind(&surface);

    assert!(Command::SetWidth(0.0).execute(&mut surface).is_err());
    assert!(Command::SetWidth(f32::NAN).execute(&mut surface).is_err());

    assert_eq!(panel.state().width, 5.0);
    assert_eq!(surface.pen().width(), 5.0);
}

#[test]
fn test_unbound_panel_stops_updating() {
    let mut surface = surface();
    let panel = ControlPanel::bind(&surface);
    let other = ControlPanel::bind(&surface);
    let red = HexColor::from_rgb(255, 0, 0);

    other.unbind(&surface);
    assert_eq!(surface.pen().color_changed().subscriber_count(), 2);

    Command::SelectColor(red).execute(&mut surface).unwrap();
    assert_eq!(panel.state().color, red);
}

#[test]
fn test_reset_command_empties_custom_colors_in_the_panel() {
    let mut surface = surface();
    let panel = ControlPanel::bind(&surface);

    Command::PickColor(HexColor::from_rgb(1, 2, 3)).execute(&mut surface).unwrap();
    draw_line(&mut surface);
    Command::Reset.execute(&mut surface).unwrap();

    let state = panel.state();
    assert!(state.colors.custom.iter().all(Option::is_none));
    assert!(!state.can_undo);
    assert!(!state.can_redo);
}
