use draw_over::{DrawOver, DrawOverConfig, HexColor, HostElement, PenMode, PersistedDrawing};
use egui::{Rect, pos2, vec2};

fn surface(width: f32, height: f32) -> DrawOver {
    let host = HostElement::new(Rect::from_min_size(pos2(0.0, 0.0), vec2(width, height)), 1.0);
    let mut surface = DrawOver::new(host, DrawOverConfig::default()).unwrap();
    surface.mount(host);
    surface
}

fn drawn_surface() -> DrawOver {
    let mut surface = surface(40.0, 30.0);
    surface.pick_color(HexColor::from_rgb(200, 30, 30));
    surface.pen_mut().set_width(7.0).unwrap();
    surface.pointer_down(pos2(5.0, 15.0));
    surface.pointer_move(pos2(35.0, 15.0));
    surface.pointer_up().unwrap();
    surface.pen_mut().start_erasing();
    surface
}

#[test]
fn test_restored_drawing_matches_the_saved_one() {
    let saved = PersistedDrawing::capture(&drawn_surface());

    let mut restored = surface(40.0, 30.0);
    saved.clone().restore(&mut restored).unwrap();
    restored.run_pending_restores();

    assert_eq!(restored.pen().settings(), saved.pen);
    assert_eq!(restored.pen().mode(), PenMode::Erase);
    assert_eq!(restored.palette().custom(), saved.custom_colors.as_slice());
    assert_eq!(restored.history().step_count(), 1);
    assert_eq!(restored.target().pixel(20, 15).unwrap().0, [200, 30, 30, 255]);
}

#[test]
fn test_saved_drawing_is_stretched_to_a_new_size() {
    let saved = PersistedDrawing::capture(&drawn_surface());

    let mut restored = surface(80.0, 60.0);
    saved.restore(&mut restored).unwrap();
    restored.run_pending_restores();

    assert!(restored.target().pixel(40, 31).unwrap()[3] >= 250);
    assert_eq!(restored.target().pixel(40, 5).unwrap()[3], 0);
}

#[test]
fn test_file_round_trip() {
    let saved = PersistedDrawing::capture(&drawn_surface());
    let path = std::env::temp_dir()
        .join(format!("draw_over_test_{}", std::process::id()))
        .join("drawing.json");

    saved.save(&path).unwrap();
    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("data:image/png;base64,"));

    let loaded = PersistedDrawing::load(&path).unwrap();
    assert_eq!(loaded, saved);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_missing_file_is_a_read_error() {
    let path = std::env::temp_dir().join("draw_over_missing_drawing.json");
    assert!(PersistedDrawing::load(path).is_err());
}
