//! Canvas command tests
//!
//! Drawing commands run against the recording canvas; assertions check the
//! recorded operation stream and the tracked pen state.

mod common;

use common::run_with_canvas;
use quill_runtime::{Canvas, CanvasOp, Outcome, RecordingCanvas, Rgb};

fn draw(source: &str) -> RecordingCanvas {
    let (result, canvas) = run_with_canvas(source);
    result.expect("program should run");
    canvas
}

fn outcome_and_canvas(source: &str) -> (Outcome, RecordingCanvas) {
    let (result, canvas) = run_with_canvas(source);
    (result.expect("program should run"), canvas)
}

#[test]
fn test_move_and_draw_sequence() {
    let canvas = draw("moveto 10 20\ndrawto 30 40");
    assert_eq!(
        canvas.ops(),
        &[
            CanvasOp::MoveTo { x: 10, y: 20 },
            CanvasOp::DrawTo { x: 30, y: 40 },
        ]
    );
    assert_eq!(canvas.position(), (30, 40));
}

#[test]
fn test_command_arguments_are_expressions() {
    // Spaced-out expressions need commas between arguments
    let canvas = draw("int x = 5\nmoveto x * 2, x + 1\nrect x, x * 4");
    assert_eq!(
        canvas.ops(),
        &[
            CanvasOp::MoveTo { x: 10, y: 6 },
            CanvasOp::Rect {
                width: 5,
                height: 20,
                filled: false
            },
        ]
    );
}

#[test]
fn test_circle_takes_the_whole_remainder() {
    let canvas = draw("circle 10 + 5");
    assert_eq!(
        canvas.ops(),
        &[CanvasOp::Circle {
            radius: 15,
            filled: false
        }]
    );
}

#[test]
fn test_tri_records_width_and_height() {
    let canvas = draw("tri 40 30");
    assert_eq!(
        canvas.ops(),
        &[CanvasOp::Triangle {
            width: 40,
            height: 30
        }]
    );
}

#[test]
fn test_pen_with_colour_names() {
    let canvas = draw("pen red 0 0");
    assert_eq!(canvas.pen_colour(), Rgb { r: 255, g: 0, b: 0 });
}

#[test]
fn test_pen_aliases() {
    let canvas = draw("pencolour 0 255 0\npencolor 0 0 255");
    assert_eq!(canvas.pen_colour(), Rgb { r: 0, g: 0, b: 255 });
}

#[test]
fn test_pen_channels_clamp() {
    let canvas = draw("pen 300, 0 - 20, 128");
    assert_eq!(canvas.pen_colour(), Rgb { r: 255, g: 0, b: 128 });
}

#[test]
fn test_set_resizes_the_surface() {
    let canvas = draw("set 800 600");
    assert_eq!(canvas.size(), (800, 600));
}

#[test]
fn test_clear_and_reset() {
    let canvas = draw("moveto 5 5\npen 1 2 3\nclear\nreset");
    assert_eq!(canvas.position(), (0, 0));
    assert_eq!(canvas.pen_colour(), Rgb::default());
    assert_eq!(canvas.ops().last(), Some(&CanvasOp::Reset));
}

#[test]
fn test_text_raw_reaches_log_and_canvas() {
    let (outcome, canvas) = outcome_and_canvas("text hello there");
    assert_eq!(outcome.log, vec!["hello there".to_string()]);
    assert_eq!(canvas.ops(), &[CanvasOp::Text("hello there".to_string())]);
}

#[test]
fn test_text_expression_evaluates() {
    let (outcome, _) = outcome_and_canvas("int x = 6\ntext x * 7");
    assert_eq!(outcome.log, vec!["42".to_string()]);
}

#[test]
fn test_text_single_variable_evaluates() {
    let (outcome, _) = outcome_and_canvas("int score = 9\ntext score");
    assert_eq!(outcome.log, vec!["9".to_string()]);
}

#[test]
fn test_real_coordinates_round() {
    let canvas = draw("moveto 2.5 3.4");
    assert_eq!(canvas.ops(), &[CanvasOp::MoveTo { x: 3, y: 3 }]);
}
