use eth_charts::core::Viewport;
use eth_charts::interaction::{TooltipContent, TooltipGuard, TooltipHost, TooltipPlacement};
use eth_charts::render::{
    CirclePrimitive, Color, LinePrimitive, NullRenderer, RectPrimitive, RenderFrame, Renderer,
    TextHAlign, TextPrimitive,
};

fn sample_frame() -> RenderFrame {
    RenderFrame::new(Viewport::new(800, 400))
        .with_line(LinePrimitive::new(50.0, 360.0, 770.0, 360.0, 1.0, Color::AXIS))
        .with_circle(CirclePrimitive::new(100.0, 120.0, 3.0, Color::GREEN.with_alpha(0.6)))
        .with_rect(RectPrimitive::new(200.0, 40.0, 0.0, 20.0, Color::INDIGO))
        .with_text(TextPrimitive::new(
            "2021",
            410.0,
            378.0,
            12.0,
            Color::AXIS,
            TextHAlign::Center,
        ))
}

#[test]
fn null_renderer_counts_marks_of_valid_frames() {
    let mut renderer = NullRenderer::default();
    renderer.render(&sample_frame()).expect("render");
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_line_count, 1);
    assert_eq!(renderer.last_circle_count, 1);
    assert_eq!(renderer.last_rect_count, 1);
    assert_eq!(renderer.last_text_count, 1);
}

#[test]
fn non_finite_coordinates_are_rejected_before_drawing() {
    let mut renderer = NullRenderer::default();
    let frame = sample_frame().with_line(LinePrimitive::new(
        0.0,
        f64::NAN,
        10.0,
        10.0,
        1.0,
        Color::AXIS,
    ));
    assert!(renderer.render(&frame).is_err());
    assert_eq!(renderer.frames_rendered, 0);
}

#[test]
fn frame_snapshot_round_trips_through_the_v1_contract() {
    let frame = sample_frame();
    let json = frame.to_json_contract_v1_pretty().expect("serialize");
    assert!(json.contains("\"schema_version\": 1"));
    assert_eq!(RenderFrame::from_json_compat_str(&json).expect("parse"), frame);

    let bare = frame.to_json_pretty().expect("serialize bare");
    assert_eq!(RenderFrame::from_json_compat_str(&bare).expect("parse bare"), frame);

    let future = json.replace("\"schema_version\": 1", "\"schema_version\": 7");
    assert!(RenderFrame::from_json_compat_str(&future).is_err());
}

#[derive(Default)]
struct RecordingHost {
    next_id: u32,
    events: Vec<String>,
}

impl TooltipHost for RecordingHost {
    type Handle = u32;

    fn create(&mut self) -> u32 {
        self.next_id += 1;
        self.events.push(format!("create {}", self.next_id));
        self.next_id
    }

    fn show(&mut self, handle: &u32, content: &TooltipContent, _placement: TooltipPlacement) {
        self.events.push(format!("show {handle} {}", content.title));
    }

    fn hide(&mut self, handle: &u32) {
        self.events.push(format!("hide {handle}"));
    }

    fn remove(&mut self, handle: u32) {
        self.events.push(format!("remove {handle}"));
    }
}

#[test]
fn tooltip_guard_removes_its_element_on_drop() {
    let mut host = RecordingHost::default();
    let placement = TooltipPlacement {
        x: 110.0,
        y: 100.0,
        flipped_left: false,
        dropped_below: false,
    };
    {
        let mut guard = TooltipGuard::acquire(&mut host);
        let content = TooltipContent::new("January 2, 2021").with_row("ETH", "$774.53");
        guard.present(Some((&content, placement)));
        guard.present(None);
    }
    assert_eq!(
        host.events,
        ["create 1", "show 1 January 2, 2021", "hide 1", "remove 1"]
    );
}

#[test]
fn each_view_gets_its_own_tooltip_element() {
    let mut host = RecordingHost::default();
    drop(TooltipGuard::acquire(&mut host));
    drop(TooltipGuard::acquire(&mut host));
    assert_eq!(
        host.events,
        ["create 1", "remove 1", "create 2", "remove 2"]
    );
}
