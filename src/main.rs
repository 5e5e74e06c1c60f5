mod scene;
mod svg;

use framex::{ElemCaption, MonospaceFont, NodeCaption, Show, StressFlag, Viewer};
use scene::{apply_results, build_portal};
use std::error::Error;
use svg::SvgDriver;

/// Canvas size of the rendered document.
const CANVAS_SIZE: (u32, u32) = (800, 600);

fn main() -> Result<(), Box<dyn Error>> {
    // Logging goes to stderr so the document on stdout stays clean. Set
    // RUST_LOG=debug to follow the camera and redraws.
    env_logger::init();

    // Build a portal frame and attach a set of long-term results, standing in
    // for a model loader and a solver run.
    let mut frame = build_portal()?;
    apply_results(&mut frame)?;

    // The display configuration decides what gets annotated. A JSON file given
    // on the command line replaces the built-in one entirely.
    let show = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("reading display configuration from {path}");
            Show::from_json_file(path)?
        }
        None => default_show(),
    };

    // Open the frame, look at it from the front, fit it to the canvas and draw
    // it once. The projection used is described in
    // https://en.wikipedia.org/wiki/3D_projection.
    let (width, height) = CANVAS_SIZE;
    let mut viewer = Viewer::new(SvgDriver, MonospaceFont::default(), frame, width, height);
    viewer.show = show;
    viewer.view.angle = [10.0, -80.0];
    viewer.reset_focus()?;

    if let Some(canvas) = viewer.canvas() {
        print!("{}", canvas.to_document());
    }
    Ok(())
}

/// Node numbers, reactions with their arrows, supports and the bending
/// diagram with end moments.
fn default_show() -> Show {
    let mut show = Show::new();
    show.toggle_node_caption(NodeCaption::NUM);
    show.toggle_node_caption(NodeCaption::RZ);
    show.toggle_elem_caption(ElemCaption::SECT);
    show.toggle_elem_caption(ElemCaption::RATE_L);
    show.conf = true;
    show.phinge = true;
    show.section_aliases.insert(101, "C1".to_string());
    show.section_aliases.insert(201, "G1".to_string());
    let bending = StressFlag::MX | StressFlag::QX;
    show.stress_by_section.insert(101, bending);
    show.stress_by_section.insert(201, bending);
    show
}
