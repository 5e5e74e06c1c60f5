use framex::model::{Allowable, PlasticCapacity};
use framex::{point, ElemType, Frame, FrameEditError, Section, LONG_TERM};
use ndarray::array;

/// Node numbers of the demo portal frame, bottom left going clockwise.
pub const PORTAL_NODES: [u32; 4] = [1, 2, 3, 4];

/// Build a single-bay portal frame, 8 m wide and 4 m tall, fixed at both feet.
///
/// A portal frame is the simplest moment-resisting frame: two columns tied by
/// a girder with rigid joints. See
/// <https://en.wikipedia.org/wiki/Portal_frame>.
pub fn build_portal() -> Result<Frame, FrameEditError> {
    let mut frame = Frame::new();

    // Sections carry the allowables used for utilization ratios and the plastic
    // capacities used for the yield function.
    let mut column = Section::new(101, "C1 H-300x300");
    column.allowable = Some(Allowable {
        axial: 250.0,
        moment_x: 30.0,
        moment_y: 15.0,
    });
    column.plastic = Some(PlasticCapacity {
        axial: 380.0,
        moment_x: 45.0,
        moment_y: 22.0,
    });
    frame.add_section(column);
    let mut girder = Section::new(201, "G1 H-400x200");
    girder.allowable = Some(Allowable {
        axial: 200.0,
        moment_x: 35.0,
        moment_y: 6.0,
    });
    frame.add_section(girder);

    for (num, coord) in PORTAL_NODES.iter().zip([
        point(0.0, 0.0, 0.0),
        point(0.0, 0.0, 4.0),
        point(8.0, 0.0, 4.0),
        point(8.0, 0.0, 0.0),
    ]) {
        frame.add_node(*num, coord)?;
    }
    frame.add_elem(1, ElemType::Column, 101, &[1, 2])?;
    frame.add_elem(2, ElemType::Girder, 201, &[2, 3])?;
    frame.add_elem(3, ElemType::Column, 101, &[4, 3])?;

    // Both column bases are clamped in every degree of freedom.
    frame.set_support(1, [true; 6])?;
    frame.set_support(4, [true; 6])?;
    Ok(frame)
}

/// Attach long-term results for a uniform girder load with a small sway.
///
/// The numbers are hand-picked to be statically consistent: the girder carries
/// 4 tf/m, so each foot takes 16 tf vertically.
pub fn apply_results(frame: &mut Frame) -> Result<(), FrameEditError> {
    frame.set_weight(2, [0.0, 1.2, 0.0])?;
    frame.set_weight(3, [0.0, 1.2, 0.0])?;

    frame.set_displacement(2, LONG_TERM, [0.002, 0.0, -0.0004, 0.0, 0.0011, 0.0])?;
    frame.set_displacement(3, LONG_TERM, [0.002, 0.0, -0.0004, 0.0, -0.0011, 0.0])?;

    frame.set_reaction(1, LONG_TERM, [2.5, 0.0, 16.0, 0.0, -3.2, 0.0])?;
    frame.set_reaction(4, LONG_TERM, [-2.5, 0.0, 16.0, 0.0, 3.2, 0.0])?;

    // Rows are the element ends; columns are Nz, Qx, Qy, Mz, Mx, My.
    frame.set_stress(
        1,
        LONG_TERM,
        array![
            [16.0, 2.5, 0.0, 0.0, 3.2, 0.0],
            [-16.0, -2.5, 0.0, 0.0, 6.8, 0.0]
        ],
    )?;
    frame.set_stress(
        2,
        LONG_TERM,
        array![
            [2.5, 16.0, 0.0, 0.0, -6.8, 0.0],
            [-2.5, 16.0, 0.0, 0.0, -6.8, 0.0]
        ],
    )?;
    frame.set_stress(
        3,
        LONG_TERM,
        array![
            [16.0, -2.5, 0.0, 0.0, -3.2, 0.0],
            [-16.0, 2.5, 0.0, 0.0, -6.8, 0.0]
        ],
    )?;
    frame.set_hinge(2, LONG_TERM, 2, false)?;
    frame.set_hinge(2, LONG_TERM, 3, false)?;
    Ok(())
}
