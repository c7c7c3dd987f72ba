//! List output layouts.

use reframe_model::layout::LAYOUT_GROUPS;

pub fn run() -> anyhow::Result<()> {
    for group in LAYOUT_GROUPS {
        println!("{}:", group.label);
        for layout in group.variants {
            let camera = if layout.uses_camera() { "camera" } else { "content only" };
            println!(
                "  {:<22} {:<28} {:>5}  {}",
                layout.as_str(),
                layout.display_name(),
                layout.aspect().label(),
                camera
            );
        }
        println!();
    }
    Ok(())
}
