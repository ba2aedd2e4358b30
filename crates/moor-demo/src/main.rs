// Moor demo: builds the classic five-pane layout, then drives one drag and
// one close through the Docker the way a windowing host would.

use moor_docker::{load_settings, CloseOutcome, DockPosition, Docker, DragOutcome, Rect, Vec2};

enum Swatch {
    Rectangle(&'static str),
    Circle(&'static str),
}

impl Swatch {
    fn label(&self) -> String {
        match self {
            Swatch::Rectangle(color) => format!("{color} rectangle"),
            Swatch::Circle(color) => format!("{color} circle"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let frame = Rect::new(0.0, 0.0, 800.0, 600.0);
    let mut docker = Docker::with_settings(frame, load_settings());

    let red = docker.create_pane("Auto Docked Window 1", Swatch::Rectangle("red"), DockPosition::Left);
    docker.create_pane("Auto Docked Window 2", Swatch::Circle("blue"), DockPosition::Top);
    let green = docker.create_pane("Auto Docked Window 3", Swatch::Rectangle("green"), DockPosition::Right);
    docker.create_pane("Auto Docked Window 4", Swatch::Circle("gold"), DockPosition::Bottom);
    let closable = docker.create_pane("Undocked Closable Window", Swatch::Rectangle("black"), DockPosition::None);

    docker.set_dock_on_close(closable, false)?;
    docker.set_on_close(closable, |pane| println!("Window {pane} closed"))?;
    docker.set_on_undock(green, |pane| log::info!("pane {pane} undocked"))?;
    docker.set_on_dock(green, |pane| log::info!("pane {pane} docked"))?;

    docker.reformat();
    println!("layout: {}", docker.tree().describe());
    println!("{}", serde_json::to_string_pretty(&docker.layout())?);

    // Tear the green pane off and drop it onto the center of the red pane.
    let start = docker.pane_rect(green).map(|r| r.center()).unwrap_or(Vec2::new(700.0, 300.0));
    docker.press(green, start)?;
    let host = docker.layout();
    docker.drag(Vec2::new(start.x - 40.0, start.y), &host)?;

    // Re-layout after the tear-off before probing for a target.
    let target = docker.pane_rect(red).map(|r| r.center()).unwrap_or(Vec2::new(100.0, 300.0));
    let host = docker.layout();
    docker.drag(target, &host)?;
    match docker.release(target)? {
        DragOutcome::Docked(at) => println!("dropped pane {green} at {at:?}"),
        other => println!("drop ended as {other:?}"),
    }
    println!("layout: {}", docker.tree().describe());

    if let CloseOutcome::Destroyed(content) = docker.close_pane(closable)? {
        println!("destroyed the {}", content.label());
    }
    for floating in docker.floating() {
        println!("still floating: {} at {:?}", floating.pane, floating.rect);
    }
    Ok(())
}
