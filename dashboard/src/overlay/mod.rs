pub mod canvas;
pub mod detection_canvas;
pub mod renderer;
