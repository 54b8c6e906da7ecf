// Page wiring and presentation constants for the web frontend.

// DOM
pub const CANVAS_ID: &str = "works-canvas";

// Delay between mount and the staggered reveal of the initial block
pub const INITIAL_REVEAL_DELAY_MS: f64 = 300.0;

// Scene
pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 1.0];
pub const CULL_MARGIN_CELLS: i32 = 1; // drawn beyond the materialization window

// Lens pass
pub const EDGE_DARKEN: f32 = 0.6; // edge gradient strength, 0 disables

// Placeholder tints, one per content slot, until textures are streamed in
pub const CONTENT_TINTS: [[f32; 3]; 5] = [
    [0.86, 0.42, 0.35], // terracotta
    [0.36, 0.62, 0.78], // steel blue
    [0.92, 0.80, 0.45], // sand
    [0.48, 0.72, 0.52], // sage
    [0.66, 0.52, 0.82], // lavender
];
