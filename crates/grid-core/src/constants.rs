// Grid layout, motion and animation tuning shared by every frontend.

// Lattice
pub const CARD_SPACING: f32 = 8.0; // world units between adjacent cell centers
pub const INITIAL_COLS: i32 = 7; // columns materialized at construction
pub const INITIAL_ROWS: i32 = 5; // rows materialized at construction

// Expansion margins around the scrolled viewport (world units)
pub const VIEW_MARGIN_X: f32 = 20.0;
pub const VIEW_MARGIN_Y: f32 = 15.0;

// Drag and inertia
pub const DRAG_SCALE: f32 = 0.01; // pixels -> world units
pub const DRAG_VELOCITY_FACTOR: f32 = 0.5; // share of a drag delta kept as velocity
pub const DRAG_EPSILON: f32 = 1e-3; // below this a frame's drag delta is ignored
pub const VELOCITY_DAMPING: f32 = 0.1; // lerp factor toward zero, per frame

// Cosmetics
pub const AMBIENT_PARALLAX_SCALE: f32 = 0.2;
pub const FLOAT_AMPLITUDE: f32 = 0.001;

// Camera
pub const CAMERA_BASE_Z: f32 = 12.0;
pub const CAMERA_PULL_DISTANCE: f32 = 0.5; // added to CAMERA_BASE_Z while dragging
pub const CAMERA_EASE_MS: f64 = 1000.0;
pub const CAMERA_FOVY_DEGREES: f32 = 60.0;

// Distortion intensity driven by drags
pub const DISTORTION_PEAK: f32 = 0.08;
pub const DISTORTION_IN_MS: f64 = 800.0;
pub const DISTORTION_OUT_MS: f64 = 1000.0;
pub const LENS_EASE_MS: f64 = 1000.0; // consumer-side smoothing of the streamed value

// Card reveal/hide
pub const STAGGER_TOTAL_MS: f64 = 2000.0; // whole-grid stagger budget
pub const CARD_SCALE_MS: f64 = 800.0;
pub const CARD_FADE_MS: f64 = 600.0;
pub const EXPAND_REVEAL_DELAY_MS: f64 = 50.0; // single-card reveal after lazy creation

// Card footprint
pub const PORTRAIT_SIZE: [f32; 2] = [3.5, 4.5];
pub const LANDSCAPE_SIZE: [f32; 2] = [4.5, 3.5];
pub const CARD_TARGET_HEIGHT: f32 = 4.0; // height once the content aspect is known

pub const DEFAULT_CONTENT: [&str; 5] = [
    "/imagesProject/img1.png",
    "/imagesProject/img2.png",
    "/imagesProject/img3.png",
    "/imagesProject/img4.png",
    "/imagesProject/img5.png",
];
