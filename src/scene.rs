//! Scene state machine
//!
//! Scenes are pure functions of the shared position: given the position they
//! draw one frame through the [`Renderer`] and say whether they want to keep
//! going. The machine walks an ordered list of scenes forward only; the
//! position is never reset when a scene hands over to the next.

use crate::render::{Renderer, Shade, Surface};
use std::io;

/// Intro runs while `position < INTRO_END`
pub const INTRO_END: u32 = 32;
/// Chessboard runs while `position < CHESSBOARD_END`
pub const CHESSBOARD_END: u32 = 128;
/// Circles run while `position < CIRCLES_END`
pub const CIRCLES_END: u32 = 256;

/// Position at which the intro prints its first line
pub const INTRO_TITLE_AT: u32 = 4;
/// Position at which the intro prints its second line
pub const INTRO_SUBTITLE_AT: u32 = 12;

const INTRO_TITLE: &str = "b y t e b e a t";
const INTRO_SUBTITLE: &str = "sound and pixels from one counter";

const TILE_WIDTH: i32 = 8;
const TILE_HEIGHT: i32 = 4;

/// Ellipse radii stay below this
const MAX_CIRCLE_RADIUS: u32 = 20;

/// The mouth stops growing at this size
const MAX_MOUTH_RADIUS: (i32, i32) = (20, 4);

const FACE_COLOR: u8 = 3;
const EYE_COLOR: u8 = 7;

/// One visual effect of the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    /// Two centered text lines
    Intro,
    /// Colored tiles walking over the canvas
    Chessboard,
    /// Three soft ellipses per frame
    Circles,
    /// A face whose mouth keeps growing; never finishes
    Smilie,
}

impl Scene {
    /// The demo's scene order
    pub const SEQUENCE: [Scene; 4] = [
        Scene::Intro,
        Scene::Chessboard,
        Scene::Circles,
        Scene::Smilie,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Scene::Intro => "intro",
            Scene::Chessboard => "chessboard",
            Scene::Circles => "circles",
            Scene::Smilie => "smilie",
        }
    }

    /// Continuation predicate: whether the scene draws at `position`
    pub fn continues(self, position: u32) -> bool {
        match self {
            Scene::Intro => position < INTRO_END,
            Scene::Chessboard => position < CHESSBOARD_END,
            Scene::Circles => position < CIRCLES_END,
            Scene::Smilie => true,
        }
    }

    /// Draw the frame for `position`; `entered_at` is the position the
    /// scene became active at.
    ///
    /// Returns `Ok(false)` without drawing once the scene is done.
    pub fn render<S: Surface>(
        self,
        renderer: &mut Renderer<S>,
        position: u32,
        entered_at: u32,
    ) -> io::Result<bool> {
        if !self.continues(position) {
            return Ok(false);
        }
        match self {
            Scene::Intro => intro(renderer, position)?,
            Scene::Chessboard => chessboard(renderer, position)?,
            Scene::Circles => circles(renderer, position)?,
            Scene::Smilie => smilie(renderer, position, entered_at)?,
        }
        Ok(true)
    }
}

fn intro<S: Surface>(r: &mut Renderer<S>, position: u32) -> io::Result<()> {
    let middle = r.canvas().height / 2;
    match position {
        INTRO_TITLE_AT => r.centered_text(middle - 1, 7, INTRO_TITLE),
        INTRO_SUBTITLE_AT => r.centered_text(middle + 1, 6, INTRO_SUBTITLE),
        _ => Ok(()),
    }
}

fn chessboard<S: Surface>(r: &mut Renderer<S>, position: u32) -> io::Result<()> {
    let canvas = r.canvas();
    let columns = (canvas.width / TILE_WIDTH).max(1) as u32;
    let rows = (canvas.height / TILE_HEIGHT + 1) as u32;

    let x = (position % columns) as i32 * TILE_WIDTH;
    let y = (position % rows) as i32 * TILE_HEIGHT;
    let color = ((position >> 2 | position) % 8) as u8;

    r.rectangle(x, y, TILE_WIDTH, TILE_HEIGHT, color)
}

fn circles<S: Surface>(r: &mut Renderer<S>, position: u32) -> io::Result<()> {
    let canvas = r.canvas();
    let width = canvas.width.max(1) as u32;
    let height = canvas.height.max(1) as u32;

    for i in 0..3u32 {
        let radius_x = (position >> i | position) % MAX_CIRCLE_RADIUS;
        let radius_y = (radius_x as f32 * 0.75) as u32;
        let x = ((position / (radius_x + 1)) >> i | i) % width;
        let y = ((position / (radius_y + 1)) >> i | i) % height;
        let color = ((position + i) / 12 % 8) as u8;

        r.smooth_circle(x as i32, y as i32, radius_x as i32, radius_y as i32, color)?;
    }
    Ok(())
}

fn smilie<S: Surface>(r: &mut Renderer<S>, position: u32, entered_at: u32) -> io::Result<()> {
    let canvas = r.canvas();
    let cx = canvas.width / 2;
    let eye_row = canvas.height / 4;

    if position == entered_at {
        r.clear()?;
        r.rectangle(cx - 12, eye_row, 6, 3, EYE_COLOR)?;
        r.rectangle(cx + 6, eye_row, 6, 3, EYE_COLOR)?;
    }

    let grown = i32::try_from(position.saturating_sub(entered_at)).unwrap_or(i32::MAX);
    let radius_x = (4 + grown / 8).min(MAX_MOUTH_RADIUS.0);
    let radius_y = (1 + grown / 32).min(MAX_MOUTH_RADIUS.1);
    r.smooth_circle(cx, canvas.height * 2 / 3, radius_x, radius_y, FACE_COLOR)?;

    // Pupils get the darkest shade so the growing mouth never erases them
    r.pixel(cx - 9, eye_row + 1, 0, Shade::Dark)?;
    r.pixel(cx + 9, eye_row + 1, 0, Shade::Dark)
}

/// Ordered scenes plus the index of the active one.
#[derive(Debug, Clone)]
pub struct SceneMachine {
    scenes: Vec<Scene>,
    active: usize,
    entered_at: Option<u32>,
}

impl SceneMachine {
    /// Machine over `scenes`, starting at the first
    pub fn new(scenes: Vec<Scene>) -> Self {
        SceneMachine {
            scenes,
            active: 0,
            entered_at: None,
        }
    }

    /// Index of the active scene; equals `len()` once finished
    pub fn active(&self) -> usize {
        self.active
    }

    /// The active scene, if any
    pub fn active_scene(&self) -> Option<Scene> {
        self.scenes.get(self.active).copied()
    }

    /// Number of scenes
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the scene list is empty
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Position at which the active scene drew its first frame
    pub fn entered_at(&self) -> Option<u32> {
        self.entered_at
    }

    /// Whether every scene has finished
    pub fn is_finished(&self) -> bool {
        self.active >= self.scenes.len()
    }

    /// Render `position` with the active scene.
    ///
    /// A scene that reports done hands the same position to its successor,
    /// so every position is drawn by exactly one scene. Returns `Ok(false)`
    /// once the list is exhausted.
    pub fn step<S: Surface>(
        &mut self,
        renderer: &mut Renderer<S>,
        position: u32,
    ) -> io::Result<bool> {
        while let Some(scene) = self.active_scene() {
            let entered_at = *self.entered_at.get_or_insert(position);
            if scene.render(renderer, position, entered_at)? {
                return Ok(true);
            }
            self.active += 1;
            self.entered_at = Some(position);
            tracing::info!(
                position,
                finished = scene.name(),
                next = self.active_scene().map(Scene::name).unwrap_or("none"),
                "scene transition"
            );
        }
        Ok(false)
    }
}

impl Default for SceneMachine {
    fn default() -> Self {
        Self::new(Scene::SEQUENCE.to_vec())
    }
}
