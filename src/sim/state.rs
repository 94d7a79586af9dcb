//! Game session and run state machine
//!
//! Everything a run needs lives in one `GameSession`: meters, the physics
//! world, the chef, the arms, the spawn timer, and the active ingredients.
//! Tick functions receive it by `&mut` and nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arms::{ArmController, Side};
use super::physics::{Body, BodyHandle, BodyRole, PhysicsWorld};
use super::spawn::SpawnScheduler;
use crate::clamp_or_center;
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::{Difficulty, DifficultyParams};

/// Where the player is in the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Waiting for a difficulty pick
    AtMenu,
    /// Active gameplay
    Playing,
    /// Physics, logic and spawning frozen
    Paused,
    /// Soup finished (terminal until back to menu)
    Won,
    /// Chef panicked (terminal until back to menu)
    Lost,
}

/// Fruit kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IngredientKind {
    Banana,
    Grape,
    Orange,
}

impl IngredientKind {
    pub const ALL: [IngredientKind; 3] = [
        IngredientKind::Banana,
        IngredientKind::Grape,
        IngredientKind::Orange,
    ];
}

/// A live ingredient; its body lives in the physics world under `handle`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub handle: BodyHandle,
    pub kind: IngredientKind,
    pub radius: f32,
}

/// Play area size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Finite and non-empty
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Character scale relative to the reference size
    pub fn scale(&self) -> f32 {
        self.width.min(self.height) / REFERENCE_SIZE
    }

    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Y of the chef's feet
    pub fn chef_base_y(&self) -> f32 {
        self.height * CHEF_BASE
    }

    /// Chef x range after the side margins
    pub fn chef_range(&self) -> (f32, f32) {
        (CHEF_MARGIN, self.width - CHEF_MARGIN)
    }

    /// Horizontal band ingredients spawn in
    pub fn spawn_span(&self) -> (f32, f32) {
        let span = self.width * SPAWN_SPAN;
        let left = (self.width - span) / 2.0;
        (left, left + span)
    }
}

/// The player character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chef {
    /// Horizontal center (the pot follows this)
    pub x: f32,
    /// Movement per logic tick
    pub speed: f32,
    /// Movement applied on the last logic tick
    pub velocity: f32,
    /// Ever-increasing phase driving the arm sway
    pub wobble: f32,
}

impl Chef {
    pub fn new(x: f32, speed: f32) -> Self {
        Self {
            x,
            speed,
            velocity: 0.0,
            wobble: 0.0,
        }
    }

    /// Apply one logic tick of movement input
    pub fn steer(&mut self, move_left: bool, move_right: bool, viewport: &Viewport) {
        let dir = move_right as i32 as f32 - move_left as i32 as f32;
        self.velocity = dir * self.speed;
        self.x += self.velocity;
        self.clamp_to(viewport);
    }

    pub fn clamp_to(&mut self, viewport: &Viewport) {
        let (min, max) = viewport.chef_range();
        self.x = clamp_or_center(self.x, min, max);
    }
}

/// Pot rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PotBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    /// Collider center (deflection target)
    pub center: Vec2,
}

impl PotBounds {
    pub fn around(center_x: f32, viewport: &Viewport) -> Self {
        let top = viewport.height * POT_TOP;
        Self {
            left: center_x - POT_WIDTH / 2.0,
            right: center_x + POT_WIDTH / 2.0,
            top,
            bottom: viewport.height,
            center: Vec2::new(center_x, top + POT_HEIGHT / 2.0),
        }
    }

    /// Size of the static collider (inset from the drawn pot)
    pub fn collider_size() -> Vec2 {
        Vec2::new(
            POT_WIDTH - POT_COLLIDER_INSET,
            POT_HEIGHT - POT_COLLIDER_INSET,
        )
    }
}

/// Floating text ("Perfect!", "MISS!"), cosmetic only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub text: &'static str,
    pub pos: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// 1.0 when spawned, removed at 0
    pub life: f32,
}

impl Feedback {
    pub fn new(text: &'static str, pos: Vec2, color: u32) -> Self {
        Self {
            text,
            pos,
            color,
            life: 1.0,
        }
    }
}

/// Audio cues for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Plop,
    Splash,
}

/// Things that happened, drained by presentation each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Caught { kind: IngredientKind, pos: Vec2 },
    Missed { kind: IngredientKind, pos: Vec2 },
    Deflected { side: Side, pos: Vec2 },
    Won,
    Lost,
    Sound(SoundCue),
    /// Start the background loop at this volume (0-1)
    MusicStart { volume: f32 },
    MusicStop,
}

/// Meter values as the HUD shows them; only the logic tick updates these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HudValues {
    pub soup_percent: u32,
    pub panic_percent: u32,
    pub panic_high: bool,
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Player preferences (sound, shake)
    pub settings: Settings,
    /// Seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub run_state: RunState,
    pub difficulty: Difficulty,
    pub params: DifficultyParams,
    /// Soup quality meter [0, 100]
    pub soup_quality: f32,
    /// Panic meter [0, 100]
    pub panic_level: f32,
    pub hud: HudValues,
    pub viewport: Viewport,
    /// Built on the first run start
    pub world: Option<PhysicsWorld>,
    pot_body: Option<BodyHandle>,
    floor_body: Option<BodyHandle>,
    /// Created on the first run start
    pub chef: Option<Chef>,
    pub arms: ArmController,
    pub spawner: SpawnScheduler,
    /// Active ingredients, sorted by handle
    pub ingredients: Vec<Ingredient>,
    pub feedback: Vec<Feedback>,
    pub events: Vec<GameEvent>,
    /// 0-1, decays every physics tick
    pub screen_shake: f32,
    /// Seconds since the session was created
    pub clock: f64,
}

impl GameSession {
    /// Create a session sitting at the menu
    pub fn new(settings: Settings, seed: u64) -> Self {
        let difficulty = settings.difficulty;
        let mut viewport = Viewport::new(settings.width, settings.height);
        if !viewport.is_valid() {
            log::warn!(
                "Invalid viewport {}x{}, using 800x600",
                viewport.width,
                viewport.height
            );
            viewport = Viewport::new(800.0, 600.0);
        }

        Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            run_state: RunState::AtMenu,
            difficulty,
            params: difficulty.params(),
            soup_quality: 0.0,
            panic_level: 0.0,
            hud: HudValues::default(),
            viewport,
            world: None,
            pot_body: None,
            floor_body: None,
            chef: None,
            arms: ArmController::new(),
            spawner: SpawnScheduler::default(),
            ingredients: Vec::new(),
            feedback: Vec::new(),
            events: Vec::new(),
            screen_shake: 0.0,
            clock: 0.0,
        }
    }

    /// Chef x, or the play-area center before a chef exists
    pub fn chef_x(&self) -> f32 {
        self.chef.map(|c| c.x).unwrap_or_else(|| self.viewport.center_x())
    }

    pub fn pot_bounds(&self) -> PotBounds {
        PotBounds::around(self.chef_x(), &self.viewport)
    }

    pub fn is_active(&self, handle: BodyHandle) -> bool {
        self.ingredients
            .binary_search_by_key(&handle, |i| i.handle)
            .is_ok()
    }

    pub fn ingredient(&self, handle: BodyHandle) -> Option<&Ingredient> {
        self.ingredients
            .binary_search_by_key(&handle, |i| i.handle)
            .ok()
            .map(|i| &self.ingredients[i])
    }

    /// Take an ingredient out of the active set and the world
    ///
    /// Returns `None` if it was already gone, so callers can't resolve twice.
    pub fn remove_ingredient(&mut self, handle: BodyHandle) -> Option<Ingredient> {
        let idx = self
            .ingredients
            .binary_search_by_key(&handle, |i| i.handle)
            .ok()?;
        let ingredient = self.ingredients.remove(idx);
        if let Some(world) = self.world.as_mut() {
            world.remove_body(handle);
        }
        Some(ingredient)
    }

    /// Register a freshly spawned ingredient
    pub(crate) fn track_ingredient(&mut self, ingredient: Ingredient) {
        // Handles are monotonic, so pushing keeps the set sorted
        self.ingredients.push(ingredient);
    }

    fn clear_ingredients(&mut self) {
        for ingredient in std::mem::take(&mut self.ingredients) {
            if let Some(world) = self.world.as_mut() {
                world.remove_body(ingredient.handle);
            }
        }
    }

    /// Hand the queued events to the presentation layer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn play_sound(&mut self, cue: SoundCue) {
        if self.settings.sfx_enabled {
            self.events.push(GameEvent::Sound(cue));
        }
    }

    pub(crate) fn shake(&mut self) {
        if self.settings.screen_shake {
            self.screen_shake = 1.0;
        }
    }

    // === Meters ===

    /// Add soup quality; wins the run when the meter fills
    pub fn add_soup(&mut self, amount: f32) {
        self.soup_quality = (self.soup_quality + amount).clamp(0.0, WIN_SCORE);
        if self.soup_quality >= WIN_SCORE {
            self.finish(RunState::Won);
        }
    }

    /// Add panic; loses the run when the meter fills
    pub fn add_panic(&mut self, amount: f32) {
        self.panic_level = (self.panic_level + amount).clamp(0.0, PANIC_MAX);
        if self.panic_level >= PANIC_MAX {
            self.finish(RunState::Lost);
        }
    }

    pub fn decay_panic(&mut self) {
        self.panic_level = (self.panic_level - PANIC_DECAY).clamp(0.0, PANIC_MAX);
    }

    /// Publish the meters to the HUD
    pub fn commit_hud(&mut self) {
        self.hud = HudValues {
            soup_percent: self.soup_quality.round() as u32,
            panic_percent: self.panic_level.round() as u32,
            panic_high: self.panic_level > PANIC_HIGH,
        };
    }

    // === Transitions ===

    /// Menu -> Playing with the chosen difficulty
    pub fn start_run(&mut self, difficulty: Difficulty) -> bool {
        if self.run_state != RunState::AtMenu {
            log::warn!("Ignoring start_run while {:?}", self.run_state);
            return false;
        }

        self.difficulty = difficulty;
        self.params = difficulty.params();

        match self.world.as_mut() {
            Some(world) => world.gravity = self.params.gravity_px(),
            None => {
                self.world = Some(PhysicsWorld::new(self.params.gravity_px()));
                self.rebuild_static_colliders();
            }
        }

        self.clear_ingredients();
        self.feedback.clear();
        self.events.clear();
        self.screen_shake = 0.0;
        self.soup_quality = 0.0;
        self.panic_level = 0.0;
        self.commit_hud();

        let mut chef = Chef::new(self.viewport.center_x(), self.params.chef_speed);
        chef.clamp_to(&self.viewport);
        self.chef = Some(chef);
        self.sync_pot();

        self.arms.lower();
        if let Some(world) = self.world.as_mut() {
            self.arms
                .sync_hands(world, chef.x, &self.viewport, chef.wobble);
        }

        self.run_state = RunState::Playing;
        self.arm_spawner();
        if self.settings.music_volume > 0.0 {
            self.events.push(GameEvent::MusicStart {
                volume: self.settings.music_volume,
            });
        }
        log::info!("Run started on {}", difficulty.as_str());
        true
    }

    /// Playing -> Paused
    pub fn pause(&mut self) -> bool {
        if self.run_state != RunState::Playing {
            return false;
        }
        self.run_state = RunState::Paused;
        self.spawner.cancel();
        log::info!("Paused");
        true
    }

    /// Paused -> Playing
    pub fn resume(&mut self) -> bool {
        if self.run_state != RunState::Paused {
            return false;
        }
        self.run_state = RunState::Playing;
        self.arm_spawner();
        log::info!("Resumed");
        true
    }

    /// Won/Lost/Paused -> Menu, clearing the run
    pub fn return_to_menu(&mut self) -> bool {
        if !matches!(
            self.run_state,
            RunState::Won | RunState::Lost | RunState::Paused
        ) {
            return false;
        }
        self.spawner.cancel();
        self.clear_ingredients();
        self.feedback.clear();
        self.screen_shake = 0.0;
        self.soup_quality = 0.0;
        self.panic_level = 0.0;
        self.commit_hud();
        self.run_state = RunState::AtMenu;
        self.events.push(GameEvent::MusicStop);
        log::info!("Back to menu");
        true
    }

    /// Playing -> Won/Lost, exactly once per run
    fn finish(&mut self, outcome: RunState) {
        if self.run_state != RunState::Playing {
            return;
        }
        self.run_state = outcome;
        self.spawner.cancel();
        self.commit_hud();
        match outcome {
            RunState::Won => {
                self.events.push(GameEvent::Won);
                log::info!("Soup is perfect! Run won at {:.1}s", self.clock);
            }
            RunState::Lost => {
                self.events.push(GameEvent::Lost);
                log::info!("Kitchen panic! Run lost at {:.1}s", self.clock);
            }
            _ => {}
        }
    }

    pub(crate) fn arm_spawner(&mut self) {
        let delay = self
            .spawner
            .schedule_next(self.clock, &self.params, &mut self.rng);
        log::trace!("Next spawn in {:.2}s", delay);
    }

    // === Viewport ===

    /// Accept a new play-area size
    ///
    /// Pot and floor colliders are rebuilt and the chef re-clamped. Ingredient
    /// positions are left alone.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if !viewport.is_valid() {
            log::warn!("Ignoring invalid resize to {}x{}", width, height);
            return;
        }
        self.viewport = viewport;

        if self.world.is_none() {
            // Colliders get built from the stored size on first run start
            log::debug!("Resize to {}x{} before world init", width, height);
            return;
        }

        if let Some(chef) = self.chef.as_mut() {
            chef.clamp_to(&viewport);
        }
        self.rebuild_static_colliders();
        log::info!("Viewport resized to {}x{}", width, height);
    }

    /// Re-create the pot and floor colliders for the current viewport
    fn rebuild_static_colliders(&mut self) {
        let pot = self.pot_bounds();
        let viewport = self.viewport;
        let Some(world) = self.world.as_mut() else {
            return;
        };

        for handle in [self.pot_body.take(), self.floor_body.take()]
            .into_iter()
            .flatten()
        {
            world.remove_body(handle);
        }

        self.pot_body = Some(world.add_body(Body::static_rect(
            BodyRole::PotZone,
            pot.center,
            PotBounds::collider_size(),
        )));
        self.floor_body = Some(world.add_body(Body::static_rect(
            BodyRole::Floor,
            Vec2::new(
                viewport.center_x(),
                viewport.height + FLOOR_THICKNESS / 2.0,
            ),
            Vec2::new(viewport.width + FLOOR_OVERHANG, FLOOR_THICKNESS),
        )));
    }

    /// Keep the pot collider under the chef
    pub(crate) fn sync_pot(&mut self) {
        let center = self.pot_bounds().center;
        if let (Some(world), Some(pot)) = (self.world.as_mut(), self.pot_body) {
            world.set_position(pot, center);
        }
    }

    /// Pot collider handle (exists once the world is built)
    pub fn pot_body(&self) -> Option<BodyHandle> {
        self.pot_body
    }

    /// Floor collider handle (exists once the world is built)
    pub fn floor_body(&self) -> Option<BodyHandle> {
        self.floor_body
    }
}
