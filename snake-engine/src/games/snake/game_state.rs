use std::collections::HashSet;
use std::time::Duration;

use crate::config::Validate;
use crate::games::{RandomSource, SessionRng};
use crate::log;
use super::effects::{FeedbackEffects, SnakeVisuals};
use super::grid::{GridSize, random_position};
use super::input_queue::InputQueue;
use super::overlay::OverlayHandle;
use super::pickups::{Pickup, Pickups};
use super::settings::SnakeSettings;
use super::body::Snake;
use super::types::{
    Consumable, Direction, GameOverReason, GameStatus, InputEvent, PickupKind, Position,
};

const START_DIRECTION: Direction = Direction::Right;

/// Declaration order breaks ties between deadlines due at the same instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Deadline {
    Tick,
    WallGrace,
    SelfGrace,
}

/// Everything time-driven while running. Grace periods are plain deadlines
/// next to the tick so one scheduler owns all of them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TickSchedule {
    next_tick: Option<Duration>,
    wall_grace: Option<Duration>,
    self_grace: Option<Duration>,
}

impl TickSchedule {
    fn earliest(&self) -> Option<(Duration, Deadline)> {
        [
            (self.next_tick, Deadline::Tick),
            (self.wall_grace, Deadline::WallGrace),
            (self.self_grace, Deadline::SelfGrace),
        ]
        .into_iter()
        .filter_map(|(at, deadline)| at.map(|at| (at, deadline)))
        .min()
    }

    fn shift(&mut self, by: Duration) {
        for at in [&mut self.next_tick, &mut self.wall_grace, &mut self.self_grace]
            .into_iter()
            .flatten()
        {
            *at += by;
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug)]
struct SettingsReturn {
    status: GameStatus,
    entered_at: Duration,
}

/// What the render layer needs for one frame.
#[derive(Clone, Debug)]
pub struct SnakeSnapshot {
    pub status: GameStatus,
    pub open: bool,
    pub grid: GridSize,
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub food: Position,
    /// Visible pickups only.
    pub pickups: Vec<Pickup>,
    pub score: u32,
    pub speed: u32,
    pub tick_interval: Duration,
    pub visuals: SnakeVisuals,
    pub score_popup: Option<u32>,
    pub game_over_reason: Option<GameOverReason>,
    pub settings: SnakeSettings,
}

/// Single-player snake driven by a virtual clock. Callers pass `now` as the
/// time since the session started; `advance` runs every tick and grace
/// deadline that has come due, in order.
pub struct SnakeGameState<R: RandomSource = SessionRng> {
    settings: SnakeSettings,
    grid: GridSize,
    snake: Snake,
    food: Position,
    pickups: Pickups,
    input_queue: InputQueue,
    score: u32,
    speed: u32,
    status: GameStatus,
    settings_return: Option<SettingsReturn>,
    game_over_reason: Option<GameOverReason>,
    schedule: TickSchedule,
    effects: FeedbackEffects,
    overlay: OverlayHandle,
    rng: R,
    now: Duration,
    ticks: u64,
}

impl<R: RandomSource> SnakeGameState<R> {
    pub fn new(settings: SnakeSettings, grid: GridSize, mut rng: R, overlay: OverlayHandle) -> Self {
        let grid = grid.at_least(settings.min_grid());
        let (snake, food, pickups) = fresh_round(grid, &mut rng);

        Self {
            input_queue: InputQueue::new(settings.input_queue_capacity),
            speed: settings.clamp_speed(settings.initial_speed),
            settings,
            grid,
            snake,
            food,
            pickups,
            score: 0,
            status: GameStatus::Ready,
            settings_return: None,
            game_over_reason: None,
            schedule: TickSchedule::default(),
            effects: FeedbackEffects::default(),
            overlay,
            rng,
            now: Duration::ZERO,
            ticks: 0,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn tick_interval(&self) -> Duration {
        self.settings.tick_interval(self.speed)
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn pickups(&self) -> &Pickups {
        &self.pickups
    }

    pub fn input_queue(&self) -> &InputQueue {
        &self.input_queue
    }

    pub fn settings(&self) -> &SnakeSettings {
        &self.settings
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn handle_input(&mut self, event: InputEvent, now: Duration) {
        if !self.overlay.is_open() {
            return;
        }
        self.advance(now);

        match event {
            InputEvent::Direction(direction) => self.enqueue_direction(direction, now),
            InputEvent::Confirm => {
                if self.status == GameStatus::GameOver {
                    self.restart(now);
                }
            }
            InputEvent::Cancel => match self.status {
                GameStatus::Settings => self.close_settings(now),
                _ => self.close(),
            },
        }
    }

    /// The first direction in `Ready` starts the game.
    pub fn enqueue_direction(&mut self, direction: Direction, now: Duration) {
        if !self.overlay.is_open() {
            return;
        }
        self.now = self.now.max(now);

        match self.status {
            GameStatus::Ready => {
                self.input_queue.enqueue(direction);
                self.status = GameStatus::Running;
                self.schedule.next_tick = Some(self.now + self.tick_interval());
                log!("Snake started, first input {:?}", direction);
            }
            GameStatus::Running => {
                self.input_queue.enqueue(direction);
            }
            GameStatus::GameOver | GameStatus::Settings => {}
        }
    }

    /// Runs every deadline due at or before `now`.
    pub fn advance(&mut self, now: Duration) {
        if !self.overlay.is_open() {
            return;
        }

        while self.status == GameStatus::Running {
            let Some((at, deadline)) = self.schedule.earliest() else {
                break;
            };
            if at > now {
                break;
            }
            self.now = self.now.max(at);
            match deadline {
                Deadline::Tick => self.on_tick(at),
                Deadline::WallGrace => self.on_wall_grace_elapsed(),
                Deadline::SelfGrace => self.on_self_grace_elapsed(),
            }
        }

        self.now = self.now.max(now);
        if self.status != GameStatus::Settings {
            self.effects
                .expire(self.now, self.settings.event_flash(), self.settings.pill_effect());
        }
    }

    /// When the host should call `advance` next, if anything is pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        if !self.overlay.is_open() || self.status == GameStatus::Settings {
            return None;
        }

        let schedule = match self.status {
            GameStatus::Running => self.schedule.earliest().map(|(at, _)| at),
            _ => None,
        };
        let flash = self.settings.event_flash();
        let cycle = self.settings.pill_effect();

        [
            schedule,
            self.effects.next_expiry(flash, cycle),
            self.effects.next_color_step(self.now, cycle),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn restart(&mut self, now: Duration) {
        if !self.overlay.is_open() {
            return;
        }
        self.now = self.now.max(now);

        let (snake, food, pickups) = fresh_round(self.grid, &mut self.rng);
        self.snake = snake;
        self.food = food;
        self.pickups = pickups;
        self.score = 0;
        self.speed = self.settings.clamp_speed(self.settings.initial_speed);
        self.input_queue.clear();
        self.effects.clear();
        self.game_over_reason = None;
        self.settings_return = None;
        self.schedule.clear();
        self.status = GameStatus::Running;
        self.schedule.next_tick = Some(self.now + self.tick_interval());

        log!("Snake restarted on {}x{} grid", self.grid.width, self.grid.height);
    }

    pub fn open_settings(&mut self, now: Duration) {
        if !self.overlay.is_open() || self.status == GameStatus::Settings {
            return;
        }
        self.advance(now);

        self.settings_return = Some(SettingsReturn {
            status: self.status,
            entered_at: self.now,
        });
        self.status = GameStatus::Settings;
        log!("Settings opened");
    }

    /// Returns to the status settings were opened from. Time spent in
    /// settings does not count towards pending deadlines or effects.
    pub fn close_settings(&mut self, now: Duration) {
        if !self.overlay.is_open() || self.status != GameStatus::Settings {
            return;
        }
        let Some(settings_return) = self.settings_return.take() else {
            return;
        };

        self.now = self.now.max(now);
        let paused = self.now.saturating_sub(settings_return.entered_at);
        self.status = settings_return.status;
        if self.status == GameStatus::Running {
            self.schedule.shift(paused);
        }
        self.effects.shift(paused);

        log!("Settings closed, back to {:?}", self.status);
    }

    /// Only accepted while the settings panel is open. The current speed is
    /// clamped into the new bounds and a pending tick restarts on the new
    /// interval; the rest applies from the next round.
    pub fn apply_settings(&mut self, settings: SnakeSettings) -> Result<(), String> {
        settings.validate()?;
        if self.status != GameStatus::Settings {
            return Err("Settings can only be changed from the settings panel".to_string());
        }

        self.input_queue.set_capacity(settings.input_queue_capacity);
        self.settings = settings;
        self.speed = self.settings.clamp_speed(self.speed);
        if let Some(paused_at) = self.settings_return.as_ref().map(|r| r.entered_at)
            && self.schedule.next_tick.is_some()
        {
            self.schedule.next_tick = Some(paused_at + self.tick_interval());
        }

        let min_grid = self.settings.min_grid();
        if self.grid.at_least(min_grid) != self.grid {
            self.apply_grid(self.grid.at_least(min_grid));
        }
        Ok(())
    }

    pub fn resize(&mut self, grid: GridSize, now: Duration) {
        if !self.overlay.is_open() {
            return;
        }
        self.advance(now);

        let grid = grid.at_least(self.settings.min_grid());
        if grid != self.grid {
            self.apply_grid(grid);
        }
    }

    /// Tears the game down and notifies the host. Safe to call repeatedly.
    pub fn close(&mut self) {
        if !self.overlay.close() {
            return;
        }
        self.schedule.clear();
        self.effects.clear();
        self.input_queue.clear();
        self.settings_return = None;
        log!("Snake overlay closed, final score {}", self.score);
    }

    pub fn snapshot(&self) -> SnakeSnapshot {
        let flash = self.settings.event_flash();
        let cycle = self.settings.pill_effect();

        SnakeSnapshot {
            status: self.status,
            open: self.overlay.is_open(),
            grid: self.grid,
            snake: self.snake.segments().copied().collect(),
            direction: self.snake.direction,
            food: self.food,
            pickups: self.pickups.visible().copied().collect(),
            score: self.score,
            speed: self.speed,
            tick_interval: self.tick_interval(),
            visuals: self.effects.visuals(self.now, self.snake.len(), flash, cycle),
            score_popup: self.effects.score_popup(self.now, flash),
            game_over_reason: self.game_over_reason,
            settings: self.settings.clone(),
        }
    }

    fn on_tick(&mut self, at: Duration) {
        self.ticks += 1;
        self.schedule.next_tick = Some(at + self.tick_interval());
        self.adopt_queued_direction();

        let candidate = self.snake.next_head();

        if !self.grid.contains(candidate) {
            if self.schedule.wall_grace.is_none() {
                self.schedule.wall_grace = Some(at + self.settings.grace_period());
                log!("Wall ahead at ({}, {}), grace period started", candidate.x, candidate.y);
            }
            return;
        }

        if self.snake.collides_with_body(candidate) {
            if self.schedule.self_grace.is_none() {
                self.schedule.self_grace = Some(at + self.settings.grace_period());
                log!("Body ahead at ({}, {}), grace period started", candidate.x, candidate.y);
            }
            return;
        }

        let wall_pending = self.schedule.wall_grace.take().is_some();
        let self_pending = self.schedule.self_grace.take().is_some();
        if wall_pending || self_pending {
            log!("Collision avoided, heading {:?}", self.snake.direction);
        }

        self.commit_move(candidate, at);
        self.schedule.next_tick = Some(at + self.tick_interval());
    }

    fn on_wall_grace_elapsed(&mut self) {
        self.schedule.wall_grace = None;
        self.adopt_queued_direction();

        if self.grid.contains(self.snake.next_head()) {
            log!("Turned away from the wall in time");
        } else {
            self.finish(GameOverReason::WallCollision);
        }
    }

    fn on_self_grace_elapsed(&mut self) {
        self.schedule.self_grace = None;
        self.adopt_queued_direction();

        let candidate = self.snake.next_head();
        if self.grid.contains(candidate) && self.snake.collides_with_body(candidate) {
            self.finish(GameOverReason::SelfCollision);
        } else {
            log!("Turned away from the body in time");
        }
    }

    fn finish(&mut self, reason: GameOverReason) {
        self.status = GameStatus::GameOver;
        self.game_over_reason = Some(reason);
        self.schedule.clear();
        self.input_queue.clear();
        log!(
            "Game over ({:?}), score {}, length {}",
            reason,
            self.score,
            self.snake.len()
        );
    }

    fn adopt_queued_direction(&mut self) {
        if let Some(direction) = self.input_queue.dequeue_next_valid(self.snake.direction) {
            self.snake.direction = direction;
        }
    }

    fn commit_move(&mut self, new_head: Position, at: Duration) {
        let ate_food = new_head == self.food;
        self.snake.advance(new_head, ate_food);

        if ate_food {
            self.on_food_eaten(at);
        }
        if let Some(kind) = self.pickups.take_visible_at(new_head) {
            self.on_pickup_eaten(kind, at);
        }
    }

    fn on_food_eaten(&mut self, at: Duration) {
        self.award(Consumable::Food, at);
        self.set_speed(self.speed + 1);
        self.respawn_food();

        let blocked = self.snake_and_food_cells();
        let revealed = self.pickups.roll_reveals(
            &self.settings.pickup_reveal,
            &blocked,
            self.grid,
            &mut self.rng,
        );
        for kind in revealed {
            let position = self.pickups.get(kind).position;
            log!("{:?} revealed at ({}, {})", kind, position.x, position.y);
        }
    }

    fn on_pickup_eaten(&mut self, kind: PickupKind, at: Duration) {
        self.award(Consumable::Pickup(kind), at);

        match kind {
            PickupKind::Bottle => {
                let speed = self
                    .rng
                    .range_inclusive(self.settings.min_speed, self.settings.max_speed);
                self.set_speed(speed);
            }
            PickupKind::Pill => self.set_speed(self.speed.saturating_sub(2)),
            PickupKind::Joint => self.set_speed(self.settings.joint_speed),
        }

        let blocked = self.snake_and_food_cells();
        self.pickups
            .respawn_hidden(kind, &blocked, self.grid, &mut self.rng);
    }

    fn award(&mut self, consumable: Consumable, at: Duration) {
        self.score = self.score.saturating_add(consumable.points());
        self.effects.record(consumable, at);
        log!(
            "Ate {:?} at ({}, {}), score {}",
            consumable,
            self.snake.head().x,
            self.snake.head().y,
            self.score
        );
    }

    fn set_speed(&mut self, speed: u32) {
        self.speed = self.settings.clamp_speed(speed);
    }

    fn respawn_food(&mut self) {
        let mut blocked: HashSet<Position> = self.snake.segments().copied().collect();
        blocked.extend(self.pickups.visible().map(|p| p.position));

        match random_position(&blocked, self.grid, &mut self.rng) {
            Some(position) => self.food = position,
            None => log!("No free cell left for food"),
        }
    }

    fn snake_and_food_cells(&self) -> HashSet<Position> {
        let mut cells: HashSet<Position> = self.snake.segments().copied().collect();
        cells.insert(self.food);
        cells
    }

    fn apply_grid(&mut self, grid: GridSize) {
        log!(
            "Grid resized {}x{} -> {}x{}",
            self.grid.width,
            self.grid.height,
            grid.width,
            grid.height
        );
        self.grid = grid;

        if self.snake.fit_into(grid) {
            log!("Snake moved inside the new bounds, length {}", self.snake.len());
        }
        if !grid.contains(self.food) || self.snake.contains(&self.food) {
            self.respawn_food();
        }

        let blocked = self.snake_and_food_cells();
        self.pickups.relocate_invalid(&blocked, grid, &mut self.rng);
    }

    #[cfg(test)]
    pub(crate) fn set_snake(&mut self, segments: &[Position], direction: Direction) {
        self.snake = Snake::from_segments(segments, direction);
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, position: Position) {
        self.food = position;
    }

    #[cfg(test)]
    pub(crate) fn place_pickup(&mut self, kind: PickupKind, position: Position, visible: bool) {
        self.pickups.place(kind, position, visible);
    }

    #[cfg(test)]
    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

fn fresh_round<R: RandomSource>(grid: GridSize, rng: &mut R) -> (Snake, Position, Pickups) {
    let snake = Snake::new(grid.origin(), START_DIRECTION);
    let mut blocked: HashSet<Position> = snake.segments().copied().collect();
    let food = random_position(&blocked, grid, rng).unwrap_or(Position::new(0, 0));
    blocked.insert(food);
    let pickups = Pickups::spawn_hidden(&blocked, grid, rng);
    (snake, food, pickups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::session_rng::scripted::ScriptedRng;
    use crate::games::snake::effects::{COLOR_CYCLE_PALETTE, DEFAULT_BODY_COLOR, DEFAULT_HEAD_COLOR};
    use crate::games::snake::settings::PickupRevealChances;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn game(width: u32, height: u32) -> SnakeGameState<ScriptedRng> {
        game_with(SnakeSettings::default(), width, height)
    }

    fn game_with(settings: SnakeSettings, width: u32, height: u32) -> SnakeGameState<ScriptedRng> {
        SnakeGameState::new(
            settings,
            GridSize::new(width, height),
            ScriptedRng::new(),
            OverlayHandle::detached(),
        )
    }

    fn assert_no_duplicates(snake: &[Position]) {
        let unique: HashSet<&Position> = snake.iter().collect();
        assert_eq!(unique.len(), snake.len(), "duplicate segment in {:?}", snake);
    }

    #[test]
    fn test_new_game_waits_for_first_input() {
        let mut game = game(10, 10);
        assert_eq!(game.status(), GameStatus::Ready);
        assert_eq!(game.snake().head(), p(5, 5));
        assert_eq!(game.direction(), Direction::Right);
        assert_eq!(game.speed(), 10);
        assert_eq!(game.next_deadline(), None);

        game.advance(ms(5000));
        assert_eq!(game.status(), GameStatus::Ready);
        assert_eq!(game.snake().head(), p(5, 5));
        assert_eq!(game.ticks(), 0);
    }

    #[test]
    fn test_food_never_spawns_on_snake() {
        let game = game(10, 10);
        assert!(!game.snake().contains(&game.food()));
        assert!(game.pickups().iter().all(|pickup| !pickup.visible));
    }

    #[test]
    fn test_first_direction_starts_running() {
        let mut game = game(10, 10);
        game.handle_input(InputEvent::Direction(Direction::Up), ms(40));
        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.next_deadline(), Some(ms(150)));

        game.set_food(p(0, 0));
        game.advance(ms(150));
        assert_eq!(game.snake().head(), p(5, 4));
        assert_eq!(game.direction(), Direction::Up);
    }

    #[test]
    fn test_eating_food_grows_and_scores() {
        let mut game = game(10, 10);
        game.set_snake(&[p(5, 5)], Direction::Right);
        game.set_food(p(6, 5));
        game.enqueue_direction(Direction::Right, ms(0));

        game.advance(ms(110));

        assert_eq!(game.snake().head(), p(6, 5));
        assert_eq!(game.snake().len(), 2);
        assert_eq!(game.score(), 1);
        assert_ne!(game.food(), p(6, 5));
        assert!(!game.snake().contains(&game.food()));
        assert!(game.grid().contains(game.food()));
    }

    #[test]
    fn test_food_speeds_up_and_reschedules_tick() {
        let mut game = game(10, 10);
        game.set_food(p(6, 5));
        game.enqueue_direction(Direction::Right, ms(0));
        game.advance(ms(110));

        assert_eq!(game.speed(), 11);
        assert_eq!(game.tick_interval(), ms(100));
        assert_eq!(game.next_deadline(), Some(ms(210)));
    }

    #[test]
    fn test_food_speed_capped_at_max() {
        let settings = SnakeSettings {
            initial_speed: 20,
            joint_speed: 10,
            ..SnakeSettings::default()
        };
        let mut game = game_with(settings, 10, 10);
        game.set_food(p(6, 5));
        game.enqueue_direction(Direction::Right, ms(0));
        game.advance(ms(10));
        assert_eq!(game.score(), 1);
        assert_eq!(game.speed(), 20);
    }

    #[test]
    fn test_wall_without_turn_ends_game_after_grace() {
        let mut game = game(10, 10);
        game.set_snake(&[p(0, 0)], Direction::Left);
        game.set_food(p(5, 5));
        game.enqueue_direction(Direction::Left, ms(0));

        game.advance(ms(110));
        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.snake().head(), p(0, 0));

        game.advance(ms(259));
        assert_eq!(game.status(), GameStatus::Running);

        game.advance(ms(260));
        assert_eq!(game.status(), GameStatus::GameOver);
        assert_eq!(game.game_over_reason(), Some(GameOverReason::WallCollision));
        assert_eq!(game.score(), 0);
        assert_eq!(game.snake().head(), p(0, 0));
        assert_eq!(game.next_deadline(), None);
    }

    #[test]
    fn test_repeated_wall_ticks_do_not_extend_grace() {
        let settings = SnakeSettings {
            initial_speed: 20,
            ..SnakeSettings::default()
        };
        let mut game = game_with(settings, 10, 10);
        game.set_snake(&[p(9, 3)], Direction::Right);
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Right, ms(0));

        // First tick at 10ms starts the grace; ticks every 10ms keep hitting the wall.
        game.advance(ms(159));
        assert_eq!(game.status(), GameStatus::Running);
        game.advance(ms(160));
        assert_eq!(game.status(), GameStatus::GameOver);
    }

    #[test]
    fn test_turn_queued_during_grace_rescues_on_next_tick() {
        let mut game = game(10, 10);
        game.set_snake(&[p(9, 5)], Direction::Right);
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Right, ms(0));

        game.advance(ms(110));
        assert_eq!(game.snake().head(), p(9, 5));

        game.handle_input(InputEvent::Direction(Direction::Up), ms(150));
        game.advance(ms(220));

        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.direction(), Direction::Up);
        assert_eq!(game.snake().head(), p(9, 4));

        game.advance(ms(600));
        assert_eq!(game.status(), GameStatus::Running);
    }

    #[test]
    fn test_turn_queued_before_grace_fires_rescues_slow_snake() {
        let settings = SnakeSettings {
            initial_speed: 1,
            ..SnakeSettings::default()
        };
        let mut game = game_with(settings, 10, 10);
        game.set_snake(&[p(9, 5)], Direction::Right);
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Right, ms(0));

        // 200ms ticks: grace starts at 200 and fires at 350, before the next tick.
        game.advance(ms(200));
        game.handle_input(InputEvent::Direction(Direction::Down), ms(300));
        game.advance(ms(350));
        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.direction(), Direction::Down);
        assert_eq!(game.snake().head(), p(9, 5));

        game.advance(ms(400));
        assert_eq!(game.snake().head(), p(9, 6));
    }

    #[test]
    fn test_self_collision_grace_then_game_over() {
        let mut game = game(10, 10);
        game.set_snake(&[p(5, 5), p(5, 6), p(4, 6), p(4, 5), p(4, 4)], Direction::Left);
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Left, ms(0));

        game.advance(ms(110));
        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.snake().head(), p(5, 5));

        game.advance(ms(260));
        assert_eq!(game.status(), GameStatus::GameOver);
        assert_eq!(game.game_over_reason(), Some(GameOverReason::SelfCollision));
    }

    #[test]
    fn test_self_collision_rescued_by_turn() {
        let mut game = game(10, 10);
        game.set_snake(&[p(5, 5), p(5, 6), p(4, 6), p(4, 5), p(4, 4)], Direction::Left);
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Left, ms(0));

        game.advance(ms(110));
        game.handle_input(InputEvent::Direction(Direction::Up), ms(130));
        game.advance(ms(220));

        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.snake().head(), p(5, 4));
        assert_no_duplicates(&game.snapshot().snake);
    }

    #[test]
    fn test_moving_into_vacated_tail_is_allowed() {
        let mut game = game(10, 10);
        game.set_snake(&[p(1, 0), p(1, 1), p(0, 1), p(0, 0)], Direction::Left);
        game.set_food(p(8, 8));
        game.enqueue_direction(Direction::Left, ms(0));

        game.advance(ms(110));

        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(
            game.snapshot().snake,
            vec![p(0, 0), p(1, 0), p(1, 1), p(0, 1)]
        );
    }

    #[test]
    fn test_opposite_queued_turn_is_discarded() {
        let mut game = game(20, 20);
        game.set_snake(&[p(10, 10)], Direction::Up);
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Down, ms(0));

        game.advance(ms(110));
        assert_eq!(game.direction(), Direction::Up);
        assert_eq!(game.snake().head(), p(10, 9));
        assert!(game.input_queue().is_empty());
    }

    #[test]
    fn test_queued_turns_resolve_one_per_tick() {
        let mut game = game(20, 20);
        game.set_snake(&[p(10, 10)], Direction::Up);
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Left, ms(0));
        game.enqueue_direction(Direction::Down, ms(0));

        game.advance(ms(110));
        assert_eq!(game.direction(), Direction::Left);
        assert_eq!(game.snake().head(), p(9, 10));

        game.advance(ms(220));
        assert_eq!(game.direction(), Direction::Down);
        assert_eq!(game.snake().head(), p(9, 11));
    }

    #[test]
    fn test_pill_slows_down_and_cycles_colors() {
        let mut game = game(40, 40);
        game.set_snake(&[p(5, 5), p(4, 5), p(3, 5)], Direction::Right);
        game.set_food(p(0, 19));
        game.place_pickup(PickupKind::Pill, p(6, 5), true);
        game.enqueue_direction(Direction::Right, ms(0));

        game.advance(ms(110));
        assert_eq!(game.score(), 30);
        assert_eq!(game.speed(), 8);
        assert_eq!(game.snake().len(), 3);
        assert!(!game.pickups().get(PickupKind::Pill).visible);

        game.advance(ms(2110));
        let visuals = game.snapshot().visuals;
        assert_eq!(visuals.body.len(), 2);
        assert!(visuals.body.iter().all(|c| COLOR_CYCLE_PALETTE.contains(c)));

        game.advance(ms(3110));
        let visuals = game.snapshot().visuals;
        assert_eq!(visuals.head, DEFAULT_HEAD_COLOR);
        assert_eq!(visuals.body, vec![DEFAULT_BODY_COLOR; game.snake().len() - 1]);
    }

    #[test]
    fn test_pill_speed_floor() {
        let settings = SnakeSettings {
            initial_speed: 2,
            ..SnakeSettings::default()
        };
        let mut game = game_with(settings, 20, 20);
        game.set_food(p(0, 0));
        game.place_pickup(PickupKind::Pill, p(11, 10), true);
        game.enqueue_direction(Direction::Right, ms(0));
        game.advance(ms(190));
        assert_eq!(game.speed(), 1);
    }

    #[test]
    fn test_bottle_rerolls_speed() {
        let mut game = game(20, 20);
        game.set_food(p(0, 0));
        game.place_pickup(PickupKind::Bottle, p(11, 10), true);
        game.rng_mut().push_ranges(&[17]);
        game.enqueue_direction(Direction::Right, ms(0));

        game.advance(ms(110));
        assert_eq!(game.score(), 50);
        assert_eq!(game.speed(), 17);
        assert_eq!(game.snapshot().score_popup, Some(50));
    }

    #[test]
    fn test_joint_resets_speed_and_glows() {
        let settings = SnakeSettings {
            initial_speed: 18,
            joint_speed: 6,
            ..SnakeSettings::default()
        };
        let mut game = game_with(settings, 20, 20);
        game.set_food(p(0, 0));
        game.place_pickup(PickupKind::Joint, p(11, 10), true);
        game.enqueue_direction(Direction::Right, ms(0));

        game.advance(ms(30));
        assert_eq!(game.score(), 7);
        assert_eq!(game.speed(), 6);
        assert!(game.snapshot().visuals.glow);

        game.advance(ms(1030));
        assert!(!game.snapshot().visuals.glow);
        assert_eq!(game.snapshot().score_popup, None);
    }

    #[test]
    fn test_food_rolls_pickup_reveals() {
        let mut game = game(20, 20);
        game.set_food(p(11, 10));
        game.rng_mut().push_chances(&[false, true, false]);
        game.enqueue_direction(Direction::Right, ms(0));

        game.advance(ms(110));
        let visible: Vec<PickupKind> = game.snapshot().pickups.iter().map(|p| p.kind).collect();
        assert_eq!(visible, vec![PickupKind::Pill]);
        let pill = game.pickups().get(PickupKind::Pill).position;
        assert!(!game.snake().contains(&pill));
        assert_ne!(pill, game.food());
    }

    #[test]
    fn test_hidden_pickup_is_not_eaten() {
        let mut game = game(20, 20);
        game.set_food(p(0, 0));
        game.place_pickup(PickupKind::Bottle, p(11, 10), false);
        game.enqueue_direction(Direction::Right, ms(0));
        game.advance(ms(110));
        assert_eq!(game.score(), 0);
        assert_eq!(game.speed(), 10);
    }

    #[test]
    fn test_restart_gives_identical_initial_conditions() {
        fn initial(snapshot: &SnakeSnapshot) -> (Vec<Position>, Direction, u32, u32, usize) {
            (
                snapshot.snake.clone(),
                snapshot.direction,
                snapshot.speed,
                snapshot.score,
                snapshot.pickups.len(),
            )
        }

        let mut game = game(10, 10);
        game.enqueue_direction(Direction::Up, ms(0));
        game.advance(ms(2000));
        assert_eq!(game.status(), GameStatus::GameOver);

        game.handle_input(InputEvent::Confirm, ms(2001));
        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.game_over_reason(), None);
        let first = initial(&game.snapshot());

        game.set_snake(&[p(0, 0)], Direction::Left);
        game.advance(ms(3000));
        assert_eq!(game.game_over_reason(), Some(GameOverReason::WallCollision));

        game.handle_input(InputEvent::Confirm, ms(3001));
        let second = initial(&game.snapshot());

        assert_eq!(first, second);
        assert_eq!(first, (vec![p(5, 5)], Direction::Right, 10, 0, 0));
        assert!(game.input_queue().is_empty());
        assert_eq!(game.next_deadline(), Some(ms(3111)));
    }

    #[test]
    fn test_settings_pause_and_resume_running() {
        let mut game = game(20, 20);
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Right, ms(0));
        game.advance(ms(110));
        assert_eq!(game.snake().head(), p(11, 10));

        game.open_settings(ms(150));
        assert_eq!(game.status(), GameStatus::Settings);
        game.advance(ms(5000));
        assert_eq!(game.snake().head(), p(11, 10));
        assert_eq!(game.next_deadline(), None);

        game.close_settings(ms(5000));
        assert_eq!(game.status(), GameStatus::Running);
        // 70ms were left on the tick when settings opened.
        assert_eq!(game.next_deadline(), Some(ms(5070)));
        game.advance(ms(5070));
        assert_eq!(game.snake().head(), p(12, 10));
    }

    #[test]
    fn test_settings_return_to_game_over() {
        let mut game = game(10, 10);
        game.set_snake(&[p(0, 0)], Direction::Left);
        game.enqueue_direction(Direction::Left, ms(0));
        game.advance(ms(1000));
        assert_eq!(game.status(), GameStatus::GameOver);

        game.open_settings(ms(1100));
        game.handle_input(InputEvent::Cancel, ms(1200));
        assert_eq!(game.status(), GameStatus::GameOver);
        assert!(game.is_open());
    }

    #[test]
    fn test_settings_return_to_ready() {
        let mut game = game(10, 10);
        game.open_settings(ms(10));
        game.close_settings(ms(20));
        assert_eq!(game.status(), GameStatus::Ready);
    }

    #[test]
    fn test_apply_settings_only_from_settings() {
        let mut game = game(10, 10);
        let faster = SnakeSettings {
            max_speed: 12,
            initial_speed: 12,
            joint_speed: 12,
            ..SnakeSettings::default()
        };
        assert!(game.apply_settings(faster.clone()).is_err());

        game.open_settings(ms(0));
        assert!(game.apply_settings(faster.clone()).is_ok());
        assert_eq!(game.settings(), &faster);
        assert_eq!(game.speed(), 10);

        let invalid = SnakeSettings {
            tick_unit_ms: 0,
            ..SnakeSettings::default()
        };
        assert!(game.apply_settings(invalid).is_err());
    }

    #[test]
    fn test_apply_settings_clamps_current_speed() {
        let mut game = game(10, 10);
        game.open_settings(ms(0));
        let slow = SnakeSettings {
            max_speed: 6,
            initial_speed: 4,
            joint_speed: 4,
            ..SnakeSettings::default()
        };
        game.apply_settings(slow).unwrap();
        assert_eq!(game.speed(), 6);
        assert_eq!(game.tick_interval(), ms(10));
    }

    #[test]
    fn test_apply_settings_restarts_pending_tick_on_new_interval() {
        let mut game = game(20, 20);
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Right, ms(0));
        assert_eq!(game.next_deadline(), Some(ms(110)));

        game.open_settings(ms(1));
        let slow = SnakeSettings {
            max_speed: 6,
            initial_speed: 4,
            joint_speed: 4,
            ..SnakeSettings::default()
        };
        game.apply_settings(slow).unwrap();
        game.close_settings(ms(1));

        assert_eq!(game.speed(), 6);
        assert_eq!(game.next_deadline(), Some(ms(11)));
        game.advance(ms(11));
        assert_eq!(game.snake().head(), p(11, 10));
    }

    #[test]
    fn test_apply_settings_after_long_pause_keeps_tick_relative_to_pause() {
        let mut game = game(20, 20);
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Right, ms(0));

        game.open_settings(ms(50));
        game.advance(ms(4000));
        let coarse = SnakeSettings {
            tick_unit_ms: 20,
            ..SnakeSettings::default()
        };
        game.apply_settings(coarse).unwrap();
        game.close_settings(ms(5000));

        // 220ms interval restarted at the 50ms pause, then shifted by the pause.
        assert_eq!(game.tick_interval(), ms(220));
        assert_eq!(game.next_deadline(), Some(ms(5220)));
    }

    #[test]
    fn test_resize_moves_entities_inside() {
        let mut game = game(20, 20);
        game.set_snake(&[p(15, 12), p(14, 12), p(13, 12)], Direction::Right);
        game.set_food(p(18, 18));
        game.place_pickup(PickupKind::Bottle, p(19, 0), true);

        let small = GridSize::new(10, 10);
        game.resize(small, ms(0));

        assert_eq!(game.grid(), small);
        let snapshot = game.snapshot();
        assert!(snapshot.snake.iter().all(|s| small.contains(*s)));
        assert_eq!(snapshot.snake.len(), 3);
        assert!(small.contains(snapshot.food));
        assert!(!snapshot.snake.contains(&snapshot.food));
        assert!(game.pickups().iter().all(|pickup| small.contains(pickup.position)));
        assert!(game.pickups().get(PickupKind::Bottle).visible);
    }

    #[test]
    fn test_degenerate_resize_clamps_to_minimum() {
        let mut game = game(10, 10);
        game.resize(GridSize::new(0, 0), ms(0));
        assert_eq!(game.grid(), GridSize::new(5, 5));
        assert!(game.grid().contains(game.snake().head()));
        assert!(game.grid().contains(game.food()));
    }

    #[test]
    fn test_close_is_idempotent_and_freezes_state() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut game = SnakeGameState::new(
            SnakeSettings::default(),
            GridSize::new(10, 10),
            ScriptedRng::new(),
            OverlayHandle::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Right, ms(0));
        game.advance(ms(110));
        let head = game.snake().head();

        game.close();
        game.close();
        game.advance(ms(10_000));
        game.handle_input(InputEvent::Direction(Direction::Up), ms(10_001));
        game.restart(ms(10_002));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!game.is_open());
        assert_eq!(game.snake().head(), head);
        assert_eq!(game.next_deadline(), None);
        assert!(!game.snapshot().open);
    }

    #[test]
    fn test_close_tears_down_grace_and_color_cycle() {
        let mut game = game(10, 10);
        game.set_snake(&[p(8, 5), p(7, 5), p(6, 5)], Direction::Right);
        game.set_food(p(0, 0));
        game.place_pickup(PickupKind::Pill, p(9, 5), true);
        game.enqueue_direction(Direction::Right, ms(0));

        // Pill at 110ms, then the 130ms tick at 240ms finds the wall.
        game.advance(ms(300));
        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.snake().head(), p(9, 5));
        assert_eq!(game.next_deadline(), Some(ms(370)));
        let visuals = game.snapshot().visuals;
        assert!(COLOR_CYCLE_PALETTE.contains(&visuals.head));

        game.close();

        assert_eq!(game.next_deadline(), None);
        let snapshot = game.snapshot();
        assert_eq!(snapshot.visuals.head, DEFAULT_HEAD_COLOR);
        assert_eq!(snapshot.visuals.body, vec![DEFAULT_BODY_COLOR; 2]);
        assert!(!snapshot.visuals.glow);
        assert_eq!(snapshot.score_popup, None);

        game.advance(ms(1000));
        assert_eq!(game.status(), GameStatus::Running);
        assert_eq!(game.game_over_reason(), None);
    }

    #[test]
    fn test_escape_on_game_over_closes_overlay() {
        let mut game = game(10, 10);
        game.set_snake(&[p(0, 0)], Direction::Left);
        game.enqueue_direction(Direction::Left, ms(0));
        game.advance(ms(1000));

        game.handle_input(InputEvent::Cancel, ms(1001));
        assert!(!game.is_open());
    }

    #[test]
    fn test_confirm_ignored_while_running() {
        let mut game = game(20, 20);
        game.set_food(p(0, 0));
        game.enqueue_direction(Direction::Right, ms(0));
        game.advance(ms(220));
        game.handle_input(InputEvent::Confirm, ms(230));
        assert_eq!(game.snake().head(), p(12, 10));
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        for seed in 0..12u64 {
            let mut game = SnakeGameState::new(
                SnakeSettings {
                    pickup_reveal: PickupRevealChances {
                        bottle: 1.0,
                        pill: 1.0,
                        joint: 1.0,
                    },
                    ..SnakeSettings::default()
                },
                GridSize::new(8, 8),
                SessionRng::new(seed),
                OverlayHandle::detached(),
            );
            let mut inputs = SessionRng::new(seed + 1000);
            let directions = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
            let mut now = Duration::ZERO;

            for _ in 0..3000 {
                now += ms(23);
                if inputs.chance(0.3) {
                    let direction = directions[inputs.index(directions.len())];
                    game.handle_input(InputEvent::Direction(direction), now);
                }
                game.advance(now);

                let settings = game.settings().clone();
                assert!((settings.min_speed..=settings.max_speed).contains(&game.speed()));
                let snapshot = game.snapshot();
                assert_no_duplicates(&snapshot.snake);
                assert!(snapshot.snake.iter().all(|s| snapshot.grid.contains(*s)));
                assert!(!snapshot.snake.contains(&snapshot.food) || snapshot.snake.len() == 64);

                if game.status() == GameStatus::GameOver {
                    game.handle_input(InputEvent::Confirm, now);
                }
            }
        }
    }
}
