//! Screen state machine and the per-frame step.
//!
//! `Game` never touches the terminal, the disk or the sound card. Side
//! effects come out as [`GameEvent`]s that the frame loop drains after each
//! update.

use std::mem;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::Config;
use crate::input::Input;
use crate::obstacles::ObstacleStream;
use crate::physics::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverItem {
    Retry,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu { selected: MenuItem },
    /// First-run practice. `prompt` is up until the first flip.
    Tutorial { prompt: bool },
    Playing,
    GameOver { selected: GameOverItem, new_best: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Hover,
    Select,
    Point,
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Menu,
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(Sound),
    Music(Track),
    StopMusic,
    /// A run just ended; the score should go to the records.
    RunEnded { score: u32 },
    Quit,
}

pub struct Game {
    config: Config,
    screen: Screen,
    player: Player,
    obstacles: ObstacleStream,
    rng: Pcg32,
    score: u32,
    best: u32,
    score_recorded: bool,
    pending_flips: u32,
    frame: u64,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: Config, best: u32, seed: u64) -> Self {
        Game {
            config,
            screen: Screen::Menu {
                selected: MenuItem::Start,
            },
            player: Player::new(&config),
            obstacles: ObstacleStream::new(),
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            best,
            score_recorded: false,
            pending_flips: 0,
            frame: 0,
            events: vec![GameEvent::Music(Track::Menu)],
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstacleStream {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Everything that happened since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// New screen size. The world is rebuilt and an unfinished run is
    /// dropped without being recorded.
    pub fn resize(&mut self, config: Config) {
        self.config = config;
        self.reset_world();
        if !matches!(self.screen, Screen::Menu { .. }) {
            self.go_home();
        }
    }

    pub fn press(&mut self, input: Input) {
        match self.screen {
            Screen::Menu { selected } => match input {
                Input::Up | Input::Down => {
                    let selected = match selected {
                        MenuItem::Start => MenuItem::Quit,
                        MenuItem::Quit => MenuItem::Start,
                    };
                    self.screen = Screen::Menu { selected };
                    self.events.push(GameEvent::Sound(Sound::Hover));
                }
                Input::Flip | Input::Confirm => {
                    self.events.push(GameEvent::Sound(Sound::Select));
                    match selected {
                        MenuItem::Start => self.leave_menu(),
                        MenuItem::Quit => self.events.push(GameEvent::Quit),
                    }
                }
                Input::Back => self.events.push(GameEvent::Quit),
            },
            Screen::Tutorial { prompt } => match input {
                Input::Flip | Input::Up => {
                    if prompt {
                        self.player.flip_gravity();
                        self.screen = Screen::Tutorial { prompt: false };
                    } else {
                        self.start_run();
                    }
                }
                Input::Back => self.start_run(),
                Input::Down | Input::Confirm => {}
            },
            Screen::Playing => match input {
                Input::Flip | Input::Up => self.pending_flips += 1,
                Input::Back => self.go_home(),
                Input::Down | Input::Confirm => {}
            },
            Screen::GameOver { selected, new_best } => match input {
                Input::Up | Input::Down => {
                    let selected = match selected {
                        GameOverItem::Retry => GameOverItem::Home,
                        GameOverItem::Home => GameOverItem::Retry,
                    };
                    self.screen = Screen::GameOver { selected, new_best };
                    self.events.push(GameEvent::Sound(Sound::Hover));
                }
                Input::Flip | Input::Confirm => {
                    self.events.push(GameEvent::Sound(Sound::Select));
                    match selected {
                        GameOverItem::Retry => {
                            self.start_run();
                            self.events.push(GameEvent::Music(Track::Game));
                        }
                        GameOverItem::Home => self.go_home(),
                    }
                }
                Input::Back => self.go_home(),
            },
        }
    }

    /// Advance one frame.
    pub fn update(&mut self) {
        self.frame += 1;
        match self.screen {
            Screen::Playing => self.step_run(),
            Screen::Tutorial { prompt: false } => {
                self.player.step(&self.config);
                self.obstacles.update(&self.config, &mut self.rng);
            }
            Screen::Tutorial { prompt: true } | Screen::Menu { .. } | Screen::GameOver { .. } => {}
        }
    }

    fn step_run(&mut self) {
        for _ in 0..mem::take(&mut self.pending_flips) {
            self.player.flip_gravity();
        }

        self.player.step(&self.config);
        self.obstacles.update(&self.config, &mut self.rng);

        let body = self.player.rect();
        let points = self.obstacles.update_score(&body);
        if points > 0 {
            self.score += points;
            self.events.push(GameEvent::Sound(Sound::Point));
        }

        if self.obstacles.collides(&body) || self.player.touches_edge(self.config.screen_height) {
            self.end_run();
        }
    }

    fn end_run(&mut self) {
        let new_best = self.score > self.best;
        if !self.score_recorded {
            self.score_recorded = true;
            self.events.push(GameEvent::RunEnded { score: self.score });
        }
        self.best = self.best.max(self.score);
        self.events.push(GameEvent::Sound(Sound::Death));
        self.events.push(GameEvent::StopMusic);
        self.screen = Screen::GameOver {
            selected: GameOverItem::Retry,
            new_best,
        };
        log::info!("run ended: score {} (best {})", self.score, self.best);
    }

    fn leave_menu(&mut self) {
        self.events.push(GameEvent::Music(Track::Game));
        if self.best == 0 {
            self.reset_world();
            self.screen = Screen::Tutorial { prompt: true };
        } else {
            self.start_run();
        }
    }

    fn start_run(&mut self) {
        self.reset_world();
        self.screen = Screen::Playing;
    }

    fn go_home(&mut self) {
        self.reset_world();
        self.screen = Screen::Menu {
            selected: MenuItem::Start,
        };
        self.events.push(GameEvent::Music(Track::Menu));
    }

    fn reset_world(&mut self) {
        self.player = Player::new(&self.config);
        self.obstacles = ObstacleStream::new();
        self.score = 0;
        self.score_recorded = false;
        self.pending_flips = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_with_best(best: u32) -> Game {
        let mut game = Game::new(Config::reference(), best, 1);
        game.take_events();
        game
    }

    fn playing() -> Game {
        let mut game = game_with_best(5);
        game.press(Input::Confirm);
        assert_eq!(game.screen(), Screen::Playing);
        game.take_events();
        game
    }

    #[test]
    fn starts_in_menu_with_menu_music() {
        let mut game = Game::new(Config::reference(), 0, 1);
        assert_eq!(
            game.screen(),
            Screen::Menu {
                selected: MenuItem::Start
            }
        );
        assert_eq!(game.take_events(), vec![GameEvent::Music(Track::Menu)]);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn menu_selection_wraps_and_hovers() {
        let mut game = game_with_best(3);
        game.press(Input::Down);
        assert_eq!(
            game.screen(),
            Screen::Menu {
                selected: MenuItem::Quit
            }
        );
        game.press(Input::Up);
        assert_eq!(
            game.screen(),
            Screen::Menu {
                selected: MenuItem::Start
            }
        );
        assert_eq!(
            game.take_events(),
            vec![GameEvent::Sound(Sound::Hover), GameEvent::Sound(Sound::Hover)]
        );
    }

    #[test]
    fn quit_item_and_escape_quit() {
        let mut game = game_with_best(3);
        game.press(Input::Down);
        game.press(Input::Confirm);
        assert!(game.take_events().contains(&GameEvent::Quit));

        let mut game = game_with_best(3);
        game.press(Input::Back);
        assert_eq!(game.take_events(), vec![GameEvent::Quit]);
    }

    #[test]
    fn first_run_goes_through_the_tutorial() {
        let mut game = game_with_best(0);
        game.press(Input::Flip);
        assert_eq!(game.screen(), Screen::Tutorial { prompt: true });
        assert_eq!(
            game.take_events(),
            vec![
                GameEvent::Sound(Sound::Select),
                GameEvent::Music(Track::Game)
            ]
        );

        // Frozen behind the prompt.
        let y = game.player().y;
        game.update();
        assert_eq!(game.player().y, y);
        assert!(game.obstacles().is_empty());

        game.press(Input::Flip);
        assert_eq!(game.screen(), Screen::Tutorial { prompt: false });
        assert!(game.player().gravity_flipped);
        for _ in 0..600 {
            game.update();
        }
        // Practice never ends on its own and never scores.
        assert_eq!(game.screen(), Screen::Tutorial { prompt: false });
        assert_eq!(game.score(), 0);

        game.press(Input::Flip);
        assert_eq!(game.screen(), Screen::Playing);
        assert!(!game.player().gravity_flipped);
        assert!(game.obstacles().is_empty());
    }

    #[test]
    fn escape_skips_the_tutorial() {
        let mut game = game_with_best(0);
        game.press(Input::Confirm);
        game.press(Input::Back);
        assert_eq!(game.screen(), Screen::Playing);
    }

    #[test]
    fn returning_players_skip_the_tutorial() {
        let game = playing();
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn flips_are_consumed_on_the_next_frame() {
        let mut game = playing();
        game.press(Input::Flip);
        assert!(!game.player().gravity_flipped);
        game.update();
        assert!(game.player().gravity_flipped);
        assert!(game.player().velocity < 0.0);

        game.press(Input::Flip);
        game.press(Input::Flip);
        game.update();
        assert!(game.player().gravity_flipped);
    }

    #[test]
    fn falling_to_the_floor_ends_the_run_once() {
        let mut game = playing();
        let mut frames = 0;
        while game.screen() == Screen::Playing {
            game.update();
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(
            game.screen(),
            Screen::GameOver {
                selected: GameOverItem::Retry,
                new_best: false
            }
        );
        let events = game.take_events();
        let ended: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
            .collect();
        assert_eq!(ended, vec![&GameEvent::RunEnded { score: 0 }]);
        assert!(events.contains(&GameEvent::Sound(Sound::Death)));
        assert!(events.contains(&GameEvent::StopMusic));

        for _ in 0..10 {
            game.update();
        }
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn recording_is_guarded_per_session() {
        let mut game = playing();
        game.score = 9;
        game.end_run();
        assert!(matches!(
            game.screen(),
            Screen::GameOver { new_best: true, .. }
        ));
        game.end_run();
        let ended = game
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
            .count();
        assert_eq!(ended, 1);
        assert_eq!(game.best(), 9);
    }

    #[test]
    fn retry_starts_a_fresh_run() {
        let mut game = playing();
        game.score = 2;
        game.end_run();
        game.take_events();

        game.press(Input::Confirm);
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.score(), 0);
        assert!(game.obstacles().is_empty());
        assert_eq!(
            game.take_events(),
            vec![
                GameEvent::Sound(Sound::Select),
                GameEvent::Music(Track::Game)
            ]
        );
    }

    #[test]
    fn home_from_game_over() {
        let mut game = playing();
        game.end_run();
        game.press(Input::Down);
        assert!(matches!(
            game.screen(),
            Screen::GameOver {
                selected: GameOverItem::Home,
                ..
            }
        ));
        game.take_events();
        game.press(Input::Flip);
        assert_eq!(
            game.screen(),
            Screen::Menu {
                selected: MenuItem::Start
            }
        );
        assert!(game.take_events().contains(&GameEvent::Music(Track::Menu)));
    }

    #[test]
    fn escape_abandons_a_run_without_recording() {
        let mut game = playing();
        for _ in 0..30 {
            game.update();
        }
        game.press(Input::Back);
        assert!(matches!(game.screen(), Screen::Menu { .. }));
        assert!(
            !game
                .take_events()
                .iter()
                .any(|e| matches!(e, GameEvent::RunEnded { .. }))
        );
    }

    #[test]
    fn resize_drops_back_to_menu() {
        let mut game = playing();
        game.update();
        game.resize(Config::for_screen(80, 48));
        assert!(matches!(game.screen(), Screen::Menu { .. }));
        assert_eq!(game.config().screen_width, 80.0);
        assert_eq!(game.player().x, game.config().player_x);
        assert!(game.obstacles().is_empty());
    }

    #[test]
    fn menu_and_game_over_do_not_simulate() {
        let mut game = game_with_best(1);
        let y = game.player().y;
        game.update();
        assert_eq!(game.player().y, y);
        assert!(game.obstacles().is_empty());
        assert_eq!(game.frame(), 1);
    }
}
