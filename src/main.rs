use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use std::fs::{self, File};
use std::io::{self, Stdout, stdout};
use std::path::Path;
use std::time::{Duration, Instant};

use flip_ninja::audio::Audio;
use flip_ninja::background::Parallax;
use flip_ninja::config::{Config, FRAME_RATE};
use flip_ninja::game::{Game, GameEvent};
use flip_ninja::input::{Command, KeyLatch};
use flip_ninja::render::{self, PixelBuf, SKY_TOP};
use flip_ninja::scores::{RECORDS_PATH, ScoreRecords};
use flip_ninja::settings::{SETTINGS_PATH, Settings};

const LOG_PATH: &str = "Extras/flip-ninja.log";

fn init_logging() {
    let path = Path::new(LOG_PATH);
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    // Without a log file the game still runs, just quietly.
    let Ok(file) = File::create(path) else { return };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

struct Terminal {
    out: Stdout,
    enhanced: bool,
}

impl Terminal {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::info!("terminal ready (key release events: {})", enhanced);
        Ok(Terminal { out, enhanced })
    }

    fn leave(&mut self) -> io::Result<()> {
        if self.enhanced {
            execute!(self.out, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }
}

fn pixel_size(cols: u16, rows: u16) -> (usize, usize) {
    (cols as usize, rows as usize * 2)
}

fn main() -> io::Result<()> {
    init_logging();
    log::info!("flip-ninja {} starting", env!("CARGO_PKG_VERSION"));

    let settings_path = Path::new(SETTINGS_PATH);
    let mut settings = Settings::load(settings_path);
    let mut records = ScoreRecords::open(RECORDS_PATH);
    let mut audio = Audio::new(&settings);

    let mut term = Terminal::enter()?;
    let result = run(&mut term, &mut settings, &mut records, &mut audio);
    audio.stop_music();
    term.leave()?;

    if let Err(e) = settings.save(settings_path) {
        log::warn!("could not save settings: {}", e);
    }
    if let Err(e) = &result {
        log::error!("exiting on error: {}", e);
    }
    result
}

fn run(
    term: &mut Terminal,
    settings: &mut Settings,
    records: &mut ScoreRecords,
    audio: &mut Audio,
) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let (pw, ph) = pixel_size(cols, rows);
    log::info!("screen {}x{} cells, {}x{} px", cols, rows, pw, ph);

    let mut buf = PixelBuf::new(pw, ph, SKY_TOP);
    let mut game = Game::new(Config::for_screen(pw, ph), records.best(), rand::random());
    let mut parallax = Parallax::new();
    let mut keys = KeyLatch::new(term.enhanced);

    let frame_dur = Duration::from_secs(1) / FRAME_RATE;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => match keys.accept(&key) {
                    Some(Command::Game(input)) => game.press(input),
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::ToggleMute) => {
                        settings.toggle_mute();
                        audio.set_volume(settings.effective_volume());
                    }
                    Some(Command::VolumeUp) => {
                        settings.louder();
                        audio.set_volume(settings.effective_volume());
                    }
                    Some(Command::VolumeDown) => {
                        settings.quieter();
                        audio.set_volume(settings.effective_volume());
                    }
                    None => {}
                },
                Event::Resize(c, r) => {
                    let (npw, nph) = pixel_size(c, r);
                    log::info!("resized to {}x{} px", npw, nph);
                    buf.resize(npw, nph);
                    game.resize(Config::for_screen(npw, nph));
                }
                _ => {}
            }
        }

        // Update
        let dt = last.elapsed().as_secs_f64();
        last = Instant::now();
        parallax.update(game.config(), dt);
        game.update();

        for ev in game.take_events() {
            match ev {
                GameEvent::Sound(sound) => audio.play(sound),
                GameEvent::Music(track) => audio.play_music(track),
                GameEvent::StopMusic => audio.stop_music(),
                GameEvent::RunEnded { score } => {
                    if let Err(e) = records.append(score) {
                        log::error!("could not record score {}: {}", score, e);
                    }
                }
                GameEvent::Quit => return Ok(()),
            }
        }

        // Render
        render::draw(&mut buf, &game, &parallax);
        buf.present(&mut term.out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
