mod alerts;
mod config;
mod forms;
mod logging;
mod sleep;
mod storage;
mod ui;

use std::cell::{Cell, RefCell};
use std::io::{self, Stdout, Write};
use std::rc::Rc;
use std::sync::mpsc::{self, Sender};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use num_traits::{FromPrimitive, ToPrimitive};
use timer_core::{Engine, Input, LocalClock, Services};

use crate::alerts::BellCues;
use crate::config::Args;
use crate::sleep::SleepInhibitor;
use crate::storage::FilePrefs;
use crate::ui::{Hit, Screen, TerminalView, TerminalWindow};

/// How often the pump thread wakes the main loop
const PUMP_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, num_derive::FromPrimitive, num_derive::ToPrimitive)]
enum AppOp {
    Redraw = 0,
    Rawkeys,
    Mouse,
    Pump,
    Quit,
}

#[derive(Debug)]
struct Envelope {
    id: usize,
    event: Option<Event>,
}

fn send(tx: &Sender<Envelope>, op: AppOp, event: Option<Event>) -> bool {
    let id = op.to_usize().unwrap_or(usize::MAX);
    tx.send(Envelope { id, event }).is_ok()
}

struct App {
    engine: Engine,
    screen: Rc<RefCell<Screen>>,
    quit: Rc<Cell<bool>>,
    started: Instant,
    out: Stdout,
}

impl App {
    fn new(args: &Args, size: (u16, u16)) -> Self {
        let screen = Rc::new(RefCell::new(Screen::new(size)));
        let quit = Rc::new(Cell::new(false));
        let services = Services {
            sleep: Box::new(SleepInhibitor::new()),
            cues: Box::new(BellCues::new(io::stdout(), args.mute)),
            prefs: Box::new(FilePrefs::load(args.prefs_path())),
            view: Box::new(TerminalView::new(screen.clone())),
            window: Box::new(TerminalWindow::new(screen.clone(), quit.clone())),
            clock: Box::new(LocalClock),
        };
        let started = Instant::now();
        Self {
            engine: Engine::new(services, 0),
            screen,
            quit,
            started,
            out: io::stdout(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn redraw(&mut self) -> io::Result<()> {
        let mut screen = self.screen.borrow_mut();
        if screen.is_dirty() {
            screen.draw(&mut self.out)?;
        }
        Ok(())
    }

    fn handle_pump(&mut self) {
        let now = self.now_ms();
        self.engine.pump(now);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let now = self.now_ms();
        if let Some(input) = engine_input(key.code) {
            if self.engine.intercepts(input) {
                self.engine.handle(input, now);
                return;
            }
        }
        if self.engine.is_dialog_open() {
            self.edit_dialog(key.code);
            return;
        }
        match key.code {
            KeyCode::Char('t') => self.engine.toggle_theme(),
            KeyCode::Char('s') => self.engine.open_settings(),
            KeyCode::Char('m') => self.engine.handle(Input::Minimize, now),
            KeyCode::Char('q') => self.engine.handle(Input::Close, now),
            _ => {}
        }
    }

    /// Keys the engine passed through go to whichever dialog is open.
    fn edit_dialog(&mut self, code: KeyCode) {
        if self.engine.editing().is_some() {
            let form = self.screen.borrow_mut().config_key(code);
            if let Some(form) = form {
                self.engine.save_config(&form);
            }
        } else if self.engine.settings_open() {
            let settings = self.screen.borrow_mut().settings_key(code);
            if let Some((layout, token)) = settings {
                self.engine.save_settings(layout, &token);
            }
        }
        self.screen.borrow_mut().mark_dirty();
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let now = self.now_ms();
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => self.engine.handle(Input::MouseMove, now),
            MouseEventKind::Down(MouseButton::Left) => {
                self.engine.handle(Input::MouseMove, now);
                if self.engine.is_dialog_open() {
                    return;
                }
                let hit = self.screen.borrow().hit_test(mouse.column, mouse.row);
                let input = match hit {
                    Some(Hit::Label(id)) => Input::TapLabel(id),
                    Some(Hit::Body(id)) => Input::TapCard(id),
                    Some(Hit::Minimize) => Input::Minimize,
                    Some(Hit::Maximize) => Input::Maximize,
                    Some(Hit::Close) => Input::Close,
                    None => return,
                };
                self.engine.handle(input, now);
            }
            _ => {}
        }
    }
}

/// Keys the engine understands on its own
fn engine_input(code: KeyCode) -> Option<Input> {
    match code {
        KeyCode::Char(c @ '1'..='4') => Some(Input::Digit(c as u8 - b'0')),
        KeyCode::Char(' ') => Some(Input::Space),
        KeyCode::F(11) => Some(Input::F11),
        KeyCode::F(12) => Some(Input::F12),
        KeyCode::Esc => Some(Input::Escape),
        _ => None,
    }
}

fn pump_thread(tx: Sender<Envelope>) {
    loop {
        std::thread::sleep(PUMP_INTERVAL);
        if !send(&tx, AppOp::Pump, None) {
            break;
        }
    }
}

fn input_thread(tx: Sender<Envelope>) {
    loop {
        let sent = match event::read() {
            Ok(ev @ Event::Key(_)) => send(&tx, AppOp::Rawkeys, Some(ev)),
            Ok(ev @ Event::Mouse(_)) => send(&tx, AppOp::Mouse, Some(ev)),
            Ok(ev @ Event::Resize(..)) => send(&tx, AppOp::Redraw, Some(ev)),
            Ok(_) => true,
            Err(e) => {
                log::error!("terminal input failed: {}", e);
                send(&tx, AppOp::Quit, None);
                false
            }
        };
        if !sent {
            break;
        }
    }
}

/// Raw mode, mouse capture and the alternate screen for the life of the app.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("can't enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture).context("can't set up terminal")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        execute!(out, DisableMouseCapture, LeaveAlternateScreen, crossterm::cursor::Show).ok();
        out.flush().ok();
        terminal::disable_raw_mode().ok();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_path(), args.log_level)?;
    log::info!("QuadTimer PID is {}", std::process::id());

    let _guard = TerminalGuard::enter()?;
    let size = terminal::size().context("can't read terminal size")?;
    let mut app = App::new(&args, size);

    let (tx, rx) = mpsc::channel();
    let pump_tx = tx.clone();
    std::thread::spawn(move || pump_thread(pump_tx));
    std::thread::spawn(move || input_thread(tx));

    app.redraw().context("can't draw")?;
    while let Ok(msg) = rx.recv() {
        match FromPrimitive::from_usize(msg.id) {
            Some(AppOp::Redraw) => {
                if let Some(Event::Resize(cols, rows)) = msg.event {
                    app.screen.borrow_mut().resize((cols, rows));
                }
            }
            Some(AppOp::Rawkeys) => {
                if let Some(Event::Key(key)) = msg.event {
                    app.handle_key(key);
                }
            }
            Some(AppOp::Mouse) => {
                if let Some(Event::Mouse(mouse)) = msg.event {
                    app.handle_mouse(mouse);
                }
            }
            Some(AppOp::Pump) => app.handle_pump(),
            Some(AppOp::Quit) => break,
            _ => log::error!("unknown opcode: {:?}", msg),
        }
        if app.quit.get() {
            break;
        }
        app.redraw().context("can't draw")?;
    }

    log::info!("QuadTimer exiting");
    Ok(())
}
