use std::{
    fs::File,
    io::Write,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{LevelFilter, error, info};
use ratatui::{
    DefaultTerminal, Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use chip8_vm::{
    emu::{
        Chip8Runner, Config, Cpu, DEFAULT_CPU_HZ, DEFAULT_TIMER_HZ, DISPLAY_X, DISPLAY_Y,
        FrameBuffer, Keypad,
    },
    u4,
};

const KEY_MAP: [KeyCode; 16] = [
    KeyCode::Char('x'), // 0x0
    KeyCode::Char('1'), // 0x1
    KeyCode::Char('2'), // 0x2
    KeyCode::Char('3'), // 0x3
    KeyCode::Char('q'), // 0x4
    KeyCode::Char('w'), // 0x5
    KeyCode::Char('e'), // 0x6
    KeyCode::Char('a'), // 0x7
    KeyCode::Char('s'), // 0x8
    KeyCode::Char('d'), // 0x9
    KeyCode::Char('z'), // 0xA
    KeyCode::Char('c'), // 0xB
    KeyCode::Char('4'), // 0xC
    KeyCode::Char('r'), // 0xD
    KeyCode::Char('f'), // 0xE
    KeyCode::Char('v'), // 0xF
];

// Key release events are not fired in most terminals.
// To handle this, we consider a key released after a timeout.
const KEY_RELEASE_TIMEOUT: Duration = Duration::from_millis(100);

const SIDE_PANEL_WIDTH: u16 = 17;
const MIN_WIDTH: u16 = DISPLAY_X as u16 + 2 + SIDE_PANEL_WIDTH;
const MIN_HEIGHT: u16 = DISPLAY_Y as u16 + 2;

/// Keypad fed by terminal key events.
#[derive(Default)]
struct TerminalKeypad {
    last_press: Option<(u4, Instant)>,
}

impl TerminalKeypad {
    fn press(&mut self, key: u4) {
        self.last_press = Some((key, Instant::now()));
    }

    fn pressed(&self) -> Option<u4> {
        self.last_press
            .filter(|(_, at)| at.elapsed() <= KEY_RELEASE_TIMEOUT)
            .map(|(key, _)| key)
    }
}

impl Keypad for TerminalKeypad {
    fn read_key(&mut self) -> Option<u4> {
        self.pressed()
    }
}

struct App {
    runner: Chip8Runner<FrameBuffer, TerminalKeypad>,
    should_quit: bool,
    last_tick: Instant,
}

impl App {
    fn new(rom: &[u8], config: &Config) -> anyhow::Result<Self> {
        let mut cpu = Cpu::with_config(FrameBuffer::new(), TerminalKeypad::default(), config);
        cpu.load_program(rom)
            .context("Failed to load ROM into CHIP-8 memory")?;

        Ok(Self {
            runner: Chip8Runner::new(cpu, config),
            should_quit: false,
            last_tick: Instant::now(),
        })
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.should_quit {
            let dt = self.last_tick.elapsed().as_secs_f32();
            self.last_tick = Instant::now();

            self.runner.update(dt).context("CHIP-8 execution error")?;

            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(Duration::from_millis(16))?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key_event(key);
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            code => {
                if let Some(idx) = KEY_MAP.iter().position(|&k| k == code) {
                    self.runner.cpu_mut().keypad_mut().press(u4::new(idx as u8));
                }
            }
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let center = area.centered(Constraint::Length(45), Constraint::Length(3));

            Paragraph::new(format!(
                "Terminal is too small ({}x{} min)",
                MIN_WIDTH, MIN_HEIGHT
            ))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .block(Block::bordered())
            .render(center, buf);

            return;
        }

        let [display, right] = Layout::horizontal([
            Constraint::Min(DISPLAY_X as u16 + 2),
            Constraint::Length(SIDE_PANEL_WIDTH),
        ])
        .areas(area);

        let [registers, stack] =
            Layout::vertical([Constraint::Length(11 + 2), Constraint::Min(1 + 2)]).areas(right);

        self.render_display(display, buf);
        self.render_registers(registers, buf);
        self.render_stack(stack, buf);
    }
}

impl App {
    fn render_display(&self, area: Rect, buf: &mut Buffer) {
        let text: Vec<Line> = self
            .runner
            .cpu()
            .screen()
            .pixels()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|pixel| {
                        Span::styled(
                            if *pixel { "█" } else { " " },
                            Style::default().fg(Color::Green),
                        )
                    })
                    .collect()
            })
            .collect();

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" Display "))
            .render(area, buf);
    }

    fn render_registers(&self, area: Rect, buf: &mut Buffer) {
        let cpu = self.runner.cpu();
        let mut lines = Vec::new();

        lines.push(Line::from(format!("PC: {:03X}  I: {:03X}", cpu.pc(), cpu.i())));
        lines.push(Line::from(format!(
            "DT: {:02X}   ST: {:02X}",
            cpu.delay_timer(),
            cpu.sound_timer()
        )));
        lines.push(Line::from(""));

        let v = cpu.registers().values();
        for idx in 0..8 {
            lines.push(Line::from(format!(
                "V{:X}: {:02X}   V{:X}: {:02X}",
                idx,
                v[idx],
                idx + 8,
                v[idx + 8]
            )));
        }

        Paragraph::new(lines)
            .block(Block::bordered().title(" Registers "))
            .render(area, buf);
    }

    fn render_stack(&self, area: Rect, buf: &mut Buffer) {
        let max_lines = (area.height as usize).saturating_sub(2).max(1);

        let mut lines: Vec<Line> = self
            .runner
            .cpu()
            .stack()
            .iter()
            .enumerate()
            .map(|(i, val)| Line::from(format!("{:02}: {:03X}", i, val)))
            .collect();

        if lines.is_empty() {
            lines.push(Line::from("Empty"));
        }

        if lines.len() > max_lines {
            // Display only the last `max_lines - 1` items with "..." at the top
            lines = std::iter::once(Line::from("..."))
                .chain(lines.into_iter().rev().take(max_lines - 1).rev())
                .collect();
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" Stack "))
            .render(area, buf);
    }
}

/// Terminal CHIP-8 interpreter.
///
/// Keys 1-4, Q-R, A-F, Z-V map to CHIP-8 keys.
/// Escape or Ctrl+C exits.
#[derive(Parser, Debug)]
#[command(about)]
struct Args {
    /// Path to the CHIP-8 ROM file
    rom_path: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = DEFAULT_CPU_HZ, value_parser = parse_rate)]
    hz: f32,

    /// Timer decrements per second (1 counts down in whole seconds)
    #[arg(long, default_value_t = DEFAULT_TIMER_HZ, value_parser = parse_rate)]
    timer_hz: f32,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum subroutine nesting depth (unbounded if omitted)
    #[arg(long)]
    stack_limit: Option<usize>,

    /// Write log output to this file
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Config {
            cpu_hz: args.hz,
            timer_hz: args.timer_hz,
            rng_seed: args.seed,
            stack_limit: args.stack_limit,
        }
    }
}

fn parse_rate(s: &str) -> Result<f32, String> {
    match s.parse::<f32>() {
        Ok(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
        _ => Err(format!("Invalid rate: '{}', expected a positive number", s)),
    }
}

/// The terminal belongs to the UI, so logs only go to a file.
fn init_logging(args: &Args) -> anyhow::Result<()> {
    let Some(path) = &args.log else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file '{}'", path.display()))?;
    let filter = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let rom = std::fs::read(&args.rom_path).context("Failed to read ROM file")?;
    let mut app = App::new(&rom, &Config::from(&args)).context("Failed to initialize application")?;

    info!("Running {}", args.rom_path.display());
    let mut terminal = ratatui::init();
    let app_result = app.run(&mut terminal);
    ratatui::restore();

    if let Err(e) = &app_result {
        error!("{e:#}");
    }
    app_result
}
