use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

mod app;
mod config;
mod export;
mod keybinds;
mod logging;
mod runner;
mod selection;
mod store;
mod theme;
mod types;
mod ui;
mod upload;
mod util;
use app::{App, AppOptions};
use runner::{DEFAULT_PYTHON, PythonInterpreter};
use ui::draw;

const USAGE: &str = "\
Usage: pyide [OPTIONS] [PATH...]

Arguments:
  [PATH...]          .py files or folders to load at startup

Options:
  --out <DIR>        Directory downloads are written to (default: current directory)
  --python <PROGRAM> Interpreter used by Run (default: python3)
  -h, --help         Show this help message";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    help: bool,
    out: Option<PathBuf>,
    python: Option<String>,
    paths: Vec<PathBuf>,
}

fn usage_error(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> io::Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--out" => {
                let dir = args
                    .next()
                    .ok_or_else(|| usage_error("--out needs a directory".to_string()))?;
                parsed.out = Some(PathBuf::from(dir));
            }
            "--python" => {
                let program = args
                    .next()
                    .ok_or_else(|| usage_error("--python needs a program".to_string()))?;
                parsed.python = Some(program);
            }
            flag if flag.starts_with("--") => {
                return Err(usage_error(format!("unknown option: {flag}")));
            }
            path => parsed.paths.push(PathBuf::from(path)),
        }
    }
    Ok(parsed)
}

pub fn run() -> io::Result<()> {
    let args = parse_args(std::env::args().skip(1)).inspect_err(|_| eprintln!("{USAGE}\n"))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let _log_guard = logging::init();
    let settings = config::load_settings();
    let download_dir = match args.out.or_else(|| settings.download_dir.clone()) {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let python = args
        .python
        .or_else(|| settings.python.clone())
        .unwrap_or_else(|| DEFAULT_PYTHON.to_string());
    tracing::info!(download_dir = %download_dir.display(), python = %python, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let enhanced_keys =
        ratatui::crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
    if enhanced_keys {
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        );
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        tracing::error!(%info, "panic");
        original_hook(info);
    }));

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    let mut app = App::new(AppOptions {
        settings,
        download_dir,
        interpreter: Arc::new(PythonInterpreter::new(python)),
    });
    app.add_files(args.paths);
    let result = run_app(terminal, app);

    disable_raw_mode()?;
    let mut stdout = io::stdout();
    if enhanced_keys {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    tracing::info!("exiting");

    result
}

fn run_app(mut terminal: Terminal<CrosstermBackend<Stdout>>, mut app: App) -> io::Result<()> {
    loop {
        app.poll_background();
        terminal.draw(|f| draw(&mut app, f))?;
        if app.quit {
            return Ok(());
        }
        if event::poll(Duration::from_millis(100))? {
            // Drain everything queued so a burst of input costs one redraw.
            loop {
                match event::read()? {
                    Event::Key(key) => {
                        if let Err(err) = app.handle_key(key) {
                            tracing::warn!(error = %err, "key action failed");
                            app.set_status(format!("Action failed: {err}"));
                        }
                    }
                    Event::Mouse(mouse) => {
                        if let Err(err) = app.handle_mouse(mouse) {
                            tracing::warn!(error = %err, "mouse action failed");
                            app.set_status(format!("Action failed: {err}"));
                        }
                    }
                    _ => {}
                }
                if app.quit {
                    return Ok(());
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_options_and_paths() {
        let parsed = parse_args(args(&["--out", "dl", "a.py", "--python", "py3", "src"]))
            .expect("parse");
        assert_eq!(
            parsed,
            CliArgs {
                help: false,
                out: Some(PathBuf::from("dl")),
                python: Some("py3".to_string()),
                paths: vec![PathBuf::from("a.py"), PathBuf::from("src")],
            }
        );
    }

    #[test]
    fn bad_arguments_are_invalid_input() {
        let cases: [&[&str]; 3] = [&["--out"], &["--python"], &["a.py", "--bogus"]];
        for bad in cases {
            let err = parse_args(args(bad)).expect_err("should fail");
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn help_flag() {
        assert!(parse_args(args(&["-h"])).expect("parse").help);
    }
}
