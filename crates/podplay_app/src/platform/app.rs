use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use engine_logging::{engine_info, engine_warn};
use podplay_core::{update, AppState, Msg, Notice};
use podplay_engine::{ensure_data_dir, EngineConfig};

use super::audio::AudioOutput;
use super::config::AppConfig;
use super::effects::{EffectRunner, MsgSender};
use super::ui::commands::{self, Action};
use super::ui::render;
use super::{logging, persistence};

/// Everything the dispatch loop reacts to.
#[derive(Debug)]
pub enum Input {
    Line(String),
    Msg(Msg),
    Closed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    ensure_data_dir(&config.data_dir)
        .with_context(|| format!("preparing data directory {}", config.data_dir.display()))?;
    logging::initialize(config.log_destination, config.log_level, &config.log_path());
    engine_info!("podplay starting with data dir {:?}", config.data_dir);

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    let msgs = MsgSender::new(input_tx.clone());

    let mut engine_config = EngineConfig::default();
    if let Some(url) = &config.search_url {
        engine_config.search.base_url = url.clone();
    }
    let mut runner = EffectRunner::new(
        engine_config,
        msgs.clone(),
        audio_output(msgs.clone()),
        config.data_dir.clone(),
    );

    spawn_stdin_reader(input_tx);

    let mut state = AppState::new();
    let restored = persistence::load_subscriptions(&config.data_dir);
    if !restored.is_empty() {
        msgs.send(Msg::RestoreSubscriptions(restored));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "podplay - type 'help' for commands")?;
    write!(out, "> ")?;
    out.flush()?;

    while let Ok(input) = input_rx.recv() {
        let msg = match input {
            Input::Line(line) => match commands::parse_command(&line) {
                Ok(None) => {
                    write!(out, "> ")?;
                    out.flush()?;
                    continue;
                }
                Ok(Some(command)) => match commands::to_action(command, &state.view()) {
                    Ok(Action::Dispatch(msg)) => msg,
                    Ok(Action::ShowSubscriptions) => {
                        write!(out, "{}> ", render::render_subscriptions(&state.view()))?;
                        out.flush()?;
                        continue;
                    }
                    Ok(Action::ShowHelp) => {
                        write!(out, "{}\n> ", commands::HELP)?;
                        out.flush()?;
                        continue;
                    }
                    Ok(Action::Quit) => break,
                    Err(err) => {
                        write!(out, "{}\n> ", err)?;
                        out.flush()?;
                        continue;
                    }
                },
                Err(err) => {
                    write!(out, "{}\n> ", err)?;
                    out.flush()?;
                    continue;
                }
            },
            Input::Msg(msg) => msg,
            Input::Closed => break,
        };

        let (next, effects) = update(std::mem::take(&mut state), msg);
        state = next;
        let notices = runner.enqueue(effects);
        if state.consume_dirty() || !notices.is_empty() {
            print_frame(&mut out, &state, &notices)?;
        }
    }

    let (_, effects) = update(state, Msg::StopClicked);
    runner.enqueue(effects);
    engine_info!("podplay exiting");
    Ok(())
}

fn print_frame(out: &mut impl Write, state: &AppState, notices: &[Notice]) -> io::Result<()> {
    writeln!(out)?;
    for notice in notices {
        writeln!(out, "! {}", render::notice_text(notice))?;
    }
    write!(out, "{}> ", render::render(&state.view()))?;
    out.flush()
}

fn spawn_stdin_reader(tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    engine_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(Input::Closed);
    });
}

#[cfg(not(feature = "rodio-output"))]
fn audio_output(msgs: MsgSender) -> Box<dyn AudioOutput> {
    Box::new(super::audio::SilentOutput::new(msgs))
}

#[cfg(feature = "rodio-output")]
fn audio_output(msgs: MsgSender) -> Box<dyn AudioOutput> {
    Box::new(super::audio::RodioOutput::new(msgs))
}
