//! Hangeul Melody - type Korean, hear it as music
//!
//! Every syllable typed is split into its jamo, each jamo sounds as a note
//! and the result is streamed to a visualization host over WebSocket.

use std::io::BufRead;
use std::process::ExitCode;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;

use hangeul_melody::audio::{AudioSystem, SilentSink, ToneSink};
use hangeul_melody::cli::{Args, Command};
use hangeul_melody::link::{LinkManager, WsTransport};
use hangeul_melody::logging::init_logging;
use hangeul_melody::observer::{DebugLog, StatusObserver};
use hangeul_melody::params::{ExpressionMapping, LinkConfig, SynthConfig};
use hangeul_melody::session::{Display, Session};

/// How often the link is polled while waiting for input
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Prints connection changes to the terminal
struct ConsoleStatus;

impl StatusObserver for ConsoleStatus {
    fn connection_changed(&mut self, connected: bool, message: &str) {
        let marker = if connected { "connected" } else { "disconnected" };
        println!("[{}] {}", marker, message);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = init_logging(&args.log_level, args.log_dir.as_deref()) {
        eprintln!("Error: {}", err);
        return ExitCode::from(2);
    }
    let link_config = match args.link_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::from(2);
        }
    };

    println!("Hangeul Melody - Korean syllables as notes");
    println!("Initializing systems...\n");

    let synth = SynthConfig::default();

    if args.mute {
        if args.record.is_some() {
            log::warn!("event=recording_skipped reason=muted");
        }
        println!("Audio: muted");
        run(SilentSink, &link_config, synth);
        return ExitCode::SUCCESS;
    }

    let audio = match AudioSystem::new(&synth, args.record.as_deref()) {
        Ok(audio) => audio,
        Err(err) => {
            log::error!("event=audio_init status=error error={}", err);
            eprintln!("Audio initialization failed: {}", err);
            eprintln!("Run with --mute to continue without sound.");
            return ExitCode::FAILURE;
        }
    };

    let mut session = run(audio, &link_config, synth);
    if let Err(err) = session.sink_mut().finish_recording() {
        eprintln!("Failed to save recording: {}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Run the interactive loop until `:quit` or end of input
fn run<S: ToneSink>(
    sink: S,
    config: &LinkConfig,
    synth: SynthConfig,
) -> Session<WsTransport, S> {
    let log = DebugLog::new();
    let link = LinkManager::new(
        config.transport(),
        config.url.as_str(),
        config.policy(),
        log.clone(),
        Box::new(ConsoleStatus),
    );
    let mut session = Session::new(link, sink, synth, ExpressionMapping::default(), log);
    session.start(Instant::now());

    println!("\nHangeul Melody is running!");
    println!("Type Hangeul, or :pointer X Y | :clear | :reconnect | :status | :log [N] | :quit\n");

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut field = String::new();
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(line)) => match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => execute(&mut session, &mut field, command),
                Err(err) => println!("{}", err),
            },
            Ok(Err(err)) => {
                log::error!("event=stdin_read status=error error={}", err);
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        session.poll(Instant::now());
    }

    session.shutdown();
    println!("Goodbye");
    session
}

fn execute<S: ToneSink>(session: &mut Session<WsTransport, S>, field: &mut String, command: Command) {
    match command {
        Command::Type(text) => {
            // One keystroke per character, as if typed into the field
            for ch in text.chars() {
                field.push(ch);
                render(&session.handle_input(field));
            }
        }
        Command::Pointer { x, y } => {
            session.set_pointer(x, y);
            let pointer = session.pointer();
            let expression = session.expression();
            println!(
                "Pointer ({:.2}, {:.2}): pitch x{:.3}, volume {:.2}",
                pointer.x, pointer.y, expression.pitch_factor, expression.volume
            );
        }
        Command::Clear => {
            field.clear();
            render(&session.clear_input());
        }
        Command::Reconnect => session.reconnect(Instant::now()),
        Command::Status => {
            let link = session.link();
            println!(
                "Link {} ({}), attempts {}",
                link.url(),
                link.status(),
                link.attempts()
            );
            if let Some(retry) = link.pending_retry() {
                println!("Retry {} scheduled after {}ms", retry.attempt, retry.delay.as_millis());
            }
            println!("Active voices: {}", session.active_voices());
        }
        Command::Log { tail } => {
            let entries = match tail {
                Some(count) => session.log().tail(count),
                None => session.log().entries(),
            };
            for entry in entries {
                println!("{}", entry);
            }
        }
        Command::Quit => {}
    }
}

fn render(display: &Display) {
    match display {
        Display::Syllable(view) => {
            let syllable = &view.decomposed;
            println!(
                "{}  {}  {}  {}",
                syllable.syllable,
                view.consonant_label.as_deref().unwrap_or("-"),
                view.vowel_label.as_deref().unwrap_or("-"),
                syllable.trailing.map(String::from).unwrap_or_default()
            );
            for note in &view.notes {
                println!(
                    "    {} {}{} {:.2} Hz ({:?})",
                    note.jamo,
                    note.note,
                    note.octave,
                    note.frequency,
                    note.role.waveform()
                );
            }
        }
        Display::Cleared => println!("-"),
    }
}
