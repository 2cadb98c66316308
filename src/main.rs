//! Tilt Charades demo driver
//!
//! Plays one scripted round against a simulated camera and accelerometer,
//! then prints the round result as JSON. Pass a settings file path to use
//! saved preferences.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use tilt_charades::Settings;

    env_logger::init();
    log::info!("Tilt Charades (native demo) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_from(&PathBuf::from(path)),
        None => Settings::default(),
    };

    if let Err(e) = demo::play_scripted_round(&settings) {
        log::error!("Demo round could not start: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on wasm
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec3;
    use tilt_charades::session::{
        CaptureDevice, ConfigError, PushFeed, QueuedRecorder, RecorderError, RecordingHandle,
        SessionEvent,
    };
    use tilt_charades::{Clock, GameStatus, ManualClock, Prompt, SessionCoordinator, Settings};

    const DEMO_WORDS: [&str; 8] = [
        "Arepa",
        "Tinto",
        "Chiva",
        "Ruana",
        "Sombrero Vueltiao",
        "Bandeja Paisa",
        "Transmilenio",
        "Paseo de Olla",
    ];

    /// Camera that only logs
    struct LoggingCamera;

    impl CaptureDevice for LoggingCamera {
        fn begin_capture(&mut self) -> Result<(), RecorderError> {
            log::info!("[camera] recording");
            Ok(())
        }

        fn end_capture(&mut self) -> Result<(), RecorderError> {
            log::info!("[camera] flushing");
            Ok(())
        }
    }

    /// z trace for one gesture: level, tilt, hold, level
    fn gesture(correct: bool) -> Vec<f32> {
        let peak = if correct { 0.85 } else { -0.85 };
        vec![0.05, peak * 0.6, peak, peak, peak, peak * 0.5, 0.1, 0.0]
    }

    pub fn play_scripted_round(settings: &Settings) -> Result<(), ConfigError> {
        let pool: Vec<Prompt> = DEMO_WORDS.iter().map(|&w| Prompt::from(w)).collect();
        let mut config = settings.session_config(pool, 2024)?;
        // Keep the demo short
        config.duration_secs = config.duration_secs.min(20);

        let clock = ManualClock::new(0);
        let step_ms = u64::from(config.sample_interval_ms);
        let recorder = QueuedRecorder::new(LoggingCamera);
        let mut session = SessionCoordinator::new(config, recorder, PushFeed::new(), clock.clone())?;

        session.start_game();
        // Camera warms up a moment after the round starts
        clock.advance(300);
        if let Err(e) = session.recorder_mut().on_ready() {
            log::warn!("Camera failed after warm-up: {e}");
        }

        let script = [true, false, true, true, false, true, true];
        let mut samples = script.iter().flat_map(|&correct| gesture(correct));

        while session.status() == GameStatus::Playing {
            clock.advance(step_ms);
            let z = samples.next().unwrap_or(0.0);
            session.on_sample(Vec3::new(-0.98, 0.02, z));
            session.advance();
            report(session.drain_events());
        }

        // The camera hands back its file shortly after stopping
        clock.advance(800);
        session.on_recording_finished(RecordingHandle::new(format!(
            "file:///tmp/charades-{}.mp4",
            clock.now_ms()
        )));
        report(session.drain_events());

        if let Some(result) = session.result() {
            match serde_json::to_string_pretty(result) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Could not serialize result: {e}"),
            }
            println!("Score: {} ({:.0}% correct)", result.score_line(), result.accuracy() * 100.0);
        }
        Ok(())
    }

    fn report(events: Vec<SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::Scored {
                    correct,
                    score,
                    answered,
                    next_word,
                    ..
                } => println!(
                    "{} -> {score}/{answered}, next: {next_word}",
                    if correct { "CORRECT" } else { "PASS" }
                ),
                SessionEvent::TimerTick { time_left } if time_left % 5 == 0 => {
                    println!("{time_left}s left");
                }
                SessionEvent::Finished(reason) => println!("Round over: {reason:?}"),
                other => log::debug!("{other:?}"),
            }
        }
    }
}
