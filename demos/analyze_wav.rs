//! Example: analyze a WAV file and write MIDI clips
//!
//! Usage: `cargo run --example analyze_wav -- input.wav [clip_dir]`

use std::sync::Arc;
use std::time::Duration;

use loopscout::{AnalysisConfig, Analyzer, CaptureBuffer};

fn load_wav(path: &str) -> Result<CaptureBuffer, Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let buffer = if spec.channels == 2 {
        let left: Vec<f32> = samples.iter().step_by(2).copied().collect();
        let right: Vec<f32> = samples.iter().skip(1).step_by(2).copied().collect();
        CaptureBuffer::new(left, right, spec.sample_rate as f32)?
    } else {
        CaptureBuffer::from_mono(samples, spec.sample_rate as f32)?
    };

    Ok(buffer)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .ok_or("Usage: analyze_wav <input.wav> [clip_dir]")?;
    let clip_dir = args
        .next()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);

    let buffer = Arc::new(load_wav(&input)?);
    println!(
        "Loaded {}: {:.1} s at {} Hz",
        input,
        buffer.duration_seconds(),
        buffer.sample_rate()
    );

    let config = AnalysisConfig {
        clip_dir: clip_dir.clone(),
        ..AnalysisConfig::default()
    };

    let handle = Analyzer::start(buffer, config)?;
    while !handle.is_completed() {
        print!("\r{} {}%  ", handle.state().step().label(), handle.progress_percent());
        std::thread::sleep(Duration::from_millis(50));
    }
    println!("\r{} 100%   ", handle.state().step().label());

    let error = handle.error_code();
    let result = handle.join();

    println!("Analysis results ({:?}):", error);
    println!("  BPM: {:.1}", result.bpm);
    println!("  Key: {}", result.key.label());
    println!(
        "  Onsets: kick {}, snare {}, hihat {}",
        result.onsets.kick.len(),
        result.onsets.snare.len(),
        result.onsets.hihat.len()
    );
    println!(
        "  Clips in {}: kick={} snare={} hihat={} chord={}",
        clip_dir.display(),
        result.clips.kick,
        result.clips.snare,
        result.clips.hihat,
        result.clips.chord
    );

    Ok(())
}
