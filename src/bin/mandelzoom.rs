use clap::{App, Arg, ArgMatches};
use log::{info, warn};
use std::path::Path;
use std::str::FromStr;

use mandelzoom::{AnimationDriver, FrameOrchestrator, PngSequence, WorkerPool, ZoomConfig};

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_positive(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(f) if f.is_finite() && f > 0.0 => Ok(()),
        _ => Err(err.to_string()),
    }
}

const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const FPS: &str = "fps";
const ZOOM_END: &str = "zoom_end";
const OUTPUT_DIR: &str = "output-dir";
const VIDEO: &str = "video";
const NO_VIDEO: &str = "no-video";
const THREADS: &str = "threads";
const DOUBLING: &str = "doubling";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get() * 4;

    App::new("mandelzoom")
        .version("0.1.0")
        .about("Renders a histogram-equalized zoom into the Mandelbrot set")
        .arg(
            Arg::with_name(WIDTH)
                .index(1)
                .default_value("1920")
                .validator(|s| {
                    validate_range(&s, 1, 65_535, "Could not parse width", "Width must be between 1 and 65535")
                })
                .help("Frame width in pixels"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .index(2)
                .default_value("1080")
                .validator(|s| {
                    validate_range(&s, 1, 65_535, "Could not parse height", "Height must be between 1 and 65535")
                })
                .help("Frame height in pixels"),
        )
        .arg(
            Arg::with_name(FPS)
                .index(3)
                .default_value("30")
                .validator(|s| {
                    validate_range(&s, 1, 1000, "Could not parse frame rate", "Frame rate must be between 1 and 1000")
                })
                .help("Frames per second"),
        )
        .arg(
            Arg::with_name(ZOOM_END)
                .index(4)
                .default_value("1e6")
                .validator(|s| validate_positive(&s, "Zoom end must be a positive number"))
                .help("Zoom factor at which the animation stops"),
        )
        .arg(
            Arg::with_name(OUTPUT_DIR)
                .long(OUTPUT_DIR)
                .short("o")
                .takes_value(true)
                .default_value("images")
                .help("Directory the frames are written into"),
        )
        .arg(
            Arg::with_name(VIDEO)
                .long(VIDEO)
                .takes_value(true)
                .default_value("mandelbrot_zoom.mp4")
                .help("Video file assembled from the frames"),
        )
        .arg(
            Arg::with_name(NO_VIDEO)
                .long(NO_VIDEO)
                .help("Only write frames, don't run ffmpeg"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver [default: one per CPU]"),
        )
        .arg(
            Arg::with_name(DOUBLING)
                .long(DOUBLING)
                .takes_value(true)
                .default_value("1.25")
                .validator(|s| validate_positive(&s, "Doubling period must be a positive number of seconds"))
                .help("Seconds of video for the zoom to double"),
        )
        .get_matches()
}

// Every value below went through a validator, so parsing can't fail.
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> T {
    match matches.value_of(name).map(T::from_str) {
        Some(Ok(v)) => v,
        _ => unreachable!("{} was validated by clap", name),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = args();
    let config = ZoomConfig {
        width: value(&matches, WIDTH),
        height: value(&matches, HEIGHT),
        fps: value(&matches, FPS),
        zoom_end: value(&matches, ZOOM_END),
        seconds_per_zoom_doubling: value(&matches, DOUBLING),
        ..ZoomConfig::default()
    };

    let pool = if matches.is_present(THREADS) {
        match WorkerPool::new(value(&matches, THREADS)) {
            Ok(pool) => pool,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    } else {
        WorkerPool::sized_to_machine()
    };

    let mut frames = PngSequence::new(value::<String>(&matches, OUTPUT_DIR));
    if let Err(e) = frames.prepare() {
        warn!("could not prepare {}: {}", frames.dir().display(), e);
    }

    let mut driver = match AnimationDriver::new(&config) {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let orchestrator = FrameOrchestrator::new(config.width, config.height, pool);
    info!(
        "rendering {}x{} at {} fps on {} threads",
        config.width,
        config.height,
        config.fps,
        pool.workers()
    );

    let summary = match driver.run(&orchestrator, &mut frames) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    };

    if !matches.is_present(NO_VIDEO) {
        let video = Path::new(matches.value_of(VIDEO).unwrap_or("mandelbrot_zoom.mp4"));
        info!("encoding {}", video.display());
        if let Err(e) = mandelzoom::encode_video(&frames, config.fps, video) {
            warn!("could not create the video: {}", e);
        }
    }

    println!("\n====== FINAL STATS ======");
    println!("{}", summary);
    println!("=========================\n");
}
