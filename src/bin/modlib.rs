use std::env;
use std::error;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;
use getopts::{Matches, Options};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;
use modlib::{format, unpack, Error, Gating, Module};

const LOG: &str = "modlib.log";


struct Config {
    working_dir: PathBuf,
    gating     : Gating,
    info       : bool,
}

impl Config {
    fn from_matches(matches: &Matches) -> Self {
        Config {
            working_dir: matches.opt_str("o").map_or_else(|| PathBuf::from("."), PathBuf::from),
            gating     : if matches.opt_present("s") { Gating::Strict } else { Gating::ZeroPads },
            info       : matches.opt_present("i"),
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut opts = Options::new();

    opts.optflag("h", "help", "display usage information and exit");
    opts.optflag("v", "verbose", "log to standard output instead of modlib.log");
    opts.optopt("o", "output", "directory to unpack modules into", "DIR");
    opts.optflag("s", "strict", "require a known extension and prefer formats with matching magic");
    opts.optflag("i", "info", "show module information instead of unpacking");
    opts.optflag("l", "list", "list supported formats and exit");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let brief = format!("Usage: {} [options] filename...", args[0]);

    if matches.opt_present("h") {
        print!("{}", opts.usage(&brief));
        return;
    }

    if matches.opt_present("l") {
        list_formats();
        return;
    }

    if matches.free.is_empty() {
        eprint!("{}", opts.usage(&brief));
        process::exit(1);
    }

    if let Err(e) = set_up_logger(matches.opt_present("v")) {
        eprintln!("can't set up logging: {}", e);
        process::exit(1);
    }

    let config = Config::from_matches(&matches);

    for path in &matches.free {
        debug!("loading path: {}", path);
        if let Err(e) = run(path, &config) {
            error!("cannot process {}: {}", path, e);
            eprintln!("{}: {}", path, e);
        }
    }
}

fn set_up_logger(verbose: bool) -> Result<(), Box<dyn error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_level(false);

    if verbose {
        builder.with_writer(io::stdout).init();
    } else {
        let file = File::create(LOG)?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    }

    Ok(())
}

fn run(path: &str, config: &Config) -> Result<(), Error> {
    let b = fs::read(path)?;
    let filename = Path::new(path).file_name().and_then(|x| x.to_str()).unwrap_or(path);

    let module = format::load_with(&b, filename, config.gating)?;
    if module.truncated {
        warn!("{}: module is incomplete, missing patterns {:?}", filename, module.missing_patterns());
    }

    if config.info {
        show_info(&module, filename);
    } else {
        unpack::unpack(&module, filename, &config.working_dir)?;
    }

    Ok(())
}

fn list_formats() {
    for f in format::list() {
        println!("{:5} {:26} {:31} {}", f.id, f.name, f.author, f.extensions.join(","));
    }
}

fn show_info(module: &Module, filename: &str) {
    println!("File    : {}", filename);
    println!("Title   : {}", module.name);
    println!("Format  : {} ({})", module.format.name, module.format.author);
    println!("Length  : {}", module.song.length);
    println!("Tempo   : {}", module.song.tempo);
    println!("Patterns: {}", module.patterns.len());
    println!("Warnings: {}", module.warnings.len());

    println!("Samples:");
    for (i, smp) in module.samples.iter().enumerate() {
        if let Some(smp) = smp {
            println!("{:3}: {:22} {:6} {:2} {:6} {:6} {}",
                i + 1, smp.name, smp.length, smp.volume, smp.repeat_offset, smp.repeat_length,
                if smp.looped { 'L' } else { ' ' });
        }
    }

    show_pattern(module, 0);
}

fn show_pattern(module: &Module, num: usize) {
    let pat = match module.pattern(num) {
        Some(pat) => pat,
        None      => return,
    };

    println!("Pattern {}:", num);
    for r in 0..pat.rows() {
        print!("{:3}: ", r);
        for c in 0..pat.tracks.len() {
            if let Some(e) = pat.event(r, c) {
                print!("{}  ", e)
            }
        }
        println!();
    }
}
