pub mod load;
pub mod signature;
pub mod st;
pub mod mk;

#[cfg(test)]
pub(crate) mod testdata;

pub use self::load::Warning;
pub use self::signature::{PadLayout, Signature};

use std::path::Path;
use crate::module::Module;
use crate::Error;


/// Layout, limits and signatures of one module dialect.
#[derive(Debug)]
pub struct ModuleFormat {
    pub id         : &'static str,
    pub name       : &'static str,
    pub author     : &'static str,
    pub description: &'static str,
    pub extensions : &'static [&'static str],

    pub tracks     : usize,
    pub samples    : usize,
    pub positions  : usize,
    pub rows       : usize,
    pub patterns   : usize,
    pub cell_size  : usize,
    pub magic_size : usize,
    pub check_pattern_range: bool,

    pub name_size         : usize,
    pub sample_name_size  : usize,
    pub sample_header_size: usize,

    pub max_volume             : u16,
    pub max_sample_size        : usize,
    pub recommended_sample_size: usize,
    pub sample_name_prefix     : Option<&'static str>,
    pub name_not_recommended   : &'static str,
    pub repeat_in_words        : bool,
    pub finetune               : bool,

    pub sample_rate : u32,
    pub sample_width: u16,
    pub channels    : u16,

    pub effects    : &'static [(&'static str, u16)],
    pub flag_bytes : Signature,
    pub guess_bytes: Signature,
    pub pad_layout : PadLayout,
    pub zero_pads  : Signature,
}

impl ModuleFormat {
    /// Compute the zero-pad table from the layout. Called once per format
    /// when the registry is built.
    pub fn build(mut self) -> Self {
        self.zero_pads = self.pad_layout.generate(&self);
        self
    }

    pub fn pattern_size(&self) -> usize {
        self.tracks * self.rows * self.cell_size
    }

    /// Offset of the song length byte, right after the sample headers.
    pub fn song_offset(&self) -> usize {
        self.name_size + self.samples * self.sample_header_size
    }

    /// Offset of the first pattern.
    pub fn pattern_offset(&self) -> usize {
        self.song_offset() + 2 + self.positions + self.magic_size
    }

    pub fn effect_name(&self, effect: u16) -> Option<&'static str> {
        self.effects.iter().find(|&&(_, code)| code == effect & 0xf00).map(|&(name, _)| name)
    }

    /// Accept the file extension, or, for files without one, the Amiga
    /// convention of a type prefix at the start of the name.
    pub fn validate_extension(&self, filename: &str) -> bool {
        let (name, extension) = split_filename(filename);
        let name = name.to_uppercase();

        let ok = match extension {
            Some(ext) => {
                let ext = ext.to_uppercase();
                self.extensions.iter().any(|x| x.to_uppercase() == ext)
            }
            None => self.extensions.iter().any(|x| name.starts_with(&x.to_uppercase())),
        };

        if !ok {
            debug!("{}: extension of {:?} not recognized", self.name, filename);
        }
        ok
    }

    pub fn validate_flag_bytes(&self, b: &[u8]) -> bool {
        self.flag_bytes.matches(b)
    }

    pub fn validate_zero_pads(&self, b: &[u8]) -> bool {
        self.zero_pads.matches(b)
    }

    pub fn validate_guess_bytes(&self, b: &[u8]) -> bool {
        self.guess_bytes.matches(b)
    }
}

fn split_filename(filename: &str) -> (&str, Option<&str>) {
    let path = Path::new(filename);
    let name = path.file_name().and_then(|x| x.to_str()).unwrap_or(filename);
    let ext = path.extension().and_then(|x| x.to_str()).filter(|x| !x.is_empty());
    (name, ext)
}


lazy_static! {
    static ref FORMATS: Vec<ModuleFormat> = vec![
        st::ultimate_soundtracker().build(),
        st::ultimate_soundtracker_2().build(),
        st::soundtracker_ii().build(),
        st::soundtracker_iii().build(),
        st::soundtracker_ix().build(),
        st::master_soundtracker().build(),
        st::soundtracker_2().build(),
        mk::noisetracker().build(),
        mk::protracker().build(),
    ];
}

/// All known formats in the order they are tried.
pub fn list() -> &'static [ModuleFormat] {
    &FORMATS
}

pub fn by_id(id: &str) -> Option<&'static ModuleFormat> {
    list().iter().find(|f| f.id == id)
}


/// How candidate formats are chosen before decoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gating {
    /// Try every format whose zero pads match, in registry order.
    ZeroPads,
    /// Require matching extension and zero pads; prefer formats whose flag
    /// bytes, then guess bytes, match.
    Strict,
}

impl Default for Gating {
    fn default() -> Self {
        Gating::ZeroPads
    }
}


/// Formats passing each evidence layer, evaluated independently.
#[derive(Debug)]
pub struct Candidates {
    pub extension  : Vec<&'static ModuleFormat>,
    pub flag_bytes : Vec<&'static ModuleFormat>,
    pub zero_pads  : Vec<&'static ModuleFormat>,
    pub guess_bytes: Vec<&'static ModuleFormat>,
}

impl Candidates {
    pub fn new(b: &[u8], filename: &str) -> Self {
        debug!("validating extension");
        let extension = select(|x| x.validate_extension(filename));
        debug!("flag bytes validation");
        let flag_bytes = select(|x| x.validate_flag_bytes(b));
        debug!("zero pads validation");
        let zero_pads = select(|x| x.validate_zero_pads(b));
        debug!("guess bytes validation");
        let guess_bytes = select(|x| x.validate_guess_bytes(b));

        Candidates {
            extension,
            flag_bytes,
            zero_pads,
            guess_bytes,
        }
    }

    /// Formats to try, in order, under the given gating policy.
    pub fn gate(&self, gating: Gating) -> Vec<&'static ModuleFormat> {
        match gating {
            Gating::ZeroPads => self.zero_pads.clone(),
            Gating::Strict   => {
                let mut v: Vec<&'static ModuleFormat> = self.zero_pads.iter()
                    .filter(|f| contains(&self.extension, f))
                    .cloned()
                    .collect();
                v.sort_by_key(|f| {
                    let flagged = !f.flag_bytes.is_empty() && contains(&self.flag_bytes, f);
                    let guessed = !f.guess_bytes.is_empty() && contains(&self.guess_bytes, f);
                    (!flagged, !guessed)
                });
                v
            }
        }
    }
}

fn select<F: Fn(&ModuleFormat) -> bool>(f: F) -> Vec<&'static ModuleFormat> {
    list().iter().filter(|x| f(x)).collect()
}

fn contains(list: &[&'static ModuleFormat], fmt: &ModuleFormat) -> bool {
    list.iter().any(|x| x.id == fmt.id)
}


pub fn load(b: &[u8], filename: &str) -> Result<Module, Error> {
    load_with(b, filename, Gating::default())
}

/// Identify the module format and decode the buffer with the first format
/// that accepts it.
pub fn load_with(b: &[u8], filename: &str, gating: Gating) -> Result<Module, Error> {
    let candidates = Candidates::new(b, filename);

    for f in candidates.gate(gating) {
        debug!("trying to load as {}", f.name);

        match f.load(b) {
            Ok(module) => {
                debug!("loaded {} as {}", filename, f.name);
                return Ok(module)
            }
            Err(e) => {
                debug!("not {}: {}", f.name, e);
                continue
            }
        }
    }

    Err(Error::Format(format!("{}: unsupported module format", filename)))
}
