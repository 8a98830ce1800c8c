pub mod event;
pub mod sample;

pub use self::event::Event;
pub use self::sample::Sample;

use std::collections::BTreeSet;
use serde::Serialize;
use crate::format::{ModuleFormat, Warning};


#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SongHeader {
    pub length            : usize,
    pub tempo             : u8,
    pub positions         : Vec<u8>,
    pub max_pattern_number: usize,
}


/// One pattern, stored as rows of events per track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Pattern {
    pub tracks: Vec<Vec<Event>>,
}

impl Pattern {
    pub fn new(tracks: usize) -> Self {
        Pattern {
            tracks: vec![Vec::new(); tracks],
        }
    }

    pub fn rows(&self) -> usize {
        self.tracks.iter().map(|t| t.len()).max().unwrap_or(0)
    }

    pub fn event(&self, row: usize, track: usize) -> Option<&Event> {
        self.tracks.get(track).and_then(|t| t.get(row))
    }
}


/// A decoded module. The format reference tells which dialect accepted it.
#[derive(Debug)]
pub struct Module {
    pub name     : String,
    pub samples  : Vec<Option<Sample>>,
    pub song     : SongHeader,
    pub patterns : Vec<Pattern>,
    pub format   : &'static ModuleFormat,
    pub warnings : Vec<Warning>,
    pub truncated: bool,
}

impl Module {
    pub fn new(format: &'static ModuleFormat) -> Self {
        Module {
            name     : String::new(),
            samples  : Vec::new(),
            song     : SongHeader::default(),
            patterns : Vec::new(),
            format,
            warnings : Vec::new(),
            truncated: false,
        }
    }

    pub fn sample(&self, num: usize) -> Option<&Sample> {
        self.samples.get(num).and_then(|x| x.as_ref())
    }

    pub fn pattern(&self, num: usize) -> Option<&Pattern> {
        self.patterns.get(num)
    }

    /// Pattern indices referenced by the position table but not decoded.
    /// Only a salvaged module can have any.
    pub fn missing_patterns(&self) -> Vec<usize> {
        let missing: BTreeSet<usize> = self.song.positions.iter()
            .map(|&p| p as usize)
            .filter(|&p| p >= self.patterns.len())
            .collect();
        missing.into_iter().collect()
    }

    pub fn is_complete(&self) -> bool {
        !self.truncated && self.missing_patterns().is_empty()
    }
}
