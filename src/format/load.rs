use std::fmt;
use crate::format::ModuleFormat;
use crate::module::{Event, Module, Pattern, Sample, SongHeader};
use crate::util::BinaryRead;
use crate::Error;


/// Non-fatal findings reported while decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    NameNotRecommended(char),
    SampleSizeNotRecommended { sample: usize, size: usize },
    RepeatLengthZero { sample: usize },
    OddRepeatOffset { sample: usize, offset: usize },
    TempoZero,
    PositionsBeyondLength,
    PatternOutOfRange { position: usize, pattern: u8 },
    UnknownEffect { pattern: usize, effect: u16 },
    NoLeadingZero { sample: usize },
    NoTrailingZero { sample: usize },
    TrailingData(usize),
    Truncated { offset: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Warning::NameNotRecommended(c) => {
                write!(f, "character {:?} is not recommended in the module name", c)
            }
            Warning::SampleSizeNotRecommended{sample, size} => {
                write!(f, "sample {} length is greater than recommended: {}", sample, size)
            }
            Warning::RepeatLengthZero{sample} => {
                write!(f, "sample {}: 'no repeat' should be marked with 1, not 0", sample)
            }
            Warning::OddRepeatOffset{sample, offset} => {
                write!(f, "sample {}: repeat offset {} is an odd number", sample, offset)
            }
            Warning::TempoZero => write!(f, "song tempo is 0"),
            Warning::PositionsBeyondLength => {
                write!(f, "non-empty positions found beyond the declared length")
            }
            Warning::PatternOutOfRange{position, pattern} => {
                write!(f, "position {} references pattern {} beyond the format limit", position, pattern)
            }
            Warning::UnknownEffect{pattern, effect} => {
                write!(f, "pattern {}: unknown effect value 0x{:03x}", pattern, effect)
            }
            Warning::NoLeadingZero{sample} => {
                write!(f, "sample {}: no zero pad at the start of the raw data", sample)
            }
            Warning::NoTrailingZero{sample} => {
                write!(f, "sample {}: no zero pad at the end of the raw data", sample)
            }
            Warning::TrailingData(size) => {
                write!(f, "{} unused bytes found at the end of the file", size)
            }
            Warning::Truncated{offset} => {
                write!(f, "possibly corrupt data: end of file reached at offset {}", offset)
            }
        }
    }
}


struct Decoder<'a> {
    fmt     : &'static ModuleFormat,
    b       : &'a [u8],
    ofs     : usize,
    warnings: Vec<Warning>,
}

impl ModuleFormat {
    /// Decode the buffer with this format's layout. A short buffer yields a
    /// partial module if at least one pattern was decoded.
    pub fn load(&'static self, b: &[u8]) -> Result<Module, Error> {
        debug!("loading as {}", self.name);

        let mut m = Module::new(self);
        let mut d = Decoder {
            fmt     : self,
            b,
            ofs     : 0,
            warnings: Vec::new(),
        };

        match d.decode(&mut m) {
            Ok(_) => {}
            Err(Error::Truncated{offset, ..}) if !m.patterns.is_empty() => {
                d.warn(Warning::Truncated{offset});
                m.truncated = true;
            }
            Err(Error::Truncated{offset, ..}) => {
                return Err(Error::Load(format!("end of file reached at offset {} before any pattern", offset)));
            }
            Err(e) => return Err(e),
        }

        m.warnings = d.warnings;
        Ok(m)
    }
}

impl<'a> Decoder<'a> {
    fn decode(&mut self, m: &mut Module) -> Result<(), Error> {
        let fmt = self.fmt;

        let b = self.b;
        m.name = b.read_string(self.ofs, fmt.name_size)?;
        self.ofs += fmt.name_size;
        self.check_name(&m.name);

        for i in 0..fmt.samples {
            debug!("sample {} header at offset {}", i, self.ofs);
            let smp = self.sample_header(i)?;
            m.samples.push(smp);
        }

        debug!("song data at offset {}", self.ofs);
        m.song = self.song_header()?;
        self.ofs += fmt.magic_size;

        for i in 0..=m.song.max_pattern_number {
            debug!("pattern {} at offset {}", i, self.ofs);
            let pat = self.pattern(i)?;
            m.patterns.push(pat);
        }

        for (i, smp) in m.samples.iter_mut().enumerate() {
            if let Some(smp) = smp {
                if smp.length == 0 {
                    continue
                }
                debug!("sample {} data at offset {}", i, self.ofs);
                smp.data = Some(self.raw(i, smp.length)?);
            }
        }

        if b.len() > self.ofs {
            self.warn(Warning::TrailingData(b.len() - self.ofs));
        }

        Ok(())
    }

    fn warn(&mut self, w: Warning) {
        warn!("{}", w);
        self.warnings.push(w);
    }

    fn check_name(&mut self, name: &str) {
        let fmt = self.fmt;
        if let Some(c) = name.chars().find(|&c| fmt.name_not_recommended.contains(c)) {
            self.warn(Warning::NameNotRecommended(c));
        }
    }

    fn sample_header(&mut self, num: usize) -> Result<Option<Sample>, Error> {
        let fmt = self.fmt;
        let b = self.b;

        let h = b.slice(self.ofs, fmt.sample_header_size)?;
        self.ofs += fmt.sample_header_size;

        let ns = fmt.sample_name_size;
        let name = h.read_string(0, ns)?;
        let length = h.read16b(ns)? as usize;
        let volume = h.read16b(ns + 2)?;
        let repeat_offset = h.read16b(ns + 4)? as usize;
        let repeat_length = h.read16b(ns + 6)? as usize;

        if name.is_empty() && length == 0 && volume == 0 && repeat_offset == 0 && repeat_length == 0 {
            return Ok(None)
        }

        let mut smp = Sample::new();
        smp.name = name;
        smp.length = length * 2;
        smp.volume = volume;
        smp.repeat_offset = if fmt.repeat_in_words { repeat_offset * 2 } else { repeat_offset };
        smp.looped = repeat_length >= 2;
        smp.repeat_length = if smp.looped { repeat_length * 2 } else { repeat_length };

        if fmt.finetune {
            smp.finetune = (volume >> 8) as u8;
            smp.volume = volume & 0xff;
            if smp.finetune & 0xf0 != 0 {
                return Err(Error::Load(format!("sample {}: invalid finetune 0x{:02x}", num, smp.finetune)));
            }
        }

        self.validate_sample(num, &smp)?;

        Ok(Some(smp))
    }

    fn validate_sample(&mut self, num: usize, smp: &Sample) -> Result<(), Error> {
        let fmt = self.fmt;

        if smp.volume > fmt.max_volume {
            return Err(Error::Load(format!("sample {}: unexpected volume value {}, expected <= {}",
                num, smp.volume, fmt.max_volume)));
        }

        if let Some(prefix) = fmt.sample_name_prefix {
            if let Some(head) = smp.name.get(..prefix.len()) {
                if head != prefix && head.eq_ignore_ascii_case(prefix) {
                    return Err(Error::Load(format!("sample {}: unexpected name prefix {:?}, expected {:?}",
                        num, head, prefix)));
                }
            }
        }

        if smp.length > fmt.max_sample_size {
            return Err(Error::Load(format!("sample {}: length too big: {}, expected <= {}",
                num, smp.length, fmt.max_sample_size)));
        }

        if smp.repeat_offset > smp.length {
            return Err(Error::Load(format!("sample {}: repeat offset is greater than the sample length: {} > {}",
                num, smp.repeat_offset, smp.length)));
        }

        if smp.looped && smp.repeat_length > smp.length - smp.repeat_offset {
            return Err(Error::Load(format!("sample {}: repeat length {} exceeds the loop space (length {}, offset {})",
                num, smp.repeat_length, smp.length, smp.repeat_offset)));
        }

        if smp.length > fmt.recommended_sample_size {
            self.warn(Warning::SampleSizeNotRecommended{sample: num, size: smp.length});
        }
        if !smp.looped && smp.repeat_length == 0 {
            self.warn(Warning::RepeatLengthZero{sample: num});
        }
        if smp.repeat_offset % 2 != 0 {
            self.warn(Warning::OddRepeatOffset{sample: num, offset: smp.repeat_offset});
        }

        Ok(())
    }

    fn song_header(&mut self) -> Result<SongHeader, Error> {
        let fmt = self.fmt;
        let b = self.b;

        let h = b.slice(self.ofs, 2 + fmt.positions)?;
        self.ofs += 2 + fmt.positions;

        let length = h[0] as usize;
        let tempo = h[1];
        let positions = h[2..].to_vec();
        let max_pattern_number = positions.iter().cloned().max().unwrap_or(0) as usize;

        if length > fmt.positions {
            return Err(Error::Load(format!("song length {} is bigger than the {} allowed positions",
                length, fmt.positions)));
        }

        if tempo == 0 {
            self.warn(Warning::TempoZero);
        }

        if positions[length..].iter().any(|&p| p != 0) {
            self.warn(Warning::PositionsBeyondLength);
        }

        if let Some(pos) = positions.iter().position(|&p| p as usize >= fmt.patterns) {
            let pattern = positions[pos];
            if fmt.check_pattern_range {
                return Err(Error::Load(format!("position {} references pattern {}, expected < {}",
                    pos, pattern, fmt.patterns)));
            }
            self.warn(Warning::PatternOutOfRange{position: pos, pattern});
        }

        Ok(SongHeader {
            length,
            tempo,
            positions,
            max_pattern_number,
        })
    }

    fn pattern(&mut self, num: usize) -> Result<Pattern, Error> {
        let fmt = self.fmt;
        let b = self.b;

        let size = fmt.pattern_size();
        let data = b.slice(self.ofs, size)?;
        self.ofs += size;

        let mut pat = Pattern::new(fmt.tracks);
        let mut unknown: Vec<u16> = Vec::new();

        for i in 0..fmt.tracks * fmt.rows {
            let e = Event::from_cell(data.read32b_i(i * fmt.cell_size)?);
            if fmt.effect_name(e.effect).is_none() && !unknown.contains(&e.effect) {
                unknown.push(e.effect);
            }
            pat.tracks[i % fmt.tracks].push(e);
        }

        for effect in unknown {
            self.warn(Warning::UnknownEffect{pattern: num, effect});
        }

        Ok(pat)
    }

    fn raw(&mut self, num: usize, size: usize) -> Result<Vec<u8>, Error> {
        let b = self.b;
        let data = b.slice(self.ofs, size)?.to_vec();
        self.ofs += size;

        if data.first() != Some(&0) {
            self.warn(Warning::NoLeadingZero{sample: num});
        }
        if data.last() != Some(&0) {
            self.warn(Warning::NoTrailingZero{sample: num});
        }

        Ok(data)
    }
}
