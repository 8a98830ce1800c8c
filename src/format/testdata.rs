use byteorder::{BigEndian, ByteOrder};
use crate::format::ModuleFormat;


struct SampleHeader {
    name  : Vec<u8>,
    length: u16,
    volume: u16,
    repeat: u16,
    replen: u16,
}

/// Builds synthetic module images for a given layout. Unset fields are
/// zero, the song plays one position and the tempo byte is 0x78.
pub struct Builder {
    fmt        : &'static ModuleFormat,
    name       : Vec<u8>,
    samples    : Vec<Option<SampleHeader>>,
    song_length: u8,
    tempo      : u8,
    positions  : Vec<u8>,
    cells      : Vec<(usize, usize, usize, u32)>,
    payloads   : Vec<(usize, Vec<u8>)>,
    trailing   : Vec<u8>,
}

impl Builder {
    pub fn new(fmt: &'static ModuleFormat) -> Self {
        Builder {
            fmt,
            name       : Vec::new(),
            samples    : (0..fmt.samples).map(|_| None).collect(),
            song_length: 1,
            tempo      : 0x78,
            positions  : vec![0; fmt.positions],
            cells      : Vec::new(),
            payloads   : Vec::new(),
            trailing   : Vec::new(),
        }
    }

    pub fn name(self, name: &str) -> Self {
        self.name_bytes(name.as_bytes())
    }

    pub fn name_bytes(mut self, name: &[u8]) -> Self {
        self.name = name.to_vec();
        self
    }

    pub fn sample(mut self, num: usize, name: &str, length: u16, volume: u16, repeat: u16, replen: u16) -> Self {
        self.samples[num] = Some(SampleHeader {
            name: name.as_bytes().to_vec(),
            length,
            volume,
            repeat,
            replen,
        });
        self
    }

    pub fn song_length(mut self, len: u8) -> Self {
        self.song_length = len;
        self
    }

    pub fn tempo(mut self, tempo: u8) -> Self {
        self.tempo = tempo;
        self
    }

    pub fn position(mut self, pos: usize, pattern: u8) -> Self {
        self.positions[pos] = pattern;
        self
    }

    pub fn cell(mut self, pattern: usize, row: usize, track: usize, value: u32) -> Self {
        self.cells.push((pattern, row, track, value));
        self
    }

    /// Replace the generated payload of a sample.
    pub fn payload(mut self, num: usize, data: &[u8]) -> Self {
        self.payloads.push((num, data.to_vec()));
        self
    }

    pub fn trailing(mut self, data: &[u8]) -> Self {
        self.trailing = data.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let fmt = self.fmt;
        let mut b = Vec::new();

        b.extend(fixed(&self.name, fmt.name_size));

        for smp in &self.samples {
            let mut h = vec![0; fmt.sample_header_size];
            if let Some(smp) = smp {
                let ns = fmt.sample_name_size;
                h[..ns].copy_from_slice(&fixed(&smp.name, ns));
                BigEndian::write_u16(&mut h[ns..], smp.length);
                BigEndian::write_u16(&mut h[ns + 2..], smp.volume);
                BigEndian::write_u16(&mut h[ns + 4..], smp.repeat);
                BigEndian::write_u16(&mut h[ns + 6..], smp.replen);
            }
            b.extend(h);
        }

        b.push(self.song_length);
        b.push(self.tempo);
        b.extend(&self.positions);
        b.extend(vec![0; fmt.magic_size]);

        let num_patterns = *self.positions.iter().max().unwrap_or(&0) as usize + 1;
        let pattern_ofs = b.len();
        b.extend(vec![0; num_patterns * fmt.pattern_size()]);
        for &(pat, row, track, value) in &self.cells {
            let ofs = pattern_ofs + pat * fmt.pattern_size() + (row * fmt.tracks + track) * fmt.cell_size;
            BigEndian::write_u32(&mut b[ofs..], value);
        }

        for (i, smp) in self.samples.iter().enumerate() {
            let size = smp.as_ref().map_or(0, |x| x.length as usize * 2);
            if size == 0 {
                continue
            }
            match self.payloads.iter().find(|p| p.0 == i) {
                Some(p) => b.extend(&p.1),
                None    => {
                    let mut data: Vec<u8> = (0..size).map(|x| (x % 251) as u8 + 1).collect();
                    data[0] = 0;
                    data[size - 1] = 0;
                    b.extend(data);
                }
            }
        }

        b.extend(&self.trailing);

        for ofs in fmt.flag_bytes.offsets() {
            if let Some(flag) = fmt.flag_bytes.get(ofs) {
                b[ofs..ofs + flag.len()].copy_from_slice(flag);
            }
        }

        b
    }
}

fn fixed(s: &[u8], size: usize) -> Vec<u8> {
    let mut v = s.to_vec();
    v.resize(size, 0);
    v
}
